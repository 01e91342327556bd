//! GraphQL convenience layer: `{query, variables}` envelopes posted to `/graphql`.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::ProfileId,
	client::{ApiRequest, AuthenticatedClient},
	error::DecodeError,
	http::HttpTransport,
};

/// GraphQL endpoint path relative to the API base URL.
pub const GRAPHQL_PATH: &str = "/graphql";

#[derive(Serialize)]
struct GraphqlRequest<'a, V>
where
	V: ?Sized,
{
	query: &'a str,
	variables: &'a V,
}

/// Standard GraphQL response envelope.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphqlResponse<T = Value> {
	/// Result data; absent or `null` when the query failed as a whole.
	#[serde(default = "Option::default")]
	pub data: Option<T>,
	/// Errors reported by the server; empty on full success.
	#[serde(default)]
	pub errors: Vec<GraphqlError>,
}
impl<T> GraphqlResponse<T> {
	/// Returns `true` when the server reported at least one error.
	pub fn has_errors(&self) -> bool {
		!self.errors.is_empty()
	}

	/// Returns the error messages in server order.
	pub fn error_messages(&self) -> Vec<&str> {
		self.errors.iter().map(|error| error.message.as_str()).collect()
	}

	/// Takes the data payload, failing when the server returned none.
	pub fn into_data(self) -> Result<T> {
		self.data.ok_or_else(|| DecodeError::MissingData.into())
	}
}

/// One entry of a GraphQL `errors` array.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphqlError {
	/// Human-readable message.
	pub message: String,
	/// Source locations the error refers to.
	#[serde(default)]
	pub locations: Vec<GraphqlLocation>,
	/// Response path of the failing field.
	#[serde(default)]
	pub path: Option<Vec<Value>>,
	/// Server-specific extension data.
	#[serde(default)]
	pub extensions: Option<Value>,
}

/// Line/column pair inside a GraphQL document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct GraphqlLocation {
	/// One-based line.
	pub line: u32,
	/// One-based column.
	pub column: u32,
}

impl<C> AuthenticatedClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Posts `{query, variables}` to `/graphql` under the default profile.
	pub async fn graphql(&self, query: &str, variables: Value) -> Result<GraphqlResponse> {
		let profile = self.config().default_profile.clone();

		self.graphql_as(&profile, query, &variables).await
	}

	/// Posts `{query, variables}` to `/graphql` under `profile`, decoding `data` into `T`.
	pub async fn graphql_as<T, V>(
		&self,
		profile: &ProfileId,
		query: &str,
		variables: &V,
	) -> Result<GraphqlResponse<T>>
	where
		T: DeserializeOwned,
		V: ?Sized + Serialize,
	{
		let request = ApiRequest::post(GRAPHQL_PATH)
			.with_json(&GraphqlRequest { query, variables })?
			.with_profile(profile.clone());

		self.request(request).await?.json()
	}
}
