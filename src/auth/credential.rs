//! Per-profile client credentials.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Client identifier/secret pair configured for one profile.
///
/// Either half may be missing because the values usually come from the environment; blank
/// values count as missing. Use [`ProfileCredentials::pair`] to obtain both halves at once.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileCredentials {
	/// OAuth 2.0 client identifier.
	pub client_id: Option<String>,
	/// OAuth 2.0 client secret.
	pub client_secret: Option<TokenSecret>,
}
impl ProfileCredentials {
	/// Creates a complete credential pair.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			client_id: Some(client_id.into()),
			client_secret: Some(TokenSecret::new(client_secret)),
		}
	}

	/// Builds credentials from optional halves, discarding blank values.
	pub fn from_parts(client_id: Option<String>, client_secret: Option<String>) -> Self {
		Self {
			client_id: client_id.filter(|value| !value.trim().is_empty()),
			client_secret: client_secret
				.filter(|value| !value.trim().is_empty())
				.map(TokenSecret::new),
		}
	}

	/// Returns both halves when neither is missing or blank.
	pub fn pair(&self) -> Option<(&str, &TokenSecret)> {
		let client_id = self.client_id.as_deref().filter(|value| !value.trim().is_empty())?;
		let client_secret = self.client_secret.as_ref().filter(|value| !value.is_empty())?;

		Some((client_id, client_secret))
	}

	/// Returns `true` when both halves are present.
	pub fn is_complete(&self) -> bool {
		self.pair().is_some()
	}
}
impl Debug for ProfileCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProfileCredentials")
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.finish()
	}
}
