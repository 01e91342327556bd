//! Client-credentials token exchange built on the `oauth2` crate.

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet, HttpClientError,
	RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError},
};
// self
use crate::{
	_prelude::*,
	auth::{ProfileId, Session, TokenSecret},
	error::{AuthenticationError, ConfigError},
	http::{self, HttpTransport, ResponseMetadata, ResponseMetadataSlot},
};

/// Token endpoint path relative to the API base URL.
pub const TOKEN_PATH: &str = "/oauth/token";

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;
type FacadeTokenResponse = oauth2::basic::BasicTokenResponse;

/// Performs `grant_type=client_credentials` exchanges for one client id/secret pair.
///
/// Credentials travel in the form body (`client_secret_post`) next to the grant type, and the
/// `oauth2` crate sends `Accept: application/json`.
pub(crate) struct ClientCredentialsExchange<'a, C>
where
	C: ?Sized + HttpTransport,
{
	oauth_client: ConfiguredBasicClient,
	http_client: &'a C,
}
impl<'a, C> ClientCredentialsExchange<'a, C>
where
	C: ?Sized + HttpTransport,
{
	pub(crate) fn new(
		token_endpoint: &Url,
		client_id: &str,
		client_secret: &TokenSecret,
		http_client: &'a C,
	) -> Result<Self> {
		let token_url = TokenUrl::new(token_endpoint.to_string())
			.map_err(|source| ConfigError::InvalidTokenEndpoint { source })?;
		let oauth_client = BasicClient::new(ClientId::new(client_id.to_owned()))
			.set_client_secret(ClientSecret::new(client_secret.expose().to_owned()))
			.set_auth_type(AuthType::RequestBody)
			.set_token_uri(token_url);

		Ok(Self { oauth_client, http_client })
	}

	/// Runs the exchange and converts the token response into a [`Session`].
	pub(crate) async fn exchange(&self, profile: &ProfileId) -> Result<Session, AuthenticationError> {
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.with_metadata(meta.clone());
		let response = self
			.oauth_client
			.exchange_client_credentials()
			.request_async(&instrumented)
			.await
			.map_err(|err| map_request_error(meta.take(), err))?;

		map_token_response(profile, response)
	}
}

fn map_token_response(
	profile: &ProfileId,
	response: FacadeTokenResponse,
) -> Result<Session, AuthenticationError> {
	let access_token = response.access_token().secret();

	if access_token.is_empty() {
		return Err(AuthenticationError::EmptyAccessToken);
	}

	let mut session = Session::new(profile.clone(), access_token.to_owned());

	if let Some(refresh) = response.refresh_token() {
		session = session.with_refresh_token(refresh.secret().to_owned());
	}
	if let Some(expires_in) = response.expires_in() {
		let secs = i64::try_from(expires_in.as_secs()).unwrap_or(i64::MAX);

		session = session.with_expires_in(Duration::seconds(secs));
	}

	Ok(session)
}

fn map_request_error<E>(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
) -> AuthenticationError
where
	E: 'static + Send + Sync + StdError,
{
	let status = meta.and_then(|value| value.status);

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response_error(response, status),
		RequestTokenError::Request(error) => http::map_client_error(error).into(),
		RequestTokenError::Parse(source, _body) =>
			if status.is_some_and(|code| !(200..300).contains(&code)) {
				AuthenticationError::Rejected {
					message: format!("token endpoint answered HTTP {}", status.unwrap_or_default()),
					status,
				}
			} else {
				AuthenticationError::TokenResponseParse { source, status }
			},
		RequestTokenError::Other(message) => AuthenticationError::Rejected { message, status },
	}
}

fn map_server_response_error(response: BasicErrorResponse, status: Option<u16>) -> AuthenticationError {
	let message = match response.error_description() {
		Some(description) => format!("{}: {description}", response.error().as_ref()),
		None => response.error().as_ref().to_owned(),
	};

	AuthenticationError::Rejected { message, status }
}
