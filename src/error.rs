//! Client-level error types shared across authentication, dispatch, and configuration.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Authentication failures ([`Error::CredentialsMissing`], [`Error::AuthenticationFailed`]) are
/// kept apart from request failures so callers can tell "could not authenticate" from "server
/// rejected the request".
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Request failed with a non-2xx status other than 401, or never reached the server.
	#[error(transparent)]
	RequestFailed(#[from] RequestError),
	/// Response body could not be decoded into the requested type.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// The profile has no client identifier or secret configured.
	#[error("Profile `{profile}` has no client credentials configured.")]
	CredentialsMissing {
		/// Profile whose credentials are missing.
		profile: String,
	},
	/// The token endpoint refused the credentials or could not be reached.
	#[error("Failed to authenticate profile `{profile}`.")]
	AuthenticationFailed {
		/// Profile whose token exchange failed.
		profile: String,
		/// Underlying token exchange failure.
		#[source]
		source: AuthenticationError,
	},
	/// The API answered 401 for the profile's current token.
	#[error("Authorization for profile `{profile}` was rejected with HTTP 401.")]
	AuthorizationExpired {
		/// Profile whose token was rejected.
		profile: String,
		/// Response body returned alongside the 401.
		body: String,
	},
}
impl Error {
	/// Returns the HTTP status carried by the error, when one exists.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::AuthorizationExpired { .. } => Some(401),
			Self::RequestFailed(RequestError::Status { status, .. }) => Some(*status),
			Self::AuthenticationFailed {
				source: AuthenticationError::Rejected { status, .. }, ..
			} => *status,
			_ => None,
		}
	}

	/// Returns `true` when the error means no usable token could be obtained.
	pub fn is_authentication(&self) -> bool {
		matches!(self, Self::CredentialsMissing { .. } | Self::AuthenticationFailed { .. })
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Base URL cannot be parsed.
	#[error("Base URL `{value}` is invalid.")]
	InvalidBaseUrl {
		/// Rejected input.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoint path does not form a valid URL once joined with the base URL.
	#[error("Endpoint `{endpoint}` does not form a valid URL.")]
	InvalidEndpoint {
		/// Rejected endpoint path.
		endpoint: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Token endpoint URL was rejected by the OAuth client.
	#[error("Token endpoint URL is invalid.")]
	InvalidTokenEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Environment variable holds a value that cannot be interpreted.
	#[error("Environment variable `{key}` has an invalid value `{value}`.")]
	InvalidEnvValue {
		/// Variable name.
		key: String,
		/// Rejected value.
		value: String,
	},
	/// `.env` file exists but could not be read or parsed.
	#[error("The `.env` file could not be loaded.")]
	EnvFile {
		/// Underlying dotenv failure.
		#[source]
		source: dotenvy::Error,
	},
	/// Profile identifier failed validation.
	#[error(transparent)]
	InvalidProfile(#[from] crate::auth::IdentifierError),
	/// Caller-supplied header value is not valid HTTP.
	#[error("Header value is invalid.")]
	InvalidHeader(#[from] oauth2::http::header::InvalidHeaderValue),
	/// Request body could not be serialized to JSON.
	#[error("Request body could not be serialized to JSON.")]
	SerializeBody(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Token exchange failures wrapped by [`Error::AuthenticationFailed`].
#[derive(Debug, ThisError)]
pub enum AuthenticationError {
	/// Token endpoint answered with an error status or an OAuth error payload.
	#[error("Token endpoint rejected the client credentials: {message}.")]
	Rejected {
		/// Provider-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint responded with JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint issued an empty access token.
	#[error("Token endpoint returned an empty access token.")]
	EmptyAccessToken,
	/// Token endpoint could not be reached.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Failures surfaced by [`Error::RequestFailed`].
#[derive(Debug, ThisError)]
pub enum RequestError {
	/// Server answered with a non-2xx status.
	#[error("Request failed with HTTP {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Response body, decoded lossily as UTF-8.
		body: String,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Request never produced a response.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the server.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the server.")]
	Io(#[from] std::io::Error),
	/// Transport reported a failure without a structured source.
	#[error("HTTP client error occurred while calling the server: {message}.")]
	Other {
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Response decoding failures.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body is not valid JSON for the requested type.
	#[error("Response body could not be decoded as JSON.")]
	Json {
		/// Structured parsing failure pointing at the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// GraphQL response carried no `data` member.
	#[error("GraphQL response did not contain data.")]
	MissingData,
}
