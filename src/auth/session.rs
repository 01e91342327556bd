//! Immutable session values produced by token exchanges.

// self
use crate::{
	_prelude::*,
	auth::{ProfileId, TokenSecret},
};

/// Tokens issued to one profile by a single client-credentials exchange.
///
/// Sessions are never mutated. Re-authentication builds a new value and swaps it into the
/// client's session map, so readers always observe a complete access/refresh pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
	/// Profile the tokens were issued for.
	pub profile: ProfileId,
	/// Bearer token attached to outgoing requests.
	pub access_token: TokenSecret,
	/// Refresh token, if the provider issued one.
	pub refresh_token: Option<TokenSecret>,
	/// Instant the exchange completed.
	pub issued_at: OffsetDateTime,
	/// Expiry advertised by the provider. Informational; sessions are replaced on 401, not on
	/// expiry.
	pub expires_at: Option<OffsetDateTime>,
}
impl Session {
	/// Creates a session issued now.
	pub fn new(profile: ProfileId, access_token: impl Into<String>) -> Self {
		Self {
			profile,
			access_token: TokenSecret::new(access_token),
			refresh_token: None,
			issued_at: OffsetDateTime::now_utc(),
			expires_at: None,
		}
	}

	/// Attaches a refresh token.
	pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
		self.refresh_token = Some(TokenSecret::new(refresh_token));

		self
	}

	/// Overrides the issue instant.
	pub fn with_issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = instant;

		self
	}

	/// Records the provider's relative expiry against the issue instant.
	pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
		self.expires_at = Some(self.issued_at + expires_in);

		self
	}

	/// Returns `true` when the provider-advertised expiry has passed at `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expires_at| instant >= expires_at)
	}

	/// Formats the `Authorization` header value for this session.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.access_token.expose())
	}
}
