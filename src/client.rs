//! Authenticated HTTP client: per-profile OAuth sessions with transparent
//! authentication and a single 401-driven retry.
//!
//! [`AuthenticatedClient`] keeps one [`Session`] per [`ProfileId`]. The first request for a
//! profile runs the client-credentials exchange; later requests reuse the stored bearer token.
//! When the API answers 401 the client re-authenticates exactly once, rebuilds the request with
//! the new token, and sends it exactly once more. The outcome of that second attempt is final.
//!
//! Pre-request authentication is single-flight per profile: concurrent callers that find no
//! session wait on one exchange instead of each hitting the token endpoint.

mod graphql;
mod request;

pub use graphql::*;
pub use request::*;

// std
use std::sync::atomic::{AtomicBool, Ordering};
// crates.io
use oauth2::AsyncHttpClient;
// self
use crate::{
	_prelude::*,
	auth::{ProfileCredentials, ProfileId, Session},
	config::ClientConfig,
	error::RequestError,
	http::{self, HttpTransport, ResponseMetadataSlot},
	oauth::ClientCredentialsExchange,
	obs::{self, OperationKind, OperationSpan, Outcome},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestAuthenticatedClient = AuthenticatedClient<ReqwestHttpClient>;

type SessionMap = HashMap<ProfileId, Arc<Session>>;

/// HTTP client that authorizes requests with per-profile OAuth 2.0 client-credentials sessions.
///
/// Clones share the transport, configuration, and session map; each clone carries its own
/// OAuth toggle (initialized from the original's current value).
pub struct AuthenticatedClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Transport used for token exchanges and API requests.
	pub http_client: Arc<C>,
	config: Arc<ClientConfig>,
	oauth_enabled: AtomicBool,
	sessions: Arc<RwLock<SessionMap>>,
	auth_guards: Arc<Mutex<HashMap<ProfileId, Arc<AsyncMutex<()>>>>>,
}
impl<C> AuthenticatedClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(config: ClientConfig, http_client: impl Into<Arc<C>>) -> Self {
		Self {
			http_client: http_client.into(),
			config: Arc::new(config),
			oauth_enabled: AtomicBool::new(true),
			sessions: Default::default(),
			auth_guards: Default::default(),
		}
	}

	/// Returns the configuration the client was built with.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Stops attaching bearer tokens; [`authenticate`](Self::authenticate) becomes a no-op
	/// success. Used to reach endpoints anonymously.
	pub fn disable_oauth(&self) {
		self.oauth_enabled.store(false, Ordering::Relaxed);
	}

	/// Re-enables authentication after [`disable_oauth`](Self::disable_oauth).
	pub fn enable_oauth(&self) {
		self.oauth_enabled.store(true, Ordering::Relaxed);
	}

	/// Returns `true` when requests are authenticated.
	pub fn oauth_enabled(&self) -> bool {
		self.oauth_enabled.load(Ordering::Relaxed)
	}

	/// Returns the current session for `profile`, if one has been issued.
	pub fn session(&self, profile: &ProfileId) -> Option<Arc<Session>> {
		self.sessions.read().get(profile).cloned()
	}

	/// Drops the session for `profile`; the next request authenticates again.
	pub fn clear_session(&self, profile: &ProfileId) -> Option<Arc<Session>> {
		self.sessions.write().remove(profile)
	}

	/// Drops every session.
	pub fn clear_sessions(&self) {
		self.sessions.write().clear();
	}

	/// Authenticates `profile`, returning `true` on success.
	///
	/// Failures are logged and reported as `false`; use
	/// [`try_authenticate`](Self::try_authenticate) to inspect the cause.
	pub async fn authenticate(&self, profile: &ProfileId) -> bool {
		self.try_authenticate(profile).await.is_ok()
	}

	/// Runs a client-credentials exchange for `profile` and stores the resulting session.
	///
	/// Returns `Ok(None)` without any network call when OAuth is disabled. Missing credentials
	/// fail with [`Error::CredentialsMissing`] before anything is sent. On failure the previous
	/// session, if any, stays in place.
	pub async fn try_authenticate(&self, profile: &ProfileId) -> Result<Option<Arc<Session>>> {
		if !self.oauth_enabled() {
			return Ok(None);
		}

		self.authenticate_guarded(profile, false).await.map(Some)
	}

	/// Sends `request`, authenticating first when its profile has no session yet.
	///
	/// A 401 answer triggers one re-authentication and one retry; every other failure is
	/// returned as-is. Authentication failures surface as [`Error::CredentialsMissing`] or
	/// [`Error::AuthenticationFailed`], never as request errors.
	pub async fn request(&self, request: ApiRequest) -> Result<ApiResponse> {
		const KIND: OperationKind = OperationKind::Request;

		let profile = request.profile.clone().unwrap_or_else(|| self.config.default_profile.clone());
		let span = OperationSpan::new(KIND, &profile);

		obs::record_outcome(KIND, Outcome::Attempt);

		let result = span.instrument(self.request_with_retry(&request, &profile)).await;

		match &result {
			Ok(_) => obs::record_outcome(KIND, Outcome::Success),
			Err(_) => obs::record_outcome(KIND, Outcome::Failure),
		}

		result
	}

	/// Sends a `GET` request under the default profile.
	pub async fn get(&self, endpoint: &str) -> Result<ApiResponse> {
		self.request(ApiRequest::get(endpoint)).await
	}

	/// Sends a `POST` request with a JSON body under the default profile.
	pub async fn post<T>(&self, endpoint: &str, body: &T) -> Result<ApiResponse>
	where
		T: ?Sized + Serialize,
	{
		self.request(ApiRequest::post(endpoint).with_json(body)?).await
	}

	/// Sends a `PUT` request with a JSON body under the default profile.
	pub async fn put<T>(&self, endpoint: &str, body: &T) -> Result<ApiResponse>
	where
		T: ?Sized + Serialize,
	{
		self.request(ApiRequest::put(endpoint).with_json(body)?).await
	}

	/// Sends a `DELETE` request under the default profile.
	pub async fn delete(&self, endpoint: &str) -> Result<ApiResponse> {
		self.request(ApiRequest::delete(endpoint)).await
	}

	async fn request_with_retry(&self, request: &ApiRequest, profile: &ProfileId) -> Result<ApiResponse> {
		let url = self.config.endpoint_url(&request.endpoint)?;
		let session = if self.oauth_enabled() {
			Some(self.authenticate_guarded(profile, true).await?)
		} else {
			None
		};
		let first = self.dispatch(request, &url, session.as_deref(), profile).await;

		if !matches!(first, Err(Error::AuthorizationExpired { .. })) || !self.oauth_enabled() {
			return first;
		}

		obs::record_outcome(OperationKind::Request, Outcome::Retry);
		obs::retrying_unauthorized(profile, &request.method, &request.endpoint);

		let Ok(refreshed) = self.authenticate_guarded(profile, false).await else {
			return first;
		};

		self.dispatch(request, &url, Some(&refreshed), profile).await
	}

	/// Authenticates under the profile's single-flight guard.
	///
	/// With `reuse_existing`, a session stored by a concurrent caller while this one waited on
	/// the guard is returned instead of exchanging again.
	async fn authenticate_guarded(&self, profile: &ProfileId, reuse_existing: bool) -> Result<Arc<Session>> {
		if reuse_existing && let Some(current) = self.session(profile) {
			return Ok(current);
		}

		const KIND: OperationKind = OperationKind::Authenticate;

		let span = OperationSpan::new(KIND, profile);

		obs::record_outcome(KIND, Outcome::Attempt);

		let result = span
			.instrument(async {
				let guard = self.auth_guard(profile);
				let _singleflight = guard.lock().await;

				if reuse_existing && let Some(current) = self.session(profile) {
					return Ok(current);
				}

				self.exchange(profile).await
			})
			.await;

		match &result {
			Ok(_) => obs::record_outcome(KIND, Outcome::Success),
			Err(err) => {
				obs::record_outcome(KIND, Outcome::Failure);
				obs::authentication_failed(profile, err);
			},
		}

		result
	}

	async fn exchange(&self, profile: &ProfileId) -> Result<Arc<Session>> {
		let (client_id, client_secret) = self
			.config
			.credentials(profile)
			.and_then(ProfileCredentials::pair)
			.ok_or_else(|| Error::CredentialsMissing { profile: profile.to_string() })?;
		let token_endpoint = self.config.token_endpoint()?;
		let exchange = ClientCredentialsExchange::new(
			&token_endpoint,
			client_id,
			client_secret,
			self.http_client.as_ref(),
		)?;
		let session = exchange
			.exchange(profile)
			.await
			.map(Arc::new)
			.map_err(|source| Error::AuthenticationFailed { profile: profile.to_string(), source })?;

		self.sessions.write().insert(profile.clone(), Arc::clone(&session));
		obs::session_stored(profile, session.refresh_token.is_some());

		Ok(session)
	}

	async fn dispatch(
		&self,
		request: &ApiRequest,
		url: &Url,
		session: Option<&Session>,
		profile: &ProfileId,
	) -> Result<ApiResponse> {
		let wire = request.to_http(url, session)?;
		let handle = self.http_client.with_metadata(ResponseMetadataSlot::default());
		let response = handle
			.call(wire)
			.await
			.map_err(|err| RequestError::from(http::map_client_error(err)))?;

		ApiResponse::from_http(response, profile)
	}

	fn auth_guard(&self, profile: &ProfileId) -> Arc<AsyncMutex<()>> {
		let mut guards = self.auth_guards.lock();

		guards.entry(profile.clone()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
	}
}
#[cfg(feature = "reqwest")]
impl AuthenticatedClient<ReqwestHttpClient> {
	/// Creates a client with a reqwest transport built from `config.transport`.
	pub fn new(config: ClientConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::from_config(&config.transport)?;

		Ok(Self::with_http_client(config, http_client))
	}

	/// Creates a client from the environment (see [`ClientConfig::from_env`]).
	pub fn from_env() -> Result<Self> {
		Self::new(ClientConfig::from_env()?)
	}
}
impl<C> Clone for AuthenticatedClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			config: Arc::clone(&self.config),
			oauth_enabled: AtomicBool::new(self.oauth_enabled()),
			sessions: Arc::clone(&self.sessions),
			auth_guards: Arc::clone(&self.auth_guards),
		}
	}
}
impl<C> Debug for AuthenticatedClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthenticatedClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("default_profile", &self.config.default_profile)
			.field("oauth_enabled", &self.oauth_enabled())
			.field("sessions", &self.sessions.read().len())
			.finish()
	}
}
