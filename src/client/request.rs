//! Per-call request descriptions and decoded responses.

// crates.io
use oauth2::{HttpRequest, HttpResponse};
// self
use crate::{
	_prelude::*,
	auth::{ProfileId, Session},
	error::{ConfigError, DecodeError, RequestError},
	http,
};

/// A single API call: method, endpoint path, optional body and headers, and the profile whose
/// session should authorize it.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Path appended to the configured base URL (for example `/graphql`).
	pub endpoint: String,
	/// Raw request body.
	pub body: Option<Vec<u8>>,
	/// Extra headers; they override the default `Content-Type`.
	pub headers: HeaderMap,
	/// Profile selector; `None` uses the client's default profile.
	pub profile: Option<ProfileId>,
}
impl ApiRequest {
	/// Creates a request without body, extra headers, or profile selector.
	pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
		Self { method, endpoint: endpoint.into(), body: None, headers: HeaderMap::new(), profile: None }
	}

	/// Shorthand for a `GET` request.
	pub fn get(endpoint: impl Into<String>) -> Self {
		Self::new(Method::GET, endpoint)
	}

	/// Shorthand for a `POST` request.
	pub fn post(endpoint: impl Into<String>) -> Self {
		Self::new(Method::POST, endpoint)
	}

	/// Shorthand for a `PUT` request.
	pub fn put(endpoint: impl Into<String>) -> Self {
		Self::new(Method::PUT, endpoint)
	}

	/// Shorthand for a `DELETE` request.
	pub fn delete(endpoint: impl Into<String>) -> Self {
		Self::new(Method::DELETE, endpoint)
	}

	/// Serializes `body` as the JSON request body.
	pub fn with_json<T>(mut self, body: &T) -> Result<Self>
	where
		T: ?Sized + Serialize,
	{
		self.body = Some(serde_json::to_vec(body).map_err(ConfigError::from)?);

		Ok(self)
	}

	/// Sets a raw request body.
	pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// Adds or replaces one header.
	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Merges `headers` into the request, replacing values with the same name.
	pub fn with_headers(mut self, headers: HeaderMap) -> Self {
		self.headers.extend(headers);

		self
	}

	/// Selects the profile whose session authorizes the request.
	pub fn with_profile(mut self, profile: ProfileId) -> Self {
		self.profile = Some(profile);

		self
	}

	/// Builds the wire request, attaching the bearer header last so it wins over caller headers.
	pub(crate) fn to_http(&self, url: &Url, session: Option<&Session>) -> Result<HttpRequest> {
		let mut headers = HeaderMap::new();

		headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
		headers.extend(self.headers.clone());

		if let Some(session) = session {
			let mut value = HeaderValue::from_str(&session.bearer()).map_err(ConfigError::from)?;

			value.set_sensitive(true);
			headers.insert(header::AUTHORIZATION, value);
		}

		let mut request = oauth2::http::Request::builder()
			.method(self.method.clone())
			.uri(url.as_str())
			.body(self.body.clone().unwrap_or_default())
			.map_err(ConfigError::from)?;

		*request.headers_mut() = headers;

		Ok(request)
	}
}

/// Successful (2xx) API response.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Classifies a wire response: 2xx passes through, 401 becomes
	/// [`Error::AuthorizationExpired`], anything else becomes [`RequestError::Status`].
	pub(crate) fn from_http(response: HttpResponse, profile: &ProfileId) -> Result<Self> {
		let (parts, body) = response.into_parts();

		if parts.status.is_success() {
			return Ok(Self { status: parts.status, headers: parts.headers, body });
		}

		let text = String::from_utf8_lossy(&body).into_owned();

		if parts.status == StatusCode::UNAUTHORIZED {
			return Err(Error::AuthorizationExpired { profile: profile.to_string(), body: text });
		}

		Err(RequestError::Status {
			status: parts.status.as_u16(),
			body: text,
			retry_after: http::parse_retry_after(&parts.headers),
		}
		.into())
	}

	/// Decodes the body as JSON into `T`, reporting the failing path on mismatch.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| DecodeError::Json { source }.into())
	}

	/// Returns the body decoded lossily as UTF-8.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url() -> Url {
		Url::parse("https://cms.example.com/graphql").expect("URL fixture should parse.")
	}

	fn wire_response(status: u16, body: &str) -> HttpResponse {
		let mut response = HttpResponse::new(body.as_bytes().to_vec());

		*response.status_mut() = StatusCode::from_u16(status).expect("Status fixture should be valid.");

		response
	}

	#[test]
	fn caller_headers_override_content_type_but_not_authorization() {
		let session = Session::new(ProfileId::previewer(), "issued-token");
		let request = ApiRequest::post("/graphql")
			.with_header(header::CONTENT_TYPE, HeaderValue::from_static("application/graphql"))
			.with_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer caller"))
			.with_body("{}");
		let wire = request.to_http(&url(), Some(&session)).expect("Request should build.");

		assert_eq!(wire.method(), Method::POST);
		assert_eq!(wire.uri(), "https://cms.example.com/graphql");
		assert_eq!(wire.headers()[header::CONTENT_TYPE], "application/graphql");
		assert_eq!(wire.headers()[header::AUTHORIZATION], "Bearer issued-token");
		assert_eq!(wire.body().as_slice(), b"{}");
	}

	#[test]
	fn anonymous_requests_carry_json_content_type_only() {
		let wire = ApiRequest::get("/jsonapi").to_http(&url(), None).expect("Request should build.");

		assert_eq!(wire.headers()[header::CONTENT_TYPE], "application/json");
		assert!(wire.headers().get(header::AUTHORIZATION).is_none());
		assert!(wire.body().is_empty());
	}

	#[test]
	fn responses_are_classified_by_status() {
		let profile = ProfileId::viewer();
		let ok = ApiResponse::from_http(wire_response(200, "{\"ok\":true}"), &profile)
			.expect("2xx responses should pass through.");
		let value: serde_json::Value = ok.json().expect("Body should decode.");

		assert_eq!(value["ok"], true);
		assert!(matches!(
			ApiResponse::from_http(wire_response(401, "expired"), &profile),
			Err(Error::AuthorizationExpired { ref body, .. }) if body == "expired"
		));
		assert!(matches!(
			ApiResponse::from_http(wire_response(404, "missing"), &profile),
			Err(Error::RequestFailed(RequestError::Status { status: 404, .. }))
		));
	}

	#[test]
	fn json_decoding_reports_the_failing_path() {
		#[derive(Debug, Deserialize)]
		#[allow(dead_code)]
		struct Payload {
			count: u32,
		}

		let response = ApiResponse::from_http(wire_response(200, "{\"count\":\"many\"}"), &ProfileId::viewer())
			.expect("2xx responses should pass through.");
		let err = response.json::<Payload>().expect_err("Strings must not decode into integers.");

		match err {
			Error::Decode(DecodeError::Json { source }) => assert_eq!(source.path().to_string(), "count"),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}
