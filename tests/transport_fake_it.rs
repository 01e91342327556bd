// std
use std::collections::VecDeque;
// self
use oauth2_bearer_client::{
	_preludet::*,
	auth::ProfileId,
	client::{AuthenticatedClient, GRAPHQL_PATH},
	config::ClientConfig,
	error::{RequestError, TransportError},
	http::{HttpTransport, ResponseMetadata, ResponseMetadataSlot},
	oauth::oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse},
};

type Scripted = std::result::Result<HttpResponse, String>;

#[derive(Clone, Debug)]
struct RecordedRequest {
	method: Method,
	uri: String,
	authorization: Option<String>,
	body: String,
}

#[derive(Default)]
struct FakeState {
	responses: VecDeque<Scripted>,
	requests: Vec<RecordedRequest>,
}

#[derive(Clone, Default)]
struct FakeTransport(Arc<Mutex<FakeState>>);
impl FakeTransport {
	fn scripted(responses: impl IntoIterator<Item = Scripted>) -> Self {
		let transport = Self::default();

		transport.0.lock().responses.extend(responses);

		transport
	}

	fn requests(&self) -> Vec<RecordedRequest> {
		self.0.lock().requests.clone()
	}
}
impl HttpTransport for FakeTransport {
	type Handle = FakeHandle;
	type TransportError = std::io::Error;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		FakeHandle { state: Arc::clone(&self.0), slot }
	}
}

struct FakeHandle {
	state: Arc<Mutex<FakeState>>,
	slot: ResponseMetadataSlot,
}
impl<'a> AsyncHttpClient<'a> for FakeHandle {
	type Error = HttpClientError<std::io::Error>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'a + Send + Sync>>;

	fn call(&'a self, request: HttpRequest) -> Self::Future {
		let state = Arc::clone(&self.state);
		let slot = self.slot.clone();

		Box::pin(async move { serve(&state, &slot, request) })
	}
}

fn serve(
	state: &Mutex<FakeState>,
	slot: &ResponseMetadataSlot,
	request: HttpRequest,
) -> Result<HttpResponse, HttpClientError<std::io::Error>> {
	assert!(slot.take().is_none(), "Metadata slot must start empty.");

	let scripted = {
		let mut state = state.lock();

		state.requests.push(RecordedRequest {
			method: request.method().clone(),
			uri: request.uri().to_string(),
			authorization: request
				.headers()
				.get(header::AUTHORIZATION)
				.and_then(|value| value.to_str().ok())
				.map(str::to_owned),
			body: String::from_utf8_lossy(request.body()).into_owned(),
		});
		state.responses.pop_front().expect("Fake transport ran out of scripted responses.")
	};
	let response = scripted.map_err(HttpClientError::Other)?;

	slot.store(ResponseMetadata { status: Some(response.status().as_u16()), retry_after: None });

	Ok(response)
}

fn response(status: u16, body: &str) -> Scripted {
	Ok(oauth2_bearer_client::oauth::oauth2::http::Response::builder()
		.status(status)
		.header(header::CONTENT_TYPE, "application/json")
		.body(body.as_bytes().to_vec())
		.expect("Scripted response should build."))
}

fn token(access_token: &str) -> Scripted {
	response(200, &format!("{{\"access_token\":\"{access_token}\",\"token_type\":\"Bearer\"}}"))
}

fn build_client(transport: FakeTransport) -> AuthenticatedClient<FakeTransport> {
	let base_url = Url::parse("https://cms.example.com").expect("Base URL fixture should parse.");
	let config = ClientConfig::new(base_url).with_profile(
		ProfileId::previewer(),
		"fake-client",
		"fake-secret",
	);

	AuthenticatedClient::with_http_client(config, transport)
}

#[tokio::test]
async fn custom_transport_carries_exchanges_and_retries() {
	let transport = FakeTransport::scripted([
		token("first-token"),
		response(401, "{\"message\":\"expired\"}"),
		token("second-token"),
		response(200, "{\"data\":{\"__typename\":\"Query\"}}"),
	]);
	let client = build_client(transport.clone());
	let graphql = client
		.graphql("{ __typename }", serde_json::json!({}))
		.await
		.expect("Retried GraphQL call should succeed.");

	assert_eq!(graphql.into_data().expect("Data should be present.")["__typename"], "Query");

	let requests = transport.requests();
	let uris = requests.iter().map(|request| request.uri.as_str()).collect::<Vec<_>>();

	assert_eq!(
		uris,
		[
			"https://cms.example.com/oauth/token",
			"https://cms.example.com/graphql",
			"https://cms.example.com/oauth/token",
			"https://cms.example.com/graphql",
		]
	);
	assert_eq!(requests[0].method, Method::POST);
	assert!(requests[0].body.contains("grant_type=client_credentials"));
	assert!(requests[0].body.contains("client_id=fake-client"));
	assert!(requests[0].body.contains("client_secret=fake-secret"));
	assert_eq!(requests[1].authorization.as_deref(), Some("Bearer first-token"));
	assert_eq!(requests[3].authorization.as_deref(), Some("Bearer second-token"));
	assert!(requests[3].uri.ends_with(GRAPHQL_PATH));
	assert_eq!(requests[1].body, requests[3].body);
}

#[tokio::test]
async fn transport_failures_are_request_errors_and_not_retried() {
	let transport =
		FakeTransport::scripted([token("issued-token"), Err("connection reset".to_owned())]);
	let client = build_client(transport.clone());
	let err = client.get("/jsonapi").await.expect_err("Transport failures must surface.");

	assert!(matches!(
		err,
		Error::RequestFailed(RequestError::Transport(TransportError::Other { ref message }))
			if message == "connection reset"
	));
	assert!(!err.is_authentication());
	assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn cleared_sessions_force_a_new_exchange() {
	let transport = FakeTransport::scripted([
		token("first-token"),
		response(200, "{}"),
		token("second-token"),
		response(200, "{}"),
	]);
	let client = build_client(transport.clone());

	client.get("/jsonapi").await.expect("First request should succeed.");

	let cleared = client
		.clear_session(&ProfileId::previewer())
		.expect("A session should have been stored.");

	assert_eq!(cleared.access_token.expose(), "first-token");

	client.get("/jsonapi").await.expect("Second request should succeed.");

	let requests = transport.requests();

	assert_eq!(requests[3].authorization.as_deref(), Some("Bearer second-token"));

	client.clear_sessions();

	assert!(client.session(&ProfileId::previewer()).is_none());
	assert!(format!("{client:?}").contains("oauth_enabled: true"));
}
