// crates.io
use httpmock::prelude::*;
// self
use oauth2_bearer_client::{
	_preludet::*,
	auth::{ProfileCredentials, ProfileId},
	client::ReqwestAuthenticatedClient,
	config::ClientConfig,
	error::AuthenticationError,
	http::TransportConfig,
};

const CLIENT_ID: &str = "previewer-client";
const CLIENT_SECRET: &str = "previewer-secret";

fn build_client(server: &MockServer) -> ReqwestAuthenticatedClient {
	build_reqwest_test_client(test_config(&server.base_url(), CLIENT_ID, CLIENT_SECRET))
}

#[tokio::test]
async fn authenticate_posts_client_credentials_and_stores_session() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let token = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/token")
				.header("accept", "application/json")
				.form_urlencoded_tuple("grant_type", "client_credentials")
				.form_urlencoded_tuple("client_id", CLIENT_ID)
				.form_urlencoded_tuple("client_secret", CLIENT_SECRET);
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"issued-token\",\"token_type\":\"Bearer\",\"refresh_token\":\"issued-refresh\",\"expires_in\":300}",
			);
		})
		.await;

	assert!(client.authenticate(&ProfileId::previewer()).await);

	token.assert_calls_async(1).await;

	let session = client
		.session(&ProfileId::previewer())
		.expect("Session should be stored after a successful exchange.");

	assert_eq!(session.access_token.expose(), "issued-token");
	assert_eq!(
		session.refresh_token.as_ref().map(|secret| secret.expose()),
		Some("issued-refresh")
	);
	assert!(session.expires_at.is_some());
}

#[tokio::test]
async fn missing_credentials_fail_without_network_calls() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"unused\",\"token_type\":\"Bearer\"}");
		})
		.await;
	let base_url = Url::parse(&server.base_url()).expect("Mock server URL should parse.");
	let config = ClientConfig::new(base_url).with_credentials(
		ProfileId::viewer(),
		ProfileCredentials::from_parts(Some("viewer-client".into()), Some(String::new())),
	);
	let client = build_reqwest_test_client(config);

	assert!(!client.authenticate(&ProfileId::previewer()).await);
	assert!(!client.authenticate(&ProfileId::viewer()).await);

	let err = client
		.try_authenticate(&ProfileId::viewer())
		.await
		.expect_err("An empty secret must count as missing.");

	assert!(matches!(err, Error::CredentialsMissing { ref profile } if profile == "viewer"));
	assert!(err.is_authentication());
	assert!(client.session(&ProfileId::viewer()).is_none());

	token.assert_calls_async(0).await;
}

#[tokio::test]
async fn disabled_oauth_authenticates_without_network_calls() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(500);
		})
		.await;

	client.disable_oauth();

	assert!(!client.oauth_enabled());
	assert!(client.authenticate(&ProfileId::previewer()).await);
	assert!(
		client
			.try_authenticate(&ProfileId::previewer())
			.await
			.expect("Disabled OAuth should report success.")
			.is_none()
	);

	token.assert_calls_async(0).await;
}

#[tokio::test]
async fn rejected_exchange_keeps_the_previous_session() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mut token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"first-token\",\"token_type\":\"Bearer\"}");
		})
		.await;

	assert!(client.authenticate(&ProfileId::previewer()).await);

	token.delete_async().await;
	token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(401).header("content-type", "application/json").body(
				"{\"error\":\"invalid_client\",\"error_description\":\"Client authentication failed\"}",
			);
		})
		.await;

	let err = client
		.try_authenticate(&ProfileId::previewer())
		.await
		.expect_err("Rejected credentials must fail authentication.");

	match &err {
		Error::AuthenticationFailed {
			profile,
			source: AuthenticationError::Rejected { message, status },
		} => {
			assert_eq!(profile, "previewer");
			assert_eq!(*status, Some(401));
			assert!(message.contains("invalid_client"));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	assert_eq!(err.status(), Some(401));
	assert_eq!(
		client
			.session(&ProfileId::previewer())
			.expect("Previous session should survive a failed exchange.")
			.access_token
			.expose(),
		"first-token"
	);

	token.assert_calls_async(1).await;
}

#[tokio::test]
async fn non_json_server_errors_report_the_status() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let _token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(500).body("upstream exploded");
		})
		.await;
	let err = client
		.try_authenticate(&ProfileId::previewer())
		.await
		.expect_err("Server errors must fail authentication.");

	assert!(matches!(
		err,
		Error::AuthenticationFailed {
			source: AuthenticationError::Rejected { status: Some(500), .. },
			..
		}
	));
}

#[tokio::test]
async fn empty_access_tokens_are_rejected() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let _token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"\",\"token_type\":\"Bearer\"}");
		})
		.await;
	let err = client
		.try_authenticate(&ProfileId::previewer())
		.await
		.expect_err("Empty tokens must fail authentication.");

	assert!(matches!(
		err,
		Error::AuthenticationFailed { source: AuthenticationError::EmptyAccessToken, .. }
	));
	assert!(client.session(&ProfileId::previewer()).is_none());
}

#[tokio::test]
async fn unreachable_token_endpoint_is_a_transport_failure() {
	let client =
		build_reqwest_test_client(test_config("http://127.0.0.1:1", CLIENT_ID, CLIENT_SECRET));

	assert!(!client.authenticate(&ProfileId::previewer()).await);

	let err = client
		.try_authenticate(&ProfileId::previewer())
		.await
		.expect_err("A closed port must fail authentication.");

	assert!(matches!(
		err,
		Error::AuthenticationFailed { source: AuthenticationError::Transport(_), .. }
	));
}

#[tokio::test]
async fn redirected_token_endpoint_is_not_followed() {
	let server = MockServer::start_async().await;
	let client = ReqwestAuthenticatedClient::new(
		test_config(&server.base_url(), CLIENT_ID, CLIENT_SECRET)
			.with_transport(TransportConfig { accept_invalid_certs: true, ..Default::default() }),
	)
	.expect("Default transport should build.");
	let moved = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(301).header("location", "/moved/oauth/token");
		})
		.await;
	let target = server
		.mock_async(|when, then| {
			when.path("/moved/oauth/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"redirected-token\",\"token_type\":\"Bearer\"}");
		})
		.await;
	let err = client
		.try_authenticate(&ProfileId::previewer())
		.await
		.expect_err("Redirects must fail authentication.");

	assert!(matches!(
		err,
		Error::AuthenticationFailed {
			source: AuthenticationError::Rejected { status: Some(301), .. },
			..
		}
	));
	assert!(client.session(&ProfileId::previewer()).is_none());

	moved.assert_calls_async(1).await;
	target.assert_calls_async(0).await;
}
