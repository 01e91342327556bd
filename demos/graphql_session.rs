//! Demonstrates a previewer session against a mocked CMS: the first GraphQL call authenticates,
//! a forced 401 triggers one re-authentication, and an anonymous clone sees only public content.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use oauth2_bearer_client::{
	auth::ProfileId,
	client::AuthenticatedClient,
	config::ClientConfig,
	http::{ReqwestHttpClient, TransportConfig},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let mut token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"Bearer\",\"expires_in\":300}",
			);
		})
		.await;
	let expired_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/graphql").header("authorization", "Bearer demo-access");
			then.status(401).body("token revoked");
		})
		.await;
	let _fresh_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/graphql").header("authorization", "Bearer demo-fresh");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"data\":{\"__typename\":\"Query\"}}");
		})
		.await;
	let _public_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/graphql").header_missing("authorization");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errors\":[{\"message\":\"Access denied.\"}]}");
		})
		.await;
	let config = ClientConfig::new(Url::parse(&server.base_url())?)
		.with_profile(ProfileId::previewer(), "demo-client", "demo-secret")
		.with_transport(TransportConfig {
			timeout: Some(std::time::Duration::from_secs(10)),
			accept_invalid_certs: true,
		});
	let http_client = ReqwestHttpClient::from_config(&config.transport)?;
	let client = AuthenticatedClient::with_http_client(config, http_client);

	println!("Previewer authenticated: {}.", client.authenticate(&ProfileId::previewer()).await);
	token_mock.delete_async().await;
	token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-fresh\",\"token_type\":\"Bearer\"}");
		})
		.await;

	let response = client.graphql("{ __typename }", json!({})).await?;

	println!("Authenticated data after one retry: {:?}.", response.data);

	let anonymous = client.clone();

	anonymous.disable_oauth();

	let response = anonymous.graphql("{ __typename }", json!({})).await?;

	println!("Anonymous errors: {:?}.", response.error_messages());

	expired_mock.assert_async().await;
	token_mock.assert_async().await;

	Ok(())
}
