//! Demonstrates an OAuth-authenticated API call against a mock server, with the second call
//! served from the token cache.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde::Deserialize;
// self
use zoom_api::{
	auth::{AccountId, ClientId, Credentials},
	client::ReqwestApiClient,
	http::{ReqwestHttpClient, ReqwestTransportErrorMapper},
	reqwest::Client as ReqwestClient,
	request::ApiRequest,
	store::{MemoryStore, TokenStore},
	url::Url,
};

#[derive(Debug, Deserialize)]
struct User {
	id: String,
	email: String,
}

// httpmock serves a self-signed certificate.
fn mock_http_client() -> Result<ReqwestHttpClient> {
	let client = ReqwestClient::builder().danger_accept_invalid_certs(true).build()?;

	Ok(ReqwestHttpClient::with_client(client))
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/token")
				.body("grant_type=account_credentials&account_id=demo-account");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":3600}");
		})
		.await;
	let api_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/users/me").header("authorization", "Bearer demo-access");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":\"KdYKjnimT4KPd8FFgQt9FQ\",\"email\":\"demo@example.com\"}");
		})
		.await;
	let store: Arc<dyn TokenStore> = Arc::new(MemoryStore::default());
	let credentials = Credentials::oauth(
		AccountId::new("demo-account")?,
		ClientId::new("demo-client")?,
		"super-secret",
	);
	let client = ReqwestApiClient::with_http_client(
		credentials,
		mock_http_client()?,
		ReqwestTransportErrorMapper,
	)
	.with_store(store)
	.with_base_url(Url::parse(&server.url("/v2"))?)
	.with_token_url(Url::parse(&server.url("/oauth/token"))?)
	.with_debug(true);
	let request = ApiRequest::get("/users/me");

	for _ in 0..2 {
		if let Some(user) = client.fetch::<User, _, _>(&request).await? {
			println!("Fetched user {} <{}>.", user.id, user.email);
		}
	}

	token_mock.assert_calls_async(1).await;
	api_mock.assert_calls_async(2).await;

	Ok(())
}
