//! Demonstrates loading legacy key/secret credentials from configuration and issuing a
//! header-only call authenticated with a locally signed token.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use zoom_api::{
	client::ReqwestApiClient,
	config::ClientConfig,
	http::{ReqwestHttpClient, ReqwestTransportErrorMapper},
	reqwest::Client as ReqwestClient,
	request::ApiRequest,
};

// httpmock serves a self-signed certificate.
fn mock_http_client() -> Result<ReqwestHttpClient> {
	let client = ReqwestClient::builder().danger_accept_invalid_certs(true).build()?;

	Ok(ReqwestHttpClient::with_client(client))
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let api_mock = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/v2/meetings/85746065").header_exists("authorization");
			then.status(204);
		})
		.await;
	let config = ClientConfig {
		api_key: Some("demo-key".into()),
		api_secret: Some("demo-secret".into()),
		base_url: Some(server.url("/v2")),
		timeout: Some(10),
		..Default::default()
	};
	let client =
		ReqwestApiClient::with_config(&config, mock_http_client()?, ReqwestTransportErrorMapper)?;
	let outcome =
		client.execute::<(), _, _>(&ApiRequest::delete("/meetings/85746065").header_only()).await?;

	println!("Meeting deleted: {}.", outcome.is_no_content());

	api_mock.assert_async().await;

	Ok(())
}
