//! Fetches a client access token from a local mock of the TikTok token endpoint.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use tiktok_open_sdk::{api::ReqwestSdk, serde_json};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v2/oauth/token/");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"clt.demo\",\"expires_in\":7200,\"token_type\":\"Bearer\"}",
			);
		})
		.await;
	let sdk = ReqwestSdk::configure(|config| {
		config.client_key = "demo_client_key".into();
		config.client_secret = "demo_client_secret".into();
		config.user_auth.token_url = server.url("/v2/oauth/token/");
	})?;
	let response = sdk.client_auth().fetch_client_token().await?;

	token_mock.assert_async().await;

	println!("{}", serde_json::to_string_pretty(&response)?);

	Ok(())
}
