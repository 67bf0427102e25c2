//! Prints the TikTok authorize URL for configured defaults and for per-call overrides.

// crates.io
use color_eyre::Result;
// self
use tiktok_open_sdk::{
	api::{AuthorizationParams, ReqwestSdk},
	strategy::LoginStrategy,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let sdk = ReqwestSdk::configure(|config| {
		config.client_key = "demo_client_key".into();
		config.user_auth.scopes = vec!["user.info.basic".into(), "video.list".into()];
		config.user_auth.redirect_uri = Some("https://example.com/auth/tiktok/callback".into());
	})?;
	let defaults = sdk.user_auth().authorization_uri(AuthorizationParams::new());
	let custom = sdk.user_auth().authorization_uri(
		AuthorizationParams::new()
			.scopes(["user.info.basic", "user.info.profile"])
			.state("demo-state"),
	);
	let redirect = LoginStrategy::new(&sdk).request_phase()?;

	println!("Configured defaults: {defaults}");
	println!("Per-call overrides: {custom}");
	println!("Login redirect: {}", redirect.url);
	println!("Store this state in the session: {}", redirect.state);

	Ok(())
}
