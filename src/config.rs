//! Credentials and endpoint configuration shared by every client.
//!
//! A [`Config`] is a plain value: build it once with [`Config::configure`] (or load it through
//! `serde`), then hand it to [`Sdk`](crate::api::Sdk). Nothing is validated at configure time;
//! malformed URLs and empty credentials only surface when a call uses them.

// self
use crate::_prelude::*;

/// Base URL of the TikTok Open API.
pub const OPEN_API_BASE_URL: &str = "https://open.tiktokapis.com";
/// Default OAuth authorization endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://www.tiktok.com/v2/auth/authorize/";
/// Default OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://open.tiktokapis.com/v2/oauth/token/";
/// Default OAuth token revocation endpoint.
pub const DEFAULT_REVOKE_TOKEN_URL: &str = "https://open.tiktokapis.com/v2/oauth/revoke/";
/// Default user info endpoint.
pub const DEFAULT_USER_INFO_URL: &str = "https://open.tiktokapis.com/v2/user/info/";
/// Default creator info query endpoint.
pub const DEFAULT_CREATOR_INFO_QUERY_URL: &str =
	"https://open.tiktokapis.com/v2/post/publish/creator_info/query/";

/// Client credentials plus the endpoints used by the resource clients.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
	/// TikTok client key (sent as `client_key`).
	pub client_key: String,
	/// TikTok client secret; never logged.
	pub client_secret: String,
	/// User info endpoint.
	pub user_info_url: String,
	/// Creator info query endpoint.
	pub creator_info_query_url: String,
	/// User authorization settings.
	pub user_auth: UserAuthConfig,
}
impl Config {
	/// Creates a default configuration and applies `mutator` to it.
	pub fn configure(mutator: impl FnOnce(&mut Config)) -> Self {
		let mut config = Self::default();

		mutator(&mut config);

		config
	}
}
impl Default for Config {
	fn default() -> Self {
		Self {
			client_key: String::new(),
			client_secret: String::new(),
			user_info_url: DEFAULT_USER_INFO_URL.into(),
			creator_info_query_url: DEFAULT_CREATOR_INFO_QUERY_URL.into(),
			user_auth: UserAuthConfig::default(),
		}
	}
}
impl Debug for Config {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Config")
			.field("client_key", &self.client_key)
			.field("client_secret", &"<redacted>")
			.field("user_info_url", &self.user_info_url)
			.field("creator_info_query_url", &self.creator_info_query_url)
			.field("user_auth", &self.user_auth)
			.finish()
	}
}

/// OAuth endpoints, requested scopes, and the redirect URI for user authorization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAuthConfig {
	/// OAuth authorization endpoint.
	pub auth_url: String,
	/// OAuth token endpoint (code exchange, refresh, client credentials).
	pub token_url: String,
	/// OAuth token revocation endpoint.
	pub revoke_token_url: String,
	/// Scopes requested by default, joined with `,` on the wire.
	pub scopes: Vec<String>,
	/// Redirect URI registered for the application.
	pub redirect_uri: Option<String>,
}
impl Default for UserAuthConfig {
	fn default() -> Self {
		Self {
			auth_url: DEFAULT_AUTH_URL.into(),
			token_url: DEFAULT_TOKEN_URL.into(),
			revoke_token_url: DEFAULT_REVOKE_TOKEN_URL.into(),
			scopes: Vec::new(),
			redirect_uri: None,
		}
	}
}
