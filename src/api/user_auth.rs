//! User authorization: authorize URL construction and the user token lifecycle.

// self
use crate::{
	_prelude::*,
	api::{Sdk, common},
	http::{ApiHttpClient, ApiRequest},
	oauth::TransportErrorMapper,
	obs::CallKind,
	response::ApiResponse,
};

/// Caller overrides for [`UserAuth::authorization_uri`].
///
/// Each field is tri-state: untouched (configured default), cleared (sent empty), or set.
/// Only `scope`, `redirect_uri`, and `state` can be overridden.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthorizationParams {
	scope: Option<Option<String>>,
	redirect_uri: Option<Option<String>>,
	state: Option<Option<String>>,
}
impl AuthorizationParams {
	/// Creates an empty override set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Overrides the comma-delimited scope string.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(Some(scope.into()));

		self
	}

	/// Overrides the scope with a list, joined with `,`.
	pub fn scopes<I, S>(self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let joined =
			scopes.into_iter().map(|s| s.as_ref().to_owned()).collect::<Vec<_>>().join(",");

		self.scope(joined)
	}

	/// Overrides the redirect URI.
	pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
		self.redirect_uri = Some(Some(redirect_uri.into()));

		self
	}

	/// Sets the opaque CSRF state.
	pub fn state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(Some(state.into()));

		self
	}

	/// Sends `scope` empty instead of the configured scopes.
	pub fn clear_scope(mut self) -> Self {
		self.scope = Some(None);

		self
	}

	/// Sends `redirect_uri` empty instead of the configured redirect URI.
	pub fn clear_redirect_uri(mut self) -> Self {
		self.redirect_uri = Some(None);

		self
	}

	/// Sends `state` empty.
	pub fn clear_state(mut self) -> Self {
		self.state = Some(None);

		self
	}
}
/// Collects overrides from loosely-typed pairs such as a decoded JSON object.
///
/// Keys other than `scope`, `redirect_uri`, and `state` are dropped. `null` clears the value,
/// arrays are joined with `,`, and other scalars use their JSON text.
impl<K> FromIterator<(K, Value)> for AuthorizationParams
where
	K: AsRef<str>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, Value)>,
	{
		let mut params = Self::default();

		for (key, value) in iter {
			let slot = match key.as_ref() {
				"scope" => &mut params.scope,
				"redirect_uri" => &mut params.redirect_uri,
				"state" => &mut params.state,
				_ => continue,
			};

			*slot = Some(override_value(value));
		}

		params
	}
}

/// Client for the user-facing OAuth endpoints.
pub struct UserAuth<'a, C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	sdk: &'a Sdk<C, M>,
}
impl<'a, C, M> UserAuth<'a, C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn new(sdk: &'a Sdk<C, M>) -> Self {
		Self { sdk }
	}

	/// Builds the TikTok authorize URL.
	///
	/// Query parameters, in order: `client_key`, `response_type=code`, `scope` (configured scopes
	/// joined with `,`), `redirect_uri`, and `state`, each replaced by `params` when set. Unset
	/// values are sent empty. Performs no validation and never fails, even on a default
	/// configuration.
	pub fn authorization_uri(&self, params: AuthorizationParams) -> String {
		let config = self.sdk.config();
		let scope = params.scope.unwrap_or_else(|| Some(config.user_auth.scopes.join(",")));
		let redirect_uri =
			params.redirect_uri.unwrap_or_else(|| config.user_auth.redirect_uri.clone());
		let state = params.state.flatten();

		common::build_uri(
			&config.user_auth.auth_url,
			[
				("client_key", config.client_key.as_str()),
				("response_type", "code"),
				("scope", scope.as_deref().unwrap_or_default()),
				("redirect_uri", redirect_uri.as_deref().unwrap_or_default()),
				("state", state.as_deref().unwrap_or_default()),
			],
		)
	}

	/// Exchanges an authorization `code` for user tokens.
	///
	/// `redirect_uri` defaults to the configured one and must match the URI used when
	/// authorizing.
	pub async fn fetch_access_token(
		&self,
		code: &str,
		redirect_uri: Option<&str>,
	) -> Result<ApiResponse> {
		let config = self.sdk.config();
		let redirect_uri = redirect_uri.or(config.user_auth.redirect_uri.as_deref());
		let mut body = common::credentials(config);

		body.insert("code".into(), code.into());
		body.insert("grant_type".into(), "authorization_code".into());
		body.insert("redirect_uri".into(), redirect_uri.map_or(Value::Null, Value::from));

		self.send(
			CallKind::AuthorizationCode,
			"fetch_access_token",
			&config.user_auth.token_url,
			body,
		)
		.await
	}

	/// Trades a refresh token for a new access token.
	pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<ApiResponse> {
		let config = self.sdk.config();
		let mut body = common::credentials(config);

		body.insert("grant_type".into(), "refresh_token".into());
		body.insert("refresh_token".into(), refresh_token.into());

		self.send(
			CallKind::RefreshToken,
			"refresh_access_token",
			&config.user_auth.token_url,
			body,
		)
		.await
	}

	/// Revokes an access token.
	pub async fn revoke_access_token(&self, token: &str) -> Result<ApiResponse> {
		let config = self.sdk.config();
		let mut body = common::credentials(config);

		body.insert("token".into(), token.into());

		self.send(
			CallKind::RevokeToken,
			"revoke_access_token",
			&config.user_auth.revoke_token_url,
			body,
		)
		.await
	}

	async fn send(
		&self,
		call: CallKind,
		stage: &'static str,
		url: &str,
		body: Map<String, Value>,
	) -> Result<ApiResponse> {
		let request = ApiRequest::post(url).headers(common::form_headers()).body(body);

		self.sdk.dispatch(call, stage, request).await
	}
}

fn override_value(value: Value) -> Option<String> {
	match value {
		Value::Null => None,
		Value::String(text) => Some(text),
		Value::Array(items) => Some(
			items
				.into_iter()
				.filter_map(|item| match item {
					Value::String(text) => Some(text),
					Value::Null => None,
					other => Some(other.to_string()),
				})
				.collect::<Vec<_>>()
				.join(","),
		),
		other => Some(other.to_string()),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::api::common::testing;

	fn query(uri: &str) -> Vec<(String, String)> {
		Url::parse(uri).expect("Authorize URI should parse.").query_pairs().into_owned().collect()
	}

	fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
		expected.iter().map(|(key, value)| ((*key).to_owned(), (*value).to_owned())).collect()
	}

	#[test]
	fn authorization_uri_defaults_mirror_configuration() {
		let (sdk, client) = testing::recording_sdk(200, "{}", |config| {
			config.client_key = "test_client_key".into();
			config.user_auth.scopes = vec!["user.info.basic".into(), "user.info.profile".into()];
			config.user_auth.redirect_uri = Some("https://example.com/callback".into());
		});
		let uri = sdk.user_auth().authorization_uri(AuthorizationParams::new());

		assert!(uri.starts_with("https://www.tiktok.com/v2/auth/authorize/?"));
		assert_eq!(
			query(&uri),
			pairs(&[
				("client_key", "test_client_key"),
				("response_type", "code"),
				("scope", "user.info.basic,user.info.profile"),
				("redirect_uri", "https://example.com/callback"),
				("state", ""),
			])
		);
		assert!(client.recorded().is_empty(), "Building a URI must not touch the network.");
	}

	#[test]
	fn authorization_uri_applies_overrides_and_clears() {
		let (sdk, _) = testing::recording_sdk(200, "{}", |config| {
			config.user_auth.scopes = vec!["user.info.basic".into()];
			config.user_auth.redirect_uri = Some("https://example.com/callback".into());
		});
		let uri = sdk.user_auth().authorization_uri(
			AuthorizationParams::new()
				.scopes(["user.info.basic", "video.list"])
				.clear_redirect_uri()
				.state("xyz"),
		);

		assert_eq!(
			query(&uri),
			pairs(&[
				("client_key", ""),
				("response_type", "code"),
				("scope", "user.info.basic,video.list"),
				("redirect_uri", ""),
				("state", "xyz"),
			])
		);
	}

	#[test]
	fn loose_overrides_drop_unknown_keys() {
		let params = [
			("scope", serde_json::json!(["user.info.basic", "user.info.stats"])),
			("state", Value::Null),
			("client_secret", Value::from("leak")),
			("response_type", Value::from("token")),
		]
		.into_iter()
		.collect::<AuthorizationParams>();

		assert_eq!(
			params,
			AuthorizationParams::new().scope("user.info.basic,user.info.stats").clear_state()
		);

		let (sdk, _) = testing::recording_sdk(200, "{}", |_| {});
		let uri = sdk.user_auth().authorization_uri(params);

		assert!(!uri.contains("leak"));
		assert!(uri.contains("response_type=code"));
	}

	#[test]
	fn authorization_uri_survives_a_malformed_endpoint() {
		let (sdk, _) =
			testing::recording_sdk(200, "{}", |config| config.user_auth.auth_url.clear());
		let uri = sdk.user_auth().authorization_uri(AuthorizationParams::new());

		assert_eq!(uri, "?client_key=&response_type=code&scope=&redirect_uri=&state=");
	}

	#[tokio::test]
	async fn token_calls_post_form_bodies_with_shared_headers() {
		let (sdk, client) = testing::recording_sdk(200, r#"{"access_token":"act"}"#, |config| {
			config.client_key = "test_client_key".into();
			config.client_secret = "test_client_secret".into();
			config.user_auth.token_url = "https://open.example.com/v2/oauth/token/".into();
			config.user_auth.revoke_token_url = "https://open.example.com/v2/oauth/revoke/".into();
			config.user_auth.redirect_uri = Some("https://example.com/callback".into());
		});
		let auth = sdk.user_auth();

		auth.fetch_access_token("test_auth_code", None)
			.await
			.expect("Code exchange should succeed.");
		auth.refresh_access_token("rft.test").await.expect("Refresh should succeed.");
		auth.revoke_access_token("act.test").await.expect("Revoke should succeed.");

		let recorded = client.recorded();

		assert_eq!(recorded.len(), 3);

		for request in &recorded {
			assert_eq!(request.method, "POST");
			assert_eq!(request.header("content-type"), Some("application/x-www-form-urlencoded"));
			assert_eq!(request.header("cache-control"), Some("no-cache"));
			assert_eq!(
				request.form().get("client_secret").map(String::as_str),
				Some("test_client_secret")
			);
		}

		let exchange = recorded[0].form();

		assert_eq!(recorded[0].uri, "https://open.example.com/v2/oauth/token/");
		assert_eq!(exchange.get("code").map(String::as_str), Some("test_auth_code"));
		assert_eq!(exchange.get("grant_type").map(String::as_str), Some("authorization_code"));
		assert_eq!(
			exchange.get("redirect_uri").map(String::as_str),
			Some("https://example.com/callback")
		);

		let refresh = recorded[1].form();

		assert_eq!(refresh.get("grant_type").map(String::as_str), Some("refresh_token"));
		assert_eq!(refresh.get("refresh_token").map(String::as_str), Some("rft.test"));

		let revoke = recorded[2].form();

		assert_eq!(recorded[2].uri, "https://open.example.com/v2/oauth/revoke/");
		assert_eq!(revoke.get("token").map(String::as_str), Some("act.test"));
		assert!(!revoke.contains_key("grant_type"));
	}

	#[tokio::test]
	async fn explicit_redirect_uri_wins_and_credentials_are_not_validated() {
		let (sdk, client) = testing::recording_sdk(401, r#"{"error":"invalid_client"}"#, |_| {});
		let response = sdk
			.user_auth()
			.fetch_access_token("code", Some("https://example.com/other"))
			.await
			.expect("Remote rejections are envelopes.");

		assert!(!response.success);
		assert_eq!(response.code, 401);

		let form = client.recorded()[0].form();

		assert_eq!(form.get("client_key").map(String::as_str), Some(""));
		assert_eq!(form.get("redirect_uri").map(String::as_str), Some("https://example.com/other"));
	}
}
