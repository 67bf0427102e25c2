//! Login strategy for third-party authentication hosts.
//!
//! A host framework drives two phases. [`LoginStrategy::request_phase`] produces the redirect
//! to TikTok together with the CSRF state the host must keep in its session.
//! [`LoginStrategy::callback_phase`] consumes the redirect back, exchanges the code, and
//! returns a [`Callback`] that lazily loads the profile behind `uid`/`info`/`extra`.
//!
//! The host owns sessions, routing, and token persistence. The strategy only sees the
//! callback through [`CallbackRequest`].

// std
use std::sync::OnceLock;
// crates.io
use async_lock::OnceCell;
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	api::{Sdk, common},
	auth::{AccessToken, SCOPE_USER_INFO_BASIC, SCOPE_USER_INFO_PROFILE, ScopeList, TokenGrant},
	config::Config,
	error::RequestValidationError,
	http::ApiHttpClient,
	oauth::TransportErrorMapper,
};

/// Name the strategy registers under.
pub const STRATEGY_NAME: &str = "tiktok_open_sdk";

const STATE_LEN: usize = 48;
const RESERVED_AUTHORIZE_PARAMS: [&str; 5] =
	["client_key", "response_type", "scope", "redirect_uri", "state"];
const PROFILE_INFO_KEYS: [&str; 3] = ["username", "bio_description", "profile_deep_link"];

/// Read-only view of the callback request as seen by the host framework.
pub trait CallbackRequest {
	/// Returns the query or form parameter `name`.
	fn param(&self, name: &str) -> Option<&str>;

	/// Absolute callback URL as derived by the host; may still carry a query string.
	fn callback_url(&self) -> &str;
}

/// Plain [`CallbackRequest`] for hosts that already decoded the request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackContext {
	/// Decoded request parameters.
	pub params: HashMap<String, String>,
	/// Callback URL derived by the host.
	pub callback_url: String,
}
impl CallbackContext {
	/// Creates a context for `callback_url` without parameters.
	pub fn new(callback_url: impl Into<String>) -> Self {
		Self { params: HashMap::new(), callback_url: callback_url.into() }
	}

	/// Adds a request parameter.
	pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.insert(name.into(), value.into());

		self
	}
}
impl CallbackRequest for CallbackContext {
	fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}

	fn callback_url(&self) -> &str {
		&self.callback_url
	}
}

/// Strategy options; defaults come from the SDK configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrategyOptions {
	/// Comma-delimited scopes requested during the request phase.
	pub scope: String,
	/// Redirect URI sent during the request phase.
	pub redirect_uri: Option<String>,
	/// Extra authorize URL parameters appended after the standard ones.
	pub authorize_params: Vec<(String, String)>,
}
impl StrategyOptions {
	/// Derives options from the configured scopes and redirect URI.
	pub fn from_config(config: &Config) -> Self {
		Self {
			scope: config.user_auth.scopes.join(","),
			redirect_uri: config.user_auth.redirect_uri.clone(),
			authorize_params: Vec::new(),
		}
	}
}

/// Redirect issued by the request phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRedirect {
	/// Authorize URL to send the user agent to.
	pub url: String,
	/// CSRF state embedded in `url`; the host stores it for the callback.
	pub state: String,
}

/// Identity handed to the host after a successful callback.
#[derive(Clone, Debug, Serialize)]
pub struct Identity {
	/// Strategy name ([`STRATEGY_NAME`]).
	pub provider: &'static str,
	/// TikTok `open_id`.
	pub uid: String,
	/// Display-oriented profile subset.
	pub info: Map<String, Value>,
	/// Full raw profile.
	pub extra: Map<String, Value>,
	/// Token record for the host to persist.
	pub credentials: AccessToken,
}

/// TikTok login strategy bound to an [`Sdk`].
pub struct LoginStrategy<'a, C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	sdk: &'a Sdk<C, M>,
	options: StrategyOptions,
}
impl<'a, C, M> LoginStrategy<'a, C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a strategy whose options mirror the SDK configuration.
	pub fn new(sdk: &'a Sdk<C, M>) -> Self {
		Self::with_options(sdk, StrategyOptions::from_config(sdk.config()))
	}

	/// Creates a strategy with explicit options.
	pub fn with_options(sdk: &'a Sdk<C, M>, options: StrategyOptions) -> Self {
		Self { sdk, options }
	}

	/// Registered strategy name.
	pub fn name(&self) -> &'static str {
		STRATEGY_NAME
	}

	/// Active options.
	pub fn options(&self) -> &StrategyOptions {
		&self.options
	}

	/// Authorize URL parameters for `state`, standard keys first.
	///
	/// Extra parameters never override `client_key`, `response_type`, `scope`,
	/// `redirect_uri`, or `state`.
	pub fn authorize_params(&self, state: &str) -> Vec<(String, String)> {
		let mut params = vec![
			("client_key".to_owned(), self.sdk.config().client_key.clone()),
			("response_type".to_owned(), "code".to_owned()),
			("scope".to_owned(), self.options.scope.clone()),
			("redirect_uri".to_owned(), self.options.redirect_uri.clone().unwrap_or_default()),
			("state".to_owned(), state.to_owned()),
		];

		params.extend(
			self.options
				.authorize_params
				.iter()
				.filter(|(key, _)| !RESERVED_AUTHORIZE_PARAMS.contains(&key.as_str()))
				.cloned(),
		);

		params
	}

	/// Starts the login: generates a 48-character state and builds the authorize URL.
	///
	/// Fails before building anything when the options try to put `client_secret` into the
	/// URL.
	pub fn request_phase(&self) -> Result<AuthorizationRedirect> {
		let state = random_state();
		let params = self.authorize_params(&state);

		if params.iter().any(|(key, _)| key == "client_secret") {
			return Err(RequestValidationError::ClientSecretInAuthorizeParams.into());
		}

		let url = common::build_uri(
			&self.sdk.config().user_auth.auth_url,
			params.iter().map(|(key, value)| (key.as_str(), value.as_str())),
		);

		Ok(AuthorizationRedirect { url, state })
	}

	/// Finishes the login for `request`.
	///
	/// Provider errors (`error` / `error_reason`) and a state that differs from
	/// `expected_state` are rejected before the code is exchanged. Pass `None` when the host
	/// framework checks the state itself.
	pub async fn callback_phase<'r, R>(
		&self,
		request: &'r R,
		expected_state: Option<&str>,
	) -> Result<Callback<'a, 'r, C, M, R>>
	where
		R: ?Sized + CallbackRequest,
	{
		if let Some(error) = request.param("error").or_else(|| request.param("error_reason")) {
			return Err(Error::Callback {
				error: error.to_owned(),
				description: request.param("error_description").map(str::to_owned),
			});
		}
		if expected_state.is_some_and(|expected| request.param("state") != Some(expected)) {
			return Err(RequestValidationError::StateMismatch.into());
		}

		let access_token = self.build_access_token(request).await?;

		Ok(Callback::new(self.sdk, request, access_token))
	}

	/// Exchanges the callback `code` using the callback URL without its query as redirect URI.
	///
	/// A non-2xx token response fails with [`Error::TokenEndpoint`] carrying the body, and a
	/// lifetime past the calendar range fails with [`Error::TokenLifetime`].
	pub async fn build_access_token<R>(&self, request: &R) -> Result<AccessToken>
	where
		R: ?Sized + CallbackRequest,
	{
		let code = request.param("code").ok_or(RequestValidationError::MissingCode)?;
		let redirect_uri = strip_query(request.callback_url());
		let response = self.sdk.user_auth().fetch_access_token(code, Some(redirect_uri)).await?;

		if !response.success {
			return Err(Error::TokenEndpoint {
				status: response.code,
				response: response.response.into_value(),
			});
		}

		let grant = response.decode::<TokenGrant>()?;

		AccessToken::from_grant(grant, OffsetDateTime::now_utc())
	}
}
impl<C, M> Debug for LoginStrategy<'_, C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginStrategy").field("options", &self.options).finish()
	}
}

/// One callback cycle: the exchanged token plus memoized scopes, fields, and profile.
pub struct Callback<'s, 'r, C, M, R>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
	R: ?Sized + CallbackRequest,
{
	sdk: &'s Sdk<C, M>,
	request: &'r R,
	access_token: AccessToken,
	scopes: OnceLock<ScopeList>,
	fields: OnceLock<Vec<&'static str>>,
	raw_info: OnceCell<Map<String, Value>>,
}
impl<'s, 'r, C, M, R> Callback<'s, 'r, C, M, R>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
	R: ?Sized + CallbackRequest,
{
	/// Wraps an already exchanged token.
	pub fn new(sdk: &'s Sdk<C, M>, request: &'r R, access_token: AccessToken) -> Self {
		Self {
			sdk,
			request,
			access_token,
			scopes: OnceLock::new(),
			fields: OnceLock::new(),
			raw_info: OnceCell::new(),
		}
	}

	/// Token obtained during the callback.
	pub fn access_token(&self) -> &AccessToken {
		&self.access_token
	}

	/// Scopes from the `scopes` callback parameter, `user.info.basic` when absent.
	pub fn request_scopes(&self) -> &ScopeList {
		self.scopes.get_or_init(|| {
			ScopeList::parse(self.request.param("scopes").unwrap_or(SCOPE_USER_INFO_BASIC))
		})
	}

	/// User info fields unlocked by [`request_scopes`](Self::request_scopes).
	pub fn user_info_fields(&self) -> &[&'static str] {
		self.fields.get_or_init(|| self.request_scopes().user_info_fields())
	}

	/// Profile at `response.data.user`, fetched once; empty when the body has none.
	pub async fn raw_info(&self) -> Result<&Map<String, Value>> {
		self.raw_info
			.get_or_try_init(|| async {
				let response = self
					.sdk
					.user()
					.get_user_info(self.access_token.access_token.expose(), self.user_info_fields())
					.await?;

				Ok::<_, Error>(
					response
						.response
						.pointer("/data/user")
						.and_then(Value::as_object)
						.cloned()
						.unwrap_or_default(),
				)
			})
			.await
	}

	/// TikTok `open_id` rendered as a string; empty when missing.
	pub async fn uid(&self) -> Result<String> {
		Ok(match self.raw_info().await?.get("open_id") {
			None | Some(Value::Null) => String::new(),
			Some(Value::String(open_id)) => open_id.clone(),
			Some(other) => other.to_string(),
		})
	}

	/// `name` and `image`, plus `username`, `bio_description`, and `profile_deep_link` when the
	/// profile scope was requested and the profile carries them.
	pub async fn info(&self) -> Result<Map<String, Value>> {
		let raw = self.raw_info().await?;
		let mut info = Map::new();

		info.insert("name".into(), raw.get("display_name").cloned().unwrap_or(Value::Null));
		info.insert("image".into(), raw.get("avatar_url_100").cloned().unwrap_or(Value::Null));

		if self.request_scopes().contains(SCOPE_USER_INFO_PROFILE) {
			for key in PROFILE_INFO_KEYS {
				if let Some(value) = raw.get(key) {
					info.insert(key.into(), value.clone());
				}
			}
		}

		Ok(info)
	}

	/// Entire raw profile.
	pub async fn extra(&self) -> Result<Map<String, Value>> {
		Ok(self.raw_info().await?.clone())
	}

	/// Bundles everything the host needs to sign the user in.
	pub async fn identity(&self) -> Result<Identity> {
		Ok(Identity {
			provider: STRATEGY_NAME,
			uid: self.uid().await?,
			info: self.info().await?,
			extra: self.extra().await?,
			credentials: self.access_token.clone(),
		})
	}
}

impl<C, M, R> Debug for Callback<'_, '_, C, M, R>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
	R: ?Sized + CallbackRequest,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Callback")
			.field("access_token", &self.access_token)
			.field("scopes", &self.scopes.get())
			.finish()
	}
}

fn strip_query(url: &str) -> &str {
	url.split('?').next().unwrap_or(url)
}

fn random_state() -> String {
	rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect()
}
