//! Transport primitives for Open API calls.
//!
//! Clients describe each call as an [`ApiRequest`] (method, URL, query params, headers, and an
//! optional key/value body). [`ApiRequest::into_http`] turns it into an `http` request, picking
//! the body encoding from the request's `Content-Type` header, and an [`ApiHttpClient`]
//! executes it. The SDK never looks past that trait, so hosts can swap in their own stack.

// std
#[cfg(feature = "reqwest")] use std::{ops::Deref, time::Duration as StdDuration};
// crates.io
use oauth2::{
	HttpClientError, HttpRequest, HttpResponse,
	http::{Method, Request},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

/// `Content-Type` used by the OAuth endpoints.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
/// Plain JSON `Content-Type`.
pub const JSON_CONTENT_TYPE: &str = "application/json";
/// JSON `Content-Type` with an explicit charset.
pub const JSON_UTF8_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type HttpFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, HttpClientError<E>>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing Open API calls.
///
/// The trait is the SDK's only dependency on an HTTP stack. Timeouts, TLS, and connection
/// reuse are the implementation's concern; failures must be reported through
/// [`HttpClientError`] so a [`TransportErrorMapper`](crate::oauth::TransportErrorMapper) can
/// classify them without the SDK masking a timeout.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and resolves with the raw response, whatever its status.
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError>;
}

/// Transport-agnostic description of a single Open API call.
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
	/// HTTP method; only `GET` and `POST` are accepted by [`into_http`](Self::into_http).
	pub method: Method,
	/// Absolute endpoint URL, parsed lazily.
	pub url: String,
	/// Query parameters, applied to `GET` requests only.
	pub params: Vec<(String, String)>,
	/// Request headers in insertion order.
	pub headers: Vec<(String, String)>,
	/// Optional body, encoded according to the `Content-Type` header.
	pub body: Option<Map<String, Value>>,
}
impl ApiRequest {
	/// Creates a request without params, headers, or body.
	pub fn new(method: Method, url: impl Into<String>) -> Self {
		Self { method, url: url.into(), params: Vec::new(), headers: Vec::new(), body: None }
	}

	/// Shorthand for a `GET` request.
	pub fn get(url: impl Into<String>) -> Self {
		Self::new(Method::GET, url)
	}

	/// Shorthand for a `POST` request.
	pub fn post(url: impl Into<String>) -> Self {
		Self::new(Method::POST, url)
	}

	/// Appends a query parameter.
	pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.push((key.into(), value.into()));

		self
	}

	/// Appends a header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Appends several headers.
	pub fn headers<I, K, V>(mut self, headers: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.headers.extend(headers.into_iter().map(|(name, value)| (name.into(), value.into())));

		self
	}

	/// Sets the request body.
	pub fn body(mut self, body: Map<String, Value>) -> Self {
		self.body = Some(body);

		self
	}

	/// Looks up a header value by case-insensitive name.
	pub fn header_value(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}

	/// Converts the description into an `http` request ready for an [`ApiHttpClient`].
	pub fn into_http(self) -> Result<HttpRequest> {
		if self.method != Method::GET && self.method != Method::POST {
			return Err(ConfigError::UnsupportedMethod { method: self.method.to_string() }.into());
		}

		let mut url = Url::parse(&self.url)
			.map_err(|source| TransportError::InvalidUrl { url: self.url.clone(), source })?;

		if self.method == Method::GET && !self.params.is_empty() {
			let query = form_urlencoded::Serializer::new(String::new())
				.extend_pairs(&self.params)
				.finish();

			url.set_query(Some(&query));
		}

		let body = match &self.body {
			Some(fields) => encode_body(self.header_value("content-type"), fields)?,
			None => Vec::new(),
		};
		let mut builder = Request::builder().method(self.method).uri(url.as_str());

		for (name, value) in &self.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}

		Ok(builder.body(body).map_err(ConfigError::from)?)
	}
}
impl Debug for ApiRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let header_names = self.headers.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>();
		let body_keys =
			self.body.as_ref().map(|body| body.keys().map(String::as_str).collect::<Vec<_>>());

		f.debug_struct("ApiRequest")
			.field("method", &self.method)
			.field("url", &self.url)
			.field("params", &self.params)
			.field("headers", &header_names)
			.field("body", &body_keys)
			.finish()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Open API endpoints answer directly, so [`ReqwestHttpClient::new`] disables redirect
/// following and applies a 5 second connect timeout and a 10 second request timeout.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Connect timeout applied by [`ReqwestHttpClient::new`].
	pub const CONNECT_TIMEOUT: StdDuration = StdDuration::from_secs(5);
	/// Whole-request timeout applied by [`ReqwestHttpClient::new`].
	pub const REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(10);

	/// Builds the default reqwest client used by the SDK.
	pub fn new() -> Result<Self> {
		let client = ReqwestClient::builder()
			.connect_timeout(Self::CONNECT_TIMEOUT)
			.timeout(Self::REQUEST_TIMEOUT)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(ConfigError::from)?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

fn encode_body(content_type: Option<&str>, fields: &Map<String, Value>) -> Result<Vec<u8>> {
	match content_type.map(str::trim) {
		Some(value) if value.eq_ignore_ascii_case(FORM_CONTENT_TYPE) => {
			let mut form = form_urlencoded::Serializer::new(String::new());

			// `null` goes out as a bare key so unset values still reach the remote API.
			for (key, value) in fields {
				match value {
					Value::Null => form.append_key_only(key),
					Value::String(text) => form.append_pair(key, text),
					other => form.append_pair(key, &other.to_string()),
				};
			}

			Ok(form.finish().into_bytes())
		},
		Some(value)
			if value.eq_ignore_ascii_case(JSON_CONTENT_TYPE)
				|| value.eq_ignore_ascii_case(JSON_UTF8_CONTENT_TYPE) =>
			Ok(serde_json::to_vec(fields).map_err(ConfigError::from)?),
		other => Err(ConfigError::UnsupportedContentType { content_type: other.map(str::to_owned) }
			.into()),
	}
}
