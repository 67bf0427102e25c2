//! SDK-level error types shared across clients, transports, and the login strategy.

// self
use crate::_prelude::*;

/// SDK-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical SDK error exposed by public APIs.
///
/// Remote HTTP failures (4xx/5xx) are not errors; they come back as an
/// [`ApiResponse`](crate::response::ApiResponse) whose `success` flag is `false`.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local precondition failure raised before any network call.
	#[error(transparent)]
	Validation(#[from] RequestValidationError),
	/// Local configuration or request-construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (timeout, DNS, TCP, TLS, malformed URL).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Response body could not be decoded into the requested type.
	#[error("Response body could not be decoded.")]
	Decode {
		/// Structured decoding failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the decoded response.
		status: u16,
	},
	/// Token endpoint answered the authorization code exchange with a non-success status.
	#[error("Token endpoint rejected the request with status {status}.")]
	TokenEndpoint {
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// Normalized response body carried verbatim for the caller.
		response: Value,
	},
	/// Token endpoint reported a lifetime that does not fit a calendar instant.
	#[error("Token endpoint returned an out-of-range `{field}` of {seconds} seconds.")]
	TokenLifetime {
		/// Payload field carrying the lifetime.
		field: &'static str,
		/// Lifetime as received.
		seconds: i64,
	},
	/// Authorization server redirected back with an error instead of a code.
	#[error("Authorization callback returned an error: {error}.")]
	Callback {
		/// Provider-supplied `error` (or `error_reason`) value.
		error: String,
		/// Provider-supplied `error_description`, when present.
		description: Option<String>,
	},
}
impl Error {
	/// Returns `true` when the failure is transient and the caller may retry the call.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::Transport(err) if err.is_retryable())
	}
}

/// Local precondition failures; always raised before any I/O and never retried.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum RequestValidationError {
	/// Access token is empty, shorter than 10 characters, or contains control characters.
	#[error("Invalid token format: must be at least 10 printable characters.")]
	InvalidToken,
	/// Requested user info fields are outside the allow-list.
	#[error("Invalid fields: {}", .fields.join(", "))]
	InvalidFields {
		/// Offending fields in the order the caller supplied them.
		fields: Vec<String>,
	},
	/// Caller tried to leak the client secret through the authorize URL.
	#[error("client_secret is not allowed in authorize URL query params")]
	ClientSecretInAuthorizeParams,
	/// Callback `state` does not match the value issued during the request phase.
	#[error("CSRF detected: callback state does not match the issued state.")]
	StateMismatch,
	/// Callback is missing the authorization `code` parameter.
	#[error("Authorization callback is missing the code parameter.")]
	MissingCode,
}

/// Configuration and request-construction failures raised by the SDK.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Only GET and POST are supported by the transport adapter.
	#[error("Unsupported method: {method}.")]
	UnsupportedMethod {
		/// Rejected HTTP method.
		method: String,
	},
	/// Request body cannot be serialized for the declared content type.
	#[error("Unsupported content type: {}.", .content_type.as_deref().unwrap_or("<none>"))]
	UnsupportedContentType {
		/// Declared `Content-Type` header, if any.
		content_type: Option<String>,
	},
	/// JSON request body could not be serialized.
	#[error("Request body could not be serialized.")]
	BodySerialize(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, URL); propagated to callers unmodified.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// The request exceeded the transport's timeout.
	#[error("Request timed out while calling {endpoint}.")]
	Timeout {
		/// Endpoint label of the call that timed out.
		endpoint: &'static str,
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Connection could not be established.
	#[error("Connection failed while calling {endpoint}.")]
	Connect {
		/// Endpoint label of the call that failed.
		endpoint: &'static str,
		/// Transport-specific connection error.
		#[source]
		source: BoxError,
	},
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {endpoint}.")]
	Network {
		/// Endpoint label of the call that failed.
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Transport refused to build the request.
	#[error("Transport rejected the request for {endpoint}.")]
	InvalidRequest {
		/// Endpoint label of the call that failed.
		endpoint: &'static str,
		/// Transport-specific builder error.
		#[source]
		source: BoxError,
	},
	/// Configured endpoint is not a valid URL.
	#[error("Endpoint URL `{url}` is invalid.")]
	InvalidUrl {
		/// Rejected URL string.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during transport.")]
	Io(#[from] std::io::Error),
	/// Transport reported a failure without a structured error.
	#[error("HTTP client error occurred: {message}.")]
	Other {
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(endpoint: &'static str, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(endpoint: &'static str, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Timeout { endpoint, source: Box::new(src) }
	}

	/// Returns `true` for timeouts and connection-level failures.
	pub fn is_retryable(&self) -> bool {
		matches!(
			self,
			Self::Timeout { .. } | Self::Connect { .. } | Self::Network { .. } | Self::Io(_)
		)
	}

	/// Returns `true` when the transport gave up because of its timeout.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Timeout { .. })
	}
}
