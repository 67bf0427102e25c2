//! Mapping from `oauth2` transport failures to SDK errors.

pub use oauth2;

// crates.io
use oauth2::HttpClientError;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
	obs::CallKind,
};

/// Maps HTTP transport failures into SDK [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted while executing `call` into an SDK error.
	fn map_transport_error(&self, call: CallKind, error: HttpClientError<E>) -> Error;
}

/// Mapper for transports without richer error introspection.
///
/// Every transport-specific failure becomes [`TransportError::Network`].
#[derive(Clone, Debug, Default)]
pub struct BasicTransportErrorMapper;
impl<E> TransportErrorMapper<E> for BasicTransportErrorMapper
where
	E: 'static + Send + Sync + StdError,
{
	fn map_transport_error(&self, call: CallKind, err: HttpClientError<E>) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => TransportError::network(call.as_str(), *inner).into(),
			other => map_common_error(call, other),
		}
	}
}

/// Default mapper for reqwest-backed transports.
///
/// Keeps timeouts distinguishable from connection and generic network failures so callers
/// can decide on retries.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(&self, call: CallKind, err: HttpClientError<ReqwestError>) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(call, *inner),
			other => map_common_error(call, other),
		}
	}
}

fn map_common_error<E>(call: CallKind, err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Other { message }.into(),
		_ => TransportError::Other {
			message: format!("unclassified failure while calling {}", call.as_str()),
		}
		.into(),
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(call: CallKind, err: ReqwestError) -> Error {
	let endpoint = call.as_str();

	if err.is_builder() {
		return TransportError::InvalidRequest { endpoint, source: Box::new(err) }.into();
	}
	// Connect timeouts report both flags; the timeout wins.
	if err.is_timeout() {
		return TransportError::timeout(endpoint, err).into();
	}
	if err.is_connect() {
		return TransportError::Connect { endpoint, source: Box::new(err) }.into();
	}

	TransportError::network(endpoint, err).into()
}

#[cfg(test)]
mod tests {
	// std
	use std::io::{Error as IoError, ErrorKind};
	// self
	use super::*;

	#[test]
	fn basic_mapper_classifies_transport_failures_as_network() {
		let err = BasicTransportErrorMapper.map_transport_error(
			CallKind::UserInfo,
			HttpClientError::Reqwest(Box::new(IoError::new(ErrorKind::ConnectionReset, "reset"))),
		);

		assert!(matches!(
			err,
			Error::Transport(TransportError::Network { endpoint: "user_info", .. })
		));
		assert!(err.is_retryable());
	}

	#[test]
	fn common_variants_keep_their_category() {
		let mapper = BasicTransportErrorMapper;
		let io = <BasicTransportErrorMapper as TransportErrorMapper<IoError>>::map_transport_error(
			&mapper,
			CallKind::RevokeToken,
			HttpClientError::Io(IoError::new(ErrorKind::BrokenPipe, "pipe")),
		);
		let other =
			<BasicTransportErrorMapper as TransportErrorMapper<IoError>>::map_transport_error(
				&mapper,
				CallKind::RevokeToken,
				HttpClientError::Other("socket closed".into()),
			);
		let http_err = oauth2::http::Request::builder()
			.header("bad\nname", "value")
			.body(())
			.expect_err("Header names with newlines must be rejected.");
		let http = <BasicTransportErrorMapper as TransportErrorMapper<IoError>>::map_transport_error(
			&mapper,
			CallKind::RevokeToken,
			HttpClientError::Http(http_err),
		);

		assert!(matches!(io, Error::Transport(TransportError::Io(_))));
		assert!(matches!(
			other,
			Error::Transport(TransportError::Other { ref message }) if message == "socket closed"
		));
		assert!(matches!(http, Error::Config(ConfigError::HttpRequest(_))));
	}
}
