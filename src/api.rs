//! Auth and resource clients built on a single [`Sdk`] handle.
//!
//! [`Sdk`] owns the configuration, the transport, and the transport error mapper. The
//! per-area clients ([`UserAuth`], [`ClientAuth`], [`User`], [`Post`]) are borrowed views
//! that carry no state of their own, so they are free to create per call.

pub mod client_auth;
pub mod post;
pub mod user;
pub mod user_auth;

pub(crate) mod common;

pub use client_auth::*;
pub use post::*;
pub use user::*;
pub use user_auth::*;

// self
use crate::{_prelude::*, config::Config, http::ApiHttpClient, oauth::TransportErrorMapper};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

#[cfg(feature = "reqwest")]
/// SDK specialized for the crate's default reqwest transport stack.
pub type ReqwestSdk = Sdk<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Entry point holding the configuration and the transport shared by every client.
///
/// Reconfiguring needs `&mut self`, so a handle shared across tasks (behind an [`Arc`]) is
/// effectively frozen; build a new handle to change settings at runtime.
pub struct Sdk<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client used for every outbound call.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	config: Config,
}
impl<C, M> Sdk<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates an SDK that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: Config,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self { http_client: http_client.into(), transport_mapper: mapper.into(), config }
	}

	/// Current configuration.
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Applies `mutator` to the configuration and returns the result.
	pub fn reconfigure(&mut self, mutator: impl FnOnce(&mut Config)) -> &Config {
		mutator(&mut self.config);

		&self.config
	}

	/// User authorization client (authorize URL, code exchange, refresh, revoke).
	pub fn user_auth(&self) -> UserAuth<'_, C, M> {
		UserAuth::new(self)
	}

	/// Client credentials client.
	pub fn client_auth(&self) -> ClientAuth<'_, C, M> {
		ClientAuth::new(self)
	}

	/// User info client.
	pub fn user(&self) -> User<'_, C, M> {
		User::new(self)
	}

	/// Content posting client.
	pub fn post(&self) -> Post<'_, C, M> {
		Post::new(self)
	}
}
#[cfg(feature = "reqwest")]
impl Sdk<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates an SDK around `config` with the default reqwest transport.
	pub fn new(config: Config) -> Result<Self> {
		Ok(Self::with_http_client(config, ReqwestHttpClient::new()?, ReqwestTransportErrorMapper))
	}

	/// Builds a default configuration, applies `mutator`, and wraps it in a reqwest-backed SDK.
	pub fn configure(mutator: impl FnOnce(&mut Config)) -> Result<Self> {
		Self::new(Config::configure(mutator))
	}
}
impl<C, M> Clone for Sdk<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
			config: self.config.clone(),
		}
	}
}
impl<C, M> Debug for Sdk<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Sdk").field("config", &self.config).finish()
	}
}
