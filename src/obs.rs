//! Optional observability helpers for SDK calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `tiktok_open_sdk.call` with the `call`
//!   (endpoint) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `tiktok_open_sdk_call_total` counter for every
//!   attempt/success/upstream error/failure, labeled by `call` + `outcome`.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

// self
use crate::_prelude::*;

/// Network calls issued by the SDK.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// Authorization code exchange.
	AuthorizationCode,
	/// Refresh token exchange.
	RefreshToken,
	/// Token revocation.
	RevokeToken,
	/// Client credentials grant.
	ClientCredentials,
	/// User info lookup.
	UserInfo,
	/// Creator info query.
	CreatorInfo,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::AuthorizationCode => "authorization_code",
			CallKind::RefreshToken => "refresh_token",
			CallKind::RevokeToken => "revoke_token",
			CallKind::ClientCredentials => "client_credentials",
			CallKind::UserInfo => "user_info",
			CallKind::CreatorInfo => "creator_info",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Call dispatched to the transport.
	Attempt,
	/// Remote answered with a 2xx status.
	Success,
	/// Remote answered with a non-2xx status; returned as an envelope.
	UpstreamError,
	/// Local or transport failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::UpstreamError => "upstream_error",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
