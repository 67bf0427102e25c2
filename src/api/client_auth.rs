//! Client credentials grant.

// self
use crate::{
	_prelude::*,
	api::{Sdk, common},
	http::{ApiHttpClient, ApiRequest},
	oauth::TransportErrorMapper,
	obs::CallKind,
	response::ApiResponse,
};

/// Client for application-level (no end user) tokens.
pub struct ClientAuth<'a, C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	sdk: &'a Sdk<C, M>,
}
impl<'a, C, M> ClientAuth<'a, C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn new(sdk: &'a Sdk<C, M>) -> Self {
		Self { sdk }
	}

	/// Requests a client access token (`grant_type=client_credentials`).
	pub async fn fetch_client_token(&self) -> Result<ApiResponse> {
		let config = self.sdk.config();
		let mut body = common::credentials(config);

		body.insert("grant_type".into(), "client_credentials".into());

		let request = ApiRequest::post(&config.user_auth.token_url)
			.headers(common::form_headers())
			.body(body);

		self.sdk.dispatch(CallKind::ClientCredentials, "fetch_client_token", request).await
	}
}
