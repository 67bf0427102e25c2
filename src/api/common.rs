//! Helpers shared by every client: headers, credentials, URI building, and dispatch.

// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	api::Sdk,
	config::Config,
	http::{ApiHttpClient, ApiRequest, FORM_CONTENT_TYPE},
	oauth::TransportErrorMapper,
	obs::{self, CallKind, CallOutcome, CallSpan},
	response::ApiResponse,
};

/// Headers sent to every OAuth endpoint.
pub(crate) fn form_headers() -> [(&'static str, &'static str); 2] {
	[("Content-Type", FORM_CONTENT_TYPE), ("Cache-Control", "no-cache")]
}

/// `client_key` + `client_secret` body fields, sent as-is even when empty.
pub(crate) fn credentials(config: &Config) -> Map<String, Value> {
	let mut body = Map::new();

	body.insert("client_key".into(), Value::String(config.client_key.clone()));
	body.insert("client_secret".into(), Value::String(config.client_secret.clone()));

	body
}

pub(crate) fn bearer(access_token: &str) -> (&'static str, String) {
	("Authorization", format!("Bearer {access_token}"))
}

/// Replaces the query of `base` with `pairs`, keeping their order.
///
/// Endpoints that do not parse as URLs still yield `<base without query>?<query>`.
pub(crate) fn build_uri<'a, I>(base: &str, pairs: I) -> String
where
	I: IntoIterator<Item = (&'a str, &'a str)>,
{
	let query = form_urlencoded::Serializer::new(String::new()).extend_pairs(pairs).finish();

	match Url::parse(base) {
		Ok(mut url) => {
			url.set_query(Some(&query));

			url.into()
		},
		Err(_) => {
			let stem = base.split('?').next().unwrap_or(base);

			format!("{stem}?{query}")
		},
	}
}

impl<C, M> Sdk<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Sends `request` and normalizes the answer into an [`ApiResponse`].
	///
	/// Remote 4xx/5xx answers are returned as envelopes; only local request-building and
	/// transport failures are errors.
	pub(crate) async fn dispatch(
		&self,
		call: CallKind,
		stage: &'static str,
		request: ApiRequest,
	) -> Result<ApiResponse> {
		let span = CallSpan::new(call, stage);

		obs::record_call_outcome(call, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = request.into_http()?;
				let response = self
					.http_client
					.execute(request)
					.await
					.map_err(|err| self.transport_mapper.map_transport_error(call, err))?;

				Ok(ApiResponse::from_http(response))
			})
			.await;

		match &result {
			Ok(response) => {
				span.record_status(response.code);

				if response.success {
					obs::record_call_outcome(call, CallOutcome::Success);
				} else {
					obs::record_call_outcome(call, CallOutcome::UpstreamError);
				}
			},
			Err(_) => obs::record_call_outcome(call, CallOutcome::Failure),
		}

		result
	}
}
