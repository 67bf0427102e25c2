//! Content posting endpoints.

// self
use crate::{
	_prelude::*,
	api::{Sdk, common},
	http::{ApiHttpClient, ApiRequest},
	oauth::TransportErrorMapper,
	obs::CallKind,
	response::ApiResponse,
	validate,
};

/// Client for the content posting API.
pub struct Post<'a, C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	sdk: &'a Sdk<C, M>,
}
impl<'a, C, M> Post<'a, C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn new(sdk: &'a Sdk<C, M>) -> Self {
		Self { sdk }
	}

	/// Queries the posting capabilities of the token owner.
	///
	/// The token is always validated; there is no bypass.
	pub async fn creator_info_query(&self, access_token: &str) -> Result<ApiResponse> {
		validate::validate_token(access_token)?;

		let (name, value) = common::bearer(access_token);
		let request =
			ApiRequest::post(&self.sdk.config().creator_info_query_url).header(name, value);

		self.sdk.dispatch(CallKind::CreatorInfo, "creator_info_query", request).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{api::common::testing, error::RequestValidationError};

	#[tokio::test]
	async fn creator_info_posts_without_body() {
		let (sdk, client) = testing::recording_sdk(
			200,
			r#"{"data":{"creator_username":"tiktok","privacy_level_options":["PUBLIC_TO_EVERYONE"]}}"#,
			|_| {},
		);
		let response = sdk
			.post()
			.creator_info_query("act.valid_token_1234567890")
			.await
			.expect("Creator info call should succeed.");

		assert_eq!(
			response.data().and_then(|data| data.get("creator_username")).and_then(Value::as_str),
			Some("tiktok")
		);

		let recorded = client.recorded();

		assert_eq!(recorded[0].method, "POST");
		assert_eq!(
			recorded[0].uri,
			"https://open.tiktokapis.com/v2/post/publish/creator_info/query/"
		);
		assert_eq!(recorded[0].header("authorization"), Some("Bearer act.valid_token_1234567890"));
		assert_eq!(recorded[0].header("content-type"), None);
		assert!(recorded[0].body.is_empty());
	}

	#[tokio::test]
	async fn creator_info_rejects_control_characters() {
		let (sdk, client) = testing::recording_sdk(200, "{}", |_| {});
		let err = sdk
			.post()
			.creator_info_query("act.valid\u{7}token")
			.await
			.expect_err("Control characters must be rejected.");

		assert!(matches!(err, Error::Validation(RequestValidationError::InvalidToken)));
		assert!(client.recorded().is_empty());
	}
}
