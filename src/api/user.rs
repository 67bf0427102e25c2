//! User info endpoint.

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

/// Client for `GET /v2/user/info/`.
pub struct User<'a, C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	sdk: &'a Sdk<C, M>,
}
impl<'a, C, M> User<'a, C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn new(sdk: &'a Sdk<C, M>) -> Self {
		Self { sdk }
	}

	/// Fetches the requested profile `fields` for the token owner.
	///
	/// The token and the field names are validated first; a bad token is reported before bad
	/// fields, and nothing is sent when either check fails.
	pub async fn get_user_info<S>(&self, access_token: &str, fields: &[S]) -> Result<ApiResponse>
	where
		S: AsRef<str>,
	{
		self.get_user_info_with_validation(access_token, fields, true).await
	}

	/// Same as [`get_user_info`](Self::get_user_info), with local validation optional.
	///
	/// Passing `validate = false` forwards any token and field list verbatim, including
	/// control characters that end up inside the `Authorization` header. Keep it for
	/// fields TikTok adds before this crate knows about them.
	pub async fn get_user_info_with_validation<S>(
		&self,
		access_token: &str,
		fields: &[S],
		validate: bool,
	) -> Result<ApiResponse>
	where
		S: AsRef<str>,
	{
		if validate {
			validate::validate_token(access_token)?;
			validate::validate_fields(fields)?;
		}

		let joined = fields.iter().map(|field| field.as_ref()).collect::<Vec<_>>().join(",");
		let (name, value) = common::bearer(access_token);
		let request = ApiRequest::get(&self.sdk.config().user_info_url)
			.param("fields", joined)
			.header(name, value);

		self.sdk.dispatch(CallKind::UserInfo, "get_user_info", request).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{api::common::testing, error::RequestValidationError};

	const TOKEN: &str = "act.valid_token_1234567890";

	#[tokio::test]
	async fn invalid_token_wins_over_invalid_fields_and_sends_nothing() {
		let (sdk, client) = testing::recording_sdk(200, "{}", |_| {});
		let err = sdk
			.user()
			.get_user_info("short", &["non_existent_field"])
			.await
			.expect_err("Short tokens must be rejected.");

		assert_eq!(
			err.to_string(),
			"Invalid token format: must be at least 10 printable characters."
		);
		assert!(matches!(err, Error::Validation(RequestValidationError::InvalidToken)));
		assert!(client.recorded().is_empty());
	}

	#[tokio::test]
	async fn invalid_fields_are_listed_in_caller_order() {
		let (sdk, client) = testing::recording_sdk(200, "{}", |_| {});
		let err = sdk
			.user()
			.get_user_info(TOKEN, &["open_id", "non_existent_field", "another_invalid_field"])
			.await
			.expect_err("Unknown fields must be rejected.");

		assert_eq!(err.to_string(), "Invalid fields: non_existent_field, another_invalid_field");
		assert!(client.recorded().is_empty());
	}

	#[tokio::test]
	async fn valid_requests_carry_fields_and_bearer() {
		let (sdk, client) =
			testing::recording_sdk(200, r#"{"data":{"user":{"open_id":"abc"}}}"#, |config| {
				config.user_info_url = "https://open.example.com/v2/user/info/".into();
			});
		let response = sdk
			.user()
			.get_user_info(TOKEN, &["open_id", "display_name"])
			.await
			.expect("Valid user info call should succeed.");

		assert!(response.success);

		let recorded = client.recorded();

		assert_eq!(recorded[0].method, "GET");
		assert_eq!(
			recorded[0].uri,
			"https://open.example.com/v2/user/info/?fields=open_id%2Cdisplay_name"
		);
		assert_eq!(recorded[0].header("authorization"), Some("Bearer act.valid_token_1234567890"));
		assert!(recorded[0].body.is_empty());
	}

	#[tokio::test]
	async fn validation_can_be_skipped() {
		let (sdk, client) =
			testing::recording_sdk(401, r#"{"error":{"code":"access_token_invalid"}}"#, |_| {});
		let response = sdk
			.user()
			.get_user_info_with_validation("short", &["future_field"], false)
			.await
			.expect("Unvalidated calls reach the network.");

		assert!(!response.success);
		assert_eq!(client.recorded().len(), 1);
	}
}
