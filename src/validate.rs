//! Local precondition checks run before any network call.

// std
use std::sync::LazyLock;
// crates.io
use regex::Regex;
// self
use crate::{_prelude::*, error::RequestValidationError};

/// Minimum number of characters an access token must carry.
pub const MIN_TOKEN_LEN: usize = 10;

/// Fields the user info endpoint accepts, in canonical order.
pub const USER_INFO_FIELDS: [&str; 14] = [
	"open_id",
	"union_id",
	"avatar_url",
	"avatar_url_100",
	"avatar_large_url",
	"display_name",
	"bio_description",
	"profile_deep_link",
	"is_verified",
	"username",
	"follower_count",
	"following_count",
	"likes_count",
	"video_count",
];

// General categories Cc, Cn, Zl and Zp; space separators (Zs) stay printable.
static NON_PRINTABLE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"[\p{Cc}\p{Cn}\p{Zl}\p{Zp}]").expect("Non-printable class must compile.")
});

/// Returns `true` when `token` has at least [`MIN_TOKEN_LEN`] characters, all printable.
///
/// Length counts Unicode scalar values, not bytes. Control characters and unassigned code
/// points are rejected, as are the U+2028/U+2029 separators.
pub fn is_valid_token(token: &str) -> bool {
	token.chars().count() >= MIN_TOKEN_LEN && !NON_PRINTABLE.is_match(token)
}

/// Returns the subset of `fields` outside [`USER_INFO_FIELDS`].
///
/// Caller order is kept and duplicates are reported once per occurrence.
pub fn invalid_fields<'a, I, S>(fields: I) -> Vec<String>
where
	I: IntoIterator<Item = &'a S>,
	S: 'a + ?Sized + AsRef<str>,
{
	fields
		.into_iter()
		.map(|field| field.as_ref())
		.filter(|field| !USER_INFO_FIELDS.contains(field))
		.map(str::to_owned)
		.collect()
}

/// Fails with [`RequestValidationError::InvalidToken`] unless [`is_valid_token`] holds.
pub fn validate_token(token: &str) -> Result<(), RequestValidationError> {
	if is_valid_token(token) { Ok(()) } else { Err(RequestValidationError::InvalidToken) }
}

/// Fails with [`RequestValidationError::InvalidFields`] when any field is unsupported.
pub fn validate_fields<S>(fields: &[S]) -> Result<(), RequestValidationError>
where
	S: AsRef<str>,
{
	let invalid = invalid_fields(fields);

	if invalid.is_empty() {
		Ok(())
	} else {
		Err(RequestValidationError::InvalidFields { fields: invalid })
	}
}
