//! Token endpoint payloads and the access token handle given to hosts.

// crates.io
use serde::Deserializer;
// self
use crate::{
	_prelude::*,
	auth::{scope::ScopeList, secret::TokenSecret},
};

/// Successful token endpoint payload (`authorization_code` and `refresh_token` grants).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
	/// Access token issued for the user.
	pub access_token: TokenSecret,
	/// Refresh token, when the grant returns one.
	pub refresh_token: Option<TokenSecret>,
	/// Access token lifetime in seconds.
	#[serde(default, deserialize_with = "lifetime")]
	pub expires_in: i64,
	/// Refresh token lifetime in seconds.
	#[serde(default, deserialize_with = "optional_lifetime")]
	pub refresh_expires_in: Option<i64>,
	/// TikTok user identifier the token belongs to.
	pub open_id: Option<String>,
	/// Scopes the user actually granted.
	pub scope: Option<ScopeList>,
	/// Token type, normally `Bearer`.
	pub token_type: Option<String>,
}

/// Access token record handed to the host after a successful code exchange.
///
/// The SDK builds it and forgets it; persisting and refreshing it is the host's job.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
	/// Access token secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Refresh token secret, if TikTok issued one.
	pub refresh_token: Option<TokenSecret>,
	/// Expiry instant derived from the issue instant plus `expires_in`.
	pub expires_at: OffsetDateTime,
	/// Refresh token expiry, when the payload carried `refresh_expires_in`.
	pub refresh_expires_at: Option<OffsetDateTime>,
	/// TikTok user identifier.
	pub open_id: Option<String>,
	/// Granted scopes.
	pub scope: ScopeList,
	/// Token type reported by the token endpoint.
	pub token_type: Option<String>,
}
impl AccessToken {
	/// Builds a record from a token payload received at `now`.
	///
	/// Fails with [`Error::TokenLifetime`] when a lifetime pushes the expiry outside the
	/// representable calendar range.
	pub fn from_grant(grant: TokenGrant, now: OffsetDateTime) -> Result<Self> {
		let expires_at = expiry(now, "expires_in", grant.expires_in)?;
		let refresh_expires_at = grant
			.refresh_expires_in
			.map(|seconds| expiry(now, "refresh_expires_in", seconds))
			.transpose()?;

		Ok(Self {
			access_token: grant.access_token,
			refresh_token: grant.refresh_token,
			expires_at,
			refresh_expires_at,
			open_id: grant.open_id,
			scope: grant.scope.unwrap_or_default(),
			token_type: grant.token_type,
		})
	}

	/// Returns `true` if the access token has expired at `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}

	/// Returns `true` if the access token is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}

	/// Remaining lifetime at `instant`, clamped to zero.
	pub fn expires_in_at(&self, instant: OffsetDateTime) -> Duration {
		(self.expires_at - instant).max(Duration::ZERO)
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("expires_at", &self.expires_at)
			.field("refresh_expires_at", &self.refresh_expires_at)
			.field("open_id", &self.open_id)
			.field("scope", &self.scope)
			.field("token_type", &self.token_type)
			.finish()
	}
}

fn expiry(now: OffsetDateTime, field: &'static str, seconds: i64) -> Result<OffsetDateTime> {
	now.checked_add(Duration::seconds(seconds)).ok_or(Error::TokenLifetime { field, seconds })
}

// Lifetimes arrive as integers, floats, or numeric strings; strings keep only their leading
// integer and fall back to zero.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lifetime {
	Integer(i64),
	Float(f64),
	Text(String),
}
impl Lifetime {
	fn seconds(self) -> i64 {
		match self {
			Self::Integer(seconds) => seconds,
			Self::Float(seconds) => seconds as i64,
			Self::Text(raw) => leading_integer(&raw),
		}
	}
}

fn leading_integer(raw: &str) -> i64 {
	let trimmed = raw.trim_start();
	let (negative, unsigned) = match trimmed.as_bytes().first() {
		Some(b'-') => (true, &trimmed[1..]),
		Some(b'+') => (false, &trimmed[1..]),
		_ => (false, trimmed),
	};
	let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
	let digits = &unsigned[..digits];

	if digits.is_empty() {
		return 0;
	}

	let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);

	if negative { -magnitude } else { magnitude }
}

fn lifetime<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<Lifetime>::deserialize(deserializer)?.map(Lifetime::seconds).unwrap_or_default())
}

fn optional_lifetime<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<Lifetime>::deserialize(deserializer)?.map(Lifetime::seconds))
}
