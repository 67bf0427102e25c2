//! Scope modeling helpers and the scope→field table used by the user info endpoint.

// std
use std::slice::Iter;
// crates.io
use serde::{Deserializer, Serializer, ser::SerializeSeq};
// self
use crate::_prelude::*;

/// Scope granting the basic profile fields.
pub const SCOPE_USER_INFO_BASIC: &str = "user.info.basic";
/// Scope granting the extended profile fields.
pub const SCOPE_USER_INFO_PROFILE: &str = "user.info.profile";
/// Scope granting the account statistics fields.
pub const SCOPE_USER_INFO_STATS: &str = "user.info.stats";

/// Fixed mapping from a user info scope to the fields it unlocks.
///
/// Every field of [`USER_INFO_FIELDS`](crate::validate::USER_INFO_FIELDS) appears under exactly
/// one scope.
pub const SCOPE_FIELDS: [(&str, &[&str]); 3] = [
	(
		SCOPE_USER_INFO_BASIC,
		&["open_id", "union_id", "display_name", "avatar_url", "avatar_url_100", "avatar_large_url"],
	),
	(SCOPE_USER_INFO_PROFILE, &["profile_deep_link", "bio_description", "is_verified", "username"]),
	(SCOPE_USER_INFO_STATS, &["follower_count", "following_count", "likes_count", "video_count"]),
];

/// Returns the fields unlocked by `scope`, or an empty slice for scopes outside the table.
pub fn scope_fields(scope: &str) -> &'static [&'static str] {
	SCOPE_FIELDS.iter().find(|(name, _)| *name == scope).map(|(_, fields)| *fields).unwrap_or(&[])
}

/// Ordered, de-duplicated list of OAuth scopes.
///
/// TikTok expects scopes comma-delimited on the wire, so the list keeps the caller's order
/// instead of sorting; [`joined`](Self::joined) renders exactly what was requested. Blank
/// entries are dropped while parsing.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopeList(Vec<String>);
impl ScopeList {
	/// Builds a scope list from any iterator, dropping blanks and repeats.
	pub fn new<I, S>(scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut list = Vec::<String>::new();

		for scope in scopes {
			let owned = scope.into();
			let trimmed = owned.trim();

			if trimmed.is_empty() || list.iter().any(|known| known == trimmed) {
				continue;
			}

			list.push(trimmed.to_owned());
		}

		Self(list)
	}

	/// Parses a comma-delimited scope string (`user.info.basic,user.info.profile`).
	pub fn parse(raw: &str) -> Self {
		Self::new(raw.split(','))
	}

	/// Number of distinct scopes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no scopes are defined.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true if the list contains `scope`.
	pub fn contains(&self, scope: &str) -> bool {
		self.0.iter().any(|candidate| candidate == scope)
	}

	/// Iterator over scopes in request order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	/// Comma-delimited representation used on the wire.
	pub fn joined(&self) -> String {
		self.0.join(",")
	}

	/// Union of the fields unlocked by each scope, de-duplicated, in scope order.
	pub fn user_info_fields(&self) -> Vec<&'static str> {
		let mut fields = Vec::new();

		for field in self.iter().flat_map(scope_fields) {
			if !fields.contains(field) {
				fields.push(*field);
			}
		}

		fields
	}

	/// Returns the underlying slice of scope strings.
	pub fn as_slice(&self) -> &[String] {
		&self.0
	}
}
impl Debug for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeList").field(&self.0).finish()
	}
}
impl Display for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.joined())
	}
}
impl<'a> IntoIterator for &'a ScopeList {
	type IntoIter = ScopeIter<'a>;
	type Item = &'a str;

	fn into_iter(self) -> Self::IntoIter {
		ScopeIter { inner: self.0.iter() }
	}
}
impl<S> FromIterator<S> for ScopeList
where
	S: Into<String>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = S>,
	{
		Self::new(iter)
	}
}
impl Serialize for ScopeList {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut seq = serializer.serialize_seq(Some(self.0.len()))?;

		for scope in &self.0 {
			seq.serialize_element(scope)?;
		}

		seq.end()
	}
}
impl<'de> Deserialize<'de> for ScopeList {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Repr {
			Joined(String),
			List(Vec<String>),
		}

		Ok(match Repr::deserialize(deserializer)? {
			Repr::Joined(raw) => Self::parse(&raw),
			Repr::List(values) => Self::new(values),
		})
	}
}

/// Iterator over scope strings.
pub struct ScopeIter<'a> {
	inner: Iter<'a, String>,
}
impl<'a> Iterator for ScopeIter<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|s| s.as_str())
	}
}
