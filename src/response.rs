//! Normalized response envelope returned by every network call.

// crates.io
use oauth2::HttpResponse;
use serde::{Serializer, de::DeserializeOwned, ser::SerializeMap};
// self
use crate::_prelude::*;

/// `{success, code, response}` envelope wrapped around an HTTP result.
///
/// Remote failures are data: a 4xx/5xx answer still produces an envelope, with
/// `success == false` and the remote error body in `response`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ApiResponse {
	/// `true` iff the transport classified the status as 2xx.
	pub success: bool,
	/// Numeric HTTP status code.
	pub code: u16,
	/// Decoded body, or the raw text when it is not JSON.
	pub response: ResponseBody,
}
impl ApiResponse {
	/// Normalizes a transport response. Pure; never fails.
	pub fn from_http(response: HttpResponse) -> Self {
		let status = response.status();

		Self {
			success: status.is_success(),
			code: status.as_u16(),
			response: ResponseBody::parse(response.body()),
		}
	}

	/// Returns the Open API `data` object, if the body carries one.
	pub fn data(&self) -> Option<&Value> {
		self.response.pointer("/data")
	}

	/// Decodes the JSON body into `T`, reporting the failing path on mismatch.
	pub fn decode<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let decode = |value: Value| {
			serde_path_to_error::deserialize(value)
				.map_err(|source| Error::Decode { source, status: self.code })
		};

		match &self.response {
			ResponseBody::Json(value) => decode(value.clone()),
			// Surface the same error shape for bodies that never were JSON.
			ResponseBody::Raw(raw) => decode(Value::String(raw.clone())),
		}
	}
}

/// Response payload: decoded JSON with string keys, or the untouched body text.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
	/// Body decoded as JSON.
	Json(Value),
	/// Body that failed to decode; rendered as `{"raw": ...}`.
	Raw(String),
}
impl ResponseBody {
	/// Decodes `body` as JSON, falling back to the raw text.
	pub fn parse(body: &[u8]) -> Self {
		match serde_json::from_slice(body) {
			Ok(value) => Self::Json(value),
			Err(_) => Self::Raw(String::from_utf8_lossy(body).into_owned()),
		}
	}

	/// Returns the decoded JSON, if any.
	pub fn as_json(&self) -> Option<&Value> {
		match self {
			Self::Json(value) => Some(value),
			Self::Raw(_) => None,
		}
	}

	/// Returns the raw text of a body that was not JSON.
	pub fn raw(&self) -> Option<&str> {
		match self {
			Self::Json(_) => None,
			Self::Raw(raw) => Some(raw),
		}
	}

	/// Looks up a value by JSON pointer (`/data/user/open_id`).
	pub fn pointer(&self, pointer: &str) -> Option<&Value> {
		self.as_json().and_then(|value| value.pointer(pointer))
	}

	/// Converts the body into a JSON value, wrapping raw text as `{"raw": ...}`.
	pub fn into_value(self) -> Value {
		match self {
			Self::Json(value) => value,
			Self::Raw(raw) => {
				let mut map = Map::new();

				map.insert("raw".into(), Value::String(raw));

				Value::Object(map)
			},
		}
	}
}
impl Serialize for ResponseBody {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match self {
			Self::Json(value) => value.serialize(serializer),
			Self::Raw(raw) => {
				let mut map = serializer.serialize_map(Some(1))?;

				map.serialize_entry("raw", raw)?;

				map.end()
			},
		}
	}
}
