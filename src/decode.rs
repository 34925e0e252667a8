//! Response decoding for header-only and JSON-bodied API calls.

// crates.io
use oauth2::http::StatusCode;
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, error::ApiError};

/// Result of a call that completed without an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
	/// The body decoded into the requested shape.
	Decoded(T),
	/// Nothing to decode: a header-only success, or an error status whose body held an empty
	/// error object.
	NoContent,
}
impl<T> Outcome<T> {
	/// Returns the decoded value, if any.
	pub fn into_decoded(self) -> Option<T> {
		match self {
			Self::Decoded(value) => Some(value),
			Self::NoContent => None,
		}
	}

	/// Returns `true` when there was nothing to decode.
	pub fn is_no_content(&self) -> bool {
		matches!(self, Self::NoContent)
	}
}

#[derive(Deserialize)]
struct ErrorBody {
	code: Option<i64>,
	message: Option<String>,
}

/// Succeeds only for `204 No Content`; any other status becomes a status error.
pub fn decode_header_only(status: StatusCode) -> Result<()> {
	if status == StatusCode::NO_CONTENT {
		Ok(())
	} else {
		Err(Error::status(status.as_u16(), status.canonical_reason()))
	}
}

/// Decodes a JSON-bodied response.
///
/// Statuses below 400 decode into `T`, and a body that does not fit `T` is a decode error.
/// Statuses of 400 and above decode as a structured API error. Bodies that are not JSON
/// fall back to a status error; an empty error object (or `null`) counts as no error.
pub fn decode_body<T>(status: StatusCode, body: &[u8]) -> Result<Outcome<T>>
where
	T: DeserializeOwned,
{
	if status.as_u16() < 400 {
		let mut deserializer = serde_json::Deserializer::from_slice(body);

		return serde_path_to_error::deserialize(&mut deserializer)
			.map(Outcome::Decoded)
			.map_err(|source| Error::Decode { status: status.as_u16(), source });
	}

	match parse_error_body(body) {
		Err(_) => Err(Error::status(status.as_u16(), status.canonical_reason())),
		Ok(None) | Ok(Some(ErrorBody { code: None, message: None })) => Ok(Outcome::NoContent),
		Ok(Some(ErrorBody { code, message })) => Err(ApiError {
			code: code.unwrap_or_default(),
			message: message.unwrap_or_default(),
		}
		.into()),
	}
}

// Only a JSON object (or `null`) counts as an error body.
fn parse_error_body(body: &[u8]) -> serde_json::Result<Option<ErrorBody>> {
	match serde_json::from_slice::<Option<Map<String, Value>>>(body)? {
		Some(object) => serde_json::from_value(Value::Object(object)).map(Some),
		None => Ok(None),
	}
}
