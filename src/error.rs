//! Client-level error types shared by token providers, the request builder, and the decoder.

// self
use crate::{_prelude::*, auth::IdentifierError};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Token cache failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration or request-construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token acquisition failed; the API request was never sent.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Structured error decoded from the platform's response body.
	#[error(transparent)]
	Api(#[from] ApiError),

	/// Error synthesized from the status line when no structured error is available.
	#[error("API call failed with status {status} {reason}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Canonical reason phrase for the status, empty when unknown.
		reason: String,
	},
	/// A successful response body could not be decoded into the requested shape.
	#[error("Response body with status {status} could not be decoded.")]
	Decode {
		/// HTTP status code of the response.
		status: u16,
		/// Structured parsing failure, including the JSON path that failed.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl Error {
	/// Numeric code carried by the error, if any.
	///
	/// Structured API errors report the platform code; status errors report the HTTP status.
	pub fn code(&self) -> Option<i64> {
		match self {
			Self::Api(api) => Some(api.code),
			Self::Status { status, .. } => Some(i64::from(*status)),
			_ => None,
		}
	}

	pub(crate) fn status(status: u16, reason: Option<&str>) -> Self {
		Self::Status { status, reason: reason.unwrap_or_default().to_owned() }
	}
}

/// Structured `{code, message}` error returned by the platform.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ThisError)]
#[error("API error {code}: {message}.")]
pub struct ApiError {
	/// Platform-specific numeric error code.
	#[serde(default)]
	pub code: i64,
	/// Human-readable message supplied by the platform.
	#[serde(default)]
	pub message: String,
}
impl ApiError {
	/// Creates an error from its parts.
	pub fn new(code: i64, message: impl Into<String>) -> Self {
		Self { code, message: message.into() }
	}
}

/// Configuration and request-construction failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A configured or joined URL is invalid.
	#[error("URL `{url}` is invalid.")]
	InvalidUrl {
		/// Offending URL text.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// URL parameters could not be encoded as a query string.
	#[error("URL parameters could not be encoded.")]
	QueryEncode(#[from] serde_urlencoded::ser::Error),
	/// Body parameters could not be encoded as JSON.
	#[error("Body parameters could not be encoded as JSON.")]
	BodyEncode {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// A header value contains characters HTTP does not allow.
	#[error(transparent)]
	InvalidHeader(#[from] oauth2::http::header::InvalidHeaderValue),
	/// A credential field required by the selected auth flow is missing.
	#[error("Credential field `{field}` is required.")]
	MissingCredentials {
		/// Name of the missing field.
		field: &'static str,
	},
	/// A credential identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] IdentifierError),
	/// An environment variable holds a value that cannot be parsed.
	#[error("Environment variable `{name}` holds an invalid value.")]
	InvalidEnv {
		/// Variable name.
		name: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	pub(crate) fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
		Self::InvalidUrl { url: url.into(), source }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Token acquisition failures. A request that hits one of these is never sent.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Token endpoint answered with a non-200 status.
	#[error("Token endpoint responded with status {status}.")]
	TokenEndpoint {
		/// HTTP status code.
		status: u16,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Token endpoint returned a non-positive lifetime.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
	/// Token endpoint returned a lifetime too large to turn into an expiry instant.
	#[error("The expires_in value {expires_in} is out of range.")]
	ExpiresInOutOfRange {
		/// Lifetime in seconds as reported by the server.
		expires_in: i64,
	},
	/// Legacy JWT could not be signed.
	#[error("Legacy token could not be signed.")]
	Signing(#[from] jsonwebtoken::errors::Error),
}

/// Transport-level failures (network, IO, timeout).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {target}.")]
	Network {
		/// Which endpoint was being called (`token endpoint` or `API`).
		target: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The configured request timeout elapsed.
	#[error("Request to {target} timed out.")]
	Timeout {
		/// Which endpoint was being called.
		target: &'static str,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during transport.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(target: &'static str, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { target, source: Box::new(src) }
	}
}
