//! Transport primitives shared by the token endpoint exchange and API calls.
//!
//! [`ApiHttpClient`] is the client's only dependency on an HTTP stack. Both the OAuth
//! provider and the request executor ask it for a short-lived [`AsyncHttpClient`] handle
//! bound to the configured timeout, dispatch one request, and hand transport failures to a
//! [`TransportErrorMapper`] so every stack reports errors through the same taxonomy.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
use std::time::Duration as StdDuration;
// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

/// Abstraction over HTTP transports able to execute token exchanges and API calls.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by the
/// OAuth provider and the executor, and the handles they return must own whatever state
/// their request futures need so those futures remain `Send`.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle bound to a request timeout.
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds a handle whose requests are abandoned once `timeout` elapses.
	///
	/// `None` leaves the transport's own default in place.
	fn with_timeout(&self, timeout: Option<StdDuration>) -> Self::Handle;
}

/// Maps HTTP transport failures into client [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted while calling `target` into a client error.
	fn map_transport_error(&self, target: CallTarget, error: HttpClientError<E>) -> Error;
}

/// Endpoint family a request was sent to, used to label transport failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallTarget {
	/// OAuth token endpoint.
	TokenEndpoint,
	/// Versioned REST API.
	Api,
}
impl CallTarget {
	/// Returns a stable label suitable for error messages and log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallTarget::TokenEndpoint => "the token endpoint",
			CallTarget::Api => "the API",
		}
	}
}
impl Display for CallTarget {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(&self, target: CallTarget, err: HttpClientError<ReqwestError>) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(target, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) =>
				TransportError::Network { target: target.as_str(), source: message.into() }.into(),
			_ => TransportError::Network {
				target: target.as_str(),
				source: "unrecognized HTTP client failure".into(),
			}
			.into(),
		}
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	pub(crate) fn bounded(&self, timeout: Option<StdDuration>) -> TimeoutHandle {
		TimeoutHandle::new(self.0.clone(), timeout)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	type Handle = TimeoutHandle;
	type TransportError = ReqwestError;

	fn with_timeout(&self, timeout: Option<StdDuration>) -> Self::Handle {
		self.bounded(timeout)
	}
}

#[cfg(feature = "reqwest")]
struct TimeoutHttpClient {
	client: ReqwestClient,
	timeout: Option<StdDuration>,
}

/// Handle returned by [`ReqwestHttpClient`] that applies a per-request timeout.
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct TimeoutHandle(Arc<TimeoutHttpClient>);
#[cfg(feature = "reqwest")]
impl TimeoutHandle {
	fn new(client: ReqwestClient, timeout: Option<StdDuration>) -> Self {
		Self(Arc::new(TimeoutHttpClient { client, timeout }))
	}
}
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for TimeoutHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = Arc::clone(&self.0);

		Box::pin(async move {
			let mut request: reqwest::Request = request.try_into().map_err(Box::new)?;

			if let Some(timeout) = client.timeout {
				*request.timeout_mut() = Some(timeout);
			}

			let response = client.client.execute(request).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Sends `request` through a timeout-bound handle and maps transport failures.
///
/// The response body is fully buffered before this returns, so no connection state outlives
/// the call on either the success or the error path.
pub(crate) async fn dispatch<C, M>(
	http_client: &C,
	mapper: &M,
	timeout: Option<StdDuration>,
	target: CallTarget,
	request: HttpRequest,
) -> Result<HttpResponse>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let handle = http_client.with_timeout(timeout);

	handle.call(request).await.map_err(|err| mapper.map_transport_error(target, err))
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(target: CallTarget, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransportError::Timeout { target: target.as_str() }.into();
	}

	TransportError::network(target.as_str(), err).into()
}
