//! Request descriptors and their encoding into outbound HTTP requests.
//!
//! An [`ApiRequest`] names the method, the resource path below the versioned API base, an
//! optional structured query object, an optional JSON body, and whether the endpoint
//! answers with headers only. [`ApiRequest::encode`] turns it into an [`EncodedRequest`]
//! without touching credentials; authentication is stamped on afterwards.

pub use oauth2::http::Method;

// crates.io
use oauth2::{
	HttpRequest,
	http::{
		Request,
		header::{ACCEPT, CONTENT_TYPE},
	},
};
// self
use crate::{_prelude::*, error::ConfigError};

/// How the executor should interpret a response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseKind {
	/// Response carries a JSON body to decode.
	#[default]
	Json,
	/// Success is signalled by `204 No Content` alone.
	HeaderOnly,
}

/// Descriptor for one API call. Built fresh per call.
#[derive(Clone, Debug)]
pub struct ApiRequest<Q = (), B = ()> {
	/// HTTP method.
	pub method: Method,
	/// Resource path appended to the API base, e.g. `/users/me`.
	pub path: String,
	/// Structured URL parameters, encoded as a query string.
	pub query: Option<Q>,
	/// Body parameters, encoded as JSON.
	pub body: Option<B>,
	/// Expected response kind.
	pub response: ResponseKind,
}
impl ApiRequest {
	/// Creates a descriptor with no query, no body, and a JSON response.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: None,
			body: None,
			response: ResponseKind::Json,
		}
	}

	/// `GET` descriptor.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, path)
	}

	/// `POST` descriptor.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, path)
	}

	/// `PUT` descriptor.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::PUT, path)
	}

	/// `PATCH` descriptor.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::PATCH, path)
	}

	/// `DELETE` descriptor.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::DELETE, path)
	}
}
impl<Q, B> ApiRequest<Q, B> {
	/// Attaches structured URL parameters.
	pub fn with_query<Q2>(self, query: Q2) -> ApiRequest<Q2, B> {
		ApiRequest {
			method: self.method,
			path: self.path,
			query: Some(query),
			body: self.body,
			response: self.response,
		}
	}

	/// Attaches body parameters.
	pub fn with_body<B2>(self, body: B2) -> ApiRequest<Q, B2> {
		ApiRequest {
			method: self.method,
			path: self.path,
			query: self.query,
			body: Some(body),
			response: self.response,
		}
	}

	/// Marks the endpoint as answering with headers only.
	pub fn header_only(mut self) -> Self {
		self.response = ResponseKind::HeaderOnly;

		self
	}

	/// Returns `true` for header-only descriptors.
	pub fn is_header_only(&self) -> bool {
		matches!(self.response, ResponseKind::HeaderOnly)
	}
}
impl<Q, B> ApiRequest<Q, B>
where
	Q: Serialize,
	B: Serialize,
{
	/// Encodes the descriptor against `base`, the versioned API root.
	///
	/// The URL is `base + path`, followed by `?query` only when the encoded query is
	/// non-empty. Absent body parameters produce an empty body.
	pub fn encode(&self, base: &str) -> Result<EncodedRequest, ConfigError> {
		let query = match &self.query {
			Some(query) => serde_urlencoded::to_string(query)?,
			None => String::new(),
		};
		let body = match &self.body {
			Some(body) =>
				serde_json::to_vec(body).map_err(|source| ConfigError::BodyEncode { source })?,
			None => Vec::new(),
		};
		let raw = join_path(base, &self.path);
		let mut url = Url::parse(&raw).map_err(|source| ConfigError::invalid_url(raw, source))?;

		if !query.is_empty() {
			url.set_query(Some(&query));
		}

		Ok(EncodedRequest { method: self.method.clone(), url, query, body })
	}
}

/// Fully encoded request, not yet authenticated.
#[derive(Clone, Debug)]
pub struct EncodedRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute URL including the query string.
	pub url: Url,
	/// Encoded query string, empty when there are no parameters.
	pub query: String,
	/// JSON body bytes, empty when there are no body parameters.
	pub body: Vec<u8>,
}
impl EncodedRequest {
	/// Builds the transport request with JSON content negotiation headers.
	pub fn into_http(self) -> Result<HttpRequest, ConfigError> {
		Request::builder()
			.method(self.method)
			.uri(self.url.as_str())
			.header(CONTENT_TYPE, "application/json")
			.header(ACCEPT, "application/json")
			.body(self.body)
			.map_err(ConfigError::from)
	}
}

fn join_path(base: &str, path: &str) -> String {
	let base = base.trim_end_matches('/');

	if path.is_empty() || path.starts_with('/') {
		format!("{base}{path}")
	} else {
		format!("{base}/{path}")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const BASE: &str = "https://api.zoom.us/v2";

	#[derive(Serialize)]
	struct ListParams {
		page_size: u32,
		#[serde(skip_serializing_if = "Option::is_none")]
		next_page_token: Option<String>,
		status: &'static str,
	}

	#[derive(Serialize)]
	struct EmptyParams {
		#[serde(skip_serializing_if = "Option::is_none")]
		next_page_token: Option<String>,
	}

	#[test]
	fn query_is_appended_only_when_non_empty() {
		let encoded = ApiRequest::get("/users")
			.with_query(ListParams { page_size: 30, next_page_token: None, status: "active" })
			.encode(BASE)
			.expect("Request with query should encode.");

		assert_eq!(encoded.url.as_str(), "https://api.zoom.us/v2/users?page_size=30&status=active");
		assert_eq!(encoded.query, "page_size=30&status=active");

		let encoded = ApiRequest::get("/users")
			.with_query(EmptyParams { next_page_token: None })
			.encode(BASE)
			.expect("Request with empty query should encode.");

		assert_eq!(encoded.url.as_str(), "https://api.zoom.us/v2/users");
		assert!(encoded.query.is_empty());
	}

	#[test]
	fn body_is_json_or_empty() {
		let encoded = ApiRequest::patch("/users/me")
			.with_body(serde_json::json!({ "first_name": "Ada" }))
			.encode(BASE)
			.expect("Request with body should encode.");

		assert_eq!(encoded.body, b"{\"first_name\":\"Ada\"}");

		let encoded = ApiRequest::delete("/meetings/1").header_only().encode(BASE).expect(
			"Header-only request should encode.",
		);

		assert!(encoded.body.is_empty());
	}

	#[test]
	fn paths_join_without_losing_the_version_prefix() {
		assert_eq!(join_path("https://api.zoom.us/v2/", "/users"), "https://api.zoom.us/v2/users");
		assert_eq!(join_path("https://api.zoom.us/v2", "users"), "https://api.zoom.us/v2/users");
		assert_eq!(join_path("https://api.zoom.us/v2", ""), "https://api.zoom.us/v2");
	}

	#[test]
	fn non_object_query_is_rejected() {
		let err = ApiRequest::get("/users")
			.with_query(42_u32)
			.encode(BASE)
			.expect_err("Scalar query parameters must be rejected.");

		assert!(matches!(err, ConfigError::QueryEncode(_)));
	}

	#[test]
	fn http_request_carries_json_headers() {
		let request = ApiRequest::post("/users")
			.with_body(serde_json::json!({ "action": "create" }))
			.encode(BASE)
			.and_then(EncodedRequest::into_http)
			.expect("Request should convert into an HTTP request.");

		assert_eq!(request.method(), Method::POST);
		assert_eq!(request.uri(), "https://api.zoom.us/v2/users");
		assert_eq!(
			request.headers().get(CONTENT_TYPE).and_then(|value| value.to_str().ok()),
			Some("application/json")
		);
	}
}
