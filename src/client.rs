//! API client and request executor.
//!
//! [`Client`] owns the transport, the credential identity, and the token provider. It is
//! constructed explicitly by the host application; there is no process-wide default client.
//! Each [`Client::execute`] call encodes the descriptor, attaches a bearer token, sends the
//! request once, and decodes the response.

// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	auth::Credentials,
	authenticator::Authenticator,
	config::ClientConfig,
	decode::{self, Outcome},
	http::{self, ApiHttpClient, CallTarget, TransportErrorMapper},
	obs::{self, CallKind},
	oauth::OAuthTokenProvider,
	request::ApiRequest,
	store::TokenStore,
};
#[cfg(feature = "reqwest")]
use crate::{
	error::ConfigError,
	http::{ReqwestHttpClient, ReqwestTransportErrorMapper},
};

/// Versioned API root used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.zoom.us/v2";

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestApiClient = Client<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Authenticated client for the REST API.
#[derive(Clone)]
pub struct Client<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound API request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Token source bound to this client's credentials.
	pub authenticator: Authenticator<C, M>,
	/// API root override; [`DEFAULT_BASE_URL`] when unset.
	pub base_url: Option<Url>,
	/// Optional timeout applied to every request, token exchanges included.
	pub timeout: Option<StdDuration>,
	/// Emits request and response diagnostics when set.
	pub debug: bool,
}
impl<C, M> Client<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	///
	/// The client starts with its own in-memory token store; use
	/// [`with_store`](Self::with_store) to share one across clients.
	pub fn with_http_client(
		credentials: Credentials,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		let http_client = http_client.into();
		let transport_mapper = mapper.into();
		let oauth = OAuthTokenProvider::new(http_client.clone(), transport_mapper.clone());

		Self {
			http_client,
			transport_mapper,
			authenticator: Authenticator::new(credentials, oauth),
			base_url: None,
			timeout: None,
			debug: false,
		}
	}

	/// Builds a client from a loaded [`ClientConfig`] on top of the given transport + mapper.
	pub fn with_config(
		config: &ClientConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		let mut client = Self::with_http_client(config.credentials()?, http_client, mapper)
			.with_timeout(config.timeout())
			.with_safety_margin(config.safety_margin())
			.with_debug(config.debug);

		if let Some(base_url) = config.base_url()? {
			client = client.with_base_url(base_url);
		}
		if let Some(token_url) = config.token_url()? {
			client = client.with_token_url(token_url);
		}

		Ok(client)
	}

	/// Replaces the token cache.
	pub fn with_store(mut self, store: Arc<dyn TokenStore>) -> Self {
		self.authenticator.oauth = self.authenticator.oauth.with_store(store);

		self
	}

	/// Overrides the API root.
	pub fn with_base_url(mut self, base_url: Url) -> Self {
		self.base_url = Some(base_url);

		self
	}

	/// Overrides the OAuth token endpoint.
	pub fn with_token_url(mut self, token_url: Url) -> Self {
		self.authenticator.oauth = self.authenticator.oauth.with_token_url(token_url);

		self
	}

	/// Overrides the lifetime subtracted from OAuth tokens before caching.
	pub fn with_safety_margin(mut self, margin: Duration) -> Self {
		self.authenticator.oauth = self.authenticator.oauth.with_safety_margin(margin);

		self
	}

	/// Sets or clears the timeout for API calls and token exchanges.
	pub fn with_timeout(mut self, timeout: Option<StdDuration>) -> Self {
		self.timeout = timeout;
		self.authenticator.oauth = self.authenticator.oauth.with_timeout(timeout);

		self
	}

	/// Toggles debug diagnostics.
	pub fn with_debug(mut self, debug: bool) -> Self {
		self.debug = debug;

		self
	}

	/// Credential identity this client authenticates as.
	pub fn credentials(&self) -> &Credentials {
		&self.authenticator.credentials
	}

	/// API root requests are sent to.
	pub fn base_url(&self) -> &str {
		self.base_url.as_ref().map_or(DEFAULT_BASE_URL, Url::as_str)
	}

	/// Executes `request` and decodes the response into `T`.
	///
	/// Header-only descriptors succeed with [`Outcome::NoContent`] on `204` and fail on any
	/// other status. JSON descriptors decode successful bodies into `T`; error statuses
	/// surface as [`Error::Api`] or, when the body is not JSON, [`Error::Status`].
	pub async fn execute<T, Q, B>(&self, request: &ApiRequest<Q, B>) -> Result<Outcome<T>>
	where
		T: DeserializeOwned,
		Q: Serialize,
		B: Serialize,
	{
		obs::observe(CallKind::ApiRequest, "execute", async move {
			let encoded = request.encode(self.base_url())?;

			obs::debug_request(self.debug, &encoded.url, &encoded.query, &encoded.body);

			let http_request = self.authenticator.attach(encoded.into_http()?).await?;
			let response = http::dispatch(
				self.http_client.as_ref(),
				self.transport_mapper.as_ref(),
				self.timeout,
				CallTarget::Api,
				http_request,
			)
			.await?;

			obs::debug_response(self.debug, response.status().as_u16(), response.body());

			if request.is_header_only() {
				decode::decode_header_only(response.status())?;

				return Ok(Outcome::NoContent);
			}

			decode::decode_body(response.status(), response.body())
		})
		.await
	}

	/// Executes a JSON descriptor and returns the decoded value.
	///
	/// Returns `None` when the platform answered an error status with an empty error object.
	pub async fn fetch<T, Q, B>(&self, request: &ApiRequest<Q, B>) -> Result<Option<T>>
	where
		T: DeserializeOwned,
		Q: Serialize,
		B: Serialize,
	{
		self.execute(request).await.map(Outcome::into_decoded)
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client with its own reqwest-backed transport.
	pub fn new(credentials: Credentials) -> Self {
		Self::with_http_client(
			credentials,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}

	/// Builds a client from a loaded [`ClientConfig`].
	pub fn from_config(config: &ClientConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::with_client(
			ReqwestClient::builder().build().map_err(ConfigError::from)?,
		);

		Self::with_config(config, http_client, ReqwestTransportErrorMapper)
	}
}
impl<C, M> Debug for Client<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("base_url", &self.base_url())
			.field("authenticator", &self.authenticator)
			.field("timeout", &self.timeout)
			.field("debug", &self.debug)
			.finish()
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// crates.io
	use httpmock::prelude::*;
	// self
	use super::*;
	use crate::{
		_preludet::{build_reqwest_test_client, test_reqwest_http_client},
		auth::{AccountId, ApiKey, ClientId},
	};

	/// Records, for each event on the debug target, whether it carries a `status` field.
	#[cfg(feature = "tracing")]
	#[derive(Clone, Default)]
	struct DebugEvents(Arc<Mutex<Vec<bool>>>);
	#[cfg(feature = "tracing")]
	impl tracing::Subscriber for DebugEvents {
		fn enabled(&self, _: &tracing::Metadata<'_>) -> bool {
			true
		}

		fn new_span(&self, _: &tracing::span::Attributes<'_>) -> tracing::span::Id {
			tracing::span::Id::from_u64(1)
		}

		fn record(&self, _: &tracing::span::Id, _: &tracing::span::Record<'_>) {}

		fn record_follows_from(&self, _: &tracing::span::Id, _: &tracing::span::Id) {}

		fn event(&self, event: &tracing::Event<'_>) {
			let metadata = event.metadata();

			if metadata.target() == "zoom_api::debug" {
				self.0.lock().push(metadata.fields().field("status").is_some());
			}
		}

		fn enter(&self, _: &tracing::span::Id) {}

		fn exit(&self, _: &tracing::span::Id) {}
	}

	fn oauth_credentials() -> Credentials {
		Credentials::oauth(
			AccountId::new("acct-1").expect("Account fixture should be valid."),
			ClientId::new("client-1").expect("Client fixture should be valid."),
			"client-secret",
		)
	}

	#[test]
	fn builders_propagate_to_the_token_provider() {
		let client = ReqwestApiClient::new(oauth_credentials())
			.with_timeout(Some(StdDuration::from_secs(5)))
			.with_safety_margin(Duration::seconds(60))
			.with_token_url(
				Url::parse("https://example.com/oauth/token").expect("Fixture URL should parse."),
			);

		assert_eq!(client.base_url(), DEFAULT_BASE_URL);
		assert_eq!(client.authenticator.oauth.timeout, Some(StdDuration::from_secs(5)));
		assert_eq!(client.authenticator.oauth.safety_margin, Duration::seconds(60));
		assert_eq!(client.authenticator.oauth.token_url(), "https://example.com/oauth/token");
	}

	#[test]
	fn with_config_applies_every_setting() {
		let config = ClientConfig {
			api_key: Some("key-1".into()),
			api_secret: Some("secret-1".into()),
			timeout: Some(7),
			debug: true,
			base_url: Some("https://api.example.com/v2".into()),
			token_url: Some("https://example.com/oauth/token".into()),
			token_safety_margin: Some(30),
			..Default::default()
		};
		let client = ReqwestApiClient::with_config(
			&config,
			test_reqwest_http_client(),
			ReqwestTransportErrorMapper,
		)
		.expect("Complete config should build a client.");

		assert!(!client.credentials().is_oauth());
		assert!(client.debug);
		assert_eq!(client.base_url(), "https://api.example.com/v2");
		assert_eq!(client.timeout, Some(StdDuration::from_secs(7)));
		assert_eq!(client.authenticator.oauth.safety_margin, Duration::seconds(30));
		assert_eq!(client.authenticator.oauth.token_url(), "https://example.com/oauth/token");
	}

	#[test]
	fn debug_output_redacts_the_client_secret() {
		let client = ReqwestApiClient::new(oauth_credentials());

		assert!(!format!("{client:?}").contains("client-secret"));
	}

	#[tokio::test]
	async fn fetch_returns_the_decoded_body() {
		let server = MockServer::start_async().await;
		let (client, store) = build_reqwest_test_client(&server.base_url(), oauth_credentials());
		let _token = server
			.mock_async(|when, then| {
				when.method(POST).path("/oauth/token");
				then.status(200).body("{\"access_token\":\"tok\",\"expires_in\":3600}");
			})
			.await;
		let _api = server
			.mock_async(|when, then| {
				when.method(GET).path("/v2/users/me").header("authorization", "Bearer tok");
				then.status(200).body("{\"id\":\"u1\"}");
			})
			.await;
		let user: Option<serde_json::Value> = client
			.fetch(&ApiRequest::get("/users/me"))
			.await
			.expect("Authenticated call should succeed.");

		assert_eq!(user, Some(serde_json::json!({ "id": "u1" })));
		assert_eq!(store.len(), 1);
	}

	#[cfg(feature = "tracing")]
	#[tokio::test]
	async fn debug_mode_reports_header_only_statuses() {
		let server = MockServer::start_async().await;
		let _api = server
			.mock_async(|when, then| {
				when.method(DELETE).path("/v2/meetings/42");
				then.status(204);
			})
			.await;
		let credentials = Credentials::legacy(
			ApiKey::new("key-1").expect("API key fixture should be valid."),
			"secret-1",
		);
		let (client, _store) = build_reqwest_test_client(&server.base_url(), credentials);
		let client = client.with_debug(true);
		let events = DebugEvents::default();
		let _default = tracing::subscriber::set_default(events.clone());

		client
			.execute::<(), _, _>(&ApiRequest::delete("/meetings/42").header_only())
			.await
			.expect("Header-only delete should succeed.");

		assert_eq!(*events.0.lock(), vec![false, true]);
	}
}
