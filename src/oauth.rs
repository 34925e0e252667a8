//! Server-to-server OAuth token acquisition with TTL caching and singleflight guards.
//!
//! [`OAuthTokenProvider::acquire`] serves tokens from the shared [`TokenStore`] whenever a
//! non-expired entry exists for the credential identity. On a miss it POSTs the
//! `account_credentials` grant to the token endpoint with HTTP Basic client authentication,
//! caches the access token for `expires_in` minus the safety margin, and returns it.
//! Concurrent misses for the same identity wait on a per-[`CacheKey`] guard and re-read
//! the cache instead of issuing parallel exchanges. Nothing is retried.

pub use oauth2;

// std
use std::time::Duration as StdDuration;
// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use oauth2::http::{
	Method, Request, StatusCode,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	auth::{CachedToken, OAuthCredentials, Secret},
	error::{AuthError, ConfigError},
	http::{self, ApiHttpClient, CallTarget, TransportErrorMapper},
	obs::{self, CallKind},
	store::{CacheKey, MemoryStore, TokenStore},
};
#[cfg(feature = "reqwest")]
use crate::http::{ReqwestHttpClient, ReqwestTransportErrorMapper};

/// Token endpoint used when none is configured.
pub const DEFAULT_TOKEN_URL: &str = "https://zoom.us/oauth/token";
/// Lifetime subtracted from `expires_in` before a token is cached.
pub const DEFAULT_SAFETY_MARGIN: Duration = Duration::seconds(300);

const GRANT_TYPE: &str = "account_credentials";

#[cfg(feature = "reqwest")]
/// Provider specialized for the crate's default reqwest transport stack.
pub type ReqwestOAuthTokenProvider =
	OAuthTokenProvider<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Successful token endpoint payload.
#[derive(Clone, Debug, Deserialize)]
pub struct AccessTokenResponse {
	/// Bearer token for API calls.
	pub access_token: String,
	/// Token lifetime in seconds as reported by the server.
	pub expires_in: i64,
}

/// Acquires and caches OAuth access tokens for account credentials.
#[derive(Clone)]
pub struct OAuthTokenProvider<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for token exchanges.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Token cache shared by every caller of this provider.
	pub store: Arc<dyn TokenStore>,
	/// Token endpoint override; [`DEFAULT_TOKEN_URL`] when unset.
	pub token_url: Option<Url>,
	/// Lifetime subtracted from `expires_in` before caching.
	pub safety_margin: Duration,
	/// Optional timeout applied to each exchange.
	pub timeout: Option<StdDuration>,
	flow_guards: Arc<Mutex<HashMap<CacheKey, Arc<AsyncMutex<()>>>>>,
}
impl<C, M> OAuthTokenProvider<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a provider with a fresh in-memory store, the default token endpoint, and the
	/// default safety margin.
	pub fn new(http_client: impl Into<Arc<C>>, mapper: impl Into<Arc<M>>) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			store: Arc::new(MemoryStore::default()),
			token_url: None,
			safety_margin: DEFAULT_SAFETY_MARGIN,
			timeout: None,
			flow_guards: Default::default(),
		}
	}

	/// Replaces the token cache, e.g. to share one store across several clients.
	pub fn with_store(mut self, store: Arc<dyn TokenStore>) -> Self {
		self.store = store;

		self
	}

	/// Overrides the token endpoint.
	pub fn with_token_url(mut self, token_url: Url) -> Self {
		self.token_url = Some(token_url);

		self
	}

	/// Overrides the safety margin. Negative margins clamp to zero.
	pub fn with_safety_margin(mut self, margin: Duration) -> Self {
		self.safety_margin = if margin.is_negative() { Duration::ZERO } else { margin };

		self
	}

	/// Sets or clears the exchange timeout.
	pub fn with_timeout(mut self, timeout: Option<StdDuration>) -> Self {
		self.timeout = timeout;

		self
	}

	/// Returns a valid access token for `credentials`, exchanging one if needed.
	pub async fn acquire(&self, credentials: &OAuthCredentials) -> Result<Secret> {
		self.acquire_at(credentials, OffsetDateTime::now_utc()).await
	}

	/// Same as [`acquire`](Self::acquire), evaluated at `now`.
	///
	/// `now` decides cache validity and stamps the expiry of a freshly exchanged token.
	pub async fn acquire_at(
		&self,
		credentials: &OAuthCredentials,
		now: OffsetDateTime,
	) -> Result<Secret> {
		obs::observe(CallKind::OAuthToken, "acquire", async move {
			let key = CacheKey::from(credentials);

			if let Some(hit) = self.cached(&key, now).await? {
				return Ok(hit);
			}

			let guard = self.flow_guard(&key);
			let _singleflight = guard.lock().await;

			// Another caller may have refreshed the entry while this one waited.
			if let Some(hit) = self.cached(&key, now).await? {
				return Ok(hit);
			}

			obs::record_cache_lookup(false);
			obs::trace_cache_lookup(false);

			let response = self.exchange(credentials).await?;
			let entry = cache_entry(response, now, self.safety_margin)?;
			let token = entry.token.clone();

			self.store.set(key, entry).await?;

			Ok(token)
		})
		.await
	}

	async fn cached(&self, key: &CacheKey, now: OffsetDateTime) -> Result<Option<Secret>> {
		let hit = self.store.get(key, now).await?.map(|entry| entry.token);

		if hit.is_some() {
			obs::record_cache_lookup(true);
			obs::trace_cache_lookup(true);
		}

		Ok(hit)
	}

	async fn exchange(&self, credentials: &OAuthCredentials) -> Result<AccessTokenResponse> {
		let form = serde_urlencoded::to_string([
			("grant_type", GRANT_TYPE),
			("account_id", credentials.account_id.as_ref()),
		])
		.map_err(ConfigError::from)?;
		let basic = STANDARD.encode(format!(
			"{}:{}",
			credentials.client_id,
			credentials.client_secret.expose()
		));
		let request = Request::builder()
			.method(Method::POST)
			.uri(self.token_url())
			.header(AUTHORIZATION, format!("Basic {basic}"))
			.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
			.header(ACCEPT, "application/json")
			.body(form.into_bytes())
			.map_err(ConfigError::from)?;
		let response = http::dispatch(
			self.http_client.as_ref(),
			self.transport_mapper.as_ref(),
			self.timeout,
			CallTarget::TokenEndpoint,
			request,
		)
		.await?;

		if response.status() != StatusCode::OK {
			return Err(AuthError::TokenEndpoint { status: response.status().as_u16() }.into());
		}

		parse_token_response(response.body())
	}

	/// Token endpoint the provider posts to.
	pub fn token_url(&self) -> &str {
		self.token_url.as_ref().map_or(DEFAULT_TOKEN_URL, Url::as_str)
	}

	fn flow_guard(&self, key: &CacheKey) -> Arc<AsyncMutex<()>> {
		let mut guards = self.flow_guards.lock();

		guards.entry(key.clone()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
	}
}
#[cfg(feature = "reqwest")]
impl OAuthTokenProvider<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a provider backed by a default reqwest transport.
	pub fn with_reqwest(http_client: ReqwestHttpClient) -> Self {
		Self::new(http_client, ReqwestTransportErrorMapper)
	}
}
impl<C, M> Debug for OAuthTokenProvider<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthTokenProvider")
			.field("token_url", &self.token_url())
			.field("safety_margin", &self.safety_margin)
			.field("timeout", &self.timeout)
			.finish()
	}
}

fn parse_token_response(body: &[u8]) -> Result<AccessTokenResponse> {
	let mut deserializer = serde_json::Deserializer::from_slice(body);
	let parsed: AccessTokenResponse = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| AuthError::TokenResponseParse { source })?;

	if parsed.expires_in <= 0 {
		return Err(AuthError::NonPositiveExpiresIn.into());
	}

	Ok(parsed)
}

fn cache_entry(
	response: AccessTokenResponse,
	now: OffsetDateTime,
	margin: Duration,
) -> Result<CachedToken> {
	let expires_in = response.expires_in;
	let ttl = Duration::seconds(expires_in).saturating_sub(margin);

	CachedToken::new(response.access_token, now, ttl)
		.ok_or_else(|| AuthError::ExpiresInOutOfRange { expires_in }.into())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_response_requires_both_fields() {
		let err = parse_token_response(b"{\"access_token\":\"abc\"}")
			.expect_err("Missing expires_in must be rejected.");

		assert!(matches!(err, Error::Auth(AuthError::TokenResponseParse { .. })));

		let parsed = parse_token_response(b"{\"access_token\":\"abc\",\"expires_in\":3600}")
			.expect("Complete token response should parse.");

		assert_eq!(parsed.access_token, "abc");
		assert_eq!(parsed.expires_in, 3600);
	}

	#[test]
	fn token_response_rejects_non_positive_lifetimes() {
		let err = parse_token_response(b"{\"access_token\":\"abc\",\"expires_in\":0}")
			.expect_err("Zero lifetime must be rejected.");

		assert!(matches!(err, Error::Auth(AuthError::NonPositiveExpiresIn)));
	}

	#[test]
	fn cache_entries_subtract_the_margin() {
		let now = time::macros::datetime!(2025-01-01 00:00 UTC);
		let response = parse_token_response(b"{\"access_token\":\"abc\",\"expires_in\":3600}")
			.expect("Token response should parse.");
		let entry = cache_entry(response, now, DEFAULT_SAFETY_MARGIN)
			.expect("Hour-long lifetime should be cacheable.");

		assert_eq!(entry.expires_at, now + Duration::seconds(3300));
	}

	#[test]
	fn oversized_lifetimes_are_errors() {
		let now = time::macros::datetime!(2025-01-01 00:00 UTC);
		let response =
			parse_token_response(b"{\"access_token\":\"abc\",\"expires_in\":9000000000000}")
				.expect("Token response should parse.");
		let err = cache_entry(response, now, DEFAULT_SAFETY_MARGIN)
			.expect_err("Unrepresentable expiry must not panic.");

		assert!(matches!(
			err,
			Error::Auth(AuthError::ExpiresInOutOfRange { expires_in: 9_000_000_000_000 })
		));
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn builders_adjust_endpoint_and_margin() {
		let provider = ReqwestOAuthTokenProvider::with_reqwest(ReqwestHttpClient::default())
			.with_safety_margin(Duration::seconds(-5));

		assert_eq!(provider.safety_margin, Duration::ZERO);
		assert_eq!(provider.token_url(), DEFAULT_TOKEN_URL);

		let provider = provider.with_token_url(
			Url::parse("https://example.com/oauth/token").expect("Fixture URL should parse."),
		);

		assert_eq!(provider.token_url(), "https://example.com/oauth/token");
	}
}
