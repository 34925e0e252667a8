//! Token cache contract and the built-in in-memory implementation.
//!
//! Stores own expiry: [`TokenStore::get`] never returns an entry whose expiry is at or before
//! the supplied instant, so callers can treat a miss and a stale entry the same way. Entries
//! are overwritten on refresh and never explicitly deleted.

pub mod memory;

pub use memory::MemoryStore;

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*,
	auth::{AccountId, CachedToken, ClientId, OAuthCredentials, Secret},
};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for cached OAuth tokens.
///
/// Implementations must be safe for concurrent readers and writers; the client shares a
/// single store across every in-flight request.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns the entry for `key` if it is still valid at `now`.
	fn get<'a>(
		&'a self,
		key: &'a CacheKey,
		now: OffsetDateTime,
	) -> StoreFuture<'a, Option<CachedToken>>;

	/// Stores or replaces the entry for `key`.
	fn set(&self, key: CacheKey, token: CachedToken) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Composite cache key derived from an OAuth credential identity.
///
/// The client secret takes part in the key only as a SHA-256 fingerprint, so a rotated
/// secret gets its own entry without the raw secret living in the map.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
	/// Account component.
	pub account_id: AccountId,
	/// Client component.
	pub client_id: ClientId,
	/// Base64 (no padding) SHA-256 digest of the client secret.
	pub secret_fingerprint: String,
}
impl CacheKey {
	/// Builds the key for an account/client/secret triple.
	pub fn new(account_id: &AccountId, client_id: &ClientId, client_secret: &Secret) -> Self {
		Self {
			account_id: account_id.clone(),
			client_id: client_id.clone(),
			secret_fingerprint: fingerprint(client_secret),
		}
	}
}
impl From<&OAuthCredentials> for CacheKey {
	fn from(credentials: &OAuthCredentials) -> Self {
		Self::new(&credentials.account_id, &credentials.client_id, &credentials.client_secret)
	}
}

fn fingerprint(secret: &Secret) -> String {
	let mut hasher = Sha256::new();

	hasher.update(secret.expose().as_bytes());

	let digest = hasher.finalize();

	STANDARD_NO_PAD.encode(digest)
}
