//! Zoom REST API client with OAuth account-credential and legacy JWT authentication.
//!
//! Tokens live in a shared TTL cache keyed by credential identity. Requests are described by
//! [`request::ApiRequest`] and sent through [`client::Client::execute`].

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod authenticator;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod http;
pub mod legacy;
pub mod oauth;
pub mod obs;
pub mod request;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and mock-server helpers for tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::Credentials,
		client::{Client, ReqwestApiClient},
		http::{ReqwestHttpClient, ReqwestTransportErrorMapper},
		store::{MemoryStore, TokenStore},
	};

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`Client`] whose API base and token endpoint both point at `server_url`,
	/// backed by an in-memory store that the caller can inspect.
	pub fn build_reqwest_test_client(
		server_url: &str,
		credentials: Credentials,
	) -> (ReqwestApiClient, Arc<MemoryStore>) {
		let base_url = Url::parse(&format!("{server_url}/v2"))
			.expect("Mock API base URL should parse successfully.");
		let token_url = Url::parse(&format!("{server_url}/oauth/token"))
			.expect("Mock token endpoint should parse successfully.");
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn TokenStore> = store_backend.clone();
		let client = Client::with_http_client(
			credentials,
			test_reqwest_http_client(),
			ReqwestTransportErrorMapper,
		)
		.with_store(store)
		.with_base_url(base_url)
		.with_token_url(token_url);

		(client, store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
