//! Credential identities and the rule that picks an auth flow for them.

// self
use crate::{
	_prelude::*,
	auth::{AccountId, ApiKey, ClientId, Secret},
	error::ConfigError,
};

/// Immutable credential identity bound to a client at construction time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
	/// Server-to-server OAuth (`account_credentials` grant).
	OAuth(OAuthCredentials),
	/// Legacy key/secret pair used to self-sign short-lived JWTs.
	Legacy(LegacyCredentials),
}
impl Credentials {
	/// Builds OAuth credentials for the account/client pair.
	pub fn oauth(
		account_id: AccountId,
		client_id: ClientId,
		client_secret: impl Into<Secret>,
	) -> Self {
		Self::OAuth(OAuthCredentials { account_id, client_id, client_secret: client_secret.into() })
	}

	/// Builds legacy JWT credentials.
	pub fn legacy(api_key: ApiKey, api_secret: impl Into<Secret>) -> Self {
		Self::Legacy(LegacyCredentials { api_key, api_secret: api_secret.into() })
	}

	/// Picks the auth flow from loosely configured values.
	///
	/// A non-empty account identifier selects OAuth, which then requires the client
	/// identifier and secret. Otherwise the legacy key and secret are required. Empty strings
	/// count as absent.
	pub fn select(
		api_key: Option<&str>,
		api_secret: Option<&str>,
		account_id: Option<&str>,
		client_id: Option<&str>,
		client_secret: Option<&str>,
	) -> Result<Self, ConfigError> {
		if let Some(account_id) = present(account_id) {
			let client_id =
				present(client_id).ok_or(ConfigError::MissingCredentials { field: "client_id" })?;
			let client_secret = present(client_secret)
				.ok_or(ConfigError::MissingCredentials { field: "client_secret" })?;

			return Ok(Self::oauth(
				AccountId::new(account_id)?,
				ClientId::new(client_id)?,
				client_secret,
			));
		}

		let api_key = present(api_key).ok_or(ConfigError::MissingCredentials { field: "api_key" })?;
		let api_secret =
			present(api_secret).ok_or(ConfigError::MissingCredentials { field: "api_secret" })?;

		Ok(Self::legacy(ApiKey::new(api_key)?, api_secret))
	}

	/// Returns `true` when requests are authenticated through the OAuth token endpoint.
	pub fn is_oauth(&self) -> bool {
		matches!(self, Self::OAuth(_))
	}
}

/// Account/client/secret triple for the `account_credentials` grant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthCredentials {
	/// Account the app is installed on.
	pub account_id: AccountId,
	/// OAuth client identifier.
	pub client_id: ClientId,
	/// OAuth client secret.
	pub client_secret: Secret,
}

/// Key/secret pair for self-signed legacy tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyCredentials {
	/// App key; becomes the JWT issuer.
	pub api_key: ApiKey,
	/// HMAC signing secret.
	pub api_secret: Secret,
}

fn present(value: Option<&str>) -> Option<&str> {
	value.filter(|value| !value.is_empty())
}
