//! Loosely typed client configuration, loadable from serde sources or the environment.

// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	auth::{Credentials, Secret},
	error::ConfigError,
	oauth::DEFAULT_SAFETY_MARGIN,
};

const ENV_API_KEY: &str = "ZOOM_API_KEY";
const ENV_API_SECRET: &str = "ZOOM_API_SECRET";
const ENV_ACCOUNT_ID: &str = "ZOOM_ACCOUNT_ID";
const ENV_CLIENT_ID: &str = "ZOOM_CLIENT_ID";
const ENV_CLIENT_SECRET: &str = "ZOOM_CLIENT_SECRET";
const ENV_TIMEOUT_SECS: &str = "ZOOM_TIMEOUT_SECS";
const ENV_DEBUG: &str = "ZOOM_DEBUG";
const ENV_BASE_URL: &str = "ZOOM_BASE_URL";
const ENV_TOKEN_URL: &str = "ZOOM_TOKEN_URL";
const ENV_SAFETY_MARGIN_SECS: &str = "ZOOM_TOKEN_SAFETY_MARGIN_SECS";

/// Client settings as supplied by the host application.
///
/// Every field is optional; [`credentials`](Self::credentials) decides which auth flow the
/// values describe.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
	/// Legacy API key.
	pub api_key: Option<String>,
	/// Legacy API secret.
	pub api_secret: Option<Secret>,
	/// OAuth account identifier. Its presence selects the OAuth flow.
	pub account_id: Option<String>,
	/// OAuth client identifier.
	pub client_id: Option<String>,
	/// OAuth client secret.
	pub client_secret: Option<Secret>,
	/// Request timeout in seconds. `0` or absent leaves requests unbounded.
	pub timeout: Option<u64>,
	/// Emits request and response diagnostics.
	pub debug: bool,
	/// API root override.
	pub base_url: Option<String>,
	/// Token endpoint override.
	pub token_url: Option<String>,
	/// Seconds subtracted from OAuth token lifetimes before caching.
	pub token_safety_margin: Option<i64>,
}
impl ClientConfig {
	/// Reads the configuration from `ZOOM_*` environment variables.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Reads the configuration through `lookup`, which maps a variable name to its value.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let timeout = lookup(ENV_TIMEOUT_SECS)
			.map(|raw| {
				raw.trim().parse().map_err(|_| ConfigError::InvalidEnv { name: ENV_TIMEOUT_SECS })
			})
			.transpose()?;
		let token_safety_margin = lookup(ENV_SAFETY_MARGIN_SECS)
			.map(|raw| {
				raw.trim()
					.parse()
					.map_err(|_| ConfigError::InvalidEnv { name: ENV_SAFETY_MARGIN_SECS })
			})
			.transpose()?;
		let debug = lookup(ENV_DEBUG).map(|raw| parse_flag(&raw)).transpose()?.unwrap_or_default();

		Ok(Self {
			api_key: lookup(ENV_API_KEY),
			api_secret: lookup(ENV_API_SECRET).map(Secret::from),
			account_id: lookup(ENV_ACCOUNT_ID),
			client_id: lookup(ENV_CLIENT_ID),
			client_secret: lookup(ENV_CLIENT_SECRET).map(Secret::from),
			timeout,
			debug,
			base_url: lookup(ENV_BASE_URL),
			token_url: lookup(ENV_TOKEN_URL),
			token_safety_margin,
		})
	}

	/// Resolves the credential identity these settings describe.
	pub fn credentials(&self) -> Result<Credentials, ConfigError> {
		Credentials::select(
			self.api_key.as_deref(),
			self.api_secret.as_ref().map(Secret::expose),
			self.account_id.as_deref(),
			self.client_id.as_deref(),
			self.client_secret.as_ref().map(Secret::expose),
		)
	}

	/// Request timeout, if any.
	pub fn timeout(&self) -> Option<StdDuration> {
		self.timeout.filter(|secs| *secs > 0).map(StdDuration::from_secs)
	}

	/// Safety margin for cached OAuth tokens.
	pub fn safety_margin(&self) -> Duration {
		self.token_safety_margin.map_or(DEFAULT_SAFETY_MARGIN, Duration::seconds)
	}

	/// Parsed API root override.
	pub fn base_url(&self) -> Result<Option<Url>, ConfigError> {
		parse_url(self.base_url.as_deref())
	}

	/// Parsed token endpoint override.
	pub fn token_url(&self) -> Result<Option<Url>, ConfigError> {
		parse_url(self.token_url.as_deref())
	}
}

fn parse_url(raw: Option<&str>) -> Result<Option<Url>, ConfigError> {
	match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
		Some(raw) =>
			Url::parse(raw).map(Some).map_err(|source| ConfigError::invalid_url(raw, source)),
		None => Ok(None),
	}
}

fn parse_flag(raw: &str) -> Result<bool, ConfigError> {
	match raw.trim().to_ascii_lowercase().as_str() {
		"" | "0" | "false" | "no" | "off" => Ok(false),
		"1" | "true" | "yes" | "on" => Ok(true),
		_ => Err(ConfigError::InvalidEnv { name: ENV_DEBUG }),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> =
			pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();

		move |name: &str| vars.get(name).cloned()
	}

	#[test]
	fn account_id_selects_oauth() {
		let config = ClientConfig::from_lookup(lookup_from(&[
			("ZOOM_ACCOUNT_ID", "acct-1"),
			("ZOOM_CLIENT_ID", "client-1"),
			("ZOOM_CLIENT_SECRET", "s3cr3t"),
			("ZOOM_API_KEY", "ignored-key"),
		]))
		.expect("Environment should load.");
		let credentials = config.credentials().expect("OAuth credentials should resolve.");

		assert!(credentials.is_oauth());
	}

	#[test]
	fn missing_oauth_fields_are_reported() {
		let config = ClientConfig::from_lookup(lookup_from(&[("ZOOM_ACCOUNT_ID", "acct-1")]))
			.expect("Environment should load.");
		let err = config.credentials().expect_err("Client id must be required.");

		assert!(matches!(err, ConfigError::MissingCredentials { field: "client_id" }));
	}

	#[test]
	fn legacy_is_the_fallback() {
		let config = ClientConfig::from_lookup(lookup_from(&[
			("ZOOM_ACCOUNT_ID", ""),
			("ZOOM_API_KEY", "key"),
			("ZOOM_API_SECRET", "secret"),
		]))
		.expect("Environment should load.");

		assert!(!config.credentials().expect("Legacy credentials should resolve.").is_oauth());
		assert!(matches!(
			ClientConfig::default().credentials(),
			Err(ConfigError::MissingCredentials { field: "api_key" })
		));
	}

	#[test]
	fn numeric_and_flag_values_parse() {
		let config = ClientConfig::from_lookup(lookup_from(&[
			("ZOOM_TIMEOUT_SECS", "15"),
			("ZOOM_DEBUG", "true"),
			("ZOOM_TOKEN_SAFETY_MARGIN_SECS", "60"),
		]))
		.expect("Environment should load.");

		assert_eq!(config.timeout(), Some(StdDuration::from_secs(15)));
		assert!(config.debug);
		assert_eq!(config.safety_margin(), Duration::seconds(60));
		assert_eq!(ClientConfig::default().safety_margin(), DEFAULT_SAFETY_MARGIN);
		assert_eq!(ClientConfig { timeout: Some(0), ..Default::default() }.timeout(), None);
	}

	#[test]
	fn invalid_values_name_the_variable() {
		let err = ClientConfig::from_lookup(lookup_from(&[("ZOOM_TIMEOUT_SECS", "soon")]))
			.expect_err("Non-numeric timeout must be rejected.");

		assert!(matches!(err, ConfigError::InvalidEnv { name: "ZOOM_TIMEOUT_SECS" }));

		let err = ClientConfig::from_lookup(lookup_from(&[("ZOOM_DEBUG", "maybe")]))
			.expect_err("Unknown flag must be rejected.");

		assert!(matches!(err, ConfigError::InvalidEnv { name: "ZOOM_DEBUG" }));
	}

	#[test]
	fn config_deserializes_from_json() {
		let config: ClientConfig = serde_json::from_str(
			"{\"api_key\":\"key\",\"api_secret\":\"secret\",\"timeout\":30,\
			 \"base_url\":\"https://api.example.com/v2\"}",
		)
		.expect("Partial JSON config should deserialize.");

		assert_eq!(config.timeout(), Some(StdDuration::from_secs(30)));
		assert_eq!(
			config.base_url().expect("Base URL should parse.").map(String::from),
			Some("https://api.example.com/v2".to_owned())
		);
		assert_eq!(config.token_url().expect("Absent token URL is fine."), None);
		assert!(format!("{config:?}").contains("api_key"));
		assert!(!format!("{config:?}").contains("\"secret\""));
	}
}
