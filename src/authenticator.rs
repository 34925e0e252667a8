//! Chooses the token source for a client's credentials and stamps bearer headers.

// crates.io
use oauth2::{
	HttpRequest,
	http::{HeaderValue, header::AUTHORIZATION},
};
// self
use crate::{
	_prelude::*,
	auth::{Credentials, Secret},
	error::ConfigError,
	http::{ApiHttpClient, TransportErrorMapper},
	legacy,
	oauth::OAuthTokenProvider,
};

/// Attaches bearer tokens to outgoing requests.
///
/// OAuth credentials go through the caching [`OAuthTokenProvider`]; legacy credentials are
/// signed locally on every call. Any token failure is returned before the request can be
/// sent.
#[derive(Clone)]
pub struct Authenticator<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Credential identity fixed at construction.
	pub credentials: Credentials,
	/// Provider used when the credentials are OAuth credentials.
	pub oauth: OAuthTokenProvider<C, M>,
}
impl<C, M> Authenticator<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Pairs credentials with the OAuth provider that serves them.
	pub fn new(credentials: Credentials, oauth: OAuthTokenProvider<C, M>) -> Self {
		Self { credentials, oauth }
	}

	/// Produces a bearer token for the configured credentials.
	pub async fn bearer_token(&self) -> Result<Secret> {
		match &self.credentials {
			Credentials::OAuth(oauth) => self.oauth.acquire(oauth).await,
			Credentials::Legacy(legacy) => legacy::sign(legacy),
		}
	}

	/// Sets `Authorization: Bearer <token>` on `request`.
	pub async fn attach(&self, mut request: HttpRequest) -> Result<HttpRequest> {
		let token = self.bearer_token().await?;
		let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
			.map_err(ConfigError::from)?;

		value.set_sensitive(true);
		request.headers_mut().insert(AUTHORIZATION, value);

		Ok(request)
	}
}
impl<C, M> Debug for Authenticator<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authenticator")
			.field("credentials", &self.credentials)
			.field("oauth", &self.oauth)
			.finish()
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;
	use crate::{auth::ApiKey, http::ReqwestHttpClient, oauth::ReqwestOAuthTokenProvider};

	#[tokio::test]
	async fn legacy_credentials_attach_a_signed_bearer_token() {
		let credentials = Credentials::legacy(
			ApiKey::new("legacy-key").expect("API key fixture should be valid."),
			"legacy-secret",
		);
		let authenticator = Authenticator::new(
			credentials,
			ReqwestOAuthTokenProvider::with_reqwest(ReqwestHttpClient::default()),
		);
		let request = HttpRequest::new(Vec::new());
		let request =
			authenticator.attach(request).await.expect("Legacy auth should never need the network.");
		let header = request
			.headers()
			.get(AUTHORIZATION)
			.expect("Authorization header should be present.");

		assert!(header.is_sensitive());
		assert!(
			header
				.to_str()
				.expect("Bearer header should be ASCII.")
				.starts_with("Bearer eyJ")
		);
	}
}
