//! Self-signed legacy JWTs for key/secret credentials.
//!
//! Tokens are HS256-signed with the API secret, carry the API key as issuer, and expire
//! 5000 seconds after they are minted. Signing is local and cheap, so nothing is cached.

// crates.io
use jsonwebtoken::{Algorithm, EncodingKey, Header};
// self
use crate::{
	_prelude::*,
	auth::{LegacyCredentials, Secret},
	error::AuthError,
	obs::{self, CallKind},
};

/// Lifetime stamped into every legacy token.
pub const LEGACY_TOKEN_LIFETIME: Duration = Duration::seconds(5000);

/// Claims carried by a legacy token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyClaims {
	/// Issuer; the API key.
	pub iss: String,
	/// Expiry as a Unix timestamp in seconds.
	pub exp: i64,
}

/// Signs a fresh legacy token for `credentials`.
pub fn sign(credentials: &LegacyCredentials) -> Result<Secret> {
	sign_at(credentials, OffsetDateTime::now_utc())
}

/// Signs a legacy token as if minted at `now`.
pub fn sign_at(credentials: &LegacyCredentials, now: OffsetDateTime) -> Result<Secret> {
	obs::observe_sync(CallKind::LegacySign, "sign", || {
		let claims = LegacyClaims {
			iss: credentials.api_key.to_string(),
			exp: (now + LEGACY_TOKEN_LIFETIME).unix_timestamp(),
		};
		let key = EncodingKey::from_secret(credentials.api_secret.expose().as_bytes());
		let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
			.map_err(AuthError::from)?;

		Ok(Secret::new(token))
	})
}

#[cfg(test)]
mod tests {
	// crates.io
	use jsonwebtoken::{DecodingKey, Validation};
	// self
	use super::*;
	use crate::auth::ApiKey;

	fn credentials() -> LegacyCredentials {
		LegacyCredentials {
			api_key: ApiKey::new("legacy-key").expect("API key fixture should be valid."),
			api_secret: Secret::new("legacy-secret"),
		}
	}

	fn verify(token: &Secret, secret: &str) -> jsonwebtoken::errors::Result<LegacyClaims> {
		let mut validation = Validation::new(Algorithm::HS256);

		validation.set_issuer(&["legacy-key"]);

		jsonwebtoken::decode::<LegacyClaims>(
			token.expose(),
			&DecodingKey::from_secret(secret.as_bytes()),
			&validation,
		)
		.map(|data| data.claims)
	}

	#[test]
	fn tokens_carry_issuer_and_fixed_lifetime() {
		let now = OffsetDateTime::now_utc();
		let token = sign_at(&credentials(), now).expect("Signing should succeed.");
		let claims = verify(&token, "legacy-secret").expect("Token should verify.");

		assert_eq!(claims.iss, "legacy-key");
		assert_eq!(claims.exp, now.unix_timestamp() + 5000);

		let header = jsonwebtoken::decode_header(token.expose()).expect("Header should decode.");

		assert_eq!(header.alg, Algorithm::HS256);
		assert_eq!(header.typ.as_deref(), Some("JWT"));
	}

	#[test]
	fn signing_is_stateless_and_time_dependent() {
		let now = OffsetDateTime::now_utc();
		let first = sign_at(&credentials(), now).expect("First signing should succeed.");
		let second = sign_at(&credentials(), now + Duration::seconds(1))
			.expect("Second signing should succeed.");

		assert_ne!(first, second);
		verify(&first, "legacy-secret").expect("First token should verify.");
		verify(&second, "legacy-secret").expect("Second token should verify.");
	}

	#[test]
	fn wrong_secret_fails_verification() {
		let token = sign(&credentials()).expect("Signing should succeed.");

		assert!(verify(&token, "other-secret").is_err());
	}
}
