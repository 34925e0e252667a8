//! Validated credential identifiers.
//!
//! Account ids, client ids, and legacy API keys are opaque to the client, but they travel in
//! form bodies, Basic credentials, and JWT claims, so they must be non-empty printable ASCII.

// self
use crate::_prelude::*;

/// Longest identifier accepted, in bytes.
pub const IDENTIFIER_MAX_LEN: usize = 128;

macro_rules! identifier {
	($(#[$meta:meta])* $name:ident => $kind:expr) => {
		$(#[$meta])*
		#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Family this identifier belongs to.
			pub const KIND: IdKind = $kind;

			/// Validates and wraps `value`.
			pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
				let value = value.into();

				Self::KIND.check(&value)?;

				Ok(Self(value))
			}

			/// Borrows the raw identifier.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				Self::new(value)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.debug_tuple(Self::KIND.as_str()).field(&self.0).finish()
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
	};
}

/// Identifier families, used to label validation failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdKind {
	/// OAuth account identifier.
	Account,
	/// OAuth client identifier.
	Client,
	/// Legacy API key.
	ApiKey,
}
impl IdKind {
	/// Stable label for messages and debug output.
	pub const fn as_str(self) -> &'static str {
		match self {
			IdKind::Account => "AccountId",
			IdKind::Client => "ClientId",
			IdKind::ApiKey => "ApiKey",
		}
	}

	fn check(self, value: &str) -> Result<(), IdentifierError> {
		if value.is_empty() {
			return Err(IdentifierError::Empty { kind: self });
		}
		if let Some(found) = value.chars().find(|c| !c.is_ascii_graphic()) {
			return Err(IdentifierError::InvalidChar { kind: self, found });
		}
		if value.len() > IDENTIFIER_MAX_LEN {
			return Err(IdentifierError::TooLong { kind: self, max: IDENTIFIER_MAX_LEN });
		}

		Ok(())
	}
}
impl Display for IdKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} cannot be empty.")]
	Empty {
		/// Identifier family.
		kind: IdKind,
	},
	/// The identifier holds whitespace, a control character, or non-ASCII text.
	#[error("{kind} contains {found:?}, which is not printable ASCII.")]
	InvalidChar {
		/// Identifier family.
		kind: IdKind,
		/// First offending character.
		found: char,
	},
	/// The identifier exceeded [`IDENTIFIER_MAX_LEN`].
	#[error("{kind} exceeds {max} bytes.")]
	TooLong {
		/// Identifier family.
		kind: IdKind,
		/// Maximum permitted length.
		max: usize,
	},
}

identifier! {
	/// Account the server-to-server app is installed on.
	AccountId => IdKind::Account
}
identifier! {
	/// OAuth client identifier of a server-to-server app.
	ClientId => IdKind::Client
}
identifier! {
	/// Legacy app key; becomes the `iss` claim of signed tokens.
	ApiKey => IdKind::ApiKey
}
