//! Strongly typed identifiers bound into every request signature.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
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
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (application, device).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (application, device).
		kind: &'static str,
	},
	/// The identifier contains the `:` signature field separator.
	#[error("{kind} identifier contains the ':' separator.")]
	ContainsSeparator {
		/// Kind of identifier (application, device).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (application, device).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { AppId, "Static application identifier issued to the client build.", "App" }
def_id! { DeviceId, "Per-install device identifier, stable for the life of an install.", "Device" }

impl DeviceId {
	/// Generates a fresh random (UUID v4) device identifier.
	pub fn generate() -> Self {
		Self(uuid::Uuid::new_v4().to_string())
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	// Fields are joined with ':' before signing; an embedded separator would make two
	// different identities produce the same message.
	if view.contains(':') {
		return Err(IdentifierError::ContainsSeparator { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_validate() {
		assert!(AppId::new(" ppmt-amp-ios-v1").is_err(), "Leading whitespace must be rejected.");
		assert!(AppId::new("").is_err());
		assert!(DeviceId::new("dev:1").is_err(), "Separator must be rejected.");

		let app = AppId::new("ppmt-amp-ios-v1").expect("App fixture should be valid.");

		assert_eq!(app.as_ref(), "ppmt-amp-ios-v1");
		assert_eq!(format!("{app:?}"), "App(ppmt-amp-ios-v1)");
	}

	#[test]
	fn generated_device_ids_are_unique_and_valid() {
		let first = DeviceId::generate();
		let second = DeviceId::generate();

		assert_ne!(first, second);
		assert_eq!(first.len(), 36);
		DeviceId::new(first.as_ref()).expect("Generated identifier should pass validation.");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let device: DeviceId =
			serde_json::from_str("\"dev-42\"").expect("Device should deserialize successfully.");

		assert_eq!(device.as_ref(), "dev-42");
		assert!(serde_json::from_str::<DeviceId>("\"with space\"").is_err());

		let too_long = format!("\"{}\"", "a".repeat(IDENTIFIER_MAX_LEN + 1));

		assert!(serde_json::from_str::<DeviceId>(&too_long).is_err());
	}
}
