//! Redacted shared-secret wrapper used as the HMAC key.

// self
use crate::_prelude::*;

/// Placeholder secret shipped with unconfigured builds; servers must never accept it in
/// production.
pub const PLACEHOLDER_SECRET: &str = "your-secret-key-change-this-in-production";

/// Shared signing secret that keeps sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SharedSecret(String);
impl SharedSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the placeholder secret used when nothing was configured.
	pub fn placeholder() -> Self {
		Self::new(PLACEHOLDER_SECRET)
	}

	/// Whether this secret is the unconfigured placeholder.
	pub fn is_placeholder(&self) -> bool {
		self.0 == PLACEHOLDER_SECRET
	}

	/// Returns the inner secret. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Default for SharedSecret {
	fn default() -> Self {
		Self::placeholder()
	}
}
impl Debug for SharedSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SharedSecret").field(&"<redacted>").finish()
	}
}
impl Display for SharedSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = SharedSecret::new("s3cr3t");

		assert_eq!(format!("{secret:?}"), "SharedSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert_eq!(secret.expose(), "s3cr3t");
	}

	#[test]
	fn default_is_placeholder() {
		assert!(SharedSecret::default().is_placeholder());
		assert!(!SharedSecret::new("configured").is_placeholder());
	}
}
