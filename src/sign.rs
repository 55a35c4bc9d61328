//! HMAC request signing bound to the client identity.
//!
//! The signed message is the colon-joined tuple
//! `app_id:device_id:timestamp:canonical_payload`, keyed by the UTF-8 bytes of the shared
//! secret with HMAC-SHA256 and encoded as padded standard base64. Field order and the `:`
//! separator are part of the wire contract with the verifying server; changing either breaks
//! every deployed verifier.
//!
//! Canonical payloads cover only `METHOD:/path`. Query parameters are not part of the signed
//! message.

// std
use std::borrow::Cow;
// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
// self
use crate::{
	_prelude::*,
	auth::{AppId, DeviceId, Identity, SharedSecret},
	throttle::Clock,
};

type HmacSha256 = Hmac<Sha256>;

const SEPARATOR: char = ':';

/// Query parameter carrying the application identifier.
pub const PARAM_APP_ID: &str = "appId";
/// Query parameter carrying the device identifier.
pub const PARAM_DEVICE_ID: &str = "deviceId";
/// Query parameter carrying the unix timestamp (seconds).
pub const PARAM_TIMESTAMP: &str = "timestamp";
/// Query parameter carrying the base64 signature.
pub const PARAM_SIGNATURE: &str = "signature";

/// Fixed `METHOD:/path` descriptor that participates in signing.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CanonicalPayload(Cow<'static, str>);
impl CanonicalPayload {
	/// Builds a payload from a method and an absolute path.
	pub fn new(method: &str, path: &str) -> Self {
		Self(Cow::Owned(format!("{}{SEPARATOR}{path}", method.to_ascii_uppercase())))
	}

	/// Wraps a pre-rendered static payload such as `GET:/prices`.
	pub const fn from_static(value: &'static str) -> Self {
		Self(Cow::Borrowed(value))
	}

	/// Rendered payload string.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for CanonicalPayload {
	fn as_ref(&self) -> &str {
		self.as_str()
	}
}
impl Debug for CanonicalPayload {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "CanonicalPayload({})", self.0)
	}
}
impl Display for CanonicalPayload {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Secret + identity material used to compute request signatures. Immutable once built.
#[derive(Clone, Debug)]
pub struct SigningContext {
	secret: SharedSecret,
	identity: Identity,
}
impl SigningContext {
	/// Creates a context from a shared secret and identity.
	pub fn new(secret: SharedSecret, identity: Identity) -> Self {
		Self { secret, identity }
	}

	/// Identity bound into every signature.
	pub fn identity(&self) -> &Identity {
		&self.identity
	}

	/// Whether the context still carries the unconfigured placeholder secret.
	pub fn uses_placeholder_secret(&self) -> bool {
		self.secret.is_placeholder()
	}
}

/// Produces signatures and per-request envelopes from a [`SigningContext`].
#[derive(Clone, Debug)]
pub struct RequestSigner {
	context: Arc<SigningContext>,
}
impl RequestSigner {
	/// Creates a signer over the provided context.
	pub fn new(context: SigningContext) -> Self {
		Self { context: Arc::new(context) }
	}

	/// Borrow the underlying context.
	pub fn context(&self) -> &SigningContext {
		&self.context
	}

	/// Renders the exact message fed into the MAC.
	pub fn message(&self, canonical_payload: &str, timestamp: i64) -> String {
		let Identity { app_id, device_id } = &self.context.identity;

		format!(
			"{app_id}{SEPARATOR}{device_id}{SEPARATOR}{timestamp}{SEPARATOR}{canonical_payload}"
		)
	}

	/// Signs `canonical_payload` at `timestamp` (unix seconds) and returns padded base64.
	pub fn sign(&self, canonical_payload: &str, timestamp: i64) -> String {
		let mut mac = self.keyed_mac();

		mac.update(self.message(canonical_payload, timestamp).as_bytes());

		STANDARD.encode(mac.finalize().into_bytes())
	}

	/// Checks `signature` in constant time, mirroring what the server does.
	pub fn verify(&self, canonical_payload: &str, timestamp: i64, signature: &str) -> bool {
		let Ok(raw) = STANDARD.decode(signature) else {
			return false;
		};
		let mut mac = self.keyed_mac();

		mac.update(self.message(canonical_payload, timestamp).as_bytes());

		mac.verify_slice(&raw).is_ok()
	}

	/// Builds a fresh envelope for `payload` at `timestamp`.
	pub fn envelope(&self, payload: &CanonicalPayload, timestamp: i64) -> RequestEnvelope {
		let Identity { app_id, device_id } = self.context.identity.clone();

		RequestEnvelope {
			canonical_payload: payload.clone(),
			timestamp,
			signature: self.sign(payload.as_str(), timestamp),
			app_id,
			device_id,
		}
	}

	/// Builds a fresh envelope stamped with the clock's current unix time.
	pub fn envelope_now(&self, payload: &CanonicalPayload, clock: &dyn Clock) -> RequestEnvelope {
		self.envelope(payload, clock.now().unix_timestamp())
	}

	fn keyed_mac(&self) -> HmacSha256 {
		HmacSha256::new_from_slice(self.context.secret.expose().as_bytes())
			.expect("HMAC-SHA256 accepts keys of any length.")
	}
}

/// Authentication material attached to a single outbound call. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestEnvelope {
	/// Payload that was signed.
	pub canonical_payload: CanonicalPayload,
	/// Unix timestamp (seconds) bound into the signature.
	pub timestamp: i64,
	/// Base64 HMAC-SHA256 signature.
	pub signature: String,
	/// Application identifier bound into the signature.
	pub app_id: AppId,
	/// Device identifier bound into the signature.
	pub device_id: DeviceId,
}
impl RequestEnvelope {
	/// Authentication query parameters in wire order.
	pub fn query_pairs(&self) -> [(&'static str, String); 4] {
		[
			(PARAM_APP_ID, self.app_id.to_string()),
			(PARAM_DEVICE_ID, self.device_id.to_string()),
			(PARAM_TIMESTAMP, self.timestamp.to_string()),
			(PARAM_SIGNATURE, self.signature.clone()),
		]
	}

	/// Appends the authentication parameters to `url`'s query string.
	pub fn append_to(&self, url: &mut Url) {
		url.query_pairs_mut().extend_pairs(self.query_pairs());
	}
}
