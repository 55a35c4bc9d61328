//! Tagged success/failure envelope shared by the server and the façade.
//!
//! The server wraps every answer in `{success, message, data?, rateLimitRemaining?,
//! rateLimitReset?}`. The client hands the same shape to its callers, adding a
//! [`FailureKind`] tag so UI code can branch without string matching.

// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError};
use time::{PrimitiveDateTime, format_description::well_known::Rfc3339, macros::format_description};
// self
use crate::{_prelude::*, throttle::ThrottleStatus};

/// Stable failure tags carried by unsuccessful envelopes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
	/// Local throttle denied the call.
	RateLimited,
	/// Operation requires a signed-in session.
	Unauthenticated,
	/// Network, DNS, or timeout failure.
	TransportFailure,
	/// Non-2xx HTTP status.
	ServerError,
	/// Response body did not match the envelope shape.
	DeserializationFailure,
	/// 2xx response whose envelope reports `success: false`.
	Rejected,
	/// Local configuration or storage problem.
	Configuration,
}

/// Rate-limit metadata the server attached to an unsuccessful answer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ServerRateLimit {
	/// Calls the server still admits in its window.
	#[serde(default, rename = "rateLimitRemaining")]
	pub remaining: Option<u32>,
	/// Instant at which the server's window rolls over.
	#[serde(default, rename = "rateLimitReset", with = "reset_instant")]
	pub reset_at: Option<OffsetDateTime>,
}
impl ServerRateLimit {
	/// Reads the metadata out of an error body; anything unreadable yields no metadata.
	pub fn from_body(body: &[u8]) -> Self {
		serde_json::from_slice(body).unwrap_or_default()
	}

	/// Copies the metadata out of a decoded envelope.
	pub fn of<T>(envelope: &ApiResponse<T>) -> Self {
		Self { remaining: envelope.rate_limit_remaining, reset_at: envelope.rate_limit_reset }
	}
}

/// Response envelope returned by every façade operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
	/// Whether the call succeeded.
	pub success: bool,
	/// Human-readable message.
	#[serde(default)]
	pub message: String,
	/// Typed payload, when present.
	#[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	/// Calls still admissible in the current rate-limit window.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rate_limit_remaining: Option<u32>,
	/// Instant at which the rate-limit window rolls over.
	#[serde(default, with = "reset_instant", skip_serializing_if = "Option::is_none")]
	pub rate_limit_reset: Option<OffsetDateTime>,
	/// Failure tag; always `None` on success and never sent by the server.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub failure: Option<FailureKind>,
}
impl<T> ApiResponse<T> {
	/// Builds a successful envelope.
	pub fn success(message: impl Into<String>, data: T) -> Self {
		Self {
			success: true,
			message: message.into(),
			data: Some(data),
			rate_limit_remaining: None,
			rate_limit_reset: None,
			failure: None,
		}
	}

	/// Builds a failure envelope from a client error.
	///
	/// Rate-limit denials always carry `remaining = 0` and the window's reset instant. Server
	/// and rejection errors carry whatever metadata the server sent.
	pub fn failure(error: &Error) -> Self {
		let (rate_limit_remaining, rate_limit_reset) = match error {
			Error::RateLimited { reset_at } => (Some(0), Some(*reset_at)),
			Error::Server { rate_limit, .. } | Error::Rejected { rate_limit, .. } =>
				(rate_limit.remaining, rate_limit.reset_at),
			_ => (None, None),
		};

		Self {
			success: false,
			message: error.to_string(),
			data: None,
			rate_limit_remaining,
			rate_limit_reset,
			failure: Some(error.kind()),
		}
	}

	/// Collapses a result into an envelope.
	pub fn from_result(result: Result<Self>) -> Self {
		result.unwrap_or_else(|e| Self::failure(&e))
	}

	/// Fills missing rate-limit metadata from a local throttle observation.
	///
	/// Values already present (copied from the server) win.
	pub fn or_rate_limit(mut self, status: ThrottleStatus) -> Self {
		self.rate_limit_remaining.get_or_insert(status.remaining);
		self.rate_limit_reset.get_or_insert(status.reset_at);

		self
	}

	/// Whether the envelope reports success.
	pub fn is_success(&self) -> bool {
		self.success
	}
}

/// Reset instants serialize as RFC 3339.
///
/// On input, RFC 3339 is preferred; the `YYYY-MM-DD HH:MM:SS[.ffffff]` form emitted by older
/// server revisions is accepted and read as UTC.
mod reset_instant {
	// self
	use super::*;

	pub(super) fn serialize<S>(
		value: &Option<OffsetDateTime>,
		serializer: S,
	) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match value {
			Some(instant) => {
				let rendered = instant.format(&Rfc3339).map_err(serde::ser::Error::custom)?;

				serializer.serialize_some(&rendered)
			},
			None => serializer.serialize_none(),
		}
	}

	pub(super) fn deserialize<'de, D>(
		deserializer: D,
	) -> Result<Option<OffsetDateTime>, D::Error>
	where
		D: Deserializer<'de>,
	{
		let Some(raw) = Option::<String>::deserialize(deserializer)? else {
			return Ok(None);
		};

		parse(raw.trim()).map(Some).ok_or_else(|| {
			D::Error::custom(format!("unrecognized rate-limit reset timestamp `{raw}`"))
		})
	}

	pub(super) fn parse(raw: &str) -> Option<OffsetDateTime> {
		if let Ok(instant) = OffsetDateTime::parse(raw, &Rfc3339) {
			return Some(instant);
		}

		let with_fraction =
			format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]");
		let without_fraction = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

		PrimitiveDateTime::parse(raw, with_fraction)
			.or_else(|_| PrimitiveDateTime::parse(raw, without_fraction))
			.ok()
			.map(PrimitiveDateTime::assume_utc)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn decodes_server_envelope_with_rfc3339_reset() {
		let body = r#"{"success":true,"message":"Query successful","data":[1,2],"rateLimitRemaining":17,"rateLimitReset":"2023-11-14T22:18:20Z"}"#;
		let envelope: ApiResponse<Vec<u8>> =
			serde_json::from_str(body).expect("Envelope should decode.");

		assert!(envelope.success);
		assert_eq!(envelope.data, Some(vec![1, 2]));
		assert_eq!(envelope.rate_limit_remaining, Some(17));
		assert_eq!(
			envelope.rate_limit_reset.map(OffsetDateTime::unix_timestamp),
			Some(1_700_000_300)
		);
		assert_eq!(envelope.failure, None);
	}

	#[test]
	fn accepts_python_style_reset() {
		assert_eq!(
			reset_instant::parse("2023-11-14 22:18:20.123456").map(OffsetDateTime::unix_timestamp),
			Some(1_700_000_300)
		);
		assert_eq!(
			reset_instant::parse("2023-11-14 22:18:20").map(OffsetDateTime::unix_timestamp),
			Some(1_700_000_300)
		);
		assert!(reset_instant::parse("next tuesday").is_none());
	}

	#[test]
	fn missing_optional_fields_default() {
		let envelope: ApiResponse<Vec<u8>> =
			serde_json::from_str(r#"{"success":false}"#).expect("Minimal envelope should decode.");

		assert!(!envelope.success);
		assert!(envelope.message.is_empty());
		assert_eq!(envelope.data, None);
		assert_eq!(envelope.rate_limit_reset, None);
	}

	#[test]
	fn rate_limited_failure_reports_zero_remaining() {
		let reset_at = OffsetDateTime::UNIX_EPOCH + Duration::minutes(5);
		let envelope = <ApiResponse<()>>::failure(&Error::RateLimited { reset_at });

		assert!(!envelope.success);
		assert_eq!(envelope.failure, Some(FailureKind::RateLimited));
		assert_eq!(envelope.rate_limit_remaining, Some(0));
		assert_eq!(envelope.rate_limit_reset, Some(reset_at));
		assert_eq!(envelope.message, "Rate limit exceeded. Please try again later.");
	}

	#[test]
	fn server_metadata_wins_over_local_status() {
		let local = ThrottleStatus {
			remaining: 12,
			reset_at: OffsetDateTime::UNIX_EPOCH + Duration::minutes(5),
		};
		let mut envelope = ApiResponse::success("ok", ());

		envelope.rate_limit_remaining = Some(3);

		let merged = envelope.or_rate_limit(local);

		assert_eq!(merged.rate_limit_remaining, Some(3));
		assert_eq!(merged.rate_limit_reset, Some(local.reset_at));
	}

	#[test]
	fn server_metadata_survives_failures() {
		let rate_limit = ServerRateLimit::from_body(
			br#"{"success":false,"message":"Rate limit exceeded","rateLimitRemaining":0,"rateLimitReset":"2023-11-14T22:20:00Z"}"#,
		);

		assert_eq!(rate_limit.remaining, Some(0));
		assert_eq!(rate_limit.reset_at.map(OffsetDateTime::unix_timestamp), Some(1_700_000_400));

		let local = ThrottleStatus {
			remaining: 19,
			reset_at: OffsetDateTime::UNIX_EPOCH + Duration::minutes(5),
		};
		let envelope = <ApiResponse<()>>::failure(&Error::Server {
			status: 429,
			message: "Rate limit exceeded".into(),
			rate_limit,
		})
		.or_rate_limit(local);

		assert_eq!(envelope.failure, Some(FailureKind::ServerError));
		assert_eq!(envelope.rate_limit_remaining, Some(0));
		assert_eq!(envelope.rate_limit_reset, rate_limit.reset_at);
	}

	#[test]
	fn unreadable_error_body_has_no_metadata() {
		assert_eq!(ServerRateLimit::from_body(b"<html>"), ServerRateLimit::default());
		assert_eq!(ServerRateLimit::from_body(b""), ServerRateLimit::default());
	}

	#[test]
	fn serializes_reset_as_rfc3339() {
		let envelope = ApiResponse::success("ok", ()).or_rate_limit(ThrottleStatus {
			remaining: 19,
			reset_at: OffsetDateTime::UNIX_EPOCH,
		});
		let json = serde_json::to_value(&envelope).expect("Envelope should serialize.");

		assert_eq!(json["rateLimitReset"], "1970-01-01T00:00:00Z");
		assert_eq!(json["rateLimitRemaining"], 19);
		assert!(json.get("failure").is_none());
	}
}
