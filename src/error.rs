//! Client-level error types shared across signing, throttling, transport, and storage.

// self
use crate::{
	_prelude::*,
	api::{FailureKind, ServerRateLimit},
};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Device identifier persistence failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The local throttle window is exhausted; nothing was sent.
	#[error("Rate limit exceeded. Please try again later.")]
	RateLimited {
		/// Instant at which the current window rolls over.
		reset_at: OffsetDateTime,
	},
	/// Operation requires a signed-in session.
	#[error("Authentication required. Please sign in to upload data.")]
	Unauthenticated,
	/// Server answered with a non-success HTTP status.
	#[error("API error: HTTP {status}: {message}.")]
	Server {
		/// HTTP status code.
		status: u16,
		/// Server-supplied message, or the canonical reason phrase.
		message: String,
		/// Rate-limit metadata found in the error body, if any.
		rate_limit: ServerRateLimit,
	},
	/// Response body does not match the envelope shape.
	#[error("Response body could not be decoded: {source}.")]
	Deserialization {
		/// Structured parsing failure including the offending JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Server answered 2xx but flagged the envelope as unsuccessful.
	#[error("Server rejected the request: {message}.")]
	Rejected {
		/// Server-supplied message.
		message: String,
		/// Rate-limit metadata carried by the rejected envelope.
		rate_limit: ServerRateLimit,
	},
}
impl Error {
	/// Returns the stable failure tag surfaced in response envelopes.
	pub fn kind(&self) -> FailureKind {
		match self {
			Self::Storage(_) | Self::Config(_) => FailureKind::Configuration,
			Self::Transport(_) => FailureKind::TransportFailure,
			Self::RateLimited { .. } => FailureKind::RateLimited,
			Self::Unauthenticated => FailureKind::Unauthenticated,
			Self::Server { .. } => FailureKind::ServerError,
			Self::Deserialization { .. } => FailureKind::DeserializationFailure,
			Self::Rejected { .. } => FailureKind::Rejected,
		}
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL or endpoint URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL cannot carry path segments (e.g. `mailto:`).
	#[error("Base URL `{url}` cannot be used as an API root.")]
	UnusableBaseUrl {
		/// Offending URL.
		url: String,
	},
	/// Configured identifier failed validation.
	#[error("Configured identifier is invalid.")]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
	/// Configuration file exists but could not be read.
	#[error("Failed to read configuration file {path}.")]
	Read {
		/// Path that failed.
		path: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Configuration file is not valid JSON for the expected shape.
	#[error("Failed to parse configuration file {path}.")]
	Parse {
		/// Path that failed.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Request body could not be encoded.
	#[error("Request body could not be encoded.")]
	Encode(#[from] serde_json::Error),
	/// Date filter could not be rendered.
	#[error("Date filter could not be formatted.")]
	DateFormat(#[from] time::error::Format),
	/// Numeric configuration value is outside the supported range.
	#[error("Configuration value `{field}` must be positive.")]
	NonPositive {
		/// Offending field name.
		field: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, timeout).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Request failed: {source}")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request exceeded the configured timeout.
	#[error("Request timed out after {timeout}.")]
	Timeout {
		/// Timeout that elapsed.
		timeout: Duration,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the price service.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn kinds_cover_taxonomy() {
		let reset_at = OffsetDateTime::UNIX_EPOCH;

		assert_eq!(Error::RateLimited { reset_at }.kind(), FailureKind::RateLimited);
		assert_eq!(Error::Unauthenticated.kind(), FailureKind::Unauthenticated);
		assert_eq!(
			Error::Server {
				status: 502,
				message: "Bad Gateway".into(),
				rate_limit: ServerRateLimit::default(),
			}
			.kind(),
			FailureKind::ServerError
		);
		assert_eq!(
			Error::from(TransportError::Timeout { timeout: Duration::seconds(3) }).kind(),
			FailureKind::TransportFailure
		);
	}

	#[test]
	fn server_error_message_carries_status() {
		let err = Error::Server {
			status: 503,
			message: "Service Unavailable".into(),
			rate_limit: ServerRateLimit::default(),
		};

		assert_eq!(err.to_string(), "API error: HTTP 503: Service Unavailable.");
	}

	#[test]
	fn network_error_keeps_raw_message() {
		let io = std::io::Error::other("connection refused");
		let err = Error::from(TransportError::network(io));

		assert_eq!(err.to_string(), "Request failed: connection refused");
	}

	#[test]
	fn deserialization_message_names_the_json_path() {
		let mut deserializer = serde_json::Deserializer::from_str(r#"{"success":"yes"}"#);
		let source = serde_path_to_error::deserialize::<_, crate::api::ApiResponse<()>>(
			&mut deserializer,
		)
		.expect_err("A string is not a boolean.");
		let err = Error::Deserialization { source, status: 200 };

		assert!(err.to_string().starts_with("Response body could not be decoded: success: "));
		assert_eq!(err.kind(), FailureKind::DeserializationFailure);
	}
}
