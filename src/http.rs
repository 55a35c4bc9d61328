//! Transport primitives for calls to the price service.
//!
//! The module exposes [`ApiHttpClient`] alongside [`HttpRequest`] and [`HttpResponse`] so
//! downstream crates can plug in custom HTTP stacks (or canned transports in tests) without
//! touching signing or throttling. Implementations only move bytes: status interpretation and
//! envelope decoding stay in [`PriceClient`](crate::client::PriceClient).

// std
#[cfg(feature = "reqwest")] use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Default per-request timeout applied by [`ReqwestHttpClient`].
pub const DEFAULT_TIMEOUT: Duration = Duration::seconds(30);

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type HttpFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// HTTP methods used by the price service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// Read-only query.
	Get,
	/// Upload.
	Post,
}
impl HttpMethod {
	/// Upper-case method token as it appears on the wire and in canonical payloads.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully built outbound request; the URL already carries authentication parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
	/// Request method.
	pub method: HttpMethod,
	/// Absolute URL including the query string.
	pub url: Url,
	/// Optional JSON body.
	pub body: Option<Vec<u8>>,
}
impl HttpRequest {
	/// Builds a body-less GET request.
	pub fn get(url: Url) -> Self {
		Self { method: HttpMethod::Get, url, body: None }
	}

	/// Builds a POST request carrying a JSON body.
	pub fn post_json(url: Url, body: Vec<u8>) -> Self {
		Self { method: HttpMethod::Post, url, body: Some(body) }
	}
}

/// Raw response handed back by a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Whether the status is in the 2xx range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Abstraction over HTTP transports capable of executing price-service calls.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared behind an
/// `Arc` by every client instance, and the returned futures must be `Send` so callers can hop
/// executors. Network, DNS, and timeout failures map to [`TransportError`]; any HTTP status,
/// including non-2xx, is a successful transport outcome.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Executes `request` and returns the raw response.
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] with an explicit per-request timeout.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient {
	client: ReqwestClient,
	timeout: Duration,
}
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds a client that aborts requests after `timeout`.
	pub fn with_timeout(timeout: Duration) -> Result<Self, ConfigError> {
		let std_timeout = StdDuration::try_from(timeout)
			.map_err(|_| ConfigError::NonPositive { field: "request_timeout" })?;

		if std_timeout.is_zero() {
			return Err(ConfigError::NonPositive { field: "request_timeout" });
		}

		let client = ReqwestClient::builder().timeout(std_timeout).build()?;

		Ok(Self { client, timeout })
	}

	/// Wraps an existing reqwest [`ReqwestClient`]; `timeout` is only used for error reporting,
	/// so configure the same value on the client itself.
	pub fn with_client(client: ReqwestClient, timeout: Duration) -> Self {
		Self { client, timeout }
	}

	/// Configured per-request timeout.
	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	fn map_error(&self, err: ReqwestError) -> TransportError {
		if err.is_timeout() {
			TransportError::Timeout { timeout: self.timeout }
		} else {
			TransportError::network(err)
		}
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.client
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_> {
		Box::pin(async move {
			let HttpRequest { method, url, body } = request;
			let mut builder = match method {
				HttpMethod::Get => self.client.get(url),
				HttpMethod::Post => self.client.post(url),
			};

			if let Some(body) = body {
				builder = builder.header(reqwest::header::CONTENT_TYPE, "application/json").body(body);
			}

			let response = builder.send().await.map_err(|e| self.map_error(e))?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(|e| self.map_error(e))?.to_vec();

			Ok(HttpResponse { status, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn success_range() {
		assert!(HttpResponse { status: 204, body: Vec::new() }.is_success());
		assert!(!HttpResponse { status: 429, body: Vec::new() }.is_success());
		assert!(!HttpResponse { status: 302, body: Vec::new() }.is_success());
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn rejects_non_positive_timeouts() {
		assert!(ReqwestHttpClient::with_timeout(Duration::ZERO).is_err());
		assert!(ReqwestHttpClient::with_timeout(Duration::seconds(-1)).is_err());

		let client = ReqwestHttpClient::with_timeout(Duration::seconds(5))
			.expect("Positive timeout should build a client.");

		assert_eq!(client.timeout(), Duration::seconds(5));
	}
}
