//! Shared request pipeline: throttle, sign, build the URL, send, and interpret the envelope.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	api::{ApiResponse, Endpoint, ServerRateLimit},
	client::PriceClient,
	demo::DemoCatalog,
	error::ConfigError,
	http::{ApiHttpClient, HttpMethod, HttpRequest, HttpResponse},
	obs::{self, CallOutcome},
	sign::RequestEnvelope,
	throttle::{ThrottleDecision, ThrottleStatus},
};

/// Filter parameters appended after the authentication parameters.
pub type QueryPairs = Vec<(&'static str, String)>;

/// Message attached to responses served from the offline catalog.
pub const DEMO_MESSAGE: &str = "Served from the offline demo catalog.";

const MAX_ERROR_BODY_CHARS: usize = 200;

impl<C> PriceClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Runs one call through the pipeline and folds every outcome into an envelope.
	///
	/// Permitted calls always carry rate-limit metadata: the server's values when it sent them,
	/// the local window otherwise.
	pub(crate) async fn dispatch<T, F>(
		&self,
		endpoint: Endpoint,
		filters: QueryPairs,
		body: Option<Vec<u8>>,
		offline: F,
	) -> ApiResponse<T>
	where
		T: DeserializeOwned,
		F: FnOnce(&DemoCatalog) -> T,
	{
		obs::record_call_outcome(endpoint, CallOutcome::Attempt);

		let status = match self.acquire(endpoint) {
			Ok(status) => status,
			Err(e) => {
				obs::record_call_outcome(endpoint, CallOutcome::Throttled);

				return ApiResponse::failure(&e);
			},
		};
		let result = match &self.demo {
			Some(catalog) => Ok(ApiResponse::success(DEMO_MESSAGE, offline(catalog))),
			None => self.send(endpoint, &filters, body).await,
		};

		obs::record_call_outcome(endpoint, CallOutcome::of(&result));

		ApiResponse::from_result(result).or_rate_limit(status)
	}

	fn acquire(&self, endpoint: Endpoint) -> Result<ThrottleStatus> {
		match self.throttle.try_acquire() {
			ThrottleDecision::Permitted(status) => Ok(status),
			ThrottleDecision::Denied { reset_at } => {
				obs::warn_throttled(endpoint, reset_at);

				Err(Error::RateLimited { reset_at })
			},
		}
	}

	async fn send<T>(
		&self,
		endpoint: Endpoint,
		filters: &[(&'static str, String)],
		body: Option<Vec<u8>>,
	) -> Result<ApiResponse<T>>
	where
		T: DeserializeOwned,
	{
		let envelope = self.signer.envelope_now(&endpoint.canonical_payload(), self.clock.as_ref());
		let url = endpoint_url(&self.base_url, endpoint, &envelope, filters)?;
		let request = match endpoint.method() {
			HttpMethod::Get => HttpRequest::get(url),
			HttpMethod::Post => HttpRequest::post_json(url, body.unwrap_or_default()),
		};
		let response = self.http_client.execute(request).await?;

		interpret(response)
	}
}

/// Rejects base URLs that cannot carry path segments.
pub fn validate_base_url(base_url: Url) -> Result<Url, ConfigError> {
	if base_url.cannot_be_a_base() {
		return Err(ConfigError::UnusableBaseUrl { url: base_url.into() });
	}

	Ok(base_url)
}

/// Appends the endpoint path to `base_url` (keeping any stage prefix such as `/prod`), then the
/// authentication parameters, then `filters`.
pub fn endpoint_url(
	base_url: &Url,
	endpoint: Endpoint,
	envelope: &RequestEnvelope,
	filters: &[(&'static str, String)],
) -> Result<Url, ConfigError> {
	let mut url = base_url.clone();

	url.path_segments_mut()
		.map_err(|_| ConfigError::UnusableBaseUrl { url: base_url.to_string() })?
		.pop_if_empty()
		.extend(endpoint.path().split('/').filter(|segment| !segment.is_empty()));
	url.set_fragment(None);
	envelope.append_to(&mut url);

	if !filters.is_empty() {
		url.query_pairs_mut()
			.extend_pairs(filters.iter().map(|(key, value)| (*key, value.as_str())));
	}

	Ok(url)
}

/// Maps a raw response onto the envelope or the matching error.
///
/// Rate-limit metadata sent alongside a failure travels with the error.
pub fn interpret<T>(response: HttpResponse) -> Result<ApiResponse<T>>
where
	T: DeserializeOwned,
{
	if !response.is_success() {
		return Err(Error::Server {
			status: response.status,
			message: server_message(&response.body),
			rate_limit: ServerRateLimit::from_body(&response.body),
		});
	}

	let status = response.status;
	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);
	let envelope: ApiResponse<T> = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| Error::Deserialization { source, status })?;

	if !envelope.success {
		let rate_limit = ServerRateLimit::of(&envelope);

		return Err(Error::Rejected { message: envelope.message, rate_limit });
	}

	Ok(envelope)
}

fn server_message(body: &[u8]) -> String {
	#[derive(Deserialize)]
	struct ErrorBody {
		message: String,
	}

	if let Ok(ErrorBody { message }) = serde_json::from_slice::<ErrorBody>(body) {
		let message = message.trim().trim_end_matches('.');

		if !message.is_empty() {
			return message.to_owned();
		}
	}

	let text = String::from_utf8_lossy(body);
	let text = text.trim();

	if text.is_empty() {
		"empty response body".into()
	} else {
		text.chars().take(MAX_ERROR_BODY_CHARS).collect()
	}
}
