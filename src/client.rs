//! Query façade composing the request signer, throttle window, and transport.

pub mod common;

mod query;
mod upload;

// self
use crate::{
	_prelude::*,
	auth::{AuthSession, Identity},
	demo::DemoCatalog,
	http::ApiHttpClient,
	sign::RequestSigner,
	throttle::{Clock, SystemClock, ThrottleStatus, ThrottleWindow},
};
#[cfg(feature = "reqwest")]
use crate::{
	auth::SharedSecret, config::ClientConfig, http::ReqwestHttpClient, obs, sign::SigningContext,
	store::DeviceStore,
};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestPriceClient = PriceClient<ReqwestHttpClient>;

/// Signed, throttled client for the price service.
///
/// The client owns shared handles to the transport, throttle window, session, and clock so
/// several clients (or UI components) can observe the same budget and sign-in state. Every
/// operation returns an [`ApiResponse`](crate::api::ApiResponse); failures are reported through
/// its `success`/`failure` fields rather than as `Err`.
#[derive(Clone)]
pub struct PriceClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// HTTP transport used for every outbound call.
	pub http_client: Arc<C>,
	/// Fixed-window limiter consulted before signing.
	pub throttle: Arc<ThrottleWindow>,
	/// Sign-in state consulted before uploads.
	pub session: Arc<AuthSession>,
	signer: RequestSigner,
	clock: Arc<dyn Clock>,
	base_url: Url,
	demo: Option<DemoCatalog>,
}
impl<C> PriceClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client over a caller-provided transport.
	///
	/// Timestamps come from the system clock; use [`PriceClient::with_clock`] to share the
	/// throttle's clock instead.
	pub fn with_http_client(
		base_url: Url,
		signer: RequestSigner,
		throttle: Arc<ThrottleWindow>,
		session: Arc<AuthSession>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			throttle,
			session,
			signer,
			clock: Arc::new(SystemClock),
			base_url,
			demo: None,
		}
	}

	/// Replaces the clock used for request timestamps.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Serves queries from the built-in offline catalog instead of the network.
	pub fn with_demo_mode(mut self, enabled: bool) -> Self {
		self.demo = enabled.then(DemoCatalog::standard);

		self
	}

	/// Serves queries from a caller-provided offline catalog.
	pub fn with_demo_catalog(mut self, catalog: DemoCatalog) -> Self {
		self.demo = Some(catalog);

		self
	}

	/// Whether queries are served offline.
	pub fn is_demo_mode(&self) -> bool {
		self.demo.is_some()
	}

	/// Service root every endpoint path is appended to.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Identity bound into every signature.
	pub fn identity(&self) -> &Identity {
		self.signer.context().identity()
	}

	/// Reports the remaining throttle budget without consuming a slot.
	pub fn rate_limit_status(&self) -> ThrottleStatus {
		self.throttle.status()
	}
}
#[cfg(feature = "reqwest")]
impl PriceClient<ReqwestHttpClient> {
	/// Builds a client from configuration, resolving (and persisting) the device identifier
	/// through `store`.
	pub fn from_config(config: &ClientConfig, store: &dyn DeviceStore) -> Result<Self> {
		let identity = Identity::resolve(config.app_id.clone(), store)?;
		let secret = config.app_secret.clone().unwrap_or_else(SharedSecret::placeholder);

		if secret.is_placeholder() {
			obs::warn_placeholder_secret();
		}

		let clock: Arc<dyn Clock> = Arc::new(SystemClock);
		let throttle = ThrottleWindow::with_limits(
			clock.clone(),
			config.rate_limit.max_requests,
			config.rate_limit.window,
		)?;
		let base_url = common::validate_base_url(config.base_url.clone())?;
		let http_client = ReqwestHttpClient::with_timeout(config.request_timeout)?;
		let client = Self::with_http_client(
			base_url,
			RequestSigner::new(SigningContext::new(secret, identity)),
			Arc::new(throttle),
			Arc::new(AuthSession::default()),
			http_client,
		)
		.with_clock(clock)
		.with_demo_mode(config.demo_mode);

		Ok(client)
	}
}
impl<C> Debug for PriceClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PriceClient")
			.field("base_url", &self.base_url.as_str())
			.field("identity", self.identity())
			.field("throttle", &self.throttle)
			.field("demo_mode", &self.is_demo_mode())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::BTreeMap;
	// self
	use super::*;
	use crate::{
		_preludet::*,
		api::{FailureKind, ItemQuery, SeriesQuery},
		auth::Role,
		demo::DemoCatalog,
		error::TransportError,
		http::{HttpFuture, HttpMethod, HttpRequest, HttpResponse},
		throttle::DEFAULT_LIMIT,
	};

	/// Transport that records requests and replays one canned response.
	#[derive(Debug)]
	struct CannedTransport {
		status: u16,
		body: &'static str,
		requests: Mutex<Vec<HttpRequest>>,
	}
	impl CannedTransport {
		fn new(status: u16, body: &'static str) -> Self {
			Self { status, body, requests: Mutex::new(Vec::new()) }
		}

		fn calls(&self) -> usize {
			self.requests.lock().len()
		}
	}
	impl ApiHttpClient for CannedTransport {
		fn execute(&self, request: HttpRequest) -> HttpFuture<'_> {
			self.requests.lock().push(request);

			let response = HttpResponse { status: self.status, body: self.body.as_bytes().to_vec() };

			Box::pin(async move { Ok::<_, TransportError>(response) })
		}
	}

	const EMPTY_OK: &str = r#"{"success":true,"message":"Query successful","data":[]}"#;

	#[tokio::test]
	async fn query_signs_with_injected_clock() {
		let transport = Arc::new(CannedTransport::new(200, EMPTY_OK));
		let (client, _clock, _session) =
			build_test_client::<CannedTransport>("https://api.example.com/prod", transport.clone());
		let response = client.query_items(&ItemQuery::new()).await;

		assert!(response.success, "Query should succeed: {}.", response.message);
		assert_eq!(response.data, Some(Vec::new()));
		assert_eq!(response.rate_limit_remaining, Some(DEFAULT_LIMIT - 1));

		let requests = transport.requests.lock();
		let request = &requests[0];
		let params = request.url.query_pairs().into_owned().collect::<BTreeMap<_, _>>();

		assert_eq!(request.method, HttpMethod::Get);
		assert_eq!(request.url.path(), "/prod/prices");
		assert_eq!(params["timestamp"], TEST_EPOCH.to_string());
		assert_eq!(params["limit"], "50");
		assert!(test_signer().verify("GET:/prices", TEST_EPOCH, &params["signature"]));
	}

	#[tokio::test]
	async fn throttle_denial_skips_transport() {
		let transport = Arc::new(CannedTransport::new(200, EMPTY_OK));
		let (client, _clock, _session) =
			build_test_client::<CannedTransport>("https://api.example.com/prod", transport.clone());

		for _ in 0..DEFAULT_LIMIT {
			assert!(client.query_series(&SeriesQuery::new()).await.success);
		}

		let denied = client.query_series(&SeriesQuery::new()).await;

		assert_eq!(denied.failure, Some(FailureKind::RateLimited));
		assert_eq!(denied.rate_limit_remaining, Some(0));
		assert_eq!(transport.calls(), DEFAULT_LIMIT as usize);
	}

	#[tokio::test]
	async fn upload_requires_sign_in_before_throttle() {
		let transport = Arc::new(CannedTransport::new(200, r#"{"success":true,"message":"Saved"}"#));
		let (client, _clock, session) =
			build_test_client::<CannedTransport>("https://api.example.com/prod", transport.clone());
		let item = DemoCatalog::standard().items(&ItemQuery::new().limit(1)).remove(0);
		let refused = client.upload_item(&item).await;

		assert_eq!(refused.failure, Some(FailureKind::Unauthenticated));
		assert_eq!(refused.message, "Authentication required. Please sign in to upload data.");
		assert_eq!(client.rate_limit_status().remaining, DEFAULT_LIMIT);
		assert_eq!(transport.calls(), 0);

		session.sign_in(Role::User, "collector", "user-1");

		let accepted = client.upload_item(&item).await;

		assert!(accepted.success);
		assert_eq!(accepted.data, Some(true));
		assert_eq!(client.rate_limit_status().remaining, DEFAULT_LIMIT - 1);

		let requests = transport.requests.lock();

		assert_eq!(requests[0].method, HttpMethod::Post);
		assert!(requests[0].body.as_deref().is_some_and(|body| body.starts_with(b"{\"SeriesId\"")));
	}

	#[tokio::test]
	async fn demo_mode_stays_offline() {
		let transport = Arc::new(CannedTransport::new(500, ""));
		let (client, _clock, _session) =
			build_test_client::<CannedTransport>("https://api.example.com/prod", transport.clone());
		let client = client.with_demo_mode(true);
		let response = client.query_series(&SeriesQuery::for_character("Molly")).await;

		assert!(client.is_demo_mode());
		assert!(response.success);
		assert_eq!(response.data.map(|series| series.len()), Some(2));
		assert_eq!(transport.calls(), 0);
	}
}
