//! Signed, throttled client for the after-market price service: HMAC request signing and
//! fixed-window rate limiting in front of typed price and series queries.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod demo;
pub mod error;
pub mod http;
pub mod obs;
pub mod sign;
pub mod store;
pub mod throttle;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{AppId, AuthSession, DeviceId, Identity, SharedSecret},
		client::PriceClient,
		http::ApiHttpClient,
		sign::{RequestSigner, SigningContext},
		throttle::{ManualClock, ThrottleWindow},
	};

	/// Fixed instant every test clock starts from (2023-11-14T22:13:20Z).
	pub const TEST_EPOCH: i64 = 1_700_000_000;

	/// Builds the `app-1`/`dev-1` identity used across tests.
	pub fn test_identity() -> Identity {
		Identity::new(
			AppId::new("app-1").expect("Test application identifier should be valid."),
			DeviceId::new("dev-1").expect("Test device identifier should be valid."),
		)
	}

	/// Builds a signer keyed by `s3cr3t` over [`test_identity`].
	pub fn test_signer() -> RequestSigner {
		RequestSigner::new(SigningContext::new(SharedSecret::new("s3cr3t"), test_identity()))
	}

	/// Returns a manual clock pinned at [`TEST_EPOCH`].
	pub fn test_clock() -> Arc<ManualClock> {
		Arc::new(ManualClock::at_unix(TEST_EPOCH))
	}

	/// Wires a [`PriceClient`] around the provided transport, a manual clock, and a visitor
	/// session so tests can drive time and authentication explicitly.
	pub fn build_test_client<C>(
		base_url: &str,
		http_client: impl Into<Arc<C>>,
	) -> (PriceClient<C>, Arc<ManualClock>, Arc<AuthSession>)
	where
		C: ?Sized + ApiHttpClient,
	{
		let clock = test_clock();
		let throttle = Arc::new(ThrottleWindow::new(clock.clone()));
		let session = Arc::new(AuthSession::default());
		let client = PriceClient::with_http_client(
			Url::parse(base_url).expect("Test base URL should parse."),
			test_signer(),
			throttle,
			session.clone(),
			http_client,
		)
		.with_clock(clock.clone());

		(client, clock, session)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Date, Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
