//! Price uploads, restricted to signed-in sessions.

// self
use crate::{
	_prelude::*,
	api::{ApiResponse, Endpoint, Item},
	client::PriceClient,
	error::ConfigError,
	http::ApiHttpClient,
	obs::{self, CallOutcome, CallSpan},
};

impl<C> PriceClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Sends `item` to `POST /prices`.
	///
	/// Visitors are turned away with [`Error::Unauthenticated`] before the throttle is consulted,
	/// so a refused upload never spends a slot. The server may omit `data`; an accepted upload
	/// always reports `Some(true)`.
	pub async fn upload_item(&self, item: &Item) -> ApiResponse<bool> {
		const ENDPOINT: Endpoint = Endpoint::UploadPrice;

		let span = CallSpan::new(ENDPOINT, "upload_item");

		span.instrument(async move {
			if !self.session.is_authenticated() {
				obs::record_call_outcome(ENDPOINT, CallOutcome::Attempt);
				obs::record_call_outcome(ENDPOINT, CallOutcome::Failure);

				return ApiResponse::failure(&Error::Unauthenticated);
			}

			let body = match serde_json::to_vec(item) {
				Ok(body) => body,
				Err(e) => return ApiResponse::failure(&ConfigError::from(e).into()),
			};
			let mut response = self
				.dispatch(ENDPOINT, Vec::new(), Some(body), |_| true)
				.await;

			if response.success {
				response.data.get_or_insert(true);
			}

			response
		})
		.await
	}
}
