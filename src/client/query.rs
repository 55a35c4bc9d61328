//! Read-only queries available to every session, including visitors.

// self
use crate::{
	api::{ApiResponse, Endpoint, Item, ItemQuery, Series, SeriesQuery},
	client::PriceClient,
	http::ApiHttpClient,
	obs::CallSpan,
};

impl<C> PriceClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Fetches item price records matching `query` from `GET /prices`.
	pub async fn query_items(&self, query: &ItemQuery) -> ApiResponse<Vec<Item>> {
		const ENDPOINT: Endpoint = Endpoint::Prices;

		let span = CallSpan::new(ENDPOINT, "query_items");

		span.instrument(async move {
			let filters = match query.query_pairs() {
				Ok(filters) => filters,
				Err(e) => return ApiResponse::failure(&e.into()),
			};

			self.dispatch(ENDPOINT, filters, None, |catalog| catalog.items(query)).await
		})
		.await
	}

	/// Fetches series metadata matching `query` from `GET /series`.
	pub async fn query_series(&self, query: &SeriesQuery) -> ApiResponse<Vec<Series>> {
		const ENDPOINT: Endpoint = Endpoint::Series;

		let span = CallSpan::new(ENDPOINT, "query_series");

		span.instrument(async move {
			self.dispatch(ENDPOINT, query.query_pairs(), None, |catalog| catalog.series(query))
				.await
		})
		.await
	}
}
