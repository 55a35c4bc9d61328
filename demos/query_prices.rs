//! Demonstrates building a client from `appsettings.json`-style settings, querying prices from
//! a mock deployment, and switching to the offline catalog.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use amp_client::{
	api::{ItemQuery, SeriesQuery},
	client::PriceClient,
	config::ClientConfig,
	store::MemoryDeviceStore,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let prices_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/prod/prices").query_param_exists("signature");
			then.status(200).header("content-type", "application/json").body(
				r#"{"success":true,"message":"Query successful","data":[{"SeriesId":"SERIES-LABUBU-001","ProductId":"PROD-LABUBU-001","ProductName":"Labubu The Monsters - Red Devil","IpCharacter":"Labubu","SeriesName":"The Monsters","Rarity":"Secret","Category":"Blind Box","RetailPrice":"69","AfterMarketPrice":"599"}],"rateLimitRemaining":99,"rateLimitReset":"2024-06-01 12:05:00.000000"}"#,
			);
		})
		.await;
	let settings = format!(
		r#"{{"AWS":{{"ApiGateway":{{"BaseUrl":"{}","AppSecret":"demo-secret"}}}}}}"#,
		server.url("/prod")
	);
	let config = ClientConfig::from_json(&settings, "appsettings.json")?;
	let client = PriceClient::from_config(&config, &MemoryDeviceStore::default())?;
	let response = client.query_items(&ItemQuery::new().ip_character("Labubu")).await;

	println!("{} ({} calls left).", response.message, response.rate_limit_remaining.unwrap_or(0));

	for item in response.data.unwrap_or_default() {
		println!(
			"{}: {:.0} -> {:.0} ({:+.1}%).",
			item.product_name,
			item.retail_price,
			item.after_market_price,
			item.price_change_percent().unwrap_or_default()
		);
	}

	prices_mock.assert_async().await;

	let offline = client.with_demo_mode(true);
	let series = offline.query_series(&SeriesQuery::for_character("Hirono")).await;

	for entry in series.data.unwrap_or_default() {
		println!("{} ({}, {} items).", entry.series_name, entry.release_date, entry.total_items);
	}

	println!("Local budget: {:?}.", offline.rate_limit_status());

	Ok(())
}
