//! Offline catalog served when demo mode is switched on explicitly.
//!
//! Demo mode never kicks in on its own: transport and parse failures always surface as errors.

// crates.io
use time::{format_description::FormatItem, macros::format_description};
// self
use crate::{
	_prelude::*,
	api::{Item, ItemQuery, Series, SeriesQuery},
};

const DEMO_UPDATED_AT: &str = "2024-06-01T00:00:00Z";
const DEMO_CURRENCY: &str = "CNY";
const DEMO_RETAIL_PRICE: f64 = 69.0;
const DATE_PREFIX: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

// (series id, series name, character, [(product suffix, rarity, after-market price)])
type SeriesSeed =
	(&'static str, &'static str, &'static str, &'static [(&'static str, &'static str, f64)]);

const ITEM_SEEDS: &[SeriesSeed] = &[
	(
		"SERIES-LABUBU-001",
		"The Monsters",
		"Labubu",
		&[
			("Red Devil", "Secret", 599.0),
			("Blue Fairy", "Rare", 299.0),
			("Pink Angel", "Common", 129.0),
			("Green Dragon", "Common", 99.0),
			("Yellow Duck", "Common", 89.0),
			("Purple Ghost", "Rare", 259.0),
		],
	),
	(
		"SERIES-HIRONO-001",
		"Winter Collection",
		"Hirono",
		&[
			("Snowflake", "Secret", 499.0),
			("Igloo", "Rare", 199.0),
			("Scarf", "Common", 119.0),
			("Mittens", "Common", 99.0),
			("Hot Cocoa", "Common", 109.0),
		],
	),
	(
		"SERIES-MOLLY-001",
		"Forest Fantasy",
		"Molly",
		&[
			("Mushroom Queen", "Secret", 559.0),
			("Fairy Wings", "Rare", 279.0),
			("Flower Crown", "Common", 129.0),
			("Butterfly Friend", "Common", 99.0),
			("Tree Spirit", "Rare", 229.0),
		],
	),
	(
		"SERIES-SKULL-001",
		"City Night",
		"Skullpanda",
		&[
			("Neon Dreams", "Secret", 699.0),
			("Midnight Run", "Rare", 319.0),
			("Street Light", "Common", 139.0),
			("Taxi Ride", "Common", 109.0),
			("Urban Explorer", "Common", 119.0),
		],
	),
];

// (series id, series name, character, release month, total items)
const SERIES_SEEDS: &[(&str, &str, &str, &str, u32)] = &[
	("SERIES-LABUBU-001", "The Monsters", "Labubu", "2024-01", 12),
	("SERIES-LABUBU-002", "Little Mischief", "Labubu", "2024-06", 10),
	("SERIES-HIRONO-001", "Winter Collection", "Hirono", "2023-12", 8),
	("SERIES-HIRONO-002", "The Other One", "Hirono", "2024-03", 9),
	("SERIES-HIRONO-003", "Little Princess", "Hirono", "2024-08", 10),
	("SERIES-MOLLY-001", "Forest Fantasy", "Molly", "2024-02", 10),
	("SERIES-MOLLY-002", "Reshape", "Molly", "2024-05", 12),
	("SERIES-SKULL-001", "City Night", "Skullpanda", "2024-04", 9),
];

/// Deterministic in-memory catalog that answers the same filters as the live service.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DemoCatalog {
	items: Vec<Item>,
	series: Vec<Series>,
}
impl DemoCatalog {
	/// Creates a catalog from explicit records.
	pub fn new(items: Vec<Item>, series: Vec<Series>) -> Self {
		Self { items, series }
	}

	/// Built-in catalog covering the Labubu, Hirono, Molly, and Skullpanda lines.
	pub fn standard() -> Self {
		let items = ITEM_SEEDS
			.iter()
			.flat_map(|(series_id, series_name, character, products)| {
				let line = series_id.trim_start_matches("SERIES-").trim_end_matches("-001");

				products.iter().enumerate().map(move |(idx, (suffix, rarity, price))| Item {
					series_id: (*series_id).into(),
					product_id: format!("PROD-{line}-{:03}", idx + 1),
					product_name: format!("{character} {series_name} - {suffix}"),
					ip_character: (*character).into(),
					series_name: (*series_name).into(),
					rarity: (*rarity).into(),
					category: "Blind Box".into(),
					retail_price: DEMO_RETAIL_PRICE,
					after_market_price: *price,
					currency: Some(DEMO_CURRENCY.into()),
					status: Some("Available".into()),
					updated_at: Some(DEMO_UPDATED_AT.into()),
				})
			})
			.collect();
		let series = SERIES_SEEDS
			.iter()
			.map(|(series_id, series_name, character, release, total)| Series {
				series_id: (*series_id).into(),
				series_name: (*series_name).into(),
				ip_character: (*character).into(),
				release_date: (*release).into(),
				total_items: *total,
				related_ip_characters: vec![(*character).into()],
				status: Some("Active".into()),
				retail_price: Some(DEMO_RETAIL_PRICE),
				currency: Some(DEMO_CURRENCY.into()),
			})
			.collect();

		Self { items, series }
	}

	/// Items matching `query`, capped at its limit.
	pub fn items(&self, query: &ItemQuery) -> Vec<Item> {
		self.items
			.iter()
			.filter(|item| {
				matches(query.series_id.as_deref(), &item.series_id)
					&& matches(query.product_id.as_deref(), &item.product_id)
					&& matches(query.ip_character.as_deref(), &item.ip_character)
					&& matches(query.category.as_deref(), &item.category)
					&& matches(query.rarity.as_deref(), &item.rarity)
					&& within(query.start_date, query.end_date, item.updated_at.as_deref())
			})
			.take(query.limit as usize)
			.cloned()
			.collect()
	}

	/// Series matching `query`, capped at its limit.
	pub fn series(&self, query: &SeriesQuery) -> Vec<Series> {
		self.series
			.iter()
			.filter(|series| {
				let character = query.ip_character.as_deref();

				matches(query.series_id.as_deref(), &series.series_id)
					&& (matches(character, &series.ip_character)
						|| series.related_ip_characters.iter().any(|c| matches(character, c)))
			})
			.take(query.limit as usize)
			.cloned()
			.collect()
	}
}

fn matches(filter: Option<&str>, value: &str) -> bool {
	filter.is_none_or(|f| f.is_empty() || f == value)
}

fn within(start: Option<Date>, end: Option<Date>, updated_at: Option<&str>) -> bool {
	if start.is_none() && end.is_none() {
		return true;
	}

	let Some(date) =
		updated_at.and_then(|raw| raw.get(..10)).and_then(|raw| Date::parse(raw, DATE_PREFIX).ok())
	else {
		return false;
	};

	start.is_none_or(|s| date >= s) && end.is_none_or(|e| date <= e)
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::date;
	// self
	use super::*;

	#[test]
	fn standard_catalog_is_deterministic() {
		let catalog = DemoCatalog::standard();

		assert_eq!(catalog, DemoCatalog::standard());
		assert_eq!(catalog.items(&ItemQuery::new()).len(), 21);
		assert_eq!(catalog.series(&SeriesQuery::new()).len(), 8);

		let first = &catalog.items(&ItemQuery::new())[0];

		assert_eq!(first.product_id, "PROD-LABUBU-001");
		assert_eq!(first.product_name, "Labubu The Monsters - Red Devil");
	}

	#[test]
	fn item_filters_apply() {
		let catalog = DemoCatalog::standard();
		let secrets = catalog.items(&ItemQuery::new().rarity("Secret"));

		assert_eq!(secrets.len(), 4);
		assert!(secrets.iter().all(|item| item.rarity == "Secret"));

		let hirono = catalog.items(&ItemQuery::new().ip_character("Hirono").limit(2));

		assert_eq!(hirono.len(), 2);
		assert_eq!(hirono[1].product_id, "PROD-HIRONO-002");
	}

	#[test]
	fn date_range_uses_update_day() {
		let catalog = DemoCatalog::standard();

		assert_eq!(
			catalog
				.items(&ItemQuery::new().date_range(Some(date!(2024 - 06 - 01)), None))
				.len(),
			21
		);
		assert!(
			catalog
				.items(&ItemQuery::new().date_range(None, Some(date!(2024 - 05 - 31))))
				.is_empty()
		);
	}

	#[test]
	fn series_filter_by_character() {
		let hirono = DemoCatalog::standard().series(&SeriesQuery::for_character("Hirono"));

		assert_eq!(hirono.len(), 3);
		assert!(hirono.iter().all(|series| series.ip_character == "Hirono"));
	}
}
