//! Filter criteria rendered into query parameters for `/prices` and `/series`.
//!
//! Filters never participate in the request signature; only the endpoint's canonical payload
//! does.

// crates.io
use time::{format_description::FormatItem, macros::format_description};
// self
use crate::{_prelude::*, error::ConfigError};

/// Result cap applied when the caller does not choose one.
pub const DEFAULT_LIMIT: u32 = 50;

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Filter criteria for item price queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemQuery {
	/// Restrict to one series.
	pub series_id: Option<String>,
	/// Restrict to one product.
	pub product_id: Option<String>,
	/// Restrict to one franchise character.
	pub ip_character: Option<String>,
	/// Restrict to one category.
	pub category: Option<String>,
	/// Restrict to one rarity tier.
	pub rarity: Option<String>,
	/// Earliest price date (inclusive).
	pub start_date: Option<Date>,
	/// Latest price date (inclusive).
	pub end_date: Option<Date>,
	/// Maximum number of records returned.
	pub limit: u32,
}
impl ItemQuery {
	/// Creates an unfiltered query with the default limit.
	pub fn new() -> Self {
		Self {
			series_id: None,
			product_id: None,
			ip_character: None,
			category: None,
			rarity: None,
			start_date: None,
			end_date: None,
			limit: DEFAULT_LIMIT,
		}
	}

	/// Restricts the query to a series.
	pub fn series_id(mut self, value: impl Into<String>) -> Self {
		self.series_id = Some(value.into());

		self
	}

	/// Restricts the query to a product.
	pub fn product_id(mut self, value: impl Into<String>) -> Self {
		self.product_id = Some(value.into());

		self
	}

	/// Restricts the query to a franchise character.
	pub fn ip_character(mut self, value: impl Into<String>) -> Self {
		self.ip_character = Some(value.into());

		self
	}

	/// Restricts the query to a category.
	pub fn category(mut self, value: impl Into<String>) -> Self {
		self.category = Some(value.into());

		self
	}

	/// Restricts the query to a rarity tier.
	pub fn rarity(mut self, value: impl Into<String>) -> Self {
		self.rarity = Some(value.into());

		self
	}

	/// Restricts the query to an inclusive date range; either end may be open.
	pub fn date_range(mut self, start: Option<Date>, end: Option<Date>) -> Self {
		self.start_date = start;
		self.end_date = end;

		self
	}

	/// Overrides the result cap.
	pub fn limit(mut self, limit: u32) -> Self {
		self.limit = limit;

		self
	}

	/// Renders the filters as query parameters; empty strings are skipped and `limit` is
	/// always sent.
	pub fn query_pairs(&self) -> Result<Vec<(&'static str, String)>, ConfigError> {
		let mut pairs = Vec::new();

		push_text(&mut pairs, "seriesId", self.series_id.as_deref());
		push_text(&mut pairs, "productId", self.product_id.as_deref());
		push_text(&mut pairs, "ipCharacter", self.ip_character.as_deref());
		push_text(&mut pairs, "category", self.category.as_deref());
		push_text(&mut pairs, "rarity", self.rarity.as_deref());

		if let Some(date) = self.start_date {
			pairs.push(("startDate", date.format(DATE_FORMAT)?));
		}
		if let Some(date) = self.end_date {
			pairs.push(("endDate", date.format(DATE_FORMAT)?));
		}

		pairs.push(("limit", self.limit.to_string()));

		Ok(pairs)
	}
}
impl Default for ItemQuery {
	fn default() -> Self {
		Self::new()
	}
}

/// Filter criteria for series queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeriesQuery {
	/// Restrict to one franchise character.
	pub ip_character: Option<String>,
	/// Restrict to one series.
	pub series_id: Option<String>,
	/// Maximum number of records returned.
	pub limit: u32,
}
impl SeriesQuery {
	/// Creates an unfiltered query with the default limit.
	pub fn new() -> Self {
		Self { ip_character: None, series_id: None, limit: DEFAULT_LIMIT }
	}

	/// Lists the series of one franchise character.
	pub fn for_character(ip_character: impl Into<String>) -> Self {
		Self { ip_character: Some(ip_character.into()), ..Self::new() }
	}

	/// Restricts the query to a series.
	pub fn series_id(mut self, value: impl Into<String>) -> Self {
		self.series_id = Some(value.into());

		self
	}

	/// Overrides the result cap.
	pub fn limit(mut self, limit: u32) -> Self {
		self.limit = limit;

		self
	}

	/// Renders the filters as query parameters.
	pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = Vec::new();

		push_text(&mut pairs, "ipCharacter", self.ip_character.as_deref());
		push_text(&mut pairs, "seriesId", self.series_id.as_deref());
		pairs.push(("limit", self.limit.to_string()));

		pairs
	}
}
impl Default for SeriesQuery {
	fn default() -> Self {
		Self::new()
	}
}

fn push_text(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
	if let Some(value) = value.filter(|v| !v.is_empty()) {
		pairs.push((key, value.to_owned()));
	}
}
