//! Collectible-figure price records and series metadata as served by `/prices` and `/series`.

// crates.io
use serde::{Deserializer, de::Error as DeError};
// self
use crate::_prelude::*;

/// After-market price record for a single blind-box item.
///
/// Every field also accepts the typed attribute wrappers (`{"S": ..}`, `{"N": ..}`, `{"L": ..}`)
/// the price table stores; the query handler may forward raw table items.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Item {
	/// Series the item belongs to.
	#[serde(deserialize_with = "lenient::text")]
	pub series_id: String,
	/// Unique product identifier.
	#[serde(deserialize_with = "lenient::text")]
	pub product_id: String,
	/// Display name.
	#[serde(deserialize_with = "lenient::text")]
	pub product_name: String,
	/// Franchise character (e.g. `Labubu`).
	#[serde(deserialize_with = "lenient::text")]
	pub ip_character: String,
	/// Display name of the series.
	#[serde(default, deserialize_with = "lenient::text")]
	pub series_name: String,
	/// Rarity tier (e.g. `Common`, `Rare`, `Secret`).
	#[serde(default, deserialize_with = "lenient::text")]
	pub rarity: String,
	/// Product category (e.g. `Blind Box`).
	#[serde(default, deserialize_with = "lenient::text")]
	pub category: String,
	/// Official retail price.
	#[serde(deserialize_with = "lenient::number")]
	pub retail_price: f64,
	/// Observed after-market price.
	#[serde(deserialize_with = "lenient::number")]
	pub after_market_price: f64,
	/// ISO currency code, when reported.
	#[serde(
		default,
		deserialize_with = "lenient::optional_text",
		skip_serializing_if = "Option::is_none"
	)]
	pub currency: Option<String>,
	/// Listing status (e.g. `Available`).
	#[serde(
		default,
		deserialize_with = "lenient::optional_text",
		skip_serializing_if = "Option::is_none"
	)]
	pub status: Option<String>,
	/// Last update timestamp as reported by the server.
	#[serde(
		default,
		deserialize_with = "lenient::optional_text",
		skip_serializing_if = "Option::is_none"
	)]
	pub updated_at: Option<String>,
}
impl Item {
	/// Percentage change from retail to after-market price; `None` when retail is zero.
	pub fn price_change_percent(&self) -> Option<f64> {
		if self.retail_price == 0.0 {
			return None;
		}

		Some((self.after_market_price - self.retail_price) / self.retail_price * 100.0)
	}
}

/// Metadata for a series (a themed collection of items released together).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Series {
	/// Unique series identifier.
	#[serde(deserialize_with = "lenient::text")]
	pub series_id: String,
	/// Display name.
	#[serde(deserialize_with = "lenient::text")]
	pub series_name: String,
	/// Primary franchise character.
	#[serde(deserialize_with = "lenient::text")]
	pub ip_character: String,
	/// Release month (`YYYY-MM`).
	#[serde(default, deserialize_with = "lenient::text")]
	pub release_date: String,
	/// Number of distinct items in the series.
	#[serde(default, deserialize_with = "lenient::number")]
	pub total_items: u32,
	/// Every character featured in the series.
	#[serde(default, deserialize_with = "lenient::texts")]
	pub related_ip_characters: Vec<String>,
	/// Listing status (e.g. `Active`).
	#[serde(
		default,
		deserialize_with = "lenient::optional_text",
		skip_serializing_if = "Option::is_none"
	)]
	pub status: Option<String>,
	/// Retail price per box, when reported.
	#[serde(
		default,
		deserialize_with = "lenient::optional_number",
		skip_serializing_if = "Option::is_none"
	)]
	pub retail_price: Option<f64>,
	/// ISO currency code, when reported.
	#[serde(
		default,
		deserialize_with = "lenient::optional_text",
		skip_serializing_if = "Option::is_none"
	)]
	pub currency: Option<String>,
}

/// Numbers may arrive as JSON numbers, as decimal strings (the server stringifies its decimal
/// type), or wrapped as `{"N": "69"}`. Text may arrive bare or wrapped as `{"S": ".."}`, and
/// lists bare, as `{"L": [..]}`, or as a `{"SS": [..]}` string set.
mod lenient {
	// self
	use super::*;

	#[derive(Deserialize)]
	#[serde(untagged)]
	enum NumberOrText<T> {
		Number(T),
		Text(String),
		Attribute {
			#[serde(rename = "N")]
			n: String,
		},
	}
	impl<T> NumberOrText<T>
	where
		T: FromStr,
		T::Err: Display,
	{
		fn into_number<E>(self) -> Result<T, E>
		where
			E: DeError,
		{
			match self {
				Self::Number(value) => Ok(value),
				Self::Text(raw) | Self::Attribute { n: raw } => raw.trim().parse().map_err(E::custom),
			}
		}
	}

	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Text {
		Plain(String),
		Attribute {
			#[serde(rename = "S")]
			s: String,
		},
	}
	impl From<Text> for String {
		fn from(text: Text) -> Self {
			match text {
				Text::Plain(value) | Text::Attribute { s: value } => value,
			}
		}
	}

	#[derive(Deserialize)]
	#[serde(untagged)]
	enum TextList {
		Plain(Vec<Text>),
		List {
			#[serde(rename = "L")]
			l: Vec<Text>,
		},
		Set {
			#[serde(rename = "SS")]
			ss: Vec<String>,
		},
	}

	pub(super) fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
	where
		D: Deserializer<'de>,
		T: Deserialize<'de> + FromStr,
		T::Err: Display,
	{
		NumberOrText::<T>::deserialize(deserializer)?.into_number()
	}

	pub(super) fn optional_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
	where
		D: Deserializer<'de>,
		T: Deserialize<'de> + FromStr,
		T::Err: Display,
	{
		Option::<NumberOrText<T>>::deserialize(deserializer)?
			.map(NumberOrText::into_number)
			.transpose()
	}

	pub(super) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
	where
		D: Deserializer<'de>,
	{
		Text::deserialize(deserializer).map(String::from)
	}

	pub(super) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
	where
		D: Deserializer<'de>,
	{
		Ok(Option::<Text>::deserialize(deserializer)?.map(String::from))
	}

	pub(super) fn texts<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
	where
		D: Deserializer<'de>,
	{
		Ok(match TextList::deserialize(deserializer)? {
			TextList::Plain(values) | TextList::List { l: values } =>
				values.into_iter().map(String::from).collect(),
			TextList::Set { ss } => ss,
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn item_accepts_numeric_strings() {
		let item: Item = serde_json::from_value(serde_json::json!({
			"SeriesId": "SERIES-LABUBU-001",
			"ProductId": "PROD-LABUBU-001",
			"ProductName": "Labubu The Monsters - Red Devil",
			"IpCharacter": "Labubu",
			"SeriesName": "The Monsters",
			"Rarity": "Secret",
			"Category": "Blind Box",
			"RetailPrice": "69",
			"AfterMarketPrice": 599,
			"Status": "Available"
		}))
		.expect("Item should decode.");

		assert_eq!(item.retail_price, 69.0);
		assert_eq!(item.after_market_price, 599.0);
		assert_eq!(item.currency, None);

		let change = item.price_change_percent().expect("Retail price is non-zero.");

		assert!((change - 768.115_942).abs() < 1e-3);
	}

	#[test]
	fn item_rejects_garbage_prices() {
		let result = serde_json::from_value::<Item>(serde_json::json!({
			"SeriesId": "S",
			"ProductId": "P",
			"ProductName": "N",
			"IpCharacter": "Labubu",
			"RetailPrice": "sixty-nine",
			"AfterMarketPrice": 1
		}));

		assert!(result.is_err());
	}

	#[test]
	fn series_defaults_optional_fields() {
		let series: Series = serde_json::from_value(serde_json::json!({
			"SeriesId": "SERIES-HIRONO-001",
			"SeriesName": "Winter Collection",
			"IpCharacter": "Hirono",
			"TotalItems": "8",
			"RetailPrice": "69"
		}))
		.expect("Series should decode.");

		assert_eq!(series.total_items, 8);
		assert_eq!(series.retail_price, Some(69.0));
		assert!(series.related_ip_characters.is_empty());
		assert_eq!(series.release_date, "");
	}

	#[test]
	fn item_accepts_table_attribute_wrappers() {
		let item: Item = serde_json::from_value(serde_json::json!({
			"SeriesId": { "S": "SERIES-LABUBU-001" },
			"ProductId": { "S": "PROD-LABUBU-002" },
			"ProductName": { "S": "Labubu The Monsters - Blue Fairy" },
			"IpCharacter": { "S": "Labubu" },
			"Rarity": { "S": "Rare" },
			"RetailPrice": { "N": "69" },
			"AfterMarketPrice": { "N": "299.5" },
			"Currency": { "S": "CNY" },
			"Timestamp": { "S": "2024-06-01T00:00:00Z" }
		}))
		.expect("Wrapped item should decode.");

		assert_eq!(item.series_id, "SERIES-LABUBU-001");
		assert_eq!(item.rarity, "Rare");
		assert_eq!(item.retail_price, 69.0);
		assert_eq!(item.after_market_price, 299.5);
		assert_eq!(item.currency.as_deref(), Some("CNY"));
		assert_eq!(item.series_name, "");
	}

	#[test]
	fn series_accepts_table_attribute_wrappers() {
		let series: Series = serde_json::from_value(serde_json::json!({
			"SeriesId": { "S": "SERIES-HIRONO-002" },
			"SeriesName": { "S": "The Other One" },
			"IpCharacter": { "S": "Hirono" },
			"TotalItems": { "N": "9" },
			"RelatedIpCharacters": { "L": [{ "S": "Hirono" }, { "S": "Molly" }] }
		}))
		.expect("Wrapped series should decode.");

		assert_eq!(series.total_items, 9);
		assert_eq!(series.related_ip_characters, ["Hirono", "Molly"]);

		let set: Series = serde_json::from_value(serde_json::json!({
			"SeriesId": "S",
			"SeriesName": "N",
			"IpCharacter": "Hirono",
			"RelatedIpCharacters": { "SS": ["Hirono"] }
		}))
		.expect("String-set series should decode.");

		assert_eq!(set.related_ip_characters, ["Hirono"]);
	}

	#[test]
	fn zero_retail_has_no_change() {
		let item = Item {
			series_id: "S".into(),
			product_id: "P".into(),
			product_name: "N".into(),
			ip_character: "Labubu".into(),
			series_name: String::new(),
			rarity: String::new(),
			category: String::new(),
			retail_price: 0.0,
			after_market_price: 10.0,
			currency: None,
			status: None,
			updated_at: None,
		};

		assert_eq!(item.price_change_percent(), None);
	}
}
