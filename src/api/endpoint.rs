//! Endpoints exposed by the price service and their fixed canonical payloads.

// self
use crate::{_prelude::*, http::HttpMethod, sign::CanonicalPayload};

/// Logical operations the client can perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
	/// `GET /prices`: item price records.
	Prices,
	/// `GET /series`: series (collection) metadata.
	Series,
	/// `POST /prices`: upload an item price record.
	UploadPrice,
}
impl Endpoint {
	/// HTTP method used by the endpoint.
	pub const fn method(self) -> HttpMethod {
		match self {
			Endpoint::Prices | Endpoint::Series => HttpMethod::Get,
			Endpoint::UploadPrice => HttpMethod::Post,
		}
	}

	/// Path relative to the service base URL.
	pub const fn path(self) -> &'static str {
		match self {
			Endpoint::Prices | Endpoint::UploadPrice => "/prices",
			Endpoint::Series => "/series",
		}
	}

	/// Fixed `METHOD:/path` payload signed for every call to this endpoint.
	pub const fn canonical_payload(self) -> CanonicalPayload {
		match self {
			Endpoint::Prices => CanonicalPayload::from_static("GET:/prices"),
			Endpoint::Series => CanonicalPayload::from_static("GET:/series"),
			Endpoint::UploadPrice => CanonicalPayload::from_static("POST:/prices"),
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Endpoint::Prices => "prices",
			Endpoint::Series => "series",
			Endpoint::UploadPrice => "upload_price",
		}
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
