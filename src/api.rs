//! Wire models for the price service: endpoints, filter criteria, records, and the response
//! envelope.

pub mod endpoint;
pub mod envelope;
pub mod model;
pub mod query;

pub use endpoint::*;
pub use envelope::*;
pub use model::*;
pub use query::*;
