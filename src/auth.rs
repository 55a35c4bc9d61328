//! Client identity, shared-secret material, and the signed-in session tracker.

pub mod id;
pub mod identity;
pub mod secret;
pub mod session;

pub use id::*;
pub use identity::*;
pub use secret::*;
pub use session::*;
