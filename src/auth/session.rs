//! Signed-in session tracker consulted before privileged operations.
//!
//! Sign-in itself happens elsewhere (an identity provider flow owned by the host
//! application); the client only reads the current role to decide whether uploads may
//! proceed.

// self
use crate::_prelude::*;

/// Role of the current session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	/// Anonymous, read-only access.
	#[default]
	Visitor,
	/// Registered user with write access.
	User,
	/// Registered user with administrative access.
	Superuser,
}
impl Role {
	/// Returns a stable label suitable for logs.
	pub const fn as_str(self) -> &'static str {
		match self {
			Role::Visitor => "visitor",
			Role::User => "user",
			Role::Superuser => "superuser",
		}
	}
}
impl Display for Role {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Snapshot of the signed-in principal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
	/// Current role.
	pub role: Role,
	/// Display name of the signed-in principal.
	pub username: Option<String>,
	/// Stable identifier of the signed-in principal.
	pub user_id: Option<String>,
}

/// Thread-safe session holder shared between the UI layer and [`PriceClient`](crate::client::PriceClient).
#[derive(Debug, Default)]
pub struct AuthSession(RwLock<SessionState>);
impl AuthSession {
	/// Returns a copy of the current session.
	pub fn snapshot(&self) -> SessionState {
		self.0.read().clone()
	}

	/// Current role.
	pub fn role(&self) -> Role {
		self.0.read().role
	}

	/// Whether the session belongs to a signed-in principal.
	pub fn is_authenticated(&self) -> bool {
		self.role() != Role::Visitor
	}

	/// Whether the session carries administrative rights.
	pub fn is_superuser(&self) -> bool {
		self.role() == Role::Superuser
	}

	/// Records a successful sign-in.
	pub fn sign_in(&self, role: Role, username: impl Into<String>, user_id: impl Into<String>) {
		*self.0.write() =
			SessionState { role, username: Some(username.into()), user_id: Some(user_id.into()) };
	}

	/// Drops back to anonymous visitor mode.
	pub fn sign_out(&self) {
		*self.0.write() = SessionState::default();
	}
}
