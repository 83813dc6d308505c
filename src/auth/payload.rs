//! JSON payloads exchanged with the backend's authentication endpoints.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Username/password pair submitted to the login endpoint.
#[derive(Clone, Serialize)]
pub struct Credentials {
	/// Account username.
	pub username: String,
	/// Account password; never logged.
	pub password: String,
}
impl Credentials {
	/// Creates a new credential pair.
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self { username: username.into(), password: password.into() }
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Account creation request.
#[derive(Clone, Serialize)]
pub struct Registration {
	/// Desired username.
	pub username: String,
	/// Contact email; the backend sends an activation link here.
	pub email: String,
	/// Initial password; never logged.
	pub password: String,
}
impl Registration {
	/// Creates a new registration request.
	pub fn new(
		username: impl Into<String>,
		email: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		Self { username: username.into(), email: email.into(), password: password.into() }
	}
}
impl Debug for Registration {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Registration")
			.field("username", &self.username)
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Profile returned by the current-user and registration endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// Account username.
	pub username: String,
	/// Account email.
	pub email: String,
}

/// Editable profile fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
	/// New username.
	pub username: String,
	/// New email; changing it triggers re-activation on the backend.
	pub email: String,
}

/// Password reset request; the backend mails a reset link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PasswordResetRequest {
	/// Account email.
	pub email: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
	pub(crate) access: TokenSecret,
	pub(crate) refresh: TokenSecret,
}

#[derive(Debug, Serialize)]
pub(crate) struct RefreshRequest<'a> {
	pub(crate) refresh: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
	pub(crate) access: TokenSecret,
}
