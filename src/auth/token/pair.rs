//! Access/refresh token pair as persisted by token stores.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Tokens currently held for the session; either half may be missing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
	/// Short-lived credential sent as the bearer token.
	pub access_token: Option<TokenSecret>,
	/// Longer-lived credential exchanged for new access tokens.
	pub refresh_token: Option<TokenSecret>,
}
impl TokenPair {
	/// Builds a complete pair, as issued by the login endpoint.
	pub fn new(access: impl Into<TokenSecret>, refresh: impl Into<TokenSecret>) -> Self {
		Self { access_token: Some(access.into()), refresh_token: Some(refresh.into()) }
	}

	/// Returns `true` when neither token is present.
	pub fn is_empty(&self) -> bool {
		self.access_token.is_none() && self.refresh_token.is_none()
	}

	/// Returns `true` when an access token is present.
	pub fn has_access_token(&self) -> bool {
		self.access_token.is_some()
	}
}
