//! Client configuration: backend location, auth endpoint paths, and the login entry point.

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError};

/// Base URL used when `API_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
/// Login entry point used when `LOGIN_REDIRECT` is not set.
pub const DEFAULT_LOGIN_REDIRECT: &str = "/auth/login";

/// Paths of the backend's authentication endpoints, relative to the base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthEndpoints {
	/// Credentials → token pair.
	pub login: String,
	/// Refresh token → access token.
	pub refresh: String,
	/// Refresh token invalidation.
	pub logout: String,
	/// Account creation.
	pub register: String,
	/// Current user profile (read and update).
	pub me: String,
	/// Password reset email request.
	pub password_reset: String,
	/// Public liveness probe.
	pub hello: String,
}
impl Default for AuthEndpoints {
	fn default() -> Self {
		Self {
			login: "auth/jwt/create/".into(),
			refresh: "auth/jwt/refresh/".into(),
			logout: "auth/jwt/logout/".into(),
			register: "auth/users/".into(),
			me: "auth/users/me/".into(),
			password_reset: "auth/users/reset_password/".into(),
			hello: "hello".into(),
		}
	}
}

/// Validated configuration shared by every clone of a session client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// Base URL every request path is resolved against; always ends with `/`.
	pub base_url: Url,
	/// Authentication endpoint paths.
	pub endpoints: AuthEndpoints,
	/// In-app path users are sent to when their session cannot be renewed.
	pub login_redirect: String,
	/// Serializes concurrent refreshes so only one hits the backend at a time.
	pub coalesce_refreshes: bool,
}
impl ClientConfig {
	/// Returns a builder seeded with the provided base URL.
	pub fn builder(base_url: Url) -> ClientConfigBuilder {
		ClientConfigBuilder::new(base_url)
	}

	/// Loads configuration from `API_BASE_URL` and `LOGIN_REDIRECT`, using defaults for
	/// unset variables.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Same as [`ClientConfig::from_env`] with a caller-supplied variable lookup.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		let raw = lookup("API_BASE_URL")
			.filter(|value| !value.trim().is_empty())
			.unwrap_or_else(|| DEFAULT_BASE_URL.into());
		let base_url = Url::parse(raw.trim())
			.map_err(|_| ConfigError::InvalidBaseUrl { url: raw.clone() })?;
		let mut builder = Self::builder(base_url);

		if let Some(location) = lookup("LOGIN_REDIRECT").filter(|value| !value.trim().is_empty())
		{
			builder = builder.login_redirect(location.trim());
		}

		builder.build()
	}

	/// Resolves a request path against the base URL.
	///
	/// Leading slashes are ignored so `/orders` and `orders` both land under the base path.
	/// Absolute and scheme-relative URLs are rejected, as is any path whose resolved URL leaves
	/// the base origin or climbs above the base path (`../`, backslash tricks).
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		if path.starts_with("//") || Url::parse(path).is_ok() {
			return Err(ConfigError::NonRelativePath { path: path.into() });
		}

		let url = self
			.base_url
			.join(path.trim_start_matches('/'))
			.map_err(|source| ConfigError::InvalidPath { path: path.into(), source })?;

		if url.origin() != self.base_url.origin() || !url.path().starts_with(self.base_url.path())
		{
			return Err(ConfigError::NonRelativePath { path: path.into() });
		}

		Ok(url)
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// Backend base URL.
	pub base_url: Url,
	/// Authentication endpoint paths.
	pub endpoints: AuthEndpoints,
	/// Login entry point.
	pub login_redirect: String,
	/// Refresh coalescing switch.
	pub coalesce_refreshes: bool,
}
impl ClientConfigBuilder {
	/// Creates a new builder with default endpoints and redirect.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			endpoints: AuthEndpoints::default(),
			login_redirect: DEFAULT_LOGIN_REDIRECT.into(),
			coalesce_refreshes: false,
		}
	}

	/// Replaces every endpoint path at once.
	pub fn endpoints(mut self, endpoints: AuthEndpoints) -> Self {
		self.endpoints = endpoints;

		self
	}

	/// Overrides the refresh endpoint path.
	pub fn refresh_endpoint(mut self, path: impl Into<String>) -> Self {
		self.endpoints.refresh = path.into();

		self
	}

	/// Overrides the login entry point.
	pub fn login_redirect(mut self, location: impl Into<String>) -> Self {
		self.login_redirect = location.into();

		self
	}

	/// Enables or disables refresh coalescing (disabled by default).
	pub fn coalesce_refreshes(mut self, enabled: bool) -> Self {
		self.coalesce_refreshes = enabled;

		self
	}

	/// Validates the configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let mut base_url = self.base_url;

		if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
			return Err(ConfigError::InvalidBaseUrl { url: base_url.into() });
		}
		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}

		base_url.set_query(None);
		base_url.set_fragment(None);

		if !self.login_redirect.starts_with('/') {
			return Err(ConfigError::InvalidLoginRedirect { location: self.login_redirect });
		}

		Ok(ClientConfig {
			base_url,
			endpoints: self.endpoints,
			login_redirect: self.login_redirect,
			coalesce_refreshes: self.coalesce_refreshes,
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn config(base: &str) -> ClientConfig {
		ClientConfig::builder(Url::parse(base).expect("Base URL fixture should parse."))
			.build()
			.expect("Configuration fixture should be valid.")
	}

	#[test]
	fn endpoint_joins_under_base_path() {
		let config = config("https://api.example.com/api");

		assert_eq!(config.base_url.as_str(), "https://api.example.com/api/");
		assert_eq!(
			config.endpoint("/orders").expect("Relative path should resolve.").as_str(),
			"https://api.example.com/api/orders"
		);
		assert_eq!(
			config.endpoint("orders/7?expand=items").expect("Relative path should resolve.").as_str(),
			"https://api.example.com/api/orders/7?expand=items"
		);
	}

	#[test]
	fn endpoint_rejects_absolute_urls() {
		let config = config("https://api.example.com/api/");

		assert!(matches!(
			config.endpoint("https://evil.example.com/orders"),
			Err(ConfigError::NonRelativePath { .. })
		));
		assert!(matches!(
			config.endpoint("//evil.example.com/orders"),
			Err(ConfigError::NonRelativePath { .. })
		));
	}

	#[test]
	fn endpoint_stays_under_base_origin_and_path() {
		let config = config("https://api.example.com/api");

		for path in [
			"\\\\evil.example.com/orders",
			"\\/evil.example.com/x",
			"/\\evil.example.com/x",
			"../admin",
			"/../admin",
			"orders/../../admin",
			"/\\x",
		] {
			assert!(
				matches!(config.endpoint(path), Err(ConfigError::NonRelativePath { .. })),
				"{path} should be rejected"
			);
		}

		assert_eq!(
			config.endpoint("orders/7/../8").expect("In-base traversal should resolve.").as_str(),
			"https://api.example.com/api/orders/8"
		);
	}

	#[test]
	fn builder_validates_base_and_redirect() {
		let err = ClientConfig::builder(Url::parse("mailto:ops@example.com").expect("URL parses."))
			.build()
			.expect_err("Non-HTTP base URLs should be rejected.");

		assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));

		let err = ClientConfig::builder(Url::parse("https://api.example.com").expect("URL parses."))
			.login_redirect("auth/login")
			.build()
			.expect_err("Relative login redirects should be rejected.");

		assert!(matches!(err, ConfigError::InvalidLoginRedirect { .. }));
	}

	#[test]
	fn lookup_applies_defaults_and_overrides() {
		let defaults = ClientConfig::from_lookup(|_| None).expect("Defaults should be valid.");

		assert_eq!(defaults.base_url.as_str(), "http://localhost:8000/api/");
		assert_eq!(defaults.login_redirect, DEFAULT_LOGIN_REDIRECT);
		assert!(!defaults.coalesce_refreshes);

		let custom = ClientConfig::from_lookup(|key| match key {
			"API_BASE_URL" => Some("https://backend.example.com/v2".into()),
			"LOGIN_REDIRECT" => Some("/signin".into()),
			_ => None,
		})
		.expect("Overrides should be valid.");

		assert_eq!(custom.base_url.as_str(), "https://backend.example.com/v2/");
		assert_eq!(custom.login_redirect, "/signin");

		let err = ClientConfig::from_lookup(|key| (key == "API_BASE_URL").then(|| "::".into()))
			.expect_err("Unparseable base URLs should be rejected.");

		assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
	}
}
