//! Route gating for navigations that arrive without an access token.

// self
use crate::config::ClientConfig;

/// Path prefixes that are never gated.
const EXCLUDED_PREFIXES: [&str; 4] = ["api", "auth", "_next/static", "_next/image"];
/// File suffix that is never gated.
const EXCLUDED_SUFFIX: &str = ".png";

/// Outcome of gating a navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteDecision {
	/// Let the navigation through.
	Pass,
	/// Send the user to the login entry point.
	RedirectToLogin {
		/// Login entry point.
		location: String,
	},
}

/// Decides whether a path may be served to a visitor without an access token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteGate {
	login_redirect: String,
}
impl RouteGate {
	/// Creates a gate redirecting to `login_redirect`.
	pub fn new(login_redirect: impl Into<String>) -> Self {
		Self { login_redirect: login_redirect.into() }
	}

	/// Creates a gate redirecting to the client's configured login entry point.
	pub fn from_config(config: &ClientConfig) -> Self {
		Self::new(config.login_redirect.clone())
	}

	/// Returns `true` when the path is subject to gating at all.
	///
	/// API routes, auth screens, framework assets, and `.png` files are exempt. Exemptions are
	/// plain prefix matches on the path after its leading slash.
	pub fn is_gated(path: &str) -> bool {
		let rest = path.strip_prefix('/').unwrap_or(path);

		!(EXCLUDED_PREFIXES.iter().any(|prefix| rest.starts_with(prefix))
			|| rest.ends_with(EXCLUDED_SUFFIX))
	}

	/// Gates a navigation to `path`.
	pub fn decide(&self, path: &str, has_access_token: bool) -> RouteDecision {
		if has_access_token || path == "/" || !Self::is_gated(path) {
			RouteDecision::Pass
		} else {
			RouteDecision::RedirectToLogin { location: self.login_redirect.clone() }
		}
	}
}
