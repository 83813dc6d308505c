//! Client-level error types shared across requests, actions, and stores.

// self
use crate::{_prelude::*, http::StatusCode};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Stored credentials can no longer be renewed; the user has to sign in again.
	#[error("Session expired; sign in again.")]
	SessionExpired,
	/// Network or server failure unrelated to authorization.
	#[error(transparent)]
	RequestFailed(#[from] RequestError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token store failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
}
impl Error {
	/// Returns `true` when the caller should send the user back to the login entry point.
	pub fn is_session_expired(&self) -> bool {
		matches!(self, Self::SessionExpired)
	}

	/// HTTP status attached to a failed request, if the backend answered at all.
	pub fn status(&self) -> Option<StatusCode> {
		match self {
			Self::RequestFailed(RequestError::Status { status, .. }) => Some(*status),
			Self::RequestFailed(RequestError::Decode { status, .. }) => Some(*status),
			_ => None,
		}
	}
}

/// Failures raised while talking to the backend.
#[derive(Debug, ThisError)]
pub enum RequestError {
	/// Underlying transport reported a network failure (DNS, TCP, TLS, IO).
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Backend answered with a non-success status.
	#[error("API request failed with status {status}: {message}.")]
	Status {
		/// HTTP status code.
		status: StatusCode,
		/// Message extracted from the response body.
		message: String,
	},
	/// Backend answered successfully but the body did not match the expected shape.
	#[error("API returned a response body that could not be decoded.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: StatusCode,
	},
}
impl RequestError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for RequestError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed or cannot carry paths.
	#[error("Base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// Offending URL text.
		url: String,
	},
	/// Request path is absolute or otherwise not relative to the base URL.
	#[error("Request path `{path}` must be relative to the base URL.")]
	NonRelativePath {
		/// Offending path.
		path: String,
	},
	/// Relative path could not be joined onto the base URL.
	#[error("Request path `{path}` cannot be joined onto the base URL.")]
	InvalidPath {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Login redirect must be an in-app path.
	#[error("Login redirect `{location}` must start with `/`.")]
	InvalidLoginRedirect {
		/// Offending location.
		location: String,
	},
	/// Request body could not be serialized to JSON.
	#[error("Request body could not be encoded as JSON.")]
	BodyEncode(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Renders a backend error body into a message suitable for display.
///
/// `{"detail": "..."}` bodies yield the detail; field-error objects yield `field: message` for
/// the first field; non-JSON bodies yield their trimmed text. Everything else, including empty
/// bodies, yields `fallback`.
pub fn error_message(body: &[u8], fallback: &str) -> String {
	if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
		return json_message(&value).unwrap_or_else(|| fallback.to_owned());
	}

	let text = String::from_utf8_lossy(body);
	let text = text.trim();

	if text.is_empty() { fallback.to_owned() } else { text.to_owned() }
}

fn json_message(value: &serde_json::Value) -> Option<String> {
	use serde_json::Value;

	match value {
		Value::String(message) if !message.trim().is_empty() => Some(message.trim().to_owned()),
		Value::Array(items) => items.iter().find_map(json_message),
		Value::Object(map) => {
			if let Some(detail) = map.get("detail").and_then(json_message) {
				return Some(detail);
			}

			map.iter().find_map(|(field, inner)| {
				let message = json_message(inner)?;

				if field == "non_field_errors" {
					Some(message)
				} else {
					Some(format!("{field}: {message}"))
				}
			})
		},
		_ => None,
	}
}
