//! Transport primitives for API calls.
//!
//! The module exposes [`ApiHttpClient`] alongside the [`ApiRequest`] and [`ApiResponse`] values
//! it exchanges so downstream crates (and tests) can swap in their own HTTP stack. The session
//! client only ever sees status codes and raw bodies; decoding and error classification stay in
//! [`crate::client`].

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
// self
use crate::{_prelude::*, auth::TokenSecret};

pub use ::http::{Method, StatusCode};

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type HttpFuture<'a, E> = Pin<Box<dyn Future<Output = Result<ApiResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing API calls.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared by every
/// clone of a [`SessionClient`](crate::client::SessionClient). Any HTTP response, including 4xx
/// and 5xx, must resolve to `Ok`; `Err` is reserved for failures where no response arrived.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and collects the full response body.
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, Self::TransportError>;
}

/// Fully resolved outbound request.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute target URL.
	pub url: Url,
	/// Bearer credential, if the call is authenticated.
	pub bearer: Option<TokenSecret>,
	/// JSON-encoded body, if any.
	pub body: Option<Vec<u8>>,
}
impl ApiRequest {
	/// Creates an unauthenticated request without a body.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, bearer: None, body: None }
	}

	/// Attaches (or clears) the bearer credential.
	pub fn with_bearer(mut self, bearer: Option<TokenSecret>) -> Self {
		self.bearer = bearer;

		self
	}

	/// Attaches a pre-encoded JSON body.
	pub fn with_body(mut self, body: Option<Vec<u8>>) -> Self {
		self.body = body;

		self
	}
}

/// Status and body of a completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: StatusCode,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Creates a response from its parts.
	pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	/// Returns `true` for 401 Unauthorized.
	pub fn is_unauthorized(&self) -> bool {
		self.status == StatusCode::UNAUTHORIZED
	}

	/// Canonical reason phrase for the status, used when the body carries no message.
	pub fn reason(&self) -> &'static str {
		self.status.canonical_reason().unwrap_or("Unexpected response")
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder = client
				.request(request.method, request.url)
				.header(ACCEPT, "application/json");

			if let Some(bearer) = &request.bearer {
				builder = builder.header(AUTHORIZATION, bearer.bearer());
			}
			if let Some(body) = request.body {
				builder = builder.header(CONTENT_TYPE, "application/json").body(body);
			}

			let response = builder.send().await?;
			let status = response.status();
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, body })
		})
	}
}
