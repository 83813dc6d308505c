mod common;

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::Arc,
};
// crates.io
use parking_lot::Mutex;
use serde_json::Value;
// self
use common::*;
use session_fetch::{
	auth::TokenSecret,
	client::SessionClient,
	error::{ConfigError, Error, RequestError},
	http::{ApiHttpClient, ApiRequest, ApiResponse, HttpFuture, StatusCode},
	store::TokenStore,
};

const REFRESH_PATH: &str = "/api/auth/jwt/refresh/";

#[derive(Debug)]
enum FakeTransportError {
	ConnectionReset,
}
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::ConnectionReset => write!(f, "Connection reset by peer."),
		}
	}
}
impl StdError for FakeTransportError {}

type Route = dyn Fn(&ApiRequest) -> Result<ApiResponse, FakeTransportError> + Send + Sync;

/// Transport that answers from a routing closure, records every request, and yields once per
/// call so concurrent requests interleave deterministically on a single-threaded runtime.
struct ScriptedHttpClient {
	route: Box<Route>,
	seen: Mutex<Vec<ApiRequest>>,
}
impl ScriptedHttpClient {
	fn new(
		route: impl Fn(&ApiRequest) -> Result<ApiResponse, FakeTransportError>
		+ 'static
		+ Send
		+ Sync,
	) -> Arc<Self> {
		Arc::new(Self { route: Box::new(route), seen: Mutex::default() })
	}

	fn calls_to(&self, path: &str) -> usize {
		self.seen.lock().iter().filter(|request| request.url.path() == path).count()
	}

	fn bearers_for(&self, path: &str) -> Vec<Option<String>> {
		self.seen
			.lock()
			.iter()
			.filter(|request| request.url.path() == path)
			.map(|request| request.bearer.as_ref().map(|secret| secret.expose().to_owned()))
			.collect()
	}
}
impl ApiHttpClient for ScriptedHttpClient {
	type TransportError = FakeTransportError;

	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, Self::TransportError> {
		Box::pin(async move {
			self.seen.lock().push(request.clone());
			tokio::task::yield_now().await;

			(self.route)(&request)
		})
	}
}

fn bearer(request: &ApiRequest) -> Option<&str> {
	request.bearer.as_ref().map(TokenSecret::expose)
}

/// Orders accept only `fresh-access`; refresh hands out `fresh-access`.
fn orders_backend(request: &ApiRequest) -> Result<ApiResponse, FakeTransportError> {
	match request.url.path() {
		REFRESH_PATH => Ok(ApiResponse::new(StatusCode::OK, r#"{"access":"fresh-access"}"#)),
		"/api/orders" if bearer(request) == Some("fresh-access") =>
			Ok(ApiResponse::new(StatusCode::OK, r#"[{"id":1}]"#)),
		"/api/orders" => Ok(ApiResponse::new(StatusCode::UNAUTHORIZED, Vec::new())),
		_ => Ok(ApiResponse::new(StatusCode::NOT_FOUND, Vec::new())),
	}
}

fn client_over(
	http: Arc<ScriptedHttpClient>,
	coalesce: bool,
) -> (SessionClient<ScriptedHttpClient>, TestHarness) {
	let mut config = test_config("https://backend.example.com/api");

	config.coalesce_refreshes = coalesce;

	build_test_client(config, http, Some("expired-access"), Some("valid-refresh"))
}

#[tokio::test]
async fn refresh_network_failure_keeps_tokens_and_skips_redirect() {
	let http = ScriptedHttpClient::new(|request| match request.url.path() {
		REFRESH_PATH => Err(FakeTransportError::ConnectionReset),
		_ => Ok(ApiResponse::new(StatusCode::UNAUTHORIZED, Vec::new())),
	});
	let (client, harness) = client_over(http.clone(), false);
	let err = client
		.get::<Value>("/orders")
		.await
		.expect_err("A refresh transport failure should surface to the caller.");

	match err {
		Error::RequestFailed(RequestError::Network { source }) =>
			assert_eq!(source.to_string(), "Connection reset by peer."),
		other => panic!("Unexpected error variant: {other:?}."),
	}

	assert_eq!(http.calls_to(REFRESH_PATH), 1);
	assert_eq!(http.calls_to("/api/orders"), 1);
	assert!(harness.store.snapshot().has_access_token());
	assert_eq!(harness.observer.count(), 0);
	assert_eq!(client.refresh_metrics.failures(), 1);
}

#[tokio::test]
async fn malformed_refresh_response_ends_session() {
	let http = ScriptedHttpClient::new(|request| match request.url.path() {
		REFRESH_PATH => Ok(ApiResponse::new(StatusCode::OK, r#"{"token":"wrong-field"}"#)),
		_ => Ok(ApiResponse::new(StatusCode::UNAUTHORIZED, Vec::new())),
	});
	let (client, harness) = client_over(http.clone(), false);
	let err = client.get::<Value>("/orders").await.expect_err("Session should expire.");

	assert!(err.is_session_expired());
	assert_eq!(http.calls_to(REFRESH_PATH), 1);
	assert!(harness.store.snapshot().is_empty());
	assert_eq!(harness.observer.count(), 1);
}

#[tokio::test]
async fn replay_failure_other_than_401_is_returned_unchanged() {
	let http = ScriptedHttpClient::new(|request| match (request.url.path(), bearer(request)) {
		(REFRESH_PATH, _) => Ok(ApiResponse::new(StatusCode::OK, r#"{"access":"fresh-access"}"#)),
		(_, Some("fresh-access")) => Ok(ApiResponse::new(StatusCode::SERVICE_UNAVAILABLE, Vec::new())),
		_ => Ok(ApiResponse::new(StatusCode::UNAUTHORIZED, Vec::new())),
	});
	let (client, harness) = client_over(http.clone(), false);
	let err = client.get::<Value>("/orders").await.expect_err("Replay should fail with 503.");

	assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
	assert_eq!(
		http.bearers_for("/api/orders"),
		vec![Some("expired-access".into()), Some("fresh-access".into())]
	);
	assert_eq!(http.calls_to(REFRESH_PATH), 1);
	assert_eq!(
		harness.store.snapshot().access_token.as_ref().map(TokenSecret::expose),
		Some("fresh-access")
	);
	assert_eq!(harness.observer.count(), 0);
}

#[tokio::test]
async fn refresh_request_carries_refresh_token_without_bearer() {
	let http = ScriptedHttpClient::new(orders_backend);
	let (client, _harness) = client_over(http.clone(), false);
	let _: Value = client.get("/orders").await.expect("Replay should succeed.");
	let refresh = http
		.seen
		.lock()
		.iter()
		.find(|request| request.url.path() == REFRESH_PATH)
		.cloned()
		.expect("A refresh call should have been recorded.");
	let body: Value = serde_json::from_slice(refresh.body.as_deref().unwrap_or_default())
		.expect("Refresh body should be JSON.");

	assert!(refresh.bearer.is_none());
	assert_eq!(body, serde_json::json!({ "refresh": "valid-refresh" }));
}

#[tokio::test]
async fn concurrent_failures_refresh_independently_by_default() {
	let http = ScriptedHttpClient::new(orders_backend);
	let (client, harness) = client_over(http.clone(), false);
	let (first, second) =
		tokio::join!(client.get::<Value>("/orders"), client.get::<Value>("/orders"));

	first.expect("First request should succeed after refresh.");
	second.expect("Second request should succeed after refresh.");

	assert_eq!(http.calls_to(REFRESH_PATH), 2);
	assert_eq!(http.calls_to("/api/orders"), 4);
	assert_eq!(client.refresh_metrics.replays(), 2);
	assert_eq!(harness.observer.count(), 0);
}

#[tokio::test]
async fn coalesced_refreshes_hit_backend_once() {
	let http = ScriptedHttpClient::new(orders_backend);
	let (client, harness) = client_over(http.clone(), true);
	let (first, second) =
		tokio::join!(client.get::<Value>("/orders"), client.get::<Value>("/orders"));

	first.expect("First request should succeed after refresh.");
	second.expect("Second request should reuse the peer's refreshed token.");

	assert_eq!(http.calls_to(REFRESH_PATH), 1);
	assert_eq!(http.calls_to("/api/orders"), 4);
	assert_eq!(client.refresh_metrics.attempts(), 1);
	assert_eq!(client.refresh_metrics.replays(), 2);
	assert_eq!(harness.observer.count(), 0);
}

#[tokio::test]
async fn paths_escaping_the_base_never_reach_the_transport() {
	let http = ScriptedHttpClient::new(orders_backend);
	let (client, harness) = client_over(http.clone(), false);

	for path in ["\\\\evil.example.com/orders", "\\/evil.example.com/orders", "../admin"] {
		let err = client.get::<Value>(path).await.expect_err("Escaping paths should be rejected.");

		assert!(
			matches!(err, Error::Config(ConfigError::NonRelativePath { .. })),
			"{path} produced {err:?}"
		);
	}

	assert!(http.seen.lock().is_empty());
	assert!(harness.store.snapshot().has_access_token());
}

#[tokio::test]
async fn store_is_shared_through_the_trait_object() {
	let http = ScriptedHttpClient::new(orders_backend);
	let (client, harness) = client_over(http, false);
	let _: Value = client.get("/orders").await.expect("Replay should succeed.");
	let through_trait = <dyn TokenStore>::get_tokens(client.store.as_ref())
		.await
		.expect("Store read should succeed.");

	assert_eq!(through_trait, harness.store.snapshot());
}
