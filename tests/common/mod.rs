//! Builders shared by the integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// self
use session_fetch::{
	client::SessionClient,
	config::ClientConfig,
	http::ApiHttpClient,
	session::RecordingObserver,
	store::{MemoryStore, TokenStore},
	url::Url,
};

#[cfg(feature = "reqwest")] use session_fetch::http::ReqwestHttpClient;

/// Client type alias used by reqwest-backed integration tests.
#[cfg(feature = "reqwest")]
pub type ReqwestTestClient = SessionClient<ReqwestHttpClient>;

/// Handles returned alongside a test client so assertions can inspect side effects.
#[derive(Clone, Debug)]
pub struct TestHarness {
	/// Store shared with the client.
	pub store: Arc<MemoryStore>,
	/// Observer recording every session-expiry notification.
	pub observer: Arc<RecordingObserver>,
}

/// Parses `base_url` into a default configuration.
pub fn test_config(base_url: &str) -> ClientConfig {
	ClientConfig::builder(Url::parse(base_url).expect("Mock server base URL should parse."))
		.build()
		.expect("Test client configuration should be valid.")
}

/// Builds a client over `http_client` with an in-memory store seeded with the provided tokens
/// and an observer that records redirects.
pub fn build_test_client<C>(
	config: ClientConfig,
	http_client: impl Into<Arc<C>>,
	access: Option<&str>,
	refresh: Option<&str>,
) -> (SessionClient<C>, TestHarness)
where
	C: ApiHttpClient,
{
	let store_backend = Arc::new(MemoryStore::seeded(access, refresh));
	let store: Arc<dyn TokenStore> = store_backend.clone();
	let observer = Arc::new(RecordingObserver::default());
	let client = SessionClient::with_http_client(config, store, http_client)
		.with_observer(observer.clone());

	(client, TestHarness { store: store_backend, observer })
}

/// Builds a reqwest-backed client against `base_url`.
#[cfg(feature = "reqwest")]
pub fn build_reqwest_test_client(
	base_url: &str,
	access: Option<&str>,
	refresh: Option<&str>,
) -> (ReqwestTestClient, TestHarness) {
	build_test_client(test_config(base_url), ReqwestHttpClient::default(), access, refresh)
}
