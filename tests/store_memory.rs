// std
use std::sync::Arc;
// self
use session_fetch::{
	auth::{TokenPair, TokenSecret},
	store::{MemoryStore, TokenStore},
};

#[tokio::test]
async fn store_and_fetch_round_trip() {
	let store = MemoryStore::default();

	assert!(store.get_tokens().await.expect("Empty store read should succeed.").is_empty());

	store
		.store_tokens("access-1".into(), "refresh-1".into())
		.await
		.expect("Storing a token pair should succeed.");

	let pair = store.get_tokens().await.expect("Store read should succeed.");

	assert_eq!(pair, TokenPair::new("access-1", "refresh-1"));
}

#[tokio::test]
async fn storing_access_token_keeps_refresh_token() {
	let store = MemoryStore::seeded(Some("access-1"), Some("refresh-1"));

	store
		.store_access_token(TokenSecret::new("access-2"))
		.await
		.expect("Replacing the access token should succeed.");

	let pair = store.get_tokens().await.expect("Store read should succeed.");

	assert_eq!(pair.access_token.as_ref().map(TokenSecret::expose), Some("access-2"));
	assert_eq!(pair.refresh_token.as_ref().map(TokenSecret::expose), Some("refresh-1"));
}

#[tokio::test]
async fn remove_tokens_clears_both_halves() {
	let store = MemoryStore::seeded(Some("access-1"), Some("refresh-1"));

	store.remove_tokens().await.expect("Clearing tokens should succeed.");

	assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn clones_share_state_and_last_writer_wins() {
	let store = MemoryStore::seeded(None, Some("refresh-1"));
	let shared: Arc<dyn TokenStore> = Arc::new(store.clone());

	shared.store_access_token("from-first".into()).await.expect("First write should succeed.");
	store.store_access_token("from-second".into()).await.expect("Second write should succeed.");

	let pair = shared.get_tokens().await.expect("Store read should succeed.");

	assert_eq!(pair.access_token.as_ref().map(TokenSecret::expose), Some("from-second"));
	assert_eq!(pair.refresh_token.as_ref().map(TokenSecret::expose), Some("refresh-1"));
}
