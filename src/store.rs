//! Storage contract and built-in stores for the session's token pair.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{TokenPair, TokenSecret},
};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for the session's tokens.
///
/// Writes are last-writer-wins; the client never holds a store lock across a network call.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Reads the tokens currently held; missing halves are `None`.
	fn get_tokens(&self) -> StoreFuture<'_, TokenPair>;

	/// Replaces both tokens, as after a successful login.
	fn store_tokens(&self, access: TokenSecret, refresh: TokenSecret) -> StoreFuture<'_, ()>;

	/// Replaces only the access token, as after a successful refresh.
	fn store_access_token(&self, access: TokenSecret) -> StoreFuture<'_, ()>;

	/// Drops both tokens, ending the session.
	fn remove_tokens(&self) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
