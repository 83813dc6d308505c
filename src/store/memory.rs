//! Thread-safe in-memory [`TokenStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{TokenPair, TokenSecret},
	store::{StoreFuture, TokenStore},
};

type StoreSlot = Arc<RwLock<TokenPair>>;

/// Storage backend that keeps the token pair in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreSlot);
impl MemoryStore {
	/// Creates a store pre-populated with the provided tokens.
	pub fn seeded(access: Option<&str>, refresh: Option<&str>) -> Self {
		let pair = TokenPair {
			access_token: access.map(TokenSecret::from),
			refresh_token: refresh.map(TokenSecret::from),
		};

		Self(Arc::new(RwLock::new(pair)))
	}

	/// Returns a copy of the current pair without going through the async contract.
	pub fn snapshot(&self) -> TokenPair {
		self.0.read().clone()
	}

	fn update(slot: &StoreSlot, f: impl FnOnce(&mut TokenPair)) {
		f(&mut slot.write());
	}
}
impl TokenStore for MemoryStore {
	fn get_tokens(&self) -> StoreFuture<'_, TokenPair> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(slot.read().clone()) })
	}

	fn store_tokens(&self, access: TokenSecret, refresh: TokenSecret) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			Self::update(&slot, |pair| {
				pair.access_token = Some(access);
				pair.refresh_token = Some(refresh);
			});

			Ok(())
		})
	}

	fn store_access_token(&self, access: TokenSecret) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			Self::update(&slot, |pair| pair.access_token = Some(access));

			Ok(())
		})
	}

	fn remove_tokens(&self) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			Self::update(&slot, |pair| *pair = TokenPair::default());

			Ok(())
		})
	}
}
