//! File-backed [`TokenStore`] that keeps the session across process restarts.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{TokenPair, TokenSecret},
	store::{StoreError, StoreFuture, TokenStore},
};

/// Persists the token pair to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<TokenPair>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<TokenPair, StoreError> {
		if !path.exists() {
			return Ok(TokenPair::default());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.is_empty() {
			return Ok(TokenPair::default());
		}

		serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, contents: &TokenPair) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(contents).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize token pair: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		let result = Self::write_snapshot(&tmp_path, &serialized).and_then(|()| {
			fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
				message: format!("Failed to replace {}: {e}", self.path.display()),
			})
		});

		if result.is_err() {
			let _ = fs::remove_file(&tmp_path);
		}

		result
	}

	fn write_snapshot(tmp_path: &Path, serialized: &[u8]) -> Result<(), StoreError> {
		let mut file = File::create(tmp_path).map_err(|e| StoreError::Backend {
			message: format!("Failed to create {}: {e}", tmp_path.display()),
		})?;

		file.write_all(serialized).map_err(|e| StoreError::Backend {
			message: format!("Failed to write {}: {e}", tmp_path.display()),
		})?;
		file.sync_all().map_err(|e| StoreError::Backend {
			message: format!("Failed to sync {}: {e}", tmp_path.display()),
		})
	}

	/// Applies `f` to a copy of the pair; memory only changes once the copy is on disk.
	fn mutate(&self, f: impl FnOnce(&mut TokenPair)) -> Result<(), StoreError> {
		let mut guard = self.inner.write();
		let mut next = guard.clone();

		f(&mut next);
		self.persist_locked(&next)?;

		*guard = next;

		Ok(())
	}
}
impl TokenStore for FileStore {
	fn get_tokens(&self) -> StoreFuture<'_, TokenPair> {
		Box::pin(async move { Ok(self.inner.read().clone()) })
	}

	fn store_tokens(&self, access: TokenSecret, refresh: TokenSecret) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.mutate(|pair| {
				pair.access_token = Some(access);
				pair.refresh_token = Some(refresh);
			})
		})
	}

	fn store_access_token(&self, access: TokenSecret) -> StoreFuture<'_, ()> {
		Box::pin(async move { self.mutate(|pair| pair.access_token = Some(access)) })
	}

	fn remove_tokens(&self) -> StoreFuture<'_, ()> {
		Box::pin(async move { self.mutate(|pair| *pair = TokenPair::default()) })
	}
}
