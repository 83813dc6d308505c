//! Bearer-token API client that keeps a session alive with one refresh-and-retry cycle, plus the
//! login/registration/profile actions and route gate that sit on top of it.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod actions;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod gate;
pub mod http;
pub mod obs;
pub mod session;
pub mod store;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
