//! Auth-domain secrets, token pairs, and the payloads exchanged with the backend.

pub mod payload;
pub mod token;

pub use payload::*;
pub use token::{pair::*, secret::*};
