//! Token secrets and the access/refresh pair kept by token stores.

pub mod pair;
pub mod secret;
