//! Shared building blocks for the Greta calendar bridge
//!
//! Configuration, the common error type and the local key/value storage
//! that backs the client-side stores.

pub mod config;
pub mod consent;
pub mod error;
pub mod storage;

pub use config::Config;
pub use consent::{AdSlot, ConsentStore};
pub use error::{Error, Result};
pub use storage::LocalStorage;
