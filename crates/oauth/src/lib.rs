//! Google OAuth 2.0 for Google Calendar access
//!
//! This crate builds the consent URL, exchanges authorization codes for
//! tokens, carries the resulting token pair back to the client through the
//! callback redirect, and caches it on the client side.

pub mod constants;
pub mod flow;
pub mod redirect;
pub mod storage;
pub mod tokens;

pub use flow::OAuthFlow;
pub use redirect::AuthOutcome;
pub use storage::TokenCache;
pub use tokens::TokenPair;
