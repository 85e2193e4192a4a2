//! Greta calendar bridge HTTP server
//!
//! Exposes the Google OAuth endpoints and the calendar event gateway used by
//! the site and the `greta` companion.

pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_router, run_server};
pub use state::AppState;
