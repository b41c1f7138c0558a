//! Dashboard HTTP server module
//!
//! Run with `trade-dashboard serve` or `dashboard-server`.

pub mod handlers;
pub mod server;

pub use server::{router, run_api_server, ApiConfig, AppState};
