//! Mode routing
//!
//! - Server mode (HTTP server, default)
//! - CLI mode (one-off commands against the configured store)

pub mod cli;
pub mod server;

pub use cli::run_cli;
pub use server::{build_app_config, run_server};
