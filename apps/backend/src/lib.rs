#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod ai;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod table;
pub mod telemetry;

// Re-exports for public API
pub use ai::{create_ai, AiConfig, AiPlayer, RandomPlayer};
pub use config::TableDefaults;
pub use domain::{GameSnapshot, GameState, PlayerId, Settings};
pub use error::{AppError, ProblemDetails};
pub use errors::{DomainError, ErrorCode};
pub use table::{ClientMsg, Outbound, Recipient, ServerMsg, TableHub, TableSession};
pub use telemetry::init_tracing;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
