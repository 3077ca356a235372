//! AI player module - automated seat decisions.
//!
//! This module provides:
//! - [`AiPlayer`], the decision trait bots implement
//! - legal-move helpers over a seat's own snapshot
//! - [`RandomPlayer`]: random legal moves (seedable for tests)
//! - a registry to build bots by name

mod config;
pub mod legal;
mod random;
pub mod registry;
mod trait_def;

pub use config::AiConfig;
pub use random::RandomPlayer;
pub use trait_def::{AiError, AiPlayer, BottomChoice};

/// Create an AI player by registered name (or the `"random"` shorthand).
///
/// Returns None if `ai_type` is unrecognized.
pub fn create_ai(ai_type: &str, config: AiConfig) -> Option<Box<dyn AiPlayer>> {
    let name = match ai_type {
        "random" => RandomPlayer::NAME,
        other => other,
    };
    registry::by_name(name).map(|factory| (factory.make)(&config))
}
