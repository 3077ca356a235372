//! How to register your AI
//!
//! 1) Implement `AiPlayer` for your type in its module.
//! 2) Add a new `AiFactory` entry to the static list with stable `name` and `version`.
//! 3) Keep ordering stable; avoid side effects in constructors.
//! 4) Determinism: same config seed ⇒ same behavior.

use crate::ai::{AiConfig, AiPlayer, RandomPlayer};

/// Factory definition for constructing AI implementations.
pub struct AiFactory {
    pub name: &'static str,
    pub version: &'static str,
    pub make: fn(config: &AiConfig) -> Box<dyn AiPlayer>,
}

static AI_FACTORIES: &[AiFactory] = &[AiFactory {
    name: RandomPlayer::NAME,
    version: RandomPlayer::VERSION,
    make: make_random_player,
}];

/// Returns the statically registered AI factories.
pub fn registered_ais() -> &'static [AiFactory] {
    AI_FACTORIES
}

/// Finds a registered AI factory by its name.
pub fn by_name(name: &str) -> Option<&'static AiFactory> {
    registered_ais().iter().find(|factory| factory.name == name)
}

fn make_random_player(config: &AiConfig) -> Box<dyn AiPlayer> {
    let rate = config
        .declare_rate()
        .unwrap_or(RandomPlayer::DEFAULT_DECLARE_RATE);
    Box::new(RandomPlayer::with_declare_rate(config.seed(), rate))
}
