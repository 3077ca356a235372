//! Domain layer: pure rules engine, no I/O.

pub mod bidding;
pub mod cards_logic;
pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod combos;
pub mod dealing;
pub mod exchange;
pub mod matcher;
pub mod player;
pub mod round;
pub mod settings;

pub mod game_transition;
pub mod rules;
pub mod scoring;
pub mod seed_derivation;
pub mod snapshot;
pub mod state;
pub mod tricks;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_bidding;
#[cfg(test)]
mod tests_game_transition;
#[cfg(test)]
mod tests_integration;
#[cfg(test)]
mod tests_props_consistency;
#[cfg(test)]
mod tests_props_legality;
#[cfg(test)]
mod tests_scoring;

// Re-exports for ergonomics
pub use bidding::{declare, end_deal_phase};
pub use cards_logic::{effective_suit, point_value, strength, Trump};
pub use cards_types::{Card, Rank, Suit, TrumpSuit};
pub use combos::{Shape, Unit};
pub use exchange::end_bottom_phase;
pub use player::{Player, PlayerId, PlayerProfile, PlayerUpdate};
pub use round::{
    add_player, deal_all, deal_card, redeal, remove_player, reset, start_round, update_settings,
};
pub use settings::{Settings, SettingsUpdate};
pub use state::{
    DealPhaseResult, Declaration, FriendCall, GameState, Phase, PlayResult, RoundResult,
    TrickPlay, TrickResult,
};
pub use snapshot::{snapshot, GameSnapshot};
pub use tricks::{follow_options, legal_follows, make_play};
