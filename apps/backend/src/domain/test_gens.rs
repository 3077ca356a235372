// Proptest generators for domain types.

use proptest::prelude::*;

use crate::domain::{Card, Rank, Settings, Suit};

pub fn suit() -> impl Strategy<Value = Suit> {
    prop::sample::select(Suit::ALL.to_vec())
}

pub fn rank() -> impl Strategy<Value = Rank> {
    prop::sample::select(Rank::ALL.to_vec())
}

/// Any card, jokers included.
pub fn card() -> impl Strategy<Value = Card> {
    prop_oneof![
        12 => (rank(), suit()).prop_map(|(rank, suit)| Card::new(rank, suit)),
        1 => Just(Card::SmallJoker),
        1 => Just(Card::BigJoker),
    ]
}

/// Small, valid table configurations.
pub fn settings() -> impl Strategy<Value = Settings> {
    (1u8..=2, 2u8..=5, any::<bool>()).prop_map(|(num_decks, num_players, wraparound)| Settings {
        num_decks,
        num_players,
        wraparound,
        ..Settings::default()
    })
}

pub fn seed() -> impl Strategy<Value = u64> {
    any::<u64>()
}
