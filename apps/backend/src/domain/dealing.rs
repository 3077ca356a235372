//! Deterministic multi-deck construction.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::rules::CARDS_PER_DECK;
use crate::domain::{Card, Rank, Suit};

/// One 54-card deck in standard order (jokers last).
fn single_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(CARDS_PER_DECK);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            deck.push(Card::Suited { rank, suit });
        }
    }
    deck.push(Card::SmallJoker);
    deck.push(Card::BigJoker);
    deck
}

/// Build `num_decks` decks and shuffle them with a seeded ChaCha RNG.
///
/// The same `(num_decks, seed)` always yields the same order, so a round
/// can be replayed from its derived dealing seed.
pub fn build_deck(num_decks: u8, seed: u64) -> Vec<Card> {
    let mut deck = Vec::with_capacity(CARDS_PER_DECK * num_decks as usize);
    for _ in 0..num_decks {
        deck.extend(single_deck());
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    deck.shuffle(&mut rng);
    deck
}
