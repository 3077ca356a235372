//! Card game logic: trump classification, card strength, point values, hand sorting

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::cards_types::{Card, Rank, Suit, TrumpSuit};

/// Highest strength a plain-suit card can have (12 ranks once the trump rank is lifted out).
pub const TOP_PLAIN_STRENGTH: u8 = 11;

/// Trump for one round: the rank and suit of the winning declaration.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Trump {
    pub rank: Rank,
    pub suit: Suit,
}

impl Trump {
    /// Trump named by a declared card; jokers cannot be declared.
    pub fn from_declared(card: Card) -> Option<Trump> {
        match card {
            Card::Suited { rank, suit } => Some(Trump { rank, suit }),
            _ => None,
        }
    }
}

pub fn effective_suit(card: Card, trump: Trump) -> TrumpSuit {
    match card {
        Card::SmallJoker | Card::BigJoker => TrumpSuit::Trump,
        Card::Suited { rank, suit } => {
            if rank == trump.rank || suit == trump.suit {
                TrumpSuit::Trump
            } else {
                TrumpSuit::Plain(suit)
            }
        }
    }
}

pub fn is_trump(card: Card, trump: Trump) -> bool {
    effective_suit(card, trump) == TrumpSuit::Trump
}

/// Strength of a card within its effective suit.
///
/// Plain ranks skip the trump rank so they stay contiguous. Inside trump:
/// trump-suit plain ranks `0..=11`, off-suit trump-rank cards `12` (all
/// equal), trump-suit trump-rank card `13`, small joker `14`, big joker `15`.
pub fn strength(card: Card, trump: Trump) -> u8 {
    match card {
        Card::BigJoker => 15,
        Card::SmallJoker => 14,
        Card::Suited { rank, suit } => {
            if rank == trump.rank {
                if suit == trump.suit {
                    13
                } else {
                    12
                }
            } else {
                let idx = rank.index() as u8;
                if rank > trump.rank {
                    idx - 1
                } else {
                    idx
                }
            }
        }
    }
}

/// Whether strength `next` directly follows `prev` within `suit`.
///
/// With `wraparound`, the top plain rank is followed by the bottom one.
pub fn follows(prev: u8, next: u8, suit: TrumpSuit, wraparound: bool) -> bool {
    if next == prev + 1 {
        return true;
    }
    wraparound
        && matches!(suit, TrumpSuit::Plain(_))
        && prev == TOP_PLAIN_STRENGTH
        && next == 0
}

pub fn point_value(card: Card) -> u32 {
    match card.rank() {
        Some(Rank::Five) => 5,
        Some(Rank::Ten) | Some(Rank::King) => 10,
        _ => 0,
    }
}

pub fn points_of<'a, I>(cards: I) -> u32
where
    I: IntoIterator<Item = &'a Card>,
{
    cards.into_iter().map(|c| point_value(*c)).sum()
}

/// Total ordering for display/hand sorting: plain suits in suit order, trump last,
/// ascending strength, printed card as tie-break.
pub fn compare_cards(a: Card, b: Card, trump: Trump) -> Ordering {
    effective_suit(a, trump)
        .cmp(&effective_suit(b, trump))
        .then_with(|| strength(a, trump).cmp(&strength(b, trump)))
        .then_with(|| a.cmp(&b))
}

pub fn sort_hand(hand: &mut [Card], trump: Trump) {
    hand.sort_by(|a, b| compare_cards(*a, *b, trump));
}

/// Cards of `hand` in the given effective suit.
pub fn suited_cards(hand: &[Card], suit: TrumpSuit, trump: Trump) -> Vec<Card> {
    hand.iter()
        .copied()
        .filter(|c| effective_suit(*c, trump) == suit)
        .collect()
}
