//! Combination units: singles, tuples and tractors, plus trick comparison.
//!
//! A unit is the smallest thing a player submits: `width` identical copies
//! of each of `length` consecutive cards of one trump-relative suit. A
//! single is `1x1`, a pair `2x1`, a tractor of pairs `2xN` with `N >= 2`.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::cards_logic::{effective_suit, follows, strength, Trump, TOP_PLAIN_STRENGTH};
use super::cards_types::{Card, TrumpSuit};
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub width: u8,
    pub length: u8,
}

impl Shape {
    pub fn size(self) -> usize {
        self.width as usize * self.length as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Distinct cards in chain order; the last one is the top of the unit.
    chain: Vec<Card>,
    width: u8,
    suit: TrumpSuit,
    top_strength: u8,
}

fn invalid(detail: impl Into<String>) -> DomainError {
    DomainError::validation(ValidationKind::InvalidCombination, detail)
}

/// Count copies of each card.
pub fn count_cards(cards: &[Card]) -> BTreeMap<Card, usize> {
    let mut counts = BTreeMap::new();
    for card in cards {
        *counts.entry(*card).or_insert(0) += 1;
    }
    counts
}

/// Multiset containment: every card of `wanted` is present in `pool` at
/// least as many times as requested.
pub fn contains_all(pool: &[Card], wanted: &[Card]) -> bool {
    let have = count_cards(pool);
    count_cards(wanted)
        .into_iter()
        .all(|(card, n)| have.get(&card).copied().unwrap_or(0) >= n)
}

impl Unit {
    /// Build a unit from the cards a player submitted.
    pub fn from_cards(cards: &[Card], trump: Trump, wraparound: bool) -> Result<Unit, DomainError> {
        let first = cards
            .first()
            .ok_or_else(|| invalid("Combination must contain at least one card"))?;
        let suit = effective_suit(*first, trump);
        if cards.iter().any(|c| effective_suit(*c, trump) != suit) {
            return Err(invalid("Combination mixes suits"));
        }

        let counts = count_cards(cards);
        let Some(&width) = counts.values().next() else {
            return Err(invalid("Combination must contain at least one card"));
        };
        if counts.values().any(|&n| n != width) {
            return Err(invalid("Combination has uneven copies"));
        }
        let width = u8::try_from(width).map_err(|_| invalid("Combination too wide"))?;

        let mut distinct: Vec<Card> = counts.keys().copied().collect();
        distinct.sort_by_key(|c| strength(*c, trump));

        if distinct.len() == 1 {
            let top_strength = strength(distinct[0], trump);
            return Ok(Unit {
                chain: distinct,
                width,
                suit,
                top_strength,
            });
        }

        if width < 2 {
            return Err(invalid("Tractors need at least pairs"));
        }
        let chain = order_chain(distinct, suit, trump, wraparound)
            .ok_or_else(|| invalid("Tractor cards are not consecutive"))?;
        let top_strength = chain.last().map(|c| strength(*c, trump)).unwrap_or(0);
        Ok(Unit {
            chain,
            width,
            suit,
            top_strength,
        })
    }

    /// Every card the unit spans, `width` copies each.
    pub fn cards(&self) -> Vec<Card> {
        self.chain
            .iter()
            .flat_map(|c| std::iter::repeat(*c).take(self.width as usize))
            .collect()
    }

    pub fn chain(&self) -> &[Card] {
        &self.chain
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn length(&self) -> u8 {
        self.chain.len() as u8
    }

    pub fn shape(&self) -> Shape {
        Shape {
            width: self.width,
            length: self.length(),
        }
    }

    pub fn size(&self) -> usize {
        self.shape().size()
    }

    pub fn suit(&self) -> TrumpSuit {
        self.suit
    }

    pub fn top_strength(&self) -> u8 {
        self.top_strength
    }

    /// Representative card of the unit (its top).
    pub fn top_card(&self) -> Card {
        self.chain[self.chain.len() - 1]
    }
}

/// Order distinct same-suit cards (sorted by strength) into a chain of
/// directly following strengths, wrapping past the top plain rank if allowed.
fn order_chain(
    sorted: Vec<Card>,
    suit: TrumpSuit,
    trump: Trump,
    wraparound: bool,
) -> Option<Vec<Card>> {
    let strengths: Vec<u8> = sorted.iter().map(|c| strength(*c, trump)).collect();
    let gaps: Vec<usize> = (0..strengths.len() - 1)
        .filter(|&i| !follows(strengths[i], strengths[i + 1], suit, false))
        .collect();
    match gaps.as_slice() {
        [] => Some(sorted),
        [g] if wraparound
            && matches!(suit, TrumpSuit::Plain(_))
            && strengths[0] == 0
            && strengths[strengths.len() - 1] == TOP_PLAIN_STRENGTH =>
        {
            let mut chain = sorted[g + 1..].to_vec();
            chain.extend_from_slice(&sorted[..=*g]);
            Some(chain)
        }
        _ => None,
    }
}

/// Canonical order key: bigger units first, then wider, then trump, then stronger.
fn unit_key(unit: &Unit) -> (usize, u8, bool, u8) {
    (
        unit.size(),
        unit.width,
        unit.suit == TrumpSuit::Trump,
        unit.top_strength,
    )
}

pub fn compare_units(a: &Unit, b: &Unit) -> Ordering {
    unit_key(a).cmp(&unit_key(b))
}

/// Sort units strongest first.
pub fn sort_units_desc(units: &mut [Unit]) {
    units.sort_by(|a, b| compare_units(b, a));
}

pub fn total_size(units: &[Unit]) -> usize {
    units.iter().map(Unit::size).sum()
}

pub fn all_cards(units: &[Unit]) -> Vec<Card> {
    units.iter().flat_map(Unit::cards).collect()
}

/// The single suit every unit shares, if there is one.
pub fn common_suit(units: &[Unit]) -> Option<TrumpSuit> {
    let suit = units.first()?.suit;
    units.iter().all(|u| u.suit == suit).then_some(suit)
}

fn sorted_shapes(units: &[Unit]) -> Vec<Shape> {
    let mut shapes: Vec<Shape> = units.iter().map(Unit::shape).collect();
    shapes.sort_unstable();
    shapes
}

fn primary(units: &[Unit]) -> Option<&Unit> {
    units
        .iter()
        .max_by(|a, b| a.shape().cmp(&b.shape()).then(a.top_strength.cmp(&b.top_strength)))
}

/// Whether `challenger` takes the trick away from the current `best`.
///
/// The challenger must be one suit, either the best's suit or trump, and
/// repeat the best's unit shapes exactly. Trump over a plain best wins;
/// within one suit the strongest largest unit must be strictly higher.
pub fn beats(challenger: &[Unit], best: &[Unit]) -> bool {
    let (Some(cs), Some(bs)) = (common_suit(challenger), common_suit(best)) else {
        return false;
    };
    if cs != bs && cs != TrumpSuit::Trump {
        return false;
    }
    if sorted_shapes(challenger) != sorted_shapes(best) {
        return false;
    }
    if cs == TrumpSuit::Trump && bs != TrumpSuit::Trump {
        return true;
    }
    match (primary(challenger), primary(best)) {
        (Some(c), Some(b)) => c.top_strength > b.top_strength,
        _ => false,
    }
}
