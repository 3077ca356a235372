//! Legal-shape enumeration for following a led trick, and throw beatability.
//!
//! A follower who holds more cards of the led suit than the trick needs must
//! show the strongest structure they can: for every led unit (largest
//! first) they reserve the longest run of tuples of the same width their
//! remaining holding supplies, then shorter runs, then narrower tuples.
//! Each way of reserving is a [`Possibility`]; a follow is legal when its
//! suited cards contain every required structure of one of them.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use super::cards_logic::{follows, strength, Trump};
use super::cards_types::{Card, TrumpSuit};
use super::combos::{count_cards, sort_units_desc, Shape, Unit};

/// Upper bound on distinct partial reservations carried between led units.
/// Only ever trims; at least one complete branch always survives.
const MAX_PARTIALS: usize = 4096;

/// One required structure and the concrete cards that realise it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub shape: Shape,
    pub chain: Vec<Card>,
}

/// A set of structures a legal follow must contain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Possibility {
    pub requirements: Vec<Requirement>,
}

impl Possibility {
    pub fn shapes(&self) -> Vec<Shape> {
        let mut shapes: Vec<Shape> = self.requirements.iter().map(|r| r.shape).collect();
        shapes.sort_unstable_by(|a, b| b.cmp(a));
        shapes
    }

    /// Every card the required structures span.
    pub fn cards(&self) -> Vec<Card> {
        self.requirements
            .iter()
            .flat_map(|r| {
                r.chain
                    .iter()
                    .flat_map(move |c| std::iter::repeat(*c).take(r.shape.width as usize))
            })
            .collect()
    }
}

type Counts = BTreeMap<Card, usize>;

fn take(counts: &Counts, chain: &[Card], width: u8) -> Counts {
    let mut rest = counts.clone();
    for card in chain {
        if let Some(n) = rest.get_mut(card) {
            *n = n.saturating_sub(width as usize);
        }
    }
    rest.retain(|_, n| *n > 0);
    rest
}

/// Requirements reserved so far and the holding they leave.
type Partial = (Vec<Requirement>, Counts);

type FillMemo = BTreeMap<(Counts, u8, u8), Vec<Partial>>;

/// Reservations with the same shapes that leave the same cards behind are
/// interchangeable for everything that follows; keep the first of each.
fn dedup_partials(partials: Vec<Partial>) -> Vec<Partial> {
    let mut seen = BTreeSet::new();
    partials
        .into_iter()
        .filter(|(reqs, left)| {
            let mut shapes: Vec<Shape> = reqs.iter().map(|r| r.shape).collect();
            shapes.sort_unstable();
            seen.insert((shapes, left.clone()))
        })
        .collect()
}

/// Matcher over one player's holding in the led suit.
#[derive(Debug, Clone)]
pub struct Matcher {
    holding: Counts,
    led: Vec<Unit>,
    suit: Option<TrumpSuit>,
    trump: Trump,
    wraparound: bool,
}

impl Matcher {
    pub fn from_hand(holding: &[Card], led: &[Unit], trump: Trump, wraparound: bool) -> Self {
        let mut led = led.to_vec();
        sort_units_desc(&mut led);
        let suit = led.first().map(Unit::suit);
        Self {
            holding: count_cards(holding),
            led,
            suit,
            trump,
            wraparound,
        }
    }

    /// All chains of `shape` available in `counts`.
    fn structures(&self, counts: &Counts, shape: Shape) -> Vec<Vec<Card>> {
        let Some(suit) = self.suit else {
            return Vec::new();
        };
        let mut levels: BTreeMap<u8, Vec<Card>> = BTreeMap::new();
        for (card, n) in counts {
            if *n >= shape.width as usize {
                levels.entry(strength(*card, self.trump)).or_default().push(*card);
            }
        }
        let mut out = Vec::new();
        for (s, cards) in &levels {
            for card in cards {
                self.extend_chain(&levels, vec![*card], *s, shape.length, suit, &mut out);
            }
        }
        out
    }

    fn extend_chain(
        &self,
        levels: &BTreeMap<u8, Vec<Card>>,
        chain: Vec<Card>,
        last: u8,
        length: u8,
        suit: TrumpSuit,
        out: &mut Vec<Vec<Card>>,
    ) {
        if chain.len() == length as usize {
            out.push(chain);
            return;
        }
        for (s, cards) in levels {
            if !follows(last, *s, suit, self.wraparound) {
                continue;
            }
            for card in cards {
                if chain.contains(card) {
                    continue;
                }
                let mut next = chain.clone();
                next.push(*card);
                self.extend_chain(levels, next, *s, length, suit, out);
            }
        }
    }

    /// Reservation branches for one led slot of `width x length`. Never empty.
    fn fill(&self, counts: &Counts, width: u8, length: u8, memo: &mut FillMemo) -> Vec<Partial> {
        if width <= 1 || length == 0 {
            return vec![(Vec::new(), counts.clone())];
        }
        let key = (counts.clone(), width, length);
        if let Some(hit) = memo.get(&key) {
            return hit.clone();
        }
        let mut branches = Vec::new();
        for len in (1..=length).rev() {
            let shape = Shape { width, length: len };
            let candidates = self.structures(counts, shape);
            if candidates.is_empty() {
                continue;
            }
            for chain in candidates {
                let rest = take(counts, &chain, width);
                for (mut reqs, left) in self.fill(&rest, width, length - len, memo) {
                    reqs.insert(
                        0,
                        Requirement {
                            shape,
                            chain: chain.clone(),
                        },
                    );
                    branches.push((reqs, left));
                }
            }
            break;
        }
        if branches.is_empty() {
            branches = self.fill(counts, width - 1, length, memo);
        }
        let branches = dedup_partials(branches);
        memo.insert(key, branches.clone());
        branches
    }

    /// Enumerate the structure sets a legal follow may take.
    pub fn possibilities(&self) -> Vec<Possibility> {
        let mut memo = FillMemo::new();
        let mut partials: Vec<Partial> = vec![(Vec::new(), self.holding.clone())];
        for unit in &self.led {
            let mut next = Vec::new();
            for (reqs, counts) in &partials {
                for (more, left) in self.fill(counts, unit.width(), unit.length(), &mut memo) {
                    let mut all = reqs.clone();
                    all.extend(more);
                    next.push((all, left));
                }
            }
            partials = dedup_partials(next);
            partials.truncate(MAX_PARTIALS);
        }

        let mut seen = HashSet::new();
        partials
            .into_iter()
            .map(|(requirements, _)| Possibility { requirements })
            .filter(|p| seen.insert(p.shapes()))
            .collect()
    }

    /// Whether `cards` contain disjoint structures for every requirement.
    pub fn satisfies(&self, cards: &[Card], possibility: &Possibility) -> bool {
        let mut shapes = possibility.shapes();
        shapes.reverse();
        self.place(&count_cards(cards), &mut shapes)
    }

    fn place(&self, counts: &Counts, pending: &mut Vec<Shape>) -> bool {
        let Some(shape) = pending.pop() else {
            return true;
        };
        for chain in self.structures(counts, shape) {
            let rest = take(counts, &chain, shape.width);
            if self.place(&rest, pending) {
                pending.push(shape);
                return true;
            }
        }
        pending.push(shape);
        false
    }

    /// For a single led unit: can this holding produce the same shape, strictly higher?
    pub fn beats_trick(&self) -> bool {
        let [unit] = self.led.as_slice() else {
            return false;
        };
        self.structures(&self.holding, unit.shape())
            .iter()
            .filter_map(|chain| chain.last())
            .any(|top| strength(*top, self.trump) > unit.top_strength())
    }
}

/// Whether the submitted units, restricted to `suit`, satisfy `possibility`.
pub fn matches_possibility(
    units: &[Unit],
    possibility: &Possibility,
    matcher: &Matcher,
    suit: TrumpSuit,
) -> bool {
    let suited: Vec<Card> = units
        .iter()
        .filter(|u| u.suit() == suit)
        .flat_map(Unit::cards)
        .collect();
    matcher.satisfies(&suited, possibility)
}
