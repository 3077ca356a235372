//! Core card-related types: Card, Rank, Suit, TrumpSuit

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];
}

/// Ranks double as the rank-progression sequence: every player starts at
/// `Two` and wins the game by advancing past `Ace`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Zero-based position in the progression sequence.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Rank `steps` positions later, or `None` when that runs past `Ace`.
    pub fn advanced_by(self, steps: u32) -> Option<Rank> {
        let idx = self.index().checked_add(steps as usize)?;
        Rank::ALL.get(idx).copied()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Card {
    Suited { rank: Rank, suit: Suit },
    SmallJoker,
    BigJoker,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Card::Suited { rank, suit }
    }

    pub fn rank(self) -> Option<Rank> {
        match self {
            Card::Suited { rank, .. } => Some(rank),
            _ => None,
        }
    }

    pub fn suit(self) -> Option<Suit> {
        match self {
            Card::Suited { suit, .. } => Some(suit),
            _ => None,
        }
    }

    pub fn is_joker(self) -> bool {
        matches!(self, Card::SmallJoker | Card::BigJoker)
    }
}

// Note: Ord on Card is only for stable sorting and multiset bookkeeping:
// suited cards by suit then rank, jokers last.
// Do not use for trick resolution; see `cards_logic::strength`.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        fn key(c: &Card) -> (u8, u8) {
            match *c {
                Card::Suited { rank, suit } => (suit as u8, rank as u8),
                Card::SmallJoker => (4, 0),
                Card::BigJoker => (4, 1),
            }
        }
        key(self).cmp(&key(other))
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Trump-relative suit of a card for one round.
///
/// Jokers, every card of the trump rank and every card of the trump suit
/// all belong to `Trump`; everything else keeps its printed suit.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum TrumpSuit {
    Plain(Suit),
    Trump,
}
