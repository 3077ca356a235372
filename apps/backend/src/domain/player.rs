//! Per-seat player state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::cards_types::{Card, Rank};
use crate::domain::combos::{contains_all, count_cards};
use crate::errors::domain::{DomainError, ValidationKind};

const MAX_NAME_LEN: usize = 32;

/// Stable identity of a seated player (the authenticated actor id).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        PlayerId(s.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        PlayerId(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    pub avatar_uri: Option<String>,
}

impl PlayerProfile {
    /// Profile with a validated, trimmed name.
    pub fn new(name: &str, avatar_uri: Option<String>) -> Result<Self, DomainError> {
        let mut profile = Self::default();
        profile.apply(&[PlayerUpdate::Name(name.to_string()), PlayerUpdate::AvatarUri(avatar_uri)])?;
        Ok(profile)
    }

    /// Apply a batch of updates; nothing changes if any is invalid.
    pub fn apply(&mut self, updates: &[PlayerUpdate]) -> Result<(), DomainError> {
        let mut next = self.clone();
        for update in updates {
            match update {
                PlayerUpdate::Name(name) => {
                    let name = name.trim();
                    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
                        return Err(DomainError::validation_other(format!(
                            "Name must be 1..={MAX_NAME_LEN} characters"
                        )));
                    }
                    next.name = name.to_string();
                }
                PlayerUpdate::AvatarUri(uri) => next.avatar_uri = uri.clone(),
            }
        }
        *self = next;
        Ok(())
    }
}

/// One field change a client may request on its own profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum PlayerUpdate {
    Name(String),
    AvatarUri(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub seat: usize,
    pub profile: PlayerProfile,
    /// Private to the owner; see `snapshot`.
    pub hand: Vec<Card>,
    /// Point cards captured in tricks this round.
    pub points: Vec<Card>,
    pub rank: Rank,
}

impl Player {
    pub fn new(id: PlayerId, seat: usize, profile: PlayerProfile) -> Self {
        Self {
            id,
            seat,
            profile,
            hand: Vec::new(),
            points: Vec::new(),
            rank: Rank::Two,
        }
    }

    pub fn new_round(&mut self) {
        self.hand.clear();
        self.points.clear();
    }

    /// Advance rank by `steps`. Returns `true` when that runs past `Ace`,
    /// i.e. the player has won the game; rank then stays at `Ace`.
    pub fn increment_rank(&mut self, steps: u32) -> bool {
        match self.rank.advanced_by(steps) {
            Some(rank) => {
                self.rank = rank;
                false
            }
            None => {
                self.rank = Rank::Ace;
                true
            }
        }
    }

    pub fn copies_of(&self, card: Card) -> usize {
        self.hand.iter().filter(|c| **c == card).count()
    }

    pub fn holds_all(&self, cards: &[Card]) -> bool {
        contains_all(&self.hand, cards)
    }

    /// Remove the multiset `cards` from the hand, all or nothing.
    pub fn remove_cards(&mut self, cards: &[Card]) -> Result<(), DomainError> {
        if !self.holds_all(cards) {
            return Err(DomainError::validation(
                ValidationKind::CardNotInHand,
                format!("{} does not hold every submitted card", self.id),
            ));
        }
        let mut pending = count_cards(cards);
        self.hand.retain(|c| match pending.get_mut(c) {
            Some(n) if *n > 0 => {
                *n -= 1;
                false
            }
            _ => true,
        });
        Ok(())
    }

    pub fn apply_updates(&mut self, updates: &[PlayerUpdate]) -> Result<(), DomainError> {
        self.profile.apply(updates)
    }
}
