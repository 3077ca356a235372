//! Round configuration, validated once when a table starts a game.

use serde::{Deserialize, Serialize};

use crate::domain::rules::{
    derive_bottom_size, CARDS_PER_DECK, MAX_BOTTOM_MULTIPLIER, MIN_PLAYERS, POINTS_PER_DECK,
};
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub num_decks: u8,
    pub num_players: u8,
    /// Top and bottom plain ranks are adjacent for tractors.
    pub wraparound: bool,
    /// Only last round's winners may declare trump.
    pub winners_declare: bool,
    /// Attacking team size including the declarer; `num_players / 2` when unset.
    pub team_size: Option<u8>,
    /// Derived from deck and table size when unset.
    pub bottom_size: Option<u16>,
    pub cutoff_per_deck: u32,
    pub bottom_multiplier: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            num_decks: 1,
            num_players: 4,
            wraparound: false,
            winners_declare: false,
            team_size: None,
            bottom_size: None,
            cutoff_per_deck: 40,
            bottom_multiplier: 2,
        }
    }
}

/// Explicit patch of the fields a settings change may touch.
///
/// `team_size` and `bottom_size` are doubly optional: `Some(None)` clears an
/// explicit value back to the derived default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsUpdate {
    pub num_decks: Option<u8>,
    pub num_players: Option<u8>,
    pub wraparound: Option<bool>,
    pub winners_declare: Option<bool>,
    pub team_size: Option<Option<u8>>,
    pub bottom_size: Option<Option<u16>>,
    pub cutoff_per_deck: Option<u32>,
    pub bottom_multiplier: Option<u32>,
}

fn invalid(detail: impl Into<String>) -> DomainError {
    DomainError::validation(ValidationKind::InvalidSettings, detail)
}

impl Settings {
    pub fn total_cards(&self) -> usize {
        CARDS_PER_DECK * self.num_decks as usize
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.num_decks == 0 {
            return Err(invalid("Must not have 0 decks."));
        }
        if self.num_players < MIN_PLAYERS {
            return Err(invalid("Must have at least 2 players."));
        }
        let total = self.total_cards();
        let players = self.num_players as usize;
        let bottom = self.bottom_size() as usize;
        if bottom >= total || (total - bottom) % players != 0 {
            return Err(invalid("Invalid bottom size."));
        }
        if let Some(team) = self.team_size {
            if team == 0 || team >= self.num_players {
                return Err(invalid("Team size must leave at least one defender."));
            }
        }
        if self.cutoff_per_deck == 0 || self.cutoff_per_deck > POINTS_PER_DECK {
            return Err(invalid(format!(
                "Cutoff per deck must be between 1 and {POINTS_PER_DECK}."
            )));
        }
        if self.bottom_multiplier > MAX_BOTTOM_MULTIPLIER {
            return Err(invalid(format!(
                "Bottom multiplier must be at most {MAX_BOTTOM_MULTIPLIER}."
            )));
        }
        Ok(())
    }

    pub fn team_size(&self) -> u8 {
        self.team_size.unwrap_or(self.num_players / 2)
    }

    pub fn bottom_size(&self) -> u16 {
        self.bottom_size
            .unwrap_or_else(|| derive_bottom_size(self.num_decks, self.num_players))
    }

    pub fn cutoff(&self) -> u32 {
        u32::from(self.num_decks).saturating_mul(self.cutoff_per_deck)
    }

    /// Apply `update` to a staged copy and commit only if it validates.
    pub fn apply(&mut self, update: SettingsUpdate) -> Result<(), DomainError> {
        let mut next = self.clone();
        if let Some(v) = update.num_decks {
            next.num_decks = v;
        }
        if let Some(v) = update.num_players {
            next.num_players = v;
        }
        if let Some(v) = update.wraparound {
            next.wraparound = v;
        }
        if let Some(v) = update.winners_declare {
            next.winners_declare = v;
        }
        if let Some(v) = update.team_size {
            next.team_size = v;
        }
        if let Some(v) = update.bottom_size {
            next.bottom_size = v;
        }
        if let Some(v) = update.cutoff_per_deck {
            next.cutoff_per_deck = v;
        }
        if let Some(v) = update.bottom_multiplier {
            next.bottom_multiplier = v;
        }
        next.validate()?;
        *self = next;
        Ok(())
    }
}
