//! Random AI player - makes random legal moves.
//!
//! [`RandomPlayer`] is the baseline [`AiPlayer`](super::AiPlayer): it picks
//! uniformly among the moves [`super::legal`] offers, from a seedable RNG.

use std::sync::Mutex;

use rand::prelude::*;

use super::legal::{legal_declarations, legal_plays};
use super::trait_def::{AiError, AiPlayer, BottomChoice};
use crate::domain::snapshot::GameSnapshot;
use crate::domain::state::FriendCall;
use crate::domain::{Card, Rank, Suit};

/// AI that makes random legal moves.
pub struct RandomPlayer {
    /// `AiPlayer` methods take `&self`; the RNG needs `&mut`.
    rng: Mutex<StdRng>,
    /// Chance of declaring when a declaration is available.
    declare_rate: f64,
}

impl RandomPlayer {
    pub const NAME: &'static str = "RandomPlayer";
    pub const VERSION: &'static str = "1.0.0";
    pub const DEFAULT_DECLARE_RATE: f64 = 0.5;

    /// `Some(seed)` for reproducible play, `None` for OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_declare_rate(seed, Self::DEFAULT_DECLARE_RATE)
    }

    pub fn with_declare_rate(seed: Option<u64>, declare_rate: f64) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
            declare_rate: declare_rate.clamp(0.0, 1.0),
        }
    }

    fn rng(&self) -> Result<std::sync::MutexGuard<'_, StdRng>, AiError> {
        self.rng
            .lock()
            .map_err(|e| AiError::Internal(format!("RNG lock poisoned: {e}")))
    }
}

impl AiPlayer for RandomPlayer {
    fn choose_declaration(&self, view: &GameSnapshot) -> Result<Option<(Card, u8)>, AiError> {
        let options = legal_declarations(view);
        if options.is_empty() {
            return Ok(None);
        }
        let mut rng = self.rng()?;
        if !rng.random_bool(self.declare_rate) {
            return Ok(None);
        }
        Ok(options.choose(&mut *rng).copied())
    }

    fn choose_bottom(&self, view: &GameSnapshot) -> Result<BottomChoice, AiError> {
        let size = view.bottom_size as usize;
        if view.hand.len() < size {
            return Err(AiError::InvalidMove(format!(
                "Hand of {} cannot bury {size}",
                view.hand.len()
            )));
        }
        let mut rng = self.rng()?;
        let bottom: Vec<Card> = view.hand.choose_multiple(&mut *rng, size).copied().collect();

        let decks = view.settings.num_decks.max(1);
        let mut friend_calls = Vec::new();
        for _ in 1..view.team_size {
            let rank = *Rank::ALL
                .choose(&mut *rng)
                .ok_or_else(|| AiError::Internal("No ranks".into()))?;
            let suit = *Suit::ALL
                .choose(&mut *rng)
                .ok_or_else(|| AiError::Internal("No suits".into()))?;
            let nth = rng.random_range(1..=decks);
            friend_calls.push(FriendCall::new(Card::new(rank, suit), nth));
        }
        Ok(BottomChoice {
            bottom,
            friend_calls,
        })
    }

    fn choose_play(&self, view: &GameSnapshot) -> Result<Vec<Vec<Card>>, AiError> {
        let plays = legal_plays(view);
        let mut rng = self.rng()?;
        plays
            .choose(&mut *rng)
            .cloned()
            .ok_or_else(|| AiError::InvalidMove("No legal plays available".into()))
    }
}
