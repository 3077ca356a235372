//! AI player trait definition.

use std::fmt;

use crate::domain::snapshot::GameSnapshot;
use crate::domain::state::FriendCall;
use crate::domain::Card;
use crate::error::AppError;

/// Errors that can occur during AI decision-making.
#[derive(Debug)]
pub enum AiError {
    /// AI encountered an internal error
    Internal(String),
    /// AI has no legal move to offer
    InvalidMove(String),
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::Internal(msg) => write!(f, "AI internal error: {msg}"),
            AiError::InvalidMove(msg) => write!(f, "AI invalid move: {msg}"),
        }
    }
}

impl std::error::Error for AiError {}

impl From<AiError> for AppError {
    fn from(err: AiError) -> Self {
        AppError::internal(format!("AI error: {err}"))
    }
}

/// The bottom a dealer buries and the friends they call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BottomChoice {
    pub bottom: Vec<Card>,
    pub friend_calls: Vec<FriendCall>,
}

/// Trait for AI players.
///
/// Implementations see only the seat's own [`GameSnapshot`] and must answer
/// with moves the engine accepts; the helpers in [`super::legal`] enumerate
/// them.
pub trait AiPlayer: Send + Sync {
    /// Declare `(card, amount)` now, or `None` to pass.
    fn choose_declaration(&self, view: &GameSnapshot) -> Result<Option<(Card, u8)>, AiError>;

    /// Pick the bottom and friend calls as dealer.
    fn choose_bottom(&self, view: &GameSnapshot) -> Result<BottomChoice, AiError>;

    /// Pick a play, one card group per unit.
    fn choose_play(&self, view: &GameSnapshot) -> Result<Vec<Vec<Card>>, AiError>;
}
