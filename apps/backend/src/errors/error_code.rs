//! Error codes reported to table clients.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in `ServerMsg::Error`.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};

/// Centralized error codes for the table protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Rule validation
    /// Operation not allowed in the current phase
    WrongPhase,
    /// Caller does not hold the turn
    OutOfTurn,
    /// Table settings are inconsistent
    InvalidSettings,
    /// Declaring or playing more copies than held
    InsufficientCards,
    /// Bad overturn or reinforcement
    IllegalDeclaration,
    /// Friend call count does not match the team size
    IncompleteFriendCalls,
    /// Bottom card count does not match the bottom size
    WrongBottomSize,
    /// Card not in hand
    CardNotInHand,
    /// Lead throw spans more than one suit
    InvalidThrowSuit,
    /// Follow does not match an allowed shape
    IllegalPlayShape,
    /// Unit cards do not form a combination
    InvalidCombination,
    /// Cards remain to be dealt
    DealingInProgress,
    /// Parse card error
    ParseCard,
    /// General validation error
    ValidationError,

    // Resource Not Found
    /// Actor is not seated at the table
    PlayerNotFound,
    /// Table id unknown to the hub
    TableNotFound,
    /// General not found error
    NotFound,

    // Table conflicts
    /// Seat already taken
    SeatTaken,
    /// All seats are taken
    TableFull,
    /// Seating cannot change mid-round
    RoundInProgress,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    /// Malformed client message
    BadRequest,
    /// Action reserved for another participant (e.g. the host)
    Forbidden,
    /// Configuration error
    ConfigError,
    /// Internal error
    Internal,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WrongPhase => "WRONG_PHASE",
            Self::OutOfTurn => "OUT_OF_TURN",
            Self::InvalidSettings => "INVALID_SETTINGS",
            Self::InsufficientCards => "INSUFFICIENT_CARDS",
            Self::IllegalDeclaration => "ILLEGAL_DECLARATION",
            Self::IncompleteFriendCalls => "INCOMPLETE_FRIEND_CALLS",
            Self::WrongBottomSize => "WRONG_BOTTOM_SIZE",
            Self::CardNotInHand => "CARD_NOT_IN_HAND",
            Self::InvalidThrowSuit => "INVALID_THROW_SUIT",
            Self::IllegalPlayShape => "ILLEGAL_PLAY_SHAPE",
            Self::InvalidCombination => "INVALID_COMBINATION",
            Self::DealingInProgress => "DEALING_IN_PROGRESS",
            Self::ParseCard => "PARSE_CARD",
            Self::ValidationError => "VALIDATION_ERROR",

            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::TableNotFound => "TABLE_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::SeatTaken => "SEAT_TAKEN",
            Self::TableFull => "TABLE_FULL",
            Self::RoundInProgress => "ROUND_IN_PROGRESS",
            Self::Conflict => "CONFLICT",

            Self::BadRequest => "BAD_REQUEST",
            Self::Forbidden => "FORBIDDEN",
            Self::ConfigError => "CONFIG_ERROR",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&DomainError> for ErrorCode {
    fn from(err: &DomainError) -> Self {
        match err {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::WrongPhase => Self::WrongPhase,
                ValidationKind::OutOfTurn => Self::OutOfTurn,
                ValidationKind::InvalidSettings => Self::InvalidSettings,
                ValidationKind::InsufficientCards => Self::InsufficientCards,
                ValidationKind::IllegalDeclaration => Self::IllegalDeclaration,
                ValidationKind::IncompleteFriendCalls => Self::IncompleteFriendCalls,
                ValidationKind::WrongBottomSize => Self::WrongBottomSize,
                ValidationKind::CardNotInHand => Self::CardNotInHand,
                ValidationKind::InvalidThrowSuit => Self::InvalidThrowSuit,
                ValidationKind::IllegalPlayShape => Self::IllegalPlayShape,
                ValidationKind::InvalidCombination => Self::InvalidCombination,
                ValidationKind::DealingInProgress => Self::DealingInProgress,
                ValidationKind::ParseCard => Self::ParseCard,
                ValidationKind::Other(_) => Self::ValidationError,
            },
            DomainError::NotFound(kind, _) => match kind {
                NotFoundKind::Player => Self::PlayerNotFound,
                NotFoundKind::Table => Self::TableNotFound,
                NotFoundKind::Other(_) => Self::NotFound,
            },
            DomainError::Conflict(kind, _) => match kind {
                ConflictKind::SeatTaken => Self::SeatTaken,
                ConflictKind::TableFull => Self::TableFull,
                ConflictKind::RoundInProgress => Self::RoundInProgress,
                ConflictKind::Other(_) => Self::Conflict,
            },
        }
    }
}
