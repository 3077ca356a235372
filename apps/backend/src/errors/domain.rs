//! Domain-level error type used across the engine, the table session and bots.
//!
//! This error type is transport-agnostic. Outer layers wrap it in
//! `crate::error::AppError` or translate it to an `ErrorCode` for the wire.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Validation error kinds for rule violations and malformed input.
///
/// Every kind is a synchronous, non-retryable rejection; the state the
/// operation was applied to is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    WrongPhase,
    OutOfTurn,
    InvalidSettings,
    InsufficientCards,
    IllegalDeclaration,
    IncompleteFriendCalls,
    WrongBottomSize,
    CardNotInHand,
    InvalidThrowSuit,
    IllegalPlayShape,
    /// Cards submitted as one unit do not form a single, tuple or tractor.
    InvalidCombination,
    /// End of dealing requested while cards beyond the bottom remain.
    DealingInProgress,
    ParseCard,
    Other(String),
}

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Player,
    Table,
    Other(String),
}

/// Domain-level conflict kinds
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    SeatTaken,
    TableFull,
    RoundInProgress,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/user validation or business rule violation
    Validation(ValidationKind, String),
    /// Semantic conflict
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn validation_other(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::Validation(ValidationKind::Other(detail.clone()), detail)
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }

    /// The validation kind, if this is a validation failure.
    pub fn validation_kind(&self) -> Option<&ValidationKind> {
        match self {
            DomainError::Validation(kind, _) => Some(kind),
            _ => None,
        }
    }
}
