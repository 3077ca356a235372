// Unit tests for error mapping - pure domain logic, no transport
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_kinds() {
    let de = DomainError::validation(ValidationKind::OutOfTurn, "Not your turn");
    let app: AppError = de.into();
    assert_eq!(app.code(), ErrorCode::OutOfTurn);
    assert_eq!(app.detail(), "Not your turn");
    assert!(app.is_client_error());

    let app: AppError = DomainError::validation_other("odd").into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
}

#[test]
fn maps_conflicts() {
    let seat = DomainError::conflict(ConflictKind::SeatTaken, "seat taken");
    let app: AppError = seat.into();
    assert_eq!(app.code().as_str(), "SEAT_TAKEN");

    let full = DomainError::conflict(ConflictKind::TableFull, "full");
    assert_eq!(AppError::from(full).code(), ErrorCode::TableFull);

    // Generic conflict fallback
    let other = DomainError::conflict(ConflictKind::Other("X".into()), "x");
    assert_eq!(AppError::from(other).code(), ErrorCode::Conflict);
}

#[test]
fn maps_not_found() {
    let app: AppError = DomainError::not_found(NotFoundKind::Player, "p9").into();
    assert_eq!(app.code(), ErrorCode::PlayerNotFound);
    assert!(matches!(app, AppError::NotFound { .. }));
}

#[test]
fn malformed_json_is_bad_request() {
    let err = serde_json::from_str::<u8>("{").unwrap_err();
    let app: AppError = err.into();
    assert_eq!(app.code(), ErrorCode::BadRequest);
    assert!(app.detail().starts_with("Malformed message"));
}

#[test]
fn problem_details_serialize_code_and_message() {
    let app = AppError::config("ZPY_NUM_DECKS must be a number");
    assert!(!app.is_client_error());
    let json = serde_json::to_value(app.problem()).unwrap();
    assert_eq!(json["code"], "CONFIG_ERROR");
    assert_eq!(json["message"], "ZPY_NUM_DECKS must be a number");
}
