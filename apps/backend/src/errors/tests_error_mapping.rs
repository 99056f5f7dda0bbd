// Unit tests for error mapping - domain errors to wire codes and HTTP statuses
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::errors::ErrorCode;
use crate::AppError;

#[test]
fn maps_validation_to_400() {
    let app: AppError =
        DomainError::validation(ValidationKind::InvalidPlayerName, "name must not be empty").into();
    assert_eq!(app.code(), ErrorCode::InvalidPlayerName);
    assert_eq!(app.status().as_u16(), 400);

    let app: AppError =
        DomainError::validation(ValidationKind::InvalidRosterSize, "roles do not sum").into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
}

#[test]
fn maps_join_rejections_to_409() {
    let cases = [
        (ConflictKind::RosterFull, "ROOM_FULL"),
        (ConflictKind::AlreadyStarted, "GAME_ALREADY_STARTED"),
        (ConflictKind::NameTaken, "NAME_TAKEN"),
        (ConflictKind::AlreadyInRoom, "ALREADY_IN_ROOM"),
    ];
    for (kind, code) in cases {
        let app: AppError = DomainError::conflict(kind, "rejected").into();
        assert_eq!(app.code().as_str(), code);
        assert_eq!(app.status().as_u16(), 409);
    }
}

#[test]
fn maps_not_found() {
    let app: AppError = DomainError::not_found(NotFoundKind::Room, "room QWERTY").into();
    assert_eq!(app.code(), ErrorCode::RoomNotFound);
    assert_eq!(app.status().as_u16(), 404);

    let app: AppError = DomainError::not_found(NotFoundKind::Player, "player").into();
    assert_eq!(app.code(), ErrorCode::NotFound);
}

#[test]
fn detail_survives_mapping() {
    let app: AppError = DomainError::conflict(ConflictKind::NameTaken, "name 'Ann' is taken").into();
    assert_eq!(app.detail(), "name 'Ann' is taken");
}
