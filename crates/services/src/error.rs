//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::DayIndex;
use quiz_core::{Availability, BankError, RulesError, SessionError};
use storage::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted while assembling a competition roster.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SetupError {
    #[error("player name cannot be empty")]
    EmptyName,
    #[error("player name is longer than {max} characters")]
    NameTooLong { max: usize },
    #[error("{name} is already in the game")]
    DuplicateName { name: String },
    #[error("at most {max} players can compete")]
    TooMany { max: usize },
    #[error("at least {min} players are needed")]
    TooFew { min: usize },
}

/// Errors emitted by `ChallengeController`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChallengeError {
    #[error("day {} cannot be played now ({availability:?})", .day.number())]
    NotPlayable {
        day: DayIndex,
        availability: Availability,
    },
    #[error("day {} is not part of the challenge", .day.number())]
    UnknownDay { day: DayIndex },
    #[error("day {} has {found} questions, expected {expected}", .day.number())]
    IncompleteDay {
        day: DayIndex,
        found: usize,
        expected: usize,
    },
    #[error("a session is already running")]
    SessionInProgress,
    #[error("competition setup is not open")]
    NoSetup,
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Rules(#[from] RulesError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping the challenge from configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BootstrapError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error("question bank could not be read: {0}")]
    BankFile(#[from] std::io::Error),
    #[error(transparent)]
    Challenge(#[from] ChallengeError),
}
