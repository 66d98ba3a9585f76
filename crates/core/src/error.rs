use thiserror::Error;

use crate::model::{DayIndex, OptionKey, QuestionId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RulesError {
    #[error("a challenge needs at least one day")]
    NoDays,

    #[error("questions per day must be > 0")]
    NoQuestions,

    #[error("seconds per question must be > 0")]
    InvalidQuestionSeconds,

    #[error("competition player bounds are invalid: {min}..={max}")]
    InvalidPlayerBounds { min: usize, max: usize },
}

/// Errors raised while loading or checking the question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("question bank is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("question bank has no categories")]
    Empty,

    #[error("category label cannot be empty")]
    EmptyCategoryLabel,

    #[error("question {id} in {category} has fewer than two options")]
    TooFewOptions { category: String, id: QuestionId },

    #[error("question {id} in {category} marks unknown option {key} as correct")]
    UnknownCorrectOption {
        category: String,
        id: QuestionId,
        key: OptionKey,
    },

    #[error("question {id} in {category} lists option {key} twice")]
    DuplicateOption {
        category: String,
        id: QuestionId,
        key: OptionKey,
    },

    #[error("question id {id} appears twice in {category}")]
    DuplicateQuestionId { category: String, id: QuestionId },

    #[error("day {day} only has {found} of {expected} questions")]
    ShortDay {
        day: DayIndex,
        found: usize,
        expected: usize,
    },
}

/// Errors raised by an in-memory play session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for day {0}")]
    Empty(DayIndex),

    #[error("competition needs between {min} and {max} players, got {got}")]
    PlayerCount { min: usize, max: usize, got: usize },

    #[error("player name cannot be empty")]
    EmptyPlayerName,

    #[error("option {key} is not offered by the current question")]
    UnknownOption { key: OptionKey },
}
