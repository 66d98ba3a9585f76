#![forbid(unsafe_code)]

pub mod bootstrap;
pub mod challenge;
pub mod error;

pub use quiz_core::Clock;

pub use bootstrap::load_bank;
pub use challenge::{
    AnswerReview, ChallengeController, CompetitionSetup, ControllerState, DayReview, DayTile,
    PlayerReview, TICK_UNIT, TickSchedule, TimerOwner,
};
pub use error::{BootstrapError, ChallengeError, SetupError};
