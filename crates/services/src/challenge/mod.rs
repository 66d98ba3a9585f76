mod controller;
mod setup;
mod ticker;
mod view;

pub use controller::{ChallengeController, ControllerState};
pub use setup::{CompetitionSetup, MAX_NAME_CHARS};
pub use ticker::{TICK_UNIT, TickSchedule, TimerOwner};
pub use view::{AnswerReview, DayReview, DayTile, PlayerReview};
