#![forbid(unsafe_code)]

pub mod availability;
pub mod bank;
pub mod error;
pub mod feedback;
pub mod model;
pub mod rules;
pub mod session;
pub mod time;

pub use availability::{Availability, DayStatus, board, day_status, resolve_next_day};
pub use bank::{Category, CategoryFilter, QuestionBank};
pub use error::{BankError, RulesError, SessionError};
pub use feedback::ResultTier;
pub use rules::ChallengeRules;
pub use session::{Advance, Session, SessionMode, SessionPhase, SessionProgress, SubmitOutcome, Tick};
pub use time::Clock;
