mod answer;
mod day;
mod ids;
mod player;
mod progress;
mod question;

pub use ids::{DayIndex, OptionKey, ParseIdError, QuestionId};

pub use answer::Answer;
pub use day::DayRecord;
pub use player::{Player, SOLO_PLAYER_NAME};
pub use progress::Progress;
pub use question::Question;
