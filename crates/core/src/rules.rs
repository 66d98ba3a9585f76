use crate::error::RulesError;

pub const DAYS_COUNT: usize = 11;
pub const QUESTIONS_PER_DAY: usize = 12;
pub const SECONDS_PER_QUESTION: u32 = 20;
pub const COUNTDOWN_SECONDS: u32 = 3;
pub const MIN_COMPETITION_PLAYERS: usize = 2;
pub const MAX_COMPETITION_PLAYERS: usize = 4;

/// Tunable parameters of a challenge.
///
/// Durations are counted in ticks; the runtime drives one tick per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeRules {
    days_count: usize,
    questions_per_day: usize,
    seconds_per_question: u32,
    countdown_seconds: u32,
    min_players: usize,
    max_players: usize,
}

impl Default for ChallengeRules {
    fn default() -> Self {
        Self {
            days_count: DAYS_COUNT,
            questions_per_day: QUESTIONS_PER_DAY,
            seconds_per_question: SECONDS_PER_QUESTION,
            countdown_seconds: COUNTDOWN_SECONDS,
            min_players: MIN_COMPETITION_PLAYERS,
            max_players: MAX_COMPETITION_PLAYERS,
        }
    }
}

impl ChallengeRules {
    /// Creates custom rules.
    ///
    /// # Errors
    ///
    /// Returns `RulesError` if a count is zero or the player bounds are inverted.
    pub fn new(
        days_count: usize,
        questions_per_day: usize,
        seconds_per_question: u32,
        countdown_seconds: u32,
    ) -> Result<Self, RulesError> {
        let rules = Self {
            days_count,
            questions_per_day,
            seconds_per_question,
            countdown_seconds,
            ..Self::default()
        };
        rules.validate()?;
        Ok(rules)
    }

    /// Override the per-question timer.
    ///
    /// # Errors
    ///
    /// Returns `RulesError::InvalidQuestionSeconds` for zero.
    pub fn with_seconds_per_question(mut self, seconds: u32) -> Result<Self, RulesError> {
        self.seconds_per_question = seconds;
        self.validate()?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.days_count == 0 {
            return Err(RulesError::NoDays);
        }
        if self.questions_per_day == 0 {
            return Err(RulesError::NoQuestions);
        }
        if self.seconds_per_question == 0 {
            return Err(RulesError::InvalidQuestionSeconds);
        }
        if self.min_players < 2 || self.min_players > self.max_players {
            return Err(RulesError::InvalidPlayerBounds {
                min: self.min_players,
                max: self.max_players,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn days_count(&self) -> usize {
        self.days_count
    }

    #[must_use]
    pub fn questions_per_day(&self) -> usize {
        self.questions_per_day
    }

    #[must_use]
    pub fn seconds_per_question(&self) -> u32 {
        self.seconds_per_question
    }

    #[must_use]
    pub fn countdown_seconds(&self) -> u32 {
        self.countdown_seconds
    }

    #[must_use]
    pub fn min_players(&self) -> usize {
        self.min_players
    }

    #[must_use]
    pub fn max_players(&self) -> usize {
        self.max_players
    }
}
