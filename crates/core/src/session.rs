//! In-memory play session for one day.
//!
//! The session is a tick-driven state machine. It owns its timers as plain
//! counters inside the current phase, so leaving a phase also discards its
//! timer and a late tick can only ever act on the phase that is current.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::error::SessionError;
use crate::model::{Answer, DayIndex, DayRecord, OptionKey, Player, Question};
use crate::rules::ChallengeRules;

//
// ─── MODE & PHASE ──────────────────────────────────────────────────────────────
//

/// Who is playing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    Solo,
    /// Turn-based local play; every name plays the full day in order.
    Competition(Vec<String>),
}

/// Current state of a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Get-ready countdown before a player's first question.
    Countdown { remaining: u32 },
    /// A question is on screen with `remaining` ticks left to answer.
    Question { remaining: u32 },
    /// A player has finished; waiting for the next one to take over.
    TurnBoundary { next_player: usize },
    Complete,
}

/// Where the session moved after an answer was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    NextQuestion,
    TurnBoundary { next_player: usize },
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was recorded: no question is on screen.
    Ignored,
    Recorded { correct: bool, advance: Advance },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The current phase has no timer.
    Idle,
    Countdown { remaining: u32 },
    QuestionStarted,
    QuestionTimer { remaining: u32 },
    TimedOut(SubmitOutcome),
}

/// Snapshot of the current player's progress through the day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

pub struct Session {
    day: DayIndex,
    rules: ChallengeRules,
    questions: Vec<Question>,
    players: Vec<Player>,
    current_player: usize,
    current_question: usize,
    phase: SessionPhase,
    started_at: DateTime<Utc>,
    record: Option<DayRecord>,
}

impl Session {
    /// Create a session for `day` over `questions`, starting in the countdown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when there are no questions, and
    /// `PlayerCount` / `EmptyPlayerName` for an invalid competition roster.
    pub fn new(
        day: DayIndex,
        mode: SessionMode,
        questions: Vec<Question>,
        rules: ChallengeRules,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty(day));
        }

        let players = match mode {
            SessionMode::Solo => vec![Player::solo()],
            SessionMode::Competition(names) => {
                let got = names.len();
                if got < rules.min_players() || got > rules.max_players() {
                    return Err(SessionError::PlayerCount {
                        min: rules.min_players(),
                        max: rules.max_players(),
                        got,
                    });
                }
                if names.iter().any(|name| name.trim().is_empty()) {
                    return Err(SessionError::EmptyPlayerName);
                }
                names.into_iter().map(Player::new).collect()
            }
        };

        let mut session = Self {
            day,
            rules,
            questions,
            players,
            current_player: 0,
            current_question: 0,
            phase: SessionPhase::Complete,
            started_at,
            record: None,
        };
        session.phase = session.turn_start_phase();
        Ok(session)
    }

    #[must_use]
    pub fn day(&self) -> DayIndex {
        self.day
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn rules(&self) -> &ChallengeRules {
        &self.rules
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn is_competition(&self) -> bool {
        self.players.len() > 1
    }

    #[must_use]
    pub fn current_player_index(&self) -> usize {
        self.current_player
    }

    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player)
    }

    /// Zero-based index of the question the current player is on.
    #[must_use]
    pub fn question_index(&self) -> usize {
        self.current_question
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// The question on screen, if one is being shown.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            SessionPhase::Question { .. } => self.questions.get(self.current_question),
            SessionPhase::Countdown { .. }
            | SessionPhase::TurnBoundary { .. }
            | SessionPhase::Complete => None,
        }
    }

    /// Ticks left on whichever timer the current phase owns.
    #[must_use]
    pub fn remaining_ticks(&self) -> Option<u32> {
        match self.phase {
            SessionPhase::Countdown { remaining } | SessionPhase::Question { remaining } => {
                Some(remaining)
            }
            SessionPhase::TurnBoundary { .. } | SessionPhase::Complete => None,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, SessionPhase::Complete)
    }

    /// The finished day's record; present once the session is complete.
    #[must_use]
    pub fn record(&self) -> Option<&DayRecord> {
        self.record.as_ref()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.questions.len();
        let answered = self
            .current_player()
            .map_or(total, |player| player.answers().len().min(total));
        SessionProgress {
            total,
            answered,
            remaining: total - answered,
            is_complete: self.is_complete(),
        }
    }

    /// Answer the question on screen for the current player.
    ///
    /// `None` means "no answer" and is scored as incorrect, exactly like a timeout.
    /// Outside of a question phase this is a no-op returning `Ignored`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownOption` if `selected` is not one of the
    /// question's options; the session is left untouched.
    pub fn submit_answer(
        &mut self,
        selected: Option<OptionKey>,
        at: DateTime<Utc>,
    ) -> Result<SubmitOutcome, SessionError> {
        let Some(question) = self.current_question() else {
            return Ok(SubmitOutcome::Ignored);
        };
        if let Some(key) = &selected {
            if !question.has_option(key) {
                return Err(SessionError::UnknownOption { key: key.clone() });
            }
        }
        Ok(self.record_answer(selected, at))
    }

    /// Advance the active timer by one unit.
    ///
    /// When the question timer runs out the current question is answered with
    /// no selection.
    pub fn tick(&mut self, at: DateTime<Utc>) -> Tick {
        match self.phase {
            SessionPhase::Countdown { remaining } => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    self.phase = self.question_phase();
                    Tick::QuestionStarted
                } else {
                    self.phase = SessionPhase::Countdown { remaining };
                    Tick::Countdown { remaining }
                }
            }
            SessionPhase::Question { remaining } => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    Tick::TimedOut(self.record_answer(None, at))
                } else {
                    self.phase = SessionPhase::Question { remaining };
                    Tick::QuestionTimer { remaining }
                }
            }
            SessionPhase::TurnBoundary { .. } | SessionPhase::Complete => Tick::Idle,
        }
    }

    /// Hand over to the next player after a turn boundary.
    ///
    /// Returns `false` if the session is not waiting at a boundary.
    pub fn begin_turn(&mut self) -> bool {
        match self.phase {
            SessionPhase::TurnBoundary { .. } => {
                self.phase = self.turn_start_phase();
                true
            }
            SessionPhase::Countdown { .. }
            | SessionPhase::Question { .. }
            | SessionPhase::Complete => false,
        }
    }

    fn record_answer(&mut self, selected: Option<OptionKey>, at: DateTime<Utc>) -> SubmitOutcome {
        let Some(question) = self.questions.get(self.current_question).cloned() else {
            return SubmitOutcome::Ignored;
        };
        let Some(player) = self.players.get_mut(self.current_player) else {
            return SubmitOutcome::Ignored;
        };

        let answer = Answer::grade(question, selected);
        let correct = answer.is_correct();
        player.record(answer);

        let advance = self.advance(at);
        SubmitOutcome::Recorded { correct, advance }
    }

    fn advance(&mut self, at: DateTime<Utc>) -> Advance {
        if self.current_question + 1 < self.questions.len() {
            self.current_question += 1;
            self.phase = self.question_phase();
            return Advance::NextQuestion;
        }

        if self.current_player + 1 < self.players.len() {
            self.current_player += 1;
            self.current_question = 0;
            self.phase = SessionPhase::TurnBoundary {
                next_player: self.current_player,
            };
            return Advance::TurnBoundary {
                next_player: self.current_player,
            };
        }

        self.phase = SessionPhase::Complete;
        self.record = Some(DayRecord::from_players(self.day, &self.players, at));
        Advance::Completed
    }

    fn question_phase(&self) -> SessionPhase {
        SessionPhase::Question {
            remaining: self.rules.seconds_per_question(),
        }
    }

    fn turn_start_phase(&self) -> SessionPhase {
        match self.rules.countdown_seconds() {
            0 => self.question_phase(),
            remaining => SessionPhase::Countdown { remaining },
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("day", &self.day)
            .field("phase", &self.phase)
            .field("players_len", &self.players.len())
            .field("current_player", &self.current_player)
            .field("current_question", &self.current_question)
            .field("questions_len", &self.questions.len())
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
