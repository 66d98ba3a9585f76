use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use quiz_core::model::{DayIndex, OptionKey, Progress};
use quiz_core::{
    Advance, Availability, ChallengeRules, QuestionBank, Session, SessionMode, SessionPhase,
    SubmitOutcome, Tick, board, resolve_next_day,
};
use storage::ProgressStore;

use super::setup::CompetitionSetup;
use super::ticker::{TickSchedule, TimerOwner};
use super::view::{DayReview, DayTile};
use crate::Clock;
use crate::error::ChallengeError;

/// Which screen the controller is on.
#[derive(Debug)]
pub enum ControllerState {
    Idle,
    Setup(CompetitionSetup),
    /// A running or just-finished session. A finished session stays here so
    /// its results can be shown until the player returns home.
    Playing(Session),
}

/// Orchestrates one player's challenge: availability, sessions, timers and
/// persistence of completed days.
///
/// Progress is loaded once when the controller opens and saved exactly once
/// per completed session.
pub struct ChallengeController {
    clock: Clock,
    rules: ChallengeRules,
    bank: Arc<QuestionBank>,
    store: ProgressStore,
    progress: Progress,
    state: ControllerState,
    ticks: TickSchedule,
    unsaved: bool,
}

impl ChallengeController {
    /// Load stored progress and start on the home screen.
    ///
    /// # Errors
    ///
    /// Returns `ChallengeError::Rules` if `rules` are inconsistent and
    /// `ChallengeError::Storage` if stored progress cannot be read.
    pub async fn open(
        clock: Clock,
        rules: ChallengeRules,
        bank: Arc<QuestionBank>,
        store: ProgressStore,
    ) -> Result<Self, ChallengeError> {
        rules.validate()?;
        if let Err(err) = bank.validate(&rules) {
            warn!(error = %err, "question bank does not cover every day");
        }

        let progress = store.load().await?;
        info!(
            key = %store.key(),
            completed = progress.completed_count(),
            total_score = progress.total_score(),
            "challenge opened"
        );

        Ok(Self {
            clock,
            rules,
            bank,
            store,
            progress,
            state: ControllerState::Idle,
            ticks: TickSchedule::default(),
            unsaved: false,
        })
    }

    #[must_use]
    pub fn rules(&self) -> &ChallengeRules {
        &self.rules
    }

    #[must_use]
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    #[must_use]
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            ControllerState::Playing(session) => Some(session),
            ControllerState::Idle | ControllerState::Setup(_) => None,
        }
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// True while a completed day failed to save and awaits `retry_save`.
    #[must_use]
    pub fn has_unsaved_result(&self) -> bool {
        self.unsaved
    }

    /// Replace the time source, e.g. to follow a fixed clock across midnight.
    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    #[must_use]
    pub fn now_local(&self) -> DateTime<Local> {
        self.clock.now_local()
    }

    /// Which day may be played right now, judged in the local timezone.
    #[must_use]
    pub fn next_day(&self) -> Availability {
        resolve_next_day(&self.progress, &self.rules, &self.now_local())
    }

    #[must_use]
    pub fn board(&self) -> Vec<DayTile> {
        board(&self.progress, &self.rules, &self.now_local())
            .into_iter()
            .map(|(day, status)| DayTile {
                day,
                status,
                score: self.progress.get(day).map(|record| record.score),
            })
            .collect()
    }

    /// Review of a completed day, if it has been played.
    #[must_use]
    pub fn review(&self, day: DayIndex) -> Option<DayReview> {
        self.progress.get(day).map(DayReview::from_record)
    }

    /// Review of the session currently on screen, once it has finished.
    #[must_use]
    pub fn session_review(&self) -> Option<DayReview> {
        self.session()
            .and_then(Session::record)
            .map(DayReview::from_record)
    }

    //
    // ─── SETUP ─────────────────────────────────────────────────────────────────
    //

    /// Open the competition roster from the home screen.
    ///
    /// # Errors
    ///
    /// Returns `ChallengeError::SessionInProgress` while a session is running.
    pub fn open_setup(&mut self) -> Result<&mut CompetitionSetup, ChallengeError> {
        self.ensure_not_running()?;
        if !matches!(self.state, ControllerState::Setup(_)) {
            self.state = ControllerState::Setup(CompetitionSetup::new(&self.rules));
        }
        match &mut self.state {
            ControllerState::Setup(setup) => Ok(setup),
            ControllerState::Idle | ControllerState::Playing(_) => Err(ChallengeError::NoSetup),
        }
    }

    pub fn setup_mut(&mut self) -> Option<&mut CompetitionSetup> {
        match &mut self.state {
            ControllerState::Setup(setup) => Some(setup),
            ControllerState::Idle | ControllerState::Playing(_) => None,
        }
    }

    //
    // ─── SESSIONS ──────────────────────────────────────────────────────────────
    //

    /// Start a solo run of `day`.
    ///
    /// # Errors
    ///
    /// Returns `ChallengeError::NotPlayable` unless `day` is the playable day,
    /// and `IncompleteDay` if the bank cannot fill it.
    pub fn start_solo(&mut self, day: DayIndex) -> Result<(), ChallengeError> {
        self.start(day, SessionMode::Solo)
    }

    /// Start a competition of `day` with the roster from the open setup.
    ///
    /// # Errors
    ///
    /// Returns `ChallengeError::NoSetup` outside the setup screen, `Setup` if
    /// the roster is not ready, and the same errors as `start_solo`.
    pub fn start_competition(&mut self, day: DayIndex) -> Result<(), ChallengeError> {
        let ControllerState::Setup(setup) = &self.state else {
            return Err(ChallengeError::NoSetup);
        };
        let mode = setup.to_mode()?;
        self.start(day, mode)
    }

    fn start(&mut self, day: DayIndex, mode: SessionMode) -> Result<(), ChallengeError> {
        self.ensure_not_running()?;
        if day.value() >= self.rules.days_count() {
            return Err(ChallengeError::UnknownDay { day });
        }

        let availability = self.next_day();
        if !availability.allows(day) {
            warn!(day = day.number(), ?availability, "day is not playable");
            return Err(ChallengeError::NotPlayable { day, availability });
        }

        let questions = self.bank.questions_for_day(day);
        let expected = self.rules.questions_per_day();
        if questions.len() != expected {
            return Err(ChallengeError::IncompleteDay {
                day,
                found: questions.len(),
                expected,
            });
        }

        let session = Session::new(day, mode, questions, self.rules, self.clock.now())?;
        info!(
            day = day.number(),
            players = session.players().len(),
            "session started"
        );
        self.state = ControllerState::Playing(session);
        self.sync_ticks();
        Ok(())
    }

    /// Answer the question on screen; `None` means no option was picked.
    ///
    /// # Errors
    ///
    /// Returns `ChallengeError::Session` for an option the question does not
    /// offer, and `Storage` if the finished day could not be saved. The
    /// result is kept in memory in that case; see `retry_save`.
    pub async fn submit_answer(
        &mut self,
        selected: Option<OptionKey>,
    ) -> Result<SubmitOutcome, ChallengeError> {
        let now = self.clock.now();
        let ControllerState::Playing(session) = &mut self.state else {
            return Ok(SubmitOutcome::Ignored);
        };
        let outcome = session.submit_answer(selected, now)?;
        self.after_step(outcome).await?;
        Ok(outcome)
    }

    /// Deliver one timer unit to the running session.
    ///
    /// # Errors
    ///
    /// Returns `ChallengeError::Storage` if a timeout finished the day and
    /// saving failed.
    pub async fn tick(&mut self) -> Result<Tick, ChallengeError> {
        let now = self.clock.now();
        let ControllerState::Playing(session) = &mut self.state else {
            return Ok(Tick::Idle);
        };
        let tick = session.tick(now);
        match tick {
            Tick::TimedOut(outcome) => {
                debug!("question timed out");
                self.after_step(outcome).await?;
            }
            Tick::Idle | Tick::Countdown { .. } | Tick::QuestionStarted | Tick::QuestionTimer { .. } => {
                self.sync_ticks();
            }
        }
        Ok(tick)
    }

    /// Let the next competitor take over after a turn boundary.
    pub fn begin_turn(&mut self) -> bool {
        let started = match &mut self.state {
            ControllerState::Playing(session) => session.begin_turn(),
            ControllerState::Idle | ControllerState::Setup(_) => false,
        };
        if started {
            self.sync_ticks();
        }
        started
    }

    /// Leave the current screen. A running session is abandoned without
    /// saving anything.
    pub fn return_home(&mut self) {
        if let ControllerState::Playing(session) = &self.state {
            if !session.is_complete() {
                info!(day = session.day().number(), "session abandoned");
            }
        }
        if self.unsaved {
            warn!("leaving with an unsaved result; it is kept until the app exits");
        }
        self.state = ControllerState::Idle;
        self.sync_ticks();
    }

    /// Wait for the running timer's next unit. Pending while no timer runs.
    pub async fn next_tick(&mut self) {
        self.ticks.next().await;
    }

    /// Save progress again after a failed save of a completed day.
    ///
    /// # Errors
    ///
    /// Returns `ChallengeError::Storage` if saving fails again.
    pub async fn retry_save(&mut self) -> Result<(), ChallengeError> {
        if !self.unsaved {
            return Ok(());
        }
        self.save_progress().await
    }

    async fn after_step(&mut self, outcome: SubmitOutcome) -> Result<(), ChallengeError> {
        self.sync_ticks();
        if let SubmitOutcome::Recorded {
            advance: Advance::Completed,
            ..
        } = outcome
        {
            self.complete_session().await?;
        }
        Ok(())
    }

    async fn complete_session(&mut self) -> Result<(), ChallengeError> {
        let Some(record) = self.session().and_then(Session::record).cloned() else {
            return Ok(());
        };
        info!(
            day = record.day_index.number(),
            score = record.score,
            players = record.players.as_ref().map_or(1, Vec::len),
            "day completed"
        );
        self.progress.insert(record);
        self.unsaved = true;
        self.save_progress().await
    }

    async fn save_progress(&mut self) -> Result<(), ChallengeError> {
        match self.store.save(&self.progress).await {
            Ok(()) => {
                self.unsaved = false;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "progress could not be saved");
                Err(err.into())
            }
        }
    }

    fn ensure_not_running(&self) -> Result<(), ChallengeError> {
        match &self.state {
            ControllerState::Playing(session) if !session.is_complete() => {
                Err(ChallengeError::SessionInProgress)
            }
            ControllerState::Idle | ControllerState::Setup(_) | ControllerState::Playing(_) => {
                Ok(())
            }
        }
    }

    fn sync_ticks(&mut self) {
        let owner = match &self.state {
            ControllerState::Playing(session) => {
                let player = session.current_player_index();
                match session.phase() {
                    SessionPhase::Countdown { .. } => Some(TimerOwner::Countdown { player }),
                    SessionPhase::Question { .. } => Some(TimerOwner::Question {
                        player,
                        question: session.question_index(),
                    }),
                    SessionPhase::TurnBoundary { .. } | SessionPhase::Complete => None,
                }
            }
            ControllerState::Idle | ControllerState::Setup(_) => None,
        };
        self.ticks.sync(owner);
    }
}
