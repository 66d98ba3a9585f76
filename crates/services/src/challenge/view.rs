use chrono::{DateTime, Utc};

use quiz_core::model::{Answer, DayIndex, DayRecord, Player, SOLO_PLAYER_NAME};
use quiz_core::{DayStatus, ResultTier};

/// One tile of the day board.
///
/// Presentation-agnostic: no pre-formatted strings, the frontend decides how
/// to render status and score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayTile {
    pub day: DayIndex,
    pub status: DayStatus,
    /// Best score, present once the day is completed.
    pub score: Option<u32>,
}

/// One graded answer, ready for review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerReview {
    pub category: String,
    pub prompt: String,
    pub selected: Option<String>,
    /// Text of the right option, only when the answer was wrong.
    pub correct: Option<String>,
    pub is_correct: bool,
    pub timed_out: bool,
}

impl AnswerReview {
    #[must_use]
    pub fn from_answer(answer: &Answer) -> Self {
        let question = answer.question();
        Self {
            category: question.category_label().to_owned(),
            prompt: question.prompt().to_owned(),
            selected: answer.selected_text().map(str::to_owned),
            correct: (!answer.is_correct())
                .then(|| question.correct_text().map(str::to_owned))
                .flatten(),
            is_correct: answer.is_correct(),
            timed_out: answer.is_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerReview {
    pub name: String,
    pub score: u32,
    pub answers: Vec<AnswerReview>,
}

impl PlayerReview {
    fn from_player(player: &Player) -> Self {
        Self {
            name: player.name().to_owned(),
            score: player.score(),
            answers: player.answers().iter().map(AnswerReview::from_answer).collect(),
        }
    }
}

/// Results of a completed day, for the results screen and later review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayReview {
    pub day: DayIndex,
    pub completed_at: DateTime<Utc>,
    pub score: u32,
    pub total: u32,
    pub tier: ResultTier,
    pub players: Vec<PlayerReview>,
    /// Best scorers of a competition; empty for solo runs.
    pub leaders: Vec<String>,
}

impl DayReview {
    #[must_use]
    pub fn from_record(record: &DayRecord) -> Self {
        let total = u32::try_from(record.answers.len()).unwrap_or(u32::MAX);
        let players = match &record.players {
            Some(players) => players.iter().map(PlayerReview::from_player).collect(),
            None => vec![PlayerReview {
                name: SOLO_PLAYER_NAME.to_owned(),
                score: record.score,
                answers: record.answers.iter().map(AnswerReview::from_answer).collect(),
            }],
        };

        Self {
            day: record.day_index,
            completed_at: record.completed_at,
            score: record.score,
            total,
            tier: ResultTier::for_score(record.score, total),
            players,
            leaders: record.leaders().into_iter().map(str::to_owned).collect(),
        }
    }

    #[must_use]
    pub fn is_competition(&self) -> bool {
        self.players.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use quiz_core::model::{OptionKey, Question, QuestionId};
    use quiz_core::time::fixed_now;

    fn question(id: u32) -> Question {
        let mut options = IndexMap::new();
        options.insert(OptionKey::from("a"), "Bilbao".to_string());
        options.insert(OptionKey::from("b"), "Vitoria".to_string());
        Question::new(QuestionId::new(id), "Capital?", options, OptionKey::from("b"), "Geography")
    }

    #[test]
    fn wrong_answers_show_the_right_option() {
        let wrong = AnswerReview::from_answer(&Answer::grade(question(1), Some(OptionKey::from("a"))));
        assert_eq!(wrong.selected.as_deref(), Some("Bilbao"));
        assert_eq!(wrong.correct.as_deref(), Some("Vitoria"));
        assert!(!wrong.timed_out);

        let right = AnswerReview::from_answer(&Answer::grade(question(2), Some(OptionKey::from("b"))));
        assert!(right.is_correct);
        assert_eq!(right.correct, None);

        let late = AnswerReview::from_answer(&Answer::timed_out(question(3)));
        assert!(late.timed_out);
        assert_eq!(late.selected, None);
        assert_eq!(late.correct.as_deref(), Some("Vitoria"));
    }

    #[test]
    fn solo_record_reviews_as_one_player() {
        let mut player = Player::solo();
        player.record(Answer::grade(question(1), Some(OptionKey::from("b"))));
        player.record(Answer::timed_out(question(2)));
        let record = DayRecord::from_players(DayIndex::new(2), &[player], fixed_now());

        let review = DayReview::from_record(&record);
        assert_eq!(review.day, DayIndex::new(2));
        assert_eq!((review.score, review.total), (1, 2));
        assert_eq!(review.tier, ResultTier::Poor);
        assert!(!review.is_competition());
        assert_eq!(review.players[0].name, SOLO_PLAYER_NAME);
        assert!(review.leaders.is_empty());
    }

    #[test]
    fn competition_record_lists_every_player_and_leaders() {
        let mut ane = Player::new("Ane");
        ane.record(Answer::grade(question(1), Some(OptionKey::from("a"))));
        let mut jon = Player::new("Jon");
        jon.record(Answer::grade(question(1), Some(OptionKey::from("b"))));
        let record = DayRecord::from_players(DayIndex::new(0), &[ane, jon], fixed_now());

        let review = DayReview::from_record(&record);
        assert!(review.is_competition());
        assert_eq!(review.score, 1);
        assert_eq!(review.tier, ResultTier::Perfect);
        assert_eq!(review.players.len(), 2);
        assert_eq!(review.leaders, vec!["Jon".to_string()]);
    }
}
