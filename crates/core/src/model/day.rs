use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::answer::Answer;
use crate::model::ids::DayIndex;
use crate::model::player::Player;

/// Persisted outcome of one completed day.
///
/// `answers` always holds the first player's trace so single-player review
/// keeps working for competition runs; `players` is only present when more
/// than one person played, and `score` is then the best player score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    pub day_index: DayIndex,
    pub score: u32,
    pub completed: bool,
    #[serde(rename = "date")]
    pub completed_at: DateTime<Utc>,
    pub answers: Vec<Answer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub players: Option<Vec<Player>>,
}

impl DayRecord {
    /// Build a completed record from the finished players of a session.
    #[must_use]
    pub fn from_players(
        day_index: DayIndex,
        players: &[Player],
        completed_at: DateTime<Utc>,
    ) -> Self {
        let score = players.iter().map(Player::score).max().unwrap_or(0);
        let answers = players
            .first()
            .map(|player| player.answers().to_vec())
            .unwrap_or_default();
        let players = (players.len() > 1).then(|| players.to_vec());

        Self {
            day_index,
            score,
            completed: true,
            completed_at,
            answers,
            players,
        }
    }

    #[must_use]
    pub fn is_competition(&self) -> bool {
        self.players.is_some()
    }

    /// Number of correct answers in the first player's trace.
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct()).count()
    }

    /// Names of the players holding the best score; empty for solo runs.
    #[must_use]
    pub fn leaders(&self) -> Vec<&str> {
        match &self.players {
            Some(players) => players
                .iter()
                .filter(|p| p.score() == self.score)
                .map(Player::name)
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OptionKey;
    use crate::model::question::tests::sample_question;
    use crate::time::fixed_now;

    fn player_with(name: &str, correct: usize, total: usize) -> Player {
        let mut player = Player::new(name);
        for i in 0..total {
            let question = sample_question(u32::try_from(i).unwrap(), "a");
            let pick = if i < correct { "a" } else { "b" };
            player.record(Answer::grade(question, Some(OptionKey::from(pick))));
        }
        player
    }

    #[test]
    fn solo_record_has_no_players() {
        let record = DayRecord::from_players(DayIndex::new(0), &[player_with("Solo", 5, 12)], fixed_now());
        assert_eq!(record.score, 5);
        assert!(record.players.is_none());
        assert_eq!(record.answers.len(), 12);
        assert_eq!(record.correct_count(), 5);
    }

    #[test]
    fn competition_record_keeps_first_player_answers_and_best_score() {
        let players = [player_with("Ane", 4, 12), player_with("Jon", 9, 12)];
        let record = DayRecord::from_players(DayIndex::new(2), &players, fixed_now());

        assert_eq!(record.score, 9);
        assert_eq!(record.correct_count(), 4);
        assert_eq!(record.players.as_ref().map(Vec::len), Some(2));
        assert_eq!(record.leaders(), vec!["Jon"]);
    }

    #[test]
    fn serializes_with_legacy_field_names() {
        let record = DayRecord::from_players(DayIndex::new(1), &[player_with("Solo", 1, 1)], fixed_now());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["dayIndex"], 1);
        assert_eq!(json["date"], "2023-11-14T22:13:20Z");
        assert!(json.get("players").is_none());
    }
}
