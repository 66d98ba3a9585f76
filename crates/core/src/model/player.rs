use serde::{Deserialize, Serialize};

use crate::model::answer::Answer;

/// Name given to the single participant of a solo run.
pub const SOLO_PLAYER_NAME: &str = "Player 1";

/// A participant in a session and their running answer trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    name: String,
    score: u32,
    answers: Vec<Answer>,
}

impl Player {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: 0,
            answers: Vec::new(),
        }
    }

    #[must_use]
    pub fn solo() -> Self {
        Self::new(SOLO_PLAYER_NAME)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// Append an answer, crediting the score when it is correct.
    pub fn record(&mut self, answer: Answer) {
        if answer.is_correct() {
            self.score = self.score.saturating_add(1);
        }
        self.answers.push(answer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OptionKey;
    use crate::model::question::tests::sample_question;

    #[test]
    fn record_counts_only_correct_answers() {
        let mut player = Player::new("Ane");
        player.record(Answer::grade(sample_question(1, "a"), Some(OptionKey::from("a"))));
        player.record(Answer::grade(sample_question(2, "a"), Some(OptionKey::from("b"))));
        player.record(Answer::timed_out(sample_question(3, "a")));

        assert_eq!(player.score(), 1);
        assert_eq!(player.answers().len(), 3);
    }
}
