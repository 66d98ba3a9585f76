use serde::{Deserialize, Serialize};

use crate::model::ids::OptionKey;
use crate::model::question::Question;

/// One graded response to a question.
///
/// `selected_option` is `None` exactly when the player ran out of time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    question: Question,
    selected_option: Option<OptionKey>,
    is_correct: bool,
}

impl Answer {
    /// Grade `selected` against the question's correct option.
    #[must_use]
    pub fn grade(question: Question, selected_option: Option<OptionKey>) -> Self {
        let is_correct = question.is_correct(selected_option.as_ref());
        Self {
            question,
            selected_option,
            is_correct,
        }
    }

    /// An answer recorded because the per-question timer ran out.
    #[must_use]
    pub fn timed_out(question: Question) -> Self {
        Self::grade(question, None)
    }

    #[must_use]
    pub fn question(&self) -> &Question {
        &self.question
    }

    #[must_use]
    pub fn selected_option(&self) -> Option<&OptionKey> {
        self.selected_option.as_ref()
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.selected_option.is_none()
    }

    /// Text of the chosen option, if one was chosen and still exists on the snapshot.
    #[must_use]
    pub fn selected_text(&self) -> Option<&str> {
        self.selected_option
            .as_ref()
            .and_then(|key| self.question.option_text(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::question::tests::sample_question;

    #[test]
    fn timeout_is_incorrect() {
        let answer = Answer::timed_out(sample_question(1, "a"));
        assert!(answer.is_timeout());
        assert!(!answer.is_correct());
        assert_eq!(answer.selected_text(), None);
    }

    #[test]
    fn grade_compares_against_correct_option() {
        let right = Answer::grade(sample_question(1, "b"), Some(OptionKey::from("b")));
        let wrong = Answer::grade(sample_question(1, "b"), Some(OptionKey::from("c")));
        assert!(right.is_correct());
        assert!(!wrong.is_correct());
        assert_eq!(wrong.selected_text(), Some("Charlie"));
    }

    #[test]
    fn timeout_serializes_as_null_selection() {
        let json = serde_json::to_value(Answer::timed_out(sample_question(2, "a"))).unwrap();
        assert!(json["selectedOption"].is_null());
        assert_eq!(json["isCorrect"], false);
    }
}
