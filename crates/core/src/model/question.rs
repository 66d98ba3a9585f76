use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::ids::{OptionKey, QuestionId};

/// An immutable multiple-choice question as asked in a session.
///
/// Options keep the bank's insertion order, which is also the display order.
/// Answers embed a full copy of the question so persisted reviews survive
/// later edits to the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: IndexMap<OptionKey, String>,
    correct_option: OptionKey,
    category_label: String,
}

impl Question {
    #[must_use]
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: IndexMap<OptionKey, String>,
        correct_option: OptionKey,
        category_label: impl Into<String>,
    ) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            options,
            correct_option,
            category_label: category_label.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &IndexMap<OptionKey, String> {
        &self.options
    }

    #[must_use]
    pub fn correct_option(&self) -> &OptionKey {
        &self.correct_option
    }

    #[must_use]
    pub fn category_label(&self) -> &str {
        &self.category_label
    }

    #[must_use]
    pub fn has_option(&self, key: &OptionKey) -> bool {
        self.options.contains_key(key)
    }

    #[must_use]
    pub fn option_text(&self, key: &OptionKey) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn correct_text(&self) -> Option<&str> {
        self.option_text(&self.correct_option)
    }

    #[must_use]
    pub fn is_correct(&self, selected: Option<&OptionKey>) -> bool {
        selected == Some(&self.correct_option)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_question(id: u32, correct: &str) -> Question {
        let mut options = IndexMap::new();
        options.insert(OptionKey::from("a"), "Alpha".to_string());
        options.insert(OptionKey::from("b"), "Bravo".to_string());
        options.insert(OptionKey::from("c"), "Charlie".to_string());
        Question::new(
            QuestionId::new(id),
            format!("Question {id}?"),
            options,
            OptionKey::from(correct),
            "Sample",
        )
    }

    #[test]
    fn absent_selection_is_never_correct() {
        let question = sample_question(1, "a");
        assert!(!question.is_correct(None));
        assert!(question.is_correct(Some(&OptionKey::from("a"))));
        assert!(!question.is_correct(Some(&OptionKey::from("b"))));
    }

    #[test]
    fn options_serialize_in_insertion_order() {
        let mut options = IndexMap::new();
        options.insert(OptionKey::from("c"), "third".to_string());
        options.insert(OptionKey::from("a"), "first".to_string());
        let question = Question::new(
            QuestionId::new(7),
            "Order?",
            options,
            OptionKey::from("a"),
            "Misc",
        );

        let json = serde_json::to_string(&question).unwrap();
        let c_at = json.find("\"c\"").unwrap();
        let a_at = json.find("\"a\":").unwrap();
        assert!(c_at < a_at);
        assert!(json.contains("\"correctOption\":\"a\""));
        assert!(json.contains("\"categoryLabel\":\"Misc\""));
    }
}
