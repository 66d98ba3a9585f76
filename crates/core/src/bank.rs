use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::BankError;
use crate::model::{DayIndex, OptionKey, Question, QuestionId};
use crate::rules::ChallengeRules;

const EMBEDDED_BANK: &str = include_str!("../assets/question_bank.json");

/// Questions drawn from each category per day.
pub const QUESTIONS_PER_CATEGORY_PER_DAY: usize = 2;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryEntry {
    label: String,
    questions: Vec<QuestionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionEntry {
    id: QuestionId,
    prompt: String,
    options: IndexMap<OptionKey, String>,
    correct_option: OptionKey,
}

impl QuestionEntry {
    fn into_question(self, label: &str) -> Result<Question, BankError> {
        let mut options = IndexMap::with_capacity(self.options.len());
        for (key, text) in self.options {
            let key = key.normalized();
            if options.contains_key(&key) {
                return Err(BankError::DuplicateOption {
                    category: label.to_owned(),
                    id: self.id,
                    key,
                });
            }
            options.insert(key, text);
        }
        let correct_option = self.correct_option.normalized();
        Ok(Question::new(self.id, self.prompt, options, correct_option, label))
    }
}

/// A named, ordered group of questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    label: String,
    questions: Vec<Question>,
}

impl Category {
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

/// Selects which categories a bank browse returns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Label(String),
}

/// Read-only question bank organized by category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    categories: Vec<Category>,
}

impl QuestionBank {
    /// The bank compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns `BankError` if the embedded asset does not parse.
    pub fn embedded() -> Result<Self, BankError> {
        Self::from_json(EMBEDDED_BANK)
    }

    /// Parse a bank from its JSON form: an array of `{ label, questions }`.
    ///
    /// Each question receives its category label on load. Option keys are
    /// trimmed and lowercased so they match keys typed by players.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Parse` for malformed JSON, `BankError::Empty` if
    /// no categories are present and `BankError::DuplicateOption` if two keys
    /// of a question only differ in case or spacing.
    pub fn from_json(raw: &str) -> Result<Self, BankError> {
        let entries: Vec<CategoryEntry> = serde_json::from_str(raw)?;
        if entries.is_empty() {
            return Err(BankError::Empty);
        }

        let mut categories = Vec::with_capacity(entries.len());
        for entry in entries {
            let label = entry.label.trim().to_owned();
            let questions = entry
                .questions
                .into_iter()
                .map(|q| q.into_question(&label))
                .collect::<Result<Vec<_>, _>>()?;
            categories.push(Category { label, questions });
        }

        Ok(Self { categories })
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_labels(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(Category::label)
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.categories.iter().map(|c| c.questions.len()).sum()
    }

    /// Questions for `day`: positions `2*day` and `2*day + 1` of every category,
    /// in category order. Positions past the end of a category are skipped.
    #[must_use]
    pub fn questions_for_day(&self, day: DayIndex) -> Vec<Question> {
        let start = day.value().saturating_mul(QUESTIONS_PER_CATEGORY_PER_DAY);
        self.categories
            .iter()
            .flat_map(|category| {
                category
                    .questions
                    .iter()
                    .skip(start)
                    .take(QUESTIONS_PER_CATEGORY_PER_DAY)
            })
            .cloned()
            .collect()
    }

    /// Categories matching `filter`, with every question and its answer key.
    #[must_use]
    pub fn browse(&self, filter: &CategoryFilter) -> Vec<&Category> {
        match filter {
            CategoryFilter::All => self.categories.iter().collect(),
            CategoryFilter::Label(label) => self
                .categories
                .iter()
                .filter(|category| category.label == *label)
                .collect(),
        }
    }

    /// Check the bank can serve every day of `rules` with a full question set.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self, rules: &ChallengeRules) -> Result<(), BankError> {
        for category in &self.categories {
            if category.label.is_empty() {
                return Err(BankError::EmptyCategoryLabel);
            }
            let mut seen = HashSet::new();
            for question in &category.questions {
                if !seen.insert(question.id()) {
                    return Err(BankError::DuplicateQuestionId {
                        category: category.label.clone(),
                        id: question.id(),
                    });
                }
                if question.options().len() < 2 {
                    return Err(BankError::TooFewOptions {
                        category: category.label.clone(),
                        id: question.id(),
                    });
                }
                if !question.has_option(question.correct_option()) {
                    return Err(BankError::UnknownCorrectOption {
                        category: category.label.clone(),
                        id: question.id(),
                        key: question.correct_option().clone(),
                    });
                }
            }
        }

        for day in (0..rules.days_count()).map(DayIndex::new) {
            let found = self.questions_for_day(day).len();
            if found != rules.questions_per_day() {
                return Err(BankError::ShortDay {
                    day,
                    found,
                    expected: rules.questions_per_day(),
                });
            }
        }
        Ok(())
    }
}
