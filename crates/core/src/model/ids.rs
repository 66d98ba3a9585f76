use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a question inside the bank.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(u32);

impl QuestionId {
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

/// Zero-based position of a day inside the challenge.
///
/// Serialized as a bare integer so persisted records keep the `dayIndex: 3` shape.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayIndex(usize);

impl DayIndex {
    pub const FIRST: Self = Self(0);

    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub fn value(&self) -> usize {
        self.0
    }

    /// The day before this one, or `None` for the first day.
    #[must_use]
    pub fn previous(&self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }

    #[must_use]
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// One-based number as shown to players ("Day 1").
    #[must_use]
    pub fn number(&self) -> usize {
        self.0 + 1
    }
}

/// Short identifier of an answer option, usually a single letter.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionKey(String);

impl OptionKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trimmed, lowercase form; the shape typed keys are parsed into.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self(self.0.trim().to_lowercase())
    }
}

impl From<&str> for OptionKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Debug for DayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DayIndex({})", self.0)
    }
}

impl fmt::Debug for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionKey({:?})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing an ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for QuestionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>()
            .map(QuestionId::new)
            .map_err(|_| ParseIdError { kind: "QuestionId" })
    }
}

impl FromStr for DayIndex {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<usize>()
            .map(DayIndex::new)
            .map_err(|_| ParseIdError { kind: "DayIndex" })
    }
}

impl FromStr for OptionKey {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseIdError { kind: "OptionKey" });
        }
        Ok(OptionKey::new(trimmed).normalized())
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
