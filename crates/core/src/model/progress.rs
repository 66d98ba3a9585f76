use serde::{Deserialize, Deserializer, Serialize, de};

use crate::model::day::DayRecord;
use crate::model::ids::DayIndex;

/// Per-day records for the whole challenge, indexed by day.
///
/// The sequence is sparse: days that were never played are `None` and
/// serialize as `null`, so the persisted blob stays a plain array indexed by
/// `dayIndex`. A record whose `dayIndex` does not match its slot fails to
/// deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Progress {
    days: Vec<Option<DayRecord>>,
}

impl Progress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Option::is_none)
    }

    #[must_use]
    pub fn get(&self, day: DayIndex) -> Option<&DayRecord> {
        self.days.get(day.value()).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn is_completed(&self, day: DayIndex) -> bool {
        self.get(day).is_some_and(|record| record.completed)
    }

    /// Store `record` at its own day index, replacing any previous record.
    pub fn insert(&mut self, record: DayRecord) {
        let idx = record.day_index.value();
        if self.days.len() <= idx {
            self.days.resize(idx + 1, None);
        }
        self.days[idx] = Some(record);
    }

    /// Present records in day order.
    pub fn records(&self) -> impl Iterator<Item = &DayRecord> {
        self.days.iter().flatten()
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.records().filter(|record| record.completed).count()
    }

    /// Sum of the recorded day scores.
    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.records()
            .filter(|record| record.completed)
            .map(|record| record.score)
            .sum()
    }
}

impl<'de> Deserialize<'de> for Progress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let days = Vec::<Option<DayRecord>>::deserialize(deserializer)?;
        for (slot, record) in days.iter().enumerate() {
            if let Some(record) = record {
                if record.day_index.value() != slot {
                    return Err(de::Error::custom(format!(
                        "record for day index {} stored in slot {slot}",
                        record.day_index.value()
                    )));
                }
            }
        }
        Ok(Self { days })
    }
}
