use quiz_core::{ChallengeRules, SessionMode};

use crate::error::SetupError;

/// Longest accepted player name, in characters.
pub const MAX_NAME_CHARS: usize = 24;

/// Roster being assembled before a competition starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitionSetup {
    names: Vec<String>,
    min_players: usize,
    max_players: usize,
}

impl CompetitionSetup {
    #[must_use]
    pub fn new(rules: &ChallengeRules) -> Self {
        Self {
            names: Vec::new(),
            min_players: rules.min_players(),
            max_players: rules.max_players(),
        }
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        (self.min_players..=self.max_players).contains(&self.names.len())
    }

    /// Add a player; names are trimmed and must be unique ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `SetupError` for empty, overlong or duplicate names, or when
    /// the roster is full.
    pub fn add_player(&mut self, name: &str) -> Result<(), SetupError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SetupError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(SetupError::NameTooLong {
                max: MAX_NAME_CHARS,
            });
        }
        if self.names.len() >= self.max_players {
            return Err(SetupError::TooMany {
                max: self.max_players,
            });
        }
        if self
            .names
            .iter()
            .any(|existing| existing.to_lowercase() == name.to_lowercase())
        {
            return Err(SetupError::DuplicateName {
                name: name.to_owned(),
            });
        }
        self.names.push(name.to_owned());
        Ok(())
    }

    pub fn remove_player(&mut self, index: usize) -> Option<String> {
        (index < self.names.len()).then(|| self.names.remove(index))
    }

    /// Session mode for this roster.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::TooFew` if not enough players joined.
    pub fn to_mode(&self) -> Result<SessionMode, SetupError> {
        if self.names.len() < self.min_players {
            return Err(SetupError::TooFew {
                min: self.min_players,
            });
        }
        Ok(SessionMode::Competition(self.names.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> CompetitionSetup {
        CompetitionSetup::new(&ChallengeRules::default())
    }

    #[test]
    fn roster_needs_two_to_four_players() {
        let mut setup = setup();
        setup.add_player("Ane").unwrap();
        assert!(!setup.is_ready());
        assert_eq!(setup.to_mode(), Err(SetupError::TooFew { min: 2 }));

        setup.add_player("Jon").unwrap();
        setup.add_player("Miren").unwrap();
        setup.add_player("Iker").unwrap();
        assert!(setup.is_ready());
        assert_eq!(
            setup.add_player("Leire"),
            Err(SetupError::TooMany { max: 4 })
        );
    }

    #[test]
    fn names_are_trimmed_and_unique() {
        let mut setup = setup();
        setup.add_player("  Ane ").unwrap();
        assert_eq!(setup.names(), ["Ane".to_string()]);
        assert_eq!(
            setup.add_player("ANE"),
            Err(SetupError::DuplicateName {
                name: "ANE".into()
            })
        );
        assert_eq!(setup.add_player("   "), Err(SetupError::EmptyName));
        assert_eq!(
            setup.add_player(&"x".repeat(MAX_NAME_CHARS + 1)),
            Err(SetupError::NameTooLong {
                max: MAX_NAME_CHARS
            })
        );
    }

    #[test]
    fn remove_player_out_of_range_is_none() {
        let mut setup = setup();
        setup.add_player("Ane").unwrap();
        assert_eq!(setup.remove_player(3), None);
        assert_eq!(setup.remove_player(0), Some("Ane".into()));
        assert!(setup.names().is_empty());
    }

    #[test]
    fn ready_roster_becomes_competition_mode() {
        let mut setup = setup();
        setup.add_player("Ane").unwrap();
        setup.add_player("Jon").unwrap();
        assert_eq!(
            setup.to_mode(),
            Ok(SessionMode::Competition(vec!["Ane".into(), "Jon".into()]))
        );
    }
}
