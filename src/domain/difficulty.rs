/// Difficulty table: label → starting ship and pacing.

use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Starting values for a session.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DifficultyStats {
    pub health: i32,
    pub shield: u32,
    pub word_duration_ms: u64,
    pub spawn_frequency: u64,
}

impl Difficulty {
    /// Menu order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn stats(self) -> DifficultyStats {
        let (health, shield, word_duration_ms, spawn_frequency) = match self {
            Difficulty::Easy => (150, 2, 5000, 100),
            Difficulty::Medium => (125, 1, 3500, 80),
            Difficulty::Hard => (100, 0, 2000, 60),
        };
        DifficultyStats { health, shield, word_duration_ms, spawn_frequency }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Position in `ALL`, used by the title menu cursor.
    pub fn index(self) -> usize {
        Difficulty::ALL.iter().position(|d| *d == self).unwrap_or(0)
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Difficulty::ALL
            .iter()
            .copied()
            .find(|d| d.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| GameError::UnknownDifficulty(s.to_string()))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_difficulty_starts_playable() {
        for d in Difficulty::ALL {
            let s = d.stats();
            assert!(s.health > 0, "{d}");
            assert!(s.word_duration_ms > 0, "{d}");
            assert!(s.spawn_frequency > 0, "{d}");
        }
    }

    #[test]
    fn table_values() {
        assert_eq!(
            Difficulty::Easy.stats(),
            DifficultyStats { health: 150, shield: 2, word_duration_ms: 5000, spawn_frequency: 100 }
        );
        assert_eq!(
            Difficulty::Medium.stats(),
            DifficultyStats { health: 125, shield: 1, word_duration_ms: 3500, spawn_frequency: 80 }
        );
        assert_eq!(
            Difficulty::Hard.stats(),
            DifficultyStats { health: 100, shield: 0, word_duration_ms: 2000, spawn_frequency: 60 }
        );
    }

    #[test]
    fn parse_labels() {
        assert_eq!("Easy".parse::<Difficulty>().ok(), Some(Difficulty::Easy));
        assert_eq!(" medium ".parse::<Difficulty>().ok(), Some(Difficulty::Medium));
        assert_eq!("HARD".parse::<Difficulty>().ok(), Some(Difficulty::Hard));
    }

    #[test]
    fn unknown_label_is_a_configuration_error() {
        match "Nightmare".parse::<Difficulty>() {
            Err(GameError::UnknownDifficulty(label)) => assert_eq!(label, "Nightmare"),
            other => panic!("expected UnknownDifficulty, got {other:?}"),
        }
        assert!("".parse::<Difficulty>().is_err());
    }

    #[test]
    fn menu_index_round_trips() {
        for (i, d) in Difficulty::ALL.iter().enumerate() {
            assert_eq!(d.index(), i);
        }
    }
}
