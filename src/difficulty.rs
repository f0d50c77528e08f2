use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameDifficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl GameDifficulty {
    pub const ALL: [GameDifficulty; 3] = [
        GameDifficulty::Easy,
        GameDifficulty::Medium,
        GameDifficulty::Hard,
    ];

    /// Milliseconds shaved off the tick delay each time an apple is eaten.
    pub fn get_speed_increment(&self) -> u64 {
        match self {
            GameDifficulty::Easy => 2,
            GameDifficulty::Medium => 4,
            GameDifficulty::Hard => 6,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameDifficulty::Easy => "easy",
            GameDifficulty::Medium => "medium",
            GameDifficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for GameDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty {0:?}, expected easy, medium or hard")]
pub struct ParseDifficultyError(String);

impl FromStr for GameDifficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        GameDifficulty::ALL
            .into_iter()
            .find(|difficulty| difficulty.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseDifficultyError(s.to_string()))
    }
}
