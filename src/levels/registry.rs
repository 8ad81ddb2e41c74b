//! Ordered level definitions

use crate::consts::TOTAL_LEVELS;
use crate::error::LevelError;
use crate::games::GameKind;

/// One stage of the progression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelDefinition {
    /// 1-based level number
    pub level: u32,
    pub name: &'static str,
    pub game: GameKind,
    /// Rebuild the game every time the level is shown
    pub reinit_on_show: bool,
}

impl LevelDefinition {
    pub const fn new(level: u32, game: GameKind, reinit_on_show: bool) -> Self {
        Self {
            level,
            name: game.name(),
            game,
            reinit_on_show,
        }
    }

    /// DOM id of the level container
    pub fn container_id(&self) -> String {
        format!("fun-level{}", self.level)
    }
}

const STANDARD: [LevelDefinition; TOTAL_LEVELS as usize] = [
    LevelDefinition::new(1, GameKind::ConfettiClicks, false),
    LevelDefinition::new(2, GameKind::DragDrop, false),
    LevelDefinition::new(3, GameKind::Quiz, false),
    LevelDefinition::new(4, GameKind::MemoryMatch, true),
    LevelDefinition::new(5, GameKind::SimonSays, true),
    LevelDefinition::new(6, GameKind::TypingChallenge, true),
    LevelDefinition::new(7, GameKind::LightsOut, true),
    LevelDefinition::new(8, GameKind::PixelArt, true),
    LevelDefinition::new(9, GameKind::TriviaWheel, true),
    LevelDefinition::new(10, GameKind::Platformer, true),
    LevelDefinition::new(11, GameKind::CodeDebug, true),
    LevelDefinition::new(12, GameKind::EmojiGuess, false),
    LevelDefinition::new(13, GameKind::SecretCommand, false),
    LevelDefinition::new(14, GameKind::Celebration, true),
];

/// Immutable, ordered level table
#[derive(Debug, Clone)]
pub struct LevelRegistry {
    levels: Vec<LevelDefinition>,
}

impl LevelRegistry {
    /// The 14-level progression
    pub fn standard() -> Self {
        Self {
            levels: STANDARD.to_vec(),
        }
    }

    /// Custom table; entries must be numbered 1..=n in order
    pub fn new(levels: Vec<LevelDefinition>) -> Result<Self, LevelError> {
        for (index, def) in levels.iter().enumerate() {
            if def.level as usize != index + 1 {
                return Err(LevelError::Misnumbered {
                    index,
                    level: def.level,
                });
            }
        }
        Ok(Self { levels })
    }

    pub fn get(&self, level: u32) -> Option<&LevelDefinition> {
        let idx = (level as usize).checked_sub(1)?;
        self.levels.get(idx)
    }

    pub fn len(&self) -> u32 {
        self.levels.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDefinition> {
        self.levels.iter()
    }
}

impl Default for LevelRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table() {
        let registry = LevelRegistry::standard();
        assert_eq!(registry.len(), TOTAL_LEVELS);
        assert_eq!(registry.get(1).map(|d| d.game), Some(GameKind::ConfettiClicks));
        assert_eq!(registry.get(14).map(|d| d.game), Some(GameKind::Celebration));
        assert!(registry.get(0).is_none());
        assert!(registry.get(15).is_none());
        assert_eq!(registry.get(7).map(|d| d.container_id()), Some("fun-level7".to_string()));
    }

    #[test]
    fn test_initializer_levels() {
        let with_init: Vec<u32> = LevelRegistry::standard()
            .iter()
            .filter(|d| d.reinit_on_show)
            .map(|d| d.level)
            .collect();
        assert_eq!(with_init, vec![4, 5, 6, 7, 8, 9, 10, 11, 14]);
    }

    #[test]
    fn test_misnumbered_rejected() {
        let levels = vec![
            LevelDefinition::new(1, GameKind::ConfettiClicks, false),
            LevelDefinition::new(3, GameKind::Quiz, false),
        ];
        assert_eq!(
            LevelRegistry::new(levels).unwrap_err(),
            LevelError::Misnumbered { index: 1, level: 3 }
        );
    }
}
