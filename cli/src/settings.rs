use anyhow::Context;
use bombbroom_core::{CellCount, Dimension, GameConfig};
use serde::Deserialize;
use std::path::Path;

pub(crate) const DEFAULT_WIDTH: Dimension = 9;
pub(crate) const DEFAULT_HEIGHT: Dimension = 9;
pub(crate) const DEFAULT_MINES: CellCount = 10;

/// Settings read from a TOML file, every key is optional.
///
/// ```toml
/// width = 16
/// height = 16
/// mines = 40
/// seed = 1234
/// events = true
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    pub mines: Option<CellCount>,
    pub seed: Option<u64>,
    pub events: Option<bool>,
}

impl Settings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read settings from {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Values set in `other` win over the ones in `self`.
    pub fn overridden_by(self, other: Settings) -> Self {
        Self {
            width: other.width.or(self.width),
            height: other.height.or(self.height),
            mines: other.mines.or(self.mines),
            seed: other.seed.or(self.seed),
            events: other.events.or(self.events),
        }
    }

    pub fn game_config(&self) -> anyhow::Result<GameConfig> {
        let width = self.width.unwrap_or(DEFAULT_WIDTH);
        let height = self.height.unwrap_or(DEFAULT_HEIGHT);
        let mines = self.mines.unwrap_or(DEFAULT_MINES);
        GameConfig::new(width, height, mines)
            .with_context(|| format!("Cannot play {width}x{height} with {mines} mines"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_file() {
        let settings = Settings::parse("width = 16\nmines = 40\n").unwrap();

        assert_eq!(settings.width, Some(16));
        assert_eq!(settings.height, None);
        assert_eq!(settings.mines, Some(40));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Settings::parse("difficulty = \"expert\"").is_err());
    }

    #[test]
    fn command_line_overrides_file() {
        let file = Settings {
            width: Some(16),
            height: Some(16),
            mines: Some(40),
            seed: Some(7),
            events: None,
        };
        let args = Settings {
            mines: Some(20),
            events: Some(true),
            ..Default::default()
        };

        let merged = file.overridden_by(args);

        assert_eq!(merged.mines, Some(20));
        assert_eq!(merged.width, Some(16));
        assert_eq!(merged.seed, Some(7));
        assert_eq!(merged.events, Some(true));
    }

    #[test]
    fn defaults_fill_missing_values() {
        let config = Settings::default().game_config().unwrap();

        assert_eq!(config.size(), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert_eq!(config.mines(), DEFAULT_MINES);
    }

    #[test]
    fn invalid_board_is_reported() {
        let settings = Settings {
            width: Some(2),
            height: Some(2),
            mines: Some(4),
            ..Default::default()
        };

        assert!(settings.game_config().is_err());
    }
}
