use std::path::Path;

use anyhow::{Context, Result, bail};
use twenty48_core::engine::{MAX_SIZE, MIN_SIZE, Rules, Tile};

#[derive(Clone, Debug, PartialEq, serde::Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct GameConfig {
    /// Board edge used when a request omits `size` and for the lazily created game.
    #[serde(default = "defaults::default_size")]
    pub default_size: usize,
    #[serde(default = "defaults::win_tile")]
    pub win_tile: Tile,
    /// Seed for the session RNG. When unset the RNG is seeded from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            default_size: defaults::default_size(),
            win_tile: defaults::win_tile(),
            seed: None,
        }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let cfg: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from `path` if given, otherwise fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_toml(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let size = self.game.default_size;
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            bail!("game.default_size {size} must be within {MIN_SIZE}..={MAX_SIZE}");
        }
        self.rules()?;
        Ok(())
    }

    pub fn rules(&self) -> Result<Rules> {
        Rules::new(self.game.win_tile).context("invalid game.win_tile")
    }
}

mod defaults {
    pub fn default_size() -> usize { 4 }
    pub fn win_tile() -> u32 { twenty48_core::engine::DEFAULT_WIN_TILE }
}
