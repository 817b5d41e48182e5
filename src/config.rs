//! Engine configuration loader.
//!
//! Reads `claimgrid.toml` from the executable's directory, then the CWD.
//! Missing files and missing keys fall back to defaults.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Result;
use crate::pool::DEFAULT_WARM_SIZE;

pub const CONFIG_FILE: &str = "claimgrid.toml";

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub pool: PoolConfig,
    pub presentation: PresentationConfig,
    pub game: GameConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PoolConfig {
    pub warm_size: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PresentationConfig {
    pub lift_delay_ms: u64, // freshly claimed cells render "rising" this long
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub tick_rate_ms: u64,
    pub strict_boundaries: bool,
    pub levels_file: PathBuf,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    pool: TomlPool,
    #[serde(default)]
    presentation: TomlPresentation,
    #[serde(default)]
    game: TomlGame,
}

#[derive(Deserialize, Debug)]
struct TomlPool {
    #[serde(default = "default_warm_size")]
    warm_size: usize,
}

#[derive(Deserialize, Debug)]
struct TomlPresentation {
    #[serde(default = "default_lift_delay")]
    lift_delay_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGame {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_strict")]
    strict_boundaries: bool,
    #[serde(default = "default_levels_file")]
    levels_file: String,
}

// ── Defaults ──

fn default_warm_size() -> usize { DEFAULT_WARM_SIZE }
fn default_lift_delay() -> u64 { 250 }
fn default_tick_rate() -> u64 { 120 }
fn default_strict() -> bool { cfg!(debug_assertions) }
fn default_levels_file() -> String { "levels.toml".into() }

impl Default for TomlPool {
    fn default() -> Self {
        TomlPool { warm_size: default_warm_size() }
    }
}

impl Default for TomlPresentation {
    fn default() -> Self {
        TomlPresentation { lift_delay_ms: default_lift_delay() }
    }
}

impl Default for TomlGame {
    fn default() -> Self {
        TomlGame {
            tick_rate_ms: default_tick_rate(),
            strict_boundaries: default_strict(),
            levels_file: default_levels_file(),
        }
    }
}

impl From<TomlConfig> for EngineConfig {
    fn from(cfg: TomlConfig) -> Self {
        EngineConfig {
            pool: PoolConfig {
                warm_size: cfg.pool.warm_size,
            },
            presentation: PresentationConfig {
                lift_delay_ms: cfg.presentation.lift_delay_ms,
            },
            game: GameConfig {
                tick_rate_ms: cfg.game.tick_rate_ms,
                strict_boundaries: cfg.game.strict_boundaries,
                levels_file: PathBuf::from(cfg.game.levels_file),
            },
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

// ── Loading ──

impl EngineConfig {
    /// Load config from `claimgrid.toml`.
    /// A relative `levels_file` is resolved against the directory the config
    /// came from.
    pub fn load() -> Self {
        for dir in candidate_dirs() {
            let path = dir.join(CONFIG_FILE);
            if !path.exists() {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(text) => match Self::from_toml_str(&text) {
                    Ok(mut cfg) => {
                        if cfg.game.levels_file.is_relative() {
                            cfg.game.levels_file = dir.join(&cfg.game.levels_file);
                        }
                        log::info!("loaded config from {}", path.display());
                        return cfg;
                    }
                    Err(e) => {
                        log::warn!("{} parse error: {e}; using default settings", path.display());
                        return Self::default();
                    }
                },
                Err(e) => log::warn!("could not read {}: {e}", path.display()),
            }
        }
        Self::default()
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: TomlConfig = toml::from_str(text)?;
        Ok(cfg.into())
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.game.tick_rate_ms)
    }

    pub fn lift_delay(&self) -> Duration {
        Duration::from_millis(self.presentation.lift_delay_ms)
    }
}

/// Executable directory first, then the current working directory.
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn test_empty_file_gives_defaults() {
        let cfg = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.pool.warm_size, DEFAULT_WARM_SIZE);
        assert_eq!(cfg.game.levels_file, PathBuf::from("levels.toml"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let cfg = EngineConfig::from_toml_str(
            r#"
            [pool]
            warm_size = 25

            [game]
            strict_boundaries = false
            "#,
        )
        .unwrap();

        assert_eq!(cfg.pool.warm_size, 25);
        assert!(!cfg.game.strict_boundaries);
        assert_eq!(cfg.game.tick_rate_ms, 120);
        assert_eq!(cfg.lift_delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let result = EngineConfig::from_toml_str("[pool]\nwarm_size = \"lots\"");
        assert!(matches!(result, Err(EngineError::Config(_))));
    }
}
