//! Configuration management for bootseq.
//!
//! Loads configuration from ${BOOTSEQ_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::script::Script;

/// Returns the default config template with comments.
///
/// Embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for bootseq configuration and data directories.
    //!
    //! BOOTSEQ_HOME resolution order:
    //! 1. BOOTSEQ_HOME environment variable (if set)
    //! 2. ~/.config/bootseq (default)
    //! 3. ./.bootseq when no home directory can be determined

    use std::path::{Path, PathBuf};

    pub fn bootseq_home() -> PathBuf {
        if let Ok(home) = std::env::var("BOOTSEQ_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".bootseq"),
            |h| h.join(".config").join("bootseq"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        bootseq_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        bootseq_home().join("logs")
    }

    /// Resolves a configured path; relative paths are taken from BOOTSEQ_HOME.
    pub fn resolve(path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            bootseq_home().join(path)
        }
    }
}

/// CRT overlay toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Dim every other row.
    pub scanlines: bool,
    /// Sprinkle flickering noise over the frame.
    pub grain: bool,
    /// Darken the edges of the screen.
    pub vignette: bool,
    /// Fraction of cells touched by grain each frame (0.0 - 1.0).
    pub grain_density: f32,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            scanlines: true,
            grain: true,
            vignette: true,
            grain_density: EffectsConfig::DEFAULT_GRAIN_DENSITY,
        }
    }
}

impl EffectsConfig {
    const DEFAULT_GRAIN_DENSITY: f32 = 0.02;

    /// All overlays off.
    pub fn disabled() -> Self {
        Self {
            scanlines: false,
            grain: false,
            vignette: false,
            grain_density: 0.0,
        }
    }

    /// Grain density clamped to a usable range.
    pub fn grain_density(&self) -> f32 {
        if self.grain_density.is_finite() {
            self.grain_density.clamp(0.0, 1.0)
        } else {
            Self::DEFAULT_GRAIN_DENSITY
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Script file to play instead of the built-in sequence.
    pub script: Option<PathBuf>,

    /// Show the reveal time next to each line.
    pub show_timestamps: bool,

    /// Half-period of the cursor blink, in milliseconds.
    pub cursor_blink_ms: u64,

    /// How long the ready screen stays up with `--exit-on-complete`.
    pub hold_after_complete_ms: u64,

    /// CRT overlays.
    #[serde(default)]
    pub effects: EffectsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            script: None,
            show_timestamps: true,
            cursor_blink_ms: Self::DEFAULT_CURSOR_BLINK_MS,
            hold_after_complete_ms: Self::DEFAULT_HOLD_AFTER_COMPLETE_MS,
            effects: EffectsConfig::default(),
        }
    }
}

impl Config {
    const DEFAULT_CURSOR_BLINK_MS: u64 = 530;
    const DEFAULT_HOLD_AFTER_COMPLETE_MS: u64 = 1500;
    const MIN_CURSOR_BLINK_MS: u64 = 50;

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    fn write_config(path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    pub fn cursor_blink(&self) -> Duration {
        Duration::from_millis(self.cursor_blink_ms.max(Self::MIN_CURSOR_BLINK_MS))
    }

    pub fn hold_after_complete(&self) -> Duration {
        Duration::from_millis(self.hold_after_complete_ms)
    }

    /// Picks the script to play.
    ///
    /// Resolution order:
    /// 1) Explicit override (e.g. `--script`)
    /// 2) `script` from config, relative to BOOTSEQ_HOME
    /// 3) The built-in script
    ///
    /// # Errors
    /// Returns an error if the chosen script cannot be loaded or is invalid.
    pub fn load_script(&self, override_path: Option<&Path>) -> Result<Script> {
        let path = match (override_path, self.script.as_deref()) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(configured)) => paths::resolve(configured),
            (None, None) => {
                return Script::builtin().context("Built-in script is invalid");
            }
        };

        Script::load(&path).with_context(|| format!("Invalid script {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.show_timestamps);
        assert_eq!(config.cursor_blink(), Duration::from_millis(530));
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "show_timestamps = false\n[effects]\ngrain = false\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert!(!config.show_timestamps);
        assert!(!config.effects.grain);
        assert!(config.effects.scanlines);
        assert_eq!(config.hold_after_complete_ms, 1500);
    }

    #[test]
    fn test_load_invalid_config_reports_path() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "cursor_blink_ms = \"fast\"\n").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(format!("{err:#}").contains("config.toml"));
    }

    #[test]
    fn test_default_template_parses_to_defaults() {
        let config: Config = toml::from_str(default_config_template()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        assert!(config_path.exists());
        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "# existing").unwrap();

        let err = Config::init(&config_path).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_cursor_blink_is_clamped() {
        let config = Config {
            cursor_blink_ms: 0,
            ..Config::default()
        };
        assert_eq!(config.cursor_blink(), Duration::from_millis(50));
    }

    #[test]
    fn test_grain_density_is_clamped() {
        let mut effects = EffectsConfig {
            grain_density: 3.0,
            ..EffectsConfig::default()
        };
        assert!((effects.grain_density() - 1.0).abs() < f32::EPSILON);
        effects.grain_density = f32::NAN;
        assert!((effects.grain_density() - 0.02).abs() < f32::EPSILON);
    }

    #[test]
    fn test_load_script_prefers_override() {
        let dir = tempdir().unwrap();
        let configured = dir.path().join("configured.toml");
        let explicit = dir.path().join("explicit.toml");
        fs::write(&configured, "[[line]]\nid = \"c\"\ntext = \"configured\"\n").unwrap();
        fs::write(&explicit, "[[line]]\nid = \"e\"\ntext = \"explicit\"\n").unwrap();

        let config = Config {
            script: Some(configured.clone()),
            ..Config::default()
        };

        let script = config.load_script(Some(&explicit)).unwrap();
        assert_eq!(script.lines()[0].text(), "explicit");

        let script = config.load_script(None).unwrap();
        assert_eq!(script.lines()[0].text(), "configured");
    }

    #[test]
    fn test_load_script_falls_back_to_builtin() {
        let script = Config::default().load_script(None).unwrap();
        assert_eq!(script, Script::builtin().unwrap());
    }

    #[test]
    fn test_load_script_invalid_script_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dupes.toml");
        fs::write(
            &path,
            "[[line]]\nid = \"a\"\ntext = \"1\"\n[[line]]\nid = \"a\"\ntext = \"2\"\n",
        )
        .unwrap();

        let err = Config::default().load_script(Some(&path)).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("dupes.toml"));
        assert!(chain.contains("duplicate line id 'a'"));
    }
}
