//! # Config Module
//!
//! Game configuration, persisted as RON in [`CONFIG_FILE`].
//!
//! Every field has a default, so a partial file only overrides what it names.

use crate::error::{HornetError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration file path.
pub const CONFIG_FILE: &str = "config/hornet.ron";

/// Default serial port name prefix for the current platform.
#[cfg(windows)]
pub const DEFAULT_PORT_PREFIX: &str = "COM";
/// Default serial port name prefix for the current platform.
#[cfg(not(windows))]
pub const DEFAULT_PORT_PREFIX: &str = "/dev/ttyUSB";

/// Top-level game configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Window (surface) width in logical pixels.
    pub surface_width: u32,
    /// Window (surface) height in logical pixels.
    pub surface_height: u32,
    /// Target sprite width.
    pub target_width: u32,
    /// Target sprite height.
    pub target_height: u32,
    /// Period between two spawns.
    pub spawn_period_ms: u64,
    /// Period between two expiries.
    pub expire_period_ms: u64,
    /// Delay between the X and the Y transmission.
    pub y_delay_ms: u64,
    /// Bounded wait for a write to flush.
    pub flush_wait_ms: u64,
    /// Secondary bound applied to spawn positions, if any.
    pub fallback: Option<FallbackBounds>,
    pub link: LinkConfig,
    pub assets: AssetConfig,
    /// Fixed RNG seed, for reproducible spawn positions.
    pub seed: Option<u64>,
    /// Show the egui status overlay.
    pub show_hud: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            surface_width: 553,
            surface_height: 463,
            target_width: 80,
            target_height: 80,
            spawn_period_ms: 2000,
            expire_period_ms: 3000,
            y_delay_ms: 200,
            flush_wait_ms: 100,
            fallback: Some(FallbackBounds::default()),
            link: LinkConfig::default(),
            assets: AssetConfig::default(),
            seed: None,
            show_hud: true,
        }
    }
}

/// When a drawn position reaches `limit_x` or `limit_y`, the position is
/// redrawn inside the `region_width` x `region_height` area instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackBounds {
    pub limit_x: u32,
    pub limit_y: u32,
    pub region_width: u32,
    pub region_height: u32,
}

impl Default for FallbackBounds {
    fn default() -> Self {
        Self {
            limit_x: 450,
            limit_y: 350,
            region_width: 400,
            region_height: 300,
        }
    }
}

/// Serial link settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Port names must be this prefix followed by digits.
    pub port_prefix: String,
    pub baud_rate: u32,
    /// Interval of the port watcher.
    pub watch_interval_ms: u64,
    /// Append every sent coordinate to this file.
    pub transcript: Option<PathBuf>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            port_prefix: DEFAULT_PORT_PREFIX.to_string(),
            baud_rate: 115_200,
            watch_interval_ms: 2000,
            transcript: None,
        }
    }
}

/// Image assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub dir: PathBuf,
    pub background: String,
    pub target: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets"),
            background: "jardin.jpg".to_string(),
            target: "frelon.png".to_string(),
        }
    }
}

impl AssetConfig {
    /// Makes [`AssetConfig::dir`] absolute, against the working directory.
    ///
    /// The asset server resolves a relative root against its own base path,
    /// not the working directory, so both must see the same absolute path.
    pub fn resolve_dir(&mut self) -> Result<()> {
        self.dir = std::path::absolute(&self.dir)?;
        Ok(())
    }

    /// Resolves an asset file name against [`AssetConfig::dir`], failing when
    /// the file does not exist.
    pub fn locate(&self, name: &str) -> Result<PathBuf> {
        let path = self.dir.join(name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(HornetError::asset_missing(path.display().to_string()))
        }
    }
}

impl GameConfig {
    /// Interval between spawns.
    pub fn spawn_period(&self) -> Duration {
        Duration::from_millis(self.spawn_period_ms)
    }

    /// Interval between expiries.
    pub fn expire_period(&self) -> Duration {
        Duration::from_millis(self.expire_period_ms)
    }

    /// Delay between the X and Y coordinates.
    pub fn y_delay(&self) -> Duration {
        Duration::from_millis(self.y_delay_ms)
    }

    /// Serial write timeout.
    pub fn flush_wait(&self) -> Duration {
        Duration::from_millis(self.flush_wait_ms)
    }

    /// Parses a RON document and validates it.
    pub fn from_ron(data: &str) -> Result<Self> {
        let config: Self =
            ron::from_str(data).map_err(|e| HornetError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        Self::from_ron(&data)
    }

    /// Checks the cross-field constraints the spawner relies on.
    pub fn validate(&self) -> Result<()> {
        if self.spawn_period_ms == 0 || self.expire_period_ms == 0 {
            return Err(HornetError::invalid_config("timer periods must be non-zero"));
        }
        if self.target_width == 0 || self.target_height == 0 {
            return Err(HornetError::invalid_config("target size must be non-zero"));
        }
        if self.target_width > self.surface_width || self.target_height > self.surface_height {
            return Err(HornetError::invalid_config(format!(
                "target {}x{} does not fit surface {}x{}",
                self.target_width, self.target_height, self.surface_width, self.surface_height
            )));
        }
        if let Some(fallback) = &self.fallback {
            if fallback.region_width > self.surface_width
                || fallback.region_height > self.surface_height
            {
                return Err(HornetError::invalid_config(
                    "fallback region exceeds the surface",
                ));
            }
            if fallback.region_width < self.target_width
                || fallback.region_height < self.target_height
            {
                return Err(HornetError::invalid_config(
                    "fallback region is smaller than a target",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = GameConfig::from_ron(
            r#"(surface_width: 640, link: (port_prefix: "COM", baud_rate: 9600))"#,
        )
        .unwrap();
        assert_eq!(config.surface_width, 640);
        assert_eq!(config.surface_height, 463);
        assert_eq!(config.link.port_prefix, "COM");
        assert_eq!(config.link.baud_rate, 9600);
        assert_eq!(config.link.watch_interval_ms, 2000);
        assert_eq!(config.y_delay(), Duration::from_millis(200));
    }

    #[test]
    fn test_fallback_can_be_disabled() {
        let config = GameConfig::from_ron("(fallback: None)").unwrap();
        assert!(config.fallback.is_none());
    }

    #[test]
    fn test_malformed_ron_is_parse_error() {
        let err = GameConfig::from_ron("(surface_width: \"wide\")").unwrap_err();
        assert!(matches!(err, HornetError::ConfigParse(_)));
    }

    #[test]
    fn test_target_larger_than_surface_rejected() {
        let config = GameConfig {
            surface_width: 50,
            fallback: None,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(HornetError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_fallback_region_outside_surface_rejected() {
        let config = GameConfig {
            fallback: Some(FallbackBounds {
                region_width: 1000,
                ..FallbackBounds::default()
            }),
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_period_rejected() {
        let config = GameConfig {
            expire_period_ms: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::load(dir.path().join("absent.ron")).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_load_bad_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hornet.ron");
        std::fs::write(&path, "not ron at all (").unwrap();
        assert!(GameConfig::load(&path).is_err());
    }

    #[test]
    fn test_locate_missing_asset() {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetConfig {
            dir: dir.path().to_path_buf(),
            ..AssetConfig::default()
        };
        assert!(matches!(
            assets.locate("frelon.png"),
            Err(HornetError::AssetMissing(_))
        ));
        std::fs::write(dir.path().join("frelon.png"), b"png").unwrap();
        assert_eq!(
            assets.locate("frelon.png").unwrap(),
            dir.path().join("frelon.png")
        );
    }

    #[test]
    fn test_resolve_dir_makes_relative_absolute() {
        let mut assets = AssetConfig::default();
        assets.resolve_dir().unwrap();
        assert!(assets.dir.is_absolute());
        assert_eq!(assets.dir, std::env::current_dir().unwrap().join("assets"));
    }

    #[test]
    fn test_resolve_dir_keeps_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let mut assets = AssetConfig {
            dir: dir.path().to_path_buf(),
            ..AssetConfig::default()
        };
        assets.resolve_dir().unwrap();
        assert_eq!(assets.dir, dir.path());
        std::fs::write(dir.path().join("jardin.jpg"), b"jpg").unwrap();
        assert!(assets.locate("jardin.jpg").unwrap().is_absolute());
    }
}
