//! Tunables, optionally read from a TOML file. Missing keys keep their
//! defaults.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Internal render resolution
    pub width: usize,
    pub height: usize,
    /// Horizontal field of view in degrees
    pub fov_deg: f32,
    /// World units per grid cell
    pub tile_size: f32,
    /// Ray march increment in world units. Smaller is more accurate and
    /// slower.
    pub ray_step: f32,
    /// World units per tick
    pub move_speed: f32,
    /// Radians per tick
    pub turn_speed: f32,
    /// `k` in `255 / (1 + distance * k)`
    pub shade_falloff: f32,
    /// Sprite texels with every channel below this are transparent
    pub key_threshold: u8,
    /// Simulation ticks per second
    pub tick_rate: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fov_deg: 60.0,
            tile_size: 64.0,
            ray_step: 5.0,
            move_speed: 3.0,
            turn_speed: 0.05,
            shade_falloff: 0.01,
            key_threshold: 8,
            tick_rate: 60,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&src)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov_deg.to_radians()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |name: &str, v: f32| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be positive, got {v}")))
            }
        };
        // A zero step would never leave the first cell
        positive("ray_step", self.ray_step)?;
        positive("tile_size", self.tile_size)?;
        if !(self.fov_deg > 0.0 && self.fov_deg < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov_deg must be within (0, 180), got {}",
                self.fov_deg
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::Invalid("tick_rate must be non-zero".to_owned()));
        }
        if !self.move_speed.is_finite() || !self.turn_speed.is_finite() {
            return Err(ConfigError::Invalid("speeds must be finite".to_owned()));
        }
        if !self.shade_falloff.is_finite() || self.shade_falloff < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "shade_falloff must be non-negative, got {}",
                self.shade_falloff
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
        assert_eq!(GameConfig::from_toml_str("").unwrap(), GameConfig::default());
    }

    #[test]
    fn partial_override() {
        let c = GameConfig::from_toml_str("ray_step = 0.5\nwidth = 320\n").unwrap();
        assert_eq!(c.ray_step, 0.5);
        assert_eq!(c.width, 320);
        assert_eq!(c.height, 480);
    }

    #[test]
    fn rejects_bad_values() {
        for src in [
            "ray_step = 0.0",
            "ray_step = -1.0",
            "tile_size = 0.0",
            "fov_deg = 180.0",
            "width = 0",
            "tick_rate = 0",
            "shade_falloff = -0.5",
        ] {
            assert!(
                matches!(GameConfig::from_toml_str(src), Err(ConfigError::Invalid(_))),
                "{src}"
            );
        }
        assert!(matches!(
            GameConfig::from_toml_str("ray_step = \"fast\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
