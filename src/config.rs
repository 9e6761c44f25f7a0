//! Data-driven game tuning
//!
//! Loaded once at startup (defaults or JSON) and validated before the
//! simulation is constructed. Malformed tuning is a fatal startup
//! error, never a runtime condition.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation failure. Raised at load time; the
/// simulation never sees an invalid config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("archetype set is empty; at least one produce archetype is required")]
    EmptyArchetypes,
    #[error("{name}: min {min} exceeds max {max}")]
    InvalidRange { name: &'static str, min: f32, max: f32 },
    #[error("bomb_chance {0} is outside [0, 1]")]
    InvalidBombChance(f32),
    #[error("{name} must be positive, got {value}")]
    NonPositiveDuration { name: &'static str, value: f32 },
    #[error("archetype {name:?} has non-positive radius {radius}")]
    InvalidRadius { name: String, radius: f32 },
}

/// Template describing an instantiable entity's hit-volume and identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeConfig {
    pub name: String,
    /// Hit-volume radius (world units)
    pub radius: f32,
}

impl ArchetypeConfig {
    pub fn new(name: &str, radius: f32) -> Self {
        Self {
            name: name.to_string(),
            radius,
        }
    }
}

/// Blade tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BladeConfig {
    /// Impulse magnitude applied to sliced half-pieces
    pub slide_force: f32,
    /// Minimum gesture velocity (world units/s) for a cut to register
    pub min_slice_velocity: f32,
}

impl Default for BladeConfig {
    fn default() -> Self {
        Self {
            slide_force: 10.0,
            min_slice_velocity: 0.0,
        }
    }
}

/// Spawner tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnerConfig {
    /// Chance a spawn is overridden with the bomb archetype
    pub bomb_chance: f32,
    /// Delay before the first spawn of a round (seconds)
    pub pre_start_delay: f32,
    /// Inter-spawn delay range (seconds)
    pub min_spawn_delay: f32,
    pub max_spawn_delay: f32,
    /// Launch tilt range (degrees around z)
    pub min_angle_deg: f32,
    pub max_angle_deg: f32,
    /// Upward impulse magnitude range
    pub min_force: f32,
    pub max_force: f32,
    /// Entities are removed this many seconds after spawning
    pub max_lifetime: f32,
    /// Axis-aligned spawn volume (world units)
    pub area_min: Vec2,
    pub area_max: Vec2,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            bomb_chance: 0.05,
            pre_start_delay: 2.0,
            min_spawn_delay: 0.25,
            max_spawn_delay: 1.0,
            min_angle_deg: -15.0,
            max_angle_deg: 15.0,
            min_force: 18.0,
            max_force: 22.0,
            max_lifetime: 5.0,
            area_min: Vec2::new(-6.0, -8.0),
            area_max: Vec2::new(6.0, -7.0),
        }
    }
}

/// Failure (explode) sequence tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplodeConfig {
    /// Duration of each fade leg (seconds, unscaled time)
    pub fade_duration: f32,
    /// Pause between fade-in and reset (seconds, unscaled time)
    pub hold_duration: f32,
}

impl Default for ExplodeConfig {
    fn default() -> Self {
        Self {
            fade_duration: 0.5,
            hold_duration: 1.0,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub blade: BladeConfig,
    pub spawner: SpawnerConfig,
    pub explode: ExplodeConfig,
    /// Produce archetypes, chosen uniformly at spawn time. Must be
    /// non-empty.
    pub archetypes: Vec<ArchetypeConfig>,
    /// The bomb archetype
    pub bomb: ArchetypeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            blade: BladeConfig::default(),
            spawner: SpawnerConfig::default(),
            explode: ExplodeConfig::default(),
            archetypes: vec![
                ArchetypeConfig::new("tomato", 0.5),
                ArchetypeConfig::new("carrot", 0.4),
                ArchetypeConfig::new("pumpkin", 0.7),
                ArchetypeConfig::new("cucumber", 0.45),
            ],
            bomb: ArchetypeConfig::new("bomb", 0.5),
        }
    }
}

impl Config {
    /// Validate all tuning preconditions, failing fast with a
    /// descriptive error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.archetypes.is_empty() {
            return Err(ConfigError::EmptyArchetypes);
        }
        for arch in self.archetypes.iter().chain(std::iter::once(&self.bomb)) {
            if arch.radius <= 0.0 {
                return Err(ConfigError::InvalidRadius {
                    name: arch.name.clone(),
                    radius: arch.radius,
                });
            }
        }
        if !(0.0..=1.0).contains(&self.spawner.bomb_chance) {
            return Err(ConfigError::InvalidBombChance(self.spawner.bomb_chance));
        }

        let ranges = [
            (
                "spawn_delay",
                self.spawner.min_spawn_delay,
                self.spawner.max_spawn_delay,
            ),
            (
                "angle_deg",
                self.spawner.min_angle_deg,
                self.spawner.max_angle_deg,
            ),
            ("force", self.spawner.min_force, self.spawner.max_force),
            ("area.x", self.spawner.area_min.x, self.spawner.area_max.x),
            ("area.y", self.spawner.area_min.y, self.spawner.area_max.y),
        ];
        for (name, min, max) in ranges {
            if min > max {
                return Err(ConfigError::InvalidRange { name, min, max });
            }
        }

        let durations = [
            ("pre_start_delay", self.spawner.pre_start_delay),
            ("min_spawn_delay", self.spawner.min_spawn_delay),
            ("max_lifetime", self.spawner.max_lifetime),
            ("fade_duration", self.explode.fade_duration),
            ("hold_duration", self.explode.hold_duration),
        ];
        for (name, value) in durations {
            if value <= 0.0 {
                return Err(ConfigError::NonPositiveDuration { name, value });
            }
        }

        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_empty_archetypes_rejected() {
        let mut config = Config::default();
        config.archetypes.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyArchetypes)
        ));
    }

    #[test]
    fn test_inverted_delay_range_rejected() {
        let mut config = Config::default();
        config.spawner.min_spawn_delay = 2.0;
        config.spawner.max_spawn_delay = 1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { name: "spawn_delay", .. })
        ));
    }

    #[test]
    fn test_bomb_chance_out_of_range_rejected() {
        let mut config = Config::default();
        config.spawner.bomb_chance = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBombChance(_))
        ));
    }

    #[test]
    fn test_zero_fade_duration_rejected() {
        let mut config = Config::default();
        config.explode.fade_duration = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveDuration { name: "fade_duration", .. })
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        let parsed = Config::from_json(&json).unwrap();
        assert_eq!(parsed.archetypes.len(), Config::default().archetypes.len());
    }

    #[test]
    fn test_error_message_names_the_range() {
        let mut config = Config::default();
        config.spawner.min_force = 30.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("force"));
    }
}
