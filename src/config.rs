use bevy::prelude::Resource;
use serde::Deserialize;
use std::fmt;

const LIQUID_JSON: &str = include_str!("../assets/liquid.json");

/// Wave pass parameters for the liquid's top rim
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct WaveParams {
    /// Peak vertical offset of the wave
    pub amplitude: f32,
    /// How fast the wave travels along x per unit of elapsed time
    pub frequency: f32,
    /// Only vertices whose rest height is above this are displaced
    pub threshold: f32,
    /// Spatial shape constant inside the sine
    pub shape: f32,
    /// Elapsed-time advance per displaced frame
    pub time_step: f32,
}

impl Default for WaveParams {
    fn default() -> Self {
        WaveParams {
            amplitude: 0.01,
            frequency: 0.9,
            threshold: 0.1,
            shape: 1.5,
            time_step: 0.05,
        }
    }
}

/// Relaxation back to the rest pose
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RelaxSettings {
    /// Fraction of the remaining offset closed per step, in (0, 1]
    pub speed: f32,
    /// Per-coordinate distance to rest below which relaxation is done
    pub epsilon: f32,
    /// Steps after which the mesh is snapped to rest regardless
    pub max_steps: u32,
}

impl Default for RelaxSettings {
    fn default() -> Self {
        RelaxSettings {
            speed: 0.1,
            epsilon: 0.001,
            max_steps: 600,
        }
    }
}

/// Tunables for the liquid animation, embedded from `assets/liquid.json`
#[derive(Resource, Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LiquidConfig {
    /// Vertical scale applied to the liquid when its rest pose is captured
    pub rest_shrink: f32,
    pub wave: WaveParams,
    pub relax: RelaxSettings,
}

impl Default for LiquidConfig {
    fn default() -> Self {
        LiquidConfig {
            rest_shrink: 0.99,
            wave: WaveParams::default(),
            relax: RelaxSettings::default(),
        }
    }
}

/// Errors from parsing or validating the liquid configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    InvalidSpeed(f32),
    InvalidEpsilon(f32),
    InvalidMaxSteps,
    InvalidShrink(f32),
    InvalidTimeStep(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "could not parse liquid config: {}", e),
            ConfigError::InvalidSpeed(s) => write!(f, "relax speed {} must be in (0, 1]", s),
            ConfigError::InvalidEpsilon(e) => write!(f, "relax epsilon {} must be positive", e),
            ConfigError::InvalidMaxSteps => write!(f, "relax max_steps must be at least 1"),
            ConfigError::InvalidShrink(s) => write!(f, "rest shrink {} must be in (0, 1]", s),
            ConfigError::InvalidTimeStep(t) => {
                write!(f, "wave time step {} must be finite and non-negative", t)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl LiquidConfig {
    /// Parse and validate the embedded configuration
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_json(LIQUID_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: LiquidConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let relax = &self.relax;
        if !(relax.speed > 0.0 && relax.speed <= 1.0) {
            return Err(ConfigError::InvalidSpeed(relax.speed));
        }
        if !(relax.epsilon > 0.0 && relax.epsilon.is_finite()) {
            return Err(ConfigError::InvalidEpsilon(relax.epsilon));
        }
        if relax.max_steps == 0 {
            return Err(ConfigError::InvalidMaxSteps);
        }
        if !(self.rest_shrink > 0.0 && self.rest_shrink <= 1.0) {
            return Err(ConfigError::InvalidShrink(self.rest_shrink));
        }
        if !(self.wave.time_step >= 0.0 && self.wave.time_step.is_finite()) {
            return Err(ConfigError::InvalidTimeStep(self.wave.time_step));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_matches_defaults() {
        assert_eq!(LiquidConfig::load().unwrap(), LiquidConfig::default());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = LiquidConfig::from_json(r#"{ "relax": { "speed": 0.25 } }"#).unwrap();

        assert_eq!(config.relax.speed, 0.25);
        assert_eq!(config.relax.epsilon, 0.001);
        assert_eq!(config.wave, WaveParams::default());
        assert_eq!(config.rest_shrink, 0.99);
    }

    #[test]
    fn test_rejects_out_of_range_speed() {
        assert_eq!(
            LiquidConfig::from_json(r#"{ "relax": { "speed": 0.0 } }"#),
            Err(ConfigError::InvalidSpeed(0.0))
        );
        assert_eq!(
            LiquidConfig::from_json(r#"{ "relax": { "speed": 1.5 } }"#),
            Err(ConfigError::InvalidSpeed(1.5))
        );
    }

    #[test]
    fn test_rejects_zero_max_steps() {
        assert_eq!(
            LiquidConfig::from_json(r#"{ "relax": { "max_steps": 0 } }"#),
            Err(ConfigError::InvalidMaxSteps)
        );
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            LiquidConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
