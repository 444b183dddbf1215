//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – update strategy and quadtree shape policy
//! - [`WindowConfig`]     – simulation area, also the quadtree root
//! - [`ParametersConfig`] – time step, frame count and seed
//! - [`SpawnConfig`]      – how many random bodies to spawn, and their ranges
//! - [`BodyConfig`]       – optional explicit initial bodies
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   strategy: "boundary"    # "flattened" | "branches" | "boundary" | "brute_force"
//!   split_threshold: 4      # bodies a leaf holds before it forks
//!   depth_threshold: 2      # deepest level that may still fork, at most 32
//!
//! window:
//!   width: 1920.0
//!   height: 1080.0
//!
//! parameters:
//!   dt: 0.016               # seconds per frame
//!   frames: 600             # frames the driver runs
//!   seed: 42                # deterministic seed
//!
//! spawn:                    # optional
//!   count: 5000
//!   min_radius: 1.0
//!   max_radius: 8.0
//!   min_speed: 50.0
//!   max_speed: 200.0
//!
//! bodies:                   # optional
//!   - x: [ 100.0, 100.0 ]
//!     v: [  50.0,   0.0 ]
//!     radius: 4.0
//! ```
//!
//! The scenario builder maps this into the runtime types in
//! [`crate::simulation`].

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::configuration::error::ConfigError;
use crate::simulation::integrator::UpdateStrategy;
use crate::simulation::params::{SpawnLimits, TreePolicy, Window};

/// Engine configuration: candidate gathering and tree shape
#[derive(Deserialize, Debug, Clone)]
pub struct EngineConfig {
    #[serde(default)]
    pub strategy: UpdateStrategy, // defaults to the boundary-aware walk
    pub split_threshold: usize, // max bodies per leaf before forking
    pub depth_threshold: u32, // max depth at which a leaf may fork
}

#[derive(Deserialize, Debug, Clone)]
pub struct WindowConfig {
    pub width: f64,
    pub height: f64,
}

/// Global numerical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub dt: f64, // time step size, seconds
    pub frames: u64, // frames to run
    pub seed: u64, // deterministic seed to make runs reproducible
}

/// Random spawning; all ranges are inclusive
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SpawnConfig {
    pub count: usize,
    pub min_radius: f64,
    pub max_radius: f64,
    pub min_speed: f64,
    pub max_speed: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        let limits = SpawnLimits::default();
        Self {
            count: 0,
            min_radius: limits.min_radius,
            max_radius: limits.max_radius,
            min_speed: limits.min_speed,
            max_speed: limits.max_speed,
        }
    }
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub x: Vec<f64>, // initial position, window coordinates
    pub v: Vec<f64>, // initial velocity, units per second
    pub radius: f64, // radius; mass is derived from it
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,
    pub window: WindowConfig,
    pub parameters: ParametersConfig,
    #[serde(default)]
    pub spawn: SpawnConfig,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
}

impl ScenarioConfig {
    /// Read, parse and validate a scenario file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Parse and validate a scenario from YAML text
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let cfg: ScenarioConfig = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn window(&self) -> Window {
        Window::new(self.window.width, self.window.height)
    }

    pub fn tree_policy(&self) -> TreePolicy {
        TreePolicy::new(self.engine.split_threshold, self.engine.depth_threshold)
    }

    pub fn spawn_limits(&self) -> SpawnLimits {
        SpawnLimits {
            min_radius: self.spawn.min_radius,
            max_radius: self.spawn.max_radius,
            min_speed: self.spawn.min_speed,
            max_speed: self.spawn.max_speed,
        }
    }

    /// Reject scenarios the core cannot run without tripping an assertion
    pub fn validate(&self) -> Result<(), ConfigError> {
        let WindowConfig { width, height } = self.window;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::invalid(format!(
                "window must have positive finite sides, got {width} x {height}"
            )));
        }
        let max_diameter = width.min(height);

        if self.engine.split_threshold == 0 {
            return Err(ConfigError::invalid("split_threshold must be at least 1"));
        }
        if self.engine.depth_threshold > TreePolicy::MAX_DEPTH_THRESHOLD {
            return Err(ConfigError::invalid(format!(
                "depth_threshold must be at most {}, got {}",
                TreePolicy::MAX_DEPTH_THRESHOLD,
                self.engine.depth_threshold
            )));
        }

        let dt = self.parameters.dt;
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(ConfigError::invalid(format!("dt must be finite and non-negative, got {dt}")));
        }

        let spawn = &self.spawn;
        check_range("radius", spawn.min_radius, spawn.max_radius)?;
        check_range("speed", spawn.min_speed, spawn.max_speed)?;
        if spawn.count > 0 {
            if spawn.min_radius <= 0.0 {
                return Err(ConfigError::invalid("spawn radii must be positive"));
            }
            if spawn.max_radius * 2.0 > max_diameter {
                return Err(ConfigError::invalid(format!(
                    "spawn max_radius {} does not fit in the window",
                    spawn.max_radius
                )));
            }
        }

        for (i, body) in self.bodies.iter().enumerate() {
            if body.x.len() != 2 || body.v.len() != 2 {
                return Err(ConfigError::invalid(format!(
                    "body {i}: x and v must have exactly two components"
                )));
            }
            if !(body.radius > 0.0 && body.radius * 2.0 <= max_diameter) {
                return Err(ConfigError::invalid(format!(
                    "body {i}: radius {} must be positive and fit in the window",
                    body.radius
                )));
            }
            if body.x.iter().chain(&body.v).any(|c| !c.is_finite()) {
                return Err(ConfigError::invalid(format!("body {i}: non-finite component")));
            }
        }

        Ok(())
    }
}

fn check_range(what: &str, min: f64, max: f64) -> Result<(), ConfigError> {
    if !(min.is_finite() && max.is_finite()) || min > max || min < 0.0 {
        return Err(ConfigError::invalid(format!(
            "spawn {what} range [{min}, {max}] must be finite, non-negative and ordered"
        )));
    }
    Ok(())
}
