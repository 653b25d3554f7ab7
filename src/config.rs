//! Tuning values for the particle field.
//!
//! Every constant the simulation and renderer use lives on [`FieldConfig`].
//! The defaults are the values the field was tuned with; changing them
//! changes the look and the per-frame cost.
//!
//! # Loading from JSON
//!
//! ```ignore
//! let config = FieldConfig::from_json_str(r#"{ "link_distance": 90.0 }"#)?;
//! assert_eq!(config.friction, 0.99); // unspecified fields keep their defaults
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest accepted `area_per_particle`: one particle per pixel.
pub const MIN_AREA_PER_PARTICLE: f32 = 1.0;

/// Largest accepted `max_speed`, in px/frame.
pub const SPEED_LIMIT: f32 = 1_000.0;

/// Configuration for a [`ParticleField`](crate::ParticleField).
///
/// Use the `with_*` methods to override individual values:
///
/// ```ignore
/// let config = FieldConfig::default()
///     .with_seed(7)
///     .with_link_distance(90.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Surface area (px²) per particle. Particle count is `floor(w * h / area)`.
    ///
    /// This bounds the O(n²) connection pass; lowering it grows n quadratically.
    pub area_per_particle: f32,
    /// Initial speed per axis is uniform in `[-max_speed, max_speed]` px/frame.
    pub max_speed: f32,
    /// Smallest particle radius (inclusive).
    pub min_size: f32,
    /// Largest particle radius (exclusive).
    pub max_size: f32,
    /// Lower bound of the spawn opacity (inclusive).
    pub spawn_opacity_min: f32,
    /// Upper bound of the spawn opacity (exclusive).
    pub spawn_opacity_max: f32,
    /// Opacity at which a fading particle turns around.
    pub min_opacity: f32,
    /// Opacity at which a brightening particle turns around.
    pub max_opacity: f32,
    /// Opacity change per frame.
    pub fade_step: f32,
    /// Pointer attraction reaches this far (px).
    pub attraction_radius: f32,
    /// Impulse scale at zero distance from the pointer.
    pub attraction_strength: f32,
    /// Velocity multiplier applied every frame.
    pub friction: f32,
    /// Particles closer than this (px) are linked.
    pub link_distance: f32,
    /// Link alpha at zero distance.
    pub link_opacity: f32,
    /// Link stroke width (px).
    pub link_width: f32,
    /// Glow radius as a multiple of particle size.
    pub glow_scale: f32,
    /// Glow centre alpha as a fraction of particle opacity.
    pub glow_intensity: f32,
    /// Particle and link colour (linear RGB, 0.0-1.0).
    pub color: [f32; 3],
    /// Surface clear colour (linear RGB, 0.0-1.0).
    pub background: [f32; 3],
    /// Seed for spawning. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            area_per_particle: 15_000.0,
            max_speed: 0.25,
            min_size: 1.0,
            max_size: 4.0,
            spawn_opacity_min: 0.2,
            spawn_opacity_max: 0.7,
            min_opacity: 0.1,
            max_opacity: 0.7,
            fade_step: 0.005,
            attraction_radius: 150.0,
            attraction_strength: 0.01,
            friction: 0.99,
            link_distance: 120.0,
            link_opacity: 0.15,
            link_width: 0.5,
            glow_scale: 3.0,
            glow_intensity: 0.3,
            color: [1.0, 1.0, 1.0],
            background: [0.02, 0.02, 0.05],
            seed: None,
        }
    }
}

impl FieldConfig {
    /// Parse a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every value is one the simulation can honour.
    ///
    /// A config that passes keeps positions inside the surface and opacity
    /// within one `fade_step` of `[min_opacity, max_opacity]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            })
        }

        let scalars = [
            ("area_per_particle", self.area_per_particle),
            ("max_speed", self.max_speed),
            ("min_size", self.min_size),
            ("max_size", self.max_size),
            ("spawn_opacity_min", self.spawn_opacity_min),
            ("spawn_opacity_max", self.spawn_opacity_max),
            ("min_opacity", self.min_opacity),
            ("max_opacity", self.max_opacity),
            ("fade_step", self.fade_step),
            ("attraction_radius", self.attraction_radius),
            ("attraction_strength", self.attraction_strength),
            ("friction", self.friction),
            ("link_distance", self.link_distance),
            ("link_opacity", self.link_opacity),
            ("link_width", self.link_width),
            ("glow_scale", self.glow_scale),
            ("glow_intensity", self.glow_intensity),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return invalid(field, "must be a finite number");
            }
        }

        if self.area_per_particle < MIN_AREA_PER_PARTICLE {
            return invalid("area_per_particle", "must be at least 1 px² per particle");
        }
        if self.max_speed < 0.0 || self.max_speed > SPEED_LIMIT {
            return invalid("max_speed", "must be within 0..=1000 px/frame");
        }
        if self.min_size <= 0.0 || self.min_size > self.max_size {
            return invalid("min_size", "must be positive and no larger than max_size");
        }
        if self.min_opacity < 0.0 || self.max_opacity > 1.0 || self.min_opacity >= self.max_opacity
        {
            return invalid("min_opacity", "opacity bounds must satisfy 0 <= min < max <= 1");
        }
        if self.spawn_opacity_min > self.spawn_opacity_max {
            return invalid("spawn_opacity_min", "must be no larger than spawn_opacity_max");
        }
        if self.spawn_opacity_min < self.min_opacity || self.spawn_opacity_max > self.max_opacity {
            return invalid(
                "spawn_opacity_min",
                "spawn range must lie within min_opacity..=max_opacity",
            );
        }
        if self.fade_step <= 0.0 || self.fade_step >= self.max_opacity - self.min_opacity {
            return invalid("fade_step", "must be positive and smaller than the opacity band");
        }
        if self.attraction_radius < 0.0 {
            return invalid("attraction_radius", "must not be negative");
        }
        if !(0.0..=1.0).contains(&self.friction) {
            return invalid("friction", "must be within 0..=1");
        }
        if self.link_distance <= 0.0 {
            return invalid("link_distance", "must be positive");
        }
        if !(0.0..=1.0).contains(&self.link_opacity) {
            return invalid("link_opacity", "must be within 0..=1");
        }
        if self.link_width <= 0.0 {
            return invalid("link_width", "must be positive");
        }
        if self.glow_scale < 0.0 || self.glow_intensity < 0.0 {
            return invalid("glow_scale", "glow values must not be negative");
        }
        Ok(())
    }

    /// Fix the spawn seed so the same surface yields the same particles.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the surface area allotted to each particle.
    pub fn with_area_per_particle(mut self, area: f32) -> Self {
        self.area_per_particle = area;
        self
    }

    /// Set the pointer attraction radius and strength.
    pub fn with_attraction(mut self, radius: f32, strength: f32) -> Self {
        self.attraction_radius = radius;
        self.attraction_strength = strength;
        self
    }

    /// Set the per-frame velocity multiplier.
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Set the distance under which particles are linked.
    pub fn with_link_distance(mut self, distance: f32) -> Self {
        self.link_distance = distance;
        self
    }

    /// Set the particle and link colour.
    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    /// Set the surface clear colour.
    pub fn with_background(mut self, background: [f32; 3]) -> Self {
        self.background = background;
        self
    }
}
