//! Tunable parameters for a simulation session.
//!
//! Every field has a default, so a JSON document only needs to name the values
//! it changes:
//!
//! ```json
//! {
//!   "pool_size": 40,
//!   "hold_delay_ms": 400,
//!   "physics": { "restitution": 0.7 },
//!   "hot_zones": [ { "x": 0, "y": 0, "width": 320, "height": 64 } ]
//! }
//! ```

use crate::error::SimulationError;
use crate::orbit::LinkKind;

use serde::Deserialize;
use ultraviolet::Vec2;

/// Top-level configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Total number of bodies, link bodies included.
    pub pool_size: usize,
    /// Distance from the viewport edges kept free at spawn.
    pub spawn_margin: f32,
    /// How long the pointer must stay down before links start orbiting.
    pub hold_delay_ms: f64,
    /// How long links keep orbiting the frozen center after release.
    pub grace_period_ms: f64,
    /// Minimum wall-clock time between two steps.
    pub frame_interval_ms: f64,
    /// Seeds the session RNG; entropy when absent.
    pub seed: Option<u64>,
    pub physics: PhysicsConfig,
    /// Glyphs drawn at random for decorative bodies.
    pub glyphs: Vec<String>,
    /// One link body is spawned per entry.
    pub links: Vec<LinkSpec>,
    /// Regions where a pointer-down belongs to the UI and never starts a hold.
    pub hot_zones: Vec<HotZone>,
}

/// Per-tick physics constants.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub restitution: f32,
    /// Fraction of the normal velocity kept after a wall bounce.
    pub wall_damping: f32,
    /// Probability per tick of a random velocity nudge.
    pub jitter_chance: f32,
    pub jitter_strength: f32,
    /// Movement in pixels below which a body is not repainted.
    pub paint_epsilon: f32,
    /// Degrees of tilt per pixel/tick of horizontal velocity.
    pub tilt_per_speed: f32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LinkSpec {
    pub kind: LinkKind,
    pub glyph: String,
}

/// Axis-aligned rectangle in viewport pixels.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct HotZone {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl HotZone {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            restitution: 0.8,
            wall_damping: 0.9,
            jitter_chance: 0.002,
            jitter_strength: 0.5,
            paint_epsilon: 0.5,
            tilt_per_speed: 10.0,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            pool_size: 30,
            spawn_margin: 50.0,
            hold_delay_ms: 500.0,
            grace_period_ms: 1000.0,
            frame_interval_ms: 16.0,
            seed: None,
            physics: PhysicsConfig::default(),
            glyphs: ["🫧", "✨", "🌸", "🍃", "⭐", "🎈", "🪐", "💫"]
                .iter()
                .map(|g| g.to_string())
                .collect(),
            links: vec![
                LinkSpec {
                    kind: LinkKind::Repository,
                    glyph: "🐙".to_string(),
                },
                LinkSpec {
                    kind: LinkKind::Community,
                    glyph: "💬".to_string(),
                },
                LinkSpec {
                    kind: LinkKind::Leaderboard,
                    glyph: "🏆".to_string(),
                },
                LinkSpec {
                    kind: LinkKind::SubmitScore,
                    glyph: "📮".to_string(),
                },
            ],
            hot_zones: Vec::new(),
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a JSON document.
    pub fn from_json(text: &str) -> Result<Self, SimulationError> {
        let config: SimulationConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        let invalid = |msg: String| -> Result<(), SimulationError> {
            Err(SimulationError::InvalidConfig(msg))
        };

        if self.pool_size < self.links.len() {
            return invalid(format!(
                "pool_size {} cannot hold {} links",
                self.pool_size,
                self.links.len()
            ));
        }
        if self.pool_size > self.links.len() && self.glyphs.is_empty() {
            return invalid("glyphs must not be empty".to_string());
        }
        if !self.spawn_margin.is_finite() || self.spawn_margin < 0.0 {
            return invalid(format!("spawn_margin {} must be >= 0", self.spawn_margin));
        }
        for (name, value) in [
            ("hold_delay_ms", self.hold_delay_ms),
            ("grace_period_ms", self.grace_period_ms),
            ("frame_interval_ms", self.frame_interval_ms),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return invalid(format!("{name} {value} must be a finite value > 0"));
            }
        }

        let p = &self.physics;
        for (name, value) in [
            ("restitution", p.restitution),
            ("wall_damping", p.wall_damping),
            ("jitter_chance", p.jitter_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("{name} {value} must lie in [0, 1]"));
            }
        }
        for (name, value) in [
            ("jitter_strength", p.jitter_strength),
            ("paint_epsilon", p.paint_epsilon),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return invalid(format!("{name} {value} must be a finite value >= 0"));
            }
        }
        if !p.tilt_per_speed.is_finite() {
            return invalid("tilt_per_speed must be finite".to_string());
        }

        Ok(())
    }
}
