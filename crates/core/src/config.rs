//! Engine configuration.
//!
//! Every field has a default, so a host can pass partial JSON such as
//! `{"animation_speed": 1.5}`.

use chrono::{FixedOffset, Local};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::emotion::{EmotionEvent, EmotionTable};
use crate::error::ConfigError;
use crate::particles::ParticleSettings;
use crate::time_of_day::{self, TimeBucket};

pub const MAX_ANIMATION_SPEED: f64 = 5.0;
const MAX_UTC_OFFSET_MINUTES: i32 = 24 * 60;

fn default_animation_speed() -> f64 {
    1.0
}

fn default_stochastic_particles() -> bool {
    true
}

fn default_spawn_chance() -> f64 {
    0.05
}

fn default_recent_transition_particles() -> usize {
    5
}

fn default_max_particles() -> usize {
    256
}

fn default_badge_edge_limit() -> usize {
    20
}

fn default_seed() -> u64 {
    0xE3071_0A5
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// Multiplier on particle speed.
    #[cfg_attr(feature = "serde", serde(default = "default_animation_speed"))]
    pub animation_speed: f64,

    /// Random particle spawning each tick. Turn off for reproducible frames.
    #[cfg_attr(feature = "serde", serde(default = "default_stochastic_particles"))]
    pub stochastic_particles: bool,

    #[cfg_attr(feature = "serde", serde(default = "default_spawn_chance"))]
    pub spawn_chance: f64,

    /// Transitions replayed as particles when new data arrives.
    #[cfg_attr(feature = "serde", serde(default = "default_recent_transition_particles"))]
    pub recent_transition_particles: usize,

    #[cfg_attr(feature = "serde", serde(default = "default_max_particles"))]
    pub max_particles: usize,

    /// Edge count badges are hidden once there are this many edges.
    #[cfg_attr(feature = "serde", serde(default = "default_badge_edge_limit"))]
    pub badge_edge_limit: usize,

    #[cfg_attr(feature = "serde", serde(default = "default_seed"))]
    pub seed: u64,

    /// Offset used for day-part bucketing. `None` uses the host's local zone.
    #[cfg_attr(feature = "serde", serde(default))]
    pub utc_offset_minutes: Option<i32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            animation_speed: default_animation_speed(),
            stochastic_particles: default_stochastic_particles(),
            spawn_chance: default_spawn_chance(),
            recent_transition_particles: default_recent_transition_particles(),
            max_particles: default_max_particles(),
            badge_edge_limit: default_badge_edge_limit(),
            seed: default_seed(),
            utc_offset_minutes: None,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// No random particle spawning.
    pub fn deterministic(mut self) -> Self {
        self.stochastic_particles = false;
        self
    }

    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = Some(minutes);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.animation_speed.is_finite()
            || self.animation_speed <= 0.0
            || self.animation_speed > MAX_ANIMATION_SPEED
        {
            return Err(ConfigError::AnimationSpeed(self.animation_speed));
        }
        if !(0.0..=1.0).contains(&self.spawn_chance) {
            return Err(ConfigError::SpawnChance(self.spawn_chance));
        }
        if self.max_particles == 0 {
            return Err(ConfigError::MaxParticles);
        }
        if let Some(m) = self.utc_offset_minutes {
            if m.abs() > MAX_UTC_OFFSET_MINUTES {
                return Err(ConfigError::UtcOffset(m));
            }
        }
        Ok(())
    }

    #[cfg(feature = "serde")]
    pub fn from_json_str(s: &str) -> Result<Self, crate::error::EngineError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub(crate) fn particle_settings(&self) -> ParticleSettings {
        ParticleSettings {
            animation_speed: self.animation_speed,
            stochastic: self.stochastic_particles,
            spawn_chance: self.spawn_chance,
            max_particles: self.max_particles,
        }
    }

    fn fixed_offset(&self) -> Option<FixedOffset> {
        self.utc_offset_minutes
            .and_then(|m| FixedOffset::east_opt(m * 60))
    }

    /// Day-part buckets in the configured zone.
    pub(crate) fn correlate(&self, events: &[EmotionEvent]) -> EmotionTable<TimeBucket> {
        match self.fixed_offset() {
            Some(tz) => time_of_day::correlate(events, &tz),
            None => time_of_day::correlate(events, &Local),
        }
    }
}
