use thiserror::Error;

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("animation_speed must be finite and in (0, 5], got {0}")]
    AnimationSpeed(f64),
    #[error("spawn_chance must be in [0, 1], got {0}")]
    SpawnChance(f64),
    #[error("max_particles must be >= 1")]
    MaxParticles,
    #[error("utc_offset_minutes must be within +/-1440, got {0}")]
    UtcOffset(i32),
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// The host could not hand over a drawing surface; nothing will render.
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[cfg(feature = "serde")]
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
