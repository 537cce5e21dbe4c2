//! # emoflow
//!
//! An emotion-transition graph: seven emotion nodes on a ring, curved edges
//! for every observed consecutive pair, particles flowing along them, and a
//! small pattern miner that describes recurring emotional sequences.
//!
//! All state lives in a [`engine::FlowEngine`]; a host feeds it events and
//! frame ticks and hands it a [`surface::DrawSurface`] to paint on.
//!
//! ## Quick Start
//!
//! ```
//! use emoflow::prelude::*;
//! use chrono::{TimeZone, Utc};
//!
//! let events: Vec<EmotionEvent> = ["neutral", "joy", "sadness", "neutral"]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, label)| {
//!         let at = Utc.timestamp_opt(i as i64 * 3600, 0).unwrap();
//!         EmotionEvent::new(Emotion::from_label(label), at)
//!     })
//!     .collect();
//!
//! let engine = FlowEngine::new(EngineConfig::default().deterministic()).unwrap();
//! let mut view = FlowView::new(
//!     engine,
//!     Some(RecordingSurface::new(800.0, 600.0)),
//!     ManualScheduler::new(),
//! )
//! .unwrap();
//! view.on_data_changed(events);
//! view.start();
//!
//! let frame = view.scheduler_mut().fire().unwrap();
//! let stats = view.on_frame(frame).unwrap();
//! assert_eq!(stats.nodes, 7);
//! assert_eq!(view.engine().summary().transitions.total(), 3);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): JSON summary output, config and event loading
//!
//! ## Modules
//!
//! - [`transitions`], [`patterns`], [`time_of_day`]: derived data
//! - [`layout`], [`viewport`], [`hit_test`], [`curve`]: geometry
//! - [`particles`], [`render`], [`surface`]: animation and drawing
//! - [`engine`], [`view`], [`scheduler`]: lifecycle

pub mod config;
pub mod curve;
pub mod emotion;
pub mod engine;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod particles;
pub mod patterns;
pub mod prng;
pub mod render;
pub mod scheduler;
pub mod summary;
pub mod surface;
pub mod time_of_day;
pub mod transitions;
pub mod view;
pub mod viewport;

/// Prelude module for convenient imports.
///
/// ```
/// use emoflow::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::curve::Point;
    pub use crate::emotion::{Emotion, EmotionEvent, EmotionTable};
    pub use crate::engine::FlowEngine;
    pub use crate::error::{ConfigError, EngineError};
    pub use crate::interaction::{Cursor, Interaction};
    pub use crate::patterns::PatternRecord;
    pub use crate::render::FrameStats;
    pub use crate::scheduler::{FrameHandle, FrameScheduler, ManualScheduler};
    pub use crate::summary::DerivedSummary;
    pub use crate::surface::{DrawSurface, Paint, RecordingSurface, Rgba, TextAlign};
    pub use crate::time_of_day::{DayPart, TimeBucket};
    pub use crate::transitions::{EdgeKey, TransitionEdge, TransitionSet};
    pub use crate::view::FlowView;
}
