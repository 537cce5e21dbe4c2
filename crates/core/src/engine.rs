//! The engine owns every piece of mutable visualization state.
//!
//! Hosts drive it through two explicit entry points: [`FlowEngine::on_data_changed`]
//! whenever the event list changes, and [`FlowEngine::on_frame_tick`] once per
//! displayed frame. Input handlers call the pointer/wheel methods in between.

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::curve::Point;
use crate::emotion::{self, Emotion, EmotionEvent, EmotionTable};
use crate::error::EngineError;
use crate::hit_test::HitTester;
use crate::interaction::{Cursor, Interaction, InteractionController};
use crate::layout::Layout;
use crate::particles::ParticleSystem;
use crate::render::{FrameScene, FrameStats, Renderer};
use crate::summary::DerivedSummary;
use crate::surface::DrawSurface;
use crate::transitions::{EdgeKey, TransitionSet};
use crate::viewport::Viewport;

pub struct FlowEngine {
    config: EngineConfig,
    events: Vec<EmotionEvent>,
    counts: EmotionTable<u32>,
    summary: DerivedSummary,

    width: f64,
    height: f64,
    layout: Layout,
    viewport: Viewport,

    particles: ParticleSystem,
    interaction: InteractionController,
    renderer: Renderer,

    current: Option<Emotion>,
    focus: Option<Emotion>,
    highlighted: Option<EdgeKey>,
    cursor: Cursor,
}

impl FlowEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        if let Err(e) = config.validate() {
            warn!(error = %e, "rejecting engine config");
            return Err(e.into());
        }
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let particles = ParticleSystem::new(config.particle_settings(), config.seed);
        let renderer = Renderer::new(config.badge_edge_limit);
        Self {
            config,
            events: Vec::new(),
            counts: EmotionTable::default(),
            summary: DerivedSummary::default(),
            width: 0.0,
            height: 0.0,
            layout: Layout::compute(0.0, 0.0, None, None),
            viewport: Viewport::new(),
            particles,
            interaction: InteractionController::new(),
            renderer,
            current: None,
            focus: None,
            highlighted: None,
            cursor: Cursor::Grab,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the event list and recompute every derived structure.
    ///
    /// Events are sorted by timestamp; ties keep the given order.
    pub fn on_data_changed(&mut self, mut events: Vec<EmotionEvent>) {
        emotion::sort_chronologically(&mut events);
        self.events = events;
        self.counts = emotion::emotion_counts(&self.events);
        let config = &self.config;
        self.summary = DerivedSummary::compute(&self.events, |ev| config.correlate(ev));

        if let Some((src, dst)) = self.highlighted {
            if self.summary.transitions.get(src, dst).is_none() {
                self.highlighted = None;
            }
        }

        let launched = if self.summary.is_empty() {
            0
        } else {
            self.particles.spawn_recent(
                &self.events,
                &self.layout,
                self.config.recent_transition_particles,
            )
        };

        debug!(
            events = self.events.len(),
            edges = self.summary.transitions.len(),
            patterns = self.summary.patterns.len(),
            launched,
            "recomputed emotion flow"
        );
    }

    /// Advance the animation by one frame.
    pub fn on_frame_tick(&mut self) {
        self.particles
            .tick(&self.layout, &self.summary.transitions);
    }

    pub fn set_current_emotion(&mut self, current: Option<Emotion>) {
        if self.current != current {
            self.current = current;
            self.relayout();
        }
    }

    /// Track the drawing surface size. Non-positive or non-finite sizes are
    /// ignored.
    pub fn resize(&mut self, width: f64, height: f64) {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return;
        }
        if (self.width, self.height) != (width, height) {
            self.width = width;
            self.height = height;
            self.relayout();
        }
    }

    fn relayout(&mut self) {
        self.layout = Layout::compute(self.width, self.height, self.current, self.focus);
        self.particles.rebase(&self.layout);
        debug!(
            width = self.width,
            height = self.height,
            current = ?self.current,
            focus = ?self.focus,
            "layout recomputed"
        );
    }

    /// Set or clear the focused emotion directly (clicks toggle it).
    pub fn set_focus(&mut self, focus: Option<Emotion>) {
        if self.focus != focus {
            self.focus = focus;
            self.relayout();
        }
    }

    pub fn set_highlighted(&mut self, edge: Option<EdgeKey>) {
        self.highlighted = edge.filter(|&(s, t)| self.summary.transitions.get(s, t).is_some());
    }

    pub fn pointer_down(&mut self, at: Point) -> Interaction {
        let viewport = self.viewport;
        let hits = HitTester::new(&self.layout, &self.summary.transitions, &viewport);
        let outcome = self.interaction.pointer_down(at, &hits);
        match outcome {
            Interaction::NodeClicked(e) => {
                let next = if self.focus == Some(e) { None } else { Some(e) };
                self.set_focus(next);
                if let Some(node) = self.layout.try_node(e).copied() {
                    self.particles.spawn_ripple(&node);
                }
            }
            Interaction::EdgeClicked(key) => {
                self.highlighted = if self.highlighted == Some(key) {
                    None
                } else {
                    Some(key)
                };
            }
            Interaction::PanStarted => self.cursor = Cursor::Grabbing,
            _ => {}
        }
        outcome
    }

    pub fn pointer_move(&mut self, at: Point, buttons_held: bool) -> Interaction {
        let snapshot = self.viewport;
        let hits = HitTester::new(&self.layout, &self.summary.transitions, &snapshot);
        let outcome = self
            .interaction
            .pointer_move(at, buttons_held, &mut self.viewport, &hits);
        match outcome {
            Interaction::Hover(c) => self.cursor = c,
            Interaction::Panned => self.cursor = Cursor::Grabbing,
            _ => {}
        }
        outcome
    }

    pub fn pointer_up(&mut self) -> Interaction {
        let outcome = self.interaction.pointer_up();
        if outcome == Interaction::PanEnded {
            self.cursor = Cursor::Grab;
        }
        outcome
    }

    pub fn wheel(&mut self, at: Point, delta_y: f64) -> Interaction {
        self.interaction.wheel(at, delta_y, &mut self.viewport)
    }

    /// Drop any gesture in progress, e.g. when the host detaches input.
    pub fn cancel_interaction(&mut self) {
        self.interaction.reset();
        self.cursor = Cursor::Grab;
    }

    pub fn render<S: DrawSurface + ?Sized>(&self, surface: &mut S) -> FrameStats {
        self.renderer.draw_frame(surface, &self.scene())
    }

    pub fn scene(&self) -> FrameScene<'_> {
        FrameScene {
            layout: &self.layout,
            transitions: &self.summary.transitions,
            particles: self.particles.particles(),
            viewport: &self.viewport,
            event_counts: &self.counts,
            time_of_day: &self.summary.time_of_day_correlations,
            current: self.current,
            focus: self.focus,
            highlighted: self.highlighted,
        }
    }

    pub fn summary(&self) -> &DerivedSummary {
        &self.summary
    }

    pub fn transitions(&self) -> &TransitionSet {
        &self.summary.transitions
    }

    pub fn events(&self) -> &[EmotionEvent] {
        &self.events
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn current(&self) -> Option<Emotion> {
        self.current
    }

    pub fn focus(&self) -> Option<Emotion> {
        self.focus
    }

    pub fn highlighted(&self) -> Option<EdgeKey> {
        self.highlighted
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn is_panning(&self) -> bool {
        self.interaction.is_panning()
    }

    pub fn set_animation_speed(&mut self, speed: f64) {
        self.particles.set_animation_speed(speed);
    }

    pub fn set_stochastic_particles(&mut self, enabled: bool) {
        self.particles.set_stochastic(enabled);
    }
}

impl Default for FlowEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::ParticleKind;
    use chrono::{TimeZone, Utc};
    use Emotion::*;

    fn events(seq: &[Emotion]) -> Vec<EmotionEvent> {
        seq.iter()
            .enumerate()
            .map(|(i, &e)| EmotionEvent::new(e, Utc.timestamp_opt(i as i64 * 3600, 0).unwrap()))
            .collect()
    }

    fn engine() -> FlowEngine {
        let cfg = EngineConfig::default().deterministic().with_utc_offset_minutes(0);
        let mut e = FlowEngine::new(cfg).unwrap();
        e.resize(800.0, 600.0);
        e
    }

    #[test]
    fn rejects_invalid_config() {
        let cfg = EngineConfig {
            spawn_chance: -1.0,
            ..EngineConfig::default()
        };
        assert!(matches!(FlowEngine::new(cfg), Err(EngineError::Config(_))));
    }

    #[test]
    fn data_change_recomputes_and_launches_recent() {
        let mut e = engine();
        e.on_data_changed(events(&[Neutral, Joy, Sadness, Neutral, Anger, Fear, Neutral]));
        assert_eq!(e.transitions().total(), 6);
        assert_eq!(e.summary().time_of_day_correlations[Neutral].total(), 3);
        assert_eq!(e.particles().len(), 5);

        e.on_data_changed(events(&[Joy]));
        assert!(e.summary().is_empty());
    }

    #[test]
    fn unsorted_input_is_ordered_by_time() {
        let mut ev = events(&[Joy, Sadness, Anger]);
        ev.reverse();
        let mut e = engine();
        e.on_data_changed(ev);
        assert_eq!(e.transitions().count(Joy, Sadness), 1);
        assert_eq!(e.transitions().count(Anger, Sadness), 0);
    }

    #[test]
    fn node_click_toggles_focus_and_ripples() {
        let mut e = engine();
        e.on_data_changed(events(&[Joy, Sadness]));
        let before = e.particles().len();
        let at = e.layout().node(Fear).center();

        assert_eq!(e.pointer_down(at), Interaction::NodeClicked(Fear));
        assert_eq!(e.focus(), Some(Fear));
        assert!(e.layout().node(Fear).radius > e.layout().node(Joy).radius);
        let ripples = e
            .particles()
            .particles()
            .iter()
            .filter(|p| p.kind == ParticleKind::Ripple)
            .count();
        assert_eq!(ripples, crate::particles::RIPPLE_PARTICLES);
        assert!(e.particles().len() > before);

        e.pointer_down(e.layout().node(Fear).center());
        assert_eq!(e.focus(), None);
        assert!(!e.is_panning());
    }

    #[test]
    fn empty_press_pans_and_moves_viewport() {
        let mut e = engine();
        assert_eq!(e.pointer_down(Point::new(2.0, 2.0)), Interaction::PanStarted);
        assert_eq!(e.cursor(), Cursor::Grabbing);
        e.pointer_move(Point::new(12.0, 7.0), true);
        assert_eq!(e.viewport().pan(), Point::new(10.0, 5.0));
        assert_eq!(e.pointer_up(), Interaction::PanEnded);
        assert_eq!(e.cursor(), Cursor::Grab);
    }

    #[test]
    fn highlight_dropped_when_edge_disappears() {
        let mut e = engine();
        e.on_data_changed(events(&[Joy, Sadness]));
        e.set_highlighted(Some((Joy, Sadness)));
        assert_eq!(e.highlighted(), Some((Joy, Sadness)));
        e.set_highlighted(Some((Love, Fear)));
        assert_eq!(e.highlighted(), None);

        e.set_highlighted(Some((Joy, Sadness)));
        e.on_data_changed(events(&[Anger, Fear]));
        assert_eq!(e.highlighted(), None);
    }

    #[test]
    fn resize_ignores_degenerate_sizes() {
        let mut e = engine();
        let before = e.layout().center();
        e.resize(0.0, 100.0);
        e.resize(f64::NAN, 100.0);
        assert_eq!(e.layout().center(), before);
        e.resize(400.0, 400.0);
        assert_eq!(e.layout().center(), Point::new(200.0, 200.0));
    }

    #[test]
    fn resize_carries_particles_in_flight() {
        let mut e = engine();
        e.on_data_changed(events(&[Joy, Sadness]));
        e.on_frame_tick();
        let progress = e.particles().particles()[0].progress;

        e.resize(1200.0, 900.0);
        let p = &e.particles().particles()[0];
        assert_eq!(p.curve.start, e.layout().node(Joy).center());
        assert_eq!(p.target(), e.layout().node(Sadness).center());
        assert_eq!(p.progress, progress);

        e.set_focus(Some(Sadness));
        let p = &e.particles().particles()[0];
        assert_eq!(p.target(), e.layout().node(Sadness).center());
    }

    #[test]
    fn ticks_retire_particles() {
        let mut e = engine();
        e.on_data_changed(events(&[Joy, Sadness, Anger]));
        assert!(!e.particles().is_empty());
        // Slowest speed is 0.005, so 201 ticks retire everything.
        for _ in 0..201 {
            e.on_frame_tick();
        }
        assert!(e.particles().is_empty());
    }
}
