//! Binds a [`FlowEngine`] to a drawing surface and a frame scheduler.
//!
//! Exactly one frame is in flight while the view runs: each completed frame
//! requests the next. `stop()` cancels the pending request and detaches
//! input; dropping the view stops it.

use tracing::{info, warn};

use crate::curve::Point;
use crate::emotion::{Emotion, EmotionEvent};
use crate::engine::FlowEngine;
use crate::error::EngineError;
use crate::interaction::Interaction;
use crate::render::FrameStats;
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::surface::DrawSurface;

pub struct FlowView<S: DrawSurface, F: FrameScheduler> {
    engine: FlowEngine,
    surface: S,
    scheduler: F,
    pending: Option<FrameHandle>,
    running: bool,
    frames: u64,
}

impl<S: DrawSurface, F: FrameScheduler> FlowView<S, F> {
    /// `surface` is `None` when the host could not obtain a drawing context.
    /// Setup is aborted and nothing renders; the host keeps running.
    pub fn new(mut engine: FlowEngine, surface: Option<S>, scheduler: F) -> Result<Self, EngineError> {
        let Some(surface) = surface else {
            warn!("no drawing surface; emotion flow view not started");
            return Err(EngineError::SurfaceUnavailable(
                "host returned no 2d context".to_string(),
            ));
        };
        let (w, h) = surface.size();
        engine.resize(w, h);
        Ok(Self {
            engine,
            surface,
            scheduler,
            pending: None,
            running: false,
            frames: 0,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.pending = self.scheduler.request_frame();
        if self.pending.is_none() {
            warn!("frame scheduler refused the first frame");
        }
        info!("emotion flow view started");
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        if let Some(h) = self.pending.take() {
            self.scheduler.cancel_frame(h);
        }
        self.engine.cancel_interaction();
        info!(frames = self.frames, "emotion flow view stopped");
    }

    /// Frame callback. Stale or post-stop handles are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle) -> Option<FrameStats> {
        if !self.running || self.pending != Some(handle) {
            return None;
        }
        self.pending = None;

        let (w, h) = self.surface.size();
        self.engine.resize(w, h);
        self.engine.on_frame_tick();
        let stats = self.engine.render(&mut self.surface);
        self.frames += 1;

        self.pending = self.scheduler.request_frame();
        Some(stats)
    }

    /// Data updates are accepted whether or not the view is running.
    /// The layout is synced to the surface first so new particles start on
    /// the nodes the next frame will draw.
    pub fn on_data_changed(&mut self, events: Vec<EmotionEvent>) {
        let (w, h) = self.surface.size();
        self.engine.resize(w, h);
        self.engine.on_data_changed(events);
    }

    pub fn set_current_emotion(&mut self, current: Option<Emotion>) {
        self.engine.set_current_emotion(current);
    }

    pub fn pointer_down(&mut self, at: Point) -> Interaction {
        if !self.running {
            return Interaction::Ignored;
        }
        self.engine.pointer_down(at)
    }

    pub fn pointer_move(&mut self, at: Point, buttons_held: bool) -> Interaction {
        if !self.running {
            return Interaction::Ignored;
        }
        self.engine.pointer_move(at, buttons_held)
    }

    pub fn pointer_up(&mut self) -> Interaction {
        if !self.running {
            return Interaction::Ignored;
        }
        self.engine.pointer_up()
    }

    pub fn wheel(&mut self, at: Point, delta_y: f64) -> Interaction {
        if !self.running {
            return Interaction::Ignored;
        }
        self.engine.wheel(at, delta_y)
    }

    pub fn engine(&self) -> &FlowEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut FlowEngine {
        &mut self.engine
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }
}

impl<S: DrawSurface, F: FrameScheduler> Drop for FlowView<S, F> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::scheduler::ManualScheduler;
    use crate::surface::RecordingSurface;

    fn view() -> FlowView<RecordingSurface, ManualScheduler> {
        let engine = FlowEngine::new(EngineConfig::default().deterministic()).unwrap();
        FlowView::new(engine, Some(RecordingSurface::new(640.0, 480.0)), ManualScheduler::new())
            .unwrap()
    }

    #[test]
    fn missing_surface_aborts_setup() {
        let r = FlowView::<RecordingSurface, _>::new(FlowEngine::default(), None, ManualScheduler::new());
        assert!(matches!(r, Err(EngineError::SurfaceUnavailable(_))));
    }

    #[test]
    fn each_frame_requests_the_next() {
        let mut v = view();
        v.start();
        for _ in 0..3 {
            let h = v.scheduler_mut().fire().unwrap();
            assert!(v.on_frame(h).is_some());
        }
        assert_eq!(v.frames_rendered(), 3);
        assert_eq!(v.scheduler().requested(), 4);
        assert_eq!(v.engine().layout().center(), Point::new(320.0, 240.0));
    }

    #[test]
    fn stop_cancels_pending_and_detaches_input() {
        let mut v = view();
        v.start();
        let h = v.pending_frame().unwrap();
        v.stop();
        assert_eq!(v.scheduler().pending(), None);
        assert_eq!(v.scheduler().cancelled(), 1);
        assert!(v.on_frame(h).is_none());
        assert_eq!(v.pointer_down(Point::new(1.0, 1.0)), Interaction::Ignored);
        assert_eq!(v.wheel(Point::new(1.0, 1.0), -1.0), Interaction::Ignored);
        assert_eq!(v.engine().viewport().zoom(), 1.0);
    }

    #[test]
    fn stale_handle_is_ignored() {
        let mut v = view();
        v.start();
        let first = v.scheduler_mut().fire().unwrap();
        v.on_frame(first);
        assert!(v.on_frame(first).is_none());
        assert_eq!(v.frames_rendered(), 1);
    }

    #[test]
    fn layout_matches_surface_before_first_frame() {
        let v = view();
        assert_eq!(v.engine().layout().center(), Point::new(320.0, 240.0));
    }

    #[test]
    fn start_twice_keeps_one_frame_in_flight() {
        let mut v = view();
        v.start();
        v.start();
        assert_eq!(v.scheduler().requested(), 1);
    }
}
