//! Per-frame scheduling abstraction.
//!
//! A host backs [`FrameScheduler`] with its display-refresh callback (the
//! browser crate uses `requestAnimationFrame`); tests use [`ManualScheduler`]
//! and fire frames by hand.

/// Opaque id of one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

pub trait FrameScheduler {
    /// Ask for one callback on the next frame. `None` if the host refused.
    fn request_frame(&mut self) -> Option<FrameHandle>;

    /// Cancel a previously requested frame. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Deterministic test clock: frames only fire when the caller says so.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Option<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Take the pending request, as the host would right before invoking
    /// the frame callback.
    pub fn fire(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    pub fn requested(&self) -> u64 {
        self.requested
    }

    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        self.next_id += 1;
        let h = FrameHandle(self.next_id);
        self.pending = Some(h);
        self.requested += 1;
        Some(h)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}
