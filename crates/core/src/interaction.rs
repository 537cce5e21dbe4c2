//! Pointer/wheel dispatch: a two-state (Idle / Panning) machine.

use crate::curve::Point;
use crate::emotion::Emotion;
use crate::hit_test::{Hit, HitTester};
use crate::transitions::EdgeKey;
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionState {
    Idle,
    Panning { anchor: Point },
}

/// Cursor affordance the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    /// Over a node or edge.
    Pointer,
    /// Over empty space; dragging pans.
    Grab,
    /// Mid-pan.
    Grabbing,
}

impl Cursor {
    pub fn css(self) -> &'static str {
        match self {
            Cursor::Pointer => "pointer",
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
        }
    }
}

/// What a single input event did. The engine applies focus/highlight
/// effects; viewport changes are already applied by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    NodeClicked(Emotion),
    EdgeClicked(EdgeKey),
    PanStarted,
    Panned,
    PanEnded,
    Zoomed,
    Hover(Cursor),
    Ignored,
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    state: InteractionState,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            state: InteractionState::Idle,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.state, InteractionState::Panning { .. })
    }

    /// Drop any in-progress gesture.
    pub fn reset(&mut self) {
        self.state = InteractionState::Idle;
    }

    pub fn pointer_down(&mut self, at: Point, hits: &HitTester<'_>) -> Interaction {
        if self.is_panning() {
            return Interaction::Ignored;
        }
        match hits.hit(at) {
            Hit::Node(e) => Interaction::NodeClicked(e),
            Hit::Edge(key) => Interaction::EdgeClicked(key),
            Hit::Empty => {
                self.state = InteractionState::Panning { anchor: at };
                Interaction::PanStarted
            }
        }
    }

    /// `buttons_held` is false for plain hover.
    pub fn pointer_move(
        &mut self,
        at: Point,
        buttons_held: bool,
        viewport: &mut Viewport,
        hits: &HitTester<'_>,
    ) -> Interaction {
        match self.state {
            InteractionState::Panning { anchor } if buttons_held => {
                viewport.pan_by(at.x - anchor.x, at.y - anchor.y);
                self.state = InteractionState::Panning { anchor: at };
                Interaction::Panned
            }
            InteractionState::Panning { .. } => Interaction::Hover(Cursor::Grabbing),
            InteractionState::Idle => {
                let cursor = match hits.hit(at) {
                    Hit::Node(_) | Hit::Edge(_) => Cursor::Pointer,
                    Hit::Empty => Cursor::Grab,
                };
                Interaction::Hover(cursor)
            }
        }
    }

    pub fn pointer_up(&mut self) -> Interaction {
        match self.state {
            InteractionState::Panning { .. } => {
                self.state = InteractionState::Idle;
                Interaction::PanEnded
            }
            InteractionState::Idle => Interaction::Ignored,
        }
    }

    /// Zoom around the pointer. Leaves Idle/Panning untouched.
    pub fn wheel(&mut self, at: Point, delta_y: f64, viewport: &mut Viewport) -> Interaction {
        let before = viewport.zoom();
        viewport.wheel(at, delta_y);
        if viewport.zoom() == before {
            Interaction::Ignored
        } else {
            Interaction::Zoomed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;
    use crate::transitions::TransitionSet;

    #[test]
    fn empty_press_pans_until_release() {
        let layout = Layout::compute(600.0, 600.0, None, None);
        let set = TransitionSet::new();
        let mut vp = Viewport::new();
        let mut ic = InteractionController::new();

        let start = Point::new(5.0, 5.0);
        {
            let ht = HitTester::new(&layout, &set, &vp);
            assert_eq!(ic.pointer_down(start, &ht), Interaction::PanStarted);
        }
        assert!(ic.is_panning());

        let snapshot = vp;
        let ht = HitTester::new(&layout, &set, &snapshot);
        assert_eq!(
            ic.pointer_move(Point::new(25.0, 15.0), true, &mut vp, &ht),
            Interaction::Panned
        );
        assert_eq!(vp.pan(), Point::new(20.0, 10.0));
        // Anchor moved with the pointer, so the next delta is incremental.
        ic.pointer_move(Point::new(30.0, 15.0), true, &mut vp, &ht);
        assert_eq!(vp.pan(), Point::new(25.0, 10.0));

        assert_eq!(ic.pointer_up(), Interaction::PanEnded);
        assert_eq!(ic.state(), InteractionState::Idle);
        assert_eq!(ic.pointer_up(), Interaction::Ignored);
    }

    #[test]
    fn node_press_stays_idle() {
        let layout = Layout::compute(600.0, 600.0, None, None);
        let set = TransitionSet::new();
        let vp = Viewport::new();
        let mut ic = InteractionController::new();
        let ht = HitTester::new(&layout, &set, &vp);
        let at = layout.node(Emotion::Love).center();
        assert_eq!(ic.pointer_down(at, &ht), Interaction::NodeClicked(Emotion::Love));
        assert_eq!(ic.state(), InteractionState::Idle);
    }

    #[test]
    fn hover_only_changes_cursor() {
        let layout = Layout::compute(600.0, 600.0, None, None);
        let set = TransitionSet::new();
        let mut vp = Viewport::new();
        let snapshot = vp;
        let ht = HitTester::new(&layout, &set, &snapshot);
        let mut ic = InteractionController::new();
        let over_node = layout.node(Emotion::Joy).center();
        assert_eq!(
            ic.pointer_move(over_node, false, &mut vp, &ht),
            Interaction::Hover(Cursor::Pointer)
        );
        assert_eq!(
            ic.pointer_move(Point::new(1.0, 1.0), false, &mut vp, &ht),
            Interaction::Hover(Cursor::Grab)
        );
        assert_eq!(vp, snapshot);
        assert_eq!(ic.state(), InteractionState::Idle);
    }

    #[test]
    fn wheel_zooms_in_any_state() {
        let layout = Layout::compute(600.0, 600.0, None, None);
        let set = TransitionSet::new();
        let mut vp = Viewport::new();
        let mut ic = InteractionController::new();
        {
            let ht = HitTester::new(&layout, &set, &vp);
            ic.pointer_down(Point::new(1.0, 1.0), &ht);
        }
        assert_eq!(ic.wheel(Point::new(1.0, 1.0), -1.0, &mut vp), Interaction::Zoomed);
        assert!(ic.is_panning());
        assert!((vp.zoom() - 1.1).abs() < 1e-9);
    }
}
