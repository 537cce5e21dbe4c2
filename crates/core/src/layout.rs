//! Fixed circular placement of the seven emotion nodes.

use std::f64::consts::TAU;

use crate::curve::Point;
use crate::emotion::{Emotion, EmotionTable, EMOTION_COUNT};

pub const BASE_NODE_RADIUS: f64 = 30.0;
/// Radius multiplier for the host's current emotion (30 -> 40).
pub const CURRENT_NODE_SCALE: f64 = 40.0 / 30.0;
/// Extra multiplier for the focused emotion; composes with the current scale.
pub const FOCUSED_NODE_SCALE: f64 = 1.2;
/// Ring radius as a fraction of the smaller viewport half-extent.
pub const RING_FRACTION: f64 = 0.65;
/// Radius of the ring drawn for a self-transition.
pub const SELF_LOOP_RADIUS: f64 = 14.0;
/// Self-loop ring centre height above the node, in node radii. At 2 the
/// ring straddles the node's click circle, so its upper arc stays clickable.
pub const SELF_LOOP_LIFT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub emotion: Emotion,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Node {
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn self_loop_center(&self) -> Point {
        Point::new(self.x, self.y - self.radius * SELF_LOOP_LIFT)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    nodes: EmotionTable<Node>,
    center: Point,
    ring_radius: f64,
}

impl Layout {
    /// Place every emotion on the ring. Zero-event emotions still get a node.
    pub fn compute(
        width: f64,
        height: f64,
        current: Option<Emotion>,
        focus: Option<Emotion>,
    ) -> Self {
        let cx = (width / 2.0).max(0.0);
        let cy = (height / 2.0).max(0.0);
        let ring_radius = cx.min(cy) * RING_FRACTION;

        let nodes = EmotionTable::from_fn(|emotion| {
            let angle = (emotion.ordinal() as f64 / EMOTION_COUNT as f64) * TAU;
            let mut radius = BASE_NODE_RADIUS;
            if current == Some(emotion) {
                radius *= CURRENT_NODE_SCALE;
            }
            if focus == Some(emotion) {
                radius *= FOCUSED_NODE_SCALE;
            }
            Node {
                emotion,
                x: cx + ring_radius * angle.cos(),
                y: cy + ring_radius * angle.sin(),
                radius,
            }
        });

        Self {
            nodes,
            center: Point::new(cx, cy),
            ring_radius,
        }
    }

    pub fn node(&self, e: Emotion) -> &Node {
        &self.nodes[e]
    }

    /// Node lookup that tolerates a missing position.
    ///
    /// All seven slots are always filled today; callers still go through
    /// this so an unpositioned emotion is skipped rather than drawn at 0,0.
    pub fn try_node(&self, e: Emotion) -> Option<&Node> {
        let n = &self.nodes[e];
        (n.x.is_finite() && n.y.is_finite()).then_some(n)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().iter()
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn ring_radius(&self) -> f64 {
        self.ring_radius
    }
}
