//! Frame renderer for the emotion-flow diagram.
//!
//! Layers, back to front:
//! 1. background (base fill, centre glow, faint grid) in screen space
//! 2. guide ring, edges, particles, nodes under the zoom/pan transform
//! 3. overlays (focus stats, highlighted edge, empty-state hint) in screen space

use std::f64::consts::{PI, TAU};

use crate::curve::{Point, QuadCurve};
use crate::emotion::{Emotion, EmotionTable};
use crate::layout::{Layout, Node, SELF_LOOP_RADIUS};
use crate::particles::{Particle, ParticleKind};
use crate::surface::{DrawSurface, Paint, Rgba, TextAlign};
use crate::time_of_day::TimeBucket;
use crate::transitions::{EdgeKey, TransitionEdge, TransitionSet};
use crate::viewport::Viewport;

const BACKGROUND: Rgba = Rgba::new(10, 15, 26, 1.0);
const ACCENT: Rgba = Rgba::new(122, 162, 255, 1.0);
const TEXT: Rgba = Rgba::new(232, 236, 255, 0.9);
const MUTED_TEXT: Rgba = Rgba::new(170, 180, 230, 0.8);

const GRID_SPACING: f64 = 30.0;

const EDGE_MIN_WIDTH: f64 = 1.5;
const EDGE_EXTRA_WIDTH: f64 = 3.5;
const DIMMED_EDGE_ALPHA: f64 = 0.08;
const ARROW_LENGTH: f64 = 10.0;
const ARROW_HALF_WIDTH: f64 = 5.0;
const BADGE_RADIUS: f64 = 9.0;

const PARTICLE_RADIUS: f64 = 3.5;
const RIPPLE_PARTICLE_RADIUS: f64 = 2.5;

const DIMMED_NODE_ALPHA: f64 = 0.35;

/// Everything one frame needs, borrowed from the engine.
pub struct FrameScene<'a> {
    pub layout: &'a Layout,
    pub transitions: &'a TransitionSet,
    pub particles: &'a [Particle],
    pub viewport: &'a Viewport,
    pub event_counts: &'a EmotionTable<u32>,
    pub time_of_day: &'a EmotionTable<TimeBucket>,
    pub current: Option<Emotion>,
    pub focus: Option<Emotion>,
    pub highlighted: Option<EdgeKey>,
}

/// What the last frame put on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub edges: usize,
    pub badges: usize,
    pub particles: usize,
    pub nodes: usize,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    /// Count badges are drawn only while the edge count is below this.
    badge_edge_limit: usize,
}

impl Renderer {
    pub fn new(badge_edge_limit: usize) -> Self {
        Self { badge_edge_limit }
    }

    pub fn draw_frame<S: DrawSurface + ?Sized>(&self, s: &mut S, scene: &FrameScene<'_>) -> FrameStats {
        let mut stats = FrameStats::default();
        let (w, h) = s.size();

        s.reset_transform();
        s.clear();
        draw_background(s, w, h);

        s.save();
        let pan = scene.viewport.pan();
        s.set_transform(scene.viewport.zoom(), pan.x, pan.y);

        draw_guide_ring(s, scene.layout);

        let max_count = scene.transitions.max_count().max(1);
        let show_badges = scene.transitions.len() < self.badge_edge_limit;
        for edge in scene.transitions.edges() {
            let (Some(src), Some(dst)) = (
                scene.layout.try_node(edge.source),
                scene.layout.try_node(edge.target),
            ) else {
                continue;
            };
            let badge = show_badges && edge.count >= 2;
            draw_edge(s, scene, edge, src, dst, max_count, badge);
            stats.edges += 1;
            if badge {
                stats.badges += 1;
            }
        }

        for p in scene.particles {
            draw_particle(s, p);
            stats.particles += 1;
        }

        for node in scene.layout.nodes() {
            draw_node(s, scene, node);
            stats.nodes += 1;
        }

        s.restore();
        s.reset_transform();
        draw_overlays(s, scene, w, h);

        stats
    }
}

fn draw_background<S: DrawSurface + ?Sized>(s: &mut S, w: f64, h: f64) {
    s.fill_rect(0.0, 0.0, w, h, &Paint::Solid(BACKGROUND));

    s.fill_rect(
        0.0,
        0.0,
        w,
        h,
        &Paint::Radial {
            center: Point::new(w / 2.0, h / 2.0),
            inner: 0.0,
            outer: w.max(h) * 0.6,
            stops: vec![(0.0, ACCENT.with_alpha(0.10)), (1.0, Rgba::TRANSPARENT)],
        },
    );

    // Subtle grid lines for depth
    let grid = Paint::Solid(ACCENT.with_alpha(0.05));
    let mut x = GRID_SPACING;
    while x < w {
        s.begin_path();
        s.move_to(Point::new(x, 0.0));
        s.line_to(Point::new(x, h));
        s.stroke(&grid, 1.0);
        x += GRID_SPACING;
    }
    let mut y = GRID_SPACING;
    while y < h {
        s.begin_path();
        s.move_to(Point::new(0.0, y));
        s.line_to(Point::new(w, y));
        s.stroke(&grid, 1.0);
        y += GRID_SPACING;
    }
}

fn draw_guide_ring<S: DrawSurface + ?Sized>(s: &mut S, layout: &Layout) {
    if layout.ring_radius() <= 0.0 {
        return;
    }
    s.begin_path();
    s.arc(layout.center(), layout.ring_radius(), 0.0, TAU);
    s.stroke(&Paint::Solid(ACCENT.with_alpha(0.08)), 1.0);
}

fn edge_alpha(scene: &FrameScene<'_>, edge: &TransitionEdge, weight: f64) -> f64 {
    match scene.focus {
        Some(f) if !edge.touches(f) => DIMMED_EDGE_ALPHA,
        _ => 0.35 + 0.45 * weight,
    }
}

fn draw_edge<S: DrawSurface + ?Sized>(
    s: &mut S,
    scene: &FrameScene<'_>,
    edge: &TransitionEdge,
    src: &Node,
    dst: &Node,
    max_count: u32,
    badge: bool,
) {
    let weight = edge.count as f64 / max_count as f64;
    let alpha = edge_alpha(scene, edge, weight);
    let highlighted = scene.highlighted == Some(edge.key());
    let mut width = EDGE_MIN_WIDTH + EDGE_EXTRA_WIDTH * weight;
    let src_color = Rgba::from(edge.source);
    let dst_color = Rgba::from(edge.target);

    if highlighted {
        width += 2.0;
        s.set_shadow(12.0, Rgba::WHITE.with_alpha(0.6));
    }

    let badge_at = if edge.is_self_loop() {
        let c = src.self_loop_center();
        s.begin_path();
        s.move_to(Point::new(src.x, src.y - src.radius));
        s.line_to(Point::new(c.x, c.y + SELF_LOOP_RADIUS));
        s.stroke(&Paint::Solid(src_color.with_alpha(alpha)), width);
        s.begin_path();
        s.arc(c, SELF_LOOP_RADIUS, 0.0, TAU);
        s.stroke(&Paint::Solid(src_color.with_alpha(alpha)), width);
        Point::new(c.x, c.y - SELF_LOOP_RADIUS)
    } else {
        let curve = QuadCurve::for_edge(src.center(), dst.center());
        s.begin_path();
        s.move_to(curve.start);
        s.quadratic_curve_to(curve.control, curve.end);
        s.stroke(
            &Paint::Linear {
                from: curve.start,
                to: curve.end,
                stops: vec![
                    (0.0, src_color.with_alpha(alpha)),
                    (1.0, dst_color.with_alpha(alpha)),
                ],
            },
            width,
        );
        draw_arrowhead(s, &curve, dst.radius, dst_color.with_alpha(alpha.max(0.15)));
        curve.at(0.5)
    };

    if highlighted {
        s.clear_shadow();
    }

    if badge {
        s.begin_path();
        s.arc(badge_at, BADGE_RADIUS, 0.0, TAU);
        s.fill(&Paint::Solid(BACKGROUND.with_alpha(0.85)));
        s.stroke(&Paint::Solid(src_color.with_alpha(alpha.max(0.3))), 1.0);
        s.fill_text(
            &edge.count.to_string(),
            Point::new(badge_at.x, badge_at.y + 3.5),
            "bold 10px system-ui, sans-serif",
            TEXT.with_alpha(alpha.max(0.3)),
            TextAlign::Center,
        );
    }
}

fn draw_arrowhead<S: DrawSurface + ?Sized>(s: &mut S, curve: &QuadCurve, target_radius: f64, color: Rgba) {
    let t = curve.exit_param(target_radius + 2.0, 0.01);
    let tip = curve.at(t);
    let tan = curve.tangent(t);
    let len = tan.length();
    if len <= f64::EPSILON {
        return;
    }
    let dir = tan * (1.0 / len);
    let perp = Point::new(-dir.y, dir.x);
    let base = tip - dir * ARROW_LENGTH;

    s.begin_path();
    s.move_to(tip);
    s.line_to(base + perp * ARROW_HALF_WIDTH);
    s.line_to(base - perp * ARROW_HALF_WIDTH);
    s.close_path();
    s.fill(&Paint::Solid(color));
}

fn draw_particle<S: DrawSurface + ?Sized>(s: &mut S, p: &Particle) {
    let color = Rgba::from(p.emotion);
    let (radius, alpha) = match p.kind {
        ParticleKind::Flow => (PARTICLE_RADIUS, 0.9),
        // Ripples fade out as they expand.
        ParticleKind::Ripple => (RIPPLE_PARTICLE_RADIUS, 0.9 * (1.0 - p.progress)),
    };

    for (pt, fade) in p.trail() {
        s.begin_path();
        s.arc(pt, radius * fade, 0.0, TAU);
        s.fill(&Paint::Solid(color.with_alpha(alpha * 0.5 * fade)));
    }

    s.set_shadow(10.0, color.with_alpha(alpha));
    s.begin_path();
    s.arc(p.position, radius, 0.0, TAU);
    s.fill(&Paint::Solid(color.lighten(0.3).with_alpha(alpha)));
    s.clear_shadow();
}

fn node_is_dimmed(scene: &FrameScene<'_>, e: Emotion) -> bool {
    match scene.focus {
        None => false,
        Some(f) if f == e => false,
        Some(f) => scene.transitions.count(f, e) == 0 && scene.transitions.count(e, f) == 0,
    }
}

fn draw_node<S: DrawSurface + ?Sized>(s: &mut S, scene: &FrameScene<'_>, node: &Node) {
    let e = node.emotion;
    let c = node.center();
    let r = node.radius;
    let color = Rgba::from(e);
    let is_current = scene.current == Some(e);
    let is_focused = scene.focus == Some(e);
    let dimmed = node_is_dimmed(scene, e);

    s.set_global_alpha(if dimmed { DIMMED_NODE_ALPHA } else { 1.0 });

    if is_current || is_focused {
        let blur = if is_focused { 35.0 } else { 25.0 };
        s.set_shadow(blur, color.with_alpha(0.8));
    }

    s.begin_path();
    s.arc(c, r, 0.0, TAU);
    s.fill(&Paint::Radial {
        center: Point::new(c.x - r * 0.3, c.y - r * 0.3),
        inner: 0.0,
        outer: r * 1.3,
        stops: vec![
            (0.0, color.lighten(0.45)),
            (0.7, color),
            (1.0, color.darken(0.35)),
        ],
    });
    s.clear_shadow();

    // Rim highlight on the upper-left for depth.
    s.begin_path();
    s.arc(c, (r - 2.0).max(1.0), PI * 1.1, PI * 1.6);
    s.stroke(&Paint::Solid(Rgba::WHITE.with_alpha(0.35)), 2.0);

    if is_focused {
        s.begin_path();
        s.arc(c, r + 4.0, 0.0, TAU);
        s.stroke(&Paint::Solid(Rgba::WHITE.with_alpha(0.8)), 2.0);
    }

    let emoji_px = (r * 0.8).round() as i64;
    s.fill_text(
        e.emoji(),
        Point::new(c.x, c.y + r * 0.3),
        &format!("{emoji_px}px sans-serif"),
        Rgba::WHITE,
        TextAlign::Center,
    );

    let n = scene.event_counts[e];
    let label = if n > 0 {
        format!("{} ({n})", e.label())
    } else {
        e.label().to_string()
    };
    s.fill_text(
        &label,
        Point::new(c.x, c.y + r + 16.0),
        "12px system-ui, sans-serif",
        TEXT,
        TextAlign::Center,
    );

    s.set_global_alpha(1.0);
}

fn draw_overlays<S: DrawSurface + ?Sized>(s: &mut S, scene: &FrameScene<'_>, w: f64, h: f64) {
    if scene.transitions.is_empty() {
        s.fill_text(
            "Log a few more emotions to see how they flow",
            Point::new(w / 2.0, h - 24.0),
            "13px system-ui, sans-serif",
            MUTED_TEXT,
            TextAlign::Center,
        );
    }

    if let Some(f) = scene.focus {
        let bucket = scene.time_of_day[f];
        let lines = [
            format!("{} {}", f.emoji(), f.label()),
            format!(
                "out {}  in {}",
                scene.transitions.outgoing(f),
                scene.transitions.incoming(f)
            ),
            match bucket.dominant() {
                Some(part) => format!("mostly in the {}", part.label()),
                None => "no entries yet".to_string(),
            },
        ];
        s.fill_rect(12.0, 12.0, 200.0, 70.0, &Paint::Solid(Rgba::new(0, 0, 0, 0.55)));
        for (i, line) in lines.iter().enumerate() {
            let (font, color) = if i == 0 {
                ("bold 14px system-ui, sans-serif", TEXT)
            } else {
                ("12px system-ui, sans-serif", MUTED_TEXT)
            };
            s.fill_text(
                line,
                Point::new(22.0, 32.0 + i as f64 * 18.0),
                font,
                color,
                TextAlign::Left,
            );
        }
    }

    if let Some((src, dst)) = scene.highlighted {
        let n = scene.transitions.count(src, dst);
        s.fill_text(
            &format!("{src} → {dst}: {n}×"),
            Point::new(16.0, h - 16.0),
            "bold 13px system-ui, sans-serif",
            TEXT,
            TextAlign::Left,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::{emotion_counts, EmotionEvent};
    use crate::surface::{DrawCommand, RecordingSurface};
    use crate::time_of_day::correlate;
    use crate::transitions::aggregate;
    use chrono::{TimeZone, Utc};
    use Emotion::*;

    struct Fixture {
        layout: Layout,
        transitions: TransitionSet,
        counts: EmotionTable<u32>,
        buckets: EmotionTable<TimeBucket>,
        viewport: Viewport,
    }

    fn fixture(seq: &[Emotion]) -> Fixture {
        let ev: Vec<EmotionEvent> = seq
            .iter()
            .enumerate()
            .map(|(i, &e)| EmotionEvent::new(e, Utc.timestamp_opt(i as i64 * 7200, 0).unwrap()))
            .collect();
        Fixture {
            layout: Layout::compute(640.0, 480.0, Some(Joy), None),
            transitions: aggregate(&ev),
            counts: emotion_counts(&ev),
            buckets: correlate(&ev, &Utc),
            viewport: Viewport::new(),
        }
    }

    fn scene<'a>(f: &'a Fixture, focus: Option<Emotion>, hl: Option<EdgeKey>) -> FrameScene<'a> {
        FrameScene {
            layout: &f.layout,
            transitions: &f.transitions,
            particles: &[],
            viewport: &f.viewport,
            event_counts: &f.counts,
            time_of_day: &f.buckets,
            current: Some(Joy),
            focus,
            highlighted: hl,
        }
    }

    #[test]
    fn draws_every_node_and_edge() {
        let f = fixture(&[Joy, Sadness, Joy, Sadness, Anger]);
        let mut s = RecordingSurface::new(640.0, 480.0);
        let stats = Renderer::new(20).draw_frame(&mut s, &scene(&f, None, None));
        assert_eq!(stats.nodes, 7);
        assert_eq!(stats.edges, 3);
        // Only Joy->Sadness has count >= 2.
        assert_eq!(stats.badges, 1);
        assert!(s.texts().contains(&"2"));
        assert!(s.texts().contains(&"joy (2)"));
        assert!(s.texts().contains(&"love"));
        assert_eq!(s.commands()[1], DrawCommand::Clear);
    }

    #[test]
    fn badges_hidden_above_edge_limit() {
        let f = fixture(&[Joy, Sadness, Joy, Sadness, Anger]);
        let mut s = RecordingSurface::new(640.0, 480.0);
        let stats = Renderer::new(3).draw_frame(&mut s, &scene(&f, None, None));
        assert_eq!(stats.badges, 0);
    }

    #[test]
    fn zoom_pan_transform_is_applied() {
        let mut f = fixture(&[Joy, Fear]);
        f.viewport.pan_by(15.0, 25.0);
        f.viewport.zoom_at(Point::ZERO, 2.0);
        let mut s = RecordingSurface::new(640.0, 480.0);
        Renderer::new(20).draw_frame(&mut s, &scene(&f, None, None));
        let pan = f.viewport.pan();
        assert!(s.commands().contains(&DrawCommand::SetTransform {
            scale: 2.0,
            tx: pan.x,
            ty: pan.y
        }));
    }

    #[test]
    fn self_loop_ring_sits_above_its_node() {
        let f = fixture(&[Fear, Fear, Joy]);
        let mut s = RecordingSurface::new(640.0, 480.0);
        Renderer::new(20).draw_frame(&mut s, &scene(&f, None, None));
        let c = f.layout.node(Fear).self_loop_center();
        let rings = s.count(|cmd| {
            matches!(cmd, DrawCommand::Arc { center, radius, .. }
                if *center == c && *radius == SELF_LOOP_RADIUS)
        });
        assert_eq!(rings, 1);
    }

    #[test]
    fn focus_dims_unrelated_edges_without_hiding_them() {
        let f = fixture(&[Joy, Sadness, Anger, Fear]);
        let mut s = RecordingSurface::new(640.0, 480.0);
        let stats = Renderer::new(20).draw_frame(&mut s, &scene(&f, Some(Joy), None));
        assert_eq!(stats.edges, 3);
        let dimmed = s.count(|c| match c {
            DrawCommand::Stroke {
                paint: Paint::Linear { stops, .. },
                ..
            } => stops[0].1.a == DIMMED_EDGE_ALPHA,
            _ => false,
        });
        // Sadness->Anger and Anger->Fear do not touch Joy.
        assert_eq!(dimmed, 2);
        assert!(s.texts().contains(&"out 1  in 0"));
    }

    #[test]
    fn empty_data_shows_hint_and_highlight_shows_count() {
        let f = fixture(&[Joy]);
        let mut s = RecordingSurface::new(640.0, 480.0);
        Renderer::new(20).draw_frame(&mut s, &scene(&f, None, None));
        assert!(s
            .texts()
            .iter()
            .any(|t| t.starts_with("Log a few more emotions")));

        let f = fixture(&[Joy, Fear, Joy, Fear]);
        let mut s = RecordingSurface::new(640.0, 480.0);
        Renderer::new(20).draw_frame(&mut s, &scene(&f, None, Some((Joy, Fear))));
        assert!(s.texts().contains(&"joy → fear: 2×"));
    }
}
