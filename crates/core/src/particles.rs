//! Animated markers that travel edge curves to show flow direction and volume.
//!
//! Particles are ephemeral: each one advances by its own `speed` every tick
//! and is dropped on the tick its progress reaches 1, so no caller ever
//! observes a finished particle. New particles come from three places:
//! - a data change (the most recent few transitions are replayed),
//! - a node click (a short radial ripple),
//! - random embellishment each tick, which can be switched off.

use crate::curve::{Point, QuadCurve};
use crate::emotion::{Emotion, EmotionEvent};
use crate::layout::{Layout, Node};
use crate::prng::Prng;
use crate::transitions::TransitionSet;

pub const MIN_PARTICLE_SPEED: f64 = 0.005;
pub const MAX_PARTICLE_SPEED: f64 = 0.02;
/// Most particles a single random spawn event adds.
pub const MAX_RANDOM_BURST: usize = 3;

pub const RIPPLE_PARTICLES: usize = 8;
/// How far ripple particles travel beyond the node rim.
pub const RIPPLE_REACH: f64 = 60.0;
pub const RIPPLE_SPEED: f64 = 0.05;

/// Trail points drawn behind each particle.
pub const TRAIL_LENGTH: usize = 5;
/// Progress gap between successive trail points.
pub const TRAIL_SPACING: f64 = 0.015;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Travels an edge from source to target.
    Flow,
    /// Radiates out of a clicked node.
    Ripple,
}

/// What a particle's curve hangs off, so it can follow the nodes when the
/// layout changes under it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleAnchor {
    Edge { source: Emotion, target: Emotion },
    /// `angle` is the outward direction in radians.
    Ripple { node: Emotion, angle: f64 },
}

impl ParticleAnchor {
    /// Curve for this anchor in `layout`; `None` if a node has no position.
    pub fn curve(&self, layout: &Layout) -> Option<QuadCurve> {
        match *self {
            ParticleAnchor::Edge { source, target } => {
                let src = layout.try_node(source)?;
                let dst = layout.try_node(target)?;
                Some(QuadCurve::for_edge(src.center(), dst.center()))
            }
            ParticleAnchor::Ripple { node, angle } => Some(ripple_curve(layout.try_node(node)?, angle)),
        }
    }
}

fn ripple_curve(node: &Node, angle: f64) -> QuadCurve {
    let c = node.center();
    let dir = Point::new(angle.cos(), angle.sin());
    let start = c + dir * node.radius;
    let end = c + dir * (node.radius + RIPPLE_REACH);
    QuadCurve::new(start, start.midpoint(end), end)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub emotion: Emotion,
    pub kind: ParticleKind,
    pub anchor: ParticleAnchor,
    pub curve: QuadCurve,
    pub position: Point,
    pub last_position: Point,
    pub progress: f64,
    pub speed: f64,
}

impl Particle {
    fn new(emotion: Emotion, kind: ParticleKind, anchor: ParticleAnchor, curve: QuadCurve, speed: f64) -> Self {
        Self {
            emotion,
            kind,
            anchor,
            curve,
            position: curve.start,
            last_position: curve.start,
            progress: 0.0,
            speed,
        }
    }

    pub fn target(&self) -> Point {
        self.curve.end
    }

    pub fn control(&self) -> Point {
        self.curve.control
    }

    /// Trail points behind the particle, nearest first, with a fading weight
    /// in (0, 1).
    pub fn trail(&self) -> impl Iterator<Item = (Point, f64)> + '_ {
        (1..=TRAIL_LENGTH).map(move |k| {
            let t = (self.progress - k as f64 * TRAIL_SPACING).max(0.0);
            let fade = 1.0 - k as f64 / (TRAIL_LENGTH as f64 + 1.0);
            (self.curve.at(t), fade)
        })
    }

    /// Advance one tick. Returns `false` once the particle has arrived.
    fn advance(&mut self) -> bool {
        self.last_position = self.position;
        self.progress += self.speed;
        if self.progress >= 1.0 {
            return false;
        }
        self.position = self.curve.at(self.progress);
        true
    }

    /// Move onto `curve` at the same progress.
    fn rebase(&mut self, curve: QuadCurve) {
        self.curve = curve;
        self.last_position = curve.at((self.progress - self.speed).max(0.0));
        self.position = curve.at(self.progress);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSettings {
    /// Multiplier applied to every particle speed. Must be > 0.
    pub animation_speed: f64,
    /// Random per-tick spawning on existing edges.
    pub stochastic: bool,
    /// Per-tick probability of a random spawn event.
    pub spawn_chance: f64,
    /// Live particle cap; the oldest are evicted first.
    pub max_particles: usize,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            animation_speed: 1.0,
            stochastic: true,
            spawn_chance: 0.05,
            max_particles: 256,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    settings: ParticleSettings,
    rng: Prng,
}

impl ParticleSystem {
    pub fn new(settings: ParticleSettings, seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            settings,
            rng: Prng::new(seed),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn settings(&self) -> &ParticleSettings {
        &self.settings
    }

    pub fn set_animation_speed(&mut self, speed: f64) {
        if speed.is_finite() && speed > 0.0 {
            self.settings.animation_speed = speed;
        }
    }

    pub fn set_stochastic(&mut self, enabled: bool) {
        self.settings.stochastic = enabled;
    }

    fn push(&mut self, p: Particle) {
        if self.settings.max_particles == 0 {
            return;
        }
        while self.particles.len() >= self.settings.max_particles {
            self.particles.remove(0);
        }
        self.particles.push(p);
    }

    fn flow_speed(&mut self) -> f64 {
        self.rng.gen_range_f64(MIN_PARTICLE_SPEED, MAX_PARTICLE_SPEED) * self.settings.animation_speed
    }

    /// Launch one particle along the edge between two positioned nodes.
    pub fn spawn_on_edge(&mut self, source: &Node, target: &Node) {
        let speed = self.flow_speed();
        let curve = QuadCurve::for_edge(source.center(), target.center());
        let anchor = ParticleAnchor::Edge {
            source: source.emotion,
            target: target.emotion,
        };
        self.push(Particle::new(source.emotion, ParticleKind::Flow, anchor, curve, speed));
    }

    /// Replay the last `n` transitions of `events`, oldest first.
    ///
    /// Returns the number of particles launched.
    pub fn spawn_recent(&mut self, events: &[EmotionEvent], layout: &Layout, n: usize) -> usize {
        if events.len() < 2 || n == 0 {
            return 0;
        }
        let pairs = events.len() - 1;
        let skip = pairs.saturating_sub(n);
        let mut launched = 0;
        for pair in events.windows(2).skip(skip) {
            let (Some(src), Some(dst)) = (
                layout.try_node(pair[0].emotion),
                layout.try_node(pair[1].emotion),
            ) else {
                continue;
            };
            let (src, dst) = (*src, *dst);
            self.spawn_on_edge(&src, &dst);
            launched += 1;
        }
        launched
    }

    /// Radial burst out of `node`, used as click feedback.
    pub fn spawn_ripple(&mut self, node: &Node) {
        for i in 0..RIPPLE_PARTICLES {
            let angle = (i as f64 / RIPPLE_PARTICLES as f64) * std::f64::consts::TAU;
            let anchor = ParticleAnchor::Ripple {
                node: node.emotion,
                angle,
            };
            let curve = ripple_curve(node, angle);
            let speed = RIPPLE_SPEED * self.settings.animation_speed;
            self.push(Particle::new(node.emotion, ParticleKind::Ripple, anchor, curve, speed));
        }
    }

    /// Re-seat every live particle on its anchor's curve in `layout`,
    /// keeping its progress. Particles whose nodes have no position stay put.
    pub fn rebase(&mut self, layout: &Layout) {
        for p in &mut self.particles {
            if let Some(curve) = p.anchor.curve(layout) {
                p.rebase(curve);
            }
        }
    }

    /// Advance every particle one step, retire arrivals, then maybe spawn
    /// random flow on existing edges.
    pub fn tick(&mut self, layout: &Layout, transitions: &TransitionSet) {
        self.particles.retain_mut(Particle::advance);

        if !self.settings.stochastic || transitions.is_empty() {
            return;
        }
        if !self.rng.chance(self.settings.spawn_chance) {
            return;
        }
        let burst = self.rng.gen_range_usize(1, MAX_RANDOM_BURST + 1);
        for _ in 0..burst {
            let i = self.rng.gen_range_usize(0, transitions.len());
            let edge = transitions.edges()[i];
            let (Some(src), Some(dst)) = (layout.try_node(edge.source), layout.try_node(edge.target))
            else {
                continue;
            };
            let (src, dst) = (*src, *dst);
            self.spawn_on_edge(&src, &dst);
        }
    }
}
