//! The 2D drawing surface the renderer paints onto.
//!
//! The method set mirrors a canvas 2D context closely enough that the browser
//! host implements it as thin pass-through calls. [`RecordingSurface`]
//! captures the same calls as data for headless runs and tests.

use core::fmt;

use crate::curve::Point;
use crate::emotion::Emotion;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Blend toward white by `amount` in [0, 1].
    pub fn lighten(self, amount: f64) -> Self {
        let k = amount.clamp(0.0, 1.0);
        let mix = |c: u8| (c as f64 + (255.0 - c as f64) * k).round() as u8;
        Self::new(mix(self.r), mix(self.g), mix(self.b), self.a)
    }

    /// Blend toward black by `amount` in [0, 1].
    pub fn darken(self, amount: f64) -> Self {
        let k = 1.0 - amount.clamp(0.0, 1.0);
        let mix = |c: u8| (c as f64 * k).round() as u8;
        Self::new(mix(self.r), mix(self.g), mix(self.b), self.a)
    }

    /// CSS `rgba(...)` string.
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css())
    }
}

impl From<Emotion> for Rgba {
    fn from(e: Emotion) -> Self {
        let (r, g, b) = e.rgb();
        Rgba::new(r, g, b, 1.0)
    }
}

/// Colour stop: offset in [0, 1] and colour.
pub type Stop = (f64, Rgba);

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear {
        from: Point,
        to: Point,
        stops: Vec<Stop>,
    },
    Radial {
        center: Point,
        inner: f64,
        outer: f64,
        stops: Vec<Stop>,
    },
}

impl From<Rgba> for Paint {
    fn from(c: Rgba) -> Self {
        Paint::Solid(c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// A host-owned 2D drawing target.
pub trait DrawSurface {
    /// Current size in device pixels.
    fn size(&self) -> (f64, f64);

    fn save(&mut self);
    fn restore(&mut self);
    /// Replace the transform with uniform `scale` followed by a translation.
    fn set_transform(&mut self, scale: f64, translate_x: f64, translate_y: f64);
    fn reset_transform(&mut self) {
        self.set_transform(1.0, 0.0, 0.0);
    }

    fn clear(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: &Paint);

    fn begin_path(&mut self);
    fn move_to(&mut self, p: Point);
    fn line_to(&mut self, p: Point);
    fn quadratic_curve_to(&mut self, control: Point, end: Point);
    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64);
    fn close_path(&mut self);
    fn fill(&mut self, paint: &Paint);
    fn stroke(&mut self, paint: &Paint, width: f64);

    fn set_shadow(&mut self, blur: f64, color: Rgba);
    fn clear_shadow(&mut self) {
        self.set_shadow(0.0, Rgba::TRANSPARENT);
    }
    fn set_global_alpha(&mut self, alpha: f64);

    fn fill_text(&mut self, text: &str, at: Point, font: &str, color: Rgba, align: TextAlign);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    SetTransform { scale: f64, tx: f64, ty: f64 },
    Clear,
    FillRect { x: f64, y: f64, w: f64, h: f64, paint: Paint },
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    QuadraticCurveTo { control: Point, end: Point },
    Arc { center: Point, radius: f64, start: f64, end: f64 },
    ClosePath,
    Fill(Paint),
    Stroke { paint: Paint, width: f64 },
    Shadow { blur: f64, color: Rgba },
    GlobalAlpha(f64),
    Text { text: String, at: Point, font: String, color: Rgba, align: TextAlign },
}

/// Records every call. Useful headless and in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    /// All text drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn set_transform(&mut self, scale: f64, tx: f64, ty: f64) {
        self.commands.push(DrawCommand::SetTransform { scale, tx, ty });
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: &Paint) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            w,
            h,
            paint: paint.clone(),
        });
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, p: Point) {
        self.commands.push(DrawCommand::MoveTo(p));
    }

    fn line_to(&mut self, p: Point) {
        self.commands.push(DrawCommand::LineTo(p));
    }

    fn quadratic_curve_to(&mut self, control: Point, end: Point) {
        self.commands
            .push(DrawCommand::QuadraticCurveTo { control, end });
    }

    fn arc(&mut self, center: Point, radius: f64, start: f64, end: f64) {
        self.commands.push(DrawCommand::Arc {
            center,
            radius,
            start,
            end,
        });
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn fill(&mut self, paint: &Paint) {
        self.commands.push(DrawCommand::Fill(paint.clone()));
    }

    fn stroke(&mut self, paint: &Paint, width: f64) {
        self.commands.push(DrawCommand::Stroke {
            paint: paint.clone(),
            width,
        });
    }

    fn set_shadow(&mut self, blur: f64, color: Rgba) {
        self.commands.push(DrawCommand::Shadow { blur, color });
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.commands.push(DrawCommand::GlobalAlpha(alpha));
    }

    fn fill_text(&mut self, text: &str, at: Point, font: &str, color: Rgba, align: TextAlign) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            font: font.to_string(),
            color,
            align,
        });
    }
}
