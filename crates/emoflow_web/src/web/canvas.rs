use emoflow::curve::Point;
use emoflow::surface::{DrawSurface, Paint, Rgba, Stop, TextAlign};
use wasm_bindgen::JsCast;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

/// [`DrawSurface`] over a 2D canvas context.
///
/// Canvas calls that can throw (arc, transforms, text) are best-effort: a
/// failed primitive skips that primitive, not the frame.
pub(super) struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// `None` when the canvas has no usable 2d context.
    pub(super) fn from_canvas(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            canvas: canvas.clone(),
            ctx,
        })
    }

    /// Match the backing store to the element's CSS size.
    pub(super) fn sync_size(&self) {
        let w = self.canvas.client_width();
        let h = self.canvas.client_height();
        if w > 0 && h > 0 && (w as u32 != self.canvas.width() || h as u32 != self.canvas.height()) {
            self.canvas.set_width(w as u32);
            self.canvas.set_height(h as u32);
        }
    }

    fn gradient(&self, paint: &Paint) -> Option<CanvasGradient> {
        let (g, stops): (CanvasGradient, &[Stop]) = match paint {
            Paint::Solid(_) => return None,
            Paint::Linear { from, to, stops } => (
                self.ctx.create_linear_gradient(from.x, from.y, to.x, to.y),
                stops,
            ),
            Paint::Radial {
                center,
                inner,
                outer,
                stops,
            } => (
                self.ctx
                    .create_radial_gradient(center.x, center.y, *inner, center.x, center.y, *outer)
                    .ok()?,
                stops,
            ),
        };
        for (offset, color) in stops {
            let _ = g.add_color_stop(offset.clamp(0.0, 1.0) as f32, &color.css());
        }
        Some(g)
    }

    fn apply_fill(&self, paint: &Paint) {
        match paint {
            Paint::Solid(c) => self.ctx.set_fill_style_str(&c.css()),
            _ => {
                if let Some(g) = self.gradient(paint) {
                    self.ctx.set_fill_style_canvas_gradient(&g);
                }
            }
        }
    }

    fn apply_stroke(&self, paint: &Paint) {
        match paint {
            Paint::Solid(c) => self.ctx.set_stroke_style_str(&c.css()),
            _ => {
                if let Some(g) = self.gradient(paint) {
                    self.ctx.set_stroke_style_canvas_gradient(&g);
                }
            }
        }
    }
}

impl DrawSurface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn set_transform(&mut self, scale: f64, translate_x: f64, translate_y: f64) {
        let _ = self
            .ctx
            .set_transform(scale, 0.0, 0.0, scale, translate_x, translate_y);
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: &Paint) {
        self.apply_fill(paint);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, p: Point) {
        self.ctx.move_to(p.x, p.y);
    }

    fn line_to(&mut self, p: Point) {
        self.ctx.line_to(p.x, p.y);
    }

    fn quadratic_curve_to(&mut self, control: Point, end: Point) {
        self.ctx
            .quadratic_curve_to(control.x, control.y, end.x, end.y);
    }

    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64) {
        let _ = self
            .ctx
            .arc(center.x, center.y, radius.max(0.0), start_angle, end_angle);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self, paint: &Paint) {
        self.apply_fill(paint);
        self.ctx.fill();
    }

    fn stroke(&mut self, paint: &Paint, width: f64) {
        self.apply_stroke(paint);
        self.ctx.set_line_width(width);
        self.ctx.stroke();
    }

    fn set_shadow(&mut self, blur: f64, color: Rgba) {
        self.ctx.set_shadow_blur(blur);
        self.ctx.set_shadow_color(&color.css());
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0));
    }

    fn fill_text(&mut self, text: &str, at: Point, font: &str, color: Rgba, align: TextAlign) {
        self.ctx.set_font(font);
        self.ctx.set_text_align(align.as_str());
        self.ctx.set_text_baseline("middle");
        self.ctx.set_fill_style_str(&color.css());
        let _ = self.ctx.fill_text(text, at.x, at.y);
    }
}
