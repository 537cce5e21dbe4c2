use std::cell::RefCell;
use std::rc::Rc;

use emoflow::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, MouseEvent, WheelEvent, Window};

mod canvas;

use canvas::CanvasSurface;

type FrameCallback = Closure<dyn FnMut(f64)>;
type View = FlowView<CanvasSurface, RafScheduler>;

/// `requestAnimationFrame`-backed scheduler. The callback is installed once
/// the view exists; until then every request is refused.
struct RafScheduler {
    window: Window,
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let slot = self.callback.borrow();
        let cb = slot.as_ref()?;
        self.window
            .request_animation_frame(cb.as_ref().unchecked_ref())
            .ok()
            .map(|id| FrameHandle(id as u64))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.0 as i32);
    }
}

/// A DOM listener that is removed again on drop.
struct Listener {
    target: HtmlCanvasElement,
    kind: &'static str,
    callback: js_sys::Function,
    _closure: Box<dyn std::any::Any>,
}

impl Listener {
    fn mouse(
        target: &HtmlCanvasElement,
        kind: &'static str,
        f: impl FnMut(MouseEvent) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut(MouseEvent)>::new(f);
        let callback: js_sys::Function = closure.as_ref().unchecked_ref::<js_sys::Function>().clone();
        target.add_event_listener_with_callback(kind, &callback)?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
            _closure: Box::new(closure),
        })
    }

    fn wheel(target: &HtmlCanvasElement, f: impl FnMut(WheelEvent) + 'static) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut(WheelEvent)>::new(f);
        let callback: js_sys::Function = closure.as_ref().unchecked_ref::<js_sys::Function>().clone();
        // Non-passive so the page does not scroll while zooming.
        let opts = web_sys::AddEventListenerOptions::new();
        opts.set_passive(false);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            "wheel", &callback, &opts,
        )?;
        Ok(Self {
            target: target.clone(),
            kind: "wheel",
            callback,
            _closure: Box::new(closure),
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, &self.callback);
    }
}

/// Pointer position in canvas pixels.
fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> Point {
    let rect = canvas.get_bounding_client_rect();
    let sx = if rect.width() > 0.0 {
        canvas.width() as f64 / rect.width()
    } else {
        1.0
    };
    let sy = if rect.height() > 0.0 {
        canvas.height() as f64 / rect.height()
    } else {
        1.0
    };
    Point::new(
        (ev.client_x() as f64 - rect.left()) * sx,
        (ev.client_y() as f64 - rect.top()) * sy,
    )
}

fn show_cursor(canvas: &HtmlCanvasElement, cursor: Cursor) {
    let _ = canvas.style().set_property("cursor", cursor.css());
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Emotion flow graph bound to one `<canvas>` element.
#[wasm_bindgen]
pub struct EmotionFlow {
    view: Rc<RefCell<View>>,
    frame_callback: Rc<RefCell<Option<FrameCallback>>>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl EmotionFlow {
    /// Attach to the canvas with id `canvas_id`. `config_json` is an optional
    /// partial engine config.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, config_json: Option<String>) -> Result<EmotionFlow, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{canvas_id}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("element is not a canvas"))?;

        let config = match config_json.as_deref() {
            Some(json) => EngineConfig::from_json_str(json).map_err(js_err)?,
            None => EngineConfig::default(),
        };
        let engine = FlowEngine::new(config).map_err(js_err)?;

        let surface = CanvasSurface::from_canvas(&canvas);
        if let Some(s) = &surface {
            s.sync_size();
        }
        let frame_callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
        let scheduler = RafScheduler {
            window,
            callback: frame_callback.clone(),
        };
        let view = Rc::new(RefCell::new(
            FlowView::new(engine, surface, scheduler).map_err(js_err)?,
        ));

        {
            let view = view.clone();
            *frame_callback.borrow_mut() = Some(Closure::new(move |_ts: f64| {
                let Ok(mut v) = view.try_borrow_mut() else {
                    return;
                };
                v.surface().sync_size();
                if let Some(h) = v.pending_frame() {
                    v.on_frame(h);
                }
            }));
        }

        let listeners = Self::attach_input(&canvas, &view)?;
        view.borrow_mut().start();

        Ok(EmotionFlow {
            view,
            frame_callback,
            listeners,
        })
    }

    fn attach_input(canvas: &HtmlCanvasElement, view: &Rc<RefCell<View>>) -> Result<Vec<Listener>, JsValue> {
        let mut out = Vec::with_capacity(5);

        out.push(Listener::mouse(canvas, "mousedown", {
            let (view, canvas) = (view.clone(), canvas.clone());
            move |ev: MouseEvent| {
                let at = canvas_point(&canvas, &ev);
                if let Ok(mut v) = view.try_borrow_mut() {
                    v.pointer_down(at);
                    show_cursor(&canvas, v.engine().cursor());
                }
            }
        })?);

        out.push(Listener::mouse(canvas, "mousemove", {
            let (view, canvas) = (view.clone(), canvas.clone());
            move |ev: MouseEvent| {
                let at = canvas_point(&canvas, &ev);
                let held = ev.buttons() & 1 == 1;
                if let Ok(mut v) = view.try_borrow_mut() {
                    v.pointer_move(at, held);
                    show_cursor(&canvas, v.engine().cursor());
                }
            }
        })?);

        for kind in ["mouseup", "mouseleave"] {
            out.push(Listener::mouse(canvas, kind, {
                let (view, canvas) = (view.clone(), canvas.clone());
                move |_ev: MouseEvent| {
                    if let Ok(mut v) = view.try_borrow_mut() {
                        v.pointer_up();
                        show_cursor(&canvas, v.engine().cursor());
                    }
                }
            })?);
        }

        out.push(Listener::wheel(canvas, {
            let (view, canvas) = (view.clone(), canvas.clone());
            move |ev: WheelEvent| {
                ev.prevent_default();
                let at = canvas_point(&canvas, &ev);
                if let Ok(mut v) = view.try_borrow_mut() {
                    v.wheel(at, ev.delta_y());
                }
            }
        })?);

        Ok(out)
    }

    /// Replace the event list with a JSON array of
    /// `{"emotion": "...", "timestamp": "RFC 3339"}` objects.
    #[wasm_bindgen(js_name = setEventsJson)]
    pub fn set_events_json(&self, json: &str) -> Result<(), JsValue> {
        let events: Vec<EmotionEvent> = serde_json::from_str(json).map_err(js_err)?;
        self.view.borrow_mut().on_data_changed(events);
        Ok(())
    }

    #[wasm_bindgen(js_name = setCurrentEmotion)]
    pub fn set_current_emotion(&self, label: Option<String>) {
        let current = label.as_deref().map(Emotion::from_label);
        self.view.borrow_mut().set_current_emotion(current);
    }

    #[wasm_bindgen(js_name = summaryJson)]
    pub fn summary_json(&self) -> Result<String, JsValue> {
        self.view.borrow().engine().summary().to_json().map_err(js_err)
    }

    pub fn start(&self) {
        self.view.borrow_mut().start();
    }

    pub fn stop(&self) {
        self.view.borrow_mut().stop();
    }

    /// Stop rendering and detach from the page. The object is inert afterwards.
    pub fn destroy(&mut self) {
        if let Ok(mut v) = self.view.try_borrow_mut() {
            v.stop();
        }
        self.listeners.clear();
        // Breaks the view -> scheduler -> callback -> view cycle.
        self.frame_callback.borrow_mut().take();
    }
}

impl Drop for EmotionFlow {
    fn drop(&mut self) {
        self.destroy();
    }
}
