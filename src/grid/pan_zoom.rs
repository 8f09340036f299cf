//! Pan/zoom controller for the grid SVG. It owns the `transform` attribute of the single
//! top-level `<g>` and nothing else, so Yew can keep patching the children.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, EventTarget, MouseEvent, SvgGraphicsElement, WheelEvent};

use super::coords::{LocalBox, ScreenPoint};

/// Pointer travel (px) after which a press counts as a drag and its click is swallowed.
const DRAG_THRESHOLD_PX: f64 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanZoomConfig {
    pub dbl_click_zoom: bool,
    pub fit: bool,
    pub center: bool,
    /// Each wheel notch scales by `1 + zoom_sensitivity`.
    pub zoom_sensitivity: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for PanZoomConfig {
    fn default() -> Self {
        Self {
            dbl_click_zoom: false,
            fit: true,
            center: true,
            zoom_sensitivity: 0.5,
            min_zoom: 0.5,
            max_zoom: 10.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for View {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl View {
    /// Initial view for `content` shown in a `width`×`height` viewport.
    pub fn initial(content: LocalBox, width: f64, height: f64, config: &PanZoomConfig) -> View {
        if content.width <= 0.0 || content.height <= 0.0 || width <= 0.0 || height <= 0.0 {
            return View::default();
        }
        let zoom = if config.fit {
            (width / content.width)
                .min(height / content.height)
                .clamp(config.min_zoom, config.max_zoom)
        } else {
            1.0
        };
        let (pan_x, pan_y) = if config.center {
            (
                (width - content.width * zoom) / 2.0 - content.x * zoom,
                (height - content.height * zoom) / 2.0 - content.y * zoom,
            )
        } else {
            (-content.x * zoom, -content.y * zoom)
        };
        View { zoom, pan_x, pan_y }
    }

    /// Zooms by `factor` keeping the content under `at` (viewport px) fixed.
    /// Never moves against `factor`, even from outside the zoom limits.
    pub fn zoom_at(&self, at: ScreenPoint, factor: f64, config: &PanZoomConfig) -> View {
        let target = (self.zoom * factor).clamp(config.min_zoom, config.max_zoom);
        let zoom = if factor >= 1.0 {
            target.max(self.zoom)
        } else {
            target.min(self.zoom)
        };
        let world_x = (at.x - self.pan_x) / self.zoom;
        let world_y = (at.y - self.pan_y) / self.zoom;
        View {
            zoom,
            pan_x: at.x - world_x * zoom,
            pan_y: at.y - world_y * zoom,
        }
    }

    pub fn pan_by(&self, dx: f64, dy: f64) -> View {
        View {
            pan_x: self.pan_x + dx,
            pan_y: self.pan_y + dy,
            ..*self
        }
    }

    pub fn transform_attr(&self) -> String {
        format!(
            "matrix({},0,0,{},{},{})",
            self.zoom, self.zoom, self.pan_x, self.pan_y
        )
    }
}

/// Scale factor for one wheel event: scrolling up zooms in.
pub fn wheel_factor(delta_y: f64, sensitivity: f64) -> f64 {
    if delta_y < 0.0 {
        1.0 + sensitivity
    } else if delta_y > 0.0 {
        1.0 / (1.0 + sensitivity)
    } else {
        1.0
    }
}

#[derive(Default)]
struct Drag {
    active: bool,
    last_x: f64,
    last_y: f64,
    travelled: f64,
    swallow_click: bool,
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    capture: bool,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

pub struct PanZoom {
    listeners: Vec<Listener>,
}

impl PanZoom {
    /// Fits the content, then starts listening. `svg` is the root element, `viewport` its `<g>`.
    pub fn attach(svg: Element, viewport: Element, config: PanZoomConfig) -> PanZoom {
        let view = Rc::new(Cell::new(View::default()));
        let drag = Rc::new(RefCell::new(Drag::default()));

        let apply = {
            let viewport = viewport.clone();
            let view = view.clone();
            move |next: View| {
                view.set(next);
                let _ = viewport.set_attribute("transform", &next.transform_attr());
            }
        };

        if let Some(g) = viewport.dyn_ref::<SvgGraphicsElement>() {
            if let Ok(bbox) = g.get_b_box() {
                let content = LocalBox {
                    x: bbox.x() as f64,
                    y: bbox.y() as f64,
                    width: bbox.width() as f64,
                    height: bbox.height() as f64,
                };
                let width = svg.client_width() as f64;
                let height = svg.client_height() as f64;
                apply(View::initial(content, width, height, &config));
            }
        }

        let to_viewport = {
            let svg = svg.clone();
            move |e: &MouseEvent| {
                let r = svg.get_bounding_client_rect();
                ScreenPoint {
                    x: e.client_x() as f64 - r.left(),
                    y: e.client_y() as f64 - r.top(),
                }
            }
        };

        let mut pz = PanZoom { listeners: Vec::new() };
        let window: Option<EventTarget> = web_sys::window().map(Into::into);
        let svg_target: EventTarget = svg.clone().into();

        // Wheel
        {
            let view = view.clone();
            let apply = apply.clone();
            let to_viewport = to_viewport.clone();
            pz.listen(&svg_target, "wheel", false, move |e: web_sys::Event| {
                let Some(we) = e.dyn_ref::<WheelEvent>() else { return };
                e.prevent_default();
                let me: &MouseEvent = we;
                let factor = wheel_factor(we.delta_y(), config.zoom_sensitivity);
                apply(view.get().zoom_at(to_viewport(me), factor, &config));
            });
        }

        // Mouse down
        {
            let drag = drag.clone();
            pz.listen(&svg_target, "mousedown", false, move |e: web_sys::Event| {
                let Some(me) = e.dyn_ref::<MouseEvent>() else { return };
                if me.button() != 0 {
                    return;
                }
                let mut d = drag.borrow_mut();
                d.active = true;
                d.last_x = me.client_x() as f64;
                d.last_y = me.client_y() as f64;
                d.travelled = 0.0;
                d.swallow_click = false;
            });
        }

        if let Some(window) = &window {
            // Mouse move
            {
                let drag = drag.clone();
                let view = view.clone();
                let apply = apply.clone();
                pz.listen(window, "mousemove", false, move |e: web_sys::Event| {
                    let Some(me) = e.dyn_ref::<MouseEvent>() else { return };
                    let mut d = drag.borrow_mut();
                    if !d.active {
                        return;
                    }
                    let x = me.client_x() as f64;
                    let y = me.client_y() as f64;
                    let (dx, dy) = (x - d.last_x, y - d.last_y);
                    d.last_x = x;
                    d.last_y = y;
                    d.travelled += dx.abs() + dy.abs();
                    if d.travelled > DRAG_THRESHOLD_PX {
                        d.swallow_click = true;
                    }
                    drop(d);
                    apply(view.get().pan_by(dx, dy));
                });
            }
            // Mouse up
            {
                let drag = drag.clone();
                pz.listen(window, "mouseup", false, move |_e: web_sys::Event| {
                    drag.borrow_mut().active = false;
                });
            }
        }

        // A drag must not also count as a click on whatever tile it ended over.
        {
            let drag = drag.clone();
            pz.listen(&svg_target, "click", true, move |e: web_sys::Event| {
                let mut d = drag.borrow_mut();
                if d.swallow_click {
                    d.swallow_click = false;
                    e.stop_propagation();
                    e.prevent_default();
                }
            });
        }

        if config.dbl_click_zoom {
            let view = view.clone();
            let apply = apply.clone();
            let to_viewport = to_viewport.clone();
            pz.listen(&svg_target, "dblclick", false, move |e: web_sys::Event| {
                let Some(me) = e.dyn_ref::<MouseEvent>() else { return };
                let factor = 1.0 + config.zoom_sensitivity;
                apply(view.get().zoom_at(to_viewport(me), factor, &config));
            });
        }

        tracing::debug!(listeners = pz.listeners.len(), "pan/zoom attached");
        pz
    }

    fn listen<F>(&mut self, target: &EventTarget, kind: &'static str, capture: bool, f: F)
    where
        F: FnMut(web_sys::Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut(web_sys::Event)>);
        let added = target.add_event_listener_with_callback_and_bool(
            kind,
            callback.as_ref().unchecked_ref(),
            capture,
        );
        if let Err(err) = added {
            tracing::warn!(kind, ?err, "could not attach pan/zoom listener");
            return;
        }
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            capture,
            callback,
        });
    }

    /// Removes every listener. Idempotent.
    pub fn destroy(&mut self) {
        for l in self.listeners.drain(..) {
            let _ = l.target.remove_event_listener_with_callback_and_bool(
                l.kind,
                l.callback.as_ref().unchecked_ref(),
                l.capture,
            );
        }
    }
}

impl Drop for PanZoom {
    fn drop(&mut self) {
        self.destroy();
    }
}
