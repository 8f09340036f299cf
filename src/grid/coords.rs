//! SVG-space to viewport-space translation for anchoring popups next to a clicked tile.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use web_sys::{Element, SvgGraphicsElement};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// The four viewport-space corners of a rendered tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub nw: ScreenPoint,
    pub ne: ScreenPoint,
    pub se: ScreenPoint,
    pub sw: ScreenPoint,
}

/// An element's box in its own user space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocalBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Affine matrix `[a c e; b d f]` as reported by `getScreenCTM`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenMatrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl ScreenMatrix {
    pub const IDENTITY: ScreenMatrix = ScreenMatrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn apply(&self, x: f64, y: f64) -> ScreenPoint {
        ScreenPoint {
            x: self.a * x + self.c * y + self.e,
            y: self.b * x + self.d * y + self.f,
        }
    }
}

pub fn screen_rect(local: LocalBox, ctm: &ScreenMatrix) -> ScreenRect {
    let (x0, y0) = (local.x, local.y);
    let (x1, y1) = (local.x + local.width, local.y + local.height);
    ScreenRect {
        nw: ctm.apply(x0, y0),
        ne: ctm.apply(x1, y0),
        se: ctm.apply(x1, y1),
        sw: ctm.apply(x0, y1),
    }
}

/// Reads the element's current box and screen transform. Must be called per click: pan/zoom
/// changes the transform between clicks.
pub fn screen_rect_for_element(el: &Element) -> Option<ScreenRect> {
    let graphic = el.dyn_ref::<SvgGraphicsElement>()?;
    let m = graphic.get_screen_ctm()?;
    let b = graphic.get_b_box().ok()?;
    let ctm = ScreenMatrix {
        a: m.a() as f64,
        b: m.b() as f64,
        c: m.c() as f64,
        d: m.d() as f64,
        e: m.e() as f64,
        f: m.f() as f64,
    };
    let local = LocalBox {
        x: b.x() as f64,
        y: b.y() as f64,
        width: b.width() as f64,
        height: b.height() as f64,
    };
    Some(screen_rect(local, &ctm))
}

pub fn screen_rect_for_event(e: &web_sys::MouseEvent) -> Option<ScreenRect> {
    let target = e.target()?;
    let el = target.dyn_into::<Element>().ok()?;
    screen_rect_for_element(&el)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile() -> LocalBox {
        LocalBox {
            x: 100.0,
            y: 50.0,
            width: 100.0,
            height: 100.0,
        }
    }

    #[test]
    fn identity_keeps_svg_corners() {
        let r = screen_rect(tile(), &ScreenMatrix::IDENTITY);
        assert_eq!(r.nw, ScreenPoint { x: 100.0, y: 50.0 });
        assert_eq!(r.ne, ScreenPoint { x: 200.0, y: 50.0 });
        assert_eq!(r.se, ScreenPoint { x: 200.0, y: 150.0 });
        assert_eq!(r.sw, ScreenPoint { x: 100.0, y: 150.0 });
    }

    #[test]
    fn pan_and_zoom_are_applied_to_every_corner() {
        let ctm = ScreenMatrix {
            a: 0.5,
            b: 0.0,
            c: 0.0,
            d: 0.5,
            e: 10.0,
            f: 20.0,
        };
        let r = screen_rect(tile(), &ctm);
        assert_eq!(r.nw, ScreenPoint { x: 60.0, y: 45.0 });
        assert_eq!(r.se, ScreenPoint { x: 110.0, y: 95.0 });
        assert_eq!(r.sw, ScreenPoint { x: 60.0, y: 95.0 });
    }
}
