use std::rc::Rc;
use yew::prelude::*;

use crate::grid::coords::{ScreenRect, screen_rect_for_event};
use crate::grid::pan_zoom::{PanZoom, PanZoomConfig};
use crate::grid::plan::{DrawOp, GridFingerprint, GridInputs, GridPlan, TileRect};
use crate::model::{CreatureId, Point3, SceneId};
use crate::state::movement::move_command;
use crate::state::{StoreAction, StoreContext};

use super::menu::{AnnotationPopup, ContextMenu};

/// A click on the grid, already translated to screen space where a popup needs it.
#[derive(Clone, Debug, PartialEq)]
pub enum GridEvent {
    Creature { cid: CreatureId, rect: ScreenRect },
    MovementTarget { scene_id: SceneId, cid: CreatureId, pt: Point3 },
    Annotation { pt: Point3, rect: ScreenRect },
    Terrain,
}

fn handle(ctx: &StoreContext, event: GridEvent) {
    match event {
        GridEvent::Creature { cid, rect } => {
            ctx.dispatch(StoreAction::ActivateGridCreature { cid, rect });
        }
        GridEvent::MovementTarget { scene_id, cid, pt } => {
            ctx.send(move_command(&ctx.store.app, scene_id, cid, pt));
            ctx.dispatch(StoreAction::ClearMovementOptions);
        }
        GridEvent::Annotation { pt, rect } => {
            ctx.dispatch(StoreAction::ToggleAnnotation { pt, rect });
        }
        GridEvent::Terrain => ctx.dispatch(StoreAction::CloseMenu),
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct GridProps {
    pub scene_id: SceneId,
    #[prop_or(0.5)]
    pub zoom_sensitivity: f64,
}

#[function_component]
pub fn Grid(props: &GridProps) -> Html {
    let ctx = use_context::<StoreContext>();
    let cache = use_mut_ref(|| None::<(GridFingerprint, Rc<GridPlan>)>);
    // Latest context for the SVG's callback, which is created once and never changes.
    let ctx_ref = use_mut_ref(|| ctx.clone());
    *ctx_ref.borrow_mut() = ctx.clone();
    let on_event = {
        let ctx_ref = ctx_ref.clone();
        use_memo((), move |_| {
            Callback::from(move |event: GridEvent| {
                let ctx = ctx_ref.borrow().clone();
                if let Some(ctx) = ctx {
                    handle(&ctx, event);
                }
            })
        })
    };

    let Some(ctx) = ctx else {
        return html! {};
    };
    let store = ctx.store.clone();
    let app = store.app.clone();
    let inputs = match GridInputs::resolve(
        &app,
        &props.scene_id,
        store.grid.movement_options.as_ref(),
        &store.viewer,
    ) {
        Ok(inputs) => inputs,
        Err(err) => {
            tracing::warn!(?err, "grid has nothing to draw");
            return html! { <div>{ err.to_string() }</div> };
        }
    };
    let (scene, map) = (inputs.scene, inputs.map);
    let fingerprint = inputs.fingerprint();
    let plan = {
        let mut cache = cache.borrow_mut();
        match cache.as_ref() {
            Some((fp, plan)) if *fp == fingerprint => plan.clone(),
            _ => {
                let plan = Rc::new(inputs.plan());
                tracing::debug!(
                    scene = %scene.id,
                    terrain = plan.terrain.len(),
                    creatures = plan.creatures.len(),
                    "re-planned grid"
                );
                *cache = Some((fingerprint, plan.clone()));
                plan
            }
        }
    };

    let menu = match store.grid.active_menu {
        Some(menu) => html! { <ContextMenu cid={menu.cid} scene_id={scene.id} rect={menu.rect} /> },
        None => html! {},
    };
    let annotation = store
        .grid
        .display_annotation
        .and_then(|shown| {
            let special = map.special_at(shown.pt)?;
            Some(html! { <AnnotationPopup note={special.note.clone()} rect={shown.rect} /> })
        })
        .unwrap_or_default();

    html! {<div style="position:relative; flex:1 1 auto; height:100%; overflow:hidden;">
        <GridSvg
            {plan}
            {fingerprint}
            on_event={(*on_event).clone()}
            zoom_sensitivity={props.zoom_sensitivity}
        />
        { menu }
        { annotation }
    </div>}
}

#[derive(Properties, Clone)]
pub struct GridSvgProps {
    pub plan: Rc<GridPlan>,
    pub fingerprint: GridFingerprint,
    pub on_event: Callback<GridEvent>,
    pub zoom_sensitivity: f64,
}

/// The plan is fully determined by the fingerprint, so nothing else needs comparing.
impl PartialEq for GridSvgProps {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint && self.zoom_sensitivity == other.zoom_sensitivity
    }
}

fn rect_attrs(r: &TileRect) -> (String, String, String, String) {
    (
        r.x.to_string(),
        r.y.to_string(),
        r.width.to_string(),
        r.height.to_string(),
    )
}

fn screen_rect_or_default(e: &MouseEvent) -> ScreenRect {
    screen_rect_for_event(e).unwrap_or_else(|| {
        tracing::warn!("clicked element has no screen transform");
        ScreenRect::default()
    })
}

fn draw(op: DrawOp<'_>, scene_id: SceneId, on_event: &Callback<GridEvent>) -> Html {
    match op {
        DrawOp::Terrain(pt, r) => {
            let (x, y, w, h) = rect_attrs(r);
            let onclick = on_event.reform(|_: MouseEvent| GridEvent::Terrain);
            html! { <rect key={format!("terrain-{:?}", pt)} {x} {y} width={w} height={h}
                rx="5" ry="5" stroke="black" stroke-width="1" fill={r.fill.clone()} {onclick} /> }
        }
        DrawOp::CreatureImage(token) => {
            let (x, y, w, h) = rect_attrs(&token.rect);
            let cid = token.cid;
            let onclick = on_event.reform(move |e: MouseEvent| GridEvent::Creature {
                cid,
                rect: screen_rect_or_default(&e),
            });
            html! { <image key={format!("creature-{cid}")} {x} {y} width={w} height={h}
                href={token.portrait.clone().unwrap_or_default()} {onclick} /> }
        }
        DrawOp::CreatureRect(token) => {
            let (x, y, w, h) = rect_attrs(&token.rect);
            let cid = token.cid;
            let onclick = on_event.reform(move |e: MouseEvent| GridEvent::Creature {
                cid,
                rect: screen_rect_or_default(&e),
            });
            let text_x = (token.pos.0 as i32 * 100).to_string();
            let text_y = (token.pos.1 as i32 * 100).to_string();
            html! { <g key={format!("creature-{cid}")}>
                <rect {x} {y} width={w} height={h} rx="5" ry="5" stroke="black" stroke-width="1"
                    fill={token.rect.fill.clone()} {onclick} />
                <text x={text_x} y={text_y} style="pointer-events:none;">{ token.short_name() }</text>
            </g> }
        }
        DrawOp::MovementTarget(target) => {
            let (x, y, w, h) = rect_attrs(&target.rect);
            let (cid, pt) = (target.cid, target.pt);
            let onclick = on_event.reform(move |_: MouseEvent| GridEvent::MovementTarget {
                scene_id,
                cid,
                pt,
            });
            html! { <rect key={format!("move-{:?}", pt)} {x} {y} width={w} height={h}
                rx="5" ry="5" stroke="black" stroke-width="1" fill={target.rect.fill.clone()}
                fill-opacity="0.4" {onclick} /> }
        }
        DrawOp::Special(mark) => {
            let (x, y, w, h) = rect_attrs(&mark.rect);
            html! { <rect key={format!("special-{:?}", mark.pt)} {x} {y} width={w} height={h}
                rx="5" ry="5" stroke="black" stroke-width="1" fill={mark.rect.fill.clone()}
                style="pointer-events:none;" /> }
        }
        DrawOp::Annotation(mark) => {
            let (x, y, w, h) = rect_attrs(&mark.hit);
            let pt = mark.pt;
            let onclick = on_event.reform(move |e: MouseEvent| GridEvent::Annotation {
                pt,
                rect: screen_rect_or_default(&e),
            });
            html! { <g key={format!("annotation-{:?}", pt)}>
                <text x={mark.text_x.to_string()} y={mark.text_y.to_string()}
                    font-size={format!("{}px", mark.font_size)} stroke="black" fill="black"
                    style="pointer-events:none;">{"*"}</text>
                <rect {x} {y} width={w} height={h} fill="transparent" {onclick} />
            </g> }
        }
    }
}

#[function_component]
pub fn GridSvg(props: &GridSvgProps) -> Html {
    let svg_ref = use_node_ref();
    let g_ref = use_node_ref();
    {
        let svg_ref = svg_ref.clone();
        let g_ref = g_ref.clone();
        let config = PanZoomConfig {
            zoom_sensitivity: props.zoom_sensitivity,
            ..PanZoomConfig::default()
        };
        use_effect_with(props.zoom_sensitivity.to_bits(), move |_| {
            let pan_zoom = match (svg_ref.cast::<web_sys::Element>(), g_ref.cast::<web_sys::Element>()) {
                (Some(svg), Some(g)) => Some(PanZoom::attach(svg, g, config)),
                _ => {
                    tracing::warn!("grid svg not mounted; pan/zoom disabled");
                    None
                }
            };
            move || drop(pan_zoom)
        });
    }

    html! {<svg id="pt-grid" ref={svg_ref} width="100%" height="100%">
        <g ref={g_ref}>
            { for props.plan.draw_list().into_iter().map(|op| draw(op, props.plan.scene_id, &props.on_event)) }
        </g>
    </svg>}
}
