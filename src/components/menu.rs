//! Popups anchored to a clicked tile.

use yew::prelude::*;

use crate::grid::coords::ScreenRect;
use crate::model::{CreatureId, SceneId};
use crate::state::actions::{bind_actions, creature_actions, invoke};
use crate::state::{MovementOptions, StoreAction, StoreContext};

fn anchored_at(rect: &ScreenRect) -> String {
    format!(
        "position:fixed; left:{}px; top:{}px; z-index:20; background:white; border:1px solid black; border-radius:6px; padding:4px;",
        rect.sw.x, rect.sw.y
    )
}

#[derive(Properties, PartialEq, Clone)]
pub struct ContextMenuProps {
    pub cid: CreatureId,
    pub scene_id: SceneId,
    pub rect: ScreenRect,
}

#[function_component]
pub fn ContextMenu(props: &ContextMenuProps) -> Html {
    let Some(ctx) = use_context::<StoreContext>() else {
        return html! {};
    };
    let store = ctx.store.clone();
    let Some(creature) = store.app.get_creature(&props.cid) else {
        tracing::warn!(creature = %props.cid, "menu for a creature that no longer exists");
        return html! {};
    };

    let close = {
        let ctx = ctx.clone();
        Callback::from(move |_: ()| ctx.dispatch(StoreAction::CloseMenu))
    };
    let show = {
        let ctx = ctx.clone();
        Callback::from(move |opts: MovementOptions| {
            ctx.dispatch(StoreAction::DisplayMovementOptions(opts))
        })
    };
    let kinds = creature_actions(&store.app, &store.viewer, props.cid);
    let actions = bind_actions(store.app.clone(), props.scene_id, &kinds, show);

    html! {<div style={anchored_at(&props.rect)}>
        <div><strong>{ creature.name.clone() }</strong></div>
        <ul style="list-style:none; margin:0; padding:0;">
            <li><a href="#" onclick={close.reform(|e: MouseEvent| e.prevent_default())}>{"(Close menu)"}</a></li>
            { for actions.into_iter().map(|action| {
                let ctx = ctx.clone();
                let cid = props.cid;
                let name = action.name.clone();
                let onclick = Callback::from(move |e: MouseEvent| {
                    e.prevent_default();
                    let ctx = ctx.clone();
                    let _ = invoke(&action, &cid, move || ctx.dispatch(StoreAction::CloseMenu));
                });
                html! { <li><a href="#" {onclick}>{ name }</a></li> }
            }) }
        </ul>
    </div>}
}

#[derive(Properties, PartialEq, Clone)]
pub struct AnnotationPopupProps {
    pub note: AttrValue,
    pub rect: ScreenRect,
}

#[function_component]
pub fn AnnotationPopup(props: &AnnotationPopupProps) -> Html {
    html! { <div style={anchored_at(&props.rect)}>{ props.note.clone() }</div> }
}
