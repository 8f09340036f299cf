use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::model::{CreatureId, ItemId, SceneId};
use crate::state::StoreContext;
use crate::state::transfer::{can_submit, parse_quantity, prepare_transfer, transfer_command};

#[derive(Properties, PartialEq, Clone)]
pub struct PositiveIntegerInputProps {
    #[prop_or_default]
    pub max: Option<u64>,
    pub value: Option<u64>,
    pub on_change: Callback<Option<u64>>,
}

#[function_component]
pub fn PositiveIntegerInput(props: &PositiveIntegerInputProps) -> Html {
    let oninput = {
        let props = props.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let max = props.max.unwrap_or(u64::MAX);
            props.on_change.emit(parse_quantity(&input.value(), max, props.value));
        })
    };
    let shown = props.value.map(|v| v.to_string()).unwrap_or_default();
    html! { <input type="text" size="4" value={shown} {oninput} /> }
}

#[derive(Properties, PartialEq, Clone)]
pub struct GiveItemProps {
    pub giver: CreatureId,
    pub item_id: ItemId,
    pub current_scene: Option<SceneId>,
    pub on_close: Callback<()>,
}

#[function_component]
pub fn GiveItem(props: &GiveItemProps) -> Html {
    let ctx = use_context::<StoreContext>();
    let receiver = use_state(|| None::<CreatureId>);
    let count = use_state(|| Some(1u64));
    let Some(ctx) = ctx else {
        return html! {};
    };

    let app = ctx.store.app.clone();
    let transfer = match prepare_transfer(
        &app,
        &ctx.store.viewer,
        props.current_scene,
        props.giver,
        props.item_id,
    ) {
        Ok(t) => t,
        Err(err) => {
            tracing::debug!(%err, "transfer unavailable");
            return html! { <div>{ err.to_string() }</div> };
        }
    };

    let on_count = {
        let count = count.clone();
        Callback::from(move |n: Option<u64>| count.set(n))
    };
    let on_receiver = {
        let receiver = receiver.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let picked = uuid::Uuid::parse_str(&select.value()).ok().map(CreatureId);
            receiver.set(picked);
        })
    };
    let submit = transfer_command(&transfer, *receiver, *count);
    let on_give = {
        let ctx = ctx.clone();
        let on_close = props.on_close.clone();
        let submit = submit.clone();
        Callback::from(move |_| {
            if let Some(cmd) = submit.clone() {
                ctx.send(cmd);
                on_close.emit(());
            }
        })
    };
    let on_cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };
    let selected = receiver.map(|c| c.to_string()).unwrap_or_default();

    html! {<div style="display:flex; flex-wrap:wrap; gap:4px; align-items:center;">
        {"Giving"}
        <PositiveIntegerInput max={transfer.available} value={*count} on_change={on_count} />
        { transfer.item.name.clone() }
        { format!("from {} to", transfer.giver.name) }
        <select value={selected} onchange={on_receiver}>
            <option value="">{"Choose a creature"}</option>
            { for transfer.receivers.iter().map(|c| html! {
                <option value={c.id.to_string()} selected={Some(c.id) == *receiver}>{ c.name.clone() }</option>
            }) }
        </select>
        <button disabled={!can_submit(*receiver, *count)} onclick={on_give}>{"Give"}</button>
        <button onclick={on_cancel}>{"Cancel"}</button>
    </div>}
}

#[derive(Properties, PartialEq, Clone)]
pub struct CreatureInventoryProps {
    pub creature: CreatureId,
    pub current_scene: Option<SceneId>,
}

#[function_component]
pub fn CreatureInventory(props: &CreatureInventoryProps) -> Html {
    let ctx = use_context::<StoreContext>();
    let giving = use_state(|| None::<ItemId>);
    let Some(ctx) = ctx else {
        return html! {};
    };
    let app = ctx.store.app.clone();
    let Some(creature) = app.get_creature(&props.creature) else {
        return html! {};
    };
    let items = app.get_items(creature.inventory.keys());

    let give = match *giving {
        Some(item_id) => {
            let on_close = {
                let giving = giving.clone();
                Callback::from(move |_| giving.set(None))
            };
            html! { <GiveItem
                giver={creature.id}
                {item_id}
                current_scene={props.current_scene}
                {on_close}
            /> }
        }
        None => html! {},
    };

    html! {<div>
        { for items.iter().map(|item| {
            let count = creature.inventory.get(&item.id).copied().unwrap_or(0);
            let onclick = {
                let giving = giving.clone();
                let id = item.id;
                Callback::from(move |_| giving.set(Some(id)))
            };
            html! {<div key={item.id.to_string()} style="display:flex; justify-content:space-between;">
                { format!("{} ({})", item.name, count) }
                <button {onclick}>{"Give"}</button>
            </div>}
        }) }
        { give }
    </div>}
}
