use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

use super::common::{Collapsible, CreatureCard, TabbedView};
use super::inventory::CreatureInventory;
use crate::command::GameCommand;
use crate::model::{
    Ability, AbilityId, App, Creature, CreatureId, DecidedTarget, Distance, FolderPath, Note, PlayerId,
    SceneId, TargetSpec, Visibility, folder_path_to_string,
};
use crate::settings::{SidebarTab, UiSettings};
use crate::state::movement::movement_options;
use crate::state::{StoreAction, StoreContext};

pub const SCRATCH_NOTE: &str = "Scratch";
const SCRATCH_PLACEHOLDER: &str = "Enter notes here!";

pub fn player_folder(player_id: &PlayerId) -> FolderPath {
    vec!["Players".to_string(), player_id.0.clone()]
}

/// Saves `content` as the player's scratch note, editing it if it already exists.
pub fn scratch_note_command(path: FolderPath, exists: bool, content: &str) -> GameCommand {
    let note = Note {
        name: SCRATCH_NOTE.to_string(),
        content: content.to_string(),
    };
    if exists {
        GameCommand::EditNote {
            path,
            name: SCRATCH_NOTE.to_string(),
            note,
        }
    } else {
        GameCommand::CreateNote { path, note }
    }
}

/// Abilities the creature can aim at itself, with whether each is usable right now.
pub fn actor_abilities<'a>(app: &'a App, creature: &Creature) -> Vec<(AbilityId, &'a Ability, bool)> {
    creature
        .abilities
        .iter()
        .filter_map(|status| {
            let ability = app.get_ability(&status.ability_id)?;
            if ability.target != TargetSpec::Actor {
                return None;
            }
            let usable = creature.can_act && status.cooldown == 0 && ability.cost <= creature.cur_energy;
            Some((status.ability_id.clone(), ability, usable))
        })
        .collect()
}

#[derive(Properties, PartialEq, Clone)]
pub struct PlayerSideBarProps {
    pub player_id: PlayerId,
    pub current_scene: Option<SceneId>,
}

#[function_component]
pub fn PlayerSideBar(props: &PlayerSideBarProps) -> Html {
    let settings = use_state(UiSettings::load);
    let on_select = {
        let settings = settings.clone();
        Callback::from(move |i: usize| {
            let mut next = (*settings).clone();
            next.sidebar_tab = SidebarTab::ALL.get(i).copied().unwrap_or_default();
            next.save();
            settings.set(next);
        })
    };
    let selected = SidebarTab::ALL
        .iter()
        .position(|t| *t == settings.sidebar_tab)
        .unwrap_or(0);
    let labels: Vec<AttrValue> = SidebarTab::ALL.iter().map(|t| AttrValue::from(t.label())).collect();
    let content = match settings.sidebar_tab {
        SidebarTab::Creatures => html! {
            <PlayerCreatures player_id={props.player_id.clone()} current_scene={props.current_scene} />
        },
        SidebarTab::Combat => html! { <CombatPanel /> },
        SidebarTab::Notes => html! { <PlayerNote player_id={props.player_id.clone()} /> },
    };

    html! {<div style="display:flex; flex-direction:column; height:100%;">
        <div style="flex:1 0 auto;">
            <TabbedView {labels} {selected} {on_select}>{ content }</TabbedView>
        </div>
        <div>
            <PlayerActionBar player_id={props.player_id.clone()} />
        </div>
    </div>}
}

#[derive(Properties, PartialEq, Clone)]
pub struct PlayerCreaturesProps {
    pub player_id: PlayerId,
    pub current_scene: Option<SceneId>,
}

#[function_component]
pub fn PlayerCreatures(props: &PlayerCreaturesProps) -> Html {
    let Some(ctx) = use_context::<StoreContext>() else {
        return html! {};
    };
    let app = ctx.store.app.clone();
    let creatures = app
        .get_player(&props.player_id)
        .map(|p| app.get_creatures(&p.creatures))
        .unwrap_or_default();
    if creatures.is_empty() {
        return html! { <div>{"You have no creatures in your control yet."}</div> };
    }
    html! {<div>
        { for creatures.into_iter().map(|creature| html! {
            <div key={creature.id.to_string()}>
                <CreatureCard creature={creature.clone()} color={app.class_color(&creature.class).to_string()} />
                <div style="margin-left:1em;">
                    <Collapsible name="Inventory">
                        <CreatureInventory creature={creature.id} current_scene={props.current_scene} />
                    </Collapsible>
                </div>
            </div>
        }) }
    </div>}
}

#[function_component]
pub fn CombatPanel() -> Html {
    let Some(ctx) = use_context::<StoreContext>() else {
        return html! {};
    };
    let app = ctx.store.app.clone();
    let Some(combat) = &app.current_game.current_combat else {
        return html! { <div>{"There is no combat in progress."}</div> };
    };
    let scene = app.get_scene(&combat.scene);
    let hidden = |cid: &CreatureId| {
        ctx.store.viewer.is_player()
            && scene
                .and_then(|s| s.creatures.get(cid))
                .is_some_and(|(_, vis)| *vis == Visibility::GmOnly)
    };
    let current = combat.current();

    html! {<div>
        { for combat.creatures.data.iter().filter(|cid| !hidden(*cid)).filter_map(|cid| {
            let creature = app.get_creature(cid)?;
            let marker = if current == Some(*cid) { "▶ " } else { "" };
            Some(html! { <div key={cid.to_string()} style="display:flex; justify-content:space-between;">
                <span>{ marker }{ creature.name.clone() }</span>
                <span>{ format!("HP {}/{}", creature.cur_health.0, creature.max_health.0) }</span>
            </div> })
        }) }
    </div>}
}

#[derive(Properties, PartialEq, Clone)]
pub struct PlayerNoteProps {
    pub player_id: PlayerId,
}

#[function_component]
pub fn PlayerNote(props: &PlayerNoteProps) -> Html {
    let ctx = use_context::<StoreContext>();
    let content = use_state(|| None::<String>);
    let Some(ctx) = ctx else {
        return html! {};
    };
    let path = player_folder(&props.player_id);
    let Some(folder) = ctx.store.app.folder_node(&path) else {
        return html! { <div>{ format!("Please ask your GM to create the folder \"{}\"", folder_path_to_string(&path)) }</div> };
    };
    let existing = folder.notes.get(SCRATCH_NOTE);
    let saved = existing
        .map(|n| n.content.clone())
        .unwrap_or_else(|| SCRATCH_PLACEHOLDER.to_string());
    let unchanged = (*content).as_ref().is_none_or(|c| *c == saved);

    let on_input = {
        let content = content.clone();
        Callback::from(move |e: InputEvent| {
            let area: HtmlTextAreaElement = e.target_unchecked_into();
            content.set(Some(area.value()));
        })
    };
    let on_save = {
        let content = content.clone();
        let exists = existing.is_some();
        let path = path.clone();
        let ctx = ctx.clone();
        Callback::from(move |_| {
            if let Some(text) = (*content).as_ref() {
                ctx.send(scratch_note_command(path.clone(), exists, text));
            }
        })
    };
    let shown = (*content).clone().unwrap_or(saved);

    html! {<div>
        <div><button disabled={unchanged} onclick={on_save}>{"Save"}</button></div>
        <div><textarea style="width:100%; height:100%;" value={shown} oninput={on_input} /></div>
    </div>}
}

#[derive(Properties, PartialEq, Clone)]
pub struct PlayerActionBarProps {
    pub player_id: PlayerId,
}

/// Only shown while one of the player's creatures has the turn.
#[function_component]
pub fn PlayerActionBar(props: &PlayerActionBarProps) -> Html {
    let Some(ctx) = use_context::<StoreContext>() else {
        return html! {};
    };
    let app = ctx.store.app.clone();
    let Some(combat) = &app.current_game.current_combat else {
        return html! {};
    };
    let Some(cid) = combat.current() else {
        return html! {};
    };
    let mine = app
        .get_player(&props.player_id)
        .is_some_and(|p| p.creatures.contains(&cid));
    if !mine {
        return html! {};
    }
    let Some(creature) = app.get_creature(&cid) else {
        return html! {};
    };

    let scene_id = combat.scene;
    let on_move = {
        let ctx = ctx.clone();
        let app = app.clone();
        Callback::from(move |_| match movement_options(&app, scene_id, cid) {
            Ok(options) => ctx.dispatch(StoreAction::DisplayMovementOptions(options)),
            Err(err) => tracing::warn!(%err, "no movement options"),
        })
    };
    let on_done = {
        let ctx = ctx.clone();
        Callback::from(move |_| ctx.send(GameCommand::Done))
    };
    let remaining: Distance = creature.speed.saturating_sub(combat.movement_used);

    html! {<div style="display:flex; flex-wrap:wrap; gap:6px; align-items:center; border-top:1px solid black; padding:4px;">
        <strong>{ creature.name.clone() }</strong>
        <span>{ format!("Energy {}/{}", creature.cur_energy.0, creature.max_energy.0) }</span>
        <span>{ format!("Movement {}m", remaining.0 as f64 / 100.0) }</span>
        <button disabled={!creature.can_move} onclick={on_move}>{"Move"}</button>
        { for actor_abilities(&app, creature).into_iter().map(|(ability_id, ability, usable)| {
            let ctx = ctx.clone();
            let key = ability_id.0.clone();
            let onclick = Callback::from(move |_| {
                ctx.send(GameCommand::CombatAct {
                    ability_id: ability_id.clone(),
                    target: DecidedTarget::Actor,
                })
            });
            html! { <button key={key} disabled={!usable} {onclick}>{ ability.name.clone() }</button> }
        }) }
        <button onclick={on_done}>{"Done"}</button>
    </div>}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::*;
    use crate::model::{AbilityStatus, Energy};

    #[test]
    fn scratch_note_is_created_then_edited() {
        let path = player_folder(&PlayerId("alice".to_string()));
        assert_eq!(folder_path_to_string(&path), "/Players/alice");
        assert!(matches!(
            scratch_note_command(path.clone(), false, "hi"),
            GameCommand::CreateNote { note, .. } if note.name == "Scratch" && note.content == "hi"
        ));
        assert!(matches!(
            scratch_note_command(path, true, "hi"),
            GameCommand::EditNote { name, .. } if name == "Scratch"
        ));
    }

    #[test]
    fn only_self_targeted_abilities_are_offered() {
        let mut app = app();
        let ability = |name: &str, target, cost| Ability {
            name: name.to_string(),
            target,
            cost: Energy(cost),
            usable_ooc: false,
        };
        let game = &mut app.current_game;
        game.abilities.insert(AbilityId("rage".into()), ability("Rage", TargetSpec::Actor, 5));
        game.abilities.insert(AbilityId("stab".into()), ability("Stab", TargetSpec::Melee, 0));
        game.abilities.insert(AbilityId("nova".into()), ability("Nova", TargetSpec::Actor, 50));
        let alpha = game.creatures.get_mut(&cid(1)).unwrap();
        alpha.abilities = ["rage", "stab", "nova"]
            .iter()
            .map(|id| AbilityStatus {
                ability_id: AbilityId(id.to_string()),
                cooldown: 0,
            })
            .collect();

        let alpha = app.get_creature(&cid(1)).unwrap();
        let offered: Vec<(String, bool)> = actor_abilities(&app, alpha)
            .into_iter()
            .map(|(id, _, usable)| (id.0, usable))
            .collect();
        assert_eq!(
            offered,
            vec![("rage".to_string(), true), ("nova".to_string(), false)]
        );
    }
}
