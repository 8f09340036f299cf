//! Registration and the top-level player game view.

use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::app::StoreProvider;
use super::grid::Grid;
use super::sidebar::PlayerSideBar;
use crate::host::CommandSink;
use crate::model::{App, PlayerId};
use crate::settings::UiSettings;
use crate::state::{Session, SessionAction, StoreContext, Viewer};

#[derive(Properties, PartialEq, Clone)]
pub struct PlayerMainProps {
    pub app: Option<Rc<App>>,
    pub commands: CommandSink,
}

#[function_component]
pub fn PlayerMain(props: &PlayerMainProps) -> Html {
    let session = use_reducer(Session::default);
    let Some(app) = props.app.clone() else {
        return html! { <div>{"Waiting for initial data from server."}</div> };
    };

    match &*session {
        Session::Active { player_id } => html! {
            <StoreProvider
                {app}
                viewer={Viewer::Player(player_id.clone())}
                commands={props.commands.clone()}
            >
                <PlayerGameView player_id={player_id.clone()} />
            </StoreProvider>
        },
        Session::Choosing { typing } => {
            let mut known: Vec<&PlayerId> = app.players.keys().collect();
            known.sort();
            let on_type = {
                let session = session.clone();
                Callback::from(move |e: InputEvent| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    session.dispatch(SessionAction::Type(input.value()));
                })
            };
            let on_register = {
                let session = session.clone();
                let commands = props.commands.clone();
                Callback::from(move |_| {
                    if let Some(cmd) = session.registration() {
                        commands.send(cmd);
                        session.dispatch(SessionAction::Register);
                    }
                })
            };
            html! {<div>
                <h1>{"P&T"}</h1>
                <p>{"Welcome to P&T!"}</p>
                if !known.is_empty() {
                    <div>
                        <p>{"You can rejoin a session if you've already registered as a player."}</p>
                        { for known.into_iter().map(|pid| {
                            let session = session.clone();
                            let pick = pid.clone();
                            html! { <button key={pid.0.clone()}
                                onclick={Callback::from(move |_| session.dispatch(SessionAction::Pick(pick.clone())))}
                            >{ pid.0.clone() }</button> }
                        }) }
                    </div>
                }
                <p>{"You can register a new player. Enter your name (not your character's name) here:"}</p>
                <input type="text" value={typing.clone()} oninput={on_type} />
                <button onclick={on_register}>{"Register"}</button>
            </div>}
        }
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct PlayerGameViewProps {
    pub player_id: PlayerId,
}

#[function_component]
pub fn PlayerGameView(props: &PlayerGameViewProps) -> Html {
    let ctx = use_context::<StoreContext>();
    let settings = use_state(UiSettings::load);
    let Some(ctx) = ctx else {
        return html! {};
    };
    let Some(player) = ctx.store.app.get_player(&props.player_id) else {
        return html! { <div>{ format!("Couldn't find player {}", props.player_id) }</div> };
    };
    let grid = match player.scene {
        Some(scene_id) => html! { <Grid {scene_id} zoom_sensitivity={settings.zoom_sensitivity} /> },
        None => html! { <div>{"No scene loaded"}</div> },
    };

    html! {<div style="display:flex; justify-content:space-between; height:100%; width:100%;">
        { grid }
        <div style="width:450px; height:100%; border:1px solid black;">
            <PlayerSideBar player_id={props.player_id.clone()} current_scene={player.scene} />
        </div>
    </div>}
}
