use std::rc::Rc;
use yew::prelude::*;

use super::player::PlayerMain;
use super::sidebar::PlayerSideBar;
use crate::host::CommandSink;
use crate::model::{App, PlayerId, SceneId};
use crate::state::{Store, StoreAction, StoreContext, Viewer};

#[derive(Properties, PartialEq, Clone)]
pub struct StoreProviderProps {
    pub app: Rc<App>,
    pub viewer: Viewer,
    pub commands: CommandSink,
    #[prop_or_default]
    pub children: Html,
}

/// Owns the store for everything below it. New snapshots arriving through props are fed in
/// as `ReplaceApp`.
#[function_component]
pub fn StoreProvider(props: &StoreProviderProps) -> Html {
    let store = use_reducer({
        let app = props.app.clone();
        let viewer = props.viewer.clone();
        move || Store::new(app, viewer)
    });
    {
        let store = store.clone();
        let app = props.app.clone();
        let viewer = props.viewer.clone();
        use_effect(move || {
            store.dispatch(StoreAction::ReplaceApp(app));
            store.dispatch(StoreAction::SetViewer(viewer));
            || ()
        });
    }
    let ctx = StoreContext {
        store,
        commands: props.commands.clone(),
    };
    html! { <ContextProvider<StoreContext> context={ctx}>{ props.children.clone() }</ContextProvider<StoreContext>> }
}

#[derive(Properties, PartialEq, Clone)]
pub struct PlayerUiRootProps {
    pub app: Rc<App>,
    pub player_id: PlayerId,
    pub current_scene: Option<SceneId>,
    pub commands: CommandSink,
}

/// Sidebar-only mount for a page that renders its own grid.
#[function_component]
pub fn PlayerUiRoot(props: &PlayerUiRootProps) -> Html {
    html! {<StoreProvider
        app={props.app.clone()}
        viewer={Viewer::Player(props.player_id.clone())}
        commands={props.commands.clone()}
    >
        <PlayerSideBar player_id={props.player_id.clone()} current_scene={props.current_scene} />
    </StoreProvider>}
}

#[derive(Properties, PartialEq, Clone)]
pub struct PlayerMainRootProps {
    /// `None` until the first server push.
    pub app: Option<Rc<App>>,
    pub commands: CommandSink,
}

#[function_component]
pub fn PlayerMainRoot(props: &PlayerMainRootProps) -> Html {
    html! { <div style="height:100%; width:100%;">
        <PlayerMain app={props.app.clone()} commands={props.commands.clone()} />
    </div> }
}
