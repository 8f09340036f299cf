//! The embedding page's side of things: JS entry points in, commands out.

use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::command::GameCommand;
use crate::components::app::{PlayerMainRoot, PlayerMainRootProps, PlayerUiRoot, PlayerUiRootProps};
use crate::decode::decode_js;
use crate::model::{App, PlayerId, SceneId};

/// Fire-and-forget channel to the server. Delivery is the host's business.
#[derive(Clone)]
pub struct CommandSink(Rc<dyn Fn(GameCommand)>);

impl PartialEq for CommandSink {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl CommandSink {
    pub fn new(f: impl Fn(GameCommand) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn send(&self, cmd: GameCommand) {
        tracing::debug!(?cmd, "sending command");
        (self.0)(cmd);
    }

    /// Wraps a JS function that takes one plain-object command.
    pub fn from_host(host: js_sys::Function) -> Self {
        Self::new(move |cmd: GameCommand| {
            let serializer = serde_wasm_bindgen::Serializer::json_compatible();
            match cmd.serialize(&serializer) {
                Ok(value) => {
                    if let Err(err) = host.call1(&JsValue::NULL, &value) {
                        tracing::error!(?err, "host rejected command");
                    }
                }
                Err(err) => tracing::error!(%err, "could not serialize command"),
            }
        })
    }
}

fn mount_point(mount_id: &str) -> Result<Element, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(mount_id))
        .ok_or_else(|| JsValue::from_str(&format!("no element with id {mount_id}")))
}

fn decode_payload(payload: JsValue) -> Result<Rc<App>, JsValue> {
    decode_js(payload).map(Rc::new).map_err(|err| {
        tracing::error!(%err, "rejected game payload");
        JsValue::from_str(&err.to_string())
    })
}

thread_local! {
    /// Sidebars already mounted, by mount id. Re-rendering one updates it in place.
    static SIDEBARS: RefCell<HashMap<String, yew::AppHandle<PlayerUiRoot>>> = RefCell::new(HashMap::new());
}

/// Renders the player sidebar for a known player into `#mount_id`.
#[wasm_bindgen]
pub fn render_player_ui(
    host: js_sys::Function,
    mount_id: &str,
    player_id: String,
    current_scene: Option<String>,
    payload: JsValue,
) -> Result<(), JsValue> {
    let root = mount_point(mount_id)?;
    let app = decode_payload(payload)?;
    let current_scene = match current_scene {
        Some(raw) => Some(
            uuid::Uuid::parse_str(&raw)
                .map(SceneId)
                .map_err(|e| JsValue::from_str(&e.to_string()))?,
        ),
        None => None,
    };
    let player_id = PlayerId(player_id);
    if app.get_player(&player_id).is_none() {
        tracing::warn!(player = %player_id, "unknown player, nothing rendered");
        return Ok(());
    }
    let props = PlayerUiRootProps {
        app,
        player_id,
        current_scene,
        commands: CommandSink::from_host(host),
    };
    SIDEBARS.with(|sidebars| {
        let mut sidebars = sidebars.borrow_mut();
        match sidebars.get_mut(mount_id) {
            Some(handle) => handle.update(props),
            None => {
                tracing::info!(mount_id, player = %props.player_id, "mounting player sidebar");
                let handle = yew::Renderer::<PlayerUiRoot>::with_root_and_props(root, props).render();
                sidebars.insert(mount_id.to_string(), handle);
            }
        }
    });
    Ok(())
}

/// A mounted registration + game view. Feed it server pushes with `push_state`.
#[wasm_bindgen]
pub struct PlayerMainHandle {
    handle: yew::AppHandle<PlayerMainRoot>,
    commands: CommandSink,
}

#[wasm_bindgen]
impl PlayerMainHandle {
    pub fn push_state(&mut self, payload: JsValue) -> Result<(), JsValue> {
        let app = decode_payload(payload)?;
        self.handle.update(PlayerMainRootProps {
            app: Some(app),
            commands: self.commands.clone(),
        });
        Ok(())
    }
}

/// Mounts the full player view. `payload` may be null/undefined before the first push.
#[wasm_bindgen]
pub fn mount_player_main(
    host: js_sys::Function,
    mount_id: &str,
    payload: JsValue,
) -> Result<PlayerMainHandle, JsValue> {
    let root = mount_point(mount_id)?;
    let app = if payload.is_null() || payload.is_undefined() {
        None
    } else {
        Some(decode_payload(payload)?)
    };
    let commands = CommandSink::from_host(host);
    let props = PlayerMainRootProps {
        app,
        commands: commands.clone(),
    };
    tracing::info!(mount_id, "mounting player view");
    let handle = yew::Renderer::<PlayerMainRoot>::with_root_and_props(root, props).render();
    Ok(PlayerMainHandle { handle, commands })
}
