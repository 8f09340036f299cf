//! Context-menu actions for creatures on the grid.

use std::rc::Rc;
use yew::Callback;

use super::movement::movement_options;
use super::store::{MovementOptions, Viewer};
use crate::model::{App, CreatureId, SceneId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("creature {0} not found")]
    CreatureNotFound(CreatureId),
    #[error("scene {0} not found")]
    SceneNotFound(SceneId),
    #[error("Couldn't find map")]
    MapNotFound,
    #[error("{0} is not in this scene")]
    NotInScene(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreatureActionKind {
    /// Free movement outside of combat.
    Walk,
    /// Movement during the creature's own combat turn.
    Move,
}

impl CreatureActionKind {
    pub fn name(self) -> &'static str {
        match self {
            CreatureActionKind::Walk => "Walk",
            CreatureActionKind::Move => "Move",
        }
    }
}

pub fn controls(app: &App, viewer: &Viewer, cid: &CreatureId) -> bool {
    match viewer {
        Viewer::Gm => true,
        Viewer::Player(pid) => app
            .get_player(pid)
            .is_some_and(|p| p.creatures.contains(cid)),
    }
}

/// What the viewer may do with `cid` right now.
pub fn creature_actions(app: &App, viewer: &Viewer, cid: CreatureId) -> Vec<CreatureActionKind> {
    if !controls(app, viewer, &cid) {
        return vec![];
    }
    match &app.current_game.current_combat {
        Some(combat) if combat.contains(&cid) => {
            if combat.current() == Some(cid) {
                vec![CreatureActionKind::Move]
            } else {
                vec![]
            }
        }
        _ => vec![CreatureActionKind::Walk],
    }
}

pub type ActionHandler = Rc<dyn Fn(&CreatureId) -> Result<(), ActionError>>;

#[derive(Clone)]
pub struct MenuAction {
    pub name: String,
    pub handler: ActionHandler,
}

impl PartialEq for MenuAction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Rc::ptr_eq(&self.handler, &other.handler)
    }
}

impl std::fmt::Debug for MenuAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuAction").field("name", &self.name).finish()
    }
}

/// Turns action kinds into runnable menu entries. Both movement actions compute the reachable
/// tiles and hand them to `show`.
pub fn bind_actions(
    app: Rc<App>,
    scene_id: SceneId,
    kinds: &[CreatureActionKind],
    show: Callback<MovementOptions>,
) -> Vec<MenuAction> {
    kinds
        .iter()
        .map(|kind| {
            let app = app.clone();
            let show = show.clone();
            let handler: ActionHandler = Rc::new(move |cid: &CreatureId| {
                let options = movement_options(&app, scene_id, *cid)?;
                show.emit(options);
                Ok(())
            });
            MenuAction {
                name: kind.name().to_string(),
                handler,
            }
        })
        .collect()
}

/// Runs the action, then closes the menu whether or not it worked.
pub fn invoke(action: &MenuAction, cid: &CreatureId, close: impl FnOnce()) -> Result<(), ActionError> {
    let result = (action.handler)(cid);
    close();
    if let Err(err) = &result {
        tracing::error!(action = %action.name, creature = %cid, %err, "creature action failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::*;
    use crate::model::{Combat, Distance, Initiative, PlayerId};
    use std::cell::RefCell;

    fn alice() -> Viewer {
        Viewer::Player(PlayerId("alice".to_string()))
    }

    fn combat(cursor: usize) -> Combat {
        Combat {
            scene: scene_id(),
            creatures: Initiative {
                cursor,
                data: vec![cid(1), cid(2)],
            },
            movement_used: Distance(0),
        }
    }

    #[test]
    fn players_only_act_for_their_own_creatures() {
        let app = app();
        assert_eq!(creature_actions(&app, &alice(), cid(1)), vec![CreatureActionKind::Walk]);
        assert!(creature_actions(&app, &alice(), cid(2)).is_empty());
        assert_eq!(creature_actions(&app, &Viewer::Gm, cid(2)), vec![CreatureActionKind::Walk]);
    }

    #[test]
    fn combatants_only_move_on_their_turn() {
        let mut app = app();
        app.current_game.current_combat = Some(combat(0));
        assert_eq!(creature_actions(&app, &alice(), cid(1)), vec![CreatureActionKind::Move]);
        app.current_game.current_combat = Some(combat(1));
        assert!(creature_actions(&app, &alice(), cid(1)).is_empty());
    }

    #[test]
    fn bound_actions_publish_movement_options() {
        let shown = Rc::new(RefCell::new(None));
        let show = {
            let shown = shown.clone();
            Callback::from(move |opts: MovementOptions| *shown.borrow_mut() = Some(opts))
        };
        let actions = bind_actions(Rc::new(app()), scene_id(), &[CreatureActionKind::Walk], show);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].name, "Walk");
        invoke(&actions[0], &cid(1), || {}).unwrap();
        assert_eq!(shown.borrow().as_ref().map(|o| o.cid), Some(cid(1)));
    }

    #[test]
    fn the_menu_closes_even_when_the_action_fails() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let action = {
            let log = log.clone();
            MenuAction {
                name: "Explode".to_string(),
                handler: Rc::new(move |_: &CreatureId| {
                    log.borrow_mut().push("handler");
                    Err(ActionError::MapNotFound)
                }),
            }
        };
        let closing = log.clone();
        let result = invoke(&action, &cid(1), move || closing.borrow_mut().push("close"));
        assert_eq!(result, Err(ActionError::MapNotFound));
        assert_eq!(*log.borrow(), vec!["handler", "close"]);
    }
}
