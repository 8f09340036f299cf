use std::rc::Rc;
use yew::prelude::*;

use crate::grid::coords::ScreenRect;
use crate::host::CommandSink;
use crate::model::{App, CreatureId, PlayerId, Point3};

/// Who is looking at the grid. Players never see GM-only placements or specials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Viewer {
    Gm,
    Player(PlayerId),
}

impl Viewer {
    pub fn is_player(&self) -> bool {
        matches!(self, Viewer::Player(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveMenu {
    pub cid: CreatureId,
    pub rect: ScreenRect,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayAnnotation {
    pub pt: Point3,
    pub rect: ScreenRect,
}

/// Tiles a creature could be moved to, as offered on the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovementOptions {
    pub cid: CreatureId,
    pub options: Vec<Point3>,
}

/// Transient grid UI. At most one context menu is ever open.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridState {
    pub active_menu: Option<ActiveMenu>,
    pub display_annotation: Option<DisplayAnnotation>,
    pub movement_options: Option<MovementOptions>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Store {
    pub app: Rc<App>,
    pub viewer: Viewer,
    pub grid: GridState,
}

impl Store {
    pub fn new(app: Rc<App>, viewer: Viewer) -> Self {
        Self {
            app,
            viewer,
            grid: GridState::default(),
        }
    }
}

pub enum StoreAction {
    /// A fresh server snapshot. Any open menu or overlay refers to the old one.
    ReplaceApp(Rc<App>),
    SetViewer(Viewer),
    /// Clicking a creature opens its menu, clicking it again closes it.
    ActivateGridCreature { cid: CreatureId, rect: ScreenRect },
    CloseMenu,
    ToggleAnnotation { pt: Point3, rect: ScreenRect },
    DisplayMovementOptions(MovementOptions),
    ClearMovementOptions,
}

impl Reducible for Store {
    type Action = StoreAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use StoreAction::*;
        let mut new = (*self).clone();
        match action {
            ReplaceApp(app) => {
                if Rc::ptr_eq(&app, &self.app) {
                    return self;
                }
                new.app = app;
                new.grid = GridState::default();
            }
            SetViewer(viewer) => {
                if viewer == self.viewer {
                    return self;
                }
                new.viewer = viewer;
                new.grid = GridState::default();
            }
            ActivateGridCreature { cid, rect } => {
                new.grid.active_menu = match self.grid.active_menu {
                    Some(menu) if menu.cid == cid => None,
                    _ => Some(ActiveMenu { cid, rect }),
                };
            }
            CloseMenu => {
                if self.grid.active_menu.is_none() {
                    return self;
                }
                new.grid.active_menu = None;
            }
            ToggleAnnotation { pt, rect } => {
                new.grid.display_annotation = match self.grid.display_annotation {
                    Some(shown) if shown.pt == pt => None,
                    _ => Some(DisplayAnnotation { pt, rect }),
                };
            }
            DisplayMovementOptions(options) => {
                tracing::debug!(creature = %options.cid, count = options.options.len(), "showing movement options");
                new.grid.movement_options = Some(options);
            }
            ClearMovementOptions => {
                if self.grid.movement_options.is_none() {
                    return self;
                }
                new.grid.movement_options = None;
            }
        }
        Rc::new(new)
    }
}

/// Everything a component inside the game view needs: state to read and a way to talk to
/// the server.
#[derive(Clone, PartialEq)]
pub struct StoreContext {
    pub store: UseReducerHandle<Store>,
    pub commands: CommandSink,
}

impl StoreContext {
    pub fn dispatch(&self, action: StoreAction) {
        self.store.dispatch(action);
    }

    pub fn send(&self, cmd: crate::command::GameCommand) {
        self.commands.send(cmd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::coords::ScreenPoint;
    use crate::model::fixtures::*;

    fn store() -> Rc<Store> {
        Rc::new(Store::new(Rc::new(app()), Viewer::Gm))
    }

    fn rect_at(x: f64) -> ScreenRect {
        let p = ScreenPoint { x, y: 0.0 };
        ScreenRect { nw: p, ne: p, se: p, sw: p }
    }

    #[test]
    fn activating_another_creature_replaces_the_menu() {
        let s = store().reduce(StoreAction::ActivateGridCreature { cid: cid(1), rect: rect_at(1.0) });
        let s = s.reduce(StoreAction::ActivateGridCreature { cid: cid(2), rect: rect_at(2.0) });
        assert_eq!(
            s.grid.active_menu,
            Some(ActiveMenu { cid: cid(2), rect: rect_at(2.0) })
        );
    }

    #[test]
    fn activating_the_same_creature_toggles() {
        let s = store().reduce(StoreAction::ActivateGridCreature { cid: cid(1), rect: rect_at(1.0) });
        let s = s.reduce(StoreAction::ActivateGridCreature { cid: cid(1), rect: rect_at(5.0) });
        assert_eq!(s.grid.active_menu, None);
    }

    #[test]
    fn annotations_toggle_per_point() {
        let s = store().reduce(StoreAction::ToggleAnnotation { pt: (1, 1, 0), rect: rect_at(0.0) });
        assert_eq!(s.grid.display_annotation.map(|a| a.pt), Some((1, 1, 0)));
        let s = s.reduce(StoreAction::ToggleAnnotation { pt: (2, 1, 0), rect: rect_at(0.0) });
        assert_eq!(s.grid.display_annotation.map(|a| a.pt), Some((2, 1, 0)));
        let s = s.reduce(StoreAction::ToggleAnnotation { pt: (2, 1, 0), rect: rect_at(0.0) });
        assert_eq!(s.grid.display_annotation, None);
    }

    #[test]
    fn a_new_snapshot_clears_transient_grid_state() {
        let s = store()
            .reduce(StoreAction::ActivateGridCreature { cid: cid(1), rect: rect_at(1.0) })
            .reduce(StoreAction::DisplayMovementOptions(MovementOptions {
                cid: cid(1),
                options: vec![(1, 0, 0)],
            }));
        assert!(s.grid.movement_options.is_some());
        let s = s.reduce(StoreAction::ReplaceApp(Rc::new(app())));
        assert_eq!(s.grid, GridState::default());
    }

    #[test]
    fn replacing_with_the_same_snapshot_is_a_no_op() {
        let s = store().reduce(StoreAction::ActivateGridCreature { cid: cid(1), rect: rect_at(1.0) });
        let same = s.app.clone();
        let after = s.clone().reduce(StoreAction::ReplaceApp(same));
        assert!(Rc::ptr_eq(&s, &after));
    }

    #[test]
    fn closing_an_absent_menu_keeps_the_store() {
        let s = store();
        let after = s.clone().reduce(StoreAction::CloseMenu);
        assert!(Rc::ptr_eq(&s, &after));
    }
}
