use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::actions::ActionError;
use super::store::MovementOptions;
use crate::command::GameCommand;
use crate::model::{App, CreatureId, Distance, Point3, SceneId, TileSystem};

const STRAIGHT_CM: u32 = 100;

fn diagonal_cm(system: TileSystem) -> u32 {
    match system {
        TileSystem::DnD => 100,
        TileSystem::Realistic => 141,
    }
}

const NEIGHBOURS: [(i16, i16); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Every terrain tile reachable from `origin` within `budget`. Occupied tiles can be walked
/// through but not stopped on. The result is sorted and never contains `origin`.
pub fn reachable_tiles(
    terrain: &[Point3],
    origin: Point3,
    budget: Distance,
    system: TileSystem,
    occupied: &HashSet<Point3>,
) -> Vec<Point3> {
    let open: HashSet<Point3> = terrain.iter().copied().collect();
    let diagonal = diagonal_cm(system);
    let mut best: HashMap<Point3, u32> = HashMap::from([(origin, 0)]);
    let mut queue = BinaryHeap::from([Reverse((0u32, origin))]);

    while let Some(Reverse((cost, pt))) = queue.pop() {
        if best.get(&pt).is_some_and(|b| *b < cost) {
            continue;
        }
        for (dx, dy) in NEIGHBOURS {
            let (Some(x), Some(y)) = (pt.0.checked_add(dx), pt.1.checked_add(dy)) else {
                continue;
            };
            let next = (x, y, pt.2);
            if !open.contains(&next) {
                continue;
            }
            let step = if dx != 0 && dy != 0 { diagonal } else { STRAIGHT_CM };
            let total = cost + step;
            if total > budget.0 {
                continue;
            }
            if best.get(&next).is_none_or(|b| total < *b) {
                best.insert(next, total);
                queue.push(Reverse((total, next)));
            }
        }
    }

    let mut out: Vec<Point3> = best
        .into_keys()
        .filter(|pt| *pt != origin && !occupied.contains(pt))
        .collect();
    out.sort();
    out
}

/// Where `cid` could go right now. In combat only the acting creature has a budget left over.
pub fn movement_options(
    app: &App,
    scene_id: SceneId,
    cid: CreatureId,
) -> Result<MovementOptions, ActionError> {
    let creature = app.get_creature(&cid).ok_or(ActionError::CreatureNotFound(cid))?;
    let scene = app.get_scene(&scene_id).ok_or(ActionError::SceneNotFound(scene_id))?;
    let map = app.get_map(&scene.map).ok_or(ActionError::MapNotFound)?;
    let origin = scene
        .get_pos(&cid)
        .ok_or_else(|| ActionError::NotInScene(creature.name.clone()))?;

    let budget = match &app.current_game.current_combat {
        Some(combat) if combat.scene == scene_id && combat.current() == Some(cid) => {
            creature.speed.saturating_sub(combat.movement_used)
        }
        _ => creature.speed,
    };
    if !creature.can_move {
        return Ok(MovementOptions {
            cid,
            options: vec![],
        });
    }

    let occupied: HashSet<Point3> = scene
        .creatures
        .iter()
        .filter(|(other, _)| **other != cid)
        .map(|(_, (pt, _))| *pt)
        .collect();
    let options = reachable_tiles(
        &map.terrain,
        origin,
        budget,
        app.current_game.tile_system,
        &occupied,
    );
    Ok(MovementOptions { cid, options })
}

pub fn move_command(app: &App, scene_id: SceneId, cid: CreatureId, dest: Point3) -> GameCommand {
    let in_turn = app
        .current_game
        .current_combat
        .as_ref()
        .is_some_and(|c| c.scene == scene_id && c.current() == Some(cid));
    if in_turn {
        GameCommand::PathCurrentCombatCreature { dest }
    } else {
        GameCommand::PathCreature {
            scene_id,
            creature_id: cid,
            dest,
        }
    }
}
