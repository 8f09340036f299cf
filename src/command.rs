//! Outbound commands. Fire-and-forget: confirmation only ever arrives as a later state push.

use serde::Serialize;

use crate::model::{
    AbilityId, CreatureId, DecidedTarget, FolderPath, ItemId, Note, PlayerId, Point3, SceneId,
};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "t")]
pub enum GameCommand {
    RegisterPlayer {
        player_id: PlayerId,
    },
    CreateNote {
        path: FolderPath,
        note: Note,
    },
    EditNote {
        path: FolderPath,
        name: String,
        note: Note,
    },
    /// Walk a creature to a point in a scene outside of its combat turn.
    PathCreature {
        scene_id: SceneId,
        creature_id: CreatureId,
        dest: Point3,
    },
    /// Walk whoever's turn it is.
    PathCurrentCombatCreature {
        dest: Point3,
    },
    TransferItem {
        scene_id: SceneId,
        from: CreatureId,
        to: CreatureId,
        item_id: ItemId,
        count: u64,
    },
    CombatAct {
        ability_id: AbilityId,
        target: DecidedTarget,
    },
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn commands_are_tagged_records() {
        let cmd = GameCommand::RegisterPlayer {
            player_id: PlayerId("alice".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({"t": "RegisterPlayer", "player_id": "alice"})
        );
        assert_eq!(serde_json::to_value(GameCommand::Done).unwrap(), json!({"t": "Done"}));
    }

    #[test]
    fn points_travel_as_arrays() {
        let cmd = GameCommand::PathCurrentCombatCreature { dest: (3, -1, 0) };
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({"t": "PathCurrentCombatCreature", "dest": [3, -1, 0]})
        );
    }
}
