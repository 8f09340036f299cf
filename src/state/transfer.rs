//! Giving items between creatures in the same scene.

use crate::command::GameCommand;
use crate::model::{App, Creature, CreatureId, Item, ItemId, SceneId, Visibility};
use crate::state::Viewer;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    #[error("You can only transfer items in a scene.")]
    NoScene,
    #[error("Couldn't find your scene")]
    SceneNotFound,
    #[error("There is nobody in this scene to give items to.")]
    NobodyToGiveTo,
    #[error("The Item definition cannot be found.")]
    ItemNotFound,
    #[error("Giver not found!")]
    GiverNotFound,
    #[error("{giver} does not have any {item} to give.")]
    NothingToGive { giver: String, item: String },
}

/// What the transfer form needs once every precondition holds.
#[derive(Clone, Debug, PartialEq)]
pub struct TransferContext<'a> {
    pub scene_id: SceneId,
    pub giver: &'a Creature,
    pub item: &'a Item,
    /// How many the giver holds; the form never offers more.
    pub available: u64,
    pub receivers: Vec<&'a Creature>,
}

pub fn prepare_transfer<'a>(
    app: &'a App,
    viewer: &Viewer,
    current_scene: Option<SceneId>,
    giver: CreatureId,
    item: ItemId,
) -> Result<TransferContext<'a>, TransferError> {
    let scene_id = current_scene.ok_or(TransferError::NoScene)?;
    let scene = app.get_scene(&scene_id).ok_or(TransferError::SceneNotFound)?;
    let player_view = viewer.is_player();
    let others: Vec<CreatureId> = scene
        .creatures
        .iter()
        .filter(|(cid, (_, vis))| {
            **cid != giver && !(player_view && *vis == Visibility::GmOnly)
        })
        .map(|(cid, _)| *cid)
        .collect();
    let receivers = app.get_creatures(&others);
    if receivers.is_empty() {
        return Err(TransferError::NobodyToGiveTo);
    }
    let item = app.get_item(&item).ok_or(TransferError::ItemNotFound)?;
    let giver = app.get_creature(&giver).ok_or(TransferError::GiverNotFound)?;
    let available = giver.inventory.get(&item.id).copied().unwrap_or(0);
    if available == 0 {
        return Err(TransferError::NothingToGive {
            giver: giver.name.clone(),
            item: item.name.clone(),
        });
    }
    Ok(TransferContext {
        scene_id,
        giver,
        item,
        available,
        receivers,
    })
}

/// Reads the quantity box. Empty clears the value, anything over `max` is capped, and input
/// that isn't a positive integer leaves `previous` alone.
pub fn parse_quantity(input: &str, max: u64, previous: Option<u64>) -> Option<u64> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    match input.parse::<u64>() {
        Ok(0) | Err(_) => previous,
        Ok(n) => Some(n.min(max)),
    }
}

pub fn can_submit(receiver: Option<CreatureId>, count: Option<u64>) -> bool {
    receiver.is_some() && count.is_some_and(|c| c > 0)
}

pub fn transfer_command(
    ctx: &TransferContext<'_>,
    receiver: Option<CreatureId>,
    count: Option<u64>,
) -> Option<GameCommand> {
    if !can_submit(receiver, count) {
        return None;
    }
    Some(GameCommand::TransferItem {
        scene_id: ctx.scene_id,
        from: ctx.giver.id,
        to: receiver?,
        item_id: ctx.item.id,
        count: count?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlayerId;
    use crate::model::fixtures::*;

    fn alice() -> Viewer {
        Viewer::Player(PlayerId("alice".to_string()))
    }

    #[test]
    fn needs_a_scene() {
        let app = app();
        assert_eq!(
            prepare_transfer(&app, &alice(), None, cid(1), iid(1)),
            Err(TransferError::NoScene)
        );
        let missing = SceneId(uuid::Uuid::from_u128(0xdead));
        let err = prepare_transfer(&app, &alice(), Some(missing), cid(1), iid(1)).unwrap_err();
        assert_eq!(err.to_string(), "Couldn't find your scene");
    }

    #[test]
    fn needs_someone_to_give_to() {
        let mut app = app();
        app.current_game
            .scenes
            .get_mut(&scene_id())
            .unwrap()
            .creatures
            .remove(&cid(2));
        let err = prepare_transfer(&app, &alice(), Some(scene_id()), cid(1), iid(1)).unwrap_err();
        assert_eq!(err.to_string(), "There is nobody in this scene to give items to.");
    }

    #[test]
    fn gm_only_creatures_are_not_offered_to_players() {
        let mut app = app();
        app.current_game
            .scenes
            .get_mut(&scene_id())
            .unwrap()
            .creatures
            .insert(cid(2), ((2, 2, 0), Visibility::GmOnly));
        assert_eq!(
            prepare_transfer(&app, &alice(), Some(scene_id()), cid(1), iid(1)),
            Err(TransferError::NobodyToGiveTo)
        );
        let ctx = prepare_transfer(&app, &Viewer::Gm, Some(scene_id()), cid(1), iid(1)).unwrap();
        assert_eq!(ctx.receivers.len(), 1);
    }

    #[test]
    fn item_and_giver_must_resolve() {
        let app = app();
        let err = prepare_transfer(&app, &alice(), Some(scene_id()), cid(1), iid(9)).unwrap_err();
        assert_eq!(err.to_string(), "The Item definition cannot be found.");

        let mut app = app;
        app.current_game.creatures.remove(&cid(1));
        app.current_game
            .scenes
            .get_mut(&scene_id())
            .unwrap()
            .creatures
            .insert(cid(3), ((1, 1, 0), Visibility::AllPlayers));
        let err = prepare_transfer(&app, &alice(), Some(scene_id()), cid(1), iid(1)).unwrap_err();
        assert_eq!(err.to_string(), "Giver not found!");
    }

    #[test]
    fn giver_must_hold_the_item() {
        let app = app();
        let err = prepare_transfer(&app, &alice(), Some(scene_id()), cid(2), iid(1)).unwrap_err();
        assert_eq!(err.to_string(), "Bravo does not have any Potion to give.");
    }

    #[test]
    fn a_valid_transfer_lists_receivers_and_stock() {
        let app = app();
        let ctx = prepare_transfer(&app, &alice(), Some(scene_id()), cid(1), iid(1)).unwrap();
        assert_eq!(ctx.available, 3);
        let names: Vec<&str> = ctx.receivers.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Bravo"]);
        assert_eq!(
            transfer_command(&ctx, Some(cid(2)), Some(2)),
            Some(GameCommand::TransferItem {
                scene_id: scene_id(),
                from: cid(1),
                to: cid(2),
                item_id: iid(1),
                count: 2,
            })
        );
        assert_eq!(transfer_command(&ctx, None, Some(2)), None);
    }

    #[test]
    fn quantity_input_rules() {
        assert_eq!(parse_quantity("5", 3, Some(1)), Some(3));
        assert_eq!(parse_quantity("2", 3, Some(1)), Some(2));
        assert_eq!(parse_quantity("", 3, Some(2)), None);
        assert_eq!(parse_quantity("0", 3, Some(2)), Some(2));
        assert_eq!(parse_quantity("abc", 3, Some(2)), Some(2));
        assert_eq!(parse_quantity("-4", 3, None), None);
    }

    #[test]
    fn submit_needs_receiver_and_positive_count() {
        assert!(can_submit(Some(cid(2)), Some(1)));
        assert!(!can_submit(None, Some(1)));
        assert!(!can_submit(Some(cid(2)), None));
        assert!(!can_submit(Some(cid(2)), Some(0)));
    }
}
