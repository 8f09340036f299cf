//! Turns a server push into a typed `App`, or says why it couldn't.

use wasm_bindgen::JsValue;

use crate::model::App;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("game payload did not match the expected shape: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("game payload could not be read from JS: {0}")]
    Js(String),
}

pub fn decode_value(value: serde_json::Value) -> Result<App, DecodeError> {
    let app: App = serde_json::from_value(value)?;
    Ok(normalize(app))
}

pub fn decode_str(raw: &str) -> Result<App, DecodeError> {
    let app: App = serde_json::from_str(raw)?;
    Ok(normalize(app))
}

pub fn decode_js(value: JsValue) -> Result<App, DecodeError> {
    // Strings are accepted too so hosts can hand over the raw websocket frame.
    if let Some(raw) = value.as_string() {
        return decode_str(&raw);
    }
    let app: App =
        serde_wasm_bindgen::from_value(value).map_err(|e| DecodeError::Js(e.to_string()))?;
    Ok(normalize(app))
}

/// Inventory counts are positive or absent.
fn normalize(mut app: App) -> App {
    for creature in app.current_game.creatures.values_mut() {
        let before = creature.inventory.len();
        creature.inventory.retain(|_, count| *count > 0);
        if creature.inventory.len() != before {
            tracing::debug!(creature = %creature.id, "dropped empty inventory entries");
        }
    }
    app
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassTag, CreatureId, Visibility};
    use serde_json::json;
    use uuid::Uuid;

    const C1: &str = "00000000-0000-0000-0000-000000000001";
    const S1: &str = "00000000-0000-0000-0000-000000000003";
    const M1: &str = "00000000-0000-0000-0000-000000000004";
    const I1: &str = "00000000-0000-0000-0000-000000000005";

    fn payload() -> serde_json::Value {
        json!({
            "current_game": {
                "current_combat": null,
                "abilities": {},
                "creatures": {
                    C1: {
                        "id": C1, "name": "Rook", "class": "rogue", "portrait_url": "",
                        "speed": 1000, "max_energy": 10, "cur_energy": 10, "abilities": [],
                        "max_health": 10, "cur_health": 10, "conditions": {"0": {"remaining": "Interminate", "condition": "Dead"}},
                        "inventory": {I1: 2}
                    }
                },
                "maps": [{"id": M1, "name": "Cellar", "terrain": [[0,0,0]], "specials": [[[0,0,0], "red", "", "GMOnly"]]}],
                "classes": {"rogue": {"abilities": [], "conditions": [], "color": "green"}},
                "scenes": [{"id": S1, "name": "Tavern", "map": M1, "creatures": {C1: [[0,0,0], "AllPlayers"]}}],
                "items": [{"id": I1, "name": "Rope"}],
                "tile_system": "DnD",
                "snapshots": []
            },
            "players": [{"player_id": "alice", "scene": S1, "creatures": [C1]}]
        })
    }

    #[test]
    fn decodes_a_full_payload() {
        let app = decode_value(payload()).unwrap();
        let cid = CreatureId(Uuid::parse_str(C1).unwrap());
        let creature = app.get_creature(&cid).unwrap();
        assert_eq!(creature.class, ClassTag::Rogue);
        assert_eq!(creature.conditions.len(), 1);
        let scene = app.current_game.scenes.values().next().unwrap();
        assert_eq!(scene.creatures[&cid].1, Visibility::AllPlayers);
        assert_eq!(app.players.len(), 1);
    }

    #[test]
    fn zero_inventory_counts_are_dropped() {
        let mut raw = payload();
        raw["current_game"]["creatures"][C1]["inventory"][I1] = json!(0);
        let app = decode_value(raw).unwrap();
        let cid = CreatureId(Uuid::parse_str(C1).unwrap());
        assert!(app.get_creature(&cid).unwrap().inventory.is_empty());
    }

    #[test]
    fn mismatched_keys_are_rejected() {
        let mut raw = payload();
        raw["current_game"]["creatures"][C1]["id"] = json!(S1);
        assert!(matches!(decode_value(raw), Err(DecodeError::Shape(_))));
    }

    #[test]
    fn duplicate_ids_in_lists_are_rejected() {
        let mut raw = payload();
        let item = raw["current_game"]["items"][0].clone();
        raw["current_game"]["items"].as_array_mut().unwrap().push(item);
        assert!(decode_value(raw).is_err());
    }

    #[test]
    fn arbitrary_shapes_fail_to_decode() {
        assert!(decode_value(json!({"hello": "world"})).is_err());
        assert!(decode_str("[1, 2, 3]").is_err());
    }
}
