//! Game-state types as pushed by the P&T server.
//! The view layer treats all of this as immutable; lookups are pure helpers on `App`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use uuid::Uuid;

/// A position in meters. One grid tile per meter.
pub type Point3 = (i16, i16, i16);
/// An SVG-compatible color specifier.
pub type Color = String;
/// Path of folder names from the campaign root.
pub type FolderPath = Vec<String>;

macro_rules! uuid_id {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

uuid_id!(CreatureId);
uuid_id!(SceneId);
uuid_id!(MapId);
uuid_id!(ItemId);
string_id!(PlayerId);
string_id!(AbilityId);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hp(pub u8);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Energy(pub u8);

/// Distance in centimeters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distance(pub u32);

impl Distance {
    pub fn saturating_sub(self, other: Distance) -> Distance {
        Distance(self.0.saturating_sub(other.0))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dice {
    pub num: u8,
    pub size: u8,
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.size == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}d{}", self.num, self.size)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    ApplyCondition(ConditionDuration, Condition),
    Heal(Dice),
    Damage(Dice),
    MultiEffect(Vec<Effect>),
    GenerateEnergy(Energy),
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::ApplyCondition(_, _) => f.write_str("Condition"),
            Effect::Heal(dice) => write!(f, "Heal {dice}"),
            Effect::Damage(dice) => write!(f, "Damage {dice}"),
            Effect::MultiEffect(effects) => {
                let parts: Vec<String> = effects.iter().map(|e| e.to_string()).collect();
                f.write_str(&parts.join(", "))
            }
            Effect::GenerateEnergy(nrg) => write!(f, "Energy +{}", nrg.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    RecurringEffect(Box<Effect>),
    Dead,
    Incapacitated,
    AddDamageBuff(Hp),
    DoubleMaxMovement,
    ActivateAbility(AbilityId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionDuration {
    Interminate,
    Duration(u8),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCondition {
    pub remaining: ConditionDuration,
    pub condition: Condition,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetSpec {
    Melee,
    Range(Distance),
    Actor,
}

/// A target chosen at play time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecidedTarget {
    Melee(CreatureId),
    Range(CreatureId),
    Actor,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub target: TargetSpec,
    #[serde(default)]
    pub cost: Energy,
    #[serde(default)]
    pub usable_ooc: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityStatus {
    pub ability_id: AbilityId,
    #[serde(default)]
    pub cooldown: u8,
}

/// Creature class tag. Unknown names survive as `Custom` so GM-defined classes still resolve colors.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClassTag {
    Cleric,
    Rogue,
    Ranger,
    Creature,
    Baddie,
    Custom(String),
}

impl ClassTag {
    pub fn as_str(&self) -> &str {
        match self {
            ClassTag::Cleric => "cleric",
            ClassTag::Rogue => "rogue",
            ClassTag::Ranger => "ranger",
            ClassTag::Creature => "creature",
            ClassTag::Baddie => "baddie",
            ClassTag::Custom(name) => name,
        }
    }
}

impl From<String> for ClassTag {
    fn from(name: String) -> Self {
        match name.as_str() {
            "cleric" => ClassTag::Cleric,
            "rogue" => ClassTag::Rogue,
            "ranger" => ClassTag::Ranger,
            "creature" => ClassTag::Creature,
            "baddie" => ClassTag::Baddie,
            _ => ClassTag::Custom(name),
        }
    }
}

impl From<ClassTag> for String {
    fn from(tag: ClassTag) -> Self {
        tag.as_str().to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    #[serde(default)]
    pub abilities: Vec<AbilityId>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    pub color: Color,
}

/// Footprint in tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Aabb {
    pub x: u8,
    pub y: u8,
    pub z: u8,
}

impl Default for Aabb {
    fn default() -> Self {
        Self { x: 1, y: 1, z: 1 }
    }
}

fn yes() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    pub id: CreatureId,
    pub name: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub portrait_url: String,
    #[serde(default)]
    pub speed: Distance,
    #[serde(default)]
    pub max_energy: Energy,
    #[serde(default)]
    pub cur_energy: Energy,
    #[serde(default)]
    pub abilities: Vec<AbilityStatus>,
    pub class: ClassTag,
    #[serde(default)]
    pub max_health: Hp,
    #[serde(default)]
    pub cur_health: Hp,
    /// Keyed by the server's condition id, kept as the JSON key string.
    #[serde(default)]
    pub conditions: HashMap<String, AppliedCondition>,
    #[serde(default)]
    pub inventory: HashMap<ItemId, u64>,
    #[serde(default)]
    pub size: Aabb,
    #[serde(default = "yes")]
    pub can_act: bool,
    #[serde(default = "yes")]
    pub can_move: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    #[serde(rename = "GMOnly")]
    GmOnly,
    AllPlayers,
}

/// An annotated/colored map cell. Travels as a `(pos, color, note, visibility)` tuple.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    from = "(Point3, Color, String, Visibility)",
    into = "(Point3, Color, String, Visibility)"
)]
pub struct SpecialTile {
    pub pos: Point3,
    pub color: Color,
    pub note: String,
    pub visibility: Visibility,
}

impl From<(Point3, Color, String, Visibility)> for SpecialTile {
    fn from((pos, color, note, visibility): (Point3, Color, String, Visibility)) -> Self {
        Self { pos, color, note, visibility }
    }
}

impl From<SpecialTile> for (Point3, Color, String, Visibility) {
    fn from(s: SpecialTile) -> Self {
        (s.pos, s.color, s.note, s.visibility)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Map {
    pub id: MapId,
    pub name: String,
    pub terrain: Vec<Point3>,
    #[serde(default)]
    pub specials: Vec<SpecialTile>,
}

impl Map {
    pub fn special_at(&self, pt: Point3) -> Option<&SpecialTile> {
        self.specials.iter().find(|s| s.pos == pt)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub id: SceneId,
    pub name: String,
    pub map: MapId,
    #[serde(default)]
    pub creatures: HashMap<CreatureId, (Point3, Visibility)>,
}

impl Scene {
    pub fn get_pos(&self, cid: &CreatureId) -> Option<Point3> {
        self.creatures.get(cid).map(|(pt, _)| *pt)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: PlayerId,
    #[serde(default)]
    pub scene: Option<SceneId>,
    #[serde(default)]
    pub creatures: HashSet<CreatureId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
}

/// Initiative order plus the index of whoever is acting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Initiative {
    pub cursor: usize,
    pub data: Vec<CreatureId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combat {
    pub scene: SceneId,
    pub creatures: Initiative,
    #[serde(default)]
    pub movement_used: Distance,
}

impl Combat {
    pub fn current(&self) -> Option<CreatureId> {
        self.creatures.data.get(self.creatures.cursor).copied()
    }

    pub fn contains(&self, cid: &CreatureId) -> bool {
        self.creatures.data.contains(cid)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileSystem {
    /// Diagonal steps cost 1.41 tiles.
    #[default]
    Realistic,
    /// Diagonal steps cost 1 tile.
    DnD,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub name: String,
    pub content: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    #[serde(default)]
    pub notes: HashMap<String, Note>,
    #[serde(default)]
    pub children: HashMap<String, Folder>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    #[serde(default)]
    pub current_combat: Option<Combat>,
    #[serde(default)]
    pub abilities: HashMap<AbilityId, Ability>,
    #[serde(default, deserialize_with = "keyed")]
    pub creatures: HashMap<CreatureId, Creature>,
    #[serde(default, deserialize_with = "keyed")]
    pub maps: HashMap<MapId, Map>,
    #[serde(default)]
    pub classes: HashMap<String, Class>,
    #[serde(default, deserialize_with = "keyed")]
    pub scenes: HashMap<SceneId, Scene>,
    #[serde(default, deserialize_with = "keyed")]
    pub items: HashMap<ItemId, Item>,
    #[serde(default)]
    pub tile_system: TileSystem,
    #[serde(default)]
    pub campaign: Folder,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    pub current_game: Game,
    #[serde(default, deserialize_with = "keyed")]
    pub players: HashMap<PlayerId, Player>,
}

/// Entities that carry their own key.
pub trait Keyed {
    type Key: Eq + Hash + fmt::Display;
    fn key(&self) -> Self::Key;
}

impl Keyed for Creature {
    type Key = CreatureId;
    fn key(&self) -> CreatureId {
        self.id
    }
}

impl Keyed for Map {
    type Key = MapId;
    fn key(&self) -> MapId {
        self.id
    }
}

impl Keyed for Scene {
    type Key = SceneId;
    fn key(&self) -> SceneId {
        self.id
    }
}

impl Keyed for Item {
    type Key = ItemId;
    fn key(&self) -> ItemId {
        self.id
    }
}

impl Keyed for Player {
    type Key = PlayerId;
    fn key(&self) -> PlayerId {
        self.player_id.clone()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
#[serde(bound(deserialize = "K: Deserialize<'de> + Eq + Hash, V: Deserialize<'de>"))]
enum KeyedRepr<K, V> {
    List(Vec<V>),
    Map(HashMap<K, V>),
}

/// Accepts either a list of entities or an object keyed by id. Keys must agree with the
/// embedded ids, and ids must be unique.
fn keyed<'de, D, V>(deserializer: D) -> Result<HashMap<V::Key, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Keyed + Deserialize<'de>,
    V::Key: Deserialize<'de>,
{
    match KeyedRepr::<V::Key, V>::deserialize(deserializer)? {
        KeyedRepr::List(values) => {
            let mut out = HashMap::with_capacity(values.len());
            for v in values {
                let key = v.key();
                if out.contains_key(&key) {
                    return Err(D::Error::custom(format!("duplicate id {key}")));
                }
                out.insert(key, v);
            }
            Ok(out)
        }
        KeyedRepr::Map(map) => {
            if let Some((k, v)) = map.iter().find(|(k, v)| **k != v.key()) {
                return Err(D::Error::custom(format!(
                    "entry keyed {k} carries id {}",
                    v.key()
                )));
            }
            Ok(map)
        }
    }
}

pub const FALLBACK_CLASS_COLOR: &str = "red";

impl App {
    pub fn get_creature(&self, cid: &CreatureId) -> Option<&Creature> {
        self.current_game.creatures.get(cid)
    }

    /// Resolves the ids that exist, ordered by name. Missing ids are skipped.
    pub fn get_creatures<'a, 'b, I>(&'a self, cids: I) -> Vec<&'a Creature>
    where
        I: IntoIterator<Item = &'b CreatureId>,
    {
        let mut out: Vec<&Creature> = cids.into_iter().filter_map(|c| self.get_creature(c)).collect();
        out.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        out
    }

    pub fn get_item(&self, iid: &ItemId) -> Option<&Item> {
        self.current_game.items.get(iid)
    }

    /// Resolves the ids that exist, ordered by name.
    pub fn get_items<'a, 'b, I>(&'a self, iids: I) -> Vec<&'a Item>
    where
        I: IntoIterator<Item = &'b ItemId>,
    {
        let mut out: Vec<&Item> = iids.into_iter().filter_map(|i| self.get_item(i)).collect();
        out.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        out
    }

    pub fn get_scene(&self, sid: &SceneId) -> Option<&Scene> {
        self.current_game.scenes.get(sid)
    }

    pub fn get_map(&self, mid: &MapId) -> Option<&Map> {
        self.current_game.maps.get(mid)
    }

    pub fn get_player(&self, pid: &PlayerId) -> Option<&Player> {
        self.players.get(pid)
    }

    pub fn get_ability(&self, abid: &AbilityId) -> Option<&Ability> {
        self.current_game.abilities.get(abid)
    }

    pub fn class_color(&self, class: &ClassTag) -> &str {
        self.current_game
            .classes
            .get(class.as_str())
            .map(|c| c.color.as_str())
            .unwrap_or(FALLBACK_CLASS_COLOR)
    }

    pub fn folder_node(&self, path: &[String]) -> Option<&Folder> {
        path.iter()
            .try_fold(&self.current_game.campaign, |folder, name| folder.children.get(name))
    }

    pub fn current_combat_creature(&self) -> Option<CreatureId> {
        self.current_game.current_combat.as_ref().and_then(Combat::current)
    }
}

pub fn folder_path_to_string(path: &[String]) -> String {
    format!("/{}", path.join("/"))
}
