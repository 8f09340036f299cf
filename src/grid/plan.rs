//! What the grid draws, as plain data. The SVG component is a straight walk over
//! `GridPlan::draw_list`, so everything about layering and visibility lives here.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::model::{Aabb, App, Creature, CreatureId, Map, MapId, Point3, Scene, SceneId, Visibility};
use crate::state::{MovementOptions, Viewer};

/// Side of one grid tile in SVG units.
pub const TILE: i32 = 100;

const TERRAIN_FILL: &str = "white";
const MOVEMENT_FILL: &str = "cyan";
/// Annotation glyphs are drawn large enough to read at the fitted zoom.
pub const ANNOTATION_FONT_SIZE: u32 = 100;

/// Why the grid has nothing to draw. The message is shown in place of the grid.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Couldn't find scene")]
    SceneNotFound(SceneId),
    #[error("Couldn't find map")]
    MapNotFound(MapId),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub fill: String,
}

pub fn tile_rect(fill: &str, pt: Point3, size: Aabb) -> TileRect {
    TileRect {
        x: pt.0 as i32 * TILE,
        y: pt.1 as i32 * TILE - TILE / 2,
        width: TILE as u32 * size.x as u32,
        height: TILE as u32 * size.y as u32,
        fill: fill.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CreatureToken {
    pub cid: CreatureId,
    pub pos: Point3,
    pub name: String,
    pub rect: TileRect,
    pub portrait: Option<String>,
}

impl CreatureToken {
    /// First four characters of the name, drawn on portrait-less tokens.
    pub fn short_name(&self) -> String {
        self.name.chars().take(4).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MovementTarget {
    pub cid: CreatureId,
    pub pt: Point3,
    pub rect: TileRect,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpecialMark {
    pub pt: Point3,
    pub rect: TileRect,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnnotationMark {
    pub pt: Point3,
    /// Transparent click target covering the tile.
    pub hit: TileRect,
    pub text_x: i32,
    pub text_y: i32,
    pub font_size: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridPlan {
    pub scene_id: SceneId,
    pub terrain: Vec<(Point3, TileRect)>,
    pub creatures: Vec<CreatureToken>,
    pub movement: Vec<MovementTarget>,
    pub specials: Vec<SpecialMark>,
    pub annotations: Vec<AnnotationMark>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOp<'a> {
    Terrain(Point3, &'a TileRect),
    CreatureImage(&'a CreatureToken),
    CreatureRect(&'a CreatureToken),
    MovementTarget(&'a MovementTarget),
    Special(&'a SpecialMark),
    Annotation(&'a AnnotationMark),
}

impl GridPlan {
    /// Every shape in paint order: terrain, creatures, movement targets, specials, annotations.
    pub fn draw_list(&self) -> Vec<DrawOp<'_>> {
        let mut ops = Vec::with_capacity(
            self.terrain.len()
                + self.creatures.len()
                + self.movement.len()
                + self.specials.len()
                + self.annotations.len(),
        );
        ops.extend(self.terrain.iter().map(|(pt, r)| DrawOp::Terrain(*pt, r)));
        ops.extend(self.creatures.iter().map(|c| {
            if c.portrait.is_some() {
                DrawOp::CreatureImage(c)
            } else {
                DrawOp::CreatureRect(c)
            }
        }));
        ops.extend(self.movement.iter().map(DrawOp::MovementTarget));
        ops.extend(self.specials.iter().map(DrawOp::Special));
        ops.extend(self.annotations.iter().map(DrawOp::Annotation));
        ops
    }
}

/// Hash over exactly the state the grid SVG depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridFingerprint(pub u64);

#[derive(Debug)]
pub struct PlacedCreature<'a> {
    pub creature: &'a Creature,
    pub pos: Point3,
    pub color: &'a str,
}

/// The slice of store state the grid renders from.
#[derive(Debug)]
pub struct GridInputs<'a> {
    pub scene: &'a Scene,
    pub map: &'a Map,
    pub creatures: Vec<PlacedCreature<'a>>,
    pub movement: Option<&'a MovementOptions>,
    pub player_view: bool,
}

impl<'a> GridInputs<'a> {
    /// Looks up the scene and its map, then gathers what the viewer may see.
    pub fn resolve(
        app: &'a App,
        scene_id: &SceneId,
        movement: Option<&'a MovementOptions>,
        viewer: &Viewer,
    ) -> Result<GridInputs<'a>, GridError> {
        let scene = app
            .get_scene(scene_id)
            .ok_or(GridError::SceneNotFound(*scene_id))?;
        let map = app
            .get_map(&scene.map)
            .ok_or(GridError::MapNotFound(scene.map))?;
        Ok(GridInputs::gather(app, scene, map, movement, viewer))
    }

    pub fn gather(
        app: &'a App,
        scene: &'a Scene,
        map: &'a Map,
        movement: Option<&'a MovementOptions>,
        viewer: &Viewer,
    ) -> GridInputs<'a> {
        let player_view = viewer.is_player();
        let mut creatures: Vec<PlacedCreature<'a>> = scene
            .creatures
            .iter()
            .filter(|(_, (_, vis))| !(player_view && *vis == Visibility::GmOnly))
            .filter_map(|(cid, (pos, _))| {
                let creature = app.get_creature(cid)?;
                Some(PlacedCreature {
                    creature,
                    pos: *pos,
                    color: app.class_color(&creature.class),
                })
            })
            .collect();
        creatures.sort_by_key(|c| c.creature.id);
        GridInputs {
            scene,
            map,
            creatures,
            movement,
            player_view,
        }
    }

    pub fn fingerprint(&self) -> GridFingerprint {
        let mut h = DefaultHasher::new();
        self.scene.id.hash(&mut h);
        self.map.id.hash(&mut h);
        self.map.terrain.hash(&mut h);
        self.map.specials.hash(&mut h);
        self.player_view.hash(&mut h);
        self.creatures.len().hash(&mut h);
        for c in &self.creatures {
            c.creature.id.hash(&mut h);
            c.pos.hash(&mut h);
            c.creature.name.hash(&mut h);
            c.creature.portrait_url.hash(&mut h);
            c.creature.size.hash(&mut h);
            c.color.hash(&mut h);
        }
        match self.movement {
            Some(m) => {
                true.hash(&mut h);
                m.cid.hash(&mut h);
                m.options.hash(&mut h);
            }
            None => false.hash(&mut h),
        }
        GridFingerprint(h.finish())
    }

    fn visible(&self, vis: Visibility) -> bool {
        !(self.player_view && vis == Visibility::GmOnly)
    }

    pub fn plan(&self) -> GridPlan {
        let terrain = self
            .map
            .terrain
            .iter()
            .map(|pt| (*pt, tile_rect(TERRAIN_FILL, *pt, Aabb::default())))
            .collect();
        let creatures = self
            .creatures
            .iter()
            .map(|c| {
                let portrait = Some(c.creature.portrait_url.clone()).filter(|p| !p.is_empty());
                let fill = if portrait.is_some() { "white" } else { c.color };
                CreatureToken {
                    cid: c.creature.id,
                    pos: c.pos,
                    name: c.creature.name.clone(),
                    rect: tile_rect(fill, c.pos, c.creature.size),
                    portrait,
                }
            })
            .collect();
        let movement = self
            .movement
            .map(|m| {
                m.options
                    .iter()
                    .map(|pt| MovementTarget {
                        cid: m.cid,
                        pt: *pt,
                        rect: tile_rect(MOVEMENT_FILL, *pt, Aabb::default()),
                    })
                    .collect()
            })
            .unwrap_or_default();
        let specials = self
            .map
            .specials
            .iter()
            .filter(|s| self.visible(s.visibility))
            .map(|s| SpecialMark {
                pt: s.pos,
                rect: tile_rect(&s.color, s.pos, Aabb::default()),
            })
            .collect();
        let annotations = self
            .map
            .specials
            .iter()
            .filter(|s| !s.note.is_empty() && self.visible(s.visibility))
            .map(|s| AnnotationMark {
                pt: s.pos,
                hit: tile_rect("none", s.pos, Aabb::default()),
                text_x: s.pos.0 as i32 * TILE + TILE / 4,
                text_y: s.pos.1 as i32 * TILE + TILE / 2,
                font_size: ANNOTATION_FONT_SIZE,
            })
            .collect();
        GridPlan {
            scene_id: self.scene.id,
            terrain,
            creatures,
            movement,
            specials,
            annotations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::*;
    use crate::model::{Class, PlayerId, SpecialTile};
    use std::collections::HashMap;

    fn player() -> Viewer {
        Viewer::Player(PlayerId("alice".to_string()))
    }

    fn plan_for(app: &App, movement: Option<&MovementOptions>, viewer: &Viewer) -> GridPlan {
        GridInputs::resolve(app, &scene_id(), movement, viewer).unwrap().plan()
    }

    fn fingerprint_for(app: &App, movement: Option<&MovementOptions>) -> GridFingerprint {
        let scene = app.get_scene(&scene_id()).unwrap();
        let map = app.get_map(&scene.map).unwrap();
        GridInputs::gather(app, scene, map, movement, &player()).fingerprint()
    }

    #[test]
    fn single_tile_single_creature_draws_terrain_then_creature() {
        let mut app = app();
        let game = &mut app.current_game;
        game.maps.get_mut(&map_id()).unwrap().terrain = vec![(0, 0, 0)];
        let scene = game.scenes.get_mut(&scene_id()).unwrap();
        scene.creatures = HashMap::from([(cid(3), ((0, 0, 0), Visibility::AllPlayers))]);
        game.creatures.insert(cid(3), creature(3, "Blueberry", "ranger"));
        game.classes.insert(
            "ranger".to_string(),
            Class {
                abilities: vec![],
                conditions: vec![],
                color: "blue".to_string(),
            },
        );

        let plan = plan_for(&app, None, &player());
        let ops = plan.draw_list();
        assert_eq!(ops.len(), 2);
        match ops[0] {
            DrawOp::Terrain(pt, rect) => {
                assert_eq!(pt, (0, 0, 0));
                assert_eq!(rect.fill, "white");
                assert_eq!((rect.x, rect.y, rect.width, rect.height), (0, -50, 100, 100));
            }
            other => panic!("expected terrain first, got {other:?}"),
        }
        match ops[1] {
            DrawOp::CreatureRect(token) => {
                assert_eq!(token.rect.fill, "blue");
                assert_eq!(token.short_name(), "Blue");
            }
            other => panic!("expected a creature rect, got {other:?}"),
        }
    }

    #[test]
    fn portraits_draw_images_and_unknown_classes_fall_back() {
        let mut app = app();
        app.current_game.creatures.get_mut(&cid(1)).unwrap().portrait_url =
            "http://example.com/rook.png".to_string();
        let plan = plan_for(&app, None, &player());
        let alpha = plan.creatures.iter().find(|c| c.cid == cid(1)).unwrap();
        assert!(matches!(
            plan.draw_list().iter().find(|op| matches!(op, DrawOp::CreatureImage(_))),
            Some(DrawOp::CreatureImage(t)) if t.cid == cid(1)
        ));
        assert_eq!(alpha.rect.fill, "white");
        let bravo = plan.creatures.iter().find(|c| c.cid == cid(2)).unwrap();
        assert_eq!(bravo.rect.fill, crate::model::FALLBACK_CLASS_COLOR);
    }

    #[test]
    fn creature_size_scales_the_token() {
        let mut app = app();
        app.current_game.creatures.get_mut(&cid(2)).unwrap().size = Aabb { x: 2, y: 3, z: 1 };
        let plan = plan_for(&app, None, &player());
        let bravo = plan.creatures.iter().find(|c| c.cid == cid(2)).unwrap();
        assert_eq!((bravo.rect.width, bravo.rect.height), (200, 300));
        assert_eq!((bravo.rect.x, bravo.rect.y), (200, 150));
    }

    #[test]
    fn gm_only_specials_and_placements_are_hidden_from_players() {
        let mut app = app();
        app.current_game.maps.get_mut(&map_id()).unwrap().specials = vec![
            SpecialTile {
                pos: (1, 1, 0),
                color: "red".to_string(),
                note: "secret".to_string(),
                visibility: Visibility::GmOnly,
            },
            SpecialTile {
                pos: (2, 0, 0),
                color: "yellow".to_string(),
                note: "".to_string(),
                visibility: Visibility::AllPlayers,
            },
        ];
        app.current_game
            .scenes
            .get_mut(&scene_id())
            .unwrap()
            .creatures
            .insert(cid(2), ((2, 2, 0), Visibility::GmOnly));

        let as_player = plan_for(&app, None, &player());
        assert_eq!(as_player.specials.len(), 1);
        assert_eq!(as_player.specials[0].rect.fill, "yellow");
        assert!(as_player.annotations.is_empty());
        assert_eq!(as_player.creatures.len(), 1);

        let as_gm = plan_for(&app, None, &Viewer::Gm);
        assert_eq!(as_gm.specials.len(), 2);
        assert_eq!(as_gm.annotations.len(), 1);
        assert_eq!(as_gm.annotations[0].text_x, 125);
        assert_eq!(as_gm.annotations[0].font_size, 100);
        assert_eq!(as_gm.creatures.len(), 2);
    }

    #[test]
    fn unknown_scene_is_reported() {
        let app = app();
        let missing = SceneId(uuid::Uuid::from_u128(0x2999));
        let err = GridInputs::resolve(&app, &missing, None, &player()).unwrap_err();
        assert_eq!(err, GridError::SceneNotFound(missing));
        assert_eq!(err.to_string(), "Couldn't find scene");
    }

    #[test]
    fn scene_with_an_unknown_map_is_reported() {
        let mut app = app();
        app.current_game.maps.remove(&map_id());
        let err = GridInputs::resolve(&app, &scene_id(), None, &player()).unwrap_err();
        assert_eq!(err, GridError::MapNotFound(map_id()));
        assert_eq!(err.to_string(), "Couldn't find map");
    }

    #[test]
    fn movement_targets_only_appear_with_options() {
        let app = app();
        assert!(plan_for(&app, None, &player()).movement.is_empty());
        let options = MovementOptions {
            cid: cid(1),
            options: vec![(1, 0, 0), (0, 1, 0)],
        };
        let plan = plan_for(&app, Some(&options), &player());
        assert_eq!(plan.movement.len(), 2);
        assert!(plan.movement.iter().all(|m| m.rect.fill == "cyan"));
        // layered after creatures, before specials
        let ops = plan.draw_list();
        let first_move = ops.iter().position(|op| matches!(op, DrawOp::MovementTarget(_)));
        let last_creature = ops.iter().rposition(|op| matches!(op, DrawOp::CreatureRect(_)));
        assert!(last_creature < first_move);
    }

    #[test]
    fn fingerprint_ignores_state_the_grid_does_not_draw() {
        let app1 = app();
        let mut app2 = app1.clone();
        let alpha = app2.current_game.creatures.get_mut(&cid(1)).unwrap();
        alpha.note = "feeling lucky".to_string();
        alpha.cur_health = crate::model::Hp(1);
        alpha.inventory.clear();
        assert_eq!(fingerprint_for(&app1, None), fingerprint_for(&app2, None));
    }

    #[test]
    fn fingerprint_tracks_positions_and_movement_options() {
        let app1 = app();
        let mut app2 = app1.clone();
        app2.current_game
            .scenes
            .get_mut(&scene_id())
            .unwrap()
            .creatures
            .insert(cid(1), ((1, 0, 0), Visibility::AllPlayers));
        assert_ne!(fingerprint_for(&app1, None), fingerprint_for(&app2, None));

        let options = MovementOptions {
            cid: cid(1),
            options: vec![(1, 0, 0)],
        };
        assert_ne!(
            fingerprint_for(&app1, None),
            fingerprint_for(&app1, Some(&options))
        );
    }
}
