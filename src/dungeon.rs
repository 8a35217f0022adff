//! Whole-zone assembly: base tiles, terrain, population, quest injection,
//! region emission, and bidirectional door linking between zones.

use crate::dungeon_tile::DungeonTileGenerator;
use crate::error::{GeneratorError, Result};
use crate::external::{EntityId, EntityStore, QuestProvider, ResourceKind, ResourceResolver};
use crate::geom::{Point, Rectangle};
use crate::rng::RandomSource;
use crate::terrain::{TerrainCell, TerrainGrid};
use crate::theme::{DungeonTheme, ZoneTheme};

/// A contiguous same-base run of terrain, emitted to the host Zone.
#[derive(Debug, Clone)]
pub struct Region {
    pub terrain_base: String,
    pub bounds: Rectangle,
    pub z_layer: u8,
}

/// An entity produced (not owned) by the generator: a perimeter tile that
/// transports the player to another zone. `destination_zone_index` is
/// `None` for a terminal door (e.g. a town house door before the caller
/// links it).
#[derive(Debug, Clone)]
pub struct Door {
    pub uid: EntityId,
    pub position: Point,
    pub destination_zone_index: Option<u32>,
    pub destination_position: Option<Point>,
}

/// Everything `DungeonGenerator::generate` hands back for one zone.
#[derive(Debug, Clone)]
pub struct GeneratedZone {
    pub terrain: TerrainGrid,
    pub regions: Vec<Region>,
    pub doors: Vec<Door>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DungeonGenerator;

impl DungeonGenerator {
    /// `entry_door` is the door in `previous_zone` that led here; it is
    /// mutated in place once the return door is known (step 9, spec.md
    /// §4.10). `zone_index` is the zone being generated; `previous_zone_index`
    /// names the zone `entry_door` lives in.
    #[allow(clippy::too_many_arguments)]
    pub fn generate(
        &self,
        rng: &mut RandomSource,
        entry_door: &mut Door,
        zone_index: u32,
        previous_zone_index: u32,
        theme: &ZoneTheme,
        dungeon_theme: &DungeonTheme,
        entities: &mut dyn EntityStore,
        resolver: &dyn ResourceResolver,
        quest: &mut dyn QuestProvider,
    ) -> Result<GeneratedZone> {
        let w = rng.next_int(theme.min as i32, theme.max as i32);
        let h = rng.next_int(theme.min as i32, theme.max as i32);

        let grid = DungeonTileGenerator.generate_base_tiles(rng, theme.zone_type, w, h);
        if grid.find_first_walkable().is_none() {
            return Err(GeneratorError::DegenerateGeneration);
        }

        let mut terrain = DungeonTileGenerator.tiles_to_terrain(rng, &grid, theme);
        DungeonTileGenerator.populate_with_theme(rng, &mut terrain, theme);

        inject_quest(rng, &mut terrain, quest, resolver);

        let mut doors = place_doors(rng, &mut terrain, &grid, theme, dungeon_theme, zone_index, entities);

        let Some(return_door) = doors.iter_mut().find(|d| d.destination_zone_index == Some(previous_zone_index)) else {
            return Err(GeneratorError::MissingReturnDoor);
        };
        entry_door.destination_position = Some(return_door.position);
        return_door.destination_position = Some(entry_door.position);

        // Regions are emitted last so the door tiles `place_doors` just
        // carved are covered by the partition too (step 7, spec.md §4.10).
        let regions = emit_regions(&terrain);

        Ok(GeneratedZone { terrain, regions, doors })
    }
}

fn inject_quest(rng: &mut RandomSource, terrain: &mut TerrainGrid, quest: &mut dyn QuestProvider, resolver: &dyn ResourceResolver) {
    let Some(id) = quest.next_requested_object() else {
        return;
    };
    let kind = resolver.classify(&id);
    if kind == ResourceKind::Unknown {
        tracing::warn!(id, "quest object id did not resolve to a creature or item; skipping placement");
        return;
    }
    let walkable: Vec<(i32, i32)> = terrain
        .iter()
        .filter(|(_, _, c)| c.is_some())
        .map(|(x, y, _)| (x as i32, y as i32))
        .collect();
    let Some(&(x, y)) = rng.pick(&walkable) else {
        return;
    };
    if let Some(Some(cell)) = terrain.get_mut(x, y) {
        match kind {
            ResourceKind::Creature => cell.creature = Some(id),
            _ => cell.item = Some(id),
        }
    }
}

/// One Region per 4-connected same-base run; `bounds` is that run's
/// bounding box (the exact partition shape is implementation-free per
/// spec.md §4.10 step 7).
fn emit_regions(terrain: &TerrainGrid) -> Vec<Region> {
    let w = terrain.width();
    let h = terrain.height();
    let mut visited = vec![false; w * h];
    let mut regions = Vec::new();

    for y in 0..h {
        for x in 0..w {
            if visited[y * w + x] {
                continue;
            }
            let Some(cell) = terrain.get(x as i32, y as i32) else {
                visited[y * w + x] = true;
                continue;
            };
            let base = cell.base.clone();
            let mut stack = vec![(x, y)];
            visited[y * w + x] = true;
            let (mut min_x, mut min_y, mut max_x, mut max_y) = (x, y, x, y);
            let mut count = 0usize;
            while let Some((cx, cy)) = stack.pop() {
                count += 1;
                min_x = min_x.min(cx);
                min_y = min_y.min(cy);
                max_x = max_x.max(cx);
                max_y = max_y.max(cy);
                for (dx, dy) in [(-1i32, 0i32), (1, 0), (0, -1), (0, 1)] {
                    let (nx, ny) = (cx as i32 + dx, cy as i32 + dy);
                    if nx < 0 || ny < 0 || nx as usize >= w || ny as usize >= h {
                        continue;
                    }
                    let (nx, ny) = (nx as usize, ny as usize);
                    if visited[ny * w + nx] {
                        continue;
                    }
                    if terrain.get(nx as i32, ny as i32).is_some_and(|c| c.base == base) {
                        visited[ny * w + nx] = true;
                        stack.push((nx, ny));
                    }
                }
            }
            if count > 0 {
                regions.push(Region {
                    terrain_base: base,
                    bounds: Rectangle::new(min_x as i32, min_y as i32, (max_x - min_x + 1) as i32, (max_y - min_y + 1) as i32),
                    z_layer: 0,
                });
            }
        }
    }
    regions
}

fn place_doors(
    rng: &mut RandomSource,
    terrain: &mut TerrainGrid,
    grid: &crate::grid::TileGrid,
    theme: &ZoneTheme,
    dungeon_theme: &DungeonTheme,
    zone_index: u32,
    entities: &mut dyn EntityStore,
) -> Vec<Door> {
    let neighbors: Vec<u32> = dungeon_theme
        .connections
        .iter()
        .filter_map(|&(from, to)| {
            if from == zone_index {
                Some(to)
            } else if to == zone_index {
                Some(from)
            } else {
                None
            }
        })
        .collect();

    let mut candidates = border_door_sites(grid);
    rng.shuffle(&mut candidates);

    let mut doors = Vec::new();
    for neighbor in neighbors {
        let Some(position) = candidates.pop() else {
            break;
        };
        terrain.set(position.x, position.y, Some(TerrainCell::new(theme.doors.clone())));
        doors.push(Door {
            uid: entities.new_entity_uid(),
            position,
            destination_zone_index: Some(neighbor),
            destination_position: None,
        });
    }
    doors
}

fn border_door_sites(grid: &crate::grid::TileGrid) -> Vec<Point> {
    let (w, h) = (grid.width() as i32, grid.height() as i32);
    let mut sites = Vec::new();
    for x in 1..w - 1 {
        if grid[(x, 1)].is_walkable() {
            sites.push(Point::new(x, 0));
        }
        if grid[(x, h - 2)].is_walkable() {
            sites.push(Point::new(x, h - 1));
        }
    }
    for y in 1..h - 1 {
        if grid[(1, y)].is_walkable() {
            sites.push(Point::new(0, y));
        }
        if grid[(w - 2, y)].is_walkable() {
            sites.push(Point::new(w - 1, y));
        }
    }
    sites
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::{MockEntityStore, MockQuestProvider, MockResourceResolver};
    use crate::theme::DungeonType;
    use std::collections::BTreeMap;

    fn sample_theme() -> ZoneTheme {
        ZoneTheme {
            id: "cave1".into(),
            zone_type: DungeonType::Cave,
            min: 25,
            max: 35,
            floor: vec!["dirt".into()],
            walls: "stone".into(),
            doors: "wood_door".into(),
            creatures: BTreeMap::new(),
            items: BTreeMap::new(),
        }
    }

    #[test]
    fn generate_links_return_door_bidirectionally() {
        let mut rng = RandomSource::with_seed(42);
        let theme = sample_theme();
        let dungeon_theme = DungeonTheme {
            id: "d1".into(),
            zone_themes: vec!["cave1".into()],
            connections: vec![(0, 1)],
        };
        let mut entry_door = Door {
            uid: 1,
            position: Point::new(25, 25),
            destination_zone_index: Some(1),
            destination_position: None,
        };
        let mut entities = MockEntityStore::default();
        let resolver = MockResourceResolver::default();
        let mut quest = MockQuestProvider::default();

        let zone = DungeonGenerator
            .generate(&mut rng, &mut entry_door, 1, 0, &theme, &dungeon_theme, &mut entities, &resolver, &mut quest)
            .expect("generation should succeed");

        let return_door = zone.doors.iter().find(|d| d.destination_zone_index == Some(0)).expect("return door present");
        assert_eq!(entry_door.destination_position, Some(return_door.position));
        assert_eq!(return_door.destination_position, Some(entry_door.position));
    }

    /// Regions must partition every walkable tile exactly (step 7, spec.md
    /// §4.10), including the door tiles `place_doors` carves — so regions
    /// have to be emitted after doors, not before.
    #[test]
    fn every_door_tile_is_covered_by_some_region() {
        let mut rng = RandomSource::with_seed(42);
        let theme = sample_theme();
        let dungeon_theme = DungeonTheme {
            id: "d1".into(),
            zone_themes: vec!["cave1".into()],
            connections: vec![(0, 1)],
        };
        let mut entry_door = Door {
            uid: 1,
            position: Point::new(25, 25),
            destination_zone_index: Some(1),
            destination_position: None,
        };
        let mut entities = MockEntityStore::default();
        let resolver = MockResourceResolver::default();
        let mut quest = MockQuestProvider::default();

        let zone = DungeonGenerator
            .generate(&mut rng, &mut entry_door, 1, 0, &theme, &dungeon_theme, &mut entities, &resolver, &mut quest)
            .expect("generation should succeed");

        for door in &zone.doors {
            assert!(
                zone.regions.iter().any(|r| r.bounds.contains_point(door.position)),
                "door at {:?} not covered by any emitted region",
                door.position
            );
        }
    }

    #[test]
    fn missing_connection_back_is_an_error() {
        let mut rng = RandomSource::with_seed(1);
        let theme = sample_theme();
        let dungeon_theme = DungeonTheme {
            id: "d1".into(),
            zone_themes: vec!["cave1".into()],
            connections: vec![],
        };
        let mut entry_door = Door {
            uid: 1,
            position: Point::new(5, 5),
            destination_zone_index: Some(1),
            destination_position: None,
        };
        let mut entities = MockEntityStore::default();
        let resolver = MockResourceResolver::default();
        let mut quest = MockQuestProvider::default();

        let result = DungeonGenerator.generate(&mut rng, &mut entry_door, 1, 0, &theme, &dungeon_theme, &mut entities, &resolver, &mut quest);
        assert!(matches!(result, Err(GeneratorError::MissingReturnDoor)));
    }
}
