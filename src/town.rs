//! Town composition: rectangle packing into house regions with a perimeter
//! wall and a single door-floor tile each.

use crate::blocks::BlocksGenerator;
use crate::dungeon::{Door, Region};
use crate::external::EntityStore;
use crate::geom::{Point, Rectangle};
use crate::rng::RandomSource;
use crate::theme::RegionTheme;

const MIN_HOUSE_SIDE: i32 = 6;
const MAX_HOUSE_SIDE: i32 = 14;
const MAX_RATIO: f64 = 2.5;

#[derive(Debug, Clone, Copy, Default)]
pub struct TownGenerator;

impl TownGenerator {
    /// `region_theme.region_type` selects the layout strategy: `town_big`
    /// uses BSP (full tiling), `town_small` uses packed placement, anything
    /// else uses sparse placement.
    pub fn generate(
        &self,
        rng: &mut RandomSource,
        x0: i32,
        y0: i32,
        w: i32,
        h: i32,
        theme: &RegionTheme,
        base_layer: u8,
        entities: &mut dyn EntityStore,
    ) -> (Vec<Region>, Vec<Door>) {
        let blocks = BlocksGenerator;
        let houses = match theme.region_type.as_str() {
            "town_big" => blocks.bsp(rng, w, h, MIN_HOUSE_SIDE, MAX_HOUSE_SIDE),
            "town_small" => blocks.packed(rng, w, h, MIN_HOUSE_SIDE, MAX_HOUSE_SIDE, MAX_RATIO, 16),
            _ => blocks.sparse(rng, w, h, MIN_HOUSE_SIDE, MAX_HOUSE_SIDE, MAX_RATIO, 10),
        };

        let floor_id = theme.floor.first().cloned().unwrap_or_else(|| "floor".to_string());
        let wall_id = theme.floor.get(1).cloned().unwrap_or_else(|| "wall".to_string());

        let mut regions = Vec::new();
        let mut doors = Vec::new();

        for house in houses {
            let world = Rectangle::new(x0 + house.x, y0 + house.y, house.width, house.height);
            if world.width < 3 || world.height < 3 {
                continue;
            }

            regions.push(Region {
                terrain_base: wall_id.clone(),
                bounds: world,
                z_layer: base_layer + 1,
            });
            regions.push(Region {
                terrain_base: floor_id.clone(),
                bounds: world.inset(1),
                z_layer: base_layer + 1,
            });

            let perimeter = perimeter_tiles(world);
            let Some(&door_pos) = rng.pick(&perimeter) else {
                continue;
            };

            regions.push(Region {
                terrain_base: floor_id.clone(),
                bounds: Rectangle::new(door_pos.x, door_pos.y, 1, 1),
                z_layer: base_layer + 2,
            });
            doors.push(Door {
                uid: entities.new_entity_uid(),
                position: door_pos,
                destination_zone_index: None,
                destination_position: None,
            });
        }

        (regions, doors)
    }
}

fn perimeter_tiles(r: Rectangle) -> Vec<Point> {
    let mut tiles = Vec::new();
    for x in r.left()..r.right() {
        tiles.push(Point::new(x, r.top()));
        tiles.push(Point::new(x, r.bottom() - 1));
    }
    for y in (r.top() + 1)..(r.bottom() - 1) {
        tiles.push(Point::new(r.left(), y));
        tiles.push(Point::new(r.right() - 1, y));
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::MockEntityStore;

    fn sample_theme(region_type: &str) -> RegionTheme {
        RegionTheme {
            id: "town1".into(),
            region_type: region_type.into(),
            floor: vec!["cobblestone".into(), "brick".into()],
            creatures: Default::default(),
            items: Default::default(),
            vegetation: Default::default(),
        }
    }

    fn overlaps(a: Rectangle, b: Rectangle) -> bool {
        a.overlaps(&b)
    }

    #[test]
    fn town_big_produces_non_overlapping_houses_with_doors() {
        let mut rng = RandomSource::with_seed(42);
        let theme = sample_theme("town_big");
        let mut entities = MockEntityStore::default();
        let (regions, doors) = TownGenerator.generate(&mut rng, 0, 0, 150, 150, &theme, 0, &mut entities);

        assert!(!doors.is_empty());
        let house_walls: Vec<Rectangle> = regions.iter().filter(|r| r.terrain_base == "brick").map(|r| r.bounds).collect();
        assert!(!house_walls.is_empty());
        for i in 0..house_walls.len() {
            for j in (i + 1)..house_walls.len() {
                assert!(!overlaps(house_walls[i], house_walls[j]));
            }
        }
        assert_eq!(doors.len(), house_walls.len());
    }
}
