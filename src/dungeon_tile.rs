//! Dispatches a zone theme's `type` onto the right base-tile generator,
//! then maps the resulting [`TileGrid`] into an annotated [`TerrainGrid`].

use std::collections::HashSet;

use crate::cave::CaveGenerator;
use crate::complex::ComplexGenerator;
use crate::connectivity::repair_connectivity;
use crate::geom::Point;
use crate::grid::{TileClass, TileGrid};
use crate::maze::MazeGenerator;
use crate::rng::{Dice, RandomSource};
use crate::terrain::{TerrainCell, TerrainGrid};
use crate::theme::{DungeonType, ZoneTheme};

#[derive(Debug, Clone, Copy, Default)]
pub struct DungeonTileGenerator;

impl DungeonTileGenerator {
    /// Builds the base `TileGrid` for a zone theme's `type`, then runs the
    /// (idempotent on already-connected grids) connectivity repair pass.
    pub fn generate_base_tiles(&self, rng: &mut RandomSource, dungeon_type: DungeonType, w: i32, h: i32) -> TileGrid {
        let mut grid = match dungeon_type {
            DungeonType::Cave => make_tiles(w, h, &MazeGenerator.generate_squashed(rng, w, h, 3)),
            DungeonType::Pits => CaveGenerator.generate_open_cave(rng, w, h, 3),
            DungeonType::Maze => make_tiles(w, h, &MazeGenerator.generate(rng, w, h, 3, 50)),
            DungeonType::Mine => {
                let mut union = MazeGenerator.generate_squashed(rng, w, h, 12);
                union.extend(MazeGenerator.generate(rng, w, h, 12, 40));
                make_tiles(w, h, &union)
            }
            DungeonType::Bsp => ComplexGenerator.generate_bsp(rng, w, h, 5, 12),
            DungeonType::Packed => ComplexGenerator.generate_packed(rng, w, h, 10, 4, 7),
            DungeonType::Default => ComplexGenerator.generate_sparse(rng, w, h, 5, 5, 15),
        };
        repair_connectivity(rng, &mut grid);
        grid
    }

    /// `Floor`/`Corridor`/door tiles become a `TerrainCell` with a base
    /// drawn uniformly from `theme.floor`; walls become `None`.
    pub fn tiles_to_terrain(&self, rng: &mut RandomSource, grid: &TileGrid, theme: &ZoneTheme) -> TerrainGrid {
        let mut terrain = TerrainGrid::new(grid.width(), grid.height());
        for (x, y, tile) in grid.iter() {
            if tile.is_walkable() {
                if let Some(base) = rng.pick(&theme.floor) {
                    terrain.set(x as i32, y as i32, Some(TerrainCell::new(base.clone())));
                }
            }
        }
        terrain
    }

    /// For each `(id, n)` in `theme.creatures`/`theme.items`, places `1dn`
    /// annotations on random walkable cells that don't already carry that
    /// annotation kind. Creatures and items may coexist on the same cell.
    pub fn populate_with_theme(&self, rng: &mut RandomSource, terrain: &mut TerrainGrid, theme: &ZoneTheme) {
        let dice = Dice;
        let occupied: Vec<(i32, i32)> = terrain
            .iter()
            .filter(|(_, _, c)| c.is_some())
            .map(|(x, y, _)| (x as i32, y as i32))
            .collect();
        if occupied.is_empty() {
            return;
        }
        for (id, &n) in &theme.creatures {
            let count = dice.roll(rng, 1, n as i32, 0).max(0) as usize;
            for _ in 0..count {
                let Some(&(x, y)) = rng.pick(&occupied) else { continue };
                if let Some(Some(cell)) = terrain.get_mut(x, y) {
                    if cell.creature.is_none() {
                        cell.creature = Some(id.clone());
                    }
                }
            }
        }
        for (id, &n) in &theme.items {
            let count = dice.roll(rng, 1, n as i32, 0).max(0) as usize;
            for _ in 0..count {
                let Some(&(x, y)) = rng.pick(&occupied) else { continue };
                if let Some(Some(cell)) = terrain.get_mut(x, y) {
                    if cell.item.is_none() {
                        cell.item = Some(id.clone());
                    }
                }
            }
        }
    }
}

fn make_tiles(w: i32, h: i32, walkable: &HashSet<Point>) -> TileGrid {
    let mut grid = TileGrid::new(w as usize, h as usize);
    for &p in walkable {
        grid.set(p.x, p.y, TileClass::Floor);
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample_theme(dungeon_type: DungeonType) -> ZoneTheme {
        ZoneTheme {
            id: "z".into(),
            zone_type: dungeon_type,
            min: 20,
            max: 30,
            floor: vec!["dirt".into(), "moss".into()],
            walls: "stone".into(),
            doors: "wood".into(),
            creatures: BTreeMap::from([("rat".to_string(), 4u32)]),
            items: BTreeMap::from([("gold".to_string(), 3u32)]),
        }
    }

    #[test]
    fn cave_type_produces_one_walkable_component() {
        let mut rng = RandomSource::with_seed(42);
        let grid = DungeonTileGenerator.generate_base_tiles(&mut rng, DungeonType::Cave, 30, 30);
        assert!(grid.count(|t| t.is_walkable()) > 0);
        assert_eq!(grid.walkable_components().len(), 1);
    }

    #[test]
    fn tiles_to_terrain_uses_only_theme_floor_ids() {
        let mut rng = RandomSource::with_seed(1);
        let theme = sample_theme(DungeonType::Bsp);
        let grid = DungeonTileGenerator.generate_base_tiles(&mut rng, DungeonType::Bsp, 30, 20);
        let terrain = DungeonTileGenerator.tiles_to_terrain(&mut rng, &grid, &theme);
        for (_, _, cell) in terrain.iter() {
            if let Some(c) = cell {
                assert!(theme.floor.contains(&c.base));
            }
        }
    }

    #[test]
    fn populate_adds_annotations() {
        let mut rng = RandomSource::with_seed(1);
        let theme = sample_theme(DungeonType::Packed);
        let grid = DungeonTileGenerator.generate_base_tiles(&mut rng, DungeonType::Packed, 30, 20);
        let mut terrain = DungeonTileGenerator.tiles_to_terrain(&mut rng, &grid, &theme);
        DungeonTileGenerator.populate_with_theme(&mut rng, &mut terrain, &theme);
        let annotated = terrain.iter().filter(|(_, _, c)| c.as_ref().is_some_and(|c| c.creature.is_some() || c.item.is_some())).count();
        assert!(annotated > 0);
    }

    /// `theme.creatures`/`theme.items` are re-parsed from XML on every run;
    /// if population order depended on `HashMap` iteration order it would
    /// draw a different RNG sequence per process despite an identical seed
    /// and theme. `BTreeMap` forces a fixed (sorted) iteration order.
    #[test]
    fn populate_with_theme_is_deterministic_across_reparses() {
        use crate::theme::ThemeLoader;
        let xml = r#"<zone id="z" type="packed" min="20" max="30" floor="dirt" walls="stone" doors="wood">
            <creature id="rat" n="5"/>
            <creature id="bat" n="4"/>
            <creature id="wolf" n="3"/>
            <item id="gold" n="6"/>
            <item id="arrow" n="8"/>
        </zone>"#;

        let run = || {
            let theme = ThemeLoader::parse_zone_theme(xml).unwrap();
            let mut rng = RandomSource::with_seed(9);
            let grid = DungeonTileGenerator.generate_base_tiles(&mut rng, theme.zone_type, 30, 20);
            let mut terrain = DungeonTileGenerator.tiles_to_terrain(&mut rng, &grid, &theme);
            DungeonTileGenerator.populate_with_theme(&mut rng, &mut terrain, &theme);
            terrain.iter().map(|(x, y, c)| (x, y, c.clone())).collect::<Vec<_>>()
        };

        assert_eq!(run(), run());
    }
}
