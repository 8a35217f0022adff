//! Terrain grid: the annotated exchange format between the tile stage and
//! the rest of the engine.

use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;

pub type TerrainId = String;
pub type CreatureId = String;
pub type ItemId = String;

/// One cell of terrain: a base terrain id plus optional creature/item
/// annotations. `None` at the grid level means impassable void.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainCell {
    pub base: TerrainId,
    pub creature: Option<CreatureId>,
    pub item: Option<ItemId>,
}

impl TerrainCell {
    pub fn new(base: impl Into<TerrainId>) -> Self {
        Self {
            base: base.into(),
            creature: None,
            item: None,
        }
    }

    /// `"<base>[;c:<creatureId>][;i:<itemId>]"`.
    pub fn format(&self) -> String {
        let mut s = self.base.clone();
        if let Some(c) = &self.creature {
            s.push_str(";c:");
            s.push_str(c);
        }
        if let Some(i) = &self.item {
            s.push_str(";i:");
            s.push_str(i);
        }
        s
    }

    pub fn parse(s: &str) -> Result<Self, GeneratorError> {
        let mut parts = s.split(';');
        let base = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| GeneratorError::ThemeXml(format!("empty terrain cell: {s}")))?
            .to_string();
        let mut cell = TerrainCell::new(base);
        for part in parts {
            if let Some(rest) = part.strip_prefix("c:") {
                cell.creature = Some(rest.to_string());
            } else if let Some(rest) = part.strip_prefix("i:") {
                cell.item = Some(rest.to_string());
            } else {
                return Err(GeneratorError::ThemeXml(format!(
                    "unrecognized terrain annotation: {part}"
                )));
            }
        }
        Ok(cell)
    }
}

/// Rectangular grid mapping `(x, y)` to an optional [`TerrainCell`].
#[derive(Debug, Clone)]
pub struct TerrainGrid {
    width: usize,
    height: usize,
    cells: Vec<Option<TerrainCell>>,
}

impl TerrainGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&TerrainCell> {
        if self.in_bounds(x, y) {
            self.cells[y as usize * self.width + x as usize].as_ref()
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Option<TerrainCell>> {
        if self.in_bounds(x, y) {
            Some(&mut self.cells[y as usize * self.width + x as usize])
        } else {
            None
        }
    }

    pub fn set(&mut self, x: i32, y: i32, cell: Option<TerrainCell>) {
        if self.in_bounds(x, y) {
            self.cells[y as usize * self.width + x as usize] = cell;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Option<TerrainCell>)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (i % self.width, i / self.width, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_base_only() {
        let cell = TerrainCell::new("grass");
        assert_eq!(TerrainCell::parse(&cell.format()).unwrap(), cell);
    }

    #[test]
    fn round_trip_with_creature_and_item() {
        let mut cell = TerrainCell::new("dirt");
        cell.creature = Some("rat".to_string());
        cell.item = Some("gold".to_string());
        let s = cell.format();
        assert_eq!(s, "dirt;c:rat;i:gold");
        assert_eq!(TerrainCell::parse(&s).unwrap(), cell);
    }

    #[test]
    fn round_trip_with_creature_only() {
        let mut cell = TerrainCell::new("dirt");
        cell.creature = Some("rat".to_string());
        let s = cell.format();
        assert_eq!(s, "dirt;c:rat");
        assert_eq!(TerrainCell::parse(&s).unwrap(), cell);
    }
}
