//! Declarative theme records and their XML ingest format.
//!
//! Format (spec.md §6, bit-exact): XML records with root tag `zone`,
//! `region`, or `dungeon`; attributes `id`, `type`, `min`, `max`, `floor`,
//! `walls`, `doors`; children `<creature id="..." n="..."/>`,
//! `<item id="..." n="..."/>`, `<vegetation id="..." n="..."/>`,
//! `<connection from="..." to="..."/>`. Attribute order is unconstrained.
//! CSV fields split on `,` with no whitespace trimming (spec.md §9).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;
use crate::terrain::{CreatureId, ItemId, TerrainId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DungeonType {
    Cave,
    Pits,
    Maze,
    Mine,
    Bsp,
    Packed,
    Default,
}

impl DungeonType {
    fn parse(s: &str) -> Self {
        match s {
            "cave" => DungeonType::Cave,
            "pits" => DungeonType::Pits,
            "maze" => DungeonType::Maze,
            "mine" => DungeonType::Mine,
            "bsp" => DungeonType::Bsp,
            "packed" => DungeonType::Packed,
            _ => DungeonType::Default,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneTheme {
    pub id: String,
    pub zone_type: DungeonType,
    pub min: u32,
    pub max: u32,
    pub floor: Vec<TerrainId>,
    pub walls: TerrainId,
    pub doors: TerrainId,
    pub creatures: BTreeMap<CreatureId, u32>,
    pub items: BTreeMap<ItemId, u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DungeonTheme {
    pub id: String,
    pub zone_themes: Vec<String>,
    /// `(from, to)` zone-index pairs naming which zones connect.
    pub connections: Vec<(u32, u32)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionTheme {
    pub id: String,
    pub region_type: String,
    pub floor: Vec<TerrainId>,
    pub creatures: BTreeMap<CreatureId, u32>,
    pub items: BTreeMap<ItemId, u32>,
    pub vegetation: BTreeMap<String, u32>,
}

/// Parses theme XML into the record types above.
pub struct ThemeLoader;

impl ThemeLoader {
    pub fn parse_zone_theme(xml: &str) -> Result<ZoneTheme, GeneratorError> {
        let doc = parse_doc(xml)?;
        let root = doc.root_element();
        if root.tag_name().name() != "zone" {
            return Err(GeneratorError::ThemeXml("expected <zone> root".into()));
        }
        let id = attr(root, "id")?;
        let zone_type = DungeonType::parse(&attr(root, "type")?);
        let min = attr(root, "min")?.parse().map_err(|_| bad_attr("min"))?;
        let max = attr(root, "max")?.parse().map_err(|_| bad_attr("max"))?;
        let floor = split_csv(&attr(root, "floor")?);
        let walls = attr(root, "walls")?;
        let doors = attr(root, "doors")?;
        let creatures = count_children(root, "creature");
        let items = count_children(root, "item");
        Ok(ZoneTheme {
            id,
            zone_type,
            min,
            max,
            floor,
            walls,
            doors,
            creatures,
            items,
        })
    }

    pub fn parse_dungeon_theme(xml: &str) -> Result<DungeonTheme, GeneratorError> {
        let doc = parse_doc(xml)?;
        let root = doc.root_element();
        if root.tag_name().name() != "dungeon" {
            return Err(GeneratorError::ThemeXml("expected <dungeon> root".into()));
        }
        let id = attr(root, "id")?;
        let mut zone_themes = Vec::new();
        let mut connections = Vec::new();
        for child in root.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                "zone_theme" => zone_themes.push(attr(child, "id")?),
                "connection" => {
                    let from: u32 = attr(child, "from")?.parse().map_err(|_| bad_attr("from"))?;
                    let to: u32 = attr(child, "to")?.parse().map_err(|_| bad_attr("to"))?;
                    connections.push((from, to));
                }
                _ => {}
            }
        }
        Ok(DungeonTheme {
            id,
            zone_themes,
            connections,
        })
    }

    pub fn parse_region_theme(xml: &str) -> Result<RegionTheme, GeneratorError> {
        let doc = parse_doc(xml)?;
        let root = doc.root_element();
        if root.tag_name().name() != "region" {
            return Err(GeneratorError::ThemeXml("expected <region> root".into()));
        }
        let id = attr(root, "id")?;
        let region_type = attr(root, "type")?;
        let floor = split_csv(&attr(root, "floor")?);
        let creatures = count_children(root, "creature");
        let items = count_children(root, "item");
        let vegetation = count_children(root, "vegetation");
        Ok(RegionTheme {
            id,
            region_type,
            floor,
            creatures,
            items,
            vegetation,
        })
    }
}

fn parse_doc(xml: &str) -> Result<roxmltree::Document<'_>, GeneratorError> {
    roxmltree::Document::parse(xml).map_err(|e| GeneratorError::ThemeXml(e.to_string()))
}

fn attr(node: roxmltree::Node, name: &str) -> Result<String, GeneratorError> {
    node.attribute(name)
        .map(|s| s.to_string())
        .ok_or_else(|| GeneratorError::ThemeXml(format!("missing attribute `{name}`")))
}

fn bad_attr(name: &str) -> GeneratorError {
    GeneratorError::ThemeXml(format!("attribute `{name}` is not a valid integer"))
}

/// No whitespace trimming: a CSV field containing surrounding whitespace is
/// preserved verbatim (spec.md §9).
fn split_csv(s: &str) -> Vec<String> {
    s.split(',').map(|p| p.to_string()).collect()
}

fn count_children(node: roxmltree::Node, tag: &str) -> BTreeMap<String, u32> {
    let mut map = BTreeMap::new();
    for child in node.children().filter(|n| n.is_element() && n.tag_name().name() == tag) {
        if let (Some(id), Some(n)) = (child.attribute("id"), child.attribute("n")) {
            if let Ok(n) = n.parse::<u32>() {
                map.insert(id.to_string(), n);
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_zone_theme_any_attribute_order() {
        let xml = r#"<zone max="40" type="cave" min="20" id="cave1" doors="wood_door" walls="stone" floor="dirt,moss">
            <creature id="rat" n="4"/>
            <item id="gold" n="10"/>
        </zone>"#;
        let theme = ThemeLoader::parse_zone_theme(xml).unwrap();
        assert_eq!(theme.id, "cave1");
        assert_eq!(theme.zone_type, DungeonType::Cave);
        assert_eq!(theme.min, 20);
        assert_eq!(theme.max, 40);
        assert_eq!(theme.floor, vec!["dirt", "moss"]);
        assert_eq!(theme.creatures.get("rat"), Some(&4));
        assert_eq!(theme.items.get("gold"), Some(&10));
    }

    #[test]
    fn parses_dungeon_theme_connections() {
        let xml = r#"<dungeon id="d1">
            <zone_theme id="cave1"/>
            <zone_theme id="bsp1"/>
            <connection from="0" to="1"/>
        </dungeon>"#;
        let theme = ThemeLoader::parse_dungeon_theme(xml).unwrap();
        assert_eq!(theme.zone_themes, vec!["cave1", "bsp1"]);
        assert_eq!(theme.connections, vec![(0, 1)]);
    }

    #[test]
    fn csv_not_trimmed() {
        let xml = r#"<zone id="z" type="bsp" min="1" max="2" floor=" dirt, moss " walls="w" doors="d"/>"#;
        let theme = ThemeLoader::parse_zone_theme(xml).unwrap();
        assert_eq!(theme.floor, vec![" dirt", " moss "]);
    }
}
