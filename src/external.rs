//! The four external-collaborator traits the generator core depends on.
//! Everything else named in spec.md §1 (event bus, scripting, UI, save/load,
//! ECS lifecycle, quest state machine) lives on the other side of these
//! seams and is not modeled here.

use crate::theme::{DungeonTheme, RegionTheme, ZoneTheme};

pub type EntityId = u64;

/// Resource classification used during quest-item injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Creature,
    Item,
    Door,
    Terrain,
    Unknown,
}

/// Reads declarative theme records. Themes are immutable from the
/// generator's perspective once loaded (§5).
pub trait ThemeStore {
    fn get_zone_theme(&self, id: &str) -> Option<ZoneTheme>;
    fn get_region_theme(&self, id: &str) -> Option<RegionTheme>;
    fn get_dungeon_theme(&self, id: &str) -> Option<DungeonTheme>;
}

/// UID allocation for entities the generator hands out (doors). The
/// generator never constructs entity lifecycle beyond this.
pub trait EntityStore {
    fn new_entity_uid(&mut self) -> EntityId;
}

/// Classifies an id so quest injection knows whether to annotate it as a
/// creature or an item.
pub trait ResourceResolver {
    fn classify(&self, id: &str) -> ResourceKind;
}

/// The quest tracker's sole hook into generation.
pub trait QuestProvider {
    fn next_requested_object(&mut self) -> Option<String>;
}
