//! # dungeon-forge
//!
//! Deterministic, seed-reproducible procedural generation for a roguelike's
//! dungeon, cave, maze, wilderness, and town levels, driven by declarative
//! XML themes.
//!
//! ## Quick Start
//!
//! ```rust
//! use dungeon_forge::rng::RandomSource;
//! use dungeon_forge::complex::ComplexGenerator;
//!
//! let mut rng = RandomSource::with_seed(12345);
//! let grid = ComplexGenerator.generate_bsp(&mut rng, 60, 40, 5, 12);
//! println!("Generated {} floor tiles", grid.count(|t| t.is_walkable()));
//! ```
//!
//! ## Generators
//!
//! - [`blocks`] — non-overlapping rectangle layout (sparse, packed, BSP).
//! - [`rooms`] — carving a single room shape into a [`grid::TileGrid`].
//! - [`maze`] — recursive-backtracker mazes.
//! - [`cave`] — cellular-automaton open caves.
//! - [`connectivity`] — the shared corridor-repair subroutine.
//! - [`complex`] — multi-room dungeons composed from the above.
//! - [`wilderness`] — islands, lakes, rivers painted onto terrain.
//! - [`dungeon_tile`] — theme-type dispatch from tiles to terrain.
//! - [`dungeon`] — whole-zone assembly and door linking.
//! - [`town`] — rectangle-packed settlements.
//! - [`theme`] — XML theme ingestion.
//! - [`external`] — the traits this crate consumes from its host engine.

pub mod blocks;
pub mod cave;
pub mod complex;
pub mod connectivity;
pub mod dungeon;
pub mod dungeon_tile;
pub mod error;
pub mod external;
pub mod geom;
pub mod grid;
pub mod maze;
pub mod rng;
pub mod rooms;
pub mod terrain;
pub mod theme;
pub mod town;
pub mod wilderness;

pub use dungeon::{DungeonGenerator, Door, GeneratedZone, Region};
pub use error::{GeneratorError, Result};
pub use grid::{TileClass, TileGrid};
pub use rng::{Dice, RandomSource};
pub use terrain::{TerrainCell, TerrainGrid};
