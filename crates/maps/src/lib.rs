//! # mapdef Maps
//!
//! This crate turns map definition files into validated [`Map`] models.
//!
//! ## Features
//! - Section based map file tokenizer
//! - Named tile layers with a guaranteed collision layer
//! - Enemy spawn groups, NPC placements and scripted events
//! - Stat blocks for events that cast powers
//! - Map caching
//!
//! ## Map Format
//!
//! Map files are plain text, split into sections:
//! - **[header]**: size, title, tileset, music, spawn point
//! - **[layer]**: one named tile grid; `data=` is followed by one line per row
//! - **[enemy] / [npc] / [event]**: repeatable, one object per section

pub mod error;
pub mod file_parser;
pub mod tiles;
pub mod enemy;
pub mod npc;
pub mod event;
pub mod statblock;
pub mod map;
pub mod loader;
pub mod cache;

pub use error::{Diagnostic, MapError, Result, Severity};
pub use file_parser::FileParser;
pub use tiles::{TileLayer, COLLISION_LAYER};
pub use enemy::{EnemyGroup, Movement};
pub use npc::Npc;
pub use event::{ComponentKind, Event, EventComponent};
pub use statblock::StatBlock;
pub use map::Map;
pub use loader::{LoadContext, LoadedMap, MapLoader};
pub use cache::{CacheConfig, CacheStats, MapCache};
