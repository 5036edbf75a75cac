//! Map model
//!
//! A [`Map`] is everything one map file describes: tile layers, the spawn
//! point, enemy groups, NPCs and events. It is built by
//! [`MapLoader`](crate::MapLoader) and treated as read-only afterwards.

use crate::enemy::EnemyGroup;
use crate::event::Event;
use crate::npc::Npc;
use crate::statblock::StatBlock;
use crate::tiles::{TileLayer, BLOCKS_NONE, COLLISION_LAYER};
use mapdef_core::{Direction, FPoint};
use serde::Serialize;
use std::collections::VecDeque;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Map {
    /// File the map was loaded from
    pub filename: PathBuf,

    /// Localized display title
    pub title: String,

    /// Tileset definition file
    pub tileset: String,

    /// Background music file
    pub music: String,

    /// Width in tiles (at least 1)
    pub w: u16,

    /// Height in tiles (at least 1)
    pub h: u16,

    /// Where the player appears, tile-centered
    pub spawn: FPoint,

    /// Facing of the player on arrival
    pub spawn_dir: Direction,

    /// Tile layers in draw order
    pub layers: Vec<TileLayer>,

    /// Index of the collision layer in `layers`; always set on a loaded map
    pub collision_layer: Option<usize>,

    /// Spawn groups, consumed front to back
    pub enemy_groups: VecDeque<EnemyGroup>,

    /// NPC placements, consumed front to back
    pub npcs: VecDeque<Npc>,

    pub events: Vec<Event>,

    /// One entry per event with a power component
    pub statblocks: Vec<StatBlock>,
}

impl Default for Map {
    fn default() -> Self {
        Self {
            filename: PathBuf::new(),
            title: String::new(),
            tileset: String::new(),
            music: String::new(),
            w: 1,
            h: 1,
            spawn: FPoint::default(),
            spawn_dir: Direction::default(),
            layers: Vec::new(),
            collision_layer: None,
            enemy_groups: VecDeque::new(),
            npcs: VecDeque::new(),
            events: Vec::new(),
            statblocks: Vec::new(),
        }
    }
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer names, index-aligned with `layers`
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.name.as_str()).collect()
    }

    /// First layer with the given name
    pub fn layer(&self, name: &str) -> Option<&TileLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn collision(&self) -> Option<&TileLayer> {
        self.collision_layer.and_then(|i| self.layers.get(i))
    }

    pub fn collision_mut(&mut self) -> Option<&mut TileLayer> {
        self.collision_layer.and_then(|i| self.layers.get_mut(i))
    }

    /// True if the tile blocks movement; tiles outside the map always do
    pub fn is_blocked(&self, x: usize, y: usize) -> bool {
        match self.collision().and_then(|layer| layer.get(x, y)) {
            Some(tile) => tile != BLOCKS_NONE,
            None => true,
        }
    }

    /// Append an empty `w x h` layer and return its index
    ///
    /// A layer named `collision` becomes the collision layer.
    pub fn add_layer(&mut self, name: impl Into<String>) -> usize {
        let layer = TileLayer::new(name, self.w as usize, self.h as usize);
        let is_collision = layer.is_collision();
        self.layers.push(layer);

        let index = self.layers.len() - 1;
        if is_collision {
            self.collision_layer = Some(index);
        }
        index
    }

    /// Resize every layer to the map's current `w x h`
    ///
    /// Returns `true` if any layer changed size.
    pub fn fit_layers(&mut self) -> bool {
        let (w, h) = (self.w as usize, self.h as usize);
        let mut resized = false;
        for layer in self.layers.iter_mut() {
            if layer.width() != w || layer.height() != h {
                layer.resize(w, h);
                resized = true;
            }
        }
        resized
    }

    /// Remove a layer, keeping `collision_layer` pointing at the same layer
    pub fn remove_layer(&mut self, index: usize) -> Option<TileLayer> {
        if index >= self.layers.len() {
            return None;
        }
        let removed = self.layers.remove(index);

        self.collision_layer = match self.collision_layer {
            Some(c) if c == index => None,
            Some(c) if c > index => Some(c - 1),
            other => other,
        };
        Some(removed)
    }

    /// Append an all-walkable collision layer if none is named `collision`
    ///
    /// Returns true if a layer was added.
    pub fn ensure_collision_layer(&mut self) -> bool {
        if self.collision().is_some_and(TileLayer::is_collision) {
            return false;
        }
        if let Some(index) = self.layers.iter().position(TileLayer::is_collision) {
            self.collision_layer = Some(index);
            return false;
        }
        self.add_layer(COLLISION_LAYER);
        true
    }

    /// Stat block of the event at `event_index`, if it casts a power
    pub fn statblock_for(&self, event_index: usize) -> Option<&StatBlock> {
        let index = self.events.get(event_index)?.power()?.statblock?;
        self.statblocks.get(index)
    }

    pub fn clear_layers(&mut self) {
        self.layers.clear();
        self.collision_layer = None;
    }

    pub fn clear_queues(&mut self) {
        self.enemy_groups.clear();
        self.npcs.clear();
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
        self.statblocks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::BLOCKS_ALL;

    fn sized(w: u16, h: u16) -> Map {
        Map {
            w,
            h,
            ..Map::default()
        }
    }

    #[test]
    fn test_default_map() {
        let map = Map::new();
        assert_eq!((map.w, map.h), (1, 1));
        assert!(map.layers.is_empty());
        assert!(map.collision_layer.is_none());
    }

    #[test]
    fn test_add_layer() {
        let mut map = sized(3, 2);
        assert_eq!(map.add_layer("background"), 0);
        assert_eq!(map.add_layer("collision"), 1);

        assert_eq!(map.layer_names(), vec!["background", "collision"]);
        assert_eq!(map.collision_layer, Some(1));
        assert_eq!(map.layers[0].data().len(), 6);
    }

    #[test]
    fn test_ensure_collision_layer() {
        let mut map = sized(2, 2);
        map.add_layer("background");
        assert!(map.ensure_collision_layer());
        assert_eq!(map.collision_layer, Some(1));
        assert!(map.collision().unwrap().data().iter().all(|&t| t == BLOCKS_NONE));

        assert!(!map.ensure_collision_layer());
        assert_eq!(map.layers.len(), 2);
    }

    #[test]
    fn test_remove_layer_tracks_collision() {
        let mut map = sized(2, 2);
        map.add_layer("background");
        map.add_layer("collision");
        map.add_layer("object");

        assert!(map.remove_layer(0).is_some());
        assert_eq!(map.collision_layer, Some(0));
        assert_eq!(map.collision().unwrap().name, "collision");

        assert!(map.remove_layer(1).is_some());
        assert_eq!(map.collision_layer, Some(0));

        assert!(map.remove_layer(0).is_some());
        assert!(map.collision_layer.is_none());
        assert!(map.remove_layer(0).is_none());
    }

    #[test]
    fn test_is_blocked() {
        let mut map = sized(2, 2);
        map.add_layer("collision");
        map.collision_mut().unwrap().set(1, 0, BLOCKS_ALL);

        assert!(!map.is_blocked(0, 0));
        assert!(map.is_blocked(1, 0));
        assert!(map.is_blocked(2, 0));
    }

    #[test]
    fn test_clear() {
        let mut map = sized(2, 2);
        map.add_layer("collision");
        map.npcs.push_back(Npc::default());
        map.events.push(Event::default());

        map.clear_layers();
        map.clear_queues();
        map.clear_events();
        assert!(map.layers.is_empty());
        assert!(map.collision_layer.is_none());
        assert!(map.npcs.is_empty());
        assert!(map.events.is_empty());
    }
}
