//! NPC placements

use crate::enemy::parse_list;
use crate::error::Severity;
use crate::file_parser::FileParser;
use crate::tiles::{TileLayer, BLOCKS_MOVEMENT_HIDDEN, BLOCKS_NONE};
use mapdef_core::{to_int, FPoint};
use serde::Serialize;

/// One `[npc]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Npc {
    /// Editor-only type tag
    pub type_name: String,
    /// NPC definition file
    pub id: String,
    /// Tile-centered position
    pub pos: FPoint,
    pub requires_status: Vec<String>,
    pub requires_not_status: Vec<String>,
}

impl Npc {
    /// Apply the current `[npc]` key from `parser`
    ///
    /// `collision` is the map's collision layer if one has been declared so
    /// far; placing the NPC on a walkable tile turns that tile into a hidden
    /// blocker, otherwise the player could stand inside the NPC and keep
    /// re-triggering it.
    pub fn load_key(&mut self, parser: &mut FileParser, collision: Option<&mut TileLayer>) {
        match parser.key() {
            "type" => self.type_name = parser.val().to_string(),
            "filename" => self.id = parser.val().to_string(),
            "requires_status" => parse_list(parser, &mut self.requires_status),
            "requires_not_status" => parse_list(parser, &mut self.requires_not_status),
            "location" => {
                let x = to_int(&parser.next_value(), 0);
                let y = to_int(&parser.next_value(), 0);
                self.pos = FPoint::tile_center(x, y);

                if let Some(layer) = collision {
                    self.block_tile(parser, layer);
                }
            }
            key => {
                let message = format!("Map: '{}' is not a valid key.", key);
                parser.report(Severity::Advisory, message);
            }
        }
    }

    fn block_tile(&self, parser: &mut FileParser, layer: &mut TileLayer) {
        let Some((tile_x, tile_y)) = self.pos.to_tile() else {
            return;
        };
        let Some(tile) = layer.get_mut(tile_x, tile_y) else {
            return;
        };

        if *tile == BLOCKS_NONE {
            *tile = BLOCKS_MOVEMENT_HIDDEN;
            parser.report(
                Severity::Repair,
                format!(
                    "Map: NPC at ({}, {}) does not have a collision tile. Creating one now.",
                    tile_x, tile_y
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::{BLOCKS_ALL, COLLISION_LAYER};

    fn load(text: &str, collision: Option<&mut TileLayer>) -> (Npc, FileParser) {
        let mut parser = FileParser::from_str("npc.txt", text);
        let mut npc = Npc::default();
        let mut collision = collision;
        while parser.next() {
            npc.load_key(&mut parser, collision.as_deref_mut());
        }
        (npc, parser)
    }

    #[test]
    fn test_basic_keys() {
        let (npc, _) = load(
            "type=npc\nfilename=npcs/guard.txt\nrequires_status=a,b\nrequires_not_status=c\n",
            None,
        );
        assert_eq!(npc.type_name, "npc");
        assert_eq!(npc.id, "npcs/guard.txt");
        assert_eq!(npc.requires_status, vec!["a", "b"]);
        assert_eq!(npc.requires_not_status, vec!["c"]);
    }

    #[test]
    fn test_location_blocks_walkable_tile() {
        let mut layer = TileLayer::new(COLLISION_LAYER, 3, 3);
        let (npc, mut parser) = load("location=1,2\n", Some(&mut layer));

        assert_eq!(npc.pos, FPoint::new(1.5, 2.5));
        assert_eq!(layer.get(1, 2), Some(BLOCKS_MOVEMENT_HIDDEN));

        let diagnostics = parser.take_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Repair);
    }

    #[test]
    fn test_location_keeps_existing_blocker() {
        let mut layer = TileLayer::new(COLLISION_LAYER, 3, 3);
        layer.set(0, 0, BLOCKS_ALL);
        let (_, mut parser) = load("location=0,0\n", Some(&mut layer));

        assert_eq!(layer.get(0, 0), Some(BLOCKS_ALL));
        assert!(parser.take_diagnostics().is_empty());
    }

    #[test]
    fn test_location_outside_map_is_ignored() {
        let mut layer = TileLayer::new(COLLISION_LAYER, 2, 2);
        let (npc, _) = load("location=5,-1\n", Some(&mut layer));

        assert_eq!(npc.pos, FPoint::new(5.5, -0.5));
        assert!(layer.data().iter().all(|&t| t == BLOCKS_NONE));
    }
}
