//! Per-map report printed by `mapcheck`

use mapdef_maps::{Diagnostic, LoadedMap, Severity};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MapSummary {
    pub file: String,
    pub title: String,
    pub width: u16,
    pub height: u16,
    pub layers: Vec<String>,
    pub collision_layer: Option<usize>,
    pub enemy_groups: usize,
    pub npcs: usize,
    pub events: usize,
    pub statblocks: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl MapSummary {
    pub fn new(loaded: &LoadedMap) -> Self {
        let map = &loaded.map;
        Self {
            file: map.filename.display().to_string(),
            title: map.title.clone(),
            width: map.w,
            height: map.h,
            layers: map.layer_names().into_iter().map(str::to_string).collect(),
            collision_layer: map.collision_layer,
            enemy_groups: map.enemy_groups.len(),
            npcs: map.npcs.len(),
            events: map.events.len(),
            statblocks: map.statblocks.len(),
            diagnostics: loaded.diagnostics.clone(),
        }
    }

    /// Whether this map passes; advisories only fail under `strict`
    pub fn passes(&self, strict: bool) -> bool {
        !strict
            || self
                .diagnostics
                .iter()
                .all(|d| d.severity != Severity::Advisory)
    }

    pub fn print(&self) {
        println!("{} ({})", self.file, self.title);
        println!("  size: {}x{}", self.width, self.height);
        println!("  layers: {}", self.layers.join(", "));
        println!(
            "  enemy groups: {}, npcs: {}, events: {} ({} with powers)",
            self.enemy_groups, self.npcs, self.events, self.statblocks
        );
        for diagnostic in &self.diagnostics {
            println!("  {}", diagnostic);
        }
    }
}
