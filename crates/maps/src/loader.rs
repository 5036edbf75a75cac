//! Map file loader
//!
//! Reads a map file section by section into a [`Map`], then finalizes it:
//! power events get their stat blocks and every map ends up with a
//! collision layer.

use crate::enemy::EnemyGroup;
use crate::error::{Diagnostic, Result, Severity};
use crate::event::Event;
use crate::file_parser::FileParser;
use crate::map::Map;
use crate::npc::Npc;
use crate::statblock::StatBlock;
use mapdef_config::{LoaderConfig, MessageCatalog};
use mapdef_core::{pop_first_int, to_int, Direction, FPoint};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// The only accepted layer data format: comma-separated decimal
const LAYER_FORMAT_DEC: &str = "dec";

/// Services the loader needs from the rest of the engine
#[derive(Debug, Clone, Default)]
pub struct LoadContext {
    /// Translations for titles and event messages
    pub messages: Arc<MessageCatalog>,
}

impl LoadContext {
    pub fn new(messages: MessageCatalog) -> Self {
        Self {
            messages: Arc::new(messages),
        }
    }

    /// Build a context from the loader configuration
    pub fn from_config(config: &LoaderConfig) -> mapdef_config::Result<Self> {
        Ok(Self::new(config.load_messages()?))
    }
}

/// A successfully loaded map and the non-fatal problems found on the way
#[derive(Debug, Clone)]
pub struct LoadedMap {
    pub map: Map,
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadedMap {
    pub fn repairs(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Repair)
    }

    pub fn advisories(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Advisory)
    }
}

/// Section currently being read
///
/// Repeatable sections carry the index of the element they populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Header,
    Layer,
    Enemy(usize),
    Npc(usize),
    Event(usize),
    Other,
}

/// Map file loader
#[derive(Debug, Clone, Default)]
pub struct MapLoader {
    context: LoadContext,
}

impl MapLoader {
    pub fn new(context: LoadContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &LoadContext {
        &self.context
    }

    /// Load a map from a file
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<LoadedMap> {
        let path = path.as_ref();
        debug!("Loading map: {}", path.display());
        let parser = FileParser::open(path)?;
        self.load(parser, path.to_path_buf())
    }

    /// Parse map data from a string; `name` is used for the filename and in
    /// diagnostics
    pub fn parse(&self, name: &str, text: &str) -> Result<LoadedMap> {
        self.load(FileParser::from_str(name, text), PathBuf::from(name))
    }

    fn load(&self, mut parser: FileParser, filename: PathBuf) -> Result<LoadedMap> {
        let mut map = Map::new();
        map.filename = filename;

        let mut section = Section::None;
        while parser.next() {
            if parser.new_section {
                section = Self::enter_section(&mut map, parser.section());
            }

            match section {
                Section::Header => self.load_header(&mut map, &mut parser),
                Section::Layer => Self::load_layer(&mut map, &mut parser)?,
                Section::Enemy(index) => map.enemy_groups[index].load_key(&mut parser),
                Section::Npc(index) => {
                    let collision = map.collision_layer.and_then(|c| map.layers.get_mut(c));
                    map.npcs[index].load_key(&mut parser, collision);
                }
                Section::Event(index) => {
                    map.events[index].load_key(&mut parser, &self.context.messages)
                }
                Section::None | Section::Other => {}
            }
        }

        Self::finalize(&mut map, &mut parser);

        debug!(
            "Loaded map {}: {}x{}, {} layers, {} enemy groups, {} npcs, {} events",
            parser.name(),
            map.w,
            map.h,
            map.layers.len(),
            map.enemy_groups.len(),
            map.npcs.len(),
            map.events.len()
        );

        Ok(LoadedMap {
            map,
            diagnostics: parser.take_diagnostics(),
        })
    }

    /// Switch sections; repeatable sections get a fresh element first
    fn enter_section(map: &mut Map, name: &str) -> Section {
        match name {
            "header" => Section::Header,
            "layer" => Section::Layer,
            "enemy" => {
                map.enemy_groups.push_back(EnemyGroup::default());
                Section::Enemy(map.enemy_groups.len() - 1)
            }
            "npc" => {
                map.npcs.push_back(Npc::default());
                Section::Npc(map.npcs.len() - 1)
            }
            "event" => {
                map.events.push(Event::default());
                Section::Event(map.events.len() - 1)
            }
            _ => Section::Other,
        }
    }

    fn load_header(&self, map: &mut Map, parser: &mut FileParser) {
        match parser.key() {
            "title" => map.title = self.context.messages.get(parser.val()),
            "width" => {
                map.w = dimension(parser.val());
                Self::fit_layers(map, parser);
            }
            "height" => {
                map.h = dimension(parser.val());
                Self::fit_layers(map, parser);
            }
            "tileset" => map.tileset = parser.val().to_string(),
            "music" => map.music = parser.val().to_string(),
            "location" => {
                let x = to_int(&parser.next_value(), 0);
                let y = to_int(&parser.next_value(), 0);
                map.spawn = FPoint::tile_center(x, y);
                map.spawn_dir = Direction::parse(&parser.next_value());
            }
            // Written by external map editors, unused here
            "tilewidth" | "tileheight" | "orientation" => {}
            key => {
                let message = format!("Map: '{}' is not a valid key.", key);
                parser.report(Severity::Advisory, message);
            }
        }
    }

    /// Keep layers declared before the header at the map's size
    fn fit_layers(map: &mut Map, parser: &mut FileParser) {
        if map.fit_layers() {
            let message = format!("Map: Resized existing layers to {}x{}.", map.w, map.h);
            parser.report(Severity::Repair, message);
        }
    }

    fn load_layer(map: &mut Map, parser: &mut FileParser) -> Result<()> {
        match parser.key() {
            "type" => {
                let name = parser.val().to_string();
                map.add_layer(name);
            }
            "format" => {
                if parser.val() != LAYER_FORMAT_DEC {
                    return Err(parser.error("Map: The format of a layer must be \"dec\"!"));
                }
            }
            "data" => Self::load_layer_data(map, parser)?,
            key => {
                let message = format!("Map: '{}' is not a valid key.", key);
                parser.report(Severity::Advisory, message);
            }
        }
        Ok(())
    }

    /// Read `h` raw rows of `w` comma-terminated tile ids into the newest
    /// layer
    fn load_layer_data(map: &mut Map, parser: &mut FileParser) -> Result<()> {
        let (w, h) = (map.w as usize, map.h as usize);
        let Some(layer) = map.layers.last_mut() else {
            return Err(parser.error("Map: Layer data appears before a layer type."));
        };

        for y in 0..h {
            let Some(mut row) = parser.raw_line() else {
                return Err(parser.error(format!(
                    "Map: Expected {} rows of layer data, found {}.",
                    h, y
                )));
            };

            if !row.is_empty() && !row.ends_with(',') {
                row.push(',');
            }

            if row.matches(',').count() != w {
                return Err(parser.error(format!(
                    "Map: A row of layer data has a width not equal to {}.",
                    w
                )));
            }

            for x in 0..w {
                let tile = pop_first_int(&mut row, ',').clamp(0, u16::MAX as i32) as u16;
                layer.set(x, y, tile);
            }
        }

        Ok(())
    }

    /// Derive what the file leaves implicit
    fn finalize(map: &mut Map, parser: &mut FileParser) {
        for event in map.events.iter_mut() {
            if event.power().is_none() {
                continue;
            }

            map.statblocks.push(StatBlock::for_event(event));
            let index = map.statblocks.len() - 1;
            if let Some(power) = event.power_mut() {
                power.statblock = Some(index);
            }
        }

        if map.ensure_collision_layer() {
            parser.report_file(
                Severity::Repair,
                "Map: No collision layer found. Creating an empty one.",
            );
        }
    }
}

/// Map dimension from a header value, at least 1
fn dimension(val: &str) -> u16 {
    to_int(val, 0).clamp(1, u16::MAX as i32) as u16
}
