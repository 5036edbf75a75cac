//! Scripted map events
//!
//! An `[event]` section has a handful of scalar keys (where it is, how it
//! is activated, cooldowns) followed by any number of component keys. Each
//! component key becomes one [`EventComponent`] in file order; the rest of
//! the engine asks for components by kind.

use crate::enemy::parse_list;
use crate::error::Severity;
use crate::file_parser::FileParser;
use mapdef_config::MessageCatalog;
use mapdef_core::{parse_duration_ms, to_bool, to_int, Point, Rect};
use serde::Serialize;

/// What makes an event fire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Activation {
    #[default]
    None,
    /// Player steps into the location
    Trigger,
    /// Player clicks the hotspot
    Interact,
    /// Player walks off the map edge
    MapExit,
    /// Player leaves the location
    Leave,
    /// Map finished loading
    Load,
    /// Every enemy on the map is dead
    Clear,
    /// Applied once at load, never re-evaluated
    Static,
}

impl Activation {
    fn parse(token: &str) -> Option<Self> {
        Some(match token {
            "on_trigger" => Activation::Trigger,
            "on_interact" => Activation::Interact,
            "on_mapexit" => Activation::MapExit,
            "on_leave" => Activation::Leave,
            "on_load" => Activation::Load,
            "on_clear" => Activation::Clear,
            "static" => Activation::Static,
            _ => return None,
        })
    }
}

/// Component tags, used for lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ComponentKind {
    Tooltip,
    PowerPath,
    PowerDamage,
    Intermap,
    Intramap,
    MapMod,
    SoundFx,
    Msg,
    ShakyCam,
    RequiresStatus,
    RequiresNotStatus,
    SetStatus,
    UnsetStatus,
    Power,
    Spawn,
    Music,
}

/// Where a power cast by an event is aimed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PathTarget {
    Tile(Point),
    Hero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PowerPath {
    pub source: Point,
    pub target: PathTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DamageRange {
    pub min: i32,
    pub max: i32,
}

/// A power cast by the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PowerCast {
    pub power_id: i32,
    /// Index into `Map::statblocks`, assigned when the map is finalized
    pub statblock: Option<usize>,
}

/// A single tile change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapMod {
    pub layer: String,
    pub pos: Point,
    pub value: u16,
}

/// An enemy spawned by the event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Spawn {
    pub category: String,
    pub pos: Point,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EventComponent {
    Tooltip(String),
    PowerPath(PowerPath),
    PowerDamage(DamageRange),
    Intermap { map: String, pos: Point },
    Intramap(Point),
    MapMod(Vec<MapMod>),
    SoundFx { file: String, pos: Option<Point> },
    Msg(String),
    ShakyCam(u32),
    RequiresStatus(Vec<String>),
    RequiresNotStatus(Vec<String>),
    SetStatus(Vec<String>),
    UnsetStatus(Vec<String>),
    Power(PowerCast),
    Spawn(Vec<Spawn>),
    Music(String),
}

impl EventComponent {
    pub fn kind(&self) -> ComponentKind {
        match self {
            EventComponent::Tooltip(_) => ComponentKind::Tooltip,
            EventComponent::PowerPath(_) => ComponentKind::PowerPath,
            EventComponent::PowerDamage(_) => ComponentKind::PowerDamage,
            EventComponent::Intermap { .. } => ComponentKind::Intermap,
            EventComponent::Intramap(_) => ComponentKind::Intramap,
            EventComponent::MapMod(_) => ComponentKind::MapMod,
            EventComponent::SoundFx { .. } => ComponentKind::SoundFx,
            EventComponent::Msg(_) => ComponentKind::Msg,
            EventComponent::ShakyCam(_) => ComponentKind::ShakyCam,
            EventComponent::RequiresStatus(_) => ComponentKind::RequiresStatus,
            EventComponent::RequiresNotStatus(_) => ComponentKind::RequiresNotStatus,
            EventComponent::SetStatus(_) => ComponentKind::SetStatus,
            EventComponent::UnsetStatus(_) => ComponentKind::UnsetStatus,
            EventComponent::Power(_) => ComponentKind::Power,
            EventComponent::Spawn(_) => ComponentKind::Spawn,
            EventComponent::Music(_) => ComponentKind::Music,
        }
    }
}

/// One `[event]` section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    /// Editor-only type tag
    pub type_name: String,
    pub activate: Activation,
    pub location: Rect,
    /// Clickable area for `on_interact` events
    pub hotspot: Option<Rect>,
    pub cooldown_ms: u32,
    pub delay_ms: u32,
    /// Keep the event after it fires
    pub repeat: bool,
    pub components: Vec<EventComponent>,
}

impl Default for Event {
    fn default() -> Self {
        Self {
            type_name: String::new(),
            activate: Activation::None,
            location: Rect::default(),
            hotspot: None,
            cooldown_ms: 0,
            delay_ms: 0,
            repeat: true,
            components: Vec::new(),
        }
    }
}

impl Event {
    /// First component of the given kind
    pub fn find_component(&self, kind: ComponentKind) -> Option<&EventComponent> {
        self.components.iter().find(|c| c.kind() == kind)
    }

    pub fn power(&self) -> Option<&PowerCast> {
        self.components.iter().find_map(|c| match c {
            EventComponent::Power(power) => Some(power),
            _ => None,
        })
    }

    pub fn power_mut(&mut self) -> Option<&mut PowerCast> {
        self.components.iter_mut().find_map(|c| match c {
            EventComponent::Power(power) => Some(power),
            _ => None,
        })
    }

    pub fn power_path(&self) -> Option<&PowerPath> {
        self.components.iter().find_map(|c| match c {
            EventComponent::PowerPath(path) => Some(path),
            _ => None,
        })
    }

    pub fn power_damage(&self) -> Option<&DamageRange> {
        self.components.iter().find_map(|c| match c {
            EventComponent::PowerDamage(damage) => Some(damage),
            _ => None,
        })
    }

    /// Apply the current `[event]` key from `parser`
    pub fn load_key(&mut self, parser: &mut FileParser, messages: &MessageCatalog) {
        let key = parser.key().to_string();
        match key.as_str() {
            "type" => self.type_name = parser.val().to_string(),
            "activate" => match Activation::parse(parser.val()) {
                Some(activate) => self.activate = activate,
                None => {
                    let message = format!("Event activation type '{}' unknown.", parser.val());
                    parser.report(Severity::Advisory, message);
                }
            },
            "location" => self.location = parse_rect(parser),
            "hotspot" => {
                self.hotspot = Some(if parser.val() == "location" {
                    self.location
                } else {
                    parse_rect(parser)
                });
            }
            "cooldown" => self.cooldown_ms = parse_duration(parser),
            "delay" => self.delay_ms = parse_duration(parser),
            "repeat" => self.repeat = to_bool(parser.val()),
            _ => match parse_component(&key, parser, messages) {
                Some(component) => self.components.push(component),
                None => {
                    let message = format!("Map: '{}' is not a valid key.", key);
                    parser.report(Severity::Advisory, message);
                }
            },
        }
    }
}

fn parse_component(
    key: &str,
    parser: &mut FileParser,
    messages: &MessageCatalog,
) -> Option<EventComponent> {
    let component = match key {
        "tooltip" => EventComponent::Tooltip(messages.get(parser.val())),
        "power_path" => {
            let source = parse_point(parser);
            let target = match parser.next_value().as_str() {
                "hero" => PathTarget::Hero,
                x => PathTarget::Tile(Point::new(to_int(x, 0), to_int(&parser.next_value(), 0))),
            };
            EventComponent::PowerPath(PowerPath { source, target })
        }
        "power_damage" => {
            let min = to_int(&parser.next_value(), 0);
            let max = to_int(&parser.next_value(), min);
            EventComponent::PowerDamage(DamageRange { min, max })
        }
        "intermap" => {
            let map = parser.next_value();
            EventComponent::Intermap {
                map,
                pos: parse_point(parser),
            }
        }
        "intramap" => EventComponent::Intramap(parse_point(parser)),
        "mapmod" => {
            let mut mods = Vec::new();
            loop {
                let layer = parser.next_value();
                if layer.is_empty() {
                    break;
                }
                let pos = parse_point(parser);
                let value = to_int(&parser.next_value(), 0).clamp(0, u16::MAX as i32) as u16;
                mods.push(MapMod { layer, pos, value });
            }
            EventComponent::MapMod(mods)
        }
        "soundfx" => {
            let file = parser.next_value();
            let x = parser.next_value();
            let pos = if x.is_empty() {
                None
            } else {
                Some(Point::new(to_int(&x, 0), to_int(&parser.next_value(), 0)))
            };
            EventComponent::SoundFx { file, pos }
        }
        "msg" => EventComponent::Msg(messages.get(parser.val())),
        "shakycam" => EventComponent::ShakyCam(parse_duration(parser)),
        "requires_status" => EventComponent::RequiresStatus(collect_list(parser)),
        "requires_not_status" => EventComponent::RequiresNotStatus(collect_list(parser)),
        "set_status" => EventComponent::SetStatus(collect_list(parser)),
        "unset_status" => EventComponent::UnsetStatus(collect_list(parser)),
        "power" => EventComponent::Power(PowerCast {
            power_id: to_int(parser.val(), 0),
            statblock: None,
        }),
        "spawn" => {
            let mut spawns = Vec::new();
            loop {
                let category = parser.next_value();
                if category.is_empty() {
                    break;
                }
                spawns.push(Spawn {
                    category,
                    pos: parse_point(parser),
                });
            }
            EventComponent::Spawn(spawns)
        }
        "music" => EventComponent::Music(parser.val().to_string()),
        _ => return None,
    };
    Some(component)
}

fn parse_point(parser: &mut FileParser) -> Point {
    let x = to_int(&parser.next_value(), 0);
    let y = to_int(&parser.next_value(), 0);
    Point::new(x, y)
}

fn parse_rect(parser: &mut FileParser) -> Rect {
    let origin = parse_point(parser);
    let w = to_int(&parser.next_value(), 1);
    let h = to_int(&parser.next_value(), 1);
    Rect::new(origin.x, origin.y, w, h)
}

fn parse_duration(parser: &mut FileParser) -> u32 {
    match parse_duration_ms(parser.val()) {
        Ok(ms) => ms,
        Err(e) => {
            parser.report(Severity::Advisory, e.to_string());
            0
        }
    }
}

fn collect_list(parser: &mut FileParser) -> Vec<String> {
    let mut list = Vec::new();
    parse_list(parser, &mut list);
    list
}
