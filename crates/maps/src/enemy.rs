//! Enemy spawn groups
//!
//! Each `[enemy]` section describes one group of enemies that may spawn in a
//! rectangular area when the map loads.

use crate::file_parser::FileParser;
use crate::error::Severity;
use mapdef_core::{to_int, Direction, FPoint, Point};
use serde::Serialize;

/// Wander radius used when a group declares no movement
pub const DEFAULT_WANDER_RADIUS: u32 = 4;

/// How spawned enemies move before they notice the player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Movement {
    /// Stay at the spawn point
    Stationary,
    /// Patrol the listed tile-centered points in order
    Waypoints(Vec<FPoint>),
    /// Wander randomly within this many tiles of the spawn point
    Wander(u32),
}

impl Default for Movement {
    fn default() -> Self {
        Movement::Wander(DEFAULT_WANDER_RADIUS)
    }
}

/// One spawn group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyGroup {
    /// Editor-only type tag
    pub type_name: String,
    /// Enemy category to draw spawns from
    pub category: String,
    /// Top-left tile of the spawn area
    pub pos: Point,
    /// Size of the spawn area in tiles
    pub area: Point,
    pub levelmin: u32,
    pub levelmax: u32,
    pub numbermin: u32,
    pub numbermax: u32,
    /// Spawn probability in `[0, 1]`
    pub chance: f32,
    /// Initial facing; `None` picks one at random
    pub direction: Option<Direction>,
    pub movement: Movement,
    pub requires_status: Vec<String>,
    pub requires_not_status: Vec<String>,
}

impl Default for EnemyGroup {
    fn default() -> Self {
        Self {
            type_name: String::new(),
            category: String::new(),
            pos: Point::default(),
            area: Point::new(1, 1),
            levelmin: 0,
            levelmax: 0,
            numbermin: 1,
            numbermax: 1,
            chance: 1.0,
            direction: None,
            movement: Movement::default(),
            requires_status: Vec::new(),
            requires_not_status: Vec::new(),
        }
    }
}

impl EnemyGroup {
    /// Waypoints to patrol; empty unless the group uses waypoint movement
    pub fn waypoints(&self) -> &[FPoint] {
        match &self.movement {
            Movement::Waypoints(points) => points,
            _ => &[],
        }
    }

    /// Wander radius in tiles; 0 unless the group wanders
    pub fn wander_radius(&self) -> u32 {
        match self.movement {
            Movement::Wander(radius) => radius,
            _ => 0,
        }
    }

    /// Apply the current `[enemy]` key from `parser`
    pub fn load_key(&mut self, parser: &mut FileParser) {
        match parser.key() {
            "type" => self.type_name = parser.val().to_string(),
            "category" => self.category = parser.val().to_string(),
            "level" => {
                let (min, max) = parse_range(parser);
                self.levelmin = min;
                self.levelmax = max;
            }
            "location" => {
                self.pos.x = to_int(&parser.next_value(), 0);
                self.pos.y = to_int(&parser.next_value(), 0);
                self.area.x = to_int(&parser.next_value(), 0);
                self.area.y = to_int(&parser.next_value(), 0);
            }
            "number" => {
                let (min, max) = parse_range(parser);
                self.numbermin = min;
                self.numbermax = max;
            }
            "chance" => {
                let percent = to_int(&parser.next_value(), 0).max(0) as f32;
                self.chance = (percent / 100.0).clamp(0.0, 1.0);
            }
            "direction" => self.direction = Some(Direction::parse(parser.val())),
            "waypoints" => {
                let mut points = match std::mem::replace(&mut self.movement, Movement::Stationary) {
                    Movement::Waypoints(points) => points,
                    _ => Vec::new(),
                };

                loop {
                    let x = parser.next_value();
                    if x.is_empty() {
                        break;
                    }
                    let y = parser.next_value();
                    points.push(FPoint::tile_center(to_int(&x, 0), to_int(&y, 0)));
                }

                if !points.is_empty() {
                    self.movement = Movement::Waypoints(points);
                }
            }
            "wander_radius" => {
                let radius = to_int(&parser.next_value(), 0).max(0) as u32;
                self.movement = if radius == 0 {
                    Movement::Stationary
                } else {
                    Movement::Wander(radius)
                };
            }
            "requires_status" => parse_list(parser, &mut self.requires_status),
            "requires_not_status" => parse_list(parser, &mut self.requires_not_status),
            key => {
                let message = format!("Map: '{}' is not a valid key.", key);
                parser.report(Severity::Advisory, message);
            }
        }
    }
}

/// Read `min[,max]`; both are clamped to 0 and `max` never drops below `min`
fn parse_range(parser: &mut FileParser) -> (u32, u32) {
    let min = to_int(&parser.next_value(), 0).max(0);
    let max = to_int(&parser.next_value(), min).max(min);
    (min as u32, max as u32)
}

/// Append every remaining comma-separated value to `list`
pub(crate) fn parse_list(parser: &mut FileParser, list: &mut Vec<String>) {
    loop {
        let value = parser.next_value();
        if value.is_empty() {
            break;
        }
        list.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> EnemyGroup {
        let mut parser = FileParser::from_str("enemy.txt", text);
        let mut group = EnemyGroup::default();
        while parser.next() {
            group.load_key(&mut parser);
        }
        group
    }

    #[test]
    fn test_defaults() {
        let group = EnemyGroup::default();
        assert_eq!(group.numbermin, 1);
        assert_eq!(group.chance, 1.0);
        assert_eq!(group.wander_radius(), DEFAULT_WANDER_RADIUS);
        assert!(group.waypoints().is_empty());
    }

    #[test]
    fn test_level_and_number_ranges() {
        let group = load("level=3\nnumber=5,2\n");
        assert_eq!((group.levelmin, group.levelmax), (3, 3));
        assert_eq!((group.numbermin, group.numbermax), (5, 5));

        let group = load("level=-4,2\nnumber=1,4\n");
        assert_eq!((group.levelmin, group.levelmax), (0, 2));
        assert_eq!((group.numbermin, group.numbermax), (1, 4));
    }

    #[test]
    fn test_location_and_chance() {
        let group = load("category=goblin\nlocation=4,5,3,2\nchance=250\ndirection=N\n");
        assert_eq!(group.category, "goblin");
        assert_eq!(group.pos, Point::new(4, 5));
        assert_eq!(group.area, Point::new(3, 2));
        assert_eq!(group.chance, 1.0);
        assert_eq!(group.direction, Some(Direction::North));

        assert_eq!(load("chance=25\n").chance, 0.25);
        assert_eq!(load("chance=-10\n").chance, 0.0);
    }

    #[test]
    fn test_waypoints_after_wander() {
        let group = load("wander_radius=6\nwaypoints=1,2,3,4\n");
        assert_eq!(group.wander_radius(), 0);
        assert_eq!(
            group.waypoints(),
            &[FPoint::new(1.5, 2.5), FPoint::new(3.5, 4.5)]
        );
    }

    #[test]
    fn test_wander_after_waypoints() {
        let group = load("waypoints=1,2\nwander_radius=6\n");
        assert!(group.waypoints().is_empty());
        assert_eq!(group.movement, Movement::Wander(6));
    }

    #[test]
    fn test_waypoints_accumulate() {
        let group = load("waypoints=1,1\nwaypoints=2,2\n");
        assert_eq!(group.waypoints().len(), 2);
    }

    #[test]
    fn test_zero_radius_is_stationary() {
        assert_eq!(load("wander_radius=0\n").movement, Movement::Stationary);
        assert_eq!(load("waypoints=\n").movement, Movement::Stationary);
    }

    #[test]
    fn test_status_lists() {
        let group = load("requires_status=a,b\nrequires_not_status=c\nrequires_status=d\n");
        assert_eq!(group.requires_status, vec!["a", "b", "d"]);
        assert_eq!(group.requires_not_status, vec!["c"]);
    }

    #[test]
    fn test_unknown_key_is_advisory() {
        let mut parser = FileParser::from_str("enemy.txt", "speed=3\n");
        let mut group = EnemyGroup::default();
        assert!(parser.next());
        group.load_key(&mut parser);

        let diagnostics = parser.take_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Advisory);
        assert_eq!(group, EnemyGroup::default());
    }
}
