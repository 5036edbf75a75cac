//! Facing directions
//!
//! Maps use eight compass directions, numbered clockwise starting at
//! south-west.

use crate::parsing::to_int;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    SouthWest,
    West,
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
    ];

    /// Parse a direction token
    ///
    /// Accepts compass abbreviations (`N`, `NE`, ..., case-insensitive) or a
    /// number, which is clamped to `0..=7`.
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_uppercase().as_str() {
            "SW" => Direction::SouthWest,
            "W" => Direction::West,
            "NW" => Direction::NorthWest,
            "N" => Direction::North,
            "NE" => Direction::NorthEast,
            "E" => Direction::East,
            "SE" => Direction::SouthEast,
            "S" => Direction::South,
            other => Self::from_index(to_int(other, 0).clamp(0, 7) as u8),
        }
    }

    /// Direction for a numeric facing; values past 7 saturate to south
    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index as usize).min(7)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compass() {
        assert_eq!(Direction::parse("N"), Direction::North);
        assert_eq!(Direction::parse("se"), Direction::SouthEast);
        assert_eq!(Direction::parse(" W "), Direction::West);
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(Direction::parse("3"), Direction::North);
        assert_eq!(Direction::parse("7"), Direction::South);
        assert_eq!(Direction::parse("42"), Direction::South);
        assert_eq!(Direction::parse("-1"), Direction::SouthWest);
        assert_eq!(Direction::parse("garbage"), Direction::SouthWest);
    }
}
