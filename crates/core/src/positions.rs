//! Position types for map objects

use serde::{Deserialize, Serialize};

/// Integer tile coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Center of this tile in continuous map space
    pub fn center(self) -> FPoint {
        FPoint::tile_center(self.x, self.y)
    }
}

/// Continuous map position, measured in tiles
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FPoint {
    pub x: f32,
    pub y: f32,
}

impl FPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Center of the tile at `(x, y)`
    pub fn tile_center(x: i32, y: i32) -> Self {
        Self {
            x: x as f32 + 0.5,
            y: y as f32 + 0.5,
        }
    }

    /// Tile containing this position, or `None` when it lies left of or
    /// above the map origin
    pub fn to_tile(self) -> Option<(usize, usize)> {
        if self.x < 0.0 || self.y < 0.0 {
            return None;
        }
        Some((self.x.floor() as usize, self.y.floor() as usize))
    }
}

/// Axis-aligned tile rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_center() {
        let p = FPoint::tile_center(2, 3);
        assert_eq!(p.x, 2.5);
        assert_eq!(p.y, 3.5);
        assert_eq!(Point::new(2, 3).center(), p);
    }

    #[test]
    fn test_to_tile() {
        assert_eq!(FPoint::new(0.5, 0.5).to_tile(), Some((0, 0)));
        assert_eq!(FPoint::new(7.9, 1.2).to_tile(), Some((7, 1)));
        assert_eq!(FPoint::new(-0.5, 1.5).to_tile(), None);
    }

    #[test]
    fn test_rect_origin() {
        let r = Rect::new(1, 2, 3, 4);
        assert_eq!(r.origin(), Point::new(1, 2));
        assert_eq!(r.origin().center(), FPoint::new(1.5, 2.5));
    }
}
