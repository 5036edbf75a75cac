//! Tile layers
//!
//! A map is a stack of named layers, each a `width x height` grid of 16-bit
//! tile indices stored in row-major order.

use serde::Serialize;

/// Reserved name of the layer used for movement blocking
pub const COLLISION_LAYER: &str = "collision";

/// Tile index meaning "no tile"
pub const EMPTY_TILE: u16 = 0;

/// Values stored in the collision layer
///
/// Only [`BLOCKS_NONE`] is walkable. [`BLOCKS_MOVEMENT_HIDDEN`] blocks
/// movement but is not drawn by map editors.
pub const BLOCKS_NONE: u16 = 0;
pub const BLOCKS_ALL: u16 = 1;
pub const BLOCKS_MOVEMENT_HIDDEN: u16 = 4;

/// A complete tile layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileLayer {
    /// Layer name (e.g. "background", "collision")
    pub name: String,

    width: usize,
    height: usize,

    /// Tile data, `width * height` entries
    tiles: Vec<u16>,
}

impl TileLayer {
    /// Create a new layer filled with [`EMPTY_TILE`]
    pub fn new(name: impl Into<String>, width: usize, height: usize) -> Self {
        Self::with_fill(name, width, height, EMPTY_TILE)
    }

    /// Create a layer filled with a specific tile
    pub fn with_fill(name: impl Into<String>, width: usize, height: usize, fill_tile: u16) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            tiles: vec![fill_tile; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Get tile at position (x, y), or `None` outside the layer
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u16> {
        self.contains(x, y).then(|| self.tiles[y * self.width + x])
    }

    /// Mutable access to the tile at (x, y)
    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut u16> {
        if self.contains(x, y) {
            Some(&mut self.tiles[y * self.width + x])
        } else {
            None
        }
    }

    /// Set tile at position (x, y); out-of-range writes are ignored
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, tile: u16) {
        if let Some(slot) = self.get_mut(x, y) {
            *slot = tile;
        }
    }

    /// Change the layer's size, keeping tiles in the overlapping area and
    /// filling new cells with [`EMPTY_TILE`]
    pub fn resize(&mut self, width: usize, height: usize) {
        let mut tiles = vec![EMPTY_TILE; width * height];
        for y in 0..self.height.min(height) {
            let keep = self.width.min(width);
            let src = y * self.width;
            tiles[y * width..y * width + keep].copy_from_slice(&self.tiles[src..src + keep]);
        }
        self.width = width;
        self.height = height;
        self.tiles = tiles;
    }

    /// One row of tiles
    pub fn row(&self, y: usize) -> Option<&[u16]> {
        (y < self.height).then(|| &self.tiles[y * self.width..(y + 1) * self.width])
    }

    /// Get the raw tile data
    #[inline]
    pub fn data(&self) -> &[u16] {
        &self.tiles
    }

    pub fn is_collision(&self) -> bool {
        self.name == COLLISION_LAYER
    }
}
