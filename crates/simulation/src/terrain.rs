//! Terrain clearness oracle.
//!
//! Terrain generation and rendering live outside the core; the simulation
//! only ever asks one question: is this tile buildable ground? Hosts fill
//! the map once at city creation (river / island / lake layouts or anything
//! else) and the core treats it as read-only.

use bevy::prelude::*;

use crate::config::{MAP_HEIGHT, MAP_WIDTH, TERRAIN_MAP_BYTES};

/// One bit per tile: set means clear, buildable ground.
#[derive(Resource, Clone)]
pub struct TerrainMap {
    bits: [u8; TERRAIN_MAP_BYTES],
}

impl Default for TerrainMap {
    fn default() -> Self {
        // All clear. Hosts overwrite with a real layout.
        Self {
            bits: [0xFF; TERRAIN_MAP_BYTES],
        }
    }
}

impl TerrainMap {
    /// Builds a map from a per-tile predicate (true = clear ground).
    pub fn from_fn(mut clear: impl FnMut(i32, i32) -> bool) -> Self {
        let mut map = Self {
            bits: [0; TERRAIN_MAP_BYTES],
        };
        for y in 0..MAP_HEIGHT as i32 {
            for x in 0..MAP_WIDTH as i32 {
                if clear(x, y) {
                    let index = y as usize * MAP_WIDTH + x as usize;
                    map.bits[index >> 3] |= 1 << (index & 7);
                }
            }
        }
        map
    }

    /// Whether `(x, y)` is clear, buildable ground. Off-map is never clear.
    #[inline]
    pub fn is_clear(&self, x: i32, y: i32) -> bool {
        if x >= 0 && x < MAP_WIDTH as i32 && y >= 0 && y < MAP_HEIGHT as i32 {
            let index = y as usize * MAP_WIDTH + x as usize;
            self.bits[index >> 3] & (1 << (index & 7)) != 0
        } else {
            false
        }
    }
}
