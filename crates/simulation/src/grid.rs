//! Packed road / power-line connectivity grid.
//!
//! Each tile stores two independent bits (road, power line), packed four
//! tiles per byte. The packing is an explicit contract rather than a native
//! bitfield: tile `i = y * MAP_WIDTH + x` occupies bits `2*(i & 3)` and
//! `2*(i & 3) + 1` of byte `i >> 2`. Building footprints are stamped with
//! the power-line bit so the power flood fill treats building interiors as
//! electrical nodes.

use bevy::prelude::*;
use bitcode::{Decode, Encode};

use crate::config::{CONNECTION_MAP_BYTES, MAP_HEIGHT, MAP_WIDTH};
use crate::terrain::TerrainMap;

/// Connectivity bit for a road on a tile.
pub const ROAD_MASK: u8 = 1;
/// Connectivity bit for a power line on a tile.
pub const POWER_MASK: u8 = 2;

/// Neighbour direction bits returned by [`ConnectivityGrid::neighbour_mask`].
pub const NEIGHBOUR_NORTH: u8 = 1;
pub const NEIGHBOUR_EAST: u8 = 2;
pub const NEIGHBOUR_SOUTH: u8 = 4;
pub const NEIGHBOUR_WEST: u8 = 8;

/// Canonical tile variant for each 4-bit neighbour code. The table collapses
/// symmetric patterns (e.g. a lone north neighbour and a lone south
/// neighbour both render the vertical variant) and is relied on by renderers
/// for tile atlas offsets, so the values are fixed.
pub const TILE_VARIANTS: [u8; 16] = [0, 1, 0, 5, 1, 1, 2, 9, 0, 4, 0, 8, 3, 7, 6, 10];

/// Packed 2-bit-per-tile connectivity storage.
#[derive(Resource, Clone, Encode, Decode, PartialEq, Eq)]
pub struct ConnectivityGrid {
    bytes: [u8; CONNECTION_MAP_BYTES],
}

impl Default for ConnectivityGrid {
    fn default() -> Self {
        Self {
            bytes: [0; CONNECTION_MAP_BYTES],
        }
    }
}

impl ConnectivityGrid {
    /// Connectivity mask at `(x, y)`, or 0 when out of range.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> u8 {
        if x >= 0 && x < MAP_WIDTH as i32 && y >= 0 && y < MAP_HEIGHT as i32 {
            let index = y as usize * MAP_WIDTH + x as usize;
            let shift = 2 * (index & 3);
            (self.bytes[index >> 2] >> shift) & 3
        } else {
            0
        }
    }

    /// Overwrites the 2-bit mask at `(x, y)`. Callers that want additive
    /// behaviour must read-modify-write. No-op when out of range.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, mask: u8) {
        if x >= 0 && x < MAP_WIDTH as i32 && y >= 0 && y < MAP_HEIGHT as i32 {
            let index = y as usize * MAP_WIDTH + x as usize;
            let shift = 2 * (index & 3);
            let byte = &mut self.bytes[index >> 2];
            *byte = (*byte & !(3 << shift)) | ((mask & 3) << shift);
        }
    }

    /// 4-bit code of which cardinal neighbours carry any bit of `mask`.
    /// Off-map neighbours contribute nothing.
    pub fn neighbour_mask(&self, x: i32, y: i32, mask: u8) -> u8 {
        let mut neighbours = 0;
        if self.get(x, y - 1) & mask != 0 {
            neighbours |= NEIGHBOUR_NORTH;
        }
        if self.get(x + 1, y) & mask != 0 {
            neighbours |= NEIGHBOUR_EAST;
        }
        if self.get(x, y + 1) & mask != 0 {
            neighbours |= NEIGHBOUR_SOUTH;
        }
        if self.get(x - 1, y) & mask != 0 {
            neighbours |= NEIGHBOUR_WEST;
        }
        neighbours
    }

    /// Visual variant index for the tile, from the fixed 16-entry table.
    pub fn tile_variant(&self, x: i32, y: i32, mask: u8) -> u8 {
        TILE_VARIANTS[self.neighbour_mask(x, y, mask) as usize]
    }

    /// Whether a bridged (over non-clear terrain) tile is legal here.
    ///
    /// Bridges only exist for a single-direction or straight-through
    /// neighbour pattern, and never next to an occupied tile that sits over
    /// non-clear terrain with a perpendicular connection, which would make
    /// two bridges cross.
    pub fn bridge_eligible(&self, x: i32, y: i32, mask: u8, terrain: &TerrainMap) -> bool {
        let neighbours = self.neighbour_mask(x, y, mask);

        let straight = matches!(
            neighbours,
            NEIGHBOUR_NORTH | NEIGHBOUR_EAST | NEIGHBOUR_SOUTH | NEIGHBOUR_WEST
        ) || neighbours == (NEIGHBOUR_NORTH | NEIGHBOUR_SOUTH)
            || neighbours == (NEIGHBOUR_EAST | NEIGHBOUR_WEST);
        if !straight {
            return false;
        }

        if neighbours & NEIGHBOUR_NORTH != 0
            && !terrain.is_clear(x, y - 1)
            && self.neighbour_mask(x, y - 1, mask) & (NEIGHBOUR_EAST | NEIGHBOUR_WEST) != 0
        {
            return false;
        }
        if neighbours & NEIGHBOUR_EAST != 0
            && !terrain.is_clear(x + 1, y)
            && self.neighbour_mask(x + 1, y, mask) & (NEIGHBOUR_NORTH | NEIGHBOUR_SOUTH) != 0
        {
            return false;
        }
        if neighbours & NEIGHBOUR_SOUTH != 0
            && !terrain.is_clear(x, y + 1)
            && self.neighbour_mask(x, y + 1, mask) & (NEIGHBOUR_EAST | NEIGHBOUR_WEST) != 0
        {
            return false;
        }
        if neighbours & NEIGHBOUR_WEST != 0
            && !terrain.is_clear(x - 1, y)
            && self.neighbour_mask(x - 1, y, mask) & (NEIGHBOUR_NORTH | NEIGHBOUR_SOUTH) != 0
        {
            return false;
        }

        true
    }

    /// Number of tiles carrying the road bit. Full-grid scan; only the
    /// yearly budget settlement calls this.
    pub fn road_tile_count(&self) -> u32 {
        let mut count = 0;
        for y in 0..MAP_HEIGHT as i32 {
            for x in 0..MAP_WIDTH as i32 {
                if self.get(x, y) & ROAD_MASK != 0 {
                    count += 1;
                }
            }
        }
        count
    }

    /// Raw packed bytes, for the snapshot record.
    pub fn to_bytes(&self) -> [u8; CONNECTION_MAP_BYTES] {
        self.bytes
    }

    /// Rebuilds the grid from snapshot bytes.
    pub fn from_bytes(bytes: [u8; CONNECTION_MAP_BYTES]) -> Self {
        Self { bytes }
    }
}
