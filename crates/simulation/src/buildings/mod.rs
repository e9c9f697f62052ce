//! Fixed-capacity building arena.
//!
//! All building records live in one `[Building; MAX_BUILDINGS]` array owned
//! by the registry. Callers address buildings by slot index and must
//! revalidate the slot after any placement or destruction, since slots are
//! recycled in place. Destruction converts a record into rubble of matching
//! footprint rather than freeing the slot, so the burned-out lot keeps
//! occupying its tiles until something replaces it.

pub mod types;

use bevy::prelude::*;
use bitcode::{Decode, Encode};

pub use types::{Building, BuildingInfo, BuildingKind};

use crate::config::{MAP_HEIGHT, MAP_WIDTH, MAX_BUILDINGS};
use crate::grid::{ConnectivityGrid, POWER_MASK, ROAD_MASK};
use crate::terrain::TerrainMap;

#[derive(Resource, Clone, Encode, Decode)]
pub struct BuildingRegistry {
    slots: [Building; MAX_BUILDINGS],
}

impl Default for BuildingRegistry {
    fn default() -> Self {
        Self {
            slots: [Building::EMPTY; MAX_BUILDINGS],
        }
    }
}

impl BuildingRegistry {
    /// Borrow a slot. Empty slots are returned too; check `kind`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Building> {
        self.slots.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Building> {
        self.slots.get_mut(index)
    }

    /// All slots, including empty ones, in arena order.
    #[inline]
    pub fn slots(&self) -> &[Building; MAX_BUILDINGS] {
        &self.slots
    }

    /// Occupied slots with their indices.
    pub fn iter_occupied(&self) -> impl Iterator<Item = (usize, &Building)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.is_empty_slot())
    }

    /// Number of occupied slots of the given kind.
    pub fn count_of(&self, kind: BuildingKind) -> u32 {
        self.slots.iter().filter(|b| b.kind == kind).count() as u32
    }

    /// First slot whose footprint contains the tile. Non-rubble footprints
    /// never overlap, so at most one non-rubble match exists.
    pub fn find_at(&self, x: i32, y: i32) -> Option<usize> {
        self.slots
            .iter()
            .position(|b| !b.is_empty_slot() && b.contains(x, y))
    }

    /// Whether the footprint of `kind` fits at `(x, y)`: inside the map, on
    /// clear terrain, not across a road, and not over a non-rubble building.
    pub fn can_place(
        &self,
        kind: BuildingKind,
        x: u8,
        y: u8,
        grid: &ConnectivityGrid,
        terrain: &TerrainMap,
    ) -> bool {
        let info = kind.info();
        if x as usize + info.width as usize > MAP_WIDTH
            || y as usize + info.height as usize > MAP_HEIGHT
        {
            return false;
        }

        for j in y as i32..y as i32 + info.height as i32 {
            for i in x as i32..x as i32 + info.width as i32 {
                if !terrain.is_clear(i, j) {
                    return false;
                }
                if grid.get(i, j) & ROAD_MASK != 0 {
                    return false;
                }
            }
        }

        let candidate = Building {
            kind,
            x,
            y,
            ..Building::EMPTY
        };
        !self
            .slots
            .iter()
            .any(|b| !b.is_empty_slot() && !b.kind.is_rubble() && b.overlaps(&candidate))
    }

    /// Places a building, stamping its footprint into the connectivity grid
    /// and consuming any rubble records the footprint covers. Returns the
    /// slot index, or `None` when the arena has neither an empty nor a
    /// rubble slot left. Validity (`can_place`) and funds are the caller's
    /// responsibility.
    pub fn place(
        &mut self,
        kind: BuildingKind,
        x: u8,
        y: u8,
        grid: &mut ConnectivityGrid,
    ) -> Option<usize> {
        let index = self
            .slots
            .iter()
            .position(|b| b.is_empty_slot())
            .or_else(|| self.slots.iter().position(|b| b.kind.is_rubble()))?;

        self.slots[index] = Building {
            kind,
            x,
            y,
            population_density: 0,
            on_fire: 0,
            heavy_traffic: false,
            has_power: false,
        };

        // Footprints read as power-line tiles so the flood fill flows
        // through building interiors; non-conductive kinds stamp nothing.
        let info = kind.info();
        let mask = if kind.is_conductive() { POWER_MASK } else { 0 };
        for j in y as i32..y as i32 + info.height as i32 {
            for i in x as i32..x as i32 + info.width as i32 {
                grid.set(i, j, mask);
            }
        }

        let placed = self.slots[index];
        for (n, slot) in self.slots.iter_mut().enumerate() {
            if n != index && slot.kind.is_rubble() && slot.overlaps(&placed) {
                *slot = Building::EMPTY;
            }
        }

        Some(index)
    }

    /// Destroys the building in `index`, zeroing its footprint connectivity
    /// and converting the record into rubble sized by footprint width. The
    /// slot stays occupied until rubble is cleared or built over.
    pub fn destroy(&mut self, index: usize, grid: &mut ConnectivityGrid) {
        let Some(building) = self.slots.get_mut(index) else {
            return;
        };
        if building.is_empty_slot() {
            return;
        }

        let info = building.kind.info();
        for j in building.y as i32..building.y as i32 + info.height as i32 {
            for i in building.x as i32..building.x as i32 + info.width as i32 {
                grid.set(i, j, 0);
            }
        }

        building.on_fire = 0;
        building.population_density = 0;
        building.heavy_traffic = false;
        building.has_power = false;
        building.kind = if info.width == 3 {
            BuildingKind::Rubble3x3
        } else {
            BuildingKind::Rubble4x4
        };
    }

    /// Replaces all slots from a snapshot.
    pub fn restore_slots(&mut self, slots: [Building; MAX_BUILDINGS]) {
        self.slots = slots;
    }
}
