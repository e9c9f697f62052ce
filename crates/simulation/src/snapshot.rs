//! Flat snapshot of the whole simulation state.
//!
//! One pointer-free record carries everything a save needs: the packed
//! connectivity bytes, the building arena, the economy aggregates, the
//! scheduler clock, and the RNG state. The powered bitset is deliberately
//! absent; it is derived and rebuilt on the next power pass. `validate`
//! clamps every field that could wedge the scheduler, so a hand-edited or
//! corrupted save degrades to a playable city instead of a stalled one.

use bevy::prelude::*;
use bitcode::{Decode, Encode};

use crate::buildings::{Building, BuildingRegistry};
use crate::config::{
    CONNECTION_MAP_BYTES, MAP_HEIGHT, MAP_WIDTH, MAX_BUILDINGS, MAX_FIRE_COUNTER,
    MAX_POPULATION_DENSITY, MAX_TAX_RATE, MAX_TIME_BETWEEN_DISASTERS,
    MIN_TIME_BETWEEN_DISASTERS,
};
use crate::economy::CityEconomy;
use crate::grid::ConnectivityGrid;
use crate::scheduler::{SimulationClock, STEP_MONTH};
use crate::sim_rng::{RngState, SimRng};

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct CitySnapshot {
    pub connections: [u8; CONNECTION_MAP_BYTES],
    pub buildings: [Building; MAX_BUILDINGS],
    pub economy: CityEconomy,
    pub clock: SimulationClock,
    pub rng: RngState,
}

impl CitySnapshot {
    /// Reads the entire core state into one flat record.
    pub fn capture(
        grid: &ConnectivityGrid,
        registry: &BuildingRegistry,
        economy: &CityEconomy,
        clock: &SimulationClock,
        rng: &SimRng,
    ) -> Self {
        Self {
            connections: grid.to_bytes(),
            buildings: *registry.slots(),
            economy: economy.clone(),
            clock: clock.clone(),
            rng: RngState::from_rng(rng),
        }
    }

    /// Writes the record back into the live resources. Call [`validate`]
    /// first on untrusted data; `restore` applies the record as-is.
    ///
    /// [`validate`]: CitySnapshot::validate
    pub fn restore(
        &self,
        grid: &mut ConnectivityGrid,
        registry: &mut BuildingRegistry,
        economy: &mut CityEconomy,
        clock: &mut SimulationClock,
        rng: &mut SimRng,
    ) {
        *grid = ConnectivityGrid::from_bytes(self.connections);
        registry.restore_slots(self.buildings);
        *economy = self.economy.clone();
        *clock = self.clock.clone();
        *rng = self.rng.to_rng();
    }

    /// Clamps every field that could put the scheduler, the disaster
    /// countdown, or the building arena into an out-of-range state. Each
    /// repair is logged. Returns the number of fields touched.
    pub fn validate(&mut self) -> u32 {
        let mut repairs = 0;

        if self.clock.cursor > STEP_MONTH {
            warn!("snapshot: cursor {} out of range, reset to 0", self.clock.cursor);
            self.clock.cursor = 0;
            repairs += 1;
        }
        if self.clock.month >= 12 {
            warn!("snapshot: month {} out of range, reset to 0", self.clock.month);
            self.clock.month = 0;
            repairs += 1;
        }
        if self.clock.time_to_next_disaster == 0
            || self.clock.time_to_next_disaster > MAX_TIME_BETWEEN_DISASTERS
        {
            warn!(
                "snapshot: disaster countdown {} out of range, reset to {}",
                self.clock.time_to_next_disaster, MIN_TIME_BETWEEN_DISASTERS
            );
            self.clock.time_to_next_disaster = MIN_TIME_BETWEEN_DISASTERS;
            repairs += 1;
        }
        if self.economy.tax_rate > MAX_TAX_RATE {
            warn!(
                "snapshot: tax rate {} out of range, clamped to {}",
                self.economy.tax_rate, MAX_TAX_RATE
            );
            self.economy.tax_rate = MAX_TAX_RATE;
            repairs += 1;
        }

        for (n, building) in self.buildings.iter_mut().enumerate() {
            if building.is_empty_slot() {
                continue;
            }
            let info = building.kind.info();
            if building.x as usize + info.width as usize > MAP_WIDTH
                || building.y as usize + info.height as usize > MAP_HEIGHT
            {
                warn!(
                    "snapshot: building {n} footprint at ({}, {}) exceeds the map, slot emptied",
                    building.x, building.y
                );
                *building = Building::EMPTY;
                repairs += 1;
                continue;
            }
            if building.population_density > MAX_POPULATION_DENSITY {
                warn!(
                    "snapshot: building {n} density {} clamped",
                    building.population_density
                );
                building.population_density = MAX_POPULATION_DENSITY;
                repairs += 1;
            }
            if building.on_fire > MAX_FIRE_COUNTER {
                warn!("snapshot: building {n} fire counter {} clamped", building.on_fire);
                building.on_fire = MAX_FIRE_COUNTER;
                repairs += 1;
            }
        }

        repairs
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buildings::BuildingKind;

    fn sample_state() -> (ConnectivityGrid, BuildingRegistry, CityEconomy, SimulationClock, SimRng)
    {
        let mut grid = ConnectivityGrid::default();
        let mut registry = BuildingRegistry::default();
        registry.place(BuildingKind::PowerPlant, 10, 10, &mut grid);
        let res = registry.place(BuildingKind::Residential, 14, 10, &mut grid).unwrap();
        registry.get_mut(res).unwrap().population_density = 6;
        grid.set(5, 5, crate::grid::ROAD_MASK);

        let mut economy = CityEconomy::default();
        economy.funds = 1234;
        economy.residential_population = 6;

        let mut clock = SimulationClock::default();
        clock.cursor = 42;
        clock.month = 7;
        clock.year = 3;

        let mut rng = SimRng::from_seed_u64(99);
        for _ in 0..10 {
            rng.roll_u8();
        }
        (grid, registry, economy, clock, rng)
    }

    #[test]
    fn test_capture_restore_roundtrip() {
        let (grid, registry, economy, clock, rng) = sample_state();
        let snapshot = CitySnapshot::capture(&grid, &registry, &economy, &clock, &rng);

        let mut grid2 = ConnectivityGrid::default();
        let mut registry2 = BuildingRegistry::default();
        let mut economy2 = CityEconomy::default();
        let mut clock2 = SimulationClock::default();
        let mut rng2 = SimRng::default();
        snapshot.restore(&mut grid2, &mut registry2, &mut economy2, &mut clock2, &mut rng2);

        assert!(grid2 == grid);
        assert_eq!(registry2.slots(), registry.slots());
        assert_eq!(economy2, economy);
        assert_eq!(clock2, clock);
        // The restored RNG continues the identical sequence.
        let mut original = rng;
        let mut restored = rng2;
        assert_eq!(
            (0..20).map(|_| original.roll_u8()).collect::<Vec<_>>(),
            (0..20).map(|_| restored.roll_u8()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_bitcode_roundtrip() {
        let (grid, registry, economy, clock, rng) = sample_state();
        let snapshot = CitySnapshot::capture(&grid, &registry, &economy, &clock, &rng);
        let bytes = bitcode::encode(&snapshot);
        let decoded: CitySnapshot = bitcode::decode(&bytes).expect("decode");
        assert_eq!(decoded.buildings, snapshot.buildings);
        assert_eq!(decoded.economy, snapshot.economy);
        assert_eq!(decoded.clock, snapshot.clock);
        assert_eq!(decoded.rng, snapshot.rng);
    }

    #[test]
    fn test_validate_accepts_healthy_state() {
        let (grid, registry, economy, clock, rng) = sample_state();
        let mut snapshot = CitySnapshot::capture(&grid, &registry, &economy, &clock, &rng);
        assert_eq!(snapshot.validate(), 0);
    }

    #[test]
    fn test_validate_clamps_scheduler_fields() {
        let (grid, registry, economy, clock, rng) = sample_state();
        let mut snapshot = CitySnapshot::capture(&grid, &registry, &economy, &clock, &rng);
        snapshot.clock.cursor = 999;
        snapshot.clock.month = 13;
        snapshot.clock.time_to_next_disaster = MAX_TIME_BETWEEN_DISASTERS + 1;
        snapshot.economy.tax_rate = 250;

        assert_eq!(snapshot.validate(), 4);
        assert_eq!(snapshot.clock.cursor, 0);
        assert_eq!(snapshot.clock.month, 0);
        assert_eq!(snapshot.clock.time_to_next_disaster, MIN_TIME_BETWEEN_DISASTERS);
        assert_eq!(snapshot.economy.tax_rate, MAX_TAX_RATE);
    }

    #[test]
    fn test_validate_repairs_buildings() {
        let (grid, registry, economy, clock, rng) = sample_state();
        let mut snapshot = CitySnapshot::capture(&grid, &registry, &economy, &clock, &rng);
        // Slot 0 is the 4x4 plant: push it so the footprint hangs off-map.
        snapshot.buildings[0].x = 46;
        snapshot.buildings[1].population_density = 99;
        snapshot.buildings[1].on_fire = 9;

        assert_eq!(snapshot.validate(), 3);
        assert!(snapshot.buildings[0].is_empty_slot());
        assert_eq!(snapshot.buildings[1].population_density, MAX_POPULATION_DENSITY);
        assert_eq!(snapshot.buildings[1].on_fire, MAX_FIRE_COUNTER);
    }

    #[test]
    fn test_validate_zero_countdown_reseeded() {
        let (grid, registry, economy, clock, rng) = sample_state();
        let mut snapshot = CitySnapshot::capture(&grid, &registry, &economy, &clock, &rng);
        snapshot.clock.time_to_next_disaster = 0;
        assert_eq!(snapshot.validate(), 1);
        assert_eq!(snapshot.clock.time_to_next_disaster, MIN_TIME_BETWEEN_DISASTERS);
    }
}
