//! Builder over a headless `App` for integration tests.

use bevy::prelude::*;

use crate::buildings::{BuildingKind, BuildingRegistry};
use crate::grid::ConnectivityGrid;
use crate::scheduler::{SimulationClock, STEP_MONTH};
use crate::sim_rng::SimRng;
use crate::CityCorePlugin;

pub struct TestCity {
    pub app: App,
}

impl TestCity {
    pub fn seeded(seed: u64) -> Self {
        let mut app = App::new();
        app.add_plugins(CityCorePlugin);
        app.insert_resource(SimRng::from_seed_u64(seed));
        Self { app }
    }

    /// One external tick: a single `FixedUpdate` pass.
    pub fn tick(&mut self) {
        self.app.world_mut().run_schedule(FixedUpdate);
    }

    /// One full scheduler cycle (every building plus the three full passes).
    pub fn cycle(&mut self) {
        for _ in 0..=STEP_MONTH {
            self.tick();
        }
    }

    /// Places a building directly through the registry (bypassing costs).
    pub fn place(&mut self, kind: BuildingKind, x: u8, y: u8) -> usize {
        self.app
            .world_mut()
            .resource_scope(|world, mut registry: Mut<BuildingRegistry>| {
                world.resource_scope(|_, mut grid: Mut<ConnectivityGrid>| {
                    registry
                        .place(kind, x, y, &mut grid)
                        .expect("test city ran out of building slots")
                })
            })
    }

    /// Marks a slot powered and seeds its density, as if a power pass and
    /// some growth already happened.
    pub fn prime(&mut self, index: usize, density: u8, powered: bool) {
        let mut registry = self.app.world_mut().resource_mut::<BuildingRegistry>();
        let building = registry.get_mut(index).expect("slot out of range");
        building.population_density = density;
        building.has_power = powered;
    }

    /// Lays a horizontal run of road tiles.
    pub fn road_row(&mut self, x: i32, y: i32, len: i32) {
        let mut grid = self.app.world_mut().resource_mut::<ConnectivityGrid>();
        for i in 0..len {
            grid.set(x + i, y, crate::grid::ROAD_MASK);
        }
    }

    pub fn registry(&self) -> &BuildingRegistry {
        self.app.world().resource::<BuildingRegistry>()
    }

    pub fn clock(&self) -> &SimulationClock {
        self.app.world().resource::<SimulationClock>()
    }

    pub fn density(&self, index: usize) -> u8 {
        self.registry().slots()[index].population_density
    }
}
