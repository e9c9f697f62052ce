//! Headless city-simulation core.
//!
//! A fixed 48×48 tile city: packed road/power-line connectivity, a
//! fixed-capacity building arena, flood-filled power distribution, and an
//! amortized scheduler that advances the economy, population, and fire
//! model one bounded unit of work per tick. Rendering, UI, input, terrain
//! generation, and file I/O are host concerns; the core exchanges events
//! and a flat snapshot record with them.
//!
//! All state lives in Bevy resources owned by the `App`'s `World`; one
//! `FixedUpdate` run performs exactly one scheduler step.

use bevy::prelude::*;

pub mod actions;
pub mod budget;
pub mod buildings;
pub mod config;
pub mod economy;
pub mod events;
pub mod fire;
pub mod grid;
pub mod power;
pub mod scheduler;
pub mod sim_rng;
pub mod snapshot;
pub mod stats;
pub mod terrain;

#[cfg(test)]
mod integration_tests;

use buildings::BuildingRegistry;
use economy::CityEconomy;
use events::{BudgetReviewRequested, DisasterStruck, TilesChanged};
use grid::ConnectivityGrid;
use power::{FillStrategy, PowerGrid};
use scheduler::SimulationClock;
use sim_rng::SimRng;
use terrain::TerrainMap;

// ---------------------------------------------------------------------------
// System sets
// ---------------------------------------------------------------------------

/// Ordered phases for systems in the `FixedUpdate` schedule, chained
/// `PreSim → Simulation → PostSim`. The core's scheduler runs in
/// `Simulation`; hosts hang their own pre/post work off the outer phases.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Host-side setup that must precede the step (input application).
    PreSim,
    /// The amortized scheduler step.
    Simulation,
    /// Read-only aggregation and presentation feeds.
    PostSim,
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct CityCorePlugin;

impl Plugin for CityCorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ConnectivityGrid>()
            .init_resource::<TerrainMap>()
            .init_resource::<BuildingRegistry>()
            .init_resource::<PowerGrid>()
            .init_resource::<FillStrategy>()
            .init_resource::<CityEconomy>()
            .init_resource::<SimulationClock>()
            .init_resource::<SimRng>()
            .add_event::<TilesChanged>()
            .add_event::<DisasterStruck>()
            .add_event::<BudgetReviewRequested>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::PreSim,
                    SimulationSet::Simulation,
                    SimulationSet::PostSim,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                scheduler::advance.in_set(SimulationSet::Simulation),
            );
    }
}
