//! Amortized simulation scheduler.
//!
//! A single cursor advances one step per tick so the per-frame cost stays
//! bounded no matter how large the city is: steps `0..MAX_BUILDINGS` visit
//! one building each, then one full power recompute, one population
//! recount, and one calendar step, after which the cursor wraps. The
//! disaster countdown runs on every tick independently of the cursor.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::buildings::BuildingRegistry;
use crate::config::{MAX_BUILDINGS, MAX_TIME_BETWEEN_DISASTERS, MIN_TIME_BETWEEN_DISASTERS};
use crate::economy::{self, CityEconomy};
use crate::events::{BudgetReviewRequested, DisasterStruck, TilesChanged};
use crate::fire;
use crate::grid::ConnectivityGrid;
use crate::power::{recompute_power, FillStrategy, PowerGrid};
use crate::sim_rng::SimRng;
use crate::{budget, stats};

/// Cursor value for the full power recompute step.
pub const STEP_POWER: u16 = MAX_BUILDINGS as u16;
/// Cursor value for the population recount step.
pub const STEP_POPULATION: u16 = STEP_POWER + 1;
/// Cursor value for the calendar / rollover step; the cursor wraps after it.
pub const STEP_MONTH: u16 = STEP_POWER + 2;

/// Scheduler cursor, calendar, and disaster countdown.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct SimulationClock {
    pub cursor: u16,
    pub month: u8,
    pub year: u16,
    pub time_to_next_disaster: u16,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            cursor: 0,
            month: 0,
            year: 0,
            time_to_next_disaster: MAX_TIME_BETWEEN_DISASTERS,
        }
    }
}

/// Performs exactly one scheduler step plus the disaster countdown check.
/// This is the tick entry point; the Bevy system below is a thin wrapper so
/// hosts can also call it directly with split borrows.
#[allow(clippy::too_many_arguments)]
pub fn advance_once(
    clock: &mut SimulationClock,
    registry: &mut BuildingRegistry,
    grid: &mut ConnectivityGrid,
    power: &mut PowerGrid,
    strategy: FillStrategy,
    economy: &mut CityEconomy,
    rng: &mut SimRng,
    tiles_changed: &mut Events<TilesChanged>,
    disasters: &mut Events<DisasterStruck>,
    reviews: &mut Events<BudgetReviewRequested>,
) {
    let cursor = clock.cursor;
    if (cursor as usize) < MAX_BUILDINGS {
        let index = cursor as usize;
        let building = registry.slots()[index];
        if building.on_fire > 0 {
            fire::simulate_burning(index, registry, grid, rng, tiles_changed);
        } else if building.kind.is_zone() {
            economy::simulate_zone(index, registry, grid, economy, rng);
        }
        clock.cursor += 1;
    } else if cursor == STEP_POWER {
        recompute_power(grid, power, registry, strategy);
        clock.cursor += 1;
    } else if cursor == STEP_POPULATION {
        stats::recount_population(registry, economy);
        clock.cursor += 1;
    } else {
        clock.cursor = 0;
        clock.month += 1;
        if clock.month >= 12 {
            clock.month = 0;
            clock.year += 1;
            budget::settle_budget(registry, grid, economy, clock.year, reviews);
        }
    }

    clock.time_to_next_disaster = clock.time_to_next_disaster.saturating_sub(1);
    if clock.time_to_next_disaster == 0 {
        fire::start_random_fire(registry, rng, tiles_changed, disasters);
        clock.time_to_next_disaster =
            rng.range_u16(MIN_TIME_BETWEEN_DISASTERS, MAX_TIME_BETWEEN_DISASTERS);
    }
}

/// `FixedUpdate` wrapper around [`advance_once`].
#[allow(clippy::too_many_arguments)]
pub fn advance(
    mut clock: ResMut<SimulationClock>,
    mut registry: ResMut<BuildingRegistry>,
    mut grid: ResMut<ConnectivityGrid>,
    mut power: ResMut<PowerGrid>,
    strategy: Res<FillStrategy>,
    mut economy: ResMut<CityEconomy>,
    mut rng: ResMut<SimRng>,
    mut tiles_changed: ResMut<Events<TilesChanged>>,
    mut disasters: ResMut<Events<DisasterStruck>>,
    mut reviews: ResMut<Events<BudgetReviewRequested>>,
) {
    advance_once(
        &mut clock,
        &mut registry,
        &mut grid,
        &mut power,
        *strategy,
        &mut economy,
        &mut rng,
        &mut tiles_changed,
        &mut disasters,
        &mut reviews,
    );
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
