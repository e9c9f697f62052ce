//! City aggregates and the per-building growth model.
//!
//! Each zone building (residential / commercial / industrial) is scored once
//! per scheduler cycle: random jitter, a pull toward the average density,
//! a tax-rate penalty, an employment term comparing the three population
//! totals, local influence from nearby powered buildings, pollution (for
//! residential) and crime by police-station distance. The score moves the
//! building's density one step at a time, and the aggregate totals follow
//! incrementally (reconciled by the periodic full recount in `stats`).

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::buildings::{Building, BuildingKind, BuildingRegistry};
use crate::config::{
    AVERAGE_POPULATION_DENSITY, MAX_POPULATION_DENSITY, ROAD_CONNECTION_MINIMUM,
    SIM_AVERAGING_STRENGTH, SIM_BASE_SCORE, SIM_COMMERCIAL_OPPORTUNITY_BOOST,
    SIM_DECREMENT_POP_THRESHOLD, SIM_DEFAULT_POLICE_DISTANCE, SIM_EMPLOYMENT_BOOST,
    SIM_HEAVY_TRAFFIC_THRESHOLD, SIM_IDEAL_TAX_RATE, SIM_INCREMENT_POP_THRESHOLD,
    SIM_INDUSTRIAL_BASE_POLLUTION, SIM_INDUSTRIAL_OPPORTUNITY_BOOST, SIM_LOCAL_BUILDING_DISTANCE,
    SIM_LOCAL_BUILDING_INFLUENCE, SIM_MAX_CRIME, SIM_MAX_POLLUTION, SIM_PARK_BOOST,
    SIM_POLICE_DISTANCE_OFFSET, SIM_POLLUTION_INFLUENCE, SIM_POWERPLANT_BASE_POLLUTION,
    SIM_RANDOM_STRENGTH_MASK, SIM_STADIUM_BOOST, SIM_TAX_RATE_PENALTY, SIM_TRAFFIC_BASE_POLLUTION,
    SIM_UNEMPLOYMENT_PENALTY, STARTING_FUNDS, STARTING_TAX_RATE,
};
use crate::grid::{ConnectivityGrid, ROAD_MASK};
use crate::sim_rng::SimRng;

/// City-wide money, tax, and population aggregates.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct CityEconomy {
    pub funds: i32,
    /// Whole-percent tax rate, 0..=99.
    pub tax_rate: u8,
    pub residential_population: u16,
    pub commercial_population: u16,
    pub industrial_population: u16,
    /// Line items from the most recent yearly settlement.
    pub taxes_collected: i32,
    pub police_budget: u8,
    pub fire_budget: u8,
    pub road_budget: i32,
    /// When false, every settlement opens the budget review.
    pub auto_budget: bool,
}

impl Default for CityEconomy {
    fn default() -> Self {
        Self {
            funds: STARTING_FUNDS,
            tax_rate: STARTING_TAX_RATE,
            residential_population: 0,
            commercial_population: 0,
            industrial_population: 0,
            taxes_collected: 0,
            police_budget: 0,
            fire_budget: 0,
            road_budget: 0,
            auto_budget: true,
        }
    }
}

impl CityEconomy {
    pub fn total_population(&self) -> u32 {
        self.residential_population as u32
            + self.commercial_population as u32
            + self.industrial_population as u32
    }

    /// Applies a signed density delta to the matching per-type total.
    pub fn apply_density_delta(&mut self, kind: BuildingKind, delta: i8) {
        let total = match kind {
            BuildingKind::Residential => &mut self.residential_population,
            BuildingKind::Commercial => &mut self.commercial_population,
            BuildingKind::Industrial => &mut self.industrial_population,
            _ => return,
        };
        *total = total.saturating_add_signed(delta as i16);
    }
}

/// Number of perimeter tiles carrying the road bit.
pub fn road_connections(building: &Building, grid: &ConnectivityGrid) -> u8 {
    let info = building.kind.info();
    let (x, y) = (building.x as i32, building.y as i32);
    let (w, h) = (info.width as i32, info.height as i32);
    let mut count = 0;

    for i in 0..w {
        if grid.get(x + i, y - 1) & ROAD_MASK != 0 {
            count += 1;
        }
        if grid.get(x + i, y + h) & ROAD_MASK != 0 {
            count += 1;
        }
    }
    for j in 0..h {
        if grid.get(x - 1, y + j) & ROAD_MASK != 0 {
            count += 1;
        }
        if grid.get(x + w, y + j) & ROAD_MASK != 0 {
            count += 1;
        }
    }
    count
}

/// A building only takes part in the road-borne economy with at least three
/// perimeter road tiles.
pub fn is_road_connected(building: &Building, grid: &ConnectivityGrid) -> bool {
    road_connections(building, grid) >= ROAD_CONNECTION_MINIMUM
}

/// Employment term: each zone type grows while its counterpart totals leave
/// room, and residential shrinks hard once it outruns all jobs.
fn employment_term(kind: BuildingKind, economy: &CityEconomy) -> i32 {
    let res = economy.residential_population;
    let com = economy.commercial_population;
    let ind = economy.industrial_population;
    match kind {
        BuildingKind::Residential => {
            if res < ind {
                SIM_EMPLOYMENT_BOOST
            } else if res as u32 > ind as u32 + com as u32 {
                -SIM_UNEMPLOYMENT_PENALTY
            } else {
                0
            }
        }
        BuildingKind::Industrial => {
            if ind < res || ind < com {
                SIM_INDUSTRIAL_OPPORTUNITY_BOOST
            } else {
                0
            }
        }
        BuildingKind::Commercial => {
            if com < res || com < ind {
                SIM_COMMERCIAL_OPPORTUNITY_BOOST
            } else {
                0
            }
        }
        _ => 0,
    }
}

/// Growth score for the zone building in `index`. Consumes one jitter roll.
pub fn growth_score(
    index: usize,
    registry: &BuildingRegistry,
    grid: &ConnectivityGrid,
    economy: &CityEconomy,
    rng: &mut SimRng,
) -> i32 {
    let building = registry.slots()[index];
    let mut score = 0i32;

    let jitter = (rng.roll_u8() as i32 & SIM_RANDOM_STRENGTH_MASK) - SIM_RANDOM_STRENGTH_MASK / 2;
    score += jitter;

    score += (AVERAGE_POPULATION_DENSITY - building.population_density as i32)
        * SIM_AVERAGING_STRENGTH;

    score -= (economy.tax_rate as i32 - SIM_IDEAL_TAX_RATE) * SIM_TAX_RATE_PENALTY;

    score += employment_term(building.kind, economy);

    let mut closest_police = SIM_DEFAULT_POLICE_DISTANCE;
    let mut pollution = 0i32;
    let mut local_influence = 0i32;

    // An isolated building draws no neighbours, no base score, and no
    // pollution; only crime (at the default police distance) still applies.
    if is_road_connected(&building, grid) {
        if building.population_density == 0 {
            score += SIM_BASE_SCORE;
        }

        for (n, other) in registry.iter_occupied() {
            if n == index || other.on_fire > 0 {
                continue;
            }
            if !other.has_power && other.kind != BuildingKind::Park {
                continue;
            }

            let distance = building.manhattan_distance(other);

            if other.kind == BuildingKind::PoliceDept && distance < closest_police {
                closest_police = distance;
            }

            let other_pollution = if other.kind == BuildingKind::Industrial {
                SIM_INDUSTRIAL_BASE_POLLUTION + other.population_density as i32 - distance as i32
            } else if other.kind == BuildingKind::PowerPlant {
                SIM_POWERPLANT_BASE_POLLUTION - distance as i32
            } else if other.heavy_traffic {
                SIM_TRAFFIC_BASE_POLLUTION - distance as i32
            } else {
                0
            };
            if other_pollution > 0 {
                pollution += other_pollution;
            }

            if distance <= SIM_LOCAL_BUILDING_DISTANCE && is_road_connected(other, grid) {
                local_influence += match other.kind {
                    BuildingKind::Industrial => {
                        if (other.population_density >= building.population_density
                            && building.kind == BuildingKind::Residential)
                            || (other.population_density > building.population_density
                                && building.kind == BuildingKind::Commercial)
                        {
                            SIM_LOCAL_BUILDING_INFLUENCE
                        } else {
                            0
                        }
                    }
                    BuildingKind::Residential => {
                        if other.population_density > building.population_density
                            && (building.kind == BuildingKind::Commercial
                                || building.kind == BuildingKind::Industrial)
                        {
                            SIM_LOCAL_BUILDING_INFLUENCE
                        } else {
                            0
                        }
                    }
                    BuildingKind::Commercial => {
                        if other.population_density >= building.population_density
                            && building.kind == BuildingKind::Residential
                        {
                            SIM_LOCAL_BUILDING_INFLUENCE
                        } else {
                            0
                        }
                    }
                    BuildingKind::Stadium => {
                        if building.kind == BuildingKind::Residential
                            || building.kind == BuildingKind::Commercial
                        {
                            SIM_STADIUM_BOOST
                        } else {
                            0
                        }
                    }
                    BuildingKind::Park => {
                        if building.kind == BuildingKind::Residential {
                            SIM_PARK_BOOST
                        } else {
                            0
                        }
                    }
                    _ => 0,
                };
            }
        }
    }

    score += local_influence;

    if building.kind == BuildingKind::Residential {
        score -= pollution.min(SIM_MAX_POLLUTION) * SIM_POLLUTION_INFLUENCE;
    }

    let crime = (building.population_density as i32
        * (closest_police as i32 - SIM_POLICE_DISTANCE_OFFSET))
        .clamp(0, SIM_MAX_CRIME);
    score -= crime;

    score
}

/// One simulation step for a non-burning zone building: score it, move its
/// density one step, refresh the heavy-traffic flag, and mirror the change
/// into the aggregate totals. Unpowered zones decay instead of scoring.
pub fn simulate_zone(
    index: usize,
    registry: &mut BuildingRegistry,
    grid: &ConnectivityGrid,
    economy: &mut CityEconomy,
    rng: &mut SimRng,
) {
    let building = registry.slots()[index];
    if !building.kind.is_zone() || building.on_fire > 0 {
        return;
    }

    let mut density_change: i8 = 0;
    let heavy_traffic;

    if building.has_power {
        let score = growth_score(index, registry, grid, economy, rng);

        if building.population_density < MAX_POPULATION_DENSITY
            && score >= SIM_INCREMENT_POP_THRESHOLD
        {
            density_change = 1;
        } else if building.population_density > 0 && score <= SIM_DECREMENT_POP_THRESHOLD {
            density_change = -1;
        }
        heavy_traffic = building.population_density > SIM_HEAVY_TRAFFIC_THRESHOLD;
    } else {
        heavy_traffic = false;
        if building.population_density > 0 {
            density_change = -1;
        }
    }

    if let Some(b) = registry.get_mut(index) {
        b.population_density = b.population_density.saturating_add_signed(density_change);
        b.heavy_traffic = heavy_traffic;
    }
    economy.apply_density_delta(building.kind, density_change);
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
