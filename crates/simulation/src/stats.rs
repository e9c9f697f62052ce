//! Aggregate population accounting.
//!
//! Zone updates adjust the per-type totals incrementally; this full recount
//! runs once per scheduler cycle to reconcile any drift (for example a
//! populated building that burned down between recounts).

use crate::buildings::{BuildingKind, BuildingRegistry};
use crate::economy::CityEconomy;

/// Recomputes the three per-type population totals from scratch.
pub fn recount_population(registry: &BuildingRegistry, economy: &mut CityEconomy) {
    let mut residential = 0u16;
    let mut commercial = 0u16;
    let mut industrial = 0u16;

    for building in registry.slots().iter() {
        match building.kind {
            BuildingKind::Residential => residential += building.population_density as u16,
            BuildingKind::Commercial => commercial += building.population_density as u16,
            BuildingKind::Industrial => industrial += building.population_density as u16,
            _ => {}
        }
    }

    economy.residential_population = residential;
    economy.commercial_population = commercial;
    economy.industrial_population = industrial;
}
