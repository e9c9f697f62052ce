//! Yearly budget settlement.
//!
//! Runs on every year rollover: collects taxes from the population totals,
//! charges maintenance for police and fire departments plus the road
//! network, and raises a budget-review request whenever auto-budget is off
//! or the city's finances turned sour.

use bevy::prelude::*;

use crate::buildings::{BuildingKind, BuildingRegistry};
use crate::config::{
    FIRE_AND_POLICE_MAINTENANCE_COST, POPULATION_MULTIPLIER, ROAD_MAINTENANCE_COST,
};
use crate::economy::CityEconomy;
use crate::events::BudgetReviewRequested;
use crate::grid::ConnectivityGrid;

pub fn settle_budget(
    registry: &BuildingRegistry,
    grid: &ConnectivityGrid,
    economy: &mut CityEconomy,
    year: u16,
    reviews: &mut Events<BudgetReviewRequested>,
) {
    let population = economy.total_population() as i32 * POPULATION_MULTIPLIER;
    let taxes = population * economy.tax_rate as i32 / 100;
    economy.taxes_collected = taxes;
    economy.funds += taxes;

    let police = registry.count_of(BuildingKind::PoliceDept);
    let fire = registry.count_of(BuildingKind::FireDept);
    economy.police_budget = police.min(u8::MAX as u32) as u8;
    economy.fire_budget = fire.min(u8::MAX as u32) as u8;
    let services_cost = (police + fire) as i32 * FIRE_AND_POLICE_MAINTENANCE_COST;
    economy.funds -= services_cost;

    let road_tiles = grid.road_tile_count() as i32;
    economy.road_budget = road_tiles * ROAD_MAINTENANCE_COST / 100;
    economy.funds -= economy.road_budget;

    let cash_flow = taxes - services_cost - economy.road_budget;

    info!(
        "budget year {year}: population {population}, taxes {taxes}, \
         services {services_cost} ({police} police, {fire} fire), \
         roads {} ({road_tiles} tiles), cash flow {cash_flow}, funds {}",
        economy.road_budget, economy.funds
    );

    if !economy.auto_budget || cash_flow <= 0 || economy.funds <= 0 {
        reviews.send(BudgetReviewRequested {
            taxes_collected: taxes,
            cash_flow,
            funds: economy.funds,
        });
    }
}
