//! Budget scenario: an empty-but-policed city collects nothing, pays
//! upkeep, and is forced into the budget review on year rollover.

use bevy::prelude::*;

use super::TestCity;
use crate::buildings::BuildingKind;
use crate::economy::CityEconomy;
use crate::events::BudgetReviewRequested;

#[test]
fn test_year_of_shortfall_forces_budget_review() {
    let mut city = TestCity::seeded(15);
    city.place(BuildingKind::PoliceDept, 10, 10);
    city.road_row(5, 20, 10);

    let funds_before = city.app.world().resource::<CityEconomy>().funds;

    // Twelve months of simulation, ending in the yearly settlement.
    for _ in 0..12 {
        city.cycle();
    }
    assert_eq!(city.clock().year, 1);
    assert_eq!(city.clock().month, 0);

    let economy = city.app.world().resource::<CityEconomy>();
    assert_eq!(economy.taxes_collected, 0, "no population, no taxes");
    assert_eq!(economy.police_budget, 1);
    assert_eq!(economy.fire_budget, 0);
    assert_eq!(economy.road_budget, 10 * 30 / 100);
    assert_eq!(economy.funds, funds_before - 100 - 3);

    let reviews = city.app.world().resource::<Events<BudgetReviewRequested>>();
    let events: Vec<_> = reviews.iter_current_update_events().collect();
    assert_eq!(events.len(), 1, "negative cash flow must open the review");
    assert_eq!(events[0].cash_flow, -103);
    assert_eq!(events[0].taxes_collected, 0);
    assert_eq!(events[0].funds, funds_before - 103);
}

#[test]
fn test_mid_year_months_do_not_settle() {
    let mut city = TestCity::seeded(15);
    city.place(BuildingKind::FireDept, 10, 10);
    let funds_before = city.app.world().resource::<CityEconomy>().funds;

    for month in 1..=11 {
        city.cycle();
        assert_eq!(city.clock().month, month);
        assert_eq!(city.clock().year, 0);
        // Upkeep is yearly; nothing is charged month to month.
        assert_eq!(city.app.world().resource::<CityEconomy>().funds, funds_before);
    }
    let reviews = city.app.world().resource::<Events<BudgetReviewRequested>>();
    assert_eq!(reviews.iter_current_update_events().count(), 0);
}
