//! One tick touches exactly one building, except on the three designated
//! full-grid steps. Unpowered decay makes each visit observable.

use super::TestCity;
use crate::buildings::BuildingKind;
use crate::scheduler::{STEP_MONTH, STEP_POPULATION, STEP_POWER};

#[test]
fn test_each_tick_visits_one_building() {
    let mut city = TestCity::seeded(23);
    let a = city.place(BuildingKind::Residential, 0, 0);
    let b = city.place(BuildingKind::Commercial, 4, 0);
    let c = city.place(BuildingKind::Industrial, 8, 0);
    // Unpowered zones decay exactly when visited, which exposes the cursor.
    city.prime(a, 5, false);
    city.prime(b, 5, false);
    city.prime(c, 5, false);

    city.tick();
    assert_eq!(
        (city.density(a), city.density(b), city.density(c)),
        (4, 5, 5),
        "first tick must only touch slot 0"
    );

    city.tick();
    assert_eq!(
        (city.density(a), city.density(b), city.density(c)),
        (4, 4, 5),
        "second tick must only touch slot 1"
    );

    city.tick();
    assert_eq!(
        (city.density(a), city.density(b), city.density(c)),
        (4, 4, 4),
        "third tick must only touch slot 2"
    );

    // The remaining building steps visit empty slots; nothing changes.
    for _ in 3..STEP_POWER {
        city.tick();
    }
    assert_eq!(
        (city.density(a), city.density(b), city.density(c)),
        (4, 4, 4)
    );
}

#[test]
fn test_full_passes_only_on_designated_steps() {
    let mut city = TestCity::seeded(24);
    let plant = city.place(BuildingKind::PowerPlant, 10, 10);
    let res = city.place(BuildingKind::Residential, 14, 10);
    city.prime(res, 3, false);

    // Building steps: power flags stay stale no matter how many run.
    for _ in 0..STEP_POWER {
        city.tick();
    }
    assert!(!city.registry().slots()[plant].has_power);

    // The power step flips them in one tick.
    city.tick();
    assert!(city.registry().slots()[plant].has_power);
    assert!(city.registry().slots()[res].has_power);

    // The recount step reconciles totals in one tick.
    assert_eq!(city.clock().cursor, STEP_POPULATION);
    city.tick();
    let economy = city.app.world().resource::<crate::economy::CityEconomy>();
    assert_eq!(
        economy.residential_population,
        city.density(res) as u16
    );

    // The calendar step wraps the cursor.
    assert_eq!(city.clock().cursor, STEP_MONTH);
    city.tick();
    assert_eq!(city.clock().cursor, 0);
    assert_eq!(city.clock().month, 1);
}
