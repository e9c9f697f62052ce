//! Fire lifecycle and the random-fire disaster.
//!
//! A burning building either gets extinguished (more likely the closer a
//! powered fire department is), spreads to a neighbour probed two tiles out
//! from a random footprint edge, or advances its burn counter. Past the
//! counter cap the building collapses into rubble with the counter pinned,
//! so renderers can keep showing the burned-out state. Burning rubble cools
//! one step per visit but can still pass the fire along while it does.

use bevy::prelude::*;

use crate::buildings::{BuildingKind, BuildingRegistry};
use crate::config::{
    MAX_BUILDINGS, MAX_FIRE_COUNTER, SIM_FIRE_BURN_CHANCE, SIM_FIRE_DEPT_BASE_INFLUENCE,
    SIM_FIRE_DEPT_INFLUENCE_MULTIPLIER, SIM_FIRE_SPREAD_CHANCE,
};
use crate::events::{DisasterStruck, TilesChanged};
use crate::grid::ConnectivityGrid;
use crate::sim_rng::SimRng;

/// Distance assumed when no powered fire department exists; pushes the
/// influence past any 8-bit roll so such fires never self-extinguish.
const NO_FIRE_DEPT_DISTANCE: u32 = 255;

/// Extinguish resistance for the building in `index`: base plus a per-tile
/// penalty for the Manhattan distance to the nearest powered fire
/// department. A roll must exceed this to put the fire out.
pub fn fire_dept_influence(index: usize, registry: &BuildingRegistry) -> u32 {
    let building = registry.slots()[index];
    let mut closest = NO_FIRE_DEPT_DISTANCE;
    for other in registry.slots().iter() {
        if other.kind == BuildingKind::FireDept && other.has_power {
            closest = closest.min(building.manhattan_distance(other));
        }
    }
    SIM_FIRE_DEPT_BASE_INFLUENCE + closest * SIM_FIRE_DEPT_INFLUENCE_MULTIPLIER
}

fn footprint_changed(registry: &BuildingRegistry, index: usize) -> TilesChanged {
    let b = registry.slots()[index];
    let info = b.kind.info();
    TilesChanged::rect(b.x as i32, b.y as i32, info.width as i32, info.height as i32)
}

fn try_ignite(
    registry: &mut BuildingRegistry,
    tiles_changed: &mut Events<TilesChanged>,
    px: i32,
    py: i32,
) -> bool {
    if let Some(n) = registry.find_at(px, py) {
        let other = registry.slots()[n];
        if other.on_fire == 0 && other.kind != BuildingKind::Park && !other.kind.is_rubble() {
            if let Some(b) = registry.get_mut(n) {
                b.on_fire = 1;
            }
            tiles_changed.send(footprint_changed(registry, n));
            return true;
        }
    }
    false
}

/// Attempts to pass the fire from `index` to one neighbour picked by a
/// random compass direction. The probe runs two tiles out from the chosen
/// footprint edge, which lands inside any flush-built neighbour. Returns
/// whether something caught fire.
pub fn spread_fire(
    index: usize,
    registry: &mut BuildingRegistry,
    rng: &mut SimRng,
    tiles_changed: &mut Events<TilesChanged>,
) -> bool {
    let building = registry.slots()[index];
    let info = building.kind.info();
    let x1 = if building.x > 1 { building.x as i32 - 2 } else { building.x as i32 };
    let y1 = if building.y > 1 { building.y as i32 - 2 } else { building.y as i32 };
    let x2 = building.x as i32 + info.width as i32 + 2;
    let y2 = building.y as i32 + info.height as i32 + 2;

    let direction = rng.roll_u8() & 3;
    if direction & 1 != 0 {
        let px = if direction & 2 != 0 { x1 } else { x2 };
        for j in 0..info.height as i32 {
            if try_ignite(registry, tiles_changed, px, building.y as i32 + j) {
                return true;
            }
        }
    } else {
        let py = if direction & 2 != 0 { y1 } else { y2 };
        for i in 0..info.width as i32 {
            if try_ignite(registry, tiles_changed, building.x as i32 + i, py) {
                return true;
            }
        }
    }
    false
}

/// One scheduler visit to a burning slot.
pub fn simulate_burning(
    index: usize,
    registry: &mut BuildingRegistry,
    grid: &mut ConnectivityGrid,
    rng: &mut SimRng,
    tiles_changed: &mut Events<TilesChanged>,
) {
    let building = registry.slots()[index];
    if building.is_empty_slot() || building.on_fire == 0 {
        return;
    }

    if building.kind.is_rubble() {
        if let Some(b) = registry.get_mut(index) {
            b.on_fire -= 1;
        }
        if rng.roll_u8() > SIM_FIRE_SPREAD_CHANCE {
            spread_fire(index, registry, rng, tiles_changed);
        }
        tiles_changed.send(footprint_changed(registry, index));
        return;
    }

    let influence = fire_dept_influence(index, registry);
    if influence <= u8::MAX as u32 && rng.roll_u8() as u32 > influence {
        if let Some(b) = registry.get_mut(index) {
            b.on_fire -= 1;
        }
    } else if rng.roll_u8() > SIM_FIRE_SPREAD_CHANCE
        || !spread_fire(index, registry, rng, tiles_changed)
    {
        if rng.roll_u8() < SIM_FIRE_BURN_CHANCE {
            if building.on_fire >= MAX_FIRE_COUNTER {
                registry.destroy(index, grid);
                if let Some(b) = registry.get_mut(index) {
                    b.on_fire = MAX_FIRE_COUNTER;
                }
            } else if let Some(b) = registry.get_mut(index) {
                b.on_fire += 1;
            }
        }
    }

    if let Some(b) = registry.get_mut(index) {
        b.heavy_traffic = false;
    }
    tiles_changed.send(footprint_changed(registry, index));
}

/// The random-fire disaster: up to `MAX_BUILDINGS` uniform slot draws, the
/// first eligible building (occupied, not burning, not rubble, not a park)
/// catches fire. Silently does nothing when every draw misses.
pub fn start_random_fire(
    registry: &mut BuildingRegistry,
    rng: &mut SimRng,
    tiles_changed: &mut Events<TilesChanged>,
    disasters: &mut Events<DisasterStruck>,
) -> bool {
    for _ in 0..MAX_BUILDINGS {
        let index = rng.slot_index(MAX_BUILDINGS);
        let building = registry.slots()[index];
        if !building.is_empty_slot()
            && building.on_fire == 0
            && !building.kind.is_rubble()
            && building.kind != BuildingKind::Park
        {
            if let Some(b) = registry.get_mut(index) {
                b.on_fire = 1;
            }
            tiles_changed.send(footprint_changed(registry, index));
            disasters.send(DisasterStruck {
                x: building.x as i32 + 1,
                y: building.y as i32 + 1,
            });
            return true;
        }
    }
    false
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
