//! Both flood-fill strategies must produce exactly the set of tiles
//! reachable from a power plant through 4-connected power-line tiles, on
//! any grid shape. A plain BFS is the referee.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::buildings::{BuildingKind, BuildingRegistry};
use crate::config::{MAP_HEIGHT, MAP_WIDTH};
use crate::grid::{ConnectivityGrid, POWER_MASK};
use crate::power::{recompute_power, FillStrategy, PowerGrid};

/// Reference reachability: BFS over power-line tiles from plant origins.
fn reference_powered(grid: &ConnectivityGrid, registry: &BuildingRegistry) -> Vec<bool> {
    let mut powered = vec![false; MAP_WIDTH * MAP_HEIGHT];
    let mut queue = VecDeque::new();

    for building in registry.slots().iter() {
        if building.kind == BuildingKind::PowerPlant {
            let (x, y) = (building.x as i32, building.y as i32);
            if grid.get(x, y) & POWER_MASK != 0 && !powered[y as usize * MAP_WIDTH + x as usize] {
                powered[y as usize * MAP_WIDTH + x as usize] = true;
                queue.push_back((x, y));
            }
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        for (nx, ny) in [(x, y - 1), (x + 1, y), (x, y + 1), (x - 1, y)] {
            if nx < 0 || nx >= MAP_WIDTH as i32 || ny < 0 || ny >= MAP_HEIGHT as i32 {
                continue;
            }
            let index = ny as usize * MAP_WIDTH + nx as usize;
            if !powered[index] && grid.get(nx, ny) & POWER_MASK != 0 {
                powered[index] = true;
                queue.push_back((nx, ny));
            }
        }
    }

    powered
}

fn powered_as_vec(power: &PowerGrid) -> Vec<bool> {
    let mut out = vec![false; MAP_WIDTH * MAP_HEIGHT];
    for y in 0..MAP_HEIGHT as i32 {
        for x in 0..MAP_WIDTH as i32 {
            out[y as usize * MAP_WIDTH + x as usize] = power.is_powered(x, y);
        }
    }
    out
}

/// Random city: scattered power-line tiles plus up to three plants placed
/// at well-separated spots.
fn random_city(seed: u64) -> (ConnectivityGrid, BuildingRegistry) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut grid = ConnectivityGrid::default();
    let mut registry = BuildingRegistry::default();

    let line_density = rng.gen_range(0.25..0.70);
    for y in 0..MAP_HEIGHT as i32 {
        for x in 0..MAP_WIDTH as i32 {
            if rng.gen_bool(line_density) {
                grid.set(x, y, POWER_MASK);
            }
        }
    }

    let spots: [(u8, u8); 3] = [(4, 4), (40, 8), (20, 38)];
    let plant_count = rng.gen_range(0..=3usize);
    for &(x, y) in spots.iter().take(plant_count) {
        registry.place(BuildingKind::PowerPlant, x, y, &mut grid);
    }

    (grid, registry)
}

fn assert_strategies_match_reference(grid: &ConnectivityGrid, registry: &BuildingRegistry) {
    let reference = reference_powered(grid, registry);

    let mut scan_registry = registry.clone();
    let mut scan = PowerGrid::default();
    recompute_power(grid, &mut scan, &mut scan_registry, FillStrategy::Scanline);

    let mut trace_registry = registry.clone();
    let mut trace = PowerGrid::default();
    recompute_power(grid, &mut trace, &mut trace_registry, FillStrategy::BoundaryTrace);

    assert_eq!(powered_as_vec(&scan), reference, "scanline diverged from BFS");
    assert_eq!(powered_as_vec(&trace), reference, "boundary trace diverged from BFS");

    // Both strategies must also agree on every building's power flag.
    for (a, b) in scan_registry.slots().iter().zip(trace_registry.slots().iter()) {
        assert_eq!(a.has_power, b.has_power);
    }
}

#[test]
fn test_randomized_grids_match_reference() {
    for seed in 0..60u64 {
        let (grid, registry) = random_city(seed);
        assert_strategies_match_reference(&grid, &registry);
    }
}

#[test]
fn test_zero_seed_grid_stays_dark() {
    let mut grid = ConnectivityGrid::default();
    for x in 0..MAP_WIDTH as i32 {
        grid.set(x, 10, POWER_MASK);
    }
    let mut registry = BuildingRegistry::default();
    let mut power = PowerGrid::default();
    recompute_power(&grid, &mut power, &mut registry, FillStrategy::Scanline);
    assert_eq!(power.powered_tile_count(), 0);
    recompute_power(&grid, &mut power, &mut registry, FillStrategy::BoundaryTrace);
    assert_eq!(power.powered_tile_count(), 0);
}

#[test]
fn test_full_map_conductive() {
    let mut grid = ConnectivityGrid::default();
    for y in 0..MAP_HEIGHT as i32 {
        for x in 0..MAP_WIDTH as i32 {
            grid.set(x, y, POWER_MASK);
        }
    }
    let mut registry = BuildingRegistry::default();
    registry.place(BuildingKind::PowerPlant, 20, 20, &mut grid);
    assert_strategies_match_reference(&grid, &registry);

    let mut power = PowerGrid::default();
    let mut r = registry.clone();
    recompute_power(&grid, &mut power, &mut r, FillStrategy::Scanline);
    assert_eq!(power.powered_tile_count(), (MAP_WIDTH * MAP_HEIGHT) as u32);
}

#[test]
fn test_recompute_idempotent_on_random_grids() {
    for seed in [3u64, 17, 29] {
        let (grid, mut registry) = random_city(seed);
        let mut power = PowerGrid::default();
        recompute_power(&grid, &mut power, &mut registry, FillStrategy::Scanline);
        let first = power.clone();
        recompute_power(&grid, &mut power, &mut registry, FillStrategy::Scanline);
        assert!(first == power, "second recompute changed the powered set");
    }
}
