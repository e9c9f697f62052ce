//! Power distribution engine.
//!
//! Every power pass clears the powered bitset and flood fills it from each
//! power plant's origin tile, walking 4-connected power-line tiles (building
//! footprints are stamped as power lines, so interiors conduct). Buildings
//! then read `has_power` from their origin tile. The powered set is derived
//! state: it is never saved and is rebuilt from scratch each pass.
//!
//! Two fill strategies produce identical results:
//!
//! * [`FillStrategy::Scanline`]: span fill with an explicit bounded seed
//!   stack. Preferred; straightforward control flow.
//! * [`FillStrategy::BoundaryTrace`]: the fixed-memory right-hand
//!   wall-following fill, for hosts that cannot spare the stack buffer.
//!   Expressed as a small state machine over an 8-direction compass with
//!   two position marks for loop detection and backtracking.

use bevy::prelude::*;

use crate::buildings::{BuildingKind, BuildingRegistry};
use crate::config::{MAP_HEIGHT, MAP_WIDTH, POWER_MAP_BYTES};
use crate::grid::{ConnectivityGrid, POWER_MASK};

/// Which flood-fill implementation the power pass uses.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillStrategy {
    #[default]
    Scanline,
    BoundaryTrace,
}

/// One bit per tile, set while the tile is electrically connected to a
/// power plant. Tile `i = y * MAP_WIDTH + x` is bit `i & 7` of byte `i >> 3`.
#[derive(Resource, Clone, PartialEq, Eq)]
pub struct PowerGrid {
    bits: [u8; POWER_MAP_BYTES],
}

impl Default for PowerGrid {
    fn default() -> Self {
        Self {
            bits: [0; POWER_MAP_BYTES],
        }
    }
}

impl PowerGrid {
    #[inline]
    pub fn is_powered(&self, x: i32, y: i32) -> bool {
        if x >= 0 && x < MAP_WIDTH as i32 && y >= 0 && y < MAP_HEIGHT as i32 {
            let index = y as usize * MAP_WIDTH + x as usize;
            self.bits[index >> 3] & (1 << (index & 7)) != 0
        } else {
            false
        }
    }

    #[inline]
    fn set_powered(&mut self, x: i32, y: i32) {
        if x >= 0 && x < MAP_WIDTH as i32 && y >= 0 && y < MAP_HEIGHT as i32 {
            let index = y as usize * MAP_WIDTH + x as usize;
            self.bits[index >> 3] |= 1 << (index & 7);
        }
    }

    fn clear(&mut self) {
        self.bits = [0; POWER_MAP_BYTES];
    }

    pub fn powered_tile_count(&self) -> u32 {
        self.bits.iter().map(|b| b.count_ones()).sum()
    }
}

/// A tile the fill may still claim: carries a power line and is unpowered.
#[inline]
fn fill_open(grid: &ConnectivityGrid, power: &PowerGrid, x: i32, y: i32) -> bool {
    grid.get(x, y) & POWER_MASK != 0 && !power.is_powered(x, y)
}

/// Full recompute: clears the grid, fills from every power plant, then
/// refreshes `has_power` on every occupied building slot.
pub fn recompute_power(
    grid: &ConnectivityGrid,
    power: &mut PowerGrid,
    registry: &mut BuildingRegistry,
    strategy: FillStrategy,
) {
    power.clear();

    for n in 0..registry.slots().len() {
        let building = registry.slots()[n];
        if building.kind == BuildingKind::PowerPlant {
            match strategy {
                FillStrategy::Scanline => scanline_fill(grid, power, building.x, building.y),
                FillStrategy::BoundaryTrace => boundary_fill(grid, power, building.x, building.y),
            }
        }
    }

    for n in 0..registry.slots().len() {
        let (x, y, occupied) = {
            let b = &registry.slots()[n];
            (b.x as i32, b.y as i32, !b.is_empty_slot())
        };
        if occupied {
            let powered = power.is_powered(x, y);
            if let Some(b) = registry.get_mut(n) {
                b.has_power = powered;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Scanline fill
// ---------------------------------------------------------------------------

/// Seed stack capacity. One entry per tile is more than any reachable
/// configuration can produce; if it is ever exceeded the push is dropped and
/// the unreached tiles stay unpowered rather than corrupting memory.
const FILL_STACK_CAPACITY: usize = MAP_WIDTH * MAP_HEIGHT;

fn push_seed(stack: &mut [(u8, u8); FILL_STACK_CAPACITY], top: &mut usize, x: i32, y: i32) {
    if *top < FILL_STACK_CAPACITY {
        stack[*top] = (x as u8, y as u8);
        *top += 1;
    } else {
        warn!("power fill seed stack exhausted; tile ({x}, {y}) left unpowered");
    }
}

fn scanline_fill(grid: &ConnectivityGrid, power: &mut PowerGrid, seed_x: u8, seed_y: u8) {
    let mut stack = [(0u8, 0u8); FILL_STACK_CAPACITY];
    let mut top = 0usize;

    push_seed(&mut stack, &mut top, seed_x as i32, seed_y as i32);

    while top > 0 {
        top -= 1;
        let (x, y) = stack[top];
        let x = x as i32;

        // Rise to the top of the unpowered column run, then sweep down it.
        let mut y1 = y as i32;
        while y1 >= 0 && fill_open(grid, power, x, y1) {
            y1 -= 1;
        }
        y1 += 1;

        let mut span_left = false;
        let mut span_right = false;
        while y1 < MAP_HEIGHT as i32 && fill_open(grid, power, x, y1) {
            power.set_powered(x, y1);

            // Seed each horizontally adjacent run exactly once.
            let open_left = fill_open(grid, power, x - 1, y1);
            if !span_left && open_left {
                push_seed(&mut stack, &mut top, x - 1, y1);
                span_left = true;
            } else if span_left && !open_left {
                span_left = false;
            }

            let open_right = fill_open(grid, power, x + 1, y1);
            if !span_right && open_right {
                push_seed(&mut stack, &mut top, x + 1, y1);
                span_right = true;
            } else if span_right && !open_right {
                span_right = false;
            }

            y1 += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Boundary-following fill (fixed memory)
// ---------------------------------------------------------------------------

const NORTH: u8 = 0;
const EAST: u8 = 2;
const SOUTH: u8 = 4;
const WEST: u8 = 6;

#[inline]
fn turn_right(dir: u8) -> u8 {
    (dir + 2) & 7
}

#[inline]
fn turn_left(dir: u8) -> u8 {
    dir.wrapping_sub(2) & 7
}

#[inline]
fn turn_around(dir: u8) -> u8 {
    (dir + 4) & 7
}

#[inline]
fn front_left(dir: u8) -> u8 {
    dir.wrapping_sub(1) & 7
}

#[inline]
fn back_left(dir: u8) -> u8 {
    dir.wrapping_sub(3) & 7
}

/// Unit offset for each of the 8 compass directions, clockwise from north.
#[inline]
fn dir_offset(dir: u8) -> (i32, i32) {
    match dir & 7 {
        0 => (0, -1),
        1 => (1, -1),
        2 => (1, 0),
        3 => (1, 1),
        4 => (0, 1),
        5 => (-1, 1),
        6 => (-1, 0),
        _ => (-1, -1),
    }
}

/// Whether the tile one step in `dir` counts as filled. Off-map tiles count
/// as filled, which is what terminates the walk at the map edge.
#[inline]
fn filled_in_dir(grid: &ConnectivityGrid, power: &PowerGrid, x: i32, y: i32, dir: u8) -> bool {
    let (dx, dy) = dir_offset(dir);
    !fill_open(grid, power, x + dx, y + dy)
}

/// Count of filled cardinal neighbours (0..=4); 4 means fully enclosed.
fn filled_neighbour_count(grid: &ConnectivityGrid, power: &PowerGrid, x: i32, y: i32) -> u8 {
    [NORTH, EAST, SOUTH, WEST]
        .iter()
        .filter(|&&d| filled_in_dir(grid, power, x, y, d))
        .count() as u8
}

/// Cardinal step. The walker only ever moves on even (cardinal) headings;
/// diagonals exist solely for the neighbour probes.
#[inline]
fn step(x: &mut i32, y: &mut i32, dir: u8) {
    match dir {
        NORTH => *y -= 1,
        EAST => *x += 1,
        SOUTH => *y += 1,
        WEST => *x -= 1,
        _ => {}
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TraceState {
    /// Walk forward along the wall, turning right into any opening.
    Advance,
    /// The current tile was just painted; move into the opening.
    Paint,
    /// Count filled neighbours, re-align to the wall, run the mark logic.
    Classify,
}

/// Iteration guard. Backtracking can re-walk a region's boundary many
/// times, so the bound is generous; exceeding it means the walk has
/// degenerated, and the remaining tiles are left unpowered rather than
/// spinning forever.
const TRACE_STEP_LIMIT: u32 = (MAP_WIDTH * MAP_HEIGHT * 512) as u32;

/// Zero-extra-memory fill after the fixed-memory (right-hand) method: hug
/// the boundary of the unfilled region, painting cells whose remaining
/// neighbourhood cannot close a loop, and drop/restore two marks to detect
/// self-intersections and nested loops.
fn boundary_fill(grid: &ConnectivityGrid, power: &mut PowerGrid, seed_x: u8, seed_y: u8) {
    let mut x = seed_x as i32;
    let mut y = seed_y as i32;
    let mut dir = NORTH;

    let (mut mark1_x, mut mark1_y, mut mark1_dir) = (-1i32, -1i32, NORTH);
    let (mut mark2_x, mut mark2_y, mut mark2_dir) = (-1i32, -1i32, NORTH);
    let mut mark1_set = false;
    let mut mark2_set = false;
    let mut backtrack = false;
    let mut findloop = false;

    if !fill_open(grid, power, x, y) {
        return;
    }

    // Seek the top edge of the seed's column run before tracing.
    while y > 0 && fill_open(grid, power, x, y - 1) {
        y -= 1;
    }

    let mut state = TraceState::Classify;
    let mut steps = 0u32;

    loop {
        steps += 1;
        if steps > TRACE_STEP_LIMIT {
            warn!("boundary fill aborted after {steps} steps; region left partially unpowered");
            return;
        }

        match state {
            TraceState::Advance => {
                step(&mut x, &mut y, dir);
                if !filled_in_dir(grid, power, x, y, turn_right(dir)) {
                    if backtrack
                        && !findloop
                        && (!filled_in_dir(grid, power, x, y, dir)
                            || !filled_in_dir(grid, power, x, y, turn_left(dir)))
                    {
                        findloop = true;
                    }
                    dir = turn_right(dir);
                    state = TraceState::Paint;
                } else {
                    state = TraceState::Classify;
                }
            }

            TraceState::Paint => {
                step(&mut x, &mut y, dir);
                state = TraceState::Classify;
            }

            TraceState::Classify => {
                let filled = filled_neighbour_count(grid, power, x, y);
                if filled == 4 {
                    power.set_powered(x, y);
                    return;
                }

                // Re-align so the wall is on the right: rotate right onto a
                // filled heading, then rotate left until the heading is open.
                loop {
                    dir = turn_right(dir);
                    if filled_in_dir(grid, power, x, y, dir) {
                        break;
                    }
                }
                loop {
                    dir = turn_left(dir);
                    if !filled_in_dir(grid, power, x, y, dir) {
                        break;
                    }
                }

                state = TraceState::Advance;
                match filled {
                    1 => {
                        if backtrack {
                            findloop = true;
                        } else if findloop {
                            mark1_set = true;
                        } else if !filled_in_dir(grid, power, x, y, front_left(dir))
                            && !filled_in_dir(grid, power, x, y, back_left(dir))
                        {
                            mark1_set = false;
                            power.set_powered(x, y);
                            state = TraceState::Paint;
                        }
                    }

                    2 => {
                        if filled_in_dir(grid, power, x, y, turn_around(dir)) {
                            // Straight corridor: paint unless the far-left
                            // probe says a loop could close behind us.
                            if !filled_in_dir(grid, power, x, y, front_left(dir)) {
                                mark1_set = false;
                                power.set_powered(x, y);
                                state = TraceState::Paint;
                            }
                        } else if !mark1_set {
                            mark1_x = x;
                            mark1_y = y;
                            mark1_dir = dir;
                            mark1_set = true;
                            mark2_set = false;
                            findloop = false;
                            backtrack = false;
                        } else if !mark2_set {
                            if x == mark1_x && y == mark1_y {
                                if dir == mark1_dir {
                                    // Walked the whole loop back to mark 1:
                                    // the loop is safe to collapse.
                                    mark1_set = false;
                                    dir = turn_around(dir);
                                    power.set_powered(x, y);
                                    state = TraceState::Paint;
                                } else {
                                    // Crossed mark 1 on a different heading:
                                    // retrace it the way it was first seen.
                                    backtrack = true;
                                    findloop = false;
                                    dir = mark1_dir;
                                }
                            } else if findloop {
                                mark2_x = x;
                                mark2_y = y;
                                mark2_dir = dir;
                                mark2_set = true;
                            }
                        } else if x == mark1_x && y == mark1_y {
                            // Back at mark 1 with mark 2 pending: resume the
                            // trace from mark 2 and collapse this loop.
                            x = mark2_x;
                            y = mark2_y;
                            dir = mark2_dir;
                            mark1_set = false;
                            mark2_set = false;
                            backtrack = false;
                            dir = turn_around(dir);
                            power.set_powered(x, y);
                            state = TraceState::Paint;
                        } else if x == mark2_x && y == mark2_y {
                            // Mark 2 became the interesting corner; promote it.
                            mark1_x = x;
                            mark1_y = y;
                            mark1_set = true;
                            dir = mark2_dir;
                            mark1_dir = mark2_dir;
                            mark2_set = false;
                        }
                    }

                    3 => {
                        mark1_set = false;
                        power.set_powered(x, y);
                        state = TraceState::Paint;
                    }

                    _ => {}
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
