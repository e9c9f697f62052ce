//! Player actions: build, connect, bulldoze.
//!
//! Every action either applies completely (state change and funds deduction
//! together) or returns an error with nothing mutated. Failures are values
//! for the host UI to surface, never panics.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::buildings::{BuildingKind, BuildingRegistry};
use crate::config::{BULLDOZER_COST, MAP_HEIGHT, MAP_WIDTH, POWERLINE_COST, ROAD_COST};
use crate::economy::CityEconomy;
use crate::events::TilesChanged;
use crate::grid::{ConnectivityGrid, POWER_MASK, ROAD_MASK};
use crate::terrain::TerrainMap;

/// Which tile connection `try_connect` lays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectKind {
    Road,
    PowerLine,
}

impl ConnectKind {
    fn mask(self) -> u8 {
        match self {
            ConnectKind::Road => ROAD_MASK,
            ConnectKind::PowerLine => POWER_MASK,
        }
    }

    fn cost(self) -> i32 {
        match self {
            ConnectKind::Road => ROAD_COST,
            ConnectKind::PowerLine => POWERLINE_COST,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionError {
    /// Coordinates or footprint outside the map.
    OutOfBounds,
    /// The placement is blocked by terrain, a road, or another building.
    Obstructed,
    /// A non-rubble building occupies the target tile.
    BlockedByBuilding,
    /// Non-clear terrain and the tile does not qualify for a bridge.
    BlockedByTerrain,
    /// The requested connection already exists on the tile.
    AlreadyExists,
    /// The building arena has no free or recyclable slot.
    ArenaFull,
    /// The kind cannot be player-built (empty or rubble kinds).
    InvalidKind,
    /// Nothing to act on at the target tile.
    NothingThere,
    InsufficientFunds,
}

pub type ActionResult = Result<(), ActionError>;

/// Places a building and charges its cost.
pub fn try_build(
    kind: BuildingKind,
    x: u8,
    y: u8,
    registry: &mut BuildingRegistry,
    grid: &mut ConnectivityGrid,
    terrain: &TerrainMap,
    economy: &mut CityEconomy,
    tiles_changed: &mut Events<TilesChanged>,
) -> ActionResult {
    if kind == BuildingKind::None || kind.is_rubble() {
        return Err(ActionError::InvalidKind);
    }
    let info = kind.info();
    if x as usize + info.width as usize > MAP_WIDTH
        || y as usize + info.height as usize > MAP_HEIGHT
    {
        return Err(ActionError::OutOfBounds);
    }
    if !registry.can_place(kind, x, y, grid, terrain) {
        return Err(ActionError::Obstructed);
    }

    let cost = info.cost as i32;
    if economy.funds < cost {
        return Err(ActionError::InsufficientFunds);
    }
    if registry.place(kind, x, y, grid).is_none() {
        return Err(ActionError::ArenaFull);
    }
    economy.funds -= cost;

    tiles_changed.send(TilesChanged::rect(
        x as i32,
        y as i32,
        info.width as i32,
        info.height as i32,
    ));
    Ok(())
}

/// Lays a road or power line on one tile and charges its cost. On non-clear
/// terrain the tile must be empty and form a legal bridge. Rubble under the
/// new connection is cleared away.
pub fn try_connect(
    kind: ConnectKind,
    x: i32,
    y: i32,
    registry: &mut BuildingRegistry,
    grid: &mut ConnectivityGrid,
    terrain: &TerrainMap,
    economy: &mut CityEconomy,
    tiles_changed: &mut Events<TilesChanged>,
) -> ActionResult {
    if x < 0 || x >= MAP_WIDTH as i32 || y < 0 || y >= MAP_HEIGHT as i32 {
        return Err(ActionError::OutOfBounds);
    }

    let occupant = registry.find_at(x, y);
    if let Some(index) = occupant {
        if !registry.slots()[index].kind.is_rubble() {
            return Err(ActionError::BlockedByBuilding);
        }
    }

    let mask = kind.mask();
    let current = grid.get(x, y);
    let on_ground = terrain.is_clear(x, y);
    if !on_ground && !(current == 0 && grid.bridge_eligible(x, y, mask, terrain)) {
        return Err(ActionError::BlockedByTerrain);
    }
    if current & mask != 0 {
        return Err(ActionError::AlreadyExists);
    }
    if economy.funds < kind.cost() {
        return Err(ActionError::InsufficientFunds);
    }

    economy.funds -= kind.cost();
    grid.set(x, y, current | mask);

    // Building over rubble clears the lot.
    if let Some(index) = occupant {
        if let Some(slot) = registry.get_mut(index) {
            *slot = crate::buildings::Building::EMPTY;
        }
    }

    tiles_changed.send(TilesChanged::tile_and_neighbours(x, y));
    Ok(())
}

/// Demolishes the building under the tile (footprint-area cost) or, with no
/// building there, clears the tile's connections (flat cost).
pub fn try_bulldoze(
    x: i32,
    y: i32,
    registry: &mut BuildingRegistry,
    grid: &mut ConnectivityGrid,
    economy: &mut CityEconomy,
    tiles_changed: &mut Events<TilesChanged>,
) -> ActionResult {
    if x < 0 || x >= MAP_WIDTH as i32 || y < 0 || y >= MAP_HEIGHT as i32 {
        return Err(ActionError::OutOfBounds);
    }

    let target = registry
        .find_at(x, y)
        .filter(|&index| !registry.slots()[index].kind.is_rubble());

    if let Some(index) = target {
        let building = registry.slots()[index];
        let info = building.kind.info();
        let cost = info.width as i32 * info.height as i32 * BULLDOZER_COST;
        if economy.funds < cost {
            return Err(ActionError::InsufficientFunds);
        }
        economy.funds -= cost;
        registry.destroy(index, grid);
        tiles_changed.send(TilesChanged::rect(
            building.x as i32,
            building.y as i32,
            info.width as i32,
            info.height as i32,
        ));
        Ok(())
    } else if grid.get(x, y) != 0 {
        if economy.funds < BULLDOZER_COST {
            return Err(ActionError::InsufficientFunds);
        }
        economy.funds -= BULLDOZER_COST;
        grid.set(x, y, 0);
        tiles_changed.send(TilesChanged::tile_and_neighbours(x, y));
        Ok(())
    } else {
        Err(ActionError::NothingThere)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
