//! Map dimensions, costs, and every tuning constant of the simulation model.
//!
//! All values live in one place so balance changes never require touching the
//! systems that consume them.

/// Map width in tiles.
pub const MAP_WIDTH: usize = 48;
/// Map height in tiles.
pub const MAP_HEIGHT: usize = 48;

/// Packed connectivity storage size: 2 bits per tile, 4 tiles per byte.
pub const CONNECTION_MAP_BYTES: usize = MAP_WIDTH * MAP_HEIGHT / 4;
/// Packed power storage size: 1 bit per tile, 8 tiles per byte.
pub const POWER_MAP_BYTES: usize = MAP_WIDTH * MAP_HEIGHT / 8;
/// Packed terrain storage size: 1 bit per tile, 8 tiles per byte.
pub const TERRAIN_MAP_BYTES: usize = MAP_WIDTH * MAP_HEIGHT / 8;

/// Fixed capacity of the building arena. Slots are recycled, never grown.
pub const MAX_BUILDINGS: usize = 100;

/// Population density cap per building.
pub const MAX_POPULATION_DENSITY: u8 = 15;

/// Burn counter cap; a building that would burn past this is destroyed.
pub const MAX_FIRE_COUNTER: u8 = 3;

// ---------------------------------------------------------------------------
// Player action costs
// ---------------------------------------------------------------------------

/// Bulldozing cost per tile (buildings pay footprint area times this).
pub const BULLDOZER_COST: i32 = 1;
/// Cost of laying one road tile.
pub const ROAD_COST: i32 = 10;
/// Cost of laying one power line tile.
pub const POWERLINE_COST: i32 = 5;

// ---------------------------------------------------------------------------
// New-city defaults
// ---------------------------------------------------------------------------

pub const STARTING_FUNDS: i32 = 5000;
pub const STARTING_TAX_RATE: u8 = 7;
/// Tax rate is a whole percentage; edits are clamped to this.
pub const MAX_TAX_RATE: u8 = 99;

// ---------------------------------------------------------------------------
// Disasters
// ---------------------------------------------------------------------------

/// Countdown reseed range after a disaster fires. A loaded countdown outside
/// this range is clamped so a corrupt save cannot stall disasters forever.
pub const MIN_TIME_BETWEEN_DISASTERS: u16 = 500;
pub const MAX_TIME_BETWEEN_DISASTERS: u16 = 3000;

// ---------------------------------------------------------------------------
// Yearly budget
// ---------------------------------------------------------------------------

/// Tax revenue = total population * this multiplier * tax rate / 100.
pub const POPULATION_MULTIPLIER: i32 = 8;
/// Flat yearly maintenance per police or fire department.
pub const FIRE_AND_POLICE_MAINTENANCE_COST: i32 = 100;
/// Road maintenance per tile, scaled down by 100 at settlement time.
pub const ROAD_MAINTENANCE_COST: i32 = 30;

// ---------------------------------------------------------------------------
// Growth scoring model
// ---------------------------------------------------------------------------

/// Score at or above which a powered zone gains one density point.
pub const SIM_INCREMENT_POP_THRESHOLD: i32 = 20;
/// Score at or below which a populated zone loses one density point.
pub const SIM_DECREMENT_POP_THRESHOLD: i32 = -30;

/// Target the averaging pull steers density toward.
pub const AVERAGE_POPULATION_DENSITY: i32 = 8;
/// Strength of the averaging pull (zero in the shipped balance).
pub const SIM_AVERAGING_STRENGTH: i32 = 0;
/// One-time bonus for an empty, road-connected zone.
pub const SIM_BASE_SCORE: i32 = 15;

pub const SIM_EMPLOYMENT_BOOST: i32 = 10;
pub const SIM_UNEMPLOYMENT_PENALTY: i32 = 100;
pub const SIM_INDUSTRIAL_OPPORTUNITY_BOOST: i32 = 10;
pub const SIM_COMMERCIAL_OPPORTUNITY_BOOST: i32 = 10;

/// Manhattan distance within which another building exerts local influence.
pub const SIM_LOCAL_BUILDING_DISTANCE: u32 = 32;
pub const SIM_LOCAL_BUILDING_INFLUENCE: i32 = 4;
pub const SIM_STADIUM_BOOST: i32 = 100;
pub const SIM_PARK_BOOST: i32 = 5;

/// Crime = density * (police distance - offset), clamped to [0, max].
pub const SIM_MAX_CRIME: i32 = 50;
pub const SIM_POLICE_DISTANCE_OFFSET: i32 = 16;
/// Police distance assumed when no powered station exists at all.
pub const SIM_DEFAULT_POLICE_DISTANCE: u32 = 24;

/// Jitter mask: score noise is `(roll & mask) - mask/2`.
pub const SIM_RANDOM_STRENGTH_MASK: i32 = 31;

pub const SIM_POLLUTION_INFLUENCE: i32 = 2;
pub const SIM_MAX_POLLUTION: i32 = 50;
pub const SIM_INDUSTRIAL_BASE_POLLUTION: i32 = 8;
pub const SIM_TRAFFIC_BASE_POLLUTION: i32 = 8;
pub const SIM_POWERPLANT_BASE_POLLUTION: i32 = 32;

/// Density above which a zone flags heavy traffic (a pollution source).
pub const SIM_HEAVY_TRAFFIC_THRESHOLD: u8 = 12;

pub const SIM_IDEAL_TAX_RATE: i32 = 6;
pub const SIM_TAX_RATE_PENALTY: i32 = 10;

/// At least this many road tiles on the perimeter marks a building as part
/// of the road network.
pub const ROAD_CONNECTION_MINIMUM: u8 = 3;

// ---------------------------------------------------------------------------
// Fire model (all chances compare an 8-bit roll)
// ---------------------------------------------------------------------------

/// Spread is attempted when a roll exceeds this.
pub const SIM_FIRE_SPREAD_CHANCE: u8 = 64;
/// The burn counter advances when a roll is below this.
pub const SIM_FIRE_BURN_CHANCE: u8 = 64;
/// Extinguish influence = base + distance * multiplier; a roll must exceed
/// the influence to put the fire out, so higher means less likely.
pub const SIM_FIRE_DEPT_BASE_INFLUENCE: u32 = 64;
pub const SIM_FIRE_DEPT_INFLUENCE_MULTIPLIER: u32 = 5;
