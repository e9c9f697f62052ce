use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Building catalogue. `None` marks an empty registry slot; the two rubble
/// kinds are placeholders left behind by destruction and are replaceable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Encode, Decode,
)]
pub enum BuildingKind {
    #[default]
    None,
    Residential,
    Commercial,
    Industrial,
    PowerPlant,
    Park,
    PoliceDept,
    FireDept,
    Stadium,
    Rubble3x3,
    Rubble4x4,
}

/// Static per-kind metadata. Never mutated at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildingInfo {
    pub cost: u16,
    pub width: u8,
    pub height: u8,
    pub draw_tile: u8,
}

impl BuildingKind {
    /// Metadata lookup. A `match` rather than a table indexed by
    /// discriminant, so reordering the enum cannot silently swap costs or
    /// footprints.
    pub fn info(self) -> BuildingInfo {
        match self {
            BuildingKind::None => BuildingInfo { cost: 0, width: 0, height: 0, draw_tile: 0 },
            BuildingKind::Residential => BuildingInfo { cost: 100, width: 3, height: 3, draw_tile: 64 },
            BuildingKind::Commercial => BuildingInfo { cost: 100, width: 3, height: 3, draw_tile: 67 },
            BuildingKind::Industrial => BuildingInfo { cost: 100, width: 3, height: 3, draw_tile: 70 },
            BuildingKind::PowerPlant => BuildingInfo { cost: 3000, width: 4, height: 4, draw_tile: 160 },
            BuildingKind::Park => BuildingInfo { cost: 50, width: 3, height: 3, draw_tile: 73 },
            BuildingKind::PoliceDept => BuildingInfo { cost: 500, width: 3, height: 3, draw_tile: 76 },
            BuildingKind::FireDept => BuildingInfo { cost: 500, width: 3, height: 3, draw_tile: 124 },
            BuildingKind::Stadium => BuildingInfo { cost: 3000, width: 4, height: 4, draw_tile: 164 },
            BuildingKind::Rubble3x3 => BuildingInfo { cost: 0, width: 3, height: 3, draw_tile: 0 },
            BuildingKind::Rubble4x4 => BuildingInfo { cost: 0, width: 4, height: 4, draw_tile: 0 },
        }
    }

    pub fn is_rubble(self) -> bool {
        matches!(self, BuildingKind::Rubble3x3 | BuildingKind::Rubble4x4)
    }

    /// Income-producing zone kinds whose density the growth model drives.
    pub fn is_zone(self) -> bool {
        matches!(
            self,
            BuildingKind::Residential | BuildingKind::Commercial | BuildingKind::Industrial
        )
    }

    /// Whether the footprint conducts power. Parks are decorative and must
    /// not bridge electrical networks.
    pub fn is_conductive(self) -> bool {
        !matches!(self, BuildingKind::Park)
    }
}

/// One building arena slot. Plain value type; the registry owns all of them
/// and hands out indices, never references that outlive a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct Building {
    pub kind: BuildingKind,
    pub x: u8,
    pub y: u8,
    /// 0..=MAX_POPULATION_DENSITY, meaningful for zone kinds only.
    pub population_density: u8,
    /// 0 = not burning; counts up to MAX_FIRE_COUNTER while on fire.
    pub on_fire: u8,
    /// Derived each simulation pass from density.
    pub heavy_traffic: bool,
    /// Derived each power pass from the powered bit of the origin tile.
    pub has_power: bool,
}

impl Building {
    pub const EMPTY: Building = Building {
        kind: BuildingKind::None,
        x: 0,
        y: 0,
        population_density: 0,
        on_fire: 0,
        heavy_traffic: false,
        has_power: false,
    };

    pub fn is_empty_slot(&self) -> bool {
        self.kind == BuildingKind::None
    }

    pub fn width(&self) -> u8 {
        self.kind.info().width
    }

    pub fn height(&self) -> u8 {
        self.kind.info().height
    }

    /// Whether the footprint contains the tile.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let info = self.kind.info();
        x >= self.x as i32
            && x < self.x as i32 + info.width as i32
            && y >= self.y as i32
            && y < self.y as i32 + info.height as i32
    }

    /// Half-open rectangle overlap against another footprint.
    pub fn overlaps(&self, other: &Building) -> bool {
        let a = self.kind.info();
        let b = other.kind.info();
        (self.x as i32) < other.x as i32 + b.width as i32
            && (other.x as i32) < self.x as i32 + a.width as i32
            && (self.y as i32) < other.y as i32 + b.height as i32
            && (other.y as i32) < self.y as i32 + a.height as i32
    }

    /// Manhattan distance between two buildings' origin tiles.
    pub fn manhattan_distance(&self, other: &Building) -> u32 {
        let dx = (self.x as i32 - other.x as i32).unsigned_abs();
        let dy = (self.y as i32 - other.y as i32).unsigned_abs();
        dx + dy
    }
}

impl Default for Building {
    fn default() -> Self {
        Building::EMPTY
    }
}
