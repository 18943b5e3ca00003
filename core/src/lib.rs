#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Skyshield engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! actually happened. The building catalog also lives here: templates are
//! immutable values computed purely from `(kind, level)`, so every consumer
//! agrees on stats without sharing mutable state.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of rows in the city grid. Row zero rests on the ground line.
pub const GRID_ROWS: u32 = 12;

/// Total number of columns the grid may ever expose, locked or not.
pub const GRID_MAX_COLUMNS: u32 = 16;

/// Width of a single grid column expressed in world units.
pub const SLOT_WIDTH: f32 = 60.0;

/// Height of a single grid cell expressed in world units.
pub const CELL_HEIGHT: f32 = 40.0;

/// Horizontal offset of the grid's left edge within the playfield.
pub const GRID_START_X: f32 = 50.0;

/// World-space y of the ground line. The y axis grows downward.
pub const GROUND_Y: f32 = 600.0;

/// World-space y of the shield plane hovering above the city.
pub const SHIELD_Y: f32 = 200.0;

/// Thickness of the band in which the shield intercepts enemies.
pub const SHIELD_BAND_HEIGHT: f32 = 10.0;

/// Width of the playfield in world units.
pub const PLAYFIELD_WIDTH: f32 = 1280.0;

/// Height of the playfield in world units.
pub const PLAYFIELD_HEIGHT: f32 = 720.0;

/// Highest level any building may reach.
pub const MAX_BUILDING_LEVEL: u8 = 9;

/// Describes the active gameplay phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Build phase where the player edits the city between waves.
    Build,
    /// Combat phase where a wave is being simulated.
    Combat,
}

/// Horizontal direction used when growing the unlocked column window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Toward column zero.
    Left,
    /// Toward the last grid column.
    Right,
}

/// Allegiance of a ground unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Hostile units spawned by crashed enemies.
    Invader,
    /// Friendly units produced by barracks.
    Defender,
}

/// Unique identifier assigned to a building.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BuildingId(u32);

impl BuildingId {
    /// Creates a new building identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an aerial enemy for the current wave.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a ground unit for the current wave.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a drone for the current wave.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct DroneId(u32);

impl DroneId {
    /// Creates a new drone identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Tagged reference to a combat target.
///
/// Targets are always identified by id into the owning collection rather than
/// by pointer, so stale references resolve to "target gone" instead of
/// dangling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetRef {
    /// A placed building.
    Building(BuildingId),
    /// A ground unit of either team.
    Unit(UnitId),
    /// An aerial enemy.
    Enemy(EnemyId),
}

/// Origin of a projectile, controlling which collisions it participates in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileSource {
    /// Fired by a turret building.
    Turret,
    /// Fired by a drone.
    Drone,
    /// Fired by an enemy.
    Enemy,
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Rows count upward from the ground line: row zero touches the ground.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell, counted up from the ground.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// World-space centre of the cell.
    #[must_use]
    pub fn center(&self) -> WorldPoint {
        WorldPoint::new(
            column_center_x(self.column),
            GROUND_Y - (self.row as f32 + 0.5) * CELL_HEIGHT,
        )
    }
}

/// Axis-aligned rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: CellCoord,
    size: CellRectSize,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: CellRectSize) -> Self {
        Self { origin, size }
    }

    /// Bottom-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole cells.
    #[must_use]
    pub const fn size(&self) -> CellRectSize {
        self.size
    }

    /// First column covered by the rectangle.
    #[must_use]
    pub const fn left_column(&self) -> u32 {
        self.origin.column()
    }

    /// One past the last column covered by the rectangle.
    #[must_use]
    pub const fn right_column(&self) -> u32 {
        self.origin.column() + self.size.width()
    }

    /// Bottom row of the rectangle.
    #[must_use]
    pub const fn bottom_row(&self) -> u32 {
        self.origin.row()
    }

    /// One past the top row of the rectangle.
    #[must_use]
    pub const fn top_row(&self) -> u32 {
        self.origin.row() + self.size.height()
    }

    /// Reports whether the rectangle covers the provided cell.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() >= self.left_column()
            && cell.column() < self.right_column()
            && cell.row() >= self.bottom_row()
            && cell.row() < self.top_row()
    }

    /// Reports whether the column ranges of two rectangles overlap.
    #[must_use]
    pub fn columns_overlap(&self, other: &CellRect) -> bool {
        self.left_column() < other.right_column() && other.left_column() < self.right_column()
    }

    /// Iterator over every cell covered by the rectangle.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let rect = *self;
        (rect.bottom_row()..rect.top_row()).flat_map(move |row| {
            (rect.left_column()..rect.right_column()).map(move |column| CellCoord::new(column, row))
        })
    }

    /// World-space corner with the smallest x and y (top-left on screen).
    #[must_use]
    pub fn world_min(&self) -> WorldPoint {
        WorldPoint::new(
            GRID_START_X + self.left_column() as f32 * SLOT_WIDTH,
            GROUND_Y - self.top_row() as f32 * CELL_HEIGHT,
        )
    }

    /// World-space corner with the largest x and y (bottom-right on screen).
    #[must_use]
    pub fn world_max(&self) -> WorldPoint {
        WorldPoint::new(
            GRID_START_X + self.right_column() as f32 * SLOT_WIDTH,
            GROUND_Y - self.bottom_row() as f32 * CELL_HEIGHT,
        )
    }

    /// World-space centre of the rectangle.
    #[must_use]
    pub fn world_center(&self) -> WorldPoint {
        let min = self.world_min();
        let max = self.world_max();
        WorldPoint::new((min.x() + max.x()) / 2.0, (min.y() + max.y()) / 2.0)
    }
}

/// Size of a [`CellRect`] measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRectSize {
    width: u32,
    height: u32,
}

impl CellRectSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the rectangle in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Point in continuous world space. The y axis grows toward the ground.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component of the point.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component of the point.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(&self, other: WorldPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(&self, other: WorldPoint) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Reports whether the point lies inside the playfield rectangle.
    #[must_use]
    pub fn in_playfield(&self) -> bool {
        self.x >= 0.0 && self.x <= PLAYFIELD_WIDTH && self.y >= 0.0 && self.y <= PLAYFIELD_HEIGHT
    }
}

/// World-space x of the centre of the provided column.
#[must_use]
pub fn column_center_x(column: u32) -> f32 {
    GRID_START_X + (column as f32 + 0.5) * SLOT_WIDTH
}

/// Column whose horizontal span contains the provided x, if any.
#[must_use]
pub fn column_at_x(x: f32) -> Option<u32> {
    if x < GRID_START_X {
        return None;
    }
    let column = ((x - GRID_START_X) / SLOT_WIDTH) as u32;
    (column < GRID_MAX_COLUMNS).then_some(column)
}

/// Kinds of buildings the player may construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    /// Generates energy that the rest of the city consumes.
    PowerPlant,
    /// Extends the shield's hit points; demands a vacant neighbour column.
    Datacenter,
    /// Accelerates shield recharge.
    Capacitor,
    /// Fires homing projectiles at aerial enemies.
    Turret,
    /// Produces autonomous drones up to a shared capacity pool.
    DroneFactory,
    /// Trains ground defenders up to a shared capacity pool.
    Barracks,
}

impl BuildingKind {
    /// All constructible kinds in menu order.
    pub const ALL: [BuildingKind; 6] = [
        BuildingKind::PowerPlant,
        BuildingKind::Datacenter,
        BuildingKind::Capacitor,
        BuildingKind::Turret,
        BuildingKind::DroneFactory,
        BuildingKind::Barracks,
    ];

    /// Human-readable name used for log lines.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PowerPlant => "power plant",
            Self::Datacenter => "datacenter",
            Self::Capacitor => "capacitor",
            Self::Turret => "turret",
            Self::DroneFactory => "drone factory",
            Self::Barracks => "barracks",
        }
    }
}

/// Coarse level grouping. Levels 1-3 are tier 1, 4-6 tier 2, 7-9 tier 3.
#[must_use]
pub const fn tier_for_level(level: u8) -> u8 {
    if level <= 3 {
        1
    } else if level <= 6 {
        2
    } else {
        3
    }
}

/// Linear per-level stat multiplier used by every kind outside the turret
/// combat table.
#[must_use]
pub fn level_scale(level: u8) -> f32 {
    1.0 + (level.saturating_sub(1)) as f32 * 0.3
}

/// Immutable stat block for a building of a given kind and level.
///
/// Templates are values: upgrading a building swaps its template wholesale,
/// never mutates fields in place.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildingTemplate {
    /// Kind of building the template describes.
    pub kind: BuildingKind,
    /// Level the template was computed for, 1 through 9.
    pub level: u8,
    /// Maximum hit points.
    pub max_hp: f32,
    /// Energy produced per second while alive.
    pub energy_production: u32,
    /// Energy consumed per second while alive.
    pub energy_consumption: u32,
    /// Additional shield hit points contributed while alive.
    pub shield_hp_bonus: f32,
    /// Additional shield recharge rate contributed while alive.
    pub shield_recharge_bonus: f32,
    /// Credit cost to place the building at level 1.
    pub cost: u32,
    /// Credit cost of the next upgrade; zero means the kind never upgrades.
    pub upgrade_cost: u32,
    /// Damage per shot or per produced unit attack.
    pub damage: f32,
    /// Target acquisition radius in world units.
    pub range: f32,
    /// Maximum projectile travel distance, always at least [`Self::range`].
    pub ammo_range: f32,
    /// Speed of fired projectiles in world units per second.
    pub projectile_speed: f32,
    /// Contribution to the kind's shared production capacity pool.
    pub capacity: u32,
    /// Firing or attack cooldown in seconds.
    pub cooldown: f32,
    /// Occupied cells as width times height.
    pub footprint: CellRectSize,
}

impl BuildingTemplate {
    /// Tier derived from the template level.
    #[must_use]
    pub const fn tier(&self) -> u8 {
        tier_for_level(self.level)
    }

    /// Reports whether a further upgrade exists for this template.
    #[must_use]
    pub const fn can_upgrade(&self) -> bool {
        self.upgrade_cost > 0 && self.level < MAX_BUILDING_LEVEL
    }
}

struct BaseStats {
    max_hp: f32,
    energy_production: u32,
    energy_consumption: u32,
    shield_hp_bonus: f32,
    shield_recharge_bonus: f32,
    cost: u32,
    upgrade_cost: u32,
}

const fn base_stats(kind: BuildingKind) -> BaseStats {
    match kind {
        BuildingKind::PowerPlant => BaseStats {
            max_hp: 150.0,
            energy_production: 15,
            energy_consumption: 0,
            shield_hp_bonus: 0.0,
            shield_recharge_bonus: 0.0,
            cost: 50,
            upgrade_cost: 40,
        },
        BuildingKind::Datacenter => BaseStats {
            max_hp: 100.0,
            energy_production: 0,
            energy_consumption: 4,
            shield_hp_bonus: 150.0,
            shield_recharge_bonus: 0.0,
            cost: 75,
            upgrade_cost: 60,
        },
        BuildingKind::Capacitor => BaseStats {
            max_hp: 80.0,
            energy_production: 0,
            energy_consumption: 3,
            shield_hp_bonus: 0.0,
            shield_recharge_bonus: 2.0,
            cost: 60,
            upgrade_cost: 50,
        },
        BuildingKind::Turret => BaseStats {
            max_hp: 120.0,
            energy_production: 0,
            energy_consumption: 5,
            shield_hp_bonus: 0.0,
            shield_recharge_bonus: 0.0,
            cost: 80,
            upgrade_cost: 70,
        },
        BuildingKind::DroneFactory => BaseStats {
            max_hp: 130.0,
            energy_production: 0,
            energy_consumption: 8,
            shield_hp_bonus: 0.0,
            shield_recharge_bonus: 0.0,
            cost: 130,
            upgrade_cost: 0,
        },
        BuildingKind::Barracks => BaseStats {
            max_hp: 140.0,
            energy_production: 0,
            energy_consumption: 4,
            shield_hp_bonus: 0.0,
            shield_recharge_bonus: 0.0,
            cost: 90,
            upgrade_cost: 70,
        },
    }
}

struct TurretTier {
    max_hp: f32,
    damage: f32,
    range: f32,
    ammo_range: f32,
    projectile_speed: f32,
    cooldown: f32,
}

// Hand-tuned balance breakpoints at levels 4 and 7. The jumps between tiers
// are deliberate and must not be replaced by the linear scale.
const TURRET_TIERS: [TurretTier; 3] = [
    TurretTier {
        max_hp: 120.0,
        damage: 25.0,
        range: 600.0,
        ammo_range: 700.0,
        projectile_speed: 300.0,
        cooldown: 1.0,
    },
    TurretTier {
        max_hp: 300.0,
        damage: 60.0,
        range: 650.0,
        ammo_range: 760.0,
        projectile_speed: 360.0,
        cooldown: 0.8,
    },
    TurretTier {
        max_hp: 520.0,
        damage: 140.0,
        range: 720.0,
        ammo_range: 840.0,
        projectile_speed: 420.0,
        cooldown: 0.6,
    },
];

/// Footprint of the provided kind at the provided tier.
#[must_use]
pub const fn footprint_for(kind: BuildingKind, tier: u8) -> CellRectSize {
    match kind {
        BuildingKind::PowerPlant => CellRectSize::new(tier as u32, tier as u32),
        BuildingKind::Datacenter | BuildingKind::Capacitor => CellRectSize::new(1, tier as u32),
        BuildingKind::Turret | BuildingKind::DroneFactory | BuildingKind::Barracks => {
            CellRectSize::new(1, 1)
        }
    }
}

/// Computes the immutable stat template for a kind at a level.
///
/// Levels outside 1..=9 are clamped. Most stats follow the 30 %-per-level
/// linear scale recovered from the balance sheet; turret combat stats instead
/// use the discontinuous per-tier table.
#[must_use]
pub fn template(kind: BuildingKind, level: u8) -> BuildingTemplate {
    let level = level.clamp(1, MAX_BUILDING_LEVEL);
    let tier = tier_for_level(level);
    let base = base_stats(kind);
    let scale = level_scale(level);

    let mut built = BuildingTemplate {
        kind,
        level,
        max_hp: (base.max_hp * scale).floor(),
        energy_production: (base.energy_production as f32 * scale) as u32,
        energy_consumption: (base.energy_consumption as f32 * scale) as u32,
        shield_hp_bonus: (base.shield_hp_bonus * scale).floor(),
        shield_recharge_bonus: base.shield_recharge_bonus * scale,
        cost: base.cost,
        upgrade_cost: base.upgrade_cost,
        damage: 0.0,
        range: 0.0,
        ammo_range: 0.0,
        projectile_speed: 0.0,
        capacity: 0,
        cooldown: 0.0,
        footprint: footprint_for(kind, tier),
    };

    match kind {
        BuildingKind::Turret => {
            let combat = &TURRET_TIERS[(tier - 1) as usize];
            built.max_hp = combat.max_hp;
            built.damage = combat.damage;
            built.range = combat.range;
            built.ammo_range = combat.ammo_range;
            built.projectile_speed = combat.projectile_speed;
            built.cooldown = combat.cooldown;
        }
        BuildingKind::DroneFactory => {
            built.damage = 15.0 * scale;
            built.range = 250.0;
            built.ammo_range = 300.0;
            built.projectile_speed = 340.0;
            built.capacity = 2;
            built.cooldown = 0.8;
        }
        BuildingKind::Barracks => {
            built.damage = 15.0 * scale;
            built.capacity = 2;
            built.cooldown = 1.0;
        }
        _ => {}
    }

    built
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Requests placement of a level 1 building anchored at the provided cell.
    PlaceBuilding {
        /// Kind of building to construct.
        kind: BuildingKind,
        /// Bottom-left cell of the requested footprint.
        origin: CellCoord,
    },
    /// Requests that an existing building advance one level.
    UpgradeBuilding {
        /// Identifier of the building to upgrade.
        building: BuildingId,
    },
    /// Requests relocation of an existing building at its current level.
    MoveBuilding {
        /// Identifier of the building to relocate.
        building: BuildingId,
        /// Bottom-left cell of the destination footprint.
        destination: CellCoord,
    },
    /// Requests player-driven demolition of a building, refunding half its cost.
    DemolishBuilding {
        /// Identifier of the building to demolish.
        building: BuildingId,
    },
    /// Requests that the unlocked column window grow by one column.
    UnlockColumn {
        /// Edge of the window to grow toward.
        side: Side,
    },
    /// Moves the build cursor to the provided cell, clamped to the grid.
    SelectCell {
        /// Requested cursor cell.
        cell: CellCoord,
    },
    /// Requests the start of the next combat wave.
    StartWave,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Appends a free-form line to the world's rolling log.
    AddLog {
        /// Message to record.
        message: String,
    },
}

/// Cause recorded when a building leaves the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestructionCause {
    /// Hit points were exhausted by an explosion or ground assault.
    Destroyed,
    /// Support beneath the building vanished and it collapsed.
    Collapse,
    /// Falling debris from a building above finished it off.
    Debris,
    /// The player demolished it on purpose.
    Demolished,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a building was placed.
    BuildingPlaced {
        /// Identifier assigned by the world.
        building: BuildingId,
        /// Kind of building constructed.
        kind: BuildingKind,
        /// Cells occupied by the new building.
        region: CellRect,
    },
    /// Reports that a placement request was rejected.
    PlacementRejected {
        /// Kind requested for placement.
        kind: BuildingKind,
        /// Origin cell provided in the request.
        origin: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a building reached a new level.
    BuildingUpgraded {
        /// Identifier of the upgraded building.
        building: BuildingId,
        /// Level the building now holds.
        level: u8,
        /// Cells occupied after the upgrade, possibly shifted left.
        region: CellRect,
    },
    /// Reports that an upgrade request was rejected.
    UpgradeRejected {
        /// Identifier of the building targeted by the request.
        building: BuildingId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a building moved to a new position.
    BuildingMoved {
        /// Identifier of the relocated building.
        building: BuildingId,
        /// Cells occupied before the move.
        from: CellRect,
        /// Cells occupied after the move.
        to: CellRect,
    },
    /// Reports that a move request was rejected.
    MoveRejected {
        /// Identifier of the building targeted by the request.
        building: BuildingId,
        /// Specific reason the move failed.
        reason: MoveError,
    },
    /// Confirms that a building left the grid.
    BuildingDestroyed {
        /// Identifier of the removed building.
        building: BuildingId,
        /// Kind of the removed building.
        kind: BuildingKind,
        /// Why the building was removed.
        cause: DestructionCause,
        /// Credits refunded to the player, zero outside demolition.
        refund: u32,
    },
    /// Confirms that the unlocked column window grew.
    ColumnUnlocked {
        /// Edge the window grew toward.
        side: Side,
        /// First unlocked column after the change.
        start: u32,
        /// One past the last unlocked column after the change.
        end: u32,
    },
    /// Reports that a column unlock request was rejected.
    UnlockRejected {
        /// Edge requested for growth.
        side: Side,
        /// Specific reason the unlock failed.
        reason: UnlockError,
    },
    /// Confirms that a combat wave began.
    WaveStarted {
        /// One-based number of the wave.
        wave: u32,
    },
    /// Reports that a wave start request was rejected.
    WaveStartRejected {
        /// Specific reason the wave could not start.
        reason: WaveStartError,
    },
    /// Confirms that an enemy entered the playfield.
    EnemySpawned {
        /// Identifier of the spawned enemy.
        enemy: EnemyId,
        /// Whether the enemy is a wave boss.
        boss: bool,
    },
    /// Confirms that an enemy was destroyed before detonating.
    EnemyDestroyed {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
        /// Credits awarded for the kill.
        reward: u32,
    },
    /// Reports that the shield absorbed an enemy impact.
    ShieldHit {
        /// Identifier of the absorbed enemy.
        enemy: EnemyId,
        /// Shield hit points remaining after absorption.
        remaining: f32,
    },
    /// Reports that the shield collapsed and entered its reboot state.
    ShieldDown,
    /// Reports that the shield finished rebooting and is active again.
    ShieldRestored,
    /// Confirms that the active wave completed and rewards were granted.
    WaveCompleted {
        /// One-based number of the completed wave.
        wave: u32,
        /// Reward breakdown credited to the player.
        rewards: WaveRewards,
    },
    /// Announces that the simulation entered a new phase.
    PhaseChanged {
        /// Phase that became active after processing commands.
        phase: Phase,
    },
}

/// Reasons a placement request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PlacementError {
    /// Construction is only permitted during the build phase.
    #[error("not in build phase")]
    CombatInProgress,
    /// A footprint column falls outside the unlocked window.
    #[error("column not unlocked")]
    ColumnLocked,
    /// The footprint extends beyond the grid bounds.
    #[error("footprint exceeds the grid")]
    OutOfBounds,
    /// At least one cell beneath the footprint is unsupported.
    #[error("no foundation support")]
    NoFoundation,
    /// The footprint overlaps an existing building.
    #[error("space occupied")]
    Occupied,
    /// No fully vacant column neighbours the datacenter footprint.
    #[error("datacenter needs a vacant neighbour column")]
    DatacenterNeedsClearance,
    /// An elevated power plant must rest entirely on other power plants.
    #[error("power plants stack only on power plants")]
    PowerPlantFoundation,
    /// An elevated barracks must rest entirely on other barracks.
    #[error("barracks stack only on barracks")]
    BarracksFoundation,
    /// Only turrets and barracks may sit directly on a barracks roof.
    #[error("only defences may be built on a barracks")]
    DefenceOnlyAboveBarracks,
    /// The player cannot afford the building.
    #[error("not enough credits")]
    InsufficientCredits,
}

/// Reasons an upgrade request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum UpgradeError {
    /// Upgrades are only permitted during the build phase.
    #[error("not in build phase")]
    CombatInProgress,
    /// No building with the provided identifier exists.
    #[error("building not found")]
    NotFound,
    /// The building kind never upgrades.
    #[error("building cannot be upgraded")]
    NotUpgradable,
    /// The building already sits at the maximum level.
    #[error("already at maximum level")]
    MaxLevel,
    /// The player cannot afford the upgrade.
    #[error("not enough credits")]
    InsufficientCredits,
    /// The grown footprint fits neither in place nor shifted left.
    #[error("expansion blocked: {0}")]
    Blocked(PlacementError),
}

/// Reasons a move request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum MoveError {
    /// Moves are only permitted during the build phase.
    #[error("not in build phase")]
    CombatInProgress,
    /// No building with the provided identifier exists.
    #[error("building not found")]
    NotFound,
    /// Another building rests on top of this one.
    #[error("building supports another building")]
    SupportsOthers,
    /// The destination failed placement validation.
    #[error("destination blocked: {0}")]
    Blocked(PlacementError),
}

/// Reasons a column unlock request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum UnlockError {
    /// Unlocks are only permitted during the build phase.
    #[error("not in build phase")]
    CombatInProgress,
    /// The window already touches the grid edge on that side.
    #[error("grid edge reached")]
    AtGridEdge,
}

/// Reasons a wave start request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum WaveStartError {
    /// A wave is already running.
    #[error("wave already in progress")]
    CombatInProgress,
    /// Energy consumption exceeds production.
    #[error("negative energy surplus")]
    EnergyDeficit,
}

/// Immutable reward breakdown produced when a wave completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaveRewards {
    /// Flat completion reward scaled by wave number.
    pub base: u32,
    /// Half the base again when no building took explosion damage.
    pub perfect_bonus: u32,
    /// Positive energy surplus converted one-to-one into credits.
    pub energy_bonus: u32,
    /// Sum of the other three fields, credited immediately.
    pub total: u32,
}

impl WaveRewards {
    /// Assembles a reward snapshot, deriving the total.
    #[must_use]
    pub const fn new(base: u32, perfect_bonus: u32, energy_bonus: u32) -> Self {
        Self {
            base,
            perfect_bonus,
            energy_bonus,
            total: base + perfect_bonus + energy_bonus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tier_boundaries_sit_at_levels_four_and_seven() {
        assert_eq!(tier_for_level(1), 1);
        assert_eq!(tier_for_level(3), 1);
        assert_eq!(tier_for_level(4), 2);
        assert_eq!(tier_for_level(6), 2);
        assert_eq!(tier_for_level(7), 3);
        assert_eq!(tier_for_level(9), 3);
    }

    #[test]
    fn power_plant_footprint_grows_square_with_tier() {
        assert_eq!(template(BuildingKind::PowerPlant, 1).footprint, CellRectSize::new(1, 1));
        assert_eq!(template(BuildingKind::PowerPlant, 4).footprint, CellRectSize::new(2, 2));
        assert_eq!(template(BuildingKind::PowerPlant, 7).footprint, CellRectSize::new(3, 3));
    }

    #[test]
    fn datacenter_and_capacitor_grow_vertically_only() {
        assert_eq!(template(BuildingKind::Datacenter, 5).footprint, CellRectSize::new(1, 2));
        assert_eq!(template(BuildingKind::Capacitor, 9).footprint, CellRectSize::new(1, 3));
    }

    #[test]
    fn defence_kinds_keep_single_cell_footprints() {
        for kind in [
            BuildingKind::Turret,
            BuildingKind::DroneFactory,
            BuildingKind::Barracks,
        ] {
            assert_eq!(template(kind, 9).footprint, CellRectSize::new(1, 1));
        }
    }

    #[test]
    fn linear_scale_adds_thirty_percent_per_level() {
        let level_one = template(BuildingKind::PowerPlant, 1);
        let level_three = template(BuildingKind::PowerPlant, 3);
        assert_eq!(level_one.energy_production, 15);
        assert_eq!(level_three.energy_production, 24);
        assert_eq!(level_three.max_hp, 240.0);
    }

    #[test]
    fn turret_table_jumps_at_tier_boundaries() {
        let tier_one = template(BuildingKind::Turret, 3);
        let tier_two = template(BuildingKind::Turret, 4);
        let tier_three = template(BuildingKind::Turret, 7);

        assert_eq!(tier_one.damage, 25.0);
        assert_eq!(tier_two.damage, 60.0);
        assert_eq!(tier_three.damage, 140.0);

        // Flat inside a tier: the linear scale must not leak in.
        assert_eq!(template(BuildingKind::Turret, 5).damage, tier_two.damage);
        assert_eq!(template(BuildingKind::Turret, 6).range, tier_two.range);
    }

    #[test]
    fn ammo_range_always_covers_acquisition_range() {
        for kind in BuildingKind::ALL {
            for level in 1..=MAX_BUILDING_LEVEL {
                let stats = template(kind, level);
                assert!(
                    stats.ammo_range >= stats.range,
                    "{kind:?} level {level} ammo range below range",
                );
            }
        }
    }

    #[test]
    fn drone_factory_never_upgrades() {
        let stats = template(BuildingKind::DroneFactory, 1);
        assert_eq!(stats.upgrade_cost, 0);
        assert!(!stats.can_upgrade());
    }

    #[test]
    fn level_nine_cannot_upgrade_further() {
        let stats = template(BuildingKind::PowerPlant, 9);
        assert!(stats.upgrade_cost > 0);
        assert!(!stats.can_upgrade());
    }

    #[test]
    fn out_of_range_levels_are_clamped() {
        assert_eq!(template(BuildingKind::Turret, 0).level, 1);
        assert_eq!(template(BuildingKind::Turret, 42).level, MAX_BUILDING_LEVEL);
    }

    #[test]
    fn cell_rect_reports_columns_and_cells() {
        let rect = CellRect::from_origin_and_size(CellCoord::new(3, 1), CellRectSize::new(2, 2));
        assert_eq!(rect.left_column(), 3);
        assert_eq!(rect.right_column(), 5);
        assert_eq!(rect.top_row(), 3);
        assert!(rect.contains(CellCoord::new(4, 2)));
        assert!(!rect.contains(CellCoord::new(5, 1)));
        assert_eq!(rect.cells().count(), 4);
    }

    #[test]
    fn column_overlap_detects_shared_columns() {
        let left = CellRect::from_origin_and_size(CellCoord::new(0, 0), CellRectSize::new(2, 1));
        let right = CellRect::from_origin_and_size(CellCoord::new(1, 5), CellRectSize::new(2, 1));
        let apart = CellRect::from_origin_and_size(CellCoord::new(4, 0), CellRectSize::new(1, 1));
        assert!(left.columns_overlap(&right));
        assert!(!left.columns_overlap(&apart));
    }

    #[test]
    fn world_mapping_places_ground_row_on_ground_line() {
        let rect = CellRect::from_origin_and_size(CellCoord::new(0, 0), CellRectSize::new(1, 1));
        assert_eq!(rect.world_max().y(), GROUND_Y);
        assert_eq!(rect.world_min().y(), GROUND_Y - CELL_HEIGHT);
        assert_eq!(rect.world_min().x(), GRID_START_X);
    }

    #[test]
    fn column_lookup_inverts_column_centers() {
        for column in 0..GRID_MAX_COLUMNS {
            assert_eq!(column_at_x(column_center_x(column)), Some(column));
        }
        assert_eq!(column_at_x(GRID_START_X - 1.0), None);
    }

    #[test]
    fn wave_rewards_total_is_derived() {
        let rewards = WaveRewards::new(150, 75, 26);
        assert_eq!(rewards.total, 251);
    }

    #[test]
    fn contract_types_round_trip_through_bincode() {
        assert_round_trip(&BuildingId::new(42));
        assert_round_trip(&TargetRef::Unit(UnitId::new(7)));
        assert_round_trip(&PlacementError::DatacenterNeedsClearance);
        assert_round_trip(&UpgradeError::Blocked(PlacementError::Occupied));
        assert_round_trip(&WaveRewards::new(100, 50, 0));
        assert_round_trip(&template(BuildingKind::Turret, 5));
    }
}
