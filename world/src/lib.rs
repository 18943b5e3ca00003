#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative Skyshield world state.
//!
//! The world owns everything the simulation knows: the city grid, the energy
//! economy, the shield, the combat entities, and the player's credits. All
//! mutation flows through [`apply`], which executes one [`Command`] and
//! records what happened as [`Event`] values. Adapters read state back
//! exclusively through the [`query`] module, so rendering can never mutate
//! the simulation. The whole state is a plain value: cloning it snapshots
//! the game, and serde round-trips restore it bit-for-bit, seeded RNG
//! included.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use skyshield_core::{
    template, CellCoord, Command, DestructionCause, Event, Phase, PlacementError, UpgradeError,
    WaveRewards, WaveStartError, GRID_MAX_COLUMNS, GRID_ROWS,
};

mod combat;
mod economy;
mod grid;

use combat::{CombatState, Ctx};
use economy::Economy;
use grid::{CityGrid, ColumnWindow};

/// Credits the player starts a fresh campaign with.
const STARTING_CREDITS: u32 = 300;

/// Maximum number of retained log lines.
const LOG_CAPACITY: usize = 50;

/// First unlocked column of a fresh grid.
const INITIAL_WINDOW_START: u32 = 4;

/// One past the last unlocked column of a fresh grid.
const INITIAL_WINDOW_END: u32 = 12;

/// Divisor applied to the build cost for the demolition refund.
const DEMOLISH_REFUND_DIVISOR: u32 = 2;

/// Represents the authoritative Skyshield world state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct World {
    credits: u32,
    wave_number: u32,
    phase: Phase,
    selected_cell: CellCoord,
    grid: CityGrid,
    economy: Economy,
    combat: CombatState,
    last_rewards: Option<WaveRewards>,
    log: VecDeque<String>,
    rng: ChaCha8Rng,
    drain_accumulator: f32,
}

impl World {
    /// Creates a fresh world with the default deterministic seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// Creates a fresh world seeded for reproducible combat randomness.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let grid = CityGrid::new(ColumnWindow {
            start: INITIAL_WINDOW_START,
            end: INITIAL_WINDOW_END,
        });
        let mut economy = Economy::new();
        economy.recompute(&grid);
        Self {
            credits: STARTING_CREDITS,
            wave_number: 0,
            phase: Phase::Build,
            selected_cell: CellCoord::new(INITIAL_WINDOW_START, 0),
            grid,
            economy,
            combat: CombatState::new(),
            last_rewards: None,
            log: VecDeque::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            drain_accumulator: 0.0,
        }
    }

    fn push_log(&mut self, line: String) {
        self.log.push_back(line);
        while self.log.len() > LOG_CAPACITY {
            let _ = self.log.pop_front();
        }
    }

    fn in_build_phase(&self) -> bool {
        self.phase == Phase::Build
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceBuilding { kind, origin } => {
            let verdict = if !world.in_build_phase() {
                Err(PlacementError::CombatInProgress)
            } else {
                world.grid.can_place(kind, 1, origin).and_then(|()| {
                    if world.credits < template(kind, 1).cost {
                        Err(PlacementError::InsufficientCredits)
                    } else {
                        Ok(())
                    }
                })
            };
            match verdict {
                Ok(()) => {
                    let cost = template(kind, 1).cost;
                    match world.grid.place(kind, origin) {
                        Ok(building) => {
                            let id = building.id;
                            let region = building.region();
                            world.credits -= cost;
                            world.economy.recompute(&world.grid);
                            out_events.push(Event::BuildingPlaced {
                                building: id,
                                kind,
                                region,
                            });
                            world.push_log(format!("{} built", kind.name()));
                        }
                        Err(reason) => out_events.push(Event::PlacementRejected {
                            kind,
                            origin,
                            reason,
                        }),
                    }
                }
                Err(reason) => out_events.push(Event::PlacementRejected {
                    kind,
                    origin,
                    reason,
                }),
            }
        }
        Command::UpgradeBuilding { building } => {
            let verdict = if !world.in_build_phase() {
                Err(UpgradeError::CombatInProgress)
            } else {
                match world.grid.get(building) {
                    None => Err(UpgradeError::NotFound),
                    Some(existing)
                        if existing.template.can_upgrade()
                            && world.credits < existing.template.upgrade_cost =>
                    {
                        Err(UpgradeError::InsufficientCredits)
                    }
                    Some(existing) => Ok(existing.template.upgrade_cost),
                }
            };
            match verdict.and_then(|cost| {
                world.grid.upgrade(building).map(|upgraded| {
                    (cost, upgraded.template.level, upgraded.region())
                })
            }) {
                Ok((cost, level, region)) => {
                    world.credits -= cost;
                    world.economy.recompute(&world.grid);
                    out_events.push(Event::BuildingUpgraded {
                        building,
                        level,
                        region,
                    });
                    world.push_log(format!("Upgrade complete (level {level})"));
                }
                Err(reason) => out_events.push(Event::UpgradeRejected { building, reason }),
            }
        }
        Command::MoveBuilding {
            building,
            destination,
        } => {
            let verdict = if !world.in_build_phase() {
                Err(skyshield_core::MoveError::CombatInProgress)
            } else {
                world.grid.relocate(building, destination)
            };
            match verdict {
                Ok((from, to)) => {
                    out_events.push(Event::BuildingMoved { building, from, to });
                }
                Err(reason) => out_events.push(Event::MoveRejected { building, reason }),
            }
        }
        Command::DemolishBuilding { building } => {
            // Silent no-op outside the build phase and for unknown ids.
            if !world.in_build_phase() {
                return;
            }
            let casualties = world.grid.destroy(building, DestructionCause::Demolished);
            if casualties.is_empty() {
                return;
            }
            for casualty in &casualties {
                let refund = if casualty.building.id == building {
                    casualty.building.template.cost / DEMOLISH_REFUND_DIVISOR
                } else {
                    0
                };
                world.credits += refund;
                out_events.push(Event::BuildingDestroyed {
                    building: casualty.building.id,
                    kind: casualty.building.template.kind,
                    cause: casualty.cause,
                    refund,
                });
            }
            world.economy.recompute(&world.grid);
            world.push_log(format!("Demolished ({} lost)", casualties.len()));
        }
        Command::UnlockColumn { side } => {
            let verdict = if !world.in_build_phase() {
                Err(skyshield_core::UnlockError::CombatInProgress)
            } else {
                world.grid.unlock(side)
            };
            match verdict {
                Ok(window) => {
                    out_events.push(Event::ColumnUnlocked {
                        side,
                        start: window.start,
                        end: window.end,
                    });
                    world.push_log(String::from("Column unlocked"));
                }
                Err(reason) => out_events.push(Event::UnlockRejected { side, reason }),
            }
        }
        Command::SelectCell { cell } => {
            world.selected_cell = CellCoord::new(
                cell.column().min(GRID_MAX_COLUMNS - 1),
                cell.row().min(GRID_ROWS - 1),
            );
        }
        Command::StartWave => {
            let verdict = if world.combat.wave_in_progress() || world.phase == Phase::Combat {
                Err(WaveStartError::CombatInProgress)
            } else if world.economy.surplus() < 0 {
                Err(WaveStartError::EnergyDeficit)
            } else {
                Ok(())
            };
            match verdict {
                Ok(()) => {
                    world.wave_number += 1;
                    world.combat.start_wave(world.wave_number);
                    world.phase = Phase::Combat;
                    out_events.push(Event::WaveStarted {
                        wave: world.wave_number,
                    });
                    out_events.push(Event::PhaseChanged {
                        phase: Phase::Combat,
                    });
                    world.push_log(format!("Wave {} incoming", world.wave_number));
                }
                Err(reason) => out_events.push(Event::WaveStartRejected { reason }),
            }
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            let dt = dt.as_secs_f32();

            let mut combat_log: Vec<String> = Vec::new();
            let completed = {
                let mut ctx = Ctx {
                    grid: &mut world.grid,
                    economy: &mut world.economy,
                    rng: &mut world.rng,
                    events: out_events,
                    credits: &mut world.credits,
                    log: &mut combat_log,
                };
                world.combat.advance(&mut ctx, dt)
            };
            for line in combat_log {
                world.push_log(line);
            }

            if let Some((wave, rewards)) = completed {
                world.credits += rewards.total;
                world.last_rewards = Some(rewards);
                world.phase = Phase::Build;
                out_events.push(Event::WaveCompleted { wave, rewards });
                out_events.push(Event::PhaseChanged { phase: Phase::Build });
                world.push_log(format!(
                    "Wave {wave} cleared (+{} credits)",
                    rewards.total
                ));
            }

            if world.economy.surplus() >= 0 {
                world.drain_accumulator = 0.0;
                if world.economy.tick_regen(dt) {
                    out_events.push(Event::ShieldRestored);
                    world.push_log(String::from("Shield restored"));
                }
            } else {
                // Overdrawn cities bleed one credit per second.
                world.drain_accumulator += dt;
                while world.drain_accumulator >= 1.0 {
                    world.drain_accumulator -= 1.0;
                    world.credits = world.credits.saturating_sub(1);
                }
            }
        }
        Command::AddLog { message } => {
            world.push_log(message);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{template, Phase, PlacementError, World};
    use skyshield_core::{
        BuildingId, BuildingKind, CellCoord, CellRect, DroneId, EnemyId, Side, Team, UnitId,
        WaveRewards,
    };

    /// Player credit balance.
    #[must_use]
    pub fn credits(world: &World) -> u32 {
        world.credits
    }

    /// Number of the most recently started wave, zero before the first.
    #[must_use]
    pub fn wave_number(world: &World) -> u32 {
        world.wave_number
    }

    /// Active gameplay phase.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Current position of the build cursor.
    #[must_use]
    pub fn selected_cell(world: &World) -> CellCoord {
        world.selected_cell
    }

    /// Reward breakdown from the most recently completed wave, if any.
    #[must_use]
    pub fn last_wave_rewards(world: &World) -> Option<WaveRewards> {
        world.last_rewards
    }

    /// Rolling event log, oldest line first.
    pub fn log_lines(world: &World) -> impl Iterator<Item = &str> {
        world.log.iter().map(String::as_str)
    }

    /// Aggregate energy figures.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct EnergyReport {
        /// Total production of live buildings.
        pub production: u32,
        /// Total consumption of live buildings.
        pub consumption: u32,
        /// Production minus consumption.
        pub surplus: i64,
    }

    /// Snapshot of the energy economy.
    #[must_use]
    pub fn energy_report(world: &World) -> EnergyReport {
        EnergyReport {
            production: world.economy.production,
            consumption: world.economy.consumption,
            surplus: world.economy.surplus(),
        }
    }

    /// Snapshot of the city shield.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ShieldStatus {
        /// Current charge in hit points.
        pub current: f32,
        /// Maximum charge in hit points.
        pub max: f32,
        /// Recharge rate in hit points per second.
        pub recharge: f32,
        /// Whether the shield currently intercepts enemies.
        pub active: bool,
    }

    /// Current shield figures.
    #[must_use]
    pub fn shield_status(world: &World) -> ShieldStatus {
        let shield = world.economy.shield;
        ShieldStatus {
            current: shield.current,
            max: shield.max,
            recharge: shield.regen,
            active: shield.active,
        }
    }

    /// Immutable copy of one placed building.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct BuildingSnapshot {
        /// Identifier of the building.
        pub id: BuildingId,
        /// Kind of the building.
        pub kind: BuildingKind,
        /// Current level.
        pub level: u8,
        /// Remaining hit points.
        pub hp: f32,
        /// Maximum hit points at the current level.
        pub max_hp: f32,
        /// Cells the building occupies.
        pub region: CellRect,
    }

    /// Owned snapshot of every placed building.
    #[derive(Clone, Debug)]
    pub struct BuildingView {
        snapshots: Vec<BuildingSnapshot>,
    }

    impl BuildingView {
        /// Iterates the captured snapshots.
        pub fn iter(&self) -> impl Iterator<Item = &BuildingSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<BuildingSnapshot> {
            self.snapshots
        }

        /// Number of captured buildings.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Whether the city holds no buildings.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }
    }

    /// Captures a snapshot of every placed building.
    #[must_use]
    pub fn building_view(world: &World) -> BuildingView {
        BuildingView {
            snapshots: world
                .grid
                .iter()
                .map(|building| BuildingSnapshot {
                    id: building.id,
                    kind: building.template.kind,
                    level: building.template.level,
                    hp: building.hp,
                    max_hp: building.template.max_hp,
                    region: building.region(),
                })
                .collect(),
        }
    }

    /// Number of buildings currently standing.
    #[must_use]
    pub fn building_count(world: &World) -> usize {
        world.grid.len()
    }

    /// Identifier of the building occupying the provided cell, if any.
    #[must_use]
    pub fn building_at(world: &World, cell: CellCoord) -> Option<BuildingId> {
        world.grid.building_at(cell).map(|building| building.id)
    }

    /// Validates a hypothetical placement without committing it, applying
    /// the same phase, grid, and credit checks the command path uses.
    pub fn placement_probe(
        world: &World,
        kind: BuildingKind,
        origin: CellCoord,
    ) -> Result<(), PlacementError> {
        if world.phase != Phase::Build {
            return Err(PlacementError::CombatInProgress);
        }
        world.grid.can_place(kind, 1, origin)?;
        if world.credits < template(kind, 1).cost {
            return Err(PlacementError::InsufficientCredits);
        }
        Ok(())
    }

    /// Whether the unlocked column window can still grow toward a side.
    #[must_use]
    pub fn can_unlock(world: &World, side: Side) -> bool {
        world.grid.can_unlock(side)
    }

    /// Unlocked column range as `(start, end)`, end exclusive.
    #[must_use]
    pub fn column_window(world: &World) -> (u32, u32) {
        let window = world.grid.window();
        (window.start, window.end)
    }

    /// Whether a wave is currently running.
    #[must_use]
    pub fn wave_in_progress(world: &World) -> bool {
        world.combat.wave_in_progress()
    }

    /// Immutable copy of one aerial enemy.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct EnemySnapshot {
        /// Identifier of the enemy.
        pub id: EnemyId,
        /// World-space x position.
        pub x: f32,
        /// World-space y position.
        pub y: f32,
        /// Remaining hit points.
        pub hp: f32,
        /// Collision radius.
        pub radius: f32,
        /// Whether the enemy is a wave boss.
        pub boss: bool,
    }

    /// Immutable copy of one ground unit.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct UnitSnapshot {
        /// Identifier of the unit.
        pub id: UnitId,
        /// Side the unit fights for.
        pub team: Team,
        /// World-space x position on the ground line.
        pub x: f32,
        /// Remaining hit points.
        pub hp: f32,
    }

    /// Immutable copy of one drone.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct DroneSnapshot {
        /// Identifier of the drone.
        pub id: DroneId,
        /// World-space x position.
        pub x: f32,
        /// World-space y position.
        pub y: f32,
    }

    /// Immutable copy of one in-flight projectile.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ProjectileSnapshot {
        /// World-space x position.
        pub x: f32,
        /// World-space y position.
        pub y: f32,
    }

    /// Owned snapshot of every transient combat entity.
    #[derive(Clone, Debug, Default)]
    pub struct CombatView {
        /// Live aerial enemies.
        pub enemies: Vec<EnemySnapshot>,
        /// Live ground units of both teams.
        pub units: Vec<UnitSnapshot>,
        /// Live drones.
        pub drones: Vec<DroneSnapshot>,
        /// In-flight projectiles.
        pub projectiles: Vec<ProjectileSnapshot>,
    }

    /// Captures a snapshot of the combat entities for rendering.
    #[must_use]
    pub fn combat_view(world: &World) -> CombatView {
        CombatView {
            enemies: world
                .combat
                .enemies
                .iter()
                .map(|enemy| EnemySnapshot {
                    id: enemy.id,
                    x: enemy.x,
                    y: enemy.y,
                    hp: enemy.hp,
                    radius: enemy.radius,
                    boss: enemy.boss,
                })
                .collect(),
            units: world
                .combat
                .units
                .iter()
                .map(|unit| UnitSnapshot {
                    id: unit.id,
                    team: unit.team,
                    x: unit.x,
                    hp: unit.hp,
                })
                .collect(),
            drones: world
                .combat
                .drones
                .iter()
                .map(|drone| DroneSnapshot {
                    id: drone.id,
                    x: drone.x,
                    y: drone.y,
                })
                .collect(),
            projectiles: world
                .combat
                .projectiles
                .iter()
                .map(|projectile| ProjectileSnapshot {
                    x: projectile.x,
                    y: projectile.y,
                })
                .collect(),
        }
    }
}
