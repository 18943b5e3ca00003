#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave scheduling.
//!
//! Everything a wave needs to know up front — how many enemies it fields,
//! how tough they are, and whether its final slot is a boss — is a pure
//! function of the wave number, so the world can recompute the schedule at
//! any point without storing it.

use std::time::Duration;

/// Seconds between consecutive spawns.
pub const SPAWN_INTERVAL: Duration = Duration::from_millis(1500);

/// Grace period with zero live entities before a wave is declared clear.
pub const CLEAR_GRACE: Duration = Duration::from_secs(2);

/// Every this-many waves the final spawn slot carries a boss.
pub const BOSS_WAVE_PERIOD: u32 = 10;

const BOSS_BASE_HP: f32 = 2000.0;
const BOSS_DAMAGE: f32 = 1000.0;
const BOSS_RADIUS: f32 = 60.0;
const BOSS_DESCENT_SPEED: f32 = 18.0;
const BOSS_BLAST_RADIUS: f32 = 200.0;

const ENEMY_BASE_HP: f32 = 50.0;
const ENEMY_HP_PER_WAVE: f32 = 10.0;
const ENEMY_DAMAGE: f32 = 20.0;
const ENEMY_RADIUS: f32 = 15.0;
const ENEMY_DESCENT_SPEED: f32 = 50.0;
const ENEMY_BLAST_RADIUS: f32 = 50.0;

/// Distinguishes the two archetypes a spawn slot may produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpawnKind {
    /// Regular descending enemy.
    Regular,
    /// Slow, massive wave boss with an oversized blast.
    Boss,
}

/// Stat block describing one spawned enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyArchetype {
    /// Hit points on spawn.
    pub hp: f32,
    /// Damage dealt to each building caught in the detonation.
    pub damage: f32,
    /// Collision radius in world units.
    pub radius: f32,
    /// Downward speed in world units per second.
    pub descent_speed: f32,
    /// Radius of the detonation in world units.
    pub blast_radius: f32,
    /// Whether this archetype is a wave boss.
    pub boss: bool,
}

/// Immutable schedule for a single wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WavePlan {
    wave_number: u32,
}

impl WavePlan {
    /// Builds the schedule for the provided one-based wave number.
    #[must_use]
    pub const fn for_wave(wave_number: u32) -> Self {
        Self { wave_number }
    }

    /// One-based wave number the plan describes.
    #[must_use]
    pub const fn wave_number(&self) -> u32 {
        self.wave_number
    }

    /// Total number of spawn slots, boss included.
    #[must_use]
    pub const fn spawn_count(&self) -> u32 {
        5 + self.wave_number * 2
    }

    /// Whether the final spawn slot of this wave carries a boss.
    #[must_use]
    pub const fn has_boss(&self) -> bool {
        self.wave_number > 0 && self.wave_number % BOSS_WAVE_PERIOD == 0
    }

    /// Archetype produced by the zero-based spawn slot.
    ///
    /// The boss, when present, always replaces the last scheduled slot.
    #[must_use]
    pub fn spawn_kind(&self, slot: u32) -> SpawnKind {
        if self.has_boss() && slot + 1 == self.spawn_count() {
            SpawnKind::Boss
        } else {
            SpawnKind::Regular
        }
    }

    /// Stats for an enemy spawned from the provided slot.
    #[must_use]
    pub fn archetype(&self, slot: u32) -> EnemyArchetype {
        match self.spawn_kind(slot) {
            SpawnKind::Regular => EnemyArchetype {
                hp: ENEMY_BASE_HP + self.wave_number as f32 * ENEMY_HP_PER_WAVE,
                damage: ENEMY_DAMAGE,
                radius: ENEMY_RADIUS,
                descent_speed: ENEMY_DESCENT_SPEED,
                blast_radius: ENEMY_BLAST_RADIUS,
                boss: false,
            },
            SpawnKind::Boss => EnemyArchetype {
                hp: BOSS_BASE_HP * self.wave_number.div_ceil(BOSS_WAVE_PERIOD) as f32,
                damage: BOSS_DAMAGE,
                radius: BOSS_RADIUS,
                descent_speed: BOSS_DESCENT_SPEED,
                blast_radius: BOSS_BLAST_RADIUS,
                boss: true,
            },
        }
    }
}

/// Base completion reward for the provided wave number.
#[must_use]
pub const fn base_reward(wave_number: u32) -> u32 {
    100 + wave_number * 25
}
