//! Energy bookkeeping and the city shield.
//!
//! Nothing here is incremental: every recompute walks the full building
//! registry, so the aggregate can never drift from the grid it describes.

use serde::{Deserialize, Serialize};

use crate::grid::CityGrid;

/// Shield capacity granted before any datacenter contributes.
const BASE_SHIELD_HP: f32 = 100.0;

/// Shield recharge granted before any capacitor contributes, hp per second.
const BASE_SHIELD_REGEN: f32 = 1.0;

/// Fraction of maximum charge at which a downed shield reboots.
const REBOOT_THRESHOLD: f32 = 0.25;

/// Current state of the city shield.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub(crate) struct Shield {
    pub(crate) max: f32,
    pub(crate) current: f32,
    pub(crate) regen: f32,
    pub(crate) active: bool,
}

impl Shield {
    /// Applies an enemy impact. Returns true when this hit dropped the shield.
    pub(crate) fn absorb(&mut self, damage: f32) -> bool {
        self.current -= damage;
        if self.current <= 0.0 {
            self.current = 0.0;
            let was_active = self.active;
            self.active = false;
            was_active
        } else {
            false
        }
    }
}

/// Aggregate energy and shield figures derived from the grid.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub(crate) struct Economy {
    pub(crate) production: u32,
    pub(crate) consumption: u32,
    pub(crate) shield: Shield,
}

impl Economy {
    pub(crate) fn new() -> Self {
        Self {
            production: 0,
            consumption: 0,
            shield: Shield {
                max: BASE_SHIELD_HP,
                current: 0.0,
                regen: BASE_SHIELD_REGEN,
                active: false,
            },
        }
    }

    /// Production minus consumption; negative when the city overdraws.
    pub(crate) fn surplus(&self) -> i64 {
        i64::from(self.production) - i64::from(self.consumption)
    }

    /// Rebuilds every aggregate from the live buildings on the grid.
    ///
    /// Shield charge is preserved across recomputes, clamped to the new
    /// maximum so a demolished datacenter cannot leave phantom charge.
    pub(crate) fn recompute(&mut self, grid: &CityGrid) {
        let mut production = 0;
        let mut consumption = 0;
        let mut shield_max = BASE_SHIELD_HP;
        let mut shield_regen = BASE_SHIELD_REGEN;

        for building in grid.iter().filter(|building| building.is_alive()) {
            production += building.template.energy_production;
            consumption += building.template.energy_consumption;
            shield_max += building.template.shield_hp_bonus;
            shield_regen += building.template.shield_recharge_bonus;
        }

        self.production = production;
        self.consumption = consumption;
        self.shield.max = shield_max;
        self.shield.regen = shield_regen;
        if self.shield.current > shield_max {
            self.shield.current = shield_max;
        }
    }

    /// Recharges the shield. Only called while the city holds a non-negative
    /// surplus. Returns true when a downed shield crossed the reboot
    /// threshold and came back online.
    pub(crate) fn tick_regen(&mut self, dt: f32) -> bool {
        self.shield.current = (self.shield.current + self.shield.regen * dt).min(self.shield.max);
        if !self.shield.active && self.shield.current >= self.shield.max * REBOOT_THRESHOLD {
            self.shield.active = true;
            return true;
        }
        false
    }
}
