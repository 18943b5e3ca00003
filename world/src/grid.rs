//! Authoritative city grid: placement legality, support rules, and cascades.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};
use skyshield_core::{
    template, BuildingId, BuildingKind, BuildingTemplate, CellCoord, CellRect, DestructionCause,
    MoveError, PlacementError, Side, UnlockError, UpgradeError, GRID_MAX_COLUMNS, GRID_ROWS,
};

/// A placed building. The template is an immutable value swapped wholesale on
/// upgrade; the two timers always exist and start at zero.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct Building {
    pub(crate) id: BuildingId,
    pub(crate) template: BuildingTemplate,
    pub(crate) hp: f32,
    pub(crate) column: u32,
    pub(crate) row: u32,
    pub(crate) spawn_timer: f32,
    pub(crate) cooldown: f32,
}

impl Building {
    pub(crate) fn region(&self) -> CellRect {
        CellRect::from_origin_and_size(
            CellCoord::new(self.column, self.row),
            self.template.footprint,
        )
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.hp > 0.0
    }
}

/// Contiguous range of unlocked columns, `[start, end)`. Only ever grows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ColumnWindow {
    pub(crate) start: u32,
    pub(crate) end: u32,
}

impl ColumnWindow {
    pub(crate) fn contains(&self, column: u32) -> bool {
        column >= self.start && column < self.end
    }
}

/// A building removed by [`CityGrid::destroy`], paired with why it fell.
#[derive(Clone, Debug)]
pub(crate) struct Casualty {
    pub(crate) building: Building,
    pub(crate) cause: DestructionCause,
}

/// Registry of placed buildings plus the rules that keep the city standing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct CityGrid {
    max_columns: u32,
    rows: u32,
    window: ColumnWindow,
    buildings: BTreeMap<BuildingId, Building>,
    next_id: u32,
}

impl CityGrid {
    pub(crate) fn new(window: ColumnWindow) -> Self {
        Self {
            max_columns: GRID_MAX_COLUMNS,
            rows: GRID_ROWS,
            window,
            buildings: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub(crate) fn window(&self) -> ColumnWindow {
        self.window
    }

    pub(crate) fn get(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: BuildingId) -> Option<&mut Building> {
        self.buildings.get_mut(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Building> {
        self.buildings.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Building> {
        self.buildings.values_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.buildings.len()
    }

    /// Building occupying the provided cell, if any.
    pub(crate) fn building_at(&self, cell: CellCoord) -> Option<&Building> {
        self.buildings
            .values()
            .find(|building| building.region().contains(cell))
    }

    fn occupant(&self, cell: CellCoord) -> Option<BuildingId> {
        self.building_at(cell).map(|building| building.id)
    }

    /// Validates a placement of `kind` at `level` anchored at `origin`.
    ///
    /// `exclude` hides one building from every occupancy and support check,
    /// which is how upgrade and move transactions probe their hypothetical
    /// layouts without removing the building first.
    pub(crate) fn can_place_excluding(
        &self,
        kind: BuildingKind,
        level: u8,
        origin: CellCoord,
        exclude: Option<BuildingId>,
    ) -> Result<(), PlacementError> {
        let stats = template(kind, level);
        let width = stats.footprint.width();
        let region = CellRect::from_origin_and_size(origin, stats.footprint);

        for column in region.left_column()..region.right_column() {
            if !self.window.contains(column) {
                return Err(PlacementError::ColumnLocked);
            }
        }

        if region.right_column() > self.max_columns || region.top_row() > self.rows {
            return Err(PlacementError::OutOfBounds);
        }

        if origin.row() > 0 {
            for column in region.left_column()..region.right_column() {
                let below = CellCoord::new(column, origin.row() - 1);
                if self.occupant_excluding(below, exclude).is_none() {
                    return Err(PlacementError::NoFoundation);
                }
            }
        }

        for cell in region.cells() {
            if self.occupant_excluding(cell, exclude).is_some() {
                return Err(PlacementError::Occupied);
            }
        }

        // Kind rules. Stacking restrictions look at the cells directly beneath
        // the footprint; the datacenter clearance rule looks sideways.
        if origin.row() > 0 {
            for column in region.left_column()..region.right_column() {
                let below = CellCoord::new(column, origin.row() - 1);
                let support = self
                    .occupant_excluding(below, exclude)
                    .and_then(|id| self.buildings.get(&id));
                let Some(support) = support else { continue };

                match kind {
                    BuildingKind::PowerPlant if support.template.kind != BuildingKind::PowerPlant => {
                        return Err(PlacementError::PowerPlantFoundation);
                    }
                    BuildingKind::Barracks if support.template.kind != BuildingKind::Barracks => {
                        return Err(PlacementError::BarracksFoundation);
                    }
                    _ => {}
                }

                if support.template.kind == BuildingKind::Barracks
                    && !matches!(kind, BuildingKind::Turret | BuildingKind::Barracks)
                {
                    return Err(PlacementError::DefenceOnlyAboveBarracks);
                }
            }
        }

        if kind == BuildingKind::Datacenter {
            let left_clear = origin.column() > 0
                && self.column_vacant_excluding(origin.column() - 1, exclude);
            let right_clear = origin.column() + width < self.max_columns
                && self.column_vacant_excluding(origin.column() + width, exclude);
            if !(left_clear || right_clear) {
                return Err(PlacementError::DatacenterNeedsClearance);
            }
        }

        Ok(())
    }

    /// Placement probe used by the public surface: no exclusions.
    pub(crate) fn can_place(
        &self,
        kind: BuildingKind,
        level: u8,
        origin: CellCoord,
    ) -> Result<(), PlacementError> {
        self.can_place_excluding(kind, level, origin, None)
    }

    fn occupant_excluding(&self, cell: CellCoord, exclude: Option<BuildingId>) -> Option<BuildingId> {
        self.occupant(cell)
            .filter(|id| Some(*id) != exclude)
    }

    fn column_vacant_excluding(&self, column: u32, exclude: Option<BuildingId>) -> bool {
        !self.buildings.values().any(|building| {
            Some(building.id) != exclude
                && building.region().left_column() <= column
                && column < building.region().right_column()
        })
    }

    /// Places a fresh level 1 building, allocating its identifier.
    pub(crate) fn place(
        &mut self,
        kind: BuildingKind,
        origin: CellCoord,
    ) -> Result<&Building, PlacementError> {
        self.can_place(kind, 1, origin)?;

        let stats = template(kind, 1);
        let id = BuildingId::new(self.next_id);
        self.next_id += 1;
        let building = Building {
            id,
            hp: stats.max_hp,
            template: stats,
            column: origin.column(),
            row: origin.row(),
            spawn_timer: 0.0,
            cooldown: 0.0,
        };
        let _ = self.buildings.insert(id, building);
        Ok(&self.buildings[&id])
    }

    /// Advances a building one level, relocating it leftward when the grown
    /// footprint no longer fits in place.
    ///
    /// On failure the building is left exactly as it was: same level, same
    /// position, same hit points.
    pub(crate) fn upgrade(&mut self, id: BuildingId) -> Result<&Building, UpgradeError> {
        let building = self.buildings.get(&id).ok_or(UpgradeError::NotFound)?;
        if building.template.upgrade_cost == 0 {
            return Err(UpgradeError::NotUpgradable);
        }
        if !building.template.can_upgrade() {
            return Err(UpgradeError::MaxLevel);
        }

        let kind = building.template.kind;
        let next_level = building.template.level + 1;
        let next = template(kind, next_level);
        let old_footprint = building.template.footprint;
        let origin = CellCoord::new(building.column, building.row);

        if next.footprint != old_footprint {
            let in_place = self.can_place_excluding(kind, next_level, origin, Some(id));
            match in_place {
                Ok(()) => {}
                Err(first_reason) => {
                    let width_delta = next.footprint.width().saturating_sub(old_footprint.width());
                    let shifted = (width_delta > 0 && origin.column() >= width_delta)
                        .then(|| CellCoord::new(origin.column() - width_delta, origin.row()));
                    let fallback = shifted.and_then(|origin| {
                        self.can_place_excluding(kind, next_level, origin, Some(id))
                            .ok()
                            .map(|()| origin)
                    });
                    match fallback {
                        Some(origin) => {
                            let entry = self
                                .buildings
                                .get_mut(&id)
                                .ok_or(UpgradeError::NotFound)?;
                            entry.column = origin.column();
                        }
                        // Both positions blocked: report why the first failed.
                        None => return Err(UpgradeError::Blocked(first_reason)),
                    }
                }
            }
        }

        let entry = self.buildings.get_mut(&id).ok_or(UpgradeError::NotFound)?;
        entry.template = next;
        entry.hp = next.max_hp;
        Ok(&self.buildings[&id])
    }

    /// Relocates a building at its current level.
    pub(crate) fn relocate(
        &mut self,
        id: BuildingId,
        destination: CellCoord,
    ) -> Result<(CellRect, CellRect), MoveError> {
        let building = self.buildings.get(&id).ok_or(MoveError::NotFound)?;
        let from = building.region();

        if destination == CellCoord::new(building.column, building.row) {
            return Ok((from, from));
        }

        // A building supports another when that other rests on its roof row
        // and their column ranges overlap.
        let supports_someone = self.buildings.values().any(|other| {
            other.id != id && other.row == from.top_row() && other.region().columns_overlap(&from)
        });
        if supports_someone {
            return Err(MoveError::SupportsOthers);
        }

        let kind = building.template.kind;
        let level = building.template.level;
        self.can_place_excluding(kind, level, destination, Some(id))
            .map_err(MoveError::Blocked)?;

        let entry = self.buildings.get_mut(&id).ok_or(MoveError::NotFound)?;
        entry.column = destination.column();
        entry.row = destination.row();
        Ok((from, entry.region()))
    }

    /// Removes a building and resolves the full destruction cascade.
    ///
    /// Implemented as an explicit work-list: each drained entry strictly
    /// shrinks the building set, which is the whole termination argument.
    /// Unknown identifiers are silent no-ops.
    pub(crate) fn destroy(&mut self, id: BuildingId, cause: DestructionCause) -> Vec<Casualty> {
        let mut casualties = Vec::new();
        if !self.buildings.contains_key(&id) {
            return casualties;
        }

        let mut queue: VecDeque<(BuildingId, DestructionCause)> = VecDeque::new();
        let mut pending: BTreeSet<BuildingId> = BTreeSet::new();
        queue.push_back((id, cause));
        let _ = pending.insert(id);

        while let Some((next, cause)) = queue.pop_front() {
            let Some(removed) = self.buildings.remove(&next) else {
                continue;
            };
            let _ = pending.remove(&next);
            let region = removed.region();
            let cascade_damage = removed.template.max_hp * 0.25;

            // Structural collapse: anything left without full foundation goes
            // down with no damage roll. Buildings still queued for removal
            // keep providing support until they are actually drained, which
            // reproduces the one-at-a-time recursion order.
            let unsupported: Vec<BuildingId> = self
                .buildings
                .values()
                .filter(|other| other.row > 0 && !self.fully_supported(other))
                .map(|other| other.id)
                .collect();
            for other in unsupported {
                if pending.insert(other) {
                    queue.push_back((other, DestructionCause::Collapse));
                }
            }

            // Falling debris: one building per vacated footprint column takes
            // a quarter of the destroyed building's max hp.
            if removed.row > 0 {
                for column in region.left_column()..region.right_column() {
                    let below = CellCoord::new(column, removed.row - 1);
                    let Some(target) = self.occupant(below) else {
                        continue;
                    };
                    if let Some(entry) = self.buildings.get_mut(&target) {
                        entry.hp -= cascade_damage;
                        if entry.hp <= 0.0 && pending.insert(target) {
                            queue.push_back((target, DestructionCause::Debris));
                        }
                    }
                }
            }

            casualties.push(Casualty {
                building: removed,
                cause,
            });
        }

        casualties
    }

    fn fully_supported(&self, building: &Building) -> bool {
        let region = building.region();
        (region.left_column()..region.right_column()).all(|column| {
            let below = CellCoord::new(column, building.row - 1);
            self.buildings
                .values()
                .any(|other| other.id != building.id && other.region().contains(below))
        })
    }

    pub(crate) fn can_unlock(&self, side: Side) -> bool {
        match side {
            Side::Left => self.window.start > 0,
            Side::Right => self.window.end < self.max_columns,
        }
    }

    /// Grows the unlocked window by one column toward the requested edge.
    pub(crate) fn unlock(&mut self, side: Side) -> Result<ColumnWindow, UnlockError> {
        if !self.can_unlock(side) {
            return Err(UnlockError::AtGridEdge);
        }
        match side {
            Side::Left => self.window.start -= 1,
            Side::Right => self.window.end += 1,
        }
        Ok(self.window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> CityGrid {
        CityGrid::new(ColumnWindow { start: 0, end: 8 })
    }

    fn place(grid: &mut CityGrid, kind: BuildingKind, column: u32, row: u32) -> BuildingId {
        grid.place(kind, CellCoord::new(column, row))
            .expect("placement should succeed")
            .id
    }

    #[test]
    fn ground_row_needs_no_foundation() {
        let grid = grid();
        assert_eq!(grid.can_place(BuildingKind::Turret, 1, CellCoord::new(0, 0)), Ok(()));
    }

    #[test]
    fn elevated_cell_requires_support_below() {
        let mut grid = grid();
        assert_eq!(
            grid.can_place(BuildingKind::Turret, 1, CellCoord::new(0, 1)),
            Err(PlacementError::NoFoundation)
        );
        let _ = place(&mut grid, BuildingKind::Capacitor, 0, 0);
        assert_eq!(grid.can_place(BuildingKind::Turret, 1, CellCoord::new(0, 1)), Ok(()));
    }

    #[test]
    fn locked_columns_reject_placement() {
        let grid = CityGrid::new(ColumnWindow { start: 4, end: 12 });
        assert_eq!(
            grid.can_place(BuildingKind::Turret, 1, CellCoord::new(3, 0)),
            Err(PlacementError::ColumnLocked)
        );
        assert_eq!(grid.can_place(BuildingKind::Turret, 1, CellCoord::new(4, 0)), Ok(()));
    }

    #[test]
    fn occupancy_is_a_partition() {
        let mut grid = grid();
        let _ = place(&mut grid, BuildingKind::PowerPlant, 2, 0);
        assert_eq!(
            grid.can_place(BuildingKind::Turret, 1, CellCoord::new(2, 0)),
            Err(PlacementError::Occupied)
        );

        let mut seen = std::collections::BTreeSet::new();
        let _ = place(&mut grid, BuildingKind::Capacitor, 3, 0);
        for building in grid.iter() {
            for cell in building.region().cells() {
                assert!(seen.insert(cell), "cell {cell:?} occupied twice");
            }
        }
    }

    #[test]
    fn power_plants_stack_only_on_power_plants() {
        let mut grid = grid();
        let _ = place(&mut grid, BuildingKind::Capacitor, 0, 0);
        assert_eq!(
            grid.can_place(BuildingKind::PowerPlant, 1, CellCoord::new(0, 1)),
            Err(PlacementError::PowerPlantFoundation)
        );

        let _ = place(&mut grid, BuildingKind::PowerPlant, 1, 0);
        assert_eq!(grid.can_place(BuildingKind::PowerPlant, 1, CellCoord::new(1, 1)), Ok(()));
    }

    #[test]
    fn barracks_roof_accepts_only_defences() {
        let mut grid = grid();
        let _ = place(&mut grid, BuildingKind::Barracks, 0, 0);
        assert_eq!(
            grid.can_place(BuildingKind::Capacitor, 1, CellCoord::new(0, 1)),
            Err(PlacementError::DefenceOnlyAboveBarracks)
        );
        assert_eq!(grid.can_place(BuildingKind::Turret, 1, CellCoord::new(0, 1)), Ok(()));
        assert_eq!(grid.can_place(BuildingKind::Barracks, 1, CellCoord::new(0, 1)), Ok(()));
    }

    #[test]
    fn datacenter_demands_a_vacant_neighbour_column() {
        let mut grid = CityGrid::new(ColumnWindow { start: 0, end: 16 });
        // Column 1 is vacant, so a datacenter against the left edge is fine.
        assert_eq!(grid.can_place(BuildingKind::Datacenter, 1, CellCoord::new(0, 0)), Ok(()));

        // Boxed in between two occupied columns: no clearance on either side.
        let _ = place(&mut grid, BuildingKind::Turret, 0, 0);
        let _ = place(&mut grid, BuildingKind::Turret, 2, 0);
        assert_eq!(
            grid.can_place(BuildingKind::Datacenter, 1, CellCoord::new(1, 0)),
            Err(PlacementError::DatacenterNeedsClearance)
        );

        // Against the edge with the only neighbour occupied.
        let mut edge = CityGrid::new(ColumnWindow { start: 0, end: 16 });
        let _ = place(&mut edge, BuildingKind::Turret, 1, 0);
        assert_eq!(
            edge.can_place(BuildingKind::Datacenter, 1, CellCoord::new(0, 0)),
            Err(PlacementError::DatacenterNeedsClearance)
        );
    }

    #[test]
    fn upgrade_swaps_template_and_heals() {
        let mut grid = grid();
        let id = place(&mut grid, BuildingKind::Capacitor, 0, 0);
        grid.get_mut(id).expect("placed").hp = 10.0;

        let upgraded = grid.upgrade(id).expect("upgrade should succeed");
        assert_eq!(upgraded.template.level, 2);
        assert_eq!(upgraded.hp, upgraded.template.max_hp);
    }

    #[test]
    fn upgrade_grown_footprint_falls_back_leftward() {
        let mut grid = grid();
        // Level 3 power plant at column 3; upgrading to level 4 grows the
        // footprint to 2x2. Column 4 is blocked, column 2 is free.
        let id = place(&mut grid, BuildingKind::PowerPlant, 3, 0);
        for _ in 0..2 {
            let _ = grid.upgrade(id).expect("tier 1 upgrades stay in place");
        }
        let blocker = place(&mut grid, BuildingKind::Turret, 4, 0);
        let _ = blocker;

        let upgraded = grid.upgrade(id).expect("fallback should relocate left");
        assert_eq!(upgraded.template.level, 4);
        assert_eq!(upgraded.column, 2, "shifted left by the width delta");
    }

    #[test]
    fn upgrade_blocked_both_sides_leaves_building_untouched() {
        let mut grid = grid();
        let id = place(&mut grid, BuildingKind::PowerPlant, 3, 0);
        for _ in 0..2 {
            let _ = grid.upgrade(id).expect("tier 1 upgrades stay in place");
        }
        let _ = place(&mut grid, BuildingKind::Turret, 4, 0);
        let _ = place(&mut grid, BuildingKind::Turret, 2, 0);
        grid.get_mut(id).expect("placed").hp = 123.0;

        let result = grid.upgrade(id);
        assert_eq!(result.err(), Some(UpgradeError::Blocked(PlacementError::Occupied)));

        let building = grid.get(id).expect("still present");
        assert_eq!(building.template.level, 3);
        assert_eq!(building.column, 3);
        assert_eq!(building.hp, 123.0);
    }

    #[test]
    fn drone_factory_rejects_upgrade_outright() {
        let mut grid = grid();
        let id = place(&mut grid, BuildingKind::DroneFactory, 0, 0);
        assert_eq!(grid.upgrade(id).err(), Some(UpgradeError::NotUpgradable));
    }

    #[test]
    fn move_to_current_position_is_a_trivial_success() {
        let mut grid = grid();
        let id = place(&mut grid, BuildingKind::Turret, 2, 0);
        let before = grid.get(id).expect("placed").clone();

        let (from, to) = grid.relocate(id, CellCoord::new(2, 0)).expect("no-op move");
        assert_eq!(from, to);
        let after = grid.get(id).expect("still present");
        assert_eq!(after.column, before.column);
        assert_eq!(after.row, before.row);
    }

    #[test]
    fn move_rejected_while_supporting_another_building() {
        let mut grid = grid();
        let base = place(&mut grid, BuildingKind::Capacitor, 0, 0);
        let _ = place(&mut grid, BuildingKind::Turret, 0, 1);
        assert_eq!(
            grid.relocate(base, CellCoord::new(5, 0)).err(),
            Some(MoveError::SupportsOthers)
        );
    }

    #[test]
    fn move_commits_or_restores_atomically() {
        let mut grid = grid();
        let id = place(&mut grid, BuildingKind::Turret, 0, 0);
        let _ = place(&mut grid, BuildingKind::Turret, 5, 0);

        assert_eq!(
            grid.relocate(id, CellCoord::new(5, 0)).err(),
            Some(MoveError::Blocked(PlacementError::Occupied))
        );
        assert_eq!(grid.get(id).expect("restored").column, 0);

        let (_, to) = grid.relocate(id, CellCoord::new(3, 0)).expect("open cell");
        assert_eq!(to.left_column(), 3);
    }

    #[test]
    fn destroying_support_collapses_the_tower_above() {
        let mut grid = grid();
        let base = place(&mut grid, BuildingKind::Capacitor, 0, 0);
        let _ = place(&mut grid, BuildingKind::Turret, 0, 1);

        let casualties = grid.destroy(base, DestructionCause::Destroyed);
        assert_eq!(casualties.len(), 2);
        assert_eq!(casualties[1].cause, DestructionCause::Collapse);
        assert_eq!(grid.len(), 0, "nothing may survive the cascade");
    }

    #[test]
    fn cascade_terminates_and_strictly_shrinks() {
        let mut grid = grid();
        let base = place(&mut grid, BuildingKind::Capacitor, 0, 0);
        let mut row = 1;
        while grid.can_place(BuildingKind::Capacitor, 1, CellCoord::new(0, row)).is_ok() {
            let _ = place(&mut grid, BuildingKind::Capacitor, 0, row);
            row += 1;
        }
        let before = grid.len();
        let casualties = grid.destroy(base, DestructionCause::Destroyed);
        assert!(!casualties.is_empty());
        assert_eq!(grid.len(), before - casualties.len());
        assert_eq!(grid.len(), 0);
    }

    #[test]
    fn debris_damages_the_building_below() {
        let mut grid = grid();
        let base = place(&mut grid, BuildingKind::PowerPlant, 0, 0);
        let upper = place(&mut grid, BuildingKind::PowerPlant, 0, 1);

        let base_hp = grid.get(base).expect("base").hp;
        let upper_max = grid.get(upper).expect("upper").template.max_hp;
        let casualties = grid.destroy(upper, DestructionCause::Destroyed);
        assert_eq!(casualties.len(), 1);
        let base_after = grid.get(base).expect("base survives");
        assert_eq!(base_after.hp, base_hp - upper_max * 0.25);
    }

    #[test]
    fn debris_can_finish_a_weakened_building() {
        let mut grid = grid();
        let base = place(&mut grid, BuildingKind::PowerPlant, 0, 0);
        let upper = place(&mut grid, BuildingKind::PowerPlant, 0, 1);
        grid.get_mut(base).expect("base").hp = 1.0;

        let casualties = grid.destroy(upper, DestructionCause::Destroyed);
        assert_eq!(casualties.len(), 2);
        assert!(casualties
            .iter()
            .any(|casualty| casualty.cause == DestructionCause::Debris));
        assert_eq!(grid.len(), 0);
    }

    #[test]
    fn destroying_unknown_id_is_a_silent_no_op() {
        let mut grid = grid();
        let casualties = grid.destroy(BuildingId::new(99), DestructionCause::Destroyed);
        assert!(casualties.is_empty());
    }

    #[test]
    fn window_growth_is_monotonic_and_bounded() {
        let mut grid = CityGrid::new(ColumnWindow { start: 1, end: 15 });
        assert!(grid.can_unlock(Side::Left));
        let window = grid.unlock(Side::Left).expect("room on the left");
        assert_eq!(window.start, 0);
        assert_eq!(grid.unlock(Side::Left).err(), Some(UnlockError::AtGridEdge));

        let window = grid.unlock(Side::Right).expect("room on the right");
        assert_eq!(window.end, 16);
        assert_eq!(grid.unlock(Side::Right).err(), Some(UnlockError::AtGridEdge));
    }
}
