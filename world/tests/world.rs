//! End-to-end checks of the command/event/query surface.

use std::collections::BTreeSet;
use std::time::Duration;

use skyshield_core::{
    BuildingId, BuildingKind, CellCoord, Command, Event, Phase, Side, UnlockError,
};
use skyshield_world::{apply, query, World};

fn place(world: &mut World, kind: BuildingKind, column: u32, row: u32) -> BuildingId {
    let mut events = Vec::new();
    apply(
        world,
        Command::PlaceBuilding {
            kind,
            origin: CellCoord::new(column, row),
        },
        &mut events,
    );
    match events.first() {
        Some(Event::BuildingPlaced { building, .. }) => *building,
        other => panic!("placement failed: {other:?}"),
    }
}

fn tick(world: &mut World, events: &mut Vec<Event>) {
    apply(
        world,
        Command::Tick {
            dt: Duration::from_millis(100),
        },
        events,
    );
}

#[test]
fn occupancy_stays_a_partition_across_edits() {
    let mut world = World::new();
    let _ = place(&mut world, BuildingKind::PowerPlant, 5, 0);
    let capacitor = place(&mut world, BuildingKind::Capacitor, 6, 0);
    let _ = place(&mut world, BuildingKind::Turret, 6, 1);
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::UpgradeBuilding {
            building: capacitor,
        },
        &mut events,
    );

    let mut seen = BTreeSet::new();
    for snapshot in query::building_view(&world).iter() {
        for cell in snapshot.region.cells() {
            assert!(seen.insert(cell), "cell {cell:?} claimed twice");
        }
    }
}

#[test]
fn foundation_invariant_holds_after_every_command() {
    let mut world = World::new();
    let _ = place(&mut world, BuildingKind::Capacitor, 5, 0);
    let _ = place(&mut world, BuildingKind::Turret, 5, 1);
    let _ = place(&mut world, BuildingKind::PowerPlant, 7, 0);
    let _ = place(&mut world, BuildingKind::Turret, 7, 1);

    let view = query::building_view(&world);
    for snapshot in view.iter() {
        if snapshot.region.bottom_row() == 0 {
            continue;
        }
        for column in snapshot.region.left_column()..snapshot.region.right_column() {
            let below = CellCoord::new(column, snapshot.region.bottom_row() - 1);
            assert!(
                query::building_at(&world, below).is_some(),
                "{:?} floats above {below:?}",
                snapshot.id
            );
        }
    }
}

#[test]
fn destroying_a_support_takes_the_whole_stack() {
    let mut world = World::new();
    let base = place(&mut world, BuildingKind::Capacitor, 5, 0);
    let _ = place(&mut world, BuildingKind::Turret, 5, 1);
    assert_eq!(query::building_count(&world), 2);

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::DemolishBuilding { building: base },
        &mut events,
    );

    let destroyed = events
        .iter()
        .filter(|event| matches!(event, Event::BuildingDestroyed { .. }))
        .count();
    assert_eq!(destroyed, 2);
    assert_eq!(query::building_count(&world), 0);
}

#[test]
fn economy_recomputes_immediately_on_demolition() {
    let mut world = World::new();
    let producer = place(&mut world, BuildingKind::PowerPlant, 5, 0);
    let _ = place(&mut world, BuildingKind::PowerPlant, 6, 0);
    let _ = place(&mut world, BuildingKind::Datacenter, 8, 0);
    assert_eq!(query::energy_report(&world).surplus, 26);

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::DemolishBuilding { building: producer },
        &mut events,
    );
    assert_eq!(query::energy_report(&world).surplus, 11);
}

#[test]
fn upgrade_relocates_left_when_blocked_on_the_right() {
    let mut world = World::new();
    let plant = place(&mut world, BuildingKind::PowerPlant, 7, 0);
    let mut events = Vec::new();
    for _ in 0..2 {
        apply(
            &mut world,
            Command::UpgradeBuilding { building: plant },
            &mut events,
        );
    }
    let _ = place(&mut world, BuildingKind::Turret, 8, 0);

    // Level 4 widens the plant to 2x2; column 8 is blocked, column 6 is free.
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::UpgradeBuilding { building: plant },
        &mut events,
    );
    match events.first() {
        Some(Event::BuildingUpgraded { level, region, .. }) => {
            assert_eq!(*level, 4);
            assert_eq!(region.left_column(), 6);
            assert_eq!(region.right_column(), 8);
        }
        other => panic!("expected upgrade, got {other:?}"),
    }
}

#[test]
fn moving_a_building_to_its_own_cell_changes_nothing() {
    let mut world = World::new();
    let turret = place(&mut world, BuildingKind::Turret, 5, 0);
    let before = query::credits(&world);

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::MoveBuilding {
            building: turret,
            destination: CellCoord::new(5, 0),
        },
        &mut events,
    );
    match events.first() {
        Some(Event::BuildingMoved { from, to, .. }) => assert_eq!(from, to),
        other => panic!("expected trivial move, got {other:?}"),
    }
    assert_eq!(query::credits(&world), before);
}

#[test]
fn window_only_grows_until_the_grid_edge() {
    let mut world = World::new();
    let mut events = Vec::new();
    for _ in 0..4 {
        assert!(query::can_unlock(&world, Side::Left));
        apply(
            &mut world,
            Command::UnlockColumn { side: Side::Left },
            &mut events,
        );
    }
    assert_eq!(query::column_window(&world).0, 0);
    assert!(!query::can_unlock(&world, Side::Left));

    events.clear();
    apply(
        &mut world,
        Command::UnlockColumn { side: Side::Left },
        &mut events,
    );
    assert!(matches!(
        events[0],
        Event::UnlockRejected {
            reason: UnlockError::AtGridEdge,
            ..
        }
    ));
}

#[test]
fn a_full_wave_runs_from_start_to_rewards() {
    let mut world = World::with_seed(42);
    let _ = place(&mut world, BuildingKind::PowerPlant, 5, 0);

    let mut events = Vec::new();
    apply(&mut world, Command::StartWave, &mut events);
    assert!(matches!(events[0], Event::WaveStarted { wave: 1 }));
    assert_eq!(query::phase(&world), Phase::Combat);
    assert!(query::wave_in_progress(&world));

    let mut events = Vec::new();
    for _ in 0..5_000 {
        tick(&mut world, &mut events);
        if query::phase(&world) == Phase::Build {
            break;
        }
    }

    assert_eq!(query::phase(&world), Phase::Build, "wave never completed");
    let rewards = query::last_wave_rewards(&world).expect("rewards recorded");
    assert_eq!(rewards.base, 125);
    assert_eq!(
        rewards.total,
        rewards.base + rewards.perfect_bonus + rewards.energy_bonus
    );
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::WaveCompleted { wave: 1, .. })));
    assert!(query::combat_view(&world).enemies.is_empty());
}

#[test]
fn snapshot_and_restore_resume_identically() {
    let mut world = World::with_seed(9);
    let _ = place(&mut world, BuildingKind::PowerPlant, 5, 0);
    let _ = place(&mut world, BuildingKind::Turret, 6, 0);

    let mut events = Vec::new();
    apply(&mut world, Command::StartWave, &mut events);
    for _ in 0..40 {
        tick(&mut world, &mut events);
    }

    let blob = bincode::serialize(&world).expect("serialize world");
    let mut restored: World = bincode::deserialize(&blob).expect("deserialize world");

    // Both copies replay the same commands and must stay in lockstep.
    let mut original_events = Vec::new();
    let mut restored_events = Vec::new();
    for _ in 0..100 {
        tick(&mut world, &mut original_events);
        tick(&mut restored, &mut restored_events);
    }

    assert_eq!(query::credits(&world), query::credits(&restored));
    assert_eq!(
        query::building_count(&world),
        query::building_count(&restored)
    );
    let original_view = query::combat_view(&world);
    let restored_view = query::combat_view(&restored);
    assert_eq!(original_view.enemies.len(), restored_view.enemies.len());
    assert_eq!(original_view.units.len(), restored_view.units.len());
    for (a, b) in original_view.enemies.iter().zip(restored_view.enemies.iter()) {
        assert_eq!(a, b);
    }
}

#[test]
fn combat_phase_rejects_every_build_command() {
    let mut world = World::new();
    let plant = place(&mut world, BuildingKind::PowerPlant, 5, 0);

    let mut events = Vec::new();
    apply(&mut world, Command::StartWave, &mut events);

    events.clear();
    apply(
        &mut world,
        Command::UpgradeBuilding { building: plant },
        &mut events,
    );
    assert!(matches!(events[0], Event::UpgradeRejected { .. }));

    events.clear();
    apply(
        &mut world,
        Command::MoveBuilding {
            building: plant,
            destination: CellCoord::new(6, 0),
        },
        &mut events,
    );
    assert!(matches!(events[0], Event::MoveRejected { .. }));

    events.clear();
    apply(
        &mut world,
        Command::UnlockColumn { side: Side::Right },
        &mut events,
    );
    assert!(matches!(events[0], Event::UnlockRejected { .. }));

    events.clear();
    apply(
        &mut world,
        Command::DemolishBuilding { building: plant },
        &mut events,
    );
    assert!(events.is_empty(), "demolition is a no-op mid-combat");
    assert_eq!(query::building_count(&world), 1);
}
