#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line adapter that drives a short Skyshield campaign.
//!
//! Builds a starter city, then runs the requested number of waves at a fixed
//! tick rate, printing a summary after each one. Useful for balance checks
//! and as a worked example of the command surface.

use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use skyshield_core::{BuildingKind, CellCoord, Command, Event, Phase};
use skyshield_world::{apply, query, World};

/// Maximum simulated seconds before a wave is declared stuck.
const WAVE_TIMEOUT_SECS: f32 = 600.0;

#[derive(Parser, Debug)]
#[command(name = "skyshield", about = "Headless Skyshield campaign runner")]
struct Args {
    /// Seed for the deterministic combat randomness.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of waves to simulate.
    #[arg(long, default_value_t = 3)]
    waves: u32,

    /// Simulation tick length in milliseconds.
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,
}

/// Starter city: two power plants for surplus, a datacenter for shield
/// capacity, and a turret to shoot back. Costs 255 of the 300 start credits.
const STARTER_CITY: [(BuildingKind, u32, u32); 4] = [
    (BuildingKind::PowerPlant, 5, 0),
    (BuildingKind::PowerPlant, 6, 0),
    (BuildingKind::Turret, 8, 0),
    (BuildingKind::Datacenter, 10, 0),
];

fn main() -> Result<()> {
    let args = Args::parse();
    let mut world = World::with_seed(args.seed);
    let mut events = Vec::new();

    for (kind, column, row) in STARTER_CITY {
        events.clear();
        apply(
            &mut world,
            Command::PlaceBuilding {
                kind,
                origin: CellCoord::new(column, row),
            },
            &mut events,
        );
        if let Some(Event::PlacementRejected { reason, .. }) = events.first() {
            bail!("starter placement of {} failed: {reason}", kind.name());
        }
    }
    print_status(&world);

    let dt = Duration::from_millis(args.tick_ms);
    for _ in 0..args.waves {
        reinforce(&mut world);

        events.clear();
        apply(&mut world, Command::StartWave, &mut events);
        if let Some(Event::WaveStartRejected { reason }) = events.first() {
            bail!("wave refused to start: {reason}");
        }
        let wave = query::wave_number(&world);
        println!("--- wave {wave} ---");

        let mut elapsed = 0.0;
        while query::phase(&world) == Phase::Combat {
            events.clear();
            apply(&mut world, Command::Tick { dt }, &mut events);
            elapsed += dt.as_secs_f32();
            if elapsed > WAVE_TIMEOUT_SECS {
                bail!("wave {wave} did not finish within {WAVE_TIMEOUT_SECS} seconds");
            }
        }

        match query::last_wave_rewards(&world) {
            Some(rewards) => println!(
                "wave {wave} cleared: +{} credits ({} base, {} perfect, {} energy)",
                rewards.total, rewards.base, rewards.perfect_bonus, rewards.energy_bonus
            ),
            None => println!("wave {wave} ended without rewards"),
        }
        print_status(&world);

        if query::building_count(&world) == 0 {
            println!("the city has fallen");
            break;
        }
    }

    println!("--- log ---");
    for line in query::log_lines(&world) {
        println!("{line}");
    }
    Ok(())
}

/// Spends spare credits on an extra turret when a slot is open.
fn reinforce(world: &mut World) {
    let candidates = [
        CellCoord::new(9, 0),
        CellCoord::new(4, 0),
        CellCoord::new(11, 0),
    ];
    for cell in candidates {
        if query::placement_probe(world, BuildingKind::Turret, cell).is_ok() {
            let mut events = Vec::new();
            apply(
                world,
                Command::PlaceBuilding {
                    kind: BuildingKind::Turret,
                    origin: cell,
                },
                &mut events,
            );
            return;
        }
    }
}

fn print_status(world: &World) {
    let energy = query::energy_report(world);
    let shield = query::shield_status(world);
    println!(
        "credits {} | buildings {} | energy {:+} ({}/{}) | shield {:.0}/{:.0} ({})",
        query::credits(world),
        query::building_count(world),
        energy.surplus,
        energy.production,
        energy.consumption,
        shield.current,
        shield.max,
        if shield.active { "up" } else { "down" },
    );
}
