//! Needs Decay Simulation Driver
//!
//! Stand-alone driver that spawns a handful of actors with need ensembles
//! and ticks them forward, printing band changes and periodic snapshots.

use bevy_ecs::prelude::*;
use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use needsim::{
    attach_needs, examine_lines, output, update_needs, AlertSink, Config, EffectSinks,
    ExamineContext, IncentiveSink, MovementSpeedSink, NeedCatalog, Needs, SimClock, SimRng,
    Sleeping,
};

/// Command line arguments for the driver
#[derive(Parser, Debug)]
#[command(name = "needsim")]
#[command(about = "A needs decay simulation driver")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Simulated seconds per tick
    #[arg(long, default_value_t = 1.0)]
    tick_seconds: f64,

    /// Path to the tuning file (falls back to built-in defaults)
    #[arg(long)]
    config: Option<String>,

    /// Number of actors to spawn
    #[arg(long, default_value_t = 3)]
    actors: u64,

    /// Interval between state snapshots (in ticks)
    #[arg(long, default_value_t = 600)]
    snapshot_interval: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    println!("Needs Simulation Driver");
    println!("=======================");
    println!("Seed: {}", args.seed);
    println!("Ticks: {} x {}s", args.ticks, args.tick_seconds);
    println!();

    let config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Could not load {path}: {e}");
                std::process::exit(1);
            }
        },
        None => Config::load_or_default(),
    };
    let catalog = match config.build_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Bad need definition: {e}");
            std::process::exit(1);
        }
    };
    println!("Loaded {} need definitions", catalog.need_count());

    // Initialize the ECS world
    let mut world = World::new();
    world.insert_resource(SimClock::default());
    world.insert_resource(SimRng(SmallRng::seed_from_u64(args.seed)));
    world.insert_resource(MovementSpeedSink::default());
    world.insert_resource(IncentiveSink::default());
    world.insert_resource(AlertSink::default());
    world.insert_resource(catalog);

    // Spawn actors; the last one sleeps the whole run to show the
    // critical-band protection.
    println!("Spawning {} actors...", args.actors);
    let mut actors = Vec::new();
    for i in 0..args.actors {
        let entity = world.spawn(Needs::default()).id();
        if i + 1 == args.actors && args.actors > 1 {
            world.entity_mut(entity).insert(Sleeping);
        }
        actors.push(entity);
    }
    {
        // Take the sink resources out to avoid borrow conflicts
        let catalog = world.remove_resource::<NeedCatalog>().unwrap();
        let mut speed = world.remove_resource::<MovementSpeedSink>().unwrap();
        let mut alerts = world.remove_resource::<AlertSink>().unwrap();
        let mut incentives = world.remove_resource::<IncentiveSink>().unwrap();
        for &entity in &actors {
            let mut needs = world.get_mut::<Needs>(entity).unwrap();
            let mut sinks = EffectSinks {
                speed: &mut speed,
                alerts: &mut alerts,
                incentives: &mut incentives,
            };
            if let Err(e) = attach_needs(entity, &mut needs, &catalog, 0.0, &mut sinks) {
                eprintln!("Could not attach needs: {e}");
                std::process::exit(1);
            }
        }
        world.insert_resource(catalog);
        world.insert_resource(speed);
        world.insert_resource(alerts);
        world.insert_resource(incentives);
    }

    let mut schedule = Schedule::default();
    schedule.add_systems(update_needs);

    println!();
    println!("Starting simulation...");
    println!();

    for tick in 0..args.ticks {
        world.resource_mut::<SimClock>().advance(args.tick_seconds);
        schedule.run(&mut world);

        // Report alert transitions and debuff messages as they happen
        let ops = std::mem::take(&mut world.resource_mut::<AlertSink>().log);
        for op in ops {
            println!("[Tick {tick:>5}] {op:?}");
        }
        for &entity in &actors {
            let mut needs = world.get_mut::<Needs>(entity).unwrap();
            for message in needs.drain_debuff_messages() {
                println!("[Tick {tick:>5}] {entity:?}: {message}");
            }
        }

        if tick > 0 && tick % args.snapshot_interval == 0 {
            print_snapshots(&world, &actors, tick);
        }
    }

    println!();
    println!("Simulation complete. Ran {} ticks.", args.ticks);
    print_snapshots(&world, &actors, args.ticks);

    // Final examine readout for the first actor
    if let Some(&entity) = actors.first() {
        let needs = world.get::<Needs>(entity).unwrap();
        println!();
        println!("Examining {entity:?}:");
        let ctx = ExamineContext {
            is_self: true,
            is_admin: true,
        };
        for line in examine_lines(needs, "the actor", ctx) {
            println!("  {line}");
        }
    }
}

/// Print one JSON snapshot line per actor
fn print_snapshots(world: &World, actors: &[Entity], tick: u64) {
    for &entity in actors {
        let needs = world.get::<Needs>(entity).unwrap();
        let snap = output::snapshot(needs);
        match snap.to_json() {
            Ok(json) => println!("[Tick {tick:>5}] {entity:?} {json}"),
            Err(e) => eprintln!("Warning: could not serialize snapshot: {e}"),
        }
    }
}
