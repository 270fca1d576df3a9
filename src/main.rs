//! Replays scheduled routes from a JSON file and prints the event log.

use anyhow::{ensure, Context, Result};
use clap::Parser;
use route_sim::{LatLng, Playback, RouteDefinition, Simulation};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(about = "Replay scheduled vehicle routes and print their events")]
struct Args {
    /// JSON array of route definitions, each with an optional `path` of routed samples.
    routes: PathBuf,
    /// Only simulate the route with this id (may be repeated).
    #[arg(long)]
    route: Vec<String>,
    /// Also simulate every route in this group.
    #[arg(long)]
    group: Option<String>,
    /// Playback speed multiplier.
    #[arg(long, default_value_t = 1.0)]
    speed: f64,
    /// Real time between frames, in ms.
    #[arg(long, default_value_t = 100)]
    frame_ms: u64,
    /// Rewind and play the simulation a second time.
    #[arg(long)]
    replay: bool,
}

#[derive(Deserialize)]
struct RouteRecord {
    #[serde(flatten)]
    route: RouteDefinition,
    #[serde(default)]
    path: Vec<LatLng>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    ensure!(args.speed > 0.0, "speed must be positive");
    ensure!(args.frame_ms > 0, "frame interval must be positive");

    let text = std::fs::read_to_string(&args.routes)
        .with_context(|| format!("reading {}", args.routes.display()))?;
    let records: Vec<RouteRecord> =
        serde_json::from_str(&text).context("parsing route definitions")?;

    let select_all = args.route.is_empty() && args.group.is_none();
    let mut sim = Simulation::new();
    for record in &records {
        let id = sim.add_route(&record.route)?;
        sim.set_route_path(id, &record.path)?;
        sim.set_route_active(id, select_all || args.route.contains(&record.route.id))?;
    }
    if let Some(group) = &args.group {
        sim.activate_group(group);
    }

    let mut playback = Playback::new();
    playback.set_speed(args.speed);
    let dt = Duration::from_millis(args.frame_ms);
    for _ in 0..(if args.replay { 2 } else { 1 }) {
        playback.seek(0.0);
        playback.play();
        sim.update(playback.progress());
        while playback.is_playing() {
            sim.update(playback.advance(dt));
        }
    }

    for line in sim.messages().lines() {
        println!("{line}");
    }

    let frame = sim.update(playback.progress());
    println!("-- {} --", sim.clock_label());
    for vehicle in &frame.vehicles {
        let name = sim.get_route(vehicle.route).map_or("?", |r| r.name());
        println!(
            "{name}: {:.6}, {:.6} ({:?})",
            vehicle.position.lat, vehicle.position.lng, vehicle.motion
        );
    }
    Ok(())
}
