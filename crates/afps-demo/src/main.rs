//! # AFPS Demo
//!
//! Drives the HUD from a simulated frame loop and prints labels to the
//! terminal.
//!
//! Usage: `afps-demo [config.toml] [seconds]`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod sim;
mod terminal;

use afps_common::OperationMode;
use afps_hud::{Hud, HudConfig, HudEvent, StaticDeviceProbe, CONFIG_FILE};
use anyhow::{Context, Result};
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sim::{SimulatedMemory, Workload};
use terminal::TerminalSurface;

const DEFAULT_SECONDS: u64 = 6;

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("afps=info".parse()?))
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| CONFIG_FILE.to_string());
    let seconds = match args.next() {
        Some(s) => s
            .parse::<u64>()
            .with_context(|| format!("invalid duration '{s}'"))?,
        None => DEFAULT_SECONDS,
    };

    info!("AFPS demo starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = HudConfig::load_from(&config_path);
    let plain = std::env::var_os("NO_COLOR").is_some();

    let mut hud = Hud::new(TerminalSurface::new(plain), config)
        .with_memory_probe(SimulatedMemory::new(180, 0xAF95))
        .with_device_probe(StaticDeviceProbe(sim::device_info()));

    run(&mut hud, Duration::from_secs(seconds));

    println!("{}", hud.snapshot().to_json_pretty()?);
    hud.dispose();
    log_events(&hud);

    info!(
        label_updates = hud.surface().updates(),
        "AFPS demo shutdown complete"
    );
    Ok(())
}

/// Runs the frame loop for `duration`, exercising level loads and mode
/// switches along the way.
fn run(hud: &mut Hud<TerminalSurface>, duration: Duration) {
    let mut workload = Workload::new(12, 0x5EED);
    let start = Instant::now();
    hud.start(start);

    let mut phase = 0;
    loop {
        std::thread::sleep(workload.next_frame());
        let now = Instant::now();
        let elapsed = now.duration_since(start);
        if elapsed >= duration {
            break;
        }

        hud.frame(now);

        // Scripted events, each fired once as the run passes its share.
        let share = elapsed.as_secs_f64() / duration.as_secs_f64();
        if phase == 0 && share > 0.3 {
            info!("Heavy phase: adding frame cost");
            workload.set_load(35);
            phase = 1;
        } else if phase == 1 && share > 0.5 {
            info!("Simulating level load");
            workload.set_load(0);
            hud.level_loaded();
            hud.fps(|fps| fps.set_show_min_max(true));
            phase = 2;
        } else if phase == 2 && share > 0.7 {
            hud.set_operation_mode(OperationMode::Background);
            phase = 3;
        } else if phase == 3 && share > 0.8 {
            hud.set_operation_mode(OperationMode::Normal);
            phase = 4;
        }

        log_events(hud);
    }
}

fn log_events(hud: &Hud<TerminalSurface>) {
    for event in hud.events().drain() {
        match event {
            HudEvent::FpsLevelChanged { level } => info!(?level, "FPS level changed"),
            HudEvent::OperationModeChanged { previous, current } => {
                info!(?previous, ?current, "Operation mode changed");
            },
            HudEvent::Disposed => info!("HUD disposed"),
        }
    }
}
