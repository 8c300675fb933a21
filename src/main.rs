//! Pinball Sim headless driver
//!
//! Runs a fixed number of ticks and streams scene snapshots as JSON lines
//! to stdout. Flipper presses are scripted by tick ranges.

use std::ops::Range;
use std::path::PathBuf;
#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

use clap::Parser;

use pinball_sim::renderer::JsonLinesSink;
use pinball_sim::sim::TickInput;
use pinball_sim::{SceneConfig, Session};

#[derive(Debug, Parser)]
#[command(version, about = "Headless 2D pinball table simulation")]
struct Args {
    /// Scene configuration (JSON). Uses the classic table when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Emit a snapshot every N ticks (0 = only the final state)
    #[arg(short, long, default_value_t = 60)]
    every: u64,

    /// Hold the left flipper during START..END ticks (repeatable)
    #[arg(long, value_name = "START..END", value_parser = parse_tick_range)]
    hold_left: Vec<Range<u64>>,

    /// Hold the right flipper during START..END ticks (repeatable)
    #[arg(long, value_name = "START..END", value_parser = parse_tick_range)]
    hold_right: Vec<Range<u64>>,

    /// Print the classic table configuration and exit
    #[arg(long)]
    dump_config: bool,
}

fn parse_tick_range(s: &str) -> Result<Range<u64>, String> {
    let (start, end) = s
        .split_once("..")
        .ok_or_else(|| format!("expected START..END, got '{s}'"))?;
    let start: u64 = start.parse().map_err(|e| format!("bad start '{start}': {e}"))?;
    let end: u64 = end.parse().map_err(|e| format!("bad end '{end}': {e}"))?;
    if end < start {
        return Err(format!("range end {end} is before start {start}"));
    }
    Ok(start..end)
}

fn held(ranges: &[Range<u64>], tick: u64) -> bool {
    ranges.iter().any(|r| r.contains(&tick))
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    if args.dump_config {
        println!("{}", SceneConfig::classic().to_json_pretty()?);
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::classic(),
    };

    let mut session = Session::new(config)?;
    let mut sink = JsonLinesSink::new(std::io::stdout().lock());

    log::info!("Running {} ticks", args.ticks);

    for t in 0..args.ticks {
        let input = TickInput {
            left_pressed: held(&args.hold_left, t),
            right_pressed: held(&args.hold_right, t),
            pause: false,
        };
        session.step_with(&input);

        if args.every > 0 && (t + 1) % args.every == 0 {
            session.present(&mut sink);
        }
    }

    if args.every == 0 || args.ticks % args.every != 0 {
        session.present(&mut sink);
    }

    log::info!("Done after {} ticks", session.scene().tick_count);
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::init();
    log::info!("Pinball Sim (native) starting...");

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the embedding page on wasm
}
