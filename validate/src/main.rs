//! Replay driver for the XP tracker
//!
//! Feeds a scripted stream of zone changes and player samples through
//! `XpTracker` and prints what the overlay would show:
//! - Instant mode (default): fast CI validation with checkpoints
//! - Realtime mode (`--speed 1`): watch the numbers evolve at game pace

mod logging;
mod output;
mod replay;
mod script;
mod verification;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use xpbar_core::{
    LevelCurve, PlayerSnapshot, Sample, TelemetryHandler, TrackerConfig, TrackerConfigExt,
    XpTracker,
};

use crate::output::{CliOutput, OutputLevel};
use crate::replay::VirtualClock;
use crate::script::{ScriptEvent, load_script};
use crate::verification::{CheckpointVerifier, Expectations, Observed};

// ═══════════════════════════════════════════════════════════════════════════════
// CLI Arguments
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Parser, Debug)]
#[command(name = "xpbar-validate")]
#[command(about = "Replay scripted zone changes and XP samples through the tracker")]
#[command(version)]
struct Args {
    /// Path to replay script
    #[arg(short, long)]
    script: PathBuf,

    // ─────────────────────────────────────────────────────────────────────────
    // Tracker Setup
    // ─────────────────────────────────────────────────────────────────────────
    /// Tracker config TOML (defaults when omitted)
    #[arg(short, long, conflicts_with = "user_config")]
    config: Option<PathBuf>,

    /// Use the stored user config instead of defaults
    #[arg(long)]
    user_config: bool,

    /// Store the effective config as the user config
    #[arg(long)]
    save_config: bool,

    /// Level table TOML (`table = [0, ...]`); built-in table when omitted
    #[arg(long)]
    curve: Option<PathBuf>,

    // ─────────────────────────────────────────────────────────────────────────
    // Replay Mode
    // ─────────────────────────────────────────────────────────────────────────
    /// Speed multiplier (0 = instant, 1 = realtime)
    #[arg(long, default_value_t = 0.0)]
    speed: f32,

    // ─────────────────────────────────────────────────────────────────────────
    // Output Mode
    // ─────────────────────────────────────────────────────────────────────────
    /// Quiet mode: summary and failures only
    #[arg(short, long)]
    quiet: bool,

    /// Verbose mode: show every sample and debug logs
    #[arg(short, long)]
    verbose: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────
    /// Path to expectations TOML file for checkpoint verification
    #[arg(long)]
    expect: Option<PathBuf>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Main
// ═══════════════════════════════════════════════════════════════════════════════

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose, args.quiet);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

/// Replay the script. Returns whether every checkpoint passed.
fn run(args: &Args) -> Result<bool, Box<dyn std::error::Error>> {
    let output_level = if args.quiet {
        OutputLevel::Quiet
    } else if args.verbose {
        OutputLevel::Verbose
    } else {
        OutputLevel::Normal
    };
    let mut cli = CliOutput::new(output_level);

    let config = match &args.config {
        Some(path) => TrackerConfig::load_from(path)?,
        None if args.user_config => TrackerConfig::load(),
        None => TrackerConfig::default(),
    };
    if args.save_config {
        config.save()?;
    }

    let curve = match &args.curve {
        Some(path) => LevelCurve::load(path)?,
        None => LevelCurve::default(),
    };

    let events = load_script(&args.script)?;

    let mut verifier = match &args.expect {
        Some(path) => {
            let expectations = Expectations::load(path)?;
            if !args.quiet && let Some(description) = &expectations.meta.description {
                eprintln!("Expectations: {}", description);
            }
            Some(CheckpointVerifier::new(expectations))
        }
        None => None,
    };

    let mut clock = VirtualClock::new(chrono::Local::now().naive_local(), args.speed);
    if !args.quiet {
        eprintln!(
            "Mode: {} (display: {}, level cap: {})",
            if clock.is_instant_mode() {
                "instant".to_string()
            } else {
                format!("{:.1}x", clock.speed())
            },
            config.display_mode.label(),
            curve.max_level().min(config.max_level),
        );
    }

    let mut tracker = XpTracker::with_curve(curve, config, clock.start());
    tracker.init(clock.start());
    cli.replay_start(clock.start(), &args.script.display().to_string(), events.len());

    // player data carried by `area` directives
    let mut player: Option<PlayerSnapshot> = None;

    for event in &events {
        if let Some(verifier) = verifier.as_mut() {
            let observed = Observed::capture(&tracker, clock.current_time());
            for result in verifier.check_due(Some(event.at_secs()), &observed) {
                cli.checkpoint(&result);
            }
        }

        let now = clock.time_at(event.at_secs());
        clock.advance_to(now);

        match event {
            ScriptEvent::Area {
                area, with_player, ..
            } => {
                let snapshot = if *with_player { player } else { None };
                let transition = tracker.on_area_change(area, snapshot, now);
                cli.transition(now, area, &transition);
            }
            ScriptEvent::Sample { level, xp, .. } => {
                player = Some(PlayerSnapshot::new(*level, *xp));
                let deaths_before = tracker.death_count();
                tracker.on_sample(Sample::new(*level, *xp, now));
                if tracker.death_count() > deaths_before {
                    cli.death(now, tracker.death_count());
                }
                cli.sample(now, *level, *xp, &tracker.overlay_text());
            }
            ScriptEvent::Reset { .. } => {
                tracker.on_user_reset_request(now);
                cli.user_reset(now);
            }
        }
    }

    let end = clock.current_time();
    let summary = verifier.map(|mut verifier| {
        let observed = Observed::capture(&tracker, end);
        for result in verifier.check_due(None, &observed) {
            cli.checkpoint(&result);
        }
        verifier.finalize()
    });

    cli.print_summary(
        clock.elapsed_secs(),
        &tracker.overlay_text(),
        &tracker.history_lines(end),
        summary
            .as_ref()
            .map(|s| (s.checkpoints_passed, s.checkpoints_total)),
    );
    cli.flush();

    Ok(summary.is_none_or(|s| s.passed()))
}
