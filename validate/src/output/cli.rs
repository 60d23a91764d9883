//! Colored CLI output for tracker replays
//!
//! Formats area transitions, deaths, overlay text changes and checkpoint
//! results with colored output for easy visual parsing.

use chrono::NaiveDateTime;
use std::io::{self, Write};

use xpbar_core::{AreaInstance, AreaTransition, OverlayText};

use crate::verification::CheckpointResult;

/// Output verbosity level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum OutputLevel {
    /// Only show summary at end
    Quiet,
    /// Show transitions, deaths and overlay changes (default)
    #[default]
    Normal,
    /// Show every sample
    Verbose,
}

/// CLI output formatter with color support
#[derive(Debug)]
pub struct CliOutput {
    level: OutputLevel,
    replay_start: Option<NaiveDateTime>,
    use_colors: bool,
    last_text: Option<OverlayText>,
    samples: u32,
    runs_started: u32,
    pauses: u32,
    deaths: u32,
    ignored: u32,
}

impl Default for CliOutput {
    fn default() -> Self {
        Self::new(OutputLevel::Normal)
    }
}

impl CliOutput {
    pub fn new(level: OutputLevel) -> Self {
        Self {
            level,
            replay_start: None,
            use_colors: atty::is(atty::Stream::Stdout),
            last_text: None,
            samples: 0,
            runs_started: 0,
            pauses: 0,
            deaths: 0,
            ignored: 0,
        }
    }

    /// Set replay start time for relative timestamps
    pub fn set_replay_start(&mut self, time: NaiveDateTime) {
        self.replay_start = Some(time);
    }

    /// Format timestamp relative to replay start
    pub fn format_time(&self, time: NaiveDateTime) -> String {
        if let Some(start) = self.replay_start {
            let secs = (time - start).num_milliseconds() as f32 / 1000.0;
            let mins = (secs / 60.0).floor() as u32;
            format!("{:02}:{:05.2}", mins, secs % 60.0)
        } else {
            time.format("%H:%M:%S%.3f").to_string()
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ANSI Color Codes
    // ═══════════════════════════════════════════════════════════════════════════

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.paint("32", text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint("33", text)
    }

    fn red(&self, text: &str) -> String {
        self.paint("31", text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint("36", text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }

    fn bold(&self, text: &str) -> String {
        self.paint("1", text)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Event Output
    // ═══════════════════════════════════════════════════════════════════════════

    /// Log replay start
    pub fn replay_start(&mut self, time: NaiveDateTime, script: &str, events: usize) {
        self.set_replay_start(time);
        if self.level < OutputLevel::Normal {
            return;
        }

        let label = self.bold(&self.green("═══ REPLAY START ═══"));
        println!("\n{} {} ({} events)\n", label, script, events);
    }

    /// Log the controller's reaction to a zone change
    pub fn transition(&mut self, time: NaiveDateTime, area: &AreaInstance, transition: &AreaTransition) {
        match transition {
            AreaTransition::RunStarted { .. } => self.runs_started += 1,
            AreaTransition::Paused => self.pauses += 1,
            AreaTransition::Ignored => self.ignored += 1,
            AreaTransition::Resumed { .. } | AreaTransition::Unchanged => {}
        }
        if self.level < OutputLevel::Normal {
            return;
        }

        let time_str = self.format_time(time);
        let line = match transition {
            AreaTransition::RunStarted { closed_previous } => format!(
                "{} {} \"{}\"{}",
                self.green("-->"),
                self.green("RUN START:"),
                area.name,
                if *closed_previous {
                    self.dim(" (previous run closed)")
                } else {
                    String::new()
                }
            ),
            AreaTransition::Paused => format!(
                "{} {} \"{}\"",
                self.yellow("|| "),
                self.yellow("PAUSED:"),
                area.name
            ),
            AreaTransition::Resumed { paused_for } => format!(
                "{} {} \"{}\" after {}s",
                self.cyan(">> "),
                self.cyan("RESUMED:"),
                area.name,
                paused_for.num_seconds()
            ),
            AreaTransition::Ignored => format!(
                "{} {} \"{}\" (no player data)",
                self.dim("x--"),
                self.dim("IGNORED:"),
                area.name
            ),
            AreaTransition::Unchanged => {
                if self.level < OutputLevel::Verbose {
                    return;
                }
                format!("{} {} \"{}\"", self.dim("..."), self.dim("AREA:"), area.name)
            }
        };

        println!("[{}] {}", time_str, line);
    }

    /// Log a counted death
    pub fn death(&mut self, time: NaiveDateTime, count: u32) {
        self.deaths += 1;
        if self.level < OutputLevel::Normal {
            return;
        }

        let time_str = self.format_time(time);
        let marker = self.red("XXX");
        let label = self.red("DEATH:");
        println!("[{}] {} {} #{} in this area", time_str, marker, label, count);
    }

    /// Log a user reset
    pub fn user_reset(&mut self, time: NaiveDateTime) {
        if self.level < OutputLevel::Normal {
            return;
        }

        let time_str = self.format_time(time);
        println!("[{}] {}", time_str, self.bold(&self.yellow("RESET")));
    }

    /// Log the overlay text after a sample.
    ///
    /// Normal output prints only changes; verbose prints every sample.
    pub fn sample(&mut self, time: NaiveDateTime, level: u32, xp: u64, text: &OverlayText) {
        self.samples += 1;
        let changed = self.last_text.as_ref() != Some(text);
        self.last_text = Some(text.clone());

        if self.level < OutputLevel::Normal || (!changed && self.level < OutputLevel::Verbose) {
            return;
        }

        let time_str = self.format_time(time);
        let values = self.dim(&format!("[L{} {} XP]", level, xp));
        match &text.secondary {
            Some(secondary) => println!("[{}] {} | {} {}", time_str, text.primary, secondary, values),
            None => println!("[{}] {} {}", time_str, text.primary, values),
        }
    }

    /// Log a checkpoint result
    pub fn checkpoint(&self, result: &CheckpointResult) {
        let status = if result.passed {
            self.green("PASS")
        } else {
            self.red("FAIL")
        };
        let description = result
            .description
            .as_deref()
            .map(|d| format!(" {}", self.dim(d)))
            .unwrap_or_default();

        // failures always print, even in quiet mode
        if result.passed && self.level < OutputLevel::Normal {
            return;
        }
        println!(
            "{} checkpoint #{} @ {:.1}s{}",
            status,
            result.checkpoint_idx + 1,
            result.at_secs,
            description
        );
        for failure in &result.failures {
            println!("    {}", self.red(failure));
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Summary Report
    // ═══════════════════════════════════════════════════════════════════════════

    /// Print final summary
    pub fn print_summary(
        &self,
        replayed_secs: f64,
        text: &OverlayText,
        history: &[String],
        checkpoints_passed: Option<(u32, u32)>,
    ) {
        let line = "═".repeat(51);
        println!();
        println!("{}", line);
        println!("  XP TRACKER REPLAY SUMMARY");
        println!("{}", line);
        println!("Replayed:      {:.1}s", replayed_secs);
        println!("Samples:       {}", self.samples);
        println!("Runs Started:  {}", self.runs_started);
        println!("Pauses:        {}", self.pauses);
        println!(
            "Deaths:        {}",
            if self.deaths > 0 {
                self.red(&self.deaths.to_string())
            } else {
                "0".to_string()
            }
        );
        if self.ignored > 0 {
            println!("Ignored Areas: {}", self.yellow(&self.ignored.to_string()));
        }
        println!("Overlay:       {}", text.primary);
        if let Some(secondary) = &text.secondary {
            println!("               {}", secondary);
        }

        if !history.is_empty() {
            println!("Run History:");
            for row in history {
                println!("  {}", row);
            }
        }

        if let Some((passed, total)) = checkpoints_passed {
            let status = if passed == total {
                self.green(&format!("PASSED ({}/{})", passed, total))
            } else {
                self.red(&format!("FAILED ({}/{})", passed, total))
            };
            println!("Verification:  {}", status);
        }
        println!("{}", line);
    }

    /// Flush stdout
    pub fn flush(&self) {
        let _ = io::stdout().flush();
    }
}
