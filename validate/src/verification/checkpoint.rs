//! Checkpoint-based tracker verification
//!
//! Defines expected tracker outputs at script offsets and verifies them
//! once every event up to that offset has been replayed.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

use xpbar_core::XpTracker;

/// Expected tracker state at a script offset. Unset fields are not checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Script offset in seconds
    pub at_secs: f64,

    /// Time-to-level display, e.g. "00:01:40"
    #[serde(default)]
    pub ttl: Option<String>,

    #[serde(default)]
    pub deaths: Option<u32>,

    #[serde(default)]
    pub paused: Option<bool>,

    /// Number of rows in the run history
    #[serde(default)]
    pub history_len: Option<usize>,

    /// Projected areas to level, inclusive range [min, max]
    #[serde(default)]
    pub areas_to_level: Option<(f64, f64)>,

    /// Percent into level, inclusive range [min, max]
    #[serde(default)]
    pub percent: Option<(f64, f64)>,

    /// Optional description for debugging
    #[serde(default)]
    pub description: Option<String>,
}

/// Full expectations file for a replay script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expectations {
    #[serde(default)]
    pub meta: ExpectationsMeta,

    #[serde(rename = "checkpoint", default)]
    pub checkpoints: Vec<Checkpoint>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpectationsMeta {
    #[serde(default)]
    pub description: Option<String>,
}

impl Expectations {
    /// Load expectations from a TOML file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let expectations: Expectations = toml::from_str(&content)?;
        Ok(expectations)
    }
}

/// Tracker outputs a checkpoint is compared against
#[derive(Debug, Clone, PartialEq)]
pub struct Observed {
    pub ttl: String,
    pub deaths: u32,
    pub paused: bool,
    pub history_len: usize,
    pub areas_to_level: f64,
    pub percent: f64,
}

impl Observed {
    pub fn capture(tracker: &XpTracker, now: NaiveDateTime) -> Self {
        Self {
            ttl: tracker.time_to_level_display(),
            deaths: tracker.death_count(),
            paused: tracker.is_paused(),
            history_len: tracker.history(now).len(),
            areas_to_level: tracker.projected_areas_to_level(),
            percent: tracker.percent_into_level(),
        }
    }
}

/// Result of verifying a single checkpoint
#[derive(Debug, Clone)]
pub struct CheckpointResult {
    pub checkpoint_idx: usize,
    pub at_secs: f64,
    pub description: Option<String>,
    pub passed: bool,
    pub failures: Vec<String>,
}

/// Overall verification result
#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub checkpoints_passed: u32,
    pub checkpoints_total: u32,
}

impl VerificationResult {
    pub fn passed(&self) -> bool {
        self.checkpoints_passed == self.checkpoints_total
    }
}

/// Verifies tracker outputs against expected checkpoints
#[derive(Debug)]
pub struct CheckpointVerifier {
    checkpoints: Vec<Checkpoint>,
    current_checkpoint_idx: usize,
    results: Vec<CheckpointResult>,
}

impl CheckpointVerifier {
    pub fn new(expectations: Expectations) -> Self {
        let mut checkpoints = expectations.checkpoints;
        checkpoints.sort_by(|a, b| a.at_secs.total_cmp(&b.at_secs));
        Self {
            checkpoints,
            current_checkpoint_idx: 0,
            results: Vec::new(),
        }
    }

    /// Offset of the next unverified checkpoint
    pub fn next_due(&self) -> Option<f64> {
        self.checkpoints
            .get(self.current_checkpoint_idx)
            .map(|c| c.at_secs)
    }

    /// Verify every checkpoint that lies before `next_event_secs`.
    ///
    /// Call before replaying the event at that offset; pass `None` after the
    /// last event to verify whatever is left.
    pub fn check_due(
        &mut self,
        next_event_secs: Option<f64>,
        observed: &Observed,
    ) -> Vec<CheckpointResult> {
        let mut verified = Vec::new();

        while let Some(at_secs) = self.next_due()
            && next_event_secs.is_none_or(|next| at_secs < next)
        {
            let checkpoint = &self.checkpoints[self.current_checkpoint_idx];
            let failures = compare(checkpoint, observed);

            let result = CheckpointResult {
                checkpoint_idx: self.current_checkpoint_idx,
                at_secs,
                description: checkpoint.description.clone(),
                passed: failures.is_empty(),
                failures,
            };

            self.results.push(result.clone());
            self.current_checkpoint_idx += 1;
            verified.push(result);
        }

        verified
    }

    /// Get final verification result
    pub fn finalize(self) -> VerificationResult {
        let passed = self.results.iter().filter(|r| r.passed).count() as u32;

        VerificationResult {
            checkpoints_passed: passed,
            checkpoints_total: self.checkpoints.len() as u32,
        }
    }
}

fn compare(checkpoint: &Checkpoint, observed: &Observed) -> Vec<String> {
    let mut failures = Vec::new();

    if let Some(ttl) = &checkpoint.ttl
        && *ttl != observed.ttl
    {
        failures.push(format!("TTL is {} but expected {}", observed.ttl, ttl));
    }

    if let Some(deaths) = checkpoint.deaths
        && deaths != observed.deaths
    {
        failures.push(format!(
            "Death count is {} but expected {}",
            observed.deaths, deaths
        ));
    }

    if let Some(paused) = checkpoint.paused
        && paused != observed.paused
    {
        failures.push(format!(
            "Tracker should be {}",
            if paused { "paused" } else { "running" }
        ));
    }

    if let Some(len) = checkpoint.history_len
        && len != observed.history_len
    {
        failures.push(format!(
            "History has {} runs but expected {}",
            observed.history_len, len
        ));
    }

    if let Some((min, max)) = checkpoint.areas_to_level
        && !(min..=max).contains(&observed.areas_to_level)
    {
        failures.push(format!(
            "Areas to level {:.2} not in expected range [{:.2}, {:.2}]",
            observed.areas_to_level, min, max
        ));
    }

    if let Some((min, max)) = checkpoint.percent
        && !(min..=max).contains(&observed.percent)
    {
        failures.push(format!(
            "Percent into level {:.2} not in expected range [{:.2}, {:.2}]",
            observed.percent, min, max
        ));
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observed() -> Observed {
        Observed {
            ttl: "00:01:40".to_string(),
            deaths: 1,
            paused: false,
            history_len: 2,
            areas_to_level: 3.0,
            percent: 42.5,
        }
    }

    fn expectations(checkpoints: Vec<Checkpoint>) -> Expectations {
        Expectations {
            meta: ExpectationsMeta::default(),
            checkpoints,
        }
    }

    #[test]
    fn test_checkpoint_pass() {
        let mut verifier = CheckpointVerifier::new(expectations(vec![Checkpoint {
            at_secs: 60.0,
            ttl: Some("00:01:40".to_string()),
            deaths: Some(1),
            paused: Some(false),
            history_len: Some(2),
            areas_to_level: Some((2.5, 3.5)),
            percent: Some((40.0, 45.0)),
            description: Some("after first map".to_string()),
        }]));

        // not yet due: an event at exactly 60s still has to be replayed
        assert!(verifier.check_due(Some(60.0), &observed()).is_empty());

        let results = verifier.check_due(Some(61.0), &observed());
        assert_eq!(results.len(), 1);
        assert!(results[0].passed, "Failures: {:?}", results[0].failures);
        assert_eq!(verifier.next_due(), None);
        assert!(verifier.finalize().passed());
    }

    #[test]
    fn test_checkpoint_failures_are_reported() {
        let mut verifier = CheckpointVerifier::new(expectations(vec![Checkpoint {
            at_secs: 10.0,
            ttl: Some("00:00:10".to_string()),
            deaths: Some(0),
            paused: Some(true),
            areas_to_level: Some((0.0, 1.0)),
            ..Checkpoint::default()
        }]));

        let results = verifier.check_due(None, &observed());
        let failures = &results[0].failures;

        assert!(!results[0].passed);
        assert_eq!(failures.len(), 4);
        assert!(failures.iter().any(|f| f.contains("TTL is 00:01:40")));
        assert!(failures.iter().any(|f| f.contains("should be paused")));
        assert!(failures.iter().any(|f| f.contains("not in expected range")));
        assert!(!verifier.finalize().passed());
    }

    #[test]
    fn test_checkpoints_verified_in_offset_order() {
        let mut verifier = CheckpointVerifier::new(expectations(vec![
            Checkpoint {
                at_secs: 30.0,
                ..Checkpoint::default()
            },
            Checkpoint {
                at_secs: 5.0,
                ..Checkpoint::default()
            },
        ]));

        assert_eq!(verifier.next_due(), Some(5.0));
        let results = verifier.check_due(Some(20.0), &observed());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].at_secs, 5.0);

        let results = verifier.check_due(None, &observed());
        assert_eq!(results[0].at_secs, 30.0);
        assert_eq!(verifier.finalize().checkpoints_total, 2);
    }

    #[test]
    fn test_unreached_checkpoints_fail_the_run() {
        let verifier = CheckpointVerifier::new(expectations(vec![Checkpoint {
            at_secs: 5.0,
            ..Checkpoint::default()
        }]));

        let result = verifier.finalize();
        assert_eq!(result.checkpoints_passed, 0);
        assert!(!result.passed());
    }

    #[test]
    fn test_parse_expectations_toml() {
        let exp: Expectations = toml::from_str(
            r#"
            [meta]
            description = "two maps"

            [[checkpoint]]
            at_secs = 90
            ttl = "00:00:50"
            areas_to_level = [1.0, 2.0]
            "#,
        )
        .unwrap();

        assert_eq!(exp.meta.description.as_deref(), Some("two maps"));
        assert_eq!(exp.checkpoints.len(), 1);
        assert_eq!(exp.checkpoints[0].at_secs, 90.0);
        assert_eq!(exp.checkpoints[0].areas_to_level, Some((1.0, 2.0)));
        assert_eq!(exp.checkpoints[0].deaths, None);
    }
}
