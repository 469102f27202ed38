// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Scoring-policy configuration.
//!
//! The pipeline treats the scoring formula as externally supplied policy: a
//! TOML file (or environment variables as a fallback) maps exercise
//! attributes to point values. The engine in [`crate::scoring`] only ever
//! reads the policy it is handed; changing the policy never re-scores
//! already-approved submissions.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

fn default_points_per_rep() -> u32 {
    10
}

fn default_weight_factor() -> f64 {
    0.25
}

fn default_duration_factor() -> f64 {
    0.0
}

/// Externally supplied scoring policy for the points engine.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScoringPolicy {
    /// Base points granted per qualifying rep
    #[serde(default = "default_points_per_rep")]
    pub points_per_rep: u32,
    /// Bonus points per kilogram of added weight, per rep
    #[serde(default = "default_weight_factor")]
    pub weight_factor: f64,
    /// Bonus points per second of duration, for timed exercises
    #[serde(default = "default_duration_factor")]
    pub duration_factor: f64,
    /// Per-exercise multipliers on the rep points (default 1.0)
    #[serde(default)]
    pub exercise_multipliers: HashMap<String, f64>,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            points_per_rep: default_points_per_rep(),
            weight_factor: default_weight_factor(),
            duration_factor: default_duration_factor(),
            exercise_multipliers: HashMap::new(),
        }
    }
}

impl ScoringPolicy {
    /// Load the policy from a TOML file, falling back to environment
    /// variables (and then defaults) when no file exists.
    pub fn load(path: Option<String>) -> Result<Self> {
        let config_path = path.unwrap_or_else(|| {
            dirs::config_dir()
                .map(|p| p.join("unyield/scoring.toml"))
                .unwrap_or_else(|| "scoring.toml".into())
                .to_string_lossy()
                .to_string()
        });

        if Path::new(&config_path).exists() {
            let content = fs::read_to_string(&config_path)
                .context("Failed to read scoring policy file")?;
            toml::from_str(&content).context("Failed to parse scoring policy file")
        } else {
            dotenv::dotenv().ok();

            let mut policy = ScoringPolicy::default();
            if let Ok(value) = std::env::var("UNYIELD_POINTS_PER_REP") {
                policy.points_per_rep = value
                    .parse()
                    .context("UNYIELD_POINTS_PER_REP must be an integer")?;
            }
            if let Ok(value) = std::env::var("UNYIELD_WEIGHT_FACTOR") {
                policy.weight_factor = value
                    .parse()
                    .context("UNYIELD_WEIGHT_FACTOR must be a number")?;
            }
            if let Ok(value) = std::env::var("UNYIELD_DURATION_FACTOR") {
                policy.duration_factor = value
                    .parse()
                    .context("UNYIELD_DURATION_FACTOR must be a number")?;
            }
            Ok(policy)
        }
    }

    /// Persist the policy to a TOML file.
    pub fn save(&self, path: &str) -> Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Multiplier for an exercise name, 1.0 when unconfigured.
    pub fn exercise_multiplier(&self, exercise: &str) -> f64 {
        self.exercise_multipliers
            .get(exercise)
            .copied()
            .unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = ScoringPolicy::default();
        assert_eq!(policy.points_per_rep, 10);
        assert_eq!(policy.weight_factor, 0.25);
        assert_eq!(policy.duration_factor, 0.0);
        assert_eq!(policy.exercise_multiplier("anything"), 1.0);
    }

    #[test]
    fn test_parse_policy_toml() {
        let toml_str = r#"
            points_per_rep = 5
            weight_factor = 0.5

            [exercise_multipliers]
            pullup = 2.0
            pushup = 1.0
        "#;
        let policy: ScoringPolicy = toml::from_str(toml_str).unwrap();
        assert_eq!(policy.points_per_rep, 5);
        assert_eq!(policy.weight_factor, 0.5);
        // omitted field takes the default
        assert_eq!(policy.duration_factor, 0.0);
        assert_eq!(policy.exercise_multiplier("pullup"), 2.0);
        assert_eq!(policy.exercise_multiplier("deadlift"), 1.0);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scoring.toml");
        let path_str = path.to_string_lossy().to_string();

        let mut policy = ScoringPolicy::default();
        policy.points_per_rep = 7;
        policy
            .exercise_multipliers
            .insert("burpee".to_string(), 1.5);
        policy.save(&path_str).unwrap();

        let loaded = ScoringPolicy::load(Some(path_str)).unwrap();
        assert_eq!(loaded.points_per_rep, 7);
        assert_eq!(loaded.exercise_multiplier("burpee"), 1.5);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let policy = ScoringPolicy::load(Some("/nonexistent/scoring.toml".to_string())).unwrap();
        assert_eq!(policy.points_per_rep, 10);
    }
}
