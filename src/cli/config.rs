//! Experiment settings file handling.
//!
//! Settings are TOML and describe the sweep an invocation runs: trial count,
//! sample size, the walk-length and attack-edge ranges, and the attacker
//! cluster shape. A missing file gets a generated, commented default so a
//! first run works out of the box.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_TRIALS: u32 = 5;
const DEFAULT_SAMPLE_SIZE: usize = 100;
const DEFAULT_R0: u32 = 4;
const DEFAULT_CLUSTERS: usize = 10;
const DEFAULT_CLUSTER_SIZE: usize = 2;

/// Experiment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Trial count, sample size and round constant.
    #[serde(default)]
    pub experiment: ExperimentSettings,

    /// Walk-length sweep.
    #[serde(default = "default_walk_length")]
    pub walk_length: SweepRange,

    /// Total-attack-edge sweep (escape runs only).
    #[serde(default = "default_attack_edges")]
    pub attack_edges: SweepRange,

    /// Attacker cluster shape (escape runs only).
    #[serde(default)]
    pub attackers: AttackerSettings,
}

/// General experiment parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentSettings {
    /// Independent repetitions of the whole sweep.
    #[serde(default = "default_trials")]
    pub trials: u32,

    /// Number of sampled subject nodes.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Round-count constant: R = ceil(r0 * sqrt(edge_count)).
    #[serde(default = "default_r0")]
    pub r0: u32,
}

/// An inclusive arithmetic sweep: initial, initial + step, ... up to final.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepRange {
    pub initial: u32,
    pub step: u32,
    #[serde(rename = "final")]
    pub last: u32,
}

/// Attacker cluster shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackerSettings {
    /// Number of injected Sybil clusters.
    #[serde(default = "default_clusters")]
    pub clusters: usize,

    /// Nodes per cluster.
    #[serde(default = "default_cluster_size")]
    pub cluster_size: usize,
}

fn default_trials() -> u32 {
    DEFAULT_TRIALS
}

fn default_sample_size() -> usize {
    DEFAULT_SAMPLE_SIZE
}

fn default_r0() -> u32 {
    DEFAULT_R0
}

fn default_clusters() -> usize {
    DEFAULT_CLUSTERS
}

fn default_cluster_size() -> usize {
    DEFAULT_CLUSTER_SIZE
}

fn default_walk_length() -> SweepRange {
    SweepRange {
        initial: 10,
        step: 10,
        last: 100,
    }
}

fn default_attack_edges() -> SweepRange {
    SweepRange {
        initial: 10,
        step: 10,
        last: 100,
    }
}

impl Default for ExperimentSettings {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            sample_size: DEFAULT_SAMPLE_SIZE,
            r0: DEFAULT_R0,
        }
    }
}

impl Default for AttackerSettings {
    fn default() -> Self {
        Self {
            clusters: DEFAULT_CLUSTERS,
            cluster_size: DEFAULT_CLUSTER_SIZE,
        }
    }
}

impl SweepRange {
    /// Every value of the sweep, in order.
    pub fn values(&self) -> Vec<u32> {
        if self.step == 0 {
            return Vec::new();
        }
        (self.initial..=self.last)
            .step_by(self.step as usize)
            .collect()
    }

    fn validate(&self, name: &str) -> Result<(), String> {
        if self.step == 0 {
            return Err(format!("{name}: step must be at least 1"));
        }
        if self.last < self.initial {
            return Err(format!("{name}: final must not be below initial"));
        }
        Ok(())
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            experiment: ExperimentSettings::default(),
            walk_length: default_walk_length(),
            attack_edges: default_attack_edges(),
            attackers: AttackerSettings::default(),
        }
    }
}

impl ExperimentConfig {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings file '{}': {}", path.display(), e))?;

        let config: ExperimentConfig = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse settings file '{}': {}", path.display(), e))?;

        config.validate()?;
        Ok(config)
    }

    /// Check the cross-field constraints the sweeps rely on.
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.walk_length.validate("walk_length")?;
        self.attack_edges.validate("attack_edges")?;
        if self.experiment.trials == 0 {
            return Err("experiment.trials must be at least 1".into());
        }
        if self.experiment.sample_size < 2 {
            return Err("experiment.sample_size must be at least 2 (acceptance needs pairs)".into());
        }
        if self.experiment.r0 == 0 {
            return Err("experiment.r0 must be at least 1".into());
        }
        if self.attackers.clusters == 0 {
            return Err("attackers.clusters must be at least 1".into());
        }
        if self.attackers.cluster_size == 0 {
            return Err("attackers.cluster_size must be at least 1".into());
        }
        Ok(())
    }

    /// Generate default settings content as a string with comments.
    pub fn generate_default_toml() -> String {
        r#"# Sybilgauge experiment settings
#
# The walk_length and attack_edges sections describe sweeps: every value from
# `initial` through `final` in increments of `step` is measured.

[experiment]
# Independent repetitions of the whole sweep; the report ends with a
# per-cell average table over all trials.
trials = 5

# Number of sampled subject nodes (drawn once, degree >= 1 only)
sample_size = 100

# Round-count constant: R = ceil(r0 * sqrt(edge_count))
r0 = 4

[walk_length]
initial = 10
step = 10
final = 100

[attack_edges]
# Total attack edges per sweep point; each cluster receives total / clusters
initial = 10
step = 10
final = 100

[attackers]
# Number of injected Sybil clusters and nodes per cluster
clusters = 10
cluster_size = 2
"#
        .to_string()
    }

    /// Create and save a default settings file.
    pub fn create_default(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = Self::generate_default_toml();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create settings directory: {}", e))?;
            }
        }

        fs::write(path, contents).map_err(|e| {
            format!(
                "Failed to write settings file '{}': {}",
                path.display(),
                e
            )
        })?;

        Ok(())
    }
}

/// Default settings path, adjacent to wherever the tool is run.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("sybilgauge.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_default_parses_and_validates() {
        let config: ExperimentConfig =
            toml::from_str(&ExperimentConfig::generate_default_toml()).unwrap();
        config.validate().unwrap();

        assert_eq!(config.experiment.trials, 5);
        assert_eq!(config.experiment.sample_size, 100);
        assert_eq!(config.attackers.cluster_size, 2);
        assert_eq!(config.walk_length.values().len(), 10);
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let config: ExperimentConfig = toml::from_str("").unwrap();
        config.validate().unwrap();

        assert_eq!(config.experiment.r0, 4);
        assert_eq!(config.attack_edges.values().first(), Some(&10));
    }

    #[test]
    fn test_sweep_values() {
        let range = SweepRange {
            initial: 5,
            step: 5,
            last: 20,
        };
        assert_eq!(range.values(), vec![5, 10, 15, 20]);

        let uneven = SweepRange {
            initial: 1,
            step: 4,
            last: 10,
        };
        assert_eq!(uneven.values(), vec![1, 5, 9]);
    }

    #[test]
    fn test_zero_step_is_rejected() {
        let config: ExperimentConfig =
            toml::from_str("[walk_length]\ninitial = 10\nstep = 0\nfinal = 20\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_descending_range_is_rejected() {
        let config: ExperimentConfig =
            toml::from_str("[attack_edges]\ninitial = 30\nstep = 10\nfinal = 20\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tiny_sample_is_rejected() {
        let config: ExperimentConfig = toml::from_str("[experiment]\nsample_size = 1\n").unwrap();
        assert!(config.validate().is_err());
    }
}
