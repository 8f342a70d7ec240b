//! Scenario file format for the scenario runner

use epi_rust::{SimulationConfig, SimulationMode, Topology, TransitionProbabilities};
use serde::Deserialize;
use std::path::Path;

/// A scenario YAML file
#[derive(Debug, Deserialize)]
pub struct ScenarioFile {
    /// Scenario metadata
    #[serde(default)]
    pub meta: ScenarioMeta,

    /// Simulation configuration
    pub config: ScenarioConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScenarioMeta {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScenarioConfig {
    pub population_size: usize,
    pub initial_infected: usize,
    pub time_steps: usize,
    pub r0: f64,

    pub topology: TopologyConfig,
    pub probabilities: ProbabilityConfig,

    /// Enables mass-vaccination mode when present
    #[serde(default)]
    pub vaccination_rate: Option<f64>,

    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TopologyConfig {
    PreferentialAttachment { attachment_m: usize },
    Ring { neighbors: usize },
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ProbabilityConfig {
    pub infection: f64,
    pub recovery: f64,
    pub death: f64,
}

/// Where the run's output goes
#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Print one line per step to the console
    #[serde(default)]
    pub console: bool,

    /// Time-series CSV output path
    #[serde(default)]
    pub csv_path: Option<String>,
}

impl ScenarioFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let text = std::fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {}", path.as_ref().display(), e))?;
        serde_yaml::from_str(&text)
            .map_err(|e| format!("failed to parse {}: {}", path.as_ref().display(), e))
    }

    /// Convert into the library configuration, optionally forcing a seed
    pub fn to_simulation_config(&self, seed_override: Option<u64>) -> SimulationConfig {
        let c = &self.config;

        SimulationConfig {
            population_size: c.population_size,
            initial_infected: c.initial_infected,
            topology: match c.topology {
                TopologyConfig::PreferentialAttachment { attachment_m } => {
                    Topology::PreferentialAttachment { attachment_m }
                }
                TopologyConfig::Ring { neighbors } => Topology::Ring { neighbors },
            },
            probabilities: TransitionProbabilities {
                infection: c.probabilities.infection,
                recovery: c.probabilities.recovery,
                death: c.probabilities.death,
            },
            r0: c.r0,
            mode: match c.vaccination_rate {
                Some(rate) => SimulationMode::MassVaccination { rate },
                None => SimulationMode::Baseline,
            },
            time_steps: c.time_steps,
            seed: seed_override.or(c.seed),
        }
    }
}
