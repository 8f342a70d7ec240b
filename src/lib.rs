//! # epiRust - Network Epidemic Simulation
//!
//! A Rust implementation of a stochastic epidemic model on a fixed contact
//! network. Disease spreads over discrete time steps through independent
//! per-contact Bernoulli trials, with optional mass vaccination and
//! herd-immunity tracking.
//!
//! ## Core Components
//!
//! - **ContactNetwork**: immutable scale-free (or ring) contact graph built
//!   once by preferential attachment
//! - **EpidemicStateMachine**: per-node health states advanced one step at a
//!   time with a snapshot-then-apply discipline
//! - **VaccinationPolicy**: immunizes a fraction of eligible nodes per step
//! - **MetricsCollector**: per-step counts, time series, herd-immunity level
//! - **Simulation**: driver owning all of the above, one snapshot per step
//!
//! ## Usage with Rendering/Plotting Layers
//!
//! This library is I/O-agnostic. External collaborators (graph rendering,
//! video encoding, chart export) consume the per-step `StepSnapshot`, the
//! `color_classification()` node categories, and the final `TimeSeries`:
//!
//! ```no_run
//! use epi_rust::{Simulation, SimulationConfig};
//!
//! let config = SimulationConfig::delta_baseline();
//! let mut sim = Simulation::new(config).unwrap();
//!
//! // In your rendering loop:
//! // - Call sim.step() once per frame and draw from the snapshot
//! // - Call sim.color_classification() for per-node colors
//! let snapshot = sim.step();
//! println!("infected: {}", snapshot.counts.infected);
//! ```
//!
//! ## Testing and Simulation
//!
//! Every run is driven by one seedable random source, so a fixed seed
//! reproduces the entire trajectory. For scenario files, sinks, and demo
//! binaries see the `simulator/` directory.

// Core simulation modules
pub mod epi_interface;
pub mod epi_metrics;
pub mod epi_network;
pub mod epi_simulation;
pub mod epi_state_machine;
pub mod epi_vaccination;

// Re-export commonly used types
pub use epi_interface::{
    HealthState, NoOpSink, NodeId, SimError, SimulationMode, StateColor, StateCounts,
    StepChanges, StepIndex, StepSink, StepSnapshot,
};
pub use epi_metrics::{MetricsCollector, TimeSeries};
pub use epi_network::{ContactNetwork, Topology};
pub use epi_simulation::{Simulation, SimulationConfig, SimulationResult};
pub use epi_state_machine::{EpidemicStateMachine, TransitionProbabilities};
pub use epi_vaccination::VaccinationPolicy;
