// Simulation Harness Module

pub mod scenarios;
pub mod sinks;

// Re-export commonly used types
pub use scenarios::{OutputConfig, ScenarioConfig, ScenarioFile, TopologyConfig};
pub use sinks::{CollectorStepSink, ConsoleStepSink, CsvStepSink, MultiStepSink};
