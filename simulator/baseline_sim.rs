// Baseline Epidemic Simulation
//
// Infection spread over a scale-free contact network without any
// vaccination; immunity comes from recoveries alone.

mod harness;

use epi_rust::{Simulation, SimulationConfig};
use harness::ConsoleStepSink;
use log::info;
use simple_logger::SimpleLogger;

fn main() {
    SimpleLogger::new().init().unwrap();

    info!("Setting up baseline epidemic simulation...");

    let config = SimulationConfig::delta_baseline();

    info!("Configuration:");
    info!("  Population: {}", config.population_size);
    info!("  Initial infected: {}", config.initial_infected);
    info!("  Steps: {}", config.time_steps);
    info!("  R0: {}", config.r0);
    info!("  Infection prob: {:.4}", config.probabilities.infection);
    info!("  Recovery prob: {:.4}", config.probabilities.recovery);
    info!("  Death prob: {:.4}", config.probabilities.death);
    info!("");

    let sim = Simulation::new(config).expect("invalid configuration");

    info!("Starting simulation...");
    let mut sink = ConsoleStepSink::new(true);
    let result = sim.run_with_sink(&mut sink);

    info!("✓ Simulation complete!");
    result.print_summary();
}
