// Mass Vaccination Simulation
//
// Same parameterization as the baseline, with 5% of eligible nodes
// (susceptible or recovered) vaccinated after every step.

mod harness;

use epi_rust::{Simulation, SimulationConfig};
use harness::CollectorStepSink;
use log::info;
use simple_logger::SimpleLogger;

fn main() {
    SimpleLogger::new().init().unwrap();

    info!("Setting up mass vaccination simulation...");

    let config = SimulationConfig::delta_mass_vaccination();

    info!("Configuration:");
    info!("  Population: {}", config.population_size);
    info!("  Initial infected: {}", config.initial_infected);
    info!("  Steps: {}", config.time_steps);
    info!("  R0: {}", config.r0);
    info!("  Mode: {:?}", config.mode);
    info!("");

    let sim = Simulation::new(config).expect("invalid configuration");

    info!("Starting simulation...");
    let mut sink = CollectorStepSink::new();
    let result = sim.run_with_sink(&mut sink);

    info!("✓ Simulation complete!");
    info!("Peak infected: {}", sink.peak_infected());
    info!("Total vaccinated: {}", result.final_snapshot.total_vaccinated);
    match sink.first_herd_immunity_step() {
        Some(step) => info!("Herd immunity first held at step {}", step),
        None => info!("Herd immunity not reached"),
    }
    result.print_summary();
}
