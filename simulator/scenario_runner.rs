// Scenario Runner - Load and execute scenario YAML files
//
// Usage:
//   cargo run --bin scenario_runner scenarios/baseline.yaml
//   cargo run --bin scenario_runner scenarios/  (runs all .yaml files in directory)
//   cargo run --bin scenario_runner scenarios/baseline.yaml --seed 42

mod harness;

use epi_rust::Simulation;
use harness::{ConsoleStepSink, CsvStepSink, MultiStepSink, ScenarioFile};
use log::info;
use simple_logger::SimpleLogger;
use std::env;
use std::fs;
use std::path::Path;

fn main() {
    SimpleLogger::new().init().unwrap();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <scenario.yaml | directory/> [--seed SEED]", args[0]);
        eprintln!("\nExamples:");
        eprintln!("  {} scenarios/baseline.yaml", args[0]);
        eprintln!("  {} scenarios/", args[0]);
        eprintln!("  {} scenarios/baseline.yaml --seed 42", args[0]);
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);

    // Parse optional seed
    let seed: Option<u64> = if args.len() >= 4 && args[2] == "--seed" {
        Some(parse_seed(&args[3]))
    } else {
        None
    };

    if path.is_file() {
        run_scenario_file(path, seed);
    } else if path.is_dir() {
        run_scenario_directory(path, seed);
    } else {
        eprintln!("Error: Path does not exist: {}", path.display());
        std::process::exit(1);
    }
}

fn run_scenario_directory(dir: &Path, seed: Option<u64>) {
    let mut scenarios = Vec::new();

    // Find all .yaml files
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("yaml")
                || path.extension().and_then(|s| s.to_str()) == Some("yml")
            {
                scenarios.push(path);
            }
        }
    }

    scenarios.sort();

    if scenarios.is_empty() {
        eprintln!("No .yaml files found in {}", dir.display());
        std::process::exit(1);
    }

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  SCENARIO RUNNER - Multiple Scenarios                  ║");
    println!("╚════════════════════════════════════════════════════════╝\n");
    println!("Found {} scenario(s) to run\n", scenarios.len());

    for (i, scenario_path) in scenarios.iter().enumerate() {
        println!("\n{}/{} Running: {}\n", i + 1, scenarios.len(), scenario_path.display());
        run_scenario_file(scenario_path, seed);
    }
}

fn run_scenario_file(path: &Path, seed_override: Option<u64>) {
    let scenario = match ScenarioFile::load(path) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(name) = &scenario.meta.name {
        info!("Scenario: {}", name);
    }
    if let Some(description) = &scenario.meta.description {
        info!("  {}", description);
    }

    let config = scenario.to_simulation_config(seed_override);
    let include_vaccinated = config.mode.includes_vaccination();

    let sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Error: invalid scenario configuration: {:?}", e);
            std::process::exit(1);
        }
    };

    let mut sinks = MultiStepSink::new();
    if scenario.output.console {
        sinks.add_sink(Box::new(ConsoleStepSink::new(true)));
    }
    if let Some(csv_path) = &scenario.output.csv_path {
        match CsvStepSink::new(csv_path, include_vaccinated) {
            Ok(sink) => sinks.add_sink(Box::new(sink)),
            Err(e) => {
                eprintln!("Error: failed to create {}: {}", csv_path, e);
                std::process::exit(1);
            }
        }
    }

    let result = sim.run_with_sink(&mut sinks);
    result.print_summary();

    if let Some(step) = result.herd_immunity_step {
        info!("Herd immunity reached at step {}", step);
    }
    if let Some(csv_path) = &scenario.output.csv_path {
        info!("Time series written to {}", csv_path);
    }
}

fn parse_seed(text: &str) -> u64 {
    let parsed = if let Some(hex) = text.strip_prefix("0x") {
        u64::from_str_radix(hex, 16)
    } else {
        text.parse()
    };

    match parsed {
        Ok(seed) => seed,
        Err(_) => {
            eprintln!("Error: invalid seed: {}", text);
            std::process::exit(1);
        }
    }
}
