use crate::epi_interface::{
    HealthState, NoOpSink, SimError, SimulationMode, StateColor, StepIndex, StepSink,
    StepSnapshot,
};
use crate::epi_metrics::{MetricsCollector, TimeSeries};
use crate::epi_network::{ContactNetwork, Topology};
use crate::epi_state_machine::{EpidemicStateMachine, TransitionProbabilities};
use crate::epi_vaccination::VaccinationPolicy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// Configuration
// ============================================================================

/// Full configuration for one simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Number of nodes in the population
    pub population_size: usize,

    /// Nodes infected at step 0, chosen uniformly at random
    pub initial_infected: usize,

    /// Contact network shape
    pub topology: Topology,

    /// Per-step transition probabilities
    pub probabilities: TransitionProbabilities,

    /// Basic reproduction number; only used for the herd-immunity threshold
    pub r0: f64,

    /// Baseline or mass vaccination
    pub mode: SimulationMode,

    /// Number of steps to run; the horizon is fixed, there is no early stop
    pub time_steps: usize,

    /// Random seed for reproducibility; `None` draws one from the thread RNG
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// Parameterization of the original Delta-variant study: 1000 nodes,
    /// 20 seed infections, attachment 3 (average degree 6), R0 = 5.08,
    /// 5-step infectious period, 1% death chance, 100 steps.
    pub fn delta_baseline() -> Self {
        let r0 = 5.08;
        let infectious_period = 5.0;
        let average_degree = 6.0;

        Self {
            population_size: 1000,
            initial_infected: 20,
            topology: Topology::PreferentialAttachment { attachment_m: 3 },
            probabilities: TransitionProbabilities::from_reproduction_number(
                r0,
                infectious_period,
                average_degree,
                0.01,
            ),
            r0,
            mode: SimulationMode::Baseline,
            time_steps: 100,
            seed: None,
        }
    }

    /// Same parameterization with 5% of eligible nodes vaccinated per step
    pub fn delta_mass_vaccination() -> Self {
        let mut config = Self::delta_baseline();
        config.mode = SimulationMode::MassVaccination { rate: 0.05 };
        config
    }

    /// Validate everything except the topology parameters, which the network
    /// builder checks itself
    pub fn validate(&self) -> Result<(), SimError> {
        if self.population_size == 0 {
            return Err(SimError::InvalidParameter("population_size must be positive"));
        }
        if self.initial_infected > self.population_size {
            return Err(SimError::InvalidParameter(
                "initial_infected must not exceed population_size",
            ));
        }
        self.probabilities.validate()?;
        if let SimulationMode::MassVaccination { rate } = self.mode {
            if !(0.0..=1.0).contains(&rate) {
                return Err(SimError::InvalidParameter(
                    "vaccination_rate must be within [0, 1]",
                ));
            }
        }
        if self.time_steps == 0 {
            return Err(SimError::InvalidParameter("time_steps must be positive"));
        }
        if !(self.r0.is_finite() && self.r0 > 0.0) {
            return Err(SimError::InvalidParameter("r0 must be positive"));
        }
        Ok(())
    }

    /// One-line description for logs and result summaries
    pub fn summary(&self) -> String {
        format!(
            "Population: {}, Topology: {:?}, Steps: {}, Mode: {:?}",
            self.population_size, self.topology, self.time_steps, self.mode
        )
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::delta_baseline()
    }
}

// ============================================================================
// Simulation Driver
// ============================================================================

/// Owns the network, state machine, optional vaccination policy, and metrics,
/// and advances them in fixed order one step at a time
pub struct Simulation {
    config: SimulationConfig,
    network: ContactNetwork,
    machine: EpidemicStateMachine,
    vaccination: Option<VaccinationPolicy>,
    metrics: MetricsCollector,

    /// Single seeded source of randomness for the whole run
    rng: StdRng,

    /// Seed actually used (recorded even when the config left it to chance)
    seed_used: u64,

    current_step: StepIndex,
    last_snapshot: StepSnapshot,
}

impl Simulation {
    /// Validate the configuration, build the contact network, and seed the
    /// initial infections
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        config.validate()?;

        let seed_used = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut rng = StdRng::seed_from_u64(seed_used);

        let network = ContactNetwork::build(config.population_size, &config.topology, &mut rng)?;

        let mut machine = EpidemicStateMachine::new(config.population_size, config.probabilities)?;
        machine.seed_infections(config.initial_infected, &mut rng)?;

        let vaccination = match config.mode {
            SimulationMode::MassVaccination { rate } => Some(VaccinationPolicy::new(rate)),
            SimulationMode::Baseline => None,
        };

        let metrics = MetricsCollector::new(config.mode, config.population_size, config.r0);
        let last_snapshot = metrics.peek(0, machine.counts(), 0, 0);

        Ok(Self {
            config,
            network,
            machine,
            vaccination,
            metrics,
            rng,
            seed_used,
            current_step: 0,
            last_snapshot,
        })
    }

    /// Advance one step: state machine, then vaccination (if enabled), then
    /// metrics. Returns the snapshot external consumers render from.
    pub fn step(&mut self) -> StepSnapshot {
        self.machine.step(&self.network, &mut self.rng);

        if let Some(policy) = &self.vaccination {
            policy.apply(&mut self.machine, &mut self.rng);
        }

        self.current_step += 1;
        let snapshot = self.metrics.record(
            self.current_step,
            self.machine.counts(),
            self.machine.total_deceased(),
            self.machine.total_vaccinated(),
        );
        self.last_snapshot = snapshot;
        snapshot
    }

    /// Run the configured number of steps with nobody watching
    pub fn run(self) -> SimulationResult {
        let mut sink = NoOpSink;
        self.run_with_sink(&mut sink)
    }

    /// Run the configured number of steps, handing every snapshot to `sink`
    pub fn run_with_sink(mut self, sink: &mut dyn StepSink) -> SimulationResult {
        for _ in 0..self.config.time_steps {
            let snapshot = self.step();
            sink.on_step(&snapshot);
        }
        self.into_result()
    }

    fn into_result(self) -> SimulationResult {
        let herd_immunity_threshold = self.metrics.herd_immunity_threshold();
        let herd_immunity_step = self.metrics.first_herd_immunity_step();

        SimulationResult {
            config_summary: self.config.summary(),
            seed_used: self.seed_used,
            total_steps: self.current_step,
            final_snapshot: self.last_snapshot,
            herd_immunity_threshold,
            herd_immunity_step,
            time_series: self.metrics.into_series(),
        }
    }

    /// Map every node to its visualization category. Pure function of the
    /// current state, no side effects.
    pub fn color_classification(&self) -> Vec<StateColor> {
        self.machine.states().iter().map(|s| s.color()).collect()
    }

    pub fn node_states(&self) -> &[HealthState] {
        self.machine.states()
    }

    pub fn network(&self) -> &ContactNetwork {
        &self.network
    }

    pub fn time_series(&self) -> &TimeSeries {
        self.metrics.series()
    }

    pub fn current_step(&self) -> StepIndex {
        self.current_step
    }

    pub fn last_snapshot(&self) -> &StepSnapshot {
        &self.last_snapshot
    }

    pub fn seed_used(&self) -> u64 {
        self.seed_used
    }
}

// ============================================================================
// Simulation Result
// ============================================================================

/// Complete outcome of a finished run
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Configuration summary
    pub config_summary: String,

    /// Random seed used
    pub seed_used: u64,

    /// Total steps executed
    pub total_steps: usize,

    /// Snapshot after the last step
    pub final_snapshot: StepSnapshot,

    /// `1 - 1/R0`
    pub herd_immunity_threshold: f64,

    /// First step at which the immune fraction reached the threshold
    pub herd_immunity_step: Option<StepIndex>,

    /// Full per-step count series for external plotting
    pub time_series: TimeSeries,
}

impl SimulationResult {
    /// Print summary to console
    pub fn print_summary(&self) {
        let population = self.final_snapshot.counts.total() as f64;
        let percent = |count: usize| 100.0 * count as f64 / population;

        println!("\n╔════════════════════════════════════════════════════════╗");
        println!("║    EPIDEMIC SIMULATION RESULTS                         ║");
        println!("╚════════════════════════════════════════════════════════╝\n");

        println!("Configuration: {}", self.config_summary);
        println!("Seed: {}", self.seed_used);
        println!("Steps: {}", self.total_steps);
        println!();

        let counts = &self.final_snapshot.counts;
        println!("═══ Final State ═══");
        println!("  Susceptible: {:5} ({:.1}%)", counts.susceptible, percent(counts.susceptible));
        println!("  Infected:    {:5} ({:.1}%)", counts.infected, percent(counts.infected));
        println!("  Recovered:   {:5} ({:.1}%)", counts.recovered, percent(counts.recovered));
        println!("  Dead:        {:5} ({:.1}%)", counts.dead, percent(counts.dead));
        println!("  Vaccinated:  {:5} ({:.1}%)", counts.vaccinated, percent(counts.vaccinated));
        println!();

        println!("═══ Immunity ═══");
        println!("  Immune Fraction: {:.1}%", 100.0 * self.final_snapshot.immune_fraction);
        println!("  Herd Threshold:  {:.1}%", 100.0 * self.herd_immunity_threshold);
        match self.herd_immunity_step {
            Some(step) => println!("  Herd immunity reached at step {}", step),
            None => println!("  Herd immunity not reached"),
        }
        println!();
    }
}
