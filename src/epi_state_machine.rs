use crate::epi_interface::{HealthState, NodeId, SimError, StateCounts, StepChanges};
use crate::epi_network::ContactNetwork;
use rand::seq::SliceRandom;
use rand::Rng;

// ============================================================================
// Transition Probabilities
// ============================================================================

/// Per-step Bernoulli probabilities for the three stochastic transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionProbabilities {
    /// Chance that an infected node infects one susceptible neighbor
    pub infection: f64,

    /// Chance that an infected node recovers this step
    pub recovery: f64,

    /// Chance that an infected node dies this step, evaluated only when the
    /// recovery trial failed
    pub death: f64,
}

impl TransitionProbabilities {
    /// Derive the per-contact probabilities from epidemiological parameters:
    /// `infection = r0 / (infectious_period × average_degree)` and
    /// `recovery = infection / r0`.
    pub fn from_reproduction_number(
        r0: f64,
        infectious_period: f64,
        average_degree: f64,
        death: f64,
    ) -> Self {
        let infection = r0 / (infectious_period * average_degree);
        Self {
            infection,
            recovery: infection / r0,
            death,
        }
    }

    /// Check that every probability is a valid Bernoulli parameter
    pub fn validate(&self) -> Result<(), SimError> {
        for (value, message) in [
            (self.infection, "infection_prob must be within [0, 1]"),
            (self.recovery, "recovery_prob must be within [0, 1]"),
            (self.death, "death_prob must be within [0, 1]"),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimError::InvalidParameter(message));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Epidemic State Machine
// ============================================================================

/// Per-node health states plus the cumulative outcome counters
///
/// `step()` follows a snapshot-then-apply discipline: every transition
/// decision for a step is taken against the state vector as it was when the
/// step began, and all pending transitions are applied together at the end.
/// No decision within a step can observe another pending change, so results
/// do not depend on node iteration order.
pub struct EpidemicStateMachine {
    /// Current state per node, indexed by NodeId
    states: Vec<HealthState>,

    /// Transition probabilities, validated at construction
    probabilities: TransitionProbabilities,

    /// Total deaths since the start of the run (lifetime counter)
    total_deceased: usize,

    /// Total vaccinations since the start of the run (lifetime counter)
    total_vaccinated: usize,
}

impl EpidemicStateMachine {
    /// Create a machine with every node Susceptible
    pub fn new(
        population_size: usize,
        probabilities: TransitionProbabilities,
    ) -> Result<Self, SimError> {
        if population_size == 0 {
            return Err(SimError::InvalidParameter("population_size must be positive"));
        }
        probabilities.validate()?;

        Ok(Self {
            states: vec![HealthState::Susceptible; population_size],
            probabilities,
            total_deceased: 0,
            total_vaccinated: 0,
        })
    }

    /// Infect a uniformly-random subset of `count` distinct nodes
    pub fn seed_infections<R: Rng>(&mut self, count: usize, rng: &mut R) -> Result<(), SimError> {
        if count > self.states.len() {
            return Err(SimError::InvalidParameter(
                "initial_infected must not exceed population_size",
            ));
        }

        let nodes: Vec<NodeId> = (0..self.states.len()).collect();
        for &node in nodes.choose_multiple(rng, count) {
            self.states[node] = HealthState::Infected;
        }
        Ok(())
    }

    /// Advance every node by one time unit
    ///
    /// 1. Each infected node draws one infection trial per currently
    ///    susceptible neighbor; successes become pending infections
    ///    (idempotent - a neighbor pushed by several infectors is still one
    ///    pending infection).
    /// 2. Each infected node draws a recovery trial, and only on failure a
    ///    death trial. Recovery and death are mutually exclusive, recovery
    ///    first.
    /// 3. All pending transitions apply atomically.
    pub fn step<R: Rng>(&mut self, network: &ContactNetwork, rng: &mut R) -> StepChanges {
        let mut changes = StepChanges::default();
        let mut pending_infection = vec![false; self.states.len()];

        for node in 0..self.states.len() {
            if !self.states[node].is_infected() {
                continue;
            }

            // Try to infect susceptible neighbors
            for &neighbor in network.neighbors(node) {
                if self.states[neighbor].is_susceptible()
                    && rng.gen_bool(self.probabilities.infection)
                    && !pending_infection[neighbor]
                {
                    pending_infection[neighbor] = true;
                    changes.infected.push(neighbor);
                }
            }

            // Recovery or death outcome
            if rng.gen_bool(self.probabilities.recovery) {
                changes.recovered.push(node);
            } else if rng.gen_bool(self.probabilities.death) {
                changes.died.push(node);
            }
        }

        // Apply all pending transitions
        for &node in &changes.infected {
            self.states[node] = HealthState::Infected;
        }
        for &node in &changes.recovered {
            self.states[node] = HealthState::Recovered;
        }
        for &node in &changes.died {
            self.states[node] = HealthState::Dead;
            self.total_deceased += 1;
        }

        changes
    }

    /// Mark the given nodes Vaccinated and bump the lifetime counter
    ///
    /// Callers (the vaccination policy) are responsible for only passing
    /// nodes that are currently Susceptible or Recovered.
    pub(crate) fn mark_vaccinated(&mut self, nodes: &[NodeId]) {
        for &node in nodes {
            debug_assert!(
                self.states[node].is_susceptible() || self.states[node].is_recovered()
            );
            self.states[node] = HealthState::Vaccinated;
            self.total_vaccinated += 1;
        }
    }

    pub fn population_size(&self) -> usize {
        self.states.len()
    }

    /// Current state per node
    pub fn states(&self) -> &[HealthState] {
        &self.states
    }

    pub fn state_of(&self, node: NodeId) -> HealthState {
        self.states[node]
    }

    /// Current node counts per state
    pub fn counts(&self) -> StateCounts {
        StateCounts::tally(&self.states)
    }

    pub fn total_deceased(&self) -> usize {
        self.total_deceased
    }

    pub fn total_vaccinated(&self) -> usize {
        self.total_vaccinated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn probabilities(infection: f64, recovery: f64, death: f64) -> TransitionProbabilities {
        TransitionProbabilities {
            infection,
            recovery,
            death,
        }
    }

    /// Single seeded node on a degree-2 ring, everything else Susceptible
    fn ring_machine(
        p: TransitionProbabilities,
        rng: &mut StdRng,
    ) -> (EpidemicStateMachine, ContactNetwork, NodeId) {
        let network = ContactNetwork::ring(10, 1).unwrap();
        let mut machine = EpidemicStateMachine::new(10, p).unwrap();
        machine.seed_infections(1, rng).unwrap();

        let seeded = machine
            .states()
            .iter()
            .position(|s| s.is_infected())
            .unwrap();
        (machine, network, seeded)
    }

    #[test]
    fn validation_rejects_out_of_range_probabilities() {
        assert!(probabilities(1.5, 0.0, 0.0).validate().is_err());
        assert!(probabilities(0.0, -0.1, 0.0).validate().is_err());
        assert!(probabilities(0.0, 0.0, 2.0).validate().is_err());
        assert!(probabilities(1.0, 1.0, 1.0).validate().is_ok());
    }

    #[test]
    fn derived_probabilities_match_the_epidemiological_parameters() {
        let p = TransitionProbabilities::from_reproduction_number(5.08, 5.0, 6.0, 0.01);
        assert!((p.infection - 5.08 / 30.0).abs() < 1e-12);
        assert!((p.recovery - p.infection / 5.08).abs() < 1e-12);
        assert_eq!(p.death, 0.01);
    }

    #[test]
    fn seed_infections_infects_exactly_count_nodes() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut machine =
            EpidemicStateMachine::new(50, probabilities(0.5, 0.1, 0.01)).unwrap();
        machine.seed_infections(20, &mut rng).unwrap();

        assert_eq!(machine.counts().infected, 20);
        assert_eq!(machine.counts().susceptible, 30);
    }

    #[test]
    fn seed_infections_rejects_more_than_population() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut machine = EpidemicStateMachine::new(10, probabilities(0.5, 0.1, 0.01)).unwrap();
        assert!(machine.seed_infections(11, &mut rng).is_err());
    }

    #[test]
    fn certain_infection_reaches_exactly_the_ring_neighbors() {
        let mut rng = StdRng::seed_from_u64(17);
        let (mut machine, network, seeded) =
            ring_machine(probabilities(1.0, 0.0, 0.0), &mut rng);

        let changes = machine.step(&network, &mut rng);

        // The seed stays infected, both ring neighbors catch it, nobody else
        assert_eq!(changes.infected.len(), 2);
        assert!(changes.recovered.is_empty());
        assert!(changes.died.is_empty());

        let counts = machine.counts();
        assert_eq!(counts.infected, 3);
        assert_eq!(counts.susceptible, 7);
        assert!(machine.state_of(seeded).is_infected());
        assert!(machine.state_of((seeded + 1) % 10).is_infected());
        assert!(machine.state_of((seeded + 9) % 10).is_infected());
    }

    #[test]
    fn certain_recovery_clears_the_seed_in_one_step() {
        let mut rng = StdRng::seed_from_u64(23);
        let (mut machine, network, seeded) =
            ring_machine(probabilities(0.0, 1.0, 0.0), &mut rng);

        machine.step(&network, &mut rng);

        let counts = machine.counts();
        assert_eq!(counts.susceptible, 9);
        assert_eq!(counts.infected, 0);
        assert_eq!(counts.recovered, 1);
        assert!(machine.state_of(seeded).is_recovered());
    }

    #[test]
    fn recovery_takes_priority_over_death() {
        // Even with certain death, a certain recovery wins every time
        let mut rng = StdRng::seed_from_u64(29);
        let network = ContactNetwork::ring(20, 1).unwrap();
        let mut machine =
            EpidemicStateMachine::new(20, probabilities(0.0, 1.0, 1.0)).unwrap();
        machine.seed_infections(20, &mut rng).unwrap();

        machine.step(&network, &mut rng);

        let counts = machine.counts();
        assert_eq!(counts.recovered, 20);
        assert_eq!(counts.dead, 0);
        assert_eq!(machine.total_deceased(), 0);
    }

    #[test]
    fn zero_infection_probability_never_spreads() {
        let mut rng = StdRng::seed_from_u64(31);
        let network = ContactNetwork::preferential_attachment(100, 3, &mut rng).unwrap();
        let mut machine =
            EpidemicStateMachine::new(100, probabilities(0.0, 0.2, 0.05)).unwrap();
        machine.seed_infections(10, &mut rng).unwrap();

        for _ in 0..50 {
            machine.step(&network, &mut rng);
            // Recoveries and deaths may shrink it, nothing grows it
            assert!(machine.counts().infected <= 10);
        }
    }

    #[test]
    fn no_seed_means_no_epidemic() {
        let mut rng = StdRng::seed_from_u64(37);
        let network = ContactNetwork::preferential_attachment(60, 2, &mut rng).unwrap();
        let mut machine =
            EpidemicStateMachine::new(60, probabilities(1.0, 0.5, 0.5)).unwrap();
        machine.seed_infections(0, &mut rng).unwrap();

        for _ in 0..20 {
            machine.step(&network, &mut rng);
            assert_eq!(machine.counts().infected, 0);
        }
        assert_eq!(machine.counts().susceptible, 60);
    }

    #[test]
    fn state_counts_always_sum_to_population() {
        let mut rng = StdRng::seed_from_u64(41);
        let network = ContactNetwork::preferential_attachment(120, 3, &mut rng).unwrap();
        let mut machine =
            EpidemicStateMachine::new(120, probabilities(0.3, 0.1, 0.05)).unwrap();
        machine.seed_infections(5, &mut rng).unwrap();

        for _ in 0..100 {
            machine.step(&network, &mut rng);
            assert_eq!(machine.counts().total(), 120);
        }
    }

    #[test]
    fn deceased_counter_is_monotone_and_dead_stay_dead() {
        let mut rng = StdRng::seed_from_u64(43);
        let network = ContactNetwork::preferential_attachment(100, 3, &mut rng).unwrap();
        let mut machine =
            EpidemicStateMachine::new(100, probabilities(0.4, 0.05, 0.2)).unwrap();
        machine.seed_infections(10, &mut rng).unwrap();

        let mut last_deceased = 0;
        let mut ever_dead: Vec<NodeId> = Vec::new();

        for _ in 0..80 {
            machine.step(&network, &mut rng);

            assert!(machine.total_deceased() >= last_deceased);
            last_deceased = machine.total_deceased();

            for &node in &ever_dead {
                assert!(machine.state_of(node).is_dead());
            }
            for (node, state) in machine.states().iter().enumerate() {
                if state.is_dead() && !ever_dead.contains(&node) {
                    ever_dead.push(node);
                }
            }
        }
        assert_eq!(machine.total_deceased(), machine.counts().dead);
    }
}
