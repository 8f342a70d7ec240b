// all indices into the node table; usize to allow direct Vec indexing
pub type NodeId = usize;

/// Discrete simulation time, 1-based (step 0 is the pre-run state)
pub type StepIndex = usize;

// ============================================================================
// Health States
// ============================================================================

/// State of a node in the epidemic lifecycle
///
/// `Dead` and `Vaccinated` are absorbing: a node that reaches either never
/// transitions again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    /// Can be infected by an infected neighbor
    Susceptible,

    /// Actively infectious towards susceptible neighbors
    Infected,

    /// Cleared the infection; counts towards population immunity
    Recovered,

    /// Removed from the population (absorbing)
    Dead,

    /// Immunized; counts towards population immunity (absorbing)
    Vaccinated,
}

impl HealthState {
    pub fn is_susceptible(&self) -> bool {
        matches!(self, HealthState::Susceptible)
    }

    pub fn is_infected(&self) -> bool {
        matches!(self, HealthState::Infected)
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, HealthState::Recovered)
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, HealthState::Dead)
    }

    pub fn is_vaccinated(&self) -> bool {
        matches!(self, HealthState::Vaccinated)
    }

    /// Absorbing states never leave once entered
    pub fn is_terminal(&self) -> bool {
        matches!(self, HealthState::Dead | HealthState::Vaccinated)
    }

    /// Fixed visualization category for this state
    pub fn color(&self) -> StateColor {
        match self {
            HealthState::Susceptible => StateColor::Yellow,
            HealthState::Infected => StateColor::Red,
            HealthState::Recovered => StateColor::Blue,
            HealthState::Dead => StateColor::Grey,
            HealthState::Vaccinated => StateColor::Green,
        }
    }
}

/// The five fixed node categories used by external renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateColor {
    Yellow,
    Red,
    Blue,
    Grey,
    Green,
}

// ============================================================================
// Simulation Mode
// ============================================================================

/// Which of the two simulation variants is running
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimulationMode {
    /// Infection spread only; immunity comes from recoveries
    Baseline,

    /// A fraction of eligible nodes is vaccinated after every step
    MassVaccination {
        /// Fraction of eligible nodes vaccinated per step (0.0 to 1.0)
        rate: f64,
    },
}

impl SimulationMode {
    pub fn includes_vaccination(&self) -> bool {
        matches!(self, SimulationMode::MassVaccination { .. })
    }
}

// ============================================================================
// Per-Step Aggregates
// ============================================================================

/// Node counts per health state at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateCounts {
    pub susceptible: usize,
    pub infected: usize,
    pub recovered: usize,
    pub dead: usize,
    pub vaccinated: usize,
}

impl StateCounts {
    /// Count states in a node state vector
    pub fn tally(states: &[HealthState]) -> Self {
        let mut counts = StateCounts::default();
        for state in states {
            match state {
                HealthState::Susceptible => counts.susceptible += 1,
                HealthState::Infected => counts.infected += 1,
                HealthState::Recovered => counts.recovered += 1,
                HealthState::Dead => counts.dead += 1,
                HealthState::Vaccinated => counts.vaccinated += 1,
            }
        }
        counts
    }

    /// Sum over all states; always equals the population size
    pub fn total(&self) -> usize {
        self.susceptible + self.infected + self.recovered + self.dead + self.vaccinated
    }
}

/// Nodes that changed state during one step, grouped by transition
#[derive(Debug, Clone, Default)]
pub struct StepChanges {
    /// Susceptible nodes that became Infected
    pub infected: Vec<NodeId>,

    /// Infected nodes that became Recovered
    pub recovered: Vec<NodeId>,

    /// Infected nodes that became Dead
    pub died: Vec<NodeId>,
}

/// Aggregate view of the population after one step, consumed by external
/// rendering and plotting collaborators
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSnapshot {
    /// Step this snapshot was taken after (1-based; 0 is the initial state)
    pub step: StepIndex,

    /// Node counts per state
    pub counts: StateCounts,

    /// Cumulative deaths since the start of the run
    pub total_deceased: usize,

    /// Cumulative vaccinations since the start of the run
    pub total_vaccinated: usize,

    /// Immune fraction of the population (recovered, plus vaccinated in
    /// mass-vaccination mode)
    pub immune_fraction: f64,

    /// Whether the immune fraction is at or above the herd-immunity
    /// threshold. Level condition: stays true on every later step where the
    /// fraction still holds.
    pub herd_immunity: bool,
}

// ============================================================================
// Errors
// ============================================================================

/// Errors that can occur during simulation setup
///
/// Construction is the only failure surface; once a simulation is built,
/// stepping is total over valid state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A construction parameter was out of range
    InvalidParameter(&'static str),
}

// ============================================================================
// Snapshot Consumers
// ============================================================================

/// Trait for consuming per-step snapshots from the simulation
pub trait StepSink {
    fn on_step(&mut self, snapshot: &StepSnapshot);
}

/// No-op sink for runs where nobody is watching (zero overhead)
pub struct NoOpSink;

impl StepSink for NoOpSink {
    #[inline(always)]
    fn on_step(&mut self, _snapshot: &StepSnapshot) {
        // Intentionally empty - compiler should optimize this away
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_helpers() {
        assert!(HealthState::Susceptible.is_susceptible());
        assert!(HealthState::Infected.is_infected());
        assert!(HealthState::Recovered.is_recovered());
        assert!(HealthState::Dead.is_dead());
        assert!(HealthState::Vaccinated.is_vaccinated());

        assert!(HealthState::Dead.is_terminal());
        assert!(HealthState::Vaccinated.is_terminal());
        assert!(!HealthState::Recovered.is_terminal());
        assert!(!HealthState::Infected.is_terminal());
    }

    #[test]
    fn each_state_has_a_distinct_color() {
        let states = [
            HealthState::Susceptible,
            HealthState::Infected,
            HealthState::Recovered,
            HealthState::Dead,
            HealthState::Vaccinated,
        ];

        for (i, a) in states.iter().enumerate() {
            for b in &states[i + 1..] {
                assert_ne!(a.color(), b.color());
            }
        }
        assert_eq!(HealthState::Susceptible.color(), StateColor::Yellow);
        assert_eq!(HealthState::Infected.color(), StateColor::Red);
    }

    #[test]
    fn tally_accounts_for_every_node() {
        let states = vec![
            HealthState::Susceptible,
            HealthState::Susceptible,
            HealthState::Infected,
            HealthState::Recovered,
            HealthState::Dead,
            HealthState::Vaccinated,
        ];

        let counts = StateCounts::tally(&states);
        assert_eq!(counts.susceptible, 2);
        assert_eq!(counts.infected, 1);
        assert_eq!(counts.recovered, 1);
        assert_eq!(counts.dead, 1);
        assert_eq!(counts.vaccinated, 1);
        assert_eq!(counts.total(), states.len());
    }

    #[test]
    fn mode_helpers() {
        assert!(!SimulationMode::Baseline.includes_vaccination());
        assert!(SimulationMode::MassVaccination { rate: 0.05 }.includes_vaccination());
    }
}
