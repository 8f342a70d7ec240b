use crate::epi_interface::NodeId;
use crate::epi_state_machine::EpidemicStateMachine;
use rand::seq::SliceRandom;
use rand::Rng;

/// Immunizes a fraction of the eligible population after each step
///
/// Eligible nodes are those currently Susceptible or Recovered; Infected,
/// Dead, and already-Vaccinated nodes are never selected. Invoked only in
/// mass-vaccination mode.
pub struct VaccinationPolicy {
    /// Fraction of eligible nodes vaccinated per application (0.0 to 1.0)
    rate: f64,
}

impl VaccinationPolicy {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Vaccinate `floor(rate × |eligible|)` distinct eligible nodes, chosen
    /// uniformly without replacement. An empty eligible set is a no-op.
    /// Returns the nodes vaccinated this application.
    pub fn apply<R: Rng>(
        &self,
        machine: &mut EpidemicStateMachine,
        rng: &mut R,
    ) -> Vec<NodeId> {
        let eligible: Vec<NodeId> = machine
            .states()
            .iter()
            .enumerate()
            .filter(|(_, state)| state.is_susceptible() || state.is_recovered())
            .map(|(node, _)| node)
            .collect();

        let num_to_vaccinate = ((self.rate * eligible.len() as f64) as usize).min(eligible.len());
        let selected: Vec<NodeId> = eligible
            .choose_multiple(rng, num_to_vaccinate)
            .copied()
            .collect();

        machine.mark_vaccinated(&selected);
        selected
    }
}
