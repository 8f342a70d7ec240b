use crate::epi_interface::{SimulationMode, StateCounts, StepIndex, StepSnapshot};

// ============================================================================
// Time Series
// ============================================================================

/// Per-step count sequences, one entry per recorded step
///
/// The `vaccinated` sequence is only populated in mass-vaccination mode;
/// baseline runs leave it empty. The series is the export surface for
/// external plotting collaborators - the core itself never touches a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeSeries {
    pub susceptible: Vec<usize>,
    pub infected: Vec<usize>,
    pub recovered: Vec<usize>,
    pub dead: Vec<usize>,
    pub vaccinated: Vec<usize>,
}

impl TimeSeries {
    /// Number of recorded steps
    pub fn len(&self) -> usize {
        self.susceptible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.susceptible.is_empty()
    }
}

// ============================================================================
// Metrics Collector
// ============================================================================

/// Aggregates per-step counts and evaluates the herd-immunity condition
pub struct MetricsCollector {
    mode: SimulationMode,
    population_size: usize,

    /// `1 - 1/R0`
    herd_immunity_threshold: f64,

    series: TimeSeries,

    /// First step at which the herd-immunity level held, if any
    first_herd_immunity_step: Option<StepIndex>,
}

impl MetricsCollector {
    pub fn new(mode: SimulationMode, population_size: usize, r0: f64) -> Self {
        Self {
            mode,
            population_size,
            herd_immunity_threshold: 1.0 - 1.0 / r0,
            series: TimeSeries::default(),
            first_herd_immunity_step: None,
        }
    }

    /// Build a snapshot for the given counts without recording it
    ///
    /// Immunity counts recoveries, plus cumulative vaccinations in
    /// mass-vaccination mode. The herd-immunity flag is a level condition:
    /// it is recomputed from this step's counts alone and re-fires on every
    /// step where the level holds.
    pub fn peek(
        &self,
        step: StepIndex,
        counts: StateCounts,
        total_deceased: usize,
        total_vaccinated: usize,
    ) -> StepSnapshot {
        let immune_count = if self.mode.includes_vaccination() {
            counts.recovered + total_vaccinated
        } else {
            counts.recovered
        };
        let immune_fraction = immune_count as f64 / self.population_size as f64;

        StepSnapshot {
            step,
            counts,
            total_deceased,
            total_vaccinated,
            immune_fraction,
            herd_immunity: immune_fraction >= self.herd_immunity_threshold,
        }
    }

    /// Record one step: append the counts to the time series and return the
    /// snapshot for downstream consumers
    pub fn record(
        &mut self,
        step: StepIndex,
        counts: StateCounts,
        total_deceased: usize,
        total_vaccinated: usize,
    ) -> StepSnapshot {
        let snapshot = self.peek(step, counts, total_deceased, total_vaccinated);

        self.series.susceptible.push(counts.susceptible);
        self.series.infected.push(counts.infected);
        self.series.recovered.push(counts.recovered);
        self.series.dead.push(counts.dead);
        if self.mode.includes_vaccination() {
            self.series.vaccinated.push(counts.vaccinated);
        }

        if snapshot.herd_immunity && self.first_herd_immunity_step.is_none() {
            self.first_herd_immunity_step = Some(step);
        }

        snapshot
    }

    pub fn herd_immunity_threshold(&self) -> f64 {
        self.herd_immunity_threshold
    }

    pub fn first_herd_immunity_step(&self) -> Option<StepIndex> {
        self.first_herd_immunity_step
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    pub fn into_series(self) -> TimeSeries {
        self.series
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(susceptible: usize, infected: usize, recovered: usize, dead: usize) -> StateCounts {
        StateCounts {
            susceptible,
            infected,
            recovered,
            dead,
            vaccinated: 0,
        }
    }

    #[test]
    fn threshold_formula() {
        let collector = MetricsCollector::new(SimulationMode::Baseline, 100, 5.08);
        assert!((collector.herd_immunity_threshold() - (1.0 - 1.0 / 5.08)).abs() < 1e-12);
    }

    #[test]
    fn flag_holds_exactly_when_immune_fraction_reaches_the_threshold() {
        // R0 = 2 gives a threshold of exactly 0.5
        let collector = MetricsCollector::new(SimulationMode::Baseline, 100, 2.0);

        let below = collector.peek(1, counts(51, 0, 49, 0), 0, 0);
        assert!(!below.herd_immunity);

        let at = collector.peek(2, counts(50, 0, 50, 0), 0, 0);
        assert!(at.herd_immunity);
        assert!((at.immune_fraction - 0.5).abs() < 1e-12);

        let above = collector.peek(3, counts(30, 0, 70, 0), 0, 0);
        assert!(above.herd_immunity);
    }

    #[test]
    fn baseline_immunity_ignores_vaccinations() {
        let collector = MetricsCollector::new(SimulationMode::Baseline, 100, 2.0);
        // 10 recovered, 60 "vaccinated" lifetime count: baseline only sees the 10
        let snapshot = collector.peek(1, counts(90, 0, 10, 0), 0, 60);
        assert!((snapshot.immune_fraction - 0.1).abs() < 1e-12);
        assert!(!snapshot.herd_immunity);
    }

    #[test]
    fn vaccination_mode_counts_vaccinated_as_immune() {
        let collector =
            MetricsCollector::new(SimulationMode::MassVaccination { rate: 0.05 }, 100, 2.0);
        let mut c = counts(30, 0, 10, 0);
        c.vaccinated = 60;
        let snapshot = collector.peek(1, c, 0, 60);
        assert!((snapshot.immune_fraction - 0.7).abs() < 1e-12);
        assert!(snapshot.herd_immunity);
    }

    #[test]
    fn record_appends_to_the_series() {
        let mut collector = MetricsCollector::new(SimulationMode::Baseline, 10, 5.0);
        collector.record(1, counts(9, 1, 0, 0), 0, 0);
        collector.record(2, counts(7, 3, 0, 0), 0, 0);

        let series = collector.series();
        assert_eq!(series.len(), 2);
        assert_eq!(series.susceptible, vec![9, 7]);
        assert_eq!(series.infected, vec![1, 3]);
        // Baseline mode keeps the vaccinated sequence empty
        assert!(series.vaccinated.is_empty());
    }

    #[test]
    fn vaccination_mode_tracks_the_fifth_sequence() {
        let mut collector =
            MetricsCollector::new(SimulationMode::MassVaccination { rate: 0.1 }, 10, 5.0);
        let mut c = counts(8, 1, 0, 0);
        c.vaccinated = 1;
        collector.record(1, c, 0, 1);
        assert_eq!(collector.series().vaccinated, vec![1]);
    }

    #[test]
    fn remembers_the_first_step_the_level_held() {
        let mut collector = MetricsCollector::new(SimulationMode::Baseline, 10, 2.0);

        collector.record(1, counts(9, 0, 1, 0), 0, 0);
        assert_eq!(collector.first_herd_immunity_step(), None);

        collector.record(2, counts(5, 0, 5, 0), 0, 0);
        assert_eq!(collector.first_herd_immunity_step(), Some(2));

        // Level keeps holding later; the memo does not move
        collector.record(3, counts(1, 0, 9, 0), 0, 0);
        assert_eq!(collector.first_herd_immunity_step(), Some(2));

        // The per-step flag itself re-fires
        let snapshot = collector.peek(4, counts(1, 0, 9, 0), 0, 0);
        assert!(snapshot.herd_immunity);
    }
}
