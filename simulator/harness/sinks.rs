//! Various step sinks for different use cases

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use epi_rust::{StepIndex, StepSink, StepSnapshot};

// ============================================================================
// Console Step Sink
// ============================================================================

/// Logging sink that prints one aligned line per step
pub struct ConsoleStepSink {
    enabled: bool,
}

impl ConsoleStepSink {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl StepSink for ConsoleStepSink {
    fn on_step(&mut self, snapshot: &StepSnapshot) {
        if !self.enabled {
            return;
        }

        // Format: step S I R D V immune%
        println!(
            "{:>5}  S:{:>5} I:{:>5} R:{:>5} D:{:>5} V:{:>5}  immune:{:>6.2}%{}",
            snapshot.step,
            snapshot.counts.susceptible,
            snapshot.counts.infected,
            snapshot.counts.recovered,
            snapshot.counts.dead,
            snapshot.counts.vaccinated,
            100.0 * snapshot.immune_fraction,
            if snapshot.herd_immunity {
                "  [herd immunity]"
            } else {
                ""
            }
        );
    }
}

// ============================================================================
// CSV Step Sink
// ============================================================================

/// CSV sink for structured time-series export
pub struct CsvStepSink {
    writer: BufWriter<File>,
    include_vaccinated: bool,
}

impl CsvStepSink {
    pub fn new<P: AsRef<Path>>(path: P, include_vaccinated: bool) -> std::io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        // Write CSV header
        if include_vaccinated {
            writeln!(
                writer,
                "step,susceptible,infected,recovered,dead,vaccinated,immune_fraction,herd_immunity"
            )?;
        } else {
            writeln!(
                writer,
                "step,susceptible,infected,recovered,dead,immune_fraction,herd_immunity"
            )?;
        }

        Ok(Self {
            writer,
            include_vaccinated,
        })
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl StepSink for CsvStepSink {
    fn on_step(&mut self, snapshot: &StepSnapshot) {
        let result = if self.include_vaccinated {
            writeln!(
                self.writer,
                "{},{},{},{},{},{},{},{}",
                snapshot.step,
                snapshot.counts.susceptible,
                snapshot.counts.infected,
                snapshot.counts.recovered,
                snapshot.counts.dead,
                snapshot.counts.vaccinated,
                snapshot.immune_fraction,
                snapshot.herd_immunity
            )
        } else {
            writeln!(
                self.writer,
                "{},{},{},{},{},{},{}",
                snapshot.step,
                snapshot.counts.susceptible,
                snapshot.counts.infected,
                snapshot.counts.recovered,
                snapshot.counts.dead,
                snapshot.immune_fraction,
                snapshot.herd_immunity
            )
        };

        if let Err(e) = result {
            eprintln!("Error writing to CSV: {}", e);
        }
    }
}

impl Drop for CsvStepSink {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

// ============================================================================
// Collector Step Sink (In-Memory)
// ============================================================================

/// Collects snapshots in memory for programmatic analysis
pub struct CollectorStepSink {
    pub snapshots: Vec<StepSnapshot>,
}

impl CollectorStepSink {
    pub fn new() -> Self {
        Self {
            snapshots: Vec::new(),
        }
    }

    // Query helpers
    pub fn peak_infected(&self) -> usize {
        self.snapshots
            .iter()
            .map(|s| s.counts.infected)
            .max()
            .unwrap_or(0)
    }

    pub fn first_herd_immunity_step(&self) -> Option<StepIndex> {
        self.snapshots
            .iter()
            .find(|s| s.herd_immunity)
            .map(|s| s.step)
    }
}

impl StepSink for CollectorStepSink {
    fn on_step(&mut self, snapshot: &StepSnapshot) {
        self.snapshots.push(*snapshot);
    }
}

// ============================================================================
// Multi Sink (Combine Multiple Sinks)
// ============================================================================

/// Fans each snapshot out to several sinks
pub struct MultiStepSink {
    sinks: Vec<Box<dyn StepSink>>,
}

impl MultiStepSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add_sink(&mut self, sink: Box<dyn StepSink>) {
        self.sinks.push(sink);
    }
}

impl StepSink for MultiStepSink {
    fn on_step(&mut self, snapshot: &StepSnapshot) {
        for sink in &mut self.sinks {
            sink.on_step(snapshot);
        }
    }
}
