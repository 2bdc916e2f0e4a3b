//! Status reporting.
//!
//! The scheduler hands every `CycleOutcome` to a `Reporter`. Nothing in
//! the repricing logic depends on a report being seen.

pub mod terminal;

use serde::Deserialize;
use tracing::{info, warn};

use crate::engine::outcome::CycleOutcome;

pub use terminal::TerminalReporter;

/// Consumer of cycle outcomes.
pub trait Reporter {
    fn report(&mut self, outcome: &CycleOutcome);
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn report(&mut self, outcome: &CycleOutcome) {
        (**self).report(outcome)
    }
}

/// How cycle outcomes are shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Redraw a fixed screen after every cycle.
    #[default]
    Terminal,
    /// Emit each status line as a log event.
    Log,
}

/// Reports through `tracing` instead of redrawing the screen.
///
/// The process still exits when stdin reaches end of file, so a supervisor
/// must keep stdin open (not `/dev/null`) for the agent to keep running.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, outcome: &CycleOutcome) {
        for line in outcome.lines() {
            if line.contains(" - ERR: ") {
                warn!(cycle = outcome.cycle, "{line}");
            } else {
                info!(cycle = outcome.cycle, "{line}");
            }
        }
    }
}

/// Keeps the rendered lines of every outcome.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    pub outcomes: Vec<Vec<String>>,
}

impl Reporter for MemoryReporter {
    fn report(&mut self, outcome: &CycleOutcome) {
        self.outcomes.push(outcome.lines());
    }
}
