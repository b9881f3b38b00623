//! Orchestrator types.

use std::time::Duration;

use crate::convert::{ConversionReport, ConvertError};
use crate::discovery::PackageEntry;

/// Default bound on concurrently running conversions.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 4;

/// How conversions for a batch are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Run conversions one at a time, in entry order.
    Sequential,

    /// Run conversions concurrently, at most `max_in_flight` at once.
    Concurrent {
        /// Upper bound on in-flight conversions (minimum 1).
        max_in_flight: usize,
    },
}

impl DispatchMode {
    /// Concurrent mode with the given bound (minimum 1).
    pub fn concurrent(max_in_flight: usize) -> Self {
        Self::Concurrent {
            max_in_flight: max_in_flight.max(1),
        }
    }
}

impl Default for DispatchMode {
    fn default() -> Self {
        Self::Concurrent {
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

/// Settled result of one entry's conversion.
///
/// Success or failure stays attached to the entry that produced it, so a
/// failure is always attributable to a specific directory name.
#[derive(Debug)]
pub struct ConversionOutcome {
    /// The matched entry this outcome belongs to.
    pub entry: PackageEntry,

    /// How the conversion settled.
    pub result: Result<ConversionReport, ConvertError>,
}

impl ConversionOutcome {
    /// Whether this entry's conversion succeeded.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Aggregate result of one batch dispatch.
///
/// The report exists only after every conversion in the batch has settled;
/// callers that hold a `BatchReport` know the whole batch is done.
#[derive(Debug)]
pub struct BatchReport {
    /// Per-entry outcomes, in entry (name) order.
    pub outcomes: Vec<ConversionOutcome>,

    /// Wall-clock duration of the whole batch.
    pub elapsed: Duration,
}

impl BatchReport {
    /// Number of entries dispatched.
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of conversions that succeeded.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of conversions that failed.
    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Whether every conversion in the batch succeeded.
    ///
    /// An empty batch is successful.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Entry name and error for each failed conversion.
    pub fn failures(&self) -> Vec<(&str, &ConvertError)> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.result {
                Ok(_) => None,
                Err(err) => Some((o.entry.name.as_str(), err)),
            })
            .collect()
    }
}
