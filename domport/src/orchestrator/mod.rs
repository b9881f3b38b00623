//! Batch conversion orchestration.
//!
//! Coordinates one conversion per matched package entry and collects every
//! per-entry outcome into a single [`BatchReport`]. Dispatch only returns
//! once the whole batch has settled; a failed entry never aborts its
//! siblings, since package roots are disjoint and the work units are
//! independent.

use std::time::Instant;

use futures::stream::{self, StreamExt};
use tracing::{error, info};

use crate::convert::{ConversionConfig, Converter};
use crate::discovery::PackageEntry;

mod types;

pub use types::{BatchReport, ConversionOutcome, DispatchMode, DEFAULT_MAX_IN_FLIGHT};

/// Drives the converter over a batch of package entries.
///
/// # Example
///
/// ```ignore
/// use domport::convert::CommandConverter;
/// use domport::orchestrator::{BatchOrchestrator, DispatchMode};
///
/// let orchestrator = BatchOrchestrator::new(CommandConverter::new("java2ts"))
///     .with_mode(DispatchMode::Sequential);
/// let report = orchestrator.dispatch(entries).await;
/// assert!(report.is_success());
/// ```
#[derive(Debug)]
pub struct BatchOrchestrator<C> {
    /// Conversion capability invoked once per entry.
    converter: C,

    /// Scheduling mode for the batch.
    mode: DispatchMode,
}

impl<C: Converter> BatchOrchestrator<C> {
    /// Create an orchestrator with the default dispatch mode.
    pub fn new(converter: C) -> Self {
        Self {
            converter,
            mode: DispatchMode::default(),
        }
    }

    /// Set the dispatch mode.
    pub fn with_mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Get the dispatch mode.
    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Convert every entry and wait for the whole batch to settle.
    ///
    /// Exactly one conversion is invoked per entry, each with that entry's
    /// path as its package root. Outcomes are reported in entry (name) order
    /// regardless of completion order.
    pub async fn dispatch(&self, entries: Vec<PackageEntry>) -> BatchReport {
        let started = Instant::now();

        let mut outcomes = match self.mode {
            DispatchMode::Sequential => self.dispatch_sequential(entries).await,
            DispatchMode::Concurrent { max_in_flight } => {
                self.dispatch_concurrent(entries, max_in_flight).await
            }
        };

        // Completion order is nondeterministic in concurrent mode
        outcomes.sort_by(|a, b| a.entry.name.cmp(&b.entry.name));

        BatchReport {
            outcomes,
            elapsed: started.elapsed(),
        }
    }

    async fn dispatch_sequential(&self, entries: Vec<PackageEntry>) -> Vec<ConversionOutcome> {
        let mut outcomes = Vec::with_capacity(entries.len());

        for entry in entries {
            outcomes.push(self.convert_entry(entry).await);
        }

        outcomes
    }

    async fn dispatch_concurrent(
        &self,
        entries: Vec<PackageEntry>,
        max_in_flight: usize,
    ) -> Vec<ConversionOutcome> {
        stream::iter(entries)
            .map(|entry| self.convert_entry(entry))
            .buffer_unordered(max_in_flight.max(1))
            .collect()
            .await
    }

    async fn convert_entry(&self, entry: PackageEntry) -> ConversionOutcome {
        info!(package = %entry.name, "starting conversion");

        let config = ConversionConfig::new(&entry.path);
        let result = self.converter.convert(config).await;

        match &result {
            Ok(report) => {
                info!(
                    package = %entry.name,
                    elapsed_ms = report.elapsed.as_millis() as u64,
                    "conversion complete"
                );
            }
            Err(err) => {
                error!(package = %entry.name, error = %err, "conversion failed");
            }
        }

        ConversionOutcome { entry, result }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::convert::{ConversionReport, ConvertError};

    /// Test converter that records every invocation and fails on request.
    #[derive(Debug, Clone, Default)]
    struct MockConverter {
        calls: Arc<Mutex<Vec<PathBuf>>>,
        fail_for: Arc<HashSet<String>>,
    }

    impl MockConverter {
        fn failing_for(names: &[&str]) -> Self {
            Self {
                calls: Arc::default(),
                fail_for: Arc::new(names.iter().map(|n| n.to_string()).collect()),
            }
        }

        fn calls(&self) -> Vec<PathBuf> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Converter for MockConverter {
        async fn convert(
            &self,
            config: ConversionConfig,
        ) -> Result<ConversionReport, ConvertError> {
            self.calls
                .lock()
                .unwrap()
                .push(config.package_root.clone());

            let name = config
                .package_root
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            if self.fail_for.contains(&name) {
                Err(ConvertError::Failed {
                    status: "exit status: 1".to_string(),
                    stderr: format!("cannot convert {}", name),
                })
            } else {
                Ok(ConversionReport {
                    elapsed: Duration::from_millis(1),
                })
            }
        }
    }

    fn entries(names: &[&str]) -> Vec<PackageEntry> {
        names
            .iter()
            .map(|n| PackageEntry::new(*n, format!("/scan/{}", n)))
            .collect()
    }

    #[tokio::test]
    async fn test_empty_batch_invokes_converter_zero_times() {
        let converter = MockConverter::default();
        let orchestrator = BatchOrchestrator::new(converter.clone());

        let report = orchestrator.dispatch(Vec::new()).await;

        assert_eq!(report.total(), 0);
        assert!(report.is_success());
        assert!(converter.calls().is_empty());
    }

    #[tokio::test]
    async fn test_one_invocation_per_entry_with_distinct_roots() {
        let converter = MockConverter::default();
        let orchestrator = BatchOrchestrator::new(converter.clone());

        let batch = entries(&["dombler-fx-core", "dombler-fx-core-extra", "dombler-fx-core-x"]);
        let report = orchestrator.dispatch(batch).await;

        assert_eq!(report.total(), 3);
        assert!(report.is_success());

        let calls = converter.calls();
        assert_eq!(calls.len(), 3);
        let distinct: HashSet<&PathBuf> = calls.iter().collect();
        assert_eq!(distinct.len(), 3);
        assert!(calls.contains(&PathBuf::from("/scan/dombler-fx-core")));
    }

    #[tokio::test]
    async fn test_failure_is_attributable_and_does_not_block_siblings() {
        let converter = MockConverter::failing_for(&["dombler-fx-core-extra"]);
        let orchestrator = BatchOrchestrator::new(converter.clone());

        let batch = entries(&["dombler-fx-core", "dombler-fx-core-extra", "dombler-fx-core-x"]);
        let report = orchestrator.dispatch(batch).await;

        // All three ran despite the middle one failing
        assert_eq!(converter.calls().len(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);

        let failures = report.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "dombler-fx-core-extra");
    }

    #[tokio::test]
    async fn test_sequential_mode_preserves_invocation_order() {
        let converter = MockConverter::default();
        let orchestrator =
            BatchOrchestrator::new(converter.clone()).with_mode(DispatchMode::Sequential);

        let batch = entries(&["dombler-fx-core-a", "dombler-fx-core-b", "dombler-fx-core-c"]);
        orchestrator.dispatch(batch).await;

        let calls = converter.calls();
        assert_eq!(
            calls,
            vec![
                PathBuf::from("/scan/dombler-fx-core-a"),
                PathBuf::from("/scan/dombler-fx-core-b"),
                PathBuf::from("/scan/dombler-fx-core-c"),
            ]
        );
    }

    #[tokio::test]
    async fn test_outcomes_reported_in_name_order() {
        let converter = MockConverter::default();
        let orchestrator =
            BatchOrchestrator::new(converter).with_mode(DispatchMode::concurrent(8));

        let batch = entries(&["dombler-fx-core-c", "dombler-fx-core-a", "dombler-fx-core-b"]);
        let report = orchestrator.dispatch(batch).await;

        let names: Vec<&str> = report
            .outcomes
            .iter()
            .map(|o| o.entry.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "dombler-fx-core-a",
                "dombler-fx-core-b",
                "dombler-fx-core-c"
            ]
        );
    }

    #[tokio::test]
    async fn test_all_failures_reported() {
        let converter =
            MockConverter::failing_for(&["dombler-fx-core-a", "dombler-fx-core-b"]);
        let orchestrator = BatchOrchestrator::new(converter);

        let batch = entries(&["dombler-fx-core-a", "dombler-fx-core-b"]);
        let report = orchestrator.dispatch(batch).await;

        assert!(!report.is_success());
        assert_eq!(report.failed(), 2);
    }
}
