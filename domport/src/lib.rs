//! Domport - batch source conversion for dombler-fx-core package trees
//!
//! This library provides the core functionality for discovering convertible
//! package roots on disk and driving an external Java-to-TypeScript converter
//! over each of them as one coordinated batch.
//!
//! # Architecture
//!
//! ```text
//! PackageDiscovery ──► PrefixFilter ──► BatchOrchestrator ──► Converter
//! (scan root)          (name match)     (dispatch + report)   (external engine)
//! ```
//!
//! The converter itself is an external program; this crate only locates its
//! inputs, invokes it once per matched package root, and aggregates the
//! per-package outcomes into a single [`orchestrator::BatchReport`].

pub mod config;
pub mod convert;
pub mod discovery;
pub mod orchestrator;

/// Crate version, as compiled into the binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default name prefix selecting convertible package directories.
pub const DEFAULT_PREFIX: &str = "dombler-fx-core";
