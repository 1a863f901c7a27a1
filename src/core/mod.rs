// src/core/mod.rs

// `core` holds everything that is not presentation: the data model, the
// tool adapters, the orchestrator and the report encoders.

/// Findings, targets, profiles and the other shared data types.
pub mod models;

/// Error type shared by the whole core.
pub mod error;

/// Typed configuration for adapters and scan runs.
pub mod config;

/// Per-session logging context handed to each component.
pub mod context;

/// Turns raw user input into a canonical scan target.
pub mod target;

/// Decides which tools are usable on this host.
pub mod availability;

/// Adapters wrapping the external tools and the built-in fuzzer.
pub mod scanner;

/// Append-only collection of findings for one run.
pub mod store;

/// Runs the selected adapters and streams progress.
pub mod orchestrator;

/// Console table and export encodings for findings.
pub mod report;
