//! Benchmark-driven talent matching: baselines, population scoring, job
//! profile generation and the HTTP routes that expose them.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
