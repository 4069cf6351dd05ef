//! Tracing setup for the MediaRate service.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, TracingConfig};
