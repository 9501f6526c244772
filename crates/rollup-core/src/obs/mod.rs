//! Observability: pipeline telemetry events and the sink abstraction.
//!
//! Instrumentation is optional, injected by the caller, and must not affect
//! execution semantics. Pipeline logic reports through [`MetricsSink`] only;
//! no global metrics state is part of this core.

pub mod sink;

pub use sink::{MetricsSink, NoopSink, RollupEvent};
