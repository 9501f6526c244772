//! Metrics sink boundary.
//!
//! Pipeline logic MUST NOT format, count, or store telemetry itself.
//! Everything flows through [`RollupEvent`] and [`MetricsSink`].

///
/// RollupEvent
///

#[derive(Clone, Copy, Debug)]
pub enum RollupEvent<'a> {
    InvocationStart {
        entity: &'a str,
        rows: u64,
    },
    /// Change detection resolved every candidate field as unchanged.
    DetectorSuppressed {
        entity: &'a str,
        definitions: u64,
    },
    ContextsBuilt {
        entity: &'a str,
        contexts: u64,
    },
    InvocationFinish {
        entity: &'a str,
        parents: u64,
    },
    InvocationError {
        entity: &'a str,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn on_event(&self, event: RollupEvent<'_>);
}

///
/// NoopSink
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl MetricsSink for NoopSink {
    fn on_event(&self, _event: RollupEvent<'_>) {}
}
