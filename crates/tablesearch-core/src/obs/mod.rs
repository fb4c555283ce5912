//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Search structures never touch metrics state directly; every counter
//! update flows through `MetricsEvent` and `MetricsSink`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, IndexCounters, StructureCounters};
pub use sink::{
    MetricsEvent, MetricsSink, StructureKind, metrics_report, metrics_reset_all,
    with_metrics_sink,
};
