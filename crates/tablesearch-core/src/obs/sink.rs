//! Metrics sink boundary.
//!
//! Structure and table code MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between search logic
//! and the thread-local metrics state.
use crate::obs::metrics::{self, EventReport};
use std::{cell::RefCell, fmt, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// StructureKind
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StructureKind {
    Result,
    Key,
    Range,
    TwoColumnRange,
}

impl StructureKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Result => "result",
            Self::Key => "key",
            Self::Range => "range",
            Self::TwoColumnRange => "two_column_range",
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent<'a> {
    Put {
        kind: StructureKind,
        merged: bool,
    },
    Merge {
        kind: StructureKind,
    },
    IndexBuild {
        index: &'a str,
    },
    RowsIndexed {
        index: &'a str,
        rows: u64,
    },
    Lookup {
        index: &'a str,
        hit: bool,
    },
    UniqueViolation {
        count: usize,
    },
    NullArgument {
        argument: &'static str,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent<'_>);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent<'_>) {
        match event {
            MetricsEvent::Put { kind, merged } => {
                metrics::with_state_mut(|m| {
                    m.ops.puts = m.ops.puts.saturating_add(1);
                    if merged {
                        m.ops.merges = m.ops.merges.saturating_add(1);
                    }

                    let entry = m.structures.entry(kind.label()).or_default();
                    entry.puts = entry.puts.saturating_add(1);
                    if merged {
                        entry.merges = entry.merges.saturating_add(1);
                    }
                });
            }

            MetricsEvent::Merge { kind } => {
                metrics::with_state_mut(|m| {
                    m.ops.merges = m.ops.merges.saturating_add(1);

                    let entry = m.structures.entry(kind.label()).or_default();
                    entry.merges = entry.merges.saturating_add(1);
                });
            }

            MetricsEvent::IndexBuild { index } => {
                metrics::with_state_mut(|m| {
                    m.ops.index_builds = m.ops.index_builds.saturating_add(1);
                    let entry = m.indexes.entry(index.to_string()).or_default();
                    entry.builds = entry.builds.saturating_add(1);
                });
            }

            MetricsEvent::RowsIndexed { index, rows } => {
                metrics::with_state_mut(|m| {
                    m.ops.rows_indexed = m.ops.rows_indexed.saturating_add(rows);
                    let entry = m.indexes.entry(index.to_string()).or_default();
                    entry.rows_indexed = entry.rows_indexed.saturating_add(rows);
                });
            }

            MetricsEvent::Lookup { index, hit } => {
                metrics::with_state_mut(|m| {
                    m.ops.lookups = m.ops.lookups.saturating_add(1);
                    if !hit {
                        m.ops.lookup_misses = m.ops.lookup_misses.saturating_add(1);
                    }

                    let entry = m.indexes.entry(index.to_string()).or_default();
                    entry.lookups = entry.lookups.saturating_add(1);
                    if !hit {
                        entry.lookup_misses = entry.lookup_misses.saturating_add(1);
                    }
                });
            }

            MetricsEvent::UniqueViolation { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.unique_violations = m.ops.unique_violations.saturating_add(1);
                });
            }

            MetricsEvent::NullArgument { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.null_arguments = m.ops.null_arguments.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent<'_>) {
    // Clone the override out first so a sink may itself record without
    // hitting an outstanding borrow.
    let override_sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());

    match override_sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current thread's metrics state.
#[must_use]
pub fn metrics_report() -> EventReport {
    metrics::report()
}

/// Reset all metrics state on the current thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
///
/// The previous sink is restored on every exit path, including unwinding.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///
