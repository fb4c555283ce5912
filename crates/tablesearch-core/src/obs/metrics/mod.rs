use serde::Serialize;
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for build and lookup activity.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub structures: BTreeMap<&'static str, StructureCounters>,
    pub indexes: BTreeMap<String, IndexCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Build phase
    pub puts: u64,
    pub merges: u64,
    pub index_builds: u64,
    pub rows_indexed: u64,

    // Query phase
    pub lookups: u64,
    pub lookup_misses: u64,

    // Faults
    pub unique_violations: u64,
    pub null_arguments: u64,
}

///
/// StructureCounters
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct StructureCounters {
    pub puts: u64,
    pub merges: u64,
}

///
/// IndexCounters
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct IndexCounters {
    pub builds: u64,
    pub rows_indexed: u64,
    pub lookups: u64,
    pub lookup_misses: u64,
}

///
/// EventReport
/// Point-in-time snapshot of the event state.
///

pub type EventReport = EventState;

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Clone the current state into a report.
#[must_use]
pub(crate) fn report() -> EventReport {
    with_state(Clone::clone)
}
