//! Core runtime for Tablesearch: composable search structures for
//! in-memory table contents, the dynamic table index built on them, and
//! the observability surface.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod error;
pub mod obs;
pub mod structure;
pub mod table;
pub mod value;

///
/// CONSTANTS
///

/// Maximum number of layers a dynamic table index may declare.
///
/// Each layer adds one level of nesting to every lookup path.
pub const MAX_INDEX_COLUMNS: usize = 8;

///
/// Prelude
///
/// Prelude contains only domain vocabulary and the structure traits.
/// No errors, sinks, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        structure::{
            KeyStructure, Mergeable, RangeStructure, RangeType, ResultStructure, SearchStructure,
            TwoColumnRange, TwoColumnRangeStructure,
        },
        table::{IndexColumn, IndexSpec, RowId, TableIndex},
        value::Value,
    };
}
