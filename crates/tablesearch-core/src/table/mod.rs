//! Module: table
//! Responsibility: runtime-described table indexes built from rows of
//! dynamic `Value`s on top of the generic search structures.
//! Does not own: the rows themselves; an index stores `RowId`s that point
//! into the caller's row store.
//! Boundary: loaders call `insert`/`build` once per table load, accessors
//! call `lookup`/`unique` afterwards.

mod node;
mod spec;


use crate::{
    error::{ErrorClass, SearchError},
    obs::sink::{self, MetricsEvent},
    structure::{
        KeyStructure, Mergeable, RangeStructure, ResultStructure, SearchStructure,
        TwoColumnRange, TwoColumnRangeStructure, null_argument,
    },
    value::Value,
};
use derive_more::{Deref, Display, From};
use node::IndexNode;
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, collections::HashSet};
use thiserror::Error as ThisError;

// re-exports
pub use spec::{IndexColumn, IndexSpec};

///
/// RowId
/// Position of a row in the externally owned row store.
///

#[derive(
    Clone,
    Copy,
    Debug,
    Deref,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
pub struct RowId(usize);

impl RowId {
    #[must_use]
    pub const fn new(position: usize) -> Self {
        Self(position)
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

///
/// TableError
///
/// Failures raised while building or querying a table index.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum TableError {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("index '{index}' reads column {column} but rows have {arity} columns")]
    ColumnOutOfBounds {
        index: String,
        column: usize,
        arity: usize,
    },

    #[error("lookup on index '{index}' passed {found} values; at most {expected} are allowed")]
    KeyArity {
        index: String,
        expected: usize,
        found: usize,
    },

    #[error("index '{index}' declares {found} columns; at most {max} are supported")]
    TooManyColumns {
        index: String,
        found: usize,
        max: usize,
    },
}

impl TableError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Search(err) => err.class(),
            Self::ColumnOutOfBounds { .. } | Self::KeyArity { .. } => ErrorClass::InvalidArgument,
            Self::TooManyColumns { .. } => ErrorClass::Unsupported,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}

///
/// TableIndex
///
/// Nested search structure assembled from an `IndexSpec`, one layer per
/// index column, ending in the set of matching row ids.
///

#[derive(Clone, Debug)]
pub struct TableIndex {
    spec: IndexSpec,
    root: IndexNode,
    rows: usize,
}

impl TableIndex {
    /// Empty index for `spec`.
    pub fn new(spec: IndexSpec) -> Result<Self, TableError> {
        spec.validate(None)?;
        let root = IndexNode::empty_for(spec.columns.first());

        Ok(Self {
            spec,
            root,
            rows: 0,
        })
    }

    /// Index every row of `rows`, using each row's position as its id.
    pub fn build<R>(spec: IndexSpec, rows: &[R]) -> Result<Self, TableError>
    where
        R: AsRef<[Value]>,
    {
        let mut index = Self::new(spec)?;
        sink::record(MetricsEvent::IndexBuild {
            index: &index.spec.name,
        });

        for (position, row) in rows.iter().enumerate() {
            index.insert(RowId::new(position), row.as_ref())?;
        }

        Ok(index)
    }

    /// Add one row. The row's cells are read in index-column order and
    /// merged into the existing layers.
    pub fn insert(&mut self, row_id: RowId, row: &[Value]) -> Result<(), TableError> {
        self.spec.validate(Some(row.len()))?;

        let node = row_node(&self.spec.columns, row_id, row)?;
        self.root.merge(node);
        self.rows += 1;

        sink::record(MetricsEvent::RowsIndexed {
            index: &self.spec.name,
            rows: 1,
        });

        Ok(())
    }

    /// Rows matching `key`, read in index-column order.
    ///
    /// A key shorter than the index matches every row below the last given
    /// layer. On a unique index a full key matching several rows fails with
    /// `NonUniqueResult`.
    pub fn lookup(&self, key: &[Value]) -> Result<Cow<'_, HashSet<RowId>>, TableError> {
        let node = self.descend(key)?;
        let rows = node.values();

        if self.spec.unique && key.len() == self.spec.columns.len() && rows.len() > 1 {
            let count = rows.len();
            sink::record(MetricsEvent::UniqueViolation { count });

            return Err(SearchError::NonUniqueResult { count }.into());
        }

        sink::record(MetricsEvent::Lookup {
            index: &self.spec.name,
            hit: !rows.is_empty(),
        });

        Ok(rows)
    }

    /// The single row matching `key`, if any.
    pub fn unique(&self, key: &[Value]) -> Result<Option<RowId>, TableError> {
        let node = self.descend(key)?;
        let row = node.unique()?;

        sink::record(MetricsEvent::Lookup {
            index: &self.spec.name,
            hit: row.is_some(),
        });

        Ok(row)
    }

    #[must_use]
    pub const fn spec(&self) -> &IndexSpec {
        &self.spec
    }

    /// Number of rows inserted.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows == 0
    }

    fn descend(&self, key: &[Value]) -> Result<&IndexNode, TableError> {
        let expected = self.spec.columns.len();
        if key.len() > expected {
            return Err(TableError::KeyArity {
                index: self.spec.name.clone(),
                expected,
                found: key.len(),
            });
        }

        let mut node = &self.root;
        for value in key {
            node = node.descend(value)?;
        }

        Ok(node)
    }
}

// Single-row chain of layers, built innermost first.
fn row_node(
    columns: &[IndexColumn],
    row_id: RowId,
    row: &[Value],
) -> Result<IndexNode, SearchError> {
    let mut node = IndexNode::Rows(ResultStructure::with_value(row_id));

    for layer in columns.iter().rev() {
        let nested = Box::new(node);

        node = match layer {
            IndexColumn::Key { column } => {
                IndexNode::Key(KeyStructure::with_entry(row[*column].clone(), nested))
            }
            IndexColumn::Range { column, range_type } => {
                let bound = cell(row, *column).ok_or_else(|| null_argument("bound"))?;
                IndexNode::Range(RangeStructure::with_entry(*range_type, bound, nested))
            }
            IndexColumn::TwoColumnRange { from, to } => {
                let range = TwoColumnRange::try_new(cell(row, *from), cell(row, *to))?;
                let mut structure = TwoColumnRangeStructure::new();
                structure.put_range(range, nested);
                IndexNode::TwoColumnRange(structure)
            }
        };
    }

    Ok(node)
}

fn cell(row: &[Value], column: usize) -> Option<Value> {
    row[column].clone().into_non_null()
}
