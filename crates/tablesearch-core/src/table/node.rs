use crate::{
    error::SearchError,
    structure::{
        KeyStructure, Mergeable, RangeStructure, ResultStructure, SearchStructure,
        TwoColumnRangeStructure,
    },
    table::{IndexColumn, RowId},
    value::Value,
};
use std::{borrow::Cow, collections::HashSet};

///
/// IndexNode
///
/// One layer of a dynamic table index. Every node below a layer has the
/// shape described by the remaining columns of the index spec.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum IndexNode {
    Key(KeyStructure<Value, Box<Self>>),
    Range(RangeStructure<Value, Box<Self>>),
    TwoColumnRange(TwoColumnRangeStructure<Value, Box<Self>>),
    Rows(ResultStructure<RowId>),
}

impl IndexNode {
    /// Empty node shaped for `layer`; `None` means the row level.
    pub(crate) fn empty_for(layer: Option<&IndexColumn>) -> Self {
        match layer {
            None => Self::Rows(ResultStructure::new()),
            Some(IndexColumn::Key { .. }) => Self::Key(KeyStructure::new()),
            Some(IndexColumn::Range { range_type, .. }) => {
                Self::Range(RangeStructure::new(*range_type))
            }
            Some(IndexColumn::TwoColumnRange { .. }) => {
                Self::TwoColumnRange(TwoColumnRangeStructure::new())
            }
        }
    }

    /// Descend one layer with `value`.
    ///
    /// Null is an ordinary key for a key layer, a miss for a two-column
    /// layer, and a `NullArgument` failure for a range layer.
    pub(crate) fn descend(&self, value: &Value) -> Result<&Self, SearchError> {
        match self {
            Self::Key(structure) => Ok(&**structure.get(value)),
            Self::Range(structure) => structure.try_get(value.non_null()).map(|node| &**node),
            Self::TwoColumnRange(structure) => Ok(&**structure.get_nullable(value.non_null())),
            Self::Rows(_) => Ok(self),
        }
    }
}

impl Default for IndexNode {
    fn default() -> Self {
        Self::empty_for(None)
    }
}

impl SearchStructure for IndexNode {
    type Value = RowId;

    fn values(&self) -> Cow<'_, HashSet<RowId>> {
        match self {
            Self::Key(structure) => structure.values(),
            Self::Range(structure) => structure.values(),
            Self::TwoColumnRange(structure) => structure.values(),
            Self::Rows(structure) => structure.values(),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Key(structure) => structure.is_empty(),
            Self::Range(structure) => structure.is_empty(),
            Self::TwoColumnRange(structure) => structure.is_empty(),
            Self::Rows(structure) => structure.is_empty(),
        }
    }
}

impl Mergeable for IndexNode {
    fn merge(&mut self, other: Self) {
        match (self, other) {
            (Self::Key(this), Self::Key(other)) => this.merge(other),
            (Self::Range(this), Self::Range(other)) => this.merge(other),
            (Self::TwoColumnRange(this), Self::TwoColumnRange(other)) => this.merge(other),
            (Self::Rows(this), Self::Rows(other)) => this.merge(other),

            // Shapes only diverge for the empty sentinel nodes.
            (this, other) => {
                if this.is_empty() {
                    *this = other;
                }
            }
        }
    }
}
