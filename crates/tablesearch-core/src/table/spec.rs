use crate::{MAX_INDEX_COLUMNS, structure::RangeType, table::TableError};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

///
/// IndexColumn
/// One layer of a table index, outermost first.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndexColumn {
    Key {
        column: usize,
    },
    Range {
        column: usize,
        #[serde(default)]
        range_type: RangeType,
    },
    TwoColumnRange {
        from: usize,
        to: usize,
    },
}

impl IndexColumn {
    /// Highest row column this layer reads.
    #[must_use]
    pub fn max_column(&self) -> usize {
        match self {
            Self::Key { column } | Self::Range { column, .. } => *column,
            Self::TwoColumnRange { from, to } => (*from).max(*to),
        }
    }
}

impl Display for IndexColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key { column } => write!(f, "key#{column}"),
            Self::Range { column, .. } => write!(f, "range#{column}"),
            Self::TwoColumnRange { from, to } => write!(f, "range#{from}..#{to}"),
        }
    }
}

///
/// IndexSpec
/// Runtime descriptor of a table index: which row columns feed which
/// layer, and whether a full lookup must resolve to at most one row.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IndexSpec {
    pub name: String,
    pub columns: Vec<IndexColumn>,
    #[serde(default)]
    pub unique: bool,
}

impl IndexSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<IndexColumn>, unique: bool) -> Self {
        Self {
            name: name.into(),
            columns,
            unique,
        }
    }

    /// Check the index depth and, when `arity` is known, that every layer
    /// reads a column the rows actually have.
    pub fn validate(&self, arity: Option<usize>) -> Result<(), TableError> {
        if self.columns.len() > MAX_INDEX_COLUMNS {
            return Err(TableError::TooManyColumns {
                index: self.name.clone(),
                found: self.columns.len(),
                max: MAX_INDEX_COLUMNS,
            });
        }

        if let Some(arity) = arity {
            for layer in &self.columns {
                let column = layer.max_column();
                if column >= arity {
                    return Err(TableError::ColumnOutOfBounds {
                        index: self.name.clone(),
                        column,
                        arity,
                    });
                }
            }
        }

        Ok(())
    }
}

impl Display for IndexSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = self
            .columns
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        if self.unique {
            write!(f, "UNIQUE {}({columns})", self.name)
        } else {
            write!(f, "{}({columns})", self.name)
        }
    }
}
