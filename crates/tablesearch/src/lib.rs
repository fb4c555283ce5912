//! ## Crate layout
//! - `core`: search structures, dynamic table indexes, values, and observability.
//!
//! The `prelude` module mirrors the surface used by table accessors.

pub use tablesearch_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Errors
//

pub use core::{
    error::{ErrorClass, SearchError},
    table::TableError,
};

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::prelude::*;
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn prelude_builds_and_queries_an_index() {
        let spec: IndexSpec = serde_json::from_str(
            r#"{ "name": "codes", "unique": true, "columns": [{ "kind": "key", "column": 0 }] }"#,
        )
        .expect("spec json");
        let rows = vec![vec![Value::from("a")], vec![Value::from("b")]];
        let index = TableIndex::build(spec, &rows).expect("build");

        assert_eq!(index.unique(&[Value::from("b")]), Ok(Some(RowId::new(1))));
    }

    #[test]
    fn prelude_exposes_structure_traits() {
        let mut leaf = ResultStructure::with_value(1);
        leaf.merge(ResultStructure::with_value(2));

        assert_eq!(SearchStructure::values(&leaf).len(), 2);
        assert!(!crate::VERSION.is_empty());
    }
}
