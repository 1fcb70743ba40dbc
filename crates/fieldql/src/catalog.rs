//! Column catalog: the ordered, typed set of columns an expression may reference
//!
//! The catalog is supplied by the surrounding system (table reflection lives
//! there, not here) and is immutable for the lifetime of a compiler instance.
//! Iteration order is the insertion order, and per-type indices derived from
//! it drive grammar rule naming — two equal catalogs always produce the same
//! grammar.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic type of a column or expression.
///
/// `Unusable` marks columns whose native type can't appear in an expression
/// (nested/opaque types). They still parse as references so errors can name
/// them, but no typed rule accepts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Num,
    Str,
    Bool,
    Date,
    Datetime,
    Unusable,
}

impl DataType {
    /// Short type name used in comparison/aggregation error messages.
    pub fn name(self) -> &'static str {
        match self {
            DataType::Num => "num",
            DataType::Str => "str",
            DataType::Bool => "bool",
            DataType::Date => "date",
            DataType::Datetime => "datetime",
            DataType::Unusable => "unusable",
        }
    }

    /// Grammar rule prefix for per-column rules (`str_0`, `date_1`, ...).
    pub(crate) fn rule_prefix(self) -> &'static str {
        match self {
            DataType::Num => "num",
            DataType::Str => "str",
            DataType::Bool => "bool",
            DataType::Date => "date",
            DataType::Datetime => "datetime",
            DataType::Unusable => "unusable",
        }
    }

    /// Grammar union-rule name, used in arithmetic error messages.
    pub(crate) fn rule_name(self) -> &'static str {
        match self {
            DataType::Num => "num",
            DataType::Str => "string",
            DataType::Bool => "boolean",
            DataType::Date => "date",
            DataType::Datetime => "datetime",
            DataType::Unusable => "unusable_col",
        }
    }

    pub fn is_dateish(self) -> bool {
        matches!(self, DataType::Date | DataType::Datetime)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single catalog entry. The name keeps the casing it was registered with;
/// lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub datatype: DataType,
}

/// Ordered, case-insensitive column catalog for one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnCatalog {
    table: String,
    columns: IndexMap<String, Column>,
}

impl ColumnCatalog {
    pub fn new(table: impl Into<String>) -> Self {
        ColumnCatalog {
            table: table.into(),
            columns: IndexMap::new(),
        }
    }

    /// Add a column, keeping insertion order. Re-registering a name (in any
    /// casing) replaces the earlier entry in place. Names that aren't plain
    /// identifiers are skipped: they could never be referenced anyway.
    pub fn with_column(mut self, name: impl Into<String>, datatype: DataType) -> Self {
        let name = name.into();
        if !crate::grammar::is_valid_column(&name) {
            log::warn!("skipping column with unusable name: {name:?}");
            return self;
        }
        self.columns
            .insert(name.to_lowercase(), Column { name, datatype });
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Columns in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, DataType)> {
        self.columns.values().map(|c| (c.name.as_str(), c.datatype))
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.get(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let catalog = ColumnCatalog::new("scores")
            .with_column("score", DataType::Num)
            .with_column("username", DataType::Str);
        assert_eq!(catalog.get("ScORE").unwrap().name, "score");
        assert_eq!(catalog.get("USERNAME").unwrap().datatype, DataType::Str);
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn reregistering_replaces_in_place() {
        let catalog = ColumnCatalog::new("t")
            .with_column("a", DataType::Num)
            .with_column("b", DataType::Str)
            .with_column("A", DataType::Date);
        let cols: Vec<_> = catalog.columns().collect();
        assert_eq!(cols, vec![("A", DataType::Date), ("b", DataType::Str)]);
    }

    #[test]
    fn invalid_names_are_skipped() {
        let catalog = ColumnCatalog::new("t")
            .with_column("ok_name", DataType::Num)
            .with_column("has space", DataType::Num)
            .with_column("brace}name", DataType::Num);
        assert_eq!(catalog.len(), 1);
    }
}
