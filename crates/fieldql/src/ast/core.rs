//! Core AST - the SQL expression IR
//!
//! This is the transformer's output: fully typed, dialect-resolved, and
//! independent of any source syntax. Every node carries the semantic type it
//! produces. Rendering the tree to SQL text is a purely mechanical walk (see
//! `pretty`); all interesting choices (truncation call shapes, ILIKE
//! emulation, cast type names) were already made during transformation.
//!
//! The IR is serializable: compiling is the expensive step, so callers may
//! persist compiled results and rehydrate them later.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::BinOp;
use crate::catalog::DataType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sql {
    pub kind: SqlKind,
    pub datatype: DataType,
}

impl Sql {
    pub fn new(kind: SqlKind, datatype: DataType) -> Self {
        Sql { kind, datatype }
    }

    pub fn literal(value: Value, datatype: DataType) -> Self {
        Sql::new(SqlKind::Literal(value), datatype)
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, SqlKind::Literal(_))
    }

    /// Numeric value of a literal node, if it is one.
    pub fn as_number(&self) -> Option<f64> {
        match &self.kind {
            SqlKind::Literal(Value::Int(n)) => Some(*n as f64),
            SqlKind::Literal(Value::Float(n)) => Some(*n),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlKind {
    /// Qualified column reference, rendered `table.column`
    Column { table: String, column: String },

    Literal(Value),

    /// `NOT (expr)` — only survives where no operator flip applies
    Not(Box<Sql>),

    BinaryOp {
        op: BinOp,
        left: Box<Sql>,
        right: Box<Sql>,
    },

    /// String concatenation, rendered `a || b || c`
    Concat(Vec<Sql>),

    /// Function call; `distinct` renders `count(DISTINCT x)`
    Call {
        name: String,
        args: Vec<Sql>,
        distinct: bool,
    },

    /// `CASE WHEN c THEN v ... [ELSE e] END`
    Case {
        cases: Vec<(Sql, Sql)>,
        otherwise: Option<Box<Sql>>,
    },

    /// `CAST(expr AS type_name)`
    Cast { expr: Box<Sql>, type_name: String },

    /// `expr [NOT] IN (items...)`
    In {
        operand: Box<Sql>,
        items: Vec<Sql>,
        negated: bool,
    },

    /// `expr BETWEEN low AND high`
    Between {
        operand: Box<Sql>,
        low: Box<Sql>,
        high: Box<Sql>,
    },

    /// `expr IS [NOT] NULL`
    IsNull { operand: Box<Sql>, negated: bool },

    /// `expr LIKE pattern` (or native `ILIKE` where the dialect has it)
    Like {
        operand: Box<Sql>,
        pattern: Box<Sql>,
        case_insensitive: bool,
    },

    /// `count(*)`
    Star,

    /// A bare SQL keyword operand, e.g. the `month` in BigQuery's
    /// `date_trunc(x, month)`
    Keyword(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Datetime(NaiveDateTime),
    Null,
}

impl Sql {
    pub fn call(name: impl Into<String>, args: Vec<Sql>, datatype: DataType) -> Self {
        Sql::new(
            SqlKind::Call {
                name: name.into(),
                args,
                distinct: false,
            },
            datatype,
        )
    }
}
