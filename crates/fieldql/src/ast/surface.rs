//! Surface AST - what the parser produces
//!
//! Mirrors the source syntax closely. Every node carries the byte span of the
//! token that errors should point at: column references span their name (not
//! the brackets), calls span their function name, binary operations span both
//! operands.

use super::{BinOp, Literal, Span};

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: impl Into<Span>) -> Self {
        Expr {
            kind,
            span: span.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Bracketed column reference: `[score]`
    Column(String),

    /// A bare word. Only bracketed names resolve against the catalog; a bare
    /// word parses (so validation can name it) but never types.
    BareColumn(String),

    /// Literal value
    Literal(Literal),

    /// Date string: `date("2020-01-01")`, `date("2 weeks ago")` — or a bare
    /// string literal used where a date is expected (resolved in transform)
    Date(String),

    /// `*`, only meaningful as a count argument
    Star,

    /// Binary operation: `a + b`, `a = b`, `a AND b`
    BinaryOp(Box<Expr>, BinOp, Box<Expr>),

    /// `NOT expr`
    Not(Box<Expr>),

    /// `expr IS [NOT] NULL`
    IsNull { operand: Box<Expr>, negated: bool },

    /// Intelligent date range: `expr IS last year`
    IsRange {
        operand: Box<Expr>,
        offset: RangeOffset,
        unit: RangeUnit,
    },

    /// `expr [NOT] IN (literals...)`
    In {
        operand: Box<Expr>,
        items: Vec<Expr>,
        negated: bool,
    },

    /// `expr BETWEEN low AND high`
    Between {
        operand: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
    },

    /// `expr LIKE pattern` / `expr ILIKE pattern`
    Like {
        operand: Box<Expr>,
        pattern: Box<Expr>,
        case_insensitive: bool,
    },

    /// Function call: `sum([score])`, `substr([name], 1, 3)`
    Call { name: String, args: Vec<Expr> },

    /// `if(cond, value, cond, value, ..., [else])`, normalized into pairs
    If {
        cases: Vec<(Expr, Expr)>,
        otherwise: Option<Box<Expr>>,
    },
}

/// Period offset keyword of an intelligent date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOffset {
    /// `last`, `prior`, `previous`
    Previous,
    /// `this`, `current`
    Current,
    /// `next`
    Next,
}

/// Period unit of an intelligent date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeUnit {
    Year,
    Ytd,
    Qtr,
    Month,
    Mtd,
    Day,
}
