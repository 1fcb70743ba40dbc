//! fieldql - typed field expressions compiled to a SQL expression IR
//!
//! Callers write small textual expressions against a known set of typed
//! columns; each expression compiles into a dialect-resolved expression tree
//! usable inside a larger query.
//!
//! ## Quick Start
//!
//! ```ignore
//! use fieldql::{ColumnCatalog, Compiler, CompileOptions, DataType, DialectProfile};
//!
//! let catalog = ColumnCatalog::new("scores")
//!     .with_column("username", DataType::Str)
//!     .with_column("score", DataType::Num)
//!     .with_column("test_date", DataType::Date);
//!
//! let compiler = Compiler::new(catalog, DialectProfile::lookup("postgresql"));
//!
//! let result = compiler.compile("sum([score]) / count(*)", &CompileOptions::default())?;
//! println!("{} :: {}", result.expression, result.datatype);
//!
//! // policy flags
//! let opts = CompileOptions::default().with_forbid_aggregation(true);
//! assert!(compiler.compile("sum([score])", &opts).is_err());
//! ```
//!
//! ## Pipeline
//!
//! - `Grammar::generate` builds a deterministic grammar from the catalog
//! - `parse` produces a source-spanned surface tree
//! - validation assigns a type to every node, collecting all errors
//! - transformation folds constants, rewrites `NOT`, guards division, and
//!   resolves dates and dialect call shapes into the typed IR
//!
//! Results are memoized per compiler instance, keyed by the full argument
//! tuple. The cache is unbounded for the instance's lifetime and safe to hit
//! from many threads.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDateTime;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod ast;
mod catalog;
mod dates;
mod dialect;
mod grammar;
mod parse;
mod pretty;
mod transform;
mod validate;

// ============ Primary Public API ============

pub use ast::core::{Sql, SqlKind, Value};
pub use ast::{BinOp, Literal, Span};
pub use catalog::{Column, ColumnCatalog, DataType};
pub use dialect::{DialectProfile, SUPPORTED_PERCENTILES, TruncStyle};
pub use grammar::{ColumnRule, Grammar, is_valid_column};
pub use parse::ParseError;
pub use transform::TransformError;
pub use validate::{ValidationError, ValidationErrorKind};

use ast::core::{SqlKind as K, Value as V};

/// Compile a one-off expression with default options.
pub fn compile(
    text: &str,
    catalog: ColumnCatalog,
    dialect: DialectProfile,
) -> Result<CompileResult, CompileError> {
    Compiler::new(catalog, dialect).compile(text, &CompileOptions::default())
}

// ============ Options ============

/// Per-call compilation policy. `Default` gives the permissive baseline:
/// aggregation neither forbidden nor enforced, `sum` as the default
/// aggregation, no column converters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompileOptions {
    pub forbid_aggregation: bool,
    pub enforce_aggregation: bool,
    pub default_aggregation: String,
    pub convert_dates_with: Option<String>,
    pub convert_datetimes_with: Option<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            forbid_aggregation: false,
            enforce_aggregation: false,
            default_aggregation: "sum".to_string(),
            convert_dates_with: None,
            convert_datetimes_with: None,
        }
    }
}

impl CompileOptions {
    pub fn with_forbid_aggregation(mut self, forbid: bool) -> Self {
        self.forbid_aggregation = forbid;
        self
    }

    pub fn with_enforce_aggregation(mut self, enforce: bool) -> Self {
        self.enforce_aggregation = enforce;
        self
    }

    pub fn with_default_aggregation(mut self, name: impl Into<String>) -> Self {
        self.default_aggregation = name.into();
        self
    }

    pub fn with_convert_dates(mut self, converter: impl Into<String>) -> Self {
        self.convert_dates_with = Some(converter.into());
        self
    }

    pub fn with_convert_datetimes(mut self, converter: impl Into<String>) -> Self {
        self.convert_datetimes_with = Some(converter.into());
        self
    }
}

// ============ Results and errors ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileResult {
    /// The typed, dialect-resolved expression tree
    pub expression: Sql,
    /// Semantic type of the whole expression
    pub datatype: DataType,
    /// Whether any aggregation appears anywhere in the expression
    pub uses_aggregation: bool,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("{0}")]
    Transform(#[from] TransformError),
}

/// Every validation problem found in one pass, never truncated. Renders the
/// way users see it: message, blank line, the expression, a caret under the
/// offending spot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    pub text: String,
    pub errors: Vec<ValidationError>,
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let caret_col = self.text[..error.offset.min(self.text.len())]
                .chars()
                .count();
            write!(
                f,
                "{}\n\n{}\n{}^",
                error.message,
                self.text,
                " ".repeat(caret_col)
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ============ Compiler ============

/// A compiler instance for one (catalog, dialect) pair.
///
/// Construction generates the grammar once; `compile` may then be called
/// concurrently from any number of threads. The only shared mutable state is
/// the result cache.
pub struct Compiler {
    catalog: ColumnCatalog,
    dialect: DialectProfile,
    grammar: Grammar,
    reference: NaiveDateTime,
    cache: DashMap<(String, CompileOptions), CompileResult>,
    cache_hits: AtomicUsize,
}

impl Compiler {
    pub fn new(catalog: ColumnCatalog, dialect: DialectProfile) -> Self {
        let grammar = Grammar::generate(&catalog);
        Compiler {
            catalog,
            dialect,
            grammar,
            reference: chrono::Local::now().naive_local(),
            cache: DashMap::new(),
            cache_hits: AtomicUsize::new(0),
        }
    }

    /// Fix the moment that `today`, `now`, relative phrases, and intelligent
    /// date ranges resolve against. Defaults to the wall clock at
    /// construction.
    pub fn with_reference_time(mut self, reference: NaiveDateTime) -> Self {
        self.reference = reference;
        self
    }

    pub fn catalog(&self) -> &ColumnCatalog {
        &self.catalog
    }

    pub fn dialect(&self) -> &DialectProfile {
        &self.dialect
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// How many compiles were served from the cache.
    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Compile an expression. Successful results are memoized by
    /// `(text, options)`; errors are recomputed on each call.
    pub fn compile(
        &self,
        text: &str,
        opts: &CompileOptions,
    ) -> Result<CompileResult, CompileError> {
        let key = (text.to_string(), opts.clone());
        if let Some(hit) = self.cache.get(&key) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(hit.clone());
        }
        let result = self.compile_uncached(text, opts)?;
        self.cache.insert(key, result.clone());
        Ok(result)
    }

    fn compile_uncached(
        &self,
        text: &str,
        opts: &CompileOptions,
    ) -> Result<CompileResult, CompileError> {
        let tree = parse::parse(text)?;
        log::debug!("parsed {text:?}: {tree:?}");

        let validation = validate::validate(
            &tree,
            opts.forbid_aggregation,
            &self.grammar,
            &self.dialect,
        );
        if !validation.errors.is_empty() {
            return Err(ValidationErrors {
                text: text.to_string(),
                errors: validation.errors,
            }
            .into());
        }

        let transformer = transform::Transformer {
            grammar: &self.grammar,
            dialect: &self.dialect,
            reference: self.reference,
            convert_dates_with: opts.convert_dates_with.as_deref(),
            convert_datetimes_with: opts.convert_datetimes_with.as_deref(),
        };
        let mut expression = transform::transform(&tree, &transformer)?;

        // expressions must reach at least one column; booleans may still
        // fold to a literal (`[x] > 1 AND false`)
        if matches!(
            expression.kind,
            K::Literal(V::Int(_) | V::Float(_) | V::String(_) | V::Date(_) | V::Datetime(_))
        ) {
            return Err(TransformError::ConstantExpression.into());
        }

        if opts.enforce_aggregation
            && !validation.found_aggregation
            && validation.datatype == DataType::Num
        {
            expression = Sql::call(
                opts.default_aggregation.as_str(),
                vec![expression],
                DataType::Num,
            );
        }

        log::debug!("compiled {text:?} -> {expression}");
        Ok(CompileResult {
            expression,
            datatype: validation.datatype,
            uses_aggregation: validation.found_aggregation,
        })
    }
}

// ============ Advanced: AST Access ============

/// Low-level surface AST types (for custom tooling or introspection)
pub mod advanced {
    pub use crate::ast::surface::{Expr as SurfaceExpr, ExprKind as SurfaceExprKind};
    pub use crate::parse::parse;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn compiler() -> Compiler {
        let catalog = ColumnCatalog::new("datatypes")
            .with_column("username", DataType::Str)
            .with_column("department", DataType::Str)
            .with_column("testid", DataType::Str)
            .with_column("score", DataType::Num)
            .with_column("test_date", DataType::Date)
            .with_column("test_datetime", DataType::Datetime)
            .with_column("valid_score", DataType::Bool);
        Compiler::new(catalog, DialectProfile::lookup("sqlite")).with_reference_time(
            NaiveDate::from_ymd_opt(2020, 1, 14)
                .unwrap()
                .and_hms_opt(9, 21, 34)
                .unwrap(),
        )
    }

    #[test]
    fn second_compile_is_served_from_cache() {
        let compiler = compiler();
        let opts = CompileOptions::default();
        let first = compiler.compile("sum([score]) / count(*)", &opts).unwrap();
        assert_eq!(compiler.cache_hits(), 0);
        let second = compiler.compile("sum([score]) / count(*)", &opts).unwrap();
        assert_eq!(first, second);
        assert_eq!(compiler.cache_hits(), 1);
        assert_eq!(compiler.cache_len(), 1);
    }

    #[test]
    fn different_options_are_different_cache_keys() {
        let compiler = compiler();
        let plain = CompileOptions::default();
        let enforced = CompileOptions::default().with_enforce_aggregation(true);
        let a = compiler.compile("[score]", &plain).unwrap();
        let b = compiler.compile("[score]", &enforced).unwrap();
        assert_ne!(a.expression.to_string(), b.expression.to_string());
        assert_eq!(compiler.cache_len(), 2);
    }

    #[test]
    fn errors_are_not_cached() {
        let compiler = compiler();
        let opts = CompileOptions::default();
        assert!(compiler.compile("[nope]", &opts).is_err());
        assert_eq!(compiler.cache_len(), 0);
        assert!(compiler.compile("[nope]", &opts).is_err());
        assert_eq!(compiler.cache_hits(), 0);
    }

    #[test]
    fn validation_errors_render_with_carets() {
        let compiler = compiler();
        let err = compiler
            .compile("[username] + [score]", &CompileOptions::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "string and num can not be added together\n\n[username] + [score]\n ^"
        );
    }

    #[test]
    fn constant_expressions_are_rejected() {
        let compiler = compiler();
        let opts = CompileOptions::default();
        for text in ["\"22\"", "2.0", "2.0 + 1.0", "\"220\" + \"foo\"", "5"] {
            let err = compiler.compile(text, &opts).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Must return an expression, not a constant value",
                "{text}"
            );
        }
    }

    #[test]
    fn failed_compiles_leave_the_instance_usable() {
        let compiler = compiler();
        let opts = CompileOptions::default();
        assert!(compiler.compile("[score] / 0", &opts).is_err());
        assert!(compiler.compile("[score] / 2", &opts).is_ok());
    }

    #[test]
    fn compile_results_survive_serde() {
        let compiler = compiler();
        let result = compiler
            .compile("sum([score]) / count(*)", &CompileOptions::default())
            .unwrap();
        let json = serde_json::to_string(&result).unwrap();
        let back: CompileResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
        assert_eq!(result.expression.to_string(), back.expression.to_string());
    }

    #[test]
    fn one_off_compile_helper() {
        let catalog = ColumnCatalog::new("t").with_column("x", DataType::Num);
        let result = compile("[x] + 1", catalog, DialectProfile::lookup("sqlite")).unwrap();
        assert_eq!(result.expression.to_string(), "t.x + 1");
    }
}
