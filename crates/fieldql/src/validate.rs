//! Type validation
//!
//! A single bottom-up pass assigns a semantic type to every node and checks
//! each construct's rules. Errors accumulate — children before parents, left
//! to right — and validation never stops at the first one, so a caller sees
//! every problem in the expression at once.
//!
//! Two sentinels keep error noise down: an operand that already failed
//! (`Ty::Error`) is absorbed silently by its parent, while an unresolvable
//! column name participates in parent checks (its own name error plus the
//! parent's operator error are both wanted).

use crate::ast::surface::{Expr, ExprKind};
use crate::ast::{BinOp, Literal};
use crate::catalog::DataType;
use crate::dialect::{DialectProfile, SUPPORTED_PERCENTILES};
use crate::grammar::Grammar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Operator/function type mismatch, bad column name, heterogeneous array
    Type,
    /// Aggregation present where forbidden
    Aggregation,
    /// Construct the active dialect can't express
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
    pub offset: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct Validation {
    pub datatype: DataType,
    pub found_aggregation: bool,
    pub errors: Vec<ValidationError>,
}

/// Node type during validation; catalog types plus the sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ty {
    Known(DataType),
    Null,
    Unknown,
    Unusable,
    Error,
}

impl Ty {
    /// Vocabulary for arithmetic errors: grammar rule names.
    fn rule_vocab(self) -> &'static str {
        match self {
            Ty::Known(dt) => dt.rule_name(),
            Ty::Null => "null",
            Ty::Unknown => "unknown_col",
            Ty::Unusable => "unusable_col",
            Ty::Error => "error",
        }
    }

    /// Vocabulary for comparison/branch errors: type names.
    fn type_vocab(self) -> &'static str {
        match self {
            Ty::Known(dt) => dt.name(),
            Ty::Null => "null",
            Ty::Unknown => "unknown_col",
            Ty::Unusable => "unusable_col",
            Ty::Error => "error",
        }
    }

    fn is(self, dt: DataType) -> bool {
        self == Ty::Known(dt)
    }

    fn is_dateish(self) -> bool {
        matches!(self, Ty::Known(dt) if dt.is_dateish())
    }
}

const AGGREGATIONS: &[&str] = &["sum", "avg", "min", "max", "count", "count_distinct"];

fn is_aggregation(name: &str) -> bool {
    AGGREGATIONS.contains(&name) || name.starts_with("percentile")
}

pub(crate) fn validate(
    tree: &Expr,
    forbid_aggregation: bool,
    grammar: &Grammar,
    dialect: &DialectProfile,
) -> Validation {
    let mut v = Validator {
        grammar,
        dialect,
        errors: Vec::new(),
        found_aggregation: false,
    };
    let ty = v.walk(tree);
    if forbid_aggregation && v.found_aggregation {
        v.errors.insert(
            0,
            ValidationError {
                kind: ValidationErrorKind::Aggregation,
                message: "Aggregations are not allowed in this field.".to_string(),
                offset: 0,
            },
        );
    }
    let datatype = match ty {
        Ty::Known(dt) => dt,
        _ => DataType::Num,
    };
    Validation {
        datatype,
        found_aggregation: v.found_aggregation,
        errors: v.errors,
    }
}

struct Validator<'a> {
    grammar: &'a Grammar,
    dialect: &'a DialectProfile,
    errors: Vec<ValidationError>,
    found_aggregation: bool,
}

impl Validator<'_> {
    fn error(&mut self, kind: ValidationErrorKind, message: impl Into<String>, offset: usize) {
        self.errors.push(ValidationError {
            kind,
            message: message.into(),
            offset,
        });
    }

    fn type_error(&mut self, message: impl Into<String>, offset: usize) {
        self.error(ValidationErrorKind::Type, message, offset);
    }

    fn walk(&mut self, expr: &Expr) -> Ty {
        match &expr.kind {
            ExprKind::Column(name) => match self.grammar.resolve(name) {
                Some(rule) if rule.datatype == DataType::Unusable => {
                    self.type_error(format!("{name} is an unusable column"), expr.span.start);
                    Ty::Unusable
                }
                Some(rule) => Ty::Known(rule.datatype),
                None => {
                    self.type_error(
                        format!("{name} is not a valid column name"),
                        expr.span.start,
                    );
                    Ty::Unknown
                }
            },
            ExprKind::BareColumn(name) => {
                self.type_error(
                    format!("{name} is not a valid column name"),
                    expr.span.start,
                );
                Ty::Unknown
            }
            ExprKind::Literal(lit) => match lit {
                Literal::Int(_) | Literal::Float(_) => Ty::Known(DataType::Num),
                Literal::String(_) => Ty::Known(DataType::Str),
                Literal::Bool(_) => Ty::Known(DataType::Bool),
                Literal::Null => Ty::Null,
            },
            ExprKind::Date(_) => Ty::Known(DataType::Date),
            ExprKind::Star => {
                self.type_error("Must be a column or expression", expr.span.start);
                Ty::Error
            }
            ExprKind::BinaryOp(left, op, right) => self.binary_op(left, *op, right),
            ExprKind::Not(inner) => {
                let ty = self.walk(inner);
                match ty {
                    Ty::Known(DataType::Bool) => Ty::Known(DataType::Bool),
                    Ty::Error => Ty::Error,
                    _ => {
                        self.type_error("NOT requires a boolean value", expr.span.start);
                        Ty::Error
                    }
                }
            }
            ExprKind::IsNull { operand, .. } => {
                self.walk(operand);
                Ty::Known(DataType::Bool)
            }
            ExprKind::IsRange { operand, .. } => {
                let ty = self.walk(operand);
                if !ty.is_dateish() && ty != Ty::Error {
                    self.type_error(
                        "This should be a date or datetime column or expression",
                        operand.span.start,
                    );
                }
                Ty::Known(DataType::Bool)
            }
            ExprKind::In {
                operand, items, ..
            } => self.in_array(operand, items),
            ExprKind::Between { operand, low, high } => self.between(operand, low, high),
            ExprKind::Like {
                operand, pattern, ..
            } => {
                let ot = self.walk(operand);
                let pt = self.walk(pattern);
                if !ot.is(DataType::Str) && ot != Ty::Error {
                    self.type_error(
                        format!("Can't compare {} to str", ot.type_vocab()),
                        operand.span.start,
                    );
                }
                if !matches!(pattern.kind, ExprKind::Literal(Literal::String(_))) && pt != Ty::Error
                {
                    self.type_error("LIKE requires a string pattern", pattern.span.start);
                }
                Ty::Known(DataType::Bool)
            }
            ExprKind::Call { name, args } => self.call(expr, name, args),
            ExprKind::If { cases, otherwise } => self.if_call(expr, cases, otherwise.as_deref()),
        }
    }

    fn binary_op(&mut self, left: &Expr, op: BinOp, right: &Expr) -> Ty {
        let lt = self.walk(left);
        let rt = self.walk(right);

        if op.is_arithmetic() {
            if lt == Ty::Error || rt == Ty::Error {
                return Ty::Error;
            }
            // Null folds into whatever surrounds it
            if lt == Ty::Null {
                return rt;
            }
            if rt == Ty::Null {
                return lt;
            }
            let ok = match op {
                BinOp::Add => {
                    (lt.is(DataType::Num) && rt.is(DataType::Num))
                        || (lt.is(DataType::Str) && rt.is(DataType::Str))
                }
                _ => lt.is(DataType::Num) && rt.is(DataType::Num),
            };
            if !ok {
                let verb = match op {
                    BinOp::Add => "added together",
                    BinOp::Sub => "subtracted",
                    BinOp::Mul => "multiplied together",
                    _ => "divided",
                };
                self.type_error(
                    format!(
                        "{} and {} can not be {verb}",
                        lt.rule_vocab(),
                        rt.rule_vocab()
                    ),
                    left.span.start,
                );
                return Ty::Error;
            }
            return lt;
        }

        if op.is_comparison() {
            if lt == Ty::Error || rt == Ty::Error {
                return Ty::Known(DataType::Bool);
            }
            if lt == Ty::Null || rt == Ty::Null {
                return Ty::Known(DataType::Bool);
            }
            if !self.comparable(lt, left, rt, right) {
                self.type_error(
                    format!(
                        "Can't compare {} to {}",
                        lt.type_vocab(),
                        rt.type_vocab()
                    ),
                    left.span.start,
                );
                return Ty::Error;
            }
            return Ty::Known(DataType::Bool);
        }

        // AND / OR
        for (ty, operand) in [(lt, left), (rt, right)] {
            if !ty.is(DataType::Bool) && ty != Ty::Error && ty != Ty::Null {
                self.type_error(
                    "This should be a boolean column or expression",
                    operand.span.start,
                );
            }
        }
        Ty::Known(DataType::Bool)
    }

    /// Two comparison operands are compatible when their types match, or when
    /// a date/datetime side meets a string literal (converted in transform).
    fn comparable(&self, lt: Ty, left: &Expr, rt: Ty, right: &Expr) -> bool {
        let string_literal =
            |e: &Expr| matches!(e.kind, ExprKind::Literal(Literal::String(_)));
        match (lt, rt) {
            (Ty::Known(a), Ty::Known(b)) => {
                if a == b {
                    return true;
                }
                if a.is_dateish() && b.is_dateish() {
                    return true;
                }
                if a.is_dateish() && b == DataType::Str {
                    return string_literal(right);
                }
                if b.is_dateish() && a == DataType::Str {
                    return string_literal(left);
                }
                false
            }
            _ => false,
        }
    }

    fn in_array(&mut self, operand: &Expr, items: &[Expr]) -> Ty {
        if matches!(operand.kind, ExprKind::Literal(_)) {
            self.type_error("Must be a column or expression", operand.span.start);
            return Ty::Error;
        }
        let ot = self.walk(operand);

        let mut array_ty: Option<DataType> = None;
        let mut mixed = false;
        for item in items {
            let ty = match item.kind {
                ExprKind::Literal(Literal::String(_)) => DataType::Str,
                ExprKind::Literal(Literal::Int(_)) | ExprKind::Literal(Literal::Float(_)) => {
                    DataType::Num
                }
                _ => continue, // nulls are always allowed
            };
            match array_ty {
                None => array_ty = Some(ty),
                Some(seen) if seen != ty => mixed = true,
                Some(_) => {}
            }
        }
        if mixed {
            // reported at the head of the array
            let offset = items
                .first()
                .map(|i| i.span.start)
                .unwrap_or(operand.span.start);
            self.type_error(
                "An array may not contain both strings and numbers",
                offset,
            );
            return Ty::Error;
        }

        if let (Ty::Known(col), Some(arr)) = (ot, array_ty)
            && col != arr
        {
            self.type_error(
                format!("Can't compare {} to {}", col.name(), arr.name()),
                operand.span.start,
            );
            return Ty::Error;
        }
        Ty::Known(DataType::Bool)
    }

    fn between(&mut self, operand: &Expr, low: &Expr, high: &Expr) -> Ty {
        let ot = self.walk(operand);
        let lt = self.walk(low);
        let ht = self.walk(high);
        if ot == Ty::Error || lt == Ty::Error || ht == Ty::Error {
            return Ty::Known(DataType::Bool);
        }
        let compatible = |vt: Ty, value: &Expr| match (ot, vt) {
            (Ty::Known(col), Ty::Known(v)) => {
                col == v
                    || (col.is_dateish() && v.is_dateish())
                    || (col.is_dateish()
                        && v == DataType::Str
                        && matches!(value.kind, ExprKind::Literal(Literal::String(_))))
            }
            _ => false,
        };
        if !compatible(lt, low) || !compatible(ht, high) {
            self.type_error(
                format!(
                    "When using between, the column ({}) and between values ({}, {}) \
                     must be the same data type.",
                    ot.type_vocab(),
                    lt.type_vocab(),
                    ht.type_vocab()
                ),
                operand.span.start,
            );
            return Ty::Error;
        }
        Ty::Known(DataType::Bool)
    }

    fn call(&mut self, call: &Expr, name: &str, args: &[Expr]) -> Ty {
        if is_aggregation(name) {
            self.found_aggregation = true;
        }

        match name {
            "sum" | "avg" => self.numeric_aggregation(call, name, args),
            n if n.starts_with("percentile") => {
                let ty = self.numeric_aggregation(call, name, args);
                self.check_percentile(call, n);
                ty
            }
            "min" | "max" => {
                let Some(arg) = single_arg(args) else {
                    self.type_error(format!("{name} requires one argument"), call.span.start);
                    return Ty::Error;
                };
                match self.walk(arg) {
                    Ty::Known(DataType::Bool) => {
                        self.type_error(
                            format!("A bool can not be aggregated using {name}."),
                            call.span.start,
                        );
                        Ty::Error
                    }
                    Ty::Known(dt) => Ty::Known(dt),
                    _ => Ty::Error,
                }
            }
            "count" | "count_distinct" => {
                let Some(arg) = single_arg(args) else {
                    self.type_error(format!("{name} requires one argument"), call.span.start);
                    return Ty::Error;
                };
                if !matches!(arg.kind, ExprKind::Star) {
                    self.walk(arg);
                }
                Ty::Known(DataType::Num)
            }
            "substr" => {
                let types: Vec<Ty> = args.iter().map(|a| self.walk(a)).collect();
                let well_formed = (2..=3).contains(&args.len())
                    && matches!(types[0], Ty::Known(DataType::Str) | Ty::Error)
                    && types[1..]
                        .iter()
                        .all(|t| matches!(t, Ty::Known(DataType::Num) | Ty::Error));
                if !well_formed {
                    self.type_error(
                        "substr requires a string, a position, and an optional length",
                        call.span.start,
                    );
                    return Ty::Error;
                }
                Ty::Known(DataType::Str)
            }
            "coalesce" => {
                if args.len() < 2 {
                    self.type_error("coalesce requires at least two values", call.span.start);
                    return Ty::Error;
                }
                self.unify_values(args.iter(), "coalesce statement")
            }
            "string" => {
                self.walk_single(call, name, args);
                Ty::Known(DataType::Str)
            }
            "int" => {
                self.walk_single(call, name, args);
                Ty::Known(DataType::Num)
            }
            "date" | "day" | "month" | "quarter" | "year" | "week" => {
                let Some(arg) = single_arg(args) else {
                    self.type_error(format!("{name} requires one argument"), call.span.start);
                    return Ty::Error;
                };
                let ty = self.walk(arg);
                if !ty.is_dateish() && ty != Ty::Error {
                    self.type_error(
                        "This should be a date or datetime column or expression",
                        arg.span.start,
                    );
                    return Ty::Error;
                }
                Ty::Known(DataType::Date)
            }
            _ => {
                // the parser only admits known names
                self.type_error(format!("{name} is not a valid function"), call.span.start);
                Ty::Error
            }
        }
    }

    fn numeric_aggregation(&mut self, call: &Expr, name: &str, args: &[Expr]) -> Ty {
        let Some(arg) = single_arg(args) else {
            self.type_error(format!("{name} requires one argument"), call.span.start);
            return Ty::Error;
        };
        match self.walk(arg) {
            Ty::Known(DataType::Num) => Ty::Known(DataType::Num),
            Ty::Known(dt) => {
                self.type_error(
                    format!("A {} can not be aggregated using {name}.", dt.name()),
                    call.span.start,
                );
                Ty::Error
            }
            // the bad column was already reported
            _ => Ty::Error,
        }
    }

    fn check_percentile(&mut self, call: &Expr, name: &str) {
        let digits = name.trim_start_matches("percentile");
        if let Ok(value) = digits.parse::<u32>()
            && !SUPPORTED_PERCENTILES.contains(&value)
        {
            self.error(
                ValidationErrorKind::Unsupported,
                format!("Percentile values of {value} are not supported."),
                call.span.start,
            );
        }
        if !self.dialect.supports_percentiles {
            self.error(
                ValidationErrorKind::Unsupported,
                format!("Percentile is not supported on {}", self.dialect.name),
                call.span.start,
            );
        }
    }

    fn walk_single(&mut self, call: &Expr, name: &str, args: &[Expr]) {
        if let Some(arg) = single_arg(args) {
            self.walk(arg);
        } else {
            self.type_error(format!("{name} requires one argument"), call.span.start);
        }
    }

    fn if_call(&mut self, call: &Expr, cases: &[(Expr, Expr)], otherwise: Option<&Expr>) -> Ty {
        if cases.is_empty() {
            self.type_error("if requires a condition and a value", call.span.start);
            return Ty::Error;
        }
        for (cond, _) in cases {
            let ct = self.walk(cond);
            if !ct.is(DataType::Bool) && ct != Ty::Error {
                self.type_error(
                    "This should be a boolean column or expression",
                    cond.span.start,
                );
            }
        }
        self.unify_values(
            cases.iter().map(|(_, v)| v).chain(otherwise),
            "if statement",
        )
    }

    /// All branch values must land on one type; nulls fit anywhere.
    fn unify_values<'e>(
        &mut self,
        values: impl Iterator<Item = &'e Expr>,
        construct: &str,
    ) -> Ty {
        let mut unified: Option<(DataType, usize)> = None;
        let mut failed = false;
        for value in values {
            let ty = self.walk(value);
            let Ty::Known(dt) = ty else { continue };
            match unified {
                None => unified = Some((dt, value.span.start)),
                Some((seen, _)) if seen != dt && !(seen.is_dateish() && dt.is_dateish()) => {
                    if !failed {
                        self.type_error(
                            format!(
                                "The values in this {construct} must be the same type, \
                                 not {} and {}",
                                seen.name(),
                                dt.name()
                            ),
                            value.span.start,
                        );
                        failed = true;
                    }
                }
                Some(_) => {}
            }
        }
        match unified {
            Some((dt, _)) if !failed => Ty::Known(dt),
            Some(_) => Ty::Error,
            None => Ty::Null,
        }
    }
}

fn single_arg(args: &[Expr]) -> Option<&Expr> {
    match args {
        [arg] => Some(arg),
        _ => None,
    }
}
