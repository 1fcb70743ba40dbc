//! Transform the validated surface AST into the SQL IR
//!
//! Bottom-up rebuild with all simplification centralized here:
//! - numeric and string-literal constant folding
//! - boolean short-circuit folding (`x AND true` drops the literal)
//! - `NOT` rewriting (comparison flips, IN/IS NULL toggles, double-NOT)
//! - comparison normalization (column moves to the left, `= NULL` becomes
//!   `IS NULL`)
//! - division guards (literal zero fails, literal one vanishes, runtime
//!   denominators get a CASE guard)
//! - date resolution against the reference moment, with values adapted to
//!   the compared column's granularity
//! - dialect-specific call shapes for date parts, casts, and ILIKE

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::ast::core::{Sql, SqlKind, Value};
use crate::ast::surface::{Expr, ExprKind, RangeOffset, RangeUnit};
use crate::ast::{BinOp, Literal};
use crate::catalog::DataType;
use crate::dates::{self, DateValue};
use crate::dialect::{DialectProfile, TruncStyle};
use crate::grammar::Grammar;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("When dividing, the denominator can not be zero")]
    ZeroDenominator,

    #[error("Can't convert '{0}' to a date.")]
    DateConversion(String),

    #[error("Must return an expression, not a constant value")]
    ConstantExpression,

    #[error("Unknown dialect {0}")]
    UnknownDialect(String),
}

type Result<T> = std::result::Result<T, TransformError>;

/// Which bound of a range a date value lands on; range ends extend to the
/// last moment of their day when the column has datetime granularity.
#[derive(Clone, Copy, PartialEq)]
enum Bound {
    Point,
    Start,
    End,
}

pub(crate) struct Transformer<'a> {
    pub grammar: &'a Grammar,
    pub dialect: &'a DialectProfile,
    pub reference: NaiveDateTime,
    pub convert_dates_with: Option<&'a str>,
    pub convert_datetimes_with: Option<&'a str>,
}

pub(crate) fn transform(tree: &Expr, t: &Transformer<'_>) -> Result<Sql> {
    t.walk(tree)
}

impl Transformer<'_> {
    fn walk(&self, expr: &Expr) -> Result<Sql> {
        match &expr.kind {
            ExprKind::Column(name) => self.column(name),
            ExprKind::BareColumn(name) => self.column(name),
            ExprKind::Literal(lit) => Ok(literal(lit)),
            ExprKind::Date(phrase) => self.date_literal(phrase),
            ExprKind::Star => Ok(Sql::new(SqlKind::Star, DataType::Num)),
            ExprKind::BinaryOp(left, op, right) => {
                let l = self.walk(left)?;
                let r = self.walk(right)?;
                if op.is_arithmetic() {
                    self.arithmetic(*op, l, r)
                } else if op.is_comparison() {
                    self.comparison(*op, l, r)
                } else {
                    Ok(logical(*op, l, r))
                }
            }
            ExprKind::Not(inner) => Ok(negate(self.walk(inner)?)),
            ExprKind::IsNull { operand, negated } => Ok(Sql::new(
                SqlKind::IsNull {
                    operand: Box::new(self.walk(operand)?),
                    negated: *negated,
                },
                DataType::Bool,
            )),
            ExprKind::IsRange {
                operand,
                offset,
                unit,
            } => self.date_range(operand, *offset, *unit),
            ExprKind::In {
                operand,
                items,
                negated,
            } => {
                let operand = self.walk(operand)?;
                let items = items
                    .iter()
                    .map(|i| self.walk(i).map(normalize_array_item))
                    .collect::<Result<_>>()?;
                Ok(Sql::new(
                    SqlKind::In {
                        operand: Box::new(operand),
                        items,
                        negated: *negated,
                    },
                    DataType::Bool,
                ))
            }
            ExprKind::Between { operand, low, high } => {
                let operand = self.walk(operand)?;
                let col_ty = operand.datatype;
                let low = self.adapt_date(self.walk(low)?, col_ty, Bound::Start)?;
                let high = self.adapt_date(self.walk(high)?, col_ty, Bound::End)?;
                Ok(Sql::new(
                    SqlKind::Between {
                        operand: Box::new(operand),
                        low: Box::new(low),
                        high: Box::new(high),
                    },
                    DataType::Bool,
                ))
            }
            ExprKind::Like {
                operand,
                pattern,
                case_insensitive,
            } => self.like(operand, pattern, *case_insensitive),
            ExprKind::Call { name, args } => self.call(name, args),
            ExprKind::If { cases, otherwise } => self.if_call(cases, otherwise.as_deref()),
        }
    }

    fn column(&self, name: &str) -> Result<Sql> {
        let rule = self
            .grammar
            .resolve(name)
            .expect("validation admits only known columns");
        let sql = Sql::new(
            SqlKind::Column {
                table: self.grammar.table().to_string(),
                column: rule.column.clone(),
            },
            rule.datatype,
        );
        match rule.datatype {
            DataType::Date => self.apply_converter(sql, self.convert_dates_with),
            DataType::Datetime => self.apply_converter(sql, self.convert_datetimes_with),
            _ => Ok(sql),
        }
    }

    fn apply_converter(&self, sql: Sql, converter: Option<&str>) -> Result<Sql> {
        let Some(name) = converter else { return Ok(sql) };
        // converters that don't exist convert nothing
        let Some(unit) = converter_unit(name) else {
            return Ok(sql);
        };
        let datatype = sql.datatype;
        self.trunc(unit, sql, datatype)
    }

    fn date_literal(&self, phrase: &str) -> Result<Sql> {
        match dates::resolve_date_phrase(phrase, self.reference) {
            Some(DateValue::Date(d)) => Ok(Sql::literal(Value::Date(d), DataType::Date)),
            Some(DateValue::Moment(m)) => {
                Ok(Sql::literal(Value::Datetime(m), DataType::Datetime))
            }
            None => Err(TransformError::DateConversion(phrase.to_string())),
        }
    }

    // ============ Arithmetic ============

    fn arithmetic(&self, op: BinOp, left: Sql, right: Sql) -> Result<Sql> {
        if op == BinOp::Add && left.datatype == DataType::Str {
            return Ok(concat(left, right));
        }
        if op == BinOp::Div {
            return self.divide(left, right);
        }
        if let (SqlKind::Literal(a), SqlKind::Literal(b)) = (&left.kind, &right.kind)
            && let Some(folded) = fold_arithmetic(op, a, b)
        {
            return Ok(Sql::literal(folded, DataType::Num));
        }
        Ok(Sql::new(
            SqlKind::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            DataType::Num,
        ))
    }

    fn divide(&self, numerator: Sql, denominator: Sql) -> Result<Sql> {
        if let Some(d) = denominator.as_number() {
            if d == 0.0 {
                return Err(TransformError::ZeroDenominator);
            }
            if d == 1.0 {
                return Ok(numerator);
            }
            if let Some(n) = numerator.as_number() {
                return Ok(Sql::literal(Value::Float(n / d), DataType::Num));
            }
            return Ok(Sql::new(
                SqlKind::BinaryOp {
                    op: BinOp::Div,
                    left: Box::new(self.cast_float(numerator)),
                    right: Box::new(denominator),
                },
                DataType::Num,
            ));
        }

        // runtime guard against zero denominators
        let guard = Sql::new(
            SqlKind::BinaryOp {
                op: BinOp::Eq,
                left: Box::new(denominator.clone()),
                right: Box::new(Sql::literal(Value::Int(0), DataType::Num)),
            },
            DataType::Bool,
        );
        let division = Sql::new(
            SqlKind::BinaryOp {
                op: BinOp::Div,
                left: Box::new(self.cast_float(numerator)),
                right: Box::new(self.cast_float(denominator)),
            },
            DataType::Num,
        );
        Ok(Sql::new(
            SqlKind::Case {
                cases: vec![(guard, Sql::literal(Value::Null, DataType::Num))],
                otherwise: Some(Box::new(division)),
            },
            DataType::Num,
        ))
    }

    /// Literals stay bare; everything else is cast to the dialect float type.
    fn cast_float(&self, sql: Sql) -> Sql {
        if sql.is_literal() {
            return sql;
        }
        Sql::new(
            SqlKind::Cast {
                expr: Box::new(sql),
                type_name: self.dialect.float_type.to_string(),
            },
            DataType::Num,
        )
    }

    // ============ Comparisons ============

    fn comparison(&self, op: BinOp, left: Sql, right: Sql) -> Result<Sql> {
        // NULL comparisons become IS [NOT] NULL
        if matches!(right.kind, SqlKind::Literal(Value::Null)) {
            if let Some(negated) = null_check(op) {
                return Ok(is_null(left, negated));
            }
        }
        if matches!(left.kind, SqlKind::Literal(Value::Null)) {
            if let Some(negated) = null_check(op) {
                return Ok(is_null(right, negated));
            }
        }

        // the column belongs on the left
        let (mut op, mut left, mut right) = (op, left, right);
        if left.is_literal() && !right.is_literal() {
            std::mem::swap(&mut left, &mut right);
            op = op.reversed();
        }

        if left.datatype.is_dateish() && !left.is_literal() {
            right = self.adapt_date(right, left.datatype, Bound::Point)?;
        }

        Ok(Sql::new(
            SqlKind::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            DataType::Bool,
        ))
    }

    /// Fit a date-valued literal to the granularity of the column it is
    /// compared against. Non-literals and non-date columns pass through.
    fn adapt_date(&self, sql: Sql, col_ty: DataType, bound: Bound) -> Result<Sql> {
        if !col_ty.is_dateish() {
            return Ok(sql);
        }
        let value = match &sql.kind {
            SqlKind::Literal(Value::String(s)) => dates::resolve_date_phrase(s, self.reference)
                .ok_or_else(|| TransformError::DateConversion(s.clone()))?,
            SqlKind::Literal(Value::Date(d)) => DateValue::Date(*d),
            SqlKind::Literal(Value::Datetime(m)) => DateValue::Moment(*m),
            _ => return Ok(sql),
        };
        if col_ty == DataType::Date {
            return Ok(Sql::literal(Value::Date(value.date()), DataType::Date));
        }
        let moment = match (value, bound) {
            (DateValue::Date(d), Bound::End) => dates::end_of_day(d),
            (DateValue::Date(d), _) => dates::start_of_day(d),
            (DateValue::Moment(m), Bound::End) => dates::promote_to_end_of_day(m),
            (DateValue::Moment(m), _) => m,
        };
        Ok(Sql::literal(Value::Datetime(moment), DataType::Datetime))
    }

    fn date_range(&self, operand: &Expr, offset: RangeOffset, unit: RangeUnit) -> Result<Sql> {
        let operand = self.walk(operand)?;
        let col_ty = operand.datatype;
        let (start, end) = dates::period_range(offset, unit, self.reference.date());
        let low = self.adapt_date(
            Sql::literal(Value::Date(start), DataType::Date),
            col_ty,
            Bound::Start,
        )?;
        let high = self.adapt_date(
            Sql::literal(Value::Date(end), DataType::Date),
            col_ty,
            Bound::End,
        )?;
        Ok(Sql::new(
            SqlKind::Between {
                operand: Box::new(operand),
                low: Box::new(low),
                high: Box::new(high),
            },
            DataType::Bool,
        ))
    }

    // ============ LIKE / ILIKE ============

    fn like(&self, operand: &Expr, pattern: &Expr, case_insensitive: bool) -> Result<Sql> {
        let mut operand = self.walk(operand)?;
        let mut pattern = self.walk(pattern)?;

        // patterns without wildcards match anywhere in the value
        if let SqlKind::Literal(Value::String(s)) = &pattern.kind
            && !s.contains('%')
            && !s.contains('_')
        {
            pattern = Sql::literal(Value::String(format!("%{s}%")), DataType::Str);
        }

        let mut native = false;
        if case_insensitive {
            if self.dialect.native_ilike {
                native = true;
            } else {
                operand = Sql::call("lower", vec![operand], DataType::Str);
                pattern = Sql::call("lower", vec![pattern], DataType::Str);
            }
        }
        Ok(Sql::new(
            SqlKind::Like {
                operand: Box::new(operand),
                pattern: Box::new(pattern),
                case_insensitive: native,
            },
            DataType::Bool,
        ))
    }

    // ============ Function calls ============

    fn call(&self, name: &str, args: &[Expr]) -> Result<Sql> {
        match name {
            "sum" | "avg" => {
                let arg = self.walk(&args[0])?;
                Ok(Sql::call(name, vec![arg], DataType::Num))
            }
            "min" | "max" => {
                let arg = self.walk(&args[0])?;
                let datatype = arg.datatype;
                Ok(Sql::call(name, vec![arg], datatype))
            }
            "count" | "count_distinct" => {
                let arg = match &args[0].kind {
                    ExprKind::Star => Sql::new(SqlKind::Star, DataType::Num),
                    _ => self.walk(&args[0])?,
                };
                Ok(Sql::new(
                    SqlKind::Call {
                        name: "count".to_string(),
                        args: vec![arg],
                        distinct: name == "count_distinct",
                    },
                    DataType::Num,
                ))
            }
            n if n.starts_with("percentile") => {
                let arg = self.walk(&args[0])?;
                let fraction = n
                    .trim_start_matches("percentile")
                    .parse::<f64>()
                    .unwrap_or(50.0)
                    / 100.0;
                Ok(Sql::call(
                    "percentile_cont",
                    vec![arg, Sql::literal(Value::Float(fraction), DataType::Num)],
                    DataType::Num,
                ))
            }
            "substr" => {
                let args = args.iter().map(|a| self.walk(a)).collect::<Result<_>>()?;
                Ok(Sql::call("substr", args, DataType::Str))
            }
            "coalesce" => self.coalesce(args),
            "string" => {
                let arg = self.walk(&args[0])?;
                Ok(self.cast(arg, self.dialect.varchar_type, DataType::Str))
            }
            "int" => {
                let arg = self.walk(&args[0])?;
                Ok(self.cast(arg, self.dialect.integer_type, DataType::Num))
            }
            "date" => {
                let arg = self.walk(&args[0])?;
                if arg.datatype == DataType::Datetime {
                    if !self.dialect.known {
                        return Err(TransformError::UnknownDialect(self.dialect.name.clone()));
                    }
                    return match self.dialect.trunc {
                        TruncStyle::StringUnit => Ok(self.cast(arg, "DATE", DataType::Date)),
                        TruncStyle::KeywordUnit => self.trunc("day", arg, DataType::Date),
                    };
                }
                Ok(arg)
            }
            "day" | "month" | "quarter" | "year" | "week" => {
                let arg = self.walk(&args[0])?;
                self.trunc(name, arg, DataType::Date)
            }
            other => {
                // the validator rejects unknown names before we get here
                unreachable!("unexpected function {other}")
            }
        }
    }

    fn cast(&self, expr: Sql, type_name: &str, datatype: DataType) -> Sql {
        Sql::new(
            SqlKind::Cast {
                expr: Box::new(expr),
                type_name: type_name.to_string(),
            },
            datatype,
        )
    }

    /// The dialect-specific truncation shape.
    fn trunc(&self, unit: &str, operand: Sql, datatype: DataType) -> Result<Sql> {
        if !self.dialect.known {
            return Err(TransformError::UnknownDialect(self.dialect.name.clone()));
        }
        match self.dialect.trunc {
            TruncStyle::StringUnit => {
                Ok(Sql::call(
                    "date_trunc",
                    vec![
                        Sql::literal(Value::String(unit.to_string()), DataType::Str),
                        operand,
                    ],
                    datatype,
                ))
            }
            TruncStyle::KeywordUnit => {
                let keyword = if unit == "week" { "week(monday)" } else { unit };
                let keyword = Sql::new(SqlKind::Keyword(keyword.to_string()), DataType::Str);
                if operand.datatype == DataType::Datetime {
                    let inner = Sql::call(
                        "timestamp_trunc",
                        vec![operand, keyword],
                        DataType::Datetime,
                    );
                    Ok(Sql::call("datetime", vec![inner], datatype))
                } else {
                    Ok(Sql::call("date_trunc", vec![operand, keyword], datatype))
                }
            }
        }
    }

    fn coalesce(&self, args: &[Expr]) -> Result<Sql> {
        let mut parts: Vec<Sql> = args.iter().map(|a| self.walk(a)).collect::<Result<_>>()?;
        let datatype = parts
            .iter()
            .find(|p| !matches!(p.kind, SqlKind::Literal(Value::Null)))
            .map(|p| p.datatype)
            .unwrap_or(DataType::Num);
        if datatype.is_dateish() {
            parts = parts
                .into_iter()
                .map(|p| self.adapt_date(p, datatype, Bound::Point))
                .collect::<Result<_>>()?;
        }
        Ok(Sql::call("coalesce", parts, datatype))
    }

    fn if_call(&self, cases: &[(Expr, Expr)], otherwise: Option<&Expr>) -> Result<Sql> {
        let cases: Vec<(Sql, Sql)> = cases
            .iter()
            .map(|(c, v)| Ok((self.walk(c)?, self.walk(v)?)))
            .collect::<Result<_>>()?;
        let mut otherwise = match otherwise {
            Some(e) => Some(Box::new(self.walk(e)?)),
            None => None,
        };
        // a trailing NULL else is the same as no else
        if otherwise
            .as_ref()
            .is_some_and(|o| matches!(o.kind, SqlKind::Literal(Value::Null)))
        {
            otherwise = None;
        }
        let datatype = cases
            .iter()
            .map(|(_, v)| v)
            .chain(otherwise.as_deref())
            .find(|v| !matches!(v.kind, SqlKind::Literal(Value::Null)))
            .map(|v| v.datatype)
            .unwrap_or(DataType::Num);
        Ok(Sql::new(SqlKind::Case { cases, otherwise }, datatype))
    }
}

// ============ Pure rewrites ============

/// A converter names a truncation via the `<unit>_conv` convention
/// (`year_conv`, `month_conv`, …). Names that don't resolve to a known
/// truncation unit convert nothing.
fn converter_unit(name: &str) -> Option<&'static str> {
    match name.strip_suffix("_conv")? {
        "day" => Some("day"),
        "week" => Some("week"),
        "month" => Some("month"),
        "quarter" => Some("quarter"),
        "year" => Some("year"),
        _ => None,
    }
}

fn literal(lit: &Literal) -> Sql {
    match lit {
        Literal::Int(n) => Sql::literal(Value::Int(*n), DataType::Num),
        Literal::Float(n) => Sql::literal(Value::Float(*n), DataType::Num),
        Literal::String(s) => Sql::literal(Value::String(s.clone()), DataType::Str),
        Literal::Bool(b) => Sql::literal(Value::Bool(*b), DataType::Bool),
        Literal::Null => Sql::literal(Value::Null, DataType::Num),
    }
}

/// Fold `+ - *` over numeric literals; int stays int, anything touching a
/// float becomes a float. Division folds elsewhere (it always yields float).
fn fold_arithmetic(op: BinOp, left: &Value, right: &Value) -> Option<Value> {
    let as_f64 = |v: &Value| match v {
        Value::Int(n) => Some(*n as f64),
        Value::Float(n) => Some(*n),
        _ => None,
    };
    if let (Value::Int(a), Value::Int(b)) = (left, right) {
        return Some(match op {
            BinOp::Add => Value::Int(a + b),
            BinOp::Sub => Value::Int(a - b),
            BinOp::Mul => Value::Int(a * b),
            _ => return None,
        });
    }
    let (a, b) = (as_f64(left)?, as_f64(right)?);
    Some(match op {
        BinOp::Add => Value::Float(a + b),
        BinOp::Sub => Value::Float(a - b),
        BinOp::Mul => Value::Float(a * b),
        _ => return None,
    })
}

/// String concatenation, flattened; two literals fold into one.
fn concat(left: Sql, right: Sql) -> Sql {
    if let (SqlKind::Literal(Value::String(a)), SqlKind::Literal(Value::String(b))) =
        (&left.kind, &right.kind)
    {
        return Sql::literal(Value::String(format!("{a}{b}")), DataType::Str);
    }
    let mut parts = match left.kind {
        SqlKind::Concat(parts) => parts,
        _ => vec![left],
    };
    match right.kind {
        SqlKind::Concat(more) => parts.extend(more),
        _ => parts.push(right),
    }
    Sql::new(SqlKind::Concat(parts), DataType::Str)
}

/// AND/OR with boolean-literal short circuits.
fn logical(op: BinOp, left: Sql, right: Sql) -> Sql {
    let as_bool = |s: &Sql| match s.kind {
        SqlKind::Literal(Value::Bool(b)) => Some(b),
        _ => None,
    };
    match (op, as_bool(&left), as_bool(&right)) {
        (BinOp::And, Some(true), _) => return right,
        (BinOp::And, _, Some(true)) => return left,
        (BinOp::And, Some(false), _) | (BinOp::And, _, Some(false)) => {
            return Sql::literal(Value::Bool(false), DataType::Bool);
        }
        (BinOp::Or, Some(false), _) => return right,
        (BinOp::Or, _, Some(false)) => return left,
        (BinOp::Or, Some(true), _) | (BinOp::Or, _, Some(true)) => {
            return Sql::literal(Value::Bool(true), DataType::Bool);
        }
        _ => {}
    }
    Sql::new(
        SqlKind::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        DataType::Bool,
    )
}

/// Negation with rewrites: comparisons flip their operator, IN and IS NULL
/// toggle, double negation cancels; only irreducible shapes keep a NOT node.
fn negate(sql: Sql) -> Sql {
    match sql.kind {
        SqlKind::BinaryOp { op, left, right } if op.negated().is_some() => Sql::new(
            SqlKind::BinaryOp {
                op: op.negated().unwrap_or(op),
                left,
                right,
            },
            DataType::Bool,
        ),
        SqlKind::In {
            operand,
            items,
            negated,
        } => Sql::new(
            SqlKind::In {
                operand,
                items,
                negated: !negated,
            },
            DataType::Bool,
        ),
        SqlKind::IsNull { operand, negated } => Sql::new(
            SqlKind::IsNull {
                operand,
                negated: !negated,
            },
            DataType::Bool,
        ),
        SqlKind::Not(inner) => *inner,
        SqlKind::Literal(Value::Bool(b)) => Sql::literal(Value::Bool(!b), DataType::Bool),
        kind => Sql::new(
            SqlKind::Not(Box::new(Sql::new(kind, DataType::Bool))),
            DataType::Bool,
        ),
    }
}

/// Whole-valued floats in IN arrays read as integers (`(1, 2, 3)`, not
/// `(1, 2, 3.0)`).
fn normalize_array_item(sql: Sql) -> Sql {
    if let SqlKind::Literal(Value::Float(f)) = sql.kind
        && f.is_finite()
        && f.fract() == 0.0
    {
        return Sql::literal(Value::Int(f as i64), DataType::Num);
    }
    sql
}

fn null_check(op: BinOp) -> Option<bool> {
    match op {
        BinOp::Eq => Some(false),
        BinOp::Ne => Some(true),
        _ => None,
    }
}

fn is_null(operand: Sql, negated: bool) -> Sql {
    Sql::new(
        SqlKind::IsNull {
            operand: Box::new(operand),
            negated,
        },
        DataType::Bool,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folding_preserves_intness() {
        assert_eq!(
            fold_arithmetic(BinOp::Mul, &Value::Int(2), &Value::Int(3)),
            Some(Value::Int(6))
        );
        assert_eq!(
            fold_arithmetic(BinOp::Add, &Value::Int(3), &Value::Float(0.5)),
            Some(Value::Float(3.5))
        );
        assert_eq!(
            fold_arithmetic(BinOp::Div, &Value::Int(2), &Value::Int(3)),
            None
        );
    }

    #[test]
    fn negate_flips_comparisons() {
        let cmp = Sql::new(
            SqlKind::BinaryOp {
                op: BinOp::Ge,
                left: Box::new(Sql::literal(Value::Int(1), DataType::Num)),
                right: Box::new(Sql::literal(Value::Int(2), DataType::Num)),
            },
            DataType::Bool,
        );
        let negated = negate(cmp);
        assert!(matches!(
            negated.kind,
            SqlKind::BinaryOp { op: BinOp::Lt, .. }
        ));
    }

    #[test]
    fn negate_cancels_itself() {
        let operand = Sql::new(
            SqlKind::Column {
                table: "t".into(),
                column: "flag".into(),
            },
            DataType::Bool,
        );
        let double = negate(negate(operand.clone()));
        assert_eq!(double, operand);
    }

    #[test]
    fn logical_short_circuits() {
        let cmp = Sql::new(
            SqlKind::Column {
                table: "t".into(),
                column: "flag".into(),
            },
            DataType::Bool,
        );
        let t = Sql::literal(Value::Bool(true), DataType::Bool);
        let f = Sql::literal(Value::Bool(false), DataType::Bool);
        assert_eq!(logical(BinOp::And, cmp.clone(), t.clone()), cmp);
        assert_eq!(logical(BinOp::And, cmp.clone(), f.clone()), f);
        assert_eq!(logical(BinOp::Or, cmp.clone(), f.clone()), cmp);
        assert_eq!(logical(BinOp::Or, cmp.clone(), t.clone()), t);
    }
}
