//! SQL text rendering for the IR
//!
//! A single-line `Display` impl with precedence-aware parenthesization. The
//! output is deterministic and stable, which the test suites rely on; the
//! surrounding system may render the IR however it likes, but this is the
//! reference reading of a compiled expression.

use chrono::Timelike;
use std::fmt::{self, Display};

use crate::ast::BinOp;
use crate::ast::core::{Sql, SqlKind, Value};

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => {
                if n.is_finite() && n.fract() == 0.0 {
                    write!(f, "{n:.1}")
                } else {
                    write!(f, "{n}")
                }
            }
            Value::Bool(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Value::Null => write!(f, "NULL"),
            Value::Date(d) => write!(f, "'{d}'"),
            Value::Datetime(m) => {
                write!(f, "'{}", m.format("%Y-%m-%d %H:%M:%S"))?;
                let micros = m.time().nanosecond() / 1_000;
                if micros != 0 {
                    write!(f, ".{micros:06}")?;
                }
                write!(f, "'")
            }
        }
    }
}

fn op_symbol(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Eq => "=",
        BinOp::Ne => "!=",
        BinOp::Lt => "<",
        BinOp::Le => "<=",
        BinOp::Gt => ">",
        BinOp::Ge => ">=",
        BinOp::And => "AND",
        BinOp::Or => "OR",
    }
}

/// Binding strength; higher binds tighter. Non-operator nodes are atoms.
fn precedence(sql: &Sql) -> u8 {
    match &sql.kind {
        SqlKind::BinaryOp { op, .. } => match op {
            BinOp::Or => 1,
            BinOp::And => 2,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => 3,
            BinOp::Add | BinOp::Sub => 4,
            BinOp::Mul | BinOp::Div => 5,
        },
        _ => u8::MAX,
    }
}

fn is_binary(sql: &Sql) -> bool {
    matches!(sql.kind, SqlKind::BinaryOp { .. })
}

impl Display for Sql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SqlKind::Column { table, column } => write!(f, "{table}.{column}"),
            SqlKind::Literal(value) => write!(f, "{value}"),
            SqlKind::Star => write!(f, "*"),
            SqlKind::Keyword(k) => write!(f, "{k}"),

            SqlKind::Not(inner) => {
                if is_binary(inner) || matches!(inner.kind, SqlKind::Between { .. }) {
                    write!(f, "NOT ({inner})")
                } else {
                    write!(f, "NOT {inner}")
                }
            }

            SqlKind::BinaryOp { op, left, right } => write_binary(f, *op, left, right),

            SqlKind::Concat(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, " || ")?;
                    }
                    write!(f, "{part}")?;
                }
                Ok(())
            }

            SqlKind::Call {
                name,
                args,
                distinct,
            } => {
                write!(f, "{name}(")?;
                if *distinct {
                    write!(f, "DISTINCT ")?;
                }
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    // a bare DISTINCT operand reads fine; operator
                    // expressions don't
                    if *distinct && is_binary(arg) {
                        write!(f, "({arg})")?;
                    } else {
                        write!(f, "{arg}")?;
                    }
                }
                write!(f, ")")
            }

            SqlKind::Case { cases, otherwise } => {
                write!(f, "CASE")?;
                for (cond, value) in cases {
                    if is_binary(cond) {
                        write!(f, " WHEN ({cond}) THEN {value}")?;
                    } else {
                        write!(f, " WHEN {cond} THEN {value}")?;
                    }
                }
                if let Some(e) = otherwise {
                    write!(f, " ELSE {e}")?;
                }
                write!(f, " END")
            }

            SqlKind::Cast { expr, type_name } => write!(f, "CAST({expr} AS {type_name})"),

            SqlKind::In {
                operand,
                items,
                negated,
            } => {
                if *negated {
                    write!(f, "({operand} NOT IN (")?;
                } else {
                    write!(f, "{operand} IN (")?;
                }
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")?;
                if *negated {
                    write!(f, ")")?;
                }
                Ok(())
            }

            SqlKind::Between { operand, low, high } => {
                write!(f, "{operand} BETWEEN {low} AND {high}")
            }

            SqlKind::IsNull { operand, negated } => {
                if *negated {
                    write!(f, "{operand} IS NOT NULL")
                } else {
                    write!(f, "{operand} IS NULL")
                }
            }

            SqlKind::Like {
                operand,
                pattern,
                case_insensitive,
            } => {
                let op = if *case_insensitive { "ILIKE" } else { "LIKE" };
                write!(f, "{operand} {op} {pattern}")
            }
        }
    }
}

fn write_binary(f: &mut fmt::Formatter<'_>, op: BinOp, left: &Sql, right: &Sql) -> fmt::Result {
    let parent = match op {
        BinOp::Or => 1,
        BinOp::And => 2,
        BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => 3,
        BinOp::Add | BinOp::Sub => 4,
        BinOp::Mul | BinOp::Div => 5,
    };

    let needs_parens = |child: &Sql, is_right: bool| -> bool {
        if !is_binary(child) {
            return false;
        }
        let child_prec = precedence(child);
        if child_prec < parent {
            return true;
        }
        // comparisons don't chain: a nested comparison always reads better
        // wrapped (`a = (b > c)`)
        if parent == 3 && child_prec == 3 {
            return true;
        }
        // non-associative right sides: a - (b + c), a / (b * c)
        if is_right && child_prec == parent && matches!(op, BinOp::Sub | BinOp::Div) {
            return true;
        }
        false
    };

    if needs_parens(left, false) {
        write!(f, "({left})")?;
    } else {
        write!(f, "{left}")?;
    }
    write!(f, " {} ", op_symbol(op))?;
    if needs_parens(right, true) {
        write!(f, "({right})")?;
    } else {
        write!(f, "{right}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DataType;

    fn col(name: &str, datatype: DataType) -> Sql {
        Sql::new(
            SqlKind::Column {
                table: "t".into(),
                column: name.into(),
            },
            datatype,
        )
    }

    fn binop(op: BinOp, l: Sql, r: Sql, datatype: DataType) -> Sql {
        Sql::new(
            SqlKind::BinaryOp {
                op,
                left: Box::new(l),
                right: Box::new(r),
            },
            datatype,
        )
    }

    #[test]
    fn floats_always_show_a_decimal() {
        assert_eq!(Value::Float(4.0).to_string(), "4.0");
        assert_eq!(Value::Float(-1.5).to_string(), "-1.5");
        assert_eq!(Value::Float(2.24).to_string(), "2.24");
        assert_eq!(Value::Int(600).to_string(), "600");
    }

    #[test]
    fn strings_escape_single_quotes() {
        assert_eq!(Value::String("it's".into()).to_string(), "'it''s'");
    }

    #[test]
    fn and_parenthesizes_or_children_only() {
        let a = col("a", DataType::Bool);
        let b = col("b", DataType::Bool);
        let c = col("c", DataType::Bool);
        let or = binop(BinOp::Or, b.clone(), c.clone(), DataType::Bool);
        let and = binop(BinOp::And, a.clone(), or, DataType::Bool);
        assert_eq!(and.to_string(), "t.a AND (t.b OR t.c)");

        let and2 = binop(
            BinOp::And,
            binop(BinOp::And, a, b, DataType::Bool),
            c,
            DataType::Bool,
        );
        assert_eq!(and2.to_string(), "t.a AND t.b AND t.c");
    }

    #[test]
    fn nested_comparisons_are_wrapped() {
        let inner = binop(
            BinOp::Gt,
            col("score", DataType::Num),
            Sql::literal(Value::Int(3), DataType::Num),
            DataType::Bool,
        );
        let outer = binop(BinOp::Eq, col("flag", DataType::Bool), inner, DataType::Bool);
        assert_eq!(outer.to_string(), "t.flag = (t.score > 3)");
    }

    #[test]
    fn negated_in_is_wrapped() {
        let sql = Sql::new(
            SqlKind::In {
                operand: Box::new(col("score", DataType::Num)),
                items: vec![
                    Sql::literal(Value::Int(1), DataType::Num),
                    Sql::literal(Value::Int(2), DataType::Num),
                ],
                negated: true,
            },
            DataType::Bool,
        );
        assert_eq!(sql.to_string(), "(t.score NOT IN (1, 2))");
    }

    #[test]
    fn datetimes_render_micros_only_when_present() {
        use chrono::NaiveDate;
        let midnightish = NaiveDate::from_ymd_opt(2020, 1, 30)
            .unwrap()
            .and_hms_opt(9, 21, 34)
            .unwrap();
        assert_eq!(
            Value::Datetime(midnightish).to_string(),
            "'2020-01-30 09:21:34'"
        );
        let eod = crate::dates::end_of_day(NaiveDate::from_ymd_opt(2020, 1, 30).unwrap());
        assert_eq!(
            Value::Datetime(eod).to_string(),
            "'2020-01-30 23:59:59.999999'"
        );
    }
}
