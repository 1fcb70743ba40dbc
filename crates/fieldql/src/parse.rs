//! Parser for field expressions
//!
//! Produces a source-spanned `surface::Expr` which is validated and then
//! transformed into the SQL IR. The combinators implement the generated
//! grammar's rules; ambiguity is resolved by ordered choice, so identical
//! input always yields identical trees.
//!
//! Two resolution quirks are deliberate and match the original language:
//!
//! - `NOT` at the head of a boolean expression spans the whole remaining
//!   chain (`NOT a AND b` parses as `NOT (a AND b)`), while `NOT` inside a
//!   chain binds to the following term only.
//! - A comparison right side that begins with a boolean literal swallows the
//!   rest of the chain: `[v] = TRUE AND [s] > 3` parses as
//!   `[v] = (TRUE AND [s] > 3)`. Parentheses restore the usual grouping.

use winnow::ascii::{Caseless, digit1, multispace0};
use winnow::combinator::{alt, delimited, eof, not, opt, peek, preceded, repeat, separated,
                         terminated};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::stream::{Location, LocatingSlice};
use winnow::token::{one_of, take_while};

use crate::ast::surface::{Expr, ExprKind, RangeOffset, RangeUnit};
use crate::ast::{BinOp, Literal, Span};

type Input<'a> = LocatingSlice<&'a str>;
type PResult<T> = winnow::ModalResult<T>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (line {}, column {}, offset {})",
            self.message, self.line, self.column, self.offset
        )
    }
}

impl std::error::Error for ParseError {}

/// Parse a field expression. Offsets in the result (and in errors) index the
/// original string, which error rendering relies on for caret placement.
pub fn parse(text: &str) -> Result<Expr, ParseError> {
    let mut stream = LocatingSlice::new(text);
    match expr_tree.parse_next(&mut stream) {
        Ok(parsed) => {
            let _ = ws.parse_next(&mut stream);
            if eof::<Input<'_>, ErrMode<ContextError>>
                .parse_next(&mut stream)
                .is_ok()
            {
                Ok(parsed)
            } else {
                Err(build_parse_error(
                    "unexpected trailing input".to_string(),
                    text,
                    stream.current_token_start(),
                ))
            }
        }
        Err(e) => Err(build_parse_error(
            format!("{e:?}"),
            text,
            stream.current_token_start(),
        )),
    }
}

fn build_parse_error(message: String, input: &str, offset: usize) -> ParseError {
    let (line, column) = offset_to_line_column(input, offset);
    ParseError {
        message,
        offset,
        line,
        column,
    }
}

fn offset_to_line_column(input: &str, offset: usize) -> (usize, usize) {
    let bounded = offset.min(input.len());
    let mut line = 1usize;
    let mut column = 1usize;

    for ch in input[..bounded].chars() {
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    (line, column)
}

// ============ Boolean expressions (handles precedence) ============

fn expr_tree(input: &mut Input<'_>) -> PResult<Expr> {
    preceded(ws, alt((leading_not, or_expr))).parse_next(input)
}

/// `NOT` at the head negates everything that follows.
fn leading_not(input: &mut Input<'_>) -> PResult<Expr> {
    let (_, span) = keyword("not").with_span().parse_next(input)?;
    let inner = expr_tree.parse_next(input)?;
    let end = inner.span.end;
    Ok(Expr::new(
        ExprKind::Not(Box::new(inner)),
        span.start..end,
    ))
}

fn or_expr(input: &mut Input<'_>) -> PResult<Expr> {
    let first = and_expr.parse_next(input)?;
    let rest: Vec<Expr> =
        repeat(0.., preceded((ws, keyword("or")), and_expr)).parse_next(input)?;
    Ok(rest.into_iter().fold(first, |l, r| join(l, BinOp::Or, r)))
}

fn and_expr(input: &mut Input<'_>) -> PResult<Expr> {
    let first = bool_term.parse_next(input)?;
    let rest: Vec<Expr> =
        repeat(0.., preceded((ws, keyword("and")), bool_term)).parse_next(input)?;
    Ok(rest.into_iter().fold(first, |l, r| join(l, BinOp::And, r)))
}

fn bool_term(input: &mut Input<'_>) -> PResult<Expr> {
    preceded(ws, alt((not_term, comparison))).parse_next(input)
}

/// `NOT` inside a chain binds to the following term only.
fn not_term(input: &mut Input<'_>) -> PResult<Expr> {
    let (_, span) = keyword("not").with_span().parse_next(input)?;
    let inner = bool_term.parse_next(input)?;
    let end = inner.span.end;
    Ok(Expr::new(
        ExprKind::Not(Box::new(inner)),
        span.start..end,
    ))
}

// ============ Comparisons and their postfix forms ============

fn comparison(input: &mut Input<'_>) -> PResult<Expr> {
    let left = additive.parse_next(input)?;

    if let Some(op) = opt(preceded(ws, cmp_op)).parse_next(input)? {
        let right = preceded(ws, cmp_rhs).parse_next(input)?;
        return Ok(join(left, op, right));
    }

    if opt(preceded(ws, keyword("is"))).parse_next(input)?.is_some() {
        return is_tail(left, input);
    }

    if let Some(negated) = opt(preceded(
        ws,
        alt((
            (keyword("not"), ws, keyword("in")).value(true),
            keyword("in").value(false),
        )),
    ))
    .parse_next(input)?
    {
        let items = delimited(
            (ws, '(', ws),
            terminated(
                separated(1.., array_item, (ws, ',', ws)),
                opt((ws, ',')),
            ),
            (ws, ')'),
        )
        .parse_next(input)?;
        let span = Span {
            start: left.span.start,
            end: input.previous_token_end(),
        };
        return Ok(Expr::new(
            ExprKind::In {
                operand: Box::new(left),
                items,
                negated,
            },
            span,
        ));
    }

    if opt(preceded(ws, keyword("between")))
        .parse_next(input)?
        .is_some()
    {
        let low = preceded(ws, additive).parse_next(input)?;
        let _ = preceded(ws, keyword("and")).parse_next(input)?;
        let high = preceded(ws, additive).parse_next(input)?;
        let span = Span {
            start: left.span.start,
            end: high.span.end,
        };
        return Ok(Expr::new(
            ExprKind::Between {
                operand: Box::new(left),
                low: Box::new(low),
                high: Box::new(high),
            },
            span,
        ));
    }

    if let Some(case_insensitive) = opt(preceded(
        ws,
        alt((keyword("ilike").value(true), keyword("like").value(false))),
    ))
    .parse_next(input)?
    {
        let pattern = preceded(ws, additive).parse_next(input)?;
        let span = Span {
            start: left.span.start,
            end: pattern.span.end,
        };
        return Ok(Expr::new(
            ExprKind::Like {
                operand: Box::new(left),
                pattern: Box::new(pattern),
                case_insensitive,
            },
            span,
        ));
    }

    Ok(left)
}

/// A comparison right side beginning with a boolean literal swallows the
/// rest of the boolean chain (the documented `= TRUE AND …` behavior).
fn cmp_rhs(input: &mut Input<'_>) -> PResult<Expr> {
    let boolean_chain = opt(peek((
        alt((keyword("true"), keyword("false"))),
        ws,
        alt((keyword("and"), keyword("or"))),
    )))
    .parse_next(input)?;
    if boolean_chain.is_some() {
        or_expr.parse_next(input)
    } else {
        additive.parse_next(input)
    }
}

fn cmp_op(input: &mut Input<'_>) -> PResult<BinOp> {
    alt((
        "==".value(BinOp::Eq),
        "!=".value(BinOp::Ne),
        "<>".value(BinOp::Ne),
        "<=".value(BinOp::Le),
        ">=".value(BinOp::Ge),
        "<".value(BinOp::Lt),
        ">".value(BinOp::Gt),
        "=".value(BinOp::Eq),
    ))
    .parse_next(input)
}

/// Everything after `IS`: null checks and intelligent date ranges.
fn is_tail(left: Expr, input: &mut Input<'_>) -> PResult<Expr> {
    let start = left.span.start;

    if let Some(negated) = opt(preceded(
        ws,
        alt((
            (keyword("not"), ws, keyword("null")).value(true),
            keyword("null").value(false),
        )),
    ))
    .parse_next(input)?
    {
        let span = Span {
            start,
            end: input.previous_token_end(),
        };
        return Ok(Expr::new(
            ExprKind::IsNull {
                operand: Box::new(left),
                negated,
            },
            span,
        ));
    }

    let offset = preceded(ws, range_offset).parse_next(input)?;
    let unit = preceded(ws, range_unit).parse_next(input)?;
    let span = Span {
        start,
        end: input.previous_token_end(),
    };
    Ok(Expr::new(
        ExprKind::IsRange {
            operand: Box::new(left),
            offset,
            unit,
        },
        span,
    ))
}

fn range_offset(input: &mut Input<'_>) -> PResult<RangeOffset> {
    alt((
        keyword("last").value(RangeOffset::Previous),
        keyword("prior").value(RangeOffset::Previous),
        keyword("previous").value(RangeOffset::Previous),
        keyword("this").value(RangeOffset::Current),
        keyword("current").value(RangeOffset::Current),
        keyword("next").value(RangeOffset::Next),
    ))
    .parse_next(input)
}

fn range_unit(input: &mut Input<'_>) -> PResult<RangeUnit> {
    alt((
        keyword("ytd").value(RangeUnit::Ytd),
        keyword("year").value(RangeUnit::Year),
        keyword("qtr").value(RangeUnit::Qtr),
        keyword("mtd").value(RangeUnit::Mtd),
        keyword("month").value(RangeUnit::Month),
        keyword("day").value(RangeUnit::Day),
    ))
    .parse_next(input)
}

/// Array entries are literals only: strings, numbers, null.
fn array_item(input: &mut Input<'_>) -> PResult<Expr> {
    preceded(ws, alt((number_literal, string_literal, null_literal))).parse_next(input)
}

// ============ Arithmetic ============

fn additive(input: &mut Input<'_>) -> PResult<Expr> {
    let first = multiplicative.parse_next(input)?;
    let rest: Vec<(BinOp, Expr)> = repeat(
        0..,
        (preceded(ws, add_op), multiplicative),
    )
    .parse_next(input)?;
    Ok(rest.into_iter().fold(first, |l, (op, r)| join(l, op, r)))
}

fn add_op(input: &mut Input<'_>) -> PResult<BinOp> {
    alt(('+'.value(BinOp::Add), '-'.value(BinOp::Sub))).parse_next(input)
}

fn multiplicative(input: &mut Input<'_>) -> PResult<Expr> {
    let first = atom.parse_next(input)?;
    let rest: Vec<(BinOp, Expr)> = repeat(
        0..,
        (preceded(ws, mul_op), atom),
    )
    .parse_next(input)?;
    Ok(rest.into_iter().fold(first, |l, (op, r)| join(l, op, r)))
}

fn mul_op(input: &mut Input<'_>) -> PResult<BinOp> {
    alt(('*'.value(BinOp::Mul), '/'.value(BinOp::Div))).parse_next(input)
}

// ============ Atoms ============

fn atom(input: &mut Input<'_>) -> PResult<Expr> {
    preceded(
        ws,
        alt((
            paren_expr,
            number_literal,
            string_literal,
            bracket_column,
            star,
            bool_literal,
            null_literal,
            function_call,
            bare_column,
        )),
    )
    .parse_next(input)
}

fn paren_expr(input: &mut Input<'_>) -> PResult<Expr> {
    delimited(('(', ws), expr_tree, (ws, ')')).parse_next(input)
}

fn star(input: &mut Input<'_>) -> PResult<Expr> {
    let (_, span) = '*'.with_span().parse_next(input)?;
    Ok(Expr::new(ExprKind::Star, span))
}

/// `[name]`; the span covers the name, which is where errors point.
fn bracket_column(input: &mut Input<'_>) -> PResult<Expr> {
    let _ = '['.parse_next(input)?;
    let (name, span) = take_while(1.., |c: char| c != ']')
        .with_span()
        .parse_next(input)?;
    let _ = ']'.parse_next(input)?;
    Ok(Expr::new(ExprKind::Column(name.to_string()), span))
}

/// A bare word falls through to a column reference that can never type;
/// validation names it in its error.
fn bare_column(input: &mut Input<'_>) -> PResult<Expr> {
    let (name, span) = ident.with_span().parse_next(input)?;
    if is_keyword(name) {
        return Err(backtrack());
    }
    Ok(Expr::new(ExprKind::BareColumn(name.to_string()), span))
}

// ============ Function calls ============

fn function_call(input: &mut Input<'_>) -> PResult<Expr> {
    let (name, span) = ident.with_span().parse_next(input)?;
    let lower = name.to_lowercase();
    if !is_function_name(&lower) {
        return Err(backtrack());
    }
    peek((ws, '(')).parse_next(input)?;
    let args = delimited((ws, '(', ws), call_args, (ws, ')')).parse_next(input)?;
    Ok(build_call(lower, args, span.into()))
}

fn call_args(input: &mut Input<'_>) -> PResult<Vec<Expr>> {
    let args = opt(terminated(
        separated(1.., call_arg, (ws, ',', ws)),
        opt((ws, ',')),
    ))
    .parse_next(input)?;
    Ok(args.unwrap_or_default())
}

fn call_arg(input: &mut Input<'_>) -> PResult<Expr> {
    alt((preceded(ws, star), expr_tree)).parse_next(input)
}

fn build_call(name: String, args: Vec<Expr>, span: Span) -> Expr {
    // date("...") is a date literal, not a call
    if name == "date"
        && args.len() == 1
        && let ExprKind::Literal(Literal::String(s)) = &args[0].kind
    {
        return Expr::new(ExprKind::Date(s.clone()), span);
    }

    // if(cond, value, ..., [else]) normalizes into pairs plus an optional else
    if name == "if" {
        let mut args = args;
        let otherwise = if args.len() >= 3 && args.len() % 2 == 1 {
            args.pop().map(Box::new)
        } else {
            None
        };
        let mut cases = Vec::with_capacity(args.len() / 2);
        let mut iter = args.into_iter();
        while let (Some(cond), Some(value)) = (iter.next(), iter.next()) {
            cases.push((cond, value));
        }
        return Expr::new(ExprKind::If { cases, otherwise }, span);
    }

    Expr::new(ExprKind::Call { name, args }, span)
}

const FUNCTIONS: &[&str] = &[
    "sum",
    "avg",
    "min",
    "max",
    "count",
    "count_distinct",
    "substr",
    "coalesce",
    "if",
    "string",
    "int",
    "date",
    "day",
    "month",
    "quarter",
    "year",
    "week",
];

fn is_function_name(name: &str) -> bool {
    FUNCTIONS.contains(&name)
        || (name.strip_prefix("percentile")
            .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit())))
}

const KEYWORDS: &[&str] = &[
    "and", "or", "not", "in", "between", "like", "ilike", "is", "null", "true", "false",
    "last", "prior", "previous", "this", "current", "next", "ytd", "qtr", "mtd",
];

fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name.to_lowercase().as_str())
}

// ============ Identifiers and literals ============

fn ident<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

fn number_literal(input: &mut Input<'_>) -> PResult<Expr> {
    let (lit, span) = alt((float_lit, int_lit)).with_span().parse_next(input)?;
    Ok(Expr::new(ExprKind::Literal(lit), span))
}

fn float_lit(input: &mut Input<'_>) -> PResult<Literal> {
    (opt('-'), digit1, '.', digit1)
        .take()
        .try_map(|s: &str| s.parse::<f64>())
        .map(Literal::Float)
        .parse_next(input)
}

fn int_lit(input: &mut Input<'_>) -> PResult<Literal> {
    (opt('-'), digit1)
        .take()
        .try_map(|s: &str| s.parse::<i64>())
        .map(Literal::Int)
        .parse_next(input)
}

fn string_literal(input: &mut Input<'_>) -> PResult<Expr> {
    let (s, span) = alt((
        delimited('"', take_while(0.., |c: char| c != '"'), '"'),
        delimited('\'', take_while(0.., |c: char| c != '\''), '\''),
    ))
    .with_span()
    .parse_next(input)?;
    Ok(Expr::new(
        ExprKind::Literal(Literal::String(s.to_string())),
        span,
    ))
}

fn bool_literal(input: &mut Input<'_>) -> PResult<Expr> {
    let (value, span) = alt((
        keyword("true").value(true),
        keyword("false").value(false),
    ))
    .with_span()
    .parse_next(input)?;
    Ok(Expr::new(ExprKind::Literal(Literal::Bool(value)), span))
}

fn null_literal(input: &mut Input<'_>) -> PResult<Expr> {
    let (_, span) = keyword("null").with_span().parse_next(input)?;
    Ok(Expr::new(ExprKind::Literal(Literal::Null), span))
}

// ============ Low-level helpers ============

/// Case-insensitive keyword with a word boundary after it.
fn keyword<'a>(kw: &'static str) -> impl FnMut(&mut Input<'a>) -> PResult<()> {
    move |input: &mut Input<'a>| {
        (
            Caseless(kw),
            not(one_of(|c: char| c.is_ascii_alphanumeric() || c == '_')),
        )
            .void()
            .parse_next(input)
    }
}

fn ws(input: &mut Input<'_>) -> PResult<()> {
    multispace0.void().parse_next(input)
}

fn backtrack() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::new())
}

fn join(l: Expr, op: BinOp, r: Expr) -> Expr {
    let span = Span {
        start: l.span.start,
        end: r.span.end,
    };
    Expr::new(ExprKind::BinaryOp(Box::new(l), op, Box::new(r)), span)
}

// ============ Sanity Tests ============
// Most testing is done via integration tests in tests/integration.rs

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_literals() {
        assert!(matches!(
            parse("123").unwrap().kind,
            ExprKind::Literal(Literal::Int(123))
        ));
        assert!(matches!(
            parse("3.14").unwrap().kind,
            ExprKind::Literal(Literal::Float(_))
        ));
        assert!(matches!(
            parse("TRUE").unwrap().kind,
            ExprKind::Literal(Literal::Bool(true))
        ));
        assert!(matches!(
            parse(r#""hello""#).unwrap().kind,
            ExprKind::Literal(Literal::String(_))
        ));
        assert!(matches!(
            parse("-1.0").unwrap().kind,
            ExprKind::Literal(Literal::Float(_))
        ));
    }

    #[test]
    fn parse_operator_precedence() {
        // a * b + c parses as (a * b) + c
        let result = parse("[a] * [b] + [c]").unwrap();
        if let ExprKind::BinaryOp(left, BinOp::Add, _) = result.kind {
            assert!(matches!(left.kind, ExprKind::BinaryOp(_, BinOp::Mul, _)));
        } else {
            panic!("Expected Add at top level");
        }

        // a AND b OR c parses as (a AND b) OR c
        let result = parse("[a] AND [b] OR [c]").unwrap();
        assert!(matches!(result.kind, ExprKind::BinaryOp(_, BinOp::Or, _)));
    }

    #[test]
    fn column_span_covers_the_name() {
        let result = parse("[score]").unwrap();
        assert_eq!(result.span, Span { start: 1, end: 6 });
        assert!(matches!(result.kind, ExprKind::Column(ref name) if name == "score"));
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert!(parse(r#"[a] > "b" anD [c] < 22"#).is_ok());
        assert!(parse("[d] iN (\"A\", \"B\")").is_ok());
        assert!(parse("[s] IS NOT nULL").is_ok());
    }

    #[test]
    fn leading_not_spans_the_whole_chain() {
        let result = parse("NOT [a] > 3 AND [b] < 5").unwrap();
        if let ExprKind::Not(inner) = result.kind {
            assert!(matches!(inner.kind, ExprKind::BinaryOp(_, BinOp::And, _)));
        } else {
            panic!("Expected NOT around the whole chain");
        }

        // Parenthesized NOT binds tight
        let result = parse("(NOT [a] > 3) AND [b] < 5").unwrap();
        assert!(matches!(result.kind, ExprKind::BinaryOp(_, BinOp::And, _)));
    }

    #[test]
    fn inner_not_binds_to_one_term() {
        let result = parse("[a] > 3 AND NOT [b] < 5").unwrap();
        if let ExprKind::BinaryOp(_, BinOp::And, right) = result.kind {
            assert!(matches!(right.kind, ExprKind::Not(_)));
        } else {
            panic!("Expected AND at top level");
        }
    }

    #[test]
    fn equality_swallows_boolean_chains() {
        // The documented quirk: = TRUE AND ... groups to the right
        let result = parse("[v] = TRUE AND [s] > 3").unwrap();
        if let ExprKind::BinaryOp(_, BinOp::Eq, right) = result.kind {
            assert!(matches!(right.kind, ExprKind::BinaryOp(_, BinOp::And, _)));
        } else {
            panic!("Expected Eq at top level");
        }

        // A numeric right side does not
        let result = parse("[s] > 3 AND TRUE").unwrap();
        assert!(matches!(result.kind, ExprKind::BinaryOp(_, BinOp::And, _)));
    }

    #[test]
    fn between_consumes_its_own_and() {
        let result = parse("[score] between 1 and 3 AND [score] > 0").unwrap();
        if let ExprKind::BinaryOp(left, BinOp::And, _) = result.kind {
            assert!(matches!(left.kind, ExprKind::Between { .. }));
        } else {
            panic!("Expected outer AND");
        }
    }

    #[test]
    fn in_lists_allow_trailing_commas() {
        for text in [
            r#"[d] In ("A", "B")"#,
            r#"[d] In ("A", "B",)"#,
            r#"[d] In ("A",)"#,
        ] {
            let result = parse(text).unwrap();
            assert!(matches!(result.kind, ExprKind::In { .. }), "{text}");
        }
    }

    #[test]
    fn count_star_and_calls() {
        let result = parse("count(*)").unwrap();
        if let ExprKind::Call { name, args } = result.kind {
            assert_eq!(name, "count");
            assert!(matches!(args[0].kind, ExprKind::Star));
        } else {
            panic!("Expected call");
        }

        assert!(parse("substr([department], 5, 2)").is_ok());
        assert!(parse("count_distinct([department])").is_ok());
        assert!(parse("percentile13([score])").is_ok());
    }

    #[test]
    fn date_literals_and_date_calls() {
        let result = parse(r#"date("2020-01-01")"#).unwrap();
        assert!(matches!(result.kind, ExprKind::Date(ref s) if s == "2020-01-01"));

        // date() over a column stays a call
        let result = parse("date([test_datetime])").unwrap();
        assert!(matches!(result.kind, ExprKind::Call { ref name, .. } if name == "date"));
    }

    #[test]
    fn if_normalizes_into_pairs() {
        let result = parse("if([a] > 2, [b], -1)").unwrap();
        if let ExprKind::If { cases, otherwise } = result.kind {
            assert_eq!(cases.len(), 1);
            assert!(otherwise.is_some());
        } else {
            panic!("Expected if");
        }

        let result = parse("if([a] > 2, [b], [a] > 4, [c])").unwrap();
        if let ExprKind::If { cases, otherwise } = result.kind {
            assert_eq!(cases.len(), 2);
            assert!(otherwise.is_none());
        } else {
            panic!("Expected if");
        }
    }

    #[test]
    fn intelligent_date_ranges() {
        let result = parse("[test_date] IS last year").unwrap();
        assert!(matches!(
            result.kind,
            ExprKind::IsRange {
                offset: RangeOffset::Previous,
                unit: RangeUnit::Year,
                ..
            }
        ));
    }

    #[test]
    fn bare_words_parse_as_unresolvable_columns() {
        let result = parse("unknown").unwrap();
        assert!(matches!(result.kind, ExprKind::BareColumn(ref name) if name == "unknown"));
        assert_eq!(result.span.start, 0);
    }

    #[test]
    fn trailing_input_is_an_error() {
        let err = parse("[score] > 2 garbage ]").unwrap_err();
        assert!(err.message.contains("trailing"));
    }
}
