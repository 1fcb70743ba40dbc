//! Per-catalog grammar generation
//!
//! A grammar is a pure function of the column catalog: one case-insensitive
//! bracket rule per column, tagged with the column's type and a per-type
//! index assigned in catalog order, merged into per-type union rules and
//! combined with the fixed operator/function/literal rules.
//!
//! The canonical text rendering is deterministic — equal catalogs produce
//! byte-identical text — so grammars can be cached and diffed by identity.
//! The executable parser (`parse`) is a combinator program over the same
//! rule structure; the text is the testable description of what it accepts.

use std::collections::HashMap;
use std::fmt;

use crate::catalog::{ColumnCatalog, DataType};

/// A column name is usable in the grammar if it is a plain identifier:
/// ASCII alphanumerics and underscores only.
pub fn is_valid_column(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// One generated column-reference rule, e.g. `str_0: "[" + /first/i + "]"`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRule {
    /// Generated rule name: type prefix + per-type index (`str_0`, `date_1`)
    pub rule: String,
    /// Column name as registered in the catalog
    pub column: String,
    pub datatype: DataType,
}

impl fmt::Display for ColumnRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: \"[\" + /{}/i + \"]\"",
            self.rule,
            self.column.to_lowercase()
        )
    }
}

/// Generated grammar for one catalog.
#[derive(Debug, Clone)]
pub struct Grammar {
    table: String,
    rules: Vec<ColumnRule>,
    text: String,
    by_name: HashMap<String, usize>,
}

impl Grammar {
    /// Build the grammar for a catalog. Pure: equal catalogs (same columns,
    /// same order) yield byte-identical `text()`.
    pub fn generate(catalog: &ColumnCatalog) -> Grammar {
        let rules = make_column_rules(catalog);
        let text = render_grammar(&rules);
        let by_name = rules
            .iter()
            .enumerate()
            .map(|(i, r)| (r.column.to_lowercase(), i))
            .collect();
        Grammar {
            table: catalog.table().to_string(),
            rules,
            text,
            by_name,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn rules(&self) -> &[ColumnRule] {
        &self.rules
    }

    /// Canonical grammar text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Case-insensitive column-rule lookup.
    pub fn resolve(&self, column: &str) -> Option<&ColumnRule> {
        self.by_name
            .get(&column.to_lowercase())
            .map(|&i| &self.rules[i])
    }
}

/// Assign per-type indices in catalog order.
pub(crate) fn make_column_rules(catalog: &ColumnCatalog) -> Vec<ColumnRule> {
    let mut counters: HashMap<&'static str, usize> = HashMap::new();
    catalog
        .columns()
        .map(|(name, datatype)| {
            let prefix = datatype.rule_prefix();
            let counter = counters.entry(prefix).or_insert(0);
            let rule = format!("{prefix}_{counter}");
            *counter += 1;
            ColumnRule {
                rule,
                column: name.to_string(),
                datatype,
            }
        })
        .collect()
}

/// Render the per-column rules, one per line, sorted by rule name.
pub(crate) fn render_column_rules(rules: &[ColumnRule]) -> String {
    let mut lines: Vec<String> = rules.iter().map(|r| r.to_string()).collect();
    lines.sort();
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render a per-type union rule gathering every matching column rule, the
/// type's literal terminals, and the parenthesized self-recursion:
/// `string.1: str_0 | str_1 | ESCAPED_STRING | "(" + string + ")"`.
pub(crate) fn make_datatype_rule(
    rule_name: &str,
    rules: &[ColumnRule],
    datatype: DataType,
    extras: &[&str],
) -> String {
    let base = rule_name.split('.').next().unwrap_or(rule_name);
    let mut alternatives: Vec<String> = rules
        .iter()
        .filter(|r| r.datatype == datatype)
        .map(|r| r.rule.clone())
        .collect();
    alternatives.sort();
    alternatives.extend(extras.iter().map(|s| s.to_string()));
    alternatives.push(format!("\"(\" + {base} + \")\""));
    format!("{rule_name}: {}", alternatives.join(" | "))
}

fn render_grammar(rules: &[ColumnRule]) -> String {
    let mut unusable: Vec<&str> = rules
        .iter()
        .filter(|r| r.datatype == DataType::Unusable)
        .map(|r| r.rule.as_str())
        .collect();
    unusable.sort();

    let mut out = String::from("col: boolean | string | num | date | datetime | unknown_col");
    if !unusable.is_empty() {
        out.push_str(" | unusable_col");
    }
    out.push_str("\n\n");
    out.push_str(&render_column_rules(rules));
    out.push('\n');
    for (name, datatype, extras) in [
        ("boolean.1", DataType::Bool, &["TRUE", "FALSE"][..]),
        ("string.1", DataType::Str, &["ESCAPED_STRING"][..]),
        ("num.1", DataType::Num, &["NUMBER"][..]),
        ("date.1", DataType::Date, &["date_fn"][..]),
        ("datetime.1", DataType::Datetime, &["date_fn"][..]),
    ] {
        out.push_str(&make_datatype_rule(name, rules, datatype, extras));
        out.push('\n');
    }
    out.push_str("unknown_col: \"[\" + NAME + \"]\" | NAME\n");
    if !unusable.is_empty() {
        out.push_str(&format!("unusable_col: {}\n", unusable.join(" | ")));
    }
    out.push('\n');
    out.push_str(FIXED_RULES);
    out
}

/// Catalog-independent rules: operators, literals, and the function catalog
/// with each function's argument types and aggregation-ness.
const FIXED_RULES: &str = r#"NUMBER: /-?\d+(\.\d+)?/
ESCAPED_STRING: /"[^"]*"/ | /'[^']*'/
TRUE: /true/i
FALSE: /false/i
NULL: /null/i
NAME: /[a-zA-Z_][a-zA-Z0-9_]*/

add: num "+" num | string "+" string
sub: num "-" num
mul: num "*" num
div: num "/" num
comparator: "=" | "==" | "!=" | "<>" | "<" | "<=" | ">" | ">="
comparison: col comparator col
bool_expr: NOT bool_expr | bool_term ((AND | OR) bool_term)*
bool_term: NOT bool_term | comparison | boolean
array: "(" (string | num | NULL) ("," (string | num | NULL))* ","? ")"
in_expr: col NOT? IN array
between_expr: col BETWEEN col AND col
like_expr: string LIKE ESCAPED_STRING | string ILIKE ESCAPED_STRING
null_check: col IS NOT? NULL
intelligent_date: (date | datetime) IS OFFSET UNITS
OFFSET: /last|prior|previous|this|current|next/i
UNITS: /year|ytd|qtr|month|mtd|day/i
date_fn: "date" "(" ESCAPED_STRING ")"

// aggregations: num -> num
aggregate: ("sum" | "avg") "(" num ")"
// orderable aggregations: T -> T
extent: ("min" | "max") "(" (num | string | date | datetime) ")"
// counting: anything -> num
count: ("count" | "count_distinct") "(" ("*" | col) ")"
// percentiles: num -> num, dialect permitting
percentile: /percentile\d+/ "(" num ")"
substr: "substr" "(" string "," num ("," num)? ")"
coalesce: "coalesce" "(" col ("," col)+ ")"
if: "if" "(" bool_expr "," col ("," bool_expr "," col)* ("," col)? ")"
string_cast: "string" "(" col ")"
int_cast: "int" "(" col ")"
date_part: ("day" | "month" | "quarter" | "year" | "week") "(" (date | datetime) ")"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn scores_catalog() -> ColumnCatalog {
        ColumnCatalog::new("scores")
            .with_column("username", DataType::Str)
            .with_column("department", DataType::Str)
            .with_column("testid", DataType::Str)
            .with_column("score", DataType::Num)
            .with_column("test_date", DataType::Date)
    }

    #[test]
    fn column_rules_sort_by_rule_name() {
        let catalog = ColumnCatalog::new("foo")
            .with_column("first", DataType::Str)
            .with_column("last", DataType::Str)
            .with_column("age", DataType::Num)
            .with_column("birth_date", DataType::Date)
            .with_column("dt", DataType::Datetime);
        let rules = make_column_rules(&catalog);
        let expected = "\
date_0: \"[\" + /birth_date/i + \"]\"
datetime_0: \"[\" + /dt/i + \"]\"
num_0: \"[\" + /age/i + \"]\"
str_0: \"[\" + /first/i + \"]\"
str_1: \"[\" + /last/i + \"]\"
";
        assert_eq!(render_column_rules(&rules), expected);
    }

    #[test]
    fn column_rules_for_scores_table() {
        let rules = make_column_rules(&scores_catalog());
        let expected = "\
date_0: \"[\" + /test_date/i + \"]\"
num_0: \"[\" + /score/i + \"]\"
str_0: \"[\" + /username/i + \"]\"
str_1: \"[\" + /department/i + \"]\"
str_2: \"[\" + /testid/i + \"]\"
";
        assert_eq!(render_column_rules(&rules), expected);
    }

    #[test]
    fn unusable_columns_get_rules_but_no_union_entry() {
        let catalog = ColumnCatalog::new("state_fact")
            .with_column("name", DataType::Str)
            .with_column("circuit_court", DataType::Unusable);
        let rules = make_column_rules(&catalog);
        let rendered = render_column_rules(&rules);
        assert!(rendered.contains("unusable_0: \"[\" + /circuit_court/i + \"]\""));
        let union = make_datatype_rule("string.1", &rules, DataType::Str, &["ESCAPED_STRING"]);
        assert!(!union.contains("unusable"));
    }

    #[test]
    fn datatype_rule_gathers_matching_rules() {
        let rules = make_column_rules(&scores_catalog());
        assert_eq!(
            make_datatype_rule("string.1", &rules, DataType::Str, &["foo"]),
            "string.1: str_0 | str_1 | str_2 | foo | \"(\" + string + \")\""
        );
    }

    #[test]
    fn datatype_rule_sorts_lexicographically() {
        // str_10 sorts before str_2: rule names are ordered as strings
        let mut catalog = ColumnCatalog::new("wide");
        for i in 0..14 {
            catalog = catalog.with_column(format!("c{i}"), DataType::Str);
        }
        let rules = make_column_rules(&catalog);
        let rule = make_datatype_rule("string.1", &rules, DataType::Str, &["foo"]);
        assert_eq!(
            rule,
            "string.1: str_0 | str_1 | str_10 | str_11 | str_12 | str_13 | \
             str_2 | str_3 | str_4 | str_5 | str_6 | str_7 | str_8 | str_9 | \
             foo | \"(\" + string + \")\""
        );
    }

    #[test]
    fn generation_is_deterministic() {
        let a = Grammar::generate(&scores_catalog());
        let b = Grammar::generate(&scores_catalog());
        assert_eq!(a.text(), b.text());
    }

    #[test]
    fn resolve_is_case_insensitive() {
        let grammar = Grammar::generate(&scores_catalog());
        let rule = grammar.resolve("ScORE").unwrap();
        assert_eq!(rule.rule, "num_0");
        assert_eq!(rule.column, "score");
        assert!(grammar.resolve("nope").is_none());
    }

    #[test]
    fn is_valid_column_accepts_identifiers_only() {
        for good in ["this", "that", "THIS", "THAT", "this_that_and_other", "_other", "THIS_that_"] {
            assert!(is_valid_column(good), "{good:?} should be valid");
        }
        for bad in [" this", "that ", " THIS", "TH AT  ", "for_slackbot}_organization_name"] {
            assert!(!is_valid_column(bad), "{bad:?} should be invalid");
        }
    }
}
