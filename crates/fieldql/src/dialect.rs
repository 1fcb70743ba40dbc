//! Dialect profiles
//!
//! A profile records the rendering choices that differ between backends. The
//! transformer consumes it while building IR, so the emitted tree is already
//! dialect-specific and the renderer stays mechanical.
//!
//! Unknown dialect names still yield a profile (compilation of plain
//! expressions works everywhere); only dialect-dependent constructs — date
//! part functions, converters, percentiles — fail against it.

/// How a date-truncation call is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncStyle {
    /// `date_trunc('month', x)` — the unit is a string argument
    StringUnit,
    /// `date_trunc(x, month)` — the unit is a bare keyword (BigQuery);
    /// datetime operands rewrap as `datetime(timestamp_trunc(x, month))`
    KeywordUnit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectProfile {
    pub name: String,
    /// False for names not in the registry; dialect-dependent constructs
    /// must fail rather than guess.
    pub known: bool,
    pub trunc: TruncStyle,
    /// Whether the backend has a native ILIKE operator; otherwise ILIKE is
    /// emulated by lower-casing both sides.
    pub native_ilike: bool,
    pub float_type: &'static str,
    pub integer_type: &'static str,
    pub varchar_type: &'static str,
    pub supports_percentiles: bool,
}

/// Percentile values the percentile functions accept.
pub const SUPPORTED_PERCENTILES: [u32; 9] = [1, 5, 10, 25, 50, 75, 90, 95, 99];

impl DialectProfile {
    /// Look up a profile by dialect name (`sqlite`, `postgresql`,
    /// `redshift`, `bigquery`). Any other name yields an unknown profile.
    pub fn lookup(name: &str) -> DialectProfile {
        let name = name.to_lowercase();
        match name.as_str() {
            "sqlite" => DialectProfile {
                name,
                known: true,
                trunc: TruncStyle::StringUnit,
                native_ilike: false,
                float_type: "FLOAT",
                integer_type: "INTEGER",
                varchar_type: "VARCHAR",
                supports_percentiles: false,
            },
            "postgresql" | "redshift" => DialectProfile {
                name,
                known: true,
                trunc: TruncStyle::StringUnit,
                native_ilike: true,
                float_type: "FLOAT",
                integer_type: "INTEGER",
                varchar_type: "VARCHAR",
                supports_percentiles: true,
            },
            "bigquery" => DialectProfile {
                name,
                known: true,
                trunc: TruncStyle::KeywordUnit,
                native_ilike: false,
                float_type: "FLOAT64",
                integer_type: "INT64",
                varchar_type: "STRING",
                supports_percentiles: true,
            },
            _ => DialectProfile {
                name,
                known: false,
                trunc: TruncStyle::StringUnit,
                native_ilike: false,
                float_type: "FLOAT",
                integer_type: "INTEGER",
                varchar_type: "VARCHAR",
                supports_percentiles: false,
            },
        }
    }
}
