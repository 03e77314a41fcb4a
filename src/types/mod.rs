//! Concrete column types.
//!
//! [`ColumnType`] is the storage type a model column is declared with. It is
//! distinct from [`DeclarativeType`], the small generalized category a column
//! type is bucketed into for documentation and schema generation.
//!
//! Parameterized types carry the attributes callers query for descriptors:
//! - `length` for character types
//! - `precision` and `scale` for numeric types

mod declarative;

pub use declarative::{DeclarativeType, TypeClassifier};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Concrete storage type of a column.
///
/// # Examples
///
/// ```
/// use modlit::types::ColumnType;
///
/// assert_eq!(ColumnType::parse("varchar(40)"), ColumnType::Varchar { length: Some(40) });
/// assert_eq!(ColumnType::parse("numeric(10,2)").scale(), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ColumnType {
    /// Universally-unique identifier.
    Uuid,

    /// 16-bit integer (SMALLINT).
    SmallInteger,

    /// 32-bit integer (INTEGER).
    Integer,

    /// 64-bit integer (BIGINT).
    BigInteger,

    /// Single precision floating point (REAL).
    Real,

    /// Floating point with optional binary precision (FLOAT).
    Float { precision: Option<u32> },

    /// Exact numeric (NUMERIC).
    Numeric {
        precision: Option<u32>,
        scale: Option<u32>,
    },

    /// Exact numeric (DECIMAL).
    Decimal {
        precision: Option<u32>,
        scale: Option<u32>,
    },

    /// Fixed-length character string.
    Char { length: Option<u32> },

    /// Fixed-length national character string.
    NChar { length: Option<u32> },

    /// Variable-length character string.
    Varchar { length: Option<u32> },

    /// Variable-length national character string.
    NVarchar { length: Option<u32> },

    /// Generic string, optionally bounded.
    String { length: Option<u32> },

    /// Unbounded text.
    Text,

    Date,

    Time,

    DateTime,

    Timestamp,

    Boolean,

    /// Binary data (BLOB, BYTEA).
    Binary,

    Json,

    /// Spatial column.
    Geometry {
        geometry_type: Option<String>,
        srid: Option<i32>,
    },

    /// A type this crate has no variant for (kept verbatim).
    Custom(String),
}

/// Field-less discriminant of a [`ColumnType`].
///
/// Lookup tables are keyed by kind so that parameters (length, precision)
/// never affect classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TypeKind {
    Uuid,
    SmallInteger,
    Integer,
    BigInteger,
    Real,
    Float,
    Numeric,
    Decimal,
    Char,
    NChar,
    Varchar,
    NVarchar,
    String,
    Text,
    Date,
    Time,
    DateTime,
    Timestamp,
    Boolean,
    Binary,
    Json,
    Geometry,
    Custom,
}

/// Geometry type names recognized as spatial column declarations.
const GEOMETRY_NAMES: &[&str] = &[
    "geometry",
    "point",
    "linestring",
    "polygon",
    "multipoint",
    "multilinestring",
    "multipolygon",
    "geometrycollection",
];

impl ColumnType {
    /// Parse a declared SQL type.
    ///
    /// Recognizes common spellings across SQLite, PostgreSQL and SQL Server.
    /// Anything unrecognized is preserved as [`ColumnType::Custom`], so parsing
    /// never fails.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        let lower = trimmed
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let lower = strip_fractional_seconds(&lower).unwrap_or(lower);

        if let Some(inner) =
            extract_parens(&lower, "decimal").or_else(|| extract_parens(&lower, "dec"))
        {
            if let Some((precision, scale)) = parse_numeric_params(&inner) {
                return ColumnType::Decimal { precision, scale };
            }
        }

        if let Some(inner) = extract_parens(&lower, "numeric") {
            if let Some((precision, scale)) = parse_numeric_params(&inner) {
                return ColumnType::Numeric { precision, scale };
            }
        }

        if let Some(inner) = extract_parens(&lower, "float") {
            if let Some(precision) = parse_length_param(&inner) {
                return ColumnType::Float {
                    precision: Some(precision),
                };
            }
        }

        if let Some(inner) = extract_parens(&lower, "varchar")
            .or_else(|| extract_parens(&lower, "character varying"))
            .or_else(|| extract_parens(&lower, "varchar2"))
        {
            if let Some(length) = parse_length_param(&inner) {
                return ColumnType::Varchar {
                    length: Some(length),
                };
            }
        }

        if let Some(inner) = extract_parens(&lower, "nvarchar") {
            if let Some(length) = parse_length_param(&inner) {
                return ColumnType::NVarchar {
                    length: Some(length),
                };
            }
        }

        if let Some(inner) = extract_parens(&lower, "nchar") {
            if let Some(length) = parse_length_param(&inner) {
                return ColumnType::NChar {
                    length: Some(length),
                };
            }
        }

        if let Some(inner) =
            extract_parens(&lower, "char").or_else(|| extract_parens(&lower, "character"))
        {
            if let Some(length) = parse_length_param(&inner) {
                return ColumnType::Char {
                    length: Some(length),
                };
            }
        }

        if let Some(inner) = extract_parens(&lower, "string") {
            if let Some(length) = parse_length_param(&inner) {
                return ColumnType::String {
                    length: Some(length),
                };
            }
        }

        for name in GEOMETRY_NAMES {
            if let Some(inner) = extract_parens(&lower, name) {
                return parse_geometry_params(name, &inner);
            }
        }

        match lower.as_str() {
            "uuid" | "guid" | "uniqueidentifier" => ColumnType::Uuid,

            "smallint" | "int2" | "tinyint" => ColumnType::SmallInteger,
            "int" | "integer" | "int4" | "mediumint" => ColumnType::Integer,
            "bigint" | "int8" => ColumnType::BigInteger,

            "real" | "float4" => ColumnType::Real,
            "float" | "double" | "double precision" | "float8" => {
                ColumnType::Float { precision: None }
            }
            "numeric" | "number" => ColumnType::Numeric {
                precision: None,
                scale: None,
            },
            "decimal" | "dec" => ColumnType::Decimal {
                precision: None,
                scale: None,
            },

            "char" | "character" => ColumnType::Char { length: None },
            "nchar" => ColumnType::NChar { length: None },
            "varchar" | "character varying" | "varchar2" => ColumnType::Varchar { length: None },
            "nvarchar" => ColumnType::NVarchar { length: None },
            "string" => ColumnType::String { length: None },
            "text" | "clob" | "ntext" | "citext" => ColumnType::Text,

            "date" => ColumnType::Date,
            "time" | "time without time zone" | "time with time zone" | "timetz" => {
                ColumnType::Time
            }
            "datetime" | "datetime2" => ColumnType::DateTime,
            "timestamp"
            | "timestamptz"
            | "timestamp with time zone"
            | "timestamp without time zone" => ColumnType::Timestamp,

            "bool" | "boolean" | "bit" => ColumnType::Boolean,
            "blob" | "bytea" | "binary" | "varbinary" | "image" => ColumnType::Binary,
            "json" | "jsonb" => ColumnType::Json,

            name if GEOMETRY_NAMES.contains(&name) => ColumnType::Geometry {
                geometry_type: (name != "geometry").then(|| name.to_uppercase()),
                srid: None,
            },

            _ => ColumnType::Custom(trimmed.to_string()),
        }
    }

    /// The discriminant used as a lookup key.
    pub fn kind(&self) -> TypeKind {
        match self {
            ColumnType::Uuid => TypeKind::Uuid,
            ColumnType::SmallInteger => TypeKind::SmallInteger,
            ColumnType::Integer => TypeKind::Integer,
            ColumnType::BigInteger => TypeKind::BigInteger,
            ColumnType::Real => TypeKind::Real,
            ColumnType::Float { .. } => TypeKind::Float,
            ColumnType::Numeric { .. } => TypeKind::Numeric,
            ColumnType::Decimal { .. } => TypeKind::Decimal,
            ColumnType::Char { .. } => TypeKind::Char,
            ColumnType::NChar { .. } => TypeKind::NChar,
            ColumnType::Varchar { .. } => TypeKind::Varchar,
            ColumnType::NVarchar { .. } => TypeKind::NVarchar,
            ColumnType::String { .. } => TypeKind::String,
            ColumnType::Text => TypeKind::Text,
            ColumnType::Date => TypeKind::Date,
            ColumnType::Time => TypeKind::Time,
            ColumnType::DateTime => TypeKind::DateTime,
            ColumnType::Timestamp => TypeKind::Timestamp,
            ColumnType::Boolean => TypeKind::Boolean,
            ColumnType::Binary => TypeKind::Binary,
            ColumnType::Json => TypeKind::Json,
            ColumnType::Geometry { .. } => TypeKind::Geometry,
            ColumnType::Custom(_) => TypeKind::Custom,
        }
    }

    /// Declared length of a character type.
    pub fn length(&self) -> Option<u32> {
        match self {
            ColumnType::Char { length }
            | ColumnType::NChar { length }
            | ColumnType::Varchar { length }
            | ColumnType::NVarchar { length }
            | ColumnType::String { length } => *length,
            _ => None,
        }
    }

    /// Declared precision of a numeric type.
    pub fn precision(&self) -> Option<u32> {
        match self {
            ColumnType::Float { precision }
            | ColumnType::Numeric { precision, .. }
            | ColumnType::Decimal { precision, .. } => *precision,
            _ => None,
        }
    }

    /// Declared scale of an exact numeric type.
    pub fn scale(&self) -> Option<u32> {
        match self {
            ColumnType::Numeric { scale, .. } | ColumnType::Decimal { scale, .. } => *scale,
            _ => None,
        }
    }

    /// Returns true for spatial columns.
    pub fn is_geometry(&self) -> bool {
        matches!(self, ColumnType::Geometry { .. })
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Uuid => write!(f, "UUID"),
            ColumnType::SmallInteger => write!(f, "SMALLINT"),
            ColumnType::Integer => write!(f, "INTEGER"),
            ColumnType::BigInteger => write!(f, "BIGINT"),
            ColumnType::Real => write!(f, "REAL"),
            ColumnType::Float { precision } => write_sized(f, "FLOAT", *precision),
            ColumnType::Numeric { precision, scale } => {
                write_numeric(f, "NUMERIC", *precision, *scale)
            }
            ColumnType::Decimal { precision, scale } => {
                write_numeric(f, "DECIMAL", *precision, *scale)
            }
            ColumnType::Char { length } => write_sized(f, "CHAR", *length),
            ColumnType::NChar { length } => write_sized(f, "NCHAR", *length),
            ColumnType::Varchar { length } => write_sized(f, "VARCHAR", *length),
            ColumnType::NVarchar { length } => write_sized(f, "NVARCHAR", *length),
            ColumnType::String { length } => write_sized(f, "STRING", *length),
            ColumnType::Text => write!(f, "TEXT"),
            ColumnType::Date => write!(f, "DATE"),
            ColumnType::Time => write!(f, "TIME"),
            ColumnType::DateTime => write!(f, "DATETIME"),
            ColumnType::Timestamp => write!(f, "TIMESTAMP"),
            ColumnType::Boolean => write!(f, "BOOLEAN"),
            ColumnType::Binary => write!(f, "BLOB"),
            ColumnType::Json => write!(f, "JSON"),
            ColumnType::Geometry {
                geometry_type,
                srid,
            } => match (geometry_type, srid) {
                (Some(t), Some(s)) => write!(f, "GEOMETRY({}, {})", t, s),
                (Some(t), None) => write!(f, "GEOMETRY({})", t),
                _ => write!(f, "GEOMETRY"),
            },
            ColumnType::Custom(name) => write!(f, "{}", name),
        }
    }
}

impl From<ColumnType> for String {
    fn from(t: ColumnType) -> Self {
        t.to_string()
    }
}

impl From<String> for ColumnType {
    fn from(s: String) -> Self {
        ColumnType::parse(&s)
    }
}

impl From<&str> for ColumnType {
    fn from(s: &str) -> Self {
        ColumnType::parse(s)
    }
}

fn write_sized(f: &mut fmt::Formatter<'_>, name: &str, size: Option<u32>) -> fmt::Result {
    match size {
        Some(n) => write!(f, "{}({})", name, n),
        None => write!(f, "{}", name),
    }
}

fn write_numeric(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    precision: Option<u32>,
    scale: Option<u32>,
) -> fmt::Result {
    match (precision, scale) {
        (Some(p), Some(s)) => write!(f, "{}({}, {})", name, p, s),
        (Some(p), None) => write!(f, "{}({})", name, p),
        _ => write!(f, "{}", name),
    }
}

/// Extract content inside parentheses for a given type prefix.
/// e.g., extract_parens("decimal(10,2)", "decimal") returns Some("10,2")
fn extract_parens(s: &str, prefix: &str) -> Option<String> {
    let s = s.trim();
    if !s.starts_with(prefix) {
        return None;
    }

    let rest = s[prefix.len()..].trim();
    if !rest.starts_with('(') || !rest.ends_with(')') {
        return None;
    }

    Some(rest[1..rest.len() - 1].to_string())
}

/// Parse "precision" or "precision,scale".
fn parse_numeric_params(inner: &str) -> Option<(Option<u32>, Option<u32>)> {
    let parts: Vec<&str> = inner.split(',').map(|s| s.trim()).collect();
    match parts.as_slice() {
        [p] => Some((Some(p.parse().ok()?), None)),
        [p, s] => Some((Some(p.parse().ok()?), Some(s.parse().ok()?))),
        _ => None,
    }
}

/// Parse a single length parameter.
fn parse_length_param(inner: &str) -> Option<u32> {
    let inner = inner.trim();
    // Handle "max" keyword used in T-SQL
    if inner.eq_ignore_ascii_case("max") {
        return Some(u32::MAX);
    }
    inner.parse().ok()
}

/// Drop the fractional-seconds precision from time types:
/// `timestamp(6) with time zone` becomes `timestamp with time zone`.
fn strip_fractional_seconds(lower: &str) -> Option<String> {
    let open = lower.find('(')?;
    let close = open + lower[open..].find(')')?;
    let base = lower[..open].trim_end();
    if !matches!(base, "time" | "timetz" | "timestamp" | "timestamptz" | "datetime2") {
        return None;
    }
    lower[open + 1..close].trim().parse::<u8>().ok()?;

    let rest = lower[close + 1..].trim();
    Some(if rest.is_empty() {
        base.to_string()
    } else {
        format!("{} {}", base, rest)
    })
}

/// Parse "geometry(point, 4326)" style declarations.
fn parse_geometry_params(name: &str, inner: &str) -> ColumnType {
    let parts: Vec<&str> = inner
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    let mut geometry_type = (name != "geometry").then(|| name.to_uppercase());
    let mut srid = None;
    for part in parts {
        match part.parse::<i32>() {
            Ok(n) => srid = Some(n),
            Err(_) => geometry_type = Some(part.to_uppercase()),
        }
    }

    ColumnType::Geometry {
        geometry_type,
        srid,
    }
}
