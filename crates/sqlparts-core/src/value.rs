//! SQL values and their rendering to SQL literal text.
//!
//! A [`Value`] is turned into SQL text by a [`ValueRenderer`]. Renderers are
//! looked up per [`ValueKind`] in a [`ValueRenderers`] registry, which comes
//! with a default renderer for every kind.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// The closed set of value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// SQL NULL.
    Null,
    /// Boolean.
    Bool,
    /// Signed 64-bit integer.
    Int,
    /// Unsigned 64-bit integer.
    UInt,
    /// Double precision float.
    Float,
    /// Arbitrary precision number, kept as text.
    Numeric,
    /// Character string.
    Text,
    /// Binary data.
    Blob,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time without time zone.
    Timestamp,
}

impl ValueKind {
    /// All kinds.
    pub const ALL: [Self; 11] = [
        Self::Null,
        Self::Bool,
        Self::Int,
        Self::UInt,
        Self::Float,
        Self::Numeric,
        Self::Text,
        Self::Blob,
        Self::Date,
        Self::Time,
        Self::Timestamp,
    ];

    /// Returns the type name used in parameter specifications.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Float => "float",
            Self::Numeric => "numeric",
            Self::Text => "string",
            Self::Blob => "blob",
            Self::Date => "date",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
        }
    }

    /// Parses a type name (case-insensitive), accepting common SQL aliases.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "null" => Self::Null,
            "bool" | "boolean" | "gboolean" => Self::Bool,
            "int" | "integer" | "int64" | "gint" | "bigint" | "smallint" => Self::Int,
            "uint" | "uint64" | "guint" => Self::UInt,
            "float" | "double" | "real" | "gdouble" => Self::Float,
            "numeric" | "decimal" => Self::Numeric,
            "string" | "text" | "varchar" | "char" | "gchararray" => Self::Text,
            "blob" | "binary" | "bytea" => Self::Blob,
            "date" => Self::Date,
            "time" => Self::Time,
            "timestamp" | "datetime" => Self::Timestamp,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while converting or rendering values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// No renderer is registered for the value's kind.
    #[error("no renderer registered for {0} values")]
    NoRenderer(ValueKind),
    /// The renderer does not handle this kind of value.
    #[error("renderer for {expected} values cannot render a {found} value")]
    Rejected {
        /// The kind the renderer handles.
        expected: ValueKind,
        /// The kind it was given.
        found: ValueKind,
    },
    /// The value cannot be converted to the requested kind.
    #[error("cannot convert {from} value to {to}")]
    Incompatible {
        /// Source kind.
        from: ValueKind,
        /// Requested kind.
        to: ValueKind,
    },
    /// The value has no SQL literal form (e.g. NaN).
    #[error("{0} has no SQL literal form")]
    NotRepresentable(String),
}

/// A typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Unsigned integer value.
    UInt(u64),
    /// Float value.
    Float(f64),
    /// Decimal number kept as text.
    Numeric(String),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
    /// Date value.
    Date(NaiveDate),
    /// Time value.
    Time(NaiveTime),
    /// Timestamp value.
    Timestamp(NaiveDateTime),
}

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

impl Value {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::UInt(_) => ValueKind::UInt,
            Self::Float(_) => ValueKind::Float,
            Self::Numeric(_) => ValueKind::Numeric,
            Self::Text(_) => ValueKind::Text,
            Self::Blob(_) => ValueKind::Blob,
            Self::Date(_) => ValueKind::Date,
            Self::Time(_) => ValueKind::Time,
            Self::Timestamp(_) => ValueKind::Timestamp,
        }
    }

    /// Returns true for NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Converts this value to `kind`. NULL converts to every kind.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Incompatible`] when no lossless conversion
    /// exists.
    #[allow(clippy::cast_precision_loss)]
    pub fn coerce(self, kind: ValueKind) -> Result<Self, ValueError> {
        let from = self.kind();
        if from == kind || self.is_null() {
            return Ok(self);
        }
        let incompatible = ValueError::Incompatible { from, to: kind };
        let converted = match (self, kind) {
            (Self::Int(i), ValueKind::UInt) => u64::try_from(i).ok().map(Self::UInt),
            (Self::Int(i), ValueKind::Float) => Some(Self::Float(i as f64)),
            (Self::UInt(u), ValueKind::Int) => i64::try_from(u).ok().map(Self::Int),
            (Self::UInt(u), ValueKind::Float) => Some(Self::Float(u as f64)),
            (Self::Bool(b), ValueKind::Int) => Some(Self::Int(i64::from(b))),
            (Self::Int(i), ValueKind::Numeric) => Some(Self::Numeric(i.to_string())),
            (Self::UInt(u), ValueKind::Numeric) => Some(Self::Numeric(u.to_string())),
            (Self::Float(f), ValueKind::Numeric) if f.is_finite() => {
                Some(Self::Numeric(f.to_string()))
            }
            (Self::Text(s), kind) => Self::parse_text(&s, kind),
            (value, ValueKind::Text) => value.display_text().map(Self::Text),
            _ => None,
        };
        converted.ok_or(incompatible)
    }

    fn parse_text(s: &str, kind: ValueKind) -> Option<Self> {
        let s = s.trim();
        match kind {
            ValueKind::Bool => match s.to_ascii_lowercase().as_str() {
                "true" | "t" | "1" => Some(Self::Bool(true)),
                "false" | "f" | "0" => Some(Self::Bool(false)),
                _ => None,
            },
            ValueKind::Int => s.parse().ok().map(Self::Int),
            ValueKind::UInt => s.parse().ok().map(Self::UInt),
            ValueKind::Float => s.parse().ok().map(Self::Float),
            ValueKind::Numeric => s
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(|_| Self::Numeric(String::from(s))),
            ValueKind::Date => NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .map(Self::Date),
            ValueKind::Time => NaiveTime::parse_from_str(s, TIME_FORMAT)
                .ok()
                .map(Self::Time),
            ValueKind::Timestamp => NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
                .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
                .ok()
                .map(Self::Timestamp),
            ValueKind::Blob => Some(Self::Blob(s.as_bytes().to_vec())),
            ValueKind::Null | ValueKind::Text => None,
        }
    }

    fn display_text(&self) -> Option<String> {
        match self {
            Self::Null | Self::Blob(_) | Self::Text(_) => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::UInt(u) => Some(u.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Numeric(n) => Some(n.clone()),
            Self::Date(d) => Some(d.format(DATE_FORMAT).to_string()),
            Self::Time(t) => Some(t.format(TIME_FORMAT).to_string()),
            Self::Timestamp(ts) => Some(ts.format(TIMESTAMP_FORMAT).to_string()),
        }
    }
}

/// Trait for types that can be converted to values.
pub trait ToSqlValue {
    /// Converts the value to a [`Value`].
    fn to_sql_value(self) -> Value;
}

impl ToSqlValue for Value {
    fn to_sql_value(self) -> Value {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> Value {
        Value::Bool(self)
    }
}

impl ToSqlValue for i32 {
    fn to_sql_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

impl ToSqlValue for i64 {
    fn to_sql_value(self) -> Value {
        Value::Int(self)
    }
}

impl ToSqlValue for u32 {
    fn to_sql_value(self) -> Value {
        Value::UInt(u64::from(self))
    }
}

impl ToSqlValue for u64 {
    fn to_sql_value(self) -> Value {
        Value::UInt(self)
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> Value {
        Value::Float(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> Value {
        Value::Text(String::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> Value {
        Value::Text(self)
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> Value {
        Value::Blob(self)
    }
}

impl ToSqlValue for &[u8] {
    fn to_sql_value(self) -> Value {
        Value::Blob(self.to_vec())
    }
}

impl ToSqlValue for NaiveDate {
    fn to_sql_value(self) -> Value {
        Value::Date(self)
    }
}

impl ToSqlValue for NaiveTime {
    fn to_sql_value(self) -> Value {
        Value::Time(self)
    }
}

impl ToSqlValue for NaiveDateTime {
    fn to_sql_value(self) -> Value {
        Value::Timestamp(self)
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> Value {
        self.map_or(Value::Null, ToSqlValue::to_sql_value)
    }
}

/// Turns a value into its SQL literal text.
pub trait ValueRenderer: Send + Sync {
    /// Renders `value` as SQL text.
    ///
    /// # Errors
    ///
    /// Returns an error if the renderer does not support the value.
    fn render(&self, value: &Value) -> Result<String, ValueError>;
}

impl<F> ValueRenderer for F
where
    F: Fn(&Value) -> Result<String, ValueError> + Send + Sync,
{
    fn render(&self, value: &Value) -> Result<String, ValueError> {
        self(value)
    }
}

/// The built-in renderer for one value kind.
///
/// Text is single-quoted with quotes and backslashes doubled, blobs use
/// `X'..'` notation, temporal values are quoted ISO-8601 strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultRenderer {
    kind: ValueKind,
}

impl DefaultRenderer {
    /// Creates the default renderer for `kind`.
    #[must_use]
    pub const fn new(kind: ValueKind) -> Self {
        Self { kind }
    }

    /// Returns the kind this renderer handles.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }
}

impl ValueRenderer for DefaultRenderer {
    fn render(&self, value: &Value) -> Result<String, ValueError> {
        if value.kind() != self.kind && !value.is_null() {
            return Err(ValueError::Rejected {
                expected: self.kind,
                found: value.kind(),
            });
        }
        let sql = match value {
            Value::Null => String::from("NULL"),
            Value::Bool(true) => String::from("TRUE"),
            Value::Bool(false) => String::from("FALSE"),
            Value::Int(i) => i.to_string(),
            Value::UInt(u) => u.to_string(),
            Value::Float(f) => {
                if !f.is_finite() {
                    return Err(ValueError::NotRepresentable(f.to_string()));
                }
                f.to_string()
            }
            Value::Numeric(n) => n.clone(),
            Value::Text(s) => quote_text(s),
            Value::Blob(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
            Value::Date(d) => format!("'{}'", d.format(DATE_FORMAT)),
            Value::Time(t) => format!("'{}'", t.format(TIME_FORMAT)),
            Value::Timestamp(ts) => format!("'{}'", ts.format(TIMESTAMP_FORMAT)),
        };
        Ok(sql)
    }
}

/// Single-quotes `s`, doubling quotes and backslashes.
#[must_use]
pub fn quote_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// A registry of renderers keyed by value kind.
#[derive(Clone)]
pub struct ValueRenderers {
    renderers: HashMap<ValueKind, Arc<dyn ValueRenderer>>,
}

impl ValueRenderers {
    /// Creates a registry with the default renderer for every kind.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for kind in ValueKind::ALL {
            registry.register(kind, DefaultRenderer::new(kind));
        }
        registry
    }

    /// Creates a registry with no renderers.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// Registers `renderer` for `kind`, replacing any previous one.
    pub fn register(&mut self, kind: ValueKind, renderer: impl ValueRenderer + 'static) {
        self.renderers.insert(kind, Arc::new(renderer));
    }

    /// Removes the renderer for `kind`. Returns true if one was registered.
    pub fn unregister(&mut self, kind: ValueKind) -> bool {
        self.renderers.remove(&kind).is_some()
    }

    /// Returns the renderer for `kind`.
    #[must_use]
    pub fn get(&self, kind: ValueKind) -> Option<&dyn ValueRenderer> {
        self.renderers.get(&kind).map(AsRef::as_ref)
    }

    /// Renders `value` with the renderer registered for its kind.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::NoRenderer`] if no renderer is registered, or
    /// the renderer's own error.
    pub fn render(&self, value: &Value) -> Result<String, ValueError> {
        let kind = value.kind();
        self.get(kind)
            .ok_or(ValueError::NoRenderer(kind))?
            .render(value)
    }
}

impl Default for ValueRenderers {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for ValueRenderers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.renderers.keys().map(ValueKind::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("ValueRenderers")
            .field("kinds", &kinds)
            .finish()
    }
}
