//! # Field Rules
//!
//! Built-in validation rules for a single field. A rule is a [`FieldKind`]
//! plus three modifiers:
//!
//! - `optional` — a missing field is omitted from the record instead of
//!   reported as `required`.
//! - `default` — a missing field takes this value. The default is checked
//!   against the rule like any other input.
//! - `coerce` — string input is parsed into the rule's type (and numbers or
//!   booleans are rendered for string rules). Environment variables are
//!   always strings, so typed rules over the process environment or a
//!   dotenv file need `coerce`.
//!
//! Rules are strict by default: a `string` rule rejects the JSON number `1`.
//!
//! Rules deserialize from `{"type": "integer", "coerce": true, "default": 8080}`.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use envsafe_core::value_kind;

/// Type a field must have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    /// Any string.
    String,
    /// Any finite number, stored as a JSON number.
    Number,
    /// A whole number that fits in `i64` (or `u64`).
    Integer,
    /// `true` or `false`.
    Boolean,
    /// One of a fixed set of strings.
    Enum {
        /// Accepted values.
        values: Vec<String>,
    },
    /// An absolute URL, stored in normalized form.
    Url,
}

impl FieldKind {
    fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Enum { .. } => "enum",
            Self::Url => "url",
        }
    }
}

/// Validation rule for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    #[serde(flatten)]
    kind: FieldKind,
    #[serde(default, skip_serializing_if = "is_false")]
    optional: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    coerce: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
}

/// Keys a declared rule object may carry.
pub(crate) const RULE_KEYS: &[&str] = &["type", "values", "optional", "coerce", "default"];

fn is_false(b: &bool) -> bool {
    !*b
}

impl FieldRule {
    /// Required, strict rule of the given kind.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            optional: false,
            coerce: false,
            default: None,
        }
    }

    /// Any string.
    pub fn string() -> Self {
        Self::new(FieldKind::String)
    }

    /// Any finite number.
    pub fn number() -> Self {
        Self::new(FieldKind::Number)
    }

    /// A whole number.
    pub fn integer() -> Self {
        Self::new(FieldKind::Integer)
    }

    /// `true` or `false`.
    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    /// Field must be one of `values`.
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(FieldKind::Enum {
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    /// An absolute URL.
    pub fn url() -> Self {
        Self::new(FieldKind::Url)
    }

    /// Allow the field to be missing.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Parse string input into the rule's type.
    pub fn coerce(mut self) -> Self {
        self.coerce = true;
        self
    }

    /// Value used when the field is missing.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Type the field must have.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Whether a missing field is allowed.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether string input is parsed.
    pub fn is_coerced(&self) -> bool {
        self.coerce
    }

    /// Value used when the field is missing, if any.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Check the raw value of a field.
    ///
    /// Returns `Ok(None)` for a missing optional field without default,
    /// `Ok(Some(value))` with the coerced value otherwise.
    ///
    /// # Errors
    ///
    /// Returns the violation message when the value does not satisfy the
    /// rule, or `"required"` when a required field is missing.
    pub fn check(&self, raw: Option<&Value>) -> Result<Option<Value>, String> {
        match (raw, &self.default) {
            (Some(value), _) => self.check_present(value).map(Some),
            (None, Some(default)) => self
                .check_present(default)
                .map(Some)
                .map_err(|e| format!("default {e}")),
            (None, None) if self.optional => Ok(None),
            (None, None) => Err("required".to_string()),
        }
    }

    fn check_present(&self, value: &Value) -> Result<Value, String> {
        match &self.kind {
            FieldKind::String => self.check_string(value),
            FieldKind::Number => self.check_number(value),
            FieldKind::Integer => self.check_integer(value),
            FieldKind::Boolean => self.check_boolean(value),
            FieldKind::Enum { values } => self.check_enum(value, values),
            FieldKind::Url => self.check_url(value),
        }
    }

    fn mismatch(&self, value: &Value) -> String {
        format!(
            "expected {}, received {}",
            self.kind.name(),
            value_kind(value)
        )
    }

    fn check_string(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::String(_) => Ok(value.clone()),
            Value::Number(n) if self.coerce => Ok(Value::String(n.to_string())),
            Value::Bool(b) if self.coerce => Ok(Value::String(b.to_string())),
            other => Err(self.mismatch(other)),
        }
    }

    fn check_number(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::Number(_) => Ok(value.clone()),
            Value::String(s) if self.coerce => parse_number(s)
                .map(Value::Number)
                .ok_or_else(|| format!("expected number, received {s:?}")),
            other => Err(self.mismatch(other)),
        }
    }

    fn check_integer(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
            Value::Number(n) => Err(format!("expected integer, received {n}")),
            Value::String(s) if self.coerce => parse_integer(s)
                .map(Value::Number)
                .ok_or_else(|| format!("expected integer, received {s:?}")),
            other => Err(self.mismatch(other)),
        }
    }

    fn check_boolean(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) if self.coerce => parse_bool(s)
                .map(Value::Bool)
                .ok_or_else(|| format!("expected boolean, received {s:?}")),
            other => Err(self.mismatch(other)),
        }
    }

    fn check_enum(&self, value: &Value, values: &[String]) -> Result<Value, String> {
        let candidate = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) if self.coerce => n.to_string(),
            Value::Bool(b) if self.coerce => b.to_string(),
            other => return Err(self.mismatch(other)),
        };
        if values.iter().any(|v| *v == candidate) {
            Ok(Value::String(candidate))
        } else {
            let expected: Vec<String> = values.iter().map(|v| format!("'{v}'")).collect();
            Err(format!(
                "invalid enum value, expected {}, received '{candidate}'",
                expected.join(" | ")
            ))
        }
    }

    fn check_url(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::String(s) => url::Url::parse(s)
                .map(|u| Value::String(u.to_string()))
                .map_err(|e| format!("invalid url {s:?}: {e}")),
            other => Err(self.mismatch(other)),
        }
    }
}

/// Parse a decimal string into a finite JSON number.
pub(crate) fn parse_number(s: &str) -> Option<Number> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Parse a decimal string into an integer JSON number.
pub(crate) fn parse_integer(s: &str) -> Option<Number> {
    let s = s.trim();
    s.parse::<i64>()
        .map(Number::from)
        .or_else(|_| s.parse::<u64>().map(Number::from))
        .ok()
}

/// Parse the usual spellings of a boolean flag, case-insensitively.
pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
