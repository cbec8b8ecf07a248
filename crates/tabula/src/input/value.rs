//! Loosely typed cell values and their explicit coercions.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// A raw cell value as it arrives from an upload.
///
/// Uploaded rows carry whatever dynamic kind the ingestion step produced.
/// Every conversion the engine needs (numeric, textual, boolean) is an
/// explicit method here; a failed conversion is `None`, never a panic.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Absent or null.
    #[default]
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
}

/// Hashable identity of a value, used for grouping and distinct counts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Null,
    Boolean(bool),
    Number(u64),
    Text(String),
}

impl RawValue {
    /// Whether the value counts as missing: null, or a blank string.
    pub fn is_missing(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::String(s) => s.trim().is_empty(),
            RawValue::Number(n) => n.is_nan(),
            RawValue::Boolean(_) => false,
        }
    }

    /// Whether the value is a native number.
    pub fn is_number(&self) -> bool {
        matches!(self, RawValue::Number(n) if !n.is_nan())
    }

    /// Coerce to a finite number.
    ///
    /// Strings are trimmed and parsed; booleans map to 1/0. Anything else,
    /// including non-finite parses such as `"inf"`, yields `None`.
    pub fn to_number(&self) -> Option<f64> {
        let n = match self {
            RawValue::Number(n) => *n,
            RawValue::String(s) => s.trim().parse::<f64>().ok()?,
            RawValue::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            RawValue::Null => return None,
        };
        n.is_finite().then_some(n)
    }

    /// String form used for text statistics, boolean vocabulary and labels.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Equality used by widget filters.
    ///
    /// Values only match values of the same kind; null never matches.
    pub fn matches(&self, other: &RawValue) -> bool {
        match (self, other) {
            (RawValue::Number(a), RawValue::Number(b)) => a == b,
            (RawValue::String(a), RawValue::String(b)) => a == b,
            (RawValue::Boolean(a), RawValue::Boolean(b)) => a == b,
            _ => false,
        }
    }

    /// Hashable key for this value.
    pub fn key(&self) -> ValueKey {
        match self {
            RawValue::Null => ValueKey::Null,
            RawValue::Boolean(b) => ValueKey::Boolean(*b),
            RawValue::Number(n) if n.is_nan() => ValueKey::Null,
            // Fold -0.0 into 0.0 so both land in one group.
            RawValue::Number(n) => ValueKey::Number(if *n == 0.0 { 0f64.to_bits() } else { n.to_bits() }),
            RawValue::String(s) => ValueKey::Text(s.clone()),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => Ok(()),
            RawValue::Boolean(b) => write!(f, "{}", b),
            RawValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::String(s) => f.write_str(s),
        }
    }
}

impl Serialize for RawValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RawValue::Null => serializer.serialize_none(),
            RawValue::Boolean(b) => serializer.serialize_bool(*b),
            // Whole numbers keep their integer look on the wire.
            RawValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                serializer.serialize_i64(*n as i64)
            }
            RawValue::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            RawValue::Number(_) => serializer.serialize_none(),
            RawValue::String(s) => serializer.serialize_str(s),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::String(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::String(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Number(value as f64)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Boolean(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values() {
        assert!(RawValue::Null.is_missing());
        assert!(RawValue::from("").is_missing());
        assert!(RawValue::from("   ").is_missing());
        assert!(!RawValue::from("NA").is_missing());
        assert!(!RawValue::from(0.0).is_missing());
        assert!(!RawValue::from(false).is_missing());
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(RawValue::from(" 12.5 ").to_number(), Some(12.5));
        assert_eq!(RawValue::from(3i64).to_number(), Some(3.0));
        assert_eq!(RawValue::from(true).to_number(), Some(1.0));
        assert_eq!(RawValue::from("abc").to_number(), None);
        assert_eq!(RawValue::from("inf").to_number(), None);
        assert_eq!(RawValue::Null.to_number(), None);
    }

    #[test]
    fn test_text_form() {
        assert_eq!(RawValue::from(25i64).to_text(), "25");
        assert_eq!(RawValue::from(2.5).to_text(), "2.5");
        assert_eq!(RawValue::from(true).to_text(), "true");
        assert_eq!(RawValue::Null.to_text(), "");
    }

    #[test]
    fn test_filter_matching() {
        assert!(RawValue::from("NY").matches(&RawValue::from("NY")));
        assert!(RawValue::from(5i64).matches(&RawValue::from(5.0)));
        assert!(!RawValue::from("5").matches(&RawValue::from(5i64)));
        assert!(!RawValue::Null.matches(&RawValue::Null));
    }

    #[test]
    fn test_keys_group_signed_zero() {
        assert_eq!(RawValue::from(0.0).key(), RawValue::from(-0.0).key());
        assert_ne!(RawValue::from("1").key(), RawValue::from(1i64).key());
    }

    #[test]
    fn test_serde_shape() {
        let values: Vec<RawValue> = serde_json::from_str(r#"[null, true, 25, 2.5, "NY"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                RawValue::Null,
                RawValue::Boolean(true),
                RawValue::Number(25.0),
                RawValue::Number(2.5),
                RawValue::from("NY"),
            ]
        );
        assert_eq!(serde_json::to_string(&values).unwrap(), r#"[null,true,25,2.5,"NY"]"#);
    }
}
