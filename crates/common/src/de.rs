//! Lenient decoders for loosely typed storefront payloads.
//!
//! The storefront API is not strict about scalar types: ids arrive as numbers
//! or strings, flags as booleans or `0`/`1`, and missing values as `null`.
//! These functions accept any JSON scalar and coerce it into the target type,
//! falling back to the type's zero value when coercion is impossible. Use them
//! through `#[serde(default, deserialize_with = "common::de::...")]`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

/// A JSON scalar before coercion.
#[derive(Debug, Clone, PartialEq)]
enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Null,
}

impl Scalar {
    fn as_i64(&self) -> i64 {
        match self {
            Scalar::Int(v) => *v,
            Scalar::Float(v) => truncate(*v),
            Scalar::Bool(v) => i64::from(*v),
            Scalar::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(truncate))
                    .unwrap_or(0)
            }
            Scalar::Null => 0,
        }
    }

    fn as_f64(&self) -> f64 {
        match self {
            Scalar::Int(v) => *v as f64,
            Scalar::Float(v) => *v,
            Scalar::Bool(v) => f64::from(u8::from(*v)),
            Scalar::Text(s) => s.trim().parse().unwrap_or(0.0),
            Scalar::Null => 0.0,
        }
    }

    fn into_text(self) -> String {
        match self {
            Scalar::Int(v) => v.to_string(),
            Scalar::Float(v) => v.to_string(),
            Scalar::Bool(v) => v.to_string(),
            Scalar::Text(s) => s,
            Scalar::Null => String::new(),
        }
    }

    fn as_flag(&self) -> bool {
        match self {
            Scalar::Bool(v) => *v,
            Scalar::Int(v) => *v != 0,
            Scalar::Float(v) => *v != 0.0,
            Scalar::Text(s) => {
                let s = s.trim();
                s.eq_ignore_ascii_case("true") || s == "1"
            }
            Scalar::Null => false,
        }
    }
}

fn truncate(value: f64) -> i64 {
    if value.is_finite() { value.trunc() as i64 } else { 0 }
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Scalar;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, string, boolean or null")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Scalar, E> {
        Ok(Scalar::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
        Ok(Scalar::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
        Ok(i64::try_from(v).map_or(Scalar::Float(v as f64), Scalar::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
        Ok(Scalar::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
        Ok(Scalar::Text(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Scalar, E> {
        Ok(Scalar::Text(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Scalar, E> {
        Ok(Scalar::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Scalar, E> {
        Ok(Scalar::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Scalar, D::Error> {
        deserializer.deserialize_any(self)
    }
}

fn scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Scalar, D::Error> {
    deserializer.deserialize_any(ScalarVisitor)
}

/// Decodes any scalar into an integer type. Fractions are truncated; values
/// that do not fit the target type (negative quantities, say) become zero.
pub fn integer<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64> + Default,
{
    let value = scalar(deserializer)?.as_i64();
    Ok(T::try_from(value).unwrap_or_default())
}

/// Decodes any scalar into a floating point number.
pub fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    scalar(deserializer).map(|s| s.as_f64())
}

/// Decodes any scalar into text. `null` becomes the empty string.
pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    scalar(deserializer).map(Scalar::into_text)
}

/// Like [`text`], but `null` and blank strings become `None`.
pub fn optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = text(deserializer)?;
    Ok((!value.trim().is_empty()).then_some(value))
}

/// Decodes booleans, `0`/`1` and `"true"`/`"false"`.
pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    scalar(deserializer).map(|s| s.as_flag())
}

/// Decodes an array, treating `null` as empty.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Decodes epoch milliseconds. Missing or out-of-range values become the epoch.
pub fn timestamp_millis<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    let millis = scalar(deserializer)?.as_i64();
    Ok(DateTime::from_timestamp_millis(millis).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "integer")]
        count: u32,
        #[serde(default, deserialize_with = "text")]
        label: String,
        #[serde(default, deserialize_with = "optional_text")]
        variant: Option<String>,
        #[serde(default, deserialize_with = "flag")]
        enabled: bool,
        #[serde(default, deserialize_with = "list")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "timestamp_millis")]
        at: DateTime<Utc>,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn missing_fields_take_zero_values() {
        let p = probe("{}");
        assert_eq!(p.count, 0);
        assert_eq!(p.label, "");
        assert_eq!(p.variant, None);
        assert!(!p.enabled);
        assert!(p.tags.is_empty());
        assert_eq!(p.at, DateTime::<Utc>::default());
    }

    #[test]
    fn nulls_take_zero_values() {
        let p = probe(
            r#"{"count":null,"label":null,"variant":null,"enabled":null,"tags":null,"at":null}"#,
        );
        assert_eq!(p.count, 0);
        assert_eq!(p.label, "");
        assert_eq!(p.variant, None);
        assert!(p.tags.is_empty());
    }

    #[test]
    fn integers_are_coerced() {
        assert_eq!(probe(r#"{"count":"3"}"#).count, 3);
        assert_eq!(probe(r#"{"count":2.9}"#).count, 2);
        assert_eq!(probe(r#"{"count":" 4.5 "}"#).count, 4);
        assert_eq!(probe(r#"{"count":-1}"#).count, 0);
        assert_eq!(probe(r#"{"count":"many"}"#).count, 0);
    }

    #[test]
    fn text_accepts_numbers() {
        assert_eq!(probe(r#"{"label":64000}"#).label, "64000");
        assert_eq!(probe(r#"{"variant":"  "}"#).variant, None);
        assert_eq!(probe(r#"{"variant":12}"#).variant.as_deref(), Some("12"));
    }

    #[test]
    fn flags_accept_several_spellings() {
        assert!(probe(r#"{"enabled":1}"#).enabled);
        assert!(probe(r#"{"enabled":"TRUE"}"#).enabled);
        assert!(!probe(r#"{"enabled":"0"}"#).enabled);
    }

    #[test]
    fn timestamps_are_epoch_millis() {
        let p = probe(r#"{"at":1700000000000}"#);
        assert_eq!(p.at.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn objects_are_rejected() {
        let result: Result<Probe, _> = serde_json::from_str(r#"{"count":{}}"#);
        assert!(result.is_err());
    }
}
