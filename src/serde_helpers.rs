//! Serde helpers for the loosely typed records HasOffers returns.
//!
//! The API sends most scalars as strings (`"id": "150"`, `"require_approval": "0"`) but
//! not consistently. When the `tracing` feature is enabled, this module also logs warnings
//! for any unknown fields encountered during deserialization, helping detect API changes.

use std::fmt;

use serde::de::{self, DeserializeOwned, Visitor};
use serde_json::Value;

/// A `serde_as` type that deserializes strings or integers as `String`.
///
/// Use with `#[serde_as(as = "StringFromAny")]` for `String` fields
/// or `#[serde_as(as = "Option<StringFromAny>")]` for `Option<String>`.
pub struct StringFromAny;

impl<'de> serde_with::DeserializeAs<'de, String> for StringFromAny {
    fn deserialize_as<D>(deserializer: D) -> std::result::Result<String, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct StringOrNumberVisitor;

        impl Visitor<'_> for StringOrNumberVisitor {
            type Value = String;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("string or integer")
            }

            fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(v.to_owned())
            }

            fn visit_string<E>(self, v: String) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(v)
            }

            fn visit_i64<E>(self, v: i64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(v.to_string())
            }

            fn visit_u64<E>(self, v: u64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(v.to_string())
            }
        }

        deserializer.deserialize_any(StringOrNumberVisitor)
    }
}

impl serde_with::SerializeAs<String> for StringFromAny {
    fn serialize_as<S>(source: &String, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(source)
    }
}

/// A `serde_as` type for flags sent as `true`, `1` or `"1"` (and their negatives).
pub struct BoolFromAny;

impl<'de> serde_with::DeserializeAs<'de, bool> for BoolFromAny {
    fn deserialize_as<D>(deserializer: D) -> std::result::Result<bool, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct FlagVisitor;

        impl Visitor<'_> for FlagVisitor {
            type Value = bool;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("boolean, 0/1, or a string holding either")
            }

            fn visit_bool<E>(self, v: bool) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(v)
            }

            fn visit_i64<E>(self, v: i64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(v != 0)
            }

            fn visit_u64<E>(self, v: u64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(v != 0)
            }

            fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                match v {
                    "1" | "true" => Ok(true),
                    "0" | "false" | "" => Ok(false),
                    other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
                }
            }
        }

        deserializer.deserialize_any(FlagVisitor)
    }
}

impl serde_with::SerializeAs<bool> for BoolFromAny {
    fn serialize_as<S>(source: &bool, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bool(*source)
    }
}

/// Deserialize JSON with unknown field warnings.
///
/// Fields present in `value` but absent from `T` are logged at warn level and otherwise
/// ignored. On failure the path of the offending field is logged before the error is
/// returned.
#[cfg(feature = "tracing")]
pub fn deserialize_with_warnings<T: DeserializeOwned>(value: Value) -> crate::Result<T> {
    use std::any::type_name;

    tracing::trace!(
        type_name = %type_name::<T>(),
        json = %value,
        "deserializing JSON"
    );

    // Clone the value so we can look up unknown field values later
    let original = value.clone();

    let mut unknown_paths: Vec<String> = Vec::new();

    let result: T = serde_ignored::deserialize(value, |path| {
        unknown_paths.push(path.to_string());
    })
    .inspect_err(|_| {
        // Re-deserialize with serde_path_to_error to get the error path
        let json_str = original.to_string();
        let jd = &mut serde_json::Deserializer::from_str(&json_str);
        let path_result: Result<T, _> = serde_path_to_error::deserialize(jd);
        if let Err(path_err) = path_result {
            let path = path_err.path().to_string();
            let value_at_path = lookup_value(&original, &path);

            tracing::error!(
                type_name = %type_name::<T>(),
                path = %path,
                value = %format_value(value_at_path),
                error = %path_err.inner(),
                "deserialization failed"
            );
        }
    })?;

    if !unknown_paths.is_empty() {
        let type_name = type_name::<T>();
        for path in unknown_paths {
            tracing::warn!(
                type_name = %type_name,
                field = %path,
                value = %format_value(lookup_value(&original, &path)),
                "unknown field in API response"
            );
        }
    }

    Ok(result)
}

/// Pass-through deserialization when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub fn deserialize_with_warnings<T: DeserializeOwned>(value: Value) -> crate::Result<T> {
    Ok(serde_json::from_value(value)?)
}

/// Look up a value in a JSON structure by a `serde_ignored` / `serde_path_to_error` path.
///
/// `?` segments (Option wrappers) are skipped, numeric segments index arrays, and both
/// `a.b[0]` and `a.b.0` forms are understood.
#[cfg(feature = "tracing")]
fn lookup_value<'value>(value: &'value Value, path: &str) -> Option<&'value Value> {
    let mut current = value;

    for segment in parse_path_segments(path) {
        if segment == "?" {
            continue;
        }

        current = match current {
            Value::Object(map) => map.get(&segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

/// `"data[15].offer_id"` -> `["data", "15", "offer_id"]`
#[cfg(feature = "tracing")]
fn parse_path_segments(path: &str) -> Vec<String> {
    path.split(['.', '[', ']'])
        .filter(|segment| !segment.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(feature = "tracing")]
fn format_value(value: Option<&Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "<unable to retrieve>".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use serde_with::serde_as;

    use super::*;

    #[serde_as]
    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Record {
        #[serde_as(as = "StringFromAny")]
        id: String,
        #[serde_as(as = "Option<StringFromAny>")]
        advertiser_id: Option<String>,
        #[serde_as(as = "Option<BoolFromAny>")]
        require_approval: Option<bool>,
    }

    #[test]
    fn string_from_any_accepts_strings_and_integers() {
        let from_string: Record = serde_json::from_value(json!({ "id": "150" })).expect("string");
        let from_number: Record = serde_json::from_value(json!({ "id": 150 })).expect("number");
        let negative: Record = serde_json::from_value(json!({ "id": -1 })).expect("negative");

        assert_eq!(from_string.id, "150");
        assert_eq!(from_number.id, "150");
        assert_eq!(negative.id, "-1");
    }

    #[test]
    fn string_from_any_optional() {
        let record: Record =
            serde_json::from_value(json!({ "id": "1", "advertiser_id": 12 })).expect("some");
        assert_eq!(record.advertiser_id.as_deref(), Some("12"));

        let record: Record = serde_json::from_value(json!({ "id": "1" })).expect("none");
        assert_eq!(record.advertiser_id, None);
    }

    #[test]
    fn string_from_any_serializes_as_string() {
        let record = Record {
            id: "150".to_owned(),
            advertiser_id: None,
            require_approval: Some(true),
        };

        assert_eq!(
            serde_json::to_value(&record).expect("serialize"),
            json!({ "id": "150", "advertiser_id": null, "require_approval": true })
        );
    }

    #[test]
    fn bool_from_any_accepts_flags() {
        for (raw, expected) in [
            (json!("1"), true),
            (json!("0"), false),
            (json!(1), true),
            (json!(0), false),
            (json!(true), true),
            (json!("false"), false),
        ] {
            let record: Record =
                serde_json::from_value(json!({ "id": "1", "require_approval": raw }))
                    .expect("flag");
            assert_eq!(record.require_approval, Some(expected));
        }
    }

    #[test]
    fn bool_from_any_rejects_other_strings() {
        let result: Result<Record, _> =
            serde_json::from_value(json!({ "id": "1", "require_approval": "maybe" }));

        result.unwrap_err();
    }

    #[test]
    fn deserialize_with_warnings_ignores_unknown_fields() {
        let record: Record = deserialize_with_warnings(json!({
            "id": "150",
            "name": "Summer Sale",
            "default_payout": "1.50"
        }))
        .expect("deserialization failed");

        assert_eq!(record.id, "150");
    }

    #[test]
    fn deserialize_with_warnings_missing_required_field_fails() {
        let result: crate::Result<Record> = deserialize_with_warnings(json!({ "name": "x" }));

        assert_eq!(result.unwrap_err().kind(), crate::error::Kind::Internal);
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn lookup_follows_dots_and_brackets() {
        let value = json!({ "data": [{ "Offer": { "id": "150" } }] });

        assert_eq!(
            lookup_value(&value, "data[0].Offer.id"),
            Some(&json!("150"))
        );
        assert_eq!(lookup_value(&value, "data.0.?.Offer"), Some(&json!({ "id": "150" })));
        assert_eq!(lookup_value(&value, ""), Some(&value));
        assert_eq!(lookup_value(&value, "data[3]"), None);
        assert_eq!(lookup_value(&value, "data[0].Offer.id.deeper"), None);
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn format_value_shows_json_or_placeholder() {
        assert_eq!(format_value(Some(&json!({ "a": 1 }))), r#"{"a":1}"#);
        assert_eq!(format_value(None), "<unable to retrieve>");
    }
}
