//! `deserialize_with` helpers for the loosely typed values older records carry.

use std::str::FromStr;

use mongodb::bson::Bson;
use serde::{Deserialize, Deserializer, de::Error};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// An absent or `null` list reads as empty.
pub(crate) fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    to_whole_number(Bson::deserialize(deserializer)?).map_err(D::Error::custom)
}

pub(crate) fn opt_whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Bson::deserialize(deserializer)? {
        Bson::Null => Ok(None),
        value => to_whole_number(value).map(Some).map_err(D::Error::custom),
    }
}

fn to_whole_number(value: Bson) -> Result<i64, String> {
    match value {
        Bson::Int32(n) => Ok(i64::from(n)),
        Bson::Int64(n) => Ok(n),
        Bson::Double(n) if n.is_finite() && n.fract() == 0.0 => Ok(n as i64),
        other => Err(format!("expected a whole number, got {other}")),
    }
}

pub(crate) fn datetime<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OffsetDateTime, D::Error> {
    to_datetime(Bson::deserialize(deserializer)?).map_err(D::Error::custom)
}

pub(crate) fn opt_datetime<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error> {
    match Bson::deserialize(deserializer)? {
        Bson::Null => Ok(None),
        value => to_datetime(value).map(Some).map_err(D::Error::custom),
    }
}

fn to_datetime(value: Bson) -> Result<OffsetDateTime, String> {
    let parsed = match &value {
        Bson::DateTime(dt) => {
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(dt.timestamp_millis()) * 1_000_000).ok()
        }
        Bson::String(s) => OffsetDateTime::parse(s, &Rfc3339).ok(),
        _ => None,
    };
    parsed.ok_or_else(|| format!("expected a date, got {value}"))
}

/// Missing or `null` reads as `false`.
pub(crate) fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

/// A set of closed-set values stored either as one comma separated string or
/// as an array of strings.
pub(crate) fn enum_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    to_enum_list(Bson::deserialize(deserializer)?).map_err(D::Error::custom)
}

pub(crate) fn opt_enum_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    match Bson::deserialize(deserializer)? {
        Bson::Null => Ok(None),
        value => to_enum_list(value).map(Some).map_err(D::Error::custom),
    }
}

fn to_enum_list<T: FromStr>(value: Bson) -> Result<Vec<T>, String> {
    let parse = |s: &str| s.trim().parse().map_err(|_| format!("unexpected value `{}`", s.trim()));
    match value {
        Bson::String(s) => s.split(',').map(parse).collect(),
        Bson::Array(items) => items
            .iter()
            .map(|item| match item {
                Bson::String(s) => parse(s),
                other => Err(format!("expected a string, got {other}")),
            })
            .collect(),
        other => Err(format!("expected a string or list, got {other}")),
    }
}
