//! Request parameters, their wire coercion, and the parameter validators.
//!
//! # Design
//! `Params` keeps insertion order so the encoded query/body is predictable.
//! Values stay typed (`ParamValue`) until `create_parameters_body` turns them
//! into wire-ready scalars:
//!
//! - booleans become the strings `"true"` / `"false"`;
//! - a map under `k` is replaced by one `k/child` entry per child (one level
//!   only, deeper maps are rendered as compact JSON text);
//! - dates become ATOM text (`2024-05-01T09:30:00+00:00`).
//!
//! Anything else passes through untouched, which makes the transformation
//! idempotent. The validators run on the caller's `Params` before any request
//! is built. A key whose value is `Null` counts as absent.

use chrono::{DateTime, FixedOffset, TimeZone};
use serde_json::Value;

use crate::error::{Result, TrelloError};

/// chrono format string for the ATOM (RFC 3339, seconds precision) layout.
pub const ATOM_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// A single parameter value before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Date(DateTime<FixedOffset>),
    List(Vec<ParamValue>),
    Map(Params),
}

impl ParamValue {
    /// Text sent on the wire, or `None` when the value is omitted.
    pub fn to_wire(&self) -> Option<String> {
        match self {
            ParamValue::Null => None,
            ParamValue::Bool(b) => Some(b.to_string()),
            ParamValue::Int(n) => Some(n.to_string()),
            ParamValue::Float(n) => Some(n.to_string()),
            ParamValue::Str(s) => Some(s.clone()),
            ParamValue::Date(d) => Some(format_atom(d)),
            ParamValue::List(items) => Some(
                items
                    .iter()
                    .filter_map(ParamValue::to_wire)
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            ParamValue::Map(_) => Some(self.to_json().to_string()),
        }
    }

    /// JSON rendering, used for maps nested deeper than one level.
    pub fn to_json(&self) -> Value {
        match self {
            ParamValue::Null => Value::Null,
            ParamValue::Bool(b) => Value::Bool(*b),
            ParamValue::Int(n) => Value::from(*n),
            ParamValue::Float(n) => Value::from(*n),
            ParamValue::Str(s) => Value::String(s.clone()),
            ParamValue::Date(d) => Value::String(format_atom(d)),
            ParamValue::List(items) => Value::Array(items.iter().map(ParamValue::to_json).collect()),
            ParamValue::Map(params) => Value::Object(
                params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            ),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }
}

/// Format a timestamp in the fixed ATOM layout.
pub fn format_atom(date: &DateTime<FixedOffset>) -> String {
    date.format(ATOM_FORMAT).to_string()
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(i64::from(v))
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Int(i64::from(v))
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

impl From<&String> for ParamValue {
    fn from(v: &String) -> Self {
        ParamValue::Str(v.clone())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for ParamValue {
    fn from(v: DateTime<Tz>) -> Self {
        ParamValue::Date(v.fixed_offset())
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        ParamValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ParamValue::Null, Into::into)
    }
}

impl From<Params> for ParamValue {
    fn from(v: Params) -> Self {
        ParamValue::Map(v)
    }
}

impl From<Value> for ParamValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => ParamValue::Null,
            Value::Bool(b) => ParamValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ParamValue::Int(i),
                None => ParamValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => ParamValue::Str(s),
            Value::Array(items) => ParamValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => ParamValue::Map(map.into_iter().collect()),
        }
    }
}

/// Ordered parameter mapping with unique keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace `key`, keeping its original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Insert only when `key` is not already present (null counts as present).
    pub fn insert_default(&mut self, key: &str, value: impl Into<ParamValue>) {
        if self.get(key).is_none() {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Present with a non-null value.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_null())
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Coerced `(name, text)` pairs ready for a query string or form body.
    pub fn to_wire_pairs(&self) -> Vec<(String, String)> {
        create_parameters_body(self.clone())
            .entries
            .into_iter()
            .filter_map(|(k, v)| v.to_wire().map(|text| (k, text)))
            .collect()
    }

    /// Convert a JSON object (e.g. a data bag) into parameters.
    pub fn from_json_object(map: &serde_json::Map<String, Value>) -> Self {
        map.iter().map(|(k, v)| (k.clone(), ParamValue::from(v.clone()))).collect()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl<K: Into<String>, V: Into<ParamValue>, const N: usize> From<[(K, V); N]> for Params {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl IntoIterator for Params {
    type Item = (String, ParamValue);
    type IntoIter = std::vec::IntoIter<(String, ParamValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Coerce a parameter mapping into wire-ready values.
pub fn create_parameters_body(params: Params) -> Params {
    let mut body = Params::new();
    for (name, value) in params {
        match value {
            ParamValue::Map(children) => {
                for (child, sub) in children {
                    body.insert(format!("{name}/{child}"), coerce(sub));
                }
            }
            other => {
                body.insert(name, coerce(other));
            }
        }
    }
    body
}

fn coerce(value: ParamValue) -> ParamValue {
    match value {
        ParamValue::Bool(b) => ParamValue::Str(b.to_string()),
        ParamValue::Date(d) => ParamValue::Str(format_atom(&d)),
        ParamValue::List(items) => ParamValue::List(items.into_iter().map(coerce).collect()),
        map @ ParamValue::Map(_) => ParamValue::Str(map.to_json().to_string()),
        other => other,
    }
}

/// Candidate values for `validate_allowed`: one scalar or a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates(Vec<String>);

impl From<&str> for Candidates {
    fn from(v: &str) -> Self {
        Candidates(vec![v.to_string()])
    }
}

impl From<String> for Candidates {
    fn from(v: String) -> Self {
        Candidates(vec![v])
    }
}

impl From<&String> for Candidates {
    fn from(v: &String) -> Self {
        Candidates(vec![v.clone()])
    }
}

impl From<Vec<String>> for Candidates {
    fn from(v: Vec<String>) -> Self {
        Candidates(v)
    }
}

impl From<Vec<&str>> for Candidates {
    fn from(v: Vec<&str>) -> Self {
        Candidates(v.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Candidates {
    fn from(v: &[&str]) -> Self {
        Candidates(v.iter().map(|s| (*s).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Candidates {
    fn from(v: [&str; N]) -> Self {
        Candidates(v.iter().map(|s| (*s).to_string()).collect())
    }
}

/// Fail with `MissingParameter` naming every key of `required` absent from
/// `params`.
pub fn validate_required(required: &[&str], params: &Params) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|key| !params.contains(key))
        .map(|key| (*key).to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(TrelloError::missing_required(missing))
    }
}

/// Check every candidate against `allowed`; return the normalized list.
pub fn validate_allowed(
    allowed: &[&str],
    candidates: impl Into<Candidates>,
    name: &str,
) -> Result<Vec<String>> {
    let Candidates(values) = candidates.into();
    if let Some(bad) = values.iter().find(|v| !allowed.contains(&v.as_str())) {
        return Err(TrelloError::InvalidParameter {
            parameter: name.to_string(),
            value: bad.clone(),
            allowed: allowed.iter().map(|s| (*s).to_string()).collect(),
        });
    }
    Ok(values)
}

/// Succeed when at least one of `keys` is present in `params`.
pub fn validate_at_least_one_of(keys: &[&str], params: &Params) -> Result<bool> {
    if keys.iter().any(|key| params.contains(key)) {
        Ok(true)
    } else {
        Err(TrelloError::missing_one_of(
            keys.iter().map(|k| (*k).to_string()).collect(),
        ))
    }
}
