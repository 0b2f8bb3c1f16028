//! Identity data presented by the Login Widget callback.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    error::VerifyError,
    utils::{canonical::data_check_string, query::parse_request_url},
};

/// Names carried by the typed fields of [`IdentityClaim`].
const RESERVED_FIELDS: [&str; 4] = ["id", "first_name", "auth_date", "hash"];

/// A scalar value of a signed login field.
///
/// Values are rendered into the data-check-string with their literal text or
/// decimal form, so `Integer(-5)` becomes `-5` and `Text("a\nb")` keeps its
/// newline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Bool(value) => write!(f, "{value}"),
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::Unsigned(value) => write!(f, "{value}"),
            FieldValue::Float(value) => write_number(f, *value),
            FieldValue::Text(value) => f.write_str(value),
        }
    }
}

/// Render a float the way the provider's widget stringifies numbers:
/// shortest round-trip digits, exponent form outside `[1e-6, 1e21)` with an
/// explicit sign (`1e+21`, `1e-7`), and no negative zero.
fn write_number(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_nan() {
        return f.write_str("NaN");
    }
    if value.is_infinite() {
        return f.write_str(if value > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if value == 0.0 {
        return f.write_str("0");
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return write!(f, "{value}");
    }

    let exponential = format!("{value:e}");
    match exponential.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            write!(f, "{mantissa}e+{exponent}")
        }
        _ => f.write_str(&exponential),
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Unsigned(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// Untrusted login data: the required widget fields, the supplied `hash`, and
/// every other field that came with them.
///
/// Optional widget fields (`username`, `photo_url`, `last_name`) and any
/// unrecognized fields live in one map, so whatever the provider signed is
/// exactly what gets canonicalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityClaim {
    pub id: i64,
    pub first_name: String,
    pub auth_date: i64,
    pub hash: String,
    #[serde(flatten)]
    fields: BTreeMap<String, FieldValue>,
}

impl IdentityClaim {
    pub fn new(
        id: i64,
        first_name: impl Into<String>,
        auth_date: i64,
        hash: impl Into<String>,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            auth_date,
            hash: hash.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Parse a JSON callback body.
    pub fn from_json(body: &str) -> Result<Self, VerifyError> {
        serde_json::from_str(body)
            .map_err(|e| VerifyError::malformed_claim(format!("Invalid login JSON: {e}")))
    }

    /// Build a claim from the query string of a widget redirect
    /// (`https://example.com/auth?id=..&first_name=..&auth_date=..&hash=..`).
    ///
    /// Every parameter other than `hash` becomes a signed field. When a
    /// parameter repeats, its first occurrence is used.
    pub fn from_redirect_url(request_url: &str) -> Result<Self, VerifyError> {
        let url = parse_request_url(request_url)
            .map_err(|e| VerifyError::malformed_claim(format!("Invalid request URL: {e}")))?;

        let mut params: BTreeMap<String, String> = BTreeMap::new();
        for (key, value) in url.query_pairs() {
            params
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }

        let mut take = |name: &str| {
            params
                .remove(name)
                .ok_or_else(|| VerifyError::malformed_claim(format!("Missing `{name}` parameter")))
        };

        let hash = take("hash")?;
        let first_name = take("first_name")?;
        let id = parse_integer("id", &take("id")?)?;
        let auth_date = parse_integer("auth_date", &take("auth_date")?)?;

        let fields = params
            .into_iter()
            .map(|(key, value)| (key, FieldValue::Text(value)))
            .collect();

        Ok(Self {
            id,
            first_name,
            auth_date,
            hash,
            fields,
        })
    }

    pub fn with_username(self, username: impl Into<String>) -> Self {
        self.with_field("username", username.into())
    }

    pub fn with_photo_url(self, photo_url: impl Into<String>) -> Self {
        self.with_field("photo_url", photo_url.into())
    }

    pub fn with_last_name(self, last_name: impl Into<String>) -> Self {
        self.with_field("last_name", last_name.into())
    }

    /// Add or replace a signed field.
    ///
    /// Reserved names (`id`, `first_name`, `auth_date`, `hash`) belong to the
    /// typed fields and are ignored here.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let key = key.into();
        if !RESERVED_FIELDS.contains(&key.as_str()) {
            self.fields.insert(key, value.into());
        }
        self
    }

    pub fn remove_field(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.remove(key)
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Fields other than `id`, `first_name`, `auth_date` and `hash`.
    pub fn extra_fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    pub fn username(&self) -> Option<&str> {
        self.field("username").and_then(FieldValue::as_str)
    }

    pub fn photo_url(&self) -> Option<&str> {
        self.field("photo_url").and_then(FieldValue::as_str)
    }

    pub fn last_name(&self) -> Option<&str> {
        self.field("last_name").and_then(FieldValue::as_str)
    }

    /// The canonical string the provider signed: every field except `hash`.
    pub fn data_check_string(&self) -> String {
        let mut entries: Vec<(&str, String)> = vec![
            ("id", self.id.to_string()),
            ("first_name", self.first_name.clone()),
            ("auth_date", self.auth_date.to_string()),
        ];
        entries.extend(
            self.fields
                .iter()
                .map(|(key, value)| (key.as_str(), value.to_string())),
        );

        data_check_string(entries)
    }
}

/// The signed text must survive a round trip, so `01` or `+1` never stand in
/// for `1`.
fn parse_integer(name: &str, value: &str) -> Result<i64, VerifyError> {
    value
        .parse::<i64>()
        .ok()
        .filter(|n| n.to_string() == value)
        .ok_or_else(|| VerifyError::malformed_claim(format!("`{name}` must be an integer")))
}
