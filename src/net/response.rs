//! Analysis result model.
//!
//! [`AnalysisResult`] is what the analyzer service reports about one probed
//! URL: the response headers, the HTTP version, the status code, a display
//! string for the content length, a service label and the raw body.
//!
//! ## Wire format
//! The analyzer nests the summary fields under `analysis`:
//!
//! ```json
//! {
//!   "headers": { "Content-Type": "text/html" },
//!   "body": "<html>...</html>",
//!   "http_version": "HTTP/1.1",
//!   "analysis": { "service_name": "nginx", "status_code": 200, "content_length": "1.2 KB" }
//! }
//! ```
//!
//! The same fields at top level are accepted too. A body that is missing,
//! `null` or not a string reads as empty. Serialization always produces the
//! nested form.
//!
//! ## Notes
//! - Every field is untrusted. `status_code` keeps any integer, in range or not.
//! - [`Headers`] keeps arrival order and looks names up case-insensitively.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const UNKNOWN_SERVICE: &str = "Unknown";
pub const UNKNOWN_CONTENT_LENGTH: &str = "N/A";

/// Immutable result of one analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireResult", into = "WireResult")]
pub struct AnalysisResult {
    /// Response headers of the probed URL, in arrival order.
    pub headers: Headers,

    /// Protocol version, e.g. `HTTP/1.1`. Not a header.
    pub http_version: String,

    /// Status code reported by the analyzer. Expected 100-599, not validated.
    pub status_code: i64,

    /// Pre-formatted display string.
    pub content_length: String,

    /// Display label of the server software.
    pub service_name: String,

    /// Raw body. May be empty, malformed or very large.
    pub body: String,
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self {
            headers: Headers::new(),
            http_version: String::new(),
            status_code: 0,
            content_length: UNKNOWN_CONTENT_LENGTH.to_string(),
            service_name: UNKNOWN_SERVICE.to_string(),
            body: String::new(),
        }
    }
}

impl AnalysisResult {
    /// Parses an analyzer payload in either the nested or the flat shape.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes to the nested analyzer shape.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WireAnalysis {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    service_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_status", skip_serializing_if = "Option::is_none")]
    status_code: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    content_length: Option<String>,
}

/// On-the-wire shape. Nested `analysis` fields win over flat ones.
#[derive(Debug, Default, Serialize, Deserialize)]
struct WireResult {
    #[serde(default)]
    headers: Headers,
    #[serde(default, deserialize_with = "string_only")]
    body: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    http_version: Option<String>,
    #[serde(default)]
    analysis: Option<WireAnalysis>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing)]
    service_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_status", skip_serializing)]
    status_code: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing)]
    content_length: Option<String>,
}

impl From<WireResult> for AnalysisResult {
    fn from(wire: WireResult) -> Self {
        let analysis = wire.analysis.unwrap_or_default();
        Self {
            headers: wire.headers,
            http_version: wire.http_version.unwrap_or_default(),
            status_code: analysis.status_code.or(wire.status_code).unwrap_or(0),
            content_length: analysis
                .content_length
                .or(wire.content_length)
                .unwrap_or_else(|| UNKNOWN_CONTENT_LENGTH.to_string()),
            service_name: analysis
                .service_name
                .or(wire.service_name)
                .unwrap_or_else(|| UNKNOWN_SERVICE.to_string()),
            body: wire.body.unwrap_or_default(),
        }
    }
}

impl From<AnalysisResult> for WireResult {
    fn from(result: AnalysisResult) -> Self {
        Self {
            headers: result.headers,
            body: Some(result.body),
            http_version: Some(result.http_version),
            analysis: Some(WireAnalysis {
                service_name: Some(result.service_name),
                status_code: Some(result.status_code),
                content_length: Some(result.content_length),
            }),
            ..Default::default()
        }
    }
}

/// Strings stay strings, `null` is absent, other scalars are stringified.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_string))
}

/// Only a JSON string is kept; any other value reads as absent.
fn string_only<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Integers, integral floats and numeric strings become a status code as
/// they are. Anything else is absent.
fn lenient_status<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn value_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Ordered header list. Names keep the case they arrived with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a header. Duplicate names are kept.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// First value whose name matches ASCII case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(n, v)| (n.into(), v.into())).collect(),
        }
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HeadersVisitor;

        impl<'de> Visitor<'de> for HeadersVisitor {
            type Value = Headers;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of header names to values")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Headers, E> {
                Ok(Headers::new())
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Headers, M::Error> {
                let mut headers = Headers::new();
                while let Some((name, value)) = access.next_entry::<String, serde_json::Value>()? {
                    if let Some(value) = value_to_string(value) {
                        headers.push(name, value);
                    }
                }
                Ok(headers)
            }
        }

        deserializer.deserialize_any(HeadersVisitor)
    }
}
