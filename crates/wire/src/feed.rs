//! Report feed wire models and parsing helpers.
//!
//! The report API answers with a JSON envelope:
//!
//! ```text
//! {
//!   "reports": [
//!     {
//!       "id": 17,
//!       "report_file": "/media/reports/Thyroid Profile.pdf",
//!       "date_of_report": "02 Dec, 2024",
//!       "doctor_name": "Dr. Nishi",
//!       "reportdetail": {
//!         "report_data": {
//!           "tsh": { "value": 2.1, "min": 0.4, "max": 4.0, "unit": "mIU/L" }
//!         }
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! Every record field is optional and may be `null`. Element numbers are accepted either as
//! JSON numbers or as numeric strings, since decimal columns are commonly serialised as text.
//!
//! Notes:
//! - A missing or non-array `reports` member is not an error; it yields an empty feed.
//! - Element order is preserved exactly as it appears in the payload.
//! - A field holding a value of the wrong type reads as absent. One malformed field never
//!   costs the rest of its record, and one malformed record never costs the feed.

use crate::WireResult;
use medwell_types::format_number;
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::Path;

/// Reads an optional field, treating a value of the wrong shape as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

// ============================================================================
// Wire models
// ============================================================================

/// A parsed report feed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawFeed {
    pub reports: Vec<RawReport>,
}

impl RawFeed {
    pub fn new(reports: Vec<RawReport>) -> Self {
        Self { reports }
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }
}

/// One report record as returned by the API.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawReport {
    #[serde(deserialize_with = "lenient")]
    pub id: Option<RawId>,
    #[serde(deserialize_with = "lenient")]
    pub report_file: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub date_of_report: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub date_of_collection: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub doctor_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub report_type: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub submitted_at: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub reportdetail: Option<RawReportDetail>,
}

/// The nested detail object carrying the lab measurements.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawReportDetail {
    #[serde(deserialize_with = "lenient")]
    pub report_data: Option<RawElements>,
}

/// Report identifier as sent by the API: either a number or a string.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(serde_json::Number),
    Text(String),
}

/// Numbers render as the portal always showed them, so `1.0` reads as `1`.
impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Number(n) => match n.as_f64() {
                Some(float) if n.is_f64() => f.write_str(&format_number(float)),
                _ => write!(f, "{n}"),
            },
            RawId::Text(s) => f.write_str(s),
        }
    }
}

/// A number that may arrive as a JSON number or as numeric text.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    /// Returns the numeric value, or `None` when textual input does not parse to a finite
    /// number. `"NaN"` and `"inf"` count as unparsable.
    pub fn as_f64(&self) -> Option<f64> {
        let n = match self {
            RawNumber::Number(n) => Some(*n),
            RawNumber::Text(s) => s.trim().parse::<f64>().ok(),
        };
        n.filter(|n| n.is_finite())
    }
}

/// One lab element entry.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawElement {
    #[serde(deserialize_with = "lenient")]
    pub value: Option<RawNumber>,
    #[serde(deserialize_with = "lenient")]
    pub min: Option<RawNumber>,
    #[serde(deserialize_with = "lenient")]
    pub max: Option<RawNumber>,
    #[serde(deserialize_with = "lenient")]
    pub unit: Option<String>,
}

/// Element entries in payload order.
///
/// A JSON object with a repeated key keeps the last value at the position of the first
/// occurrence. An entry that is not an object reads as an element with every field absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawElements(pub Vec<(String, RawElement)>);

impl RawElements {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawElement)> {
        self.0.iter().map(|(name, element)| (name.as_str(), element))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for RawElements {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ElementsVisitor;

        impl<'de> Visitor<'de> for ElementsVisitor {
            type Value = RawElements;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of element name to measurement")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries: Vec<(String, RawElement)> =
                    Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, value)) = map.next_entry::<String, serde_json::Value>()? {
                    let element = RawElement::deserialize(value).unwrap_or_default();
                    match entries.iter_mut().find(|(existing, _)| *existing == name) {
                        Some(slot) => slot.1 = element,
                        None => entries.push((name, element)),
                    }
                }
                Ok(RawElements(entries))
            }
        }

        deserializer.deserialize_map(ElementsVisitor)
    }
}

// ============================================================================
// Public ReportFeed operations
// ============================================================================

/// Report feed operations.
///
/// This is a zero-sized type used for namespacing feed parsing. All methods are associated
/// functions.
pub struct ReportFeed;

impl ReportFeed {
    /// Parse a report feed from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidJson`](crate::WireError::InvalidJson) if the text is not
    /// valid JSON. Fields of an unexpected type are not errors; they read as absent.
    ///
    /// A document without a `reports` array is not an error and yields an empty feed.
    pub fn parse(json_text: &str) -> WireResult<RawFeed> {
        let envelope: serde_json::Value = serde_json::from_str(json_text)?;
        Ok(Self::from_value(envelope))
    }

    /// Build a report feed from an already decoded JSON value.
    ///
    /// A record that is not an object becomes a record with every field absent, so it still
    /// counts towards the feed.
    pub fn from_value(envelope: serde_json::Value) -> RawFeed {
        let records = match envelope {
            serde_json::Value::Object(mut map) => match map.remove("reports") {
                Some(serde_json::Value::Array(records)) => records,
                _ => return RawFeed::default(),
            },
            _ => return RawFeed::default(),
        };

        let reports = records
            .into_iter()
            .map(|record| RawReport::deserialize(record).unwrap_or_default())
            .collect();
        RawFeed { reports }
    }

    /// Read and parse a report feed from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Io`](crate::WireError::Io) if the file cannot be read, otherwise as [`ReportFeed::parse`].
    pub fn read(path: &Path) -> WireResult<RawFeed> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }
}
