//! Shared primitive types for the MedWell report crates.
//!
//! These types carry the user-facing search parameters between the query engine and the
//! CLI/REST front doors. They are deliberately small and have no knowledge of reports.

use std::fmt;
use std::str::FromStr;

/// Errors that can occur when parsing shared primitive types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypesError {
    /// The range filter name was not one of the supported values
    #[error("unknown range filter '{0}' (expected all, inRange, outOfRange or notAvailable)")]
    UnknownRangeFilter(String),
}

/// A case-insensitive substring search.
///
/// The needle is lowercased once at construction. An empty query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Creates a new `SearchQuery` from raw user input.
    ///
    /// The input is lowercased but not trimmed: a search for `" 5"` only matches text that
    /// actually contains a space before the `5`.
    pub fn new(input: impl AsRef<str>) -> Self {
        Self(input.as_ref().to_lowercase())
    }

    /// Returns `true` when the query is empty and therefore matches everything.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the lowercased needle.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive containment check against `haystack`.
    pub fn matches(&self, haystack: &str) -> bool {
        self.0.is_empty() || haystack.to_lowercase().contains(&self.0)
    }

    /// Containment check against text that is compared as-is.
    ///
    /// Used for rendered numbers, which carry no letters to fold.
    pub fn matches_exact_case(&self, haystack: &str) -> bool {
        self.0.is_empty() || haystack.contains(&self.0)
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SearchQuery {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Option<String>> for SearchQuery {
    fn from(value: Option<String>) -> Self {
        value.map(Self::new).unwrap_or_default()
    }
}

/// Range classification filter applied to the elements of a single report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RangeFilter {
    /// Keep every element that matches the text search
    #[default]
    All,
    /// Keep measured elements inside their normal range
    InRange,
    /// Keep measured elements outside their normal range
    OutOfRange,
    /// Keep elements carrying the "not measured" sentinel
    NotAvailable,
}

impl RangeFilter {
    /// All filters in the order they are offered to users.
    pub const ALL: [RangeFilter; 4] = [
        RangeFilter::All,
        RangeFilter::InRange,
        RangeFilter::OutOfRange,
        RangeFilter::NotAvailable,
    ];

    /// The wire name of the filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeFilter::All => "all",
            RangeFilter::InRange => "inRange",
            RangeFilter::OutOfRange => "outOfRange",
            RangeFilter::NotAvailable => "notAvailable",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            RangeFilter::All => "All Results",
            RangeFilter::InRange => "In Range",
            RangeFilter::OutOfRange => "Out of Range",
            RangeFilter::NotAvailable => "Not Available",
        }
    }

    /// Decides whether an element with the given presence and range status passes.
    pub fn accepts(&self, is_present: bool, is_in_range: bool) -> bool {
        match self {
            RangeFilter::All => true,
            RangeFilter::InRange => is_in_range,
            RangeFilter::OutOfRange => is_present && !is_in_range,
            RangeFilter::NotAvailable => !is_present,
        }
    }
}

impl fmt::Display for RangeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangeFilter {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RangeFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str() == s)
            .ok_or_else(|| TypesError::UnknownRangeFilter(s.to_owned()))
    }
}

impl serde::Serialize for RangeFilter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for RangeFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Renders a number as text the way the report pages always have.
///
/// Integral values print without a fractional part and other values in their shortest
/// round-trip form. Magnitudes of at least `1e21` or below `1e-6` switch to exponent form
/// with an explicit sign, e.g. `1e+21` and `1.5e-7`. Negative zero prints as `0`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    if value == 0.0 {
        return "0".into();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((digits, exponent)) if !exponent.starts_with('-') => format!("{digits}e+{exponent}"),
        _ => text,
    }
}
