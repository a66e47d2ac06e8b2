//! Canonical report model.
//!
//! Every report shown to a user, whether it came from the API or from the built-in fallback
//! set, is expressed in these types. Instances are built once by the normaliser and are never
//! mutated afterwards.

use crate::constants::NOT_MEASURED;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

pub use medwell_types::format_number;

/// Report identifier.
///
/// API identifiers may be numbers or strings; both are kept in their rendered text form. Ids
/// are expected to be unique within a working set but collisions are tolerated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct ReportId(String);

impl ReportId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReportId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One lab measurement.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ReportElement {
    /// Measured value, or [`NOT_MEASURED`] when the test was not performed.
    pub value: f64,
    /// Lower bound of the normal range (inclusive).
    pub min: f64,
    /// Upper bound of the normal range (inclusive).
    pub max: f64,
    pub unit: String,
}

impl ReportElement {
    pub fn new(value: f64, min: f64, max: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            min,
            max,
            unit: unit.into(),
        }
    }

    /// `false` when the value is the "not measured" sentinel.
    pub fn is_present(&self) -> bool {
        self.value != NOT_MEASURED
    }

    /// `true` when the value is measured and inside `[min, max]`.
    pub fn is_in_range(&self) -> bool {
        self.is_present() && self.within_bounds()
    }

    /// Plain bounds check that ignores the sentinel.
    pub fn within_bounds(&self) -> bool {
        self.min <= self.value && self.value <= self.max
    }

    /// The value as text, e.g. `10.5`, `7500` or `-1`.
    pub fn value_text(&self) -> String {
        format_number(self.value)
    }

    /// The value followed by its unit, e.g. `10.5 mg/dL`.
    pub fn value_with_unit(&self) -> String {
        format!("{} {}", self.value_text(), self.unit)
    }

    /// The normal range with its unit, e.g. `8.5 - 10.2 mg/dL`.
    pub fn range_text(&self) -> String {
        format!(
            "{} - {} {}",
            format_number(self.min),
            format_number(self.max),
            self.unit
        )
    }
}

/// Element name to measurement mapping, kept in source order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportElements(Vec<(String, ReportElement)>);

impl ReportElements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an element, replacing the value of an existing name in place.
    pub fn insert(&mut self, name: impl Into<String>, element: ReportElement) {
        let name = name.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = element,
            None => self.0.push((name, element)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ReportElement> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, element)| element)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReportElement)> {
        self.0.iter().map(|(name, element)| (name.as_str(), element))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, ReportElement)> for ReportElements {
    fn from_iter<T: IntoIterator<Item = (S, ReportElement)>>(iter: T) -> Self {
        let mut elements = ReportElements::new();
        for (name, element) in iter {
            elements.insert(name, element);
        }
        elements
    }
}

impl Serialize for ReportElements {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, element) in &self.0 {
            map.serialize_entry(name, element)?;
        }
        map.end()
    }
}

/// One medical report in canonical form.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ReportId,
    pub title: String,
    pub date: String,
    pub collection_date: String,
    pub doctor_name: String,
    pub summary: String,
    pub elements: ReportElements,
    /// Link to the source document; empty when unknown.
    pub report_url: String,
    pub report_type: String,
    pub submitted_at: String,
}

impl Report {
    pub fn has_report_url(&self) -> bool {
        !self.report_url.is_empty()
    }
}

/// Turns a camel-case element name into spaced words: `redBloodCells` becomes
/// `red Blood Cells`.
pub fn humanise_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(ch);
    }
    out.trim().to_string()
}

/// [`humanise_name`] with the first letter capitalised, for headings.
pub fn display_name(name: &str) -> String {
    let spaced = humanise_name(name);
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
