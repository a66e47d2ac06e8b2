//! Report data sources and the single load attempt.
//!
//! The report list is fetched once per load. A successful fetch with records produces live
//! data (followed by the fallback reports); an empty feed or a failed fetch produces just the
//! fallback reports. A failure is never fatal: it is logged, its message is kept for display,
//! and the report views stay usable.

use crate::error::CoreResult;
use crate::fallback::fallback_reports;
use crate::normalise::normalise;
use crate::report::Report;
use medwell_wire::{RawFeed, ReportFeed};
use std::path::{Path, PathBuf};

/// Something that can fetch the raw report feed once.
pub trait ReportSource {
    /// Performs the fetch. There is no retry, timeout or cancellation.
    fn fetch(&self) -> CoreResult<RawFeed>;

    /// Short description for log lines.
    fn describe(&self) -> String;
}

/// A JSON feed file on disk.
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSource for JsonFileSource {
    fn fetch(&self) -> CoreResult<RawFeed> {
        Ok(ReportFeed::read(&self.path)?)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// An in-memory feed.
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    feed: RawFeed,
}

impl StaticSource {
    pub fn new(feed: RawFeed) -> Self {
        Self { feed }
    }

    /// Parses `json_text` up front.
    pub fn from_json(json_text: &str) -> CoreResult<Self> {
        Ok(Self::new(ReportFeed::parse(json_text)?))
    }
}

impl ReportSource for StaticSource {
    fn fetch(&self) -> CoreResult<RawFeed> {
        Ok(self.feed.clone())
    }

    fn describe(&self) -> String {
        format!("static feed ({} records)", self.feed.len())
    }
}

/// No configured source: always an empty feed.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSource;

impl ReportSource for NoSource {
    fn fetch(&self) -> CoreResult<RawFeed> {
        Ok(RawFeed::default())
    }

    fn describe(&self) -> String {
        "no report source".into()
    }
}

/// Where the working report list came from.
///
/// Consumers should use [`DataSource::reports`]: live and fallback reports form one flat list.
#[derive(Clone, Debug, PartialEq)]
pub enum DataSource {
    /// Normalised live records followed by the fallback reports.
    Live(Vec<Report>),
    /// Only the fallback reports.
    Fallback(Vec<Report>),
}

impl DataSource {
    pub fn reports(&self) -> &[Report] {
        match self {
            DataSource::Live(reports) | DataSource::Fallback(reports) => reports,
        }
    }

    pub fn into_reports(self) -> Vec<Report> {
        match self {
            DataSource::Live(reports) | DataSource::Fallback(reports) => reports,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, DataSource::Live(_))
    }
}

/// Result of the single load attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadOutcome {
    pub source: DataSource,
    /// User-visible error text when the fetch failed.
    pub error: Option<String>,
}

/// Fetches from `source` once and builds the working report list.
pub fn load_reports(source: &dyn ReportSource) -> LoadOutcome {
    match source.fetch() {
        Ok(feed) if !feed.is_empty() => {
            tracing::info!(
                "loaded {} reports from {}",
                feed.len(),
                source.describe()
            );
            LoadOutcome {
                source: DataSource::Live(normalise(&feed.reports)),
                error: None,
            }
        }
        Ok(_) => {
            tracing::info!(
                "no reports data received from {}, using fallback reports",
                source.describe()
            );
            LoadOutcome {
                source: DataSource::Fallback(fallback_reports()),
                error: None,
            }
        }
        Err(e) => {
            tracing::error!("error fetching reports from {}: {}", source.describe(), e);
            LoadOutcome {
                source: DataSource::Fallback(fallback_reports()),
                error: Some(e.to_string()),
            }
        }
    }
}
