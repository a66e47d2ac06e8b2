//! # MedWell Core
//!
//! Core logic for the MedWell patient report views.
//!
//! This crate contains pure data operations over an in-memory report list:
//! - Normalising raw API records into canonical reports, with built-in fallback reports
//! - Global report search, similar-report matching and per-report element classification
//! - An explicit, immutable view state for list/detail navigation
//! - The single report load attempt and its fallback behaviour
//! - The doctor directory with specialty search and paging
//!
//! **No API concerns**: HTTP servers, command line parsing and PDF rendering belong in
//! `api-rest`, `medwell-cli` and `medwell-export`.

pub mod config;
pub mod constants;
pub mod doctor;
pub mod error;
pub mod fallback;
pub mod normalise;
pub mod query;
pub mod report;
pub mod source;
pub mod view;

pub use config::{reports_file_from_env_value, resolve_export_dir, PortalConfig};
pub use constants::{DEFAULT_EXPORT_DIR, DOCTORS_PER_PAGE, NOT_MEASURED};
pub use doctor::{
    fallback_doctors, filter_doctors, paginate, Doctor, DoctorDirectory, DoctorSearch, Page,
};
pub use error::{CoreError, CoreResult};
pub use fallback::fallback_reports;
pub use normalise::{normalise, normalise_record};
pub use query::{
    classify_elements, filter_global, find_similar, find_similar_positions, ClassifiedElement,
    ElementStatus,
};
pub use report::{display_name, humanise_name, Report, ReportElement, ReportElements, ReportId};
pub use source::{
    load_reports, DataSource, JsonFileSource, LoadOutcome, NoSource, ReportSource, StaticSource,
};
pub use view::{ViewMode, ViewState};

pub use medwell_types::{RangeFilter, SearchQuery};

/// Read-only access to one loaded report list.
///
/// Holds the outcome of a single load attempt. Lookups by id resolve to the first report
/// carrying that id.
#[derive(Clone, Debug)]
pub struct ReportService {
    outcome: LoadOutcome,
}

impl ReportService {
    /// Creates a service over an existing load outcome.
    pub fn new(outcome: LoadOutcome) -> Self {
        Self { outcome }
    }

    /// Fetches once from `source` and wraps the result.
    pub fn load(source: &dyn ReportSource) -> Self {
        Self::new(load_reports(source))
    }

    /// All reports, live records first.
    pub fn reports(&self) -> &[Report] {
        self.outcome.source.reports()
    }

    pub fn data_source(&self) -> &DataSource {
        &self.outcome.source
    }

    /// The fetch error message, when the load fell back because of a failure.
    pub fn load_error(&self) -> Option<&str> {
        self.outcome.error.as_deref()
    }

    /// Looks up a report by id.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ReportNotFound` if no report carries `id`.
    pub fn find(&self, id: &ReportId) -> CoreResult<&Report> {
        self.reports()
            .iter()
            .find(|report| &report.id == id)
            .ok_or_else(|| CoreError::ReportNotFound(id.to_string()))
    }

    /// Reports matching a global search.
    pub fn search(&self, query: &SearchQuery) -> Vec<&Report> {
        filter_global(self.reports(), query)
    }

    /// Reports similar to the report carrying `id`.
    pub fn similar(&self, id: &ReportId) -> CoreResult<Vec<&Report>> {
        let target = self.find(id)?;
        Ok(find_similar(self.reports(), target))
    }

    /// Classified element rows of the report carrying `id`.
    pub fn elements(
        &self,
        id: &ReportId,
        query: &SearchQuery,
        range_filter: RangeFilter,
    ) -> CoreResult<Vec<ClassifiedElement<'_>>> {
        let report = self.find(id)?;
        Ok(classify_elements(&report.elements, query, range_filter))
    }
}
