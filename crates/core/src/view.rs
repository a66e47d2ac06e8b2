//! Explicit report view state.
//!
//! The report screens are driven by a small immutable record instead of scattered mutable
//! fields. Every transition returns a new [`ViewState`]; derived views are recomputed from the
//! current state and the report list on demand.
//!
//! Selection and the similarity set are stored as positions into the report list the state
//! was built against, so reports sharing an id stay distinguishable.

use crate::error::{CoreError, CoreResult};
use crate::query::{classify_elements, filter_global, find_similar_positions, ClassifiedElement};
use crate::report::{Report, ReportId};
use medwell_types::{RangeFilter, SearchQuery};

/// Which screen is showing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    ListView,
    DetailView {
        id: ReportId,
        position: usize,
    },
}

/// Immutable view-state record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    mode: ViewMode,
    global_query: SearchQuery,
    local_query: SearchQuery,
    range_filter: RangeFilter,
    similar: Vec<usize>,
}

impl ViewState {
    /// The initial list view with no search.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &ViewMode {
        &self.mode
    }

    pub fn global_query(&self) -> &SearchQuery {
        &self.global_query
    }

    pub fn local_query(&self) -> &SearchQuery {
        &self.local_query
    }

    pub fn range_filter(&self) -> RangeFilter {
        self.range_filter
    }

    pub fn selected_id(&self) -> Option<&ReportId> {
        match &self.mode {
            ViewMode::ListView => None,
            ViewMode::DetailView { id, .. } => Some(id),
        }
    }

    /// `ListView -> DetailView` for the report at `position`.
    ///
    /// The similarity set is computed eagerly. A fresh detail view starts with an empty local
    /// search and the `all` range filter; the global search is kept for the way back.
    pub fn select_at(&self, reports: &[Report], position: usize) -> CoreResult<Self> {
        let report = reports
            .get(position)
            .ok_or_else(|| CoreError::ReportNotFound(format!("position {position}")))?;

        Ok(Self {
            mode: ViewMode::DetailView {
                id: report.id.clone(),
                position,
            },
            global_query: self.global_query.clone(),
            local_query: SearchQuery::default(),
            range_filter: RangeFilter::All,
            similar: find_similar_positions(reports, report),
        })
    }

    /// Selects the first report carrying `id`.
    pub fn select(&self, reports: &[Report], id: &ReportId) -> CoreResult<Self> {
        let position = reports
            .iter()
            .position(|report| &report.id == id)
            .ok_or_else(|| CoreError::ReportNotFound(id.to_string()))?;
        self.select_at(reports, position)
    }

    /// `DetailView -> ListView`, clearing the similarity set.
    pub fn back(&self) -> Self {
        Self {
            mode: ViewMode::ListView,
            global_query: self.global_query.clone(),
            local_query: SearchQuery::default(),
            range_filter: RangeFilter::All,
            similar: Vec::new(),
        }
    }

    pub fn with_global_query(&self, query: impl AsRef<str>) -> Self {
        Self {
            global_query: SearchQuery::new(query),
            ..self.clone()
        }
    }

    pub fn with_local_query(&self, query: impl AsRef<str>) -> Self {
        Self {
            local_query: SearchQuery::new(query),
            ..self.clone()
        }
    }

    pub fn with_range_filter(&self, range_filter: RangeFilter) -> Self {
        Self {
            range_filter,
            ..self.clone()
        }
    }

    /// Reports shown in the list view.
    pub fn visible_reports<'a>(&self, reports: &'a [Report]) -> Vec<&'a Report> {
        filter_global(reports, &self.global_query)
    }

    /// The selected report, when in the detail view.
    pub fn selected_report<'a>(&self, reports: &'a [Report]) -> Option<&'a Report> {
        match &self.mode {
            ViewMode::ListView => None,
            ViewMode::DetailView { position, .. } => reports.get(*position),
        }
    }

    /// Reports similar to the selection; empty in the list view.
    pub fn similar_reports<'a>(&self, reports: &'a [Report]) -> Vec<&'a Report> {
        self.similar
            .iter()
            .filter_map(|position| reports.get(*position))
            .collect()
    }

    /// Classified element rows of the selected report; empty in the list view.
    pub fn detail_rows<'a>(&self, reports: &'a [Report]) -> Vec<ClassifiedElement<'a>> {
        self.selected_report(reports)
            .map(|report| classify_elements(&report.elements, &self.local_query, self.range_filter))
            .unwrap_or_default()
    }
}
