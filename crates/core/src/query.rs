//! Report query engine.
//!
//! Three independent, pure operations over an already loaded report list:
//! - [`filter_global`] for the report list search
//! - [`find_similar`] for the "similar reports" strip of a selected report
//! - [`classify_elements`] for the detail view's searchable, filterable element list
//!
//! None of them mutate their inputs. Results borrow from the input list.

use crate::report::{display_name, Report, ReportElement, ReportElements};
use medwell_types::{RangeFilter, SearchQuery};

/// Keeps reports matching `query` in title, doctor, summary, element names or element values.
///
/// Matching is a case-insensitive substring test; an empty query keeps every report. Input
/// order is preserved.
pub fn filter_global<'a>(reports: &'a [Report], query: &SearchQuery) -> Vec<&'a Report> {
    let matched: Vec<&Report> = reports
        .iter()
        .filter(|report| report_matches(report, query))
        .collect();
    tracing::debug!(
        query = query.as_str(),
        matched = matched.len(),
        total = reports.len(),
        "filtered reports"
    );
    matched
}

fn report_matches(report: &Report, query: &SearchQuery) -> bool {
    query.matches(&report.title)
        || query.matches(&report.doctor_name)
        || query.matches(&report.summary)
        || report
            .elements
            .iter()
            .any(|(name, element)| element_matches(name, element, query))
}

fn element_matches(name: &str, element: &ReportElement, query: &SearchQuery) -> bool {
    query.matches(name) || query.matches_exact_case(&element.value_text())
}

/// Returns the positions in `reports` of reports similar to `target`.
///
/// A candidate is similar when any of these hold:
/// - its title, lowercased, contains the target's lowercased title
/// - its doctor name equals the target's exactly
/// - it shares at least one element name with the target
///
/// Title containment is one-directional and the doctor comparison is case-sensitive. Every
/// report carrying the target's id is excluded, including the target itself.
pub fn find_similar_positions(reports: &[Report], target: &Report) -> Vec<usize> {
    let target_title = target.title.to_lowercase();
    reports
        .iter()
        .enumerate()
        .filter(|(_, candidate)| candidate.id != target.id)
        .filter(|(_, candidate)| {
            candidate.title.to_lowercase().contains(&target_title)
                || candidate.doctor_name == target.doctor_name
                || shares_element_name(&candidate.elements, &target.elements)
        })
        .map(|(position, _)| position)
        .collect()
}

/// Returns the reports similar to `target`, in input order.
///
/// See [`find_similar_positions`] for the matching rules. The result may be empty.
pub fn find_similar<'a>(reports: &'a [Report], target: &Report) -> Vec<&'a Report> {
    find_similar_positions(reports, target)
        .into_iter()
        .map(|position| &reports[position])
        .collect()
}

fn shares_element_name(candidate: &ReportElements, target: &ReportElements) -> bool {
    candidate.names().any(|name| target.contains(name))
}

/// Range status of a single element row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementStatus {
    InRange,
    OutOfRange,
    NotAvailable,
}

impl ElementStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ElementStatus::InRange => "In Range",
            ElementStatus::OutOfRange => "Out of Range",
            ElementStatus::NotAvailable => "Not Available",
        }
    }
}

/// One row of the detail view.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassifiedElement<'a> {
    pub name: &'a str,
    pub data: &'a ReportElement,
    pub is_present: bool,
    pub is_in_range: bool,
}

impl<'a> ClassifiedElement<'a> {
    fn new(name: &'a str, data: &'a ReportElement) -> Self {
        Self {
            name,
            data,
            is_present: data.is_present(),
            is_in_range: data.is_in_range(),
        }
    }

    pub fn status(&self) -> ElementStatus {
        match (self.is_present, self.is_in_range) {
            (false, _) => ElementStatus::NotAvailable,
            (true, true) => ElementStatus::InRange,
            (true, false) => ElementStatus::OutOfRange,
        }
    }

    /// Heading text, e.g. `Red Blood Cells`.
    pub fn display_name(&self) -> String {
        display_name(self.name)
    }
}

/// Classifies, filters and orders the elements of one report.
///
/// A row is kept when it matches `query` (name or value text, case-insensitive) and is
/// accepted by `range_filter`. Rows carrying the "not measured" sentinel are moved after all
/// measured rows; otherwise the mapping order is kept.
pub fn classify_elements<'a>(
    elements: &'a ReportElements,
    query: &SearchQuery,
    range_filter: RangeFilter,
) -> Vec<ClassifiedElement<'a>> {
    let mut rows: Vec<ClassifiedElement<'a>> = elements
        .iter()
        .filter(|(name, element)| element_matches(name, element, query))
        .map(|(name, element)| ClassifiedElement::new(name, element))
        .filter(|row| range_filter.accepts(row.is_present, row.is_in_range))
        .collect();

    // Stable: measured rows first, original order within each group.
    rows.sort_by_key(|row| !row.is_present);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NOT_MEASURED;
    use crate::fallback::fallback_reports;
    use crate::report::ReportId;

    fn report(id: &str, title: &str, doctor: &str, elements: &[&str]) -> Report {
        Report {
            id: ReportId::new(id),
            title: title.into(),
            date: "d".into(),
            collection_date: "c".into(),
            doctor_name: doctor.into(),
            summary: "s".into(),
            elements: elements
                .iter()
                .map(|name| (*name, ReportElement::new(1.0, 0.0, 2.0, "u")))
                .collect(),
            report_url: String::new(),
            report_type: "t".into(),
            submitted_at: "x".into(),
        }
    }

    fn ids(reports: &[&Report]) -> Vec<String> {
        reports.iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn empty_query_returns_all_reports_in_order() {
        let reports = fallback_reports();
        let filtered = filter_global(&reports, &SearchQuery::new(""));
        assert_eq!(filtered.len(), reports.len());
        for (kept, original) in filtered.iter().zip(&reports) {
            assert_eq!(*kept, original);
        }
    }

    #[test]
    fn global_filter_is_case_insensitive() {
        let reports = fallback_reports();
        let upper = filter_global(&reports, &SearchQuery::new("CALCIUM"));
        let lower = filter_global(&reports, &SearchQuery::new("calcium"));
        assert_eq!(ids(&upper), ids(&lower));
        assert_eq!(ids(&upper), vec!["1", "3"]);
    }

    #[test]
    fn global_filter_matches_each_field() {
        let reports = fallback_reports();
        assert_eq!(ids(&filter_global(&reports, &"lipid".into())), vec!["2"]);
        assert_eq!(ids(&filter_global(&reports, &"dr. vivek".into())), vec!["3"]);
        assert_eq!(ids(&filter_global(&reports, &"elevated".into())), vec!["1"]);
        assert_eq!(ids(&filter_global(&reports, &"triglycerides".into())), vec!["2"]);
        assert_eq!(ids(&filter_global(&reports, &"7500".into())), vec!["1"]);
        assert!(filter_global(&reports, &"no such thing".into()).is_empty());
    }

    #[test]
    fn global_filter_matches_rendered_values() {
        let reports = fallback_reports();
        // 10.5 is calcium in report 1; 10.5 also appears only as a max in report 3.
        assert_eq!(ids(&filter_global(&reports, &"10.5".into())), vec!["1"]);
        // the sentinel renders as -1
        assert_eq!(ids(&filter_global(&reports, &"-1".into())), vec!["3"]);
    }

    #[test]
    fn similar_never_includes_target_id() {
        let reports = fallback_reports();
        for target in &reports {
            let similar = find_similar(&reports, target);
            assert!(similar.iter().all(|r| r.id != target.id));
        }
    }

    #[test]
    fn similar_by_shared_element_name() {
        let reports = fallback_reports();
        // Annual Checkup and Nutrient Deficiency Panel both measure calcium.
        assert_eq!(ids(&find_similar(&reports, &reports[0])), vec!["3"]);
        assert_eq!(ids(&find_similar(&reports, &reports[2])), vec!["1"]);
        assert!(find_similar(&reports, &reports[1]).is_empty());
    }

    #[test]
    fn similar_title_match_is_directional() {
        let reports = vec![
            report("a", "Lipid", "Dr. A", &[]),
            report("b", "Lipid Panel Extended", "Dr. B", &[]),
        ];
        // "lipid panel extended" contains "lipid"
        assert_eq!(ids(&find_similar(&reports, &reports[0])), vec!["b"]);
        // "lipid" does not contain "lipid panel extended"
        assert!(find_similar(&reports, &reports[1]).is_empty());
    }

    #[test]
    fn similar_doctor_match_is_case_sensitive() {
        let reports = vec![
            report("a", "One", "Dr. Nishi", &[]),
            report("b", "Two", "dr. nishi", &[]),
            report("c", "Three", "Dr. Nishi", &[]),
        ];
        assert_eq!(ids(&find_similar(&reports, &reports[0])), vec!["c"]);
    }

    #[test]
    fn similar_excludes_every_report_sharing_target_id() {
        let reports = vec![
            report("1", "Alpha", "Dr. A", &["x"]),
            report("1", "Beta", "Dr. A", &["x"]),
            report("2", "Gamma", "Dr. A", &[]),
        ];
        assert_eq!(ids(&find_similar(&reports, &reports[0])), vec!["2"]);
        assert_eq!(find_similar_positions(&reports, &reports[0]), vec![2]);
    }

    fn sentinel_fixture() -> ReportElements {
        [
            ("a", ReportElement::new(NOT_MEASURED, 0.0, 10.0, "u")),
            ("b", ReportElement::new(5.0, 0.0, 10.0, "u")),
            ("c", ReportElement::new(NOT_MEASURED, 0.0, 10.0, "u")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn sentinel_rows_sort_after_measured_rows() {
        let elements = sentinel_fixture();
        let rows = classify_elements(&elements, &SearchQuery::default(), RangeFilter::All);
        let names: Vec<&str> = rows.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn not_available_filter_keeps_only_sentinels() {
        let reports = fallback_reports();
        for report in &reports {
            let rows = classify_elements(
                &report.elements,
                &SearchQuery::default(),
                RangeFilter::NotAvailable,
            );
            assert!(rows.iter().all(|r| r.data.value == NOT_MEASURED));
        }
        let rows = classify_elements(
            &reports[2].elements,
            &SearchQuery::default(),
            RangeFilter::NotAvailable,
        );
        let names: Vec<&str> = rows.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["magnesium"]);
    }

    #[test]
    fn out_of_range_filter_keeps_only_measured_out_of_range() {
        let reports = fallback_reports();
        for report in &reports {
            let rows = classify_elements(
                &report.elements,
                &SearchQuery::default(),
                RangeFilter::OutOfRange,
            );
            assert!(rows.iter().all(|r| {
                r.data.value != NOT_MEASURED
                    && (r.data.value < r.data.min || r.data.value > r.data.max)
            }));
        }
        let rows = classify_elements(
            &reports[2].elements,
            &SearchQuery::default(),
            RangeFilter::OutOfRange,
        );
        let names: Vec<&str> = rows.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["calcium", "iron", "vitaminD"]);
    }

    #[test]
    fn in_range_filter() {
        let reports = fallback_reports();
        let rows = classify_elements(
            &reports[0].elements,
            &SearchQuery::default(),
            RangeFilter::InRange,
        );
        let names: Vec<&str> = rows.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["hemoglobin", "redBloodCells", "whiteBloodCells"]);
    }

    #[test]
    fn elevated_calcium_is_out_of_range() {
        let reports = fallback_reports();
        let rows = classify_elements(&reports[0].elements, &"calcium".into(), RangeFilter::All);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_present);
        assert!(!rows[0].is_in_range);
        assert_eq!(rows[0].status(), ElementStatus::OutOfRange);
        assert_eq!(rows[0].status().label(), "Out of Range");
    }

    #[test]
    fn local_search_finds_unmeasured_magnesium() {
        let reports = fallback_reports();
        let rows = classify_elements(&reports[2].elements, &"mag".into(), RangeFilter::All);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "magnesium");
        assert_eq!(rows[0].status(), ElementStatus::NotAvailable);
    }

    #[test]
    fn local_search_matches_values_and_combines_with_range_filter() {
        let reports = fallback_reports();
        let rows = classify_elements(&reports[0].elements, &"14.5".into(), RangeFilter::All);
        let names: Vec<&str> = rows.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["hemoglobin"]);

        let rows =
            classify_elements(&reports[0].elements, &"14.5".into(), RangeFilter::OutOfRange);
        assert!(rows.is_empty());
    }

    #[test]
    fn classified_rows_expose_display_names() {
        let reports = fallback_reports();
        let rows = classify_elements(&reports[0].elements, &"red".into(), RangeFilter::All);
        assert_eq!(rows[0].display_name(), "Red Blood Cells");
    }
}
