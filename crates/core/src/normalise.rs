//! Report normaliser.
//!
//! Converts raw feed records into canonical [`Report`]s. Every absent or empty field resolves
//! to a declared default here, once, so nothing downstream has to guess.

use crate::constants::{
    COLLECTION_DATE_NOT_AVAILABLE, DATE_NOT_AVAILABLE, DOCTOR_NAME_NOT_AVAILABLE, NOT_MEASURED,
    REPORT_FILE_TITLE_SEGMENT, SUBMITTED_AT_NOT_AVAILABLE, SUMMARY_NOT_AVAILABLE,
    UNKNOWN_REPORT_TITLE, UNKNOWN_REPORT_TYPE,
};
use crate::fallback::fallback_reports;
use crate::report::{Report, ReportElement, ReportElements, ReportId};
use medwell_wire::{RawElement, RawElements, RawNumber, RawReport};

/// Normalises raw records and appends the fallback reports.
///
/// Output is the normalised records in input order followed by the built-in fallback set. The
/// two are concatenated, never merged: an API record with id `1` sits alongside fallback
/// report `1`. Empty input therefore yields exactly the fallback set.
pub fn normalise(raw: &[RawReport]) -> Vec<Report> {
    let mut reports: Vec<Report> = raw.iter().map(normalise_record).collect();
    reports.extend(fallback_reports());
    reports
}

/// Normalises a single raw record.
pub fn normalise_record(raw: &RawReport) -> Report {
    let report_file = present(&raw.report_file);

    Report {
        id: raw
            .id
            .as_ref()
            .map(|id| ReportId::new(id.to_string()))
            .unwrap_or_default(),
        title: report_file
            .and_then(title_from_report_file)
            .unwrap_or_else(|| UNKNOWN_REPORT_TITLE.to_string()),
        date: or_default(&raw.date_of_report, DATE_NOT_AVAILABLE),
        collection_date: or_default(&raw.date_of_collection, COLLECTION_DATE_NOT_AVAILABLE),
        doctor_name: or_default(&raw.doctor_name, DOCTOR_NAME_NOT_AVAILABLE),
        summary: or_default(&raw.summary, SUMMARY_NOT_AVAILABLE),
        elements: raw
            .reportdetail
            .as_ref()
            .and_then(|detail| detail.report_data.as_ref())
            .map(normalise_elements)
            .unwrap_or_default(),
        report_url: report_file.unwrap_or_default().to_string(),
        report_type: or_default(&raw.report_type, UNKNOWN_REPORT_TYPE),
        submitted_at: or_default(&raw.submitted_at, SUBMITTED_AT_NOT_AVAILABLE),
    }
}

/// Extracts a title from a report file path such as `/media/reports/Lipid Panel.pdf`.
///
/// The title is the fourth `/`-delimited segment with everything from its first `.` removed.
/// Returns `None` when the path has fewer segments.
pub fn title_from_report_file(report_file: &str) -> Option<String> {
    let segment = report_file.split('/').nth(REPORT_FILE_TITLE_SEGMENT)?;
    let stem = segment.split('.').next().unwrap_or(segment);
    Some(stem.to_string())
}

fn normalise_elements(raw: &RawElements) -> ReportElements {
    raw.iter()
        .map(|(name, element)| (name, normalise_element(element)))
        .collect()
}

fn normalise_element(raw: &RawElement) -> ReportElement {
    let number = |n: &Option<RawNumber>| n.as_ref().and_then(RawNumber::as_f64);
    ReportElement {
        value: number(&raw.value).unwrap_or(NOT_MEASURED),
        min: number(&raw.min).unwrap_or(0.0),
        max: number(&raw.max).unwrap_or(0.0),
        unit: raw.unit.clone().unwrap_or_default(),
    }
}

/// Present means non-empty: an empty string counts as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn or_default(value: &Option<String>, fallback: &str) -> String {
    present(value).unwrap_or(fallback).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use medwell_wire::ReportFeed;

    fn parse(json: &str) -> Vec<RawReport> {
        ReportFeed::parse(json).expect("parse feed").reports
    }

    #[test]
    fn empty_input_yields_exactly_the_fallback_set() {
        let reports = normalise(&[]);
        let ids: Vec<&str> = reports.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(reports, fallback_reports());
    }

    #[test]
    fn live_records_come_first_then_fallback() {
        let raw = parse(
            r#"{"reports":[
                {"id": 1, "report_file": "/media/reports/Thyroid Profile.pdf"},
                {"id": 9, "report_file": "/media/reports/Liver Function.pdf"}
            ]}"#,
        );
        let reports = normalise(&raw);
        let ids: Vec<&str> = reports.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "9", "1", "2", "3"]);
        assert_eq!(reports[0].title, "Thyroid Profile");
        assert_eq!(reports[1].title, "Liver Function");
        assert_eq!(reports[2].title, "Annual Checkup");
    }

    #[test]
    fn missing_fields_use_fallback_strings() {
        let raw = parse(r#"{"reports":[{"id": 4}]}"#);
        let report = normalise_record(&raw[0]);
        assert_eq!(report.title, UNKNOWN_REPORT_TITLE);
        assert_eq!(report.date, DATE_NOT_AVAILABLE);
        assert_eq!(report.collection_date, COLLECTION_DATE_NOT_AVAILABLE);
        assert_eq!(report.doctor_name, DOCTOR_NAME_NOT_AVAILABLE);
        assert_eq!(report.summary, SUMMARY_NOT_AVAILABLE);
        assert_eq!(report.report_type, UNKNOWN_REPORT_TYPE);
        assert_eq!(report.submitted_at, SUBMITTED_AT_NOT_AVAILABLE);
        assert!(report.elements.is_empty());
        assert_eq!(report.report_url, "");
    }

    #[test]
    fn empty_and_null_strings_count_as_missing() {
        let raw = parse(
            r#"{"reports":[{"summary": "", "doctor_name": null, "report_file": ""}]}"#,
        );
        let report = normalise_record(&raw[0]);
        assert_eq!(report.summary, SUMMARY_NOT_AVAILABLE);
        assert_eq!(report.doctor_name, DOCTOR_NAME_NOT_AVAILABLE);
        assert_eq!(report.title, UNKNOWN_REPORT_TITLE);
        assert_eq!(report.id.as_str(), "");
    }

    #[test]
    fn every_record_without_summary_gets_the_fallback() {
        let raw = parse(
            r#"{"reports":[{"id":1},{"id":2,"summary":null},{"id":3,"summary":""},{"id":4,"summary":"ok"}]}"#,
        );
        let summaries: Vec<String> = raw.iter().map(|r| normalise_record(r).summary).collect();
        assert_eq!(
            summaries,
            vec![
                SUMMARY_NOT_AVAILABLE,
                SUMMARY_NOT_AVAILABLE,
                SUMMARY_NOT_AVAILABLE,
                "ok"
            ]
        );
    }

    #[test]
    fn elements_are_read_from_nested_detail() {
        let raw = parse(
            r#"{"reports":[{"reportdetail":{"report_data":{
                "calcium": {"value": 10.5, "min": 8.5, "max": 10.2, "unit": "mg/dL"},
                "magnesium": {"min": 1.8, "max": 2.6, "unit": "mg/dL"},
                "iron": {"value": "n/a", "unit": "µg/dL"}
            }}}]}"#,
        );
        let report = normalise_record(&raw[0]);
        let names: Vec<&str> = report.elements.names().collect();
        assert_eq!(names, vec!["calcium", "magnesium", "iron"]);

        let calcium = report.elements.get("calcium").expect("calcium");
        assert_eq!(calcium, &ReportElement::new(10.5, 8.5, 10.2, "mg/dL"));

        let magnesium = report.elements.get("magnesium").expect("magnesium");
        assert_eq!(magnesium.value, NOT_MEASURED);

        let iron = report.elements.get("iron").expect("iron");
        assert_eq!(iron.value, NOT_MEASURED);
        assert_eq!((iron.min, iron.max), (0.0, 0.0));
    }

    #[test]
    fn non_finite_text_values_are_unmeasured() {
        let raw = parse(
            r#"{"reports":[{"reportdetail":{"report_data":{
                "ferritin": {"value": "NaN", "min": "inf", "max": 300, "unit": "ng/mL"},
                "b12": {"value": "infinity", "min": 200, "max": "-inf", "unit": "pg/mL"}
            }}}]}"#,
        );
        let report = normalise_record(&raw[0]);

        let ferritin = report.elements.get("ferritin").expect("ferritin");
        assert_eq!(ferritin.value, NOT_MEASURED);
        assert!(!ferritin.is_present());
        assert_eq!((ferritin.min, ferritin.max), (0.0, 300.0));

        let b12 = report.elements.get("b12").expect("b12");
        assert_eq!(b12.value, NOT_MEASURED);
        assert!(!b12.is_present());
        assert_eq!(b12.max, 0.0);
        assert_eq!(b12.value_text(), "-1");
    }

    #[test]
    fn detail_without_report_data_yields_no_elements() {
        let raw = parse(r#"{"reports":[{"reportdetail":{}}]}"#);
        assert!(normalise_record(&raw[0]).elements.is_empty());
    }

    #[test]
    fn report_url_reuses_report_file() {
        let raw = parse(r#"{"reports":[{"report_file":"/media/reports/Lipid Panel.pdf"}]}"#);
        let report = normalise_record(&raw[0]);
        assert_eq!(report.report_url, "/media/reports/Lipid Panel.pdf");
        assert!(report.has_report_url());
    }

    #[test]
    fn title_extraction_edge_cases() {
        assert_eq!(
            title_from_report_file("/media/reports/Lipid Panel.pdf").as_deref(),
            Some("Lipid Panel")
        );
        assert_eq!(
            title_from_report_file("/media/reports/scan.final.pdf").as_deref(),
            Some("scan")
        );
        assert_eq!(
            title_from_report_file("/media/reports/a/b.pdf").as_deref(),
            Some("a")
        );
        assert_eq!(title_from_report_file("report.pdf"), None);
        assert_eq!(title_from_report_file("/media/reports"), None);
    }

    #[test]
    fn short_report_file_path_falls_back_to_unknown_title() {
        let raw = parse(r#"{"reports":[{"report_file":"lipid.pdf"}]}"#);
        let report = normalise_record(&raw[0]);
        assert_eq!(report.title, UNKNOWN_REPORT_TITLE);
        assert_eq!(report.report_url, "lipid.pdf");
    }
}
