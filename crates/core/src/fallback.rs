//! Built-in example reports.
//!
//! These three reports are always appended after live data and are the whole working set when
//! the feed is empty or cannot be fetched, so the report views remain usable offline.

use crate::constants::{NOT_MEASURED, SUBMITTED_AT_NOT_AVAILABLE, UNKNOWN_REPORT_TYPE};
use crate::report::{Report, ReportElement, ReportElements, ReportId};

const FALLBACK_REPORT_URL: &str =
    "https://drive.google.com/file/d/1XvgQ7lpsXazqMiH7dRiRs4prRbyjTEy4/view?usp=sharing";

fn element(value: f64, min: f64, max: f64, unit: &str) -> ReportElement {
    ReportElement::new(value, min, max, unit)
}

fn fallback_report(
    id: &str,
    title: &str,
    date: &str,
    collection_date: &str,
    doctor_name: &str,
    summary: &str,
    elements: ReportElements,
) -> Report {
    Report {
        id: ReportId::new(id),
        title: title.into(),
        date: date.into(),
        collection_date: collection_date.into(),
        doctor_name: doctor_name.into(),
        summary: summary.into(),
        elements,
        report_url: FALLBACK_REPORT_URL.into(),
        report_type: UNKNOWN_REPORT_TYPE.into(),
        submitted_at: SUBMITTED_AT_NOT_AVAILABLE.into(),
    }
}

/// Returns the fallback reports (ids 1, 2, 3) in their fixed order.
pub fn fallback_reports() -> Vec<Report> {
    vec![
        fallback_report(
            "1",
            "Annual Checkup",
            "28 Sept, 2024",
            "25 Sept, 2024",
            "Dr. Nishi",
            "Overall health is good. Calcium levels are slightly elevated.",
            [
                ("calcium", element(10.5, 8.5, 10.2, "mg/dL")),
                ("hemoglobin", element(14.5, 13.5, 17.5, "g/dL")),
                ("redBloodCells", element(5.2, 4.5, 5.9, "million/µL")),
                ("whiteBloodCells", element(7500.0, 4500.0, 11000.0, "/µL")),
            ]
            .into_iter()
            .collect(),
        ),
        fallback_report(
            "2",
            "Lipid Panel",
            "15 Oct, 2024",
            "12 Oct, 2024",
            "Dr. Rehan",
            "Cholesterol levels are within normal range.",
            [
                ("totalCholesterol", element(180.0, 125.0, 200.0, "mg/dL")),
                ("ldlCholesterol", element(100.0, 0.0, 130.0, "mg/dL")),
                ("hdlCholesterol", element(50.0, 40.0, 60.0, "mg/dL")),
                ("triglycerides", element(120.0, 0.0, 150.0, "mg/dL")),
            ]
            .into_iter()
            .collect(),
        ),
        fallback_report(
            "3",
            "Nutrient Deficiency Panel",
            "15 Nov, 2024",
            "12 Nov, 2024",
            "Dr. Vivek",
            "Several nutrient levels are below the normal range, indicating deficiencies in \
             calcium, iron, and vitamin D.",
            [
                ("calcium", element(7.9, 8.5, 10.5, "mg/dL")),
                ("iron", element(50.0, 60.0, 170.0, "µg/dL")),
                ("vitaminD", element(20.0, 30.0, 100.0, "ng/mL")),
                ("magnesium", element(NOT_MEASURED, 1.8, 2.6, "mg/dL")),
            ]
            .into_iter()
            .collect(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_set_has_three_reports_in_order() {
        let reports = fallback_reports();
        let ids: Vec<&str> = reports.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(reports[2].title, "Nutrient Deficiency Panel");
    }

    #[test]
    fn nutrient_panel_has_unmeasured_magnesium() {
        let reports = fallback_reports();
        let magnesium = reports[2].elements.get("magnesium").expect("magnesium");
        assert!(!magnesium.is_present());
    }
}
