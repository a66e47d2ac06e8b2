//! Report PDF layout model.
//!
//! Everything the renderer prints is decided here, as plain data, so the content of an export
//! can be checked without parsing PDF output.

use medwell_core::{humanise_name, Report, ReportElement};

/// Text printed in the masthead.
pub const MASTHEAD: &str = "MEDWELL";

/// Tagline printed under the masthead.
pub const TAGLINE: &str = "Empowering Health Through Innovation";

/// Vertical marker printed along the right edge.
pub const SIDE_MARKER: &str = "R E P O R T";

/// Footer printed on every page.
pub const FOOTER: &str = "MedWell AI © 2024 | Empowering Health Through Innovation";

/// Column headings of the results table.
pub const TABLE_HEADINGS: [&str; 4] = ["Test", "Value", "Normal Range", "Status"];

/// Placeholder for demographic fields the report feed does not carry.
pub const NOT_AVAILABLE: &str = "Not Available";

/// Approximate number of 10pt Helvetica characters that fit the 170mm text width.
pub const SUMMARY_WRAP_CHARS: usize = 95;

/// An RGB colour in 0-255 components.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb8(pub u8, pub u8, pub u8);

pub const BRAND_PURPLE: Rgb8 = Rgb8(128, 0, 128);
pub const TAGLINE_GREY: Rgb8 = Rgb8(100, 100, 100);
pub const FOOTER_GREY: Rgb8 = Rgb8(150, 150, 150);
pub const BLACK: Rgb8 = Rgb8(0, 0, 0);
pub const WHITE: Rgb8 = Rgb8(255, 255, 255);
pub const ALTERNATE_ROW: Rgb8 = Rgb8(248, 250, 252);

/// Status cell of a results row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowStatus {
    InRange,
    OutOfRange,
}

impl RowStatus {
    /// Status of an element as printed. Uses the plain bounds check, so an unmeasured value is
    /// printed as out of range.
    pub fn of(element: &ReportElement) -> Self {
        if element.within_bounds() {
            RowStatus::InRange
        } else {
            RowStatus::OutOfRange
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RowStatus::InRange => "In Range",
            RowStatus::OutOfRange => "Out of Range",
        }
    }

    pub fn fill(&self) -> Rgb8 {
        match self {
            RowStatus::InRange => Rgb8(220, 252, 231),
            RowStatus::OutOfRange => Rgb8(254, 226, 226),
        }
    }

    pub fn text(&self) -> Rgb8 {
        match self {
            RowStatus::InRange => Rgb8(22, 101, 52),
            RowStatus::OutOfRange => Rgb8(185, 28, 28),
        }
    }
}

/// One row of the results table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    pub test: String,
    pub value: String,
    pub range: String,
    pub status: RowStatus,
}

/// Content of one exported report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportLayout {
    pub filename: String,
    pub document_title: String,
    /// Left block: label and value pairs.
    pub details: Vec<(String, String)>,
    pub collected: String,
    pub reported: String,
    pub heading: String,
    pub summary_lines: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl ReportLayout {
    /// Lays out `report`. Elements are listed in report order, unfiltered.
    pub fn build(report: &Report) -> Self {
        let details = vec![
            ("CID".to_string(), report.id.to_string()),
            ("Name".to_string(), report.title.clone()),
            ("Age / Gender".to_string(), NOT_AVAILABLE.to_string()),
            ("Consulting Dr.".to_string(), report.doctor_name.clone()),
            ("Reg. Location".to_string(), NOT_AVAILABLE.to_string()),
        ];

        let rows = report
            .elements
            .iter()
            .map(|(name, element)| TableRow {
                test: humanise_name(name),
                value: element.value_with_unit(),
                range: element.range_text(),
                status: RowStatus::of(element),
            })
            .collect();

        Self {
            filename: pdf_filename(&report.title),
            document_title: format!("{} Report", report.title),
            details,
            collected: format!("Collected : {}", report.collection_date),
            reported: format!("Reported  : {}", report.date),
            heading: report.title.clone(),
            summary_lines: wrap_text(&report.summary, SUMMARY_WRAP_CHARS),
            rows,
        }
    }
}

/// Download filename for a report: whitespace runs become `_`, suffixed `_Report.pdf`.
///
/// Path separators are replaced as well since the name is written to disk.
pub fn pdf_filename(title: &str) -> String {
    let mut name = String::with_capacity(title.len() + 11);
    let mut in_whitespace = false;
    for ch in title.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                name.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        match ch {
            '/' | '\\' => name.push('_'),
            c if c.is_control() => {}
            c => name.push(c),
        }
    }
    name.push_str("_Report.pdf");
    name
}

/// Greedy word wrap at `max_chars`.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + word.chars().count() + 1 > max_chars
        {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use medwell_core::fallback_reports;

    #[test]
    fn filename_replaces_whitespace_runs() {
        assert_eq!(pdf_filename("Annual Checkup"), "Annual_Checkup_Report.pdf");
        assert_eq!(
            pdf_filename("Nutrient  Deficiency\tPanel"),
            "Nutrient_Deficiency_Panel_Report.pdf"
        );
        assert_eq!(pdf_filename("a/b"), "a_b_Report.pdf");
    }

    #[test]
    fn layout_carries_metadata_block() {
        let reports = fallback_reports();
        let layout = ReportLayout::build(&reports[0]);

        assert_eq!(layout.filename, "Annual_Checkup_Report.pdf");
        assert_eq!(layout.details[0], ("CID".to_string(), "1".to_string()));
        assert_eq!(layout.details[1].1, "Annual Checkup");
        assert_eq!(layout.details[3].1, "Dr. Nishi");
        assert_eq!(layout.collected, "Collected : 25 Sept, 2024");
        assert_eq!(layout.reported, "Reported  : 28 Sept, 2024");
        assert_eq!(layout.heading, "Annual Checkup");
    }

    #[test]
    fn table_rows_follow_element_order_with_status() {
        let reports = fallback_reports();
        let layout = ReportLayout::build(&reports[0]);

        let tests: Vec<&str> = layout.rows.iter().map(|r| r.test.as_str()).collect();
        assert_eq!(
            tests,
            vec!["calcium", "hemoglobin", "red Blood Cells", "white Blood Cells"]
        );
        assert_eq!(layout.rows[0].value, "10.5 mg/dL");
        assert_eq!(layout.rows[0].range, "8.5 - 10.2 mg/dL");
        assert_eq!(layout.rows[0].status, RowStatus::OutOfRange);
        assert_eq!(layout.rows[1].status, RowStatus::InRange);
    }

    #[test]
    fn unmeasured_value_prints_as_out_of_range() {
        let reports = fallback_reports();
        let layout = ReportLayout::build(&reports[2]);
        let magnesium = layout
            .rows
            .iter()
            .find(|r| r.test == "magnesium")
            .expect("magnesium row");
        assert_eq!(magnesium.value, "-1 mg/dL");
        assert_eq!(magnesium.status, RowStatus::OutOfRange);
        assert_eq!(magnesium.status.label(), "Out of Range");
    }

    #[test]
    fn summary_wraps_on_word_boundaries() {
        let lines = wrap_text("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
        assert!(wrap_text("", 10).is_empty());

        let reports = fallback_reports();
        let layout = ReportLayout::build(&reports[2]);
        assert!(layout
            .summary_lines
            .iter()
            .all(|line| line.chars().count() <= SUMMARY_WRAP_CHARS));
        assert_eq!(layout.summary_lines.join(" "), reports[2].summary);
    }
}
