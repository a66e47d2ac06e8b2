//! Constants used throughout the MedWell core crate.
//!
//! Display fallbacks, sentinel values and configuration names live here so the normaliser,
//! the front doors and the tests agree on the exact text.

/// Sentinel element value meaning "not measured".
pub const NOT_MEASURED: f64 = -1.0;

/// Title used when a record has no usable report file path.
pub const UNKNOWN_REPORT_TITLE: &str = "Unknown Report Type";

/// Fallback for a missing report date.
pub const DATE_NOT_AVAILABLE: &str = "Date not available";

/// Fallback for a missing collection date.
pub const COLLECTION_DATE_NOT_AVAILABLE: &str = "Collection date not available";

/// Fallback for a missing doctor name.
pub const DOCTOR_NAME_NOT_AVAILABLE: &str = "Doctor name not available";

/// Fallback for a missing summary.
pub const SUMMARY_NOT_AVAILABLE: &str = "Summary not available";

/// Fallback for a missing report type.
pub const UNKNOWN_REPORT_TYPE: &str = "Unknown";

/// Fallback for a missing submission timestamp.
pub const SUBMITTED_AT_NOT_AVAILABLE: &str = "Submission date not available";

/// Index of the `/`-delimited segment of `report_file` that carries the file name.
pub const REPORT_FILE_TITLE_SEGMENT: usize = 3;

/// Doctor listings shown per page of a doctor search.
pub const DOCTORS_PER_PAGE: usize = 5;

/// Default directory for exported report PDFs when none is configured.
pub const DEFAULT_EXPORT_DIR: &str = "exports";

/// Environment variable naming the JSON report feed file.
pub const REPORTS_FILE_ENV: &str = "MEDWELL_REPORTS_FILE";

/// Environment variable naming the export directory.
pub const EXPORT_DIR_ENV: &str = "MEDWELL_EXPORT_DIR";
