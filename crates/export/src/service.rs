//! Export directory service.
//!
//! [`ExportService`] is bound to one export directory, validated and canonicalised at
//! construction. Each export renders the report, checks the bytes are a PDF and writes them
//! under the report's download filename. Exporting the same title twice overwrites the
//! earlier file.

use crate::layout::ReportLayout;
use crate::render::render_pdf;
use crate::{ExportError, ExportResult};
use chrono::{DateTime, Utc};
use medwell_core::Report;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Media type of every export.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A report rendered in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedPdf {
    /// Download filename, e.g. `Annual_Checkup_Report.pdf`
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Record of one written export.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct ExportMetadata {
    pub filename: String,

    /// Path relative to the export directory
    pub relative_path: String,

    pub size_bytes: u64,

    /// Hexadecimal SHA-256 digest of the file content
    pub hash: String,

    /// Detected media type of the written bytes
    pub media_type: String,

    /// UTC timestamp when the file was written
    pub exported_at: DateTime<Utc>,
}

/// Renders `report` in memory.
///
/// # Errors
///
/// Returns `ExportError::Render` if the document cannot be built.
pub fn render_report(report: &Report) -> ExportResult<RenderedPdf> {
    let layout = ReportLayout::build(report);
    let bytes = render_pdf(&layout)?;
    Ok(RenderedPdf {
        filename: layout.filename,
        bytes,
    })
}

/// Writes report PDFs into one export directory.
#[derive(Debug)]
pub struct ExportService {
    export_dir: PathBuf,
}

impl ExportService {
    /// Creates a service bound to `export_dir`.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::InvalidExportDirectory` if the directory does not exist, is not a
    /// directory, or cannot be canonicalised.
    pub fn new(export_dir: &Path) -> ExportResult<Self> {
        if !export_dir.exists() {
            return Err(ExportError::InvalidExportDirectory(format!(
                "Directory does not exist: {}",
                export_dir.display()
            )));
        }

        if !export_dir.is_dir() {
            return Err(ExportError::InvalidExportDirectory(format!(
                "Path is not a directory: {}",
                export_dir.display()
            )));
        }

        let export_dir = export_dir.canonicalize().map_err(|e| {
            ExportError::InvalidExportDirectory(format!(
                "Cannot canonicalize path {}: {}",
                export_dir.display(),
                e
            ))
        })?;

        Ok(Self { export_dir })
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Renders `report` and writes it into the export directory.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` if rendering fails, the rendered bytes are not detected as a
    /// PDF, or the file cannot be written.
    pub fn export(&self, report: &Report) -> ExportResult<ExportMetadata> {
        let RenderedPdf { filename, bytes } = render_report(report)?;

        let media_type = infer::get(&bytes)
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_default();
        if media_type != PDF_MEDIA_TYPE {
            return Err(ExportError::UnexpectedMediaType(media_type));
        }

        let target = self.export_dir.join(&filename);
        fs::write(&target, &bytes).map_err(|e| {
            ExportError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write export to {}: {}", target.display(), e),
            ))
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let hash = hex::encode(hasher.finalize());

        tracing::info!(
            report_id = %report.id,
            path = %target.display(),
            size_bytes = bytes.len(),
            "report exported"
        );

        Ok(ExportMetadata {
            relative_path: filename.clone(),
            filename,
            size_bytes: bytes.len() as u64,
            hash,
            media_type,
            exported_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medwell_core::fallback_reports;
    use tempfile::TempDir;

    #[test]
    fn new_rejects_missing_directory() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("nope");
        let err = ExportService::new(&missing).expect_err("missing dir");
        assert!(matches!(err, ExportError::InvalidExportDirectory(_)));
    }

    #[test]
    fn new_rejects_file_path() {
        let temp = TempDir::new().expect("tempdir");
        let file = temp.path().join("file.txt");
        fs::write(&file, b"x").expect("write");
        let err = ExportService::new(&file).expect_err("file path");
        assert!(matches!(err, ExportError::InvalidExportDirectory(_)));
    }

    #[test]
    fn render_returns_pdf_bytes_and_filename() {
        let rendered = render_report(&fallback_reports()[1]).expect("render");

        assert_eq!(rendered.filename, "Lipid_Panel_Report.pdf");
        assert!(rendered.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn export_writes_file_with_metadata() {
        let temp = TempDir::new().expect("tempdir");
        let service = ExportService::new(temp.path()).expect("service");
        let metadata = service.export(&fallback_reports()[0]).expect("export");

        assert_eq!(metadata.filename, "Annual_Checkup_Report.pdf");
        assert_eq!(metadata.media_type, PDF_MEDIA_TYPE);
        assert_eq!(metadata.hash.len(), 64);

        let written = fs::read(temp.path().join(&metadata.relative_path)).expect("read back");
        assert_eq!(written.len() as u64, metadata.size_bytes);

        let mut hasher = Sha256::new();
        hasher.update(&written);
        assert_eq!(hex::encode(hasher.finalize()), metadata.hash);
    }

    #[test]
    fn metadata_serialises_to_json() {
        let temp = TempDir::new().expect("tempdir");
        let service = ExportService::new(temp.path()).expect("service");
        let metadata = service.export(&fallback_reports()[2]).expect("export");

        let json = serde_json::to_value(&metadata).expect("serialise");
        assert_eq!(json["filename"], "Nutrient_Deficiency_Panel_Report.pdf");
        assert_eq!(json["media_type"], "application/pdf");
    }
}
