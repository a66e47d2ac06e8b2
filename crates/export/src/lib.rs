//! MedWell report export
//!
//! Renders a single report to a branded A4 PDF and, optionally, writes it into an export
//! directory.
//!
//! ## Layout and rendering
//!
//! [`ReportLayout`] decides every string, colour and row that goes on the page. [`render_pdf`]
//! draws that layout with `printpdf`. Results tables longer than one page continue on new
//! pages with the column headings repeated, and the footer is printed on every page.
//!
//! ## Example Usage
//!
//! ```no_run
//! use medwell_core::fallback_reports;
//! use medwell_export::ExportService;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = ExportService::new(Path::new("exports"))?;
//! let metadata = service.export(&fallback_reports()[0])?;
//! println!("wrote {}", metadata.filename);
//! # Ok(())
//! # }
//! ```

pub mod layout;
mod render;
mod service;

pub use layout::{pdf_filename, wrap_text, ReportLayout, RowStatus, TableRow};
pub use render::render_pdf;
pub use service::{render_report, ExportMetadata, ExportService, RenderedPdf, PDF_MEDIA_TYPE};

/// Errors that can occur while exporting a report
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Export directory does not exist or is not a directory
    #[error("Invalid export directory: {0}")]
    InvalidExportDirectory(String),

    /// The PDF document could not be built
    #[error("Render error: {0}")]
    Render(String),

    /// Rendered bytes were not recognised as a PDF
    #[error("Unexpected media type: {0}")]
    UnexpectedMediaType(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;
