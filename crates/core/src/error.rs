#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("report not found: {0}")]
    ReportNotFound(String),
    #[error("report feed error: {0}")]
    Wire(#[from] medwell_wire::WireError),
    #[error("failed to create export directory: {0}")]
    ExportDirCreation(std::io::Error),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
