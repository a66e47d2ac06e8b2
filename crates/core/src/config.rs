//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Binaries read environment variables and hand the raw values in
//! here; nothing in the core reads the environment while serving a query.

use crate::constants::DEFAULT_EXPORT_DIR;
use crate::error::{CoreError, CoreResult};
use crate::source::{JsonFileSource, NoSource, ReportSource};
use std::path::{Path, PathBuf};

/// Portal configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct PortalConfig {
    reports_file: Option<PathBuf>,
    export_dir: PathBuf,
}

impl PortalConfig {
    /// Create a new `PortalConfig`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` if `reports_file` is given but empty.
    pub fn new(reports_file: Option<PathBuf>, export_dir: PathBuf) -> CoreResult<Self> {
        if reports_file
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(CoreError::InvalidInput(
                "reports file path cannot be empty".into(),
            ));
        }

        Ok(Self {
            reports_file,
            export_dir,
        })
    }

    pub fn reports_file(&self) -> Option<&Path> {
        self.reports_file.as_deref()
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// The report source this configuration points at.
    ///
    /// Without a reports file the portal runs on the fallback reports only.
    pub fn report_source(&self) -> Box<dyn ReportSource + Send + Sync> {
        match &self.reports_file {
            Some(path) => Box::new(JsonFileSource::new(path.clone())),
            None => Box::new(NoSource),
        }
    }
}

/// Parse the reports file location from an optional environment value.
///
/// `None` or empty/whitespace values mean "no reports file".
pub fn reports_file_from_env_value(value: Option<String>) -> Option<PathBuf> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Resolve the export directory, creating it when missing.
///
/// If `override_dir` is provided it is used, otherwise [`DEFAULT_EXPORT_DIR`] relative to the
/// current working directory.
///
/// # Errors
///
/// Returns an error if the path exists but is not a directory, or cannot be created.
pub fn resolve_export_dir(override_dir: Option<PathBuf>) -> CoreResult<PathBuf> {
    let dir = override_dir
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR));

    if dir.exists() && !dir.is_dir() {
        return Err(CoreError::InvalidInput(format!(
            "export path is not a directory: {}",
            dir.display()
        )));
    }

    std::fs::create_dir_all(&dir).map_err(CoreError::ExportDirCreation)?;
    Ok(dir)
}
