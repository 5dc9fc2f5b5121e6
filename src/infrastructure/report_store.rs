//! File-system persistence for generated reports

use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::report::ReportFormat;
use crate::shared::errors::ReportError;

/// Writes generated report text and returns the resolved path
pub struct ReportStore {
    output_dir: PathBuf,
}

impl ReportStore {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Save report text. With no explicit destination the file lands in the
    /// configured output directory under a timestamped name.
    pub fn save(
        &self,
        contents: &str,
        kind: &str,
        format: ReportFormat,
        destination: Option<&Path>,
    ) -> Result<PathBuf, ReportError> {
        let path = match destination {
            Some(path) => path.to_path_buf(),
            None => {
                let ext = match format {
                    ReportFormat::Markdown => "md",
                    ReportFormat::Json => "json",
                };
                let name = format!("{}-{}.{}", kind, Utc::now().format("%Y%m%d-%H%M%S"), ext);
                self.output_dir.join(name)
            }
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ReportError::WriteFailed(format!("{}: {}", parent.display(), e)))?;
        }
        fs::write(&path, contents)
            .map_err(|e| ReportError::WriteFailed(format!("{}: {}", path.display(), e)))?;

        info!("Report written to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_uses_timestamped_default_name() {
        let dir = tempdir().unwrap();
        let store = ReportStore::new(dir.path());

        let path = store
            .save("# Snapshot\n", "snapshot", ReportFormat::Markdown, None)
            .unwrap();

        assert!(path.starts_with(dir.path()));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("snapshot-"));
        assert!(name.ends_with(".md"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Snapshot\n");
    }

    #[test]
    fn test_save_honors_explicit_destination() {
        let dir = tempdir().unwrap();
        let store = ReportStore::new(dir.path());
        let dest = dir.path().join("nested").join("alerts.json");

        let path = store
            .save("[]", "alerts", ReportFormat::Json, Some(&dest))
            .unwrap();

        assert_eq!(path, dest);
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }
}
