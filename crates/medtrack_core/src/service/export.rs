//! Downloadable snapshot of the full adherence log.

use crate::model::adherence::AdherenceLog;
use crate::model::codec::CodecResult;
use log::info;
use std::io;
use std::path::{Path, PathBuf};

/// File name offered for the exported log.
pub const EXPORT_FILE_NAME: &str = "medicine-log.json";

/// Content type of the exported log.
pub const EXPORT_CONTENT_TYPE: &str = "application/json";

/// Export artifact: the whole log as two-space indented JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogExport {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl LogExport {
    pub fn from_log(log: &AdherenceLog) -> CodecResult<Self> {
        Ok(Self {
            file_name: EXPORT_FILE_NAME,
            content_type: EXPORT_CONTENT_TYPE,
            body: log.to_pretty_json()?,
        })
    }

    /// Writes the artifact into `dir` under its file name, replacing any
    /// previous export there.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> io::Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name);
        std::fs::write(&path, self.body.as_bytes())?;
        info!(
            "event=log_export module=service status=ok target=file bytes={}",
            self.body.len()
        );
        Ok(path)
    }
}
