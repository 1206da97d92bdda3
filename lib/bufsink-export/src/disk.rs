/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use log::{debug, warn};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use bufsink::{ArcExporter, ExportFuture, Exporter};

use crate::ExportNamer;

#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// Writes each export to a new file `<dir>/<prefix>_<timestamp>.txt`.
///
/// Exports within the same second go to the same file, and the later one wins.
#[derive(Debug)]
pub struct DiskExporter {
    dir: PathBuf,
    namer: ExportNamer,
}

impl DiskExporter {
    /// An empty `dir` means the current working directory, which is resolved here.
    pub fn new(dir: impl AsRef<Path>, prefix: impl Into<String>) -> io::Result<Self> {
        let dir = dir.as_ref();
        let dir = if dir.as_os_str().is_empty() {
            std::env::current_dir()?
        } else {
            dir.to_path_buf()
        };
        Ok(DiskExporter {
            dir,
            namer: ExportNamer::new(prefix),
        })
    }

    /// # Panics
    ///
    /// Panics if the current working directory is needed but can not be read.
    pub fn must_new(dir: impl AsRef<Path>, prefix: impl Into<String>) -> Self {
        match DiskExporter::new(dir, prefix) {
            Ok(exporter) => exporter,
            Err(e) => panic!("failed to create disk exporter: {e}"),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn into_exporter(self) -> ArcExporter {
        Arc::new(self)
    }

    /// Write `data` to a newly named file and return its path.
    pub async fn save(&self, data: &[u8]) -> io::Result<PathBuf> {
        let path = self.dir.join(self.namer.name_now());

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(FILE_MODE);

        let mut file = options.open(&path).await?;
        file.write_all(data).await?;
        file.flush().await?;
        Ok(path)
    }
}

impl Exporter for DiskExporter {
    fn export(self: Arc<Self>, data: Bytes) -> ExportFuture {
        Box::pin(async move {
            if data.is_empty() {
                return;
            }
            match self.save(&data).await {
                Ok(path) => debug!("exported {} bytes to {}", data.len(), path.display()),
                Err(e) => warn!(
                    "unable to export {} bytes to dir {}: {e}",
                    data.len(),
                    self.dir.display()
                ),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_dir_files(dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        files.sort();
        files
    }

    #[tokio::test]
    async fn export_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let exporter = DiskExporter::new(temp_dir.path(), "app").unwrap();
        assert_eq!(exporter.dir(), temp_dir.path());

        let exporter = Arc::new(exporter);
        exporter
            .clone()
            .export(Bytes::from_static(b"line 1\nline 2\n"))
            .await;

        let files = read_dir_files(temp_dir.path());
        assert_eq!(files.len(), 1);
        let name = files[0].file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("app_"));
        assert!(name.ends_with(".txt"));
        // app_YYYY_MM_DD-hh_mm_ss.txt
        assert_eq!(name.len(), 4 + 19 + 4);
        assert_eq!(std::fs::read(&files[0]).unwrap(), b"line 1\nline 2\n");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let meta = std::fs::metadata(&files[0]).unwrap();
            // the umask may only clear bits
            assert_eq!(meta.permissions().mode() & 0o7133, 0);
        }
    }

    #[tokio::test]
    async fn skip_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let exporter = DiskExporter::new(temp_dir.path(), "app")
            .unwrap()
            .into_exporter();
        exporter.export(Bytes::new()).await;
        assert!(read_dir_files(temp_dir.path()).is_empty());
    }

    #[tokio::test]
    async fn missing_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("not-exist");
        let exporter = Arc::new(DiskExporter::new(&dir, "app").unwrap());

        assert!(exporter.save(b"data").await.is_err());
        // logged and dropped
        exporter.export(Bytes::from_static(b"data")).await;
        assert!(!dir.exists());
    }

    #[test]
    fn default_dir() {
        let exporter = DiskExporter::must_new("", "app");
        assert_eq!(exporter.dir(), std::env::current_dir().unwrap());
    }
}
