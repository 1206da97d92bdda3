/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::path::PathBuf;

use anyhow::Context;

use bufsink::ArcExporter;

use crate::{DiskExporter, StdioExporter};

#[cfg(feature = "yaml")]
mod yaml;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum ExporterConfig {
    #[default]
    Stdout,
    Stderr,
    Disk {
        dir: PathBuf,
        prefix: String,
    },
    #[cfg(feature = "s3")]
    S3 {
        bucket: String,
        folders: Vec<String>,
        prefix: String,
        endpoint_url: Option<String>,
        force_path_style: bool,
    },
}

impl ExporterConfig {
    pub fn exporter_type(&self) -> &'static str {
        match self {
            ExporterConfig::Stdout => "stdout",
            ExporterConfig::Stderr => "stderr",
            ExporterConfig::Disk { .. } => "disk",
            #[cfg(feature = "s3")]
            ExporterConfig::S3 { .. } => "s3",
        }
    }

    pub async fn build(&self) -> anyhow::Result<ArcExporter> {
        match self {
            ExporterConfig::Stdout => Ok(StdioExporter::Stdout.into_exporter()),
            ExporterConfig::Stderr => Ok(StdioExporter::Stderr.into_exporter()),
            ExporterConfig::Disk { dir, prefix } => {
                let exporter = DiskExporter::new(dir, prefix.as_str())
                    .context("failed to get current working directory")?;
                Ok(exporter.into_exporter())
            }
            #[cfg(feature = "s3")]
            ExporterConfig::S3 {
                bucket,
                folders,
                prefix,
                endpoint_url,
                force_path_style,
            } => {
                let client =
                    crate::s3_client_from_env(endpoint_url.as_deref(), *force_path_style).await;
                Ok(crate::S3Exporter::new(client, bucket.as_str(), folders, prefix).into_exporter())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bufsink::Exporter;

    #[tokio::test]
    async fn build_disk() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = ExporterConfig::Disk {
            dir: temp_dir.path().to_path_buf(),
            prefix: "app".to_string(),
        };
        assert_eq!(config.exporter_type(), "disk");

        let exporter = config.build().await.unwrap();
        exporter.export(bytes::Bytes::from_static(b"data")).await;
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn build_default() {
        let config = ExporterConfig::default();
        assert_eq!(config.exporter_type(), "stdout");
        assert!(config.build().await.is_ok());
    }
}
