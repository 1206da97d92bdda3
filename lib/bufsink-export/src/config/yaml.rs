/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, yaml};

use super::ExporterConfig;

impl ExporterConfig {
    /// Parse from a type name string, or from a map with a `type` key.
    ///
    /// Relative disk directories are resolved against `lookup_dir` if given.
    pub fn parse_yaml(v: &Yaml, lookup_dir: Option<&Path>) -> anyhow::Result<Self> {
        match v {
            Yaml::String(s) => match bufsink_yaml::key::normalize(s).as_str() {
                "stdout" => Ok(ExporterConfig::Stdout),
                "stderr" => Ok(ExporterConfig::Stderr),
                "disk" | "file" => Ok(ExporterConfig::Disk {
                    dir: PathBuf::new(),
                    prefix: String::new(),
                }),
                _ => Err(anyhow!("unsupported exporter type {s}")),
            },
            Yaml::Hash(map) => {
                let exporter_type = bufsink_yaml::hash_get_required_str(map, "type")?;
                match bufsink_yaml::key::normalize(exporter_type).as_str() {
                    "stdout" => Ok(ExporterConfig::Stdout),
                    "stderr" => Ok(ExporterConfig::Stderr),
                    "disk" | "file" => parse_disk(map, lookup_dir),
                    #[cfg(feature = "s3")]
                    "s3" => parse_s3(map),
                    _ => Err(anyhow!("unsupported exporter type {exporter_type}")),
                }
            }
            _ => Err(anyhow!("invalid yaml value type for exporter config")),
        }
    }
}

fn parse_disk(map: &yaml::Hash, lookup_dir: Option<&Path>) -> anyhow::Result<ExporterConfig> {
    let mut dir = PathBuf::new();
    let mut prefix = String::new();
    bufsink_yaml::foreach_kv(map, |k, v| match bufsink_yaml::key::normalize(k).as_str() {
        "type" => Ok(()),
        "dir" | "directory" | "path" => {
            dir = bufsink_yaml::value::as_dir_path(v, lookup_dir)
                .context(format!("invalid directory path value for key {k}"))?;
            Ok(())
        }
        "prefix" | "file_name_prefix" => {
            prefix = bufsink_yaml::value::as_string(v)
                .context(format!("invalid string value for key {k}"))?;
            Ok(())
        }
        _ => Err(anyhow!("invalid key {k}")),
    })?;
    Ok(ExporterConfig::Disk { dir, prefix })
}

#[cfg(feature = "s3")]
fn parse_s3(map: &yaml::Hash) -> anyhow::Result<ExporterConfig> {
    let mut bucket = String::new();
    let mut folders = Vec::new();
    let mut prefix = String::new();
    let mut endpoint_url = None;
    let mut force_path_style = false;
    bufsink_yaml::foreach_kv(map, |k, v| match bufsink_yaml::key::normalize(k).as_str() {
        "type" => Ok(()),
        "bucket" => {
            bucket = bufsink_yaml::value::as_string(v)
                .context(format!("invalid string value for key {k}"))?;
            Ok(())
        }
        "folders" | "folder" => {
            folders = bufsink_yaml::value::as_list(v, bufsink_yaml::value::as_string)
                .context(format!("invalid string list value for key {k}"))?;
            Ok(())
        }
        "prefix" | "file_name_prefix" => {
            prefix = bufsink_yaml::value::as_string(v)
                .context(format!("invalid string value for key {k}"))?;
            Ok(())
        }
        "endpoint_url" | "endpoint" => {
            let url = bufsink_yaml::value::as_string(v)
                .context(format!("invalid string value for key {k}"))?;
            endpoint_url = Some(url);
            Ok(())
        }
        "force_path_style" => {
            force_path_style = bufsink_yaml::value::as_bool(v)
                .context(format!("invalid bool value for key {k}"))?;
            Ok(())
        }
        _ => Err(anyhow!("invalid key {k}")),
    })?;
    if bucket.is_empty() {
        return Err(anyhow!("no bucket set"));
    }
    Ok(ExporterConfig::S3 {
        bucket,
        folders,
        prefix,
        endpoint_url,
        force_path_style,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use yaml_rust::YamlLoader;

    fn load(s: &str) -> Yaml {
        YamlLoader::load_from_str(s).unwrap().remove(0)
    }

    #[test]
    fn parse_string() {
        let v = load("stderr");
        assert_eq!(
            ExporterConfig::parse_yaml(&v, None).unwrap(),
            ExporterConfig::Stderr
        );

        let v = load("disk");
        assert_eq!(
            ExporterConfig::parse_yaml(&v, None).unwrap(),
            ExporterConfig::Disk {
                dir: PathBuf::new(),
                prefix: String::new()
            }
        );

        let v = load("kafka");
        assert!(ExporterConfig::parse_yaml(&v, None).is_err());
    }

    #[test]
    fn parse_disk_map() {
        let v = load(
            r#"
            type: disk
            dir: logs
            prefix: app
            "#,
        );
        assert_eq!(
            ExporterConfig::parse_yaml(&v, Some(Path::new("/etc/bufsink"))).unwrap(),
            ExporterConfig::Disk {
                dir: PathBuf::from("/etc/bufsink/logs"),
                prefix: "app".to_string()
            }
        );

        let v = load(
            r#"
            type: disk
            size: 10
            "#,
        );
        assert!(ExporterConfig::parse_yaml(&v, None).is_err());

        let v = load("prefix: app");
        assert!(ExporterConfig::parse_yaml(&v, None).is_err());
    }

    #[cfg(feature = "s3")]
    #[test]
    fn parse_s3_map() {
        let v = load(
            r#"
            type: s3
            bucket: my-bucket
            folders:
              - logs
              - web
            prefix: app
            endpoint_url: http://127.0.0.1:9000
            "#,
        );
        assert_eq!(
            ExporterConfig::parse_yaml(&v, None).unwrap(),
            ExporterConfig::S3 {
                bucket: "my-bucket".to_string(),
                folders: vec!["logs".to_string(), "web".to_string()],
                prefix: "app".to_string(),
                endpoint_url: Some("http://127.0.0.1:9000".to_string()),
                force_path_style: false,
            }
        );

        let v = load("type: s3");
        assert!(ExporterConfig::parse_yaml(&v, None).is_err());
    }
}
