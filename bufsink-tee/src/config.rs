/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use bufsink_export::ExporterConfig;

const DEFAULT_ADAPTIVE_REUSE_FACTOR: NonZeroUsize = NonZeroUsize::new(2).unwrap();

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TeeConfig {
    /// 0 for adaptive sizing.
    pub fixed_capacity: usize,
    pub adaptive_reuse_factor: NonZeroUsize,
    pub export_interval: Option<Duration>,
    pub exporter: ExporterConfig,
}

impl Default for TeeConfig {
    fn default() -> Self {
        TeeConfig {
            fixed_capacity: 0,
            adaptive_reuse_factor: DEFAULT_ADAPTIVE_REUSE_FACTOR,
            export_interval: None,
            exporter: ExporterConfig::default(),
        }
    }
}

impl TeeConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let doc = bufsink_yaml::load_doc(path)?;
        TeeConfig::parse_yaml(&doc, path.parent())
            .context(format!("invalid config file {}", path.display()))
    }

    pub fn parse_yaml(v: &Yaml, conf_dir: Option<&Path>) -> anyhow::Result<Self> {
        let Yaml::Hash(map) = v else {
            return Err(anyhow!("yaml value type for config should be 'map'"));
        };

        let mut config = TeeConfig::default();
        bufsink_yaml::foreach_kv(map, |k, v| match bufsink_yaml::key::normalize(k).as_str() {
            "fixed_capacity" | "capacity" => {
                config.fixed_capacity = bufsink_yaml::humanize::as_usize(v)
                    .context(format!("invalid humanize usize value for key {k}"))?;
                Ok(())
            }
            "adaptive_reuse_factor" => {
                config.adaptive_reuse_factor = bufsink_yaml::value::as_nonzero_usize(v)
                    .context(format!("invalid nonzero usize value for key {k}"))?;
                Ok(())
            }
            "export_interval" | "interval" => {
                let interval = bufsink_yaml::humanize::as_duration(v)
                    .context(format!("invalid humanize duration value for key {k}"))?;
                if interval.is_zero() {
                    return Err(anyhow!("{k} should not be zero"));
                }
                config.export_interval = Some(interval);
                Ok(())
            }
            "exporter" => {
                config.exporter = ExporterConfig::parse_yaml(v, conf_dir)
                    .context(format!("invalid exporter config value for key {k}"))?;
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        })?;
        Ok(config)
    }
}
