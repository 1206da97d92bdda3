/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::path::Path;

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, YamlLoader};

/// Loads the first document of the yaml file at `path`.
pub fn load_doc(path: &Path) -> anyhow::Result<Yaml> {
    let content = std::fs::read_to_string(path)
        .context(format!("failed to read file {}", path.display()))?;
    let mut docs = YamlLoader::load_from_str(&content)
        .map_err(|e| anyhow!("invalid yaml file {}: {e}", path.display()))?;
    if docs.is_empty() {
        return Err(anyhow!("no yaml doc found in file {}", path.display()));
    }
    Ok(docs.swap_remove(0))
}
