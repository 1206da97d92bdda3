/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use yaml_rust::Yaml;

/// A directory path, relative paths are resolved against `lookup_dir` if given.
///
/// The directory is not required to exist yet.
pub fn as_dir_path(v: &Yaml, lookup_dir: Option<&Path>) -> anyhow::Result<PathBuf> {
    let Yaml::String(path) = v else {
        return Err(anyhow!("yaml value type for path should be string"));
    };
    let path = PathBuf::from(path);
    if path.is_absolute() {
        return Ok(path);
    }
    match lookup_dir {
        Some(dir) => Ok(dir.join(path)),
        None => Ok(path),
    }
}
