/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

/// Parses an array with `convert`, or a single value as a one element list.
pub fn as_list<T, F>(v: &Yaml, convert: F) -> anyhow::Result<Vec<T>>
where
    F: Fn(&Yaml) -> anyhow::Result<T>,
{
    let mut vec = Vec::new();
    match v {
        Yaml::Array(seq) => {
            for (i, v) in seq.iter().enumerate() {
                let node = convert(v).context(format!("invalid value for list element #{i}"))?;
                vec.push(node);
            }
        }
        Yaml::Null | Yaml::BadValue => {
            return Err(anyhow!("no value found for list"));
        }
        _ => {
            let node = convert(v).context("invalid single value for list")?;
            vec.push(node);
        }
    }
    Ok(vec)
}
