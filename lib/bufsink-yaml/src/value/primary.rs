/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::num::NonZeroUsize;
use std::str::FromStr;

use anyhow::anyhow;
use yaml_rust::Yaml;

pub fn as_nonzero_usize(v: &Yaml) -> anyhow::Result<NonZeroUsize> {
    match v {
        Yaml::String(s) => Ok(NonZeroUsize::from_str(s)?),
        Yaml::Integer(i) => {
            let u = usize::try_from(*i)?;
            Ok(NonZeroUsize::try_from(u)?)
        }
        _ => Err(anyhow!(
            "yaml value type for 'nonzero usize' should be 'string' or 'integer'"
        )),
    }
}

pub fn as_bool(v: &Yaml) -> anyhow::Result<bool> {
    match v {
        Yaml::String(s) => match s.to_lowercase().as_str() {
            "on" | "true" | "yes" | "1" => Ok(true),
            "off" | "false" | "no" | "0" => Ok(false),
            _ => Err(anyhow!("invalid yaml string value for 'bool': {s}")),
        },
        Yaml::Boolean(value) => Ok(*value),
        Yaml::Integer(i) => Ok(*i != 0),
        _ => Err(anyhow!(
            "yaml value type for 'bool' should be 'boolean' / 'string' / 'integer'"
        )),
    }
}

pub fn as_string(v: &Yaml) -> anyhow::Result<String> {
    match v {
        Yaml::String(s) => Ok(s.to_string()),
        Yaml::Integer(i) => Ok(i.to_string()),
        Yaml::Real(s) => Ok(s.to_string()),
        _ => Err(anyhow!(
            "yaml value type for string should be 'string' / 'integer' / 'real'"
        )),
    }
}
