/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

#[cfg(test)]
macro_rules! yaml_doc {
    ($s:expr) => {
        YamlLoader::load_from_str($s).unwrap().pop().unwrap()
    };
}
