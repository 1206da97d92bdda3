/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

pub fn normalize(raw: &str) -> String {
    raw.to_lowercase().replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t() {
        assert_eq!(normalize("Fixed-Capacity"), "fixed_capacity");
        assert_eq!(normalize("EXPORT_INTERVAL"), "export_interval");
        assert_eq!(normalize("a-b_c"), "a_b_c");
    }
}
