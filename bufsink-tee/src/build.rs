/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

pub fn print_version(verbose_level: u8) {
    println!("{PKG_NAME} {PKG_VERSION}");
    if verbose_level > 0 {
        println!("{PKG_DESCRIPTION}");
    }
}
