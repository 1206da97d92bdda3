/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

#[macro_use]
mod macros;

mod format;

mod drain;
pub use drain::SinkDrain;
