/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

mod primary;
pub use primary::{as_bool, as_nonzero_usize, as_string};

mod collection;
pub use collection::as_list;

mod fs;
pub use fs::as_dir_path;
