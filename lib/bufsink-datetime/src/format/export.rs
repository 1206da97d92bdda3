/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use chrono::format::Item;
use chrono::format::Numeric::*;
use chrono::format::Pad;

/// `YYYY_MM_DD-hh_mm_ss`, used in the names of exported files and objects.
pub const FILE_NAME: &[Item<'static>] = &[
    Item::Numeric(Year, Pad::Zero),
    Item::Literal("_"),
    Item::Numeric(Month, Pad::Zero),
    Item::Literal("_"),
    Item::Numeric(Day, Pad::Zero),
    Item::Literal("-"),
    Item::Numeric(Hour, Pad::Zero),
    Item::Literal("_"),
    Item::Numeric(Minute, Pad::Zero),
    Item::Literal("_"),
    Item::Numeric(Second, Pad::Zero),
];
