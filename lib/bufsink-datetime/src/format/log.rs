/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use chrono::format::Numeric::*;
use chrono::format::{Fixed, Item, Pad};

/// Time prefix of text log lines, in local time with microseconds.
pub const TEXT_LINE: &[Item<'static>] = &[
    Item::Numeric(Year, Pad::Zero),
    Item::Literal("-"),
    Item::Numeric(Month, Pad::Zero),
    Item::Literal("-"),
    Item::Numeric(Day, Pad::Zero),
    Item::Literal(" "),
    Item::Numeric(Hour, Pad::Zero),
    Item::Literal(":"),
    Item::Numeric(Minute, Pad::Zero),
    Item::Literal(":"),
    Item::Numeric(Second, Pad::Zero),
    Item::Fixed(Fixed::Nanosecond6),
];

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn text_line() {
        let dt = NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_micro_opt(7, 8, 9, 12)
            .unwrap();
        let s = dt.format_with_items(TEXT_LINE.iter()).to_string();
        assert_eq!(s, "2024-05-06 07:08:09.000012");
    }
}
