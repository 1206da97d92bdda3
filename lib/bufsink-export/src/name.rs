/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use chrono::{DateTime, Local, TimeZone};

use bufsink_datetime::format::export::FILE_NAME;

const FILE_EXTENSION: &str = "txt";

/// Generates `<prefix>_<YYYY_MM_DD-hh_mm_ss>.txt` names for exported data.
#[derive(Clone, Debug)]
pub struct ExportNamer {
    prefix: String,
}

impl ExportNamer {
    pub fn new(prefix: impl Into<String>) -> Self {
        ExportNamer {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn name_at<Tz>(&self, time: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        format!(
            "{}_{}.{FILE_EXTENSION}",
            self.prefix,
            time.format_with_items(FILE_NAME.iter())
        )
    }

    pub fn name_now(&self) -> String {
        self.name_at(&Local::now())
    }
}

/// Join folders and the file name prefix into an object key prefix.
///
/// Every folder is followed by a `/`, the folders are not trimmed.
pub fn join_key_prefix<S: AsRef<str>>(folders: &[S], prefix: &str) -> String {
    let len = folders.iter().map(|f| f.as_ref().len() + 1).sum::<usize>() + prefix.len();
    let mut s = String::with_capacity(len);
    for folder in folders {
        s.push_str(folder.as_ref());
        s.push('/');
    }
    s.push_str(prefix);
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn file_name() {
        let namer = ExportNamer::new("app");
        let time = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(namer.name_at(&time), "app_2024_01_02-03_04_05.txt");

        let namer = ExportNamer::new("");
        let time = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(namer.name_at(&time), "_2023_12_31-23_59_59.txt");
    }

    #[test]
    fn key_prefix() {
        assert_eq!(join_key_prefix(&["logs", "2024"], "app"), "logs/2024/app");
        assert_eq!(join_key_prefix::<&str>(&[], "app"), "app");
        assert_eq!(join_key_prefix(&["logs".to_string()], ""), "logs/");
        assert_eq!(join_key_prefix(&["a/"], "b"), "a//b");
    }
}
