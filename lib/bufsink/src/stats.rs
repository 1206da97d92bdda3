/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default, Debug, Eq, PartialEq)]
pub struct SinkSnapshot {
    pub append_total: u64,
    pub append_size: u64,
    pub export_total: u64,
    pub export_size: u64,
    pub implicit_flush: u64,
    pub reset: u64,
}

#[derive(Default)]
pub struct SinkStats {
    append_total: AtomicU64,
    append_size: AtomicU64,
    export_total: AtomicU64,
    export_size: AtomicU64,
    implicit_flush: AtomicU64,
    reset: AtomicU64,
}

impl SinkStats {
    pub fn snapshot(&self) -> SinkSnapshot {
        SinkSnapshot {
            append_total: self.append_total.load(Ordering::Relaxed),
            append_size: self.append_size.load(Ordering::Relaxed),
            export_total: self.export_total.load(Ordering::Relaxed),
            export_size: self.export_size.load(Ordering::Relaxed),
            implicit_flush: self.implicit_flush.load(Ordering::Relaxed),
            reset: self.reset.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn add_append(&self, size: usize) {
        self.append_total.fetch_add(1, Ordering::Relaxed);
        self.append_size.fetch_add(size as u64, Ordering::Relaxed);
    }

    pub(crate) fn add_export(&self, size: usize) {
        self.export_total.fetch_add(1, Ordering::Relaxed);
        self.export_size.fetch_add(size as u64, Ordering::Relaxed);
    }

    pub(crate) fn add_implicit_flush(&self) {
        self.implicit_flush.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_reset(&self) {
        self.reset.fetch_add(1, Ordering::Relaxed);
    }
}
