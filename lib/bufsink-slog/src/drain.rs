/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::cell::RefCell;
use std::panic::AssertUnwindSafe;

use chrono::Local;
use slog::{Drain, OwnedKVList, Record};

use bufsink::BufferSink;

use crate::format::format_record;

thread_local! {
    static TL_BUF: RefCell<Vec<u8>> = RefCell::new(Vec::with_capacity(1024));
}

/// A slog drain that appends one text line per record to a [`BufferSink`].
///
/// Each line is appended as a whole, so an implicit flush never splits it.
/// A record emitted while a line is being appended on the same thread, e.g.
/// by the sink itself, is discarded.
pub struct SinkDrain {
    // the sink state is behind a poisoning mutex
    sink: AssertUnwindSafe<BufferSink>,
    append_code_position: bool,
}

impl SinkDrain {
    pub fn new(sink: BufferSink) -> Self {
        SinkDrain {
            sink: AssertUnwindSafe(sink),
            append_code_position: false,
        }
    }

    pub fn append_code_position(mut self, enable: bool) -> Self {
        self.append_code_position = enable;
        self
    }

    pub fn sink(&self) -> &BufferSink {
        &self.sink
    }
}

impl Drain for SinkDrain {
    type Ok = ();
    type Err = slog::Error;

    fn log(&self, record: &Record, logger_values: &OwnedKVList) -> Result<(), slog::Error> {
        TL_BUF
            .try_with(|cell| {
                // records logged from inside `append` on this thread are dropped
                let Ok(mut buf) = cell.try_borrow_mut() else {
                    return Ok(());
                };
                buf.clear();
                format_record(
                    &mut buf,
                    &Local::now(),
                    record,
                    logger_values,
                    self.append_code_position,
                )?;
                self.sink.append(&buf);
                Ok(())
            })
            .unwrap_or(Ok(()))
    }
}
