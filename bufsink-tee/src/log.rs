/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::time::Duration;

use anyhow::Context;
use slog::{Drain, slog_o};
use slog_scope::GlobalLoggerGuard;
use tokio::runtime::Handle;

use bufsink::{BufferSink, BufferSinkBuilder, IntervalExportHandle};
use bufsink_export::StdioExporter;
use bufsink_slog::SinkDrain;

const PROCESS_LOG_CAPACITY: usize = 16 * 1024;
const PROCESS_LOG_INTERVAL: Duration = Duration::from_secs(1);

/// The process logger, which buffers log lines and exports them to stderr.
pub struct ProcessLog {
    sink: BufferSink,
    interval: IntervalExportHandle,
    _scope_guard: GlobalLoggerGuard,
}

impl ProcessLog {
    pub fn sink(&self) -> &BufferSink {
        &self.sink
    }

    /// Export what is left and wait for all pending exports.
    pub async fn shutdown(self) {
        self.interval.cancel();
        self.interval.join().await;
        self.sink.export(true);
        self.sink.wait_exports().await;
    }
}

pub fn setup(verbose_level: u8, rt_handle: &Handle) -> anyhow::Result<ProcessLog> {
    let mut builder = BufferSinkBuilder::with_exporter(StdioExporter::Stderr.into_exporter());
    builder.set_fixed_capacity(PROCESS_LOG_CAPACITY);
    builder.set_runtime_handle(rt_handle.clone());
    setup_with_sink(verbose_level, builder)
}

/// Set up the process logger on the sink from `builder`.
///
/// The std logger can only be installed once in a process.
pub fn setup_with_sink(verbose_level: u8, builder: BufferSinkBuilder) -> anyhow::Result<ProcessLog> {
    let sink = builder.build().context("failed to create process log sink")?;

    let drain = SinkDrain::new(sink.clone()).append_code_position(verbose_level > 1);
    let logger = slog::Logger::root(drain.fuse(), slog_o!());
    let scope_guard = slog_scope::set_global_logger(logger);

    let log_level = match verbose_level {
        0 => log::Level::Warn,
        1 => log::Level::Info,
        2 => log::Level::Debug,
        _ => log::Level::Trace,
    };
    slog_stdlog::init_with_level(log_level).context("failed to setup std logger")?;

    let interval = sink
        .interval_export(PROCESS_LOG_INTERVAL)
        .context("failed to start process log export")?;
    Ok(ProcessLog {
        sink,
        interval,
        _scope_guard: scope_guard,
    })
}
