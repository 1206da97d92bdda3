/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

mod error;
pub use error::SinkError;

mod export;
pub use export::{ArcExporter, ExportFuture, Exporter, blocking_export_fn, export_fn};

mod policy;

mod stats;
pub use stats::{SinkSnapshot, SinkStats};

mod sink;
pub use sink::{BufferSink, BufferSinkBuilder};

mod interval;
pub use interval::IntervalExportHandle;
