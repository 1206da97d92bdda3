/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::io;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;

use crate::interval::IntervalExportHandle;
use crate::policy::{DEFAULT_ADAPTIVE_REUSE_FACTOR, Reallocated, SizingPolicy};
use crate::{ArcExporter, SinkError, SinkStats};

pub struct BufferSinkBuilder {
    exporter: Option<ArcExporter>,
    fixed_capacity: usize,
    adaptive_reuse_factor: usize,
    rt_handle: Option<Handle>,
}

impl Default for BufferSinkBuilder {
    fn default() -> Self {
        BufferSinkBuilder {
            exporter: None,
            fixed_capacity: 0,
            adaptive_reuse_factor: DEFAULT_ADAPTIVE_REUSE_FACTOR,
            rt_handle: None,
        }
    }
}

impl BufferSinkBuilder {
    pub fn with_exporter(exporter: ArcExporter) -> Self {
        BufferSinkBuilder {
            exporter: Some(exporter),
            ..Default::default()
        }
    }

    pub fn set_exporter(&mut self, exporter: ArcExporter) {
        self.exporter = Some(exporter);
    }

    /// A non-zero value switches to fixed capacity mode, 0 means adaptive mode.
    pub fn set_fixed_capacity(&mut self, capacity: usize) {
        self.fixed_capacity = capacity;
    }

    /// In adaptive mode, a buffer grown past this many times the average
    /// flushed size will be reallocated instead of reused. Default to 2.
    pub fn set_adaptive_reuse_factor(&mut self, factor: NonZeroUsize) {
        self.adaptive_reuse_factor = factor.get();
    }

    /// Set the runtime to spawn export tasks on, or the current one will be used.
    pub fn set_runtime_handle(&mut self, handle: Handle) {
        self.rt_handle = Some(handle);
    }

    pub fn build(self) -> Result<BufferSink, SinkError> {
        let exporter = self.exporter.ok_or(SinkError::ExportFunctionMissing)?;
        let rt_handle = match self.rt_handle {
            Some(handle) => handle,
            None => Handle::try_current().map_err(SinkError::RuntimeUnavailable)?,
        };

        let policy = SizingPolicy::new(self.fixed_capacity, self.adaptive_reuse_factor);
        let state = SinkState {
            buf: policy.initial_buffer(),
            policy,
        };

        Ok(BufferSink {
            shared: Arc::new(SinkShared {
                state: Mutex::new(state),
                exporter,
                rt_handle,
                tracker: TaskTracker::new(),
                wait_lock: tokio::sync::Mutex::new(()),
                stats: Arc::new(SinkStats::default()),
            }),
        })
    }

    /// # Panics
    ///
    /// Panics if the config is invalid.
    pub fn must_build(self) -> BufferSink {
        match self.build() {
            Ok(sink) => sink,
            Err(e) => panic!("failed to build buffer sink: {e}"),
        }
    }
}

struct SinkState {
    buf: Vec<u8>,
    policy: SizingPolicy,
}

impl SinkState {
    fn take(&mut self) -> (Bytes, Option<Reallocated>) {
        self.policy.take(&mut self.buf)
    }
}

struct SinkShared {
    state: Mutex<SinkState>,
    exporter: ArcExporter,
    rt_handle: Handle,
    tracker: TaskTracker,
    wait_lock: tokio::sync::Mutex<()>,
    stats: Arc<SinkStats>,
}

/// A buffer of appended bytes that is handed to an exporter on demand,
/// periodically, or when the fixed capacity would be exceeded.
///
/// Cloning is cheap, and all clones share the same buffer.
#[derive(Clone)]
pub struct BufferSink {
    shared: Arc<SinkShared>,
}

impl BufferSink {
    /// Create a sink on the current tokio runtime.
    ///
    /// `fixed_capacity` > 0 selects fixed capacity mode, otherwise the
    /// adaptive mode is used.
    pub fn new(exporter: Option<ArcExporter>, fixed_capacity: usize) -> Result<Self, SinkError> {
        let mut builder = BufferSinkBuilder::default();
        if let Some(exporter) = exporter {
            builder.set_exporter(exporter);
        }
        builder.set_fixed_capacity(fixed_capacity);
        builder.build()
    }

    /// # Panics
    ///
    /// Panics if no exporter is given or there is no current tokio runtime.
    pub fn must_new(exporter: Option<ArcExporter>, fixed_capacity: usize) -> Self {
        match BufferSink::new(exporter, fixed_capacity) {
            Ok(sink) => sink,
            Err(e) => panic!("failed to create buffer sink: {e}"),
        }
    }

    /// Append `data`, returns the number of bytes accepted which is always `data.len()`.
    ///
    /// In fixed capacity mode, the buffered data is exported first if `data`
    /// would make the buffer exceed the capacity. Nothing is exported if the
    /// buffer is empty, so `data` larger than the capacity is kept whole and
    /// goes out with the next flush.
    pub fn append(&self, data: &[u8]) -> usize {
        let mut state = self.shared.state.lock().unwrap();
        let mut flushed = None;
        if let Some(capacity) = state.policy.fixed_capacity() {
            if !state.buf.is_empty() && state.buf.len() + data.len() > capacity {
                flushed = Some(state.take());
            }
        }
        state.buf.extend_from_slice(data);
        drop(state);

        self.shared.stats.add_append(data.len());
        if let Some((snapshot, reallocated)) = flushed {
            if let Some(r) = reallocated {
                r.log();
            }
            self.shared.stats.add_implicit_flush();
            self.dispatch(snapshot);
        }
        data.len()
    }

    /// Hand a copy of the buffered data to the exporter, and reset the buffer if `reset` is set.
    ///
    /// The exporter is spawned and not waited for. It is also called if the buffer is empty.
    pub fn export(&self, reset: bool) {
        let mut state = self.shared.state.lock().unwrap();
        let (snapshot, reallocated) = if reset {
            state.take()
        } else {
            (Bytes::copy_from_slice(&state.buf), None)
        };
        drop(state);

        if let Some(r) = reallocated {
            r.log();
        }
        self.dispatch(snapshot);
    }

    /// Start a background task that does `export(true)` every `period`.
    ///
    /// The task keeps running until it is cancelled through the returned handle.
    pub fn interval_export(&self, period: Duration) -> Result<IntervalExportHandle, SinkError> {
        if period.is_zero() {
            return Err(SinkError::InvalidInterval);
        }
        Ok(IntervalExportHandle::spawn(self.clone(), period))
    }

    /// A copy of the buffered data.
    pub fn bytes(&self) -> Vec<u8> {
        let state = self.shared.state.lock().unwrap();
        state.buf.clone()
    }

    /// Drop the buffered data without exporting it.
    pub fn reset(&self) {
        let mut state = self.shared.state.lock().unwrap();
        let SinkState { buf, policy } = &mut *state;
        let reallocated = policy.reset(buf);
        drop(state);

        if let Some(r) = reallocated {
            r.log();
        }
        self.shared.stats.add_reset();
    }

    pub fn len(&self) -> usize {
        self.shared.state.lock().unwrap().buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capacity of the current buffer allocation.
    pub fn capacity(&self) -> usize {
        self.shared.state.lock().unwrap().buf.capacity()
    }

    pub fn fixed_capacity(&self) -> Option<usize> {
        self.shared.state.lock().unwrap().policy.fixed_capacity()
    }

    pub fn stats(&self) -> Arc<SinkStats> {
        Arc::clone(&self.shared.stats)
    }

    /// Wait for the export tasks spawned so far to finish.
    ///
    /// This is meant to be used before shutting down the runtime.
    /// Concurrent callers are served one at a time.
    pub async fn wait_exports(&self) {
        let _guard = self.shared.wait_lock.lock().await;
        let tracker = &self.shared.tracker;
        tracker.close();
        tracker.wait().await;
        tracker.reopen();
    }

    pub(crate) fn rt_handle(&self) -> &Handle {
        &self.shared.rt_handle
    }

    // no logging here, the log backend may be appending to this sink
    fn dispatch(&self, data: Bytes) {
        self.shared.stats.add_export(data.len());
        let fut = Arc::clone(&self.shared.exporter).export(data);
        let _ = self.shared.tracker.spawn_on(fut, &self.shared.rt_handle);
    }
}

impl io::Write for &BufferSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.append(buf))
    }

    /// The buffer is only exported through the sink methods.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Write for BufferSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.append(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
