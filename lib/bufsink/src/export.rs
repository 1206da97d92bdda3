/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use log::warn;

pub type ExportFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Delivers a detached snapshot of the sink buffer somewhere.
///
/// The returned future is spawned as a detached task and is never awaited,
/// retried or cancelled by the sink, so delivery errors have to be handled
/// (and logged) inside of it. An empty snapshot should be a no-op.
pub trait Exporter: Send + Sync {
    fn export(self: Arc<Self>, data: Bytes) -> ExportFuture;
}

pub type ArcExporter = Arc<dyn Exporter>;

struct FnExporter<F> {
    f: F,
}

impl<F, Fut> Exporter for FnExporter<F>
where
    F: Fn(Bytes) -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn export(self: Arc<Self>, data: Bytes) -> ExportFuture {
        Box::pin((self.f)(data))
    }
}

/// Use an async closure as exporter.
pub fn export_fn<F, Fut>(f: F) -> ArcExporter
where
    F: Fn(Bytes) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(FnExporter { f })
}

struct BlockingFnExporter<F> {
    f: F,
}

impl<F> Exporter for BlockingFnExporter<F>
where
    F: Fn(Bytes) + Send + Sync + 'static,
{
    fn export(self: Arc<Self>, data: Bytes) -> ExportFuture {
        Box::pin(async move {
            if let Err(e) = tokio::task::spawn_blocking(move || (self.f)(data)).await {
                warn!("blocking export task failed: {e}");
            }
        })
    }
}

/// Use a blocking closure as exporter, it will be run on the blocking thread pool.
pub fn blocking_export_fn<F>(f: F) -> ArcExporter
where
    F: Fn(Bytes) + Send + Sync + 'static,
{
    Arc::new(BlockingFnExporter { f })
}
