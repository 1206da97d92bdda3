/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use log::{debug, warn};

use bufsink::{ArcExporter, ExportFuture, Exporter};

use crate::{ExportNamer, join_key_prefix};

/// A store that can upload a single object.
pub trait ObjectStore: Send + Sync + 'static {
    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// Uploads each export as object `<folder>/.../<prefix>_<timestamp>.txt` in a bucket.
pub struct ObjectStoreExporter<S> {
    store: S,
    bucket: String,
    namer: ExportNamer,
}

impl<S: ObjectStore> ObjectStoreExporter<S> {
    pub fn new<F: AsRef<str>>(
        store: S,
        bucket: impl Into<String>,
        folders: &[F],
        prefix: &str,
    ) -> Self {
        ObjectStoreExporter {
            store,
            bucket: bucket.into(),
            namer: ExportNamer::new(join_key_prefix(folders, prefix)),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key_prefix(&self) -> &str {
        self.namer.prefix()
    }

    pub fn into_exporter(self) -> ArcExporter {
        Arc::new(self)
    }
}

impl<S: ObjectStore> Exporter for ObjectStoreExporter<S> {
    fn export(self: Arc<Self>, data: Bytes) -> ExportFuture {
        Box::pin(async move {
            if data.is_empty() {
                return;
            }
            let key = self.namer.name_now();
            let size = data.len();
            match self.store.put_object(&self.bucket, &key, data).await {
                Ok(_) => debug!("uploaded {size} bytes to {}/{key}", self.bucket),
                Err(e) => warn!("unable to upload {size} bytes to {}/{key}: {e:?}", self.bucket),
            }
        })
    }
}
