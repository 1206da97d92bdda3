/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use bytes::Bytes;
use log::warn;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use bufsink::{ArcExporter, ExportFuture, Exporter};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StdioExporter {
    Stdout,
    Stderr,
}

impl StdioExporter {
    pub fn into_exporter(self) -> ArcExporter {
        Arc::new(self)
    }

    fn as_str(&self) -> &'static str {
        match self {
            StdioExporter::Stdout => "stdout",
            StdioExporter::Stderr => "stderr",
        }
    }
}

async fn write_all<W: AsyncWrite + Unpin>(mut w: W, data: &[u8]) -> std::io::Result<()> {
    w.write_all(data).await?;
    w.flush().await
}

impl Exporter for StdioExporter {
    fn export(self: Arc<Self>, data: Bytes) -> ExportFuture {
        Box::pin(async move {
            if data.is_empty() {
                return;
            }
            let r = match *self {
                StdioExporter::Stdout => write_all(tokio::io::stdout(), &data).await,
                StdioExporter::Stderr => write_all(tokio::io::stderr(), &data).await,
            };
            if let Err(e) = r {
                warn!("unable to export {} bytes to {}: {e}", data.len(), self.as_str());
            }
        })
    }
}
