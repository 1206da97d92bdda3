/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::io;

use anyhow::Context;
use log::{debug, info};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use bufsink::{BufferSink, BufferSinkBuilder};

use crate::config::TeeConfig;

/// Append every line read from `reader` to `sink`, and copy it to `echo` if set.
///
/// Returns the number of bytes read. A last line without a trailing newline is kept as is.
pub async fn copy_lines<R, W>(reader: R, sink: &BufferSink, mut echo: Option<W>) -> io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut line = Vec::with_capacity(1024);
    let mut total = 0u64;
    loop {
        line.clear();
        let nr = reader.read_until(b'\n', &mut line).await?;
        if nr == 0 {
            break;
        }
        total += nr as u64;
        sink.append(&line);
        if let Some(w) = &mut echo {
            w.write_all(&line).await?;
        }
    }
    if let Some(w) = &mut echo {
        w.flush().await?;
    }
    Ok(total)
}

pub async fn run(config: &TeeConfig, echo: bool) -> anyhow::Result<()> {
    let exporter = config
        .exporter
        .build()
        .await
        .context(format!("failed to build {} exporter", config.exporter.exporter_type()))?;

    let mut builder = BufferSinkBuilder::with_exporter(exporter);
    builder.set_fixed_capacity(config.fixed_capacity);
    builder.set_adaptive_reuse_factor(config.adaptive_reuse_factor);
    let sink = builder.build().context("failed to create buffer sink")?;

    let interval = match config.export_interval {
        Some(period) => {
            debug!("export every {period:?}");
            Some(sink.interval_export(period)?)
        }
        None => None,
    };

    let echo = echo.then(tokio::io::stdout);
    let total = copy_lines(tokio::io::stdin(), &sink, echo)
        .await
        .context("failed to read from stdin")?;
    info!("read {total} bytes from stdin");

    if let Some(handle) = interval {
        handle.cancel();
        handle.join().await;
    }
    sink.export(true);
    sink.wait_exports().await;

    let stats = sink.stats().snapshot();
    info!(
        "appended {} lines, dispatched {} exports with {} bytes",
        stats.append_total, stats.export_total, stats.export_size
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use bufsink::export_fn;
    use bufsink_export::ExporterConfig;

    #[tokio::test]
    async fn copy_and_echo() {
        let exported = Arc::new(Mutex::new(Vec::new()));
        let e = exported.clone();
        let exporter = export_fn(move |data| {
            let e = e.clone();
            async move {
                e.lock().unwrap().push(data);
            }
        });
        let sink = BufferSink::new(Some(exporter), 8).unwrap();

        let input: &[u8] = b"abc\ndefgh\nij";
        let mut echo = Vec::new();
        let total = copy_lines(input, &sink, Some(&mut echo)).await.unwrap();
        assert_eq!(total, input.len() as u64);
        assert_eq!(echo, input);

        sink.wait_exports().await;
        let exported = exported.lock().unwrap();
        assert_eq!(exported.len(), 1);
        assert_eq!(exported[0].as_ref(), b"abc\n");
        assert_eq!(sink.bytes(), b"defgh\nij");
    }

    #[tokio::test]
    async fn copy_without_echo() {
        let sink = BufferSink::new(Some(export_fn(|_| async {})), 0).unwrap();
        let total = copy_lines(&b""[..], &sink, None::<tokio::io::Stdout>)
            .await
            .unwrap();
        assert_eq!(total, 0);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn disk_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = TeeConfig {
            exporter: ExporterConfig::Disk {
                dir: temp_dir.path().to_path_buf(),
                prefix: "tee".to_string(),
            },
            ..Default::default()
        };
        let exporter = config.exporter.build().await.unwrap();
        let sink = BufferSink::new(Some(exporter), config.fixed_capacity).unwrap();
        copy_lines(&b"one\ntwo\n"[..], &sink, None::<tokio::io::Stdout>)
            .await
            .unwrap();
        sink.export(true);
        sink.wait_exports().await;

        let files: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(files.len(), 1);
        assert_eq!(std::fs::read(&files[0]).unwrap(), b"one\ntwo\n");
    }
}
