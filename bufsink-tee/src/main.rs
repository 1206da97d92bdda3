/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use anyhow::{Context, anyhow};
use log::{debug, error};

fn main() -> anyhow::Result<()> {
    let Some(proc_args) =
        bufsink_tee::opts::parse_clap().context("failed to parse command line options")?
    else {
        return Ok(());
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| anyhow!("failed to start runtime: {e}"))?;

    // set up process logger early, it exports through the runtime
    let process_log = bufsink_tee::log::setup(proc_args.verbose_level, rt.handle())
        .context("failed to setup logger")?;
    debug!("exporter: {}", proc_args.config.exporter.exporter_type());

    rt.block_on(async {
        let ret = bufsink_tee::tee::run(&proc_args.config, proc_args.echo).await;
        if let Err(e) = &ret {
            error!("{e:?}");
        }
        process_log.shutdown().await;
        ret
    })
}
