/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use thiserror::Error;
use tokio::runtime::TryCurrentError;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("export function was not set")]
    ExportFunctionMissing,
    #[error("the export interval was zero")]
    InvalidInterval,
    #[error("no tokio runtime to spawn exports on: {0}")]
    RuntimeUnavailable(TryCurrentError),
}
