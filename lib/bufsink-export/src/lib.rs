/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

mod name;
pub use name::{ExportNamer, join_key_prefix};

mod disk;
pub use disk::DiskExporter;

mod stdio;
pub use stdio::StdioExporter;

mod object;
pub use object::{ObjectStore, ObjectStoreExporter};

#[cfg(feature = "s3")]
mod s3;
#[cfg(feature = "s3")]
pub use s3::{S3Exporter, s3_client_from_env};

mod config;
pub use config::ExporterConfig;
