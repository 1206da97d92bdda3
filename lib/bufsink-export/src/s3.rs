/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use anyhow::anyhow;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

use crate::{ObjectStore, ObjectStoreExporter};

pub type S3Exporter = ObjectStoreExporter<Client>;

impl ObjectStore for Client {
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> anyhow::Result<()> {
        Client::put_object(self)
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| anyhow!("s3 put_object failed: {}", DisplayErrorContext(e)))?;
        Ok(())
    }
}

/// Build a s3 client from the default aws environment config.
///
/// Path style addressing is always used if a custom endpoint is set.
pub async fn s3_client_from_env(endpoint_url: Option<&str>, force_path_style: bool) -> Client {
    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;

    let mut builder = aws_sdk_s3::config::Builder::from(&config);
    if let Some(url) = endpoint_url {
        builder = builder.endpoint_url(url);
    }
    if force_path_style || endpoint_url.is_some() {
        builder = builder.force_path_style(true);
    }
    Client::from_conf(builder.build())
}
