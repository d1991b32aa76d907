//! ListObjects over the AWS SDK.

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use tracing::debug;

use super::{ListRequest, ObjectEntry, ObjectStore, Page};
use crate::error::ListError;

const DEFAULT_REGION: &str = "us-east-1";

/// Connection settings for an S3-compatible endpoint.
#[derive(Debug, Clone, Default)]
pub struct S3Config {
    /// Endpoint hostname, optionally with a port. Empty means the SDK default.
    pub host: String,

    /// Use https instead of plain http for a custom host. Without a host the
    /// SDK endpoint resolver picks the scheme (https for AWS).
    pub https: bool,

    pub access_key: Option<String>,
    pub secret_key: Option<String>,

    /// Region override. Falls back to the environment, then `us-east-1`.
    pub region: Option<String>,
}

impl S3Config {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn with_https(mut self, https: bool) -> Self {
        self.https = https;
        self
    }

    /// Set static credentials. Empty strings are treated as absent.
    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into()).filter(|k| !k.is_empty());
        self.secret_key = Some(secret_key.into()).filter(|k| !k.is_empty());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Full endpoint URL for the configured host, if one is set.
    pub fn endpoint_url(&self) -> Option<String> {
        if self.host.is_empty() {
            return None;
        }
        let scheme = if self.https { "https" } else { "http" };
        Some(format!("{}://{}", scheme, self.host))
    }

    fn static_credentials(&self) -> Option<Credentials> {
        if self.access_key.is_none() && self.secret_key.is_none() {
            return None;
        }
        Some(Credentials::new(
            self.access_key.clone().unwrap_or_default(),
            self.secret_key.clone().unwrap_or_default(),
            None,
            None,
            "s3-lister",
        ))
    }
}

/// [`ObjectStore`] backed by a real S3 client.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: aws_sdk_s3::Client,
}

impl S3Store {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    /// Build a client from `config`. Nothing is sent over the network here.
    pub async fn connect(config: &S3Config) -> Self {
        let region_provider = RegionProviderChain::first_try(config.region.clone().map(Region::new))
            .or_default_provider()
            .or_else(DEFAULT_REGION);

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);

        let endpoint = config.endpoint_url();
        if let Some(url) = &endpoint {
            loader = loader.endpoint_url(url);
        }
        if let Some(credentials) = config.static_credentials() {
            loader = loader.credentials_provider(credentials);
        }

        let sdk_config = loader.load().await;

        // Custom endpoints rarely resolve virtual-host style bucket names.
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(endpoint.is_some())
            .build();

        debug!(endpoint = ?endpoint, "created S3 client");
        Self::new(aws_sdk_s3::Client::from_conf(s3_config))
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_page(&self, request: &ListRequest) -> Result<Page, ListError> {
        let output = self
            .client
            .list_objects()
            .bucket(&request.bucket)
            .prefix(&request.prefix)
            .max_keys(i32::from(request.page_size))
            .set_marker(request.marker.clone())
            .send()
            .await?;

        let entries = output
            .contents()
            .iter()
            .map(|object| {
                ObjectEntry::new(
                    object.key().unwrap_or_default(),
                    object.size().unwrap_or(0).max(0) as u64,
                )
            })
            .collect();

        Ok(Page {
            entries,
            truncated: output.is_truncated(),
        })
    }
}
