#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! S3 access for the pollutant data bucket.
//!
//! The county pollutant feed drops timestamped CSV files into a bucket;
//! this crate lists them, reads their bodies as text, and picks the
//! "latest" file by the timestamp embedded in the key name.
//!
//! # Environment Variables
//!
//! | Variable | Required | Description |
//! |---|---|---|
//! | `AWS_REGION` | Yes | Region the bucket lives in |
//! | `AWS_ACCESS_KEY_ID` | Yes | Access key |
//! | `AWS_SECRET_ACCESS_KEY` | Yes | Secret key |
//! | `S3_BUCKET_NAME` | Yes | Bucket holding the pollutant CSV files |

pub mod latest;

pub use latest::{latest_csv_key, parse_key_timestamp};

use aws_config::Region;
use aws_sdk_s3::config::Credentials;

/// Errors that can occur during S3 operations.
#[derive(Debug, thiserror::Error)]
pub enum S3Error {
    /// Missing required environment variable.
    #[error("Missing environment variable: {name}")]
    MissingEnv {
        /// Name of the missing environment variable.
        name: String,
    },

    /// S3 `ListObjectsV2` failed.
    #[error("Failed to list s3://{bucket}: {source}")]
    List {
        /// Bucket name.
        bucket: String,
        /// Underlying SDK error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// S3 `GetObject` failed.
    #[error("Failed to read s3://{bucket}/{key}: {source}")]
    Read {
        /// Bucket name.
        bucket: String,
        /// Object key.
        key: String,
        /// Underlying SDK error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Metadata for one listed object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Object key.
    pub key: String,
    /// Object size in bytes.
    pub size: i64,
    /// Last-modified timestamp (RFC 3339), when the service reports one.
    pub last_modified: Option<String>,
}

/// Client for the pollutant data bucket.
pub struct PollutantBucket {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl PollutantBucket {
    /// Creates a client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`S3Error::MissingEnv`] if any required variable is unset.
    pub fn from_env() -> Result<Self, S3Error> {
        let region = require_env("AWS_REGION")?;
        let access_key = require_env("AWS_ACCESS_KEY_ID")?;
        let secret_key = require_env("AWS_SECRET_ACCESS_KEY")?;
        let bucket = require_env("S3_BUCKET_NAME")?;

        let creds = Credentials::new(&access_key, &secret_key, None, None, "s3-env");

        let config = aws_sdk_s3::Config::builder()
            .region(Region::new(region))
            .credentials_provider(creds)
            .build();

        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(config),
            bucket,
        })
    }

    /// Returns the configured bucket name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Lists all objects in the bucket.
    ///
    /// # Errors
    ///
    /// Returns [`S3Error::List`] on S3 failures.
    pub async fn list_files(&self) -> Result<Vec<ObjectInfo>, S3Error> {
        log::info!("Listing s3://{}", self.bucket);

        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self.client.list_objects_v2().bucket(&self.bucket);

            if let Some(token) = &continuation_token {
                request = request.continuation_token(token);
            }

            let output = request.send().await.map_err(|e| S3Error::List {
                bucket: self.bucket.clone(),
                source: Box::new(e),
            })?;

            for obj in output.contents() {
                let Some(key) = obj.key() else { continue };
                objects.push(ObjectInfo {
                    key: key.to_string(),
                    size: obj.size().unwrap_or(0),
                    last_modified: obj.last_modified().map(ToString::to_string),
                });
            }

            if output.is_truncated() == Some(true) {
                continuation_token = output.next_continuation_token().map(String::from);
            } else {
                break;
            }
        }

        log::info!("  found {} objects", objects.len());
        Ok(objects)
    }

    /// Reads an object's body as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`S3Error::Read`] on S3 failures.
    pub async fn read_file(&self, key: &str) -> Result<String, S3Error> {
        log::info!("Reading s3://{}/{key}", self.bucket);

        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| S3Error::Read {
                bucket: self.bucket.clone(),
                key: key.to_string(),
                source: Box::new(e),
            })?;

        let bytes = output.body.collect().await.map_err(|e| S3Error::Read {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            source: Box::new(e),
        })?;

        Ok(String::from_utf8_lossy(&bytes.into_bytes()).into_owned())
    }
}

/// Reads a required environment variable.
fn require_env(name: &str) -> Result<String, S3Error> {
    std::env::var(name).map_err(|_| S3Error::MissingEnv {
        name: name.to_string(),
    })
}
