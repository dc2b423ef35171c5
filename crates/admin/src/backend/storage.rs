//! Product image uploads to platform storage.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing::instrument;
use url::Url;
use uuid::Uuid;

use crate::config::{AdminConfig, BackendConfig};

use super::{BackendError, error_from_response};

/// Client for the platform's object storage.
#[derive(Clone)]
pub struct StorageClient {
    inner: Arc<StorageClientInner>,
}

struct StorageClientInner {
    client: reqwest::Client,
    storage_base: Url,
    service_key: String,
    bucket: String,
}

/// A stored object: where it went and the URL to serve it from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Bucket-relative path the object was written under.
    pub path: String,
    /// Public URL for the object.
    pub public_url: String,
}

impl StorageClient {
    /// Create a new storage client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL cannot be parsed.
    pub fn new(config: &AdminConfig) -> Result<Self, BackendError> {
        let BackendConfig { url, service_key } = &config.backend;

        Ok(Self {
            inner: Arc::new(StorageClientInner {
                client: reqwest::Client::new(),
                storage_base: Url::parse(url)?.join("storage/v1/")?,
                service_key: service_key.expose_secret().to_string(),
                bucket: config.storage_bucket.clone(),
            }),
        })
    }

    /// Upload an image under a generated path and return its public URL.
    ///
    /// The path is `products/{uuid}.{ext}` so re-uploads never collide and
    /// never overwrite an image some order confirmation still links to.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails.
    #[instrument(skip(self, bytes), fields(bytes = bytes.len(), content_type = %content_type))]
    pub async fn upload_product_image(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, BackendError> {
        let path = format!(
            "products/{}.{}",
            Uuid::new_v4().simple(),
            extension_for(content_type)
        );

        let upload_url = self
            .inner
            .storage_base
            .join(&format!("object/{}/{}", self.inner.bucket, path))?;

        let response = self
            .inner
            .client
            .post(upload_url)
            .header("apikey", &self.inner.service_key)
            .bearer_auth(&self.inner.service_key)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let public_url = self
            .inner
            .storage_base
            .join(&format!("object/public/{}/{}", self.inner.bucket, path))?
            .to_string();

        Ok(StoredObject { path, public_url })
    }
}

/// File extension for the content types the admin form accepts.
fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        // image/jpeg and anything exotic; the platform serves by content
        // type, the extension is cosmetic
        _ => "jpg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_mapping() {
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("application/octet-stream"), "jpg");
    }
}
