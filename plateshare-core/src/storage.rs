//! Object storage API: uploads and public URL derivation.

use crate::client::PlateshareClient;
use crate::error::ApiError;
use crate::transport::{Method, RequestBody, RestRequest};

/// Storage operations for one bucket.
pub struct StorageApi<'a> {
    client: &'a PlateshareClient,
    bucket: String,
}

impl<'a> StorageApi<'a> {
    pub(crate) fn new(client: &'a PlateshareClient, bucket: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
        }
    }

    /// Upload an object and return its path within the bucket. With
    /// `upsert`, an existing object at the same path is replaced.
    pub async fn upload(
        &self,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> Result<String, ApiError> {
        let mut request = RestRequest::new(
            Method::Post,
            format!("/storage/v1/object/{}/{}", self.bucket, path),
        );
        if upsert {
            request
                .headers
                .push(("x-upsert".to_string(), "true".to_string()));
        }
        request.body = RequestBody::Bytes {
            data,
            content_type: content_type.to_string(),
        };

        self.client.execute(request).await?;
        tracing::debug!(bucket = %self.bucket, path, "object uploaded");
        Ok(path.to_string())
    }

    /// The public URL of an object in this bucket.
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.client.base_url(),
            self.bucket,
            path
        )
    }
}
