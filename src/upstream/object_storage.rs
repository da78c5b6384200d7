// src/upstream/object_storage.rs

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::{
    error::DisplayErrorContext, presigning::PresigningConfig, primitives::ByteStream, Client,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("S3: {0}")]
    Backend(String),

    #[error("Configuração de presign inválida: {0}")]
    Presign(String),
}

/// As três operações de objeto que o back-office usa.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), StorageError>;
    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, StorageError>;
    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    // Credenciais vêm da cadeia padrão da AWS (AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY, perfil, etc.)
    pub async fn new(bucket: &str, region: &str) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;

        Self {
            client: Client::new(&config),
            bucket: bucket.to_string(),
        }
    }
}

fn backend_error<E: std::error::Error>(err: E) -> StorageError {
    StorageError::Backend(DisplayErrorContext(err).to_string())
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, StorageError> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::Presign(e.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(backend_error)?;

        Ok(request.uri().to_string())
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(backend_error)?;
        Ok(())
    }
}
