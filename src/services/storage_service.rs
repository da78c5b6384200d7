// src/services/storage_service.rs

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use regex::Regex;

use crate::{
    common::error::AppError,
    models::storage::UploadedFile,
    upstream::ObjectStorage,
};

pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
pub const DEFAULT_FOLDER: &str = "purchase";
pub const DEFAULT_PRESIGN_TTL: Duration = Duration::from_secs(3600);

const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "pdf", "doc", "docx", "xls", "xlsx"];
// MIME dos formatos do Office não contém a extensão (ex: application/msword)
const ALLOWED_MIME: &str = r"jpeg|jpg|png|pdf|msword|excel|officedocument|doc|xls";

/// Uma referência vinda do banco: chave crua, URL do nosso bucket, ou URL de outro lugar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectRef {
    Key(String),
    Foreign(String),
}

#[derive(Clone)]
pub struct StorageService {
    store: Arc<dyn ObjectStorage>,
    bucket_url: Regex,
    allowed_mime: Regex,
}

impl StorageService {
    pub fn new(store: Arc<dyn ObjectStorage>, bucket: &str, region: &str) -> Result<Self, regex::Error> {
        let bucket_url = Regex::new(&format!(
            r"^https://{}\.s3\.{}\.amazonaws\.com/(.+)$",
            regex::escape(bucket),
            regex::escape(region)
        ))?;

        Ok(Self {
            store,
            bucket_url,
            allowed_mime: Regex::new(ALLOWED_MIME)?,
        })
    }

    /// Tamanho, extensão e MIME precisam bater, senão o arquivo é recusado.
    pub fn validate_upload(&self, file: &UploadedFile) -> Result<(), AppError> {
        if file.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::InvalidUpload(format!(
                "{} excede o limite de 20 MB",
                file.original_name
            )));
        }

        let extension = Path::new(&file.original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let extension_ok = ALLOWED_EXTENSIONS.contains(&extension.as_str());
        let mime_ok = self.allowed_mime.is_match(&file.content_type.to_lowercase());

        if !(extension_ok && mime_ok) {
            return Err(AppError::InvalidUpload(
                "Apenas documentos e imagens são permitidos".into(),
            ));
        }
        Ok(())
    }

    pub fn object_key(folder: Option<&str>, original_name: &str, epoch_millis: i64) -> String {
        let folder = folder
            .map(|f| f.trim_matches('/'))
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_FOLDER);
        // O nome do arquivo nunca abre novos segmentos na chave
        let name = original_name.replace(['/', '\\'], "_");
        format!("{folder}/{epoch_millis}-{name}")
    }

    pub fn resolve_key(&self, key_or_url: &str) -> ObjectRef {
        if !(key_or_url.starts_with("http://") || key_or_url.starts_with("https://")) {
            return ObjectRef::Key(key_or_url.to_string());
        }

        match self.bucket_url.captures(key_or_url).and_then(|c| c.get(1)) {
            Some(key) => ObjectRef::Key(key.as_str().to_string()),
            None => ObjectRef::Foreign(key_or_url.to_string()),
        }
    }

    /// Sobe o arquivo e devolve só a chave (é o que vai para o banco).
    pub async fn upload(&self, file: UploadedFile, folder: Option<&str>) -> Result<String, AppError> {
        self.validate_upload(&file)?;

        let key = Self::object_key(folder, &file.original_name, Utc::now().timestamp_millis());
        self.store
            .put_object(&key, file.bytes, &file.content_type)
            .await
            .map_err(|e| {
                tracing::error!(key = %key, error = %e, "❌ Falha no upload para o S3");
                AppError::Storage(e.to_string())
            })?;

        tracing::info!(key = %key, "✅ Upload concluído");
        Ok(key)
    }

    pub async fn presigned_url(&self, key_or_url: &str, ttl: Option<Duration>) -> Option<String> {
        if key_or_url.is_empty() {
            return None;
        }

        let key = match self.resolve_key(key_or_url) {
            ObjectRef::Key(key) => key,
            // Não é do nosso bucket: devolve como veio
            ObjectRef::Foreign(url) => return Some(url),
        };

        match self
            .store
            .presign_get(&key, ttl.unwrap_or(DEFAULT_PRESIGN_TTL))
            .await
        {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::error!(key = %key, error = %e, "❌ Falha ao gerar URL assinada");
                None
            }
        }
    }

    /// Best-effort: nenhuma falha aqui chega ao chamador.
    pub async fn delete(&self, key_or_url: &str) {
        if key_or_url.is_empty() {
            return;
        }

        let key = match self.resolve_key(key_or_url) {
            ObjectRef::Key(key) => key,
            ObjectRef::Foreign(url) => {
                tracing::warn!(url = %url, "⚠️ Não é uma URL do S3, delete ignorado");
                return;
            }
        };

        match self.store.delete_object(&key).await {
            Ok(()) => tracing::info!(key = %key, "✅ Objeto removido"),
            Err(e) => tracing::error!(key = %key, error = %e, "❌ Falha ao remover do S3"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::fakes::InMemoryStorage;

    const BUCKET_URL: &str = "https://mnt-ecommerce-2025.s3.eu-north-1.amazonaws.com";

    fn service(store: InMemoryStorage) -> StorageService {
        StorageService::new(Arc::new(store), "mnt-ecommerce-2025", "eu-north-1").unwrap()
    }

    fn file(name: &str, content_type: &str, size: usize) -> UploadedFile {
        UploadedFile {
            original_name: name.into(),
            content_type: content_type.into(),
            bytes: vec![0; size],
        }
    }

    #[test]
    fn accepts_documents_and_images() {
        let svc = service(InMemoryStorage::default());
        for (name, mime) in [
            ("nota.pdf", "application/pdf"),
            ("foto.JPG", "image/jpeg"),
            ("logo.png", "image/png"),
            ("contrato.doc", "application/msword"),
            ("contrato.docx", "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
            ("planilha.xls", "application/vnd.ms-excel"),
            ("planilha.xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        ] {
            assert!(svc.validate_upload(&file(name, mime, 10)).is_ok(), "{name} deveria passar");
        }
    }

    #[test]
    fn rejects_wrong_type_or_size() {
        let svc = service(InMemoryStorage::default());

        let exe = svc.validate_upload(&file("setup.exe", "application/octet-stream", 10));
        assert!(matches!(exe, Err(AppError::InvalidUpload(_))));

        // Extensão ok, MIME não
        let fake_pdf = svc.validate_upload(&file("nota.pdf", "text/html", 10));
        assert!(matches!(fake_pdf, Err(AppError::InvalidUpload(_))));

        // "pdf" no meio do nome não conta
        let sneaky = svc.validate_upload(&file("pdf.exe", "application/pdf", 10));
        assert!(matches!(sneaky, Err(AppError::InvalidUpload(_))));

        let huge = svc.validate_upload(&file("nota.pdf", "application/pdf", MAX_UPLOAD_BYTES + 1));
        assert!(matches!(huge, Err(AppError::InvalidUpload(_))));
    }

    #[test]
    fn key_layout() {
        assert_eq!(
            StorageService::object_key(None, "nota.pdf", 1_760_875_200_000),
            "purchase/1760875200000-nota.pdf"
        );
        assert_eq!(
            StorageService::object_key(Some("partners/"), "cnh.png", 1),
            "partners/1-cnh.png"
        );
        assert_eq!(StorageService::object_key(Some(""), "a.pdf", 1), "purchase/1-a.pdf");
    }

    #[test]
    fn file_name_separators_stay_inside_one_segment() {
        assert_eq!(
            StorageService::object_key(None, "../outra/nota.pdf", 7),
            "purchase/7-.._outra_nota.pdf"
        );
        assert_eq!(
            StorageService::object_key(Some("partners"), "C:\\docs\\cnh.png", 7),
            "partners/7-C:_docs_cnh.png"
        );
    }

    #[test]
    fn resolves_keys_from_bucket_urls() {
        let svc = service(InMemoryStorage::default());

        assert_eq!(svc.resolve_key("purchase/1-a.pdf"), ObjectRef::Key("purchase/1-a.pdf".into()));
        assert_eq!(
            svc.resolve_key(&format!("{BUCKET_URL}/purchase/1-a.pdf")),
            ObjectRef::Key("purchase/1-a.pdf".into())
        );
        assert_eq!(
            svc.resolve_key("https://cdn.example.com/logo.png"),
            ObjectRef::Foreign("https://cdn.example.com/logo.png".into())
        );
        // Outro bucket
        assert!(matches!(
            svc.resolve_key("https://outro.s3.eu-north-1.amazonaws.com/x.png"),
            ObjectRef::Foreign(_)
        ));
    }

    #[tokio::test]
    async fn upload_stores_object_under_generated_key() {
        let store = InMemoryStorage::default();
        let svc = service(store.clone());

        let key = svc
            .upload(file("nota.pdf", "application/pdf", 3), Some("invoices"))
            .await
            .unwrap();

        assert!(key.starts_with("invoices/"));
        assert!(key.ends_with("-nota.pdf"));
        assert_eq!(store.objects.lock().unwrap().get(&key).map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn upload_failure_is_a_storage_error() {
        let svc = service(InMemoryStorage::broken());
        let result = svc.upload(file("nota.pdf", "application/pdf", 3), None).await;
        assert!(matches!(result, Err(AppError::Storage(_))));
    }

    #[tokio::test]
    async fn presign_rules() {
        let svc = service(InMemoryStorage::default());

        assert_eq!(svc.presigned_url("", None).await, None);
        assert_eq!(
            svc.presigned_url("purchase/1-a.pdf", None).await.as_deref(),
            Some("https://signed.example/purchase/1-a.pdf?X-Amz-Expires=3600")
        );
        assert_eq!(
            svc.presigned_url(&format!("{BUCKET_URL}/logo.png"), Some(Duration::from_secs(60)))
                .await
                .as_deref(),
            Some("https://signed.example/logo.png?X-Amz-Expires=60")
        );
        assert_eq!(
            svc.presigned_url("https://cdn.example.com/logo.png", None).await.as_deref(),
            Some("https://cdn.example.com/logo.png")
        );
    }

    #[tokio::test]
    async fn presign_failure_yields_none() {
        let svc = service(InMemoryStorage::broken());
        assert_eq!(svc.presigned_url("purchase/1-a.pdf", None).await, None);
    }

    #[tokio::test]
    async fn delete_is_best_effort() {
        let store = InMemoryStorage::default().with_object("purchase/1-a.pdf");
        let svc = service(store.clone());

        svc.delete("").await;
        svc.delete("https://cdn.example.com/purchase/1-a.pdf").await;
        assert!(store.objects.lock().unwrap().contains_key("purchase/1-a.pdf"));

        svc.delete(&format!("{BUCKET_URL}/purchase/1-a.pdf")).await;
        assert!(store.objects.lock().unwrap().is_empty());

        // Falha do backend não propaga
        service(InMemoryStorage::broken()).delete("purchase/x.pdf").await;
    }
}
