// src/upstream/http_client.rs

use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize};

use super::UpstreamError;

// Todos os serviços internos respondem { "success": ..., "data": ... }
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

/// Cliente HTTP compartilhado pelos serviços de pedidos, estoque e financeiro.
/// `reqwest::Client` já é um `Arc` por dentro.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET em `path` e devolve o campo `data` da resposta.
    /// `data` ausente ou `null` vira `T::default()` (lista vazia, relatório vazio).
    pub(crate) async fn get_data<T>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, UpstreamError>
    where
        T: DeserializeOwned + Default,
    {
        let url = format!("{}{}", self.base_url, path);
        let http_err = |source: reqwest::Error| UpstreamError::Http {
            endpoint: path.to_string(),
            source,
        };

        let envelope: Envelope<T> = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(http_err)?
            .error_for_status()
            .map_err(http_err)?
            .json()
            .await
            .map_err(http_err)?;

        // 200 com `success: false` também é falha
        if envelope.success == Some(false) {
            return Err(UpstreamError::Unavailable(format!(
                "{path}: {}",
                envelope.message.unwrap_or_else(|| "success=false".to_string())
            )));
        }

        tracing::debug!(endpoint = %path, "Resposta upstream recebida");
        Ok(envelope.data.unwrap_or_default())
    }
}
