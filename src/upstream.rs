pub mod http_client;
pub use http_client::UpstreamClient;
pub mod orders_client;
pub use orders_client::{OrderQuery, OrdersApi};
pub mod inventory_client;
pub use inventory_client::InventoryApi;
pub mod finance_client;
pub use finance_client::FinanceApi;
pub mod delivery_client;
pub use delivery_client::{DeliveryApi, StaticDeliveryMetrics};
pub mod object_storage;
pub use object_storage::{ObjectStorage, S3Storage, StorageError};

#[cfg(test)]
pub mod fakes;

use thiserror::Error;

// Falha de UMA chamada a um serviço interno (transporte, timeout, status != 2xx, JSON inválido).
// Nunca sai de um fetcher: vira zero/vazio + `SourceHealth::Degraded`.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{endpoint}: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0}")]
    Unavailable(String),
}
