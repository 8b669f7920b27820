//! Wallet API

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;

use super::{ApiError, lenient};

#[automock]
#[async_trait]
pub trait WalletApi: Send + Sync {
    /// Fetch the customer's wallet balance in minor units.
    async fn wallet_balance(&self) -> Result<u64, ApiError>;
}

/// `data` section of the balance response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BalancePayload {
    #[serde(default, deserialize_with = "lenient::number")]
    pub(crate) wallet_balance: Option<f64>,
}
