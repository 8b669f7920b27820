//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    api::{ApiError, CartsApi, CommerceApiConfig, CouponsApi, HttpCommerceClient, OrdersApi, WalletApi},
    gateway::PaymentGateway,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to build the commerce API client")]
    Client(#[source] ApiError),
}

/// Every external service a cart session talks to.
#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartsApi>,
    pub coupons: Arc<dyn CouponsApi>,
    pub wallet: Arc<dyn WalletApi>,
    pub orders: Arc<dyn OrdersApi>,
    pub gateway: Arc<dyn PaymentGateway>,
}

impl AppContext {
    /// Build application context backed by the HTTP commerce API.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn from_api_config(
        config: CommerceApiConfig,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Result<Self, AppInitError> {
        let client = Arc::new(HttpCommerceClient::new(config).map_err(AppInitError::Client)?);

        Ok(Self {
            carts: client.clone(),
            coupons: client.clone(),
            wallet: client.clone(),
            orders: client,
            gateway,
        })
    }
}
