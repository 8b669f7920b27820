//! HTTP client for the commerce backend.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use zeroize::Zeroizing;

use cartage::{
    amounts::{normalize_amount, to_major},
    coupons::Coupon,
};

use crate::gateway::SignedPayment;

use super::{
    ApiError, CartMutation, CartQuery, CartSnapshot, CartsApi, ConfirmedOrder, CouponsApi,
    CreatedOrder, OrderContext, OrdersApi, WalletApi,
    carts::{CartPayload, MutationBody},
    coupons::CouponListPayload,
    envelope::Envelope,
    orders::{ConfirmBody, ConfirmedOrderPayload, CreatedOrderPayload, OrderBody},
    wallet::BalancePayload,
};

/// Configuration for connecting to the commerce backend.
#[derive(Clone)]
pub struct CommerceApiConfig {
    /// Base URL, e.g. `"https://api.example.com/v1"`.
    pub base_url: String,

    /// Customer session token. `None` means the customer is signed out.
    pub token: Option<Zeroizing<String>>,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl fmt::Debug for CommerceApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommerceApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP client implementing every commerce API concern.
#[derive(Debug, Clone)]
pub struct HttpCommerceClient {
    config: CommerceApiConfig,
    http: Client,
}

impl HttpCommerceClient {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: CommerceApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));

        match &self.config.token {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }
}

/// Turn a non-2xx response into [`ApiError::Status`].
async fn check(response: Response) -> Result<Response, ApiError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    Err(ApiError::Status { status, body })
}

/// Check the status, then decode the `{ success, data }` envelope.
async fn read<T: DeserializeOwned>(response: Response, what: &'static str) -> Result<T, ApiError> {
    let envelope: Envelope<T> = check(response).await?.json().await?;

    envelope.into_data(what)
}

#[async_trait]
impl CartsApi for HttpCommerceClient {
    async fn fetch_cart(&self, query: CartQuery) -> Result<CartSnapshot, ApiError> {
        let mut params = vec![
            ("isUsingWalletAmount", query.use_wallet.to_string()),
            ("walletAmount", to_major(query.wallet_amount).to_string()),
        ];

        if let Some(address) = &query.address_id {
            params.push(("address_id", address.to_string()));
        }

        if let Some(coupon) = &query.coupon_id {
            params.push(("coupon_id", coupon.to_string()));
        }

        debug!(?query, "fetching cart");

        let response = self.request(Method::GET, "cart").query(&params).send().await?;
        let payload: CartPayload = read(response, "cart").await?;

        Ok(payload.into())
    }

    async fn update_item(&self, mutation: CartMutation) -> Result<(), ApiError> {
        let response = self
            .request(Method::POST, "cart")
            .json(&MutationBody::from(&mutation))
            .send()
            .await?;

        check(response).await?;

        Ok(())
    }
}

#[async_trait]
impl CouponsApi for HttpCommerceClient {
    async fn list_coupons(&self) -> Result<Vec<Coupon>, ApiError> {
        let response = self.request(Method::GET, "coupons").send().await?;
        let payload: CouponListPayload = read(response, "coupons").await?;

        Ok(payload.into_coupons())
    }
}

#[async_trait]
impl WalletApi for HttpCommerceClient {
    async fn wallet_balance(&self) -> Result<u64, ApiError> {
        let response = self.request(Method::GET, "wallet/balance").send().await?;
        let payload: BalancePayload = read(response, "wallet").await?;

        payload
            .wallet_balance
            .map(|balance| normalize_amount(Some(balance)))
            .ok_or(ApiError::MissingData("walletBalance"))
    }
}

#[async_trait]
impl OrdersApi for HttpCommerceClient {
    fn is_authenticated(&self) -> bool {
        self.config.token.is_some()
    }

    async fn create_order(&self, context: OrderContext) -> Result<CreatedOrder, ApiError> {
        let response = self
            .request(Method::POST, "orders")
            .query(&[("isUsingWalletAmount", context.use_wallet.to_string())])
            .json(&OrderBody::from(&context))
            .send()
            .await?;

        let payload: CreatedOrderPayload = check(response).await?.json().await?;

        CreatedOrder::try_from(payload)
    }

    async fn confirm_order(
        &self,
        context: OrderContext,
        payment: SignedPayment,
    ) -> Result<ConfirmedOrder, ApiError> {
        let response = self
            .request(Method::POST, "orders/verify")
            .json(&ConfirmBody::new(&context, &payment))
            .send()
            .await?;

        let envelope: Envelope<ConfirmedOrderPayload> = check(response).await?.json().await?;

        match envelope.into_data("order") {
            Ok(payload) => Ok(payload.into()),
            Err(ApiError::MissingData(_)) => Ok(ConfirmedOrder::default()),
            Err(error) => Err(error),
        }
    }
}
