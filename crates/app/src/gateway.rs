//! Payment gateway boundary.
//!
//! The gateway is an external checkout surface. It receives an order to pay
//! and hands back a signed result. The `razorpay_*` field names are the
//! gateway's contract; their values are passed through untouched.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Customer details used to prefill the gateway form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefill {
    pub name: Option<String>,
    pub email: Option<String>,

    #[serde(alias = "phone")]
    pub contact: Option<String>,
}

/// What the gateway is asked to collect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayCheckout {
    pub order_id: String,

    /// Amount in the gateway's minor units
    pub amount: u64,

    pub currency: String,

    /// Publishable gateway key issued with the order
    pub key: Option<String>,

    pub prefill: Prefill,
}

/// Raw gateway result. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GatewayResponse {
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub razorpay_signature: Option<String>,
}

/// A complete, signed gateway result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedPayment {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

impl GatewayResponse {
    /// Returns the signed payment only if all three fields are present and non-empty.
    pub fn into_signed(self) -> Option<SignedPayment> {
        let present = |value: Option<String>| value.filter(|value| !value.is_empty());

        Some(SignedPayment {
            razorpay_order_id: present(self.razorpay_order_id)?,
            razorpay_payment_id: present(self.razorpay_payment_id)?,
            razorpay_signature: present(self.razorpay_signature)?,
        })
    }
}

/// Ways the gateway can end without a result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The customer closed the checkout surface.
    #[error("payment was cancelled")]
    Dismissed,

    /// The gateway reported a failure.
    #[error("payment failed: {0}")]
    Failed(String),
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open the checkout surface and wait for the customer to finish.
    async fn open_checkout(&self, checkout: GatewayCheckout) -> Result<GatewayResponse, GatewayError>;
}
