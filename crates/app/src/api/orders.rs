//! Orders API

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use cartage::{
    amounts::to_major,
    ids::{AddressId, CartId, CouponId},
};

use crate::gateway::{Prefill, SignedPayment};

use super::{ApiError, lenient};

/// Cart context shared by order creation and confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderContext {
    pub cart_id: CartId,
    pub address_id: AddressId,
    pub coupon_id: Option<CouponId>,
    pub use_wallet: bool,

    /// Wallet deduction in minor units
    pub wallet_deduction: u64,

    pub note: Option<String>,
}

/// Order creation result as returned by the backend. Fields are checked by
/// the checkout flow, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatedOrder {
    pub order_id: Option<String>,
    pub amount: Option<u64>,
    pub currency: Option<String>,
    pub key: Option<String>,
    pub customer: Prefill,
}

/// Order confirmation result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmedOrder {
    pub order_id: Option<String>,
}

#[automock]
#[async_trait]
pub trait OrdersApi: Send + Sync {
    /// Whether requests are made on behalf of a signed-in customer.
    fn is_authenticated(&self) -> bool;

    /// Create a gateway order for the cart.
    async fn create_order(&self, context: OrderContext) -> Result<CreatedOrder, ApiError>;

    /// Persist the order once the gateway has signed the payment.
    async fn confirm_order(
        &self,
        context: OrderContext,
        payment: SignedPayment,
    ) -> Result<ConfirmedOrder, ApiError>;
}

/// Body of the order creation request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderBody<'a> {
    address_id: &'a AddressId,
    cart_id: &'a CartId,
    coupon_id: Option<&'a CouponId>,
    note: Option<&'a str>,
    use_wallet: bool,

    /// Major units, as the backend expects
    wallet_deduction: f64,
}

impl<'a> From<&'a OrderContext> for OrderBody<'a> {
    fn from(context: &'a OrderContext) -> Self {
        Self {
            address_id: &context.address_id,
            cart_id: &context.cart_id,
            coupon_id: context.coupon_id.as_ref(),
            note: context.note.as_deref(),
            use_wallet: context.use_wallet,
            wallet_deduction: to_major(context.wallet_deduction).to_f64().unwrap_or(0.0),
        }
    }
}

/// Body of the order confirmation request.
#[derive(Debug, Serialize)]
pub(crate) struct ConfirmBody<'a> {
    #[serde(flatten)]
    order: OrderBody<'a>,

    #[serde(flatten)]
    payment: &'a SignedPayment,
}

impl<'a> ConfirmBody<'a> {
    pub(crate) fn new(context: &'a OrderContext, payment: &'a SignedPayment) -> Self {
        Self {
            order: OrderBody::from(context),
            payment,
        }
    }
}

/// Order creation response, either bare or wrapped in `data`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatedOrderPayload {
    #[serde(default, deserialize_with = "lenient::flag")]
    success: Option<bool>,

    #[serde(default)]
    message: Option<String>,

    #[serde(alias = "id")]
    order_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::whole")]
    amount: Option<u64>,

    currency: Option<String>,
    key: Option<String>,
    user: Option<Prefill>,
    data: Option<Box<CreatedOrderPayload>>,
}

impl TryFrom<CreatedOrderPayload> for CreatedOrder {
    type Error = ApiError;

    /// An explicit `success: false` at either level is a failure.
    fn try_from(payload: CreatedOrderPayload) -> Result<Self, ApiError> {
        if payload.success == Some(false) {
            return Err(ApiError::Unsuccessful(
                payload.message.unwrap_or_else(|| "no message".to_string()),
            ));
        }

        if let Some(inner) = payload.data {
            return Self::try_from(*inner);
        }

        Ok(CreatedOrder {
            order_id: payload.order_id,
            amount: payload.amount,
            currency: payload.currency,
            key: payload.key,
            customer: payload.user.unwrap_or_default(),
        })
    }
}

/// `data` section of the confirmation response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConfirmedOrderPayload {
    #[serde(alias = "_id")]
    order_id: Option<String>,
}

impl From<ConfirmedOrderPayload> for ConfirmedOrder {
    fn from(payload: ConfirmedOrderPayload) -> Self {
        ConfirmedOrder {
            order_id: payload.order_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn context() -> OrderContext {
        OrderContext {
            cart_id: CartId::new("cart-1"),
            address_id: AddressId::new("addr-1"),
            coupon_id: Some(CouponId::new("c-1")),
            use_wallet: true,
            wallet_deduction: 15_000,
            note: None,
        }
    }

    #[test]
    fn order_body_uses_wire_names_and_major_units() -> TestResult {
        let context = context();
        let body = serde_json::to_value(OrderBody::from(&context))?;

        assert_eq!(
            body,
            json!({
                "addressId": "addr-1",
                "cartId": "cart-1",
                "couponId": "c-1",
                "note": null,
                "useWallet": true,
                "walletDeduction": 150.0,
            })
        );

        Ok(())
    }

    #[test]
    fn confirm_body_passes_gateway_fields_through() -> TestResult {
        let context = context();
        let payment = SignedPayment {
            razorpay_order_id: "order_A1".to_string(),
            razorpay_payment_id: "pay_B2".to_string(),
            razorpay_signature: "c0ffee".to_string(),
        };

        let body = serde_json::to_value(ConfirmBody::new(&context, &payment))?;

        assert_eq!(body["cartId"], json!("cart-1"));
        assert_eq!(body["razorpay_order_id"], json!("order_A1"));
        assert_eq!(body["razorpay_payment_id"], json!("pay_B2"));
        assert_eq!(body["razorpay_signature"], json!("c0ffee"));

        Ok(())
    }

    #[test]
    fn created_order_unwraps_data() -> TestResult {
        let payload: CreatedOrderPayload = serde_json::from_value(json!({
            "success": true,
            "data": {
                "orderId": "order_A1",
                "amount": 82000,
                "currency": "INR",
                "key": "rzp_test_key",
                "user": { "name": "Asha", "email": "asha@example.com", "phone": "9999999999" },
            },
        }))?;

        let order = CreatedOrder::try_from(payload)?;

        assert_eq!(order.order_id.as_deref(), Some("order_A1"));
        assert_eq!(order.amount, Some(82_000));
        assert_eq!(order.customer.contact.as_deref(), Some("9999999999"));

        Ok(())
    }

    #[test]
    fn created_order_keeps_missing_fields_missing() -> TestResult {
        let payload: CreatedOrderPayload = serde_json::from_value(json!({
            "orderId": "order_A1",
            "currency": "INR",
        }))?;

        let order = CreatedOrder::try_from(payload)?;

        assert_eq!(order.amount, None);
        assert_eq!(order.customer, Prefill::default());

        Ok(())
    }

    #[test]
    fn refused_order_creation_carries_message() -> TestResult {
        let payload: CreatedOrderPayload = serde_json::from_value(json!({
            "success": false,
            "message": "address not serviceable",
        }))?;

        let result = CreatedOrder::try_from(payload);

        assert!(
            matches!(&result, Err(ApiError::Unsuccessful(message)) if message == "address not serviceable"),
            "expected Unsuccessful, got {result:?}"
        );

        let payload: CreatedOrderPayload = serde_json::from_value(json!({ "success": "false" }))?;

        assert!(matches!(
            CreatedOrder::try_from(payload),
            Err(ApiError::Unsuccessful(message)) if message == "no message"
        ));

        Ok(())
    }
}
