//! Carts API

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use tracing::warn;

use cartage::{
    amounts::{normalize_amount, normalize_quantity},
    ids::{AddressId, CartId, CouponId, LineId, ProductId, VariantId},
    items::{CartLineItem, LineKey, TaxComponents},
    shipping::ShippingQuote,
};

use super::{ApiError, lenient};

/// Selection parameters sent with every cart fetch.
///
/// Built by value from the current selections right before the request is
/// issued, so a newer toggle can never leak into an older request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartQuery {
    pub address_id: Option<AddressId>,
    pub coupon_id: Option<CouponId>,
    pub use_wallet: bool,

    /// Wallet balance in minor units
    pub wallet_amount: u64,
}

/// The server's authoritative view of the cart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartSnapshot {
    pub cart_id: Option<CartId>,
    pub items: Vec<CartLineItem>,
    pub shipping: ShippingQuote,
    pub platform_fee: u64,

    /// Wallet redemption ceiling for this cart
    pub wallet_ceiling: u64,
}

/// A quantity change for one row. Zero deletes the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartMutation {
    pub key: LineKey,
    pub quantity: u32,
}

#[automock]
#[async_trait]
pub trait CartsApi: Send + Sync {
    /// Fetch the cart as priced for the given selections.
    async fn fetch_cart(&self, query: CartQuery) -> Result<CartSnapshot, ApiError>;

    /// Set the quantity of a row, deleting it at zero.
    async fn update_item(&self, mutation: CartMutation) -> Result<(), ApiError>;
}

/// `data` section of the cart response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartPayload {
    #[serde(rename = "_id")]
    id: Option<String>,

    #[serde(default)]
    items: Vec<LinePayload>,

    shipping_details: Option<ShippingPayload>,

    #[serde(default, deserialize_with = "lenient::number")]
    wallet_discount: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    platform_fee: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinePayload {
    #[serde(rename = "_id")]
    id: Option<String>,

    product_id: Option<String>,
    variant_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::number")]
    quantity: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    mrp: Option<f64>,

    #[serde(default, alias = "price", deserialize_with = "lenient::number")]
    sale_price: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    cgst: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    sgst: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    cess: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    igst: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    total: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShippingPayload {
    #[serde(default, deserialize_with = "lenient::number")]
    total_cost: Option<f64>,

    estimated_date: Option<String>,
}

impl From<CartPayload> for CartSnapshot {
    fn from(payload: CartPayload) -> Self {
        let items = payload
            .items
            .into_iter()
            .filter_map(LinePayload::into_line)
            .collect();

        let shipping = payload.shipping_details.map_or_else(ShippingQuote::free, |details| {
            ShippingQuote::new(normalize_amount(details.total_cost), details.estimated_date)
        });

        CartSnapshot {
            cart_id: payload.id.map(CartId::new),
            items,
            shipping,
            platform_fee: normalize_amount(payload.platform_fee),
            wallet_ceiling: normalize_amount(payload.wallet_discount),
        }
    }
}

impl LinePayload {
    /// Lines without a product or a usable quantity are dropped.
    fn into_line(self) -> Option<CartLineItem> {
        let Some(product) = self.product_id else {
            warn!(line = ?self.id, "dropping cart line without a product id");
            return None;
        };

        let quantity = normalize_quantity(self.quantity);

        if quantity == 0 {
            warn!(%product, "dropping cart line with no usable quantity");
            return None;
        }

        let unit_sale_price = normalize_amount(self.sale_price);

        Some(CartLineItem {
            id: LineId::new(self.id.unwrap_or_else(|| product.clone())),
            key: LineKey::new(ProductId::new(product), self.variant_id.map(VariantId::new)),
            quantity,
            unit_mrp: normalize_amount(self.mrp),
            unit_sale_price,
            tax: TaxComponents {
                cgst: normalize_amount(self.cgst),
                sgst: normalize_amount(self.sgst),
                cess: normalize_amount(self.cess),
                igst: normalize_amount(self.igst),
            },
            line_total: self.total.map_or_else(
                || unit_sale_price.saturating_mul(u64::from(quantity)),
                |total| normalize_amount(Some(total)),
            ),
        })
    }
}

/// Body of the cart mutation request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MutationBody<'a> {
    product_id: &'a ProductId,
    variant_id: Option<&'a VariantId>,
    quantity: u32,
}

impl<'a> From<&'a CartMutation> for MutationBody<'a> {
    fn from(mutation: &'a CartMutation) -> Self {
        Self {
            product_id: &mutation.key.product,
            variant_id: mutation.key.variant.as_ref(),
            quantity: mutation.quantity,
        }
    }
}
