//! Cartage prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    amounts::{CURRENCY, normalize_amount, normalize_quantity, to_major, to_money},
    breakdown::{Breakdown, BreakdownError},
    coupons::{Coupon, CouponBook, CouponDiscount, CouponError, coupon_discount, validate},
    ids::{AddressId, CartId, CouponId, LineId, ProductId, TypedId, VariantId},
    items::{CartLineItem, LineKey, TaxComponents},
    pricing::{PricingInputs, PricingSnapshot, compute_snapshot},
    shipping::ShippingQuote,
    wallet::WalletState,
};
