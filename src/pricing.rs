//! Pricing
//!
//! Derives the user-facing total from the current line items, applied coupon,
//! wallet state, shipping quote and platform fee. The computation is pure and
//! total: it is re-run after every input change and cannot fail.

use crate::{
    coupons::{Coupon, coupon_discount},
    items::CartLineItem,
    shipping::ShippingQuote,
    wallet::WalletState,
};

/// Everything the pricing engine reads.
#[derive(Debug, Clone, Copy)]
pub struct PricingInputs<'a> {
    /// Current line items
    pub items: &'a [CartLineItem],

    /// Applied coupon, if any
    pub coupon: Option<&'a Coupon>,

    /// Wallet balance, ceiling and toggle
    pub wallet: WalletState,

    /// Shipping quote for the selected address
    pub shipping: &'a ShippingQuote,

    /// Platform fee in minor units
    pub platform_fee: u64,
}

/// Breakdown of the amount payable. Recomputed, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PricingSnapshot {
    /// Sum of sale price times quantity
    pub total_mrp: u64,

    /// Sum of per-unit taxes times quantity
    pub tax_sum: u64,

    /// Discount from the applied coupon
    pub coupon_discount: u64,

    /// Shipping cost
    pub shipping: u64,

    /// Platform fee
    pub platform_fee: u64,

    /// Amount payable before the wallet is applied
    pub subtotal_before_wallet: u64,

    /// Amount covered by the wallet
    pub wallet_deduction: u64,

    /// Amount the customer pays
    pub total_payable: u64,
}

impl PricingSnapshot {
    /// Whether there is anything left to pay.
    pub fn is_payable(&self) -> bool {
        self.total_payable > 0
    }
}

/// Compute a pricing snapshot.
pub fn compute_snapshot(inputs: PricingInputs<'_>) -> PricingSnapshot {
    let total_mrp = inputs
        .items
        .iter()
        .fold(0u64, |acc, item| acc.saturating_add(item.sale_total()));

    let tax_sum = inputs
        .items
        .iter()
        .fold(0u64, |acc, item| acc.saturating_add(item.tax_total()));

    let coupon_discount = coupon_discount(inputs.coupon, total_mrp);

    let subtotal_before_wallet = total_mrp
        .saturating_add(tax_sum)
        .saturating_add(inputs.shipping.cost)
        .saturating_add(inputs.platform_fee)
        .saturating_sub(coupon_discount);

    let wallet_deduction = inputs.wallet.deduction(subtotal_before_wallet);

    PricingSnapshot {
        total_mrp,
        tax_sum,
        coupon_discount,
        shipping: inputs.shipping.cost,
        platform_fee: inputs.platform_fee,
        subtotal_before_wallet,
        wallet_deduction,
        total_payable: subtotal_before_wallet.saturating_sub(wallet_deduction),
    }
}
