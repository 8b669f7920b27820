//! Cartage
//!
//! Cartage is the pricing core of a storefront cart: it turns server-reported
//! line items, an applied coupon, a wallet balance, a shipping quote and a
//! platform fee into a single, always-renderable amount payable.

pub mod amounts;
pub mod breakdown;
pub mod coupons;
pub mod ids;
pub mod items;
pub mod prelude;
pub mod pricing;
pub mod shipping;
pub mod wallet;
