//! Cart errors.

use cartage::coupons::CouponError;
use thiserror::Error;

/// Reasons a cart action is refused before any request is made.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartError {
    /// The row already has a quantity update in flight.
    #[error("item is being updated")]
    RowBusy,

    /// The row is not in the cart.
    #[error("item is not in the cart")]
    UnknownRow,

    /// The wallet balance could not be loaded.
    #[error("wallet is unavailable")]
    WalletUnavailable,

    /// The coupon was rejected.
    #[error(transparent)]
    Coupon(#[from] CouponError),
}
