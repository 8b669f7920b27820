//! Coupons
//!
//! Coupons are reference data fetched once per session. Selecting one is a
//! client intent; the discount it grants is recomputed from the current MRP on
//! every pricing pass.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

use crate::ids::CouponId;

/// Reasons a coupon cannot be applied.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CouponError {
    /// The entered code matches no fetched coupon.
    #[error("Invalid Coupon")]
    InvalidCoupon,

    /// The cart MRP is below the coupon's threshold.
    #[error("Minimum purchase not met")]
    MinimumPurchaseNotMet {
        /// Threshold in minor units
        required: u64,

        /// Current MRP in minor units
        current: u64,
    },
}

/// How a coupon reduces the cart total.
#[derive(Debug, Clone, PartialEq)]
pub enum CouponDiscount {
    /// A flat amount off, in minor units.
    Fixed(u64),

    /// A percentage of the MRP, optionally capped.
    Percentage {
        /// Percent points, between 0 and 100
        points: Decimal,

        /// Largest discount in minor units, if any
        cap: Option<u64>,
    },
}

/// A coupon as offered by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon {
    /// Server id
    pub id: CouponId,

    /// Code a customer can type in
    pub code: String,

    /// Discount rule
    pub discount: CouponDiscount,

    /// Smallest MRP, in minor units, the coupon applies to
    pub min_purchase: u64,
}

impl Coupon {
    /// Create a flat-amount coupon.
    pub fn fixed(id: CouponId, code: impl Into<String>, amount: u64, min_purchase: u64) -> Self {
        Self {
            id,
            code: code.into(),
            discount: CouponDiscount::Fixed(amount),
            min_purchase,
        }
    }

    /// Create a percentage coupon. Points outside `0..=100` are clamped.
    pub fn percentage(
        id: CouponId,
        code: impl Into<String>,
        points: Decimal,
        cap: Option<u64>,
        min_purchase: u64,
    ) -> Self {
        Self {
            id,
            code: code.into(),
            discount: CouponDiscount::Percentage {
                points: points.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED),
                cap,
            },
            min_purchase,
        }
    }

    /// Discount granted against the given MRP, ignoring the purchase threshold.
    pub fn discount_on(&self, total_mrp: u64) -> u64 {
        match &self.discount {
            CouponDiscount::Fixed(amount) => *amount,
            CouponDiscount::Percentage { points, cap } => {
                let uncapped = percent_of_minor(*points, total_mrp);

                cap.map_or(uncapped, |cap| uncapped.min(cap))
            }
        }
    }
}

/// Check a coupon against the current MRP.
///
/// # Errors
///
/// Returns [`CouponError::MinimumPurchaseNotMet`] if `current_mrp` is below the
/// coupon's minimum purchase.
pub fn validate(coupon: &Coupon, current_mrp: u64) -> Result<(), CouponError> {
    if current_mrp >= coupon.min_purchase {
        Ok(())
    } else {
        Err(CouponError::MinimumPurchaseNotMet {
            required: coupon.min_purchase,
            current: current_mrp,
        })
    }
}

/// Discount for an optional applied coupon.
///
/// Zero when nothing is applied or the MRP is under the coupon's threshold.
pub fn coupon_discount(coupon: Option<&Coupon>, total_mrp: u64) -> u64 {
    coupon
        .filter(|coupon| validate(coupon, total_mrp).is_ok())
        .map_or(0, |coupon| coupon.discount_on(total_mrp))
}

/// Calculate `points` percent of a minor unit amount, rounded half away from zero.
fn percent_of_minor(points: Decimal, minor: u64) -> u64 {
    let percent = Percentage::from(points / Decimal::ONE_HUNDRED);
    let applied: Decimal = percent * Decimal::from(minor);

    applied
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(0)
}

/// The coupons fetched for this session.
#[derive(Debug, Clone, Default)]
pub struct CouponBook {
    coupons: Vec<Coupon>,
}

impl CouponBook {
    /// Create a book from fetched coupons.
    pub fn new(coupons: impl Into<Vec<Coupon>>) -> Self {
        Self {
            coupons: coupons.into(),
        }
    }

    /// Look a coupon up by id.
    pub fn get(&self, id: &CouponId) -> Option<&Coupon> {
        self.coupons.iter().find(|coupon| &coupon.id == id)
    }

    /// Find a coupon by a typed-in code.
    ///
    /// The entry is trimmed and upper-cased, then compared exactly against the
    /// upper-cased fetched codes.
    pub fn find_code(&self, entered: &str) -> Option<&Coupon> {
        let normalized = entered.trim().to_uppercase();

        self.coupons
            .iter()
            .find(|coupon| coupon.code.to_uppercase() == normalized)
    }

    /// Resolve a typed-in code and check it against the current MRP.
    ///
    /// # Errors
    ///
    /// - [`CouponError::InvalidCoupon`]: no fetched coupon has this code.
    /// - [`CouponError::MinimumPurchaseNotMet`]: the code exists but the MRP is too low.
    pub fn redeem_code(&self, entered: &str, current_mrp: u64) -> Result<&Coupon, CouponError> {
        let coupon = self.find_code(entered).ok_or(CouponError::InvalidCoupon)?;

        validate(coupon, current_mrp)?;

        Ok(coupon)
    }

    /// Iterate over the coupons.
    pub fn iter(&self) -> impl Iterator<Item = &Coupon> {
        self.coupons.iter()
    }

    /// Number of coupons.
    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    /// Whether no coupons were fetched.
    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn book() -> CouponBook {
        CouponBook::new([
            Coupon::fixed(CouponId::new("c-1"), "FLAT100", 10_000, 50_000),
            Coupon::percentage(
                CouponId::new("c-2"),
                "TENOFF",
                Decimal::from(10),
                Some(5_000),
                0,
            ),
        ])
    }

    #[test]
    fn fixed_discount_is_the_face_value() {
        let coupon = Coupon::fixed(CouponId::new("c"), "FLAT", 10_000, 0);

        assert_eq!(coupon.discount_on(100_000), 10_000);
    }

    #[test]
    fn percentage_discount_respects_cap() {
        let capped = Coupon::percentage(CouponId::new("c"), "P", Decimal::from(10), Some(5_000), 0);
        let uncapped = Coupon::percentage(CouponId::new("c"), "P", Decimal::from(10), None, 0);

        assert_eq!(capped.discount_on(100_000), 5_000);
        assert_eq!(uncapped.discount_on(100_000), 10_000);
    }

    #[test]
    fn percentage_discount_rounds_half_away_from_zero() {
        let coupon = Coupon::percentage(CouponId::new("c"), "P", Decimal::new(125, 1), None, 0);

        // 12.5% of 1.01 is 0.12625
        assert_eq!(coupon.discount_on(101), 13);
    }

    #[test]
    fn percentage_points_are_clamped() {
        let coupon = Coupon::percentage(CouponId::new("c"), "P", Decimal::from(150), None, 0);

        assert_eq!(coupon.discount_on(20_000), 20_000);
    }

    #[test]
    fn validate_enforces_minimum_purchase() {
        let coupon = Coupon::fixed(CouponId::new("c"), "FLAT", 10_000, 50_000);

        assert_eq!(validate(&coupon, 50_000), Ok(()));
        assert_eq!(
            validate(&coupon, 49_999),
            Err(CouponError::MinimumPurchaseNotMet {
                required: 50_000,
                current: 49_999,
            })
        );
    }

    #[test]
    fn discount_is_zero_below_threshold_or_without_coupon() {
        let coupon = Coupon::fixed(CouponId::new("c"), "FLAT", 10_000, 50_000);

        assert_eq!(coupon_discount(Some(&coupon), 40_000), 0);
        assert_eq!(coupon_discount(None, 40_000), 0);
        assert_eq!(coupon_discount(Some(&coupon), 60_000), 10_000);
    }

    #[test]
    fn codes_are_upper_cased_before_matching() -> TestResult {
        let book = book();
        let coupon = book.find_code("  tenoff ").ok_or("expected a match")?;

        assert_eq!(coupon.id, CouponId::new("c-2"));

        Ok(())
    }

    #[test]
    fn unknown_code_is_invalid() {
        assert_eq!(
            book().redeem_code("NOPE", 1_000_000),
            Err(CouponError::InvalidCoupon)
        );
    }

    #[test]
    fn known_code_under_threshold_is_distinct_error() {
        let book = book();
        let result = book.redeem_code("flat100", 10_000);

        assert!(
            matches!(result, Err(CouponError::MinimumPurchaseNotMet { .. })),
            "expected MinimumPurchaseNotMet, got {result:?}"
        );
    }

    #[test]
    fn lower_case_fetched_codes_match_any_casing() -> TestResult {
        let book = CouponBook::new([Coupon::fixed(CouponId::new("c-3"), "welcome10", 1_000, 0)]);

        for entered in ["welcome10", "WELCOME10", " Welcome10 "] {
            let coupon = book.redeem_code(entered, 100_000)?;

            assert_eq!(coupon.id, CouponId::new("c-3"));
        }

        assert_eq!(book.redeem_code("welcome1", 100_000), Err(CouponError::InvalidCoupon));

        Ok(())
    }

    #[test]
    fn empty_book_rejects_every_code() {
        let book = CouponBook::default();

        assert!(book.is_empty());
        assert_eq!(book.redeem_code("FLAT100", 0), Err(CouponError::InvalidCoupon));
    }

    #[test]
    fn coupons_are_found_by_id() {
        let book = book();

        assert_eq!(book.len(), 2);
        assert!(book.get(&CouponId::new("c-1")).is_some());
        assert!(book.get(&CouponId::new("c-9")).is_none());
    }
}
