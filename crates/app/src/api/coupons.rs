//! Coupons API

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use serde::Deserialize;
use tracing::warn;

use cartage::{amounts::normalize_amount, coupons::Coupon, ids::CouponId};

use super::{ApiError, lenient};

#[automock]
#[async_trait]
pub trait CouponsApi: Send + Sync {
    /// List the coupons on offer.
    async fn list_coupons(&self) -> Result<Vec<Coupon>, ApiError>;
}

/// `data` section of the coupon list response, itself wrapping `data`.
#[derive(Debug, Deserialize)]
pub(crate) struct CouponListPayload {
    #[serde(default)]
    data: Vec<CouponPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CouponPayload {
    #[serde(rename = "_id")]
    id: String,

    #[serde(default)]
    code: Option<String>,

    discount_type: String,

    #[serde(default, deserialize_with = "lenient::number")]
    discount_value: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    max_discount: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    min_purchase: Option<f64>,
}

impl CouponListPayload {
    pub(crate) fn into_coupons(self) -> Vec<Coupon> {
        self.data
            .into_iter()
            .filter_map(CouponPayload::into_coupon)
            .collect()
    }
}

impl CouponPayload {
    /// Coupons without a code or with an unknown discount type are skipped.
    fn into_coupon(self) -> Option<Coupon> {
        let id = CouponId::new(self.id);

        let Some(code) = self.code.filter(|code| !code.trim().is_empty()) else {
            warn!(coupon = %id, "skipping coupon without a code");

            return None;
        };

        let min_purchase = normalize_amount(self.min_purchase);

        match self.discount_type.trim().to_ascii_lowercase().as_str() {
            "fixed" => Some(Coupon::fixed(
                id,
                code,
                normalize_amount(self.discount_value),
                min_purchase,
            )),
            "percentage" => {
                let points = self
                    .discount_value
                    .and_then(Decimal::from_f64)
                    .unwrap_or(Decimal::ZERO);

                let cap = self.max_discount.map(|cap| normalize_amount(Some(cap)));

                Some(Coupon::percentage(id, code, points, cap, min_purchase))
            }
            other => {
                warn!(coupon = %id, discount_type = other, "skipping coupon with unknown discount type");

                None
            }
        }
    }
}
