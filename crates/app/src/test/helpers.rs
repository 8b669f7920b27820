//! Test Helpers

use rust_decimal::Decimal;

use cartage::{
    coupons::Coupon,
    ids::{CouponId, LineId, ProductId},
    items::{CartLineItem, LineKey, TaxComponents},
};

pub(crate) fn key(product: &str) -> LineKey {
    LineKey::new(ProductId::new(product), None)
}

/// A line with `tax` split evenly between CGST and SGST.
pub(crate) fn line(product: &str, quantity: u32, unit_sale_price: u64, tax: u64) -> CartLineItem {
    CartLineItem {
        id: LineId::new(format!("line-{product}")),
        key: key(product),
        quantity,
        unit_mrp: unit_sale_price,
        unit_sale_price,
        tax: TaxComponents {
            cgst: tax / 2,
            sgst: tax - tax / 2,
            cess: 0,
            igst: 0,
        },
        line_total: unit_sale_price * u64::from(quantity),
    }
}

pub(crate) fn flat_coupon(id: &str, code: &str, amount: u64, min_purchase: u64) -> Coupon {
    Coupon::fixed(CouponId::new(id), code, amount, min_purchase)
}

pub(crate) fn percent_coupon(id: &str, code: &str, points: i64, cap: Option<u64>) -> Coupon {
    Coupon::percentage(CouponId::new(id), code, Decimal::from(points), cap, 0)
}
