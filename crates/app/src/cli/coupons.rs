use cartage::{amounts::to_money, coupons::CouponDiscount};
use cartage_app::session::CartSession;

pub(crate) async fn run(session: &CartSession) -> Result<(), String> {
    session
        .load_coupons()
        .await
        .map_err(|error| format!("failed to load coupons: {error}"))?;

    let coupons = session.coupons();

    if coupons.is_empty() {
        println!("no coupons on offer");
        return Ok(());
    }

    for coupon in coupons {
        println!("code: {}", coupon.code);
        println!("coupon_id: {}", coupon.id);

        match coupon.discount {
            CouponDiscount::Fixed(amount) => println!("discount: {}", to_money(amount)),
            CouponDiscount::Percentage { points, cap } => println!(
                "discount: {points}%{}",
                cap.map_or_else(String::new, |cap| format!(" up to {}", to_money(cap)))
            ),
        }

        println!("min_purchase: {}", to_money(coupon.min_purchase));
        println!();
    }

    Ok(())
}
