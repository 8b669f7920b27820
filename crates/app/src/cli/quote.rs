use std::io;

use cartage::{breakdown::Breakdown, ids::AddressId};
use cartage_app::{
    carts::Reconciled,
    config::SelectionArgs,
    session::{CartSession, WalletView},
};

pub(crate) async fn run(session: &CartSession, args: SelectionArgs) -> Result<(), String> {
    prepare(session, &args).await?;

    print_breakdown(session)
}

/// Load the cart and apply the requested selections, one action at a time.
pub(super) async fn prepare(session: &CartSession, args: &SelectionArgs) -> Result<(), String> {
    if session.load_wallet().await == WalletView::Hidden && args.use_wallet {
        return Err("wallet balance is unavailable".to_string());
    }

    if session.refresh().await == Reconciled::Reset {
        return Err("failed to load the cart".to_string());
    }

    if let Some(address) = &args.address {
        session.change_address(AddressId::new(address.as_str())).await;
    }

    if let Some(code) = &args.coupon {
        session
            .load_coupons()
            .await
            .map_err(|error| format!("failed to load coupons: {error}"))?;

        session
            .apply_coupon_code(code)
            .await
            .map_err(|error| format!("coupon {code}: {error}"))?;
    }

    if args.use_wallet {
        session
            .toggle_wallet()
            .await
            .map_err(|error| format!("failed to use wallet: {error}"))?;
    }

    Ok(())
}

pub(super) fn print_breakdown(session: &CartSession) -> Result<(), String> {
    let items = session.items();
    let pricing = session.pricing();
    let delivery = session.estimated_delivery();

    Breakdown::new(&items, &pricing)
        .with_estimated_delivery(delivery.as_deref())
        .write_to(io::stdout().lock())
        .map_err(|error| format!("failed to print breakdown: {error}"))
}
