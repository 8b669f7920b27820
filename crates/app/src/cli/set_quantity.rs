use cartage::{
    ids::{ProductId, VariantId},
    items::LineKey,
};
use cartage_app::{carts::Reconciled, config::SetQuantityArgs, session::CartSession};

use super::quote::print_breakdown;

pub(crate) async fn run(session: &CartSession, args: SetQuantityArgs) -> Result<(), String> {
    session.load_wallet().await;

    if session.refresh().await == Reconciled::Reset {
        return Err("failed to load the cart".to_string());
    }

    let key = LineKey::new(ProductId::new(args.product), args.variant.map(VariantId::new));

    session
        .set_quantity(&key, args.quantity)
        .await
        .map_err(|error| format!("failed to update the cart: {error}"))?;

    print_breakdown(session)
}
