use cartage::amounts::to_money;
use cartage_app::{config::PayArgs, session::CartSession};

use super::quote::{prepare, print_breakdown};

pub(crate) async fn run(session: &CartSession, args: PayArgs) -> Result<(), String> {
    prepare(session, &args.selections).await?;
    print_breakdown(session)?;

    let settlement = session
        .pay(args.note)
        .await
        .map_err(|error| format!("payment failed: {error}"))?;

    println!("order_id: {}", settlement.order_id);
    println!("payment_id: {}", settlement.payment_id);
    println!("amount: {}", to_money(settlement.amount));

    if let Some(confirmed) = settlement.confirmed_order_id {
        println!("store_order_id: {confirmed}");
    }

    println!("settled_at: {}", settlement.settled_at);

    Ok(())
}
