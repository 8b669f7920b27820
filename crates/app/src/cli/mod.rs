use std::sync::Arc;

use cartage_app::{
    config::{AppConfig, Command},
    context::AppContext,
    session::CartSession,
};

mod coupons;
mod pay;
mod prompt;
mod quote;
mod set_quantity;

pub(crate) async fn run(config: AppConfig) -> Result<(), String> {
    let context = AppContext::from_api_config(
        config.api.into_client_config(),
        Arc::new(prompt::PromptGateway),
    )
    .map_err(|error| format!("failed to start: {error}"))?;

    let session = CartSession::new(&context);

    match config.command {
        Command::Quote(args) => quote::run(&session, args).await,
        Command::Coupons => coupons::run(&session).await,
        Command::SetQuantity(args) => set_quantity::run(&session, args).await,
        Command::Pay(args) => pay::run(&session, args).await,
    }
}
