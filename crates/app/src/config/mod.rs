//! CLI configuration module

use clap::{Args, Parser, Subcommand};

use crate::config::{api::ApiConfig, logging::LoggingConfig};

pub mod api;
pub mod logging;

pub use logging::LogFormat;

/// Cartage command line configuration
#[derive(Debug, Parser)]
#[command(name = "cartage", about = "Cartage storefront cart CLI", long_about = None)]
pub struct AppConfig {
    /// Commerce API settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    pub command: Command,
}

impl AppConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Price the cart with the given selections and print the breakdown.
    Quote(SelectionArgs),

    /// List the coupons on offer.
    Coupons,

    /// Set the quantity of a product in the cart.
    SetQuantity(SetQuantityArgs),

    /// Pay for the cart through the hosted gateway.
    Pay(PayArgs),
}

/// Selections applied before pricing.
#[derive(Debug, Clone, Args)]
pub struct SelectionArgs {
    /// Delivery address id
    #[arg(long)]
    pub address: Option<String>,

    /// Coupon code
    #[arg(long)]
    pub coupon: Option<String>,

    /// Pay part of the total from the wallet
    #[arg(long)]
    pub use_wallet: bool,
}

#[derive(Debug, Args)]
pub struct SetQuantityArgs {
    /// Product id
    #[arg(long)]
    pub product: String,

    /// Variant id, for products with variants
    #[arg(long)]
    pub variant: Option<String>,

    /// New quantity; zero removes the product
    #[arg(long)]
    pub quantity: u32,
}

#[derive(Debug, Args)]
pub struct PayArgs {
    #[command(flatten)]
    pub selections: SelectionArgs,

    /// Delivery note attached to the order
    #[arg(long)]
    pub note: Option<String>,
}
