//! Gateway driven from the terminal.
//!
//! The checkout request is printed as JSON for a hosted payment page. Once the
//! customer has paid, the page's result is pasted back as a single JSON line.

use async_trait::async_trait;
use cartage_app::gateway::{GatewayCheckout, GatewayError, GatewayResponse, PaymentGateway};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Clone, Copy)]
pub(crate) struct PromptGateway;

#[async_trait]
impl PaymentGateway for PromptGateway {
    async fn open_checkout(&self, checkout: GatewayCheckout) -> Result<GatewayResponse, GatewayError> {
        let request = serde_json::to_string_pretty(&checkout)
            .map_err(|error| GatewayError::Failed(error.to_string()))?;

        println!("{request}");
        println!("paste the gateway result as JSON, or an empty line to cancel:");

        let mut line = String::new();

        let read = BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .map_err(|error| GatewayError::Failed(error.to_string()))?;

        let line = line.trim();

        if read == 0 || line.is_empty() {
            return Err(GatewayError::Dismissed);
        }

        serde_json::from_str(line)
            .map_err(|error| GatewayError::Failed(format!("unreadable gateway result: {error}")))
    }
}
