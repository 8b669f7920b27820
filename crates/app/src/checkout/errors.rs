//! Checkout errors.

use thiserror::Error;

use crate::{api::ApiError, gateway::GatewayError};

/// Checkout error variants. The display text is shown to the customer.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The customer is signed out.
    #[error("Please sign in to continue")]
    NotAuthenticated,

    /// Nothing to pay for.
    #[error("Cart empty")]
    CartEmpty,

    /// The cart has no server id yet.
    #[error("Cart is not ready yet")]
    MissingCart,

    /// No delivery address selected.
    #[error("Please select a delivery address")]
    MissingAddress,

    /// A payment leg is already in flight.
    #[error("A payment is already in progress")]
    InProgress,

    /// The previous attempt failed and has not been dismissed.
    #[error("Dismiss the previous payment attempt first")]
    NotIdle,

    /// Order creation succeeded but lacked an id, amount or currency.
    #[error("Invalid order response")]
    InvalidOrderResponse,

    /// The gateway result lacked one of its signed fields.
    #[error("Incomplete gateway response")]
    IncompleteGatewayResponse,

    /// Order creation failed.
    #[error("Could not create the order")]
    CreateOrder(#[source] ApiError),

    /// The gateway ended without a result.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Order confirmation failed.
    #[error("Could not confirm the payment")]
    ConfirmOrder(#[source] ApiError),
}

impl CheckoutError {
    /// Whether the error was raised before any request was made.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NotAuthenticated | Self::CartEmpty | Self::MissingCart | Self::MissingAddress
        )
    }
}
