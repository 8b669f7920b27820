//! Checkout

pub mod errors;
pub mod orchestrator;

pub use errors::CheckoutError;
pub use orchestrator::*;
