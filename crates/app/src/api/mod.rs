//! Commerce API
//!
//! Boundary to the remote commerce backend, split by concern. Each concern is a
//! trait so the cart and checkout logic can run against mocks.

mod carts;
mod coupons;
mod envelope;
mod errors;
pub mod http;
mod lenient;
mod orders;
mod wallet;

pub use carts::*;
pub use coupons::*;
pub use errors::ApiError;
pub use http::{CommerceApiConfig, HttpCommerceClient};
pub use orders::*;
pub use wallet::*;
