//! Cartage application layer: API clients, cart reconciliation, checkout and
//! the session that ties them together.

pub mod api;
pub mod carts;
pub mod checkout;
pub mod config;
pub mod context;
pub mod gateway;
pub mod observability;
pub mod session;

#[cfg(test)]
mod test;
