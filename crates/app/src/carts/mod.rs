//! Carts

pub mod errors;
pub mod reconcile;
pub mod store;

pub use errors::CartError;
pub use reconcile::*;
pub use store::CartStore;
