//! Shipping

/// Shipping cost and delivery estimate quoted by the server for the current
/// address and cart. Never computed locally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingQuote {
    /// Cost in minor units
    pub cost: u64,

    /// Human readable delivery estimate
    pub estimated_delivery: Option<String>,
}

impl ShippingQuote {
    /// Create a quote.
    pub fn new(cost: u64, estimated_delivery: Option<String>) -> Self {
        Self {
            cost,
            estimated_delivery,
        }
    }

    /// A free quote with no estimate.
    pub fn free() -> Self {
        Self::default()
    }
}
