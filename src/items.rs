//! Items

use crate::ids::{LineId, ProductId, VariantId};

/// Per-unit tax components charged on a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaxComponents {
    /// Central GST
    pub cgst: u64,

    /// State GST
    pub sgst: u64,

    /// Compensation cess
    pub cess: u64,

    /// Integrated GST
    pub igst: u64,
}

impl TaxComponents {
    /// Sum of all components for a single unit.
    pub fn per_unit(&self) -> u64 {
        self.cgst
            .saturating_add(self.sgst)
            .saturating_add(self.cess)
            .saturating_add(self.igst)
    }
}

/// Identifies a cart row for mutations: the product and its optional variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    /// Product
    pub product: ProductId,

    /// Variant, when the product has variants
    pub variant: Option<VariantId>,
}

impl LineKey {
    /// Create a key for a product with an optional variant.
    pub fn new(product: ProductId, variant: Option<VariantId>) -> Self {
        Self { product, variant }
    }
}

/// A single line in the cart as last reported by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineItem {
    /// Server line id
    pub id: LineId,

    /// Product and variant
    pub key: LineKey,

    /// Number of units, at least one
    pub quantity: u32,

    /// Unit MRP in minor units
    pub unit_mrp: u64,

    /// Unit sale price in minor units
    pub unit_sale_price: u64,

    /// Per-unit taxes
    pub tax: TaxComponents,

    /// Line total as reported by the server
    pub line_total: u64,
}

impl CartLineItem {
    /// Sale price multiplied by quantity.
    pub fn sale_total(&self) -> u64 {
        self.unit_sale_price.saturating_mul(u64::from(self.quantity))
    }

    /// Tax for every unit on this line.
    pub fn tax_total(&self) -> u64 {
        self.tax.per_unit().saturating_mul(u64::from(self.quantity))
    }

    /// Optimistic copy of this line at a new quantity.
    ///
    /// The line total is recomputed locally and will be overwritten by the next
    /// successful reconciliation.
    #[must_use]
    pub fn with_quantity(&self, quantity: u32) -> Self {
        let mut line = self.clone();

        line.quantity = quantity;
        line.line_total = line.sale_total();

        line
    }
}
