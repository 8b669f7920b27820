//! Cart store.
//!
//! Holds the last server-reported cart plus the bookkeeping the UI needs to
//! disable rows and show a loading state. Every field except the busy set and
//! the loading counter is replaced wholesale by reconciliation.

use rustc_hash::FxHashSet;

use cartage::{
    ids::CartId,
    items::{CartLineItem, LineKey},
    shipping::ShippingQuote,
};

use crate::api::CartSnapshot;

#[derive(Debug, Default)]
pub struct CartStore {
    snapshot: CartSnapshot,
    busy: FxHashSet<LineKey>,
    in_flight: usize,
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current line items.
    pub fn items(&self) -> &[CartLineItem] {
        &self.snapshot.items
    }

    /// Find the row for a product and variant.
    pub fn line(&self, key: &LineKey) -> Option<&CartLineItem> {
        self.snapshot.items.iter().find(|line| &line.key == key)
    }

    pub fn cart_id(&self) -> Option<&CartId> {
        self.snapshot.cart_id.as_ref()
    }

    pub fn shipping(&self) -> &ShippingQuote {
        &self.snapshot.shipping
    }

    pub fn platform_fee(&self) -> u64 {
        self.snapshot.platform_fee
    }

    /// Wallet redemption ceiling reported with the current cart.
    pub fn wallet_ceiling(&self) -> u64 {
        self.snapshot.wallet_ceiling
    }

    /// Replace the cart with a server snapshot.
    pub fn apply(&mut self, snapshot: CartSnapshot) {
        self.snapshot = snapshot;
    }

    /// Drop everything the server reported: no items, no fees, no cart id.
    pub fn reset(&mut self) {
        self.snapshot = CartSnapshot::default();
    }

    /// Empty the cart after a settled payment. The next reconciliation
    /// restores whatever the server still holds.
    pub fn clear(&mut self) {
        self.snapshot.items.clear();
        self.snapshot.wallet_ceiling = 0;
    }

    /// Optimistically set a row's quantity. Zero removes the row.
    ///
    /// Returns `false` if the row is not in the cart.
    pub fn patch_quantity(&mut self, key: &LineKey, quantity: u32) -> bool {
        let Some(position) = self.snapshot.items.iter().position(|line| &line.key == key) else {
            return false;
        };

        if quantity == 0 {
            self.snapshot.items.remove(position);
        } else if let Some(line) = self.snapshot.items.get_mut(position) {
            *line = line.with_quantity(quantity);
        }

        true
    }

    /// Mark a row as having a mutation in flight.
    ///
    /// Returns `false` if it already had one.
    pub fn begin_row(&mut self, key: &LineKey) -> bool {
        self.busy.insert(key.clone())
    }

    pub fn finish_row(&mut self, key: &LineKey) {
        self.busy.remove(key);
    }

    pub fn is_row_busy(&self, key: &LineKey) -> bool {
        self.busy.contains(key)
    }

    pub(crate) fn start_loading(&mut self) {
        self.in_flight = self.in_flight.saturating_add(1);
    }

    pub(crate) fn stop_loading(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Whether any reconciliation is in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }
}
