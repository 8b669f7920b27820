//! Cart reconciliation.
//!
//! Every user action that changes pricing inputs refetches the cart. Fetches
//! may resolve in any order, so each one carries a [`Ticket`] and only the
//! most recently issued ticket may write to the store.

use std::{
    fmt,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use tracing::{debug, warn};

use crate::api::{ApiError, CartQuery, CartSnapshot, CartsApi};

use super::CartStore;

/// Issue number of a reconciliation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Monotonic generation counter. The last issued ticket wins.
#[derive(Debug, Default)]
pub struct Generation(AtomicU64);

impl Generation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket newer than every ticket issued before it.
    pub fn issue(&self) -> Ticket {
        Ticket(self.0.fetch_add(1, Ordering::SeqCst).saturating_add(1))
    }

    /// Whether no later ticket has been issued.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.0.load(Ordering::SeqCst) == ticket.0
    }
}

/// What a completed reconciliation did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// The server snapshot replaced the cart.
    Applied,

    /// A newer request was issued meanwhile; the result was discarded.
    Stale,

    /// The fetch failed and the cart was reset to empty.
    Reset,
}

/// Lock a cart store, recovering from poisoning.
pub(crate) fn lock(store: &Mutex<CartStore>) -> MutexGuard<'_, CartStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fetches the cart and applies only the latest response.
#[derive(Clone)]
pub struct ReconciliationClient {
    api: Arc<dyn CartsApi>,
    generation: Arc<Generation>,
}

impl fmt::Debug for ReconciliationClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReconciliationClient")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl ReconciliationClient {
    #[must_use]
    pub fn new(api: Arc<dyn CartsApi>) -> Self {
        Self {
            api,
            generation: Arc::new(Generation::new()),
        }
    }

    /// Fetch the cart for `query` and apply it if still current.
    pub async fn reconcile(&self, store: &Mutex<CartStore>, query: CartQuery) -> Reconciled {
        let ticket = self.begin(store);
        let result = self.api.fetch_cart(query).await;

        self.complete(store, ticket, result)
    }

    /// Issue a ticket and mark the store as loading.
    pub fn begin(&self, store: &Mutex<CartStore>) -> Ticket {
        let ticket = self.generation.issue();

        lock(store).start_loading();

        ticket
    }

    /// Apply a fetch result issued under `ticket`.
    pub fn complete(
        &self,
        store: &Mutex<CartStore>,
        ticket: Ticket,
        result: Result<CartSnapshot, ApiError>,
    ) -> Reconciled {
        let mut store = lock(store);

        store.stop_loading();

        if !self.generation.is_current(ticket) {
            debug!(?ticket, failed = result.is_err(), "discarding stale cart response");

            return Reconciled::Stale;
        }

        match result {
            Ok(snapshot) => {
                debug!(?ticket, items = snapshot.items.len(), "applying cart snapshot");

                store.apply(snapshot);

                Reconciled::Applied
            }
            Err(error) => {
                warn!(?ticket, %error, "cart reconciliation failed, resetting cart");

                store.reset();

                Reconciled::Reset
            }
        }
    }
}
