//! Checkout orchestrator.
//!
//! Drives a payment through three legs: order creation, the gateway, and
//! order confirmation. Each leg is awaited in turn and any failure parks the
//! state machine in [`CheckoutState::Failed`] until the customer dismisses it.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use jiff::Timestamp;
use tracing::{debug, error, info, warn};

use cartage::ids::{AddressId, CartId, CouponId};

use crate::{
    api::{CreatedOrder, OrderContext, OrdersApi},
    gateway::{GatewayCheckout, PaymentGateway},
};

use super::CheckoutError;

/// Where a checkout attempt currently stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckoutState {
    #[default]
    Idle,
    AwaitingOrderCreation,
    AwaitingGatewayResult,
    AwaitingOrderConfirmation,
    Settled,
    Failed {
        message: String,
    },
}

impl CheckoutState {
    /// Whether a leg is in flight.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            Self::AwaitingOrderCreation
                | Self::AwaitingGatewayResult
                | Self::AwaitingOrderConfirmation
        )
    }
}

/// Cart state captured when the customer presses pay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub total_payable: u64,
    pub cart_id: Option<CartId>,
    pub address_id: Option<AddressId>,
    pub coupon_id: Option<CouponId>,
    pub use_wallet: bool,
    pub wallet_deduction: u64,
    pub note: Option<String>,
}

/// A checkout that passed every precondition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub context: OrderContext,
    pub total_payable: u64,
    pub started_at: Timestamp,
}

/// A confirmed payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// Gateway order id
    pub order_id: String,

    /// Gateway payment id
    pub payment_id: String,

    /// Amount collected, in the gateway's minor units
    pub amount: u64,

    pub currency: String,

    /// Store order id, when the confirmation returned one
    pub confirmed_order_id: Option<String>,

    pub started_at: Timestamp,
    pub settled_at: Timestamp,
}

pub struct CheckoutOrchestrator {
    orders: Arc<dyn OrdersApi>,
    gateway: Arc<dyn PaymentGateway>,
    state: Mutex<CheckoutState>,
}

impl fmt::Debug for CheckoutOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutOrchestrator")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl CheckoutOrchestrator {
    #[must_use]
    pub fn new(orders: Arc<dyn OrdersApi>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            orders,
            gateway,
            state: Mutex::new(CheckoutState::Idle),
        }
    }

    pub fn state(&self) -> CheckoutState {
        self.lock().clone()
    }

    /// Return a failed or settled checkout to idle.
    ///
    /// Returns `false` if there was nothing to dismiss.
    pub fn dismiss(&self) -> bool {
        let mut state = self.lock();

        if matches!(*state, CheckoutState::Failed { .. } | CheckoutState::Settled) {
            *state = CheckoutState::Idle;

            return true;
        }

        false
    }

    /// Pay for the cart described by `request`.
    ///
    /// # Errors
    ///
    /// Precondition failures and refusals leave the state untouched. Every
    /// other error moves the state to [`CheckoutState::Failed`].
    pub async fn pay(&self, request: CheckoutRequest) -> Result<Settlement, CheckoutError> {
        let session = self.start(request)?;

        match self.run(session).await {
            Ok(settlement) => {
                info!(
                    order_id = %settlement.order_id,
                    amount = settlement.amount,
                    "payment settled"
                );

                self.transition(CheckoutState::Settled);

                Ok(settlement)
            }
            Err(error) => {
                warn!(%error, "checkout failed");

                self.transition(CheckoutState::Failed {
                    message: error.to_string(),
                });

                Err(error)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, CheckoutState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, next: CheckoutState) {
        let mut state = self.lock();

        debug!(from = ?*state, to = ?next, "checkout transition");

        *state = next;
    }

    /// Check the state and preconditions, then claim the state machine.
    fn start(&self, request: CheckoutRequest) -> Result<CheckoutSession, CheckoutError> {
        let mut state = self.lock();

        if state.is_in_flight() {
            return Err(CheckoutError::InProgress);
        }

        if matches!(*state, CheckoutState::Failed { .. }) {
            return Err(CheckoutError::NotIdle);
        }

        // A settled checkout starts over.
        *state = CheckoutState::Idle;

        if !self.orders.is_authenticated() {
            return Err(CheckoutError::NotAuthenticated);
        }

        if request.total_payable == 0 {
            return Err(CheckoutError::CartEmpty);
        }

        let Some(cart_id) = request.cart_id else {
            error!("checkout requested for a payable cart without a cart id");

            return Err(CheckoutError::MissingCart);
        };

        let Some(address_id) = request.address_id else {
            return Err(CheckoutError::MissingAddress);
        };

        *state = CheckoutState::AwaitingOrderCreation;

        Ok(CheckoutSession {
            context: OrderContext {
                cart_id,
                address_id,
                coupon_id: request.coupon_id,
                use_wallet: request.use_wallet,
                wallet_deduction: request.wallet_deduction,
                note: request.note,
            },
            total_payable: request.total_payable,
            started_at: Timestamp::now(),
        })
    }

    async fn run(&self, session: CheckoutSession) -> Result<Settlement, CheckoutError> {
        let created = self
            .orders
            .create_order(session.context.clone())
            .await
            .map_err(CheckoutError::CreateOrder)?;

        let checkout = gateway_checkout(created)?;

        if checkout.amount != session.total_payable {
            debug!(
                order_amount = checkout.amount,
                total_payable = session.total_payable,
                "order amount differs from the displayed total"
            );
        }

        self.transition(CheckoutState::AwaitingGatewayResult);

        let order_id = checkout.order_id.clone();
        let amount = checkout.amount;
        let currency = checkout.currency.clone();

        let payment = self
            .gateway
            .open_checkout(checkout)
            .await?
            .into_signed()
            .ok_or(CheckoutError::IncompleteGatewayResponse)?;

        self.transition(CheckoutState::AwaitingOrderConfirmation);

        let payment_id = payment.razorpay_payment_id.clone();

        let confirmed = self
            .orders
            .confirm_order(session.context, payment)
            .await
            .map_err(CheckoutError::ConfirmOrder)?;

        Ok(Settlement {
            order_id,
            payment_id,
            amount,
            currency,
            confirmed_order_id: confirmed.order_id,
            started_at: session.started_at,
            settled_at: Timestamp::now(),
        })
    }
}

/// Build the gateway request, requiring an order id, amount and currency.
fn gateway_checkout(created: CreatedOrder) -> Result<GatewayCheckout, CheckoutError> {
    let present = |value: Option<String>| value.filter(|value| !value.is_empty());

    let (Some(order_id), Some(amount), Some(currency)) = (
        present(created.order_id),
        created.amount,
        present(created.currency),
    ) else {
        return Err(CheckoutError::InvalidOrderResponse);
    };

    Ok(GatewayCheckout {
        order_id,
        amount,
        currency,
        key: created.key,
        prefill: created.customer,
    })
}
