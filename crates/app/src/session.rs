//! Cart session.
//!
//! Owns everything a single customer's cart view needs: the reconciled cart,
//! the customer's selections, the coupon book, the wallet balance and the
//! checkout state machine. Every action that changes a pricing input triggers
//! exactly one reconciliation, and pricing is recomputed on read.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tracing::{debug, info, warn};

use cartage::{
    coupons::{Coupon, CouponBook, CouponError, validate},
    ids::{AddressId, CouponId},
    items::{CartLineItem, LineKey},
    pricing::{PricingInputs, PricingSnapshot, compute_snapshot},
    wallet::WalletState,
};

use crate::{
    api::{ApiError, CartMutation, CartQuery, CartsApi, CouponsApi, WalletApi},
    carts::{CartError, CartStore, Reconciled, ReconciliationClient, reconcile::lock},
    checkout::{CheckoutError, CheckoutOrchestrator, CheckoutRequest, CheckoutState, Settlement},
    context::AppContext,
};

/// Choices the customer has made that feed pricing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selections {
    pub address_id: Option<AddressId>,
    pub coupon: Option<Coupon>,
    pub use_wallet: bool,
}

/// What the session knows about the wallet balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WalletView {
    /// Not fetched yet.
    #[default]
    Unloaded,

    /// Balance in minor units.
    Available(u64),

    /// The balance could not be fetched; the wallet section is hidden.
    Hidden,
}

impl WalletView {
    /// Balance used for pricing. Zero unless available.
    pub fn balance(self) -> u64 {
        match self {
            Self::Available(balance) => balance,
            Self::Unloaded | Self::Hidden => 0,
        }
    }
}

fn guard<T>(cell: &Mutex<T>) -> MutexGuard<'_, T> {
    cell.lock().unwrap_or_else(PoisonError::into_inner)
}

fn price(store: &CartStore, selections: &Selections, wallet: WalletView) -> PricingSnapshot {
    compute_snapshot(PricingInputs {
        items: store.items(),
        coupon: selections.coupon.as_ref(),
        wallet: WalletState::new(wallet.balance(), store.wallet_ceiling(), selections.use_wallet),
        shipping: store.shipping(),
        platform_fee: store.platform_fee(),
    })
}

pub struct CartSession {
    carts: Arc<dyn CartsApi>,
    coupon_source: Arc<dyn CouponsApi>,
    wallet_source: Arc<dyn WalletApi>,
    reconciler: ReconciliationClient,
    checkout: CheckoutOrchestrator,

    // Lock order: store, selections, wallet, coupons.
    store: Mutex<CartStore>,
    selections: Mutex<Selections>,
    wallet: Mutex<WalletView>,
    coupons: Mutex<CouponBook>,
}

impl fmt::Debug for CartSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartSession")
            .field("store", &self.store)
            .field("selections", &self.selections)
            .field("wallet", &self.wallet)
            .field("checkout", &self.checkout)
            .finish_non_exhaustive()
    }
}

impl CartSession {
    #[must_use]
    pub fn new(context: &AppContext) -> Self {
        Self {
            carts: context.carts.clone(),
            coupon_source: context.coupons.clone(),
            wallet_source: context.wallet.clone(),
            reconciler: ReconciliationClient::new(context.carts.clone()),
            checkout: CheckoutOrchestrator::new(context.orders.clone(), context.gateway.clone()),
            store: Mutex::new(CartStore::new()),
            selections: Mutex::new(Selections::default()),
            wallet: Mutex::new(WalletView::Unloaded),
            coupons: Mutex::new(CouponBook::default()),
        }
    }

    /// Capture the current selections for a fetch.
    fn query(&self) -> CartQuery {
        let selections = guard(&self.selections);
        let wallet = *guard(&self.wallet);

        CartQuery {
            address_id: selections.address_id.clone(),
            coupon_id: selections.coupon.as_ref().map(|coupon| coupon.id.clone()),
            use_wallet: selections.use_wallet,
            wallet_amount: wallet.balance(),
        }
    }

    /// Refetch the cart for the current selections.
    pub async fn refresh(&self) -> Reconciled {
        let query = self.query();

        self.reconciler.reconcile(&self.store, query).await
    }

    /// Fetch the coupons on offer, replacing any fetched before.
    ///
    /// # Errors
    ///
    /// Returns an error if the coupons cannot be fetched. The book is left
    /// unchanged.
    pub async fn load_coupons(&self) -> Result<usize, ApiError> {
        let book = CouponBook::new(self.coupon_source.list_coupons().await?);
        let count = book.len();

        *guard(&self.coupons) = book;

        debug!(count, "loaded coupons");

        Ok(count)
    }

    /// Fetch the wallet balance. A failure hides the wallet.
    pub async fn load_wallet(&self) -> WalletView {
        let view = match self.wallet_source.wallet_balance().await {
            Ok(balance) => WalletView::Available(balance),
            Err(error) => {
                warn!(%error, "wallet balance unavailable, hiding wallet");

                WalletView::Hidden
            }
        };

        *guard(&self.wallet) = view;

        view
    }

    fn quantity_of(&self, key: &LineKey) -> Result<u32, CartError> {
        lock(&self.store)
            .line(key)
            .map(|line| line.quantity)
            .ok_or(CartError::UnknownRow)
    }

    /// Add one unit to a row.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownRow`] or [`CartError::RowBusy`].
    pub async fn increase(&self, key: &LineKey) -> Result<Reconciled, CartError> {
        let quantity = self.quantity_of(key)?.saturating_add(1);

        self.mutate(key, quantity).await
    }

    /// Remove one unit from a row. At one unit the row is deleted.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownRow`] or [`CartError::RowBusy`].
    pub async fn decrease(&self, key: &LineKey) -> Result<Reconciled, CartError> {
        let quantity = self.quantity_of(key)?.saturating_sub(1);

        self.mutate(key, quantity).await
    }

    /// Delete a row.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownRow`] or [`CartError::RowBusy`].
    pub async fn remove(&self, key: &LineKey) -> Result<Reconciled, CartError> {
        self.quantity_of(key)?;

        self.mutate(key, 0).await
    }

    /// Set a row's quantity, adding the product if it is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::RowBusy`] if the row already has an update in flight.
    pub async fn set_quantity(&self, key: &LineKey, quantity: u32) -> Result<Reconciled, CartError> {
        self.mutate(key, quantity).await
    }

    async fn mutate(&self, key: &LineKey, quantity: u32) -> Result<Reconciled, CartError> {
        {
            let mut store = lock(&self.store);

            if !store.begin_row(key) {
                return Err(CartError::RowBusy);
            }

            store.patch_quantity(key, quantity);
        }

        let mutation = CartMutation {
            key: key.clone(),
            quantity,
        };

        if let Err(error) = self.carts.update_item(mutation).await {
            warn!(product = %key.product, quantity, %error, "cart update failed");
        }

        let outcome = self.refresh().await;

        lock(&self.store).finish_row(key);

        Ok(outcome)
    }

    /// Select a fetched coupon by id.
    ///
    /// # Errors
    ///
    /// Returns a coupon error, without any request, if the coupon is unknown or
    /// the cart is below its minimum purchase.
    pub async fn apply_coupon(&self, id: &CouponId) -> Result<Reconciled, CartError> {
        let total_mrp = self.pricing().total_mrp;

        let coupon = guard(&self.coupons)
            .get(id)
            .cloned()
            .ok_or(CouponError::InvalidCoupon)?;

        validate(&coupon, total_mrp)?;

        Ok(self.select_coupon(coupon).await)
    }

    /// Select a fetched coupon by the code the customer typed.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::InvalidCoupon`] if no code matches, or
    /// [`CouponError::MinimumPurchaseNotMet`]. No request is made either way.
    pub async fn apply_coupon_code(&self, code: &str) -> Result<Reconciled, CartError> {
        let total_mrp = self.pricing().total_mrp;

        let coupon = guard(&self.coupons).redeem_code(code, total_mrp)?.clone();

        Ok(self.select_coupon(coupon).await)
    }

    async fn select_coupon(&self, coupon: Coupon) -> Reconciled {
        debug!(code = %coupon.code, "coupon selected");

        guard(&self.selections).coupon = Some(coupon);

        self.refresh().await
    }

    /// Clear the selected coupon.
    pub async fn remove_coupon(&self) -> Reconciled {
        guard(&self.selections).coupon = None;

        self.refresh().await
    }

    /// Flip the pay-with-wallet toggle.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::WalletUnavailable`] unless the balance was loaded.
    pub async fn toggle_wallet(&self) -> Result<Reconciled, CartError> {
        {
            let mut selections = guard(&self.selections);

            if !matches!(*guard(&self.wallet), WalletView::Available(_)) {
                return Err(CartError::WalletUnavailable);
            }

            selections.use_wallet = !selections.use_wallet;
        }

        Ok(self.refresh().await)
    }

    /// Select the delivery address.
    pub async fn change_address(&self, address_id: AddressId) -> Reconciled {
        guard(&self.selections).address_id = Some(address_id);

        self.refresh().await
    }

    /// Price the cart as currently held.
    pub fn pricing(&self) -> PricingSnapshot {
        let store = lock(&self.store);
        let selections = guard(&self.selections);
        let wallet = *guard(&self.wallet);

        price(&store, &selections, wallet)
    }

    pub fn items(&self) -> Vec<CartLineItem> {
        lock(&self.store).items().to_vec()
    }

    pub fn estimated_delivery(&self) -> Option<String> {
        lock(&self.store).shipping().estimated_delivery.clone()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.store).is_loading()
    }

    pub fn is_row_busy(&self, key: &LineKey) -> bool {
        lock(&self.store).is_row_busy(key)
    }

    pub fn selections(&self) -> Selections {
        guard(&self.selections).clone()
    }

    pub fn wallet(&self) -> WalletView {
        *guard(&self.wallet)
    }

    /// Coupons on offer, in the order they were fetched.
    pub fn coupons(&self) -> Vec<Coupon> {
        guard(&self.coupons).iter().cloned().collect()
    }

    /// Pay for the cart. On success the cart and the coupon and wallet
    /// selections are cleared and the cart is fetched once more.
    ///
    /// # Errors
    ///
    /// Returns the checkout error. A failed attempt leaves the cart untouched.
    pub async fn pay(&self, note: Option<String>) -> Result<Settlement, CheckoutError> {
        let request = {
            let store = lock(&self.store);
            let selections = guard(&self.selections);
            let wallet = *guard(&self.wallet);
            let snapshot = price(&store, &selections, wallet);

            CheckoutRequest {
                total_payable: snapshot.total_payable,
                cart_id: store.cart_id().cloned(),
                address_id: selections.address_id.clone(),
                coupon_id: selections.coupon.as_ref().map(|coupon| coupon.id.clone()),
                use_wallet: selections.use_wallet,
                wallet_deduction: snapshot.wallet_deduction,
                note,
            }
        };

        let settlement = self.checkout.pay(request).await?;

        {
            let mut store = lock(&self.store);
            let mut selections = guard(&self.selections);

            store.clear();
            selections.coupon = None;
            selections.use_wallet = false;
        }

        info!(order_id = %settlement.order_id, "cart cleared after payment");

        self.refresh().await;

        Ok(settlement)
    }

    /// Return a failed or settled checkout to idle.
    pub fn dismiss_checkout(&self) -> bool {
        self.checkout.dismiss()
    }

    pub fn checkout_state(&self) -> CheckoutState {
        self.checkout.state()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        api::{ConfirmedOrder, CreatedOrder, MockCouponsApi, MockOrdersApi, MockWalletApi},
        gateway::{GatewayResponse, MockPaymentGateway},
        test::{FakeCarts, flat_coupon, key, line, percent_coupon},
    };

    use super::*;

    struct Harness {
        carts: Arc<FakeCarts>,
        session: CartSession,
    }

    fn coupons(list: Vec<Coupon>) -> MockCouponsApi {
        let mut api = MockCouponsApi::new();

        api.expect_list_coupons().returning(move || Ok(list.clone()));

        api
    }

    fn wallet(balance: Option<u64>) -> MockWalletApi {
        let mut api = MockWalletApi::new();

        api.expect_wallet_balance().returning(move || {
            balance.ok_or_else(|| ApiError::Status {
                status: 503,
                body: String::new(),
            })
        });

        api
    }

    fn untouched_orders() -> MockOrdersApi {
        let mut orders = MockOrdersApi::new();

        orders.expect_is_authenticated().return_const(true);
        orders.expect_create_order().never();
        orders.expect_confirm_order().never();

        orders
    }

    fn untouched_gateway() -> MockPaymentGateway {
        let mut gateway = MockPaymentGateway::new();

        gateway.expect_open_checkout().never();

        gateway
    }

    fn harness(
        carts: FakeCarts,
        coupon_list: Vec<Coupon>,
        balance: Option<u64>,
        orders: MockOrdersApi,
        gateway: MockPaymentGateway,
    ) -> Harness {
        let carts = Arc::new(carts);

        let context = AppContext {
            carts: carts.clone(),
            coupons: Arc::new(coupons(coupon_list)),
            wallet: Arc::new(wallet(balance)),
            orders: Arc::new(orders),
            gateway: Arc::new(gateway),
        };

        Harness {
            carts,
            session: CartSession::new(&context),
        }
    }

    /// Two lines worth 100000 of MRP and 5000 of tax, with 4000 shipping and
    /// 1000 platform fee.
    fn standard_cart() -> FakeCarts {
        FakeCarts::with_lines(vec![line("p-1", 2, 40_000, 2_000), line("p-2", 1, 20_000, 1_000)])
            .with_charges(4_000, 1_000, 15_000)
    }

    fn standard(orders: MockOrdersApi, gateway: MockPaymentGateway) -> Harness {
        harness(
            standard_cart(),
            vec![
                flat_coupon("c-flat", "FLAT100", 10_000, 50_000),
                flat_coupon("c-big", "BIGSPEND", 20_000, 500_000),
                percent_coupon("c-pct", "TENOFF", 10, Some(5_000)),
            ],
            Some(20_000),
            orders,
            gateway,
        )
    }

    #[tokio::test]
    async fn refresh_prices_the_server_cart() {
        let Harness { session, .. } = standard(untouched_orders(), untouched_gateway());

        assert_eq!(session.refresh().await, Reconciled::Applied);

        let pricing = session.pricing();

        assert_eq!(pricing.total_mrp, 100_000);
        assert_eq!(pricing.tax_sum, 5_000);
        assert_eq!(pricing.total_payable, 110_000);
        assert_eq!(session.estimated_delivery().as_deref(), Some("3-5 days"));
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn unknown_coupon_code_is_rejected_without_a_request() -> TestResult {
        let Harness { carts, session } = standard(untouched_orders(), untouched_gateway());

        session.load_coupons().await?;
        session.refresh().await;

        let result = session.apply_coupon_code("NOPE").await;

        assert_eq!(result, Err(CartError::Coupon(CouponError::InvalidCoupon)));
        assert_eq!(
            result.err().map(|error| error.to_string()).as_deref(),
            Some("Invalid Coupon")
        );
        assert_eq!(carts.fetches().len(), 1);
        assert_eq!(session.pricing().coupon_discount, 0);

        Ok(())
    }

    #[tokio::test]
    async fn coupon_below_minimum_purchase_is_rejected_without_a_request() -> TestResult {
        let Harness { carts, session } = standard(untouched_orders(), untouched_gateway());

        session.load_coupons().await?;
        session.refresh().await;

        assert!(matches!(
            session.apply_coupon(&CouponId::new("c-big")).await,
            Err(CartError::Coupon(CouponError::MinimumPurchaseNotMet { .. }))
        ));
        assert_eq!(carts.fetches().len(), 1);
        assert_eq!(session.selections().coupon, None);

        Ok(())
    }

    #[tokio::test]
    async fn applying_then_removing_a_coupon_restores_the_total() -> TestResult {
        let Harness { carts, session } = standard(untouched_orders(), untouched_gateway());

        session.load_coupons().await?;
        session.refresh().await;

        let before = session.pricing();

        session.apply_coupon_code(" flat100 ").await?;

        assert_eq!(session.pricing().coupon_discount, 10_000);
        assert_eq!(session.pricing().total_payable, before.total_payable - 10_000);

        session.remove_coupon().await;

        assert_eq!(session.pricing(), before);

        let coupon_ids: Vec<_> = carts.fetches().into_iter().map(|query| query.coupon_id).collect();

        assert_eq!(coupon_ids, vec![None, Some(CouponId::new("c-flat")), None]);

        Ok(())
    }

    #[tokio::test]
    async fn percentage_coupon_is_capped() -> TestResult {
        let Harness { session, .. } = standard(untouched_orders(), untouched_gateway());

        session.load_coupons().await?;
        session.refresh().await;
        session.apply_coupon(&CouponId::new("c-pct")).await?;

        assert_eq!(session.pricing().coupon_discount, 5_000);

        Ok(())
    }

    #[tokio::test]
    async fn wallet_failure_hides_the_wallet_and_refuses_toggling() {
        let Harness { carts, session } = harness(
            standard_cart(),
            Vec::new(),
            None,
            untouched_orders(),
            untouched_gateway(),
        );

        assert_eq!(session.load_wallet().await, WalletView::Hidden);
        assert_eq!(session.toggle_wallet().await, Err(CartError::WalletUnavailable));
        assert!(carts.fetches().is_empty());
        assert_eq!(session.pricing().wallet_deduction, 0);
    }

    #[tokio::test]
    async fn wallet_deduction_is_capped_by_ceiling_and_balance() -> TestResult {
        let Harness { carts, session } = standard(untouched_orders(), untouched_gateway());

        assert_eq!(session.load_wallet().await, WalletView::Available(20_000));

        session.refresh().await;
        session.toggle_wallet().await?;

        let last = carts.fetches().pop();

        assert_eq!(last.as_ref().map(|query| query.use_wallet), Some(true));
        assert_eq!(last.map(|query| query.wallet_amount), Some(20_000));
        assert_eq!(session.pricing().wallet_deduction, 15_000);
        assert_eq!(session.pricing().total_payable, 95_000);

        Ok(())
    }

    #[tokio::test]
    async fn every_mutation_reconciles_exactly_once() -> TestResult {
        let Harness { carts, session } = standard(untouched_orders(), untouched_gateway());

        session.refresh().await;

        session.increase(&key("p-1")).await?;
        session.decrease(&key("p-2")).await?;
        session.change_address(AddressId::new("addr-1")).await;

        assert_eq!(carts.fetches().len(), 4);
        assert_eq!(
            carts.mutations(),
            vec![
                CartMutation {
                    key: key("p-1"),
                    quantity: 3
                },
                CartMutation {
                    key: key("p-2"),
                    quantity: 0
                },
            ]
        );
        assert_eq!(session.items().len(), 1);
        assert!(!session.is_row_busy(&key("p-1")));

        Ok(())
    }

    #[tokio::test]
    async fn failed_mutation_is_still_reconciled() -> TestResult {
        let Harness { carts, session } = standard(untouched_orders(), untouched_gateway());

        session.refresh().await;
        carts.fail_mutations();

        assert_eq!(session.remove(&key("p-1")).await?, Reconciled::Applied);

        assert_eq!(carts.fetches().len(), 2);
        assert_eq!(session.items().len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn busy_row_refuses_a_second_mutation() {
        let Harness { carts, session } = standard(untouched_orders(), untouched_gateway());

        session.refresh().await;
        lock(&session.store).begin_row(&key("p-1"));

        assert_eq!(session.increase(&key("p-1")).await, Err(CartError::RowBusy));
        assert_eq!(session.increase(&key("p-9")).await, Err(CartError::UnknownRow));
        assert!(carts.mutations().is_empty());
        assert_eq!(carts.fetches().len(), 1);
    }

    #[tokio::test]
    async fn set_quantity_adds_unknown_products() -> TestResult {
        let Harness { session, .. } = standard(untouched_orders(), untouched_gateway());

        session.refresh().await;
        session.set_quantity(&key("p-3"), 2).await?;

        assert_eq!(session.items().len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn reconciliation_failure_empties_the_cart() {
        let Harness { carts, session } = standard(untouched_orders(), untouched_gateway());

        session.refresh().await;
        carts.fail_fetches();

        assert_eq!(session.refresh().await, Reconciled::Reset);
        assert!(session.items().is_empty());
        assert_eq!(session.pricing().total_payable, 0);
    }

    #[tokio::test]
    async fn empty_cart_checkout_makes_no_request() {
        let Harness { session, .. } = harness(
            FakeCarts::default(),
            Vec::new(),
            Some(0),
            untouched_orders(),
            untouched_gateway(),
        );

        session.refresh().await;

        let result = session.pay(None).await;

        assert!(matches!(result, Err(CheckoutError::CartEmpty)));
        assert_eq!(result.err().map(|error| error.to_string()).as_deref(), Some("Cart empty"));
        assert_eq!(session.checkout_state(), CheckoutState::Idle);
    }

    #[tokio::test]
    async fn settlement_clears_the_cart_and_selections() -> TestResult {
        let mut orders = MockOrdersApi::new();

        orders.expect_is_authenticated().return_const(true);
        orders
            .expect_create_order()
            .withf(|context| context.coupon_id == Some(CouponId::new("c-flat")))
            .once()
            .returning(|_| {
                Ok(CreatedOrder {
                    order_id: Some("order_A1".to_string()),
                    amount: Some(100_000),
                    currency: Some("INR".to_string()),
                    ..CreatedOrder::default()
                })
            });
        orders
            .expect_confirm_order()
            .once()
            .returning(|_, _| Ok(ConfirmedOrder::default()));

        let mut gateway = MockPaymentGateway::new();

        gateway.expect_open_checkout().once().returning(|_| {
            Ok(GatewayResponse {
                razorpay_order_id: Some("order_A1".to_string()),
                razorpay_payment_id: Some("pay_B2".to_string()),
                razorpay_signature: Some("c0ffee".to_string()),
            })
        });

        let Harness { carts, session } = standard(orders, gateway);

        session.load_coupons().await?;
        session.load_wallet().await;
        session.change_address(AddressId::new("addr-1")).await;
        session.apply_coupon_code("FLAT100").await?;
        session.toggle_wallet().await?;

        let fetches_before = carts.fetches().len();

        let settlement = session.pay(Some("leave at the door".to_string())).await?;

        assert_eq!(settlement.payment_id, "pay_B2");
        assert_eq!(session.checkout_state(), CheckoutState::Settled);
        assert_eq!(carts.fetches().len(), fetches_before + 1);

        let selections = session.selections();

        assert_eq!(selections.coupon, None);
        assert!(!selections.use_wallet);
        assert_eq!(selections.address_id, Some(AddressId::new("addr-1")));

        Ok(())
    }

    #[tokio::test]
    async fn failed_checkout_leaves_the_cart_alone() {
        let mut orders = MockOrdersApi::new();

        orders.expect_is_authenticated().return_const(true);
        orders
            .expect_create_order()
            .once()
            .returning(|_| Ok(CreatedOrder::default()));
        orders.expect_confirm_order().never();

        let Harness { carts, session } = standard(orders, untouched_gateway());

        session.change_address(AddressId::new("addr-1")).await;

        let items = session.items();

        assert!(matches!(
            session.pay(None).await,
            Err(CheckoutError::InvalidOrderResponse)
        ));
        assert!(session.dismiss_checkout());
        assert_eq!(session.checkout_state(), CheckoutState::Idle);
        assert_eq!(session.items(), items);
        assert_eq!(carts.fetches().len(), 1);
    }

    #[tokio::test]
    async fn rejected_confirmation_keeps_cart_and_selections() -> TestResult {
        let mut orders = MockOrdersApi::new();

        orders.expect_is_authenticated().return_const(true);
        orders.expect_create_order().once().returning(|_| {
            Ok(CreatedOrder {
                order_id: Some("order_A1".to_string()),
                amount: Some(100_000),
                currency: Some("INR".to_string()),
                ..CreatedOrder::default()
            })
        });
        orders
            .expect_confirm_order()
            .once()
            .returning(|_, _| Err(ApiError::Unsuccessful("signature mismatch".to_string())));

        let mut gateway = MockPaymentGateway::new();

        gateway.expect_open_checkout().once().returning(|_| {
            Ok(GatewayResponse {
                razorpay_order_id: Some("order_A1".to_string()),
                razorpay_payment_id: Some("pay_B2".to_string()),
                razorpay_signature: Some("c0ffee".to_string()),
            })
        });

        let Harness { carts, session } = standard(orders, gateway);

        session.load_coupons().await?;
        session.load_wallet().await;
        session.change_address(AddressId::new("addr-1")).await;
        session.apply_coupon_code("FLAT100").await?;
        session.toggle_wallet().await?;

        let items = session.items();
        let selections = session.selections();
        let fetches_before = carts.fetches().len();

        let result = session.pay(None).await;

        assert!(
            matches!(result, Err(CheckoutError::ConfirmOrder(_))),
            "expected ConfirmOrder, got {result:?}"
        );
        assert_eq!(
            session.checkout_state(),
            CheckoutState::Failed {
                message: "Could not confirm the payment".to_string()
            }
        );
        assert_eq!(session.items(), items);
        assert_eq!(session.selections(), selections);
        assert!(session.selections().use_wallet);
        assert_eq!(carts.fetches().len(), fetches_before);

        assert!(session.dismiss_checkout());
        assert_eq!(session.checkout_state(), CheckoutState::Idle);

        Ok(())
    }
}
