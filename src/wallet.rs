//! Wallet

/// Wallet inputs for a single pricing pass.
///
/// `balance` is fetched once per session from the balance endpoint, while
/// `ceiling` is the redeemable amount the server returned for the current cart.
/// They only meet here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalletState {
    /// Wallet balance in minor units
    pub balance: u64,

    /// Largest amount redeemable against the current cart
    pub ceiling: u64,

    /// Whether the customer chose to pay with the wallet
    pub use_wallet: bool,
}

impl WalletState {
    /// Create a wallet state.
    pub fn new(balance: u64, ceiling: u64, use_wallet: bool) -> Self {
        Self {
            balance,
            ceiling,
            use_wallet,
        }
    }

    /// Largest amount the wallet could cover, regardless of the toggle.
    pub fn redeemable(&self) -> u64 {
        self.ceiling.min(self.balance)
    }

    /// Amount deducted from `subtotal_before_wallet`.
    ///
    /// Never more than the ceiling, the balance, or the subtotal itself.
    pub fn deduction(&self, subtotal_before_wallet: u64) -> u64 {
        if self.use_wallet {
            self.redeemable().min(subtotal_before_wallet)
        } else {
            0
        }
    }
}
