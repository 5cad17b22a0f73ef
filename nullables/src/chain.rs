//! Nullable chain oracle — scripted heights and balances for testing.

use agora_chain::{ChainError, ChainOracle};
use agora_types::MarketAddress;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// A deterministic chain oracle for testing.
///
/// Balances are flat per address (the lookup height is accepted but not
/// modelled); tests that need history set the balance between casts.
pub struct NullChain {
    height: AtomicU64,
    balances: Mutex<HashMap<String, u128>>,
    unavailable: AtomicBool,
}

impl NullChain {
    pub fn new(height: u64) -> Self {
        Self {
            height: AtomicU64::new(height),
            balances: Mutex::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Set the current best height.
    pub fn set_height(&self, height: u64) {
        self.height.store(height, Ordering::SeqCst);
    }

    /// Set the balance reported for an address.
    pub fn set_balance(&self, address: &MarketAddress, balance: u128) {
        self.balances
            .lock()
            .unwrap()
            .insert(address.as_str().to_string(), balance);
    }

    /// Simulate a chain client outage. While set, every query fails with
    /// `ChainError::Unavailable`.
    pub fn set_unavailable(&self, down: bool) {
        self.unavailable.store(down, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), ChainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ChainError::Unavailable("injected outage".into()));
        }
        Ok(())
    }
}

impl ChainOracle for NullChain {
    fn current_height(&self) -> Result<u64, ChainError> {
        self.check_available()?;
        Ok(self.height.load(Ordering::SeqCst))
    }

    fn balance_at(&self, address: &MarketAddress, _height: u64) -> Result<u128, ChainError> {
        self.check_available()?;
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(address.as_str())
            .copied()
            .unwrap_or(0))
    }
}
