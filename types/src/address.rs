//! Market address type with `agm_` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An Agora market address, always prefixed with `agm_`.
///
/// Identifies a wallet on the settlement chain; vote weight is derived from
/// the balance held at this address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarketAddress(String);

impl MarketAddress {
    /// The standard prefix for all Agora market addresses.
    pub const PREFIX: &'static str = "agm_";

    /// Create a new market address from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `agm_`.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "address must start with agm_");
        Self(s)
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this address is well-formed.
    ///
    /// Deserialized addresses bypass [`MarketAddress::new`], so inbound
    /// messages must be checked with this before use.
    pub fn is_valid(&self) -> bool {
        self.0.starts_with(Self::PREFIX) && self.0.len() > Self::PREFIX.len()
    }
}

impl fmt::Display for MarketAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_address_accepted() {
        let addr = MarketAddress::new("agm_abc123");
        assert!(addr.is_valid());
        assert_eq!(addr.as_str(), "agm_abc123");
    }

    #[test]
    #[should_panic]
    fn wrong_prefix_panics() {
        MarketAddress::new("xyz_abc123");
    }

    #[test]
    fn bare_prefix_is_invalid() {
        let addr = MarketAddress::new("agm_");
        assert!(!addr.is_valid());
    }
}
