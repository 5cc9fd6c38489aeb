//! Domain primitives: BlockNumber, Balance, AccountId, TokenSymbol and index aliases.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// DPO identifier on chain.
pub type DpoIndex = u32;

/// TravelCabin class identifier on chain.
pub type TravelCabinIndex = u32;

/// Block height. Unsigned, so a negative height cannot be expressed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BlockNumber(pub u64);

impl BlockNumber {
    /// Create a BlockNumber from a raw height.
    pub fn new(height: u64) -> Self {
        BlockNumber(height)
    }

    /// Get the underlying height.
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Signed distance `self - other` in blocks, saturating at the i64 range.
    pub fn signed_distance(&self, other: BlockNumber) -> i64 {
        let diff = i128::from(self.0) - i128::from(other.0);
        diff.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }

    /// Height `blocks` after this one, saturating.
    pub fn saturating_add(&self, blocks: u64) -> BlockNumber {
        BlockNumber(self.0.saturating_add(blocks))
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Chain-native amount in a token's minor units.
///
/// Serialized as a decimal string: JSON numbers cannot carry the full u128 range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Balance(pub u128);

impl Balance {
    pub const ZERO: Balance = Balance(0);

    pub fn new(minor_units: u128) -> Self {
        Balance(minor_units)
    }

    pub fn as_u128(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn saturating_sub(&self, rhs: Balance) -> Balance {
        Balance(self.0.saturating_sub(rhs.0))
    }

    pub fn checked_mul(&self, factor: u128) -> Option<Balance> {
        self.0.checked_mul(factor).map(Balance)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Balance {
    fn from(value: u128) -> Self {
        Balance(value)
    }
}

impl Serialize for Balance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Balance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BalanceVisitor;

        impl<'de> Visitor<'de> for BalanceVisitor {
            type Value = Balance;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer or decimal string of minor units")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Balance, E> {
                Ok(Balance(u128::from(v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Balance, E> {
                u128::try_from(v)
                    .map(Balance)
                    .map_err(|_| E::custom(format!("negative balance: {}", v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Balance, E> {
                v.parse::<u128>()
                    .map(Balance)
                    .map_err(|e| E::custom(format!("invalid balance {:?}: {}", v, e)))
            }
        }

        deserializer.deserialize_any(BalanceVisitor)
    }
}

/// Account identifier (SS58 or hex string).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(account: String) -> Self {
        AccountId(account)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Currency identifier (e.g., "BOLT", "WUSD").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenSymbol(pub String);

impl TokenSymbol {
    pub fn new(symbol: String) -> Self {
        TokenSymbol(symbol)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
