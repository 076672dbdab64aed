//! Claim records: an owner address and an optional fixed-point weight.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Raw weights strictly below this are read as whole units.
pub const DEFAULT_SCALE_THRESHOLD: u128 = 10_000_000_000;

/// Fractional digits of the on-chain fixed-point weight.
pub const DEFAULT_DECIMALS: u32 = 18;

/// A 20-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| ValidationError::Address {
            value: s.to_string(),
            reason,
        };
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.is_empty() {
            return Err(invalid("empty"));
        }
        if digits.len() != 40 {
            return Err(invalid("expected 40 hex digits"));
        }
        let mut out = [0u8; 20];
        hex::decode_to_slice(digits, &mut out).map_err(|_| invalid("not hexadecimal"))?;
        Ok(Self(out))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Fixed-point weight, already normalized to its on-chain representation.
///
/// Serialized as a decimal string so JSON consumers never lose precision.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Weight(pub u128);

impl Weight {
    pub fn get(self) -> u128 {
        self.0
    }

    /// Parse an unsigned decimal integer with no sign, fraction or exponent.
    pub fn parse_raw(s: &str) -> Result<u128, ValidationError> {
        let invalid = |reason| ValidationError::Weight {
            value: s.to_string(),
            reason,
        };
        if s.is_empty() {
            return Err(invalid("empty"));
        }
        if s.starts_with('-') {
            return Err(invalid("negative"));
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("not a decimal integer"));
        }
        s.parse::<u128>().map_err(|_| invalid("exceeds 128 bits"))
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Weight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Weight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Weight::parse_raw(&s)
            .map(Weight)
            .map_err(serde::de::Error::custom)
    }
}

/// Unit-conversion policy applied once, when weights are parsed.
///
/// A raw weight below `threshold` is taken as a whole-unit count and
/// multiplied by `10^decimals`; anything else is assumed to be fixed-point
/// already and kept as is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScalePolicy {
    pub threshold: u128,
    pub decimals: u32,
}

impl Default for ScalePolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SCALE_THRESHOLD,
            decimals: DEFAULT_DECIMALS,
        }
    }
}

impl ScalePolicy {
    /// Never scale: every weight is taken as already fixed-point.
    pub fn disabled() -> Self {
        Self {
            threshold: 0,
            decimals: DEFAULT_DECIMALS,
        }
    }

    pub fn with_threshold(mut self, threshold: u128) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    /// Normalize a raw weight.
    pub fn apply(&self, raw: u128) -> Result<Weight, ValidationError> {
        if raw >= self.threshold {
            return Ok(Weight(raw));
        }
        10u128
            .checked_pow(self.decimals)
            .and_then(|factor| raw.checked_mul(factor))
            .map(Weight)
            .ok_or(ValidationError::WeightOverflow { value: raw })
    }
}

/// One claim: who, and optionally how much.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    pub owner: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,
}

impl Record {
    /// Weighted record; `weight` must already be normalized.
    pub fn new(owner: Address, weight: Weight) -> Self {
        Self {
            owner,
            weight: Some(weight),
        }
    }

    /// Membership-only record.
    pub fn member(owner: Address) -> Self {
        Self {
            owner,
            weight: None,
        }
    }

    /// Parse textual fields, normalizing the weight with `policy`.
    pub fn parse(
        owner: &str,
        weight: Option<&str>,
        policy: &ScalePolicy,
    ) -> Result<Self, ValidationError> {
        let owner = owner.trim().parse::<Address>()?;
        let weight = match weight {
            Some(raw) => Some(policy.apply(Weight::parse_raw(raw.trim())?)?),
            None => None,
        };
        Ok(Self { owner, weight })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0x14b0Ed2a7C4cC60DD8F676AE44D0831d3c9b2a9E";

    #[test]
    fn test_address_parse_is_case_insensitive() {
        let mixed: Address = ADDR.parse().unwrap();
        let lower: Address = ADDR.to_lowercase().parse().unwrap();
        let bare: Address = ADDR[2..].parse().unwrap();
        assert_eq!(mixed, lower);
        assert_eq!(mixed, bare);
        assert_eq!(mixed.to_string(), ADDR.to_lowercase());
    }

    #[test]
    fn test_address_rejects_malformed() {
        let too_long = format!("{ADDR}00");
        for bad in ["", "0x", "0x1234", "0xzz", too_long.as_str()] {
            let err = bad.parse::<Address>().unwrap_err();
            assert!(matches!(err, ValidationError::Address { .. }), "{bad:?}");
        }
        let not_hex = format!("0x{}", "g".repeat(40));
        assert!(matches!(
            not_hex.parse::<Address>(),
            Err(ValidationError::Address {
                reason: "not hexadecimal",
                ..
            })
        ));
    }

    #[test]
    fn test_weight_parse_rejects_signs_and_fractions() {
        assert_eq!(Weight::parse_raw("42").unwrap(), 42);
        for (input, reason) in [
            ("", "empty"),
            ("-1", "negative"),
            ("+1", "not a decimal integer"),
            ("1.5", "not a decimal integer"),
            ("1e18", "not a decimal integer"),
            ("340282366920938463463374607431768211456", "exceeds 128 bits"),
        ] {
            assert_eq!(
                Weight::parse_raw(input),
                Err(ValidationError::Weight {
                    value: input.to_string(),
                    reason,
                })
            );
        }
    }

    #[test]
    fn test_scale_policy_boundary() {
        let policy = ScalePolicy::default();
        assert_eq!(
            policy.apply(9_999_999_999).unwrap(),
            Weight(9_999_999_999 * 10u128.pow(18))
        );
        assert_eq!(
            policy.apply(10_000_000_000).unwrap(),
            Weight(10_000_000_000)
        );
        assert_eq!(policy.apply(0).unwrap(), Weight(0));
    }

    #[test]
    fn test_scale_policy_disabled_and_custom() {
        assert_eq!(ScalePolicy::disabled().apply(5).unwrap(), Weight(5));
        let policy = ScalePolicy::default().with_threshold(100).with_decimals(6);
        assert_eq!(policy.apply(99).unwrap(), Weight(99_000_000));
        assert_eq!(policy.apply(100).unwrap(), Weight(100));
    }

    #[test]
    fn test_scale_policy_overflow() {
        let policy = ScalePolicy::default().with_threshold(u128::MAX);
        assert_eq!(
            policy.apply(u128::MAX / 10),
            Err(ValidationError::WeightOverflow {
                value: u128::MAX / 10
            })
        );
        let huge = ScalePolicy::default().with_decimals(39);
        assert!(huge.apply(1).is_err());
    }

    #[test]
    fn test_record_parse_trims_fields() {
        let record = Record::parse(&format!(" {ADDR} "), Some(" 3 "), &ScalePolicy::default())
            .unwrap();
        assert_eq!(record.weight, Some(Weight(3 * 10u128.pow(18))));
        let member = Record::parse(ADDR, None, &ScalePolicy::default()).unwrap();
        assert_eq!(member.weight, None);
    }

    #[test]
    fn test_record_serializes_weight_as_string() {
        let record = Record::parse(ADDR, Some("7"), &ScalePolicy::disabled()).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            format!(r#"{{"owner":"{}","weight":"7"}}"#, ADDR.to_lowercase())
        );
        let member = Record::member(record.owner);
        assert!(!serde_json::to_string(&member).unwrap().contains("weight"));
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
