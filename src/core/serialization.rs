//! Contract input payload plus JSON and MessagePack helpers over `serde_json` and
//! `rmp-serde`.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::{ContractDates, ContractSpec, OptionType, PricingError};

/// Contract as supplied by a caller: expiry either as a year fraction or as a date pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContractInput {
    pub option_type: OptionType,
    pub spot: f64,
    pub strike: f64,
    pub rate: f64,
    /// Unused by implied volatility and volatility comparison.
    #[serde(default)]
    pub volatility: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valuation_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
}

impl ContractInput {
    /// Resolves the expiry and builds the contract; field checks are left to the engines.
    ///
    /// # Errors
    /// [`PricingError::DateOrder`] for out-of-order dates, [`PricingError::InvalidInput`]
    /// when neither an expiry nor a complete date pair is given.
    pub fn resolve(&self) -> Result<ContractSpec, PricingError> {
        match (self.valuation_date, self.expiration_date, self.expiry) {
            (Some(valuation), Some(expiration), _) => Ok(ContractSpec::from_dates(
                self.option_type,
                self.spot,
                self.strike,
                self.rate,
                self.volatility,
                ContractDates::new(valuation, expiration)?,
            )),
            (None, None, Some(expiry)) => Ok(ContractSpec::new(
                self.option_type,
                self.spot,
                self.strike,
                self.rate,
                self.volatility,
                expiry,
            )),
            _ => Err(PricingError::InvalidInput(
                "contract needs either expiry or both valuation_date and expiration_date"
                    .to_string(),
            )),
        }
    }
}

impl From<ContractSpec> for ContractInput {
    fn from(spec: ContractSpec) -> Self {
        Self {
            option_type: spec.option_type,
            spot: spec.spot,
            strike: spec.strike,
            rate: spec.rate,
            volatility: spec.volatility,
            expiry: spec.dates.is_none().then_some(spec.expiry),
            valuation_date: spec.dates.map(|d| d.valuation),
            expiration_date: spec.dates.map(|d| d.expiration),
        }
    }
}

/// Serialize a value to pretty JSON.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Deserialize a value from JSON.
pub fn from_json<T: DeserializeOwned>(payload: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(payload)
}

/// Serialize a value to MessagePack bytes.
pub fn to_msgpack<T: Serialize>(value: &T) -> Result<Vec<u8>, rmp_serde::encode::Error> {
    rmp_serde::to_vec_named(value)
}

/// Deserialize a value from MessagePack bytes.
pub fn from_msgpack<T: DeserializeOwned>(payload: &[u8]) -> Result<T, rmp_serde::decode::Error> {
    rmp_serde::from_slice(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_input_needs_an_expiry() {
        let mut input: ContractInput =
            ContractSpec::new(OptionType::Call, 100.0, 100.0, 0.02, 0.2, 0.5).into();
        assert_eq!(input.resolve().unwrap().expiry, 0.5);
        input.expiry = None;
        assert!(matches!(input.resolve(), Err(PricingError::InvalidInput(_))));
        input.valuation_date = NaiveDate::from_ymd_opt(2025, 6, 1);
        input.expiration_date = NaiveDate::from_ymd_opt(2025, 1, 1);
        assert!(matches!(input.resolve(), Err(PricingError::DateOrder(_))));
    }

    #[test]
    fn dated_input_survives_a_msgpack_trip() {
        let input = ContractInput {
            option_type: OptionType::Put,
            spot: 100.0,
            strike: 105.0,
            rate: 0.03,
            volatility: 0.25,
            expiry: None,
            valuation_date: NaiveDate::from_ymd_opt(2025, 3, 3),
            expiration_date: NaiveDate::from_ymd_opt(2025, 9, 19),
        };
        let bytes = to_msgpack(&input).unwrap();
        assert_eq!(from_msgpack::<ContractInput>(&bytes).unwrap(), input);
        assert_eq!(input.resolve().unwrap().days_to_expiry(), 200.0);
    }
}
