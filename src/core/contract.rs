//! European contract definition shared by every pricer.
//!
//! [`ContractSpec`] bundles the option side, strike and the market state (spot, rate,
//! volatility) with the time to expiry. Expiry is either given directly as a year fraction
//! or derived from a [`ContractDates`] pair using ACT/365 fixed.
//!
//! Validation lives here so every engine rejects the same inputs with the same error kind
//! before doing any grid or path work.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{OptionType, PricingError};

/// Calendar days per year used to turn a date pair into a year fraction.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Valuation and expiration dates, with expiration strictly after valuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDates {
    pub valuation: NaiveDate,
    pub expiration: NaiveDate,
}

impl ContractDates {
    /// Builds a date pair.
    ///
    /// # Errors
    /// Returns [`PricingError::DateOrder`] unless `expiration > valuation`.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use openvanilla::core::ContractDates;
    ///
    /// let valuation = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    /// let expiration = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    /// let dates = ContractDates::new(valuation, expiration).unwrap();
    /// assert_eq!(dates.days(), 365);
    /// assert!(ContractDates::new(expiration, valuation).is_err());
    /// ```
    pub fn new(valuation: NaiveDate, expiration: NaiveDate) -> Result<Self, PricingError> {
        check_date_order(valuation, expiration)?;
        Ok(Self {
            valuation,
            expiration,
        })
    }

    /// Calendar days between valuation and expiration.
    pub fn days(&self) -> i64 {
        (self.expiration - self.valuation).num_days()
    }

    /// ACT/365 fixed year fraction.
    pub fn year_fraction(&self) -> f64 {
        self.days() as f64 / DAYS_PER_YEAR
    }
}

/// Date-order rule used by [`ContractDates::new`], exposed for callers that parse dates
/// themselves and want the same semantics.
pub fn check_date_order(valuation: NaiveDate, expiration: NaiveDate) -> Result<(), PricingError> {
    if expiration <= valuation {
        return Err(PricingError::DateOrder(format!(
            "expiration {expiration} must be strictly after valuation {valuation}"
        )));
    }
    Ok(())
}

/// Immutable European option contract plus the market state it is priced under.
///
/// # Examples
/// ```
/// use openvanilla::core::{ContractSpec, OptionType};
///
/// let spec = ContractSpec::new(OptionType::Call, 100.0, 100.0, 0.02, 0.20, 0.5);
/// assert!(spec.validate().is_ok());
/// assert!(spec.with_volatility(0.0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContractSpec {
    /// Call or put.
    pub option_type: OptionType,
    /// Spot price of the underlying.
    pub spot: f64,
    /// Strike level.
    pub strike: f64,
    /// Continuously compounded risk-free rate (decimal).
    pub rate: f64,
    /// Annualized volatility (decimal).
    pub volatility: f64,
    /// Time to expiry in years.
    pub expiry: f64,
    /// Calendar dates the expiry was derived from, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<ContractDates>,
}

impl ContractSpec {
    /// Builds a contract from a year-fraction expiry.
    pub fn new(
        option_type: OptionType,
        spot: f64,
        strike: f64,
        rate: f64,
        volatility: f64,
        expiry: f64,
    ) -> Self {
        Self {
            option_type,
            spot,
            strike,
            rate,
            volatility,
            expiry,
            dates: None,
        }
    }

    /// Builds a contract whose expiry is the ACT/365 fraction between `dates`.
    pub fn from_dates(
        option_type: OptionType,
        spot: f64,
        strike: f64,
        rate: f64,
        volatility: f64,
        dates: ContractDates,
    ) -> Self {
        Self {
            option_type,
            spot,
            strike,
            rate,
            volatility,
            expiry: dates.year_fraction(),
            dates: Some(dates),
        }
    }

    pub fn with_option_type(mut self, option_type: OptionType) -> Self {
        self.option_type = option_type;
        self
    }

    pub fn with_spot(mut self, spot: f64) -> Self {
        self.spot = spot;
        self
    }

    pub fn with_strike(mut self, strike: f64) -> Self {
        self.strike = strike;
        self
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility;
        self
    }

    /// Remaining calendar days; falls back to `expiry * 365` when no dates are attached.
    pub fn days_to_expiry(&self) -> f64 {
        match &self.dates {
            Some(dates) => dates.days() as f64,
            None => self.expiry * DAYS_PER_YEAR,
        }
    }

    /// `e^{-rT}`.
    #[inline]
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.expiry).exp()
    }

    /// Validates every field except volatility.
    ///
    /// # Errors
    /// [`PricingError::InvalidInput`] for non-finite fields, `spot <= 0`, `strike <= 0`
    /// or `expiry <= 0`; [`PricingError::DateOrder`] when attached dates are out of order.
    pub fn validate_without_vol(&self) -> Result<(), PricingError> {
        if !self.spot.is_finite()
            || !self.strike.is_finite()
            || !self.rate.is_finite()
            || !self.expiry.is_finite()
        {
            return Err(PricingError::InvalidInput(
                "spot, strike, rate and expiry must be finite".to_string(),
            ));
        }
        if self.spot <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "spot must be > 0, got {}",
                self.spot
            )));
        }
        if self.strike <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "strike must be > 0, got {}",
                self.strike
            )));
        }
        if let Some(dates) = &self.dates {
            check_date_order(dates.valuation, dates.expiration)?;
        }
        if self.expiry <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "time to expiry must be > 0, got {}",
                self.expiry
            )));
        }
        Ok(())
    }

    /// Validates all fields, requiring a strictly positive volatility.
    pub fn validate(&self) -> Result<(), PricingError> {
        self.validate_without_vol()?;
        if !self.volatility.is_finite() || self.volatility <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "volatility must be finite and > 0, got {}",
                self.volatility
            )));
        }
        Ok(())
    }
}
