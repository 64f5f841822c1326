//! Pricing configuration
//!
//! Fees and tax rates can be overridden from a YAML file:
//!
//! ```yaml
//! currency: USD
//! cleaning_fee: "50.00"
//! service_fee_rate: "0.15"
//! default_tax_rate: "0.10"
//! tax_rates:
//!   CA: "0.13"
//!   NY: "0.08625"
//! ```
//!
//! Every field is optional; omitted fields keep the standard values. Amounts
//! and rates are strings so they are read as exact decimals.

use std::{fs, path::Path};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    money::AmountError,
    pricing::{DEFAULT_CLEANING_FEE, PriceCalculator},
    taxes::TaxTable,
};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read pricing config: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid YAML for [`PricingConfig`].
    #[error("failed to parse pricing config: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// An amount or rate is not a decimal number.
    #[error("invalid decimal in pricing config: {0}")]
    InvalidAmount(String),

    /// An amount or rate is negative.
    #[error("negative value in pricing config: {0}")]
    Negative(String),

    /// The currency code is not a known ISO 4217 code.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Wrapped arithmetic or currency error.
    #[error(transparent)]
    Amount(#[from] AmountError),
}

/// Fee and tax settings used to build a [`PriceCalculator`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricingConfig {
    /// ISO 4217 currency code.
    pub currency: String,

    /// Flat cleaning fee in major units.
    pub cleaning_fee: String,

    /// Service fee as a fraction of the room subtotal.
    pub service_fee_rate: String,

    /// Tax rate for regions not listed in `tax_rates`.
    pub default_tax_rate: String,

    /// Tax rate by region code.
    pub tax_rates: FxHashMap<String, String>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        let tax_rates = [("CA", "0.13"), ("NY", "0.08625"), ("TX", "0.0825"), ("FL", "0.07")]
            .into_iter()
            .map(|(region, rate)| (region.to_string(), rate.to_string()))
            .collect();

        Self {
            currency: "USD".to_string(),
            cleaning_fee: DEFAULT_CLEANING_FEE.to_string(),
            service_fee_rate: "0.15".to_string(),
            default_tax_rate: "0.10".to_string(),
            tax_rates,
        }
    }
}

impl PricingConfig {
    /// Parse a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the document does not match.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Read and parse a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// The configured currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] for unrecognised codes.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        let code = self.currency.trim().to_ascii_uppercase();

        iso::find(&code).ok_or(ConfigError::UnknownCurrency(code))
    }

    /// The configured tax table.
    ///
    /// # Errors
    ///
    /// Returns an error if any rate is not a non-negative decimal.
    pub fn tax_table(&self) -> Result<TaxTable, ConfigError> {
        let mut table = TaxTable::with_default_rate(parse_decimal(&self.default_tax_rate)?);

        for (region, rate) in &self.tax_rates {
            table = table.with_rate(region, parse_decimal(rate)?);
        }

        Ok(table)
    }

    /// Build the calculator these settings describe.
    ///
    /// # Errors
    ///
    /// Returns an error if the currency is unknown or any value is malformed.
    pub fn calculator(&self) -> Result<PriceCalculator<'static>, ConfigError> {
        let currency = self.currency()?;
        let cleaning_fee = Money::from_decimal(parse_decimal(&self.cleaning_fee)?, currency);

        Ok(PriceCalculator::new(
            currency,
            cleaning_fee,
            parse_decimal(&self.service_fee_rate)?,
            self.tax_table()?,
        )?)
    }
}

fn parse_decimal(raw: &str) -> Result<Decimal, ConfigError> {
    let value = raw
        .trim()
        .parse::<Decimal>()
        .map_err(|_err| ConfigError::InvalidAmount(raw.to_string()))?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(ConfigError::Negative(raw.to_string()));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rusty_money::iso;
    use testresult::TestResult;

    use crate::pricing::PriceRequest;

    use super::*;

    #[test]
    fn default_config_matches_standard_calculator() -> TestResult {
        let calculator = PricingConfig::default().calculator()?;

        assert_eq!(calculator, PriceCalculator::standard(iso::USD));

        Ok(())
    }

    #[test]
    fn partial_yaml_keeps_defaults() -> TestResult {
        let config = PricingConfig::from_yaml_str("cleaning_fee: \"75.00\"\n")?;

        assert_eq!(config.cleaning_fee, "75.00");
        assert_eq!(config.service_fee_rate, "0.15");
        assert_eq!(config.tax_rates.len(), 4);

        Ok(())
    }

    #[test]
    fn yaml_overrides_regions_and_currency() -> TestResult {
        let config = PricingConfig::from_yaml_str(
            "currency: eur\ndefault_tax_rate: \"0.2\"\ntax_rates:\n  de: \"0.19\"\n",
        )?;

        let calculator = config.calculator()?;

        assert_eq!(calculator.currency(), iso::EUR);
        assert_eq!(calculator.taxes().rate_for(Some("DE")), Decimal::new(19, 2));
        assert_eq!(calculator.taxes().rate_for(Some("CA")), Decimal::new(2, 1));

        Ok(())
    }

    #[test]
    fn configured_cleaning_fee_is_charged() -> TestResult {
        let calculator = PricingConfig::from_yaml_str("cleaning_fee: \"80\"\n")?.calculator()?;

        let request = PriceRequest::new(Money::from_major(100, iso::USD), 1);
        let breakdown = calculator.calculate(&request)?;

        assert_eq!(breakdown.cleaning_fee(), Money::from_major(80, iso::USD));

        Ok(())
    }

    #[test]
    fn rejects_malformed_values() -> TestResult {
        let bad_rate = PricingConfig::from_yaml_str("service_fee_rate: \"fifteen\"\n")?;
        let negative = PricingConfig::from_yaml_str("cleaning_fee: \"-5\"\n")?;
        let currency = PricingConfig::from_yaml_str("currency: XYZ\n")?;

        assert!(matches!(bad_rate.calculator(), Err(ConfigError::InvalidAmount(_))));
        assert!(matches!(negative.calculator(), Err(ConfigError::Negative(_))));
        assert!(matches!(
            currency.calculator(),
            Err(ConfigError::UnknownCurrency(code)) if code == "XYZ"
        ));

        Ok(())
    }

    #[test]
    fn rejects_unknown_fields() {
        let result = PricingConfig::from_yaml_str("cleaning_fees: \"10\"\n");

        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn loads_from_file() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "tax_rates:\n  WA: \"0.065\"")?;

        let config = PricingConfig::from_path(file.path())?;

        assert_eq!(config.tax_table()?.rate_for(Some("wa")), Decimal::new(65, 3));
        assert_eq!(config.tax_table()?.rate_for(Some("CA")), Decimal::new(10, 2));

        Ok(())
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = PricingConfig::from_path("/nonexistent/pricing.yml");

        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
