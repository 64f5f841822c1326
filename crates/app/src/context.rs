//! App Context

use std::sync::Arc;

use lodge::{config::ConfigError, pricing::PriceCalculator};
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    clock::{Clock, SystemClock},
    config::AppConfig,
    domain::{
        bookings::{BookingRepositories, BookingsService, StoreBookingsService},
        discounts::{DiscountsService, StoreDiscountsService},
    },
    store::MemoryStore,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("invalid pricing config: {0}")]
    Pricing(#[from] ConfigError),
}

#[derive(Clone)]
pub struct AppContext {
    /// Currency every price and discount is held in.
    pub currency: &'static Currency,
    pub store: Arc<MemoryStore>,
    pub bookings: Arc<dyn BookingsService>,
    pub discounts: Arc<dyn DiscountsService>,
}

impl AppContext {
    /// Build application context from configuration, backed by a fresh
    /// in-memory store and the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error when the pricing configuration is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let calculator = config.pricing()?.calculator()?;

        Ok(Self::in_memory(calculator, Arc::new(SystemClock)))
    }

    /// Wire every service to one in-memory store.
    #[must_use]
    pub fn in_memory(calculator: PriceCalculator<'static>, clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let currency = calculator.currency();

        let repositories = BookingRepositories {
            properties: store.clone(),
            users: store.clone(),
            discounts: store.clone(),
            bookings: store.clone(),
        };

        Self {
            bookings: Arc::new(StoreBookingsService::new(
                repositories,
                calculator,
                clock.clone(),
            )),
            discounts: Arc::new(StoreDiscountsService::new(store.clone(), clock, currency)),
            currency,
            store,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Write, path::PathBuf};

    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;
    use crate::config::{LogFormat, LoggingConfig};

    fn config(pricing_config: Option<PathBuf>) -> AppConfig {
        AppConfig {
            logging: LoggingConfig {
                log_level: "warn".to_string(),
                log_format: LogFormat::Compact,
            },
            pricing_config,
        }
    }

    #[test]
    fn builds_from_a_pricing_file() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;

        writeln!(file, "currency: EUR")?;

        let ctx = AppContext::from_config(&config(Some(file.path().to_path_buf())))?;

        assert_eq!(ctx.currency, iso::EUR);

        Ok(())
    }

    #[test]
    fn defaults_to_standard_pricing() -> TestResult {
        let ctx = AppContext::from_config(&config(None))?;

        assert_eq!(ctx.currency, iso::USD);

        Ok(())
    }

    #[test]
    fn unreadable_pricing_file_fails_startup() {
        let result = AppContext::from_config(&config(Some(PathBuf::from(
            "/nonexistent/pricing.yml",
        ))));

        assert!(matches!(result, Err(AppInitError::Pricing(ConfigError::Io(_)))));
    }
}
