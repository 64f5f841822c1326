//! Tax Table

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;

/// Lookup of tax rate by region code.
///
/// Region codes are matched case-insensitively. Unknown or absent regions use
/// the table's default rate.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxTable {
    rates: FxHashMap<String, Decimal>,
    default_rate: Decimal,
}

impl TaxTable {
    /// An empty table that applies `default_rate` everywhere.
    pub fn with_default_rate(default_rate: Decimal) -> Self {
        Self {
            rates: FxHashMap::default(),
            default_rate,
        }
    }

    /// The built-in table: CA 13%, NY 8.625%, TX 8.25%, FL 7%, otherwise 10%.
    pub fn standard() -> Self {
        Self::with_default_rate(Decimal::new(10, 2))
            .with_rate("CA", Decimal::new(13, 2))
            .with_rate("NY", Decimal::new(8625, 5))
            .with_rate("TX", Decimal::new(825, 4))
            .with_rate("FL", Decimal::new(7, 2))
    }

    /// Add or replace the rate for a region.
    #[must_use]
    pub fn with_rate(mut self, region: &str, rate: Decimal) -> Self {
        self.rates.insert(region.trim().to_ascii_uppercase(), rate);
        self
    }

    /// The rate applied when no region matches.
    pub fn default_rate(&self) -> Decimal {
        self.default_rate
    }

    /// Resolve the tax rate for a region.
    pub fn rate_for(&self, region: Option<&str>) -> Decimal {
        region
            .map(|region| region.trim().to_ascii_uppercase())
            .and_then(|region| self.rates.get(&region).copied())
            .unwrap_or(self.default_rate)
    }
}

impl Default for TaxTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_matches_known_regions() {
        let table = TaxTable::standard();

        assert_eq!(table.rate_for(Some("CA")), Decimal::new(13, 2));
        assert_eq!(table.rate_for(Some("NY")), Decimal::new(8625, 5));
        assert_eq!(table.rate_for(Some("TX")), Decimal::new(825, 4));
        assert_eq!(table.rate_for(Some("FL")), Decimal::new(7, 2));
    }

    #[test]
    fn region_lookup_is_case_insensitive() {
        let table = TaxTable::standard();

        assert_eq!(table.rate_for(Some("ny")), Decimal::new(8625, 5));
        assert_eq!(table.rate_for(Some(" Tx ")), Decimal::new(825, 4));
    }

    #[test]
    fn unknown_or_missing_region_uses_default() {
        let table = TaxTable::standard();

        assert_eq!(table.rate_for(Some("WA")), Decimal::new(10, 2));
        assert_eq!(table.rate_for(None), Decimal::new(10, 2));
        assert_eq!(table.rate_for(Some("")), table.default_rate());
    }

    #[test]
    fn with_rate_overrides_existing_region() {
        let table = TaxTable::standard().with_rate("ca", Decimal::new(5, 2));

        assert_eq!(table.rate_for(Some("CA")), Decimal::new(5, 2));
    }
}
