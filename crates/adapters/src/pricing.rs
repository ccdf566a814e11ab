// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Static price sheet lookup.
//!
//! A price sheet is a TOML file of `[[price]]` entries:
//!
//! ```toml
//! [[price]]
//! provider = "aws"
//! region = "us-east-1"
//! os = "rhel"
//! instance = "m5.xlarge"
//! hourly = 0.2810
//! ```
//!
//! Matching is exact on instance and case-insensitive on provider, region
//! and OS.

use perfsheet_core::{LookupError, PricingLookup};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while loading a price sheet.
#[derive(Debug, Error)]
pub enum PriceTableError {
    /// The sheet could not be read
    #[error("Failed to read price sheet: {0}")]
    Io(#[from] std::io::Error),

    /// The sheet is not valid TOML or has the wrong shape
    #[error("Invalid price sheet: {0}")]
    Parse(#[from] toml::de::Error),

    /// An entry carries a negative price
    #[error("Negative hourly price {hourly} for {instance}")]
    NegativePrice {
        /// Instance of the entry
        instance: String,
        /// Offending price
        hourly: f64,
    },
}

/// Result type for price sheet operations.
pub type Result<T> = std::result::Result<T, PriceTableError>;

/// One price sheet entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    /// Cloud provider (`aws`, `gcp`, `azure`)
    pub provider: String,
    /// Region
    pub region: String,
    /// OS type
    pub os: String,
    /// Instance identifier
    pub instance: String,
    /// Hourly on-demand price
    pub hourly: f64,
}

#[derive(Debug, Default, Deserialize)]
struct PriceSheet {
    #[serde(default)]
    price: Vec<PriceEntry>,
}

type PriceKey = (String, String, String, String);

fn price_key(instance: &str, region: &str, provider: &str, os: &str) -> PriceKey {
    (
        instance.to_string(),
        region.to_lowercase(),
        provider.to_lowercase(),
        os.to_lowercase(),
    )
}

/// In-memory price table.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    prices: HashMap<PriceKey, f64>,
}

impl PriceTable {
    /// Table from `entries`; later entries replace earlier ones.
    pub fn new(entries: impl IntoIterator<Item = PriceEntry>) -> Result<Self> {
        let mut prices = HashMap::new();
        for entry in entries {
            if entry.hourly < 0.0 {
                return Err(PriceTableError::NegativePrice {
                    instance: entry.instance,
                    hourly: entry.hourly,
                });
            }
            let key = price_key(&entry.instance, &entry.region, &entry.provider, &entry.os);
            prices.insert(key, entry.hourly);
        }
        Ok(Self { prices })
    }

    /// Parse a TOML price sheet.
    pub fn from_toml(content: &str) -> Result<Self> {
        let sheet: PriceSheet = toml::from_str(content)?;
        Self::new(sheet.price)
    }

    /// Load a TOML price sheet from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let table = Self::from_toml(&fs::read_to_string(path)?)?;
        info!(path = %path.display(), entries = table.len(), "loaded price sheet");
        Ok(table)
    }

    /// Number of prices.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Whether the table has no prices.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl PricingLookup for PriceTable {
    fn hourly_cost(
        &self,
        instance: &str,
        region: &str,
        provider: &str,
        os: &str,
    ) -> std::result::Result<f64, LookupError> {
        match self.prices.get(&price_key(instance, region, provider, os)) {
            Some(hourly) => {
                debug!(instance, region, provider, os, hourly, "price found");
                Ok(*hourly)
            }
            None => Err(LookupError::NotFound {
                instance: instance.to_string(),
                provider: provider.to_string(),
                region: region.to_string(),
                os: os.to_string(),
            }),
        }
    }
}

/// Lookup that never has a price, used when no price sheet is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPricing;

impl PricingLookup for NoPricing {
    fn hourly_cost(
        &self,
        _instance: &str,
        _region: &str,
        _provider: &str,
        _os: &str,
    ) -> std::result::Result<f64, LookupError> {
        Err(LookupError::Unavailable("no price sheet configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = r#"
[[price]]
provider = "aws"
region = "us-east-1"
os = "rhel"
instance = "m5.xlarge"
hourly = 0.281

[[price]]
provider = "gcp"
region = "us-central1"
os = "rhel"
instance = "n2-standard-8"
hourly = 0.5
"#;

    #[test]
    fn test_lookup_from_sheet() {
        let table = PriceTable::from_toml(SHEET).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.hourly_cost("m5.xlarge", "us-east-1", "AWS", "RHEL").unwrap(),
            0.281
        );
        assert!(matches!(
            table.hourly_cost("m5.xlarge", "eu-west-1", "aws", "rhel"),
            Err(LookupError::NotFound { .. })
        ));
    }

    #[test]
    fn test_empty_sheet() {
        let table = PriceTable::from_toml("").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_negative_price_rejected() {
        let sheet = SHEET.replace("hourly = 0.5", "hourly = -0.5");
        assert!(matches!(
            PriceTable::from_toml(&sheet),
            Err(PriceTableError::NegativePrice { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.toml");
        std::fs::write(&path, SHEET).unwrap();
        let table = PriceTable::load(&path).unwrap();
        assert_eq!(
            table.hourly_cost("n2-standard-8", "us-central1", "gcp", "rhel").unwrap(),
            0.5
        );
        assert!(matches!(
            PriceTable::load(dir.path().join("missing.toml")),
            Err(PriceTableError::Io(_))
        ));
    }

    #[test]
    fn test_no_pricing_is_unavailable() {
        assert!(matches!(
            NoPricing.hourly_cost("m5.xlarge", "us-east-1", "aws", "rhel"),
            Err(LookupError::Unavailable(_))
        ));
    }
}
