// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Cloud instance naming taxonomy.
//!
//! Each provider names its instances differently. An [`InstanceTaxonomy`]
//! decomposes an identifier into an [`InstanceKey`] and defines the order of
//! instance groups for its provider. The taxonomy is selected once from the
//! configured [`Provider`] and shared by parsing and grouping.
//!
//! | provider | example        | family        | version | feature | size |
//! |----------|----------------|---------------|---------|---------|------|
//! | local    | `lab-box-01`   | `lab-box-01`  |         |         |      |
//! | aws      | `m5.2xlarge`   | `m5`          |         |         | 2    |
//! | gcp      | `n2-standard-8`| `n2-standard` |         |         | 8    |
//! | azure    | `D4s`          | `D`           | `4`     | `s`     |      |
//!
//! Identifiers that do not fit the provider's shape decompose to an
//! all-absent key, which is ungroupable and sorts last.

use crate::config::Provider;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

static ALPHA_DIGITS_ALPHA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]*)(\d+)([A-Za-z]*)$").expect("static regex is valid"));

/// Taxonomy fields of an instance identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceKey {
    /// Instance family.
    pub family: Option<String>,
    /// Generation or version within the family.
    pub version: Option<String>,
    /// Sub-family, for providers that have one.
    pub sub_family: Option<String>,
    /// Feature suffix (e.g. local disk, AMD).
    pub feature: Option<String>,
    /// Size within the group.
    pub size: Option<u32>,
}

impl InstanceKey {
    /// Key with only a family.
    pub fn family(family: impl Into<String>) -> Self {
        Self {
            family: Some(family.into()),
            ..Self::default()
        }
    }

    /// All-absent key.
    pub fn ungroupable() -> Self {
        Self::default()
    }

    /// Whether decomposition failed.
    pub fn is_ungroupable(&self) -> bool {
        self.family.is_none()
            && self.version.is_none()
            && self.sub_family.is_none()
            && self.feature.is_none()
            && self.size.is_none()
    }

    /// Every field except `size`; equal tuples mean same group.
    pub fn group_fields(&self) -> (Option<&str>, Option<&str>, Option<&str>, Option<&str>) {
        (
            self.family.as_deref(),
            self.version.as_deref(),
            self.sub_family.as_deref(),
            self.feature.as_deref(),
        )
    }

    /// Whether two keys belong to the same group.
    pub fn same_group(&self, other: &InstanceKey) -> bool {
        self.group_fields() == other.group_fields()
    }
}

/// One component of a cross-group ordering key.
///
/// Numbers sort before text and absent parts sort after both.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum OrderPart {
    /// Numeric component, compared numerically.
    Number(u64),
    /// Text component, compared lexicographically.
    Text(String),
    /// Absent component.
    Missing,
}

impl OrderPart {
    fn text(value: Option<&str>) -> Self {
        value.map_or(Self::Missing, |v| Self::Text(v.to_string()))
    }

    fn number(value: Option<&str>) -> Self {
        match value {
            Some(v) => v
                .parse()
                .map(Self::Number)
                .unwrap_or_else(|_| Self::Text(v.to_string())),
            None => Self::Missing,
        }
    }
}

/// Provider-specific decomposition and group ordering.
pub trait InstanceTaxonomy: Debug + Send + Sync {
    /// Provider this taxonomy implements.
    fn provider(&self) -> Provider;

    /// Decompose an identifier; never fails.
    fn decompose(&self, identifier: &str) -> InstanceKey;

    /// Key ordering groups relative to each other.
    fn order_key(&self, key: &InstanceKey) -> Vec<OrderPart>;
}

/// Select the taxonomy for a provider.
pub fn taxonomy_for(provider: Provider) -> Box<dyn InstanceTaxonomy> {
    match provider {
        Provider::Local => Box::new(LocalTaxonomy),
        Provider::Aws => Box::new(AwsTaxonomy),
        Provider::Gcp => Box::new(GcpTaxonomy),
        Provider::Azure => Box::new(AzureTaxonomy),
    }
}

/// Decompose `identifier` under the convention of `provider`.
pub fn decompose(identifier: &str, provider: Provider) -> InstanceKey {
    taxonomy_for(provider).decompose(identifier)
}

/// Local systems: the whole identifier is the family.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTaxonomy;

impl InstanceTaxonomy for LocalTaxonomy {
    fn provider(&self) -> Provider {
        Provider::Local
    }

    fn decompose(&self, identifier: &str) -> InstanceKey {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return InstanceKey::ungroupable();
        }
        InstanceKey::family(identifier)
    }

    fn order_key(&self, key: &InstanceKey) -> Vec<OrderPart> {
        vec![OrderPart::text(key.family.as_deref())]
    }
}

/// `family.size`, e.g. `m5.2xlarge`.
///
/// The size is the leading digit run of the part after the dot, so
/// `xlarge` has no size and sorts after the sized members of its family.
#[derive(Debug, Clone, Copy, Default)]
pub struct AwsTaxonomy;

impl InstanceTaxonomy for AwsTaxonomy {
    fn provider(&self) -> Provider {
        Provider::Aws
    }

    fn decompose(&self, identifier: &str) -> InstanceKey {
        let parts: Vec<&str> = identifier.trim().split('.').collect();
        let [family, size] = parts.as_slice() else {
            return InstanceKey::ungroupable();
        };
        if family.is_empty() {
            return InstanceKey::ungroupable();
        }
        let digits: String = size.chars().take_while(char::is_ascii_digit).collect();
        InstanceKey {
            size: digits.parse().ok(),
            ..InstanceKey::family(*family)
        }
    }

    fn order_key(&self, key: &InstanceKey) -> Vec<OrderPart> {
        vec![OrderPart::text(key.family.as_deref())]
    }
}

/// `family-…-size`, e.g. `n2-standard-8`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GcpTaxonomy;

impl InstanceTaxonomy for GcpTaxonomy {
    fn provider(&self) -> Provider {
        Provider::Gcp
    }

    fn decompose(&self, identifier: &str) -> InstanceKey {
        let Some((family, size)) = identifier.trim().rsplit_once('-') else {
            return InstanceKey::ungroupable();
        };
        match size.parse::<u32>() {
            Ok(size) if !family.is_empty() => InstanceKey {
                size: Some(size),
                ..InstanceKey::family(family)
            },
            _ => InstanceKey::ungroupable(),
        }
    }

    fn order_key(&self, key: &InstanceKey) -> Vec<OrderPart> {
        vec![
            OrderPart::text(key.family.as_deref()),
            OrderPart::number(key.version.as_deref()),
            OrderPart::text(key.sub_family.as_deref()),
        ]
    }
}

/// `<alpha><digits><alpha>`, e.g. `D4s` or `E64ads`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AzureTaxonomy;

impl InstanceTaxonomy for AzureTaxonomy {
    fn provider(&self) -> Provider {
        Provider::Azure
    }

    fn decompose(&self, identifier: &str) -> InstanceKey {
        let Some(caps) = ALPHA_DIGITS_ALPHA.captures(identifier.trim()) else {
            return InstanceKey::ungroupable();
        };
        let Ok(version) = caps[2].parse::<u64>() else {
            return InstanceKey::ungroupable();
        };
        let feature = &caps[3];
        InstanceKey {
            version: Some(version.to_string()),
            feature: (!feature.is_empty()).then(|| feature.to_string()),
            ..InstanceKey::family(&caps[1])
        }
    }

    fn order_key(&self, key: &InstanceKey) -> Vec<OrderPart> {
        vec![
            OrderPart::text(key.family.as_deref()),
            OrderPart::number(key.version.as_deref()),
            OrderPart::text(key.feature.as_deref()),
        ]
    }
}
