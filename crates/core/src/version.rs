// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Results-version resolution.
//!
//! Result files may open with a commented metadata block:
//!
//! ```text
//! # Test general meta start
//! # Results version: v1.1.2743
//! # Tuned: throughput-performance
//! # Test general meta end
//! ```
//!
//! The version token picks the parser. Files without one are treated as
//! the legacy `1.0` layout, and nothing in this module is allowed to fail
//! the pipeline because metadata is missing or unreadable.

use crate::error::{Error, Result};
use crate::record::DEFAULT_VERSION;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Sentinel opening the metadata block.
pub const META_START: &str = "# Test general meta start";

/// Sentinel closing the metadata block.
pub const META_END: &str = "# Test general meta end";

/// Metadata key carrying the version token.
pub const VERSION_KEY: &str = "Results version";

static MAJOR_MINOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\.(\d+)").expect("static regex is valid"));

/// Version information extracted from a result file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Literal version token, absent for legacy files.
    pub raw: Option<String>,
    /// `major.minor` dispatch key, `1.0` by default.
    pub normalized: String,
    /// Every `key: value` pair of the metadata block.
    pub metadata: BTreeMap<String, String>,
}

impl Default for VersionInfo {
    fn default() -> Self {
        Self {
            raw: None,
            normalized: DEFAULT_VERSION.to_string(),
            metadata: BTreeMap::new(),
        }
    }
}

impl VersionInfo {
    /// Resolve version information from file content.
    pub fn from_content(content: &str) -> Self {
        let raw = parse_version_str(content);
        let normalized = normalize(raw.as_deref());
        Self {
            raw,
            normalized,
            metadata: parse_metadata_str(content),
        }
    }

    /// Resolve version information from a file.
    ///
    /// An unreadable file degrades to the default version.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => Self::from_content(&content),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read version metadata");
                Self::default()
            }
        }
    }

    /// Raw version, or the default when the file had none.
    pub fn csv_version(&self) -> &str {
        self.raw.as_deref().unwrap_or(DEFAULT_VERSION)
    }
}

/// Find the raw `Results version` token of a file.
///
/// Returns `None` if the file cannot be read or carries no version before
/// the end sentinel.
pub fn parse_version(path: impl AsRef<Path>) -> Option<String> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => {
            let version = parse_version_str(&content);
            if version.is_none() {
                debug!(path = %path.display(), "no results version, assuming {}", DEFAULT_VERSION);
            }
            version
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "error parsing results version");
            None
        }
    }
}

/// Find the raw `Results version` token in file content.
pub fn parse_version_str(content: &str) -> Option<String> {
    for line in content.lines() {
        let line = line.trim();
        if line == META_END {
            break;
        }
        if let Some((key, value)) = comment_pair(line) {
            if key == VERSION_KEY {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// All `key: value` pairs between the metadata sentinels of a file.
///
/// Unreadable files yield an empty map.
pub fn parse_metadata(path: impl AsRef<Path>) -> BTreeMap<String, String> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => parse_metadata_str(&content),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "error parsing results metadata");
            BTreeMap::new()
        }
    }
}

/// All `key: value` pairs between the metadata sentinels of file content.
///
/// Lines outside the block, lines without a colon and uncommented lines are
/// skipped.
pub fn parse_metadata_str(content: &str) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    let mut in_block = false;

    for line in content.lines() {
        let line = line.trim();
        if line == META_START {
            in_block = true;
            continue;
        }
        if line == META_END {
            break;
        }
        if !in_block {
            continue;
        }
        if let Some((key, value)) = comment_pair(line) {
            metadata.insert(key.to_string(), value.to_string());
        }
    }

    metadata
}

fn comment_pair(line: &str) -> Option<(&str, &str)> {
    let body = line.strip_prefix('#')?.trim();
    let (key, value) = body.split_once(':')?;
    Some((key.trim(), value.trim()))
}

/// Reduce a raw version token to a `major.minor` dispatch key.
///
/// The digits must start the token once a leading `v` is stripped; anything
/// else maps to the default version. Total over all inputs:
///
/// ```
/// use perfsheet_core::version::normalize;
///
/// assert_eq!(normalize(Some("v1.1.2743")), "1.1");
/// assert_eq!(normalize(Some("2.0.1")), "2.0");
/// assert_eq!(normalize(Some("garbage")), "1.0");
/// assert_eq!(normalize(Some("release-2.3")), "1.0");
/// assert_eq!(normalize(None), "1.0");
/// ```
pub fn normalize(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return DEFAULT_VERSION.to_string();
    };
    let stripped = raw.trim().trim_start_matches(['v', 'V']);
    match MAJOR_MINOR.captures(stripped) {
        Some(caps) => format!("{}.{}", &caps[1], &caps[2]),
        None => DEFAULT_VERSION.to_string(),
    }
}

/// Version-keyed handler table.
///
/// This is the single backward-compatibility policy point: an unknown
/// version falls back to the default handler with a warning, and only a
/// table without a default handler refuses it.
#[derive(Debug, Clone)]
pub struct VersionRegistry<H> {
    handlers: BTreeMap<String, H>,
    default_version: String,
}

impl<H> Default for VersionRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> VersionRegistry<H> {
    /// Empty registry with `1.0` as the default version.
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
            default_version: DEFAULT_VERSION.to_string(),
        }
    }

    /// Use another version as the fallback.
    pub fn with_default_version(mut self, version: impl Into<String>) -> Self {
        self.default_version = version.into();
        self
    }

    /// Register `handler` for a normalized version.
    pub fn register(mut self, version: impl Into<String>, handler: H) -> Self {
        self.handlers.insert(version.into(), handler);
        self
    }

    /// Registered versions in ascending order.
    pub fn versions(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    /// Select the handler for `version`.
    pub fn dispatch(&self, version: &str) -> Result<&H> {
        if let Some(handler) = self.handlers.get(version) {
            debug!(version, "using registered handler");
            return Ok(handler);
        }
        if let Some(handler) = self.handlers.get(&self.default_version) {
            warn!(
                version,
                default = %self.default_version,
                "no handler for results version, using default handler"
            );
            return Ok(handler);
        }
        Err(Error::UnsupportedVersion {
            version: version.to_string(),
            supported: self.versions(),
        })
    }
}
