//! Catalog records: categories, products, release cycles and identifiers.

use crate::utils::content_hash_hex;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Milestones
// ============================================================================

/// An end-of-life or end-of-support milestone.
///
/// Upstream data expresses a milestone either as an absolute date or as a bare
/// flag. A date always wins when both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Milestone {
    /// Absolute date, kept as the upstream string (`YYYY-MM-DD` or RFC 3339)
    Date(String),
    /// Reached (`true`) or not reached (`false`) with no known date
    Flag(bool),
    /// Nothing known
    #[default]
    Unset,
}

impl Milestone {
    /// Build a milestone from the upstream `(isX, xFrom)` pair.
    #[must_use]
    pub fn from_parts(flag: Option<bool>, date: Option<&str>) -> Self {
        match (date.map(str::trim).filter(|d| !d.is_empty()), flag) {
            (Some(d), _) => Self::Date(d.to_string()),
            (None, Some(f)) => Self::Flag(f),
            (None, None) => Self::Unset,
        }
    }

    /// The milestone date string, if this is a date milestone.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        match self {
            Self::Date(d) => Some(d),
            _ => None,
        }
    }

    /// The flag, if this is a flag milestone.
    #[must_use]
    pub const fn flag(&self) -> Option<bool> {
        match self {
            Self::Flag(f) => Some(*f),
            _ => None,
        }
    }

    /// Whether the milestone is flagged as reached.
    #[must_use]
    pub const fn is_flagged(&self) -> bool {
        matches!(self, Self::Flag(true))
    }

    #[must_use]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(d) => write!(f, "{d}"),
            Self::Flag(true) => write!(f, "yes"),
            Self::Flag(false) => write!(f, "no"),
            Self::Unset => write!(f, "-"),
        }
    }
}

// ============================================================================
// Categories and products
// ============================================================================

/// A product category such as `lang` or `os`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub label: String,
    pub total_products: i64,
}

/// Product payload accepted by the store on upsert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductData {
    pub name: String,
    pub category: Option<String>,
    pub label: Option<String>,
    pub link: Option<String>,
    pub version_command: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ProductData {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the display label
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Replace the alias list
    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Deterministic digest of the product payload.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        content_hash_hex(&bytes)
    }
}

/// A product as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub label: Option<String>,
    pub link: Option<String>,
    pub version_command: Option<String>,
    pub aliases: Vec<String>,
    pub tags: Vec<String>,
    pub content_hash: Option<String>,
}

// ============================================================================
// Cycles
// ============================================================================

/// One maintained release line of a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    /// Cycle name, e.g. `3.12` or `22`
    pub name: String,
    pub label: Option<String>,
    pub codename: Option<String>,
    pub release_date: Option<String>,
    pub eol: Milestone,
    pub is_lts: bool,
    pub lts_from: Option<String>,
    /// End of active support
    pub support: Milestone,
    pub is_maintained: bool,
    pub latest_version: Option<String>,
    pub latest_release_date: Option<String>,
    pub latest_link: Option<String>,
}

impl Cycle {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the EOL milestone
    #[must_use]
    pub fn with_eol(mut self, eol: Milestone) -> Self {
        self.eol = eol;
        self
    }

    /// Set the release date
    #[must_use]
    pub fn with_release_date(mut self, date: impl Into<String>) -> Self {
        self.release_date = Some(date.into());
        self
    }

    /// Set the maintained flag
    #[must_use]
    pub const fn maintained(mut self, is_maintained: bool) -> Self {
        self.is_maintained = is_maintained;
        self
    }

    /// Set the LTS flag
    #[must_use]
    pub const fn lts(mut self, is_lts: bool) -> Self {
        self.is_lts = is_lts;
        self
    }

    /// Set the latest version in this cycle
    #[must_use]
    pub fn with_latest(mut self, version: impl Into<String>) -> Self {
        self.latest_version = Some(version.into());
        self
    }

    /// Deterministic digest over every semantic field.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        content_hash_hex(&bytes)
    }
}

/// A cycle that has reached or will reach EOL, with its owning product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EolEntry {
    pub product: String,
    pub category: Option<String>,
    pub cycle: Cycle,
}

// ============================================================================
// Identifiers
// ============================================================================

/// The scheme an identifier belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentifierType {
    Purl,
    Cpe,
    Repology,
    /// Any other scheme, kept verbatim
    Other(String),
}

impl IdentifierType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Purl => "purl",
            Self::Cpe => "cpe",
            Self::Repology => "repology",
            Self::Other(s) => s,
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "purl" => Self::Purl,
            "cpe" => Self::Cpe,
            "repology" => Self::Repology,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for IdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for IdentifierType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for IdentifierType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// A typed external identifier attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "type")]
    pub kind: IdentifierType,
    pub value: String,
}

impl Identifier {
    pub fn new(kind: IdentifierType, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn purl(value: impl Into<String>) -> Self {
        Self::new(IdentifierType::Purl, value)
    }

    pub fn cpe(value: impl Into<String>) -> Self {
        Self::new(IdentifierType::Cpe, value)
    }

    pub fn repology(value: impl Into<String>) -> Self {
        Self::new(IdentifierType::Repology, value)
    }

    /// Identifiers with an empty scheme or value are never stored.
    #[must_use]
    pub fn is_storable(&self) -> bool {
        !self.kind.as_str().is_empty() && !self.value.is_empty()
    }
}

// ============================================================================
// Sync metadata
// ============================================================================

/// Singleton record describing the last catalog sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMetadata {
    pub last_full_sync: Option<String>,
    pub last_update_check: Option<String>,
    pub categories_synced: Vec<String>,
    pub products_count: i64,
    pub cycles_count: i64,
    pub identifiers_count: i64,
}
