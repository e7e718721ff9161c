//! Wire types for the endoflife.date `products/full` payload.

use crate::model::{Cycle, Identifier, IdentifierType, Milestone, ProductData};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Envelope returned by `GET /api/v1/products/full`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductsResponse {
    #[serde(default)]
    pub result: Vec<ProductRecord>,
    #[serde(default)]
    pub total: usize,
}

/// One upstream product with its identifiers and releases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub links: BTreeMap<String, Option<String>>,
    #[serde(default)]
    pub version_command: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub aliases: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub identifiers: Vec<IdentifierRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub releases: Vec<ReleaseRecord>,
}

/// `{type, id}` identifier pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierRecord {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub id: String,
}

/// One upstream release cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseRecord {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub codename: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub is_eol: Option<bool>,
    #[serde(default)]
    pub eol_from: Option<String>,
    #[serde(default)]
    pub is_eoas: Option<bool>,
    #[serde(default)]
    pub eoas_from: Option<String>,
    #[serde(default)]
    pub is_lts: Option<bool>,
    #[serde(default)]
    pub lts_from: Option<String>,
    #[serde(default)]
    pub latest: Option<LatestRecord>,
    #[serde(default)]
    pub is_maintained: Option<bool>,
}

/// `latest` is either a bare version string or `{name, date, link}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LatestRecord {
    Version(String),
    Detailed {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        date: Option<String>,
        #[serde(default)]
        link: Option<String>,
    },
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl ProductRecord {
    /// Product payload for the store.
    #[must_use]
    pub fn to_product(&self) -> ProductData {
        ProductData {
            name: self.name.clone(),
            category: non_empty(Some(&self.category)),
            label: non_empty(Some(&self.label)),
            link: non_empty(self.links.get("html").and_then(Option::as_deref)),
            version_command: non_empty(self.version_command.as_deref()),
            aliases: self.aliases.clone(),
            tags: self.tags.clone(),
        }
    }

    /// Identifiers in upstream order. Empty entries are kept; the store skips them.
    #[must_use]
    pub fn to_identifiers(&self) -> Vec<Identifier> {
        self.identifiers
            .iter()
            .map(|i| Identifier::new(IdentifierType::parse(&i.kind), i.id.clone()))
            .collect()
    }
}

impl ReleaseRecord {
    #[must_use]
    pub fn to_cycle(&self) -> Cycle {
        let (latest_version, latest_release_date, latest_link) = match &self.latest {
            Some(LatestRecord::Version(v)) => (non_empty(Some(v)), None, None),
            Some(LatestRecord::Detailed { name, date, link }) => (
                non_empty(name.as_deref()),
                non_empty(date.as_deref()),
                non_empty(link.as_deref()),
            ),
            None => (None, None, None),
        };
        Cycle {
            name: self.name.clone(),
            label: non_empty(self.label.as_deref()),
            codename: non_empty(self.codename.as_deref()),
            release_date: non_empty(self.release_date.as_deref()),
            eol: Milestone::from_parts(self.is_eol, self.eol_from.as_deref()),
            is_lts: self.is_lts.unwrap_or(false),
            lts_from: non_empty(self.lts_from.as_deref()),
            support: Milestone::from_parts(self.is_eoas, self.eoas_from.as_deref()),
            is_maintained: self.is_maintained.unwrap_or(false),
            latest_version,
            latest_release_date,
            latest_link,
        }
    }
}
