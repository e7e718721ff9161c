//! Component-to-product resolution.
//!
//! A [`Resolver`] runs an ordered chain of catalog lookups and stops at the
//! first hit:
//!
//! 1. exact PURL
//! 2. PURL without its version, as a prefix
//! 3. distro-qualified PURL for `deb`, `rpm` and `apk` packages
//! 4. ecosystem PURL derived from the package type
//! 5. `pkg:generic/<name>`
//! 6. each CPE, exact then as a prefix (case-insensitive)
//! 7. the package name (suffix-stripped), then aliases, then repology
//!
//! Every step is a read, so one resolver can serve many threads.

mod tables;

pub use tables::LookupTables;

use crate::error::Result;
use crate::model::{ComponentDescriptor, IdentifierType, OsDescriptor, Product};
use crate::store::CatalogStore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which lookup produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStrategy {
    ExactPurl,
    PurlPrefix,
    DistroPurl,
    EcosystemPurl,
    GenericPurl,
    Cpe,
    Name,
    Os,
}

impl MatchStrategy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ExactPurl => "exact-purl",
            Self::PurlPrefix => "purl-prefix",
            Self::DistroPurl => "distro-purl",
            Self::EcosystemPurl => "ecosystem-purl",
            Self::GenericPurl => "generic-purl",
            Self::Cpe => "cpe",
            Self::Name => "name",
            Self::Os => "os",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A matched catalog product and how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub product: Product,
    pub strategy: MatchStrategy,
}

impl Resolution {
    const fn new(product: Product, strategy: MatchStrategy) -> Self {
        Self { product, strategy }
    }
}

/// Resolves component and OS descriptors against a catalog.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    store: &'a CatalogStore,
    tables: &'a LookupTables,
}

impl<'a> Resolver<'a> {
    pub const fn new(store: &'a CatalogStore, tables: &'a LookupTables) -> Self {
        Self { store, tables }
    }

    #[must_use]
    pub const fn tables(&self) -> &'a LookupTables {
        self.tables
    }

    /// Resolve a component, or `None` when no strategy matches.
    pub fn resolve(&self, component: &ComponentDescriptor) -> Result<Option<Resolution>> {
        let hit = self.first_match(component)?;
        match &hit {
            Some(r) => tracing::debug!(
                "Resolved {}@{} to {} via {}",
                component.name,
                component.version,
                r.product.name,
                r.strategy
            ),
            None => tracing::trace!("No catalog match for {}@{}", component.name, component.version),
        }
        Ok(hit)
    }

    fn first_match(&self, component: &ComponentDescriptor) -> Result<Option<Resolution>> {
        use MatchStrategy as S;

        if let Some(purl) = component.purl() {
            if let Some(p) = self.store.find_by_identifier_exact(&IdentifierType::Purl, purl)? {
                return Ok(Some(Resolution::new(p, S::ExactPurl)));
            }
            let base = strip_purl_version(purl);
            if let Some(p) = self.store.find_by_identifier_prefix(&IdentifierType::Purl, base)? {
                return Ok(Some(Resolution::new(p, S::PurlPrefix)));
            }
        }

        let name = component.name.as_str();
        let kind = component.kind.to_lowercase();

        if !name.is_empty() {
            for distro in self.tables.distros_for(&kind) {
                let namespace = format!("{kind}/{distro}");
                if let Some(p) = self.store.find_by_purl_namespace(&namespace, name)? {
                    return Ok(Some(Resolution::new(p, S::DistroPurl)));
                }
            }

            if let Some(purl_type) = self.tables.purl_type_for(&kind)
                && let Some(p) = self.store.find_by_purl_namespace(purl_type, name)?
            {
                return Ok(Some(Resolution::new(p, S::EcosystemPurl)));
            }

            if let Some(p) = self.store.find_by_purl_namespace("generic", name)? {
                return Ok(Some(Resolution::new(p, S::GenericPurl)));
            }
        }

        for cpe in component.cpes.iter().filter(|c| !c.is_empty()) {
            let hit = match self.store.find_by_identifier_ci(&IdentifierType::Cpe, cpe)? {
                Some(p) => Some(p),
                None => self
                    .store
                    .find_by_identifier_prefix_ci(&IdentifierType::Cpe, cpe)?,
            };
            if let Some(p) = hit {
                return Ok(Some(Resolution::new(p, S::Cpe)));
            }
        }

        Ok(self
            .lookup_by_name(name)?
            .map(|p| Resolution::new(p, S::Name)))
    }

    /// Resolve an operating system through the distro table, then by name.
    pub fn resolve_os(&self, os: &OsDescriptor) -> Result<Option<Resolution>> {
        let product = self.tables.os_product(&os.id);
        let hit = self
            .lookup_by_name(product)?
            .map(|p| Resolution::new(p, MatchStrategy::Os));
        match &hit {
            Some(r) => tracing::debug!("Resolved OS {} to {}", os.id, r.product.name),
            None => tracing::debug!("No catalog match for OS {:?}", os.id),
        }
        Ok(hit)
    }

    /// Name fallback: suffix-stripped name, then alias, then repology id.
    fn lookup_by_name(&self, name: &str) -> Result<Option<Product>> {
        let name = self.tables.strip_suffix(name.trim());
        if name.is_empty() {
            return Ok(None);
        }
        if let Some(p) = self.store.find_by_name_ci(name)? {
            return Ok(Some(p));
        }
        if let Some(p) = self.store.find_by_alias(name)? {
            return Ok(Some(p));
        }
        self.store.find_by_identifier_ci(&IdentifierType::Repology, name)
    }
}

/// Drop the `@version`, qualifiers and subpath from a PURL.
///
/// An `@` inside the namespace, as in an unencoded npm scope, is kept.
#[must_use]
pub fn strip_purl_version(purl: &str) -> &str {
    let head = &purl[..purl.find(['?', '#']).unwrap_or(purl.len())];
    let last_slash = head.rfind('/').unwrap_or(0);
    match head.rfind('@') {
        Some(at) if at > last_slash => &head[..at],
        _ => head,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_purl_version() {
        assert_eq!(strip_purl_version("pkg:pypi/django@4.2.1"), "pkg:pypi/django");
        assert_eq!(
            strip_purl_version("pkg:deb/debian/openssl@3.0.11-1?arch=amd64"),
            "pkg:deb/debian/openssl"
        );
        assert_eq!(strip_purl_version("pkg:npm/@angular/core"), "pkg:npm/@angular/core");
        assert_eq!(strip_purl_version("pkg:npm/@angular/core@17.0.0"), "pkg:npm/@angular/core");
        assert_eq!(strip_purl_version("pkg:generic/nginx"), "pkg:generic/nginx");
        assert_eq!(
            strip_purl_version("pkg:maven/org.x/lib@1.0?repository_url=https://repo/x"),
            "pkg:maven/org.x/lib"
        );
    }

    #[test]
    fn test_strategy_labels() {
        assert_eq!(MatchStrategy::ExactPurl.to_string(), "exact-purl");
        assert_eq!(
            serde_json::to_string(&MatchStrategy::EcosystemPurl).unwrap(),
            "\"ecosystem-purl\""
        );
    }
}
