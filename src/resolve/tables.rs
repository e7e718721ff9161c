//! Static lookup tables used by the resolver.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Immutable mapping tables consulted during resolution.
///
/// The built-in tables cover the package types emitted by common SBOM
/// generators and the Linux distributions tracked by endoflife.date. Map
/// order is significant wherever a key has several candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupTables {
    /// Package type → distro namespaces tried as `pkg:<type>/<distro>/<name>`
    pub distro_namespaces: IndexMap<String, Vec<String>>,
    /// Package type → PURL type
    pub purl_types: IndexMap<String, String>,
    /// Package-name suffixes stripped before name lookups, first match wins
    pub name_suffixes: Vec<String>,
    /// OS release `ID` → catalog product name
    pub os_products: IndexMap<String, String>,
}

impl Default for LookupTables {
    fn default() -> Self {
        Self::builtin()
    }
}

fn owned<const N: usize>(pairs: [(&str, &str); N]) -> IndexMap<String, String> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl LookupTables {
    /// The built-in tables.
    #[must_use]
    pub fn builtin() -> Self {
        let distro_namespaces = [
            ("deb", &["debian", "ubuntu"][..]),
            ("rpm", &["fedora", "redhat", "centos", "amzn"][..]),
            ("apk", &["alpine"][..]),
        ]
        .into_iter()
        .map(|(ty, distros)| {
            (
                ty.to_string(),
                distros.iter().map(|d| (*d).to_string()).collect(),
            )
        })
        .collect();

        let purl_types = owned([
            ("python", "pypi"),
            ("gem", "gem"),
            ("npm", "npm"),
            ("go-module", "golang"),
            ("cargo", "cargo"),
            ("pub", "pub"),
            ("hex", "hex"),
            ("cocoapods", "cocoapods"),
            ("hackage", "hackage"),
            ("java-archive", "maven"),
            ("jenkins-plugin", "maven"),
            ("nuget", "nuget"),
            ("composer", "composer"),
            ("conan", "conan"),
            ("apk", "apk"),
            ("deb", "deb"),
            ("rpm", "rpm"),
        ]);

        let name_suffixes = ["-dev", "-devel", "-libs", "-common", "-bin", "-tools", "-utils"]
            .into_iter()
            .map(str::to_string)
            .collect();

        let os_products = owned([
            ("debian", "debian"),
            ("ubuntu", "ubuntu"),
            ("alpine", "alpine-linux"),
            ("centos", "centos"),
            ("rhel", "rhel"),
            ("fedora", "fedora"),
            ("amzn", "amazon-linux"),
            ("amazonlinux", "amazon-linux"),
            ("almalinux", "almalinux"),
            ("rocky", "rocky-linux"),
            ("opensuse", "opensuse"),
            ("sles", "sles"),
            ("ol", "oracle-linux"),
            ("oraclelinux", "oracle-linux"),
            ("arch", "arch"),
            ("manjaro", "manjaro"),
            ("linuxmint", "linuxmint"),
            ("pop", "pop-os"),
            ("elementary", "elementary-os"),
            ("nixos", "nixos"),
            ("void", "void-linux"),
            ("gentoo", "gentoo"),
            ("slackware", "slackware"),
            ("photon", "photon"),
            ("clear-linux", "clear-linux"),
            ("flatcar", "flatcar"),
        ]);

        Self {
            distro_namespaces,
            purl_types,
            name_suffixes,
            os_products,
        }
    }

    /// Distro namespaces for a package type, in lookup order.
    #[must_use]
    pub fn distros_for(&self, package_type: &str) -> &[String] {
        self.distro_namespaces
            .get(package_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// PURL type for a package type, if mapped.
    #[must_use]
    pub fn purl_type_for(&self, package_type: &str) -> Option<&str> {
        self.purl_types.get(package_type).map(String::as_str)
    }

    /// Strip the first configured suffix that `name` ends with.
    ///
    /// Only one suffix is removed, and only when something remains.
    /// `lib-dev-utils` becomes `lib-dev`.
    #[must_use]
    pub fn strip_suffix<'n>(&self, name: &'n str) -> &'n str {
        self.name_suffixes
            .iter()
            .find(|suffix| name.len() > suffix.len() && name.ends_with(suffix.as_str()))
            .map_or(name, |suffix| &name[..name.len() - suffix.len()])
    }

    /// Catalog product for an OS release `ID`, matched case-insensitively.
    /// Unknown IDs map to themselves.
    #[must_use]
    pub fn os_product<'i>(&'i self, distro_id: &'i str) -> &'i str {
        self.os_products
            .get(distro_id.to_lowercase().as_str())
            .map_or(distro_id, String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_suffix() {
        let tables = LookupTables::builtin();
        assert_eq!(tables.strip_suffix("libssl-dev"), "libssl");
        assert_eq!(tables.strip_suffix("lib-dev-utils"), "lib-dev");
        assert_eq!(tables.strip_suffix("dev-tools-extra"), "dev-tools-extra");
        assert_eq!(tables.strip_suffix("-dev"), "-dev");
        assert_eq!(tables.strip_suffix("nginx"), "nginx");
    }

    #[test]
    fn test_os_product_mapping() {
        let tables = LookupTables::builtin();
        assert_eq!(tables.os_product("alpine"), "alpine-linux");
        assert_eq!(tables.os_product("AMZN"), "amazon-linux");
        assert_eq!(tables.os_product("wolfi"), "wolfi");
    }

    #[test]
    fn test_type_tables() {
        let tables = LookupTables::builtin();
        assert_eq!(tables.purl_type_for("python"), Some("pypi"));
        assert_eq!(tables.purl_type_for("jenkins-plugin"), Some("maven"));
        assert_eq!(tables.purl_type_for("binary"), None);
        assert_eq!(tables.distros_for("rpm").len(), 4);
        assert_eq!(tables.distros_for("deb")[0], "debian");
        assert!(tables.distros_for("npm").is_empty());
    }
}
