//! Component and operating-system descriptors handed to the resolver.

use serde::{Deserialize, Serialize};

/// A software component detected in an image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    pub name: String,
    #[serde(default)]
    pub version: String,
    /// Package type as reported by the SBOM generator (`python`, `deb`, ...)
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cpes: Vec<String>,
}

impl ComponentDescriptor {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Set the package type
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Set the package URL
    #[must_use]
    pub fn with_purl(mut self, purl: impl Into<String>) -> Self {
        self.purl = Some(purl.into());
        self
    }

    /// Add a CPE string
    #[must_use]
    pub fn with_cpe(mut self, cpe: impl Into<String>) -> Self {
        self.cpes.push(cpe.into());
        self
    }

    /// The package URL, treating an empty string as absent.
    #[must_use]
    pub fn purl(&self) -> Option<&str> {
        self.purl.as_deref().filter(|p| !p.is_empty())
    }
}

/// Operating-system release fields (as in `/etc/os-release`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, alias = "versionID", alias = "versionId")]
    pub version_id: String,
    #[serde(default, alias = "prettyName")]
    pub pretty_name: String,
}

impl OsDescriptor {
    /// Version used for cycle matching: `version_id`, else `version`.
    #[must_use]
    pub fn match_version(&self) -> &str {
        if self.version_id.is_empty() {
            &self.version
        } else {
            &self.version_id
        }
    }

    /// Human-readable name for reports.
    #[must_use]
    pub fn display_name(&self) -> String {
        if !self.pretty_name.is_empty() {
            self.pretty_name.clone()
        } else {
            format!("{} {}", self.name, self.version).trim().to_string()
        }
    }
}
