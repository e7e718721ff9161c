//! Component inventories produced by external SBOM generators.
//!
//! Two JSON layouts are accepted, detected by their top-level keys:
//!
//! - native: `{"components": [...], "os": {...}}`
//! - syft: `{"artifacts": [...], "distro": {...}, "source": {...}}`

use crate::error::{EolScanError, InventoryErrorKind, Result};
use crate::model::{ComponentDescriptor, OsDescriptor};
use packageurl::PackageUrl;
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Detected inventory layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryFormat {
    Native,
    Syft,
}

impl InventoryFormat {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Syft => "syft",
        }
    }

    /// Detect the layout from a parsed document.
    #[must_use]
    pub fn detect(doc: &Value) -> Option<Self> {
        let obj = doc.as_object()?;
        if obj.get("components").is_some_and(Value::is_array) {
            Some(Self::Native)
        } else if obj.get("artifacts").is_some_and(Value::is_array) {
            Some(Self::Syft)
        } else {
            None
        }
    }
}

/// Components (and optionally the OS) to scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub components: Vec<ComponentDescriptor>,
    pub os: Option<OsDescriptor>,
    /// What was scanned, e.g. an image reference
    pub source: Option<String>,
}

#[derive(Deserialize)]
struct NativeDocument {
    components: Vec<ComponentDescriptor>,
    #[serde(default)]
    os: Option<OsDescriptor>,
    #[serde(default)]
    source: Option<String>,
}

#[derive(Deserialize)]
struct SyftDocument {
    artifacts: Vec<SyftArtifact>,
    #[serde(default)]
    distro: Option<OsDescriptor>,
    #[serde(default)]
    source: Option<SyftSource>,
}

#[derive(Deserialize)]
struct SyftArtifact {
    name: String,
    #[serde(default)]
    version: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    purl: Option<String>,
    #[serde(default)]
    cpes: Vec<SyftCpe>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SyftCpe {
    Plain(String),
    Detailed { cpe: String },
}

#[derive(Deserialize)]
struct SyftSource {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    metadata: Option<Value>,
}

impl SyftSource {
    fn reference(&self) -> Option<String> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("userInput"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| self.name.clone())
            .filter(|s| !s.is_empty())
    }
}

impl Inventory {
    /// Read an inventory from a file, or from stdin when `path` is `-`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = if path.as_os_str() == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| EolScanError::io("<stdin>", e))?;
            buf
        } else {
            std::fs::read_to_string(path).map_err(|e| EolScanError::io(path, e))?
        };
        let mut inventory = Self::parse(&content)?;
        if inventory.source.is_none() && path.as_os_str() != "-" {
            inventory.source = Some(path.display().to_string());
        }
        Ok(inventory)
    }

    /// Parse an inventory document.
    pub fn parse(content: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(content)?;
        let format = InventoryFormat::detect(&doc).ok_or_else(|| {
            EolScanError::inventory("detecting format", InventoryErrorKind::UnknownFormat)
        })?;
        tracing::debug!("Detected {} inventory", format.name());

        let mut inventory = match format {
            InventoryFormat::Native => {
                let doc: NativeDocument = serde_json::from_value(doc)?;
                Self {
                    components: doc.components,
                    os: doc.os,
                    source: doc.source,
                }
            }
            InventoryFormat::Syft => {
                let doc: SyftDocument = serde_json::from_value(doc)?;
                Self {
                    components: doc.artifacts.into_iter().map(SyftArtifact::into_component).collect(),
                    os: doc.distro,
                    source: doc.source.as_ref().and_then(SyftSource::reference),
                }
            }
        };

        for component in &mut inventory.components {
            if component.kind.is_empty()
                && let Some(kind) = component.purl().and_then(package_type_from_purl)
            {
                component.kind = kind;
            }
        }
        // An all-empty distro block means no OS was detected.
        if inventory
            .os
            .as_ref()
            .is_some_and(|os| os.id.is_empty() && os.name.is_empty())
        {
            inventory.os = None;
        }
        Ok(inventory)
    }
}

impl SyftArtifact {
    fn into_component(self) -> ComponentDescriptor {
        ComponentDescriptor {
            name: self.name,
            version: self.version,
            kind: self.kind,
            purl: self.purl.filter(|p| !p.is_empty()),
            cpes: self
                .cpes
                .into_iter()
                .map(|c| match c {
                    SyftCpe::Plain(s) | SyftCpe::Detailed { cpe: s } => s,
                })
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }
}

/// Package type implied by a PURL, in the vocabulary SBOM generators use.
fn package_type_from_purl(purl: &str) -> Option<String> {
    let parsed = PackageUrl::from_str(purl).ok()?;
    let kind = match parsed.ty() {
        "pypi" => "python",
        "golang" => "go-module",
        "maven" => "java-archive",
        other => other,
    };
    Some(kind.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_inventory() {
        let json = r#"{
            "components": [
                {"name": "django", "version": "4.2.1", "type": "python", "purl": "pkg:pypi/django@4.2.1"},
                {"name": "left-pad", "version": "1.3.0", "purl": "pkg:npm/left-pad@1.3.0"}
            ],
            "os": {"id": "debian", "versionId": "12", "prettyName": "Debian GNU/Linux 12 (bookworm)"}
        }"#;
        let inv = Inventory::parse(json).unwrap();
        assert_eq!(inv.components.len(), 2);
        assert_eq!(inv.components[1].kind, "npm");
        let os = inv.os.unwrap();
        assert_eq!(os.version_id, "12");
        assert_eq!(os.display_name(), "Debian GNU/Linux 12 (bookworm)");
    }

    #[test]
    fn test_syft_inventory() {
        let json = r#"{
            "artifacts": [
                {
                    "name": "openssl",
                    "version": "3.0.11-1~deb12u2",
                    "type": "deb",
                    "purl": "pkg:deb/debian/openssl@3.0.11-1~deb12u2?arch=amd64",
                    "cpes": [
                        "cpe:2.3:a:openssl:openssl:3.0.11:*:*:*:*:*:*:*",
                        {"cpe": "cpe:2.3:a:openssl_project:openssl:3.0.11:*:*:*:*:*:*:*", "source": "syft-generated"}
                    ]
                },
                {"name": "requests", "version": "2.31.0", "purl": "pkg:pypi/requests@2.31.0"}
            ],
            "distro": {"name": "Debian GNU/Linux", "id": "debian", "versionID": "12"},
            "source": {"name": "python", "metadata": {"userInput": "python:3.12-slim"}}
        }"#;
        let inv = Inventory::parse(json).unwrap();
        assert_eq!(inv.components[0].cpes.len(), 2);
        assert_eq!(inv.components[1].kind, "python");
        assert_eq!(inv.os.unwrap().version_id, "12");
        assert_eq!(inv.source.as_deref(), Some("python:3.12-slim"));
    }

    #[test]
    fn test_empty_distro_is_dropped() {
        let inv = Inventory::parse(r#"{"artifacts": [], "distro": {}}"#).unwrap();
        assert!(inv.os.is_none());
        assert!(inv.components.is_empty());
    }

    #[test]
    fn test_unknown_format() {
        let err = Inventory::parse(r#"{"packages": []}"#).unwrap_err();
        assert!(matches!(
            err,
            EolScanError::Inventory {
                source: InventoryErrorKind::UnknownFormat,
                ..
            }
        ));
        let err = Inventory::parse("not json").unwrap_err();
        assert!(matches!(err, EolScanError::Inventory { .. }));
    }

    #[test]
    fn test_from_path_records_source() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), r#"{"components": []}"#).unwrap();
        let inv = Inventory::from_path(tmp.path()).unwrap();
        assert_eq!(inv.source, Some(tmp.path().display().to_string()));
    }
}
