//! Raw `pom.xml` documents.
//!
//! Only the elements dependency collection needs are modelled; everything else
//! (build, profiles, reporting, ...) is skipped by the deserializer.

use serde::Deserialize;
use std::collections::BTreeMap;

/// The subset of a POM this crate reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pom {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,
    pub parent: Option<ParentRef>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    pub dependency_management: Option<DependencyManagement>,
    pub dependencies: Option<DependencyList>,
}

/// `<parent>` reference.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentRef {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

/// `<dependencyManagement>` wrapper.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DependencyManagement {
    pub dependencies: Option<DependencyList>,
}

/// `<dependencies>` wrapper.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DependencyList {
    #[serde(default, rename = "dependency")]
    pub items: Vec<RawDependency>,
}

/// One `<dependency>` exactly as written, before interpolation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDependency {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    #[serde(rename = "type")]
    pub dependency_type: Option<String>,
    pub classifier: Option<String>,
    pub scope: Option<String>,
    pub optional: Option<String>,
    pub exclusions: Option<ExclusionList>,
}

/// `<exclusions>` wrapper.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExclusionList {
    #[serde(default, rename = "exclusion")]
    pub items: Vec<RawExclusion>,
}

/// One `<exclusion>`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExclusion {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
}

impl Pom {
    /// Parse POM bytes. The error is the deserializer's message.
    pub fn parse(bytes: &[u8]) -> Result<Self, String> {
        let text = String::from_utf8_lossy(bytes);
        let text = text.trim_start_matches('\u{feff}');
        quick_xml::de::from_str(text).map_err(|e| e.to_string())
    }

    /// Declared dependencies, in document order.
    pub fn dependency_items(&self) -> &[RawDependency] {
        self.dependencies.as_ref().map_or(&[], |list| list.items.as_slice())
    }

    /// Managed dependencies, in document order.
    pub fn managed_items(&self) -> &[RawDependency] {
        self.dependency_management
            .as_ref()
            .and_then(|m| m.dependencies.as_ref())
            .map_or(&[], |list| list.items.as_slice())
    }
}
