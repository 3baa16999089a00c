//! Field registry mapping question identifiers to external configuration keys
//!
//! Sessions record answers under short field identifiers (`hubUrl`) and publish
//! them under the key the consuming application understands
//! (`blackduck.hub.url`). The mapping is an explicit table built up front.

use crate::error::{PropwizardError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Resolves a field identifier to its external configuration key
#[cfg_attr(test, mockall::automock)]
pub trait ConfigKeyResolver {
    /// External key for `field_name`, or `None` when the field is not registered
    fn resolve_key(&self, field_name: &str) -> Option<String>;
}

impl<T: ConfigKeyResolver + ?Sized> ConfigKeyResolver for &T {
    fn resolve_key(&self, field_name: &str) -> Option<String> {
        (**self).resolve_key(field_name)
    }
}

/// Fields understood by the default interactive mode
const BUILTIN_FIELDS: &[(&str, &str)] = &[
    ("hubUrl", "blackduck.hub.url"),
    ("hubUsername", "blackduck.hub.username"),
    ("hubPassword", "blackduck.hub.password"),
    ("hubTrustCertificate", "blackduck.hub.trust.cert"),
    ("hubProxyHost", "blackduck.hub.proxy.host"),
    ("hubProxyPort", "blackduck.hub.proxy.port"),
    ("hubProxyUsername", "blackduck.hub.proxy.username"),
    ("hubProxyPassword", "blackduck.hub.proxy.password"),
    ("hubOfflineMode", "blackduck.hub.offline.mode"),
    ("projectName", "detect.project.name"),
    ("projectVersionName", "detect.project.version.name"),
    ("sourcePath", "detect.source.path"),
];

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    fields: BTreeMap<String, String>,
}

/// Explicit field identifier to external key table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRegistry {
    fields: BTreeMap<String, String>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the fields asked by the default interactive mode
    pub fn builtin() -> Self {
        BUILTIN_FIELDS
            .iter()
            .fold(Self::new(), |registry, (field, key)| {
                registry.with_field(*field, *key)
            })
    }

    /// Add or replace one mapping
    pub fn with_field<F: Into<String>, K: Into<String>>(mut self, field: F, key: K) -> Self {
        self.insert(field, key);
        self
    }

    pub fn insert<F: Into<String>, K: Into<String>>(&mut self, field: F, key: K) {
        self.fields.insert(field.into(), key.into());
    }

    /// Parse a registry from TOML with a `[fields]` table
    ///
    /// ```toml
    /// [fields]
    /// hubUrl = "blackduck.hub.url"
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: RegistryFile = toml::from_str(contents)
            .map_err(|e| PropwizardError::registry(format!("Invalid registry file: {e}")))?;

        for (field, key) in &file.fields {
            if field.trim().is_empty() || key.trim().is_empty() {
                return Err(PropwizardError::registry(format!(
                    "Field '{field}' has an empty name or key"
                )));
            }
        }

        Ok(Self {
            fields: file.fields,
        })
    }

    /// Load a registry file and layer it over the builtin fields
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PropwizardError::registry(format!("Cannot read '{}': {e}", path.display()))
        })?;
        let overrides = Self::from_toml_str(&contents)?;
        debug!(
            "Loaded {} field mappings from {}",
            overrides.len(),
            path.display()
        );

        let mut registry = Self::builtin();
        registry.fields.extend(overrides.fields);
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Mappings sorted by field identifier
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(f, k)| (f.as_str(), k.as_str()))
    }
}

impl ConfigKeyResolver for FieldRegistry {
    fn resolve_key(&self, field_name: &str) -> Option<String> {
        self.fields.get(field_name).cloned()
    }
}
