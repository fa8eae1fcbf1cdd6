use crate::Result;
use crate::documents::{require_str, string_list};
use ohno::{app_err, bail};
use serde::Serialize;
use serde_json::Value;

/// Validated metadata describing one item type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeManifest {
    type_key: String,
    schema_ref: String,
    capabilities: Vec<String>,
}

impl TypeManifest {
    /// Build a manifest directly, normalizing capabilities the same way documents are
    ///
    /// # Errors
    /// Returns an error if the type key or schema reference is blank
    pub fn new(type_key: &str, schema_ref: &str, capabilities: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        let type_key = type_key.trim();
        let schema_ref = schema_ref.trim();
        if type_key.is_empty() {
            bail!("type manifests require a non-empty type key");
        }
        if schema_ref.is_empty() {
            bail!("type manifest '{type_key}' requires a non-empty schema reference");
        }

        Ok(Self {
            type_key: type_key.to_string(),
            schema_ref: schema_ref.to_string(),
            capabilities: dedup(capabilities.into_iter().map(|capability| {
                let capability: String = capability.into();
                capability.trim().to_string()
            })),
        })
    }

    /// Parse a manifest document
    ///
    /// `type` and `schema` are required non-empty strings. `capabilities` is an
    /// optional sequence of non-empty strings; repeated entries are dropped.
    pub fn from_mapping(payload: &Value, source: &str) -> Result<Self> {
        if !payload.is_object() {
            return Err(app_err!("type manifest '{source}' must contain a mapping"));
        }

        let type_key = require_str(payload, "type", &format!("type manifest in {source}"))?;
        let describe = format!("type '{type_key}' in {source}");
        let schema_ref = require_str(payload, "schema", &describe)?;
        let capabilities = string_list(payload, "capabilities", &format!("'capabilities' for {describe}"))?;

        Ok(Self {
            type_key,
            schema_ref,
            capabilities: dedup(capabilities.into_iter()),
        })
    }

    #[must_use]
    pub fn type_key(&self) -> &str {
        &self.type_key
    }

    #[must_use]
    pub fn schema_ref(&self) -> &str {
        &self.schema_ref
    }

    #[must_use]
    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    #[must_use]
    pub fn supports(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }

    pub fn require_capability(&self, capability: &str) -> Result<()> {
        if self.supports(capability) {
            Ok(())
        } else {
            Err(app_err!("type '{}' does not support '{capability}'", self.type_key))
        }
    }
}

fn dedup(capabilities: impl Iterator<Item = String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for capability in capabilities {
        if !capability.is_empty() && !unique.contains(&capability) {
            unique.push(capability);
        }
    }
    unique
}
