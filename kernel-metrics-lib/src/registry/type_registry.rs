use super::TypeManifest;
use crate::Result;
use crate::documents::{discover, load_document};
use crate::events::{Tracer, attributes};
use camino::Utf8Path;
use ohno::{app_err, bail};
use serde_json::json;

const LOG_TARGET: &str = "  registry";

/// In-memory registry of type manifests, in load order
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    manifests: Vec<TypeManifest>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from manifests constructed in memory
    ///
    /// # Errors
    /// Returns an error if two manifests share a type key
    pub fn from_manifests(manifests: impl IntoIterator<Item = TypeManifest>) -> Result<Self> {
        let mut registry = Self::new();
        for manifest in manifests {
            registry.register(manifest)?;
        }
        Ok(registry)
    }

    /// Load every manifest document below `root`
    ///
    /// Documents are visited recursively in sorted path order. Any malformed
    /// manifest or duplicate type key fails the whole load.
    pub fn load(root: &Utf8Path, tracer: &Tracer) -> Result<Self> {
        let span = tracer.span("registry.load_types", attributes(json!({"schema_root": root.as_str()})));
        log::info!(target: LOG_TARGET, "Loading type manifests from '{root}'");

        let mut registry = Self::new();
        for path in discover(root, true)? {
            let document = load_document(&path)?;
            let source = path.as_str();
            let manifest = TypeManifest::from_mapping(&document, source)?;
            let type_key = manifest.type_key().to_string();

            if registry.contains(&type_key) {
                bail!("duplicate type key '{type_key}' detected in '{source}'");
            }
            registry.manifests.push(manifest);

            log::debug!(target: LOG_TARGET, "Registered type '{type_key}' from '{source}'");
            tracer.emit(
                "registry.type.loaded",
                attributes(json!({"span_id": span.id(), "type_key": type_key, "source": source})),
            );
        }

        tracer.emit(
            "registry.load_complete",
            attributes(json!({"span_id": span.id(), "count": registry.manifests.len()})),
        );

        Ok(registry)
    }

    /// Add a manifest, rejecting duplicate type keys
    pub fn register(&mut self, manifest: TypeManifest) -> Result<()> {
        if self.contains(manifest.type_key()) {
            bail!("duplicate type key '{}' detected", manifest.type_key());
        }
        self.manifests.push(manifest);
        Ok(())
    }

    /// Look up the manifest for `type_key`
    ///
    /// # Errors
    /// Returns an error if the type is not registered
    pub fn get_manifest(&self, type_key: &str) -> Result<&TypeManifest> {
        self.manifests
            .iter()
            .find(|m| m.type_key() == type_key)
            .ok_or_else(|| app_err!("type '{type_key}' is not registered"))
    }

    #[must_use]
    pub fn contains(&self, type_key: &str) -> bool {
        self.manifests.iter().any(|m| m.type_key() == type_key)
    }

    /// Registered type keys in registration order
    #[must_use]
    pub fn list_types(&self) -> Vec<&str> {
        self.manifests.iter().map(TypeManifest::type_key).collect()
    }

    pub fn manifests(&self) -> impl Iterator<Item = &TypeManifest> {
        self.manifests.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }
}
