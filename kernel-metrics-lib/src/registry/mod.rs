//! Registry of known item types
//!
//! Every item type the kernel understands (`task`, `document`, `wiki_entry`, ...)
//! is described by a [`TypeManifest`] naming its schema and the capabilities it
//! supports. Derived metric definitions may only target types present here.
//!
//! # Implementation Model
//!
//! [`TypeRegistry`] is an explicit value: it is constructed once, either from
//! manifest documents on disk ([`TypeRegistry::load`]) or from manifests built
//! in memory ([`TypeRegistry::from_manifests`]), and then shared by reference
//! with whatever needs to look types up. There is no process-wide instance and
//! no lazy bootstrap; reloading means building a new registry.

mod type_manifest;
mod type_registry;

pub use type_manifest::TypeManifest;
pub use type_registry::TypeRegistry;
