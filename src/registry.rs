//! Explicit registration of operator classes and property groups.
//!
//! A [`ClassRegistry`] is an ordered list of `(idname, class, legacy)`
//! entries. Entries are added explicitly; a second entry with the same
//! `idname` and `legacy` flag is rejected. The host receives the entries
//! through the [`ClassHost`] trait when the registry is registered or
//! unregistered.
//!
//! Property groups are registry entries of type [`PropertyClass`]: a pair of
//! plain functions that create and remove default values in a
//! [`PropertyStore`].
//!
//! # Example
//!
//! ```
//! use uvkit::registry::{ClassHost, ClassRegistry};
//! use uvkit::error::Result;
//!
//! #[derive(Default)]
//! struct Host(Vec<String>);
//!
//! impl ClassHost<&'static str> for Host {
//!     fn register_class(&mut self, idname: &str, _class: &&'static str) -> Result<()> {
//!         self.0.push(idname.to_string());
//!         Ok(())
//!     }
//!
//!     fn unregister_class(&mut self, idname: &str, _class: &&'static str) {
//!         self.0.retain(|id| id != idname);
//!     }
//! }
//!
//! let mut registry = ClassRegistry::new();
//! registry.add("uv.flip_rotate_uv", "Flip/Rotate UV", false).unwrap();
//! assert!(registry.add("uv.flip_rotate_uv", "again", false).is_err());
//!
//! let mut host = Host::default();
//! registry.register(&mut host).unwrap();
//! assert_eq!(host.0, vec!["uv.flip_rotate_uv"]);
//! ```

use std::collections::BTreeMap;

use crate::error::{MeshError, Result};

/// One registered class.
#[derive(Debug, Clone)]
pub struct ClassEntry<T> {
    /// Unique identifier within the registry (per `legacy` flag).
    pub idname: String,
    /// The registered item.
    pub class: T,
    /// Marks entries meant for a legacy host variant.
    pub legacy: bool,
}

/// Receives registry entries.
pub trait ClassHost<T> {
    /// Make a class available in the host.
    fn register_class(&mut self, idname: &str, class: &T) -> Result<()>;

    /// Remove a class from the host.
    fn unregister_class(&mut self, idname: &str, class: &T);
}

/// Ordered collection of classes with duplicate detection.
#[derive(Debug, Clone)]
pub struct ClassRegistry<T> {
    entries: Vec<ClassEntry<T>>,
}

impl<T> Default for ClassRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ClassRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a class.
    ///
    /// Fails with [`MeshError::DuplicateRegistration`] if an entry with the
    /// same `idname` and `legacy` flag exists.
    pub fn add(&mut self, idname: impl Into<String>, class: T, legacy: bool) -> Result<()> {
        let idname = idname.into();
        if self.contains(&idname, legacy) {
            return Err(MeshError::DuplicateRegistration { idname });
        }
        log::debug!("{} is registered.", idname);
        self.entries.push(ClassEntry {
            idname,
            class,
            legacy,
        });
        Ok(())
    }

    /// Check for an entry with this identifier and variant.
    pub fn contains(&self, idname: &str, legacy: bool) -> bool {
        self.entries
            .iter()
            .any(|e| e.idname == idname && e.legacy == legacy)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[ClassEntry<T>] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register every entry with the host, in insertion order.
    ///
    /// Stops at the first host error.
    pub fn register<H: ClassHost<T>>(&self, host: &mut H) -> Result<()> {
        for entry in &self.entries {
            host.register_class(&entry.idname, &entry.class)?;
            log::debug!("{} is registered to host.", entry.idname);
        }
        Ok(())
    }

    /// Unregister every entry from the host, in insertion order.
    pub fn unregister<H: ClassHost<T>>(&self, host: &mut H) {
        for entry in &self.entries {
            host.unregister_class(&entry.idname, &entry.class);
            log::debug!("{} is unregistered from host.", entry.idname);
        }
    }

    /// Drop all entries.
    pub fn cleanup(&mut self) {
        self.entries.clear();
        log::debug!("Cleanup registry.");
    }
}

/// A stored property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyValue {
    /// Boolean property.
    Bool(bool),
    /// Integer property.
    Int(i64),
}

/// Named property values kept by the host between invocations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyStore {
    values: BTreeMap<String, PropertyValue>,
}

impl PropertyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any previous one.
    pub fn set(&mut self, name: impl Into<String>, value: PropertyValue) {
        self.values.insert(name.into(), value);
    }

    /// Get a value.
    pub fn get(&self, name: &str) -> Option<PropertyValue> {
        self.values.get(name).copied()
    }

    /// Get a boolean value; `None` if missing or of another type.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            PropertyValue::Bool(b) => Some(b),
            PropertyValue::Int(_) => None,
        }
    }

    /// Get an integer value; `None` if missing or of another type.
    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            PropertyValue::Int(i) => Some(i),
            PropertyValue::Bool(_) => None,
        }
    }

    /// Remove a value.
    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.values.remove(name)
    }

    /// Check whether a value is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A property group: creates and removes its defaults in a [`PropertyStore`].
#[derive(Debug, Clone, Copy)]
pub struct PropertyClass {
    /// Install default values.
    pub init_props: fn(&mut PropertyStore),
    /// Remove the values installed by `init_props`.
    pub del_props: fn(&mut PropertyStore),
}

impl ClassRegistry<PropertyClass> {
    /// Install the defaults of every property group, in insertion order.
    pub fn init_props(&self, store: &mut PropertyStore) {
        for entry in &self.entries {
            (entry.class.init_props)(store);
            log::debug!("{} is initialized.", entry.idname);
        }
    }

    /// Remove the values of every property group, in insertion order.
    pub fn del_props(&self, store: &mut PropertyStore) {
        for entry in &self.entries {
            (entry.class.del_props)(store);
            log::debug!("{} is cleared.", entry.idname);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingHost {
        events: Vec<String>,
        reject: Option<&'static str>,
    }

    impl ClassHost<u32> for RecordingHost {
        fn register_class(&mut self, idname: &str, class: &u32) -> Result<()> {
            if self.reject == Some(idname) {
                return Err(MeshError::DuplicateRegistration {
                    idname: idname.to_string(),
                });
            }
            self.events.push(format!("+{}:{}", idname, class));
            Ok(())
        }

        fn unregister_class(&mut self, idname: &str, _class: &u32) {
            self.events.push(format!("-{}", idname));
        }
    }

    #[test]
    fn test_duplicate_detection_respects_legacy_flag() {
        let mut registry = ClassRegistry::new();
        registry.add("a", 1, false).unwrap();
        registry.add("a", 2, true).unwrap();

        let err = registry.add("a", 3, false).unwrap_err();
        assert!(matches!(err, MeshError::DuplicateRegistration { idname } if idname == "a"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_and_unregister_in_order() {
        let mut registry = ClassRegistry::new();
        registry.add("first", 1, false).unwrap();
        registry.add("second", 2, false).unwrap();

        let mut host = RecordingHost::default();
        registry.register(&mut host).unwrap();
        registry.unregister(&mut host);

        assert_eq!(host.events, vec!["+first:1", "+second:2", "-first", "-second"]);
    }

    #[test]
    fn test_register_stops_on_host_error() {
        let mut registry = ClassRegistry::new();
        registry.add("first", 1, false).unwrap();
        registry.add("second", 2, false).unwrap();
        registry.add("third", 3, false).unwrap();

        let mut host = RecordingHost {
            reject: Some("second"),
            ..Default::default()
        };
        assert!(registry.register(&mut host).is_err());
        assert_eq!(host.events, vec!["+first:1"]);
    }

    #[test]
    fn test_cleanup() {
        let mut registry = ClassRegistry::new();
        registry.add("a", 1, false).unwrap();
        registry.cleanup();
        assert!(registry.is_empty());
        registry.add("a", 1, false).unwrap();
    }

    #[test]
    fn test_property_groups() {
        fn init(store: &mut PropertyStore) {
            store.set("enabled", PropertyValue::Bool(false));
            store.set("count", PropertyValue::Int(3));
        }
        fn del(store: &mut PropertyStore) {
            store.remove("enabled");
            store.remove("count");
        }

        let mut registry = ClassRegistry::new();
        registry
            .add(
                "group",
                PropertyClass {
                    init_props: init,
                    del_props: del,
                },
                false,
            )
            .unwrap();

        let mut store = PropertyStore::new();
        registry.init_props(&mut store);
        assert_eq!(store.get_bool("enabled"), Some(false));
        assert_eq!(store.get_int("count"), Some(3));
        assert_eq!(store.get_bool("count"), None);

        registry.del_props(&mut store);
        assert!(store.is_empty());
    }
}
