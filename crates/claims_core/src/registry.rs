//! Date Adapter Registry
//!
//! This module keeps the ordered lists of [`DateSetter`] and [`DateGetter`]
//! adapters consulted whenever a temporal claim is written or read.
//!
//! # Lookup
//!
//! Lookups are first-match-wins in registration order. A registry built with
//! [`DateAdapterRegistry::with_builtins`] always starts with the built-in
//! adapters (legacy first, then the extended family when available), so
//! custom adapters appended later are only consulted for types no built-in
//! handles.
//!
//! # Usage
//!
//! ```rust,ignore
//! use claims_core::registry::{self, DateAdapterRegistry};
//! use std::sync::Arc;
//!
//! // Isolated registry, e.g. for tests
//! let registry = Arc::new(DateAdapterRegistry::with_builtins());
//! registry.register_date_setter(Arc::new(MyTimestampAdapter));
//!
//! // Process-wide registry used by ClaimMap::new()
//! registry::register_date_setter(Arc::new(MyTimestampAdapter));
//! ```
//!
//! # Concurrency
//!
//! Both lists sit behind read-mostly locks: every claim read or write takes a
//! read lock, while registration and deregistration (rare, usually at
//! start-up) take the write lock.

use std::any::Any;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::config::TemporalConfig;
use crate::temporal::{DateGetter, DateSetter, DateType, LegacyDateAdapter};

static GLOBAL: Lazy<Arc<DateAdapterRegistry>> =
    Lazy::new(|| Arc::new(DateAdapterRegistry::with_builtins()));

/// Ordered, mutable collection of date adapters
#[derive(Debug, Default)]
pub struct DateAdapterRegistry {
    setters: RwLock<Vec<Arc<dyn DateSetter>>>,
    getters: RwLock<Vec<Arc<dyn DateGetter>>>,
}

impl DateAdapterRegistry {
    /// Creates a registry with no adapters at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry seeded with the built-in adapters
    ///
    /// The legacy adapter always comes first. The extended adapter follows
    /// if the cached capability probe succeeded.
    pub fn with_builtins() -> Self {
        let registry = Self::empty();
        registry.seed_legacy();
        #[cfg(feature = "extended-time")]
        if let Some(extended) = crate::temporal::ExtendedDateAdapter::instance() {
            registry.register_date_setter(extended.clone());
            registry.register_date_getter(extended);
        }
        registry
    }

    /// Creates a registry seeded according to `config`
    ///
    /// With `extended_time` disabled only the legacy adapter is registered.
    /// A `default_zone` override runs a fresh probe for that zone instead of
    /// using the cached process-wide result; an unknown zone name falls back
    /// to the process default zone.
    pub fn from_config(config: &TemporalConfig) -> Self {
        if config.extended_time && config.default_zone.is_none() {
            return Self::with_builtins();
        }

        let registry = Self::empty();
        registry.seed_legacy();

        #[cfg(feature = "extended-time")]
        if config.extended_time {
            match crate::temporal::ExtendedDateAdapter::probe(config.default_zone.as_deref()) {
                Some(extended) => {
                    let extended = Arc::new(extended);
                    registry.register_date_setter(extended.clone());
                    registry.register_date_getter(extended);
                }
                None => warn!("Extended date types unavailable on this platform"),
            }
        }

        registry
    }

    /// Returns the process-wide registry
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    fn seed_legacy(&self) {
        let legacy = LegacyDateAdapter::instance();
        self.register_date_setter(legacy.clone());
        self.register_date_getter(legacy);
    }

    /// Returns the first setter that accepts `date_type`
    pub fn find_setter(&self, date_type: &DateType) -> Option<Arc<dyn DateSetter>> {
        read(&self.setters)
            .iter()
            .find(|setter| setter.accepts(date_type))
            .cloned()
    }

    /// Returns the first getter that generates `date_type`
    pub fn find_getter(&self, date_type: &DateType) -> Option<Arc<dyn DateGetter>> {
        read(&self.getters)
            .iter()
            .find(|getter| getter.generates(date_type))
            .cloned()
    }

    /// Returns true if some registered setter accepts `date_type`
    pub fn supports_set(&self, date_type: &DateType) -> bool {
        self.find_setter(date_type).is_some()
    }

    /// Returns true if some registered getter generates `date_type`
    pub fn supports_get(&self, date_type: &DateType) -> bool {
        self.find_getter(date_type).is_some()
    }

    /// Returns true if values of type `T` can be written as NumericDate claims
    pub fn supports_set_for<T: Any>(&self) -> bool {
        self.supports_set(&DateType::of::<T>())
    }

    /// Returns true if NumericDate claims can be read back as type `T`
    pub fn supports_get_for<T: Any>(&self) -> bool {
        self.supports_get(&DateType::of::<T>())
    }

    /// Appends a setter; duplicates are not checked
    pub fn register_date_setter(&self, setter: Arc<dyn DateSetter>) {
        let mut setters = write(&self.setters);
        debug!(adapter = ?setter, "Registering date setter");
        setters.push(setter);
    }

    /// Appends a getter; duplicates are not checked
    pub fn register_date_getter(&self, getter: Arc<dyn DateGetter>) {
        let mut getters = write(&self.getters);
        debug!(adapter = ?getter, "Registering date getter");
        getters.push(getter);
    }

    /// Removes every occurrence of `setter`, returning how many were removed
    ///
    /// Adapters are compared by identity (the allocation behind the `Arc`).
    pub fn unregister_date_setter<S: DateSetter + ?Sized>(&self, setter: &Arc<S>) -> usize {
        let target = Arc::as_ptr(setter) as *const ();
        let mut setters = write(&self.setters);
        let before = setters.len();
        setters.retain(|existing| Arc::as_ptr(existing) as *const () != target);
        let removed = before - setters.len();
        debug!(removed, remaining = setters.len(), "Unregistered date setter");
        removed
    }

    /// Removes every occurrence of `getter`, returning how many were removed
    ///
    /// Adapters are compared by identity (the allocation behind the `Arc`).
    pub fn unregister_date_getter<G: DateGetter + ?Sized>(&self, getter: &Arc<G>) -> usize {
        let target = Arc::as_ptr(getter) as *const ();
        let mut getters = write(&self.getters);
        let before = getters.len();
        getters.retain(|existing| Arc::as_ptr(existing) as *const () != target);
        let removed = before - getters.len();
        debug!(removed, remaining = getters.len(), "Unregistered date getter");
        removed
    }

    /// Returns the number of registered setters
    pub fn setter_count(&self) -> usize {
        read(&self.setters).len()
    }

    /// Returns the number of registered getters
    pub fn getter_count(&self) -> usize {
        read(&self.getters).len()
    }
}

// A panic while holding the lock cannot leave a Vec half-updated, so a
// poisoned lock still guards consistent data.
fn read<T: ?Sized>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| {
        warn!("Date adapter registry lock was poisoned");
        PoisonError::into_inner(poisoned)
    })
}

fn write<T: ?Sized>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| {
        warn!("Date adapter registry lock was poisoned");
        PoisonError::into_inner(poisoned)
    })
}

/// Registers a setter with the process-wide registry
pub fn register_date_setter(setter: Arc<dyn DateSetter>) {
    GLOBAL.register_date_setter(setter);
}

/// Removes every occurrence of `setter` from the process-wide registry
pub fn unregister_date_setter<S: DateSetter + ?Sized>(setter: &Arc<S>) -> usize {
    GLOBAL.unregister_date_setter(setter)
}

/// Registers a getter with the process-wide registry
pub fn register_date_getter(getter: Arc<dyn DateGetter>) {
    GLOBAL.register_date_getter(getter);
}

/// Removes every occurrence of `getter` from the process-wide registry
pub fn unregister_date_getter<G: DateGetter + ?Sized>(getter: &Arc<G>) -> usize {
    GLOBAL.unregister_date_getter(getter)
}

/// Returns true if the process-wide registry can write values of type `T`
pub fn is_supported_date_type_for_set<T: Any>() -> bool {
    GLOBAL.supports_set_for::<T>()
}

/// Returns true if the process-wide registry can read claims back as type `T`
pub fn is_supported_date_type_for_get<T: Any>() -> bool {
    GLOBAL.supports_get_for::<T>()
}
