//! Test Data Builders
//!
//! Provides builder patterns for constructing claim maps and adapter
//! registries with sensible defaults. Tests specify only what they care about.

use std::sync::Arc;
use std::time::SystemTime;

use claims_core::{
    ClaimMap, ClaimValue, DateAdapterRegistry, DateGetter, DateSetter, TemporalConfig,
};

use crate::fixtures::TemporalFixtures;

/// Builder for constructing test claim sets
pub struct TestClaimsBuilder {
    registry: Option<Arc<DateAdapterRegistry>>,
    issuer: Option<String>,
    subject: Option<String>,
    issued_at: Option<SystemTime>,
    expiration: Option<SystemTime>,
    extra: Vec<(String, ClaimValue)>,
}

impl Default for TestClaimsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClaimsBuilder {
    /// Creates a new builder with the jwt.io issuer, subject and `iat`
    pub fn new() -> Self {
        Self {
            registry: None,
            issuer: Some("joe".to_string()),
            subject: Some("1234567890".to_string()),
            issued_at: Some(TemporalFixtures::issued_at()),
            expiration: None,
            extra: Vec::new(),
        }
    }

    /// Uses an isolated registry instead of the process-wide one
    pub fn with_registry(mut self, registry: Arc<DateAdapterRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets the issuer
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Sets the subject
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the issued-at instant
    pub fn with_issued_at(mut self, issued_at: SystemTime) -> Self {
        self.issued_at = Some(issued_at);
        self
    }

    /// Sets the expiration instant
    pub fn with_expiration(mut self, expiration: SystemTime) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Drops the default `iat`
    pub fn without_issued_at(mut self) -> Self {
        self.issued_at = None;
        self
    }

    /// Adds a custom claim
    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<ClaimValue>) -> Self {
        self.extra.push((name.into(), value.into()));
        self
    }

    /// Builds the claim map
    pub fn build(self) -> ClaimMap {
        let mut claims = match self.registry {
            Some(registry) => ClaimMap::with_registry(registry),
            None => ClaimMap::new(),
        };
        claims
            .set_issuer(self.issuer.as_deref())
            .set_subject(self.subject.as_deref())
            .set_issued_at(self.issued_at)
            .set_expiration(self.expiration);
        claims.put_all(self.extra);
        claims
    }
}

/// Builder for isolated adapter registries
pub struct TestRegistryBuilder {
    config: TemporalConfig,
    setters: Vec<Arc<dyn DateSetter>>,
    getters: Vec<Arc<dyn DateGetter>>,
}

impl Default for TestRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRegistryBuilder {
    /// Creates a builder that seeds the built-in adapters
    pub fn new() -> Self {
        Self {
            config: TemporalConfig::default(),
            setters: Vec::new(),
            getters: Vec::new(),
        }
    }

    /// Registers only the legacy adapter as built-in
    pub fn legacy_only(mut self) -> Self {
        self.config = self.config.legacy_only();
        self
    }

    /// Widens extended values into the given zone
    pub fn with_default_zone(mut self, zone: impl Into<String>) -> Self {
        self.config = self.config.with_default_zone(zone);
        self
    }

    /// Appends a custom setter after the built-ins
    pub fn with_setter(mut self, setter: Arc<dyn DateSetter>) -> Self {
        self.setters.push(setter);
        self
    }

    /// Appends a custom getter after the built-ins
    pub fn with_getter(mut self, getter: Arc<dyn DateGetter>) -> Self {
        self.getters.push(getter);
        self
    }

    /// Builds the registry
    pub fn build(self) -> Arc<DateAdapterRegistry> {
        let registry = DateAdapterRegistry::from_config(&self.config);
        for setter in self.setters {
            registry.register_date_setter(setter);
        }
        for getter in self.getters {
            registry.register_date_getter(getter);
        }
        Arc::new(registry)
    }
}
