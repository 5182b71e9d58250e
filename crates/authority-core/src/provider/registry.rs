//! Provider selection by type name.

use std::collections::HashMap;

use super::all_permitted::{AllPermittedAuthorityProvider, ALL_PERMITTED_PROVIDER_TYPE};
use super::native::{NativeAuthorityProvider, NATIVE_PROVIDER_TYPE};
use super::AuthorityProvider;
use crate::error::{AuthorityError, AuthorityResult};

/// Constructor for a provider.
pub type ProviderFactory = fn() -> Box<dyn AuthorityProvider>;

/// Maps provider type names to their constructors.
///
/// Type names are matched case-insensitively and stored upper-case.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    factories: HashMap<String, ProviderFactory>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in providers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(NATIVE_PROVIDER_TYPE, || Box::new(NativeAuthorityProvider::new()));
        registry.register(ALL_PERMITTED_PROVIDER_TYPE, || {
            Box::new(AllPermittedAuthorityProvider::new())
        });
        registry
    }

    /// Register a factory, replacing any previous one for the same type.
    pub fn register(&mut self, provider_type: &str, factory: ProviderFactory) {
        self.factories
            .insert(provider_type.to_ascii_uppercase(), factory);
    }

    /// Build a provider of the given type.
    pub fn create(&self, provider_type: &str) -> AuthorityResult<Box<dyn AuthorityProvider>> {
        self.factories
            .get(&provider_type.to_ascii_uppercase())
            .map(|factory| factory())
            .ok_or_else(|| AuthorityError::UnknownProvider(provider_type.to_string()))
    }

    /// Registered type names, sorted.
    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}
