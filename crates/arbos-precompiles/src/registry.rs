//! Address-keyed table of precompiles.

use crate::{
    config::PrecompilesConfig,
    context::ExecutionEnv,
    debug,
    dispatch::CallRequest,
    error::{CallError, RegistryError},
    precompile::PrecompileDescriptor,
};
use alloy_primitives::{Address, Bytes};
use std::{
    collections::HashMap,
    sync::{Arc, OnceLock},
};

/// Immutable mapping from address to precompile.
///
/// Built once; shared freely across threads afterwards.
#[derive(Debug, Default)]
pub struct Registry {
    precompiles: HashMap<Address, Arc<PrecompileDescriptor>>,
}

impl Registry {
    /// Starts an empty registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Builds the built-in precompiles enabled by `config`.
    pub fn from_config(config: &PrecompilesConfig) -> Result<Self, RegistryError> {
        let mut builder = Self::builder();
        if config.debug_precompiles {
            builder = builder.precompile(debug::arb_debug()?);
        }
        let registry = builder.build()?;
        tracing::info!(
            target: "arbos_precompiles",
            precompiles = registry.len(),
            debug = config.debug_precompiles,
            "precompile registry built"
        );
        Ok(registry)
    }

    /// Precompile at `address`, if any.
    pub fn lookup(&self, address: &Address) -> Option<&Arc<PrecompileDescriptor>> {
        self.precompiles.get(address)
    }

    /// Whether a precompile lives at `address`.
    pub fn contains(&self, address: &Address) -> bool {
        self.precompiles.contains_key(address)
    }

    /// Registered addresses.
    pub fn addresses(&self) -> impl Iterator<Item = &Address> + '_ {
        self.precompiles.keys()
    }

    /// Registered precompiles.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<PrecompileDescriptor>> + '_ {
        self.precompiles.values()
    }

    /// Number of registered precompiles.
    pub fn len(&self) -> usize {
        self.precompiles.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.precompiles.is_empty()
    }

    /// Routes a call to the precompile at `request.precompile`.
    ///
    /// An address without a precompile fails the same way as an unknown selector.
    pub fn call<E>(&self, request: &CallRequest<'_>, env: &mut E) -> Result<Bytes, CallError>
    where
        E: ExecutionEnv + ?Sized,
    {
        let (selector, _) = request.selector()?;
        let Some(precompile) = self.lookup(&request.precompile) else {
            tracing::warn!(
                target: "arbos_precompiles",
                address = ?request.precompile,
                %selector,
                "call to unregistered precompile address"
            );
            return Err(CallError::UnknownMethod {
                address: request.precompile,
                selector,
            });
        };
        precompile.call(request, env)
    }
}

/// Builder for [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    precompiles: Vec<PrecompileDescriptor>,
}

impl RegistryBuilder {
    /// Adds a precompile.
    pub fn precompile(mut self, precompile: PrecompileDescriptor) -> Self {
        self.precompiles.push(precompile);
        self
    }

    /// Builds the registry, rejecting address collisions.
    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut precompiles = HashMap::with_capacity(self.precompiles.len());
        for precompile in self.precompiles {
            let address = precompile.address();
            if precompiles.insert(address, Arc::new(precompile)).is_some() {
                return Err(RegistryError::DuplicateAddress(address));
            }
        }
        Ok(Registry { precompiles })
    }
}

/// Process-wide table of every built-in precompile.
///
/// # Panics
///
/// Panics on first use if the built-in tables are inconsistent, which is a
/// programming error caught by this crate's tests.
pub fn precompiles() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        Registry::from_config(&PrecompilesConfig::all())
            .expect("built-in precompile tables are consistent")
    })
}
