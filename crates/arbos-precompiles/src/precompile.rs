//! Precompile descriptors: one address, its selector table and its event table.

use crate::{
    error::RegistryError,
    events::EventSchema,
    method::MethodDescriptor,
};
use alloy_primitives::{Address, Selector};
use std::collections::HashMap;

/// A native contract living at a fixed address.
///
/// Immutable once built; every method is keyed by its selector.
#[derive(Debug)]
pub struct PrecompileDescriptor {
    name: &'static str,
    address: Address,
    methods: Vec<MethodDescriptor>,
    selectors: HashMap<Selector, usize>,
    events: HashMap<&'static str, EventSchema>,
}

impl PrecompileDescriptor {
    /// Starts building a precompile at `address`.
    pub fn builder(name: &'static str, address: Address) -> PrecompileBuilder {
        PrecompileBuilder {
            name,
            address,
            methods: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Human readable name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Fixed address.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Methods in registration order.
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Resolves a selector to its method.
    pub fn resolve(&self, selector: Selector) -> Option<&MethodDescriptor> {
        self.selectors
            .get(&selector)
            .map(|index| &self.methods[*index])
    }

    /// Finds a method by name. Diagnostic helper, dispatch goes through [`Self::resolve`].
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|method| method.name() == name)
    }

    /// Declared events by name.
    pub const fn events(&self) -> &HashMap<&'static str, EventSchema> {
        &self.events
    }

    /// Looks up a declared event.
    pub fn event(&self, name: &str) -> Option<&EventSchema> {
        self.events.get(name)
    }
}

/// Builder for [`PrecompileDescriptor`].
#[derive(Debug)]
pub struct PrecompileBuilder {
    name: &'static str,
    address: Address,
    methods: Vec<MethodDescriptor>,
    events: Vec<EventSchema>,
}

impl PrecompileBuilder {
    /// Adds a method.
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// Declares an event the methods may emit.
    pub fn event(mut self, event: EventSchema) -> Self {
        self.events.push(event);
        self
    }

    /// Builds the descriptor, rejecting selector or event name collisions.
    pub fn build(self) -> Result<PrecompileDescriptor, RegistryError> {
        let Self {
            name,
            address,
            methods,
            events,
        } = self;

        let mut selectors = HashMap::with_capacity(methods.len());
        for (index, method) in methods.iter().enumerate() {
            if selectors.insert(method.selector(), index).is_some() {
                return Err(RegistryError::DuplicateSelector {
                    address,
                    selector: method.selector(),
                    method: method.name(),
                });
            }
        }

        let mut table = HashMap::with_capacity(events.len());
        for event in events {
            let event_name = event.name();
            if table.insert(event_name, event).is_some() {
                return Err(RegistryError::DuplicateEvent {
                    address,
                    event: event_name,
                });
            }
        }

        Ok(PrecompileDescriptor {
            name,
            address,
            methods,
            selectors,
            events: table,
        })
    }
}
