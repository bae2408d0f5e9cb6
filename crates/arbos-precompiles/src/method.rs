//! Method descriptors and selector derivation.

use crate::{
    abi::{AbiError, AbiSchema},
    dispatch::CallScope,
    error::CallError,
};
use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{keccak256, Selector};
use std::{fmt, sync::Arc};

/// Native implementation of a method.
///
/// Receives the call scope and the decoded arguments, returns values matching the
/// method's output schema.
pub type MethodHandler = Arc<
    dyn Fn(&mut CallScope<'_>, &[DynSolValue]) -> Result<Vec<DynSolValue>, CallError>
        + Send
        + Sync,
>;

/// First four bytes of the keccak hash of a canonical signature.
pub fn selector(signature: &str) -> Selector {
    Selector::from_slice(&keccak256(signature.as_bytes())[..4])
}

/// How a method interacts with state and call value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateMutability {
    /// Reads neither state nor call context beyond its arguments.
    Pure,
    /// Reads state only.
    View,
    /// May modify state, rejects value.
    NonPayable,
    /// May modify state and accept value.
    Payable,
}

impl StateMutability {
    /// Whether the method accepts a non-zero call value.
    pub const fn is_payable(self) -> bool {
        matches!(self, Self::Payable)
    }

    /// Whether the method may run inside a read-only call.
    pub const fn is_read_only(self) -> bool {
        matches!(self, Self::Pure | Self::View)
    }
}

/// One callable entry point of a precompile.
#[derive(Clone)]
pub struct MethodDescriptor {
    name: &'static str,
    signature: String,
    selector: Selector,
    inputs: AbiSchema,
    outputs: AbiSchema,
    mutability: StateMutability,
    handler: MethodHandler,
}

impl MethodDescriptor {
    /// Creates a method from parsed schemas.
    pub fn new<F>(
        name: &'static str,
        inputs: AbiSchema,
        outputs: AbiSchema,
        mutability: StateMutability,
        handler: F,
    ) -> Self
    where
        F: Fn(&mut CallScope<'_>, &[DynSolValue]) -> Result<Vec<DynSolValue>, CallError>
            + Send
            + Sync
            + 'static,
    {
        let signature = format!("{name}({})", inputs.canonical());
        Self {
            name,
            selector: selector(&signature),
            signature,
            inputs,
            outputs,
            mutability,
            handler: Arc::new(handler),
        }
    }

    /// Creates a method from Solidity type strings.
    pub fn parse<F>(
        name: &'static str,
        inputs: &[&str],
        outputs: &[&str],
        mutability: StateMutability,
        handler: F,
    ) -> Result<Self, AbiError>
    where
        F: Fn(&mut CallScope<'_>, &[DynSolValue]) -> Result<Vec<DynSolValue>, CallError>
            + Send
            + Sync
            + 'static,
    {
        Ok(Self::new(
            name,
            AbiSchema::parse(inputs)?,
            AbiSchema::parse(outputs)?,
            mutability,
            handler,
        ))
    }

    /// Method name, kept for diagnostics.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Canonical signature, e.g. `Events(bool,bytes32)`.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Dispatch key.
    pub const fn selector(&self) -> Selector {
        self.selector
    }

    /// Argument schema.
    pub const fn inputs(&self) -> &AbiSchema {
        &self.inputs
    }

    /// Return value schema.
    pub const fn outputs(&self) -> &AbiSchema {
        &self.outputs
    }

    /// Declared state mutability.
    pub const fn mutability(&self) -> StateMutability {
        self.mutability
    }

    /// Selector-prefixed call data for `args`.
    pub fn calldata(&self, args: &[DynSolValue]) -> Result<Vec<u8>, AbiError> {
        let encoded = self.inputs.encode(args)?;
        let mut data = Vec::with_capacity(4 + encoded.len());
        data.extend_from_slice(self.selector.as_slice());
        data.extend_from_slice(&encoded);
        Ok(data)
    }

    pub(crate) fn invoke(
        &self,
        scope: &mut CallScope<'_>,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>, CallError> {
        (self.handler)(scope, args)
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("selector", &self.selector)
            .field("outputs", &self.outputs)
            .field("mutability", &self.mutability)
            .finish_non_exhaustive()
    }
}
