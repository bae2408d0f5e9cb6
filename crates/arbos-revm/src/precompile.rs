//! Adapter exposing a precompile descriptor as a revm precompile.

use alloy_evm::{
    precompiles::{DynPrecompile, Precompile, PrecompileInput, PrecompilesMap},
    revm::precompile::{PrecompileError, PrecompileId, PrecompileResult},
    EvmInternals,
};
use alloy_primitives::Log;
use arbos_precompiles::{
    BlockContext, CallRequest, ExecutionEnv, LogRecord, PrecompileDescriptor, Registry,
};
use revm::{context::Block, precompile::PrecompileOutput};
use std::sync::Arc;

/// A registered precompile callable from revm.
///
/// Gas is accounted by the caller; the adapter reports zero gas used.
#[derive(Clone, Debug)]
pub struct NativePrecompile {
    descriptor: Arc<PrecompileDescriptor>,
    id: PrecompileId,
}

impl NativePrecompile {
    /// Wraps a descriptor.
    pub fn new(descriptor: Arc<PrecompileDescriptor>) -> Self {
        let id = PrecompileId::custom(descriptor.name());
        Self { descriptor, id }
    }

    /// The wrapped descriptor.
    pub const fn descriptor(&self) -> &Arc<PrecompileDescriptor> {
        &self.descriptor
    }
}

impl Precompile for NativePrecompile {
    fn precompile_id(&self) -> &PrecompileId {
        &self.id
    }

    fn call(&self, mut input: PrecompileInput<'_>) -> PrecompileResult {
        let block = BlockContext {
            number: input.internals.block_number().saturating_to(),
            gas_limit: input.internals.block_env().gas_limit(),
        };
        // logs go straight into the journal, so static frames are enforced here
        let request = CallRequest {
            data: input.data,
            precompile: input.bytecode_address,
            acting_as: input.target_address,
            caller: input.caller,
            value: input.value,
            read_only: input.is_static,
        };

        let mut env = JournalEnv {
            internals: input.internals_mut(),
            block,
        };

        match self.descriptor.call(&request, &mut env) {
            Ok(output) => Ok(PrecompileOutput::new(0, output)),
            Err(err) => Err(PrecompileError::Other(err.to_string().into())),
        }
    }

    fn is_pure(&self) -> bool {
        false
    }
}

/// [`ExecutionEnv`] writing logs into the EVM journal.
#[derive(Debug)]
struct JournalEnv<'a, 'b> {
    internals: &'a mut EvmInternals<'b>,
    block: BlockContext,
}

impl ExecutionEnv for JournalEnv<'_, '_> {
    fn block(&self) -> BlockContext {
        self.block
    }

    fn append_log(&mut self, log: LogRecord) {
        self.internals.log(Log::from(log));
    }
}

/// Installs every precompile of `registry` at its address.
pub fn install_precompiles(precompiles: &mut PrecompilesMap, registry: &Registry) {
    for descriptor in registry.iter() {
        let address = descriptor.address();
        let native = Arc::new(NativePrecompile::new(Arc::clone(descriptor)));
        let id = native.precompile_id().clone();

        precompiles.apply_precompile(&address, move |_| {
            let native_for_call = Arc::clone(&native);
            Some(DynPrecompile::new_stateful(id, move |input| {
                native_for_call.call(input)
            }))
        });

        tracing::info!(
            target: "arbos_revm",
            precompile = descriptor.name(),
            ?address,
            "installed native precompile"
        );
    }
}
