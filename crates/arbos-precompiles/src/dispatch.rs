//! Call dispatch: selector extraction, argument decoding, handler invocation and
//! output encoding.
//!
//! Logs emitted by a handler are buffered for the duration of the call and only
//! appended to the [`ExecutionEnv`] once the outputs encoded successfully. A failing
//! call leaves the environment's journal untouched.

use crate::{
    context::{CallContext, ExecutionEnv},
    error::CallError,
    events::{EventEmitter, LogRecord},
    precompile::PrecompileDescriptor,
};
use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, Bytes, Selector, U256};

/// Length of a method selector.
pub const SELECTOR_LEN: usize = 4;

/// Inputs of a single precompile call.
#[derive(Clone, Copy, Debug)]
pub struct CallRequest<'a> {
    /// Raw call data: selector followed by ABI encoded arguments.
    pub data: &'a [u8],
    /// Address of the precompile being called.
    pub precompile: Address,
    /// Address the precompile acts as.
    pub acting_as: Address,
    /// Immediate caller.
    pub caller: Address,
    /// Value sent with the call.
    pub value: U256,
    /// Whether the call happens in a static context.
    pub read_only: bool,
}

impl<'a> CallRequest<'a> {
    /// A plain call from `caller` to `precompile` without value.
    pub const fn new(data: &'a [u8], precompile: Address, caller: Address) -> Self {
        Self {
            data,
            precompile,
            acting_as: precompile,
            caller,
            value: U256::ZERO,
            read_only: false,
        }
    }

    /// Sets the call value.
    pub const fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Marks the call read-only.
    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Sets the acting-as address.
    pub const fn acting_as(mut self, acting_as: Address) -> Self {
        self.acting_as = acting_as;
        self
    }

    /// Splits the selector off the call data.
    pub fn selector(&self) -> Result<(Selector, &'a [u8]), CallError> {
        if self.data.len() < SELECTOR_LEN {
            return Err(CallError::MalformedCallData {
                len: self.data.len(),
            });
        }
        let (selector, args) = self.data.split_at(SELECTOR_LEN);
        Ok((Selector::from_slice(selector), args))
    }
}

/// What a handler sees while it runs: the call context and the log buffer.
#[derive(Debug)]
pub struct CallScope<'a> {
    context: &'a CallContext,
    method: &'static str,
    emitter: EventEmitter<'a>,
}

impl<'a> CallScope<'a> {
    /// Read access to the call context.
    pub const fn context(&self) -> &CallContext {
        self.context
    }

    /// Name of the method being executed.
    pub const fn method(&self) -> &'static str {
        self.method
    }

    /// Emits a declared event with arguments in declaration order.
    pub fn emit(&mut self, event: &str, args: &[DynSolValue]) -> Result<(), CallError> {
        self.emitter.emit(event, args)
    }

    /// Logs emitted so far in this call.
    pub fn logs(&self) -> &[LogRecord] {
        self.emitter.logs()
    }

    /// Builds a handler failure for the current method.
    pub fn revert(&self, reason: impl Into<String>) -> CallError {
        CallError::revert(self.method, reason)
    }
}

impl PrecompileDescriptor {
    /// Executes a call against this precompile.
    ///
    /// On success returns the ABI encoded outputs and appends the emitted logs to `env`
    /// in emission order. On failure nothing is appended.
    pub fn call<E>(&self, request: &CallRequest<'_>, env: &mut E) -> Result<Bytes, CallError>
    where
        E: ExecutionEnv + ?Sized,
    {
        let (selector, args) = request.selector()?;
        tracing::debug!(
            target: "arbos_precompiles",
            precompile = self.name(),
            %selector,
            caller = ?request.caller,
            value = %request.value,
            read_only = request.read_only,
            "dispatching precompile call"
        );
        self.dispatch(selector, args, request, env)
            .inspect_err(|err| {
                tracing::warn!(
                    target: "arbos_precompiles",
                    precompile = self.name(),
                    %selector,
                    caller = ?request.caller,
                    %err,
                    "precompile call failed"
                );
            })
    }

    fn dispatch<E>(
        &self,
        selector: Selector,
        args: &[u8],
        request: &CallRequest<'_>,
        env: &mut E,
    ) -> Result<Bytes, CallError>
    where
        E: ExecutionEnv + ?Sized,
    {
        let method = self
            .resolve(selector)
            .ok_or(CallError::UnknownMethod {
                address: self.address(),
                selector,
            })?;
        let name = method.name();
        tracing::trace!(target: "arbos_precompiles", method = name, "resolved method");

        let mutability = method.mutability();
        if !request.value.is_zero() && !mutability.is_payable() {
            return Err(CallError::NonPayable { method: name });
        }
        if request.read_only && !mutability.is_read_only() {
            return Err(CallError::WriteProtection { method: name });
        }

        let inputs = method
            .inputs()
            .decode(args)
            .map_err(|source| CallError::InputDecode {
                method: name,
                source,
            })?;

        let context = CallContext {
            precompile: self.address(),
            acting_as: request.acting_as,
            caller: request.caller,
            value: request.value,
            read_only: request.read_only,
            block: env.block(),
        };
        let mut scope = CallScope {
            context: &context,
            method: name,
            emitter: EventEmitter::new(
                self.events(),
                self.address(),
                context.block.number,
                context.read_only,
                name,
            ),
        };

        let outputs = method.invoke(&mut scope, &inputs)?;
        let output = method
            .outputs()
            .encode(&outputs)
            .map_err(|source| CallError::OutputEncode {
                method: name,
                source,
            })?;

        let logs = scope.emitter.into_logs();
        tracing::debug!(
            target: "arbos_precompiles",
            method = name,
            output_len = output.len(),
            logs = logs.len(),
            "precompile call succeeded"
        );
        for log in logs {
            env.append_log(log);
        }

        Ok(output.into())
    }
}
