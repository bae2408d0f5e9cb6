//! Error types surfaced by precompile dispatch and table construction.

use crate::abi::AbiError;
use alloy_primitives::{Address, Selector};
use thiserror::Error;

/// Reasons a precompile call fails.
///
/// Every variant aborts the call: no output is returned and none of the logs emitted
/// during the call reach the execution environment.
#[derive(Debug, Error)]
pub enum CallError {
    /// Call data is shorter than a selector.
    #[error("malformed call data: {len} bytes is shorter than a selector")]
    MalformedCallData {
        /// Length of the supplied call data.
        len: usize,
    },
    /// No method is registered under the selector at the target address.
    #[error("unknown method {selector} at {address}")]
    UnknownMethod {
        /// Target precompile address.
        address: Address,
        /// Selector taken from the call data.
        selector: Selector,
    },
    /// Arguments do not match the method's input schema.
    #[error("failed to decode input of `{method}`: {source}")]
    InputDecode {
        /// Method being called.
        method: &'static str,
        /// Codec error.
        #[source]
        source: AbiError,
    },
    /// Value was sent to a method that does not accept it.
    #[error("method `{method}` is not payable")]
    NonPayable {
        /// Method being called.
        method: &'static str,
    },
    /// A state-changing operation was attempted in a read-only call.
    #[error("write protection: `{method}` cannot modify state in a read-only call")]
    WriteProtection {
        /// Method being called.
        method: &'static str,
    },
    /// The handler rejected the call.
    #[error("`{method}` reverted: {reason}")]
    HandlerExecution {
        /// Method being called.
        method: &'static str,
        /// Handler-specific reason.
        reason: String,
    },
    /// The handler emitted an event the precompile does not declare.
    #[error("unknown event `{name}`")]
    UnknownEvent {
        /// Requested event name.
        name: String,
    },
    /// Event arguments do not match the event schema.
    #[error("failed to encode event `{event}`: {source}")]
    EventEncode {
        /// Event name.
        event: &'static str,
        /// Codec error.
        #[source]
        source: AbiError,
    },
    /// An event would carry more than [`MAX_TOPICS`](crate::events::MAX_TOPICS) topics.
    #[error("event `{event}` needs {count} topics, at most 4 are allowed")]
    TooManyTopics {
        /// Event name.
        event: &'static str,
        /// Number of topics the event would carry.
        count: usize,
    },
    /// Handler outputs do not match the method's output schema.
    #[error("failed to encode output of `{method}`: {source}")]
    OutputEncode {
        /// Method being called.
        method: &'static str,
        /// Codec error.
        #[source]
        source: AbiError,
    },
}

impl CallError {
    /// Business-rule failure raised from inside a handler.
    pub fn revert(method: &'static str, reason: impl Into<String>) -> Self {
        Self::HandlerExecution {
            method,
            reason: reason.into(),
        }
    }
}

/// Errors raised while building precompile tables.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two precompiles claim the same address.
    #[error("duplicate precompile address {0}")]
    DuplicateAddress(Address),
    /// Two methods of one precompile share a selector.
    #[error("selector {selector} of `{method}` is already registered at {address}")]
    DuplicateSelector {
        /// Precompile address.
        address: Address,
        /// Colliding selector.
        selector: Selector,
        /// Method that was rejected.
        method: &'static str,
    },
    /// Two events of one precompile share a name.
    #[error("event `{event}` is already declared at {address}")]
    DuplicateEvent {
        /// Precompile address.
        address: Address,
        /// Event that was rejected.
        event: &'static str,
    },
    /// A method or event schema failed to parse.
    #[error("invalid schema for `{item}`: {source}")]
    Schema {
        /// Method or event name.
        item: &'static str,
        /// Codec error.
        #[source]
        source: AbiError,
    },
}
