//! # ArbOS Native Precompiles
//!
//! Contracts implemented as native code at fixed addresses, called with Ethereum ABI
//! call data and emitting ABI compliant logs.
//!
//! ## Available Precompiles
//!
//! | Address | Name | Description |
//! |---------|------|-------------|
//! | `0x00FF` | [`debug`] | Debug-only `ArbDebug`, exercises dispatch and event layout |
//!
//! ## Architecture
//!
//! Every call follows the same path:
//!
//! 1. **Selector**: the first four bytes of the call data pick a
//!    [`MethodDescriptor`] out of the [`PrecompileDescriptor`] at the target address
//! 2. **Decode**: the remaining bytes are decoded against the method's input
//!    [`AbiSchema`]
//! 3. **Execute**: the handler runs with a [`CallScope`] giving read access to the
//!    [`CallContext`] and a per-call log buffer
//! 4. **Encode**: outputs are encoded against the output schema; only then are the
//!    buffered logs appended to the [`ExecutionEnv`]
//!
//! Any failure aborts the call with a [`CallError`] and appends no logs.
//!
//! ## Integration
//!
//! The [`Registry`] is built once and is read-only afterwards:
//!
//! ```ignore
//! use arbos_precompiles::{precompiles, CallRequest, MemoryEnv};
//!
//! let mut env = MemoryEnv::at_block(1024);
//! let output = precompiles().call(&CallRequest::new(&calldata, target, caller), &mut env)?;
//! ```
//!
//! The `arbos-revm` crate installs a registry into a revm precompile map.

pub mod abi;
pub mod config;
pub mod context;
pub mod debug;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod method;
pub mod precompile;
pub mod registry;

pub use abi::{AbiError, AbiSchema};
pub use config::{ConfigError, PrecompilesConfig};
pub use context::{BlockContext, CallContext, ExecutionEnv, MemoryEnv};
pub use dispatch::{CallRequest, CallScope};
pub use error::{CallError, RegistryError};
pub use events::{EventEmitter, EventParam, EventSchema, LogRecord, MAX_TOPICS};
pub use method::{selector, MethodDescriptor, MethodHandler, StateMutability};
pub use precompile::{PrecompileBuilder, PrecompileDescriptor};
pub use registry::{precompiles, Registry, RegistryBuilder};

pub use alloy_dyn_abi::{DynSolType, DynSolValue};
