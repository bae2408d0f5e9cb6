//! Revm integration for ArbOS native precompiles.
//!
//! Every [`PrecompileDescriptor`](arbos_precompiles::PrecompileDescriptor) in a
//! [`Registry`](arbos_precompiles::Registry) is wrapped in a [`NativePrecompile`] and
//! installed at its address in an `alloy_evm` [`PrecompilesMap`](alloy_evm::precompiles::PrecompilesMap):
//!
//! ```ignore
//! use arbos_precompiles::{PrecompilesConfig, Registry};
//! use arbos_revm::install_precompiles;
//!
//! let registry = Registry::from_config(&PrecompilesConfig::from_env()?)?;
//! install_precompiles(&mut evm.precompiles, &registry);
//! ```
//!
//! Logs go through the EVM journal, so a reverting frame discards them together with
//! the rest of its state changes.

pub mod precompile;

pub use precompile::{install_precompiles, NativePrecompile};
