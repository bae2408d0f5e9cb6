//! `ArbDebug`: debug-only precompile exercising dispatch and event emission.
//!
//! ```solidity
//! interface ArbDebug {
//!     event Basic(bool flag, bytes32 indexed value);
//!     event Mixed(bool indexed flag, bool not, bytes32 indexed value, address conn, address indexed caller);
//!     event Store(bool indexed flag, address indexed field, uint24 number, bytes32 value, bytes store);
//!
//!     function Events(bool flag, bytes32 value) external payable returns (address, uint256);
//!     function EventsView() external view;
//!     function CustomRevert(uint64 number) external pure;
//!     function Panic() external pure;
//! }
//! ```

use crate::{
    abi::AbiError,
    dispatch::CallScope,
    error::{CallError, RegistryError},
    events::EventSchema,
    method::{MethodDescriptor, StateMutability},
    precompile::PrecompileDescriptor,
};
use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{address, Address, B256, U256};

/// `ArbDebug` address: `0x00..ff`.
pub const ARB_DEBUG_ADDRESS: Address = address!("0x00000000000000000000000000000000000000ff");

/// Builds the `ArbDebug` precompile.
pub fn arb_debug() -> Result<PrecompileDescriptor, RegistryError> {
    Ok(PrecompileDescriptor::builder("ArbDebug", ARB_DEBUG_ADDRESS)
        .event(event("Basic", &[("bool", false), ("bytes32", true)])?)
        .event(event(
            "Mixed",
            &[
                ("bool", true),
                ("bool", false),
                ("bytes32", true),
                ("address", false),
                ("address", true),
            ],
        )?)
        .event(event(
            "Store",
            &[
                ("bool", true),
                ("address", true),
                ("uint24", false),
                ("bytes32", false),
                ("bytes", false),
            ],
        )?)
        .method(method(
            "Events",
            &["bool", "bytes32"],
            &["address", "uint256"],
            StateMutability::Payable,
            events,
        )?)
        .method(method(
            "EventsView",
            &[],
            &[],
            StateMutability::View,
            events_view,
        )?)
        .method(method(
            "CustomRevert",
            &["uint64"],
            &[],
            StateMutability::Pure,
            custom_revert,
        )?)
        .method(method(
            "Panic",
            &[],
            &[],
            StateMutability::Pure,
            always_panic,
        )?)
        .build()?)
}

/// Emits `Basic`, `Store` and `Mixed`, then echoes the caller and the call value.
fn events(scope: &mut CallScope<'_>, args: &[DynSolValue]) -> Result<Vec<DynSolValue>, CallError> {
    let flag = bool_arg(scope, args, 0)?;
    let value = word_arg(scope, args, 1)?;
    let context = scope.context().clone();

    scope.emit(
        "Basic",
        &[DynSolValue::Bool(!flag), DynSolValue::FixedBytes(value, 32)],
    )?;
    scope.emit(
        "Store",
        &[
            DynSolValue::Bool(flag),
            DynSolValue::Address(context.acting_as),
            DynSolValue::Uint(context.value & U256::from(0x00ff_ffffu32), 24),
            DynSolValue::FixedBytes(value, 32),
            DynSolValue::Bytes(context.caller.to_vec()),
        ],
    )?;
    scope.emit(
        "Mixed",
        &[
            DynSolValue::Bool(flag),
            DynSolValue::Bool(!flag),
            DynSolValue::FixedBytes(value, 32),
            DynSolValue::Address(context.acting_as),
            DynSolValue::Address(context.caller),
        ],
    )?;

    Ok(vec![
        DynSolValue::Address(context.caller),
        DynSolValue::Uint(context.value, 256),
    ])
}

/// Emits from a view method; only succeeds outside read-only calls.
fn events_view(
    scope: &mut CallScope<'_>,
    _: &[DynSolValue],
) -> Result<Vec<DynSolValue>, CallError> {
    scope.emit(
        "Basic",
        &[DynSolValue::Bool(true), DynSolValue::FixedBytes(B256::ZERO, 32)],
    )?;
    Ok(Vec::new())
}

fn custom_revert(
    scope: &mut CallScope<'_>,
    args: &[DynSolValue],
) -> Result<Vec<DynSolValue>, CallError> {
    let number = match args.first() {
        Some(DynSolValue::Uint(number, 64)) => *number,
        _ => return Err(scope.revert("expected a uint64 argument")),
    };
    Err(scope.revert(format!("custom revert {number}")))
}

fn always_panic(scope: &mut CallScope<'_>, _: &[DynSolValue]) -> Result<Vec<DynSolValue>, CallError> {
    Err(scope.revert("called panic"))
}

fn bool_arg(scope: &CallScope<'_>, args: &[DynSolValue], index: usize) -> Result<bool, CallError> {
    args.get(index)
        .and_then(DynSolValue::as_bool)
        .ok_or_else(|| scope.revert(format!("argument {index} is not a bool")))
}

fn word_arg(scope: &CallScope<'_>, args: &[DynSolValue], index: usize) -> Result<B256, CallError> {
    match args.get(index) {
        Some(DynSolValue::FixedBytes(word, 32)) => Ok(*word),
        _ => Err(scope.revert(format!("argument {index} is not a bytes32"))),
    }
}

fn event(name: &'static str, params: &[(&str, bool)]) -> Result<EventSchema, RegistryError> {
    EventSchema::parse(name, params).map_err(|source| schema_error(name, source))
}

fn method<F>(
    name: &'static str,
    inputs: &[&str],
    outputs: &[&str],
    mutability: StateMutability,
    handler: F,
) -> Result<MethodDescriptor, RegistryError>
where
    F: Fn(&mut CallScope<'_>, &[DynSolValue]) -> Result<Vec<DynSolValue>, CallError>
        + Send
        + Sync
        + 'static,
{
    MethodDescriptor::parse(name, inputs, outputs, mutability, handler)
        .map_err(|source| schema_error(name, source))
}

fn schema_error(item: &'static str, source: AbiError) -> RegistryError {
    RegistryError::Schema { item, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{abi::AbiSchema, context::MemoryEnv, dispatch::CallRequest};
    use alloy_primitives::keccak256;
    use alloy_sol_types::{sol, SolCall, SolEvent};

    sol! {
        interface IArbDebug {
            event Basic(bool flag, bytes32 indexed value);
            event Mixed(bool indexed flag, bool not, bytes32 indexed value, address conn, address indexed caller);
            event Store(bool indexed flag, address indexed field, uint24 number, bytes32 value, bytes store);

            function Events(bool flag, bytes32 value) external payable returns (address, uint256);
            function EventsView() external view;
            function CustomRevert(uint64 number) external pure;
            function Panic() external pure;
        }
    }

    const CALLER: Address = address!("0x00000000aaaaaaaabbbbbbbbccccccccdddddddd");

    #[test]
    fn selectors_and_signatures_match_solidity() {
        let debug = arb_debug().unwrap();

        let expected = [
            ("Events", IArbDebug::EventsCall::SELECTOR),
            ("EventsView", IArbDebug::EventsViewCall::SELECTOR),
            ("CustomRevert", IArbDebug::CustomRevertCall::SELECTOR),
            ("Panic", IArbDebug::PanicCall::SELECTOR),
        ];
        for (name, selector) in expected {
            assert_eq!(debug.method(name).unwrap().selector().0, selector, "{name}");
        }

        assert_eq!(
            debug.event("Basic").unwrap().signature_hash(),
            IArbDebug::Basic::SIGNATURE_HASH
        );
        assert_eq!(
            debug.event("Mixed").unwrap().signature_hash(),
            IArbDebug::Mixed::SIGNATURE_HASH
        );
        assert_eq!(
            debug.event("Store").unwrap().signature_hash(),
            IArbDebug::Store::SIGNATURE_HASH
        );
    }

    #[test]
    fn store_event_carries_truncated_value_and_caller_bytes() {
        let debug = arb_debug().unwrap();
        let mut env = MemoryEnv::at_block(5);
        let value = keccak256([0x00u8]);
        let data = IArbDebug::EventsCall { flag: true, value }.abi_encode();

        debug
            .call(
                &CallRequest::new(&data, ARB_DEBUG_ADDRESS, CALLER)
                    .with_value(U256::from(0x0123_4567u64)),
                &mut env,
            )
            .expect("Events succeeds");

        let store = &env.logs()[1];
        assert_eq!(store.topics[0], IArbDebug::Store::SIGNATURE_HASH);
        assert_eq!(store.topics[1], B256::with_last_byte(1));
        assert_eq!(store.topics[2], ARB_DEBUG_ADDRESS.into_word());

        let body = AbiSchema::parse(["uint24", "bytes32", "bytes"])
            .unwrap()
            .decode(&store.data)
            .unwrap();
        assert_eq!(body[0], DynSolValue::Uint(U256::from(0x23_4567u64), 24));
        assert_eq!(body[1], DynSolValue::FixedBytes(value, 32));
        assert_eq!(body[2], DynSolValue::Bytes(CALLER.to_vec()));
    }

    #[test]
    fn events_view_emits_only_outside_read_only_calls() {
        let debug = arb_debug().unwrap();
        let data = IArbDebug::EventsViewCall {}.abi_encode();

        let mut env = MemoryEnv::at_block(1);
        debug
            .call(&CallRequest::new(&data, ARB_DEBUG_ADDRESS, CALLER), &mut env)
            .expect("view method may emit in a regular call");
        assert_eq!(env.logs().len(), 1);

        let mut env = MemoryEnv::at_block(1);
        let err = debug
            .call(
                &CallRequest::new(&data, ARB_DEBUG_ADDRESS, CALLER).read_only(),
                &mut env,
            )
            .unwrap_err();
        assert!(matches!(err, CallError::WriteProtection { method: "EventsView" }));
        assert!(env.logs().is_empty());
    }

    #[test]
    fn custom_revert_reports_number() {
        let debug = arb_debug().unwrap();
        let mut env = MemoryEnv::at_block(1);
        let data = IArbDebug::CustomRevertCall { number: 42 }.abi_encode();

        let err = debug
            .call(&CallRequest::new(&data, ARB_DEBUG_ADDRESS, CALLER), &mut env)
            .unwrap_err();

        assert_eq!(err.to_string(), "`CustomRevert` reverted: custom revert 42");
    }

    #[test]
    fn panic_reverts() {
        let debug = arb_debug().unwrap();
        let mut env = MemoryEnv::at_block(1);
        let data = IArbDebug::PanicCall {}.abi_encode();

        let err = debug
            .call(&CallRequest::new(&data, ARB_DEBUG_ADDRESS, CALLER), &mut env)
            .unwrap_err();

        assert!(matches!(
            err,
            CallError::HandlerExecution { method: "Panic", ref reason } if reason == "called panic"
        ));
    }

    #[test]
    fn pure_methods_reject_value() {
        let debug = arb_debug().unwrap();
        let mut env = MemoryEnv::at_block(1);
        let data = IArbDebug::PanicCall {}.abi_encode();

        let err = debug
            .call(
                &CallRequest::new(&data, ARB_DEBUG_ADDRESS, CALLER).with_value(U256::from(1)),
                &mut env,
            )
            .unwrap_err();

        assert!(matches!(err, CallError::NonPayable { method: "Panic" }));
    }
}
