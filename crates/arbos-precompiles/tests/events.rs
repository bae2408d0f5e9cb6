//! Calls into the built-in `ArbDebug` precompile and the logs they leave behind.

use alloy_primitives::{address, keccak256, Address, B256, U256};
use alloy_sol_types::{sol, SolCall, SolEvent, SolValue};
use arbos_precompiles::{
    debug::ARB_DEBUG_ADDRESS, precompiles, AbiSchema, CallError, CallRequest, DynSolValue,
    ExecutionEnv, MemoryEnv,
};

sol! {
    interface IArbDebug {
        event Basic(bool flag, bytes32 indexed value);
        event Mixed(bool indexed flag, bool not, bytes32 indexed value, address conn, address indexed caller);
        event Store(bool indexed flag, address indexed field, uint24 number, bytes32 value, bytes store);

        function Events(bool flag, bytes32 value) external payable returns (address, uint256);
    }
}

const BLOCK_NUMBER: u64 = 1024;
const CALLER: Address = address!("0x00000000aaaaaaaabbbbbbbbccccccccdddddddd");

fn events_calldata(flag: bool, value: B256) -> Vec<u8> {
    IArbDebug::EventsCall { flag, value }.abi_encode()
}

#[test]
fn events_echoes_caller_and_indexes_bytes32() {
    let mut env = MemoryEnv::at_block(BLOCK_NUMBER);
    let zero_hash = keccak256([0x00u8]);
    let number = U256::from(0x9364u64);

    // selector, flag = false, value = keccak256(0x00)
    let mut data = IArbDebug::EventsCall::SELECTOR.to_vec();
    data.extend_from_slice(B256::ZERO.as_slice());
    data.extend_from_slice(zero_hash.as_slice());
    assert_eq!(data, events_calldata(false, zero_hash));

    let request = CallRequest::new(&data, ARB_DEBUG_ADDRESS, CALLER).with_value(number);
    let output = precompiles()
        .call(&request, &mut env)
        .expect("call failed");

    let output_addr = Address::from_word(B256::from_slice(&output[..32]));
    let output_number = U256::from_be_slice(&output[32..]);
    assert_eq!(output_addr, CALLER, "unexpected output address");
    assert_eq!(output_number, number, "unexpected output number");

    let (decoded_addr, decoded_number) = <(Address, U256)>::abi_decode_params(&output).unwrap();
    assert_eq!((decoded_addr, decoded_number), (CALLER, number));

    let logs = env.logs();
    assert_eq!(logs.len(), 3);
    for log in logs {
        assert_eq!(log.address, ARB_DEBUG_ADDRESS, "address mismatch");
        assert_eq!(log.block_number, BLOCK_NUMBER, "block number mismatch");
    }

    let basic = &logs[0];
    let mixed = &logs[2];
    assert_eq!(basic.topics[1], zero_hash, "indexing a bytes32 didn't work");
    assert_eq!(mixed.topics[2], zero_hash, "indexing a bytes32 didn't work");
}

#[test]
fn log_layout_matches_solidity_events() {
    let mut env = MemoryEnv::at_block(BLOCK_NUMBER);
    let value = B256::repeat_byte(0x5a);
    let data = events_calldata(true, value);

    precompiles()
        .call(&CallRequest::new(&data, ARB_DEBUG_ADDRESS, CALLER), &mut env)
        .unwrap();
    let logs = env.logs();

    // Basic: one indexed parameter, one static non-indexed
    assert_eq!(logs[0].topics.len(), 2);
    assert_eq!(logs[0].topics[0], IArbDebug::Basic::SIGNATURE_HASH);
    assert_eq!(logs[0].data.as_ref(), false.abi_encode().as_slice());

    // Store: two indexed parameters, dynamic bytes in the body
    assert_eq!(logs[1].topics.len(), 3);
    assert_eq!(logs[1].topics[0], IArbDebug::Store::SIGNATURE_HASH);
    let body = AbiSchema::parse(["uint24", "bytes32", "bytes"])
        .unwrap()
        .decode(&logs[1].data)
        .unwrap();
    assert_eq!(body[0], DynSolValue::Uint(U256::ZERO, 24));
    assert_eq!(body[1], DynSolValue::FixedBytes(value, 32));
    assert_eq!(body[2], DynSolValue::Bytes(CALLER.to_vec()));

    // Mixed: three indexed parameters, two non-indexed
    let mixed = &logs[2];
    assert_eq!(mixed.topics.len(), 4);
    assert_eq!(mixed.topics[0], IArbDebug::Mixed::SIGNATURE_HASH);
    assert_eq!(mixed.topics[1], B256::with_last_byte(1));
    assert_eq!(mixed.topics[2], value);
    assert_eq!(mixed.topics[3], CALLER.into_word());
    assert_eq!(mixed.data.len(), 64);
    assert_eq!(
        mixed.data.as_ref(),
        (false, ARB_DEBUG_ADDRESS).abi_encode_params().as_slice()
    );
}

#[test]
fn unknown_selector_produces_no_logs() {
    let mut env = MemoryEnv::at_block(BLOCK_NUMBER);
    let mut data = events_calldata(false, B256::ZERO);
    data[..4].copy_from_slice(&[0xff, 0xff, 0xff, 0xff]);

    let err = precompiles()
        .call(&CallRequest::new(&data, ARB_DEBUG_ADDRESS, CALLER), &mut env)
        .unwrap_err();

    assert!(matches!(err, CallError::UnknownMethod { .. }));
    assert!(env.logs().is_empty());
}

#[test]
fn failed_call_leaves_journal_untouched() {
    let mut env = MemoryEnv::at_block(BLOCK_NUMBER);
    let data = events_calldata(false, B256::ZERO);

    precompiles()
        .call(&CallRequest::new(&data, ARB_DEBUG_ADDRESS, CALLER), &mut env)
        .unwrap();
    assert_eq!(env.logs().len(), 3);

    // truncated arguments fail before the handler runs
    let err = precompiles()
        .call(
            &CallRequest::new(&data[..data.len() - 1], ARB_DEBUG_ADDRESS, CALLER),
            &mut env,
        )
        .unwrap_err();
    assert!(matches!(err, CallError::InputDecode { method: "Events", .. }));

    // state-changing methods are rejected in read-only calls
    let err = precompiles()
        .call(
            &CallRequest::new(&data, ARB_DEBUG_ADDRESS, CALLER).read_only(),
            &mut env,
        )
        .unwrap_err();
    assert!(matches!(err, CallError::WriteProtection { method: "Events" }));

    assert_eq!(env.logs().len(), 3, "failed calls must not append logs");
    assert_eq!(env.block().number, BLOCK_NUMBER);
}

#[test]
fn registry_is_shared_across_threads() {
    let handles: Vec<_> = (0..4u8)
        .map(|i| {
            std::thread::spawn(move || {
                let mut env = MemoryEnv::at_block(u64::from(i));
                let data = events_calldata(i % 2 == 0, B256::repeat_byte(i));
                precompiles()
                    .call(&CallRequest::new(&data, ARB_DEBUG_ADDRESS, CALLER), &mut env)
                    .map(|_| env.logs().len())
                    .map_err(|err| err.to_string())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), 3);
    }
}
