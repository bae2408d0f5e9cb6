//! Event schemas and log construction.
//!
//! A log carries up to [`MAX_TOPICS`] topics. For a non-anonymous event the first topic
//! is the hash of the event signature; indexed arguments follow as topics in declaration
//! order, and the non-indexed arguments are ABI encoded, in declaration order, into the
//! log data.

use crate::{
    abi::{topic_for, AbiError, AbiSchema},
    error::CallError,
};
use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{keccak256, Address, Bytes, Log, B256};
use std::collections::HashMap;

/// Maximum number of topics a single log may carry.
pub const MAX_TOPICS: usize = 4;

/// A log as handed to the execution environment's journal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogRecord {
    /// Emitting precompile.
    pub address: Address,
    /// Topic list, between zero and [`MAX_TOPICS`] entries.
    pub topics: Vec<B256>,
    /// ABI encoded non-indexed arguments.
    pub data: Bytes,
    /// Block the log was emitted in.
    pub block_number: u64,
}

impl From<LogRecord> for Log {
    fn from(record: LogRecord) -> Self {
        Self::new_unchecked(record.address, record.topics, record.data)
    }
}

/// One declared event parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventParam {
    /// ABI type.
    pub ty: DynSolType,
    /// Whether the argument becomes a topic.
    pub indexed: bool,
}

/// Schema of a declared event.
#[derive(Clone, Debug)]
pub struct EventSchema {
    name: &'static str,
    params: Vec<EventParam>,
    anonymous: bool,
    signature: String,
    topic0: B256,
    body: AbiSchema,
}

impl EventSchema {
    /// Creates a non-anonymous event.
    pub fn new(name: &'static str, params: Vec<EventParam>) -> Self {
        let inputs = AbiSchema::new(params.iter().map(|param| param.ty.clone()).collect());
        let body = AbiSchema::new(
            params
                .iter()
                .filter(|param| !param.indexed)
                .map(|param| param.ty.clone())
                .collect(),
        );
        let signature = format!("{name}({})", inputs.canonical());
        let topic0 = keccak256(signature.as_bytes());
        Self {
            name,
            params,
            anonymous: false,
            signature,
            topic0,
            body,
        }
    }

    /// Parses an event from `(type, indexed)` pairs in declaration order.
    pub fn parse(name: &'static str, params: &[(&str, bool)]) -> Result<Self, AbiError> {
        let types = AbiSchema::parse(params.iter().map(|(ty, _)| *ty))?;
        let params = types
            .types()
            .iter()
            .zip(params)
            .map(|(ty, (_, indexed))| EventParam {
                ty: ty.clone(),
                indexed: *indexed,
            })
            .collect();
        Ok(Self::new(name, params))
    }

    /// Marks the event anonymous: no signature topic is emitted.
    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }

    /// Event name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared parameters.
    pub fn params(&self) -> &[EventParam] {
        &self.params
    }

    /// Whether the event omits the signature topic.
    pub const fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    /// Canonical signature, e.g. `Basic(bool,bytes32)`.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Hash of the canonical signature. Emitted as the first topic unless anonymous.
    pub const fn signature_hash(&self) -> B256 {
        self.topic0
    }

    /// Number of topics every log of this event carries.
    pub fn topic_count(&self) -> usize {
        let indexed = self.params.iter().filter(|param| param.indexed).count();
        indexed + usize::from(!self.anonymous)
    }

    /// Builds a log from arguments given in declaration order.
    pub fn encode_log(
        &self,
        address: Address,
        block_number: u64,
        args: &[DynSolValue],
    ) -> Result<LogRecord, CallError> {
        let count = self.topic_count();
        if count > MAX_TOPICS {
            return Err(CallError::TooManyTopics {
                event: self.name,
                count,
            });
        }
        if args.len() != self.params.len() {
            return Err(self.encode_error(AbiError::ArityMismatch {
                expected: self.params.len(),
                actual: args.len(),
            }));
        }

        let mut topics = Vec::with_capacity(count);
        if !self.anonymous {
            topics.push(self.topic0);
        }
        let mut body = Vec::with_capacity(self.body.len());
        for (index, (param, arg)) in self.params.iter().zip(args).enumerate() {
            if !param.ty.matches(arg) {
                return Err(self.encode_error(AbiError::TypeMismatch {
                    index,
                    expected: param.ty.sol_type_name().into_owned(),
                }));
            }
            if param.indexed {
                topics.push(topic_for(arg));
            } else {
                body.push(arg.clone());
            }
        }
        let data = self
            .body
            .encode(&body)
            .map_err(|source| self.encode_error(source))?;

        Ok(LogRecord {
            address,
            topics,
            data: data.into(),
            block_number,
        })
    }

    fn encode_error(&self, source: AbiError) -> CallError {
        CallError::EventEncode {
            event: self.name,
            source,
        }
    }
}

/// Collects the logs a handler emits during one call.
///
/// Records stay in the emitter until the dispatcher decides the call succeeded.
#[derive(Debug)]
pub struct EventEmitter<'a> {
    events: &'a HashMap<&'static str, EventSchema>,
    address: Address,
    block_number: u64,
    read_only: bool,
    method: &'static str,
    logs: Vec<LogRecord>,
}

impl<'a> EventEmitter<'a> {
    /// Creates an emitter for a call to `method` at `address`.
    pub const fn new(
        events: &'a HashMap<&'static str, EventSchema>,
        address: Address,
        block_number: u64,
        read_only: bool,
        method: &'static str,
    ) -> Self {
        Self {
            events,
            address,
            block_number,
            read_only,
            method,
            logs: Vec::new(),
        }
    }

    /// Emits the named event with arguments in declaration order.
    pub fn emit(&mut self, name: &str, args: &[DynSolValue]) -> Result<(), CallError> {
        if self.read_only {
            return Err(CallError::WriteProtection {
                method: self.method,
            });
        }
        let schema = self.events.get(name).ok_or_else(|| CallError::UnknownEvent {
            name: name.to_string(),
        })?;
        let log = schema.encode_log(self.address, self.block_number, args)?;
        tracing::trace!(
            target: "arbos_precompiles",
            event = schema.name(),
            address = ?self.address,
            topics = log.topics.len(),
            data_len = log.data.len(),
            "log emitted"
        );
        self.logs.push(log);
        Ok(())
    }

    /// Logs emitted so far.
    pub fn logs(&self) -> &[LogRecord] {
        &self.logs
    }

    /// Hands the buffered logs over.
    pub fn into_logs(self) -> Vec<LogRecord> {
        self.logs
    }
}
