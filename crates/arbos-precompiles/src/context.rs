//! Per-call context and the execution environment contract.

use crate::events::LogRecord;
use alloy_primitives::{Address, U256};

/// Block-level values supplied by the execution environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockContext {
    /// Number of the block being executed.
    pub number: u64,
    /// Gas limit of the block.
    pub gas_limit: u64,
}

/// Everything a handler may read about the current invocation.
///
/// Assembled fresh by the dispatcher for every call and dropped when the call returns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallContext {
    /// Address of the precompile being executed.
    pub precompile: Address,
    /// Address the precompile acts as (differs from `precompile` under delegatecall).
    pub acting_as: Address,
    /// Immediate caller.
    pub caller: Address,
    /// Value sent with the call.
    pub value: U256,
    /// Whether the call happens in a static context.
    pub read_only: bool,
    /// Block values.
    pub block: BlockContext,
}

/// The host that executes precompile calls.
///
/// Implementations own log storage and any rollback discipline; the dispatcher only
/// appends records after a call succeeded.
pub trait ExecutionEnv {
    /// Current block values.
    fn block(&self) -> BlockContext;

    /// Appends a log record to the journal, preserving call order.
    fn append_log(&mut self, log: LogRecord);
}

impl<T: ExecutionEnv + ?Sized> ExecutionEnv for &mut T {
    fn block(&self) -> BlockContext {
        (**self).block()
    }

    fn append_log(&mut self, log: LogRecord) {
        (**self).append_log(log);
    }
}

/// In-memory [`ExecutionEnv`] holding an append-only log journal.
#[derive(Clone, Debug, Default)]
pub struct MemoryEnv {
    block: BlockContext,
    logs: Vec<LogRecord>,
}

impl MemoryEnv {
    /// Creates an environment for the given block.
    pub const fn new(block: BlockContext) -> Self {
        Self {
            block,
            logs: Vec::new(),
        }
    }

    /// Environment at `number` with an unbounded gas limit.
    pub const fn at_block(number: u64) -> Self {
        Self::new(BlockContext {
            number,
            gas_limit: u64::MAX,
        })
    }

    /// Logs appended so far, in emission order.
    pub fn logs(&self) -> &[LogRecord] {
        &self.logs
    }

    /// Drains the journal.
    pub fn take_logs(&mut self) -> Vec<LogRecord> {
        std::mem::take(&mut self.logs)
    }

    /// Marker for a later [`Self::revert_to`].
    pub fn snapshot(&self) -> usize {
        self.logs.len()
    }

    /// Drops every log appended after `snapshot` was taken.
    pub fn revert_to(&mut self, snapshot: usize) {
        self.logs.truncate(snapshot);
    }
}

impl ExecutionEnv for MemoryEnv {
    fn block(&self) -> BlockContext {
        self.block
    }

    fn append_log(&mut self, log: LogRecord) {
        self.logs.push(log);
    }
}
