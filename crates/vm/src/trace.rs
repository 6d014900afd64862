//! Per-cycle observation of machine state.
//!
//! A [`TraceSink`] sees a borrowed [`Snapshot`] after every completed
//! cycle. Sinks cannot mutate the machine, and a run behaves identically
//! with or without one attached.

use crate::config::MAX_REGISTERS;
use regvm_common::Instruction;

/// Machine state right after one instruction executed.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    /// Index of the instruction that executed.
    pub at: usize,
    /// The instruction that executed.
    pub instruction: Instruction,
    /// Program counter after the cycle.
    pub pc: usize,
    /// Base pointer after the cycle.
    pub bp: usize,
    /// Stack pointer after the cycle.
    pub sp: usize,
    /// Stack slots `1..=sp`; `stack[0]` is address 1.
    pub stack: &'a [i64],
    /// Caller base pointers of all active calls, oldest first.
    pub frame_trace: &'a [usize],
    /// The register file.
    pub registers: &'a [i64; MAX_REGISTERS],
    /// The value an SIO mode 1 cycle appended to the output channel.
    pub emitted: Option<i64>,
    /// True for the SIO mode 3 cycle.
    pub halted: bool,
}

/// Observer of execution cycles.
pub trait TraceSink {
    /// Called once per completed cycle.
    fn observe(&mut self, snapshot: &Snapshot<'_>);
}

impl<T: TraceSink + ?Sized> TraceSink for &mut T {
    fn observe(&mut self, snapshot: &Snapshot<'_>) {
        (**self).observe(snapshot)
    }
}
