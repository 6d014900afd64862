//! VM state management: registers, stack, control registers, frame trace.

use crate::config::{MachineConfig, MAX_REGISTERS};
use crate::error::RuntimeError;
use crate::io::{InputSource, NoInput};
use crate::output::OutputChannel;
use crate::trace::TraceSink;
use regvm_common::{Instruction, Program};

/// Registers, stack, and control registers for one run.
///
/// The stack is addressed from 1; slot 0 is never read or written by
/// instructions. Activation records live at `bp..bp+3`: return value,
/// static link, dynamic link, return address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineState {
    pub(crate) registers: [i64; MAX_REGISTERS],
    pub(crate) stack: Vec<i64>,
    pub(crate) pc: usize,
    pub(crate) bp: usize,
    pub(crate) sp: usize,
    pub(crate) ir: Option<Instruction>,
    pub(crate) frame_trace: Vec<usize>,
}

impl MachineState {
    /// A zeroed machine with `bp = 1`, `sp = 0`, `pc = 0`.
    ///
    /// The outermost frame's static link (`stack[2]`) points at itself so
    /// that walking outward from the main program stays at base 1.
    pub fn new(stack_height: usize) -> Self {
        let mut stack = vec![0; stack_height];
        if let Some(slot) = stack.get_mut(2) {
            *slot = 1;
        }
        Self {
            registers: [0; MAX_REGISTERS],
            stack,
            pc: 0,
            bp: 1,
            sp: 0,
            ir: None,
            frame_trace: Vec::new(),
        }
    }

    /// Index of the next instruction to fetch.
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Base of the current activation record.
    pub fn bp(&self) -> usize {
        self.bp
    }

    /// Topmost occupied stack slot; 0 when the stack is empty.
    pub fn sp(&self) -> usize {
        self.sp
    }

    /// The most recently fetched instruction.
    pub fn ir(&self) -> Option<&Instruction> {
        self.ir.as_ref()
    }

    /// The register file.
    pub fn registers(&self) -> &[i64; MAX_REGISTERS] {
        &self.registers
    }

    /// Live stack slots `1..=sp`.
    pub fn stack(&self) -> &[i64] {
        let top = self.sp.min(self.stack.len().saturating_sub(1));
        &self.stack[1..=top]
    }

    /// Caller base pointers of every active call, oldest first. Kept for
    /// trace markers only; RTN reads the dynamic link instead.
    pub fn frame_trace(&self) -> &[usize] {
        &self.frame_trace
    }

    /// Frame resolver: the base pointer `l` static links out from `start`.
    ///
    /// `base(0, b) == b`. Each hop reads the static-link slot `stack[b + 1]`.
    pub fn base(
        &self,
        l: i64,
        start: usize,
        max_levels: usize,
        at: usize,
    ) -> Result<usize, RuntimeError> {
        let levels = usize::try_from(l)
            .ok()
            .filter(|&levels| levels <= max_levels)
            .ok_or(RuntimeError::CorruptCallChain { at })?;

        let mut b = self.checked_base(start, at)?;
        for _ in 0..levels {
            let link = self.stack[b + 1];
            b = usize::try_from(link).map_err(|_| RuntimeError::CorruptCallChain { at })?;
            b = self.checked_base(b, at)?;
        }
        Ok(b)
    }

    fn checked_base(&self, b: usize, at: usize) -> Result<usize, RuntimeError> {
        if b >= 1 && b + 1 < self.stack.len() {
            Ok(b)
        } else {
            Err(RuntimeError::CorruptCallChain { at })
        }
    }

    /// Resolve `frame_base + offset` to a valid stack address.
    pub(crate) fn address(&self, frame_base: usize, offset: i64, at: usize) -> Result<usize, RuntimeError> {
        let addr = (frame_base as i64).saturating_add(offset);
        if addr < 1 {
            Err(RuntimeError::StackUnderflow { at })
        } else if addr as u64 >= self.stack.len() as u64 {
            Err(RuntimeError::StackOverflow { at })
        } else {
            Ok(addr as usize)
        }
    }

    /// Map a register operand to an index.
    pub(crate) fn reg(index: i64, at: usize) -> Result<usize, RuntimeError> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < MAX_REGISTERS)
            .ok_or(RuntimeError::InvalidRegister { at, index })
    }
}

/// The regvm virtual machine.
///
/// Owns the machine state, the output channel, and the external
/// collaborators for one run. The engine in `execute.rs` is the only code
/// that mutates the state.
pub struct VM<'a> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    pub(crate) config: MachineConfig,
    pub(crate) state: MachineState,
    pub(crate) output: OutputChannel,
    pub(crate) input: Box<dyn InputSource + 'a>,
    pub(crate) sink: Option<Box<dyn TraceSink + 'a>>,
    /// Completed cycles.
    pub(crate) steps: u64,
    pub(crate) halted: bool,
}

impl<'a> VM<'a> {
    /// Create a VM with default limits, no input, and no trace sink.
    pub fn new(program: &'a Program) -> Self {
        Self::with_config(program, MachineConfig::default())
    }

    /// Create a VM with explicit limits, no input, and no trace sink.
    pub fn with_config(program: &'a Program, config: MachineConfig) -> Self {
        Self {
            program,
            config,
            state: MachineState::new(config.effective_stack_height()),
            output: OutputChannel::new(config.output_capacity),
            input: Box::new(NoInput),
            sink: None,
            steps: 0,
            halted: false,
        }
    }

    /// Attach the source SIO mode 2 reads from.
    pub fn with_input(mut self, input: impl InputSource + 'a) -> Self {
        self.input = Box::new(input);
        self
    }

    /// Attach an observer that sees every completed cycle.
    pub fn with_trace(mut self, sink: impl TraceSink + 'a) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Current machine state.
    pub fn state(&self) -> &MachineState {
        &self.state
    }

    /// Limits this VM runs under.
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Values emitted so far.
    pub fn output(&self) -> &[i64] {
        self.output.values()
    }

    /// Cycles completed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}
