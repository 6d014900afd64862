//! Fetch–execute loop and opcode dispatch.

use crate::config::{FRAME_SIZE, MAX_REGISTERS};
use crate::error::RuntimeError;
use crate::machine::{MachineState, VM};
use crate::trace::Snapshot;
use regvm_common::{Instruction, Opcode};
use tracing::{debug, trace};

/// What one cycle left the machine in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Ready for the next fetch.
    Continue,
    /// SIO mode 3 executed. Further steps do nothing.
    Halted,
}

/// The result of a run that reached SIO mode 3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Output channel contents in emission order.
    pub output: Vec<i64>,
    /// Register file at halt.
    pub registers: [i64; MAX_REGISTERS],
    /// Cycles executed, including the halt.
    pub steps: u64,
}

/// Side effect of one executed instruction that the trace sink cares about.
enum Effect {
    None,
    Emit(i64),
    Halt,
}

impl<'a> VM<'a> {
    /// Run until halt or error.
    pub fn execute(&mut self) -> Result<Completion, RuntimeError> {
        loop {
            match self.step() {
                Ok(StepOutcome::Continue) => {}
                Ok(StepOutcome::Halted) => {
                    debug!(steps = self.steps, outputs = self.output.values().len(), "halted");
                    return Ok(Completion {
                        output: self.output.values().to_vec(),
                        registers: self.state.registers,
                        steps: self.steps,
                    });
                }
                Err(e) => {
                    debug!(error = %e, steps = self.steps, "run aborted");
                    return Err(e);
                }
            }
        }
    }

    /// Execute exactly one instruction.
    ///
    /// `pc` is advanced before the instruction runs, so control transfers
    /// always overwrite it with an absolute target.
    pub fn step(&mut self) -> Result<StepOutcome, RuntimeError> {
        if self.halted() {
            return Ok(StepOutcome::Halted);
        }

        let at = self.state.pc;
        if let Some(limit) = self.config.step_limit {
            if self.steps >= limit {
                return Err(RuntimeError::StepLimitExceeded { at, limit });
            }
        }

        let instr = *self.fetch()?;
        self.state.ir = Some(instr);
        self.state.pc += 1;

        trace!(
            at,
            opcode = %instr.opcode,
            r = instr.r,
            l = instr.l,
            m = instr.m,
            "dispatch"
        );

        let effect = self.dispatch(&instr, at)?;
        self.steps += 1;

        let (emitted, halted) = match effect {
            Effect::None => (None, false),
            Effect::Emit(value) => (Some(value), false),
            Effect::Halt => (None, true),
        };
        if halted {
            self.halted = true;
        }
        self.notify(at, instr, emitted, halted);

        Ok(if halted {
            StepOutcome::Halted
        } else {
            StepOutcome::Continue
        })
    }

    /// True once SIO mode 3 has executed.
    pub fn halted(&self) -> bool {
        self.halted
    }

    fn fetch(&self) -> Result<&Instruction, RuntimeError> {
        self.program
            .get(self.state.pc)
            .ok_or(RuntimeError::FetchExhausted {
                at: self.state.pc,
                count: self.program.len(),
            })
    }

    fn notify(&mut self, at: usize, instruction: Instruction, emitted: Option<i64>, halted: bool) {
        if let Some(sink) = self.sink.as_mut() {
            let snapshot = Snapshot {
                at,
                instruction,
                pc: self.state.pc,
                bp: self.state.bp,
                sp: self.state.sp,
                stack: self.state.stack(),
                frame_trace: &self.state.frame_trace,
                registers: &self.state.registers,
                emitted,
                halted,
            };
            sink.observe(&snapshot);
        }
    }

    fn dispatch(&mut self, instr: &Instruction, at: usize) -> Result<Effect, RuntimeError> {
        match instr.opcode {
            Opcode::Lit => {
                let r = MachineState::reg(instr.r, at)?;
                self.state.registers[r] = instr.m;
            }
            Opcode::Rtn => self.exec_rtn(at)?,
            Opcode::Lod => {
                let r = MachineState::reg(instr.r, at)?;
                let addr = self.frame_address(instr, at)?;
                self.state.registers[r] = self.state.stack[addr];
            }
            Opcode::Sto => {
                let r = MachineState::reg(instr.r, at)?;
                let addr = self.frame_address(instr, at)?;
                self.state.stack[addr] = self.state.registers[r];
            }
            Opcode::Cal => self.exec_cal(instr, at)?,
            Opcode::Inc => self.exec_inc(instr.m, at)?,
            Opcode::Jmp => self.state.pc = self.jump_target(instr.m, at)?,
            Opcode::Jpc => {
                let r = MachineState::reg(instr.r, at)?;
                if self.state.registers[r] == 0 {
                    self.state.pc = self.jump_target(instr.m, at)?;
                }
            }
            Opcode::Sio => return self.exec_sio(instr, at),

            Opcode::Neg => {
                let r = MachineState::reg(instr.r, at)?;
                let l = MachineState::reg(instr.l, at)?;
                self.state.registers[r] = self.state.registers[l].wrapping_neg();
            }
            Opcode::Add => self.exec_binary(instr, at, i64::wrapping_add)?,
            Opcode::Sub => self.exec_binary(instr, at, i64::wrapping_sub)?,
            Opcode::Mul => self.exec_binary(instr, at, i64::wrapping_mul)?,
            Opcode::Div => self.exec_division(instr, at, i64::wrapping_div)?,
            Opcode::Mod => self.exec_division(instr, at, i64::wrapping_rem)?,
            Opcode::Odd => {
                let r = MachineState::reg(instr.r, at)?;
                self.state.registers[r] %= 2;
            }

            Opcode::Eql => self.exec_comparison(instr, at, |a, b| a == b)?,
            Opcode::Neq => self.exec_comparison(instr, at, |a, b| a != b)?,
            Opcode::Lss => self.exec_comparison(instr, at, |a, b| a < b)?,
            Opcode::Leq => self.exec_comparison(instr, at, |a, b| a <= b)?,
            Opcode::Gtr => self.exec_comparison(instr, at, |a, b| a > b)?,
            Opcode::Geq => self.exec_comparison(instr, at, |a, b| a >= b)?,
        }
        Ok(Effect::None)
    }

    // ---- Frames ----

    /// `base(l, bp) + m` for LOD and STO.
    fn frame_address(&self, instr: &Instruction, at: usize) -> Result<usize, RuntimeError> {
        let frame = self
            .state
            .base(instr.l, self.state.bp, self.config.max_lexi_levels, at)?;
        self.state.address(frame, instr.m, at)
    }

    fn exec_cal(&mut self, instr: &Instruction, at: usize) -> Result<(), RuntimeError> {
        let static_link = self
            .state
            .base(instr.l, self.state.bp, self.config.max_lexi_levels, at)?;
        let target = self.jump_target(instr.m, at)?;

        let sp = self.state.sp;
        if sp < self.state.bp + FRAME_SIZE - 1 {
            return Err(RuntimeError::StackUnderflow { at });
        }
        if sp + FRAME_SIZE >= self.state.stack.len() {
            return Err(RuntimeError::StackOverflow { at });
        }

        let bp = self.state.bp;
        self.state.stack[sp + 1] = 0;
        self.state.stack[sp + 2] = static_link as i64;
        self.state.stack[sp + 3] = bp as i64;
        self.state.stack[sp + 4] = self.state.pc as i64;
        self.state.frame_trace.push(bp);

        self.state.bp = sp + 1;
        self.state.sp = sp + FRAME_SIZE;
        self.state.pc = target;

        debug!(
            at,
            target,
            bp = self.state.bp,
            depth = self.state.frame_trace.len(),
            "call"
        );
        Ok(())
    }

    /// Unwind the current frame.
    ///
    /// With `sp` lowered to `bp - 1`, slots `sp + 3` and `sp + 4` are the
    /// returning frame's dynamic link and return address. The restored
    /// frame must lie wholly below the returning one.
    fn exec_rtn(&mut self, at: usize) -> Result<(), RuntimeError> {
        if self.state.bp == 1 {
            return Err(RuntimeError::StackUnderflow { at });
        }

        let bp = self.state.bp;
        let sp = bp - 1;
        let dynamic_link = self.state.stack[sp + 3];
        let return_address = self.state.stack[sp + 4];

        let caller_bp = usize::try_from(dynamic_link)
            .ok()
            .filter(|&b| b >= 1 && b + FRAME_SIZE <= bp)
            .ok_or(RuntimeError::StackUnderflow { at })?;
        let pc = self.jump_target(return_address, at)?;

        self.state.sp = sp;
        self.state.bp = caller_bp;
        self.state.pc = pc;
        self.state.frame_trace.pop();

        debug!(
            at,
            pc,
            bp = caller_bp,
            depth = self.state.frame_trace.len(),
            "return"
        );
        Ok(())
    }

    fn exec_inc(&mut self, delta: i64, at: usize) -> Result<(), RuntimeError> {
        let sp = (self.state.sp as i64)
            .checked_add(delta)
            .ok_or(RuntimeError::StackOverflow { at })?;
        if sp < self.frame_floor() as i64 {
            return Err(RuntimeError::StackUnderflow { at });
        }
        if sp as u64 >= self.state.stack.len() as u64 {
            return Err(RuntimeError::StackOverflow { at });
        }
        self.state.sp = sp as usize;
        Ok(())
    }

    /// Lowest `sp` the current frame may release to. A called frame keeps
    /// its activation record `bp..bp+3` until RTN.
    fn frame_floor(&self) -> usize {
        match self.state.bp {
            1 => 0,
            bp => bp + FRAME_SIZE - 1,
        }
    }

    /// Validate a control-transfer target. `target == len` is allowed and
    /// fails on the following fetch.
    fn jump_target(&self, target: i64, at: usize) -> Result<usize, RuntimeError> {
        usize::try_from(target)
            .ok()
            .filter(|&t| t <= self.program.len())
            .ok_or(RuntimeError::InvalidJumpTarget { at, target })
    }

    // ---- I/O ----

    fn exec_sio(&mut self, instr: &Instruction, at: usize) -> Result<Effect, RuntimeError> {
        match instr.m {
            1 => {
                let r = MachineState::reg(instr.r, at)?;
                let value = self.state.registers[r];
                self.output
                    .push(value)
                    .map_err(|full| RuntimeError::ChannelFull {
                        at,
                        capacity: full.capacity,
                    })?;
                Ok(Effect::Emit(value))
            }
            2 => {
                let r = MachineState::reg(instr.r, at)?;
                let value = self
                    .input
                    .read_int()
                    .map_err(|source| RuntimeError::Input { at, source })?;
                self.state.registers[r] = value;
                Ok(Effect::None)
            }
            3 => Ok(Effect::Halt),
            mode => Err(RuntimeError::UnknownIoMode { at, mode }),
        }
    }

    // ---- Arithmetic ----

    fn exec_binary(
        &mut self,
        instr: &Instruction,
        at: usize,
        op: impl Fn(i64, i64) -> i64,
    ) -> Result<(), RuntimeError> {
        let (r, l, m) = Self::three_regs(instr, at)?;
        self.state.registers[r] = op(self.state.registers[l], self.state.registers[m]);
        Ok(())
    }

    fn exec_division(
        &mut self,
        instr: &Instruction,
        at: usize,
        op: impl Fn(i64, i64) -> i64,
    ) -> Result<(), RuntimeError> {
        let (r, l, m) = Self::three_regs(instr, at)?;
        let divisor = self.state.registers[m];
        if divisor == 0 {
            return Err(RuntimeError::ArithmeticError {
                at,
                opcode: instr.opcode,
            });
        }
        self.state.registers[r] = op(self.state.registers[l], divisor);
        Ok(())
    }

    fn exec_comparison(
        &mut self,
        instr: &Instruction,
        at: usize,
        op: impl Fn(i64, i64) -> bool,
    ) -> Result<(), RuntimeError> {
        let (r, l, m) = Self::three_regs(instr, at)?;
        self.state.registers[r] = op(self.state.registers[l], self.state.registers[m]) as i64;
        Ok(())
    }

    fn three_regs(instr: &Instruction, at: usize) -> Result<(usize, usize, usize), RuntimeError> {
        Ok((
            MachineState::reg(instr.r, at)?,
            MachineState::reg(instr.l, at)?,
            MachineState::reg(instr.m, at)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regvm_common::Program;

    fn i(op: Opcode, r: i64, l: i64, m: i64) -> Instruction {
        Instruction::new(op, r, l, m)
    }

    #[test]
    fn fetch_advances_pc_before_execute() {
        let program = Program::new(vec![i(Opcode::Lit, 0, 0, 1), i(Opcode::Sio, 0, 0, 3)]);
        let mut vm = VM::new(&program);
        assert_eq!(vm.step(), Ok(StepOutcome::Continue));
        assert_eq!(vm.state().pc(), 1);
        assert_eq!(vm.state().ir(), Some(&i(Opcode::Lit, 0, 0, 1)));
    }

    #[test]
    fn step_after_halt_is_inert() {
        let program = Program::new(vec![i(Opcode::Sio, 0, 0, 3)]);
        let mut vm = VM::new(&program);
        assert_eq!(vm.step(), Ok(StepOutcome::Halted));
        assert_eq!(vm.step(), Ok(StepOutcome::Halted));
        assert_eq!(vm.steps(), 1);
        assert!(vm.halted());
    }

    #[test]
    fn call_writes_activation_record() {
        let program = Program::new(vec![
            i(Opcode::Inc, 0, 0, 4),
            i(Opcode::Cal, 0, 0, 3),
            i(Opcode::Sio, 0, 0, 3),
            i(Opcode::Rtn, 0, 0, 0),
        ]);
        let mut vm = VM::new(&program);
        vm.step().unwrap();
        vm.step().unwrap();

        let state = vm.state();
        assert_eq!(state.bp(), 5);
        assert_eq!(state.sp(), 8);
        assert_eq!(state.pc(), 3);
        // return value, static link, dynamic link, return address
        assert_eq!(&state.stack()[4..8], &[0, 1, 1, 2]);
        assert_eq!(state.frame_trace(), &[1]);
    }

    #[test]
    fn return_from_main_underflows() {
        let program = Program::new(vec![i(Opcode::Rtn, 0, 0, 0)]);
        let mut vm = VM::new(&program);
        assert_eq!(vm.step(), Err(RuntimeError::StackUnderflow { at: 0 }));
    }

    #[test]
    fn inc_below_zero_underflows() {
        let program = Program::new(vec![i(Opcode::Inc, 0, 0, -1)]);
        let mut vm = VM::new(&program);
        assert_eq!(vm.step(), Err(RuntimeError::StackUnderflow { at: 0 }));
    }

    #[test]
    fn odd_keeps_sign_of_dividend() {
        let program = Program::new(vec![
            i(Opcode::Lit, 0, 0, -3),
            i(Opcode::Odd, 0, 0, 0),
            i(Opcode::Lit, 1, 0, 4),
            i(Opcode::Odd, 1, 0, 0),
            i(Opcode::Sio, 0, 0, 3),
        ]);
        let completion = VM::new(&program).execute().unwrap();
        assert_eq!(completion.registers[0], -1);
        assert_eq!(completion.registers[1], 0);
    }
}
