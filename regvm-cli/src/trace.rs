//! Tab-separated execution trace, one row per executed instruction.

use regvm_vm::{Snapshot, TraceSink};
use std::io::{self, Write};

const HEADER: &str = "Line\tOP\tR\tL\tM\tPC\tBP\tSP\tStack";

/// Writes a trace table to `out`. The first write error is kept and
/// returned by [`TraceTable::finish`]; later rows are dropped.
pub struct TraceTable<W: Write> {
    out: W,
    header_written: bool,
    error: Option<io::Error>,
}

impl<W: Write> TraceTable<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_written: false,
            error: None,
        }
    }

    /// Flush and surface any write error.
    pub fn finish(&mut self) -> io::Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()
    }

    fn write_row(&mut self, s: &Snapshot<'_>) -> io::Result<()> {
        if !self.header_written {
            writeln!(self.out, "{HEADER}")?;
            self.header_written = true;
        }

        let instr = &s.instruction;
        writeln!(
            self.out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            s.at,
            instr.opcode.mnemonic().to_ascii_lowercase(),
            instr.r,
            instr.l,
            instr.m,
            s.pc,
            s.bp,
            s.sp,
            stack_cells(s)
        )?;

        let registers: Vec<String> = s.registers.iter().map(i64::to_string).collect();
        writeln!(self.out, "RF: {}", registers.join(" "))?;

        if let Some(value) = s.emitted {
            writeln!(self.out, "OUTPUT: {value}")?;
        }
        Ok(())
    }
}

/// Stack cells `1..=sp`, with `|` before each recorded frame base.
fn stack_cells(s: &Snapshot<'_>) -> String {
    let mut frames = s.frame_trace.iter().peekable();
    let mut cells = Vec::with_capacity(s.stack.len());
    for (idx, value) in s.stack.iter().enumerate() {
        let addr = idx + 1;
        if frames.peek() == Some(&&addr) {
            cells.push("|".to_string());
            frames.next();
        }
        cells.push(value.to_string());
    }
    cells.join(" ")
}

impl<W: Write> TraceSink for TraceTable<W> {
    fn observe(&mut self, snapshot: &Snapshot<'_>) {
        if self.error.is_none() {
            if let Err(e) = self.write_row(snapshot) {
                self.error = Some(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regvm_common::{Instruction, Opcode};

    fn snapshot<'a>(
        instruction: Instruction,
        stack: &'a [i64],
        frame_trace: &'a [usize],
        registers: &'a [i64; 16],
    ) -> Snapshot<'a> {
        Snapshot {
            at: 4,
            instruction,
            pc: 5,
            bp: 5,
            sp: stack.len(),
            stack,
            frame_trace,
            registers,
            emitted: None,
            halted: false,
        }
    }

    fn render(snapshots: &[Snapshot<'_>]) -> String {
        let mut table = TraceTable::new(Vec::new());
        for s in snapshots {
            table.observe(s);
        }
        table.finish().unwrap();
        String::from_utf8(table.out).unwrap()
    }

    #[test]
    fn header_then_row_then_registers() {
        let registers = [0; 16];
        let text = render(&[snapshot(
            Instruction::new(Opcode::Inc, 0, 0, 4),
            &[0, 1, 0, 0],
            &[],
            &registers,
        )]);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "4\tinc\t0\t0\t4\t5\t5\t4\t0 1 0 0");
        assert_eq!(lines[2], "RF: 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn header_written_once() {
        let registers = [0; 16];
        let s = snapshot(Instruction::new(Opcode::Jmp, 0, 0, 0), &[], &[], &registers);
        let text = render(&[s, s]);
        assert_eq!(text.matches("Line\tOP").count(), 1);
    }

    #[test]
    fn frame_markers_precede_recorded_bases() {
        let registers = [0; 16];
        let stack = [0, 1, 0, 0, 0, 1, 1, 2, 0, 5, 1, 4];
        let s = snapshot(
            Instruction::new(Opcode::Cal, 0, 0, 3),
            &stack,
            &[1, 5],
            &registers,
        );
        assert_eq!(stack_cells(&s), "| 0 1 0 0 | 0 1 1 2 0 5 1 4");
    }

    #[test]
    fn emitted_value_gets_output_line() {
        let mut registers = [0; 16];
        registers[0] = 8;
        let mut s = snapshot(Instruction::new(Opcode::Sio, 0, 0, 1), &[], &[], &registers);
        s.emitted = Some(8);
        let text = render(&[s]);
        assert!(text.ends_with("OUTPUT: 8\n"), "{text}");
        assert!(text.contains("RF: 8 0"));
    }
}
