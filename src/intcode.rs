use std::fmt::{self, Display, Write};

use tracing::{debug, trace};

use crate::error::{self, Fault};
use crate::program;

/// Opcode selecting addition.
pub const ADD: i64 = 1;
/// Opcode selecting multiplication.
pub const MUL: i64 = 2;
/// The halt sentinel.
pub const HALT: i64 = 99;

/// Width of a binary instruction: opcode, two source indices, one destination.
const WIDTH: usize = 4;

#[derive(Debug, PartialEq, Clone, Copy)]
enum OpCode {
    Add = 1,
    Mul = 2,
    Halt = 99,
}

impl OpCode {
    fn decode(opcode: i64) -> Option<Self> {
        match opcode {
            ADD => Some(OpCode::Add),
            MUL => Some(OpCode::Mul),
            HALT => Some(OpCode::Halt),
            _ => None,
        }
    }
}

impl Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpCode::Add => write!(f, "add"),
            OpCode::Mul => write!(f, "mul"),
            OpCode::Halt => write!(f, "halt"),
        }
    }
}

/// Execution state reported after each cycle.
///
/// [Running](State::Running) means the cursor points at the next instruction
/// to execute. [Halted](State::Halted) means the cursor rests on a `99` cell;
/// once returned, further steps do nothing.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum State {
    Running,
    Halted,
}

/// The Intcode instruction cycle as an explicit state machine.
///
/// The machine owns only its cursor. The program is borrowed per step, so
/// the caller keeps ownership of memory and can inspect it between cycles.
///
/// Every cycle reads the opcode at the cursor. `99` halts. `1` and `2` read
/// three absolute indices `[src1, src2, dest]` from the cells after the
/// opcode, store `program[src1] + program[src2]` (or the product) at
/// `program[dest]`, and advance the cursor by 4. Anything else is an
/// [invalid operator](Fault::InvalidOperator).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Machine {
    cursor: usize,
    steps: usize,
    halted: bool,
}

impl Machine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of the next instruction.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of binary instructions executed so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn state(&self) -> State {
        if self.halted {
            State::Halted
        } else {
            State::Running
        }
    }

    /// Execute one instruction cycle against `program`.
    ///
    /// On a fault the cursor stays on the faulting instruction and memory
    /// keeps whatever earlier cycles committed.
    pub fn step(&mut self, program: &mut [i64]) -> Result<State, Fault> {
        if self.halted {
            return Ok(State::Halted);
        }

        let cursor = self.cursor;
        let raw = fetch(program, cursor as i64, cursor)?;
        let opcode = OpCode::decode(raw).ok_or(Fault::InvalidOperator {
            opcode: raw,
            cursor,
        })?;

        let apply: fn(i64, i64) -> i64 = match opcode {
            OpCode::Add => i64::wrapping_add,
            OpCode::Mul => i64::wrapping_mul,
            OpCode::Halt => {
                trace!(cursor, "halt");
                self.halted = true;
                return Ok(State::Halted);
            }
        };

        // The operand window itself has to fit in the program.
        let src1 = fetch(program, (cursor + 1) as i64, cursor)?;
        let src2 = fetch(program, (cursor + 2) as i64, cursor)?;
        let dest = fetch(program, (cursor + 3) as i64, cursor)?;

        let lhs = fetch(program, src1, cursor)?;
        let rhs = fetch(program, src2, cursor)?;
        let dest = address(program, dest, cursor)?;

        let result = apply(lhs, rhs);
        trace!(cursor, %opcode, src1, src2, dest, result, "exec");

        program[dest] = result;
        self.cursor += WIDTH;
        self.steps += 1;
        Ok(State::Running)
    }
}

/// Convert an index read from the program into a checked address.
fn address(program: &[i64], index: i64, cursor: usize) -> Result<usize, Fault> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < program.len())
        .ok_or(Fault::OutOfBounds {
            index,
            len: program.len(),
            cursor,
        })
}

fn fetch(program: &[i64], index: i64, cursor: usize) -> Result<i64, Fault> {
    Ok(program[address(program, index, cursor)?])
}

/// Run `program` in place until it halts, returning the number of binary
/// instructions executed.
///
/// Termination is guaranteed: the cursor only moves forward, so a program
/// without a reachable `99` ends in an out-of-bounds fault.
pub fn execute(program: &mut [i64]) -> Result<usize, Fault> {
    let mut machine = Machine::new();
    while machine.step(program)? == State::Running {}
    debug!(steps = machine.steps(), cursor = machine.cursor(), "program halted");
    Ok(machine.steps())
}

/// Run `program` in place until it halts. Read the answer from position 0.
pub fn run(program: &mut [i64]) -> Result<(), Fault> {
    execute(program).map(|_| ())
}

/// Write `noun` and `verb` at positions 1 and 2.
pub fn apply_overrides(program: &mut [i64], noun: i64, verb: i64) -> Result<(), Fault> {
    let (noun_at, verb_at) = (address(program, 1, 0)?, address(program, 2, 0)?);
    program[noun_at] = noun;
    program[verb_at] = verb;
    Ok(())
}

/// Run a copy of `program` with `noun` and `verb` written at positions 1
/// and 2, returning the value left at position 0.
pub fn run_with_overrides(program: &[i64], noun: i64, verb: i64) -> Result<i64, Fault> {
    let mut memory = program.to_vec();
    apply_overrides(&mut memory, noun, verb)?;
    run(&mut memory)?;
    Ok(memory[0])
}

/// Parse `code`, override positions 1 and 2, run it and return position 0.
pub fn run_with(code: &str, noun: i64, verb: i64) -> error::Result<i64> {
    let program = program::parse(code)?;
    Ok(run_with_overrides(&program, noun, verb)?)
}

/// Pretty-print the instruction stream for human inspection.
///
/// Decoding follows the cursor from position 0 and stops at the first halt
/// or undecodable instruction; the remaining cells are listed as data.
pub fn disassemble(program: &[i64]) -> String {
    let mut out = String::new();
    let mut pc = 0;
    while pc < program.len() {
        let raw = program[pc];
        match OpCode::decode(raw) {
            Some(OpCode::Halt) => {
                let _ = writeln!(out, "{pc:04}: [{raw}]  halt");
                pc += 1;
                break;
            }
            Some(op) if pc + WIDTH <= program.len() => {
                let (a, b, c) = (program[pc + 1], program[pc + 2], program[pc + 3]);
                let sym = if op == OpCode::Add { '+' } else { '*' };
                let _ = writeln!(
                    out,
                    "{pc:04}: [{raw} {a} {b} {c}]  {op}  *{c} = *{a} {sym} *{b}"
                );
                pc += WIDTH;
            }
            Some(_) => {
                let _ = writeln!(out, "{pc:04}: [{raw}]  (truncated instruction)");
                pc += 1;
                break;
            }
            None => {
                let _ = writeln!(out, "{pc:04}: [{raw}]  (invalid operator)");
                pc += 1;
                break;
            }
        }
    }
    for (i, &cell) in program.iter().enumerate().skip(pc) {
        let _ = writeln!(out, "{i:04}: {cell}  (data)");
    }
    out
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Programs drawn mostly from small values so that opcodes and in-bounds
    /// indices are common.
    fn small_program() -> impl Strategy<Value = Vec<i64>> {
        prop::collection::vec(
            prop_oneof![
                4 => 0i64..16,
                1 => Just(HALT),
                1 => any::<i64>(),
            ],
            0..48,
        )
    }

    proptest! {
        #[test]
        fn never_panics(program in small_program()) {
            let mut memory = program;
            let _ = run(&mut memory);
        }

        #[test]
        fn preserves_length(program in small_program()) {
            let len = program.len();
            let mut memory = program;
            let _ = run(&mut memory);
            prop_assert_eq!(memory.len(), len);
        }

        #[test]
        fn halts_exactly_on_sentinel(program in small_program()) {
            let mut memory = program;
            let mut machine = Machine::new();
            let outcome = loop {
                match machine.step(&mut memory) {
                    Ok(State::Running) => continue,
                    other => break other,
                }
            };
            if outcome == Ok(State::Halted) {
                prop_assert_eq!(memory[machine.cursor()], HALT);
                prop_assert_eq!(machine.cursor(), machine.steps() * 4);
            }
        }

        #[test]
        fn steps_bounded_by_length(program in small_program()) {
            let len = program.len();
            let mut memory = program;
            if let Ok(steps) = execute(&mut memory) {
                prop_assert!(steps * 4 < len);
            }
        }

        #[test]
        fn unknown_opcode_faults(opcode in any::<i64>().prop_filter("known opcode", |op| ![ADD, MUL, HALT].contains(op)),
                                 tail in prop::collection::vec(any::<i64>(), 0..8)) {
            let mut memory = vec![opcode];
            memory.extend(tail);
            let snapshot = memory.clone();
            prop_assert_eq!(run(&mut memory), Err(Fault::InvalidOperator { opcode, cursor: 0 }));
            prop_assert_eq!(memory, snapshot);
        }
    }
}
