use super::Memory;

use log::*;
use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    io::{self, Write},
    ops::BitAnd,
};
use thiserror::Error;

mod alu;
pub use alu::{AluOp, AluResult, DivisionByZero, Flags, FLAG_E, FLAG_G, FLAG_L};
pub mod opcodes;
pub use opcodes::{Opcode, UnknownOpcode};
mod registers;
use registers::Registers;
pub use registers::{INITIAL_SP, REGISTER_COUNT, SP};

/// Anything that stops the CPU dead.
#[derive(Debug, Error)]
pub enum CpuError {
    #[error("unexpected instruction 0x{opcode:02X} at 0x{pc:02X}")]
    UnknownOpcode { opcode: u8, pc: u8 },
    #[error("division by zero at 0x{pc:02X}")]
    DivisionByZero { pc: u8 },
    #[error("could not write program output: {0}")]
    Output(#[from] io::Error),
}

/// What the CPU is up to after a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Halted,
}

pub struct Cpu {
    /// R0-R6 are general purpose. R7 is the stack pointer.
    registers: Registers,
    /// The program counter. Address of the next instruction to run.
    pc: u8,
    /// The flags register. Only CMP writes it.
    fl: Flags,
    /// Set by HLT. Nothing clears it.
    halted: bool,
}

impl Debug for Cpu {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        write!(fmt, "PC:{:02X} FL:{:?}", self.pc, self.fl)?;
        for index in 0..SP {
            write!(fmt, " R{index}:{:02X}", self.registers.get(index))?;
        }
        write!(fmt, " SP:{:02X}", self.registers.sp())
    }
}

fn is_bit_set<A, B>(input: A, bit: B) -> bool
where
    A: BitAnd<B, Output = B>,
    B: PartialEq + Copy,
{
    input & bit == bit
}

impl Cpu {
    pub fn new() -> Cpu {
        Cpu {
            registers: Registers::new(),
            pc: 0,
            fl: Flags::default(),
            halted: false,
        }
    }

    fn push_byte<M: Memory>(&mut self, memory: &mut M, byte: u8) {
        let sp = self.registers.sp().wrapping_sub(1);
        self.registers.set_sp(sp);
        memory.write_byte(sp, byte);
    }

    fn pop_byte<M: Memory>(&mut self, memory: &mut M) -> u8 {
        let sp = self.registers.sp();
        let result = memory.read_byte(sp);
        self.registers.set_sp(sp.wrapping_add(1));
        result
    }

    fn perform_alu_operation(&mut self, op: AluOp, reg_a: u8, reg_b: u8) -> Result<(), CpuError> {
        let a = self.registers.get(reg_a);
        let b = self.registers.get(reg_b);
        match op.compute(a, b) {
            Ok(AluResult::Register(value)) => self.registers.set(reg_a, value),
            Ok(AluResult::Flags(flags)) => self.fl = flags,
            Err(DivisionByZero) => return Err(CpuError::DivisionByZero { pc: self.pc }),
        }
        Ok(())
    }

    /// Where a jump-type instruction goes: the address in `register` if
    /// `should_branch`, otherwise just past its own operands.
    fn branch_destination(&self, register: u8, should_branch: bool, fall_through: u8) -> u8 {
        if should_branch {
            self.registers.get(register)
        } else {
            fall_through
        }
    }

    /// Run one fetch-decode-execute cycle.
    pub fn step<M: Memory, W: Write>(
        &mut self,
        memory: &mut M,
        output: &mut W,
    ) -> Result<Status, CpuError> {
        if self.halted {
            warn!("Stepped a halted CPU at {:02X}, ignoring", self.pc);
            return Ok(Status::Halted);
        }
        let ir = memory.read_byte(self.pc);
        // Both operand bytes get fetched whether the instruction uses them or
        // not. Near the top of memory they wrap around to the bottom.
        let op_a = memory.read_byte(self.pc.wrapping_add(1));
        let op_b = memory.read_byte(self.pc.wrapping_add(2));
        let opcode = Opcode::try_from(ir).map_err(|UnknownOpcode(opcode)| {
            CpuError::UnknownOpcode {
                opcode,
                pc: self.pc,
            }
        })?;
        trace!("{:?} {opcode:?} {op_a:02X} {op_b:02X}", self);
        let next_pc = self.pc.wrapping_add(1 + opcode.operand_count());
        self.pc = match opcode {
            Opcode::Nop => next_pc,
            Opcode::Hlt => {
                debug!("Halted at {:02X}", self.pc);
                self.halted = true;
                return Ok(Status::Halted);
            }
            Opcode::Ldi => {
                self.registers.set(op_a, op_b);
                next_pc
            }
            Opcode::Ld => {
                let value = memory.read_byte(self.registers.get(op_b));
                self.registers.set(op_a, value);
                next_pc
            }
            Opcode::St => {
                memory.write_byte(self.registers.get(op_a), self.registers.get(op_b));
                next_pc
            }
            Opcode::Prn => {
                writeln!(output, "{}", self.registers.get(op_a))?;
                next_pc
            }
            Opcode::Pra => {
                write!(output, "{}", self.registers.get(op_a) as char)?;
                next_pc
            }
            Opcode::Push => {
                self.push_byte(memory, self.registers.get(op_a));
                next_pc
            }
            Opcode::Pop => {
                let value = self.pop_byte(memory);
                self.registers.set(op_a, value);
                next_pc
            }
            // CALL has one operand, so next_pc is the return address.
            Opcode::Call => {
                self.push_byte(memory, next_pc);
                self.registers.get(op_a)
            }
            Opcode::Ret => self.pop_byte(memory),
            Opcode::Jmp => self.branch_destination(op_a, true, next_pc),
            Opcode::Jeq => self.branch_destination(op_a, self.fl.equal(), next_pc),
            Opcode::Jne => self.branch_destination(op_a, !self.fl.equal(), next_pc),
            Opcode::Jgt => self.branch_destination(op_a, self.fl.greater(), next_pc),
            Opcode::Jlt => self.branch_destination(op_a, self.fl.less(), next_pc),
            Opcode::Jle => {
                self.branch_destination(op_a, self.fl.less() || self.fl.equal(), next_pc)
            }
            Opcode::Jge => {
                self.branch_destination(op_a, self.fl.greater() || self.fl.equal(), next_pc)
            }
            Opcode::Alu(op) => {
                self.perform_alu_operation(op, op_a, op_b)?;
                next_pc
            }
        };
        Ok(Status::Running)
    }

    /// Step until HLT. A program that never halts never returns.
    pub fn run<M: Memory, W: Write>(
        &mut self,
        memory: &mut M,
        output: &mut W,
    ) -> Result<(), CpuError> {
        while self.step(memory, output)? == Status::Running {}
        Ok(())
    }

    // Ways to inspect the state of the CPU, for debugging and testing.
    pub fn pc(&self) -> u8 {
        self.pc
    }
    pub fn fl(&self) -> Flags {
        self.fl
    }
    pub fn sp(&self) -> u8 {
        self.registers.sp()
    }
    /// Only the low three bits of `index` count, same as for instructions.
    pub fn register(&self, index: u8) -> u8 {
        self.registers.get(index)
    }
    pub fn is_halted(&self) -> bool {
        self.halted
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Cpu::new()
    }
}
