//! The LS-8: an 8-bit, eight-register toy processor with 256 bytes of memory.

mod memory;
pub use memory::{ImageTooLarge, Memory, Ram, RAM_SIZE};
mod cpu;
pub use cpu::{
    opcodes, AluOp, AluResult, Cpu, CpuError, DivisionByZero, Flags, Opcode, Status,
    UnknownOpcode, FLAG_E, FLAG_G, FLAG_L, INITIAL_SP, REGISTER_COUNT, SP,
};
