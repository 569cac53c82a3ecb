/// How many registers there are. Register operands only ever use the low
/// three bits of their byte.
pub const REGISTER_COUNT: usize = 8;
/// R7 is the stack pointer.
pub const SP: u8 = 7;
/// Where the stack pointer starts out. The stack grows down from here.
pub const INITIAL_SP: u8 = 0xF4;

const REGISTER_INDEX_MASK: u8 = (REGISTER_COUNT - 1) as u8;

/// R0 through R6 are general purpose, R7 is the stack pointer.
#[derive(Clone, PartialEq, Eq)]
pub struct Registers([u8; REGISTER_COUNT]);

impl Registers {
    pub fn new() -> Registers {
        let mut registers = [0u8; REGISTER_COUNT];
        registers[SP as usize] = INITIAL_SP;
        Registers(registers)
    }

    pub fn get(&self, index: u8) -> u8 {
        let Self(registers) = self;
        registers[(index & REGISTER_INDEX_MASK) as usize]
    }

    pub fn set(&mut self, index: u8, value: u8) {
        let Self(registers) = self;
        registers[(index & REGISTER_INDEX_MASK) as usize] = value;
    }

    pub fn sp(&self) -> u8 {
        self.get(SP)
    }

    pub fn set_sp(&mut self, value: u8) {
        self.set(SP, value)
    }
}
