use std::{cmp::Ordering, fmt};

use super::is_bit_set;

// Bits of the FL register. Only CMP touches them.
/// **E**qual: the last CMP saw A == B
pub const FLAG_E: u8 = 0b_0000_0001;
/// **G**reater: the last CMP saw A > B
pub const FLAG_G: u8 = 0b_0000_0010;
/// **L**ess: the last CMP saw A < B
pub const FLAG_L: u8 = 0b_0000_0100;

/// The FL register.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags(u8);

impl Flags {
    /// Exactly one of E, G, L ends up set.
    pub fn compare(a: u8, b: u8) -> Flags {
        Flags(match a.cmp(&b) {
            Ordering::Equal => FLAG_E,
            Ordering::Greater => FLAG_G,
            Ordering::Less => FLAG_L,
        })
    }
    pub fn bits(self) -> u8 {
        self.0
    }
    pub fn equal(self) -> bool {
        is_bit_set(self.0, FLAG_E)
    }
    pub fn greater(self) -> bool {
        is_bit_set(self.0, FLAG_G)
    }
    pub fn less(self) -> bool {
        is_bit_set(self.0, FLAG_L)
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            fmt,
            "{l}{g}{e}",
            l = if self.less() { 'L' } else { 'l' },
            g = if self.greater() { 'G' } else { 'g' },
            e = if self.equal() { 'E' } else { 'e' },
        )
    }
}

/// Operations the ALU knows how to do. Every one of them takes two register
/// operands, even the ones (INC, DEC, NOT) that only look at the first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Inc,
    Dec,
    Cmp,
    And,
    Not,
    Or,
    Xor,
    Shl,
    Shr,
}

/// Where the result of an ALU operation goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluResult {
    /// Back into register A.
    Register(u8),
    /// Into FL. Register A is untouched.
    Flags(Flags),
}

/// DIV or MOD with a zero divisor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DivisionByZero;

impl AluOp {
    /// Crunch the numbers. All arithmetic wraps at 8 bits; there is no carry.
    pub fn compute(self, a: u8, b: u8) -> Result<AluResult, DivisionByZero> {
        use AluResult::Register;
        Ok(match self {
            AluOp::Add => Register(a.wrapping_add(b)),
            AluOp::Sub => Register(a.wrapping_sub(b)),
            AluOp::Mul => Register(a.wrapping_mul(b)),
            AluOp::Div => Register(a.checked_div(b).ok_or(DivisionByZero)?),
            AluOp::Mod => Register(a.checked_rem(b).ok_or(DivisionByZero)?),
            AluOp::Inc => Register(a.wrapping_add(1)),
            AluOp::Dec => Register(a.wrapping_sub(1)),
            AluOp::Cmp => AluResult::Flags(Flags::compare(a, b)),
            AluOp::And => Register(a & b),
            AluOp::Not => Register(!a),
            AluOp::Or => Register(a | b),
            AluOp::Xor => Register(a ^ b),
            // shifting an 8-bit value by 8 or more leaves nothing behind
            AluOp::Shl => Register(a.checked_shl(b as u32).unwrap_or(0)),
            AluOp::Shr => Register(a.checked_shr(b as u32).unwrap_or(0)),
        })
    }
}
