use super::AluOp;

/// Top two bits of an instruction byte: how many operand bytes follow it.
const OPERAND_COUNT_SHIFT: u8 = 6;
/// Set on instructions that are handed to the ALU.
const ALU_BIT: u8 = 0b_0010_0000;
/// Set on instructions that decide the next PC themselves.
const SETS_PC_BIT: u8 = 0b_0001_0000;

/// An instruction byte that doesn't match any instruction we know.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownOpcode(pub u8);

macro_rules! opcodes {
    ($($(#[$doc:meta])* $name:ident = $byte:literal => $variant:ident $(($alu:ident))?,)*) => {
        $($(#[$doc])* pub const $name: u8 = $byte;)*

        impl TryFrom<u8> for Opcode {
            type Error = UnknownOpcode;
            fn try_from(byte: u8) -> Result<Opcode, UnknownOpcode> {
                match byte {
                    $($name => Ok(Opcode::$variant $((AluOp::$alu))?),)*
                    x => Err(UnknownOpcode(x)),
                }
            }
        }

        impl Opcode {
            /// The byte this instruction is encoded as.
            pub fn byte(self) -> u8 {
                match self {
                    $(Opcode::$variant $((AluOp::$alu))? => $name,)*
                }
            }
        }
    };
}

/// Every instruction the LS-8 understands. The byte layout is `AABCDDDD`:
/// `AA` operand count, `B` ALU operation, `C` sets PC, `DDDD` which one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    Nop,
    Hlt,
    Ret,
    Ldi,
    Ld,
    St,
    Push,
    Pop,
    Prn,
    Pra,
    Call,
    Jmp,
    Jeq,
    Jne,
    Jgt,
    Jlt,
    Jle,
    Jge,
    Alu(AluOp),
}

opcodes! {
    /// NOP: do nothing
    NOP = 0b_0000_0000 => Nop,
    /// HLT: halt the CPU
    HLT = 0b_0000_0001 => Hlt,
    /// RET: pop the return address into PC
    RET = 0b_0001_0001 => Ret,
    /// LDI reg, imm: load immediate
    LDI = 0b_1000_0010 => Ldi,
    /// LD regA, regB: load regA from the address in regB
    LD = 0b_1000_0011 => Ld,
    /// ST regA, regB: store regB at the address in regA
    ST = 0b_1000_0100 => St,
    PUSH = 0b_0100_0101 => Push,
    POP = 0b_0100_0110 => Pop,
    /// PRN reg: print as a decimal number and a newline
    PRN = 0b_0100_0111 => Prn,
    /// PRA reg: print as an ASCII character
    PRA = 0b_0100_1000 => Pra,
    CALL = 0b_0101_0000 => Call,
    JMP = 0b_0101_0100 => Jmp,
    JEQ = 0b_0101_0101 => Jeq,
    JNE = 0b_0101_0110 => Jne,
    JGT = 0b_0101_0111 => Jgt,
    JLT = 0b_0101_1000 => Jlt,
    JLE = 0b_0101_1001 => Jle,
    JGE = 0b_0101_1010 => Jge,
    ADD = 0b_1010_0000 => Alu(Add),
    SUB = 0b_1010_0001 => Alu(Sub),
    MUL = 0b_1010_0010 => Alu(Mul),
    DIV = 0b_1010_0011 => Alu(Div),
    MOD = 0b_1010_0100 => Alu(Mod),
    INC = 0b_0110_0101 => Alu(Inc),
    DEC = 0b_0110_0110 => Alu(Dec),
    CMP = 0b_1010_0111 => Alu(Cmp),
    AND = 0b_1010_1000 => Alu(And),
    NOT = 0b_0110_1001 => Alu(Not),
    OR = 0b_1010_1010 => Alu(Or),
    XOR = 0b_1010_1011 => Alu(Xor),
    SHL = 0b_1010_1100 => Alu(Shl),
    SHR = 0b_1010_1101 => Alu(Shr),
}

impl Opcode {
    /// How many operand bytes follow the instruction byte.
    pub fn operand_count(self) -> u8 {
        self.byte() >> OPERAND_COUNT_SHIFT
    }

    /// Whether this instruction works out the next PC on its own (jumps,
    /// calls, returns), rather than just stepping over its operands.
    pub fn sets_pc(self) -> bool {
        self.byte() & SETS_PC_BIT != 0
    }

    pub fn is_alu(self) -> bool {
        self.byte() & ALU_BIT != 0
    }
}
