use std::convert::TryFrom;

use log::*;
use num_enum::IntoPrimitive;
use num_enum::TryFromPrimitive;

use crate::memory::Value;

macro_rules! instructions {
    ( $( $( #[doc = $doc:expr] )+ $name:ident = $repr:literal , )+ ) => {
        /// Defines the instructions.
        /// Every instruction is a single opcode cell; only `LDM` is followed by an operand.
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[derive(TryFromPrimitive, IntoPrimitive)]
        pub enum Instruction {
            $(
                $( #[doc = $doc] )+
                $name = $repr,
            )+
        }

        impl Instruction {
            pub const ALL: &'static [Self] = &[
                $( Self::$name , )+
            ];

            pub fn name(&self) -> &'static str {
                match self {
                    $( Self::$name => stringify!($name) , )+
                }
            }
        }

        impl ::std::fmt::Display for Instruction {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.name())
            }
        }
    }
}

instructions! {
    /// No operation
    NOP = 0x00,
    /// C = A + B, updates the flags
    ADD = 0x07,
    /// C = A - B, updates the flags
    SUB = 0x08,
    /// C = A / B
    DIV = 0x09,
    /// C = A * B
    MUL = 0x0A,
    /// C = A ** B
    EXP = 0x0B,
    /// Push C onto the stack
    PSH = 0xA1,
    /// Pop the stack into C
    POP = 0xA2,
    /// Jump to C
    JMP = 0xA3,
    /// Jump to C if the zero flag is set
    JZ = 0xA4,
    /// Jump to C if the underflow flag is set
    JL = 0xA5,
    /// Jump to C if the overflow flag is set
    JM = 0xA6,
    /// C = A
    LDA = 0xF1,
    /// C = B
    LDB = 0xF2,
    /// Load the immediate that follows into C
    /// @param value The value to load
    LDM = 0xF3,
    /// A = C
    STA = 0xF4,
    /// B = C
    STB = 0xF5,
    /// Store B in memory at address C
    STM = 0xF6,
    /// Load the memory cell at address B into C
    RTM = 0xF7,
    /// Stop the execution of the program
    HLT = 0xFF,
}

impl Instruction {
    /// Decodes a fetched cell. Anything that isn't a known opcode is a `NOP`.
    pub fn decode(opcode: Value) -> Self {
        match u8::try_from(opcode).ok().map(Self::try_from) {
            Some(Ok(instruction)) => instruction,
            _ => {
                trace!("Unknown opcode {}, treated as NOP", opcode);
                Self::NOP
            }
        }
    }
}
