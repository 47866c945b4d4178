use std::error;
use std::fmt;

use crate::memory::Value;

/// Conditions under which the CPU refuses to carry out an instruction.
///
/// A faulting instruction leaves the machine state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    /// A memory access outside the address space
    AddressOutOfRange { address: Value },
    /// Push with no free slot left on the stack
    StackOverflow { sp: Value },
    /// Pop from an empty stack
    StackUnderflow,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::AddressOutOfRange { address } => {
                write!(f, "memory has no address `{}`", address)
            }
            Fault::StackOverflow { sp } => write!(f, "stack overflow at sp `0x{:04X}`", sp),
            Fault::StackUnderflow => f.write_str("stack underflow"),
        }
    }
}

impl error::Error for Fault {}
