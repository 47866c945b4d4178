//! Ampersand, a tiny three-register virtual CPU.
//!
//! Programs are plain cells written into a [`Memory`](memory::Memory) and
//! interpreted by a [`Machine`](machine::Machine) until `HLT` or until the
//! program counter walks off the end of the address space.

pub mod fault;
pub mod instruction;
pub mod machine;
pub mod memory;
pub mod processor;

pub use fault::Fault;
pub use instruction::Instruction;
pub use machine::{Machine, Outcome, StdMachine, Termination};
pub use memory::{Memory, StdMem, Value};
pub use processor::{Flags, Processor, Registers, State};
