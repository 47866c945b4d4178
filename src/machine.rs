use color_eyre::eyre::Result;
use log::*;

use crate::memory::{Memory, Value};
use crate::processor::{Processor, State, RESET_VECTOR};

/// Default machine, program memory and stack of `0xFFFF` cells each
pub type StdMachine = Machine<0xFFFF>;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// The program executed `HLT`
    Halted,
    /// The program counter walked off the address space
    OutOfRange,
}

/// Result of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Outcome {
    pub termination: Termination,
    /// Snapshot of the CPU when the run ended
    pub processor: Processor,
    pub cycles: u64,
}

/// A CPU together with the two address spaces it works on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine<const S: usize> {
    pub processor: Processor,
    /// Program memory, holds code and data
    pub memory: Memory<S>,
    /// Operand stack, addressed through the stack pointer only
    pub stack: Memory<S>,
    entrypoint: Value,
}

impl<const S: usize> Default for Machine<S> {
    fn default() -> Self {
        Self::new(RESET_VECTOR)
    }
}

impl<const S: usize> Machine<S> {
    /// Creates a machine with fresh memory whose program starts at `entrypoint`
    pub fn new(entrypoint: Value) -> Self {
        Self {
            processor: Processor::new(entrypoint),
            memory: Memory::default(),
            stack: Memory::default(),
            entrypoint,
        }
    }

    /// Writes `program` at the entrypoint
    pub fn load(&mut self, program: &[Value]) -> Result<()> {
        self.load_at(self.entrypoint, program)
    }

    /// Writes `program` at `address`. Fails if it doesn't fit in memory.
    pub fn load_at(&mut self, address: Value, program: &[Value]) -> Result<()> {
        self.memory.write_array(address, program)?;
        debug!("Loaded {} cells at 0x{:04X}", program.len(), address);

        Ok(())
    }

    /// Runs one execution step
    pub fn step(&mut self) -> Result<State> {
        self.processor.execute(&mut self.memory, &mut self.stack)
    }

    /// Runs at most `max_cycles` steps. Returns `None` if the program is
    /// still running afterwards.
    pub fn run_for(&mut self, max_cycles: u64) -> Result<Option<Outcome>> {
        for _ in 0..max_cycles {
            if self.step()? != State::Running {
                return Ok(self.finish());
            }
        }

        Ok(self.outcome())
    }

    /// Run program until it halts or leaves the address space
    pub fn run(&mut self) -> Result<Outcome> {
        loop {
            if self.step()? != State::Running {
                if let Some(outcome) = self.finish() {
                    return Ok(outcome);
                }
            }
        }
    }

    /// The outcome, once the program has terminated
    pub fn outcome(&self) -> Option<Outcome> {
        let termination = match self.processor.state {
            State::Running => return None,
            State::Halted => Termination::Halted,
            State::OutOfRange => Termination::OutOfRange,
        };

        Some(Outcome {
            termination,
            processor: self.processor,
            cycles: self.processor.cycles,
        })
    }

    fn finish(&self) -> Option<Outcome> {
        let outcome = self.outcome()?;
        let cpu = &outcome.processor;
        info!(
            "Program terminated ({:?}) at 0x{:04X} after {} cycles. A: {} B: {} C: {}",
            outcome.termination,
            cpu.pc,
            outcome.cycles,
            cpu.registers.a,
            cpu.registers.b,
            cpu.registers.c
        );

        Some(outcome)
    }
}
