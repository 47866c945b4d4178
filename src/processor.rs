use crate::fault::Fault;
use crate::instruction::Instruction;
use crate::memory::{saturate, saturate_real, Memory, Value, VALUE_MAX, VALUE_MIN};
use color_eyre::eyre::{Result, WrapErr};
use log::*;

/// Where the program counter starts
pub const RESET_VECTOR: Value = 0xFFFC;

/// The general purpose registers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Registers {
    /// Left operand
    pub a: Value,
    /// Right operand
    pub b: Value,
    /// Accumulator, target of most instructions
    pub c: Value,
}

/// Sign of the last `ADD`/`SUB` result. Exactly one flag is set after either.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags {
    /// Zero
    pub z: bool,
    /// Underflow, the result was negative
    pub u: bool,
    /// Overflow, the result was positive
    pub o: bool,
}

impl Flags {
    pub fn classify(value: Value) -> Self {
        Self {
            z: value == 0,
            u: value < 0,
            o: value > 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Running,
    /// `HLT` was executed
    Halted,
    /// The program counter left the address space
    OutOfRange,
}

impl Default for State {
    fn default() -> Self {
        Self::Running
    }
}

/// Emulates a CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Processor {
    /// Program counter
    pub pc: Value,
    /// Stack Pointer, the next free stack slot
    pub sp: Value,
    pub registers: Registers,
    pub flags: Flags,
    pub state: State,
    /// Number of instructions executed so far
    pub cycles: u64,
}

impl Default for Processor {
    /// Initializes a new CPU at the reset vector
    fn default() -> Self {
        Self::new(RESET_VECTOR)
    }
}

impl Processor {
    /// Initializes a new CPU
    /// @param entrypoint The start of the program
    pub fn new(entrypoint: Value) -> Self {
        Self {
            pc: entrypoint,
            sp: 0x0000,
            registers: Registers::default(),
            flags: Flags::default(),
            state: State::Running,
            cycles: 0,
        }
    }

    fn jump(&mut self) {
        // the trailing increment lands on the target
        self.pc = self.registers.c - 1;
    }

    /// Executes a single instruction. A failing instruction changes nothing.
    pub fn execute_instruction<const S: usize>(
        &mut self,
        instruction: Instruction,
        memory: &mut Memory<S>,
        stack: &mut Memory<S>,
    ) -> Result<()> {
        let Registers { a, b, c } = self.registers;

        match instruction {
            Instruction::NOP => {
                debug!("NOP");
            }
            Instruction::HLT => {
                self.state = State::Halted;
                self.cycles += 1;

                debug!("HLT");
                return Ok(());
            }
            Instruction::LDA => {
                self.registers.c = a;

                debug!("LDA {}", a);
            }
            Instruction::LDB => {
                self.registers.c = b;

                debug!("LDB {}", b);
            }
            Instruction::STA => {
                self.registers.a = c;

                debug!("STA {}", c);
            }
            Instruction::STB => {
                self.registers.b = c;

                debug!("STB {}", c);
            }
            Instruction::LDM => {
                let value = saturate(memory.read(self.pc + 1)?.into());
                self.pc += 1;
                self.registers.c = value;

                debug!("LDM {}", value);
            }
            Instruction::STM => {
                memory.write(c, b)?;

                debug!("STM 0x{:04X}: {}", c, b);
            }
            Instruction::RTM => {
                let value = saturate(memory.read(b)?.into());
                self.registers.c = value;

                debug!("RTM 0x{:04X}: {}", b, value);
            }
            Instruction::PSH => {
                if Memory::<S>::index(self.sp).is_none() {
                    return Err(Fault::StackOverflow { sp: self.sp }.into());
                }
                stack.write(self.sp, c)?;
                self.sp += 1;

                debug!("PSH {}", c);
            }
            Instruction::POP => {
                if self.sp <= 0 {
                    return Err(Fault::StackUnderflow.into());
                }
                let value = stack.read(self.sp - 1)?;
                self.sp -= 1;
                self.registers.c = value;

                debug!("POP {}", value);
            }
            Instruction::ADD => {
                let result = saturate(a as i64 + b as i64);
                self.registers.c = result;
                self.flags = Flags::classify(result);

                debug!("ADD {} {}: {}", a, b, result);
            }
            Instruction::SUB => {
                let result = saturate(a as i64 - b as i64);
                self.registers.c = result;
                self.flags = Flags::classify(result);

                debug!("SUB {} {}: {}", a, b, result);
            }
            Instruction::MUL => {
                let result = saturate(a as i64 * b as i64);
                self.registers.c = result;

                debug!("MUL {} {}: {}", a, b, result);
            }
            Instruction::DIV => {
                let result = divide(a, b);
                self.registers.c = result;

                debug!("DIV {} {}: {}", a, b, result);
            }
            Instruction::EXP => {
                let result = power(a, b);
                self.registers.c = result;

                debug!("EXP {} {}: {}", a, b, result);
            }
            Instruction::JMP => {
                self.jump();

                debug!("JMP {}", c);
            }
            Instruction::JZ => {
                if self.flags.z {
                    self.jump();
                }

                debug!("JZ {}: {}", c, self.flags.z);
            }
            Instruction::JL => {
                if self.flags.u {
                    self.jump();
                }

                debug!("JL {}: {}", c, self.flags.u);
            }
            Instruction::JM => {
                if self.flags.o {
                    self.jump();
                }

                debug!("JM {}: {}", c, self.flags.o);
            }
        }

        self.pc += 1;
        self.cycles += 1;

        if Memory::<S>::index(self.pc).is_none() {
            self.state = State::OutOfRange;
        }

        Ok(())
    }

    /// Runs one execution step and returns the resulting state
    pub fn execute<const S: usize>(
        &mut self,
        memory: &mut Memory<S>,
        stack: &mut Memory<S>,
    ) -> Result<State> {
        if self.state != State::Running {
            return Ok(self.state);
        }

        if Memory::<S>::index(self.pc).is_none() {
            self.state = State::OutOfRange;
            return Ok(self.state);
        }

        let opcode = saturate(memory.read(self.pc)?.into()); // Read opcode where PC is
        let instruction = Instruction::decode(opcode);
        let pc = self.pc;
        self.execute_instruction(instruction, memory, stack)
            .wrap_err_with(|| format!("{} at 0x{:04X} failed", instruction, pc))?;

        Ok(self.state)
    }
}

/// Real division truncated toward zero. Dividing by zero yields the extreme
/// matching the sign of the dividend, or zero for `0 / 0`.
fn divide(a: Value, b: Value) -> Value {
    if b == 0 {
        return match a.signum() {
            1 => VALUE_MAX,
            -1 => VALUE_MIN,
            _ => 0,
        };
    }

    saturate_real(a as f64 / b as f64)
}

/// Real power truncated toward zero
fn power(a: Value, b: Value) -> Value {
    saturate_real((a as f64).powi(b))
}
