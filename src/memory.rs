use std::convert::TryFrom;

use color_eyre::eyre::Result;
use log::*;

use crate::fault::Fault;
use crate::instruction::Instruction;

/// Contents of a memory cell or register
pub type Value = i32;

/// Largest value a cell or register can hold
pub const VALUE_MAX: Value = 0xFFFF;
/// Smallest value a cell or register can hold
pub const VALUE_MIN: Value = -0xFFFF;

/// Every cell of a fresh address space holds this
const FILL: Value = Instruction::NOP as Value;

/// Default memory, addresses `0x0000..=0xFFFE`
pub type StdMem = Memory<0xFFFF>;

/// Clamps `value` into `VALUE_MIN..=VALUE_MAX`.
pub fn saturate(value: i64) -> Value {
    value.clamp(VALUE_MIN as i64, VALUE_MAX as i64) as Value
}

/// Truncates a real number toward zero and clamps it like [`saturate`].
/// `NaN` becomes zero.
pub fn saturate_real(value: f64) -> Value {
    if value.is_nan() {
        return 0;
    }

    value
        .trunc()
        .clamp(VALUE_MIN as f64, VALUE_MAX as f64) as Value
}

/// Emulates one flat address space of `S` cells
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Memory<const S: usize> {
    /// The actual data of the memory, always `S` cells long
    data: Box<[Value]>,
}

impl<const S: usize> Default for Memory<S> {
    /// Initializes the memory with every cell set to `NOP`
    fn default() -> Self {
        Memory {
            data: vec![FILL; S].into_boxed_slice(),
        }
    }
}

impl<const S: usize> Memory<S> {
    /// Converts `address` into an index, if it lies inside the address space
    pub fn index(address: Value) -> Option<usize> {
        usize::try_from(address).ok().filter(|&index| index < S)
    }

    /// Reads a cell from the memory
    pub fn read(&self, address: Value) -> Result<Value> {
        let index = Self::index(address).ok_or(Fault::AddressOutOfRange { address })?;
        Ok(self.data[index])
    }

    /// Writes a cell to the memory, saturating the value
    pub fn write(&mut self, address: Value, value: Value) -> Result<()> {
        let index = Self::index(address).ok_or(Fault::AddressOutOfRange { address })?;
        self.data[index] = saturate(value.into());
        Ok(())
    }

    /// Writes a block of values starting at `position`, saturating each one.
    /// Nothing is written unless the whole block fits.
    pub fn write_array(&mut self, position: Value, data: &[Value]) -> Result<()> {
        let start = Self::index(position).ok_or(Fault::AddressOutOfRange { address: position })?;
        let end = start + data.len();
        if end > S {
            return Err(Fault::AddressOutOfRange {
                address: saturate(end as i64 - 1),
            }
            .into());
        }

        for (cell, &value) in self.data[start..end].iter_mut().zip(data) {
            *cell = saturate(value.into());
        }

        Ok(())
    }

    /// Logs every cell that doesn't hold `NOP`
    pub fn dump(&self) {
        for (address, value) in self.data.iter().enumerate() {
            if *value != FILL {
                debug!("0x{:04X}: 0x{:02X} / {}", address, value, value);
            }
        }
    }
}

/// Writes a block of instructions and operands directly into the memory.
/// Evaluates to the `Result` of [`Memory::write_array`].
#[macro_export]
macro_rules! write_instructions {
    ( $mem:expr ; $pos:expr => $( $cell:expr ),+ $(,)? ) => {
        $mem.write_array($pos, &[
            $(
                $cell as $crate::memory::Value,
            )+
        ])
    };
}

#[cfg(test)]
mod tests {
    use crate::fault::Fault;
    use crate::instruction::Instruction;

    use super::*;
    use color_eyre::eyre::Result;

    #[test]
    fn test_fresh_memory_holds_nop() -> Result<()> {
        let mem = StdMem::default();
        assert_eq!(mem.read(0)?, Instruction::NOP as Value);
        assert_eq!(mem.read(0xFFFE)?, Instruction::NOP as Value);

        Ok(())
    }

    #[test]
    fn test_read_write() -> Result<()> {
        let mut mem = StdMem::default();
        mem.write(0x44, -12)?;
        assert_eq!(mem.read(0x44)?, -12);
        mem.write(0x45, i32::MAX)?;
        assert_eq!(mem.read(0x45)?, VALUE_MAX);

        Ok(())
    }

    #[test]
    fn test_top_address_is_reserved() -> Result<()> {
        let mut mem = StdMem::default();

        let err = mem.read(0xFFFF).unwrap_err();
        assert_eq!(
            err.downcast_ref::<Fault>(),
            Some(&Fault::AddressOutOfRange { address: 0xFFFF })
        );
        assert!(mem.write(-1, 0).is_err());
        assert_eq!(mem, StdMem::default());

        Ok(())
    }

    #[test]
    fn test_saturate() -> Result<()> {
        assert_eq!(saturate(70_000), VALUE_MAX);
        assert_eq!(saturate(-70_000), VALUE_MIN);
        assert_eq!(saturate(65_535), 65_535);
        assert_eq!(saturate(-42), -42);

        assert_eq!(saturate_real(3.5), 3);
        assert_eq!(saturate_real(-3.5), -3);
        assert_eq!(saturate_real(f64::INFINITY), VALUE_MAX);
        assert_eq!(saturate_real(f64::NEG_INFINITY), VALUE_MIN);
        assert_eq!(saturate_real(f64::NAN), 0);

        Ok(())
    }

    #[test]
    fn test_write_array() -> Result<()> {
        let mut mem = StdMem::default();
        mem.write_array(0x44, &[0x12, 0x34, 100_000, -100_000])?;
        assert_eq!(mem.read(0x44)?, 0x12);
        assert_eq!(mem.read(0x45)?, 0x34);
        assert_eq!(mem.read(0x46)?, VALUE_MAX);
        assert_eq!(mem.read(0x47)?, VALUE_MIN);

        Ok(())
    }

    #[test]
    fn test_write_array_must_fit() -> Result<()> {
        let mut mem = StdMem::default();

        let err = mem.write_array(0xFFFC, &[1, 2, 3, 4]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<Fault>(),
            Some(&Fault::AddressOutOfRange { address: 0xFFFF })
        );
        assert_eq!(mem, StdMem::default());

        mem.write_array(0xFFFC, &[1, 2, 3])?;
        assert_eq!(mem.read(0xFFFE)?, 3);

        Ok(())
    }

    #[test]
    fn test_write_instructions() -> Result<()> {
        let mut mem = StdMem::default();

        mem.write_array(
            0x1FFF,
            &[
                Instruction::LDM as Value,
                42,
                Instruction::STA as Value,
                Instruction::LDM as Value,
                -58,
                Instruction::STB as Value,
                Instruction::ADD as Value,
                Instruction::HLT as Value,
            ],
        )?;

        let mut mem2 = StdMem::default();
        use crate::instruction::Instruction::*;
        write_instructions!(mem2; 0x1FFF => LDM, 42, STA, LDM, -58, STB, ADD, HLT)?;

        assert_eq!(mem, mem2);

        Ok(())
    }
}
