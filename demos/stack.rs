use color_eyre::eyre::Result;

use ampersand::machine::StdMachine;
use ampersand::memory::Value;
use log::LevelFilter;
use simple_logger::SimpleLogger;

/// Where the result is stored
const RESULT: Value = 0x0000;

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling
    SimpleLogger::new().with_level(LevelFilter::Debug).init()?; // logging

    // 2 ** 10 through the stack, then stored at RESULT
    use ampersand::instruction::Instruction::*;
    let program = [
        LDM as Value, 10,
        PSH as Value,
        LDM as Value, 2,
        STA as Value,
        POP as Value,
        STB as Value,
        EXP as Value,
        STB as Value,
        LDM as Value, RESULT,
        STM as Value,
        HLT as Value,
    ];

    let mut machine = StdMachine::new(0x1000);
    machine.load(&program)?;
    machine.run()?;

    let result = machine.memory.read(RESULT)?;
    println!("Result: 0x{:04X} / {}", result, result);

    Ok(())
}
