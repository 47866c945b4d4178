use color_eyre::eyre::Result;

use ampersand::machine::StdMachine;
use ampersand::memory::Value;
use ampersand::write_instructions;
use simple_logger::SimpleLogger;

/// The main entrypoint. First instruction should be placed here.
const ENTRYPOINT: Value = 0x1FFF;

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling
    SimpleLogger::new().init()?; // logging

    let mut machine = StdMachine::new(ENTRYPOINT);

    use ampersand::instruction::Instruction::*;
    write_instructions!(machine.memory; ENTRYPOINT =>
        LDM,
        42,
        STA,
        LDM,
        58,
        STB,
        ADD,
        HLT
    )?;

    let outcome = machine.run()?;
    println!(
        "{:?}: C = {}",
        outcome.termination, outcome.processor.registers.c
    );

    Ok(())
}
