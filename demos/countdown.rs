use color_eyre::eyre::Result;

use ampersand::machine::StdMachine;
use ampersand::memory::Value;
use ampersand::write_instructions;
use log::LevelFilter;
use simple_logger::SimpleLogger;

/// The main entrypoint. First instruction should be placed here.
const ENTRYPOINT: Value = 0x2000;

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling
    SimpleLogger::new().with_level(LevelFilter::Info).init()?; // logging

    let mut machine = StdMachine::new(ENTRYPOINT);

    // Counts A down from 10, pushing every step
    use ampersand::instruction::Instruction::*;
    write_instructions!(machine.memory; ENTRYPOINT =>
        LDM, 10,
        STA,
        LDM, 1,
        STB,
        // 0x2006
        SUB,
        STA,
        PSH,
        LDM, 0x200F,
        JZ,
        LDM, 0x2006,
        JMP,
        // 0x200F
        HLT
    )?;
    machine.memory.dump();

    let outcome = machine.run()?;

    for slot in 0..outcome.processor.sp {
        println!("{}", machine.stack.read(slot)?);
    }

    Ok(())
}
