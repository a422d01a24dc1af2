//! Runs a short hand-decoded program through the core plugin and prints the machine state.
//! Set `RUST_LOG=nervi=debug` to see each dispatch.

use tracing_subscriber::EnvFilter;

use nervi::{
  Command, CoreCommand, MemoryAddress, Machine, MachineConfig, Operand, VMResult, CORE_TABLE
};

fn cell(offset: i64) -> Operand {
  Operand::Address(MemoryAddress::new(0, offset))
}

fn command(kind: CoreCommand, dst: i64, src: i64) -> Command {
  let opcode = kind.opcode();
  Command::new(opcode.plugin, opcode.command, cell(dst), cell(src))
}

fn main() -> VMResult {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let mut machine = Machine::with_config(MachineConfig::default().with_memory_size(8))?;
  machine.memory_mut().write_slice(0, &[0b1010, 0b0110, 0xF0, 0x0F])?;
  machine.memory_mut().lock(3)?;

  let program = vec![
    command(CoreCommand::And,  0, 1),
    command(CoreCommand::Not,  1, 1),
    command(CoreCommand::Nor,  2, 3),
    command(CoreCommand::Imp,  3, 0),
  ];

  while let Some(next) = program.get(machine.instruction_pointer() as usize) {
    println!("{:>4}: {}", machine.instruction_pointer(), CORE_TABLE.describe(next));
    if let Err(error) = CORE_TABLE.execute(next, &mut machine) {
      println!("      skipped: {}", error);
    }
    machine.advance();
  }

  println!("{}", machine);
  Ok(())
}
