/*!
  Execution core of the Nervi virtual machine.

  A machine is a fixed-size bank of byte cells with per-cell write-locks, a register file of 27
  byte registers plus a 64 bit instruction pointer, and two execution stacks (operands and return
  addresses). Commands are decoded elsewhere; here they are resolved against the machine's memory
  and handed to the handler registered for their `(plugin, command)` opcode.

  ```
  use nervi::{Command, MemoryAddress, Machine, Operand, CORE_TABLE};

  let mut machine = Machine::new(4).unwrap();
  machine.set_value_at(0, 0b1010).unwrap();
  machine.set_value_at(1, 0b0110).unwrap();

  let and = Command::new(
    0, 0,
    Operand::Address(MemoryAddress::new(0, 0)),
    Operand::Address(MemoryAddress::new(0, 1))
  );
  CORE_TABLE.execute(&and, &mut machine).unwrap();
  assert_eq!(0b0010, machine.value_at(0).unwrap());
  ```
*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod address;
pub mod bank;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logic;
pub mod machine;
pub mod memory;
pub mod registers;
pub mod stacks;

pub use address::{BankId, MemoryAddress, Offset};
pub use bank::{BankLookup, BankRegistry};
pub use command::{Command, CommandId, Opcode, Operand, PluginId};
pub use config::MachineConfig;
pub use dispatch::{dispatch, Arity, DispatchTable, Handler, CORE_TABLE};
pub use error::{Stack, VMError, VMResult};
pub use logic::CoreCommand;
pub use machine::Machine;
pub use memory::{Byte, MemoryBank};
pub use registers::{InstructionAddress, RegisterFile, RegisterName};
pub use stacks::ExecutionStacks;
