/*!
  Decoded commands.

  A command names its handler by a pair of numbers: the plugin that provides it and its index in
  that plugin's command list. It carries two operands, each either an immediate byte or a
  cross-bank memory address. How commands are encoded in program memory is up to the decoder;
  this module only fixes their decoded shape.

  Commands are plain values. A decoder produces one, and the dispatch step consumes it.
*/

use std::fmt::{Display, Formatter};

use crate::address::{MemoryAddress, Offset};
use crate::bank::BankLookup;
use crate::error::{VMError, VMResult};
use crate::machine::Machine;
use crate::memory::Byte;

/// Namespace of an instruction set extension.
pub type PluginId = i32;
/// Index of a command within its plugin.
pub type CommandId = i32;

/// The key a handler is registered under.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub struct Opcode {
  pub plugin  : PluginId,
  pub command : CommandId,
}

impl Opcode {
  pub fn new(plugin: PluginId, command: CommandId) -> Opcode {
    Opcode{ plugin, command }
  }
}

impl Display for Opcode {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}.{}", self.plugin, self.command)
  }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Operand {
  Immediate(Byte),
  Address(MemoryAddress),
}

impl Operand {
  /// The byte this operand stands for: the immediate itself, or the content of the cell it
  /// addresses in whichever bank `banks` resolves its bank id to.
  pub fn value<L: BankLookup + ?Sized>(&self, banks: &L) -> VMResult<Byte> {
    match self {
      Operand::Immediate(value) => Ok(*value),
      Operand::Address(address) => banks.read_at(*address)
    }
  }

  /**
    Resolves the operand to a cell of the machine's primary memory. The address must name the
    machine's own bank and lie inside it. Immediates do not address any cell.
  */
  pub fn resolve(&self, machine: &Machine) -> VMResult<Offset> {
    match self {

      Operand::Immediate(_) => Err(VMError::NotAddressable),

      Operand::Address(address) if address.bank != machine.bank_id() => {
        Err(VMError::UnknownBank(address.bank))
      }

      Operand::Address(address) => {
        let size = machine.memory().size();
        match address.fits(size) {
          true  => Ok(address.offset),
          false => Err(VMError::OutOfRange{ offset: address.offset, size })
        }
      }

    }
  }
}

impl Display for Operand {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Operand::Immediate(value) => write!(f, "#{}", value),
      Operand::Address(address) => write!(f, "{}", address)
    }
  }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Command {
  pub opcode : Opcode,
  pub first  : Operand,
  pub second : Operand,
}

impl Command {
  pub fn new(plugin: PluginId, command: CommandId, first: Operand, second: Operand) -> Command {
    Command{
      opcode: Opcode::new(plugin, command),
      first,
      second
    }
  }

  /// Resolves both operands against the machine's primary memory, first operand first.
  pub fn resolve(&self, machine: &Machine) -> VMResult<(Offset, Offset)> {
    Ok((self.first.resolve(machine)?, self.second.resolve(machine)?))
  }
}

impl Display for Command {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}({}, {})", self.opcode, self.first, self.second)
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::bank::BankRegistry;
  use crate::config::MachineConfig;
  use crate::memory::MemoryBank;

  fn at(bank: i16, offset: Offset) -> Operand {
    Operand::Address(MemoryAddress::new(bank, offset))
  }

  #[test]
  fn resolve_accepts_only_the_primary_bank() {
    let machine = Machine::with_config(MachineConfig::default().with_memory_size(4).with_bank_id(2))
      .unwrap();

    assert_eq!(Ok(3), at(2, 3).resolve(&machine));
    assert_eq!(Err(VMError::UnknownBank(0)), at(0, 3).resolve(&machine));
    assert_eq!(Err(VMError::OutOfRange{ offset: 4, size: 4 }), at(2, 4).resolve(&machine));
    assert_eq!(Err(VMError::OutOfRange{ offset: -1, size: 4 }), at(2, -1).resolve(&machine));
    assert_eq!(Err(VMError::NotAddressable), Operand::Immediate(1).resolve(&machine));
  }

  #[test]
  fn command_resolution_reports_the_first_failure() {
    let machine = Machine::new(4).unwrap();
    let command = Command::new(0, 0, at(0, 9), Operand::Immediate(0));
    assert_eq!(Err(VMError::OutOfRange{ offset: 9, size: 4 }), command.resolve(&machine));

    let command = Command::new(0, 0, at(0, 1), at(0, 2));
    assert_eq!(Ok((1, 2)), command.resolve(&machine));
  }

  #[test]
  fn operand_values_come_from_any_known_bank() {
    let mut data = MemoryBank::new(2).unwrap();
    data.write(1, 0x42).unwrap();
    let mut banks = BankRegistry::new();
    banks.insert(7, data).unwrap();

    assert_eq!(Ok(9), Operand::Immediate(9).value(&banks));
    assert_eq!(Ok(0x42), at(7, 1).value(&banks));
    assert_eq!(Err(VMError::UnknownBank(8)), at(8, 1).value(&banks));
  }

  #[test]
  fn commands_display_their_shape() {
    let command = Command::new(0, 3, at(1, 10), Operand::Immediate(255));
    assert_eq!("0.3(1:10, #255)", command.to_string());
  }
}
