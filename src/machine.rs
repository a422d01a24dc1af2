//! The state of a virtual machine: its primary memory, its register file, and its execution
//! stacks. This is the context every command handler runs against.

use std::fmt::{Display, Formatter};

use prettytable::{format as TableFormat, Table};
use tracing::{debug, trace};

use crate::address::{BankId, Offset};
use crate::bank::BankLookup;
use crate::config::{MachineConfig, DISPLAY_MEMORY_CELLS};
use crate::error::VMResult;
use crate::memory::{Byte, MemoryBank};
use crate::registers::{InstructionAddress, RegisterFile, RegisterName};
use crate::stacks::ExecutionStacks;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Machine {
  /// The id commands use to address `memory`.
  bank_id   : BankId,
  memory    : MemoryBank,
  registers : RegisterFile,
  stacks    : ExecutionStacks,
}

impl Machine {

  // region Display methods

  fn make_table<T, I> (label: &str, rows: I, highlight: Option<usize>) -> Table
    where T: Display,
          I: Iterator<Item = (String, T)>
  {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->label, ubl->"Contents"]);

    for (i, (name, value)) in rows.enumerate() {
      match Some(i) == highlight {

        true  => {
          table.add_row(row![r->format!("* --> {} =", name), format!("{}", value)]);
        }

        false => {
          table.add_row(row![r->format!("{} =", name), format!("{}", value)]);
        }

      }
    }
    table
  }

  // endregion

  // region Construction and access

  /// A fresh machine: zeroed memory of `memory_size` cells, zeroed registers, empty stacks.
  pub fn new(memory_size: Offset) -> VMResult<Machine> {
    Machine::with_config(MachineConfig::default().with_memory_size(memory_size))
  }

  pub fn with_config(config: MachineConfig) -> VMResult<Machine> {
    debug!("creating machine with {} cells in bank {}", config.memory_size, config.bank_id);
    Ok(Machine{
      bank_id   : config.bank_id,
      memory    : MemoryBank::new(config.memory_size)?,
      registers : RegisterFile::new(),
      stacks    : ExecutionStacks::new(),
    })
  }

  pub fn bank_id(&self) -> BankId {
    self.bank_id
  }

  pub fn memory(&self) -> &MemoryBank {
    &self.memory
  }

  pub fn memory_mut(&mut self) -> &mut MemoryBank {
    &mut self.memory
  }

  pub fn registers(&self) -> &RegisterFile {
    &self.registers
  }

  pub fn registers_mut(&mut self) -> &mut RegisterFile {
    &mut self.registers
  }

  pub fn stacks(&self) -> &ExecutionStacks {
    &self.stacks
  }

  pub fn stacks_mut(&mut self) -> &mut ExecutionStacks {
    &mut self.stacks
  }

  /// Reads a cell of the primary memory.
  pub fn value_at(&self, offset: Offset) -> VMResult<Byte> {
    self.memory.read(offset)
  }

  /// Writes a cell of the primary memory, honoring write-locks.
  pub fn set_value_at(&mut self, offset: Offset, value: Byte) -> VMResult {
    self.memory.write(offset, value)
  }

  // endregion

  // region Control flow

  pub fn instruction_pointer(&self) -> InstructionAddress {
    self.registers.instruction_pointer()
  }

  pub fn jump(&mut self, destination: InstructionAddress) {
    trace!("jump {} -> {}", self.instruction_pointer(), destination);
    self.registers.set_instruction_pointer(destination);
  }

  /// Moves to the next command slot.
  pub fn advance(&mut self) {
    self.registers.advance_instruction_pointer();
  }

  /// Saves the instruction pointer on the return stack and jumps to `destination`.
  pub fn call_to(&mut self, destination: InstructionAddress) {
    let here = self.instruction_pointer();
    debug!("call {} -> {}", here, destination);
    self.stacks.push_return_address(here);
    self.registers.set_instruction_pointer(destination);
  }

  /// Jumps back to the most recently saved instruction pointer. On underflow the instruction
  /// pointer is left where it is.
  pub fn return_from_call(&mut self) -> VMResult {
    let destination = self.stacks.pop_return_address()?;
    debug!("return {} -> {}", self.instruction_pointer(), destination);
    self.registers.set_instruction_pointer(destination);
    Ok(())
  }

  // endregion

}

impl BankLookup for Machine {
  fn bank(&self, id: BankId) -> Option<&MemoryBank> {
    match id == self.bank_id {
      true  => Some(&self.memory),
      false => None
    }
  }
}


lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

impl Display for Machine {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let memory = &self.memory;
    let locked: Vec<Offset> = memory.locked_offsets().collect();
    let m_table = Machine::make_table(
      "Cell",
      memory.cells()
            .iter()
            .take(DISPLAY_MEMORY_CELLS)
            .enumerate()
            .map(|(offset, value)| {
              let lock = match locked.binary_search(&(offset as Offset)).is_ok() {
                true  => " (locked)",
                false => ""
              };
              (format!("{}:{}", self.bank_id, offset), format!("{:#04x}{}", value, lock))
            }),
      None
    );
    let r_table = Machine::make_table(
      "Register",
      RegisterName::byte_registers()
        .filter_map(|name| {
          self.registers.read(name).ok().map(|value| (name.to_string(), format!("{:#04x}", value)))
        }),
      None
    );
    let s_table = Machine::make_table(
      "Operand",
      self.stacks.operands().iter().enumerate().map(|(i, value)| (i.to_string(), *value)),
      self.stacks.operands().len().checked_sub(1)
    );
    let c_table = Machine::make_table(
      "Return",
      self.stacks.return_addresses().iter().enumerate().map(|(i, value)| (i.to_string(), *value)),
      self.stacks.return_addresses().len().checked_sub(1)
    );

    let mut combined_table = table!([m_table, r_table, s_table, c_table]);

    combined_table.set_titles(row![ub->"Memory", ub->"Registers", ub->"Operand Stack", ub->"Return Stack"]);
    combined_table.set_format(*TABLE_DISPLAY_FORMAT);

    let elided = match memory.cells().len() > DISPLAY_MEMORY_CELLS {
      true  => format!(" ({} cells not shown)", memory.cells().len() - DISPLAY_MEMORY_CELLS),
      false => String::new()
    };

    write!(f, "IP: {}\tMemory: {} cells{}\n{}", self.instruction_pointer(), memory.size(), elided, combined_table)
  }
}
