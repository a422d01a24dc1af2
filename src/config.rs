//! Machine configuration: the constants shared across the core and the knobs a driver may set
//! when building a machine.

use crate::address::{BankId, Offset};
use crate::command::PluginId;

/// Size of the primary memory of a machine built with `MachineConfig::default()`.
pub const DEFAULT_MEMORY_SIZE: Offset = 65_536;
/// Bank id a machine's primary memory answers to unless configured otherwise.
pub const PRIMARY_BANK: BankId = 0;
/// Plugin id of the bundled bitwise logic commands.
pub const CORE_PLUGIN: PluginId = 0;

/// Memory cells shown when the machine state is displayed. Cells past this are elided.
pub const DISPLAY_MEMORY_CELLS: usize = 32;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MachineConfig {
  /// Number of cells in the primary memory bank.
  pub memory_size : Offset,
  /// Bank id that addresses in commands use to refer to the primary memory.
  pub bank_id     : BankId,
}

impl Default for MachineConfig {
  fn default() -> Self {
    MachineConfig{
      memory_size : DEFAULT_MEMORY_SIZE,
      bank_id     : PRIMARY_BANK,
    }
  }
}

impl MachineConfig {
  pub fn with_memory_size(mut self, memory_size: Offset) -> Self {
    self.memory_size = memory_size;
    self
  }

  pub fn with_bank_id(mut self, bank_id: BankId) -> Self {
    self.bank_id = bank_id;
    self
  }
}
