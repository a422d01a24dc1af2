/*!
  Error kinds surfaced by the execution core.

  Every core operation either fully succeeds or fails with one of these kinds and leaves the
  machine untouched. Deciding what to do about a failure (abort, skip the command, raise a
  diagnostic interrupt) is the driver's business, not ours.
*/

use thiserror::Error;

use strum_macros::Display as StrumDisplay;

use crate::address::{BankId, Offset};
use crate::command::{CommandId, PluginId};

/// Names one of the two execution stacks, for underflow reports.
#[derive(StrumDisplay, Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum Stack {
  #[strum(to_string = "operand")]
  Operand,
  #[strum(to_string = "return")]
  Return,
}

#[derive(Error, Clone, Eq, PartialEq, Debug)]
pub enum VMError {
  /// A memory bank was requested with a negative size.
  #[error("invalid memory size: {size}")]
  InvalidSize { size: Offset },

  /// A cell outside `[0, size)` was addressed.
  #[error("invalid cell index: {offset} (expected positive and less than {size})")]
  OutOfRange { offset: Offset, size: Offset },

  #[error("memory cell with the address {offset} is write-locked")]
  CellLocked { offset: Offset },

  /// The raw register number does not name a register.
  #[error("invalid register index: {0}")]
  InvalidRegister(u8),

  /// The instruction pointer was used through the byte-register path.
  #[error("the instruction pointer cannot be accessed as a byte register")]
  InstructionPointerMisuse,

  #[error("{0} stack underflow")]
  StackUnderflow(Stack),

  #[error("no handler registered for command {plugin}.{command}")]
  UnknownInstruction { plugin: PluginId, command: CommandId },

  #[error("a handler is already registered for command {plugin}.{command}")]
  DuplicateHandler { plugin: PluginId, command: CommandId },

  #[error("unknown memory bank: {0}")]
  UnknownBank(BankId),

  #[error("memory bank {0} is already registered")]
  DuplicateBank(BankId),

  /// An immediate operand was given where a memory cell is required.
  #[error("an immediate operand does not address a memory cell")]
  NotAddressable,

  #[error("unknown mnemonic: {0}")]
  UnknownMnemonic(String),

  #[error("mnemonic {0} is already registered")]
  DuplicateMnemonic(String),
}

pub type VMResult<T = ()> = Result<T, VMError>;
