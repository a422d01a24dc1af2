/*!
  The dispatch table maps an opcode, i.e. a `(plugin, command)` pair, to the handler that
  executes it. A command may also be given a name; the table keeps the names in a bidirectional
  map so front ends can go from mnemonic to opcode and back. Names are optional, so two plugins
  that both call a command `clear` can still both be loaded.

  A key is registered at most once. Silently replacing a handler would make a command's meaning
  depend on the order plugins were loaded in, so a second registration is an error instead.
  Plugins extend a table by registering under their own plugin id.

  Every handler is told the cells of both operands, but a unary handler only reads and writes its
  destination. The table checks the cells a handler reads before running it, so a handler never
  starts writing against an operand that is out of range.

  `CORE_TABLE` is the process-wide table holding the bundled core plugin. It is built on first
  use and read-only afterwards.
*/

use std::collections::HashMap;

use bimap::BiMap;
use strum::IntoEnumIterator;
use tracing::{debug, trace, warn};

use crate::address::Offset;
use crate::command::{Command, CommandId, Opcode, PluginId};
use crate::error::{VMError, VMResult};
use crate::logic::CoreCommand;
use crate::machine::Machine;

/// Executes one command against `machine`, given the resolved destination and source cells.
pub type Handler = fn(&mut Machine, Offset, Offset) -> VMResult;

/// Which operands a handler reads.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Arity {
  /// Only the destination. The source operand is ignored and never resolved.
  Unary,
  Binary,
}

#[derive(Copy, Clone)]
struct Entry {
  handler : Handler,
  arity   : Arity,
}

pub struct DispatchTable {
  handlers  : HashMap<Opcode, Entry>,
  mnemonics : BiMap<String, Opcode>,
}

impl DispatchTable {

  /// An empty table.
  pub fn new() -> DispatchTable {
    DispatchTable{
      handlers  : HashMap::new(),
      mnemonics : BiMap::new(),
    }
  }

  /// A table holding the core plugin.
  pub fn core() -> DispatchTable {
    let mut table = DispatchTable::new();
    // Core opcodes and mnemonics are distinct by construction.
    for command in CoreCommand::iter() {
      let opcode = command.opcode();
      trace!("registering {} as {}", command, opcode);
      table.handlers.insert(opcode, Entry{ handler: command.handler(), arity: command.arity() });
      let _ = table.mnemonics.insert_no_overwrite(command.mnemonic().to_string(), opcode);
    }
    table
  }

  // region Registration

  /// Registers a handler that reads both operands.
  pub fn register(&mut self, opcode: Opcode, handler: Handler) -> VMResult {
    self.register_with(opcode, Arity::Binary, handler)
  }

  pub fn register_with(&mut self, opcode: Opcode, arity: Arity, handler: Handler) -> VMResult {
    if self.handlers.contains_key(&opcode) {
      warn!("duplicate registration of command {}", opcode);
      return Err(VMError::DuplicateHandler{ plugin: opcode.plugin, command: opcode.command });
    }
    trace!("registering {} ({:?})", opcode, arity);
    self.handlers.insert(opcode, Entry{ handler, arity });
    Ok(())
  }

  /**
    Gives a registered command a mnemonic. A name belongs to at most one opcode and an opcode has
    at most one name; a clash on either side is `DuplicateMnemonic` and changes nothing.
  */
  pub fn name(&mut self, opcode: Opcode, mnemonic: &str) -> VMResult {
    if !self.handlers.contains_key(&opcode) {
      return Err(VMError::UnknownInstruction{ plugin: opcode.plugin, command: opcode.command });
    }
    match self.mnemonics.insert_no_overwrite(mnemonic.to_string(), opcode) {
      Ok(()) => {
        trace!("naming {} {}", opcode, mnemonic);
        Ok(())
      }
      Err(_) => {
        warn!("duplicate mnemonic {} for command {}", mnemonic, opcode);
        Err(VMError::DuplicateMnemonic(mnemonic.to_string()))
      }
    }
  }

  // endregion

// region Lookup

  pub fn handler(&self, opcode: Opcode) -> Option<Handler> {
    self.handlers.get(&opcode).map(|entry| entry.handler)
  }

  pub fn arity(&self, opcode: Opcode) -> Option<Arity> {
    self.handlers.get(&opcode).map(|entry| entry.arity)
  }

  pub fn opcode_of(&self, mnemonic: &str) -> VMResult<Opcode> {
    self.mnemonics
        .get_by_left(&mnemonic.to_string())
        .copied()
        .ok_or_else(|| VMError::UnknownMnemonic(mnemonic.to_string()))
  }

  pub fn mnemonic_of(&self, opcode: Opcode) -> Option<&str> {
    self.mnemonics.get_by_right(&opcode).map(String::as_str)
  }

  /// All registered opcodes in increasing order.
  pub fn opcodes(&self) -> Vec<Opcode> {
    let mut opcodes: Vec<Opcode> = self.handlers.keys().copied().collect();
    opcodes.sort();
    opcodes
  }

  pub fn len(&self) -> usize {
    self.handlers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.handlers.is_empty()
  }

  // endregion

  // region Execution

  /**
    Runs the handler registered for `(plugin, command)` on the cells `first` and `second` of the
    machine's primary memory. Every cell the handler reads is checked before it runs, so a bad
    offset fails with `OutOfRange` and leaves the machine as it was.
  */
  pub fn dispatch(
    &self,
    plugin  : PluginId,
    command : CommandId,
    machine : &mut Machine,
    first   : Offset,
    second  : Offset
  ) -> VMResult
  {
    let opcode = Opcode::new(plugin, command);
    let entry  = self.handlers
                     .get(&opcode)
                     .copied()
                     .ok_or(VMError::UnknownInstruction{ plugin, command })?;

    debug!("dispatch {}({}, {})", self.mnemonic_of(opcode).unwrap_or("?"), first, second);
    machine.value_at(first)?;
    if entry.arity == Arity::Binary {
      machine.value_at(second)?;
    }

    let result = (entry.handler)(machine, first, second);
    if let Err(error) = &result {
      debug!("command {} failed: {}", opcode, error);
    }

    #[cfg(feature = "trace_computation")] println!("{}", machine);

    result
  }

  /**
    Resolves the operands of `command` against the machine's primary memory and dispatches it.
    The source operand of a unary command is not resolved; the handler is handed the destination
    in its place.
  */
  pub fn execute(&self, command: &Command, machine: &mut Machine) -> VMResult {
    let opcode = command.opcode;
    let arity  = self.arity(opcode)
                     .ok_or(VMError::UnknownInstruction{ plugin: opcode.plugin, command: opcode.command })?;

    let (first, second) = match arity {
      Arity::Unary  => {
        let first = command.first.resolve(machine)?;
        (first, first)
      }
      Arity::Binary => command.resolve(machine)?
    };
    self.dispatch(opcode.plugin, opcode.command, machine, first, second)
  }

  /// Renders `command` with its mnemonic, e.g. `and(0:0, 0:1)`.
  pub fn describe(&self, command: &Command) -> String {
    match self.mnemonic_of(command.opcode) {
      Some(mnemonic) => format!("{}({}, {})", mnemonic, command.first, command.second),
      None           => command.to_string()
    }
  }

  // endregion
}

impl Default for DispatchTable {
  fn default() -> Self {
    DispatchTable::new()
  }
}

lazy_static! {
  pub static ref CORE_TABLE: DispatchTable = DispatchTable::core();
}

/// Dispatches through the process-wide `CORE_TABLE`.
pub fn dispatch(
  plugin  : PluginId,
  command : CommandId,
  machine : &mut Machine,
  first   : Offset,
  second  : Offset
) -> VMResult
{
  CORE_TABLE.dispatch(plugin, command, machine, first, second)
}
