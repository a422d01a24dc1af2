/*!
  The bundled core plugin: bitwise logic on byte cells.

  Every command takes a destination cell and a source cell of the primary memory and writes its
  result back to the destination. AND, OR, NOT and XOR are primitives. The other four are
  sequences of primitives applied to the same destination/source pair, each step writing to the
  destination before the next one reads it:

  ```text
  EQV  = XOR, NOT   ->  dst = ~(dst ^ src)
  IMP  = NOT, OR    ->  dst = ~dst | src
  NAND = AND, NOT   ->  dst = ~(dst & src)
  NOR  = OR,  NOT   ->  dst = ~(dst | src)
  ```

  NOT is unary: it never reads its source. Every other command reads both cells before its first
  write, and all writes go through the write-lock check, so a bad source or a locked destination
  fails before any step has written and memory is left as it was.
*/

use strum::IntoEnumIterator;
use strum_macros::{Display as StrumDisplay, IntoStaticStr, EnumString, EnumIter};
use num_enum::{TryFromPrimitive, IntoPrimitive};

use crate::address::Offset;
use crate::command::{CommandId, Opcode};
use crate::config::CORE_PLUGIN;
use crate::dispatch::{Arity, DispatchTable, Handler};
use crate::error::VMResult;
use crate::machine::Machine;

/**
  Commands of the core plugin. The order is significant: a command's position is its command id.
*/
#[derive(
StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq, PartialEq, Debug, Hash
)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum CoreCommand {
  And,
  Or,
  Not,
  Xor,
  Eqv,
  Imp,
  Nand,
  Nor,
}

impl CoreCommand {
  pub fn opcode(&self) -> Opcode {
    Opcode::new(CORE_PLUGIN, Into::<u8>::into(*self) as CommandId)
  }

  pub fn mnemonic(&self) -> &'static str {
    (*self).into()
  }

  pub fn arity(&self) -> Arity {
    match self {
      CoreCommand::Not => Arity::Unary,
      _                => Arity::Binary
    }
  }

  pub fn handler(&self) -> Handler {
    match self {
      CoreCommand::And  => byte_and,
      CoreCommand::Or   => byte_or,
      CoreCommand::Not  => byte_not,
      CoreCommand::Xor  => byte_xor,
      CoreCommand::Eqv  => byte_eqv,
      CoreCommand::Imp  => byte_imp,
      CoreCommand::Nand => byte_nand,
      CoreCommand::Nor  => byte_nor,
    }
  }
}

/// Registers and names every core command, in command id order.
pub fn register_core(table: &mut DispatchTable) -> VMResult {
  for command in CoreCommand::iter() {
    table.register_with(command.opcode(), command.arity(), command.handler())?;
    table.name(command.opcode(), command.mnemonic())?;
  }
  Ok(())
}

// region Primitives

pub fn byte_and(machine: &mut Machine, dst: Offset, src: Offset) -> VMResult {
  let value = machine.value_at(dst)? & machine.value_at(src)?;
  machine.set_value_at(dst, value)
}

pub fn byte_or(machine: &mut Machine, dst: Offset, src: Offset) -> VMResult {
  let value = machine.value_at(dst)? | machine.value_at(src)?;
  machine.set_value_at(dst, value)
}

/// Ignores `src`.
pub fn byte_not(machine: &mut Machine, dst: Offset, _src: Offset) -> VMResult {
  let value = !machine.value_at(dst)?;
  machine.set_value_at(dst, value)
}

pub fn byte_xor(machine: &mut Machine, dst: Offset, src: Offset) -> VMResult {
  let value = machine.value_at(dst)? ^ machine.value_at(src)?;
  machine.set_value_at(dst, value)
}

// endregion

// region Composites

pub fn byte_eqv(machine: &mut Machine, dst: Offset, src: Offset) -> VMResult {
  byte_xor(machine, dst, src)?;
  byte_not(machine, dst, src)
}

pub fn byte_imp(machine: &mut Machine, dst: Offset, src: Offset) -> VMResult {
  // The NOT step does not read `src`.
  machine.value_at(src)?;
  byte_not(machine, dst, src)?;
  byte_or(machine, dst, src)
}

pub fn byte_nand(machine: &mut Machine, dst: Offset, src: Offset) -> VMResult {
  byte_and(machine, dst, src)?;
  byte_not(machine, dst, src)
}

pub fn byte_nor(machine: &mut Machine, dst: Offset, src: Offset) -> VMResult {
  byte_or(machine, dst, src)?;
  byte_not(machine, dst, src)
}

// endregion
