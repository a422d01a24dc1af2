/*!
  The register file: 27 byte-sized registers and the 64 bit instruction pointer.

  All 28 registers share one numbering, which is the order of `RegisterName` below. Front ends
  should refer to registers by name rather than by number, so the numbering is free to change.

  The instruction pointer is numbered like the others but is *not* reachable through the byte
  register accessors. Its width differs from every other register, so it has its own accessors.
*/

use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use strum::IntoEnumIterator;
use strum_macros::{Display as StrumDisplay, IntoStaticStr, EnumString, EnumIter};
use num_enum::{TryFromPrimitive, IntoPrimitive};

use crate::error::{VMError, VMResult};
use crate::memory::Byte;

/// The instruction pointer selects the next command slot.
pub type InstructionAddress = i64;

pub const BYTE_REGISTER_COUNT: usize = 27;

/**
  Register names of the virtual machine. The order is significant: it is the numbering used by
  `RegisterFile::read_indexed` and friends.
*/
#[derive(
StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq, PartialEq, Ord, PartialOrd,  Debug, Hash
)]
#[strum(serialize_all = "shouty_snake_case")]
#[repr(u8)]
pub enum RegisterName {
  // Character I/O
  Putc,
  Getc,
  Fputc,
  #[strum(to_string = "FPUTC_FLAGS_1")]
  FputcFlags1,
  #[strum(to_string = "FPUTC_FLAGS_2")]
  FputcFlags2,
  #[strum(to_string = "FPUTC_FLAGS_3")]
  FputcFlags3,
  #[strum(to_string = "FPUTC_FLAGS_4")]
  FputcFlags4,
  Stdin,
  Stdout,
  // Result of the last comparison
  Cmpres,
  // General purpose
  Eax,
  Ebx,
  Ecx,
  Edx,
  Eex,
  Efx,
  Fax,
  Fbx,
  Fcx,
  Fdx,
  Fex,
  Ffx,
  // Source and destination
  Eas,
  Ebs,
  Ead,
  Ebd,
  // Register 26
  Ip,
  #[strum(to_string = "LASTINTR")]
  LastIntr,
}

impl RegisterName {
  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  pub fn is_instruction_pointer(&self) -> bool {
    *self == RegisterName::Ip
  }

  /// Every register except the instruction pointer, in numbering order.
  pub fn byte_registers() -> impl Iterator<Item = RegisterName> {
    RegisterName::iter().filter(|name| !name.is_instruction_pointer())
  }

  /// Position in the byte register array. The instruction pointer has none.
  fn slot(&self) -> VMResult<usize> {
    let code = self.code();
    let ip   = RegisterName::Ip.code();
    match code {
      c if c < ip  => Ok(c as usize),
      c if c == ip => Err(VMError::InstructionPointerMisuse),
      c            => Ok(c as usize - 1)
    }
  }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RegisterFile {
  bytes : [Byte; BYTE_REGISTER_COUNT],
  ip    : InstructionAddress,
}

impl RegisterFile {

  /// All registers zeroed, instruction pointer at 0.
  pub fn new() -> RegisterFile {
    RegisterFile::default()
  }

  // region Byte registers

  pub fn read(&self, name: RegisterName) -> VMResult<Byte> {
    Ok(self.bytes[name.slot()?])
  }

  pub fn write(&mut self, name: RegisterName, value: Byte) -> VMResult {
    self.bytes[name.slot()?] = value;
    Ok(())
  }

  /// Reads a register given its raw number, as found in decoded commands.
  pub fn read_indexed(&self, index: u8) -> VMResult<Byte> {
    self.read(Self::name_of(index)?)
  }

  pub fn write_indexed(&mut self, index: u8, value: Byte) -> VMResult {
    self.write(Self::name_of(index)?, value)
  }

  fn name_of(index: u8) -> VMResult<RegisterName> {
    RegisterName::try_from(index).map_err(|_| VMError::InvalidRegister(index))
  }

  // endregion

  // region Instruction pointer

  pub fn instruction_pointer(&self) -> InstructionAddress {
    self.ip
  }

  pub fn set_instruction_pointer(&mut self, value: InstructionAddress) {
    self.ip = value;
  }

  /// Moves to the next command slot.
  pub fn advance_instruction_pointer(&mut self) {
    self.ip = self.ip.wrapping_add(1);
  }

  // endregion
}

impl Display for RegisterFile {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "IP={}", self.ip)?;
    for name in RegisterName::byte_registers() {
      // `slot` cannot fail for byte registers.
      if let Ok(slot) = name.slot() {
        write!(f, " {}={:#04x}", name, self.bytes[slot])?;
      }
    }
    Ok(())
  }
}


#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn numbering_matches_register_order() {
    assert_eq!(28, RegisterName::iter().count());
    assert_eq!(0, RegisterName::Putc.code());
    assert_eq!(9, RegisterName::Cmpres.code());
    assert_eq!(10, RegisterName::Eax.code());
    assert_eq!(26, RegisterName::Ip.code());
    assert_eq!(27, RegisterName::LastIntr.code());
    assert_eq!(BYTE_REGISTER_COUNT, RegisterName::byte_registers().count());
  }

  #[test]
  fn names_round_trip_through_text() {
    assert_eq!("EAX", RegisterName::Eax.to_string());
    assert_eq!("FPUTC_FLAGS_3", RegisterName::FputcFlags3.to_string());
    assert_eq!("LASTINTR", RegisterName::LastIntr.to_string());
    assert_eq!("IP", RegisterName::Ip.to_string());
    for name in RegisterName::iter() {
      assert_eq!(Ok(name), RegisterName::from_str(&name.to_string()));
    }
  }

  #[test]
  fn byte_registers_round_trip() {
    let mut registers = RegisterFile::new();
    for (i, name) in RegisterName::byte_registers().enumerate() {
      registers.write(name, i as Byte + 100).unwrap();
    }
    for (i, name) in RegisterName::byte_registers().enumerate() {
      assert_eq!(i as Byte + 100, registers.read(name).unwrap());
    }
    assert_eq!(0, registers.instruction_pointer());
  }

  #[test]
  fn instruction_pointer_is_not_a_byte_register() {
    let mut registers = RegisterFile::new();
    assert_eq!(Err(VMError::InstructionPointerMisuse), registers.read(RegisterName::Ip));
    assert_eq!(Err(VMError::InstructionPointerMisuse), registers.write(RegisterName::Ip, 1));
    assert_eq!(Err(VMError::InstructionPointerMisuse), registers.read_indexed(26));
    assert_eq!(Err(VMError::InstructionPointerMisuse), registers.write_indexed(26, 1));
    assert_eq!(RegisterFile::new(), registers);
  }

  #[test]
  fn unknown_register_numbers_are_rejected() {
    let mut registers = RegisterFile::new();
    assert_eq!(Err(VMError::InvalidRegister(28)), registers.read_indexed(28));
    assert_eq!(Err(VMError::InvalidRegister(255)), registers.write_indexed(255, 1));
  }

  #[test]
  fn last_interrupt_is_distinct_from_ebd() {
    let mut registers = RegisterFile::new();
    registers.write(RegisterName::Ebd, 1).unwrap();
    registers.write_indexed(27, 2).unwrap();
    assert_eq!(1, registers.read(RegisterName::Ebd).unwrap());
    assert_eq!(2, registers.read(RegisterName::LastIntr).unwrap());
  }

  #[test]
  fn instruction_pointer_operations() {
    let mut registers = RegisterFile::new();
    registers.set_instruction_pointer(41);
    registers.advance_instruction_pointer();
    assert_eq!(42, registers.instruction_pointer());
  }
}
