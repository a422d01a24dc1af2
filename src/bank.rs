/*!
  Bank lookup: how the core sees memory banks other than a machine's own.

  The core never owns foreign banks. Whoever owns them (a loader, a debugger, a driver holding
  program memory apart from data memory) hands the core a `BankLookup` and keeps the banks alive
  for as long as any machine refers to them by id. `BankRegistry` is the plain owned
  implementation for drivers that don't need anything fancier.
*/

use std::collections::HashMap;

use crate::address::{BankId, MemoryAddress};
use crate::error::{VMError, VMResult};
use crate::memory::{Byte, MemoryBank};

pub trait BankLookup {
  fn bank(&self, id: BankId) -> Option<&MemoryBank>;

  /// Reads the cell at `address` from whichever bank it names.
  fn read_at(&self, address: MemoryAddress) -> VMResult<Byte> {
    self.bank(address.bank)
        .ok_or(VMError::UnknownBank(address.bank))?
        .read(address.offset)
  }
}

#[derive(Debug, Default)]
pub struct BankRegistry {
  banks: HashMap<BankId, MemoryBank>,
}

impl BankRegistry {
  pub fn new() -> BankRegistry {
    BankRegistry::default()
  }

  /// Adds a bank under a fresh id. Ids are never reassigned.
  pub fn insert(&mut self, id: BankId, bank: MemoryBank) -> VMResult {
    if self.banks.contains_key(&id) {
      return Err(VMError::DuplicateBank(id));
    }
    self.banks.insert(id, bank);
    Ok(())
  }

  pub fn bank_mut(&mut self, id: BankId) -> Option<&mut MemoryBank> {
    self.banks.get_mut(&id)
  }
}

impl BankLookup for BankRegistry {
  fn bank(&self, id: BankId) -> Option<&MemoryBank> {
    self.banks.get(&id)
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn registry_reads_through_bank_ids() {
    let mut program = MemoryBank::new(4).unwrap();
    program.write(1, 0xAB).unwrap();

    let mut registry = BankRegistry::new();
    registry.insert(1, program).unwrap();
    registry.insert(2, MemoryBank::new(2).unwrap()).unwrap();

    assert_eq!(Ok(0xAB), registry.read_at(MemoryAddress::new(1, 1)));
    assert_eq!(Ok(0), registry.read_at(MemoryAddress::new(2, 1)));
    assert_eq!(Err(VMError::UnknownBank(3)), registry.read_at(MemoryAddress::new(3, 0)));
    assert_eq!(
      Err(VMError::OutOfRange{ offset: 2, size: 2 }),
      registry.read_at(MemoryAddress::new(2, 2))
    );
  }

  #[test]
  fn bank_ids_are_not_reused() {
    let mut registry = BankRegistry::new();
    registry.insert(5, MemoryBank::new(1).unwrap()).unwrap();
    assert_eq!(
      Err(VMError::DuplicateBank(5)),
      registry.insert(5, MemoryBank::new(9).unwrap())
    );
    assert_eq!(1, registry.bank(5).map(MemoryBank::size).unwrap());

    registry.bank_mut(5).unwrap().write(0, 3).unwrap();
    assert_eq!(Ok(3), registry.read_at(MemoryAddress::new(5, 0)));
  }
}
