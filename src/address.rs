//! A cross-bank memory address: which bank, and which cell within it.

use std::ops::Add;
use std::fmt::{Display, Formatter};

/// Selects one memory bank among those a machine can see.
pub type BankId = i16;
/// Cell index within a bank. Signed so that negative indices can be reported as errors rather
/// than silently wrapping.
pub type Offset = i64;

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub struct MemoryAddress {
  pub bank   : BankId,
  pub offset : Offset,
}

impl MemoryAddress {
  pub fn new(bank: BankId, offset: Offset) -> MemoryAddress {
    MemoryAddress{ bank, offset }
  }

  /// Whether `offset` can possibly name a cell in a bank of `size` cells.
  pub fn fits(&self, size: Offset) -> bool {
    self.offset >= 0 && self.offset < size
  }
}

impl Display for MemoryAddress {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}:{}", self.bank, self.offset)
  }
}

// Step to a neighbouring cell of the same bank.
impl Add<Offset> for MemoryAddress {
  type Output = MemoryAddress;
  fn add(self, rhs: Offset) -> MemoryAddress {
    MemoryAddress{
      bank   : self.bank,
      offset : self.offset.wrapping_add(rhs)
    }
  }
}
