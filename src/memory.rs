/*!
  A memory bank is a fixed-size array of byte cells. Its size is chosen at construction and
  never changes afterwards.

  Cells can be write-locked to protect constants or code. Locked cells stay readable. The locks
  are kept as a set of offsets rather than a flag per cell, since a typical bank is large and
  has only a handful of locked cells.
*/

use std::collections::BTreeSet;
use std::convert::TryFrom;

use crate::address::Offset;
use crate::error::{VMError, VMResult};

/// The content of a single cell.
pub type Byte = u8;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MemoryBank {
  cells  : Vec<Byte>,
  locked : BTreeSet<Offset>,
}

impl MemoryBank {

  /// Creates a bank of `size` zeroed, unlocked cells.
  pub fn new(size: Offset) -> VMResult<MemoryBank> {
    let length = usize::try_from(size).map_err(|_| VMError::InvalidSize{ size })?;
    Ok(MemoryBank{
      cells  : vec![0; length],
      locked : BTreeSet::new()
    })
  }

  pub fn size(&self) -> Offset {
    self.cells.len() as Offset
  }

  /// Converts `offset` to an index into `cells`, or reports it as out of range.
  fn index(&self, offset: Offset) -> VMResult<usize> {
    match offset >= 0 && offset < self.size() {
      true  => Ok(offset as usize),
      false => Err(VMError::OutOfRange{ offset, size: self.size() })
    }
  }

  /// Reads a cell. Locks do not affect reads.
  pub fn read(&self, offset: Offset) -> VMResult<Byte> {
    let index = self.index(offset)?;
    Ok(self.cells[index])
  }

  pub fn write(&mut self, offset: Offset, value: Byte) -> VMResult {
    let index = self.index(offset)?;
    if self.locked.contains(&offset) {
      return Err(VMError::CellLocked{ offset });
    }
    self.cells[index] = value;
    Ok(())
  }

  /**
    Writes `bytes` to consecutive cells starting at `offset`. Either every byte is written or,
    if any target cell is out of range or locked, none is.
  */
  pub fn write_slice(&mut self, offset: Offset, bytes: &[Byte]) -> VMResult {
    let start = self.index(offset)?;
    let end   = start + bytes.len();
    if end > self.cells.len() {
      return Err(VMError::OutOfRange{ offset: end as Offset - 1, size: self.size() });
    }
    if let Some(&locked) = self.locked.range(offset..end as Offset).next() {
      return Err(VMError::CellLocked{ offset: locked });
    }
    self.cells[start..end].copy_from_slice(bytes);
    Ok(())
  }

  /// Write-locks a cell. Locking a locked cell is a no-op.
  pub fn lock(&mut self, offset: Offset) -> VMResult {
    self.index(offset)?;
    self.locked.insert(offset);
    Ok(())
  }

  /// Removes the write-lock of a cell. Unlocking an unlocked cell is a no-op.
  pub fn unlock(&mut self, offset: Offset) -> VMResult {
    self.index(offset)?;
    self.locked.remove(&offset);
    Ok(())
  }

  pub fn is_locked(&self, offset: Offset) -> VMResult<bool> {
    self.index(offset)?;
    Ok(self.locked.contains(&offset))
  }

  /// The locked offsets in increasing order.
  pub fn locked_offsets(&self) -> impl Iterator<Item = Offset> + '_ {
    self.locked.iter().copied()
  }

  pub fn cells(&self) -> &[Byte] {
    &self.cells
  }
}
