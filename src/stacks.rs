//! The two execution stacks: a byte operand stack for instruction handlers, and a return address
//! stack backing call/return. Both are unbounded.

use crate::error::{Stack, VMError, VMResult};
use crate::memory::Byte;
use crate::registers::InstructionAddress;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExecutionStacks {
  operands : Vec<Byte>,
  returns  : Vec<InstructionAddress>,
}

impl ExecutionStacks {
  pub fn new() -> ExecutionStacks {
    ExecutionStacks::default()
  }

  pub fn push_operand(&mut self, value: Byte) {
    self.operands.push(value);
  }

  pub fn pop_operand(&mut self) -> VMResult<Byte> {
    self.operands.pop().ok_or(VMError::StackUnderflow(Stack::Operand))
  }

  pub fn push_return_address(&mut self, address: InstructionAddress) {
    self.returns.push(address);
  }

  pub fn pop_return_address(&mut self) -> VMResult<InstructionAddress> {
    self.returns.pop().ok_or(VMError::StackUnderflow(Stack::Return))
  }

  /// Bottom to top.
  pub fn operands(&self) -> &[Byte] {
    &self.operands
  }

  /// Bottom to top.
  pub fn return_addresses(&self) -> &[InstructionAddress] {
    &self.returns
  }
}
