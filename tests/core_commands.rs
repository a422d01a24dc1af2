//! End-to-end scenarios: commands dispatched against a fresh machine.

use strum::IntoEnumIterator;

use nervi::{
  dispatch, Command, CoreCommand, Machine, MemoryAddress, Operand, RegisterName, Stack, VMError,
  CORE_TABLE
};

/// A four cell machine holding `[0b1010, 0b0110, 0, 0]`.
fn sample_machine() -> Machine {
  let mut machine = Machine::new(4).unwrap();
  machine.memory_mut().write_slice(0, &[0b1010, 0b0110, 0, 0]).unwrap();
  machine
}

fn cell(offset: i64) -> Operand {
  Operand::Address(MemoryAddress::new(0, offset))
}

#[test]
fn and_combines_destination_with_source() {
  let mut machine = sample_machine();
  dispatch(0, 0, &mut machine, 0, 1).unwrap();
  assert_eq!(0b0010, machine.value_at(0).unwrap());
  assert_eq!(0b0110, machine.value_at(1).unwrap());
}

#[test]
fn not_complements_destination_and_ignores_source() {
  let mut machine = sample_machine();
  dispatch(0, 2, &mut machine, 0, 3).unwrap();
  assert_eq!(!0b1010u8, machine.value_at(0).unwrap());
  assert_eq!(0, machine.value_at(3).unwrap());
}

#[test]
fn out_of_range_source_changes_nothing() {
  for command in CoreCommand::iter() {
    let mut machine = sample_machine();
    let before = machine.clone();
    let result = dispatch(0, command.opcode().command, &mut machine, 0, 4);

    match command {
      CoreCommand::Not => {
        assert_eq!(Ok(()), result);
        assert_eq!(!0b1010u8, machine.value_at(0).unwrap());
      }
      _ => {
        assert_eq!(Err(VMError::OutOfRange{ offset: 4, size: 4 }), result, "{}", command);
        assert_eq!(before, machine, "{}", command);
      }
    }
  }
}

#[test]
fn not_with_an_immediate_source_still_runs() {
  let mut machine = sample_machine();
  let not = Command::new(0, CoreCommand::Not.opcode().command, cell(0), Operand::Immediate(0));
  CORE_TABLE.execute(&not, &mut machine).unwrap();
  assert_eq!(!0b1010u8, machine.value_at(0).unwrap());
}

#[test]
fn locked_destination_fails_and_keeps_value() {
  let mut machine = sample_machine();
  machine.memory_mut().lock(0).unwrap();
  assert_eq!(Err(VMError::CellLocked{ offset: 0 }), dispatch(0, 0, &mut machine, 0, 1));
  assert_eq!(0b1010, machine.value_at(0).unwrap());
}

#[test]
fn unregistered_plugin_is_unknown() {
  let mut machine = sample_machine();
  let before = machine.clone();
  assert_eq!(
    Err(VMError::UnknownInstruction{ plugin: 99, command: 0 }),
    dispatch(99, 0, &mut machine, 0, 1)
  );
  assert_eq!(before, machine);
}

#[test]
fn decoded_commands_run_through_the_core_table() {
  let mut machine = sample_machine();
  let program = [
    Command::new(0, CoreCommand::Xor.opcode().command, cell(2), cell(0)),
    Command::new(0, CoreCommand::Nand.opcode().command, cell(2), cell(1)),
  ];
  for command in program.iter() {
    CORE_TABLE.execute(command, &mut machine).unwrap();
    machine.advance();
  }
  assert_eq!(!(0b1010u8 & 0b0110), machine.value_at(2).unwrap());
  assert_eq!(2, machine.instruction_pointer());
}

#[test]
fn call_and_return_around_a_dispatch() {
  let mut machine = sample_machine();
  machine.jump(5);
  machine.call_to(40);
  machine.registers_mut().write(RegisterName::Cmpres, 1).unwrap();
  dispatch(0, 1, &mut machine, 3, 1).unwrap();
  machine.return_from_call().unwrap();

  assert_eq!(5, machine.instruction_pointer());
  assert_eq!(0b0110, machine.value_at(3).unwrap());
  assert_eq!(
    Err(VMError::StackUnderflow(Stack::Return)),
    machine.return_from_call()
  );
  assert_eq!(5, machine.instruction_pointer());
}
