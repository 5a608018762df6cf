use crate::error::IntcodeError;
use crate::instruction::{Instruction, Opcode, Parameter, ParameterMode};
use crate::memory::Memory;
use test_log::test;

#[test]
fn test_decode_position_mode_add() {
    let memory = Memory::new(&[1, 9, 10, 3, 99]);
    let inst = Instruction::decode(&memory, 0).unwrap();

    assert_eq!(inst.opcode, Opcode::Add);
    assert_eq!(
        inst.parameters,
        vec![
            Parameter::new(ParameterMode::Position, 9),
            Parameter::new(ParameterMode::Position, 10),
            Parameter::new(ParameterMode::Position, 3),
        ]
    );
    assert_eq!(inst.size(), 4);
}

#[test]
fn test_decode_mixed_modes() {
    // 1002: multiply, p1 position, p2 immediate, p3 position
    let memory = Memory::new(&[1002, 4, 3, 4, 33]);
    let inst = Instruction::decode(&memory, 0).unwrap();

    assert_eq!(inst.opcode, Opcode::Multiply);
    let modes: Vec<_> = inst.parameters.iter().map(|p| p.mode).collect();
    assert_eq!(
        modes,
        vec![
            ParameterMode::Position,
            ParameterMode::Immediate,
            ParameterMode::Position
        ]
    );
}

#[test]
fn test_decode_relative_mode() {
    let memory = Memory::new(&[204, -1, 99]);
    let inst = Instruction::decode(&memory, 0).unwrap();

    assert_eq!(inst.opcode, Opcode::Output);
    assert_eq!(
        inst.parameters,
        vec![Parameter::new(ParameterMode::Relative, -1)]
    );
}

#[test]
fn test_decode_operands_past_end_read_as_zero() {
    let memory = Memory::new(&[1101, 5]);
    let inst = Instruction::decode(&memory, 0).unwrap();

    assert_eq!(inst.parameters.len(), 3);
    assert_eq!(inst.parameters[1].raw, 0);
    assert_eq!(inst.parameters[2].raw, 0);
}

#[test]
fn test_decode_at_nonzero_pc() {
    let memory = Memory::new(&[99, 99, 104, 7, 99]);
    let inst = Instruction::decode(&memory, 2).unwrap();
    assert_eq!(inst.opcode, Opcode::Output);
    assert_eq!(inst.parameters[0], Parameter::new(ParameterMode::Immediate, 7));
}

#[test]
fn test_decode_unknown_opcode() {
    let memory = Memory::new(&[1, 0, 0, 0, 42]);
    assert_eq!(
        Instruction::decode(&memory, 4),
        Err(IntcodeError::UnknownOpcode { opcode: 42, pc: 4 })
    );
}

#[test]
fn test_decode_negative_word() {
    let memory = Memory::new(&[-1]);
    assert_eq!(
        Instruction::decode(&memory, 0),
        Err(IntcodeError::UnknownOpcode { opcode: -1, pc: 0 })
    );
}

#[test]
fn test_decode_unknown_mode() {
    let memory = Memory::new(&[301, 0, 0, 0]);
    assert_eq!(
        Instruction::decode(&memory, 0),
        Err(IntcodeError::UnknownParameterMode { mode: 3, pc: 0 })
    );
}

#[test]
fn test_halt_ignores_mode_digits() {
    let memory = Memory::new(&[99]);
    let inst = Instruction::decode(&memory, 0).unwrap();
    assert_eq!(inst.opcode, Opcode::Halt);
    assert!(inst.parameters.is_empty());
    assert_eq!(inst.size(), 1);
}

#[test]
fn test_arity_table() {
    let arities: Vec<(i64, usize)> = Opcode::ALL
        .iter()
        .map(|op| (op.code(), op.arity()))
        .collect();
    assert_eq!(
        arities,
        vec![
            (1, 3),
            (2, 3),
            (3, 1),
            (4, 1),
            (5, 2),
            (6, 2),
            (7, 3),
            (8, 3),
            (9, 1),
            (99, 0)
        ]
    );
}

#[test]
fn test_decode_encode_round_trip_all_modes() {
    for opcode in Opcode::ALL {
        let arity = opcode.arity();
        let combinations = 3usize.pow(arity as u32);
        for combination in 0..combinations {
            let mut modes = Vec::with_capacity(arity);
            let mut rest = combination;
            for _ in 0..arity {
                modes.push(ParameterMode::ALL[rest % 3]);
                rest /= 3;
            }

            let expected = Instruction {
                opcode,
                parameters: modes
                    .iter()
                    .enumerate()
                    .map(|(i, mode)| Parameter::new(*mode, i as i64 + 10))
                    .collect(),
            };

            let mut words = vec![expected.encode()];
            words.extend(expected.parameters.iter().map(|p| p.raw));
            let decoded = Instruction::decode(&Memory::new(&words), 0).unwrap();

            assert_eq!(decoded, expected, "round trip failed for word {}", words[0]);
            assert_eq!(Opcode::from_code(decoded.encode() % 100), Some(opcode));
        }
    }
}

#[test]
fn test_parameter_resolution() {
    let memory = Memory::new(&[10, 20, 30, 40]);

    let position = Parameter::new(ParameterMode::Position, 2);
    assert_eq!(position.value(&memory, 0), Ok(30));
    assert_eq!(position.address(1), Some(2));

    let immediate = Parameter::new(ParameterMode::Immediate, 2);
    assert_eq!(immediate.value(&memory, 0), Ok(2));
    assert_eq!(immediate.address(1), None);

    let relative = Parameter::new(ParameterMode::Relative, -1);
    assert_eq!(relative.value(&memory, 2), Ok(20));
    assert_eq!(relative.address(4), Some(3));
    assert_eq!(
        relative.value(&memory, 0),
        Err(IntcodeError::InvalidAddress(-1))
    );
}

#[test]
fn test_display() {
    let memory = Memory::new(&[21101, 3, -4, 7]);
    let inst = Instruction::decode(&memory, 0).unwrap();
    assert_eq!(inst.to_string(), "add #3, #-4, [rb+7]");

    let memory = Memory::new(&[2105, 9, -2]);
    let inst = Instruction::decode(&memory, 0).unwrap();
    assert_eq!(inst.to_string(), "jnz #9, [rb-2]");
}
