//! Shared test utilities for IntCode integration tests.
//!
//! This module provides:
//! - Program fixtures with known behavior
//! - Run helpers that panic on machine errors
//! - Multi-machine drivers (amplifier chains) built on the public API
//!
//! ## AAA Pattern
//!
//! All tests follow the Arrange-Act-Assert pattern:
//! - Arrange: Set up images, inputs and configuration
//! - Act: Run the machine(s)
//! - Assert: Verify outputs, memory and status

#![allow(dead_code)]

use intcode::*;

// =============================================================================
// Program Fixtures
// =============================================================================

pub mod programs {
    use intcode::Word;

    /// Adds two cells in place: address 0 becomes 2.
    pub const ADD_IN_PLACE: [Word; 5] = [1, 0, 0, 0, 99];

    /// Add with an immediate negative operand: 100 + -1 stores 99 at address 4.
    pub const IMMEDIATE_ADD: [Word; 5] = [1101, 100, -1, 4, 0];

    /// Outputs a copy of itself.
    pub const QUINE: [Word; 16] = [
        109, 1, 204, -1, 1001, 100, 1, 100, 1008, 100, 16, 101, 1006, 101, 0, 99,
    ];

    /// Outputs a 16-digit product.
    pub const SIXTEEN_DIGITS: [Word; 8] = [1102, 34915192, 34915192, 7, 4, 7, 99, 0];

    /// Outputs the large number in its middle.
    pub const LARGE_LITERAL: [Word; 3] = [104, 1125899906842624, 99];

    /// Echoes one input.
    pub const ECHO: [Word; 5] = [3, 0, 4, 0, 99];

    /// Outputs 1 if the input equals 8, else 0 (position mode).
    pub const EQUALS_8_POSITION: [Word; 11] = [3, 9, 8, 9, 10, 9, 4, 9, 99, -1, 8];

    /// Outputs 1 if the input is less than 8, else 0 (immediate mode).
    pub const LESS_THAN_8_IMMEDIATE: [Word; 9] = [3, 3, 1107, -1, 8, 3, 4, 3, 99];

    /// Outputs 0 if the input is 0, else 1 (jumps, position mode).
    pub const NON_ZERO_POSITION: [Word; 16] = [3, 12, 6, 12, 15, 1, 13, 14, 13, 4, 13, 99, -1, 0, 1, 9];

    /// Outputs 999 below 8, 1000 at 8, 1001 above 8.
    pub const COMPARE_TO_8: [Word; 47] = [
        3, 21, 1008, 21, 8, 20, 1005, 20, 22, 107, 8, 21, 20, 1006, 20, 31, 1106, 0, 36, 98, 0, 0,
        1002, 21, 125, 20, 4, 20, 1105, 1, 46, 104, 999, 1105, 1, 46, 1101, 1000, 1, 20, 4, 20,
        1105, 1, 46, 98, 99,
    ];

    /// Amplifier: reads phase then signal, outputs `signal * 10 + phase`.
    pub const AMPLIFIER: [Word; 17] = [3, 15, 3, 16, 1002, 16, 10, 16, 1, 16, 15, 15, 4, 15, 99, 0, 0];

    /// Amplifier for feedback loops: keeps reading signals until its counter runs out.
    pub const FEEDBACK_AMPLIFIER: [Word; 29] = [
        3, 26, 1001, 26, -4, 26, 3, 27, 1002, 27, 2, 27, 1, 27, 26, 27, 4, 27, 1001, 28, -1, 28,
        1005, 28, 6, 99, 0, 0, 5,
    ];

    /// Network node.
    ///
    /// Reads its own address, then forever: reads `x` (polling while it is
    /// -1), reads `y`, and sends `(address + 1, x, y + 1)`.
    pub const RELAY_NODE: [Word; 31] = [
        3, 100, // 0:  IN [100]            address
        3, 101, // 2:  IN [101]            x
        1008, 101, -1, 103, // 4:  EQ [101] -1 -> [103]
        1005, 103, 2, // 8:  JT [103] -> 2     idle poll
        3, 102, // 11: IN [102]            y
        1001, 100, 1, 104, // 13: ADD [100] 1 -> [104]
        4, 104, // 17: OUT dest
        4, 101, // 19: OUT x
        1001, 102, 1, 102, // 21: ADD [102] 1 -> [102]
        4, 102, // 25: OUT y
        1105, 1, 2, // 27: JT 1 -> 2
        99,
    ];

    /// Text program: prints "Hi?", echoes one input line, then prints 1000.
    pub const GREETER: [Word; 27] = [
        104, 72, 104, 105, 104, 63, 104, 10, 3, 100, 1008, 100, 10, 101, 1005, 101, 22, 4, 100,
        1105, 1, 8, 104, 10, 104, 1000, 99,
    ];

    /// Counts cell 100 up to `limit`, then outputs it.
    pub fn counter(limit: Word) -> Vec<Word> {
        vec![1001, 100, 1, 100, 1007, 100, limit, 101, 1005, 101, 0, 4, 100, 99]
    }

    /// Writes 7 to `count` consecutive cells starting at address 1000.
    pub fn fill(count: Word) -> Vec<Word> {
        vec![21101, 7, 0, 1000, 109, 1, 1001, 200, 1, 200, 1007, 200, count, 201, 1005, 201, 0, 99]
    }
}

// =============================================================================
// Run Helpers
// =============================================================================

/// Run an image to completion with no input.
///
/// # Panics
/// Panics on any machine error, which is appropriate for test code.
pub fn run(image: &[Word]) -> Vec<Word> {
    run_with_input(image, &[])
}

/// Run an image to completion with queued input, returning its outputs.
pub fn run_with_input(image: &[Word], inputs: &[Word]) -> Vec<Word> {
    let mut vm = Interpreter::with_input(image, inputs.iter().copied());
    vm.run().expect("program failed").to_vec()
}

/// Run an image to completion, returning the finished machine.
pub fn run_machine(image: &[Word]) -> Interpreter {
    let mut vm = Interpreter::new(image);
    vm.run().expect("program failed");
    vm
}

/// Assert that running an image fails with the given error code.
pub fn assert_fails_with(image: &[Word], inputs: &[Word], code: u32) -> IntcodeError {
    let mut vm = Interpreter::with_input(image, inputs.iter().copied());
    let err = vm.run().expect_err("program should fail");
    assert_eq!(err.code(), code, "unexpected error: {}", err);
    err
}

// =============================================================================
// Multi-Machine Drivers
// =============================================================================

/// Run a single pass of chained amplifiers, each fed its phase then the
/// previous amplifier's signal. Returns the final signal.
pub fn amplifier_chain(program: &[Word], phases: &[Word]) -> Word {
    phases.iter().fold(0, |signal, &phase| {
        let mut amp = Interpreter::with_input(program, [phase, signal]);
        amp.run_to_output()
            .expect("amplifier failed")
            .expect("amplifier produced no signal")
    })
}

/// Run amplifiers in a feedback loop until the first one halts. Returns the
/// last signal produced by the final amplifier.
pub fn feedback_loop(program: &[Word], phases: &[Word]) -> Word {
    let mut amps: Vec<Interpreter> = phases
        .iter()
        .map(|&phase| Interpreter::with_input(program, [phase]))
        .collect();
    let last = amps.len() - 1;
    let mut signal = 0;
    let mut thrust = 0;

    'outer: loop {
        for (i, amp) in amps.iter_mut().enumerate() {
            amp.push_input(signal);
            match amp.run_to_output().expect("amplifier failed") {
                Some(value) => signal = value,
                None => break 'outer,
            }
            if i == last {
                thrust = signal;
            }
        }
    }

    thrust
}

/// All orderings of `items`.
pub fn permutations(items: &[Word]) -> Vec<Vec<Word>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut result = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head);
            result.push(tail);
        }
    }
    result
}
