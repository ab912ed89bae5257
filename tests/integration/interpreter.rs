//! Integration tests for the interpreter.
//!
//! Component: VM (Interpreter)
//!
//! These tests verify:
//! - Instruction semantics across all opcodes and addressing modes
//! - Reference programs with known outputs
//! - Error reporting and step atomicity
//! - Input/output hooks
//! - Configuration (input policy, step budget, labels)

#![cfg(test)]

use crate::common::programs::*;
use crate::common::*;

use intcode::*;

// =============================================================================
// Reference Programs
// =============================================================================

mod reference_programs {
    use super::*;

    #[test]
    fn add_in_place_writes_address_zero() {
        // Arrange & Act
        let vm = run_machine(&ADD_IN_PLACE);

        // Assert: 1 + 1 = 2
        assert_eq!(vm.read_memory(0), 2);
        assert!(vm.outputs().is_empty());
    }

    #[test]
    fn immediate_operand_may_be_negative() {
        let vm = run_machine(&IMMEDIATE_ADD);

        // Address 4 held 0 and becomes STOP
        assert_eq!(vm.read_memory(4), 99);
        assert!(vm.is_halted());
    }

    #[test]
    fn quine_outputs_itself() {
        // Arrange & Act
        let outputs = run(&QUINE);

        // Assert
        assert_eq!(outputs, QUINE.to_vec());
    }

    #[test]
    fn sixteen_digit_product() {
        let outputs = run(&SIXTEEN_DIGITS);

        assert_eq!(outputs, vec![1_219_070_632_396_864]);
        assert_eq!(outputs[0].to_string().len(), 16);
    }

    #[test]
    fn large_literal_passes_through() {
        assert_eq!(run(&LARGE_LITERAL), vec![1_125_899_906_842_624]);
    }

    #[test]
    fn multi_instruction_arithmetic() {
        let vm = run_machine(&[1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50]);

        // (30 + 40) * 50
        assert_eq!(vm.read_memory(0), 3500);
        assert_eq!(vm.read_memory(3), 70);
    }

    #[test]
    fn echo() {
        assert_eq!(run_with_input(&ECHO, &[-12345]), vec![-12345]);
    }
}

// =============================================================================
// Comparison and Jump Tests
// =============================================================================

mod comparisons_and_jumps {
    use super::*;

    #[test]
    fn equals_in_position_mode() {
        assert_eq!(run_with_input(&EQUALS_8_POSITION, &[8]), vec![1]);
        assert_eq!(run_with_input(&EQUALS_8_POSITION, &[7]), vec![0]);
    }

    #[test]
    fn less_than_in_immediate_mode() {
        assert_eq!(run_with_input(&LESS_THAN_8_IMMEDIATE, &[7]), vec![1]);
        assert_eq!(run_with_input(&LESS_THAN_8_IMMEDIATE, &[8]), vec![0]);
        assert_eq!(run_with_input(&LESS_THAN_8_IMMEDIATE, &[-100]), vec![1]);
    }

    #[test]
    fn jump_on_zero() {
        assert_eq!(run_with_input(&NON_ZERO_POSITION, &[0]), vec![0]);
        assert_eq!(run_with_input(&NON_ZERO_POSITION, &[5]), vec![1]);
    }

    #[test]
    fn three_way_comparison() {
        // Arrange
        let cases = [(-3, 999), (7, 999), (8, 1000), (9, 1001), (1_000_000, 1001)];

        for (input, expected) in cases {
            // Act
            let outputs = run_with_input(&COMPARE_TO_8, &[input]);

            // Assert
            assert_eq!(outputs, vec![expected], "input {}", input);
        }
    }
}

// =============================================================================
// Relative Mode Tests
// =============================================================================

mod relative_mode {
    use super::*;

    #[test]
    fn relative_read_and_write() {
        // ARB 2000; IN rel[19] (address 2019); OUT rel[19]
        let mut vm = Interpreter::with_input([109, 2000, 203, 19, 204, 19, 99], [55]);

        assert_eq!(vm.run().unwrap(), &[55]);
        assert_eq!(vm.read_memory(2019), 55);
        assert_eq!(vm.relative_base(), 2000);
    }

    #[test]
    fn relative_base_can_go_negative_temporarily() {
        // ARB -5; OUT rel[12] (address 7); ARB 5
        let mut vm = Interpreter::new([109, -5, 204, 12, 109, 5, 99, 42]);

        assert_eq!(vm.run().unwrap(), &[42]);
        assert_eq!(vm.relative_base(), 0);
    }

    #[test]
    fn negative_effective_address_is_rejected() {
        // ARB -5; OUT rel[2] -> address -3
        let err = assert_fails_with(&[109, -5, 204, 2, 99], &[], 2002);

        assert_eq!(err, IntcodeError::NegativeAddress { target: -3, pc: 2 });
    }
}

// =============================================================================
// Error Tests
// =============================================================================

mod errors {
    use super::*;

    #[test]
    fn unknown_opcode() {
        let err = assert_fails_with(&[1101, 1, 1, 5, 98], &[], 1001);

        assert_eq!(err, IntcodeError::UnknownOpcode { opcode: 98, pc: 4 });
        assert_eq!(err.category(), ErrorCategory::Decode);
    }

    #[test]
    fn invalid_addressing_mode() {
        let err = assert_fails_with(&[104, 0, 304, 0, 99], &[], 1002);

        assert_eq!(err, IntcodeError::InvalidAddressingMode { mode: 3, pc: 2 });
    }

    #[test]
    fn write_through_immediate_mode() {
        let err = assert_fails_with(&[103, 0, 99], &[1], 2001);

        assert_eq!(err, IntcodeError::InvalidWriteTarget { opcode: "IN", pc: 0 });
    }

    #[test]
    fn input_exhausted_leaves_machine_resumable() {
        // Arrange
        let mut vm = Interpreter::with_input(&COMPARE_TO_8[..], []);

        // Act
        let err = vm.run().unwrap_err();

        // Assert: nothing changed
        assert_eq!(err, IntcodeError::InputExhausted { pc: 0 });
        assert!(err.is_caller_error());
        assert_eq!(vm.instruction_ptr(), 0);
        assert_eq!(vm.steps_executed(), 0);
        assert_eq!(vm.memory(), &Memory::from_image(&COMPARE_TO_8));

        // Supplying input later resumes normally
        vm.push_input(8);
        assert_eq!(vm.run().unwrap(), &[1000]);
    }

    #[test]
    fn failed_step_does_not_emit_output() {
        // OUT 1; ARB -1; OUT rel[-1] -> address -2
        let mut vm = Interpreter::new([104, 1, 109, -1, 204, -1, 99]);

        let err = vm.run().unwrap_err();

        assert!(matches!(err, IntcodeError::NegativeAddress { .. }));
        assert_eq!(vm.outputs(), &[1]);
        assert_eq!(vm.instruction_ptr(), 4);
        assert_eq!(vm.relative_base(), -1);
    }

    #[test]
    fn running_off_the_image_reads_zero_opcode() {
        let err = assert_fails_with(&[1101, 1, 1, 5], &[], 1001);

        assert_eq!(err.pc(), Some(4));
    }
}

// =============================================================================
// Drive Mode Tests
// =============================================================================

mod drive_modes {
    use super::*;

    #[test]
    fn run_to_output_returns_one_value_at_a_time() {
        let mut vm = Interpreter::new(QUINE);

        for expected in QUINE {
            assert_eq!(vm.run_to_output().unwrap(), Some(expected));
            assert_eq!(vm.outputs(), &[expected]);
        }
        assert_eq!(vm.run_to_output().unwrap(), None);
        assert!(vm.is_halted());
    }

    #[test]
    fn run_after_halt_is_a_no_op() {
        let mut vm = run_machine(&LARGE_LITERAL);
        let steps = vm.steps_executed();

        assert_eq!(vm.run().unwrap(), &[1_125_899_906_842_624]);
        assert_eq!(vm.step().unwrap(), VmStatus::Halted);
        assert_eq!(vm.steps_executed(), steps);
    }

    #[test]
    fn take_outputs_drains() {
        let mut vm = Interpreter::new([104, 1, 104, 2, 99]);
        vm.run().unwrap();

        assert_eq!(vm.take_outputs(), vec![1, 2]);
        assert!(vm.outputs().is_empty());
    }

    #[test]
    fn status_tracks_halting() {
        let mut vm = Interpreter::new([104, 1, 99]);

        assert_eq!(vm.status(), VmStatus::Running);
        assert_eq!(vm.step().unwrap(), VmStatus::Running);
        assert_eq!(vm.step().unwrap(), VmStatus::Halted);
        assert_eq!(vm.status(), VmStatus::Halted);
    }

    #[test]
    fn into_parts_returns_final_state() {
        let vm = run_machine(&ADD_IN_PLACE);

        let (memory, outputs, hooks) = vm.into_parts();

        assert_eq!(memory.read(0), 2);
        assert!(outputs.is_empty());
        assert_eq!(hooks, QueueIo);
    }
}

// =============================================================================
// Hook Tests
// =============================================================================

mod hooks {
    use super::*;

    /// Supplies a fixed value whenever the queue is empty.
    struct Fallback(Word);

    impl IoHooks for Fallback {
        fn pop_input(&mut self, queue: &mut InputQueue) -> Option<Word> {
            queue.pop_front().or(Some(self.0))
        }
    }

    /// Counts outputs without recording them.
    #[derive(Default)]
    struct Counter {
        seen: usize,
    }

    impl IoHooks for Counter {
        fn push_output(&mut self, _value: Word, _outputs: &mut Vec<Word>) {
            self.seen += 1;
        }
    }

    #[test]
    fn input_hook_falls_back_to_queue_first() {
        // Arrange
        let mut vm = Interpreter::with_hooks([3, 0, 4, 0, 3, 0, 4, 0, 99], Fallback(-7));
        vm.push_input(3);

        // Act & Assert: queued value first, then the fallback
        assert_eq!(vm.run().unwrap(), &[3, -7]);
    }

    #[test]
    fn output_hook_can_swallow_values() {
        let mut vm = Interpreter::with_hooks(QUINE, Counter::default());

        vm.run().unwrap();

        assert!(vm.outputs().is_empty());
        assert_eq!(vm.hooks().seen, QUINE.len());
    }

    #[test]
    fn borrowed_hooks_outlive_the_machine() {
        let mut counter = Counter::default();
        {
            let mut vm = Interpreter::with_hooks(LARGE_LITERAL, &mut counter);
            vm.run().unwrap();
        }
        assert_eq!(counter.seen, 1);
    }

    #[test]
    fn boxed_hooks_allow_runtime_choice() {
        let choose = |count: bool| -> Box<dyn IoHooks> {
            if count { Box::new(Counter::default()) } else { Box::new(QueueIo) }
        };

        let mut counting = Interpreter::with_hooks(ECHO, choose(true));
        counting.push_input(1);
        assert!(counting.run().unwrap().is_empty());

        let mut plain = Interpreter::with_hooks(ECHO, choose(false));
        plain.push_input(1);
        assert_eq!(plain.run().unwrap(), &[1]);
    }

    #[test]
    fn closure_hooks() {
        let mut log = Vec::new();
        let hooks = FnHooks::new(
            |queue: &mut InputQueue| queue.pop_front().map(|v| v * 2),
            |value: Word, outputs: &mut Vec<Word>| {
                log.push(value);
                outputs.push(value);
            },
        );
        let mut vm = Interpreter::with_hooks(ECHO, hooks);
        vm.push_input(21);

        assert_eq!(vm.run().unwrap(), &[42]);
        drop(vm);
        assert_eq!(log, vec![42]);
    }
}

// =============================================================================
// Configuration Tests
// =============================================================================

mod configuration {
    use super::*;

    #[test]
    fn idle_policy_feeds_sentinel_and_flags_idle() {
        // Arrange
        let mut vm = Interpreter::with_config(ECHO, QueueIo, InterpreterConfig::networked(-1));

        // Act
        vm.step().unwrap();

        // Assert
        assert!(vm.is_idle());
        assert_eq!(vm.read_memory(0), -1);

        // Output clears the flag
        vm.step().unwrap();
        assert!(!vm.is_idle());
        assert_eq!(vm.outputs(), &[-1]);
    }

    #[test]
    fn step_budget_spans_the_lifetime() {
        let config = InterpreterConfig::default().with_max_steps(10);
        let mut vm = Interpreter::with_config(counter(100), QueueIo, config);

        let err = vm.run().unwrap_err();

        assert_eq!(err, IntcodeError::StepLimitExceeded { limit: 10 });
        assert_eq!(err.category(), ErrorCategory::Caller);
        assert_eq!(vm.steps_executed(), 10);
        assert_eq!(vm.run().unwrap_err(), err);
    }

    #[test]
    fn step_budget_large_enough_to_finish() {
        let config = InterpreterConfig::strict().with_max_steps(302);
        let mut vm = Interpreter::with_config(counter(100), QueueIo, config);

        assert_eq!(vm.run().unwrap(), &[100]);
        assert_eq!(vm.steps_executed(), 302);
    }

    #[test]
    fn label_is_kept() {
        let config = InterpreterConfig::strict().with_label("amp-A");
        let vm = Interpreter::with_config(ECHO, QueueIo, config);

        assert_eq!(vm.config().label.as_deref(), Some("amp-A"));
        assert_eq!(vm.config().input_policy, InputPolicy::Strict);
    }

    #[test]
    fn audit_logging_records_halts() {
        // A global logger may already exist from another test; either way one is installed
        audit::init_stdout_logger();
        let logger = audit::global_logger().expect("logger installed");
        let before = logger.sequence();

        let config = InterpreterConfig::strict().with_label("audited");
        let mut vm = Interpreter::with_config(ECHO, QueueIo, config);
        let _ = vm.run();
        vm.push_input(5);
        vm.run().unwrap();

        // One failure entry and one halt entry
        assert!(logger.sequence() >= before + 2);
    }
}
