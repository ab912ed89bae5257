//! Error types for the IntCode machine.
//!
//! One taxonomy covers the decoder, the execution engine and the program
//! image loader, so callers can route on [`ErrorCategory`] without caring
//! which layer produced the failure.
//!
//! # Error Categories
//!
//! - **Decode**: the instruction word at the program counter is not valid
//! - **Execution**: the instruction is valid but its effect cannot be applied
//! - **Caller**: the embedding code broke its side of the contract
//! - **Image**: the textual program image could not be read
//!
//! Every runtime error is fatal for the step that raised it. The engine
//! never retries: instruction semantics are deterministic.

use std::fmt;

use thiserror::Error;

use super::address::{Address, Word};

/// Comprehensive error type for the IntCode machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntcodeError {
    // ═══════════════════════════════════════════════════════════════════
    // Decode Errors
    // ═══════════════════════════════════════════════════════════════════

    /// The low two digits of the instruction word select no opcode.
    #[error("[pc {pc}] Unknown opcode: {opcode}")]
    UnknownOpcode { opcode: Word, pc: Address },

    /// A parameter mode digit is outside {0, 1, 2}.
    #[error("[pc {pc}] Invalid addressing mode: {mode}")]
    InvalidAddressingMode { mode: Word, pc: Address },

    /// Non-zero mode digits beyond the opcode's parameter count.
    #[error("[pc {pc}] Malformed instruction {word}: mode digits beyond its {arity} parameter(s)")]
    MalformedInstruction { word: Word, arity: usize, pc: Address },

    // ═══════════════════════════════════════════════════════════════════
    // Execution Errors
    // ═══════════════════════════════════════════════════════════════════

    /// An instruction tried to write through immediate mode.
    #[error("[pc {pc}] Invalid write target: {opcode} cannot write through immediate mode")]
    InvalidWriteTarget { opcode: &'static str, pc: Address },

    /// An effective address (or jump target) came out negative.
    #[error("[pc {pc}] Negative address: {target}")]
    NegativeAddress { target: Word, pc: Address },

    /// Add, multiply or a relative-base adjustment left the 64-bit range.
    #[error("[pc {pc}] Arithmetic overflow in {opcode}: {lhs}, {rhs}")]
    ArithmeticOverflow { opcode: &'static str, lhs: Word, rhs: Word, pc: Address },

    // ═══════════════════════════════════════════════════════════════════
    // Caller Errors
    // ═══════════════════════════════════════════════════════════════════

    /// INPUT executed with nothing queued and no hook supplying a value.
    #[error("[pc {pc}] Input exhausted: INPUT executed with an empty queue")]
    InputExhausted { pc: Address },

    /// The caller-configured step budget ran out.
    #[error("Step limit exceeded: {limit} steps")]
    StepLimitExceeded { limit: u64 },

    // ═══════════════════════════════════════════════════════════════════
    // Image Errors
    // ═══════════════════════════════════════════════════════════════════

    /// A token in the program image is not a base-10 integer.
    #[error("Invalid image word at position {index}: '{token}'")]
    InvalidImageWord { index: usize, token: String },

    /// Reading the program image failed.
    #[error("I/O error reading '{path}': {message}")]
    Io { path: String, message: String },
}

impl IntcodeError {
    /// Attach the program counter to a decode error.
    ///
    /// The decoder works on bare instruction words; the engine fills in
    /// where the word came from.
    pub fn at(self, at_pc: Address) -> Self {
        match self {
            IntcodeError::UnknownOpcode { opcode, .. } => {
                IntcodeError::UnknownOpcode { opcode, pc: at_pc }
            }
            IntcodeError::InvalidAddressingMode { mode, .. } => {
                IntcodeError::InvalidAddressingMode { mode, pc: at_pc }
            }
            IntcodeError::MalformedInstruction { word, arity, .. } => {
                IntcodeError::MalformedInstruction { word, arity, pc: at_pc }
            }
            other => other,
        }
    }

    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            IntcodeError::UnknownOpcode { .. } |
            IntcodeError::InvalidAddressingMode { .. } |
            IntcodeError::MalformedInstruction { .. } => ErrorCategory::Decode,

            IntcodeError::InvalidWriteTarget { .. } |
            IntcodeError::NegativeAddress { .. } |
            IntcodeError::ArithmeticOverflow { .. } => ErrorCategory::Execution,

            IntcodeError::InputExhausted { .. } |
            IntcodeError::StepLimitExceeded { .. } => ErrorCategory::Caller,

            IntcodeError::InvalidImageWord { .. } |
            IntcodeError::Io { .. } => ErrorCategory::Image,
        }
    }

    /// Get the error code for programmatic handling.
    pub fn code(&self) -> u32 {
        match self {
            // Decode: 1000-1999
            IntcodeError::UnknownOpcode { .. } => 1001,
            IntcodeError::InvalidAddressingMode { .. } => 1002,
            IntcodeError::MalformedInstruction { .. } => 1003,
            // Execution: 2000-2999
            IntcodeError::InvalidWriteTarget { .. } => 2001,
            IntcodeError::NegativeAddress { .. } => 2002,
            IntcodeError::ArithmeticOverflow { .. } => 2003,
            // Caller: 3000-3999
            IntcodeError::InputExhausted { .. } => 3001,
            IntcodeError::StepLimitExceeded { .. } => 3002,
            // Image: 4000-4999
            IntcodeError::InvalidImageWord { .. } => 4001,
            IntcodeError::Io { .. } => 4002,
        }
    }

    /// Whether the driving code, not the program, is at fault.
    pub fn is_caller_error(&self) -> bool {
        self.category() == ErrorCategory::Caller
    }

    /// Program counter of the failing instruction, if the error has one.
    pub fn pc(&self) -> Option<Address> {
        match self {
            IntcodeError::UnknownOpcode { pc, .. } |
            IntcodeError::InvalidAddressingMode { pc, .. } |
            IntcodeError::MalformedInstruction { pc, .. } |
            IntcodeError::InvalidWriteTarget { pc, .. } |
            IntcodeError::NegativeAddress { pc, .. } |
            IntcodeError::ArithmeticOverflow { pc, .. } |
            IntcodeError::InputExhausted { pc } => Some(*pc),
            _ => None,
        }
    }
}

/// Error category for filtering and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Decode,
    Execution,
    Caller,
    Image,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Decode => write!(f, "decode"),
            ErrorCategory::Execution => write!(f, "execution"),
            ErrorCategory::Caller => write!(f, "caller"),
            ErrorCategory::Image => write!(f, "image"),
        }
    }
}

/// Result type alias for IntCode operations.
pub type IntcodeResult<T> = Result<T, IntcodeError>;
