//! The IntCode instruction set.
//!
//! This is the one shared definition of opcodes, parameter counts and
//! addressing modes. Everything that needs to know what an instruction word
//! means (the interpreter, tooling, tests) goes through [`decode`].
//!
//! An instruction word packs the opcode into its low two decimal digits and
//! one addressing-mode digit per parameter above that, least significant
//! digit for the first parameter:
//!
//! ```text
//!   1002  ->  opcode 02 (MUL), modes [position, immediate, position]
//!   ^^      mode digits, read right to left; missing digits are 0
//! ```

use std::fmt;

use crate::core::{IntcodeError, IntcodeResult, Word};

/// Revision of the instruction set implemented here.
///
/// Revision 1 is the full table: arithmetic, I/O, jumps, comparisons and
/// the relative base.
pub const ISA_VERSION: u32 = 1;

/// Largest parameter count of any opcode.
pub const MAX_PARAMS: usize = 3;

/// All operations available in IntCode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `a + b -> c`
    Add,
    /// `a * b -> c`
    Multiply,
    /// `input -> a`
    Input,
    /// `a -> output`
    Output,
    /// `if a != 0 { pc = b }`
    JumpIfTrue,
    /// `if a == 0 { pc = b }`
    JumpIfFalse,
    /// `(a < b) as 1/0 -> c`
    LessThan,
    /// `(a == b) as 1/0 -> c`
    Equals,
    /// `relative_base += a`
    AdjustRelativeBase,
    /// Halt the machine permanently.
    Stop,
}

impl Opcode {
    /// Look up an opcode by its two-digit code.
    pub fn from_code(code: Word) -> Option<Self> {
        match code {
            1 => Some(Opcode::Add),
            2 => Some(Opcode::Multiply),
            3 => Some(Opcode::Input),
            4 => Some(Opcode::Output),
            5 => Some(Opcode::JumpIfTrue),
            6 => Some(Opcode::JumpIfFalse),
            7 => Some(Opcode::LessThan),
            8 => Some(Opcode::Equals),
            9 => Some(Opcode::AdjustRelativeBase),
            99 => Some(Opcode::Stop),
            _ => None,
        }
    }

    /// The two-digit code of this opcode.
    pub fn code(&self) -> Word {
        match self {
            Opcode::Add => 1,
            Opcode::Multiply => 2,
            Opcode::Input => 3,
            Opcode::Output => 4,
            Opcode::JumpIfTrue => 5,
            Opcode::JumpIfFalse => 6,
            Opcode::LessThan => 7,
            Opcode::Equals => 8,
            Opcode::AdjustRelativeBase => 9,
            Opcode::Stop => 99,
        }
    }

    /// Number of parameter words following the instruction word.
    pub fn arity(&self) -> usize {
        match self {
            Opcode::Add | Opcode::Multiply | Opcode::LessThan | Opcode::Equals => 3,
            Opcode::JumpIfTrue | Opcode::JumpIfFalse => 2,
            Opcode::Input | Opcode::Output | Opcode::AdjustRelativeBase => 1,
            Opcode::Stop => 0,
        }
    }

    /// Index of the parameter this opcode writes through, if any.
    pub fn write_param(&self) -> Option<usize> {
        match self {
            Opcode::Add | Opcode::Multiply | Opcode::LessThan | Opcode::Equals => Some(2),
            Opcode::Input => Some(0),
            _ => None,
        }
    }

    /// Mnemonic used in traces and error messages.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Add => "ADD",
            Opcode::Multiply => "MUL",
            Opcode::Input => "IN",
            Opcode::Output => "OUT",
            Opcode::JumpIfTrue => "JT",
            Opcode::JumpIfFalse => "JF",
            Opcode::LessThan => "LT",
            Opcode::Equals => "EQ",
            Opcode::AdjustRelativeBase => "ARB",
            Opcode::Stop => "HALT",
        }
    }

    /// Every opcode in code order.
    pub fn all() -> [Opcode; 10] {
        [
            Opcode::Add,
            Opcode::Multiply,
            Opcode::Input,
            Opcode::Output,
            Opcode::JumpIfTrue,
            Opcode::JumpIfFalse,
            Opcode::LessThan,
            Opcode::Equals,
            Opcode::AdjustRelativeBase,
            Opcode::Stop,
        ]
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// Parameter addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// The parameter is an address to read or write through.
    #[default]
    Position,
    /// The parameter is the value itself. Never valid for writes.
    Immediate,
    /// The parameter is an offset from the relative base.
    Relative,
}

impl Mode {
    /// Decode a single mode digit.
    pub fn from_digit(digit: Word) -> IntcodeResult<Self> {
        match digit {
            0 => Ok(Mode::Position),
            1 => Ok(Mode::Immediate),
            2 => Ok(Mode::Relative),
            mode => Err(IntcodeError::InvalidAddressingMode { mode, pc: 0 }),
        }
    }

    /// The digit encoding this mode.
    pub fn digit(&self) -> Word {
        match self {
            Mode::Position => 0,
            Mode::Immediate => 1,
            Mode::Relative => 2,
        }
    }
}

/// A decoded instruction word: opcode plus one mode per parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    modes: [Mode; MAX_PARAMS],
}

impl Instruction {
    /// Build an instruction from an opcode and its modes.
    ///
    /// Modes past the opcode's arity are ignored; missing ones default to
    /// position mode.
    pub fn new(opcode: Opcode, modes: &[Mode]) -> Self {
        let mut packed = [Mode::Position; MAX_PARAMS];
        for (slot, mode) in packed.iter_mut().zip(modes.iter().take(opcode.arity())) {
            *slot = *mode;
        }
        Self { opcode, modes: packed }
    }

    /// Exactly one mode per declared parameter.
    pub fn modes(&self) -> &[Mode] {
        &self.modes[..self.opcode.arity()]
    }

    /// Mode of parameter `index`.
    pub fn mode(&self, index: usize) -> Mode {
        self.modes[index]
    }

    /// Number of words this instruction occupies, including its own.
    pub fn width(&self) -> u64 {
        1 + self.opcode.arity() as u64
    }

    /// Re-encode into an instruction word.
    pub fn encode(&self) -> Word {
        self.modes()
            .iter()
            .rev()
            .fold(0, |acc, mode| acc * 10 + mode.digit())
            * 100
            + self.opcode.code()
    }
}

/// Decode a raw instruction word.
///
/// Errors carry program counter 0; the interpreter re-targets them with
/// [`IntcodeError::at`].
pub fn decode(word: Word) -> IntcodeResult<Instruction> {
    if word < 0 {
        return Err(IntcodeError::UnknownOpcode { opcode: word, pc: 0 });
    }

    let opcode = Opcode::from_code(word % 100)
        .ok_or(IntcodeError::UnknownOpcode { opcode: word % 100, pc: 0 })?;

    let mut modes = [Mode::Position; MAX_PARAMS];
    let mut rest = word / 100;
    for slot in modes.iter_mut().take(opcode.arity()) {
        *slot = Mode::from_digit(rest % 10)?;
        rest /= 10;
    }

    if rest != 0 {
        return Err(IntcodeError::MalformedInstruction {
            word,
            arity: opcode.arity(),
            pc: 0,
        });
    }

    Ok(Instruction { opcode, modes })
}
