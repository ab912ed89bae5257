//! IntCode: a small register-less virtual machine over unbounded integer memory.
//!
//! ```
//! use intcode::{parse_image, Interpreter};
//!
//! let image = parse_image("3,0,4,0,99").unwrap();
//! let mut vm = Interpreter::with_input(image, [42]);
//! assert_eq!(vm.run().unwrap(), &[42]);
//! ```

// ═══════════════════════════════════════════════════════════════════════════
// Layer 0: Core (No internal dependencies)
// ═══════════════════════════════════════════════════════════════════════════
pub mod core;

// ═══════════════════════════════════════════════════════════════════════════
// Layer 1: Instruction Set (depends on core)
// ═══════════════════════════════════════════════════════════════════════════
pub mod isa;

// ═══════════════════════════════════════════════════════════════════════════
// Layer 2: VM (depends on core, isa)
// ═══════════════════════════════════════════════════════════════════════════
pub mod vm;

// ═══════════════════════════════════════════════════════════════════════════
// Layer 3: Runtime (depends on core, vm)
// ═══════════════════════════════════════════════════════════════════════════
pub mod runtime;

// ═══════════════════════════════════════════════════════════════════════════
// Cross-cutting
// ═══════════════════════════════════════════════════════════════════════════
pub mod audit;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports
// ═══════════════════════════════════════════════════════════════════════════

pub use core::{Address, ErrorCategory, IntcodeError, IntcodeResult, Memory, Word};
pub use isa::{decode, Instruction, Mode, Opcode, ISA_VERSION};
pub use vm::{FnHooks, InputPolicy, InputQueue, Interpreter, InterpreterConfig, IoHooks, QueueIo, VmStatus};
pub use runtime::{encode_line, encode_lines, format_image, load_image, parse_image, read_image, render, AsciiTerminal};
