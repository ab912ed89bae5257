//! Virtual machine for IntCode programs.
//!
//! # Architecture
//!
//! - `interpreter`: the execution engine, its configuration and status
//! - `traits`: the [`IoHooks`] extension point for input and output
//!
//! The engine has no knowledge of what a program is for. Screens, packet
//! routing and text prompts are hooks supplied by the embedder.

pub mod interpreter;
pub mod traits;

pub use interpreter::{InputPolicy, Interpreter, InterpreterConfig, VmStatus};
pub use traits::{FnHooks, InputQueue, IoHooks, QueueIo};
