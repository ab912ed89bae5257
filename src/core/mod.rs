//! Core types for the IntCode virtual machine.
//!
//! This module defines the fundamental data types that everything else
//! builds on:
//!
//! - **Address / Word**: effective addresses and cell values
//! - **Memory**: sparse, unbounded, zero-default memory
//! - **Error**: the error taxonomy shared by decoder, engine and loader
//!
//! # Layer 0 - No Internal Dependencies

pub mod address;
pub mod error;
pub mod memory;

pub use address::{Address, Word, DENSE_SLACK, to_address};
pub use error::{IntcodeError, IntcodeResult, ErrorCategory};
pub use memory::Memory;
