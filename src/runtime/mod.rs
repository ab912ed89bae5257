//! Runtime layer: everything between a program on disk and a running machine.
//!
//! - **image**: the textual program image format
//! - **ascii**: encoding helpers and hooks for text-mode programs

pub mod ascii;
pub mod image;

pub use ascii::{as_char, encode_line, encode_lines, render, AsciiTerminal};
pub use image::{format_image, load_image, parse_image, read_image};
