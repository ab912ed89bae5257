//! ASCII terminal helpers.
//!
//! Many programs talk in text: every input and output value is one character
//! code, with 10 ending a line. A program may also finish a text report with
//! one large value (a numeric answer) that is not a character at all.

use crate::core::Word;
use crate::vm::{InputQueue, IoHooks};

/// Largest value rendered as a character.
pub const MAX_CHAR: Word = 254;

const NEWLINE: Word = 10;

/// Encode one line of text as input values, newline included.
pub fn encode_line(line: &str) -> Vec<Word> {
    line.bytes()
        .map(Word::from)
        .chain(std::iter::once(NEWLINE))
        .collect()
}

/// Encode several lines, each followed by a newline.
pub fn encode_lines<I, S>(lines: I) -> Vec<Word>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .flat_map(|line| encode_line(line.as_ref()))
        .collect()
}

/// The character a value stands for, if it is one.
pub fn as_char(value: Word) -> Option<char> {
    u8::try_from(value)
        .ok()
        .filter(|b| Word::from(*b) <= MAX_CHAR)
        .map(char::from)
}

/// Render output values as text.
///
/// Values in `0..=254` become characters; anything else is written as its
/// decimal representation.
pub fn render(values: &[Word]) -> String {
    let mut text = String::with_capacity(values.len());
    for &value in values {
        match as_char(value) {
            Some(c) => text.push(c),
            None => text.push_str(&value.to_string()),
        }
    }
    text
}

/// Hooks for an interactive text program.
///
/// Output values are recorded as usual and also assembled into lines. When
/// the program asks for input and the queue is empty, `next_line` is called
/// with the partial line printed so far (typically a prompt such as
/// `"Command?"`); the line it returns is queued with a trailing newline.
/// Returning `None` leaves the queue empty, so the interpreter's input policy
/// applies.
pub struct AsciiTerminal<F> {
    lines: Vec<String>,
    current: String,
    next_line: F,
}

impl<F> AsciiTerminal<F>
where
    F: FnMut(&str) -> Option<String>,
{
    pub fn new(next_line: F) -> Self {
        Self {
            lines: Vec::new(),
            current: String::new(),
            next_line,
        }
    }

    /// Completed output lines, without their newlines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Text printed since the last newline.
    pub fn current_line(&self) -> &str {
        &self.current
    }

    /// Take the completed lines, leaving none buffered.
    pub fn take_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

impl<F> IoHooks for AsciiTerminal<F>
where
    F: FnMut(&str) -> Option<String>,
{
    fn pop_input(&mut self, queue: &mut InputQueue) -> Option<Word> {
        if queue.is_empty() {
            if let Some(line) = (self.next_line)(&self.current) {
                queue.extend(encode_line(&line));
            }
        }
        queue.pop_front()
    }

    fn push_output(&mut self, value: Word, outputs: &mut Vec<Word>) {
        outputs.push(value);
        match as_char(value) {
            Some('\n') => self.lines.push(std::mem::take(&mut self.current)),
            Some(c) => self.current.push(c),
            None => {}
        }
    }
}
