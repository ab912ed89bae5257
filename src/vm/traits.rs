//! Input/output hooks: the interpreter's extension point.
//!
//! All puzzle-specific behavior (rendering a screen, routing packets between
//! machines, prompting a human) lives behind [`IoHooks`]. The engine itself
//! never changes; embedders swap the hooks.
//!
//! # Design
//!
//! Each hook receives the interpreter's own input queue or output sequence,
//! so an override can defer to the default behavior for some values and
//! intercept others:
//!
//! ```
//! use intcode::{Interpreter, IoHooks, InputQueue, Word};
//!
//! /// Doubles every output before recording it.
//! struct Doubler;
//!
//! impl IoHooks for Doubler {
//!     fn push_output(&mut self, value: Word, outputs: &mut Vec<Word>) {
//!         outputs.push(value * 2);
//!     }
//! }
//!
//! let mut vm = Interpreter::with_hooks(vec![104, 21, 99], Doubler);
//! assert_eq!(vm.run().unwrap(), &[42]);
//! ```

use std::collections::VecDeque;

use crate::core::Word;

/// The interpreter's pending input values, consumed front first.
pub type InputQueue = VecDeque<Word>;

/// Overridable input and output behavior.
///
/// Contract: `pop_input` returns the next logical input integer (or `None`
/// when none is available), and `push_output` records or forwards exactly
/// one integer per call.
pub trait IoHooks {
    /// Supply the next input value.
    ///
    /// Returning `None` means no input is available; the interpreter's
    /// [`InputPolicy`](crate::vm::InputPolicy) decides what happens next.
    fn pop_input(&mut self, queue: &mut InputQueue) -> Option<Word> {
        queue.pop_front()
    }

    /// Handle one value produced by an OUTPUT instruction.
    fn push_output(&mut self, value: Word, outputs: &mut Vec<Word>) {
        outputs.push(value);
    }
}

/// Default hooks: read from the queue, append to the output sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueIo;

impl IoHooks for QueueIo {}

/// Hooks built from a pair of closures.
///
/// ```
/// use intcode::{FnHooks, InputQueue, Interpreter, Word};
///
/// let mut seen = Vec::new();
/// let hooks = FnHooks::new(
///     |_queue: &mut InputQueue| Some(7),
///     |value: Word, _outputs: &mut Vec<Word>| seen.push(value),
/// );
/// let mut vm = Interpreter::with_hooks(vec![3, 0, 4, 0, 99], hooks);
/// vm.run().unwrap();
/// drop(vm);
/// assert_eq!(seen, vec![7]);
/// ```
pub struct FnHooks<I, O> {
    input: I,
    output: O,
}

impl<I, O> FnHooks<I, O>
where
    I: FnMut(&mut InputQueue) -> Option<Word>,
    O: FnMut(Word, &mut Vec<Word>),
{
    /// Create hooks from an input closure and an output closure.
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }
}

impl<I, O> IoHooks for FnHooks<I, O>
where
    I: FnMut(&mut InputQueue) -> Option<Word>,
    O: FnMut(Word, &mut Vec<Word>),
{
    fn pop_input(&mut self, queue: &mut InputQueue) -> Option<Word> {
        (self.input)(queue)
    }

    fn push_output(&mut self, value: Word, outputs: &mut Vec<Word>) {
        (self.output)(value, outputs)
    }
}

impl<H: IoHooks + ?Sized> IoHooks for &mut H {
    fn pop_input(&mut self, queue: &mut InputQueue) -> Option<Word> {
        (**self).pop_input(queue)
    }

    fn push_output(&mut self, value: Word, outputs: &mut Vec<Word>) {
        (**self).push_output(value, outputs)
    }
}

impl<H: IoHooks + ?Sized> IoHooks for Box<H> {
    fn pop_input(&mut self, queue: &mut InputQueue) -> Option<Word> {
        (**self).pop_input(queue)
    }

    fn push_output(&mut self, value: Word, outputs: &mut Vec<Word>) {
        (**self).push_output(value, outputs)
    }
}
