//! The IntCode interpreter.
//!
//! An [`Interpreter`] owns one program's memory, program counter, relative
//! base, input queue and output sequence. It executes one instruction per
//! [`step`](Interpreter::step) and offers two drive modes on top:
//!
//! - [`run`](Interpreter::run): step until the machine halts
//! - [`run_to_output`](Interpreter::run_to_output): step until one output
//!   appears or the machine halts, then hand control back
//!
//! Callers that coordinate several machines (amplifier chains, networks of
//! nodes) interleave these calls themselves; instances share nothing.

use crate::audit::{self, ActionCategory, AuditEntry};
use crate::core::{to_address, Address, IntcodeError, IntcodeResult, Memory, Word};
use crate::isa::{decode, Instruction, Mode, Opcode, MAX_PARAMS};

use super::traits::{InputQueue, IoHooks, QueueIo};

/// Execution state of an interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmStatus {
    /// More instructions may execute.
    Running,
    /// STOP executed. Terminal.
    Halted,
}

/// What happens when INPUT finds no value available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputPolicy {
    /// Fail the step with [`IntcodeError::InputExhausted`].
    #[default]
    Strict,
    /// Feed `sentinel` to the program and mark the interpreter idle.
    ///
    /// Networked programs poll for packets and expect a placeholder value
    /// when nothing has arrived; the idle flag lets the caller tell a
    /// polling machine from a busy one.
    Idle { sentinel: Word },
}

/// Configuration for an interpreter instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Behavior on empty input.
    pub input_policy: InputPolicy,
    /// Maximum instructions over the instance's lifetime (`None` = unlimited).
    pub max_steps: Option<u64>,
    /// Name used in audit entries.
    pub label: Option<String>,
}

impl InterpreterConfig {
    /// Strict mode: empty input is a hard failure, no step budget.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Networked mode: empty input yields `sentinel` and marks the machine idle.
    pub fn networked(sentinel: Word) -> Self {
        Self {
            input_policy: InputPolicy::Idle { sentinel },
            ..Self::default()
        }
    }

    /// Set the audit label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set a step budget.
    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }
}

/// The IntCode virtual machine.
#[derive(Debug, Clone)]
pub struct Interpreter<H: IoHooks = QueueIo> {
    memory: Memory,
    instruction_ptr: Address,
    relative_base: Word,
    inputs: InputQueue,
    outputs: Vec<Word>,
    status: VmStatus,
    idle: bool,
    steps: u64,
    config: InterpreterConfig,
    hooks: H,
}

impl Interpreter<QueueIo> {
    /// Create an interpreter over a copy of `image` with the default hooks.
    pub fn new(image: impl AsRef<[Word]>) -> Self {
        Self::with_hooks(image, QueueIo)
    }

    /// Create an interpreter with initial input already queued.
    pub fn with_input(image: impl AsRef<[Word]>, inputs: impl IntoIterator<Item = Word>) -> Self {
        let mut vm = Self::new(image);
        vm.extend_input(inputs);
        vm
    }
}

impl<H: IoHooks> Interpreter<H> {
    /// Create an interpreter with custom input/output hooks.
    pub fn with_hooks(image: impl AsRef<[Word]>, hooks: H) -> Self {
        Self::with_config(image, hooks, InterpreterConfig::default())
    }

    /// Create an interpreter with custom hooks and configuration.
    pub fn with_config(image: impl AsRef<[Word]>, hooks: H, config: InterpreterConfig) -> Self {
        Self {
            memory: Memory::from_image(image.as_ref()),
            instruction_ptr: 0,
            relative_base: 0,
            inputs: InputQueue::new(),
            outputs: Vec::new(),
            status: VmStatus::Running,
            idle: false,
            steps: 0,
            config,
            hooks,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Drive
    // ═══════════════════════════════════════════════════════════════════

    /// Execute exactly one instruction.
    ///
    /// A failed step changes nothing: registers, memory and the output
    /// sequence are exactly as before the call. Stepping a halted machine
    /// does nothing and reports [`VmStatus::Halted`].
    pub fn step(&mut self) -> IntcodeResult<VmStatus> {
        if self.status == VmStatus::Halted {
            return Ok(VmStatus::Halted);
        }

        if let Some(limit) = self.config.max_steps {
            if self.steps >= limit {
                let err = IntcodeError::StepLimitExceeded { limit };
                self.report_failure(&err);
                return Err(err);
            }
        }

        match self.execute_at(self.instruction_ptr) {
            Ok(()) => {
                self.steps += 1;
                if self.status == VmStatus::Halted {
                    self.report_halt();
                }
                Ok(self.status)
            }
            Err(err) => {
                self.report_failure(&err);
                Err(err)
            }
        }
    }

    /// Run until the machine halts; returns everything output so far.
    pub fn run(&mut self) -> IntcodeResult<&[Word]> {
        while self.status == VmStatus::Running {
            self.step()?;
        }
        Ok(&self.outputs)
    }

    /// Run until one new output is produced or the machine halts.
    ///
    /// The output sequence is cleared first, so the returned value is always
    /// the latest output. Returns `None` if the machine halted without
    /// producing one.
    pub fn run_to_output(&mut self) -> IntcodeResult<Option<Word>> {
        self.outputs.clear();
        while self.status == VmStatus::Running && self.outputs.is_empty() {
            self.step()?;
        }
        Ok(self.outputs.first().copied())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Execution
    // ═══════════════════════════════════════════════════════════════════

    /// Decode and execute the instruction at `pc`.
    ///
    /// Everything that can fail is resolved before the first mutation.
    fn execute_at(&mut self, pc: Address) -> IntcodeResult<()> {
        let inst = decode(self.memory.read(pc)).map_err(|e| e.at(pc))?;
        let opcode = inst.opcode;

        if opcode == Opcode::Stop {
            self.status = VmStatus::Halted;
            return Ok(());
        }

        let mut params = [0; MAX_PARAMS];
        for (i, slot) in params.iter_mut().enumerate().take(opcode.arity()) {
            *slot = self.memory.read(pc + 1 + i as Address);
        }
        let next_pc = pc + inst.width();

        match opcode {
            Opcode::Add | Opcode::Multiply | Opcode::LessThan | Opcode::Equals => {
                let a = self.load(&inst, &params, 0, pc)?;
                let b = self.load(&inst, &params, 1, pc)?;
                let value = match opcode {
                    Opcode::Add => a.checked_add(b),
                    Opcode::Multiply => a.checked_mul(b),
                    Opcode::LessThan => Some((a < b) as Word),
                    _ => Some((a == b) as Word),
                }
                .ok_or(IntcodeError::ArithmeticOverflow {
                    opcode: opcode.mnemonic(),
                    lhs: a,
                    rhs: b,
                    pc,
                })?;
                let target = self.target(&inst, &params, 2, pc)?;

                self.instruction_ptr = next_pc;
                self.memory.write(target, value);
            }

            Opcode::Input => {
                let target = self.target(&inst, &params, 0, pc)?;
                let value = self.next_input(pc)?;

                self.instruction_ptr = next_pc;
                self.memory.write(target, value);
            }

            Opcode::Output => {
                let value = self.load(&inst, &params, 0, pc)?;

                self.instruction_ptr = next_pc;
                self.idle = false;
                self.hooks.push_output(value, &mut self.outputs);
            }

            Opcode::JumpIfTrue | Opcode::JumpIfFalse => {
                let cond = self.load(&inst, &params, 0, pc)?;
                let dest = self.load(&inst, &params, 1, pc)?;
                let taken = if opcode == Opcode::JumpIfTrue { cond != 0 } else { cond == 0 };
                let jump = if taken {
                    Some(to_address(dest).ok_or(IntcodeError::NegativeAddress { target: dest, pc })?)
                } else {
                    None
                };

                // Jump targets are absolute: they override the advanced counter
                self.instruction_ptr = next_pc;
                if let Some(dest) = jump {
                    self.instruction_ptr = dest;
                }
            }

            Opcode::AdjustRelativeBase => {
                let delta = self.load(&inst, &params, 0, pc)?;
                let base = self.relative_base.checked_add(delta).ok_or(
                    IntcodeError::ArithmeticOverflow {
                        opcode: opcode.mnemonic(),
                        lhs: self.relative_base,
                        rhs: delta,
                        pc,
                    },
                )?;

                self.instruction_ptr = next_pc;
                self.relative_base = base;
            }

            Opcode::Stop => unreachable!("STOP handled before parameter fetch"),
        }

        Ok(())
    }

    /// Resolve parameter `index` to the value it denotes.
    fn load(&self, inst: &Instruction, params: &[Word; MAX_PARAMS], index: usize, pc: Address) -> IntcodeResult<Word> {
        let raw = params[index];
        match inst.mode(index) {
            Mode::Immediate => Ok(raw),
            Mode::Position => Ok(self.memory.read(Self::address(raw, pc)?)),
            Mode::Relative => Ok(self.memory.read(self.relative(inst, raw, pc)?)),
        }
    }

    /// Resolve parameter `index` to the address it writes through.
    fn target(&self, inst: &Instruction, params: &[Word; MAX_PARAMS], index: usize, pc: Address) -> IntcodeResult<Address> {
        let raw = params[index];
        match inst.mode(index) {
            Mode::Position => Self::address(raw, pc),
            Mode::Relative => self.relative(inst, raw, pc),
            Mode::Immediate => Err(IntcodeError::InvalidWriteTarget {
                opcode: inst.opcode.mnemonic(),
                pc,
            }),
        }
    }

    fn address(word: Word, pc: Address) -> IntcodeResult<Address> {
        to_address(word).ok_or(IntcodeError::NegativeAddress { target: word, pc })
    }

    fn relative(&self, inst: &Instruction, offset: Word, pc: Address) -> IntcodeResult<Address> {
        let effective = self.relative_base.checked_add(offset).ok_or(
            IntcodeError::ArithmeticOverflow {
                opcode: inst.opcode.mnemonic(),
                lhs: self.relative_base,
                rhs: offset,
                pc,
            },
        )?;
        Self::address(effective, pc)
    }

    /// Ask the hooks for input, applying the input policy on `None`.
    fn next_input(&mut self, pc: Address) -> IntcodeResult<Word> {
        match self.hooks.pop_input(&mut self.inputs) {
            Some(value) => {
                self.idle = false;
                Ok(value)
            }
            None => match self.config.input_policy {
                InputPolicy::Strict => Err(IntcodeError::InputExhausted { pc }),
                InputPolicy::Idle { sentinel } => {
                    self.idle = true;
                    Ok(sentinel)
                }
            },
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Audit
    // ═══════════════════════════════════════════════════════════════════

    fn entity_id(&self) -> String {
        self.config.label.clone().unwrap_or_else(|| "intcode".to_string())
    }

    fn report_halt(&self) {
        if !audit::is_enabled() {
            return;
        }
        audit::audit(
            AuditEntry::new("HALT", "Interpreter", self.entity_id(), "Program halted")
                .with_category(ActionCategory::Execute)
                .with_meta("steps", self.steps.to_string())
                .with_meta("outputs", self.outputs.len().to_string()),
        );
    }

    fn report_failure(&self, err: &IntcodeError) {
        if !audit::is_enabled() {
            return;
        }
        audit::audit_failure(
            AuditEntry::new("STEP", "Interpreter", self.entity_id(), err.to_string())
                .with_category(ActionCategory::Execute)
                .with_meta("pc", self.instruction_ptr.to_string())
                .with_meta("steps", self.steps.to_string()),
            err,
        );
    }

    // ═══════════════════════════════════════════════════════════════════
    // Caller access
    // ═══════════════════════════════════════════════════════════════════

    /// Read a memory cell directly.
    pub fn read_memory(&self, addr: Address) -> Word {
        self.memory.read(addr)
    }

    /// Write a memory cell directly (e.g. patch address 0 before running).
    pub fn write_memory(&mut self, addr: Address, value: Word) {
        self.memory.write(addr, value);
    }

    /// Queue one input value. Clears the idle flag.
    pub fn push_input(&mut self, value: Word) {
        self.inputs.push_back(value);
        self.idle = false;
    }

    /// Queue several input values in order.
    pub fn extend_input(&mut self, values: impl IntoIterator<Item = Word>) {
        let before = self.inputs.len();
        self.inputs.extend(values);
        if self.inputs.len() > before {
            self.idle = false;
        }
    }

    /// Values still waiting in the input queue.
    pub fn pending_input(&self) -> &InputQueue {
        &self.inputs
    }

    /// Output produced since construction or the last `run_to_output`.
    pub fn outputs(&self) -> &[Word] {
        &self.outputs
    }

    /// Take the output sequence, leaving it empty.
    pub fn take_outputs(&mut self) -> Vec<Word> {
        std::mem::take(&mut self.outputs)
    }

    pub fn instruction_ptr(&self) -> Address {
        self.instruction_ptr
    }

    pub fn relative_base(&self) -> Word {
        self.relative_base
    }

    pub fn status(&self) -> VmStatus {
        self.status
    }

    pub fn is_halted(&self) -> bool {
        self.status == VmStatus::Halted
    }

    /// Whether the last INPUT found nothing to read (idle policy only).
    pub fn is_idle(&self) -> bool {
        self.idle
    }

    /// Instructions executed successfully so far.
    pub fn steps_executed(&self) -> u64 {
        self.steps
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Consume the interpreter, returning its memory, outputs and hooks.
    pub fn into_parts(self) -> (Memory, Vec<Word>, H) {
        (self.memory, self.outputs, self.hooks)
    }
}
