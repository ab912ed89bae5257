use intcode::audit::{self, ActionCategory, AuditConfig, AuditEntry, AuditFormat, Outcome, Severity};
use intcode::{
    load_image, render, Address, AsciiTerminal, FnHooks, InputQueue, Interpreter,
    InterpreterConfig, IoHooks, Word,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::process;
use std::time::Instant;

const DEFAULT_AUDIT_PATH: &str = "intcode-audit.log";

fn print_usage() {
    println!("Usage: intcode <image-file> [options]");
    println!();
    println!("Options:");
    println!("  --input <a,b,c>      Queue comma-separated input values before running");
    println!("  --patch <addr=val>   Overwrite a memory cell before running (repeatable)");
    println!("  --ascii              Treat I/O as text: print output as characters, feed stdin lines");
    println!("  --max-steps <n>      Abort after n instructions");
    println!("  --audit [file]       Enable audit logging (default: {}, '-' for stdout)", DEFAULT_AUDIT_PATH);
    println!("  --audit-json         Use JSON Lines format for audit output");
    println!();
    println!("Without --ascii, input beyond --input is read from stdin, one integer per line.");
}

#[derive(Debug, Default)]
struct CliOptions {
    image_path: String,
    inputs: Vec<Word>,
    patches: Vec<(Address, Word)>,
    ascii: bool,
    max_steps: Option<u64>,
    audit_path: Option<String>,
    audit_json: bool,
}

fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions {
        image_path: args.get(1).cloned().ok_or("missing image file")?,
        ..CliOptions::default()
    };
    if options.image_path.starts_with("--") {
        return Err("the image file must come first".to_string());
    }
    let mut i = 2;

    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--input" => {
                let value = args.get(i + 1).ok_or("--input needs a value")?;
                for token in value.split(',').filter(|t| !t.trim().is_empty()) {
                    let word = token.trim().parse::<Word>()
                        .map_err(|_| format!("invalid input value '{}'", token))?;
                    options.inputs.push(word);
                }
                i += 1;
            }
            "--patch" => {
                let value = args.get(i + 1).ok_or("--patch needs addr=value")?;
                let (addr, word) = value.split_once('=')
                    .ok_or_else(|| format!("invalid patch '{}': expected addr=value", value))?;
                let addr = addr.trim().parse::<Address>()
                    .map_err(|_| format!("invalid patch address '{}'", addr))?;
                let word = word.trim().parse::<Word>()
                    .map_err(|_| format!("invalid patch value '{}'", word))?;
                options.patches.push((addr, word));
                i += 1;
            }
            "--max-steps" => {
                let value = args.get(i + 1).ok_or("--max-steps needs a value")?;
                options.max_steps = Some(value.parse()
                    .map_err(|_| format!("invalid step limit '{}'", value))?);
                i += 1;
            }
            "--audit" => {
                let path = match args.get(i + 1) {
                    Some(next) if next == "-" || !next.starts_with('-') => {
                        i += 1;
                        next.clone()
                    }
                    _ => DEFAULT_AUDIT_PATH.to_string(),
                };
                options.audit_path = Some(path);
            }
            "--audit-json" => options.audit_json = true,
            "--ascii" => options.ascii = true,
            _ if arg.starts_with("--") => return Err(format!("unknown option '{}'", arg)),
            _ => return Err(format!("unexpected argument '{}'", arg)),
        }
        i += 1;
    }

    Ok(options)
}

fn init_audit(options: &CliOptions) {
    let Some(path) = &options.audit_path else {
        return;
    };
    let config = if path == "-" { AuditConfig::stdout() } else { AuditConfig::file(path) };
    let format = if options.audit_json { AuditFormat::JsonLines } else { AuditFormat::Text };

    if let Err(e) = audit::init_global_logger(config.with_format(format)) {
        eprintln!("Warning: Could not initialize audit logger: {}", e);
    }
}

/// Read one line, without its line ending. `None` at end of input.
fn read_line(reader: &mut impl BufRead) -> Option<String> {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

fn read_stdin_line() -> Option<String> {
    read_line(&mut io::stdin().lock())
}

/// Read lines until one holds an integer. `None` at end of input.
///
/// Blank lines are skipped. Any other line that is not an integer is
/// reported on stderr (and audited) and skipped.
fn read_word(reader: &mut impl BufRead) -> Option<Word> {
    loop {
        let line = read_line(reader)?;
        let token = line.trim();
        if token.is_empty() {
            continue;
        }
        match token.parse::<Word>() {
            Ok(word) => return Some(word),
            Err(_) => {
                eprintln!("Warning: ignoring input '{}': not an integer", token);
                audit::audit(
                    AuditEntry::new("INPUT", "Console", "stdin", format!("Rejected input '{}'", token))
                        .with_category(ActionCategory::Io)
                        .with_severity(Severity::Warning)
                        .with_outcome(Outcome::Failure),
                );
            }
        }
    }
}

/// Text-mode console: echoes every output value as it is produced and
/// reads stdin lines when the program asks for input.
struct Console<F> {
    terminal: AsciiTerminal<F>,
}

impl<F> IoHooks for Console<F>
where
    F: FnMut(&str) -> Option<String>,
{
    fn pop_input(&mut self, queue: &mut InputQueue) -> Option<Word> {
        let _ = io::stdout().flush();
        self.terminal.pop_input(queue)
    }

    fn push_output(&mut self, value: Word, outputs: &mut Vec<Word>) {
        print!("{}", render(&[value]));
        self.terminal.push_output(value, outputs);
    }
}

fn run<H: IoHooks>(vm: &mut Interpreter<H>) -> Result<Vec<Word>, intcode::IntcodeError> {
    vm.run()?;
    Ok(vm.take_outputs())
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            eprintln!("Run 'intcode --help' for usage.");
            process::exit(2);
        }
    };

    init_audit(&options);
    audit::audit(
        AuditEntry::new("STARTUP", "System", "intcode", "CLI session started")
            .with_category(ActionCategory::System)
            .with_meta("file", options.image_path.as_str())
            .with_meta("mode", if options.ascii { "ascii" } else { "numeric" }),
    );

    let image = match load_image(&options.image_path) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let mut config = InterpreterConfig::strict().with_label(options.image_path.as_str());
    config.max_steps = options.max_steps;

    let start = Instant::now();
    let result = if options.ascii {
        let console = Console {
            terminal: AsciiTerminal::new(|_prompt: &str| read_stdin_line()),
        };
        let mut vm = Interpreter::with_config(&image, console, config);
        vm.extend_input(options.inputs.iter().copied());
        for &(addr, value) in &options.patches {
            vm.write_memory(addr, value);
        }
        let result = run(&mut vm);
        println!();
        result.map(|_| vm.steps_executed())
    } else {
        let hooks = FnHooks::new(
            |queue: &mut InputQueue| {
                queue.pop_front().or_else(|| read_word(&mut io::stdin().lock()))
            },
            |value: Word, outputs: &mut Vec<Word>| outputs.push(value),
        );
        let mut vm = Interpreter::with_config(&image, hooks, config);
        vm.extend_input(options.inputs.iter().copied());
        for &(addr, value) in &options.patches {
            vm.write_memory(addr, value);
        }
        run(&mut vm).map(|outputs| {
            let text: Vec<String> = outputs.iter().map(Word::to_string).collect();
            println!("{}", text.join(","));
            vm.steps_executed()
        })
    };

    match result {
        Ok(steps) => {
            audit::audit(
                AuditEntry::new("SHUTDOWN", "System", "intcode", "CLI session finished")
                    .with_category(ActionCategory::System)
                    .with_duration_us(start.elapsed().as_micros() as u64)
                    .with_meta("steps", steps.to_string()),
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
