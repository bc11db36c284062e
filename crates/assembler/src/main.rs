//! CLI entry point for the Straightline toolchain binary.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use assembler as _;
use assembler::assembler::assemble;
use machine_core::{disassemble_word, run, InputPort, ProgressSink, RegisterFile, WORD_BYTES};
#[cfg(test)]
use tempfile as _;

const USAGE_TEXT: &str = "\
Usage: straightline-asm <command> [options]

Commands:
  build <input> [-o <output>] [--verbose]  Assemble source to binary
  run   <input>                            Assemble and execute

Options:
  -o, --output <file>  Output file path (default: input stem + .bin)
  -v, --verbose        Print listing to stderr (build only)
  -h, --help           Show this help message

Examples:
  straightline-asm build program.sl
  straightline-asm build program.sl -o program.bin
  straightline-asm run program.sl
";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Build(BuildArgs),
    Run(RunArgs),
}

#[derive(Debug, PartialEq, Eq)]
struct BuildArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    verbose: bool,
}

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    input: PathBuf,
}

#[derive(Debug)]
enum ParsedArgs {
    Command(Command),
    Help,
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParsedArgs, String> {
    let first = args.next().ok_or_else(|| "missing command".to_string())?;

    if first == "--help" || first == "-h" {
        return Ok(ParsedArgs::Help);
    }

    let command_str = first.to_string_lossy().to_string();

    match command_str.as_str() {
        "build" => parse_build_args(args)
            .map(Command::Build)
            .map(ParsedArgs::Command),
        "run" => parse_run_args(args)
            .map(Command::Run)
            .map(ParsedArgs::Command),
        other => Err(format!("unknown command: {other}")),
    }
}

#[allow(clippy::while_let_on_iterator)]
fn parse_build_args(mut args: impl Iterator<Item = OsString>) -> Result<BuildArgs, String> {
    let mut input: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut verbose = false;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg == "--verbose" || arg == "-v" {
            verbose = true;
            continue;
        }

        if arg == "-o" || arg == "--output" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for -o".to_string())?;
            output = Some(PathBuf::from(value));
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if input.is_some() {
            return Err("multiple input paths provided".to_string());
        }
        input = Some(PathBuf::from(arg));
    }

    let input = input.ok_or_else(|| "missing input path".to_string())?;
    Ok(BuildArgs {
        input,
        output,
        verbose,
    })
}

fn parse_run_args(args: impl Iterator<Item = OsString>) -> Result<RunArgs, String> {
    let mut input: Option<PathBuf> = None;

    for arg in args {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if input.is_some() {
            return Err("multiple input paths provided".to_string());
        }
        input = Some(PathBuf::from(arg));
    }

    let input = input.ok_or_else(|| "missing input path".to_string())?;
    Ok(RunArgs { input })
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("out");

    let parent = input.parent().unwrap_or_else(|| Path::new(""));

    parent.join(format!("{stem}.bin"))
}

fn read_source(path: &Path) -> Result<String, i32> {
    fs::read_to_string(path).map_err(|e| {
        eprintln!("error: failed to read {}: {e}", path.display());
        1
    })
}

fn run_build(args: BuildArgs) -> Result<(), i32> {
    let source = read_source(&args.input)?;

    let binary = match assemble(&source) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return Err(1);
        }
    };

    let output_path = args
        .output
        .unwrap_or_else(|| default_output_path(&args.input));

    if let Err(e) = fs::write(&output_path, &binary) {
        eprintln!("error: failed to write output: {e}");
        return Err(1);
    }

    if args.verbose {
        print_listing(&binary);
    }

    println!(
        "Assembled {} ({} bytes) -> {}",
        args.input.display(),
        binary.len(),
        output_path.display()
    );

    Ok(())
}

fn print_listing(binary: &[u8]) {
    for (index, chunk) in binary.chunks_exact(WORD_BYTES).enumerate() {
        let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        eprintln!(
            "{:04X}: {word:08X}  {}",
            index * WORD_BYTES,
            disassemble_word(word)
        );
    }
}

/// Progress sink that reports stage transitions on stderr.
struct StderrProgress;

impl ProgressSink for StderrProgress {
    fn report(&mut self, stage: &str) {
        eprintln!("{stage}");
    }
}

/// Input port backed by stdin, prompting on stderr. EOF cancels.
struct StdinInput;

impl InputPort for StdinInput {
    fn prompt(&mut self, message: &str) -> Option<String> {
        eprint!("{message} ");
        let _ = io::stderr().flush();

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(answer.trim_end_matches(['\r', '\n']).to_owned()),
        }
    }
}

fn run_program(args: &RunArgs) -> Result<(), i32> {
    let source = read_source(&args.input)?;

    let mut progress = StderrProgress;
    let mut registers = RegisterFile::new();

    progress.report("Compiling...");
    let binary = match assemble(&source) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return Err(1);
        }
    };

    progress.report("Executing...");
    let output = run(&binary, &mut registers, &mut StdinInput);

    print!("{output}");
    Ok(())
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParsedArgs::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParsedArgs::Command(Command::Build(args))) => match run_build(args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Ok(ParsedArgs::Command(Command::Run(args))) => match run_program(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            if error.starts_with("Usage:") {
                println!("{error}");
            } else {
                eprintln!("error: {error}");
                eprintln!("{USAGE_TEXT}");
            }
            1
        }
    };

    std::process::exit(exit_code);
}
