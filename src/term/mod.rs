extern crate ansi_term;
extern crate clap;
extern crate ctrlc;
extern crate linefeed;
use crate::lang::{Column, Error};
use crate::mach::{Config, Program, Runtime, Status};
use ansi_term::Style;
use clap::Parser;
use linefeed::{Interface, ReadResult, Terminal};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

/// Run a GFA style BASIC program, or start an interactive session.
#[derive(Parser, Debug)]
#[command(name = "gfabasic", version, about, long_about = None)]
struct Cli {
    /// Program to run. Without one an interactive session starts.
    file: Option<PathBuf>,

    #[arg(long, help = "Print [n] before each statement, n being its line")]
    trace: bool,

    #[arg(long, value_name = "N", help = "Fixed seed for RND")]
    seed: Option<u64>,

    #[arg(long, value_name = "BYTES", default_value_t = Config::default().memory_size)]
    memory: usize,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            memory_size: self.memory,
            seed: self.seed,
            trace: self.trace,
            ..Config::default()
        }
    }
}

pub fn main() {
    let cli = Cli::parse();
    let mut runtime = Runtime::new(cli.config());
    let interrupted = runtime.interrupt_handle();
    ctrlc::set_handler(move || {
        interrupted.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");
    let result = match &cli.file {
        Some(path) => run_file(&mut runtime, path),
        None => session(&mut runtime),
    };
    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(error) => {
            eprintln!("{}", error);
            std::process::exit(1);
        }
    }
}

/// Runs a program file. Returns false when the program failed.
fn run_file(runtime: &mut Runtime, path: &Path) -> std::io::Result<bool> {
    let source = fs::read_to_string(path)?;
    let stdout = std::io::stdout();
    let status = run_source(runtime, &source, &mut stdout.lock())?;
    Ok(!matches!(status, Status::Failed(_)))
}

/// The first failed write ends the output and is returned.
fn run_source<W: Write>(
    runtime: &mut Runtime,
    source: &str,
    out: &mut W,
) -> std::io::Result<Status> {
    let mut written = Ok(());
    let status = execute(runtime, source, |line| {
        if written.is_ok() {
            written = writeln!(out, "{}", line);
        }
    });
    written?;
    report(out, &status)?;
    Ok(status)
}

fn execute<F: FnMut(&str)>(runtime: &mut Runtime, source: &str, sink: F) -> Status {
    let program = match Program::parse(source) {
        Ok(program) => program,
        Err(error) => return Status::Failed(error),
    };
    runtime.interrupt_handle().store(false, Ordering::SeqCst);
    runtime.run(&program, sink)
}

fn report<W: Write>(out: &mut W, status: &Status) -> std::io::Result<()> {
    match status {
        Status::Completed => Ok(()),
        Status::Stopped => writeln!(out, "BREAK"),
        Status::Failed(error) => writeln!(out, "{}", Style::new().bold().paint(error.to_string())),
    }
}

#[derive(Debug, PartialEq)]
enum Command {
    Run,
    List,
    New,
    Bye,
}

impl Command {
    fn from_line(line: &str) -> Option<Command> {
        match line.trim().to_ascii_uppercase().as_str() {
            "RUN" => Some(Command::Run),
            "LIST" => Some(Command::List),
            "NEW" => Some(Command::New),
            "BYE" => Some(Command::Bye),
            _ => None,
        }
    }
}

/// Program text entered at the prompt, one entry per line.
#[derive(Debug, Default)]
struct Listing {
    lines: Vec<String>,
    error: Option<Error>,
}

impl Listing {
    fn source(&self) -> String {
        self.lines.join("\n")
    }

    fn push(&mut self, line: String) {
        self.error = None;
        self.lines.push(line);
    }

    fn clear(&mut self) {
        self.error = None;
        self.lines.clear();
    }

    /// Lines with the range of the last error underlined.
    fn decorated(&self) -> Vec<String> {
        let mut start = 0;
        let mut out = vec![];
        for (index, line) in self.lines.iter().enumerate() {
            let len = line.chars().count();
            let columns = match &self.error {
                Some(error) if error.line_number() == Some(index + 1) => {
                    let column = error.column();
                    let begin = column.start.saturating_sub(start);
                    let end = column.end.saturating_sub(start).min(len);
                    vec![begin..end]
                }
                _ => vec![],
            };
            out.push(decorate(line, &columns));
            start += len + 1;
        }
        out
    }
}

fn decorate(line: &str, columns: &[Column]) -> String {
    let style = Style::new().underline();
    let prefix = style.prefix().to_string();
    let suffix = style.suffix().to_string();
    let mut under_on = false;
    let mut out = String::new();
    for (index, ch) in line.chars().enumerate() {
        let do_under = columns.iter().any(|c| c.contains(&index));
        if under_on && !do_under {
            out.push_str(&suffix);
        } else if !under_on && do_under {
            out.push_str(&prefix);
        }
        under_on = do_under;
        out.push(ch);
    }
    if under_on {
        out.push_str(&suffix);
    }
    out
}

fn session(runtime: &mut Runtime) -> std::io::Result<bool> {
    let interface = Interface::new("gfabasic")?;
    let mut listing = Listing::default();
    interface.write_fmt(format_args!("GFA BASIC\nREADY.\n"))?;
    loop {
        let line = match interface.read_line()? {
            ReadResult::Input(line) => line,
            ReadResult::Signal(_) | ReadResult::Eof => break,
        };
        match Command::from_line(&line) {
            Some(Command::Run) => {
                let status = run_listing(&interface, runtime, &listing)?;
                if let Status::Failed(error) = &status {
                    listing.error = Some(error.clone());
                }
                interface.write_fmt(format_args!("READY.\n"))?;
            }
            Some(Command::List) => {
                for line in listing.decorated() {
                    interface.write_fmt(format_args!("{}\n", line))?;
                }
            }
            Some(Command::New) => listing.clear(),
            Some(Command::Bye) => break,
            None => {
                if !line.trim().is_empty() {
                    listing.push(line.clone());
                    interface.add_history_unique(line);
                }
            }
        }
    }
    Ok(true)
}

fn run_listing<T: Terminal>(
    interface: &Interface<T>,
    runtime: &mut Runtime,
    listing: &Listing,
) -> std::io::Result<Status> {
    let mut written = Ok(());
    let status = execute(runtime, &listing.source(), |line| {
        if written.is_ok() {
            written = interface.write_fmt(format_args!("{}\n", line));
        }
    });
    written?;
    let mut out = vec![];
    report(&mut out, &status)?;
    interface.write_fmt(format_args!("{}", String::from_utf8_lossy(&out)))?;
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands() {
        assert_eq!(Command::from_line(" run "), Some(Command::Run));
        assert_eq!(Command::from_line("LIST"), Some(Command::List));
        assert_eq!(Command::from_line("PRINT 1"), None);
    }

    #[test]
    fn test_listing_source() {
        let mut listing = Listing::default();
        listing.push("X = 1".to_string());
        listing.push("PRINT X".to_string());
        assert_eq!(listing.source(), "X = 1\nPRINT X");
        assert_eq!(listing.decorated(), vec!["X = 1", "PRINT X"]);
    }

    #[test]
    fn test_error_underlined_in_its_line() {
        let mut listing = Listing::default();
        listing.push("X = 1".to_string());
        listing.push("PRINT X / 0".to_string());
        let mut runtime = Runtime::default();
        if let Status::Failed(error) = execute(&mut runtime, &listing.source(), |_| {}) {
            listing.error = Some(error);
        }
        let style = Style::new().underline();
        let lines = listing.decorated();
        assert_eq!(lines[0], "X = 1");
        assert_eq!(
            lines[1],
            format!("PRINT X {}/{} 0", style.prefix(), style.suffix())
        );
    }

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_run_source() {
        let mut runtime = Runtime::default();
        let mut out = vec![];
        let status = run_source(&mut runtime, "PRINT 1\nSTOP", &mut out).unwrap();
        assert_eq!(status, Status::Stopped);
        assert_eq!(String::from_utf8_lossy(&out), "1\nBREAK\n");
        let e = run_source(&mut runtime, "PRINT 1", &mut Closed).unwrap_err();
        assert_eq!(e.kind(), std::io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_cli() {
        let cli = Cli::parse_from(["gfabasic", "--seed", "7", "--trace", "prog.bas"]);
        let config = cli.config();
        assert_eq!(config.seed, Some(7));
        assert!(config.trace);
        assert_eq!(config.memory_size, 65536);
        assert_eq!(cli.file, Some(PathBuf::from("prog.bas")));
    }
}
