#![allow(dead_code)]
use basic::mach::{Config, Program, Runtime, Status};

/// Runs a program with a fixed RND seed and returns every output line
/// followed by `BREAK` or the error that ended the run.
pub fn exec(source: &str) -> String {
    exec_with(
        Config {
            seed: Some(1),
            ..Config::default()
        },
        source,
    )
}

pub fn exec_with(config: Config, source: &str) -> String {
    let program = match Program::parse(source) {
        Ok(program) => program,
        Err(error) => return format!("{}\n", error),
    };
    let mut runtime = Runtime::new(config);
    let mut s = String::new();
    let status = runtime.run(&program, |line| {
        s.push_str(line);
        s.push('\n');
    });
    match status {
        Status::Completed => {}
        Status::Stopped => s.push_str("BREAK\n"),
        Status::Failed(error) => s.push_str(&format!("{}\n", error)),
    }
    s
}

pub fn status(source: &str) -> (Vec<String>, Status) {
    let mut lines = vec![];
    let status = basic::run(source, |line| lines.push(line.to_string()));
    (lines, status)
}
