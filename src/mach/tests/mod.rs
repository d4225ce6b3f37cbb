use crate::mach::{Config, Program, Runtime, Status};

mod flow_test;

fn run(source: &str) -> String {
    run_with(Config::default(), source)
}

fn run_with(config: Config, source: &str) -> String {
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
