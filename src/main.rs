//! # GFA BASIC
//!
//! Command line host for the interpreter.

fn main() {
    basic::term::main();
}
