/*!
## Rust Machine Module

This Rust module links and interprets parsed BASIC programs.

*/

mod data;
mod function;
mod link;
mod memory;
mod operation;
mod program;
mod runtime;
mod stack;
mod val;
mod var;

pub use data::Data;
pub use function::Function;
pub use link::BlockId;
pub use link::Callable;
pub use link::Label;
pub use link::Link;
pub use memory::Memory;
pub use operation::Operation;
pub use program::Program;
pub use runtime::Config;
pub use runtime::Runtime;
pub use runtime::Status;
pub use stack::Stack;
pub use val::Val;
pub use var::Var;

#[cfg(test)]
mod tests;
