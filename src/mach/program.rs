use super::Link;
use crate::lang::ast::Statement;
use crate::lang::{parse_program, Column, Error, LineNumber};

/// ## Program
///
/// A parsed and linked unit of source. Immutable once built; any number
/// of runs may share it.

#[derive(Debug)]
pub struct Program {
    statements: Vec<Statement>,
    link: Link,
    line_starts: Vec<usize>,
}

impl Program {
    /// Lex, parse and link. Nothing is returned unless all three succeed.
    pub fn parse(source: &str) -> Result<Program, Error> {
        let line_starts = std::iter::once(0)
            .chain(
                source
                    .chars()
                    .enumerate()
                    .filter(|(_, ch)| *ch == '\n')
                    .map(|(i, _)| i + 1),
            )
            .collect();
        let statements = parse_program(source)?;
        let mut program = Program {
            statements,
            link: Link::new(),
            line_starts,
        };
        if let Err(e) = program.link.link(&program.statements) {
            let line = program.line_number_for(&e.column());
            return Err(e.in_line_number(line));
        }
        Ok(program)
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn link(&self) -> &Link {
        &self.link
    }

    pub fn line_number_for(&self, column: &Column) -> LineNumber {
        match self.line_starts.binary_search(&column.start) {
            Ok(index) => Some(index + 1),
            Err(index) => Some(index),
        }
    }
}
