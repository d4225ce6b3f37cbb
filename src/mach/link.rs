use super::{Data, Val};
use crate::error;
use crate::lang::ast::*;
use crate::lang::{Column, Error};
use std::collections::HashMap;

type Result<T> = std::result::Result<T, Error>;

/// Index of a statement list, numbered in program order.
/// The main program is block 0.
pub type BlockId = usize;

/// Where a label sits in the statement tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub block: BlockId,
    pub index: usize,
    pub seq: usize,
}

/// A `FUNCTION`, `DEF FN` or `PROCEDURE`. Procedures have no result.
#[derive(Debug, Clone, PartialEq)]
pub struct Callable {
    pub column: Column,
    pub params: Vec<Ident>,
    pub body: Vec<Statement>,
    pub result: Option<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Reach {
    /// Same block or an enclosing one.
    Enclosing,
    /// Top level of the main program.
    TopLevel,
    Anywhere,
}

#[derive(Debug)]
struct Reference {
    column: Column,
    label: Ident,
    ancestors: Vec<BlockId>,
    reach: Reach,
}

/// ## Label, DATA and callable resolution
///
/// One pre-order walk over every block. Nothing runs until this succeeds.
/// A `name:` whose name is a callable is a call, not a label.

#[derive(Debug, Default)]
pub struct Link {
    labels: HashMap<Ident, Label>,
    callables: HashMap<Ident, Callable>,
    data: Data,
    pending: Vec<(Column, Ident, Label)>,
    references: Vec<Reference>,
    next_seq: usize,
    next_block: BlockId,
}

impl Link {
    pub fn new() -> Link {
        Link::default()
    }

    pub fn clear(&mut self) {
        *self = Link::default();
    }

    pub fn label(&self, name: &Ident) -> Option<&Label> {
        self.labels.get(name)
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn callable(&self, name: &Ident) -> Option<&Callable> {
        self.callables.get(name)
    }

    pub fn is_callable(&self, name: &Ident) -> bool {
        self.callables.contains_key(name)
    }

    pub fn link(&mut self, statements: &[Statement]) -> Result<()> {
        self.clear();
        self.block(statements, &mut vec![])?;
        for (col, name, label) in std::mem::take(&mut self.pending) {
            if self.callables.contains_key(&name) {
                continue;
            }
            if self.labels.contains_key(&name) {
                return Err(error!(SyntaxError, ..&col; "DUPLICATE LABEL"));
            }
            self.labels.insert(name, label);
        }
        for reference in std::mem::take(&mut self.references) {
            let label = match self.labels.get(&reference.label) {
                Some(label) => label,
                None => return Err(error!(UndefinedLabel, ..&reference.column)),
            };
            let reachable = match reference.reach {
                Reach::Enclosing => reference.ancestors.contains(&label.block),
                Reach::TopLevel => label.block == 0,
                Reach::Anywhere => true,
            };
            if !reachable {
                return Err(error!(CannotJumpIntoBlock, ..&reference.column));
            }
        }
        Ok(())
    }

    fn reference(&mut self, column: &Column, label: &Ident, ancestors: &[BlockId], reach: Reach) {
        self.references.push(Reference {
            column: column.clone(),
            label: label.clone(),
            ancestors: ancestors.to_vec(),
            reach,
        });
    }

    fn block(&mut self, block: &[Statement], ancestors: &mut Vec<BlockId>) -> Result<()> {
        let id = self.next_block;
        self.next_block += 1;
        ancestors.push(id);
        for (index, statement) in block.iter().enumerate() {
            let seq = self.next_seq;
            self.next_seq += 1;
            self.statement(statement, id, index, seq, ancestors)?;
        }
        ancestors.pop();
        Ok(())
    }

    /// Bodies are separate roots: nothing inside can jump out.
    fn define_callable(
        &mut self,
        col: &Column,
        name: &Ident,
        params: &[Ident],
        body: &[Statement],
        result: Option<&Expression>,
    ) -> Result<()> {
        if self.callables.contains_key(name) {
            return Err(error!(SyntaxError, ..col; "DUPLICATE DEFINITION"));
        }
        let callable = Callable {
            column: col.clone(),
            params: params.to_vec(),
            body: body.to_vec(),
            result: result.cloned(),
        };
        self.callables.insert(name.clone(), callable);
        self.block(body, &mut vec![])
    }

    fn statement(
        &mut self,
        statement: &Statement,
        block: BlockId,
        index: usize,
        seq: usize,
        ancestors: &mut Vec<BlockId>,
    ) -> Result<()> {
        match statement {
            Statement::Label(col, name) => {
                let label = Label { block, index, seq };
                self.pending.push((col.clone(), name.clone(), label));
            }
            Statement::Data(_, values) => {
                for value in values {
                    let val = match value {
                        Expression::Integer(_, n) => Val::Integer(*n),
                        Expression::Real(_, n) => Val::Real(*n),
                        Expression::String(_, s) => Val::String(s.clone()),
                        _ => {
                            let col = value.column();
                            return Err(error!(InternalError, ..&col; "DATA NOT CONSTANT"));
                        }
                    };
                    self.data.push(seq, val);
                }
            }
            Statement::Goto(col, label) => {
                self.reference(col, label, ancestors, Reach::Enclosing);
            }
            Statement::Gosub(col, label)
            | Statement::OnErrorGoto(col, Some(label))
            | Statement::Resume(col, Some(label)) => {
                self.reference(col, label, ancestors, Reach::TopLevel);
            }
            Statement::Restore(col, Some(label)) => {
                self.reference(col, label, ancestors, Reach::Anywhere);
            }
            Statement::If(_, _, then_stmt, else_stmt) => {
                self.block(then_stmt, ancestors)?;
                if let Some(else_stmt) = else_stmt {
                    self.block(else_stmt, ancestors)?;
                }
            }
            Statement::While(_, _, body)
            | Statement::Repeat(_, body, _)
            | Statement::For(_, _, _, _, _, body) => {
                self.block(body, ancestors)?;
            }
            Statement::Select(_, _, cases) => {
                for Case(_, _, body) in cases {
                    self.block(body, ancestors)?;
                }
            }
            Statement::DefFn(col, name, params, body, result) => {
                self.define_callable(col, name, params, body, Some(result))?;
            }
            Statement::DefProc(col, name, params, body) => {
                self.define_callable(col, name, params, body, None)?;
            }
            Statement::Allocate(..)
            | Statement::Call(..)
            | Statement::Dim(..)
            | Statement::End(..)
            | Statement::Free(..)
            | Statement::Let(..)
            | Statement::OnErrorGoto(_, None)
            | Statement::Poke(..)
            | Statement::Print(..)
            | Statement::Read(..)
            | Statement::Restore(_, None)
            | Statement::Resume(_, None)
            | Statement::Return(..)
            | Statement::Stop(..) => {}
        }
        Ok(())
    }
}
