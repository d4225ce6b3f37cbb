use super::token::Builtin;
use super::Column;
use std::rc::Rc;

pub type Ident = Rc<str>;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Allocate(Column, Ident, Expression),
    Call(Column, Ident, Vec<Expression>),
    Data(Column, Vec<Expression>),
    DefFn(Column, Ident, Vec<Ident>, Vec<Statement>, Expression),
    DefProc(Column, Ident, Vec<Ident>, Vec<Statement>),
    Dim(Column, Vec<Variable>),
    End(Column),
    For(
        Column,
        Ident,
        Expression,
        Expression,
        Expression,
        Vec<Statement>,
    ),
    Free(Column, Ident),
    Gosub(Column, Ident),
    Goto(Column, Ident),
    If(Column, Expression, Vec<Statement>, Option<Vec<Statement>>),
    Label(Column, Ident),
    Let(Column, Variable, Expression),
    OnErrorGoto(Column, Option<Ident>),
    Poke(Column, Expression, Expression),
    Print(Column, Vec<Expression>),
    Read(Column, Vec<Variable>),
    Repeat(Column, Vec<Statement>, Expression),
    Restore(Column, Option<Ident>),
    Resume(Column, Option<Ident>),
    Return(Column),
    Select(Column, Expression, Vec<Case>),
    Stop(Column),
    While(Column, Expression, Vec<Statement>),
}

/// One `CASE` arm of a `SELECT CASE`.
#[derive(Debug, Clone, PartialEq)]
pub struct Case(pub Column, pub Expression, pub Vec<Statement>);

#[derive(Debug, Clone, PartialEq)]
pub enum Variable {
    Unary(Column, Ident),
    Array(Column, Ident, Vec<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Integer(Column, i64),
    Real(Column, f64),
    String(Column, Rc<str>),
    Var(Column, Ident),
    Function(Column, Ident, Vec<Expression>),
    Builtin(Column, Builtin, Vec<Expression>),
    Peek(Column, Box<Expression>),
    Addr(Column, Ident),
    Negation(Column, Box<Expression>),
    Not(Column, Box<Expression>),
    Multiply(Column, Box<Expression>, Box<Expression>),
    Divide(Column, Box<Expression>, Box<Expression>),
    Modulus(Column, Box<Expression>, Box<Expression>),
    Add(Column, Box<Expression>, Box<Expression>),
    Subtract(Column, Box<Expression>, Box<Expression>),
    Equal(Column, Box<Expression>, Box<Expression>),
    NotEqual(Column, Box<Expression>, Box<Expression>),
    Less(Column, Box<Expression>, Box<Expression>),
    LessEqual(Column, Box<Expression>, Box<Expression>),
    Greater(Column, Box<Expression>, Box<Expression>),
    GreaterEqual(Column, Box<Expression>, Box<Expression>),
    And(Column, Box<Expression>, Box<Expression>),
    Or(Column, Box<Expression>, Box<Expression>),
}

impl Statement {
    pub fn column(&self) -> Column {
        use Statement::*;
        match self {
            Allocate(col, ..)
            | Call(col, ..)
            | Data(col, ..)
            | DefFn(col, ..)
            | DefProc(col, ..)
            | Dim(col, ..)
            | End(col)
            | For(col, ..)
            | Free(col, ..)
            | Gosub(col, ..)
            | Goto(col, ..)
            | If(col, ..)
            | Label(col, ..)
            | Let(col, ..)
            | OnErrorGoto(col, ..)
            | Poke(col, ..)
            | Print(col, ..)
            | Read(col, ..)
            | Repeat(col, ..)
            | Restore(col, ..)
            | Resume(col, ..)
            | Return(col)
            | Select(col, ..)
            | Stop(col)
            | While(col, ..) => col.clone(),
        }
    }
}

impl Variable {
    pub fn column(&self) -> Column {
        match self {
            Variable::Unary(col, _) | Variable::Array(col, ..) => col.clone(),
        }
    }
}

impl Expression {
    pub fn column(&self) -> Column {
        use Expression::*;
        match self {
            Integer(col, ..)
            | Real(col, ..)
            | String(col, ..)
            | Var(col, ..)
            | Function(col, ..)
            | Builtin(col, ..)
            | Peek(col, ..)
            | Addr(col, ..)
            | Negation(col, ..)
            | Not(col, ..)
            | Multiply(col, ..)
            | Divide(col, ..)
            | Modulus(col, ..)
            | Add(col, ..)
            | Subtract(col, ..)
            | Equal(col, ..)
            | NotEqual(col, ..)
            | Less(col, ..)
            | LessEqual(col, ..)
            | Greater(col, ..)
            | GreaterEqual(col, ..)
            | And(col, ..)
            | Or(col, ..) => col.clone(),
        }
    }
}
