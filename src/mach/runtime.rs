use super::{Data, Function, Memory, Operation, Program, Stack, Val, Var};
use crate::error;
use crate::lang::ast::*;
use crate::lang::{Column, Error};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::convert::TryFrom;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

type Result<T> = std::result::Result<T, Error>;

/// ## Runtime settings

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Bytes of simulated memory for POKE, PEEK and ALLOCATE.
    pub memory_size: usize,
    /// Deepest nesting of GOSUB and of user function calls. Each level
    /// costs native stack, and the default fits a 2 MB thread.
    pub max_depth: usize,
    /// Fixed seed for RND. Entropy is used when absent.
    pub seed: Option<u64>,
    /// Emit `[n]` before each statement, n being its source line.
    pub trace: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            memory_size: 65536,
            max_depth: 64,
            seed: None,
            trace: false,
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Completed,
    Stopped,
    Failed(Error),
}

/// ## Tree-walking interpreter
///
/// Every call to `run` starts from a clean machine. The interrupt flag
/// may be set from another thread to stop a running program.
#[derive(Debug, Default)]
pub struct Runtime {
    config: Config,
    interrupt: Arc<AtomicBool>,
}

impl Runtime {
    pub fn new(config: Config) -> Runtime {
        Runtime {
            config,
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    /// Execute a program. `sink` receives each output line as it is produced.
    pub fn run<F: FnMut(&str)>(&mut self, program: &Program, mut sink: F) -> Status {
        let mut machine = Machine::new(&self.config, &self.interrupt, program, &mut sink);
        machine.execute()
    }
}

/// What a statement asks of the block executing it.
#[derive(Debug, PartialEq)]
enum Flow {
    Next,
    Jump(Ident),
    Return,
    Resume(Option<Ident>),
    Halt,
}

struct Machine<'a> {
    program: &'a Program,
    trace: bool,
    interrupt: &'a AtomicBool,
    sink: &'a mut dyn FnMut(&str),
    var: Var,
    gosub: Stack<Column>,
    gosub_base: usize,
    handler: Option<Ident>,
    trapped: bool,
    data: Data,
    memory: Memory,
    rng: StdRng,
    halt: Option<Status>,
}

impl<'a> Machine<'a> {
    fn new(
        config: &Config,
        interrupt: &'a AtomicBool,
        program: &'a Program,
        sink: &'a mut dyn FnMut(&str),
    ) -> Machine<'a> {
        Machine {
            program,
            trace: config.trace,
            interrupt,
            sink,
            var: Var::new(config.max_depth),
            gosub: Stack::new("GOSUB STACK OVERFLOW", config.max_depth),
            gosub_base: 0,
            handler: None,
            trapped: false,
            data: program.link().data().clone(),
            memory: Memory::new(config.memory_size),
            rng: match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            },
            halt: None,
        }
    }

    fn execute(&mut self) -> Status {
        let program = self.program;
        match self.block(program.statements(), 0) {
            Ok(Flow::Next) | Ok(Flow::Halt) => match self.halt.take() {
                Some(status) => status,
                None => Status::Completed,
            },
            Ok(flow) => Status::Failed(error!(InternalError; &format!("STRAY {:?}", flow))),
            Err(e) => Status::Failed(e),
        }
    }

    fn halt(&mut self, status: Status) -> Flow {
        if self.halt.is_none() {
            self.halt = Some(status);
        }
        Flow::Halt
    }

    /// The run flag. Clears a pending interrupt once it has been seen.
    fn stopping(&mut self) -> bool {
        if self.halt.is_some() {
            return true;
        }
        if self.interrupt.swap(false, Ordering::SeqCst) {
            self.halt = Some(Status::Stopped);
            return true;
        }
        false
    }

    fn located(&self, error: Error, column: &Column) -> Error {
        let error = error.in_column(column);
        let line = self.program.line_number_for(&error.column());
        error.in_line_number(line)
    }

    fn block(&mut self, block: &'a [Statement], mut pc: usize) -> Result<Flow> {
        while let Some(statement) = block.get(pc) {
            if self.stopping() {
                return Ok(Flow::Halt);
            }
            if self.trace {
                if let Some(line) = self.program.line_number_for(&statement.column()) {
                    (self.sink)(&format!("[{}]", line));
                }
            }
            let flow = match self.statement(statement) {
                Ok(flow) => flow,
                Err(error) => {
                    let error = self.located(error, &statement.column());
                    self.trap(error)?
                }
            };
            match flow {
                Flow::Next => pc += 1,
                Flow::Jump(label) => match self.local_label(block, &label) {
                    Some(index) => pc = index,
                    None => return Ok(Flow::Jump(label)),
                },
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Next)
    }

    fn local_label(&self, block: &[Statement], label: &Ident) -> Option<usize> {
        let index = self.program.link().label(label)?.index;
        match block.get(index) {
            Some(Statement::Label(_, name)) if name == label => Some(index),
            _ => None,
        }
    }

    fn top_level_label(&self, label: &Ident) -> Result<usize> {
        match self.program.link().label(label) {
            Some(target) if target.block == 0 => Ok(target.index),
            _ => Err(error!(InternalError; "UNLINKED LABEL")),
        }
    }

    /// Errors are trapped at the innermost statement of the main program.
    fn trap(&mut self, error: Error) -> Result<Flow> {
        if !error.is_trappable() || self.trapped || self.var.depth() > 0 {
            return Err(error);
        }
        let handler = match &self.handler {
            Some(handler) => handler.clone(),
            None => return Err(error),
        };
        let index = self.top_level_label(&handler)?;
        self.trapped = true;
        let program = self.program;
        match self.block(program.statements(), index)? {
            Flow::Resume(None) => Ok(Flow::Next),
            Flow::Resume(Some(label)) => Ok(Flow::Jump(label)),
            Flow::Next => Ok(self.halt(Status::Completed)),
            flow => Ok(flow),
        }
    }

    fn statement(&mut self, statement: &'a Statement) -> Result<Flow> {
        match statement {
            Statement::Allocate(_, name, size) => {
                let size = i64::try_from(self.expression(size)?)?;
                let base = self.memory.allocate(name, size)?;
                self.var.store(name, Val::Integer(base as i64));
                Ok(Flow::Next)
            }
            Statement::Call(_, name, args) => {
                self.call(name, args)?;
                Ok(Flow::Next)
            }
            Statement::Data(..) | Statement::DefFn(..) | Statement::DefProc(..) => Ok(Flow::Next),
            Statement::Dim(_, vars) => self.r#dim(vars),
            Statement::End(_) => Ok(self.halt(Status::Completed)),
            Statement::For(_, var, from, to, step, body) => self.r#for(var, from, to, step, body),
            Statement::Free(_, name) => {
                self.memory.free(name)?;
                Ok(Flow::Next)
            }
            Statement::Gosub(col, label) => self.r#gosub(col, label),
            Statement::Goto(_, label) => Ok(Flow::Jump(label.clone())),
            Statement::If(_, predicate, then_stmt, else_stmt) => {
                if self.expression(predicate)?.is_true()? {
                    self.block(then_stmt, 0)
                } else if let Some(else_stmt) = else_stmt {
                    self.block(else_stmt, 0)
                } else {
                    Ok(Flow::Next)
                }
            }
            Statement::Label(_, name) => {
                if self.program.link().is_callable(name) {
                    self.call(name, &[])?;
                }
                Ok(Flow::Next)
            }
            Statement::Let(_, var, expr) => {
                let val = self.expression(expr)?;
                self.store(var, val)?;
                Ok(Flow::Next)
            }
            Statement::OnErrorGoto(_, label) => {
                self.handler = label.clone();
                Ok(Flow::Next)
            }
            Statement::Poke(_, addr, val) => {
                let addr = i64::try_from(self.expression(addr)?)?;
                let val = i64::try_from(self.expression(val)?)?;
                self.memory.poke(addr, val)?;
                Ok(Flow::Next)
            }
            Statement::Print(_, items) => self.r#print(items),
            Statement::Read(_, vars) => {
                for var in vars {
                    let val = self.data.read()?;
                    self.store(var, val)?;
                }
                Ok(Flow::Next)
            }
            Statement::Repeat(_, body, predicate) => self.r#repeat(body, predicate),
            Statement::Restore(_, label) => {
                match label {
                    None => self.data.restore(),
                    Some(label) => match self.program.link().label(label) {
                        Some(target) => self.data.restore_to(target.seq),
                        None => return Err(error!(UndefinedLabel)),
                    },
                }
                Ok(Flow::Next)
            }
            Statement::Resume(_, label) => {
                if self.var.depth() > 0 {
                    return Err(error!(ResumeWithoutError; "RESUME INSIDE CALL"));
                }
                if !self.trapped {
                    return Err(error!(ResumeWithoutError));
                }
                self.trapped = false;
                Ok(Flow::Resume(label.clone()))
            }
            Statement::Return(_) => {
                if self.gosub.len() <= self.gosub_base {
                    return Err(error!(ReturnWithoutGosub));
                }
                self.gosub.pop()?;
                Ok(Flow::Return)
            }
            Statement::Select(_, guard, cases) => self.r#select(guard, cases),
            Statement::Stop(_) => Ok(self.halt(Status::Stopped)),
            Statement::While(_, predicate, body) => self.r#while(predicate, body),
        }
    }

    fn r#dim(&mut self, vars: &'a [Variable]) -> Result<Flow> {
        for var in vars {
            match var {
                Variable::Array(col, name, bounds) => {
                    let bounds = self.expressions(bounds)?;
                    self.var
                        .dimension_array(name, bounds)
                        .map_err(|e| e.in_column(col))?;
                }
                Variable::Unary(col, _) => {
                    return Err(error!(InternalError, ..col; "DIM WITHOUT BOUNDS"));
                }
            }
        }
        Ok(Flow::Next)
    }

    fn r#for(
        &mut self,
        var: &'a Ident,
        from: &'a Expression,
        to: &'a Expression,
        step: &'a Expression,
        body: &'a [Statement],
    ) -> Result<Flow> {
        let from = self.expression(from)?;
        let to = self.expression(to)?;
        let step = self.expression(step)?;
        if !from.is_numeric() || !to.is_numeric() || !step.is_numeric() {
            return Err(error!(TypeMismatch));
        }
        let direction = Operation::compare(&step, &Val::Integer(0))?;
        self.var.store(var, from);
        loop {
            if self.stopping() {
                return Ok(Flow::Halt);
            }
            let current = self.var.fetch(var);
            let remaining = match direction {
                std::cmp::Ordering::Greater => Operation::less_equal(current, to.clone())?,
                std::cmp::Ordering::Less => Operation::greater_equal(current, to.clone())?,
                std::cmp::Ordering::Equal => Val::Integer(0),
            };
            if !remaining.is_true()? {
                return Ok(Flow::Next);
            }
            match self.block(body, 0)? {
                Flow::Next => {}
                flow => return Ok(flow),
            }
            let next = Operation::sum(self.var.fetch(var), step.clone())?;
            self.var.store(var, next);
        }
    }

    fn r#gosub(&mut self, col: &Column, label: &Ident) -> Result<Flow> {
        let index = self.top_level_label(label)?;
        let depth = self.gosub.len();
        self.gosub.push(col.clone())?;
        let program = self.program;
        match self.block(program.statements(), index) {
            Ok(Flow::Return) => Ok(Flow::Next),
            Ok(Flow::Next) => {
                self.gosub.truncate(depth);
                Ok(self.halt(Status::Completed))
            }
            Ok(flow) => {
                self.gosub.truncate(depth);
                Ok(flow)
            }
            Err(e) => {
                self.gosub.truncate(depth);
                Err(e)
            }
        }
    }

    fn r#print(&mut self, items: &'a [Expression]) -> Result<Flow> {
        let mut line = String::new();
        for item in items {
            line.push_str(&self.expression(item)?.to_string());
        }
        (self.sink)(&line);
        Ok(Flow::Next)
    }

    fn r#repeat(&mut self, body: &'a [Statement], predicate: &'a Expression) -> Result<Flow> {
        loop {
            if self.stopping() {
                return Ok(Flow::Halt);
            }
            match self.block(body, 0)? {
                Flow::Next => {}
                flow => return Ok(flow),
            }
            if self.expression(predicate)?.is_true()? {
                return Ok(Flow::Next);
            }
        }
    }

    fn r#select(&mut self, guard: &'a Expression, cases: &'a [Case]) -> Result<Flow> {
        let guard = self.expression(guard)?;
        for Case(_, value, body) in cases {
            let value = self.expression(value)?;
            if Operation::equal(guard.clone(), value)?.is_true()? {
                return self.block(body, 0);
            }
        }
        Ok(Flow::Next)
    }

    fn r#while(&mut self, predicate: &'a Expression, body: &'a [Statement]) -> Result<Flow> {
        loop {
            if self.stopping() {
                return Ok(Flow::Halt);
            }
            if !self.expression(predicate)?.is_true()? {
                return Ok(Flow::Next);
            }
            match self.block(body, 0)? {
                Flow::Next => {}
                flow => return Ok(flow),
            }
        }
    }

    fn store(&mut self, var: &'a Variable, val: Val) -> Result<()> {
        match var {
            Variable::Unary(_, name) => {
                self.var.store(name, val);
                Ok(())
            }
            Variable::Array(col, name, indices) => {
                let indices = self.expressions(indices)?;
                self.var
                    .store_array(name, indices, val)
                    .map_err(|e| e.in_column(col))
            }
        }
    }

    fn expressions(&mut self, exprs: &'a [Expression]) -> Result<Vec<Val>> {
        let mut vals = Vec::with_capacity(exprs.len());
        for expr in exprs {
            vals.push(self.expression(expr)?);
        }
        Ok(vals)
    }

    fn expression(&mut self, expr: &'a Expression) -> Result<Val> {
        self.evaluate(expr).map_err(|e| e.in_column(&expr.column()))
    }

    fn evaluate(&mut self, expr: &'a Expression) -> Result<Val> {
        match expr {
            Expression::Integer(_, n) => Ok(Val::Integer(*n)),
            Expression::Real(_, n) => Ok(Val::Real(*n)),
            Expression::String(_, s) => Ok(Val::String(s.clone())),
            Expression::Var(_, name) => Ok(self.var.fetch(name)),
            Expression::Function(_, name, args) => {
                if self.var.is_array(name) {
                    let indices = self.expressions(args)?;
                    return self.var.fetch_array(name, indices);
                }
                if !self.program.link().is_callable(name) {
                    return Err(error!(UndefinedArray));
                }
                match self.call(name, args)? {
                    Some(val) => Ok(val),
                    None => Err(error!(TypeMismatch; "PROCEDURE HAS NO VALUE")),
                }
            }
            Expression::Builtin(_, function, args) => {
                let args = self.expressions(args)?;
                Function::call(*function, args, &mut self.rng)
            }
            Expression::Peek(_, addr) => {
                let addr = i64::try_from(self.expression(addr)?)?;
                Ok(Val::Integer(self.memory.peek(addr)? as i64))
            }
            Expression::Addr(_, name) => match self.memory.addr(name) {
                Some(addr) => Ok(Val::Integer(addr as i64)),
                None => Err(error!(IllegalFunctionCall; "NOT ALLOCATED")),
            },
            Expression::Negation(_, expr) => Operation::negate(self.expression(expr)?),
            Expression::Not(_, expr) => Operation::not(self.expression(expr)?),
            Expression::Multiply(_, lhs, rhs) => self.binary(lhs, rhs, Operation::multiply),
            Expression::Divide(_, lhs, rhs) => self.binary(lhs, rhs, Operation::divide),
            Expression::Modulus(_, lhs, rhs) => self.binary(lhs, rhs, Operation::modulus),
            Expression::Add(_, lhs, rhs) => self.binary(lhs, rhs, Operation::sum),
            Expression::Subtract(_, lhs, rhs) => self.binary(lhs, rhs, Operation::subtract),
            Expression::Equal(_, lhs, rhs) => self.binary(lhs, rhs, Operation::equal),
            Expression::NotEqual(_, lhs, rhs) => self.binary(lhs, rhs, Operation::not_equal),
            Expression::Less(_, lhs, rhs) => self.binary(lhs, rhs, Operation::less),
            Expression::LessEqual(_, lhs, rhs) => self.binary(lhs, rhs, Operation::less_equal),
            Expression::Greater(_, lhs, rhs) => self.binary(lhs, rhs, Operation::greater),
            Expression::GreaterEqual(_, lhs, rhs) => {
                self.binary(lhs, rhs, Operation::greater_equal)
            }
            Expression::And(_, lhs, rhs) => self.binary(lhs, rhs, Operation::and),
            Expression::Or(_, lhs, rhs) => self.binary(lhs, rhs, Operation::or),
        }
    }

    fn binary(
        &mut self,
        lhs: &'a Expression,
        rhs: &'a Expression,
        op: fn(Val, Val) -> Result<Val>,
    ) -> Result<Val> {
        let lhs = self.expression(lhs)?;
        let rhs = self.expression(rhs)?;
        op(lhs, rhs)
    }

    /// Run a user function or procedure in a fresh frame of locals.
    fn call(&mut self, name: &Ident, args: &'a [Expression]) -> Result<Option<Val>> {
        let program = self.program;
        let callable = match program.link().callable(name) {
            Some(callable) => callable,
            None => return Err(error!(UndefinedUserFunction)),
        };
        if callable.params.len() != args.len() {
            return Err(error!(IllegalFunctionCall; "WRONG NUMBER OF ARGUMENTS"));
        }
        let mut locals: HashMap<Ident, Val> = HashMap::new();
        for (param, arg) in callable.params.iter().zip(args) {
            let val = self.expression(arg)?;
            locals.insert(param.clone(), val);
        }
        if callable.result.is_some() && !callable.body.is_empty() {
            locals.entry(name.clone()).or_insert_with(Val::default);
        }
        self.var.push_frame(locals)?;
        let gosub_base = std::mem::replace(&mut self.gosub_base, self.gosub.len());
        let r = self.call_body(&callable.body, callable.result.as_ref());
        self.gosub_base = gosub_base;
        self.var.pop_frame()?;
        r
    }

    fn call_body(
        &mut self,
        body: &'a [Statement],
        result: Option<&'a Expression>,
    ) -> Result<Option<Val>> {
        match self.block(body, 0)? {
            Flow::Next | Flow::Halt => {}
            flow => {
                return Err(error!(InternalError; &format!("STRAY {:?} IN CALL", flow)));
            }
        }
        match result {
            Some(expr) if self.halt.is_none() => Ok(Some(self.expression(expr)?)),
            Some(_) => Ok(Some(Val::default())),
            None => Ok(None),
        }
    }
}
