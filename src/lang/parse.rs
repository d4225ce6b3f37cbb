use super::{ast::*, lex::Lexer, token::*, Column, Error};
use std::collections::VecDeque;

type Result<T> = std::result::Result<T, Error>;

/// Parse a complete source text into its top-level statements.
/// Any lexical or syntax error aborts the whole parse.
pub fn parse_program(source: &str) -> Result<Vec<Statement>> {
    Parser::new(source).parse()
}

pub struct Parser {
    lexer: Lexer,
    peeked: VecDeque<(Column, Token)>,
    col: Column,
    depth: usize,
}

impl Parser {
    pub fn new(source: &str) -> Parser {
        Parser {
            lexer: Lexer::new(source),
            peeked: VecDeque::new(),
            col: 0..0,
            depth: 0,
        }
    }

    /// Deepest nesting of blocks and subexpressions together.
    pub const MAX_NESTING: usize = 64;

    pub fn parse(&mut self) -> Result<Vec<Statement>> {
        let mut r: Vec<Statement> = vec![];
        loop {
            let step = match self.skip_colons() {
                Ok(Token::Eof) => return Ok(r),
                Ok(_) => self.statement(),
                Err(e) => Err(e),
            };
            match step {
                Ok(s) => r.push(s),
                Err(e) => {
                    let e = e.in_column(&self.col);
                    let line = self.lexer.line_number_for(e.column().start);
                    return Err(e.in_line_number(line));
                }
            }
        }
    }

    /// Inspect the nth token ahead without consuming anything.
    /// `lookahead(1)` is the next token.
    pub fn lookahead(&mut self, n: usize) -> Result<Token> {
        debug_assert!(n > 0);
        while self.peeked.len() < n {
            let t = self.lexer.next_token()?;
            self.peeked.push_back(t);
        }
        Ok(self.peeked[n - 1].1.clone())
    }

    fn peek(&mut self) -> Result<Token> {
        self.lookahead(1)
    }

    fn next(&mut self) -> Result<Token> {
        let (col, token) = match self.peeked.pop_front() {
            Some(t) => t,
            None => self.lexer.next_token()?,
        };
        self.col = col;
        Ok(token)
    }

    fn column(&self) -> Column {
        self.col.clone()
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Parser) -> Result<T>) -> Result<T> {
        if self.depth >= Parser::MAX_NESTING {
            return Err(error!(SyntaxError, ..&self.col; "NESTED TOO DEEPLY"));
        }
        self.depth += 1;
        let r = f(self);
        self.depth -= 1;
        r
    }

    fn skip_colons(&mut self) -> Result<Token> {
        loop {
            match self.peek()? {
                Token::Colon => {
                    self.next()?;
                }
                t => return Ok(t),
            }
        }
    }

    fn unexpected(&self, expected: &str, found: &Token) -> Error {
        error!(SyntaxError, ..&self.col; &format!("EXPECTED {}, FOUND {}", expected, found))
    }

    fn expect(&mut self, token: Token) -> Result<()> {
        let t = self.next()?;
        if t == token {
            return Ok(());
        }
        Err(self.unexpected(&token.to_string(), &t))
    }

    fn ident(&mut self) -> Result<(Column, Ident)> {
        match self.next()? {
            Token::Ident(s) => Ok((self.column(), s.into())),
            t => Err(self.unexpected("IDENTIFIER", &t)),
        }
    }

    fn statement(&mut self) -> Result<Statement> {
        match self.peek()? {
            Token::Ident(_) => Statement::for_ident(self),
            Token::Word(word) => {
                self.next()?;
                Statement::for_word(self, &word)
            }
            _ => {
                let t = self.next()?;
                Err(self.unexpected("STATEMENT", &t))
            }
        }
    }

    /// Statements up to, not including, one of the terminating words.
    /// The last terminator is the one reported when input runs out.
    fn block(&mut self, terminators: &[Word]) -> Result<Vec<Statement>> {
        self.nested(|this| {
            let mut v: Vec<Statement> = vec![];
            loop {
                match this.skip_colons()? {
                    Token::Word(w) if terminators.contains(&w) => return Ok(v),
                    Token::Eof => {
                        let missing = terminators
                            .last()
                            .map(|w| w.to_string())
                            .unwrap_or_default();
                        this.next()?;
                        let message = format!("MISSING {}", missing);
                        return Err(error!(SyntaxError, ..&this.col; &message));
                    }
                    _ => v.push(this.statement()?),
                }
            }
        })
    }

    fn starts_expression(token: &Token) -> bool {
        match token {
            Token::Literal(_) | Token::Ident(_) | Token::Builtin(_) | Token::LParen => true,
            Token::Word(Word::Fn) => true,
            Token::Operator(Operator::Minus) | Token::Operator(Operator::Not) => true,
            _ => false,
        }
    }

    fn expression(&mut self) -> Result<Expression> {
        fn parse(this: &mut Parser, precedence: usize) -> Result<Expression> {
            this.nested(|this| operand(this, precedence))
        }
        fn operand(this: &mut Parser, precedence: usize) -> Result<Expression> {
            let mut lhs = match this.next()? {
                Token::LParen => {
                    let expr = this.expression()?;
                    this.expect(Token::RParen)?;
                    expr
                }
                Token::Ident(s) => {
                    let column = this.column();
                    let ident: Ident = s.into();
                    match this.peek()? {
                        Token::LParen => {
                            Expression::Function(column, ident, this.expression_list()?)
                        }
                        _ => Expression::Var(column, ident),
                    }
                }
                Token::Word(Word::Fn) => {
                    let column = this.column();
                    let (_, ident) = this.ident()?;
                    let args = match this.peek()? {
                        Token::LParen => this.expression_list()?,
                        _ => vec![],
                    };
                    Expression::Function(column, ident, args)
                }
                Token::Literal(l) => Expression::for_literal(this.column(), &l)?,
                Token::Builtin(f) => this.builtin(f)?,
                Token::Operator(Operator::Minus) => {
                    let column = this.column();
                    let expr = parse(this, Expression::UNARY_PRECEDENCE)?;
                    Expression::Negation(column, Box::new(expr))
                }
                Token::Operator(Operator::Not) => {
                    let column = this.column();
                    let expr = parse(this, Expression::NOT_PRECEDENCE)?;
                    Expression::Not(column, Box::new(expr))
                }
                t => return Err(this.unexpected("EXPRESSION", &t)),
            };
            loop {
                match this.peek()? {
                    Token::Operator(op) => {
                        let op_precedence = match Expression::op_precedence(&op) {
                            Some(p) => p,
                            None => break,
                        };
                        if op_precedence < precedence {
                            break;
                        }
                        this.next()?;
                        let column = this.column();
                        let rhs = parse(this, op_precedence + 1)?;
                        lhs = Expression::for_binary_op(column, &op, lhs, rhs);
                    }
                    _ => break,
                }
            }
            Ok(lhs)
        }
        parse(self, 0)
    }

    fn builtin(&mut self, function: Builtin) -> Result<Expression> {
        let column = self.column();
        match function {
            Builtin::Peek => {
                self.expect(Token::LParen)?;
                let expr = self.expression()?;
                self.expect(Token::RParen)?;
                Ok(Expression::Peek(column, Box::new(expr)))
            }
            Builtin::Addr => {
                self.expect(Token::LParen)?;
                let (_, ident) = self.ident()?;
                self.expect(Token::RParen)?;
                Ok(Expression::Addr(column, ident))
            }
            Builtin::Rnd if self.peek()? != Token::LParen => {
                Ok(Expression::Builtin(column, function, vec![]))
            }
            _ => Ok(Expression::Builtin(column, function, self.expression_list()?)),
        }
    }

    fn expression_list(&mut self) -> Result<Vec<Expression>> {
        self.expect(Token::LParen)?;
        let mut v: Vec<Expression> = vec![];
        if self.peek()? == Token::RParen {
            self.next()?;
            return Ok(v);
        }
        loop {
            v.push(self.expression()?);
            match self.next()? {
                Token::RParen => return Ok(v),
                Token::Comma => continue,
                t => return Err(self.unexpected(") OR ,", &t)),
            }
        }
    }

    fn param_list(&mut self) -> Result<Vec<Ident>> {
        self.expect(Token::LParen)?;
        let mut v: Vec<Ident> = vec![];
        if self.peek()? == Token::RParen {
            self.next()?;
            return Ok(v);
        }
        loop {
            let (_, ident) = self.ident()?;
            if v.contains(&ident) {
                return Err(error!(SyntaxError, ..&self.col; "DUPLICATE PARAMETER"));
            }
            v.push(ident);
            match self.next()? {
                Token::RParen => return Ok(v),
                Token::Comma => continue,
                t => return Err(self.unexpected(") OR ,", &t)),
            }
        }
    }

    fn printer_list(&mut self) -> Result<Vec<Expression>> {
        let mut v: Vec<Expression> = vec![];
        if !self.print_item_follows()? {
            return Ok(v);
        }
        v.push(self.expression()?);
        loop {
            match self.peek()? {
                Token::Semicolon => {
                    self.next()?;
                }
                Token::Comma => {
                    self.next()?;
                    v.push(Expression::String(self.column(), "\t".into()));
                }
                _ => return Ok(v),
            };
            if !self.print_item_follows()? {
                return Ok(v);
            }
            v.push(self.expression()?);
        }
    }

    /// Print items and optional operands must start on the line of the
    /// token before them.
    fn print_item_follows(&mut self) -> Result<bool> {
        let token = self.peek()?;
        Ok(Parser::starts_expression(&token) && self.on_same_line()?)
    }

    fn on_same_line(&mut self) -> Result<bool> {
        self.lookahead(1)?;
        let next_start = match self.peeked.front() {
            Some((col, _)) => col.start,
            None => return Ok(false),
        };
        let here = self.lexer.line_number_for(self.col.start);
        Ok(here == self.lexer.line_number_for(next_start))
    }

    fn variable(&mut self) -> Result<Variable> {
        let (column, ident) = self.ident()?;
        if self.peek()? == Token::LParen {
            Ok(Variable::Array(column, ident, self.expression_list()?))
        } else {
            Ok(Variable::Unary(column, ident))
        }
    }

    fn variable_list(&mut self) -> Result<Vec<Variable>> {
        let mut v = vec![self.variable()?];
        while self.peek()? == Token::Comma {
            self.next()?;
            v.push(self.variable()?);
        }
        Ok(v)
    }

    /// An optional label operand. The identifier is only taken when it
    /// is on the same line and cannot start an assignment or call.
    fn optional_label(&mut self) -> Result<Option<Ident>> {
        if let Token::Ident(_) = self.peek()? {
            if !self.on_same_line()? {
                return Ok(None);
            }
            match self.lookahead(2)? {
                Token::Operator(Operator::Equal) | Token::LParen => {}
                _ => return Ok(Some(self.ident()?.1)),
            }
        }
        Ok(None)
    }

    fn constant(&mut self) -> Result<Expression> {
        let negative = if self.peek()? == Token::Operator(Operator::Minus) {
            self.next()?;
            true
        } else {
            false
        };
        let column = self.column();
        let expr = match self.next()? {
            Token::Literal(l) => Expression::for_literal(self.column(), &l)?,
            t => return Err(self.unexpected("CONSTANT", &t)),
        };
        if !negative {
            return Ok(expr);
        }
        let column = column.start..self.col.end;
        match expr {
            Expression::Integer(_, n) => Ok(Expression::Integer(column, -n)),
            Expression::Real(_, n) => Ok(Expression::Real(column, -n)),
            _ => Err(error!(SyntaxError, ..&column; "EXPECTED NUMBER")),
        }
    }
}

impl Expression {
    const NOT_PRECEDENCE: usize = 3;
    const UNARY_PRECEDENCE: usize = 7;

    fn for_binary_op(col: Column, op: &Operator, lhs: Expression, rhs: Expression) -> Expression {
        use Operator::*;
        let (lhs, rhs) = (Box::new(lhs), Box::new(rhs));
        match op {
            Plus => Expression::Add(col, lhs, rhs),
            Minus => Expression::Subtract(col, lhs, rhs),
            Multiply => Expression::Multiply(col, lhs, rhs),
            Divide => Expression::Divide(col, lhs, rhs),
            Modulus => Expression::Modulus(col, lhs, rhs),
            Equal => Expression::Equal(col, lhs, rhs),
            NotEqual => Expression::NotEqual(col, lhs, rhs),
            Less => Expression::Less(col, lhs, rhs),
            LessEqual => Expression::LessEqual(col, lhs, rhs),
            Greater => Expression::Greater(col, lhs, rhs),
            GreaterEqual => Expression::GreaterEqual(col, lhs, rhs),
            And => Expression::And(col, lhs, rhs),
            Or => Expression::Or(col, lhs, rhs),
            Not => {
                debug_assert!(false, "NOT is not a binary operator");
                Expression::Not(col, rhs)
            }
        }
    }

    fn op_precedence(op: &Operator) -> Option<usize> {
        use Operator::*;
        match op {
            Or => Some(1),
            And => Some(2),
            Not => None,
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual => Some(4),
            Plus | Minus => Some(5),
            Multiply | Divide | Modulus => Some(6),
        }
    }

    fn for_literal(col: Column, lit: &Literal) -> Result<Expression> {
        match lit {
            Literal::Integer(s) => match s.parse() {
                Ok(n) => Ok(Expression::Integer(col, n)),
                Err(_) => Err(error!(Overflow, ..&col; "INTEGER LITERAL TOO LARGE")),
            },
            Literal::Real(s) => match s.parse() {
                Ok(n) => Ok(Expression::Real(col, n)),
                Err(_) => Err(error!(SyntaxError, ..&col; "MALFORMED NUMBER")),
            },
            Literal::String(s) => Ok(Expression::String(col, s.as_str().into())),
        }
    }
}

impl Statement {
    fn for_ident(parse: &mut Parser) -> Result<Statement> {
        if parse.lookahead(2)? == Token::Colon {
            let (column, ident) = parse.ident()?;
            parse.next()?;
            return Ok(Statement::Label(column, ident));
        }
        let (column, ident) = parse.ident()?;
        let args = if parse.peek()? == Token::LParen {
            Some(parse.expression_list()?)
        } else {
            None
        };
        if parse.peek()? == Token::Operator(Operator::Equal) {
            parse.next()?;
            let expr = parse.expression()?;
            let var = match args {
                Some(args) => Variable::Array(column.clone(), ident, args),
                None => Variable::Unary(column.clone(), ident),
            };
            return Ok(Statement::Let(column, var, expr));
        }
        Ok(Statement::Call(column, ident, args.unwrap_or_default()))
    }

    fn for_word(parse: &mut Parser, word: &Word) -> Result<Statement> {
        let column = parse.column();
        match word {
            Word::Allocate => Self::r#allocate(parse, column),
            Word::Data => Self::r#data(parse, column),
            Word::Def => Self::r#def(parse, column),
            Word::Dim => Self::r#dim(parse, column),
            Word::End => Ok(Statement::End(column)),
            Word::For => Self::r#for(parse, column),
            Word::Free => Ok(Statement::Free(column, parse.ident()?.1)),
            Word::Function => Self::r#function(parse, column),
            Word::Gosub => Ok(Statement::Gosub(column, parse.ident()?.1)),
            Word::Goto => Ok(Statement::Goto(column, parse.ident()?.1)),
            Word::If => Self::r#if(parse, column),
            Word::On => Self::r#on(parse, column),
            Word::Poke => Self::r#poke(parse, column),
            Word::Print => Ok(Statement::Print(column, parse.printer_list()?)),
            Word::Procedure => Self::r#procedure(parse, column),
            Word::Read => Ok(Statement::Read(column, parse.variable_list()?)),
            Word::Repeat => Self::r#repeat(parse, column),
            Word::Restore => Ok(Statement::Restore(column, parse.optional_label()?)),
            Word::Resume => Self::r#resume(parse, column),
            Word::Return => Ok(Statement::Return(column)),
            Word::Select => Self::r#select(parse, column),
            Word::Stop => Ok(Statement::Stop(column)),
            Word::While => Self::r#while(parse, column),
            _ if word.is_io() => Err(
                error!(SyntaxError, ..&column; &format!("STATEMENT NOT SUPPORTED: {}", word)),
            ),
            _ => Err(error!(SyntaxError, ..&column; &format!("UNEXPECTED {}", word))),
        }
    }

    fn r#allocate(parse: &mut Parser, column: Column) -> Result<Statement> {
        let (_, ident) = parse.ident()?;
        parse.expect(Token::Comma)?;
        Ok(Statement::Allocate(column, ident, parse.expression()?))
    }

    fn r#data(parse: &mut Parser, column: Column) -> Result<Statement> {
        let mut v = vec![parse.constant()?];
        while parse.peek()? == Token::Comma {
            parse.next()?;
            v.push(parse.constant()?);
        }
        Ok(Statement::Data(column, v))
    }

    fn r#def(parse: &mut Parser, column: Column) -> Result<Statement> {
        if parse.peek()? == Token::Word(Word::Fn) {
            parse.next()?;
        }
        let (_, ident) = parse.ident()?;
        let params = parse.param_list()?;
        parse.expect(Token::Operator(Operator::Equal))?;
        let expr = parse.expression()?;
        Ok(Statement::DefFn(column, ident, params, vec![], expr))
    }

    fn r#dim(parse: &mut Parser, column: Column) -> Result<Statement> {
        let vars = parse.variable_list()?;
        for var in &vars {
            if let Variable::Unary(col, _) = var {
                return Err(error!(SyntaxError, ..col; "NOT AN ARRAY"));
            }
        }
        Ok(Statement::Dim(column, vars))
    }

    fn r#for(parse: &mut Parser, column: Column) -> Result<Statement> {
        let (var_col, ident) = parse.ident()?;
        parse.expect(Token::Operator(Operator::Equal))?;
        let from = parse.expression()?;
        parse.expect(Token::Word(Word::To))?;
        let to = parse.expression()?;
        let step = if parse.peek()? == Token::Word(Word::Step) {
            parse.next()?;
            parse.expression()?
        } else {
            Expression::Integer(var_col, 1)
        };
        let body = parse.block(&[Word::Next])?;
        parse.expect(Token::Word(Word::Next))?;
        if let Token::Ident(name) = parse.peek()? {
            if parse.on_same_line()? {
                match parse.lookahead(2)? {
                    Token::Operator(Operator::Equal) | Token::LParen => {}
                    _ => {
                        let t = parse.next()?;
                        if name.as_str() != &*ident {
                            return Err(parse.unexpected(&ident, &t));
                        }
                    }
                }
            }
        }
        Ok(Statement::For(column, ident, from, to, step, body))
    }

    fn r#function(parse: &mut Parser, column: Column) -> Result<Statement> {
        let (name_col, ident) = parse.ident()?;
        let params = parse.param_list()?;
        let body = parse.block(&[Word::EndFunc])?;
        parse.expect(Token::Word(Word::EndFunc))?;
        let result = Expression::Var(name_col, ident.clone());
        Ok(Statement::DefFn(column, ident, params, body, result))
    }

    fn r#if(parse: &mut Parser, column: Column) -> Result<Statement> {
        let predicate = parse.expression()?;
        parse.expect(Token::Word(Word::Then))?;
        let then_stmt = parse.block(&[Word::Else, Word::Endif])?;
        let else_stmt = match parse.next()? {
            Token::Word(Word::Else) => {
                let else_stmt = parse.block(&[Word::Endif])?;
                parse.expect(Token::Word(Word::Endif))?;
                Some(else_stmt)
            }
            Token::Word(Word::Endif) => None,
            t => return Err(parse.unexpected("ENDIF", &t)),
        };
        Ok(Statement::If(column, predicate, then_stmt, else_stmt))
    }

    fn r#on(parse: &mut Parser, column: Column) -> Result<Statement> {
        parse.expect(Token::Word(Word::Error))?;
        parse.expect(Token::Word(Word::Goto))?;
        match parse.next()? {
            Token::Ident(s) => Ok(Statement::OnErrorGoto(column, Some(s.into()))),
            Token::Literal(Literal::Integer(s)) if s.chars().all(|c| c == '0') => {
                Ok(Statement::OnErrorGoto(column, None))
            }
            t => Err(parse.unexpected("LABEL OR 0", &t)),
        }
    }

    fn r#poke(parse: &mut Parser, column: Column) -> Result<Statement> {
        let addr = parse.expression()?;
        parse.expect(Token::Comma)?;
        let val = parse.expression()?;
        Ok(Statement::Poke(column, addr, val))
    }

    fn r#procedure(parse: &mut Parser, column: Column) -> Result<Statement> {
        let (_, ident) = parse.ident()?;
        let params = if parse.peek()? == Token::LParen {
            parse.param_list()?
        } else {
            vec![]
        };
        let body = parse.block(&[Word::EndProc])?;
        parse.expect(Token::Word(Word::EndProc))?;
        Ok(Statement::DefProc(column, ident, params, body))
    }

    fn r#repeat(parse: &mut Parser, column: Column) -> Result<Statement> {
        let body = parse.block(&[Word::Until])?;
        parse.expect(Token::Word(Word::Until))?;
        let predicate = parse.expression()?;
        Ok(Statement::Repeat(column, body, predicate))
    }

    fn r#resume(parse: &mut Parser, column: Column) -> Result<Statement> {
        if parse.peek()? == Token::Word(Word::Next) {
            parse.next()?;
            return Ok(Statement::Resume(column, None));
        }
        Ok(Statement::Resume(column, parse.optional_label()?))
    }

    fn r#select(parse: &mut Parser, column: Column) -> Result<Statement> {
        parse.expect(Token::Word(Word::Case))?;
        let guard = parse.expression()?;
        let mut cases: Vec<Case> = vec![];
        loop {
            match parse.skip_colons()? {
                Token::Word(Word::Case) => {
                    parse.next()?;
                    let case_col = parse.column();
                    let value = parse.expression()?;
                    let body = parse.block(&[Word::Case, Word::EndSelect])?;
                    cases.push(Case(case_col, value, body));
                }
                Token::Word(Word::EndSelect) => {
                    parse.next()?;
                    return Ok(Statement::Select(column, guard, cases));
                }
                Token::Eof => {
                    parse.next()?;
                    return Err(error!(SyntaxError, ..&parse.col; "MISSING ENDSELECT"));
                }
                _ => {
                    let t = parse.next()?;
                    return Err(parse.unexpected("CASE", &t));
                }
            }
        }
    }

    fn r#while(parse: &mut Parser, column: Column) -> Result<Statement> {
        let predicate = parse.expression()?;
        let body = parse.block(&[Word::Wend])?;
        parse.expect(Token::Word(Word::Wend))?;
        Ok(Statement::While(column, predicate, body))
    }
}
