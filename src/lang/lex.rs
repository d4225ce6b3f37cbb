use super::token::*;
use super::{Column, Error, LineNumber};

type Result<T> = std::result::Result<T, Error>;

/// Lex an entire source text. The terminating `Token::Eof` is not included.
pub fn lex(s: &str) -> Result<Vec<(Column, Token)>> {
    Lexer::new(s).collect()
}

fn is_basic_whitespace(c: char) -> bool {
    c.is_whitespace()
}

fn is_basic_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_basic_alphabetic(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_basic_alphanumeric(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    current: Option<char>,
    line_starts: Vec<usize>,
    done: bool,
}

impl Lexer {
    pub fn new(s: &str) -> Lexer {
        let chars: Vec<char> = s.chars().collect();
        let current = chars.first().copied();
        Lexer {
            chars,
            position: 0,
            current,
            line_starts: vec![0],
            done: false,
        }
    }

    /// Scan the next token. Once the input is exhausted every call
    /// returns `Token::Eof`.
    pub fn next_token(&mut self) -> Result<(Column, Token)> {
        while let Some(ch) = self.current {
            if is_basic_whitespace(ch) {
                self.whitespace();
                continue;
            }
            if ch == '\'' {
                self.comment();
                continue;
            }
            let start = self.position;
            let token = if is_basic_digit(ch) {
                self.number()
            } else if is_basic_alphabetic(ch) {
                let token = self.alphabetic();
                if token == Token::Word(Word::Rem) {
                    self.comment();
                    continue;
                }
                token
            } else if ch == '"' {
                self.string()?
            } else {
                self.minutia()?
            };
            return Ok((start..self.position, token));
        }
        Ok((self.position..self.position, Token::Eof))
    }

    /// The source line holding a character position that has been scanned.
    pub fn line_number_for(&self, position: usize) -> LineNumber {
        match self.line_starts.binary_search(&position) {
            Ok(index) => Some(index + 1),
            Err(index) => Some(index),
        }
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.current?;
        self.position += 1;
        if ch == '\n' {
            self.line_starts.push(self.position);
        }
        self.current = self.chars.get(self.position).copied();
        Some(ch)
    }

    fn whitespace(&mut self) {
        while let Some(ch) = self.current {
            if !is_basic_whitespace(ch) {
                break;
            }
            self.advance();
        }
    }

    fn comment(&mut self) {
        while let Some(ch) = self.current {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn number(&mut self) -> Token {
        let mut s = String::new();
        let mut decimal = false;
        while let Some(ch) = self.current {
            if is_basic_digit(ch) {
                s.push(ch);
                self.advance();
                continue;
            }
            if ch == '.' && !decimal {
                if let Some(next) = self.peek_next() {
                    if is_basic_digit(next) {
                        decimal = true;
                        s.push(ch);
                        self.advance();
                        continue;
                    }
                }
            }
            break;
        }
        if decimal {
            Token::Literal(Literal::Real(s))
        } else {
            Token::Literal(Literal::Integer(s))
        }
    }

    fn alphabetic(&mut self) -> Token {
        let mut s = String::new();
        while let Some(ch) = self.current {
            if !is_basic_alphanumeric(ch) {
                break;
            }
            s.push(ch);
            self.advance();
        }
        match Token::from_string(&s) {
            Some(token) => token,
            None => Token::Ident(s),
        }
    }

    fn string(&mut self) -> Result<Token> {
        let start = self.position;
        self.advance();
        let mut s = String::new();
        loop {
            match self.advance() {
                Some('"') => return Ok(Token::Literal(Literal::String(s))),
                Some(ch) => s.push(ch),
                None => {
                    let column = start..self.position;
                    return Err(error!(UnterminatedString, ..&column)
                        .in_line_number(self.line_number_for(start)));
                }
            }
        }
    }

    fn minutia(&mut self) -> Result<Token> {
        let start = self.position;
        let ch = match self.advance() {
            Some(ch) => ch,
            None => return Ok(Token::Eof),
        };
        let token = match ch {
            '+' => Token::Operator(Operator::Plus),
            '-' => Token::Operator(Operator::Minus),
            '*' => Token::Operator(Operator::Multiply),
            '/' => Token::Operator(Operator::Divide),
            '=' => Token::Operator(Operator::Equal),
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            ':' => Token::Colon,
            ';' => Token::Semicolon,
            '<' => match self.current {
                Some('=') => {
                    self.advance();
                    Token::Operator(Operator::LessEqual)
                }
                Some('>') => {
                    self.advance();
                    Token::Operator(Operator::NotEqual)
                }
                _ => Token::Operator(Operator::Less),
            },
            '>' => match self.current {
                Some('=') => {
                    self.advance();
                    Token::Operator(Operator::GreaterEqual)
                }
                _ => Token::Operator(Operator::Greater),
            },
            _ => {
                let column = start..self.position;
                return Err(error!(IllegalCharacter, ..&column; &format!("UNEXPECTED {:?}", ch))
                    .in_line_number(self.line_number_for(start)));
            }
        };
        Ok(token)
    }
}

impl Iterator for Lexer {
    type Item = Result<(Column, Token)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_token() {
            Ok((_, Token::Eof)) => {
                self.done = true;
                None
            }
            Ok(t) => Some(Ok(t)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
