use super::{Column, LineNumber};

#[derive(Clone, PartialEq)]
pub struct Error {
    code: u16,
    line_number: LineNumber,
    column: Column,
    message: String,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, ..$col:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_column($col)
    };
    ($err:ident, $line:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_line_number($line)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, ..$col:expr;  $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_column($col)
            .message($msg)
    };
    ($err:ident, $line:expr, ..$col:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .in_column($col)
    };
    ($err:ident, $line:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .message($msg)
    };
    ($err:ident, $line:expr, ..$col:expr;  $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .in_column($col)
            .message($msg)
    };
}

/// Broad classification used by the runtime to decide what can be trapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Runtime,
    Internal,
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code: code as u16,
            line_number: None,
            column: 0..0,
            message: String::new(),
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn line_number(&self) -> LineNumber {
        self.line_number
    }

    pub fn column(&self) -> Column {
        self.column.clone()
    }

    pub fn kind(&self) -> ErrorKind {
        match self.code {
            27 | 28 => ErrorKind::Lexical,
            2 | 8 | 12 => ErrorKind::Syntax,
            51 => ErrorKind::Internal,
            _ => ErrorKind::Runtime,
        }
    }

    pub fn is_trappable(&self) -> bool {
        self.kind() == ErrorKind::Runtime
    }

    /// Errors keep the innermost position they were given.
    pub fn in_line_number(&self, line: LineNumber) -> Error {
        let mut error = self.clone();
        if error.line_number.is_none() {
            error.line_number = line;
        }
        error
    }

    pub fn in_column(&self, column: &Column) -> Error {
        let mut error = self.clone();
        if error.column == (0..0) {
            error.column = column.clone();
        }
        error
    }

    pub fn message(&self, message: &str) -> Error {
        debug_assert_eq!(self.message.len(), 0);
        let mut error = self.clone();
        error.message = message.to_string();
        error
    }
}

pub enum ErrorCode {
    SyntaxError = 2,
    ReturnWithoutGosub = 3,
    OutOfData = 4,
    IllegalFunctionCall = 5,
    Overflow = 6,
    OutOfMemory = 7,
    UndefinedLabel = 8,
    SubscriptOutOfRange = 9,
    RedimensionedArray = 10,
    DivisionByZero = 11,
    CannotJumpIntoBlock = 12,
    TypeMismatch = 13,
    UndefinedUserFunction = 18,
    ResumeWithoutError = 20,
    UndefinedArray = 24,
    AddressOutOfRange = 25,
    IllegalCharacter = 27,
    UnterminatedString = 28,
    InternalError = 51,
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let code_str = match self.code {
            2 => "SYNTAX ERROR",
            3 => "RETURN WITHOUT GOSUB",
            4 => "OUT OF DATA",
            5 => "ILLEGAL FUNCTION CALL",
            6 => "OVERFLOW",
            7 => "OUT OF MEMORY",
            8 => "UNDEFINED LABEL",
            9 => "SUBSCRIPT OUT OF RANGE",
            10 => "REDIMENSIONED ARRAY",
            11 => "DIVISION BY ZERO",
            12 => "CANNOT JUMP INTO BLOCK",
            13 => "TYPE MISMATCH",
            18 => "UNDEFINED USER FUNCTION",
            20 => "RESUME WITHOUT ERROR",
            24 => "UNDEFINED ARRAY",
            25 => "ADDRESS OUT OF RANGE",
            27 => "ILLEGAL CHARACTER",
            28 => "UNTERMINATED STRING",
            51 => "INTERNAL ERROR",
            _ => "",
        };
        let mut s = if code_str.is_empty() {
            format!("PROGRAM ERROR {}", self.code)
        } else {
            code_str.to_string()
        };
        if self.line_number.is_some() || (0..0) != self.column {
            s.push_str(" IN");
        }
        if let Some(line_number) = self.line_number {
            s.push_str(&format!(" {}", line_number));
        }
        if (0..0) != self.column {
            s.push_str(&format!(" ({}..{})", self.column.start, self.column.end));
        }
        if !self.message.is_empty() {
            s.push_str(&format!("; {}", self.message));
        }
        write!(f, "{}", s)
    }
}
