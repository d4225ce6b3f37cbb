use std::collections::HashMap;

thread_local!(
    static STRING_TO_TOKEN: HashMap<String, Token> = Word::ALL
        .iter()
        .map(|w| Token::Word(w.clone()))
        .chain(Operator::ALL.iter().filter(|op| op.is_word()).map(|op| Token::Operator(op.clone())))
        .chain(Builtin::ALL.iter().map(|f| Token::Builtin(f.clone())))
        .map(|t| (t.to_string(), t))
        .collect();
);

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Literal(Literal),
    Ident(String),
    Word(Word),
    Operator(Operator),
    Builtin(Builtin),
    LParen,
    RParen,
    Comma,
    Colon,
    Semicolon,
    Eof,
}

impl Token {
    /// Keyword lookup. Matching is case sensitive: keywords are uppercase.
    pub fn from_string(s: &str) -> Option<Token> {
        STRING_TO_TOKEN.with(|stt| stt.get(s).cloned())
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Token::*;
        match self {
            Literal(s) => write!(f, "{}", s),
            Ident(s) => write!(f, "{}", s),
            Word(s) => write!(f, "{}", s),
            Operator(s) => write!(f, "{}", s),
            Builtin(s) => write!(f, "{}", s),
            LParen => write!(f, "("),
            RParen => write!(f, ")"),
            Comma => write!(f, ","),
            Colon => write!(f, ":"),
            Semicolon => write!(f, ";"),
            Eof => write!(f, "END OF INPUT"),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Integer(String),
    Real(String),
    String(String),
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Literal::*;
        match self {
            Integer(s) => write!(f, "{}", s),
            Real(s) => write!(f, "{}", s),
            String(s) => write!(f, "\"{}\"", s),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Word {
    Allocate,
    Case,
    Circle,
    Close,
    Cls,
    Data,
    Def,
    Dim,
    Else,
    End,
    EndFunc,
    Endif,
    EndProc,
    EndSelect,
    Error,
    Fn,
    For,
    Free,
    Function,
    Gosub,
    Goto,
    If,
    Input,
    Line,
    Locate,
    Next,
    On,
    Open,
    Plot,
    Poke,
    Print,
    Procedure,
    Read,
    Rem,
    Repeat,
    Restore,
    Resume,
    Return,
    Select,
    Step,
    Stop,
    Then,
    To,
    Until,
    Wend,
    While,
}

impl Word {
    pub const ALL: [Word; 46] = [
        Word::Allocate,
        Word::Case,
        Word::Circle,
        Word::Close,
        Word::Cls,
        Word::Data,
        Word::Def,
        Word::Dim,
        Word::Else,
        Word::End,
        Word::EndFunc,
        Word::Endif,
        Word::EndProc,
        Word::EndSelect,
        Word::Error,
        Word::Fn,
        Word::For,
        Word::Free,
        Word::Function,
        Word::Gosub,
        Word::Goto,
        Word::If,
        Word::Input,
        Word::Line,
        Word::Locate,
        Word::Next,
        Word::On,
        Word::Open,
        Word::Plot,
        Word::Poke,
        Word::Print,
        Word::Procedure,
        Word::Read,
        Word::Rem,
        Word::Repeat,
        Word::Restore,
        Word::Resume,
        Word::Return,
        Word::Select,
        Word::Step,
        Word::Stop,
        Word::Then,
        Word::To,
        Word::Until,
        Word::Wend,
        Word::While,
    ];

    /// Device and screen statements. They are reserved but have no runtime.
    pub fn is_io(&self) -> bool {
        use Word::*;
        matches!(
            self,
            Open | Close | Input | Cls | Locate | Plot | Line | Circle
        )
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Word::*;
        match self {
            Allocate => write!(f, "ALLOCATE"),
            Case => write!(f, "CASE"),
            Circle => write!(f, "CIRCLE"),
            Close => write!(f, "CLOSE"),
            Cls => write!(f, "CLS"),
            Data => write!(f, "DATA"),
            Def => write!(f, "DEF"),
            Dim => write!(f, "DIM"),
            Else => write!(f, "ELSE"),
            End => write!(f, "END"),
            EndFunc => write!(f, "ENDFUNC"),
            Endif => write!(f, "ENDIF"),
            EndProc => write!(f, "ENDPROC"),
            EndSelect => write!(f, "ENDSELECT"),
            Error => write!(f, "ERROR"),
            Fn => write!(f, "FN"),
            For => write!(f, "FOR"),
            Free => write!(f, "FREE"),
            Function => write!(f, "FUNCTION"),
            Gosub => write!(f, "GOSUB"),
            Goto => write!(f, "GOTO"),
            If => write!(f, "IF"),
            Input => write!(f, "INPUT"),
            Line => write!(f, "LINE"),
            Locate => write!(f, "LOCATE"),
            Next => write!(f, "NEXT"),
            On => write!(f, "ON"),
            Open => write!(f, "OPEN"),
            Plot => write!(f, "PLOT"),
            Poke => write!(f, "POKE"),
            Print => write!(f, "PRINT"),
            Procedure => write!(f, "PROCEDURE"),
            Read => write!(f, "READ"),
            Rem => write!(f, "REM"),
            Repeat => write!(f, "REPEAT"),
            Restore => write!(f, "RESTORE"),
            Resume => write!(f, "RESUME"),
            Return => write!(f, "RETURN"),
            Select => write!(f, "SELECT"),
            Step => write!(f, "STEP"),
            Stop => write!(f, "STOP"),
            Then => write!(f, "THEN"),
            To => write!(f, "TO"),
            Until => write!(f, "UNTIL"),
            Wend => write!(f, "WEND"),
            While => write!(f, "WHILE"),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Operator {
    Multiply,
    Divide,
    Modulus,
    Plus,
    Minus,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Not,
    And,
    Or,
}

impl Operator {
    pub const ALL: [Operator; 14] = [
        Operator::Multiply,
        Operator::Divide,
        Operator::Modulus,
        Operator::Plus,
        Operator::Minus,
        Operator::Equal,
        Operator::NotEqual,
        Operator::Less,
        Operator::LessEqual,
        Operator::Greater,
        Operator::GreaterEqual,
        Operator::Not,
        Operator::And,
        Operator::Or,
    ];

    pub fn is_word(&self) -> bool {
        use Operator::*;
        match self {
            Multiply | Divide | Plus | Minus | Equal | NotEqual | Less | LessEqual | Greater
            | GreaterEqual => false,
            Modulus | Not | And | Or => true,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Operator::*;
        match self {
            Multiply => write!(f, "*"),
            Divide => write!(f, "/"),
            Modulus => write!(f, "MOD"),
            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Equal => write!(f, "="),
            NotEqual => write!(f, "<>"),
            Less => write!(f, "<"),
            LessEqual => write!(f, "<="),
            Greater => write!(f, ">"),
            GreaterEqual => write!(f, ">="),
            Not => write!(f, "NOT"),
            And => write!(f, "AND"),
            Or => write!(f, "OR"),
        }
    }
}

/// Names of the built-in functions.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Builtin {
    Abs,
    Addr,
    Asc,
    Atn,
    Chr,
    Cos,
    Exp,
    Fix,
    Instr,
    Int,
    Left,
    Len,
    Log,
    Mid,
    Peek,
    Right,
    Rnd,
    Sgn,
    Sin,
    Sqr,
    Str,
    Tan,
    Val,
}

impl Builtin {
    pub const ALL: [Builtin; 23] = [
        Builtin::Abs,
        Builtin::Addr,
        Builtin::Asc,
        Builtin::Atn,
        Builtin::Chr,
        Builtin::Cos,
        Builtin::Exp,
        Builtin::Fix,
        Builtin::Instr,
        Builtin::Int,
        Builtin::Left,
        Builtin::Len,
        Builtin::Log,
        Builtin::Mid,
        Builtin::Peek,
        Builtin::Right,
        Builtin::Rnd,
        Builtin::Sgn,
        Builtin::Sin,
        Builtin::Sqr,
        Builtin::Str,
        Builtin::Tan,
        Builtin::Val,
    ];
}

impl std::fmt::Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Builtin::*;
        match self {
            Abs => write!(f, "ABS"),
            Addr => write!(f, "ADDR"),
            Asc => write!(f, "ASC"),
            Atn => write!(f, "ATN"),
            Chr => write!(f, "CHR"),
            Cos => write!(f, "COS"),
            Exp => write!(f, "EXP"),
            Fix => write!(f, "FIX"),
            Instr => write!(f, "INSTR"),
            Int => write!(f, "INT"),
            Left => write!(f, "LEFT"),
            Len => write!(f, "LEN"),
            Log => write!(f, "LOG"),
            Mid => write!(f, "MID"),
            Peek => write!(f, "PEEK"),
            Right => write!(f, "RIGHT"),
            Rnd => write!(f, "RND"),
            Sgn => write!(f, "SGN"),
            Sin => write!(f, "SIN"),
            Sqr => write!(f, "SQR"),
            Str => write!(f, "STR"),
            Tan => write!(f, "TAN"),
            Val => write!(f, "VAL"),
        }
    }
}
