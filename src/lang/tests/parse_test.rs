use super::*;

fn parse_str(s: &str) -> Vec<Statement> {
    match parse_program(s) {
        Ok(v) => v,
        Err(e) => panic!("{}", e),
    }
}

fn parse_err(s: &str) -> Error {
    match parse_program(s) {
        Ok(v) => panic!("parsed {:?}", v),
        Err(e) => e,
    }
}

#[test]
fn test_statement_count() {
    assert_eq!(parse_str("").len(), 0);
    assert_eq!(parse_str(":::").len(), 0);
    assert_eq!(parse_str("A=1 : B=2\nPRINT A;B").len(), 3);
    let v = parse_str("WHILE X < 3\nX = X + 1\nPRINT X\nWEND\nEND");
    assert_eq!(v.len(), 2);
    match &v[0] {
        Statement::While(_, _, body) => assert_eq!(body.len(), 2),
        s => panic!("{:?}", s),
    }
}

#[test]
fn test_missing_terminators() {
    for (src, missing) in &[
        ("IF X THEN PRINT 1", "MISSING ENDIF"),
        ("IF X THEN\nELSE PRINT 1", "MISSING ENDIF"),
        ("WHILE 1\nPRINT 1", "MISSING WEND"),
        ("FOR I=1 TO 2 : PRINT I", "MISSING NEXT"),
        ("REPEAT\nPRINT 1", "MISSING UNTIL"),
        ("SELECT CASE 1\nCASE 1 : PRINT 1", "MISSING ENDSELECT"),
        ("FUNCTION F(A)\nF = A", "MISSING ENDFUNC"),
        ("PROCEDURE P\nPRINT 1", "MISSING ENDPROC"),
    ] {
        let e = parse_err(src);
        assert_eq!(e.code(), ErrorCode::SyntaxError as u16);
        assert!(e.to_string().ends_with(missing), "{} => {}", src, e);
    }
}

#[test]
fn test_expected_found() {
    let e = parse_err("FOR I 1 TO 2\nNEXT");
    assert_eq!(e.to_string(), "SYNTAX ERROR IN 1 (6..7); EXPECTED =, FOUND 1");
    let e = parse_err("PRINT 1\nIF 1 PRINT 2 ENDIF");
    assert_eq!(e.line_number(), Some(2));
    assert!(e.to_string().ends_with("EXPECTED THEN, FOUND PRINT"));
}

#[test]
fn test_lexical_error_position() {
    let e = parse_err("A = 1\nB = 2 # 3");
    assert_eq!(e.code(), ErrorCode::IllegalCharacter as u16);
    assert_eq!(e.line_number(), Some(2));
    assert_eq!(e.column(), 12..13);
}

#[test]
fn test_io_statements_rejected() {
    let e = parse_err("CLS");
    assert!(e.to_string().contains("STATEMENT NOT SUPPORTED"));
    let e = parse_err("PRINT 1\nOPEN 1");
    assert_eq!(e.line_number(), Some(2));
}

#[test]
fn test_stray_terminator() {
    let e = parse_err("WEND");
    assert!(e.to_string().ends_with("UNEXPECTED WEND"));
}

#[test]
fn test_next_variable_is_optional() {
    let v = parse_str("FOR I=1 TO 2\nNEXT I\nI = 5");
    assert_eq!(v.len(), 2);
    let v = parse_str("FOR I=1 TO 2\nNEXT\nI = 5");
    assert_eq!(v.len(), 2);
    let v = parse_str("FOR I=1 TO 2 : NEXT I : PRINT I");
    assert_eq!(v.len(), 2);
}

#[test]
fn test_for_default_step() {
    match &parse_str("FOR I=1 TO 3 : NEXT")[0] {
        Statement::For(_, var, from, to, step, body) => {
            assert_eq!(&**var, "I");
            assert!(matches!(from, Expression::Integer(_, 1)));
            assert!(matches!(to, Expression::Integer(_, 3)));
            assert!(matches!(step, Expression::Integer(_, 1)));
            assert!(body.is_empty());
        }
        s => panic!("{:?}", s),
    }
}

#[test]
fn test_select_arms() {
    let v = parse_str("SELECT CASE X\nCASE 1: PRINT 1\nCASE 2\nPRINT 2 : PRINT 3\nENDSELECT");
    match &v[0] {
        Statement::Select(_, _, cases) => {
            assert_eq!(cases.len(), 2);
            assert_eq!(cases[0].2.len(), 1);
            assert_eq!(cases[1].2.len(), 2);
        }
        s => panic!("{:?}", s),
    }
    let e = parse_err("SELECT CASE X\nPRINT 1\nENDSELECT");
    assert!(e.to_string().ends_with("EXPECTED CASE, FOUND PRINT"));
}

#[test]
fn test_print_separators() {
    match &parse_str("PRINT 1;2,3")[0] {
        Statement::Print(_, items) => {
            assert_eq!(items.len(), 4);
            assert_eq!(items[2], Expression::String(9..10, "\t".into()));
        }
        s => panic!("{:?}", s),
    }
    match &parse_str("PRINT \"A\";\nB = 1")[0] {
        Statement::Print(_, items) => assert_eq!(items.len(), 1),
        s => panic!("{:?}", s),
    }
    assert_eq!(parse_str("PRINT\nB = 1").len(), 2);
}

#[test]
fn test_resume_and_restore_operands() {
    let v = parse_str("RESUME\nRESUME NEXT\nRESUME AGAIN\nRESTORE\nRESTORE D1 : READ X");
    assert!(matches!(&v[0], Statement::Resume(_, None)));
    assert!(matches!(&v[1], Statement::Resume(_, None)));
    assert!(matches!(&v[2], Statement::Resume(_, Some(l)) if &**l == "AGAIN"));
    assert!(matches!(&v[3], Statement::Restore(_, None)));
    assert!(matches!(&v[4], Statement::Restore(_, Some(l)) if &**l == "D1"));
    assert_eq!(v.len(), 6);
}

#[test]
fn test_on_error_goto() {
    let v = parse_str("ON ERROR GOTO HANDLER\nON ERROR GOTO 0");
    assert!(matches!(&v[0], Statement::OnErrorGoto(_, Some(l)) if &**l == "HANDLER"));
    assert!(matches!(&v[1], Statement::OnErrorGoto(_, None)));
    let e = parse_err("ON ERROR GOTO 10");
    assert!(e.to_string().ends_with("EXPECTED LABEL OR 0, FOUND 10"));
}

#[test]
fn test_data_constants() {
    match &parse_str("DATA 1, -2, 2.5, -0.5, \"X\"")[0] {
        Statement::Data(_, values) => {
            assert!(matches!(values[0], Expression::Integer(_, 1)));
            assert!(matches!(values[1], Expression::Integer(_, -2)));
            assert!(matches!(values[2], Expression::Real(_, n) if n == 2.5));
            assert!(matches!(values[3], Expression::Real(_, n) if n == -0.5));
            assert!(matches!(&values[4], Expression::String(_, s) if &**s == "X"));
        }
        s => panic!("{:?}", s),
    }
    let e = parse_err("DATA A");
    assert!(e.to_string().ends_with("EXPECTED CONSTANT, FOUND A"));
}

#[test]
fn test_callables() {
    let v = parse_str("DEF FN SQ(X) = X * X\nDEF CUBE(X) = X * X * X");
    assert!(matches!(&v[0], Statement::DefFn(_, n, p, b, _) if &**n == "SQ" && p.len() == 1 && b.is_empty()));
    assert!(matches!(&v[1], Statement::DefFn(_, n, ..) if &**n == "CUBE"));
    match &parse_str("FUNCTION ADD(A, B)\nADD = A + B\nENDFUNC")[0] {
        Statement::DefFn(_, name, params, body, result) => {
            assert_eq!(&**name, "ADD");
            assert_eq!(params.len(), 2);
            assert_eq!(body.len(), 1);
            assert!(matches!(result, Expression::Var(_, n) if &**n == "ADD"));
        }
        s => panic!("{:?}", s),
    }
    let v = parse_str("PROCEDURE HELLO\nPRINT 1\nENDPROC\nHELLO");
    assert!(matches!(&v[0], Statement::DefProc(_, _, p, _) if p.is_empty()));
    assert!(matches!(&v[1], Statement::Call(_, n, a) if &**n == "HELLO" && a.is_empty()));
    let e = parse_err("DEF F(A, A) = A");
    assert!(e.to_string().ends_with("DUPLICATE PARAMETER"));
}

#[test]
fn test_memory_statements() {
    let v = parse_str("ALLOCATE BUF, 16\nPOKE BUF + 1, 255\nX = PEEK(ADDR(BUF) + 1)\nFREE BUF");
    assert!(matches!(&v[0], Statement::Allocate(_, n, _) if &**n == "BUF"));
    assert!(matches!(&v[1], Statement::Poke(..)));
    match &v[2] {
        Statement::Let(_, _, Expression::Peek(_, addr)) => {
            assert!(matches!(**addr, Expression::Add(..)));
        }
        s => panic!("{:?}", s),
    }
    assert!(matches!(&v[3], Statement::Free(_, n) if &**n == "BUF"));
}

#[test]
fn test_operator_precedence() {
    match &parse_str("X = NOT A = 1 OR B AND C")[0] {
        Statement::Let(_, _, Expression::Or(_, lhs, rhs)) => {
            assert!(matches!(**lhs, Expression::Not(..)));
            assert!(matches!(**rhs, Expression::And(..)));
        }
        s => panic!("{:?}", s),
    }
    match &parse_str("X = -2 * 3 MOD 4")[0] {
        Statement::Let(_, _, Expression::Modulus(_, lhs, _)) => match &**lhs {
            Expression::Multiply(_, neg, _) => assert!(matches!(**neg, Expression::Negation(..))),
            e => panic!("{:?}", e),
        },
        s => panic!("{:?}", s),
    }
}

#[test]
fn test_dim_requires_bounds() {
    let v = parse_str("DIM A(3), B(2, 2)");
    match &v[0] {
        Statement::Dim(_, vars) => assert_eq!(vars.len(), 2),
        s => panic!("{:?}", s),
    }
    let e = parse_err("DIM A");
    assert!(e.to_string().ends_with("NOT AN ARRAY"));
}

#[test]
fn test_next_variable_must_match() {
    let e = parse_err("FOR I = 1 TO 2\nPRINT I\nNEXT J");
    assert_eq!(e.to_string(), "SYNTAX ERROR IN 3 (28..29); EXPECTED I, FOUND J");
    let e = parse_err("FOR I = 1 TO 2 : NEXT J : PRINT 1");
    assert!(e.to_string().ends_with("EXPECTED I, FOUND J"));
    assert_eq!(parse_str("FOR I = 1 TO 2\nNEXT\nJ = 1").len(), 2);
}

#[test]
fn test_nesting_limit() {
    let deep = |n: usize| format!("PRINT {}1{}", "(".repeat(n), ")".repeat(n));
    assert_eq!(parse_str(&deep(Parser::MAX_NESTING - 1)).len(), 1);
    let e = parse_err(&deep(5000));
    assert!(e.to_string().ends_with("NESTED TOO DEEPLY"), "{}", e);
    let e = parse_err(&format!("X = {}1", "-".repeat(5000)));
    assert!(e.to_string().ends_with("NESTED TOO DEEPLY"), "{}", e);
    let blocks = "WHILE 1\n".repeat(5000) + &"WEND\n".repeat(5000);
    let e = parse_err(&blocks);
    assert!(e.to_string().ends_with("NESTED TOO DEEPLY"), "{}", e);
    assert_eq!(e.line_number(), Some(Parser::MAX_NESTING + 1));
}
