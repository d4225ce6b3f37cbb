mod common;
use basic::mach::Config;
use common::*;

#[test]
fn test_string_functions() {
    assert_eq!(exec("PRINT LEN(\"HELLO\")"), "5\n");
    assert_eq!(exec("PRINT LEFT(\"HELLO\", 2)"), "HE\n");
    assert_eq!(exec("PRINT RIGHT(\"HELLO\", 3)"), "LLO\n");
    assert_eq!(exec("PRINT MID(\"HELLO\", 2, 3)"), "ELL\n");
    assert_eq!(exec("PRINT MID(\"HELLO\", 3)"), "LLO\n");
    assert_eq!(exec("PRINT INSTR(\"HELLO\", \"L\")"), "3\n");
    assert_eq!(exec("PRINT INSTR(\"HELLO\", \"L\", 4)"), "4\n");
    assert_eq!(exec("PRINT INSTR(\"HELLO\", \"Z\")"), "0\n");
}

#[test]
fn test_conversions() {
    assert_eq!(exec("PRINT CHR(65); ASC(\"A\")"), "A65\n");
    assert_eq!(exec("PRINT STR(42) + \"!\""), "42!\n");
    assert_eq!(exec("PRINT VAL(\"12AB\") + 1"), "13\n");
    assert_eq!(exec("PRINT VAL(\"X\")"), "0\n");
}

#[test]
fn test_numeric_functions() {
    assert_eq!(exec("PRINT ABS(-3)"), "3\n");
    assert_eq!(exec("PRINT SGN(-2.5)"), "-1\n");
    assert_eq!(exec("PRINT INT(-2.5)"), "-3\n");
    assert_eq!(exec("PRINT FIX(-2.5)"), "-2\n");
    assert_eq!(exec("PRINT SQR(16)"), "4\n");
    assert!(exec("PRINT SQR(-1)").starts_with("ILLEGAL FUNCTION CALL"));
}

#[test]
fn test_rnd() {
    assert_eq!(exec("X = RND\nPRINT X >= 0 AND X < 1"), "-1\n");
    let s = "PRINT RND\nPRINT RND(1)";
    let config = Config {
        seed: Some(42),
        ..Config::default()
    };
    assert_eq!(exec_with(config.clone(), s), exec_with(config, s));
}

#[test]
fn test_def_fn() {
    assert_eq!(exec("DEF FN SQ(X) = X * X\nPRINT SQ(4)\nPRINT FN SQ(3)"), "16\n9\n");
    assert_eq!(exec("X = 10\nDEF FN ADDX(N) = N + X\nPRINT ADDX(1)"), "11\n");
}

#[test]
fn test_multi_line_function() {
    let s = "FUNCTION FACT(N)\nIF N <= 1 THEN\nFACT = 1\nELSE\nFACT = N * FACT(N - 1)\nENDIF\nENDFUNC\nPRINT FACT(5)";
    assert_eq!(exec(s), "120\n");
}

#[test]
fn test_wrong_number_of_arguments() {
    let s = exec("DEF FN F(X) = X\nPRINT F(1, 2)");
    assert!(s.starts_with("ILLEGAL FUNCTION CALL IN 2"), "{}", s);
    assert!(s.ends_with("WRONG NUMBER OF ARGUMENTS\n"), "{}", s);
    assert!(exec("PRINT LEFT(\"A\")").ends_with("WRONG NUMBER OF ARGUMENTS\n"));
}

#[test]
fn test_undefined_callables() {
    assert_eq!(exec("PRINT G(1)"), "UNDEFINED ARRAY IN 1 (6..7)\n");
    assert_eq!(exec("NOPE"), "UNDEFINED USER FUNCTION IN 1 (0..4)\n");
    assert!(exec("PROCEDURE P\nENDPROC\nX = P()").ends_with("PROCEDURE HAS NO VALUE\n"));
}

#[test]
fn test_call_depth_is_bounded() {
    let config = Config {
        max_depth: 16,
        ..Config::default()
    };
    let s = exec_with(config, "DEF FN F(X) = F(X + 1)\nPRINT F(1)");
    assert!(s.starts_with("OUT OF MEMORY"), "{}", s);
    assert!(s.ends_with("CALL STACK OVERFLOW\n"), "{}", s);
}

#[test]
fn test_default_depth_limit() {
    let depth = Config::default().max_depth;
    let f = "FUNCTION F(N)\nIF N <= 1 THEN\nF = 1\nELSE\nF = 1 + F(N - 1)\nENDIF\nENDFUNC";
    assert_eq!(exec(&format!("PRINT F({})\n{}", depth - 1, f)), format!("{}\n", depth - 1));
    assert_eq!(exec(&format!("PRINT F({})\n{}", depth, f)), format!("{}\n", depth));
    let s = exec(&format!("PRINT F({})\n{}", depth + 1, f));
    assert!(s.ends_with("CALL STACK OVERFLOW\n"), "{}", s);
}
