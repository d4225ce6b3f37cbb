use super::*;

#[test]
fn test_gosub_from_loop() {
    let s = "FOR I = 1 TO 2\nGOSUB SHOW\nNEXT\nEND\nSHOW:\nPRINT I\nRETURN";
    assert_eq!(run(s), "1\n2\n");
}

#[test]
fn test_return_inside_loop_ends_subroutine() {
    let s = "GOSUB SUB\nPRINT \"BACK\"\nEND\nSUB:\nWHILE 1\nRETURN\nWEND";
    assert_eq!(run(s), "BACK\n");
}

#[test]
fn test_subroutine_falling_off_the_end() {
    assert_eq!(run("GOSUB SUB\nPRINT \"NEVER\"\nSUB:\nPRINT \"SUB\""), "SUB\n");
}

#[test]
fn test_gosub_depth() {
    let config = Config {
        max_depth: 8,
        ..Config::default()
    };
    let s = run_with(config, "DEEP:\nGOSUB DEEP");
    assert_eq!(s, "OUT OF MEMORY IN 2 (6..11); GOSUB STACK OVERFLOW\n");
}

#[test]
fn test_return_from_procedure_needs_own_gosub() {
    let s = "GOSUB SUB\nEND\nSUB:\nP\nRETURN\nPROCEDURE P\nRETURN\nENDPROC";
    assert_eq!(run(s), "RETURN WITHOUT GOSUB IN 7 (40..46)\n");
}

#[test]
fn test_goto_backwards() {
    let s = "I = 0\nAGAIN:\nI = I + 1\nIF I < 3 THEN\nGOTO AGAIN\nENDIF\nPRINT I";
    assert_eq!(run(s), "3\n");
}

#[test]
fn test_end_inside_function_stops_program() {
    let s = "FUNCTION F(X)\nEND\nENDFUNC\nY = F(1)\nPRINT \"NEVER\"";
    assert_eq!(run(s), "");
}

#[test]
fn test_stop() {
    assert_eq!(run("PRINT 1\nSTOP\nPRINT 2"), "1\nBREAK\n");
}
