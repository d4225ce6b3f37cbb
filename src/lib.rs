//! # GFA BASIC
//!
//! A structured BASIC in the style of GFA BASIC: labels instead of line
//! numbers, block statements with explicit terminators, procedures and
//! multi-line functions.
//!
//! Run the `gfabasic` executable with a file name to run a program, or
//! with no arguments for an interactive session. Lines entered at the
//! prompt are collected into a program. `RUN` runs it, `LIST` shows it,
//! `NEW` discards it and `BYE` leaves.
//!
//! ```text
//! ' Count down, then say goodbye.
//! FOR I = 3 TO 1 STEP -1
//!   PRINT I
//! NEXT I
//! GOSUB BYE_BYE
//! END
//! BYE_BYE:
//! PRINT "GOODBYE"
//! RETURN
//! ```
//!
//! ## Statements
//!
//! | Statement | Form |
//! |---|---|
//! | Assignment | `X = expr`, `A(I, J) = expr` |
//! | `PRINT` | `PRINT a; b, c` where `;` joins and `,` inserts a tab |
//! | `IF` | `IF expr THEN ... [ELSE ...] ENDIF` |
//! | `WHILE` | `WHILE expr ... WEND` |
//! | `FOR` | `FOR I = a TO b [STEP s] ... NEXT [I]` |
//! | `REPEAT` | `REPEAT ... UNTIL expr` |
//! | `SELECT` | `SELECT CASE expr CASE v: ... ENDSELECT` |
//! | `GOTO`, `GOSUB`, `RETURN` | `GOTO label`, `GOSUB label` |
//! | `ON ERROR GOTO` | `ON ERROR GOTO label`, `ON ERROR GOTO 0` |
//! | `RESUME` | `RESUME`, `RESUME NEXT`, `RESUME label` |
//! | `DATA`, `READ`, `RESTORE` | `RESTORE [label]` |
//! | `DIM` | `DIM A(10), B(3, 3)` with inclusive bounds |
//! | `DEF FN` | `DEF FN SQ(X) = X * X` |
//! | `FUNCTION` | `FUNCTION F(X) ... F = value ... ENDFUNC` |
//! | `PROCEDURE` | `PROCEDURE P(X) ... ENDPROC`, called as `P(1)` |
//! | `POKE` | `POKE address, byte` |
//! | `ALLOCATE`, `FREE` | `ALLOCATE BUF, 16` then `ADDR(BUF)` |
//! | `END`, `STOP` | |
//!
//! Keywords are uppercase. `'` and `REM` start a comment.
//!
//! ## Embedding
//!
//! ```
//! let mut lines = vec![];
//! let status = basic::run("PRINT 2 + 3 * 4", |line| lines.push(line.to_string()));
//! assert_eq!(status, basic::mach::Status::Completed);
//! assert_eq!(lines, vec!["14"]);
//! ```

pub mod lang;
pub mod mach;
pub mod term;

/// Parse, link and run a program with the default configuration.
/// Lexical, syntax and link errors are reported as `Status::Failed`.
pub fn run<F: FnMut(&str)>(source: &str, sink: F) -> mach::Status {
    match mach::Program::parse(source) {
        Ok(program) => mach::Runtime::default().run(&program, sink),
        Err(error) => mach::Status::Failed(error),
    }
}
