use super::Val;
use crate::error;
use crate::lang::token::Builtin;
use crate::lang::Error;
use rand::Rng;
use std::convert::TryFrom;
use std::ops::RangeInclusive;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Built-in functions

pub struct Function {}

impl Function {
    pub fn arity(function: Builtin) -> RangeInclusive<usize> {
        match function {
            Builtin::Rnd => 0..=1,
            Builtin::Left | Builtin::Right => 2..=2,
            Builtin::Instr | Builtin::Mid => 2..=3,
            _ => 1..=1,
        }
    }

    pub fn call<R: Rng>(function: Builtin, mut args: Vec<Val>, rng: &mut R) -> Result<Val> {
        if !Function::arity(function).contains(&args.len()) {
            return Err(error!(IllegalFunctionCall; "WRONG NUMBER OF ARGUMENTS"));
        }
        match function {
            Builtin::Abs => Function::abs(args.remove(0)),
            Builtin::Asc => Function::asc(args.remove(0)),
            Builtin::Atn => Function::real(args.remove(0), f64::atan),
            Builtin::Chr => Function::chr(args.remove(0)),
            Builtin::Cos => Function::real(args.remove(0), f64::cos),
            Builtin::Exp => Function::real(args.remove(0), f64::exp),
            Builtin::Fix => Function::integer(args.remove(0), f64::trunc),
            Builtin::Instr => Function::instr(args),
            Builtin::Int => Function::integer(args.remove(0), f64::floor),
            Builtin::Left => Function::left(args),
            Builtin::Len => {
                let s = Function::string(args.remove(0))?;
                Ok(Val::Integer(s.chars().count() as i64))
            }
            Builtin::Log => match f64::try_from(args.remove(0))? {
                n if n > 0.0 => Ok(Val::Real(n.ln())),
                _ => Err(error!(IllegalFunctionCall)),
            },
            Builtin::Mid => Function::mid(args),
            Builtin::Right => Function::right(args),
            Builtin::Rnd => Ok(Val::Real(rng.gen::<f64>())),
            Builtin::Sgn => match f64::try_from(args.remove(0))? {
                n if n > 0.0 => Ok(Val::Integer(1)),
                n if n < 0.0 => Ok(Val::Integer(-1)),
                _ => Ok(Val::Integer(0)),
            },
            Builtin::Sin => Function::real(args.remove(0), f64::sin),
            Builtin::Sqr => match f64::try_from(args.remove(0))? {
                n if n >= 0.0 => Ok(Val::Real(n.sqrt())),
                _ => Err(error!(IllegalFunctionCall)),
            },
            Builtin::Str => match args.remove(0) {
                Val::String(_) => Err(error!(TypeMismatch)),
                val => Ok(Val::String(val.to_string().into())),
            },
            Builtin::Tan => Function::real(args.remove(0), f64::tan),
            Builtin::Val => Function::val(args.remove(0)),
            Builtin::Addr | Builtin::Peek => {
                Err(error!(InternalError; "NOT A VALUE FUNCTION"))
            }
        }
    }

    fn string(val: Val) -> Result<Rc<str>> {
        match val {
            Val::String(s) => Ok(s),
            _ => Err(error!(TypeMismatch)),
        }
    }

    fn count(val: Val) -> Result<usize> {
        match usize::try_from(i64::try_from(val)?) {
            Ok(n) => Ok(n),
            Err(_) => Err(error!(IllegalFunctionCall)),
        }
    }

    fn real(val: Val, f: fn(f64) -> f64) -> Result<Val> {
        let n = f(f64::try_from(val)?);
        if n.is_finite() {
            Ok(Val::Real(n))
        } else {
            Err(error!(Overflow))
        }
    }

    fn integer(val: Val, f: fn(f64) -> f64) -> Result<Val> {
        match val {
            Val::Integer(n) => Ok(Val::Integer(n)),
            Val::Real(n) => {
                let n = f(n);
                if n >= i64::MIN as f64 && n <= i64::MAX as f64 {
                    Ok(Val::Integer(n as i64))
                } else {
                    Err(error!(Overflow))
                }
            }
            Val::String(_) => Err(error!(TypeMismatch)),
        }
    }

    fn abs(val: Val) -> Result<Val> {
        match val {
            Val::Integer(n) => match n.checked_abs() {
                Some(n) => Ok(Val::Integer(n)),
                None => Err(error!(Overflow)),
            },
            Val::Real(n) => Ok(Val::Real(n.abs())),
            Val::String(_) => Err(error!(TypeMismatch)),
        }
    }

    fn asc(val: Val) -> Result<Val> {
        match Function::string(val)?.chars().next() {
            Some(ch) => Ok(Val::Integer(ch as i64)),
            None => Err(error!(IllegalFunctionCall)),
        }
    }

    fn chr(val: Val) -> Result<Val> {
        let code = i64::try_from(val)?;
        match u32::try_from(code).ok().and_then(std::char::from_u32) {
            Some(ch) if code <= 255 => Ok(Val::String(ch.to_string().into())),
            _ => Err(error!(IllegalFunctionCall)),
        }
    }

    fn left(mut args: Vec<Val>) -> Result<Val> {
        let n = Function::count(args.remove(1))?;
        let s = Function::string(args.remove(0))?;
        Ok(Val::String(s.chars().take(n).collect::<String>().into()))
    }

    fn right(mut args: Vec<Val>) -> Result<Val> {
        let n = Function::count(args.remove(1))?;
        let s = Function::string(args.remove(0))?;
        let skip = s.chars().count().saturating_sub(n);
        Ok(Val::String(s.chars().skip(skip).collect::<String>().into()))
    }

    /// `MID(s, start [, len])` with a one based start.
    fn mid(mut args: Vec<Val>) -> Result<Val> {
        let len = if args.len() == 3 {
            Some(Function::count(args.remove(2))?)
        } else {
            None
        };
        let start = Function::count(args.remove(1))?;
        let s = Function::string(args.remove(0))?;
        if start == 0 {
            return Err(error!(IllegalFunctionCall));
        }
        let chars = s.chars().skip(start - 1);
        let r: String = match len {
            Some(len) => chars.take(len).collect(),
            None => chars.collect(),
        };
        Ok(Val::String(r.into()))
    }

    /// `INSTR(haystack, needle [, start])`, one based, zero when absent.
    fn instr(mut args: Vec<Val>) -> Result<Val> {
        let start = if args.len() == 3 {
            Function::count(args.remove(2))?
        } else {
            1
        };
        let needle = Function::string(args.remove(1))?;
        let haystack = Function::string(args.remove(0))?;
        if start == 0 {
            return Err(error!(IllegalFunctionCall));
        }
        let haystack: Vec<char> = haystack.chars().collect();
        let needle: Vec<char> = needle.chars().collect();
        if start > haystack.len() + 1 {
            return Ok(Val::Integer(0));
        }
        if needle.is_empty() {
            return Ok(Val::Integer(start as i64));
        }
        for i in (start - 1)..haystack.len() {
            if haystack[i..].starts_with(&needle) {
                return Ok(Val::Integer(i as i64 + 1));
            }
        }
        Ok(Val::Integer(0))
    }

    /// Leading number of a string, zero when there is none.
    fn val(val: Val) -> Result<Val> {
        let s = Function::string(val)?;
        let s = s.trim();
        let end = s
            .char_indices()
            .take_while(|(i, c)| {
                c.is_ascii_digit() || *c == '.' || (*i == 0 && (*c == '-' || *c == '+'))
            })
            .map(|(i, c)| i + c.len_utf8())
            .last()
            .unwrap_or(0);
        let s = &s[..end];
        if let Ok(n) = s.parse::<i64>() {
            return Ok(Val::Integer(n));
        }
        match s.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Val::Real(n)),
            _ => Ok(Val::Integer(0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn call(function: Builtin, args: Vec<Val>) -> Result<Val> {
        let mut rng = StdRng::seed_from_u64(1);
        Function::call(function, args, &mut rng)
    }

    fn s(s: &str) -> Val {
        Val::String(s.into())
    }

    #[test]
    fn test_strings() {
        assert_eq!(call(Builtin::Left, vec![s("HELLO"), Val::Integer(2)]), Ok(s("HE")));
        assert_eq!(call(Builtin::Right, vec![s("HELLO"), Val::Integer(3)]), Ok(s("LLO")));
        assert_eq!(call(Builtin::Right, vec![s("HI"), Val::Integer(9)]), Ok(s("HI")));
        assert_eq!(
            call(Builtin::Mid, vec![s("HELLO"), Val::Integer(2), Val::Integer(3)]),
            Ok(s("ELL"))
        );
        assert_eq!(call(Builtin::Mid, vec![s("HELLO"), Val::Integer(4)]), Ok(s("LO")));
        assert_eq!(call(Builtin::Len, vec![s("HELLO")]), Ok(Val::Integer(5)));
        assert_eq!(call(Builtin::Instr, vec![s("HELLO"), s("L")]), Ok(Val::Integer(3)));
        assert_eq!(
            call(Builtin::Instr, vec![s("HELLO"), s("L"), Val::Integer(4)]),
            Ok(Val::Integer(4))
        );
        assert_eq!(call(Builtin::Instr, vec![s("HELLO"), s("Z")]), Ok(Val::Integer(0)));
        assert_eq!(call(Builtin::Chr, vec![Val::Integer(65)]), Ok(s("A")));
        assert_eq!(call(Builtin::Asc, vec![s("A")]), Ok(Val::Integer(65)));
        assert_eq!(call(Builtin::Str, vec![Val::Integer(-3)]), Ok(s("-3")));
        assert_eq!(call(Builtin::Val, vec![s(" 12AB")]), Ok(Val::Integer(12)));
        assert_eq!(call(Builtin::Val, vec![s("-1.5")]), Ok(Val::Real(-1.5)));
        assert_eq!(call(Builtin::Val, vec![s("X")]), Ok(Val::Integer(0)));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(call(Builtin::Int, vec![Val::Real(-2.5)]), Ok(Val::Integer(-3)));
        assert_eq!(call(Builtin::Fix, vec![Val::Real(-2.5)]), Ok(Val::Integer(-2)));
        assert_eq!(call(Builtin::Abs, vec![Val::Integer(-4)]), Ok(Val::Integer(4)));
        assert_eq!(call(Builtin::Sgn, vec![Val::Real(-0.1)]), Ok(Val::Integer(-1)));
        assert_eq!(call(Builtin::Sqr, vec![Val::Integer(16)]), Ok(Val::Real(4.0)));
        assert_eq!(call(Builtin::Sqr, vec![Val::Integer(-1)]).unwrap_err().code(), 5);
        assert_eq!(call(Builtin::Log, vec![Val::Integer(0)]).unwrap_err().code(), 5);
        assert_eq!(call(Builtin::Cos, vec![Val::Integer(0)]), Ok(Val::Real(1.0)));
    }

    #[test]
    fn test_rnd_range() {
        for _ in 0..100 {
            match call(Builtin::Rnd, vec![]) {
                Ok(Val::Real(n)) => assert!((0.0..1.0).contains(&n)),
                r => panic!("{:?}", r),
            }
        }
    }

    #[test]
    fn test_arity_and_types() {
        assert_eq!(call(Builtin::Len, vec![]).unwrap_err().code(), 5);
        assert_eq!(call(Builtin::Left, vec![s("A")]).unwrap_err().code(), 5);
        assert_eq!(call(Builtin::Len, vec![Val::Integer(1)]).unwrap_err().code(), 13);
        assert_eq!(call(Builtin::Chr, vec![Val::Integer(256)]).unwrap_err().code(), 5);
    }
}
