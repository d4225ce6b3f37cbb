use crate::error;
use crate::lang::Error;
use std::convert::TryFrom;
use std::rc::Rc;

/// ## Runtime value

#[derive(Debug, Clone, PartialEq)]
pub enum Val {
    Integer(i64),
    Real(f64),
    String(Rc<str>),
}

impl Val {
    /// Truthiness for IF, WHILE and UNTIL. Strings are never conditions.
    pub fn is_true(&self) -> Result<bool, Error> {
        match self {
            Val::Integer(n) => Ok(*n != 0),
            Val::Real(n) => Ok(*n != 0.0),
            Val::String(_) => Err(error!(TypeMismatch)),
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Val::String(_))
    }

    pub fn from_bool(b: bool) -> Val {
        if b {
            Val::Integer(-1)
        } else {
            Val::Integer(0)
        }
    }
}

impl Default for Val {
    fn default() -> Val {
        Val::Integer(0)
    }
}

impl TryFrom<Val> for i64 {
    type Error = Error;

    /// Reals round to the nearest integer.
    fn try_from(val: Val) -> Result<i64, Error> {
        match val {
            Val::Integer(n) => Ok(n),
            Val::Real(n) => {
                let n = n.round();
                if n.is_finite() && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
                    Ok(n as i64)
                } else {
                    Err(error!(Overflow))
                }
            }
            Val::String(_) => Err(error!(TypeMismatch)),
        }
    }
}

impl TryFrom<Val> for f64 {
    type Error = Error;

    fn try_from(val: Val) -> Result<f64, Error> {
        match val {
            Val::Integer(n) => Ok(n as f64),
            Val::Real(n) => Ok(n),
            Val::String(_) => Err(error!(TypeMismatch)),
        }
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Val::Integer(n) => write!(f, "{}", n),
            Val::Real(n) => write!(f, "{}", n),
            Val::String(s) => write!(f, "{}", s),
        }
    }
}
