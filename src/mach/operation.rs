use super::Val;
use crate::error;
use crate::lang::Error;
use std::cmp::Ordering;
use std::convert::TryFrom;

type Result<T> = std::result::Result<T, Error>;

/// ## Operators
///
/// Integer arithmetic is checked. A real on either side makes the
/// result real.

pub struct Operation {}

impl Operation {
    fn real(n: f64) -> Result<Val> {
        if n.is_finite() {
            Ok(Val::Real(n))
        } else {
            Err(error!(Overflow))
        }
    }

    pub fn negate(val: Val) -> Result<Val> {
        use Val::*;
        match val {
            Integer(n) => match n.checked_neg() {
                Some(n) => Ok(Integer(n)),
                None => Err(error!(Overflow)),
            },
            Real(n) => Ok(Real(-n)),
            String(_) => Err(error!(TypeMismatch)),
        }
    }

    pub fn not(val: Val) -> Result<Val> {
        Ok(Val::Integer(!i64::try_from(val)?))
    }

    pub fn multiply(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (lhs, rhs) {
            (Integer(l), Integer(r)) => match l.checked_mul(r) {
                Some(i) => Ok(Integer(i)),
                None => Err(error!(Overflow)),
            },
            (Integer(l), Real(r)) => Operation::real(l as f64 * r),
            (Real(l), Integer(r)) => Operation::real(l * r as f64),
            (Real(l), Real(r)) => Operation::real(l * r),
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn divide(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (lhs, rhs) {
            (Integer(l), Integer(r)) => match l.checked_div(r) {
                Some(i) => Ok(Integer(i)),
                None => {
                    if r == 0 {
                        Err(error!(DivisionByZero))
                    } else {
                        Err(error!(Overflow))
                    }
                }
            },
            (l, r) if l.is_numeric() && r.is_numeric() => {
                let (l, r) = (f64::try_from(l)?, f64::try_from(r)?);
                if r == 0.0 {
                    return Err(error!(DivisionByZero));
                }
                Operation::real(l / r)
            }
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn modulus(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (lhs, rhs) {
            (Integer(l), Integer(r)) => match l.checked_rem(r) {
                Some(i) => Ok(Integer(i)),
                None => {
                    if r == 0 {
                        Err(error!(DivisionByZero))
                    } else {
                        Err(error!(Overflow))
                    }
                }
            },
            (l, r) if l.is_numeric() && r.is_numeric() => {
                let (l, r) = (f64::try_from(l)?, f64::try_from(r)?);
                if r == 0.0 {
                    return Err(error!(DivisionByZero));
                }
                Operation::real(l % r)
            }
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn sum(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (lhs, rhs) {
            (String(l), String(r)) => Ok(String((l.to_string() + &r).into())),
            (Integer(l), Integer(r)) => match l.checked_add(r) {
                Some(i) => Ok(Integer(i)),
                None => Err(error!(Overflow)),
            },
            (Integer(l), Real(r)) => Operation::real(l as f64 + r),
            (Real(l), Integer(r)) => Operation::real(l + r as f64),
            (Real(l), Real(r)) => Operation::real(l + r),
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn subtract(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (lhs, rhs) {
            (Integer(l), Integer(r)) => match l.checked_sub(r) {
                Some(i) => Ok(Integer(i)),
                None => Err(error!(Overflow)),
            },
            (Integer(l), Real(r)) => Operation::real(l as f64 - r),
            (Real(l), Integer(r)) => Operation::real(l - r as f64),
            (Real(l), Real(r)) => Operation::real(l - r),
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn and(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Integer(i64::try_from(lhs)? & i64::try_from(rhs)?))
    }

    pub fn or(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Integer(i64::try_from(lhs)? | i64::try_from(rhs)?))
    }

    /// Strings order by character; a string never compares with a number.
    pub fn compare(lhs: &Val, rhs: &Val) -> Result<Ordering> {
        use Val::*;
        let ordering = match (lhs, rhs) {
            (Integer(l), Integer(r)) => Some(l.cmp(r)),
            (Integer(l), Real(r)) => (*l as f64).partial_cmp(r),
            (Real(l), Integer(r)) => l.partial_cmp(&(*r as f64)),
            (Real(l), Real(r)) => l.partial_cmp(r),
            (String(l), String(r)) => Some(l.cmp(r)),
            _ => return Err(error!(TypeMismatch)),
        };
        match ordering {
            Some(ordering) => Ok(ordering),
            None => Err(error!(IllegalFunctionCall; "NOT A NUMBER")),
        }
    }

    pub fn equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from_bool(
            Operation::compare(&lhs, &rhs)? == Ordering::Equal,
        ))
    }

    pub fn not_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from_bool(
            Operation::compare(&lhs, &rhs)? != Ordering::Equal,
        ))
    }

    pub fn less(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from_bool(
            Operation::compare(&lhs, &rhs)? == Ordering::Less,
        ))
    }

    pub fn less_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from_bool(
            Operation::compare(&lhs, &rhs)? != Ordering::Greater,
        ))
    }

    pub fn greater(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from_bool(
            Operation::compare(&lhs, &rhs)? == Ordering::Greater,
        ))
    }

    pub fn greater_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from_bool(
            Operation::compare(&lhs, &rhs)? != Ordering::Less,
        ))
    }
}
