use super::{Stack, Val};
use crate::error;
use crate::lang::Error;
use std::collections::HashMap;
use std::convert::TryFrom;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

const MAX_ARRAY_LEN: usize = 1 << 22;

/// ## Variable memory
///
/// Scalars live in the global table unless a call frame declares them
/// local. Arrays are always global.

#[derive(Debug)]
pub struct Var {
    vars: HashMap<Rc<str>, Val>,
    arrays: HashMap<Rc<str>, Array>,
    frames: Stack<HashMap<Rc<str>, Val>>,
}

#[derive(Debug)]
struct Array {
    bounds: Vec<usize>,
    vals: Vec<Val>,
}

impl Default for Var {
    fn default() -> Var {
        Var::new(64)
    }
}

impl Var {
    pub fn new(max_depth: usize) -> Var {
        Var {
            vars: HashMap::new(),
            arrays: HashMap::new(),
            frames: Stack::new("CALL STACK OVERFLOW", max_depth),
        }
    }

    /// Number of active call frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push_frame(&mut self, locals: HashMap<Rc<str>, Val>) -> Result<()> {
        self.frames.push(locals)
    }

    pub fn pop_frame(&mut self) -> Result<()> {
        self.frames.pop().map(|_| ())
    }

    /// Undeclared scalars read as zero.
    pub fn fetch(&self, var_name: &Rc<str>) -> Val {
        if let Some(locals) = self.frames.last() {
            if let Some(val) = locals.get(var_name) {
                return val.clone();
            }
        }
        match self.vars.get(var_name) {
            Some(val) => val.clone(),
            None => Val::default(),
        }
    }

    pub fn store(&mut self, var_name: &Rc<str>, value: Val) {
        if let Some(locals) = self.frames.last_mut() {
            if let Some(var) = locals.get_mut(var_name) {
                *var = value;
                return;
            }
        }
        match self.vars.get_mut(var_name) {
            Some(var) => *var = value,
            None => {
                self.vars.insert(var_name.clone(), value);
            }
        }
    }

    pub fn is_array(&self, var_name: &Rc<str>) -> bool {
        self.arrays.contains_key(var_name)
    }

    /// Bounds are inclusive; `DIM A(3)` holds `A(0)` to `A(3)`.
    pub fn dimension_array(&mut self, var_name: &Rc<str>, bounds: Vec<Val>) -> Result<()> {
        if self.arrays.contains_key(var_name) {
            return Err(error!(RedimensionedArray));
        }
        let bounds = Var::vec_val_to_vec_usize(bounds)?;
        let mut len: usize = 1;
        for bound in &bounds {
            len = match bound.checked_add(1).and_then(|n| n.checked_mul(len)) {
                Some(len) if len <= MAX_ARRAY_LEN => len,
                _ => return Err(error!(OutOfMemory; "ARRAY TOO LARGE")),
            };
        }
        let array = Array {
            bounds,
            vals: vec![Val::default(); len],
        };
        self.arrays.insert(var_name.clone(), array);
        Ok(())
    }

    pub fn fetch_array(&self, var_name: &Rc<str>, indices: Vec<Val>) -> Result<Val> {
        let array = match self.arrays.get(var_name) {
            Some(array) => array,
            None => return Err(error!(UndefinedArray)),
        };
        let offset = array.offset(indices)?;
        Ok(array.vals[offset].clone())
    }

    pub fn store_array(&mut self, var_name: &Rc<str>, indices: Vec<Val>, value: Val) -> Result<()> {
        let array = match self.arrays.get_mut(var_name) {
            Some(array) => array,
            None => return Err(error!(UndefinedArray)),
        };
        let offset = array.offset(indices)?;
        array.vals[offset] = value;
        Ok(())
    }

    fn vec_val_to_vec_usize(arr: Vec<Val>) -> Result<Vec<usize>> {
        let mut vec_usize: Vec<usize> = vec![];
        for v in arr {
            match usize::try_from(i64::try_from(v)?) {
                Ok(i) => vec_usize.push(i),
                Err(_) => return Err(error!(SubscriptOutOfRange)),
            }
        }
        Ok(vec_usize)
    }
}

impl Array {
    fn offset(&self, indices: Vec<Val>) -> Result<usize> {
        if indices.len() != self.bounds.len() {
            return Err(error!(SubscriptOutOfRange; "WRONG NUMBER OF SUBSCRIPTS"));
        }
        let indices = Var::vec_val_to_vec_usize(indices)?;
        let mut offset = 0;
        for (index, bound) in indices.iter().zip(&self.bounds) {
            if index > bound {
                return Err(error!(SubscriptOutOfRange));
            }
            offset = offset * (bound + 1) + index;
        }
        Ok(offset)
    }
}
