use crate::error;
use crate::lang::Error;
use std::collections::{BTreeMap, HashMap};
use std::convert::TryFrom;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Simulated memory
///
/// A private byte array for POKE and PEEK. ALLOCATE reserves named
/// blocks with first fit placement.

#[derive(Debug)]
pub struct Memory {
    bytes: Vec<u8>,
    blocks: BTreeMap<usize, usize>,
    names: HashMap<Rc<str>, usize>,
}

impl Memory {
    pub fn new(size: usize) -> Memory {
        Memory {
            bytes: vec![0; size],
            blocks: BTreeMap::new(),
            names: HashMap::new(),
        }
    }

    fn address(&self, addr: i64) -> Result<usize> {
        match usize::try_from(addr) {
            Ok(addr) if addr < self.bytes.len() => Ok(addr),
            _ => Err(error!(AddressOutOfRange)),
        }
    }

    pub fn peek(&self, addr: i64) -> Result<u8> {
        Ok(self.bytes[self.address(addr)?])
    }

    pub fn poke(&mut self, addr: i64, value: i64) -> Result<()> {
        let addr = self.address(addr)?;
        match u8::try_from(value) {
            Ok(byte) => {
                self.bytes[addr] = byte;
                Ok(())
            }
            Err(_) => Err(error!(IllegalFunctionCall; "VALUE MUST BE 0 TO 255")),
        }
    }

    /// Reserve `size` zeroed bytes under `name` and return the base address.
    pub fn allocate(&mut self, name: &Rc<str>, size: i64) -> Result<usize> {
        if self.names.contains_key(name) {
            return Err(error!(IllegalFunctionCall; "ALREADY ALLOCATED"));
        }
        let size = match usize::try_from(size) {
            Ok(size) if size > 0 => size,
            _ => return Err(error!(IllegalFunctionCall; "INVALID SIZE")),
        };
        let mut base = 0;
        for (start, len) in &self.blocks {
            if start - base >= size {
                break;
            }
            base = start + len;
        }
        if self.bytes.len() < base || self.bytes.len() - base < size {
            return Err(error!(OutOfMemory; "NO ROOM TO ALLOCATE"));
        }
        for byte in &mut self.bytes[base..base + size] {
            *byte = 0;
        }
        self.blocks.insert(base, size);
        self.names.insert(name.clone(), base);
        Ok(base)
    }

    pub fn free(&mut self, name: &Rc<str>) -> Result<()> {
        match self.names.remove(name) {
            Some(base) => {
                self.blocks.remove(&base);
                Ok(())
            }
            None => Err(error!(IllegalFunctionCall; "NOT ALLOCATED")),
        }
    }

    pub fn addr(&self, name: &Rc<str>) -> Option<usize> {
        self.names.get(name).copied()
    }
}
