use super::Val;
use crate::error;
use crate::lang::Error;

/// ## DATA segment
///
/// Every DATA value in program order, tagged with the sequence number
/// of the statement that declared it.

#[derive(Debug, Default, Clone)]
pub struct Data {
    values: Vec<(usize, Val)>,
    cursor: usize,
}

impl Data {
    pub fn new() -> Data {
        Data::default()
    }

    pub fn push(&mut self, seq: usize, val: Val) {
        debug_assert!(self.values.last().map_or(true, |(s, _)| *s <= seq));
        self.values.push((seq, val));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn read(&mut self) -> Result<Val, Error> {
        match self.values.get(self.cursor) {
            Some((_, val)) => {
                self.cursor += 1;
                Ok(val.clone())
            }
            None => Err(error!(OutOfData)),
        }
    }

    pub fn restore(&mut self) {
        self.cursor = 0;
    }

    /// Move to the first value declared at or after `seq`.
    pub fn restore_to(&mut self, seq: usize) {
        let end = self.values.len();
        self.cursor = self
            .values
            .iter()
            .position(|(s, _)| *s >= seq)
            .unwrap_or(end);
    }
}
