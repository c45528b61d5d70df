use crate::{
    error::{Chip8Error, Result},
    memory::TypeAddr,
};

pub const DEFAULT_DEPTH: usize = 16;

/// Return addresses saved by CALL. `limit` of `None` lets it grow without bound.
pub struct Stack {
    addresses: Vec<TypeAddr>,
    limit: Option<usize>,
}

impl Stack {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            addresses: Vec::with_capacity(limit.unwrap_or(DEFAULT_DEPTH)),
            limit,
        }
    }

    pub fn push(&mut self, addr: TypeAddr) -> Result<()> {
        if let Some(depth) = self.limit {
            if self.addresses.len() >= depth {
                return Err(Chip8Error::StackOverflow { depth });
            }
        }
        self.addresses.push(addr);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<TypeAddr> {
        self.addresses.pop()
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}
