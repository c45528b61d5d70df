use std::fmt;

use crate::memory::{TypeAddr, PROGRAM_START};

pub const FLAG: u8 = 0xF;

pub struct Registers {
    registers: [u8; 16],
    pub pc: ProgramCounter,
    pub index: IndexRegister,
}

impl Registers {
    pub fn new() -> Self {
        Self {
            registers: [0; 16],
            pc: ProgramCounter(PROGRAM_START),
            index: IndexRegister(0x0),
        }
    }

    pub fn set_register(&mut self, reg_num: u8, value: u8) {
        self.registers[(reg_num & 0xF) as usize] = value;
    }

    pub fn add_to_register(&mut self, reg_num: u8, value: u8) {
        let total = self.get(reg_num).wrapping_add(value);
        self.set_register(reg_num, total);
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[(reg_num & 0xF) as usize]
    }

    /// Result first, then VF: with VF as the target the flag survives (ADD).
    pub fn set_with_flag(&mut self, reg_num: u8, value: u8, flag: bool) {
        self.set_register(reg_num, value);
        self.set_register(FLAG, flag as u8);
    }

    /// VF first, then the result: with VF as the target the result survives
    /// (SUB, SHR, SUBN, SHL).
    pub fn set_flag_then(&mut self, reg_num: u8, value: u8, flag: bool) {
        self.set_register(FLAG, flag as u8);
        self.set_register(reg_num, value);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.registers
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, v) in self.registers.iter().enumerate() {
            write!(f, "{:x}:{:#04x} ", n, v)?;
            if n == 7 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// Special registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl ProgramCounter {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(2);
    }

    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRegister(pub TypeAddr);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }

    // 16 bits wide, no 12-bit mask
    pub fn offset(&mut self, by: u16) {
        self.0 = self.0.wrapping_add(by);
    }
}
