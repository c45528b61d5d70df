use std::{fmt, path::Path};

use log::{debug, log_enabled, trace, warn, Level};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    config::Config,
    decode::{OpCodes, Operands, RawInstruction},
    display::FrameBuffer,
    error::{Chip8Error, Result},
    keyboard::Keyboard,
    memory::{FontBytes, Memory, TypeAddr, FONT_START, GLYPH_BYTES},
    registers::{Registers, FLAG},
    stack::Stack,
    timer::Timer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    /// FX0A executed; the next key press lands in this register.
    WaitingForKey(u8),
}

/// What a single cycle did, as far as the host is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    Continue,
    /// CLS or DRW changed the frame buffer.
    Redraw,
    /// Waiting for a key; no instruction was fetched.
    Blocked,
}

pub struct Emulator {
    fb: FrameBuffer,
    pub regs: Registers,
    pub mem: Memory,
    pub stack: Stack,
    pub delay_timer: Timer,
    pub sound_timer: Timer,
    pub keyboard: Keyboard,
    state: State,
    rng: StdRng,
    strict_opcodes: bool,
}

impl Emulator {
    pub fn init(config: &Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            fb: FrameBuffer::new(),
            regs: Registers::new(),
            mem: Memory::new(),
            stack: Stack::new(config.stack_depth),
            delay_timer: Timer::default(),
            sound_timer: Timer::default(),
            keyboard: Keyboard::new(),
            state: State::Running,
            rng,
            strict_opcodes: config.strict_opcodes,
        }
    }

    pub fn load_font(&mut self, font: &FontBytes) {
        self.mem.load_font(font);
    }

    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<()> {
        self.mem.load_rom(bytes)
    }

    pub fn load_rom_by_file(&mut self, path: &Path) -> Result<()> {
        self.mem.load_rom_by_file(path)
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn sound_active(&self) -> bool {
        self.sound_timer.is_active()
    }

    /// One fetch/decode/execute cycle. Timers are ticked separately, see
    /// `tick_timers`.
    pub fn step(&mut self) -> Result<Cycle> {
        if let State::WaitingForKey(_) = self.state {
            return Ok(Cycle::Blocked);
        }
        let ins = self.mem.read_word(self.regs.pc.0)?;
        self.run_opcode(ins)
    }

    /// Advances PC past `ins` and executes it, as if it had just been fetched.
    pub fn run_opcode(&mut self, ins: u16) -> Result<Cycle> {
        let addr = self.regs.pc.0;
        self.regs.pc.increment();

        let operation = match OpCodes::decode_raw(ins, addr) {
            Ok(op) => op,
            Err(err) if !err.is_fatal() && !self.strict_opcodes => {
                warn!("{err}, skipping");
                return Ok(Cycle::Continue);
            }
            Err(err) => return Err(err),
        };

        if log_enabled!(Level::Trace) {
            let operands = Operands::extract(RawInstruction::new(ins)).values();
            trace!(
                "{addr:03x}: {ins:04x} {} {:x?} ({operation:?})",
                operation.mnemonic(),
                operands
            );
        }

        let cycle = self.execute_ins(operation)?;
        trace!("\n{self}");
        Ok(cycle)
    }

    pub fn execute_ins(&mut self, ins: OpCodes) -> Result<Cycle> {
        match ins {
            OpCodes::System(addr) => {
                debug!("ignoring SYS {addr:#05x}");
            }
            OpCodes::ClearScreen => {
                self.fb.clear_buffer();
                return Ok(Cycle::Redraw);
            }
            OpCodes::PopSubroutine => {
                let addr = self.stack.pop().ok_or(Chip8Error::StackUnderflow {
                    addr: self.regs.pc.0.wrapping_sub(2),
                })?;
                self.regs.pc.set_addr(addr);
            }
            OpCodes::Jump(addr) => {
                self.regs.pc.set_addr(addr);
            }
            OpCodes::PushSubroutine(addr) => {
                // PC already points past the CALL
                self.stack.push(self.regs.pc.0)?;
                self.regs.pc.set_addr(addr);
            }
            OpCodes::SkipEqualConstant(vx, nn) => {
                if self.regs.get(vx) == nn {
                    self.regs.pc.increment();
                }
            }
            OpCodes::SkipNotEqualConstant(vx, nn) => {
                if self.regs.get(vx) != nn {
                    self.regs.pc.increment();
                }
            }
            OpCodes::SkipEqualRegister(vx, vy) => {
                if self.regs.get(vx) == self.regs.get(vy) {
                    self.regs.pc.increment();
                }
            }
            OpCodes::SkipNotEqualRegister(vx, vy) => {
                if self.regs.get(vx) != self.regs.get(vy) {
                    self.regs.pc.increment();
                }
            }
            OpCodes::SetRegister(vx, nn) => {
                self.regs.set_register(vx, nn);
            }
            OpCodes::AddToRegister(vx, nn) => {
                self.regs.add_to_register(vx, nn);
            }
            OpCodes::CopyRegister(vx, vy) => {
                self.regs.set_register(vx, self.regs.get(vy));
            }
            OpCodes::Or(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) | self.regs.get(vy));
            }
            OpCodes::And(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) & self.regs.get(vy));
            }
            OpCodes::XOr(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) ^ self.regs.get(vy));
            }
            OpCodes::Add(vx, vy) => {
                let (sum, carry) = self.regs.get(vx).overflowing_add(self.regs.get(vy));
                self.regs.set_with_flag(vx, sum, carry);
            }
            OpCodes::SubtractForward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                // VF = NOT borrow
                self.regs.set_flag_then(vx, x.wrapping_sub(y), x >= y);
            }
            OpCodes::SubtractBackward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_flag_then(vx, y.wrapping_sub(x), y >= x);
            }
            OpCodes::RightShift(vx, vy) => {
                let value = self.regs.get(vy);
                self.regs.set_flag_then(vx, value >> 1, value & 1 == 1);
            }
            OpCodes::LeftShift(vx, vy) => {
                let value = self.regs.get(vy);
                self.regs.set_flag_then(vx, value << 1, (value >> 7) & 1 == 1);
            }
            OpCodes::SetIndexRegister(addr) => self.regs.index.set_addr(addr),
            OpCodes::JumpWithOffset(addr) => {
                self.regs.pc.set_addr(addr + self.regs.get(0) as TypeAddr);
            }
            OpCodes::Random(vx, nn) => {
                let ransuu: u8 = self.rng.gen();
                self.regs.set_register(vx, nn & ransuu);
            }
            OpCodes::Display(reg_x, reg_y, height) => {
                let (x, y) = (self.regs.get(reg_x), self.regs.get(reg_y));
                // From I to I + N, plot I at VX, VY
                let sprite = self
                    .mem
                    .slice(self.regs.index.0 as usize, height as usize)?;
                let (fb, collided) = self.fb.draw(x, y, sprite);
                self.fb = fb;
                self.regs.set_register(FLAG, collided as u8);
                return Ok(Cycle::Redraw);
            }
            OpCodes::SkipIfPressed(vx) => {
                if self.keyboard.get_key_status_from_num(self.regs.get(vx))? {
                    self.regs.pc.increment();
                }
            }
            OpCodes::SkipIfNotPressed(vx) => {
                if !self.keyboard.get_key_status_from_num(self.regs.get(vx))? {
                    self.regs.pc.increment();
                }
            }
            OpCodes::CopyDelayToRegister(vx) => {
                self.regs.set_register(vx, self.delay_timer.count)
            }
            OpCodes::GetKey(vx) => {
                debug!("waiting for a key into v{vx:x}");
                self.state = State::WaitingForKey(vx);
                return Ok(Cycle::Blocked);
            }
            OpCodes::CopyRegisterToDelay(vx) => self.delay_timer.set(self.regs.get(vx)),
            OpCodes::CopyRegisterToSound(vx) => self.sound_timer.set(self.regs.get(vx)),
            OpCodes::AddToIndex(vx) => self.regs.index.offset(self.regs.get(vx) as u16),
            OpCodes::PointChar(vx) => {
                let glyph = (self.regs.get(vx) & 0xF) as TypeAddr;
                self.regs
                    .index
                    .set_addr(FONT_START + glyph * GLYPH_BYTES as TypeAddr);
            }
            OpCodes::ToDecimal(vx) => {
                let value = self.regs.get(vx);
                let digits = [value / 100, (value / 10) % 10, value % 10];
                self.mem
                    .slice_mut(self.regs.index.0 as usize, digits.len())?
                    .copy_from_slice(&digits);
            }
            OpCodes::StoreRegisterToMemory(vx) => {
                let count = vx as usize + 1;
                let values = &self.regs.as_slice()[..count];
                self.mem
                    .slice_mut(self.regs.index.0 as usize, count)?
                    .copy_from_slice(values);
                self.regs.index.offset(count as u16);
            }
            OpCodes::LoadRegisterFromMemory(vx) => {
                let count = vx as usize + 1;
                let values = self.mem.slice(self.regs.index.0 as usize, count)?;
                for (reg, value) in values.iter().enumerate() {
                    self.regs.set_register(reg as u8, *value);
                }
                self.regs.index.offset(count as u16);
            }
        }
        Ok(Cycle::Continue)
    }

    pub fn key_down(&mut self, key: u8) -> Result<()> {
        self.keyboard.update_key(key, true)?;
        if let State::WaitingForKey(vx) = self.state {
            debug!("key {key:x} pressed, resuming");
            self.regs.set_register(vx, key);
            self.state = State::Running;
        }
        Ok(())
    }

    pub fn key_up(&mut self, key: u8) -> Result<()> {
        self.keyboard.update_key(key, false)
    }

    pub fn tick_timers(&mut self) {
        self.delay_timer.decrement();
        self.sound_timer.decrement();
    }
}

impl fmt::Display for Emulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "pc {:#05x}  dt {:#04x}  st {:#04x}  i {:#05x}",
            self.regs.pc.0, self.delay_timer.count, self.sound_timer.count, self.regs.index.0
        )?;
        write!(f, "{}", self.regs)
    }
}
