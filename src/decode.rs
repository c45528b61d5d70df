use crate::{
    error::{Chip8Error, Result},
    memory::TypeAddr,
};

/// An instruction word, read as four hex digits (nibbles) left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInstruction {
    code: u16,
}

impl RawInstruction {
    pub fn new(code: u16) -> Self {
        RawInstruction { code }
    }

    // n is starting digit (1-based), m is length
    pub fn nth_m_digits(&self, n: u8, m: u8) -> u16 {
        // 0110 1100 1111 0001
        // -------------------
        // 1111 1111 1111 1111
        //      1111 1111 1111
        //           1111 1111
        //                1111
        let shift_places = (4 - m - (n - 1)) * 4;
        let mask: u16 = ((1u32 << (m * 4)) - 1) as u16;
        (self.code >> shift_places) & mask
    }

    pub fn family(&self) -> u8 {
        self.nth_m_digits(1, 1) as u8
    }

    pub fn x(&self) -> u8 {
        self.nth_m_digits(2, 1) as u8
    }

    pub fn y(&self) -> u8 {
        self.nth_m_digits(3, 1) as u8
    }

    pub fn n(&self) -> u8 {
        self.nth_m_digits(4, 1) as u8
    }

    pub fn kk(&self) -> u8 {
        self.nth_m_digits(3, 2) as u8
    }

    pub fn nnn(&self) -> TypeAddr {
        self.nth_m_digits(2, 3)
    }
}

/// Which operand fields a family carries.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    #[default]
    None,
    Addr,
    RegByte,
    RegReg,
    RegRegNibble,
    Reg,
}

/// Field shape per top nibble, 0x0 through 0xF.
pub const FIELD_SHAPES: [FieldShape; 16] = [
    FieldShape::None,         // 0
    FieldShape::Addr,         // 1 JP
    FieldShape::Addr,         // 2 CALL
    FieldShape::RegByte,      // 3 SE Vx,kk
    FieldShape::RegByte,      // 4 SNE Vx,kk
    FieldShape::RegReg,       // 5 SE Vx,Vy
    FieldShape::RegByte,      // 6 LD Vx,kk
    FieldShape::RegByte,      // 7 ADD Vx,kk
    FieldShape::RegReg,       // 8 ALU
    FieldShape::RegReg,       // 9 SNE Vx,Vy
    FieldShape::Addr,         // A LD I
    FieldShape::Addr,         // B JP V0
    FieldShape::RegByte,      // C RND
    FieldShape::RegRegNibble, // D DRW
    FieldShape::Reg,          // E keys
    FieldShape::Reg,          // F misc
];

/// Operands pulled out of a word according to its family's shape. Fields
/// the shape does not carry stay zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Operands {
    pub shape: FieldShape,
    pub addr: TypeAddr,
    pub x: u8,
    pub y: u8,
    pub kk: u8,
    pub n: u8,
}

impl Operands {
    pub fn extract(raw: RawInstruction) -> Self {
        let shape = FIELD_SHAPES[raw.family() as usize];
        let mut ops = Operands {
            shape,
            ..Default::default()
        };
        match shape {
            FieldShape::None => {}
            FieldShape::Addr => ops.addr = raw.nnn(),
            FieldShape::RegByte => {
                ops.x = raw.x();
                ops.kk = raw.kk();
            }
            FieldShape::RegReg => {
                ops.x = raw.x();
                ops.y = raw.y();
            }
            FieldShape::RegRegNibble => {
                ops.x = raw.x();
                ops.y = raw.y();
                ops.n = raw.n();
            }
            FieldShape::Reg => ops.x = raw.x(),
        }
        ops
    }

    /// The operand list in instruction order.
    pub fn values(&self) -> Vec<u16> {
        match self.shape {
            FieldShape::None => vec![],
            FieldShape::Addr => vec![self.addr],
            FieldShape::RegByte => vec![self.x as u16, self.kk as u16],
            FieldShape::RegReg => vec![self.x as u16, self.y as u16],
            FieldShape::RegRegNibble => vec![self.x as u16, self.y as u16, self.n as u16],
            FieldShape::Reg => vec![self.x as u16],
        }
    }
}

/// Table keys, one per instruction. A word resolves to the first key it
/// matches under the masks in `MATCH_MASKS` order.
const KEYS: [u16; 35] = [
    0x0000, 0x00E0, 0x00EE, 0x1000, 0x2000, 0x3000, 0x4000, 0x5000, 0x6000, 0x7000, 0x8000,
    0x8001, 0x8002, 0x8003, 0x8004, 0x8005, 0x8006, 0x8007, 0x800E, 0x9000, 0xA000, 0xB000,
    0xC000, 0xD000, 0xE09E, 0xE0A1, 0xF007, 0xF00A, 0xF015, 0xF018, 0xF01E, 0xF029, 0xF033,
    0xF055, 0xF065,
];

const MATCH_MASKS: [u16; 3] = [0xF0FF, 0xF00F, 0xF000];

fn resolve_key(code: u16) -> Option<u16> {
    if KEYS.contains(&code) {
        return Some(code);
    }
    if code >> 12 == 0 {
        return Some(0x0000);
    }
    MATCH_MASKS
        .iter()
        .map(|mask| code & mask)
        .find(|masked| KEYS.contains(masked))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCodes {
    // 0NNN
    // machine code routine on the COSMAC VIP, ignored
    System(TypeAddr),
    // 00E0
    // turn all pixels to 0
    ClearScreen,
    // 00EE
    PopSubroutine,
    // 1NNN
    // set PC to address NNN, "jump" to memory location
    Jump(TypeAddr),
    // 2NNN
    PushSubroutine(TypeAddr),

    // 3XNN
    SkipEqualConstant(u8, u8),
    // 4XNN
    SkipNotEqualConstant(u8, u8),
    // 5XY0
    SkipEqualRegister(u8, u8),
    // 9XY0
    SkipNotEqualRegister(u8, u8),

    // 6XNN
    // set register VX to value NN
    SetRegister(u8, u8),
    // 7XNN
    // add value NN to VX, VF untouched
    AddToRegister(u8, u8),

    // 8XY0
    CopyRegister(u8, u8),
    // 8XY1
    Or(u8, u8),
    // 8XY2
    And(u8, u8),
    // 8XY3
    XOr(u8, u8),
    /// 8XY4
    Add(u8, u8),
    // 8XY5
    SubtractForward(u8, u8),
    // 8XY6
    RightShift(u8, u8),
    // 8XY7
    SubtractBackward(u8, u8),
    // 8XYE
    LeftShift(u8, u8),

    // ANNN
    // set index register I to address NNN
    SetIndexRegister(TypeAddr),
    // BNNN
    JumpWithOffset(TypeAddr),
    // CXNN
    Random(u8, u8),
    // DXYN
    // draw an N pixel tall sprite starting at I
    // at Coordinates (VX, VY)
    // XOR pixels on screen using sprite data
    // if pixels on screen were switched OFF: VF set to 1
    Display(u8, u8, u8),

    // EX9E
    SkipIfPressed(u8),
    // EXA1
    SkipIfNotPressed(u8),

    // FX07
    CopyDelayToRegister(u8),
    // FX0A
    GetKey(u8),
    // FX15
    CopyRegisterToDelay(u8),
    // FX18
    CopyRegisterToSound(u8),
    // FX1E
    AddToIndex(u8),
    // FX29
    PointChar(u8),
    // FX33
    ToDecimal(u8),
    // FX55
    StoreRegisterToMemory(u8),
    // FX65
    LoadRegisterFromMemory(u8),
}

impl OpCodes {
    /// Decodes a word. `addr` is only used to annotate the error.
    pub fn decode_raw(ins: u16, addr: TypeAddr) -> Result<Self> {
        let raw = RawInstruction::new(ins);
        let key = resolve_key(ins).ok_or(Chip8Error::UnimplementedOpcode { opcode: ins, addr })?;
        let ops = Operands::extract(raw);
        let (x, y, kk, nnn) = (ops.x, ops.y, ops.kk, ops.addr);

        let op = match key {
            0x0000 => Self::System(raw.nnn()),
            0x00E0 => Self::ClearScreen,
            0x00EE => Self::PopSubroutine,
            0x1000 => Self::Jump(nnn),
            0x2000 => Self::PushSubroutine(nnn),
            0x3000 => Self::SkipEqualConstant(x, kk),
            0x4000 => Self::SkipNotEqualConstant(x, kk),
            0x5000 => Self::SkipEqualRegister(x, y),
            0x6000 => Self::SetRegister(x, kk),
            0x7000 => Self::AddToRegister(x, kk),
            0x8000 => Self::CopyRegister(x, y),
            0x8001 => Self::Or(x, y),
            0x8002 => Self::And(x, y),
            0x8003 => Self::XOr(x, y),
            0x8004 => Self::Add(x, y),
            0x8005 => Self::SubtractForward(x, y),
            0x8006 => Self::RightShift(x, y),
            0x8007 => Self::SubtractBackward(x, y),
            0x800E => Self::LeftShift(x, y),
            0x9000 => Self::SkipNotEqualRegister(x, y),
            0xA000 => Self::SetIndexRegister(nnn),
            0xB000 => Self::JumpWithOffset(nnn),
            0xC000 => Self::Random(x, kk),
            0xD000 => Self::Display(x, y, ops.n),
            0xE09E => Self::SkipIfPressed(x),
            0xE0A1 => Self::SkipIfNotPressed(x),
            0xF007 => Self::CopyDelayToRegister(x),
            0xF00A => Self::GetKey(x),
            0xF015 => Self::CopyRegisterToDelay(x),
            0xF018 => Self::CopyRegisterToSound(x),
            0xF01E => Self::AddToIndex(x),
            0xF029 => Self::PointChar(x),
            0xF033 => Self::ToDecimal(x),
            0xF055 => Self::StoreRegisterToMemory(x),
            0xF065 => Self::LoadRegisterFromMemory(x),
            _ => return Err(Chip8Error::UnimplementedOpcode { opcode: ins, addr }),
        };
        Ok(op)
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::System(_) => "SYS",
            Self::ClearScreen => "CLS",
            Self::PopSubroutine => "RET",
            Self::Jump(_) | Self::JumpWithOffset(_) => "JP",
            Self::PushSubroutine(_) => "CALL",
            Self::SkipEqualConstant(..) | Self::SkipEqualRegister(..) => "SE",
            Self::SkipNotEqualConstant(..) | Self::SkipNotEqualRegister(..) => "SNE",
            Self::Add(..) | Self::AddToRegister(..) | Self::AddToIndex(_) => "ADD",
            Self::Or(..) => "OR",
            Self::And(..) => "AND",
            Self::XOr(..) => "XOR",
            Self::SubtractForward(..) => "SUB",
            Self::SubtractBackward(..) => "SUBN",
            Self::RightShift(..) => "SHR",
            Self::LeftShift(..) => "SHL",
            Self::Random(..) => "RND",
            Self::Display(..) => "DRW",
            Self::SkipIfPressed(_) => "SKP",
            Self::SkipIfNotPressed(_) => "SKNP",
            _ => "LD",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(ins: u16) -> OpCodes {
        OpCodes::decode_raw(ins, 0x200).unwrap()
    }

    #[test]
    fn test_bit_manip() {
        assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(2, 1), 0xC);
        assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(3, 1), 0xE);
        assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(1, 1), 0x4);

        assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(1, 2), 0x4C);
        assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(2, 2), 0xCE);
        assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(2, 3), 0xCEE);
        assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(1, 4), 0x4CEE);
    }

    #[test]
    fn exact_words_win() {
        assert_eq!(decode(0x00E0), OpCodes::ClearScreen);
        assert_eq!(decode(0x00EE), OpCodes::PopSubroutine);
    }

    #[test]
    fn zero_family_is_a_system_call() {
        assert_eq!(decode(0x0123), OpCodes::System(0x123));
        assert_eq!(decode(0x0000), OpCodes::System(0x000));
        assert_eq!(decode(0x00E1), OpCodes::System(0x0E1));
    }

    #[test]
    fn alu_family_is_keyed_by_low_nibble() {
        assert_eq!(decode(0x8014), OpCodes::Add(0, 1));
        assert_eq!(decode(0x8AB5), OpCodes::SubtractForward(0xA, 0xB));
        assert_eq!(decode(0x8AB6), OpCodes::RightShift(0xA, 0xB));
        assert_eq!(decode(0x8AB7), OpCodes::SubtractBackward(0xA, 0xB));
        assert_eq!(decode(0x8ABE), OpCodes::LeftShift(0xA, 0xB));
        // no 0x8008 key, falls through to the 0x8000 family key
        assert_eq!(decode(0x8128), OpCodes::CopyRegister(1, 2));
    }

    #[test]
    fn low_byte_families() {
        assert_eq!(decode(0xE39E), OpCodes::SkipIfPressed(3));
        assert_eq!(decode(0xE3A1), OpCodes::SkipIfNotPressed(3));
        assert_eq!(decode(0xF007), OpCodes::CopyDelayToRegister(0));
        assert_eq!(decode(0xF20A), OpCodes::GetKey(2));
        assert_eq!(decode(0xF115), OpCodes::CopyRegisterToDelay(1));
        assert_eq!(decode(0xF118), OpCodes::CopyRegisterToSound(1));
        assert_eq!(decode(0xF41E), OpCodes::AddToIndex(4));
        assert_eq!(decode(0xF529), OpCodes::PointChar(5));
        assert_eq!(decode(0xF633), OpCodes::ToDecimal(6));
        assert_eq!(decode(0xF055), OpCodes::StoreRegisterToMemory(0));
        assert_eq!(decode(0xFF65), OpCodes::LoadRegisterFromMemory(0xF));
    }

    #[test]
    fn single_nibble_families() {
        assert_eq!(decode(0x1ABC), OpCodes::Jump(0xABC));
        assert_eq!(decode(0x2ABC), OpCodes::PushSubroutine(0xABC));
        assert_eq!(decode(0x3A05), OpCodes::SkipEqualConstant(0xA, 0x05));
        assert_eq!(decode(0x4A05), OpCodes::SkipNotEqualConstant(0xA, 0x05));
        assert_eq!(decode(0x5AB0), OpCodes::SkipEqualRegister(0xA, 0xB));
        assert_eq!(decode(0x6A05), OpCodes::SetRegister(0xA, 0x05));
        assert_eq!(decode(0x7A05), OpCodes::AddToRegister(0xA, 0x05));
        assert_eq!(decode(0x9AB0), OpCodes::SkipNotEqualRegister(0xA, 0xB));
        assert_eq!(decode(0xA2F0), OpCodes::SetIndexRegister(0x2F0));
        assert_eq!(decode(0xB2F0), OpCodes::JumpWithOffset(0x2F0));
        assert_eq!(decode(0xC3FF), OpCodes::Random(3, 0xFF));
        assert_eq!(decode(0xD125), OpCodes::Display(1, 2, 5));
    }

    #[test]
    fn unknown_words_are_reported() {
        for word in [0xE1FF, 0xF1FF, 0xE000, 0xF000] {
            match OpCodes::decode_raw(word, 0x2AA) {
                Err(Chip8Error::UnimplementedOpcode { opcode, addr }) => {
                    assert_eq!(opcode, word);
                    assert_eq!(addr, 0x2AA);
                }
                other => panic!("{word:#06X} decoded to {other:?}"),
            }
        }
    }

    #[test]
    fn operand_lists_follow_the_field_table() {
        let values = |w| Operands::extract(RawInstruction::new(w)).values();
        assert_eq!(values(0x00E0), Vec::<u16>::new());
        assert_eq!(values(0x1ABC), vec![0xABC]);
        assert_eq!(values(0x6A05), vec![0xA, 0x05]);
        assert_eq!(values(0x8014), vec![0, 1]);
        assert_eq!(values(0xD125), vec![1, 2, 5]);
        assert_eq!(values(0xF355), vec![3]);
    }

    #[test]
    fn every_key_decodes() {
        for key in KEYS {
            assert!(OpCodes::decode_raw(key, 0x200).is_ok(), "{key:#06X}");
        }
    }
}
