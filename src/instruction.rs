use std::fmt;

use crate::memory::CHIP8_PROGRAM_ADDR;

/// The four nibbles of an opcode plus the usual wider views of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fields {
    pub op: u8,
    pub x: u8,
    pub y: u8,
    pub n: u8,
    pub nn: u8,
    pub nnn: u16,
}

impl Fields {
    pub fn split(opcode: u16) -> Self {
        Fields {
            op: (opcode >> 12) as u8,
            x: ((opcode >> 8) & 0xf) as u8,
            y: ((opcode >> 4) & 0xf) as u8,
            n: (opcode & 0xf) as u8,
            nn: (opcode & 0xff) as u8,
            nnn: opcode & 0x0fff,
        }
    }
}

/// A decoded CHIP-8 instruction. Register operands are register numbers
/// (0x0-0xF), not values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XNN - skip next if VX == NN
    SkipIfEqualByte(u8, u8),
    /// 4XNN - skip next if VX != NN
    SkipIfNotEqualByte(u8, u8),
    /// 5XY0
    SkipIfEqual(u8, u8),
    /// 6XNN
    LoadByte(u8, u8),
    /// 7XNN - no carry flag
    AddByte(u8, u8),
    /// 8XY0
    Move(u8, u8),
    /// 8XY1
    Or(u8, u8),
    /// 8XY2
    And(u8, u8),
    /// 8XY3
    Xor(u8, u8),
    /// 8XY4 - VF = carry
    Add(u8, u8),
    /// 8XY5 - VX -= VY, VF = VX > VY
    Sub(u8, u8),
    /// 8XY6 - VF = lsb
    ShiftRight(u8),
    /// 8XY7 - VX = VY - VX, VF = VX < VY
    SubReversed(u8, u8),
    /// 8XYE - VF = msb
    ShiftLeft(u8),
    /// 9XY0
    SkipIfNotEqual(u8, u8),
    /// ANNN
    LoadIndex(u16),
    /// BNNN - jump to NNN + VX, X being the top nibble of NNN
    JumpOffset(u16),
    /// CXNN
    Random(u8, u8),
    /// DXYN
    Draw(u8, u8, u8),
    /// EX9E
    SkipIfKeyDown(u8),
    /// EXA1
    SkipIfKeyUp(u8),
    /// FX07
    ReadDelay(u8),
    /// FX0A
    WaitForKey(u8),
    /// FX15
    SetDelay(u8),
    /// FX18
    SetSound(u8),
    /// FX1E
    AddIndex(u8),
    /// FX29
    LoadGlyph(u8),
    /// FX33
    StoreBcd(u8),
    /// FX55
    StoreRegisters(u8),
    /// FX65
    LoadRegisters(u8),
}

impl Instruction {
    /// None for anything that isn't in the CHIP-8 instruction set
    pub fn decode(opcode: u16) -> Option<Self> {
        use Instruction::*;

        let Fields { op, x, y, n, nn, nnn } = Fields::split(opcode);
        let instruction = match (op, x, y, n) {
            (0x0, 0x0, 0xE, 0x0) => ClearScreen,
            (0x0, 0x0, 0xE, 0xE) => Return,
            (0x1, _, _, _) => Jump(nnn),
            (0x2, _, _, _) => Call(nnn),
            (0x3, _, _, _) => SkipIfEqualByte(x, nn),
            (0x4, _, _, _) => SkipIfNotEqualByte(x, nn),
            (0x5, _, _, 0x0) => SkipIfEqual(x, y),
            (0x6, _, _, _) => LoadByte(x, nn),
            (0x7, _, _, _) => AddByte(x, nn),
            (0x8, _, _, 0x0) => Move(x, y),
            (0x8, _, _, 0x1) => Or(x, y),
            (0x8, _, _, 0x2) => And(x, y),
            (0x8, _, _, 0x3) => Xor(x, y),
            (0x8, _, _, 0x4) => Add(x, y),
            (0x8, _, _, 0x5) => Sub(x, y),
            (0x8, _, _, 0x6) => ShiftRight(x),
            (0x8, _, _, 0x7) => SubReversed(x, y),
            (0x8, _, _, 0xE) => ShiftLeft(x),
            (0x9, _, _, 0x0) => SkipIfNotEqual(x, y),
            (0xA, _, _, _) => LoadIndex(nnn),
            (0xB, _, _, _) => JumpOffset(nnn),
            (0xC, _, _, _) => Random(x, nn),
            (0xD, _, _, _) => Draw(x, y, n),
            (0xE, _, 0x9, 0xE) => SkipIfKeyDown(x),
            (0xE, _, 0xA, 0x1) => SkipIfKeyUp(x),
            (0xF, _, 0x0, 0x7) => ReadDelay(x),
            (0xF, _, 0x0, 0xA) => WaitForKey(x),
            (0xF, _, 0x1, 0x5) => SetDelay(x),
            (0xF, _, 0x1, 0x8) => SetSound(x),
            (0xF, _, 0x1, 0xE) => AddIndex(x),
            (0xF, _, 0x2, 0x9) => LoadGlyph(x),
            (0xF, _, 0x3, 0x3) => StoreBcd(x),
            (0xF, _, 0x5, 0x5) => StoreRegisters(x),
            (0xF, _, 0x6, 0x5) => LoadRegisters(x),
            _ => return None,
        };
        Some(instruction)
    }
}

/// Assembler-ish mnemonics, mostly for trace logging.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump(a) => write!(f, "JP {a:#05x}"),
            Call(a) => write!(f, "CALL {a:#05x}"),
            SkipIfEqualByte(x, nn) => write!(f, "SE V{x:X}, {nn:#04x}"),
            SkipIfNotEqualByte(x, nn) => write!(f, "SNE V{x:X}, {nn:#04x}"),
            SkipIfEqual(x, y) => write!(f, "SE V{x:X}, V{y:X}"),
            LoadByte(x, nn) => write!(f, "LD V{x:X}, {nn:#04x}"),
            AddByte(x, nn) => write!(f, "ADD V{x:X}, {nn:#04x}"),
            Move(x, y) => write!(f, "LD V{x:X}, V{y:X}"),
            Or(x, y) => write!(f, "OR V{x:X}, V{y:X}"),
            And(x, y) => write!(f, "AND V{x:X}, V{y:X}"),
            Xor(x, y) => write!(f, "XOR V{x:X}, V{y:X}"),
            Add(x, y) => write!(f, "ADD V{x:X}, V{y:X}"),
            Sub(x, y) => write!(f, "SUB V{x:X}, V{y:X}"),
            ShiftRight(x) => write!(f, "SHR V{x:X}"),
            SubReversed(x, y) => write!(f, "SUBN V{x:X}, V{y:X}"),
            ShiftLeft(x) => write!(f, "SHL V{x:X}"),
            SkipIfNotEqual(x, y) => write!(f, "SNE V{x:X}, V{y:X}"),
            LoadIndex(a) => write!(f, "LD I, {a:#05x}"),
            JumpOffset(a) => write!(f, "JP V{:X}, {a:#05x}", a >> 8),
            Random(x, nn) => write!(f, "RND V{x:X}, {nn:#04x}"),
            Draw(x, y, n) => write!(f, "DRW V{x:X}, V{y:X}, {n}"),
            SkipIfKeyDown(x) => write!(f, "SKP V{x:X}"),
            SkipIfKeyUp(x) => write!(f, "SKNP V{x:X}"),
            ReadDelay(x) => write!(f, "LD V{x:X}, DT"),
            WaitForKey(x) => write!(f, "LD V{x:X}, K"),
            SetDelay(x) => write!(f, "LD DT, V{x:X}"),
            SetSound(x) => write!(f, "LD ST, V{x:X}"),
            AddIndex(x) => write!(f, "ADD I, V{x:X}"),
            LoadGlyph(x) => write!(f, "LD F, V{x:X}"),
            StoreBcd(x) => write!(f, "LD B, V{x:X}"),
            StoreRegisters(x) => write!(f, "LD [I], V{x:X}"),
            LoadRegisters(x) => write!(f, "LD V{x:X}, [I]"),
        }
    }
}

/// One line of a program listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Listing {
    pub addr: u16,
    pub opcode: u16,
    pub instruction: Option<Instruction>,
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.instruction {
            Some(i) => write!(f, "{:04x}: {:04x}  {}", self.addr, self.opcode, i),
            None => write!(f, "{:04x}: {:04x}  ???", self.addr, self.opcode),
        }
    }
}

/// Decode a program image two bytes at a time, as if loaded at 0x200. A
/// trailing odd byte is read as the high half of an opcode.
pub fn disassemble(program: &[u8]) -> Vec<Listing> {
    program
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| {
            let opcode = u16::from_be_bytes([pair[0], pair.get(1).copied().unwrap_or(0)]);
            Listing {
                addr: CHIP8_PROGRAM_ADDR.wrapping_add((2 * i) as u16),
                opcode,
                instruction: Instruction::decode(opcode),
            }
        })
        .collect()
}
