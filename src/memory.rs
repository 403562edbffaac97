use std::io;

use crate::error::{Error, Result};

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting.
//     every address is wrapped into the 4K address space, so nothing in here
//     can index out of bounds

/// Represents memory map, ROM, RAM etc.
pub trait MemoryMap {
    /// read one byte; the address wraps around the end of memory
    fn read(&self, addr: u16) -> u8;

    /// write one byte; the address wraps around the end of memory
    fn write_byte(&mut self, addr: u16, value: u8);

    /// write a chunk of bytes into "RAM", wrapping at the top
    fn write(&mut self, data: &[u8], addr: u16) {
        for (offset, byte) in data.iter().enumerate() {
            self.write_byte(addr.wrapping_add(offset as u16), *byte);
        }
    }

    /// copy `len` bytes starting at `addr` out of memory, wrapping at the top
    fn read_vec(&self, addr: u16, len: usize) -> Vec<u8> {
        (0..len)
            .map(|offset| self.read(addr.wrapping_add(offset as u16)))
            .collect()
    }

    /// get a big-endian two-byte word (instructions)
    fn get_word(&self, addr: u16) -> u16 {
        u16::from_be_bytes([self.read(addr), self.read(addr.wrapping_add(1))])
    }
}

/// CHIP-8 memory layout
///   0x0000-0x004f  hex digit glyphs, 5 bytes each
///   0x0050-0x01ff  reserved for the interpreter
///   0x0200-0x0fff  program
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
    pub program_addr: u16,
}

impl MemoryMap for Chip8MemoryMap {
    fn read(&self, addr: u16) -> u8 {
        self.bytes[wrap(addr)]
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        self.bytes[wrap(addr)] = value;
    }
}

fn wrap(addr: u16) -> usize {
    addr as usize % CHIP8_RAM_SIZE_BYTES
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// biggest program image that fits above the reserved area
pub const CHIP8_MAX_PROGRAM_BYTES: usize = CHIP8_RAM_SIZE_BYTES - CHIP8_PROGRAM_ADDR as usize;

/// glyphs live at the very bottom of memory, so Fx29 is just `Vx * height`
pub const CHIP8_FONT_ADDR: u16 = 0x000;
pub const CHIP8_GLYPH_HEIGHT: u16 = 5;

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip8MemoryMap {
    /// initialises CHIP-8 memory with the font baked in
    pub fn new() -> Self {
        let mut mm = Chip8MemoryMap {
            bytes: Box::new([0u8; CHIP8_RAM_SIZE_BYTES]),
            program_addr: CHIP8_PROGRAM_ADDR,
        };
        mm.write(&CHIP8_FONT, CHIP8_FONT_ADDR);
        mm
    }

    /// load a CHIP-8 program at 0x200. oversized images are rejected before
    /// anything is written
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > CHIP8_MAX_PROGRAM_BYTES {
            return Err(Error::ProgramTooLarge {
                len: program.len(),
                max: CHIP8_MAX_PROGRAM_BYTES,
            });
        }
        self.write(program, self.program_addr);
        Ok(())
    }

    /// read a whole program from somewhere and load it
    pub fn load_program_from(&mut self, reader: &mut impl io::Read) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        self.load_program(&buf)?;
        Ok(buf)
    }
}

#[rustfmt::skip]
pub const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
