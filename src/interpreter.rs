//! # interpreter
//!
//! Machine state, as seen by a CHIP-8 program:
//!  * V0-VF          -- 8bit registers; VF doubles as the carry/borrow/collision flag
//!  * I              -- 16bit index register, points into memory
//!  * PC             -- starts at 0x200, one instruction is two bytes
//!  * stack          -- 16 return addresses; running off either end is a fault
//!  * delay, sound   -- 8bit timers counting down at 60Hz (see `timers`)
//!  * display        -- 64x32 monochrome framebuffer
//!
//! `step()` runs exactly one instruction and returns. Nothing in here sleeps
//! or spawns threads: the host calls `step()` as fast as it likes and
//! `Timers::tick()` at 60Hz.
use std::io;
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, error, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::framebuffer::{FrameReader, Framebuffer};
use crate::instruction::Instruction;
use crate::keypad::{InputState, Key};
use crate::memory::{Chip8MemoryMap, MemoryMap, CHIP8_FONT_ADDR, CHIP8_GLYPH_HEIGHT};
use crate::timers::Timers;

pub const REGISTER_COUNT: usize = 16;
pub const STACK_DEPTH: usize = 16;
const FLAG: u8 = 0xF;

/// What a single `step()` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Executed(Instruction),
    /// FX0A with no key down; PC still points at the FX0A
    WaitingForKey,
    /// opcode isn't a CHIP-8 instruction; it was skipped over
    Unrecognized { opcode: u16, pc: u16 },
}

pub struct Chip8Interpreter {
    memory: Chip8MemoryMap,
    registers: [u8; REGISTER_COUNT],
    program_counter: u16,
    i: u16,
    stack: [u16; STACK_DEPTH],
    stack_pointer: usize,
    timers: Arc<Timers>,
    framebuffer: Arc<RwLock<Framebuffer>>,
    input: Arc<InputState>,
    rng: StdRng,
    program: Vec<u8>,
}

impl Chip8Interpreter {
    pub fn new(input: Arc<InputState>, config: &Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let memory = Chip8MemoryMap::new();
        Chip8Interpreter {
            program_counter: memory.program_addr,
            memory,
            registers: [0; REGISTER_COUNT],
            i: 0,
            stack: [0; STACK_DEPTH],
            stack_pointer: 0,
            timers: Arc::new(Timers::new()),
            framebuffer: Arc::new(RwLock::new(Framebuffer::default())),
            input,
            rng,
            program: Vec::new(),
        }
    }

    /// load a chip8 program from wherever
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<()> {
        let mut memory = Chip8MemoryMap::new();
        self.program = memory.load_program_from(reader)?;
        self.power_on(memory);
        debug!("Loaded program [size: {}]", self.program.len());
        Ok(())
    }

    /// load a chip8 program image at 0x200 and reset the machine around it.
    /// if the image doesn't fit, nothing changes
    pub fn load_program_bytes(&mut self, program: &[u8]) -> Result<()> {
        let mut memory = Chip8MemoryMap::new();
        memory.load_program(program)?;
        self.program = program.to_vec();
        self.power_on(memory);
        debug!("Loaded program [size: {}]", program.len());
        Ok(())
    }

    /// back to the state straight after the last `load_program`
    pub fn reset(&mut self) -> Result<()> {
        let mut memory = Chip8MemoryMap::new();
        memory.load_program(&self.program)?;
        self.power_on(memory);
        debug!("Reset");
        Ok(())
    }

    fn power_on(&mut self, memory: Chip8MemoryMap) {
        self.program_counter = memory.program_addr;
        self.memory = memory;
        self.registers = [0; REGISTER_COUNT];
        self.i = 0;
        self.stack = [0; STACK_DEPTH];
        self.stack_pointer = 0;
        self.timers.set_delay(0);
        self.timers.set_sound(0);
        self.write_framebuffer(Framebuffer::clear);
    }

    /// Fetch, decode and execute one instruction.
    ///
    /// Stack faults come back as errors and leave the machine exactly as it
    /// was before the faulting instruction.
    pub fn step(&mut self) -> Result<StepOutcome> {
        let pc = self.program_counter;
        let opcode = self.memory.get_word(pc);

        match Instruction::decode(opcode) {
            Some(instruction) => {
                trace!("{pc:04x}: {opcode:04x}  {instruction}");
                self.execute(pc, instruction).map_err(|e| {
                    error!("{e}");
                    e
                })
            }
            None => {
                warn!("Unrecognised instruction {opcode:04x} at {pc:04x}");
                self.program_counter = pc.wrapping_add(2);
                Ok(StepOutcome::Unrecognized { opcode, pc })
            }
        }
    }

    fn execute(&mut self, pc: u16, instruction: Instruction) -> Result<StepOutcome> {
        use Instruction::*;

        let mut next = pc.wrapping_add(2);
        let mut outcome = StepOutcome::Executed(instruction);

        match instruction {
            ClearScreen => self.write_framebuffer(Framebuffer::clear),
            Return => {
                if self.stack_pointer == 0 {
                    return Err(Error::StackUnderflow { pc });
                }
                self.stack_pointer -= 1;
                next = self.stack[self.stack_pointer];
            }
            Jump(addr) => next = addr,
            Call(addr) => {
                if self.stack_pointer == STACK_DEPTH {
                    return Err(Error::StackOverflow { pc });
                }
                self.stack[self.stack_pointer] = next;
                self.stack_pointer += 1;
                next = addr;
            }
            SkipIfEqualByte(x, nn) => {
                if self.register(x) == nn {
                    next = next.wrapping_add(2);
                }
            }
            SkipIfNotEqualByte(x, nn) => {
                if self.register(x) != nn {
                    next = next.wrapping_add(2);
                }
            }
            SkipIfEqual(x, y) => {
                if self.register(x) == self.register(y) {
                    next = next.wrapping_add(2);
                }
            }
            LoadByte(x, nn) => self.set_register(x, nn),
            AddByte(x, nn) => self.set_register(x, self.register(x).wrapping_add(nn)),
            Move(x, y) => self.set_register(x, self.register(y)),
            Or(x, y) => self.set_register(x, self.register(x) | self.register(y)),
            And(x, y) => self.set_register(x, self.register(x) & self.register(y)),
            Xor(x, y) => self.set_register(x, self.register(x) ^ self.register(y)),
            Add(x, y) => {
                let (sum, carry) = self.register(x).overflowing_add(self.register(y));
                self.set_register(x, sum);
                self.set_flag(carry);
            }
            Sub(x, y) => {
                let (vx, vy) = (self.register(x), self.register(y));
                self.set_register(x, vx.wrapping_sub(vy));
                self.set_flag(vx > vy);
            }
            ShiftRight(x) => {
                let vx = self.register(x);
                self.set_register(x, vx >> 1);
                self.set_flag(vx & 0x01 != 0);
            }
            SubReversed(x, y) => {
                let (vx, vy) = (self.register(x), self.register(y));
                self.set_register(x, vy.wrapping_sub(vx));
                self.set_flag(vx < vy);
            }
            ShiftLeft(x) => {
                let vx = self.register(x);
                self.set_register(x, vx << 1);
                self.set_flag(vx & 0x80 != 0);
            }
            SkipIfNotEqual(x, y) => {
                if self.register(x) != self.register(y) {
                    next = next.wrapping_add(2);
                }
            }
            LoadIndex(addr) => self.i = addr,
            JumpOffset(addr) => {
                let x = (addr >> 8) as u8;
                next = addr.wrapping_add(self.register(x) as u16);
            }
            Random(x, nn) => {
                let r: u8 = self.rng.gen();
                self.set_register(x, r & nn);
            }
            Draw(x, y, n) => {
                let sprite = self.memory.read_vec(self.i, n as usize);
                let (vx, vy) = (self.register(x) as usize, self.register(y) as usize);
                let collision = self.write_framebuffer(|fb| fb.draw_sprite(vx, vy, &sprite));
                self.set_flag(collision);
            }
            SkipIfKeyDown(x) => {
                if self.input.is_pressed(Key::from_nibble(self.register(x))) {
                    next = next.wrapping_add(2);
                }
            }
            SkipIfKeyUp(x) => {
                if !self.input.is_pressed(Key::from_nibble(self.register(x))) {
                    next = next.wrapping_add(2);
                }
            }
            ReadDelay(x) => self.set_register(x, self.timers.delay()),
            WaitForKey(x) => {
                if self.input.any_pressed() {
                    self.set_register(x, self.input.last_pressed().code());
                } else {
                    next = pc;
                    outcome = StepOutcome::WaitingForKey;
                }
            }
            SetDelay(x) => self.timers.set_delay(self.register(x)),
            SetSound(x) => self.timers.set_sound(self.register(x)),
            AddIndex(x) => self.i = self.i.wrapping_add(self.register(x) as u16),
            LoadGlyph(x) => {
                self.i = CHIP8_FONT_ADDR + self.register(x) as u16 * CHIP8_GLYPH_HEIGHT;
            }
            StoreBcd(x) => {
                let v = self.register(x);
                self.memory.write(&[v / 100, v / 10 % 10, v % 10], self.i);
            }
            StoreRegisters(x) => {
                let count = x as usize + 1;
                self.memory.write(&self.registers[..count], self.i);
            }
            LoadRegisters(x) => {
                let count = x as usize + 1;
                let values = self.memory.read_vec(self.i, count);
                self.registers[..count].copy_from_slice(&values);
            }
        }

        self.program_counter = next;
        Ok(outcome)
    }

    fn write_framebuffer<T>(&self, f: impl FnOnce(&mut Framebuffer) -> T) -> T {
        let mut fb = self
            .framebuffer
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut fb)
    }

    fn set_flag(&mut self, flag: bool) {
        self.registers[FLAG as usize] = flag as u8;
    }

    /// VX; only the low nibble of `x` counts
    pub fn register(&self, x: u8) -> u8 {
        self.registers[(x & 0xf) as usize]
    }

    /// poke VX; only the low nibble of `x` counts
    pub fn set_register(&mut self, x: u8, value: u8) {
        self.registers[(x & 0xf) as usize] = value;
    }

    /// write straight into memory, e.g. to patch a running program
    pub fn poke(&mut self, addr: u16, bytes: &[u8]) {
        self.memory.write(bytes, addr);
    }

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.registers
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn index_register(&self) -> u16 {
        self.i
    }

    pub fn stack_pointer(&self) -> usize {
        self.stack_pointer
    }

    /// return addresses, oldest first
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.stack_pointer]
    }

    pub fn memory(&self) -> &Chip8MemoryMap {
        &self.memory
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// for whoever ticks the timers at 60Hz, possibly on another thread
    pub fn timer_handle(&self) -> Arc<Timers> {
        Arc::clone(&self.timers)
    }

    /// for whoever draws the screen
    pub fn frame_reader(&self) -> FrameReader {
        FrameReader::new(Arc::clone(&self.framebuffer))
    }
}
