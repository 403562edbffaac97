//! A CHIP-8 interpreter.
//!
//! ## Design
//!
//! * the interpreter core knows nothing about terminals, speakers or clocks:
//!   `step()` runs one instruction, `Timers::tick()` is one 60Hz tick, and
//!   the host decides when to call either
//! * framebuffer and keypad are the only things the core shares, each behind
//!   a narrow interface
//!    - framebuffer: written by DXYN/00E0, read via a cloneable `FrameReader`
//!    - keypad: written by the host through `InputState::press`/`release`,
//!      only ever read by the interpreter
//! * display, input device and audio device each have a trait so the
//!   terminal implementations can be swapped for dummies in tests
//! * faults that have no sensible CHIP-8 meaning (running off either end of
//!   the stack) stop the machine; unknown opcodes are reported and skipped
//!
//! Model
//!
//! Host (`runner::Emulator`)
//!  |-- display, input, sound, config
//!  |-- interpreter(input, config)
//!  |    |-- memory (font at 0x000, program at 0x200)
//!  |    |-- timers (shared, atomic)
//!  |    `-- framebuffer (shared, RwLock)
//!  `-- main loop
//!       |-- keys.poll(input)
//!       |-- interpreter.step()
//!       |-- on every 60Hz boundary: timers.tick() -> beep/stop; display.draw()
//!       `-- sleep until the next instruction is due
pub mod config;
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod keypad;
pub mod memory;
pub mod runner;
pub mod sound;
pub mod timers;

pub use config::Config;
pub use error::{Error, Result};
pub use framebuffer::{FrameReader, Framebuffer};
pub use instruction::Instruction;
pub use interpreter::{Chip8Interpreter, StepOutcome};
pub use keypad::{InputState, Key};
pub use timers::Timers;
