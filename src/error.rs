use std::io;
use thiserror::Error;

/// Everything that can stop the machine, or stop it from starting.
///
/// Unrecognised instructions are deliberately not in here: they are reported
/// through [`crate::interpreter::StepOutcome`] and execution carries on.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("program is {len} bytes but only {max} fit above 0x200")]
    ProgramTooLarge { len: usize, max: usize },

    #[error("stack overflow at pc {pc:#05x}")]
    StackOverflow { pc: u16 },

    #[error("return with empty stack at pc {pc:#05x}")]
    StackUnderflow { pc: u16 },

    #[error("audio error: {0}")]
    Audio(String),
}

pub type Result<T> = std::result::Result<T, Error>;
