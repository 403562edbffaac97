use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

/// delay and sound timers both count down at this rate
pub const TIMER_HZ: u32 = 60;

pub fn timer_interval() -> Duration {
    Duration::from_secs(1) / TIMER_HZ
}

/// The delay and sound timers.
///
/// Shared between the interpreter (Fx07, Fx15, Fx18) and whatever calls
/// [`tick`](Self::tick) at 60Hz. Each field is atomic on its own; nothing
/// needs both to change together.
#[derive(Debug, Default)]
pub struct Timers {
    delay: AtomicU8,
    sound: AtomicU8,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delay(&self) -> u8 {
        self.delay.load(Ordering::Acquire)
    }

    pub fn set_delay(&self, value: u8) {
        self.delay.store(value, Ordering::Release);
    }

    pub fn sound(&self) -> u8 {
        self.sound.load(Ordering::Acquire)
    }

    pub fn set_sound(&self, value: u8) {
        self.sound.store(value, Ordering::Release);
    }

    /// Count both timers down by one, stopping at zero. Returns true if the
    /// sound timer was running for this tick, i.e. the host should beep.
    pub fn tick(&self) -> bool {
        decrement(&self.delay);
        decrement(&self.sound) > 0
    }
}

/// saturating decrement; returns the value from before
fn decrement(timer: &AtomicU8) -> u8 {
    match timer.fetch_update(Ordering::AcqRel, Ordering::Acquire, |t| t.checked_sub(1)) {
        Ok(previous) | Err(previous) => previous,
    }
}
