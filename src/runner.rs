use std::sync::Arc;
use std::time::Instant;

use log::info;

use crate::config::Config;
use crate::display::Display;
use crate::error::Result;
use crate::input::KeySource;
use crate::interpreter::{Chip8Interpreter, StepOutcome};
use crate::keypad::InputState;
use crate::sound::Sound;
use crate::timers::timer_interval;

/// Why a run ended without a fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    Quit,
    StepLimit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: u64,
    pub unrecognized: u64,
    pub reason: StopReason,
}

/// Ties an interpreter to a screen, a keyboard and a speaker and keeps time.
///
/// One thread does everything: instructions run at `config.ips`, and
/// whenever a 60Hz boundary passes the timers tick, the speaker is updated
/// and a frame is drawn.
pub struct Emulator<'a> {
    interpreter: Chip8Interpreter,
    input: Arc<InputState>,
    display: &'a mut dyn Display,
    keys: &'a mut dyn KeySource,
    sound: &'a mut dyn Sound,
    config: Config,
}

impl<'a> Emulator<'a> {
    pub fn new(
        config: Config,
        display: &'a mut dyn Display,
        keys: &'a mut dyn KeySource,
        sound: &'a mut dyn Sound,
    ) -> Self {
        let input = Arc::new(InputState::new());
        let interpreter = Chip8Interpreter::new(Arc::clone(&input), &config);
        Emulator {
            interpreter,
            input,
            display,
            keys,
            sound,
            config,
        }
    }

    pub fn interpreter(&self) -> &Chip8Interpreter {
        &self.interpreter
    }

    pub fn interpreter_mut(&mut self) -> &mut Chip8Interpreter {
        &mut self.interpreter
    }

    /// run until the user quits, the step limit is hit, or the program faults
    pub fn run(&mut self) -> Result<RunSummary> {
        let step_interval = self.config.step_interval();
        let tick_interval = timer_interval();
        let timers = self.interpreter.timer_handle();
        let frames = self.interpreter.frame_reader();

        let mut summary = RunSummary {
            steps: 0,
            unrecognized: 0,
            reason: StopReason::Quit,
        };
        let start = Instant::now();
        let mut next_step = start;
        let mut next_tick = start + tick_interval;

        loop {
            if !self.keys.poll(&self.input)? {
                info!("Stopped by user after {} steps", summary.steps);
                summary.reason = StopReason::Quit;
                break;
            }
            if let Some(max) = self.config.max_steps {
                if summary.steps >= max {
                    info!("Stopped at step limit {max}");
                    summary.reason = StopReason::StepLimit;
                    break;
                }
            }

            if let StepOutcome::Unrecognized { .. } = self.interpreter.step()? {
                summary.unrecognized += 1;
            }
            summary.steps += 1;

            // this logic gets the timing mostly right; a tick always lands
            // after an instruction, never in the middle of one
            let now = Instant::now();
            while now >= next_tick {
                if timers.tick() {
                    self.sound.beep()?;
                } else {
                    self.sound.stop()?;
                }
                self.display.draw(&frames.snapshot())?;
                next_tick += tick_interval;
            }

            next_step += step_interval;
            spin_sleep::sleep(next_step.saturating_duration_since(Instant::now()));
        }

        // nothing is holding a key down once we've stopped listening
        self.input.release_all();
        self.sound.stop()?;
        self.display.draw(&frames.snapshot())?;
        Ok(summary)
    }
}
