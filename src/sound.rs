use beep::beep;

use crate::error::{Error, Result};

/// Something that can go beep. `beep` is called on every 60Hz tick the
/// sound timer is running and `stop` on every tick it isn't, so both
/// should be cheap when nothing changes.
pub trait Sound {
    fn beep(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
}

const SIMPLEBEEP_PITCH: u16 = 2093; // C

/// PC speaker style tone via the `beep` crate
#[derive(Default)]
pub struct SimpleBeep {
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_pitch(&mut self, pitch: u16) -> Result<()> {
        beep(pitch).map_err(|e| Error::Audio(e.to_string()))?;
        self.is_beeping = pitch != 0;
        Ok(())
    }
}

impl Sound for SimpleBeep {
    fn beep(&mut self) -> Result<()> {
        if self.is_beeping {
            return Ok(());
        }
        self.set_pitch(SIMPLEBEEP_PITCH)
    }

    fn stop(&mut self) -> Result<()> {
        if !self.is_beeping {
            return Ok(());
        }
        self.set_pitch(0)
    }
}

impl Drop for SimpleBeep {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::warn!("Couldn't silence the speaker: {e}");
        }
    }
}

/// keeps count of beeps but makes no noise
#[derive(Default)]
pub struct Mute {
    pub beeps: usize,
}

impl Mute {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sound for Mute {
    fn beep(&mut self) -> Result<()> {
        self.beeps += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mute_counts() -> Result<()> {
        let mut m = Mute::new();
        m.beep()?;
        m.stop()?;
        m.beep()?;
        assert_eq!(m.beeps, 2);
        Ok(())
    }

    #[test]
    fn test_simple_beep_stop_when_silent_is_noop() -> Result<()> {
        // never touches the speaker
        let mut b = SimpleBeep::new();
        b.stop()?;
        assert!(!b.is_beeping);
        Ok(())
    }
}
