use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use log::{debug, warn};
use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

use crate::keypad::{InputState, Key};

/// left-hand side of a qwerty keyboard, laid out like the COSMAC keypad
const CHIP8_CONVENTIONAL_KEYMAP: [(char, Key); 16] = [
    ('x', Key::K0),
    ('1', Key::K1),
    ('2', Key::K2),
    ('3', Key::K3),
    ('q', Key::K4),
    ('w', Key::K5),
    ('e', Key::K6),
    ('a', Key::K7),
    ('s', Key::K8),
    ('d', Key::K9),
    ('z', Key::KA),
    ('c', Key::KB),
    ('4', Key::KC),
    ('r', Key::KD),
    ('f', Key::KE),
    ('v', Key::KF),
];

/// terminals only tell us about key presses (and autorepeat), never
/// releases, so a key counts as held for this long after its last event
const KEY_HOLD: Duration = Duration::from_millis(150);

/// feeds key transitions into an [`InputState`]
pub trait KeySource {
    /// pull in whatever has happened since the last call. Ok(false) means
    /// the user wants to stop
    fn poll(&mut self, state: &InputState) -> Result<bool, io::Error>;
}

/// implementation of KeySource for a terminal in raw mode
pub struct TermInput {
    keymap: HashMap<char, Key>,
    held: [Option<Instant>; 16],
}

impl TermInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(TermInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            held: [None; 16],
        })
    }

    fn expire(&mut self, state: &InputState, now: Instant) {
        for (code, held) in self.held.iter_mut().enumerate() {
            if matches!(held, Some(t) if now.duration_since(*t) >= KEY_HOLD) {
                state.release(Key::from_nibble(code as u8));
                *held = None;
            }
        }
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("Couldn't leave raw mode: {e}");
        }
    }
}

impl KeySource for TermInput {
    fn poll(&mut self, state: &InputState) -> Result<bool, io::Error> {
        let now = Instant::now();
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(evt) => match evt.code {
                    KeyCode::Esc => return Ok(false),
                    KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(false)
                    }
                    KeyCode::Char(c) => match self.keymap.get(&c.to_ascii_lowercase()) {
                        Some(key) => {
                            state.press(*key);
                            self.held[key.code() as usize] = Some(now);
                        }
                        None => debug!("Can't map {c:?} to a COSMAC key"),
                    },
                    other => debug!("Ignoring key {other:?}"),
                },
                other => debug!("Ignoring event {other:?}"),
            }
        }
        self.expire(state, now);
        Ok(true)
    }
}

/// KeySource for tests: presses its keys on the first poll, then asks to
/// stop once it has been polled `polls` times
pub struct DummyInput {
    keys: Vec<Key>,
    polls: Option<usize>,
}

impl DummyInput {
    pub fn new(keys: &[Key]) -> Self {
        DummyInput {
            keys: Vec::from(keys),
            polls: None,
        }
    }

    pub fn quit_after(mut self, polls: usize) -> Self {
        self.polls = Some(polls);
        self
    }
}

impl KeySource for DummyInput {
    fn poll(&mut self, state: &InputState) -> Result<bool, io::Error> {
        for key in self.keys.drain(..) {
            state.press(key);
        }
        match self.polls.as_mut() {
            Some(0) => Ok(false),
            Some(n) => {
                *n -= 1;
                Ok(true)
            }
            None => Ok(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap_covers_keypad() {
        let map = HashMap::from(CHIP8_CONVENTIONAL_KEYMAP);
        assert_eq!(map.len(), 16);
        for key in Key::ALL {
            assert!(map.values().any(|k| *k == key), "{key:?} unmapped");
        }
        assert_eq!(map[&'x'], Key::K0);
        assert_eq!(map[&'v'], Key::KF);
    }

    #[test]
    fn test_dummy_input_presses() -> Result<(), io::Error> {
        let state = InputState::new();
        let mut input = DummyInput::new(&[Key::K5]);
        assert!(input.poll(&state)?);
        assert!(state.is_pressed(Key::K5));
        assert_eq!(state.last_pressed(), Key::K5);
        Ok(())
    }

    #[test]
    fn test_dummy_input_quits() -> Result<(), io::Error> {
        let state = InputState::new();
        let mut input = DummyInput::new(&[]).quit_after(2);
        assert!(input.poll(&state)?);
        assert!(input.poll(&state)?);
        assert!(!input.poll(&state)?);
        Ok(())
    }
}
