use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// The sixteen keys on the COSMAC hex keypad.
///
/// ```text
/// 1 2 3 C
/// 4 5 6 D
/// 7 8 9 E
/// A 0 B F
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Key {
    K0 = 0x0,
    K1 = 0x1,
    K2 = 0x2,
    K3 = 0x3,
    K4 = 0x4,
    K5 = 0x5,
    K6 = 0x6,
    K7 = 0x7,
    K8 = 0x8,
    K9 = 0x9,
    KA = 0xa,
    KB = 0xb,
    KC = 0xc,
    KD = 0xd,
    KE = 0xe,
    KF = 0xf,
}

impl Key {
    pub const ALL: [Key; 16] = [
        Key::K0,
        Key::K1,
        Key::K2,
        Key::K3,
        Key::K4,
        Key::K5,
        Key::K6,
        Key::K7,
        Key::K8,
        Key::K9,
        Key::KA,
        Key::KB,
        Key::KC,
        Key::KD,
        Key::KE,
        Key::KF,
    ];

    /// key for the low nibble of a register value
    pub fn from_nibble(value: u8) -> Key {
        Key::ALL[(value & 0x0f) as usize]
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Which keys are down right now, and which one went down last.
///
/// Written by whatever reads the physical keyboard, read by the interpreter;
/// each field is its own atomic so both sides can hold an `Arc` to it
/// without a lock. A read may be one poll behind a write, which is fine.
#[derive(Debug, Default)]
pub struct InputState {
    keys: [AtomicBool; 16],
    last: AtomicU8,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self, key: Key) {
        self.keys[key as usize].store(true, Ordering::Release);
        self.last.store(key.code(), Ordering::Release);
    }

    pub fn release(&self, key: Key) {
        self.keys[key as usize].store(false, Ordering::Release);
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.keys[key as usize].load(Ordering::Acquire)
    }

    pub fn any_pressed(&self) -> bool {
        self.keys.iter().any(|k| k.load(Ordering::Acquire))
    }

    /// the most recent key passed to [`press`](Self::press); K0 until then
    pub fn last_pressed(&self) -> Key {
        Key::from_nibble(self.last.load(Ordering::Acquire))
    }

    pub fn release_all(&self) {
        for key in &self.keys {
            key.store(false, Ordering::Release);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_released() {
        let input = InputState::new();
        assert!(!input.any_pressed());
        assert!(Key::ALL.iter().all(|k| !input.is_pressed(*k)));
        assert_eq!(input.last_pressed(), Key::K0);
    }

    #[test]
    fn test_press_release() {
        let input = InputState::new();
        input.press(Key::K7);
        input.press(Key::KC);
        assert!(input.is_pressed(Key::K7));
        assert!(input.is_pressed(Key::KC));
        assert_eq!(input.last_pressed(), Key::KC);

        input.release(Key::KC);
        assert!(!input.is_pressed(Key::KC));
        assert!(input.any_pressed());
        // releasing doesn't forget the last press
        assert_eq!(input.last_pressed(), Key::KC);

        input.release_all();
        assert!(!input.any_pressed());
    }

    #[test]
    fn test_from_nibble() {
        assert_eq!(Key::from_nibble(0x0a), Key::KA);
        assert_eq!(Key::from_nibble(0x1f), Key::KF);
        for (i, key) in Key::ALL.iter().enumerate() {
            assert_eq!(key.code() as usize, i);
        }
    }
}
