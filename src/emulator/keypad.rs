/// Number of keys on the hexadecimal keypad.
pub const NUM_KEYS: usize = 16;

/// The state of the 16-key hexadecimal keypad.
/// Written by the host, read by the key instructions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; NUM_KEYS],
}

impl Keypad {

    pub fn new() -> Keypad {
        Keypad::default()
    }

    /// Set the state of `key`. Keys above 0xF are ignored.
    pub fn set(&mut self, key: u8, pressed: bool) {
        match self.keys.get_mut(key as usize) {
            Some(state) => *state = pressed,
            None => log::debug!("Ignoring key {:#x}, not on the keypad", key),
        }
    }

    pub fn press(&mut self, key: u8) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: u8) {
        self.set(key, false);
    }

    /// Whether `key` is held down. Keys above 0xF never are.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    /// All keys currently held down, lowest first.
    pub fn pressed(&self) -> impl Iterator<Item = u8> + '_ {
        (0..NUM_KEYS as u8).filter(move |k| self.is_pressed(*k))
    }

    /// The lowest key that is held now but was not held in `previous`.
    pub fn newly_pressed(&self, previous: &Keypad) -> Option<u8> {
        self.pressed().find(|k| !previous.is_pressed(*k))
    }
}
