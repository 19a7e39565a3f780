//! State of the 4x4 hexadecimal keypad.
//!
//! ```text
//! |1|2|3|C|
//! |4|5|6|D|
//! |7|8|9|E|
//! |A|0|B|F|
//! ```
//!
//! How physical keys of the host end up on these 16 slots is not a concern
//! of the interpreter, it only ever sees logical indexes `0x0..=0xF`.

pub const KEYS: usize = 16;

#[derive(Debug, Default, Clone)]
pub struct Keypad {
    keys: [bool; KEYS],
    latest_press: Option<u8>,
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record state of `key`, returns `false` when `key` isn't a keypad key
    pub fn set(&mut self, key: u8, pressed: bool) -> bool {
        match self.keys.get_mut(key as usize) {
            Some(state) => {
                if pressed && !*state {
                    self.latest_press = Some(key);
                }
                *state = pressed;
                true
            }
            None => false,
        }
    }

    /// Values above 0xF are never pressed
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    pub fn as_array(&self) -> &[bool; KEYS] {
        &self.keys
    }

    /// Take the latest released to pressed transition seen since last call
    pub fn take_latest_press(&mut self) -> Option<u8> {
        self.latest_press.take()
    }

    /// Forget transitions seen so far
    pub fn clear_latest_press(&mut self) {
        self.latest_press = None;
    }
}
