use crate::{definitions::keyboard, display::Grid};

#[cfg_attr(test, mockall::automock)]
/// The traits responsible for the display based code
pub trait DisplayCommands {
    /// Will clear the display
    fn clear_display(&mut self);
    /// Will display all from the pixels, each entry is a palette index
    fn display(&mut self, pixels: &Grid);
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for writing the keyboard data
pub trait KeyboardCommands {
    /// The state of all the logical keys, indexed by key.
    fn get_keyboard(&mut self) -> [bool; keyboard::SIZE];
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for the beep
pub trait SoundCommands {
    /// Will be told once per frame if the beep shall sound.
    fn beep(&mut self, active: bool);
}

/// Will store the state of the internal keyboard.
///
/// Input is done with a hex keyboard that has 16 keys ranging `0-F`. The `8`, `4`, `6`, and
/// `2` keys are typically used for directional input. Three opcodes are used to detect input.
/// One skips an instruction if a specific key is pressed, while another does the same if a
/// specific key is not pressed. The third waits for a key press, and then stores it in one of
/// the data registers.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    keys: [bool; keyboard::SIZE],
}

impl Keyboard {
    pub fn new() -> Self {
        Keyboard::default()
    }

    pub fn reset(&mut self) {
        self.keys = [false; keyboard::SIZE];
    }

    /// Will set the state of the given key. Keys outside of `0x0-0xF` are ignored.
    pub fn set_key(&mut self, key: u8, pressed: bool) {
        match self.keys.get_mut(key as usize) {
            Some(entry) => *entry = pressed,
            None => log::warn!("Ignoring state change of unknown key {:#04X}", key),
        }
    }

    pub fn toggle_key(&mut self, key: u8) {
        self.set_key(key, !self.is_pressed(key))
    }

    /// Will overwrite all keys at once.
    pub fn set_mult(&mut self, keys: &[bool; keyboard::SIZE]) {
        self.keys = *keys;
    }

    /// Unknown keys are never pressed.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    /// The lowest key that is currently held down.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|pressed| *pressed).map(|key| key as u8)
    }

    pub fn get_keys(&self) -> &[bool] {
        &self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_keys_start_unpressed() {
        let keys = Keyboard::new();
        assert_eq!(keys.get_keys(), &[false; keyboard::SIZE]);
        assert_eq!(keys.first_pressed(), None);
    }

    #[test]
    fn test_set_and_query() {
        let mut keys = Keyboard::new();
        keys.set_key(0xB, true);
        keys.set_key(0x4, true);
        assert!(keys.is_pressed(0xB));
        assert!(!keys.is_pressed(0x3));
        // the lowest pressed key wins
        assert_eq!(keys.first_pressed(), Some(0x4));

        keys.toggle_key(0x4);
        assert_eq!(keys.first_pressed(), Some(0xB));

        keys.reset();
        assert_eq!(keys.first_pressed(), None);
    }

    #[test]
    fn test_unknown_keys() {
        let mut keys = Keyboard::new();
        keys.set_key(0x10, true);
        assert!(!keys.is_pressed(0x10));
        assert_eq!(keys.first_pressed(), None);
    }

    #[test]
    fn test_set_mult() {
        let mut keys = Keyboard::new();
        let mut state = [false; keyboard::SIZE];
        for row in keyboard::LAYOUT.iter() {
            state[row[3] as usize] = true;
        }
        keys.set_mult(&state);
        assert_eq!(keys.first_pressed(), Some(0xC));
        assert!(keys.is_pressed(0xF));
    }
}
