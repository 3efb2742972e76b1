//! The two countdown timers of the chip.
//!
//! Both count down at 60 hertz until they reach 0. The timers do not keep time themselves,
//! the [`ChipSet`](crate::chip8::ChipSet) decides when a tick happened and calls
//! [`Timed::tick`].

pub trait Timed {
    /// Will set the value from which the timer shall count down from.
    fn set_value(&mut self, value: u8);

    /// Will get the value that the counter is currently at.
    fn get_value(&self) -> u8;

    /// Will count down by a single step, stopping at 0.
    fn tick(&mut self);
}

/// Delay timer: This timer is intended to be used for timing the events of games. Its value
/// can be set and read.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    value: u8,
}

impl Timer {
    /// Will create a new timer with the given value.
    pub fn new(value: u8) -> Self {
        Self { value }
    }
}

impl Timed for Timer {
    fn set_value(&mut self, value: u8) {
        self.value = value;
    }

    fn get_value(&self) -> u8 {
        self.value
    }

    fn tick(&mut self) {
        self.value = self.value.saturating_sub(1);
    }
}

/// Sound timer: This timer is used for sound effects. When its value is nonzero, a beeping
/// sound is made.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SoundTimer {
    inner: Timer,
}

impl SoundTimer {
    pub fn new(value: u8) -> Self {
        Self {
            inner: Timer::new(value),
        }
    }

    /// Is the beep currently sounding.
    pub fn is_active(&self) -> bool {
        self.inner.get_value() > 0
    }
}

impl Timed for SoundTimer {
    fn set_value(&mut self, value: u8) {
        self.inner.set_value(value)
    }

    fn get_value(&self) -> u8 {
        self.inner.get_value()
    }

    fn tick(&mut self) {
        self.inner.tick()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::timer;

    #[test]
    fn test_timer() {
        let mut timer = Timer::new(timer::HERTZ as u8);

        // a second worth of ticks
        for _ in 0..timer::HERTZ {
            timer.tick();
        }
        assert_eq!(timer.get_value(), 0);

        // floored at zero
        timer.tick();
        assert_eq!(timer.get_value(), 0);
    }

    #[test]
    fn test_sound_timer_activity() {
        let mut sound = SoundTimer::new(0);
        assert!(!sound.is_active());

        sound.set_value(2);
        assert!(sound.is_active());

        sound.tick();
        assert!(sound.is_active());
        assert_eq!(sound.get_value(), 1);

        sound.tick();
        assert!(!sound.is_active());
    }
}
