//! Runtime configuration of a [`ChipSet`](crate::chip8::ChipSet).
use std::time::Duration;

use crate::definitions::{cpu, display::palette};

/// The behavioural variants between historical interpreters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Quirks {
    /// `8XY6`/`8XYE` first copy `VY` into `VX` before shifting (legacy).
    pub shift_copies_y: bool,
    /// `BNNN` adds `VX` instead of `V0` (modern, off by default).
    pub jump_offset_uses_x: bool,
    /// `FX55` advances `I` by `X + 1` after storing (legacy).
    pub store_load_advances_index: bool,
    /// `EX9E`/`EXA1` look up the key `X` itself instead of the value of `VX`.
    pub key_skip_uses_register_index: bool,
}

impl Quirks {
    /// The behaviour of the original COSMAC VIP interpreter.
    pub fn legacy() -> Self {
        Self {
            shift_copies_y: true,
            jump_offset_uses_x: false,
            store_load_advances_index: true,
            key_skip_uses_register_index: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub quirks: Quirks,
    /// How many instructions run per emulated second.
    pub cycles_per_second: u64,
    /// The most instructions a single call to `advance` may run.
    pub max_cycles_per_tick: usize,
    /// Seed for the random number generator, `None` uses the operating system.
    pub seed: Option<u64>,
    /// Palette index of a lit pixel.
    pub foreground: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quirks: Quirks::default(),
            cycles_per_second: cpu::HERTZ,
            max_cycles_per_tick: cpu::MAX_CYCLES_PER_TICK,
            seed: None,
            foreground: palette::FOREGROUND,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    pub fn cycles_per_second(mut self, hertz: u64) -> Self {
        self.cycles_per_second = hertz;
        self
    }

    pub fn max_cycles_per_tick(mut self, cycles: usize) -> Self {
        self.max_cycles_per_tick = cycles;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn foreground(mut self, index: u8) -> Self {
        self.foreground = index;
        self
    }

    /// The time a single instruction takes.
    pub fn cycle_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.cycles_per_second.max(1))
    }
}
