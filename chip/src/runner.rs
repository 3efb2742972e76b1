use std::time::Duration;

use crate::{
    chip8::{ChipSet, Frame},
    definitions::timer,
    devices::{DisplayCommands, KeyboardCommands, SoundCommands},
    opcode::Operation,
    ProcessError,
};

/// Drives a [`ChipSet`] from the host loop, shuffling the state between the machine and the
/// devices once per frame.
pub struct Runner<D, K, S>
where
    D: DisplayCommands,
    K: KeyboardCommands,
    S: SoundCommands,
{
    chip: ChipSet,
    display: D,
    keyboard: K,
    sound: S,
    /// when set the machine only moves on request
    debug: bool,
    step_requested: bool,
}

impl<D, K, S> Runner<D, K, S>
where
    D: DisplayCommands,
    K: KeyboardCommands,
    S: SoundCommands,
{
    pub fn new(chip: ChipSet, display: D, keyboard: K, sound: S) -> Self {
        Self {
            chip,
            display,
            keyboard,
            sound,
            debug: false,
            step_requested: false,
        }
    }

    /// Will switch the single step mode on or off.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Will let the next frame run exactly one instruction while in single step mode.
    pub fn request_step(&mut self) {
        self.step_requested = true;
    }

    /// Will reset the machine and blank the screen.
    pub fn reset(&mut self) {
        self.chip.reset();
        self.step_requested = false;
        self.display.clear_display();
    }

    pub fn chip(&self) -> &ChipSet {
        &self.chip
    }

    pub fn chip_mut(&mut self) -> &mut ChipSet {
        &mut self.chip
    }

    /// Will return the pretty printed machine state.
    pub fn dump(&self) -> String {
        format!("{}", self.chip)
    }

    /// Will run one host frame.
    ///
    /// The keyboard is polled first, then the machine is advanced by `elapsed`. The display
    /// is only pushed when an instruction changed it or when the frame failed, the sound
    /// device is told every successful frame if it should beep.
    pub fn frame(&mut self, elapsed: Duration) -> Result<Frame, ProcessError> {
        let keys = self.keyboard.get_keyboard();
        self.chip.set_keyboard(&keys);

        let res = if self.debug {
            self.single_step()
        } else {
            self.chip.advance(elapsed)
        };

        let frame = match res {
            Ok(frame) => frame,
            Err(err) => {
                log::error!(
                    "Execution stopped at {:#06X}: {}",
                    self.chip.get_program_counter(),
                    err
                );
                // cycles before the failing one may have drawn
                self.display.display(self.chip.get_display());
                return Err(err);
            }
        };

        if frame.redraw {
            self.display.display(self.chip.get_display());
        }
        self.sound.beep(self.chip.is_sound_active());

        Ok(frame)
    }

    fn single_step(&mut self) -> Result<Frame, ProcessError> {
        if !std::mem::take(&mut self.step_requested) {
            return Ok(Frame::default());
        }
        let ticked = self.chip.tick_timers(timer::INTERVAL);
        let operation = self.chip.next()?;
        log::debug!("{}", self.chip);

        Ok(Frame {
            cycles: 1,
            ticked,
            redraw: matches!(operation, Operation::Draw),
            waiting: matches!(operation, Operation::Wait),
        })
    }
}
