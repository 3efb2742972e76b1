use std::time::Duration;

use rand::{rngs::OsRng, rngs::StdRng, RngCore, SeedableRng};

use crate::{
    config::Config,
    definitions::{keyboard, memory as memory_definitions, timer},
    devices::Keyboard,
    display::{Display, Grid},
    memory::Memory,
    opcode::{self, Opcode, Operation, ProgramCounter, ProgramCounterStep},
    registers::Registers,
    resources::Rom,
    stack::Stack,
    timer::{SoundTimer, Timed, Timer},
    ProcessError,
};

use super::opcodes;

/// The outcome of a single call to [`ChipSet::advance`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// The amount of instructions that ran
    pub cycles: usize,
    /// If the timers counted down
    pub ticked: bool,
    /// If the display changed
    pub redraw: bool,
    /// If the program is waiting for a key press
    pub waiting: bool,
}

/// The ChipSet struct represents the current state
/// of the system, it contains all the structures
/// needed for emulating an instant on the
/// Chip8 CPU.
pub struct ChipSet {
    /// name of the loaded rom
    pub(super) name: String,
    /// the last fetched opcode, all two bytes long and stored big-endian
    pub(super) opcode: Opcode,
    pub(super) memory: Memory,
    pub(super) registers: Registers,
    pub(super) stack: Stack,
    /// Counts down at 60 hertz, until it reaches 0.
    pub(super) delay_timer: Timer,
    /// Counts down at 60 hertz, until it reaches 0.
    pub(super) sound_timer: SoundTimer,
    pub(super) display: Display,
    pub(super) keyboard: Keyboard,
    /// This stores the random number generator, used by the chipset.
    /// It is stored into the chipset, so as to enable simple mocking
    /// of the given type.
    pub(super) rng: Box<dyn RngCore + Send>,
    pub(super) config: Config,
    /// time accumulated towards the next timer tick
    since_tick: Duration,
    /// time accumulated towards the next cycles
    since_cycle: Duration,
}

impl ChipSet {
    /// will create a new chipset object without a program
    pub fn new(config: Config) -> Self {
        let rng: Box<dyn RngCore + Send> = match config.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(OsRng),
        };
        Self::with_rng(config, rng)
    }

    /// will create a new chipset object that draws its random numbers from `rng`
    pub fn with_rng(config: Config, rng: Box<dyn RngCore + Send>) -> Self {
        Self {
            name: String::new(),
            opcode: 0,
            memory: Memory::new(),
            registers: Registers::new(),
            stack: Stack::new(),
            delay_timer: Timer::default(),
            sound_timer: SoundTimer::default(),
            display: Display::new(config.foreground),
            keyboard: Keyboard::new(),
            rng,
            config,
            since_tick: Duration::ZERO,
            since_cycle: Duration::ZERO,
        }
    }

    /// Will reset the machine and write the rom into memory.
    pub fn load(&mut self, rom: &Rom) -> Result<(), ProcessError> {
        let mut memory = Memory::new();
        memory.load_program(rom.get_data())?;

        self.reset();
        self.memory = memory;
        self.name = rom.get_name().to_string();
        log::debug!(
            "Loaded rom '{}' with {} bytes",
            self.name,
            rom.get_data().len()
        );
        Ok(())
    }

    /// Will bring every component back into its power on state. The loaded program is lost.
    pub fn reset(&mut self) {
        self.name.clear();
        self.opcode = 0;
        self.memory = Memory::new();
        self.registers = Registers::new();
        self.stack.reset();
        self.delay_timer = Timer::default();
        self.sound_timer = SoundTimer::default();
        self.display.clear();
        self.keyboard.reset();
        self.since_tick = Duration::ZERO;
        self.since_cycle = Duration::ZERO;
    }

    /// will read the opcode at the program counter and move the counter past it
    pub fn fetch(&mut self) -> Result<Opcode, ProcessError> {
        let pc = self.registers.program_counter();
        let opcode = self.memory.opcode(pc as usize)?;
        log::trace!("{:#06X}: {:#06X}", pc, opcode);

        self.opcode = opcode;
        self.registers
            .set_program_counter(pc.wrapping_add(memory_definitions::opcodes::SIZE as u16));
        Ok(opcode)
    }

    /// will advance the program by a single fetch, decode and execute cycle
    ///
    /// On error the program counter and the last opcode are put back, no other state was
    /// touched.
    pub fn next(&mut self) -> Result<Operation, ProcessError> {
        let pc = self.registers.program_counter();
        let previous = self.opcode;
        let opcode = self.fetch()?;

        let res = opcode::decode(opcode)
            .map_err(ProcessError::from)
            .and_then(|(instruction, operands)| opcodes::execute(self, instruction, operands));

        match res {
            Ok((step, operation)) => {
                self.step(step);
                Ok(operation)
            }
            Err(err) => {
                self.registers.set_program_counter(pc);
                self.opcode = previous;
                Err(err)
            }
        }
    }

    /// Will count both timers down by one, once a full 60 hertz interval has passed.
    ///
    /// Returns if the timers were counted down.
    pub fn tick_timers(&mut self, elapsed: Duration) -> bool {
        self.since_tick += elapsed;
        if self.since_tick < timer::INTERVAL {
            return false;
        }
        // the carry stays below an interval, so a stall is never paid back later
        self.since_tick =
            (self.since_tick - timer::INTERVAL).min(timer::INTERVAL - Duration::from_nanos(1));

        self.delay_timer.tick();
        self.sound_timer.tick();
        true
    }

    /// Will advance the machine by the elapsed wall time.
    ///
    /// The timers are counted down first, then as many instructions run as fit into the elapsed
    /// time at the configured rate. At most `max_cycles_per_tick` run per call and the cycles
    /// stop as soon as the program waits for a key press.
    pub fn advance(&mut self, elapsed: Duration) -> Result<Frame, ProcessError> {
        let mut frame = Frame {
            ticked: self.tick_timers(elapsed),
            ..Frame::default()
        };

        let interval = self.config.cycle_interval();
        self.since_cycle += elapsed;

        while self.since_cycle >= interval && frame.cycles < self.config.max_cycles_per_tick {
            self.since_cycle -= interval;
            frame.cycles += 1;

            match self.next()? {
                Operation::Draw => frame.redraw = true,
                Operation::Wait => {
                    frame.waiting = true;
                    break;
                }
                Operation::None | Operation::StackOverflowIgnored => {}
            }
        }
        // don't let the debt pile up when the program runs behind
        self.since_cycle = self.since_cycle.min(interval);

        Ok(frame)
    }

    /// Will write keyboard data into the internal keyboard representation.
    pub fn set_keyboard(&mut self, keys: &[bool; keyboard::SIZE]) {
        self.keyboard.set_mult(keys);
    }

    /// Will set the value of the given key
    pub fn set_key_state(&mut self, key: u8, pressed: bool) {
        self.keyboard.set_key(key, pressed)
    }

    /// Will toggle the given key
    pub fn toggle_key(&mut self, key: u8) {
        self.keyboard.toggle_key(key)
    }

    pub fn is_key_pressed(&self, key: u8) -> bool {
        self.keyboard.is_pressed(key)
    }

    pub fn first_pressed_key(&self) -> Option<u8> {
        self.keyboard.first_pressed()
    }

    /// Will get the current state of the keyboard
    pub fn get_keyboard(&self) -> &[bool] {
        self.keyboard.get_keys()
    }

    /// will return the sound timer
    pub fn get_sound_timer(&self) -> u8 {
        self.sound_timer.get_value()
    }

    /// will return the delay timer
    pub fn get_delay_timer(&self) -> u8 {
        self.delay_timer.get_value()
    }

    pub fn is_sound_active(&self) -> bool {
        self.sound_timer.is_active()
    }

    /// Will return a immutable view of the current display configuration
    pub fn get_display(&self) -> &Grid {
        self.display.grid()
    }

    /// The amount of calls whose return address was dropped because the stack was full.
    pub fn stack_overflows(&self) -> usize {
        self.stack.dropped()
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn get_registers(&self) -> &[u8] {
        self.registers.all()
    }

    pub fn get_index_register(&self) -> u16 {
        self.registers.index()
    }

    pub fn get_program_counter(&self) -> u16 {
        self.registers.program_counter()
    }

    pub fn get_memory(&self) -> &[u8] {
        self.memory.as_slice()
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl ProgramCounter for ChipSet {
    fn step(&mut self, step: ProgramCounterStep) {
        let pc = step.apply(self.registers.program_counter());
        self.registers.set_program_counter(pc);
    }
}
