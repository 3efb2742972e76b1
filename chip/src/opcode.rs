//! Opcode abstractions, the decoder and the types shared with the instruction set.
use std::convert::TryFrom;

use crate::{
    bits,
    definitions::memory,
    error::{MemoryError, OpcodeError},
};

/// the base mask used for generating all the other sub masks
pub(crate) const OPCODE_MASK_FFFF: u16 = u16::MAX;

/// the mask for the first twelve bits
pub(crate) const OPCODE_MASK_FFF0: u16 = OPCODE_MASK_FFFF << 4;

/// the mask for the first eight bits
pub(crate) const OPCODE_MASK_FF00: u16 = OPCODE_MASK_FFFF << 8;

/// the mask for the first four bits
pub(crate) const OPCODE_MASK_F000: u16 = OPCODE_MASK_FFFF << 12;

/// the mask for the last four bits
pub(crate) const OPCODE_MASK_000F: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FFF0;

/// the mask for the last eight bits
pub(crate) const OPCODE_MASK_00FF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FF00;

/// the mask for the last twelve bits
pub(crate) const OPCODE_MASK_0FFF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_F000;

/// a wrapper type for u16 to make it clear what is meant to be used
pub type Opcode = u16;

/// will build an opcode from data and the given point
/// # Arguments
///
/// - `data` - A slice of u8 data entries used to generate the opcodes
/// - `pointer` - Where in the data the opcode shall be extracted, so `pointer` and `pointer + 1` make
/// the opcode up
///
/// # Example
/// ```rust
/// # use chip::opcode::*;
/// # use chip::MemoryError;
///  const OPCODES: [Opcode; 2] = [0x00EE, 0x1EDA];
///  const SPLIT_OPCODE: [u8; 4] = [0x00, 0xEE, 0x1E, 0xDA];
///  for (i, val) in OPCODES.iter().enumerate() {
///      let opcode = build_opcode(&SPLIT_OPCODE, i * 2).expect("This will work.");
///      assert_eq!(opcode, *val);
///  }
/// # let err = MemoryError::AddressOutOfRange { address: 3, len: 2 };
/// # assert_eq!(Err(err), build_opcode(&SPLIT_OPCODE, 3));
/// ```
pub fn build_opcode(data: &[u8], pointer: usize) -> Result<Opcode, MemoryError> {
    // controlling that there is no illegal access here
    if pointer + 1 < data.len() {
        Ok(bits::combine(data[pointer], data[pointer + 1]))
    } else {
        Err(MemoryError::AddressOutOfRange {
            address: pointer,
            len: memory::opcodes::SIZE,
        })
    }
}

/// These are special traits used to filter out information
/// from opcodes
pub trait OpcodeTrait {
    /// The opcode family, the leading nibble `T` of `TXYN`
    fn t(&self) -> u8;

    /// The address `NNN` of `TNNN`
    fn nnn(&self) -> u16;

    /// The constant `NN` of `TXNN`
    fn nn(&self) -> u8;

    /// The register index `X` of `TXYN`
    fn x(&self) -> usize;

    /// The register index `Y` of `TXYN`
    fn y(&self) -> usize;

    /// The sub type `N` of `TXYN`
    fn n(&self) -> u8;
}

impl OpcodeTrait for Opcode {
    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.t(), 0x1);
    /// ```
    fn t(&self) -> u8 {
        bits::nibble(self & OPCODE_MASK_F000, 3) as u8
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.nnn(), 0xEDA)
    /// ```
    fn nnn(&self) -> u16 {
        self & OPCODE_MASK_0FFF
    }

    fn nn(&self) -> u8 {
        bits::lo8(self & OPCODE_MASK_00FF)
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!((BASE_OPCODE.x(), BASE_OPCODE.y(), BASE_OPCODE.n()), (0xE, 0xD, 0xA));
    /// ```
    fn x(&self) -> usize {
        bits::nibble(*self, 2) as usize
    }

    fn y(&self) -> usize {
        bits::nibble(*self, 1) as usize
    }

    fn n(&self) -> u8 {
        (self & OPCODE_MASK_000F) as u8
    }
}

/// All the operand fields of an opcode, extracted up front.
/// Every instruction picks the fields it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Operands {
    /// register index from bits 8-11
    pub x: usize,
    /// register index from bits 4-7
    pub y: usize,
    /// bits 0-3
    pub n: u8,
    /// bits 0-7
    pub nn: u8,
    /// bits 0-11
    pub nnn: u16,
}

impl From<Opcode> for Operands {
    fn from(opcode: Opcode) -> Self {
        Self {
            x: opcode.x(),
            y: opcode.y(),
            n: opcode.n(),
            nn: opcode.nn(),
            nnn: opcode.nnn(),
        }
    }
}

/// Comparison used by the conditional skips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    NotEqual,
}

impl Comparison {
    #[inline]
    pub fn holds(self, left: u8, right: u8) -> bool {
        match self {
            Comparison::Equal => left == right,
            Comparison::NotEqual => left != right,
        }
    }
}

/// Bitwise register operations of the `8XY1`-`8XY3` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitwiseOp {
    Or,
    And,
    Xor,
}

impl BitwiseOp {
    #[inline]
    pub fn apply(self, left: u8, right: u8) -> u8 {
        match self {
            BitwiseOp::Or => left | right,
            BitwiseOp::And => left & right,
            BitwiseOp::Xor => left ^ right,
        }
    }
}

/// Which register is the minuend of a subtraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subtraction {
    /// `VX = VX - VY`
    XMinusY,
    /// `VX = VY - VX`
    YMinusX,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    Right,
    Left,
}

/// The key state a key skip is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    NotPressed,
}

/// The instruction table. Every variant maps to exactly one encoding, the
/// parameterised ones only differ in the comparison or operator they use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `00E0`
    ClearScreen,
    /// `00EE`
    Return,
    /// `1NNN`
    Jump,
    /// `2NNN`
    Call,
    /// `3XNN` and `4XNN`
    SkipImmediate(Comparison),
    /// `5XY0` and `9XY0`
    SkipRegister(Comparison),
    /// `6XNN`
    SetImmediate,
    /// `7XNN`
    AddImmediate,
    /// `8XY0`
    SetRegister,
    /// `8XY1`, `8XY2` and `8XY3`
    Bitwise(BitwiseOp),
    /// `8XY4`
    AddRegister,
    /// `8XY5` and `8XY7`
    Subtract(Subtraction),
    /// `8XY6` and `8XYE`
    Shift(ShiftDirection),
    /// `ANNN`
    SetIndex,
    /// `BNNN`
    JumpOffset,
    /// `CXNN`
    Random,
    /// `DXYN`
    Draw,
    /// `EX9E` and `EXA1`
    SkipKey(KeyState),
    /// `FX07`
    GetDelayTimer,
    /// `FX0A`
    AwaitKeyPress,
    /// `FX15`
    SetDelayTimer,
    /// `FX18`
    SetSoundTimer,
    /// `FX1E`
    AddToIndex,
    /// `FX29`
    FontAddress,
    /// `FX33`
    StoreBcd,
    /// `FX55`
    StoreRegisters,
    /// `FX65`
    LoadRegisters,
}

/// Builds the lookup of a family that is further keyed by a sub field.
macro_rules! subtable {
    ($value:expr, $opcode:expr ; $( $key:literal => $instruction:expr ),+ $(,)? ) => {
        match $value {
            $(
                $key => Ok($instruction),
            )+
            _ => Err(OpcodeError::InvalidOpcode($opcode)),
        }
    };
}

impl TryFrom<Opcode> for Instruction {
    type Error = OpcodeError;

    fn try_from(value: Opcode) -> Result<Self, Self::Error> {
        use Instruction::*;

        match value.t() {
            0x0 => subtable!(value, value;
                0x00E0 => ClearScreen,
                0x00EE => Return,
            ),
            0x1 => Ok(Jump),
            0x2 => Ok(Call),
            0x3 => Ok(SkipImmediate(Comparison::Equal)),
            0x4 => Ok(SkipImmediate(Comparison::NotEqual)),
            0x5 => subtable!(value.n(), value;
                0x0 => SkipRegister(Comparison::Equal),
            ),
            0x6 => Ok(SetImmediate),
            0x7 => Ok(AddImmediate),
            0x8 => subtable!(value.n(), value;
                0x0 => SetRegister,
                0x1 => Bitwise(BitwiseOp::Or),
                0x2 => Bitwise(BitwiseOp::And),
                0x3 => Bitwise(BitwiseOp::Xor),
                0x4 => AddRegister,
                0x5 => Subtract(Subtraction::XMinusY),
                0x6 => Shift(ShiftDirection::Right),
                0x7 => Subtract(Subtraction::YMinusX),
                0xE => Shift(ShiftDirection::Left),
            ),
            0x9 => subtable!(value.n(), value;
                0x0 => SkipRegister(Comparison::NotEqual),
            ),
            0xA => Ok(SetIndex),
            0xB => Ok(JumpOffset),
            0xC => Ok(Random),
            0xD => Ok(Draw),
            0xE => subtable!(value.nn(), value;
                0x9E => SkipKey(KeyState::Pressed),
                0xA1 => SkipKey(KeyState::NotPressed),
            ),
            0xF => subtable!(value.nn(), value;
                0x07 => GetDelayTimer,
                0x0A => AwaitKeyPress,
                0x15 => SetDelayTimer,
                0x18 => SetSoundTimer,
                0x1E => AddToIndex,
                0x29 => FontAddress,
                0x33 => StoreBcd,
                0x55 => StoreRegisters,
                0x65 => LoadRegisters,
            ),
            _ => Err(OpcodeError::InvalidOpcode(value)),
        }
    }
}

/// Will map the opcode onto its instruction and operands.
///
/// # Example
/// ```rust
/// # use chip::opcode::*;
/// let (instruction, operands) = decode(0x8125).expect("a valid subtraction");
/// assert_eq!(instruction, Instruction::Subtract(Subtraction::XMinusY));
/// assert_eq!((operands.x, operands.y), (0x1, 0x2));
/// assert!(decode(0x8128).is_err());
/// ```
pub fn decode(opcode: Opcode) -> Result<(Instruction, Operands), OpcodeError> {
    let instruction = Instruction::try_from(opcode)?;
    Ok((instruction, Operands::from(opcode)))
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Represents the program steps that the chip can take after an instruction
/// ran. The program counter has already been moved past the instruction
/// during the fetch.
pub enum ProgramCounterStep {
    /// Will leave the program counter on the next instruction
    Next,
    /// Will skip the next instruction
    Skip,
    /// Will move the program counter back onto the current instruction
    Repeat,
    /// Will simply move the program counter to the given location.
    Jump(u16),
}

impl ProgramCounterStep {
    /// Will return a Skip if the condition is true.
    ///
    /// # Example
    /// ```rust
    /// # use chip::opcode::ProgramCounterStep;
    /// assert_eq!(ProgramCounterStep::Next, ProgramCounterStep::cond(false));
    /// assert_eq!(ProgramCounterStep::Skip, ProgramCounterStep::cond(true));
    /// ```
    #[inline]
    pub fn cond(cond: bool) -> Self {
        if cond {
            ProgramCounterStep::Skip
        } else {
            ProgramCounterStep::Next
        }
    }

    /// Will apply the step onto the already advanced program counter.
    #[inline]
    pub fn apply(&self, program_counter: u16) -> u16 {
        const SIZE: u16 = memory::opcodes::SIZE as u16;
        match *self {
            ProgramCounterStep::Next => program_counter,
            ProgramCounterStep::Skip => program_counter.wrapping_add(SIZE),
            ProgramCounterStep::Repeat => program_counter.wrapping_sub(SIZE),
            ProgramCounterStep::Jump(pointer) => pointer,
        }
    }
}

/// Represents a step of the program counter
/// this requires the enum ProgramCounterStep
/// to work.
pub trait ProgramCounter {
    /// will move the program counter by a step.
    fn step(&mut self, step: ProgramCounterStep);
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Represents a command from the interpreter up to the driver.
pub enum Operation {
    /// If no action has to be taken.
    None,
    /// The instruction waits for a key press and will run again
    Wait,
    /// The display changed and has to be redrawn
    Draw,
    /// A call was made with a full stack, the return address was dropped
    StackOverflowIgnored,
}
