//! The instruction set. Every instruction is a function over the whole machine and the decoded
//! operands, returning how the program counter moves on and what the driver has to do.
use crate::{
    bits,
    definitions::{cpu::register, display::fontset},
    display::Display,
    opcode::{
        BitwiseOp, Comparison, Instruction, KeyState, Operands, Operation, ProgramCounterStep,
        ShiftDirection, Subtraction,
    },
    timer::Timed,
    ProcessError,
};

use super::ChipSet;

type Outcome = Result<(ProgramCounterStep, Operation), ProcessError>;

#[inline]
fn next() -> Outcome {
    Ok((ProgramCounterStep::Next, Operation::None))
}

#[inline]
fn cond(condition: bool) -> Outcome {
    Ok((ProgramCounterStep::cond(condition), Operation::None))
}

/// Will run the decoded instruction against the chip.
pub(super) fn execute(chip: &mut ChipSet, instruction: Instruction, ops: Operands) -> Outcome {
    match instruction {
        Instruction::ClearScreen => clear_screen(chip),
        Instruction::Return => ret(chip),
        Instruction::Jump => jump(ops),
        Instruction::Call => call(chip, ops),
        Instruction::SkipImmediate(cmp) => skip_immediate(chip, ops, cmp),
        Instruction::SkipRegister(cmp) => skip_register(chip, ops, cmp),
        Instruction::SetImmediate => set_immediate(chip, ops),
        Instruction::AddImmediate => add_immediate(chip, ops),
        Instruction::SetRegister => set_register(chip, ops),
        Instruction::Bitwise(op) => bitwise(chip, ops, op),
        Instruction::AddRegister => add_register(chip, ops),
        Instruction::Subtract(order) => subtract(chip, ops, order),
        Instruction::Shift(direction) => shift(chip, ops, direction),
        Instruction::SetIndex => set_index(chip, ops),
        Instruction::JumpOffset => jump_offset(chip, ops),
        Instruction::Random => random(chip, ops),
        Instruction::Draw => draw(chip, ops),
        Instruction::SkipKey(state) => skip_key(chip, ops, state),
        Instruction::GetDelayTimer => get_delay_timer(chip, ops),
        Instruction::AwaitKeyPress => await_key_press(chip, ops),
        Instruction::SetDelayTimer => set_delay_timer(chip, ops),
        Instruction::SetSoundTimer => set_sound_timer(chip, ops),
        Instruction::AddToIndex => add_to_index(chip, ops),
        Instruction::FontAddress => font_address(chip, ops),
        Instruction::StoreBcd => store_bcd(chip, ops),
        Instruction::StoreRegisters => store_registers(chip, ops),
        Instruction::LoadRegisters => load_registers(chip, ops),
    }
}

/// - `00E0` - Display  - `disp_clear()`        - Clears the screen.
fn clear_screen(chip: &mut ChipSet) -> Outcome {
    chip.display.clear();
    Ok((ProgramCounterStep::Next, Operation::Draw))
}

/// - `00EE` - Flow     - `return;`             - Returns from a subroutine.
fn ret(chip: &mut ChipSet) -> Outcome {
    let pc = chip.stack.pop()?;
    log::debug!("return to {:#06X}", pc);
    Ok((ProgramCounterStep::Jump(pc), Operation::None))
}

/// - `1NNN` - Flow     - `goto NNN;`           - Jumps to address `NNN`.
fn jump(ops: Operands) -> Outcome {
    Ok((ProgramCounterStep::Jump(ops.nnn), Operation::None))
}

/// - `2NNN` - Flow     - `*(0xNNN)()`          - Calls subroutine at `NNN`.
///
/// The return address is the already advanced program counter. With a full stack the
/// return address is dropped and the jump still happens.
fn call(chip: &mut ChipSet, ops: Operands) -> Outcome {
    let pc = chip.registers.program_counter();
    log::debug!("call {:#06X}, returning to {:#06X}", ops.nnn, pc);

    let operation = match chip.stack.push(pc) {
        Ok(()) => Operation::None,
        Err(err) => {
            log::warn!(
                "{} Dropping return address {:#06X} ({} dropped so far).",
                err,
                pc,
                chip.stack.dropped()
            );
            Operation::StackOverflowIgnored
        }
    };
    Ok((ProgramCounterStep::Jump(ops.nnn), operation))
}

/// - `3XNN` - Cond    - `if(Vx==NN)`
/// - `4XNN` - Cond    - `if(Vx!=NN)`
fn skip_immediate(chip: &ChipSet, ops: Operands, cmp: Comparison) -> Outcome {
    cond(cmp.holds(chip.registers.get(ops.x), ops.nn))
}

/// - `5XY0` - Cond     - `if(Vx==Vy)`
/// - `9XY0` - Cond     - `if(Vx!=Vy)`
fn skip_register(chip: &ChipSet, ops: Operands, cmp: Comparison) -> Outcome {
    cond(cmp.holds(chip.registers.get(ops.x), chip.registers.get(ops.y)))
}

/// - `6XNN` - Const    - `Vx = NN`
fn set_immediate(chip: &mut ChipSet, ops: Operands) -> Outcome {
    chip.registers.set(ops.x, ops.nn);
    next()
}

/// - `7XNN` - Const    - `Vx += NN`            - Carry flag is not changed.
fn add_immediate(chip: &mut ChipSet, ops: Operands) -> Outcome {
    let res = chip.registers.get(ops.x).wrapping_add(ops.nn);
    chip.registers.set(ops.x, res);
    next()
}

/// - `8XY0` - Assign   - `Vx=Vy`
fn set_register(chip: &mut ChipSet, ops: Operands) -> Outcome {
    chip.registers.set(ops.x, chip.registers.get(ops.y));
    next()
}

/// - `8XY1` - BitOp    - `Vx=Vx|Vy`
/// - `8XY2` - BitOp    - `Vx=Vx&Vy`
/// - `8XY3` - BitOp    - `Vx=Vx^Vy`
fn bitwise(chip: &mut ChipSet, ops: Operands, op: BitwiseOp) -> Outcome {
    let res = op.apply(chip.registers.get(ops.x), chip.registers.get(ops.y));
    chip.registers.set(ops.x, res);
    next()
}

/// - `8XY4` - Math     - `Vx += Vy`            - `VF` is set to `1` when there's a carry.
fn add_register(chip: &mut ChipSet, ops: Operands) -> Outcome {
    let (res, carry) = chip
        .registers
        .get(ops.x)
        .overflowing_add(chip.registers.get(ops.y));
    chip.registers.set(ops.x, res);
    chip.registers.set_flag(carry);
    next()
}

/// - `8XY5` - Math     - `Vx -= Vy`
/// - `8XY7` - Math     - `Vx=Vy-Vx`
///
/// `VF` is set to `1` if the minuend is strictly larger than the subtrahend.
fn subtract(chip: &mut ChipSet, ops: Operands, order: Subtraction) -> Outcome {
    let (vx, vy) = (chip.registers.get(ops.x), chip.registers.get(ops.y));
    let (minuend, subtrahend) = match order {
        Subtraction::XMinusY => (vx, vy),
        Subtraction::YMinusX => (vy, vx),
    };
    chip.registers.set(ops.x, minuend.wrapping_sub(subtrahend));
    chip.registers.set_flag(minuend > subtrahend);
    next()
}

/// - `8XY6` - BitOp    - `Vx>>=1`              - `VF` holds the bit shifted out.
/// - `8XYE` - BitOp    - `Vx<<=1`              - `VF` holds the bit shifted out.
fn shift(chip: &mut ChipSet, ops: Operands, direction: ShiftDirection) -> Outcome {
    let source = if chip.config.quirks.shift_copies_y {
        chip.registers.get(ops.y)
    } else {
        chip.registers.get(ops.x)
    };

    let (res, carry) = match direction {
        ShiftDirection::Right => (source >> 1, bits::check_bit(source, 0)),
        ShiftDirection::Left => (source << 1, bits::check_bit(source, 7)),
    };
    chip.registers.set(ops.x, res);
    chip.registers.set_flag(carry);
    next()
}

/// - `ANNN` - MEM    - `I = NNN`
fn set_index(chip: &mut ChipSet, ops: Operands) -> Outcome {
    chip.registers.set_index(ops.nnn);
    next()
}

/// - `BNNN` - Flow    - `PC=V0+NNN`           - or `VX+NNN` with the modern quirk.
fn jump_offset(chip: &ChipSet, ops: Operands) -> Outcome {
    let reg = if chip.config.quirks.jump_offset_uses_x {
        ops.x
    } else {
        0
    };
    let pc = (ops.nnn + chip.registers.get(reg) as u16) & register::ADDRESS_MASK;
    log::debug!("jump with offset to {:#06X}", pc);
    Ok((ProgramCounterStep::Jump(pc), Operation::None))
}

/// - `CXNN` - Rand     - `Vx=rand()&NN`
fn random(chip: &mut ChipSet, ops: Operands) -> Outcome {
    // using a fill bytes call here, as the trait RngCore does not
    // support random u8.
    let mut rand: [u8; 1] = [0];
    chip.rng.fill_bytes(&mut rand);
    chip.registers.set(ops.x, ops.nn & rand[0]);
    next()
}

/// - `DXYN` - Disp     - `draw(Vx,Vy,N)`
///
/// Draws a sprite at coordinate `(VX, VY)` that has a width of `8` pixels and a height of `N`
/// pixels. Each row of `8` pixels is read as bit-coded starting from memory location `I`; `I`
/// value doesn't change after the execution of this instruction. `VF` is set to `1` if any
/// screen pixels are flipped from set to unset when the sprite is drawn, and to `0` if that
/// doesn't happen.
fn draw(chip: &mut ChipSet, ops: Operands) -> Outcome {
    let x = chip.registers.get(ops.x) as usize;
    let y = chip.registers.get(ops.y) as usize;

    // rows below the screen are never read
    let rows = Display::visible_rows(y, ops.n as usize);
    let sprite = chip.memory.slice(chip.registers.index() as usize, rows)?;

    let collision = chip.display.draw_sprite(x, y, sprite);
    chip.registers.set_flag(collision);
    Ok((ProgramCounterStep::Next, Operation::Draw))
}

/// - `EX9E` - KeyOp    - `if(key()==Vx)`
/// - `EXA1` - KeyOp    - `if(key()!=Vx)`
fn skip_key(chip: &ChipSet, ops: Operands, state: KeyState) -> Outcome {
    let key = if chip.config.quirks.key_skip_uses_register_index {
        ops.x as u8
    } else {
        chip.registers.get(ops.x)
    };
    let pressed = chip.keyboard.is_pressed(key);
    cond(match state {
        KeyState::Pressed => pressed,
        KeyState::NotPressed => !pressed,
    })
}

/// - `FX07` - Timer    - `Vx = get_delay()`
fn get_delay_timer(chip: &mut ChipSet, ops: Operands) -> Outcome {
    chip.registers.set(ops.x, chip.delay_timer.get_value());
    next()
}

/// - `FX0A` - KeyOp    - `Vx = get_key()`
///
/// Without a pressed key the instruction is repeated on the next cycle.
fn await_key_press(chip: &mut ChipSet, ops: Operands) -> Outcome {
    match chip.keyboard.first_pressed() {
        Some(key) => {
            log::debug!("key {:#X} pressed, stored in V{:X}", key, ops.x);
            chip.registers.set(ops.x, key);
            next()
        }
        None => Ok((ProgramCounterStep::Repeat, Operation::Wait)),
    }
}

/// - `FX15` - Timer    - `delay_timer(Vx)`
fn set_delay_timer(chip: &mut ChipSet, ops: Operands) -> Outcome {
    chip.delay_timer.set_value(chip.registers.get(ops.x));
    next()
}

/// - `FX18` - Sound    - `sound_timer(Vx)`
fn set_sound_timer(chip: &mut ChipSet, ops: Operands) -> Outcome {
    chip.sound_timer.set_value(chip.registers.get(ops.x));
    next()
}

/// - `FX1E` - MEM      - `I +=Vx`
///
/// `VF` is set to `1` when the sum leaves the 12 bit address space, otherwise it is not touched.
fn add_to_index(chip: &mut ChipSet, ops: Operands) -> Outcome {
    let sum = chip.registers.index() + chip.registers.get(ops.x) as u16;
    if bits::check_bit(sum, 12) {
        chip.registers.set_flag(true);
    }
    chip.registers.set_index(sum);
    next()
}

/// - `FX29` - MEM      - `I=sprite_addr[Vx]`
fn font_address(chip: &mut ChipSet, ops: Operands) -> Outcome {
    let glyph = chip.registers.get(ops.x) as usize;
    let address = fontset::LOCATION + glyph * fontset::GLYPH_SIZE;
    chip.registers.set_index(address as u16);
    next()
}

/// - `FX33` - BCD      - `246 / 100 => 2` `246 / 10 => 24 % 10 => 4` `246 % 10 => 6`
fn store_bcd(chip: &mut ChipSet, ops: Operands) -> Outcome {
    let r = chip.registers.get(ops.x);
    let target = chip.memory.slice_mut(chip.registers.index() as usize, 3)?;
    target.copy_from_slice(&[r / 100, r / 10 % 10, r % 10]);
    next()
}

/// - `FX55` - MEM      - `reg_dump(Vx,&I)`     - Stores `V0` to `VX` (including `VX`) starting at `I`.
fn store_registers(chip: &mut ChipSet, ops: Operands) -> Outcome {
    let len = ops.x + 1;
    let index = chip.registers.index();

    let target = chip.memory.slice_mut(index as usize, len)?;
    target.copy_from_slice(&chip.registers.all()[..len]);

    if chip.config.quirks.store_load_advances_index {
        chip.registers.set_index(index + len as u16);
    }
    next()
}

/// - `FX65` - MEM      - `reg_load(Vx,&I)`     - Fills `V0` to `VX` (including `VX`) from `I`.
fn load_registers(chip: &mut ChipSet, ops: Operands) -> Outcome {
    let len = ops.x + 1;
    let source = chip.memory.slice(chip.registers.index() as usize, len)?;
    chip.registers.all_mut()[..len].copy_from_slice(source);
    next()
}
