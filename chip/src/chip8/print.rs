//! The pretty print implementation of the [`ChipSet`](super::ChipSet), used by drivers to dump
//! the machine state while debugging.
//!
//! Every listing is printed as rows of [`ROW_LEN`] cells, each row labelled with the index
//! range it covers. Memory is shown as big-endian words, with neighbouring rows of zeros
//! folded into a single line.

use std::fmt::{self, UpperHex, Write};

use num_traits::Unsigned;
use once_cell::sync::Lazy;

use super::ChipSet;
use crate::{
    bits,
    definitions::{cpu, memory},
    timer::Timed,
};

/// Cells per printed row.
const ROW_LEN: usize = 8;
/// Width of a single cell, the `0x` prefix and four digits.
const CELL_WIDTH: usize = 6;
const INDENT: &str = "\t\t";

/// Stands in for the cells of a row of zeros, as wide as a full row.
static ZERO_ROW: Lazy<String> = Lazy::new(|| {
    let mut zero = String::with_capacity(CELL_WIDTH);
    // writing into a string can not fail
    let _ = hex(&mut zero, 0u16);
    let gap = ROW_LEN * (CELL_WIDTH + 1) - 1 - 2 * zero.len();
    format!("{}{:^gap$}{}", zero, "...", zero, gap = gap)
});

fn hex<T: UpperHex + Unsigned>(out: &mut String, value: T) -> fmt::Result {
    write!(out, "{:#06X}", value)
}

/// Starts a new titled block.
fn section(out: &mut String, title: &str) -> fmt::Result {
    write!(out, "\n\t{} :", title)
}

/// A block holding a single value.
fn single<T: UpperHex + Unsigned>(out: &mut String, title: &str, value: T) -> fmt::Result {
    section(out, title)?;
    write!(out, "\n{}", INDENT)?;
    hex(out, value)
}

/// Writes the label of a row, the first and last index it covers.
fn label(out: &mut String, from: usize, to: usize) -> fmt::Result {
    write!(out, "\n{}{:#06X} - {:#06X} :", INDENT, from, to)
}

fn row<T, F>(out: &mut String, from: usize, to: usize, cells: &[T], mut cell: F) -> fmt::Result
where
    F: FnMut(&mut String, &T) -> fmt::Result,
{
    label(out, from, to)?;
    for value in cells {
        out.push(' ');
        cell(out, value)?;
    }
    // padded cells leave spaces behind at the end of the line
    let end = out.trim_end_matches(' ').len();
    out.truncate(end);
    Ok(())
}

/// Writes `data` as rows, labelled with the indices of the entries.
fn table<T, F>(out: &mut String, data: &[T], mut cell: F) -> fmt::Result
where
    F: FnMut(&mut String, &T) -> fmt::Result,
{
    for (i, chunk) in data.chunks(ROW_LEN).enumerate() {
        let from = i * ROW_LEN;
        row(out, from, from + chunk.len() - 1, chunk, &mut cell)?;
    }
    Ok(())
}

/// Writes the address space as words, labelled with byte addresses.
fn memory_dump(out: &mut String, data: &[u8]) -> fmt::Result {
    const ROW_BYTES: usize = ROW_LEN * memory::opcodes::SIZE;

    let mut zeros: Option<(usize, usize)> = None;
    let fold = |out: &mut String, (from, to): (usize, usize)| -> fmt::Result {
        label(out, from, to)?;
        write!(out, " {}", *ZERO_ROW)
    };

    for (i, bytes) in data.chunks(ROW_BYTES).enumerate() {
        let from = i * ROW_BYTES;
        let to = from + bytes.len() - 1;

        if bytes.iter().all(|byte| *byte == 0) {
            let start = zeros.map_or(from, |(start, _)| start);
            zeros = Some((start, to));
            continue;
        }
        if let Some(range) = zeros.take() {
            fold(out, range)?;
        }

        let words: Vec<u16> = bytes
            .chunks_exact(memory::opcodes::SIZE)
            .map(|word| bits::combine(word[0], word[1]))
            .collect();
        row(out, from, to, &words, |out, word| hex(out, *word))?;
    }

    match zeros {
        Some(range) => fold(out, range),
        None => Ok(()),
    }
}

impl fmt::Display for ChipSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut out = String::from("Chipset {");

        section(&mut out, "Program Name")?;
        write!(out, "\n{}{}", INDENT, self.name)?;

        single(&mut out, "Opcode", self.opcode)?;
        single(&mut out, "Program Counter", self.registers.program_counter())?;
        single(&mut out, "Index Register", self.registers.index())?;
        single(&mut out, "Delay Timer", self.delay_timer.get_value())?;
        single(&mut out, "Sound Timer", self.sound_timer.get_value())?;

        section(&mut out, "Memory")?;
        memory_dump(&mut out, self.memory.as_slice())?;

        section(&mut out, "Keyboard")?;
        table(&mut out, self.keyboard.get_keys(), |out, pressed| {
            write!(out, "{:<width$}", pressed, width = CELL_WIDTH)
        })?;

        // unused stack slots are shown as zeros
        let mut stack = [0u16; cpu::stack::SIZE];
        let entries = self.stack.entries();
        stack[..entries.len()].copy_from_slice(entries);

        section(&mut out, "Stack")?;
        table(&mut out, &stack, |out, entry| hex(out, *entry))?;

        section(&mut out, "Register")?;
        table(&mut out, self.registers.all(), |out, register| hex(out, *register))?;

        out.push_str("\n}");
        f.write_str(&out)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        chip8::ChipSet, config::Config, definitions::keyboard, resources::Rom, timer::Timed,
    };

    const OUTPUT_PRINT: &str = "\
        Chipset {\n\
            \tProgram Name :\n\
                \t\tIBMLOGO\n\
            \tOpcode :\n\
                \t\t0x0000\n\
            \tProgram Counter :\n\
                \t\t0x0200\n\
            \tIndex Register :\n\
                \t\t0x022A\n\
            \tDelay Timer :\n\
                \t\t0x0010\n\
            \tSound Timer :\n\
                \t\t0x0000\n\
            \tMemory :\n\
                \t\t0x0000 - 0x004F : 0x0000                    ...                    0x0000\n\
                \t\t0x0050 - 0x005F : 0xF090 0x9090 0xF020 0x6020 0x2070 0xF010 0xF080 0xF0F0\n\
                \t\t0x0060 - 0x006F : 0x10F0 0x10F0 0x9090 0xF010 0x10F0 0x80F0 0x10F0 0xF080\n\
                \t\t0x0070 - 0x007F : 0xF090 0xF0F0 0x1020 0x4040 0xF090 0xF090 0xF0F0 0x90F0\n\
                \t\t0x0080 - 0x008F : 0x10F0 0xF090 0xF090 0x90E0 0x90E0 0x90E0 0xF080 0x8080\n\
                \t\t0x0090 - 0x009F : 0xF0E0 0x9090 0x90E0 0xF080 0xF080 0xF0F0 0x80F0 0x8080\n\
                \t\t0x00A0 - 0x01FF : 0x0000                    ...                    0x0000\n\
                \t\t0x0200 - 0x020F : 0x00E0 0xA22A 0x600C 0x6108 0xD01F 0x0000 0x0000 0x0000\n\
                \t\t0x0210 - 0x0FFF : 0x0000                    ...                    0x0000\n\
            \tKeyboard :\n\
            \t\t0x0000 - 0x0007 : false  true   false  true   false  true   false  true\n\
            \t\t0x0008 - 0x000F : false  true   false  true   false  true   false  true\n\
            \tStack :\n\
                \t\t0x0000 - 0x0007 : 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000\n\
                \t\t0x0008 - 0x000F : 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000\n\
            \tRegister :\n\
            \t\t0x0000 - 0x0007 : 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000\n\
            \t\t0x0008 - 0x000F : 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x00FF\n\
        }";

    #[test]
    /// tests if the pretty print output is as expected
    fn test_full_print() {
        let mut chip = ChipSet::new(Config::default().seed(0));
        let rom = Rom::new(
            "IBMLOGO",
            vec![0x00, 0xE0, 0xA2, 0x2A, 0x60, 0x0C, 0x61, 0x08, 0xD0, 0x1F],
        );
        chip.load(&rom).unwrap();

        let mut keys = [false; keyboard::SIZE];
        for (index, key) in keys.iter_mut().enumerate() {
            *key = index % 2 != 0;
        }
        chip.set_keyboard(&keys);

        chip.registers.set_index(0x22A);
        chip.registers.set(0xF, 0xFF);
        chip.delay_timer.set_value(0x10);

        let actual_full = format!("{}", chip);
        let actual_split = actual_full.split('\n');
        let expected = OUTPUT_PRINT.split('\n');

        for (exp, act) in expected.zip(actual_split) {
            assert_eq!(exp, act);
        }
        assert_eq!(OUTPUT_PRINT.lines().count(), actual_full.lines().count());
    }

    #[test]
    fn test_stack_is_padded() {
        let mut chip = ChipSet::new(Config::default().seed(0));
        chip.stack.push(0x0ABC).unwrap();
        let print = format!("{}", chip);
        assert!(print.contains(
            "\t\t0x0000 - 0x0007 : 0x0ABC 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000"
        ));
    }

    #[test]
    fn test_memory_without_zeros_is_not_folded() {
        let mut chip = ChipSet::new(Config::default().seed(0));
        chip.load(&Rom::new("FULL", vec![0x11; 0x20])).unwrap();
        let print = format!("{}", chip);

        assert!(print.contains(
            "\t\t0x0200 - 0x020F : 0x1111 0x1111 0x1111 0x1111 0x1111 0x1111 0x1111 0x1111\n\
             \t\t0x0210 - 0x021F : 0x1111 0x1111 0x1111 0x1111 0x1111 0x1111 0x1111 0x1111\n\
             \t\t0x0220 - 0x0FFF : 0x0000"
        ));
    }
}
