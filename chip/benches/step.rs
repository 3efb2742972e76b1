use std::time::Duration;

use chip::{chip8::ChipSet, config::Config, resources::Rom};
use criterion::{criterion_group, criterion_main, Criterion};

/// A tight loop touching the alu, the index register and the display.
///
/// ```text
/// 0x200  LD V0, 0x00
/// 0x202  ADD V0, 0x01
/// 0x204  LD F, V0
/// 0x206  DRW V1, V2, 5
/// 0x208  ADD V1, V0 (8104)
/// 0x20A  JP 0x202
/// ```
const LOOP: [u8; 12] = [
    0x60, 0x00, 0x70, 0x01, 0xF0, 0x29, 0xD1, 0x25, 0x81, 0x04, 0x12, 0x02,
];

static BASE_ROM: once_cell::sync::Lazy<Rom> =
    once_cell::sync::Lazy::new(|| Rom::new("LOOP", LOOP.to_vec()));

/// will setup the default configured chip
fn get_default_chip() -> ChipSet {
    let mut chip = ChipSet::new(Config::default().seed(0));
    chip.load(&BASE_ROM)
        .expect("The benchmark rom fits into memory.");
    chip
}

pub fn advance_bench(c: &mut Criterion) {
    let mut chip = get_default_chip();
    c.bench_function("advance_bench", |b| {
        b.iter(|| {
            let _ = chip.advance(Duration::from_millis(16));
        });
    });
}

pub fn print_bench(c: &mut Criterion) {
    let chip = get_default_chip();
    c.bench_function("print_bench", |b| {
        b.iter(|| {
            let _ = format!("{}", chip);
        });
    });
}

criterion_group!(benches, advance_bench, print_bench);
criterion_main!(benches);
