//! Small bit twiddling helpers shared by the decoder and the instruction set.
use num_traits::PrimInt;

/// The amount of bits in a nibble
const NIBBLE: usize = 4;

/// Will return the `i`-th nibble of the value, counted from the least significant end.
///
/// # Example
/// ```rust
/// # use chip::bits::nibble;
/// assert_eq!(nibble(0x1EDAu16, 0), 0xA);
/// assert_eq!(nibble(0x1EDAu16, 3), 0x1);
/// ```
#[inline]
pub fn nibble<T: PrimInt>(value: T, i: usize) -> T {
    let mask = !(!T::zero() << NIBBLE);
    (value >> (i * NIBBLE)) & mask
}

/// Will combine two bytes big-endian into a single word.
///
/// # Example
/// ```rust
/// # use chip::bits::combine;
/// assert_eq!(combine(0x1E, 0xDA), 0x1EDA);
/// ```
#[inline]
pub fn combine(high: u8, low: u8) -> u16 {
    u16::from_be_bytes([high, low])
}

/// The lower eight bits of the word.
#[inline]
pub fn lo8(value: u16) -> u8 {
    (value & 0x00FF) as u8
}

/// The higher eight bits of the word.
#[inline]
pub fn hi8(value: u16) -> u8 {
    (value >> 8) as u8
}

/// Will check if bit `i` is set.
///
/// # Example
/// ```rust
/// # use chip::bits::check_bit;
/// assert!(check_bit(0b1000_0000u8, 7));
/// assert!(!check_bit(0b1000_0000u8, 0));
/// ```
#[inline]
pub fn check_bit<T: PrimInt>(value: T, i: usize) -> bool {
    (value >> i) & T::one() == T::one()
}

/// Will set bit `i` to one.
#[inline]
pub fn set_bit<T: PrimInt>(value: T, i: usize) -> T {
    value | (T::one() << i)
}

/// Will set bit `i` to zero.
#[inline]
pub fn clear_bit<T: PrimInt>(value: T, i: usize) -> T {
    value & !(T::one() << i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nibbles_of_opcode() {
        let opcode: u16 = 0xD123;
        let nibbles: Vec<u16> = (0..4).rev().map(|i| nibble(opcode, i)).collect();
        assert_eq!(nibbles, vec![0xD, 0x1, 0x2, 0x3]);
    }

    #[test]
    fn test_combine_and_split() {
        let word = combine(0xAB, 0xCD);
        assert_eq!(word, 0xABCD);
        assert_eq!(hi8(word), 0xAB);
        assert_eq!(lo8(word), 0xCD);
    }

    #[test]
    fn test_set_and_clear() {
        let mut value = 0u8;
        for i in 0..8 {
            value = set_bit(value, i);
            assert!(check_bit(value, i));
        }
        assert_eq!(value, 0xFF);

        value = clear_bit(value, 3);
        assert_eq!(value, 0b1111_0111);
        assert!(!check_bit(value, 3));

        // works for wider words as well, e.g. the bit 12 overflow of the index
        assert!(check_bit(0x1000u16, 12));
        assert!(!check_bit(0x0FFFu16, 12));
    }
}
