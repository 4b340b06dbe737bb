//! Segment patterns for a 4-digit 7-segment display.
//!
//! [`BitMatrixLed4`] holds one [`SegmentPattern`] per digit position, position 0
//! being the most significant digit. [`encode`] turns a day count into one.

use core::ops::BitOrAssign;

use defmt::Format;

/// Number of digits in the display.
pub const CELL_COUNT: usize = 4;

/// Segments per digit, including the decimal point.
pub const SEGMENT_COUNT: usize = 8;

// ============================================================================
// LED Constants
// ============================================================================

/// Constants for 7-segment LED displays.
///
/// ```text
///    AAA
///   F   B
///    GGG
///   E   C
///    DDD  DP
/// ```
pub struct Leds;

impl Leds {
    /// Segment A of the 7-segment display.
    pub const SEG_A: u8 = 0b_0000_0001;
    /// Segment B of the 7-segment display.
    pub const SEG_B: u8 = 0b_0000_0010;
    /// Segment C of the 7-segment display.
    pub const SEG_C: u8 = 0b_0000_0100;
    /// Segment D of the 7-segment display.
    pub const SEG_D: u8 = 0b_0000_1000;
    /// Segment E of the 7-segment display.
    pub const SEG_E: u8 = 0b_0001_0000;
    /// Segment F of the 7-segment display.
    pub const SEG_F: u8 = 0b_0010_0000;
    /// Segment G of the 7-segment display.
    pub const SEG_G: u8 = 0b_0100_0000;
    /// Decimal point of the 7-segment display.
    pub const DECIMAL: u8 = 0b_1000_0000;

    /// Segments for digits 0-9.
    pub const DIGITS: [u8; 10] = [
        Self::SEG_A | Self::SEG_B | Self::SEG_C | Self::SEG_D | Self::SEG_E | Self::SEG_F, // 0
        Self::SEG_B | Self::SEG_C,                                                        // 1
        Self::SEG_A | Self::SEG_B | Self::SEG_D | Self::SEG_E | Self::SEG_G,              // 2
        Self::SEG_A | Self::SEG_B | Self::SEG_C | Self::SEG_D | Self::SEG_G,              // 3
        Self::SEG_B | Self::SEG_C | Self::SEG_F | Self::SEG_G,                            // 4
        Self::SEG_A | Self::SEG_C | Self::SEG_D | Self::SEG_F | Self::SEG_G,              // 5
        Self::SEG_A | Self::SEG_C | Self::SEG_D | Self::SEG_E | Self::SEG_F | Self::SEG_G, // 6
        Self::SEG_A | Self::SEG_B | Self::SEG_C,                                          // 7
        0b_0111_1111,                                                                     // 8
        Self::SEG_A | Self::SEG_B | Self::SEG_C | Self::SEG_D | Self::SEG_F | Self::SEG_G, // 9
    ];

    /// The dash glyph.
    pub const DASH: u8 = Self::SEG_G;

    /// Representation of a blank space on a 7-segment display.
    pub const SPACE: u8 = 0b_0000_0000;
}

// ============================================================================
// SegmentPattern
// ============================================================================

/// Which of the 8 segments (A..G, DP) are lit for one digit. Bit 0 is segment A.
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug, Format)]
pub struct SegmentPattern(u8);

impl SegmentPattern {
    pub const BLANK: Self = Self(Leds::SPACE);
    pub const DASH: Self = Self(Leds::DASH);

    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// The pattern for a glyph in the digit map: `'0'..='9'`, `'-'` or `' '`.
    ///
    /// Anything else renders blank.
    #[must_use]
    pub fn from_glyph(glyph: char) -> Self {
        match glyph {
            '-' => Self::DASH,
            _ => glyph
                .to_digit(10)
                .and_then(|digit| Leds::DIGITS.get(digit as usize))
                .map_or(Self::BLANK, |&bits| Self(bits)),
        }
    }

    /// The glyph this pattern shows, ignoring the decimal point.
    ///
    /// Returns `None` for patterns outside the digit map.
    #[must_use]
    pub fn glyph(self) -> Option<char> {
        let bits = self.0 & !Leds::DECIMAL;
        match bits {
            Leds::SPACE => Some(' '),
            Leds::DASH => Some('-'),
            _ => Leds::DIGITS
                .iter()
                .zip(0_u32..)
                .find(|&(&digit_bits, _)| digit_bits == bits)
                .and_then(|(_, digit)| char::from_digit(digit, 10)),
        }
    }

    /// Segment states in A, B, C, D, E, F, G, DP order.
    #[must_use]
    pub fn flags(self) -> [bool; SEGMENT_COUNT] {
        core::array::from_fn(|index| self.0 & (1 << index) != 0)
    }

    #[must_use]
    pub const fn has_decimal(self) -> bool {
        self.0 & Leds::DECIMAL != 0
    }
}

// ============================================================================
// BitMatrixLed4
// ============================================================================

/// LED segment state for a 4-digit 7-segment display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Format)]
pub struct BitMatrixLed4([SegmentPattern; CELL_COUNT]);

impl BitMatrixLed4 {
    /// Renders a day count, zero padded to four digits.
    ///
    /// Counts above 9999 keep their low four digits and light every decimal
    /// point. Negative counts show `-` then the low three digits of the
    /// magnitude, lighting the decimal points if the magnitude exceeds 999.
    #[must_use]
    #[expect(
        clippy::integer_division_remainder_used,
        reason = "modulo is required for digit extraction"
    )]
    pub fn from_days(days: i32) -> Self {
        let mut remaining = days.unsigned_abs();
        let mut bit_matrix = Self::default();
        let digit_cells = if days < 0 {
            if let Some(first) = bit_matrix.0.first_mut() {
                *first = SegmentPattern::DASH;
            }
            CELL_COUNT.saturating_sub(1)
        } else {
            CELL_COUNT
        };

        for pattern in bit_matrix.0.iter_mut().rev().take(digit_cells) {
            let digit = Leds::DIGITS
                .get((remaining % 10) as usize)
                .copied()
                .unwrap_or(Leds::SPACE);
            *pattern = SegmentPattern(digit);
            remaining /= 10;
        }
        if remaining > 0 {
            bit_matrix |= Leds::DECIMAL;
        }

        bit_matrix
    }

    #[must_use]
    pub const fn patterns(&self) -> &[SegmentPattern; CELL_COUNT] {
        &self.0
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<SegmentPattern> {
        self.0.get(position).copied()
    }

    /// The glyphs shown, `None` where a pattern is outside the digit map.
    #[must_use]
    pub fn to_text(&self) -> [Option<char>; CELL_COUNT] {
        self.0.map(SegmentPattern::glyph)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SegmentPattern> {
        self.0.iter()
    }
}

impl BitOrAssign<u8> for BitMatrixLed4 {
    fn bitor_assign(&mut self, rhs: u8) {
        self.0.iter_mut().for_each(|pattern| pattern.0 |= rhs);
    }
}

/// Segment patterns for a day count; see [`BitMatrixLed4::from_days`].
#[must_use]
pub fn encode(days: i32) -> [SegmentPattern; CELL_COUNT] {
    *BitMatrixLed4::from_days(days).patterns()
}

#[cfg(test)]
mod tests {
    use super::{BitMatrixLed4, Leds, SegmentPattern, encode};

    #[test]
    fn test_from_days() {
        let matrix = BitMatrixLed4::from_days(1234);
        assert_eq!(matrix.get(0).map(SegmentPattern::bits), Some(0b_0000_0110)); // '1'
        assert_eq!(matrix.get(1).map(SegmentPattern::bits), Some(0b_0101_1011)); // '2'
        assert_eq!(matrix.get(2).map(SegmentPattern::bits), Some(0b_0100_1111)); // '3'
        assert_eq!(matrix.get(3).map(SegmentPattern::bits), Some(0b_0110_0110)); // '4'
    }

    #[test]
    fn test_zero_padding() {
        assert_eq!(
            BitMatrixLed4::from_days(7).to_text(),
            [Some('0'), Some('0'), Some('0'), Some('7')]
        );
        assert_eq!(
            BitMatrixLed4::from_days(0).to_text(),
            [Some('0'); 4]
        );
    }

    #[test]
    fn test_from_days_overflow() {
        // Counts > 9999 keep the low digits and light every decimal point
        let matrix = BitMatrixLed4::from_days(12_345);
        assert_eq!(matrix.to_text(), [Some('2'), Some('3'), Some('4'), Some('5')]);
        assert!(matrix.iter().all(|pattern| pattern.has_decimal()));
        assert!(!BitMatrixLed4::from_days(9999).iter().any(|pattern| pattern.has_decimal()));
    }

    #[test]
    fn test_negative_days() {
        let matrix = BitMatrixLed4::from_days(-42);
        assert_eq!(matrix.to_text(), [Some('-'), Some('0'), Some('4'), Some('2')]);
        assert!(!matrix.iter().any(|pattern| pattern.has_decimal()));

        let matrix = BitMatrixLed4::from_days(-1234);
        assert_eq!(matrix.to_text(), [Some('-'), Some('2'), Some('3'), Some('4')]);
        assert!(matrix.iter().all(|pattern| pattern.has_decimal()));
    }

    #[test]
    fn test_unknown_glyph_is_blank() {
        let matrix = BitMatrixLed4::from_text(&['x', '.', '-', '9']);
        assert_eq!(matrix.get(0), Some(SegmentPattern::BLANK));
        assert_eq!(matrix.get(1), Some(SegmentPattern::BLANK));
        assert_eq!(matrix.get(2).map(SegmentPattern::bits), Some(Leds::SEG_G));
        assert_eq!(matrix.to_text()[3], Some('9'));
    }

    #[test]
    fn test_flags_order() {
        let flags = SegmentPattern::from_glyph('7').flags();
        assert_eq!(flags, [true, true, true, false, false, false, false, false]);
        assert!(encode(8)[3].flags()[6]);
    }
}
