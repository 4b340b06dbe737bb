//! Host-level tests for the segment encoder.

use days_since::bit_matrix_led4::{BitMatrixLed4, Leds, SegmentPattern, encode};

fn glyphs(days: i32) -> [Option<char>; 4] {
    encode(days).map(SegmentPattern::glyph)
}

fn padded(value: i32) -> [Option<char>; 4] {
    let mut text = ['0'; 4];
    let mut remaining = value;
    for slot in text.iter_mut().rev() {
        *slot = char::from_digit((remaining % 10).unsigned_abs(), 10).expect("digit");
        remaining /= 10;
    }
    text.map(Some)
}

#[test]
fn every_four_digit_value_decodes_to_its_glyphs() {
    for value in 0..=9999 {
        assert_eq!(glyphs(value), padded(value), "value {value}");
        assert!(
            !encode(value).iter().any(|pattern| pattern.has_decimal()),
            "value {value}"
        );
    }
}

#[test]
fn digit_map_matches_wiring_table() {
    // A, B, C, D, E, F, G, DP
    let expected: [[u8; 8]; 10] = [
        [1, 1, 1, 1, 1, 1, 0, 0],
        [0, 1, 1, 0, 0, 0, 0, 0],
        [1, 1, 0, 1, 1, 0, 1, 0],
        [1, 1, 1, 1, 0, 0, 1, 0],
        [0, 1, 1, 0, 0, 1, 1, 0],
        [1, 0, 1, 1, 0, 1, 1, 0],
        [1, 0, 1, 1, 1, 1, 1, 0],
        [1, 1, 1, 0, 0, 0, 0, 0],
        [1, 1, 1, 1, 1, 1, 1, 0],
        [1, 1, 1, 1, 0, 1, 1, 0],
    ];
    for (digit, row) in ('0'..='9').zip(expected) {
        let flags = SegmentPattern::from_glyph(digit).flags();
        assert_eq!(flags, row.map(|bit| bit == 1), "digit {digit}");
    }
    assert_eq!(SegmentPattern::from_glyph('-').bits(), Leds::SEG_G);
    assert_eq!(SegmentPattern::from_glyph(' '), SegmentPattern::BLANK);
}

#[test]
fn unsupported_glyphs_render_blank() {
    for glyph in ['a', 'Z', '.', '\u{00e9}', '\n'] {
        assert_eq!(SegmentPattern::from_glyph(glyph), SegmentPattern::BLANK);
    }
    assert_eq!(
        BitMatrixLed4::from_text(&['4', '?', '2', ' ']).to_text(),
        [Some('4'), Some(' '), Some('2'), Some(' ')]
    );
}

#[test]
fn overflow_shows_low_digits_with_decimal_points() {
    let patterns = encode(10_000);
    assert_eq!(patterns.map(SegmentPattern::glyph), [Some('0'); 4]);
    assert!(patterns.iter().all(|pattern| pattern.has_decimal()));

    assert_eq!(glyphs(12_345), [Some('2'), Some('3'), Some('4'), Some('5')]);
    assert_eq!(glyphs(i32::MAX), [Some('3'), Some('6'), Some('4'), Some('7')]);
}

#[test]
fn negative_counts_lead_with_a_dash() {
    assert_eq!(glyphs(-1), [Some('-'), Some('0'), Some('0'), Some('1')]);
    assert_eq!(glyphs(-999), [Some('-'), Some('9'), Some('9'), Some('9')]);
    assert!(!encode(-999).iter().any(|pattern| pattern.has_decimal()));
    assert!(encode(-1000).iter().all(|pattern| pattern.has_decimal()));
    assert_eq!(glyphs(i32::MIN), [Some('-'), Some('6'), Some('4'), Some('8')]);
}
