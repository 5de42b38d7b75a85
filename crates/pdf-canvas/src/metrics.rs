//! Built-in Helvetica metrics and WinAnsi encoding
//!
//! Documents that do not embed a font use the standard Helvetica and
//! Helvetica-Bold faces. Widths are the Adobe AFM advance widths in
//! thousandths of an em.

use crate::font::FontWeight;
use crate::surface::{FontSpec, TextMeasure, Unit};

/// Byte written for characters WinAnsi cannot represent
const REPLACEMENT: u8 = b'?';

/// Helvetica widths for U+0020..=U+007E
#[rustfmt::skip]
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold widths for U+0020..=U+007E
#[rustfmt::skip]
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Helvetica widths for U+00A0..=U+00FF
#[rustfmt::skip]
const HELVETICA_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// Helvetica-Bold widths for U+00A0..=U+00FF
#[rustfmt::skip]
const HELVETICA_BOLD_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// WinAnsi code points outside Latin-1: (char, byte, regular width, bold width)
const WIN_ANSI_EXTRAS: [(char, u8, u16, u16); 15] = [
    ('€', 0x80, 556, 556),
    ('‚', 0x82, 222, 278),
    ('„', 0x84, 333, 500),
    ('…', 0x85, 1000, 1000),
    ('†', 0x86, 556, 556),
    ('‡', 0x87, 556, 556),
    ('‰', 0x89, 1000, 1000),
    ('‘', 0x91, 222, 278),
    ('’', 0x92, 222, 278),
    ('“', 0x93, 333, 500),
    ('”', 0x94, 333, 500),
    ('•', 0x95, 350, 350),
    ('–', 0x96, 556, 556),
    ('—', 0x97, 1000, 1000),
    ('™', 0x99, 1000, 1000),
];

/// Encode one character as a WinAnsi byte, if representable
fn win_ansi_byte(c: char) -> Option<u8> {
    let code = c as u32;
    if (0x20..=0x7E).contains(&code) || (0xA0..=0xFF).contains(&code) {
        return Some(code as u8);
    }
    WIN_ANSI_EXTRAS
        .iter()
        .find(|(ch, ..)| *ch == c)
        .map(|(_, byte, ..)| *byte)
}

/// Encode text for a WinAnsi simple font, replacing unsupported characters
pub(crate) fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| win_ansi_byte(c).unwrap_or(REPLACEMENT))
        .collect()
}

/// Hex string operand for the Tj operator
pub(crate) fn encode_win_ansi_hex(text: &str) -> String {
    let hex: String = encode_win_ansi(text)
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect();
    format!("<{hex}>")
}

/// Advance width of a character in thousandths of an em
fn char_width(c: char, weight: FontWeight) -> u16 {
    let code = c as u32;
    let bold = weight == FontWeight::Bold;
    match code {
        0x20..=0x7E => {
            let idx = (code - 0x20) as usize;
            if bold {
                HELVETICA_BOLD_ASCII[idx]
            } else {
                HELVETICA_ASCII[idx]
            }
        }
        0xA0..=0xFF => {
            let idx = (code - 0xA0) as usize;
            if bold {
                HELVETICA_BOLD_LATIN1[idx]
            } else {
                HELVETICA_LATIN1[idx]
            }
        }
        _ => match WIN_ANSI_EXTRAS.iter().find(|(ch, ..)| *ch == c) {
            Some((_, _, regular, bold_width)) => {
                if bold {
                    *bold_width
                } else {
                    *regular
                }
            }
            None => char_width(REPLACEMENT as char, weight),
        },
    }
}

/// Width of a string in thousandths of an em
pub fn string_width_units(text: &str, weight: FontWeight) -> u32 {
    text.chars().map(|c| char_width(c, weight) as u32).sum()
}

/// Text measurement with the built-in Helvetica faces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuiltinMetrics {
    pub unit: Unit,
}

impl BuiltinMetrics {
    pub fn new(unit: Unit) -> Self {
        Self { unit }
    }
}

impl TextMeasure for BuiltinMetrics {
    fn text_width(&self, text: &str, font: FontSpec) -> f64 {
        let units = string_width_units(text, font.weight) as f64;
        units / 1000.0 * font.size / self.unit.scale()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_widths() {
        assert_eq!(string_width_units(" ", FontWeight::Regular), 278);
        assert_eq!(string_width_units("W", FontWeight::Regular), 944);
        assert_eq!(string_width_units("@", FontWeight::Regular), 1015);
        assert_eq!(string_width_units("@", FontWeight::Bold), 975);
        assert_eq!(string_width_units("i", FontWeight::Regular), 222);
        assert_eq!(string_width_units("i", FontWeight::Bold), 278);
    }

    #[test]
    fn test_latin1_widths() {
        assert_eq!(string_width_units("°", FontWeight::Regular), 400);
        assert_eq!(string_width_units("é", FontWeight::Regular), 556);
        assert_eq!(string_width_units("í", FontWeight::Regular), 278);
        assert_eq!(string_width_units("Ñ", FontWeight::Bold), 722);
    }

    #[test]
    fn test_bullet_and_dash() {
        assert_eq!(string_width_units("•", FontWeight::Regular), 350);
        assert_eq!(string_width_units("—", FontWeight::Bold), 1000);
    }

    #[test]
    fn test_unknown_measures_as_replacement() {
        assert_eq!(
            string_width_units("ส", FontWeight::Regular),
            string_width_units("?", FontWeight::Regular)
        );
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Año"), vec![b'A', 0xF1, b'o']);
        assert_eq!(encode_win_ansi("• x"), vec![0x95, b' ', b'x']);
        assert_eq!(encode_win_ansi("😀"), vec![b'?']);
        assert_eq!(encode_win_ansi_hex("N°"), "<4EB0>");
    }

    #[test]
    fn test_builtin_metrics_units() {
        let pt = BuiltinMetrics::new(Unit::Pt);
        let mm = BuiltinMetrics::new(Unit::Mm);
        let font = FontSpec::regular(10.0);

        // "Hello" = 722 + 556 + 222 + 222 + 556 = 2278
        assert!((pt.text_width("Hello", font) - 22.78).abs() < 1e-9);
        assert!((mm.text_width("Hello", font) - 22.78 * 25.4 / 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_builtin_metrics_wrap() {
        let pt = BuiltinMetrics::new(Unit::Pt);
        let lines = pt.wrap_text("Hello Hello", 30.0, FontSpec::regular(10.0));
        assert_eq!(lines, vec!["Hello", "Hello"]);
    }
}
