//! Text rendering utilities

use crate::document::Color;
use crate::Align;

/// Tolerance when comparing a measured line against the available width
const WIDTH_EPSILON: f64 = 1e-9;

/// Context for rendering text
pub struct TextRenderContext {
    /// PDF font resource name (e.g., "F1")
    pub font_name: String,
    /// Font size in points
    pub font_size: f64,
    /// Text width in points (for alignment)
    pub text_width: f64,
    /// Text color (RGB)
    pub color: Color,
}

/// Calculate X offset for text alignment
///
/// # Arguments
/// * `text_width` - Width of text
/// * `container_width` - Available width for alignment
/// * `align` - Desired alignment
pub fn calculate_x_offset(text_width: f64, container_width: f64, align: Align) -> f64 {
    match align {
        Align::Left => 0.0,
        Align::Center => (container_width - text_width) / 2.0,
        Align::Right => container_width - text_width,
    }
}

/// Format a number for a content stream: at most three decimals, no trailing zeros
pub(crate) fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let s = format!("{rounded:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

/// Generate PDF operators for text insertion
///
/// Creates the text operators (BT, rg, Tf, Td, Tj, ET) to render one line
/// of text at a specific position.
///
/// # Arguments
/// * `text_hex` - Hex-encoded text (e.g., "<48656C6C6F>")
/// * `x` - X coordinate in points (PDF coordinates, from left)
/// * `y` - Y coordinate in points (PDF coordinates, from bottom)
/// * `align` - Text alignment relative to x
/// * `ctx` - Text rendering context
///
/// # Returns
/// Vector of bytes containing the PDF operators
pub fn generate_text_operators(
    text_hex: &str,
    x: f64,
    y: f64,
    align: Align,
    ctx: &TextRenderContext,
) -> Vec<u8> {
    let mut ops = String::new();

    let x_offset = match align {
        Align::Left => 0.0,
        Align::Center => -ctx.text_width / 2.0,
        Align::Right => -ctx.text_width,
    };

    let final_x = x + x_offset;

    ops.push_str("BT\n");
    ops.push_str(&format!("{} rg\n", ctx.color.to_operands()));
    ops.push_str(&format!("/{} {} Tf\n", ctx.font_name, fmt_num(ctx.font_size)));
    ops.push_str(&format!("{} {} Td\n", fmt_num(final_x), fmt_num(y)));
    ops.push_str(&format!("{text_hex} Tj\n"));
    ops.push_str("ET\n");

    ops.into_bytes()
}

/// Split text into lines that fit a maximum width
///
/// Each `\n` starts a new line. Within a line, words are placed greedily;
/// a word wider than `max_width` on its own is split between characters.
/// An empty input yields a single empty line.
///
/// # Arguments
/// * `text` - Text to split
/// * `max_width` - Maximum line width, in the unit returned by `measure`
/// * `measure` - Width of a candidate line
pub fn wrap_to_width<F>(text: &str, max_width: f64, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let fits = |line: &str| measure(line) <= max_width + WIDTH_EPSILON;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let mut current = String::new();

        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if fits(&candidate) {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if fits(word) {
                current = word.to_string();
                continue;
            }

            for c in word.chars() {
                current.push(c);
                if !fits(&current) && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                }
            }
        }

        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_count(s: &str) -> f64 {
        s.chars().count() as f64
    }

    #[test]
    fn test_x_offset_left() {
        let offset = calculate_x_offset(100.0, 500.0, Align::Left);
        assert_eq!(offset, 0.0);
    }

    #[test]
    fn test_x_offset_center() {
        let offset = calculate_x_offset(100.0, 500.0, Align::Center);
        assert_eq!(offset, 200.0);
    }

    #[test]
    fn test_x_offset_right() {
        let offset = calculate_x_offset(100.0, 500.0, Align::Right);
        assert_eq!(offset, 400.0);
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(12.0), "12");
        assert_eq!(fmt_num(12.5), "12.5");
        assert_eq!(fmt_num(1.23456), "1.235");
        assert_eq!(fmt_num(-0.0001), "0");
        assert_eq!(fmt_num(-3.25), "-3.25");
    }

    #[test]
    fn test_generate_text_operators_left() {
        let ctx = TextRenderContext {
            font_name: "F1".to_string(),
            font_size: 12.0,
            text_width: 100.0,
            color: Color::black(),
        };

        let ops = generate_text_operators("<48656C6C6F>", 100.0, 700.0, Align::Left, &ctx);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.starts_with("BT\n"));
        assert!(ops_str.contains("0 0 0 rg"));
        assert!(ops_str.contains("/F1 12 Tf"));
        assert!(ops_str.contains("100 700 Td"));
        assert!(ops_str.contains("<48656C6C6F> Tj"));
        assert!(ops_str.ends_with("ET\n"));
    }

    #[test]
    fn test_generate_text_operators_center() {
        let ctx = TextRenderContext {
            font_name: "F2".to_string(),
            font_size: 7.5,
            text_width: 100.0,
            color: Color::black(),
        };

        let ops = generate_text_operators("<54657374>", 200.0, 600.0, Align::Center, &ctx);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("/F2 7.5 Tf"));
        assert!(ops_str.contains("150 600 Td"));
    }

    #[test]
    fn test_generate_text_operators_right() {
        let ctx = TextRenderContext {
            font_name: "F1".to_string(),
            font_size: 16.0,
            text_width: 80.0,
            color: Color::white(),
        };

        let ops = generate_text_operators("<41>", 300.0, 500.0, Align::Right, &ctx);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("220 500 Td"));
        assert!(ops_str.contains("1 1 1 rg"));
    }

    #[test]
    fn test_wrap_greedy() {
        let lines = wrap_to_width("Hello world this is a test", 11.0, char_count);
        assert_eq!(lines, vec!["Hello world", "this is a", "test"]);
    }

    #[test]
    fn test_wrap_exact_fit_and_just_over() {
        assert_eq!(wrap_to_width("Hello world", 11.0, char_count), vec!["Hello world"]);
        assert_eq!(
            wrap_to_width("Hello world", 10.0, char_count),
            vec!["Hello", "world"]
        );
    }

    #[test]
    fn test_wrap_empty_text() {
        assert_eq!(wrap_to_width("", 10.0, char_count), vec![String::new()]);
    }

    #[test]
    fn test_wrap_explicit_newlines() {
        let lines = wrap_to_width("Modelo X\nIMEI: 123\n\nfin", 40.0, char_count);
        assert_eq!(lines, vec!["Modelo X", "IMEI: 123", "", "fin"]);
    }

    #[test]
    fn test_wrap_splits_long_word() {
        let lines = wrap_to_width("ab Supercalifragilistic", 8.0, char_count);
        assert_eq!(lines, vec!["ab", "Supercal", "ifragili", "stic"]);
    }

    #[test]
    fn test_wrap_collapses_repeated_spaces() {
        let lines = wrap_to_width("Hello    world", 20.0, char_count);
        assert_eq!(lines, vec!["Hello world"]);
    }

    #[test]
    fn test_wrap_keeps_single_char_on_narrow_width() {
        let lines = wrap_to_width("abc", 0.5, char_count);
        assert_eq!(lines, vec!["a", "b", "c"]);
    }
}
