//! Small text helpers shared by the parsers.

/// Left-pad `text` with zeros to `width` characters, keeping a leading sign
/// in front (`"7"` -> `"07"`, `"-5"` -> `"-05"`).
pub fn pad_zeros_left(text: &str, width: usize) -> String {
    let n_len = text.chars().count();
    if n_len >= width {
        return text.to_string();
    }
    let c_zeros = "0".repeat(width - n_len);
    match text.chars().next() {
        Some(sign @ ('+' | '-')) => format!("{sign}{c_zeros}{}", &text[1..]),
        _ => format!("{c_zeros}{text}"),
    }
}

/// Reactor id from a run of decimal digits: leading zeros dropped, then
/// padded to two digits (`"3"` -> `R03`, `"007"` -> `R07`, `"12"` -> `R12`).
pub fn derive_reactor_id(digits: &str) -> String {
    let c_trimmed = digits.trim_start_matches('0');
    let c_value = if c_trimmed.is_empty() { "0" } else { c_trimmed };
    format!("R{}", pad_zeros_left(c_value, 2))
}

/// Line boundaries of a timepoint log: `\n`, `\r`, vertical tab, form feed,
/// the file/group/record separators, NEL and the Unicode line and paragraph
/// separators.
pub fn is_line_separator(chr: char) -> bool {
    matches!(
        chr,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}
