//! Locale independent number parsing
//!
//! `str::parse::<f64>` wants the whole string to be a number, but SVG
//! attributes pack numbers together ("10-5", "0.5.5", "1e2,3"), so we scan
//! for where a number stops and convert just that part. A dot is always the
//! decimal separator.

/// Parse one number at the start of `text`
///
/// Returns the value and the number of bytes consumed, or `None` if no digits
/// were read. An exponent without mantissa digits has an implied mantissa of
/// 1, so `"e2"` reads as 100.
pub fn parse_float(text: &str) -> Option<(f64, usize)> {
    let bytes = text.as_bytes();
    let sign_len = usize::from(bytes.first() == Some(&b'-'));
    let mut pos = sign_len;
    let mut digits = 0;
    let mut seen_period = false;

    while let Some(&b) = bytes.get(pos) {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' if !seen_period => seen_period = true,
            _ => break,
        }
        pos += 1;
    }

    let mantissa = &text[..pos];
    let mantissa = mantissa.strip_suffix('.').unwrap_or(mantissa);

    if !matches!(bytes.get(pos), Some(b'e' | b'E')) {
        if digits == 0 {
            return None;
        }
        return Some((mantissa.parse().ok()?, pos));
    }

    let (exponent, used) = parse_exponent(&bytes[pos + 1..]);
    let literal = if digits == 0 {
        format!("{}1e{exponent}", &text[..sign_len])
    } else {
        format!("{mantissa}e{exponent}")
    };
    Some((literal.parse().ok()?, pos + 1 + used))
}

/// Optional sign and digits, the way `atoi` reads them
fn parse_exponent(bytes: &[u8]) -> (i32, usize) {
    let mut pos = 0;
    let mut negative = false;
    match bytes.first() {
        Some(b'+') => pos += 1,
        Some(b'-') => {
            negative = true;
            pos += 1;
        }
        _ => {}
    }

    let mut exponent: i32 = 0;
    while let Some(&b @ b'0'..=b'9') = bytes.get(pos) {
        exponent = exponent.saturating_mul(10).saturating_add((b - b'0') as i32);
        pos += 1;
    }

    (if negative { -exponent } else { exponent }, pos)
}

/// Parse a whole attribute value as one number, surrounding whitespace allowed
pub fn parse_number_attribute(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    match parse_float(trimmed) {
        Some((v, used)) if used == trimmed.len() => Some(v),
        _ => None,
    }
}

/// Skip whitespace and commas, the separators of SVG number lists
pub fn skip_separators(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == ',')
}

/// Parse exactly `N` separated numbers from the start of `text`
///
/// Returns the numbers and what's left of the text after the last one.
pub fn parse_numbers<const N: usize>(text: &str) -> Option<([f64; N], &str)> {
    let mut out = [0.0; N];
    let mut rest = text;
    for slot in out.iter_mut() {
        rest = skip_separators(rest);
        let (value, used) = parse_float(rest)?;
        *slot = value;
        rest = &rest[used..];
    }
    Some((out, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_float("42"), Some((42.0, 2)));
        assert_eq!(parse_float("-7 rest"), Some((-7.0, 2)));

        let (v, used) = parse_float("3.25,1").unwrap();
        assert!(close(v, 3.25));
        assert_eq!(used, 4);

        let (v, used) = parse_float(".5").unwrap();
        assert!(close(v, 0.5));
        assert_eq!(used, 2);
    }

    #[test]
    fn test_decimals_round_correctly() {
        assert_eq!(parse_float("0.7"), Some((0.7, 3)));
        assert_eq!(parse_float("0.1"), Some((0.1, 3)));
        assert_eq!(parse_float("-123.456 "), Some((-123.456, 8)));
        assert_eq!(parse_float("5."), Some((5.0, 2)));
        assert_eq!(parse_float("0.3e1"), Some((3.0, 5)));
        assert_eq!(parse_number_attribute("0.7"), Some(0.7));
    }

    #[test]
    fn test_exponents() {
        let (v, used) = parse_float("1.5e3").unwrap();
        assert!(close(v, 1500.0));
        assert_eq!(used, 5);

        let (v, _) = parse_float("25E-1").unwrap();
        assert!(close(v, 2.5));

        let (v, _) = parse_float("2e+2").unwrap();
        assert!(close(v, 200.0));

        // No mantissa digits means an implied 1.
        let (v, used) = parse_float("e2").unwrap();
        assert!(close(v, 100.0));
        assert_eq!(used, 2);

        assert_eq!(parse_float("-e1"), Some((-10.0, 3)));
        assert_eq!(parse_float("4e"), Some((4.0, 2)));
    }

    #[test]
    fn test_not_a_number() {
        assert_eq!(parse_float(""), None);
        assert_eq!(parse_float("-"), None);
        assert_eq!(parse_float("."), None);
        assert_eq!(parse_float("abc"), None);
        assert_eq!(parse_float(" 1"), None);
    }

    #[test]
    fn test_packed_svg_numbers() {
        // A sign or a second dot starts the next number.
        assert_eq!(parse_float("10-5"), Some((10.0, 2)));
        let (v, used) = parse_float("0.5.5").unwrap();
        assert!(close(v, 0.5));
        assert_eq!(used, 3);
    }

    #[test]
    fn test_number_lists() {
        let (nums, rest) = parse_numbers::<4>("0 -200, 1000,800 tail").unwrap();
        assert_eq!(nums, [0.0, -200.0, 1000.0, 800.0]);
        assert_eq!(rest, " tail");

        assert!(parse_numbers::<3>("1 2").is_none());
    }

    #[test]
    fn test_number_attribute() {
        assert_eq!(parse_number_attribute(" 512 "), Some(512.0));
        assert_eq!(parse_number_attribute("512px"), None);
        assert_eq!(parse_number_attribute(""), None);
    }
}
