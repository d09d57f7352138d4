//! Field checks for Egyptian national IDs and mobile numbers.

const MOBILE_PREFIXES: [&str; 4] = ["010", "011", "012", "015"];

/// Accepts 14 digits whose century digit is 2 or 3, month is 1-12 and day is 1-31.
///
/// The day bound is not calendar-aware: `31` is accepted for every month. Year digits are
/// not inspected.
pub fn validate_national_id(value: &str) -> bool {
    let Some(digits) = decimal_digits(value) else {
        return false;
    };
    if digits.len() != 14 {
        return false;
    }

    let century = digits[0];
    let month = digits[3] * 10 + digits[4];
    let day = digits[5] * 10 + digits[6];

    matches!(century, 2 | 3) && (1..=12).contains(&month) && (1..=31).contains(&day)
}

/// Accepts 11 digits starting with one of the mobile operator prefixes.
pub fn validate_phone_number(value: &str) -> bool {
    let Some(digits) = decimal_digits(value) else {
        return false;
    };
    let normalized: String = digits.iter().map(|digit| char::from(b'0' + digit)).collect();
    normalized.len() == 11
        && MOBILE_PREFIXES
            .iter()
            .any(|prefix| normalized.starts_with(prefix))
}

/// Digit values of `value`, or `None` when any character is not a decimal digit.
///
/// Arabic-Indic (U+0660..U+0669) and Eastern Arabic-Indic (U+06F0..U+06F9) digits
/// count the same as ASCII ones.
fn decimal_digits(value: &str) -> Option<Vec<u8>> {
    value
        .chars()
        .map(|ch| {
            let ascii = match ch {
                '\u{0660}'..='\u{0669}' => char::from_u32(ch as u32 - 0x0660 + '0' as u32),
                '\u{06F0}'..='\u{06F9}' => char::from_u32(ch as u32 - 0x06F0 + '0' as u32),
                other => Some(other),
            }?;
            ascii.to_digit(10).map(|digit| digit as u8)
        })
        .collect()
}
