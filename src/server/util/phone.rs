//! Phone number normalization.
//!
//! Guardian phones and inbound sender addresses are compared in one canonical form,
//! `+<country code><subscriber digits>`, so a number typed as `(555) 123-4567` at
//! registration matches a `15551234567@c.us` sender on the messaging channel.

/// Shortest and longest digit counts accepted as a dial-able number (E.164 caps at 15).
const MIN_DIGITS: usize = 8;
const MAX_DIGITS: usize = 15;

/// Normalize a phone number or channel address to `+<country><digits>`.
///
/// # Rules
/// - Anything after `@` is a channel suffix and is dropped
/// - Punctuation and whitespace are ignored
/// - A leading `+` or `00` marks a number that already carries its country code
/// - A 10 digit number is local and gets `default_country_code`
/// - A longer number is assumed to already start with its country code
///
/// # Returns
/// - `Some(String)` - Canonical number
/// - `None` - Input does not contain a plausible number
pub fn normalize_phone(raw: &str, default_country_code: &str) -> Option<String> {
    let raw = raw.split('@').next().unwrap_or_default().trim();
    let international = raw.starts_with('+');
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    let full = if international {
        digits
    } else if let Some(rest) = digits.strip_prefix("00") {
        rest.to_string()
    } else if digits.len() == 10 {
        format!("{default_country_code}{digits}")
    } else if digits.len() > 10 {
        // Channel addresses carry the country code without a `+`
        digits
    } else {
        return None;
    };

    if !(MIN_DIGITS..=MAX_DIGITS).contains(&full.len()) {
        return None;
    }

    Some(format!("+{full}"))
}
