use std::time::Duration;

use crate::error::{DurationError, DurationResult};

/// Parses a duration string such as `30s`, `5m` or `1h30m`.
///
/// The string is a sequence of `<digits><unit>` pairs where the unit is one
/// of `s`, `m`, `h` or `d`. An empty string is rejected.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use yumrepo_utils::time::parse_duration;
///
/// assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
/// ```
pub fn parse_duration(input: &str) -> DurationResult<Duration> {
    let invalid = || {
        DurationError::Invalid {
            input: input.to_string(),
        }
    };

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let mut total: u64 = 0;
    let mut chars = trimmed.chars().peekable();

    while chars.peek().is_some() {
        let mut number_str = String::new();
        while let Some(c) = chars.peek() {
            if c.is_ascii_digit() {
                number_str.push(*c);
                chars.next();
            } else {
                break;
            }
        }

        if number_str.is_empty() {
            return Err(invalid());
        }

        let number: u64 = number_str.parse().map_err(|_| invalid())?;
        let multiplier = match chars.next() {
            Some('s') => 1,
            Some('m') => 60,
            Some('h') => 60 * 60,
            Some('d') => 24 * 60 * 60,
            _ => return Err(invalid()),
        };

        total = number
            .checked_mul(multiplier)
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(invalid)?;
    }

    Ok(Duration::from_secs(total))
}
