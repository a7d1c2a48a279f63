//! Duration parsing - Normalizes operator-entered durations into fractional minutes.
//!
//! Durations arrive either as a plain number of minutes or as a "minutes:seconds"
//! string typed into a form. Parsing never fails: anything unparseable becomes
//! zero minutes, so a bad duration degrades the price to zero instead of
//! failing the caller.

/// A duration as entered by an operator, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum DurationInput {
    /// Already a number of minutes
    Minutes(f64),
    /// Raw text, either "minutes:seconds" or a plain number
    Text(String),
}

impl From<f64> for DurationInput {
    fn from(minutes: f64) -> Self {
        Self::Minutes(minutes)
    }
}

impl From<&str> for DurationInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for DurationInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Normalizes a duration input into fractional minutes.
///
/// * `None` or an empty string yields `0.0`.
/// * A numeric input is returned as-is (it is already minutes).
/// * `"m:s"` where both halves parse as integers yields `m + s/60`.
/// * Any other string gets one whole-string float parse; a failed parse or a
///   NaN yields `0.0`. A malformed two-part string (e.g. `"abc:30"`) falls
///   through to the whole-string parse, never a partial parse.
#[must_use]
pub fn parse_duration(input: Option<&DurationInput>) -> f64 {
    let Some(input) = input else {
        return 0.0;
    };

    match input {
        DurationInput::Minutes(minutes) => *minutes,
        DurationInput::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return 0.0;
            }

            let parts: Vec<&str> = text.split(':').collect();
            if parts.len() == 2 {
                if let (Ok(minutes), Ok(seconds)) =
                    (parts[0].parse::<i64>(), parts[1].parse::<i64>())
                {
                    return minutes as f64 + seconds as f64 / 60.0;
                }
            }

            match text.parse::<f64>() {
                Ok(value) if !value.is_nan() => value,
                _ => 0.0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_none_is_zero() {
        assert_eq!(parse_duration(None), 0.0);
    }

    #[test]
    fn test_parse_numeric_passthrough() {
        assert_eq!(parse_duration(Some(&5.0.into())), 5.0);
        assert_eq!(parse_duration(Some(&0.25.into())), 0.25);
    }

    #[test]
    fn test_parse_minutes_seconds() {
        assert_eq!(parse_duration(Some(&"2:30".into())), 2.5);
        assert_eq!(parse_duration(Some(&"0:15".into())), 0.25);
        assert_eq!(parse_duration(Some(&"10:00".into())), 10.0);
    }

    #[test]
    fn test_parse_plain_number_string() {
        assert_eq!(parse_duration(Some(&"5".into())), 5.0);
        assert_eq!(parse_duration(Some(&"3.5".into())), 3.5);
    }

    #[test]
    fn test_parse_empty_string_is_zero() {
        assert_eq!(parse_duration(Some(&"".into())), 0.0);
        assert_eq!(parse_duration(Some(&"   ".into())), 0.0);
    }

    #[test]
    fn test_parse_garbage_is_zero() {
        assert_eq!(parse_duration(Some(&"abc".into())), 0.0);
        assert_eq!(parse_duration(Some(&"NaN".into())), 0.0);
    }

    #[test]
    fn test_malformed_two_part_falls_through_to_whole_string() {
        // "abc:30" is not a valid pair, and "abc:30" as a whole is not a float
        assert_eq!(parse_duration(Some(&"abc:30".into())), 0.0);
        assert_eq!(parse_duration(Some(&"2:xx".into())), 0.0);
        // three parts are not a pair either
        assert_eq!(parse_duration(Some(&"1:2:3".into())), 0.0);
    }

    #[test]
    fn test_fractional_halves_are_not_a_pair() {
        // "2.5:30" has a non-integer minutes half, so the whole string is
        // float-parsed and fails
        assert_eq!(parse_duration(Some(&"2.5:30".into())), 0.0);
    }
}
