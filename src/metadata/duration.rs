//! Duration literal parsing as performed by the consuming host
//!
//! Accepted forms are `[d.]hh:mm[:ss[.fffffff]]` and a bare day count. The
//! generator itself never calls this while emitting; retry intervals are
//! passed through untouched and only fail when the host parses them.

use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("'{0}' is not a duration literal (expected [d.]hh:mm[:ss[.fffffff]])")]
    Malformed(String),

    #[error("'{literal}' has {component} out of range")]
    OutOfRange {
        literal: String,
        component: &'static str,
    },
}

fn time_span_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:(\d+)\.)?(\d{1,2}):(\d{1,2})(?::(\d{1,2})(?:\.(\d{1,7}))?)?$")
            .expect("duration pattern is valid")
    })
}

pub fn parse_interval(literal: &str) -> Result<Duration, DurationError> {
    let trimmed = literal.trim();

    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let days = parse_component(trimmed, literal, "days")?;
        let secs = days
            .checked_mul(86_400)
            .ok_or_else(|| out_of_range(literal, "days"))?;
        return Ok(Duration::from_secs(secs));
    }

    let caps = time_span_pattern()
        .captures(trimmed)
        .ok_or_else(|| DurationError::Malformed(literal.to_string()))?;

    let days = match caps.get(1) {
        Some(m) => parse_component(m.as_str(), literal, "days")?,
        None => 0,
    };
    let hours = parse_component(&caps[2], literal, "hours")?;
    let minutes = parse_component(&caps[3], literal, "minutes")?;
    let seconds = match caps.get(4) {
        Some(m) => parse_component(m.as_str(), literal, "seconds")?,
        None => 0,
    };

    if hours > 23 {
        return Err(out_of_range(literal, "hours"));
    }
    if minutes > 59 {
        return Err(out_of_range(literal, "minutes"));
    }
    if seconds > 59 {
        return Err(out_of_range(literal, "seconds"));
    }

    // Fraction digits are ticks of 100ns, right-padded to seven places.
    let nanos = match caps.get(5) {
        Some(m) => {
            let padded = format!("{:0<7}", m.as_str());
            parse_component(&padded, literal, "fraction")? * 100
        }
        None => 0,
    };

    let total_secs = days
        .checked_mul(86_400)
        .and_then(|s| s.checked_add(hours * 3_600 + minutes * 60 + seconds))
        .ok_or_else(|| out_of_range(literal, "days"))?;

    Ok(Duration::new(total_secs, nanos as u32))
}

fn parse_component(digits: &str, literal: &str, component: &'static str) -> Result<u64, DurationError> {
    digits
        .parse::<u64>()
        .map_err(|_| out_of_range(literal, component))
}

fn out_of_range(literal: &str, component: &'static str) -> DurationError {
    DurationError::OutOfRange {
        literal: literal.to_string(),
        component,
    }
}
