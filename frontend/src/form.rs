use shared::{InterestFlag, PredictionRequest};
use strum::IntoEnumIterator;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter valid numbers for Adults and Children.")]
    InvalidCounts,
}

/// Raw values read from the prediction form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSnapshot {
    pub adults: Option<String>,
    pub children: Option<String>,
    pub trip_duration: Option<String>,
    pub country: Option<String>,
    pub interests: Vec<InterestFlag>,
}

impl FormSnapshot {
    pub fn to_request(&self) -> Result<PredictionRequest, ValidationError> {
        let adults = self.adults.as_deref().and_then(parse_int);
        let children = self.children.as_deref().and_then(parse_int);

        let (Some(adults), Some(children)) = (adults, children) else {
            return Err(ValidationError::InvalidCounts);
        };

        let mut request = PredictionRequest {
            adults,
            children,
            trip_duration: self.trip_duration.clone(),
            country: self.country.clone(),
            ..Default::default()
        };
        for flag in InterestFlag::iter() {
            request.set_interest(flag, self.interests.contains(&flag));
        }

        Ok(request)
    }
}

/// Parses the leading base-10 integer of `input` like `parseInt(input, 10)`:
/// leading whitespace is skipped, a sign is accepted and parsing stops at the
/// first non-digit. Returns `None` when no digits are found. Long digit runs
/// lose precision the same way a JavaScript number does.
pub fn parse_int(input: &str) -> Option<f64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    let magnitude: f64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
