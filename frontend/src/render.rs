use shared::{PredictedBudgets, PredictionRequest};

pub const FAILURE_PREFIX: &str = "Prediction failed: ";

/// Text for the result paragraphs.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetLines {
    pub hotel: String,
    pub food: String,
    pub activity: String,
    pub parameters: String,
}

impl BudgetLines {
    pub fn new(request: &PredictionRequest, budgets: &PredictedBudgets) -> Self {
        Self {
            hotel: format!("Predicted Hotel Budget: €{}", to_fixed_2(budgets.hotel)),
            food: format!("Predicted Food Budget: €{}", to_fixed_2(budgets.food)),
            activity: format!("Predicted Activity Budget: €{}", to_fixed_2(budgets.activity)),
            parameters: format!("Based on: {}", parameters_line(request)),
        }
    }
}

/// What the page shows below the form. Results and error are never visible
/// together.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DisplayState {
    #[default]
    Hidden,
    Results(BudgetLines),
    Error(String),
}

pub fn parameters_line(request: &PredictionRequest) -> String {
    let mut line = format!(
        "Adults={}, Children={}, Duration={}, Country={}",
        js_number(request.adults),
        js_number(request.children),
        choice(&request.trip_duration),
        choice(&request.country),
    );
    for flag in request.selected_interests() {
        line.push_str(", ");
        line.push_str(flag.name());
    }
    line
}

// An unselected dropdown is sent as null and shown the same way.
fn choice(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("null")
}

/// Formats with two fraction digits the way `Number.prototype.toFixed(2)`
/// does: the exact binary value is rounded, ties away from zero, negative
/// zero drops its sign and magnitudes from 1e21 up use exponent notation.
pub fn to_fixed_2(value: f64) -> String {
    if !value.is_finite() || value.abs() >= 1e21 {
        return js_number(value);
    }

    // 40 digits always reach past the last digit that can decide a tie
    // below 1e21.
    let exact = format!("{:.40}", value.abs());
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), "00"));
    let mut digits: Vec<char> = whole.chars().chain(fraction.chars().take(2)).collect();

    if fraction.as_bytes().get(2).is_some_and(|d| *d >= b'5') {
        round_up(&mut digits);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let point = digits.len() - 2;
    let whole: String = digits[..point].iter().collect();
    let cents: String = digits[point..].iter().collect();
    format!("{}{}.{}", sign, whole, cents)
}

fn round_up(digits: &mut Vec<char>) {
    for digit in digits.iter_mut().rev() {
        if *digit == '9' {
            *digit = '0';
        } else {
            *digit = char::from(*digit as u8 + 1);
            return;
        }
    }
    digits.insert(0, '1');
}

/// `Number.prototype.toString()` for a finite or non-finite double.
pub fn js_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    if value == 0.0 {
        return "0".into();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }
    let scientific = format!("{:e}", value);
    match scientific.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => scientific,
    }
}
