use serde_json::{Map, Value};
use shared::{ADULTS, CHILDREN, COUNTRY, InterestFlag, TRIP_DURATION, feature_names};
use strum::IntoEnumIterator;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FeatureError {
    #[error("Missing features: {}", .0.join(", "))]
    Missing(Vec<String>),
    #[error("Invalid numeric input detected.")]
    InvalidNumeric,
}

/// One trip, coerced from the loosely typed request body.
#[derive(Debug, Clone, PartialEq)]
pub struct TripFeatures {
    pub adults: f64,
    pub children: f64,
    pub trip_duration: String,
    pub country: String,
    pub interests: Vec<InterestFlag>,
}

impl TripFeatures {
    pub fn numeric(&self, name: &str) -> Option<f64> {
        match name {
            ADULTS => Some(self.adults),
            CHILDREN => Some(self.children),
            other => other
                .parse::<InterestFlag>()
                .ok()
                .map(|flag| if self.interests.contains(&flag) { 1.0 } else { 0.0 }),
        }
    }

    pub fn categorical(&self, name: &str) -> Option<&str> {
        match name {
            TRIP_DURATION => Some(&self.trip_duration),
            COUNTRY => Some(&self.country),
            _ => None,
        }
    }
}

pub fn parse_features(body: &Value) -> Result<TripFeatures, FeatureError> {
    let empty = Map::new();
    let fields = body.as_object().unwrap_or(&empty);

    let missing: Vec<String> = feature_names()
        .into_iter()
        .filter(|name| !fields.contains_key(*name))
        .map(str::to_owned)
        .collect();
    if !missing.is_empty() {
        return Err(FeatureError::Missing(missing));
    }

    let interests = InterestFlag::iter()
        .filter(|flag| interest_value(&fields[flag.name()]))
        .collect();

    Ok(TripFeatures {
        adults: count_value(&fields[ADULTS])?,
        children: count_value(&fields[CHILDREN])?,
        trip_duration: category_value(&fields[TRIP_DURATION])?,
        country: category_value(&fields[COUNTRY])?,
        interests,
    })
}

// Numbers or numeric strings; anything else is rejected.
fn count_value(value: &Value) -> Result<f64, FeatureError> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    number
        .filter(|n| n.is_finite())
        .ok_or(FeatureError::InvalidNumeric)
}

// Strings use a fixed vocabulary, unknown words count as unchecked. Other
// values use truthiness.
fn interest_value(value: &Value) -> bool {
    match value {
        Value::String(s) => matches!(s.to_lowercase().as_str(), "true" | "1" | "yes"),
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(entries) => !entries.is_empty(),
    }
}

fn category_value(value: &Value) -> Result<String, FeatureError> {
    match value {
        Value::Null => Err(FeatureError::InvalidNumeric),
        Value::String(s) => Ok(s.clone()),
        other => Ok(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body() -> Value {
        json!({
            "# Adults": 2,
            "# Children & Babies": 1,
            "Trip Duration Category": "Short (1-3 days)",
            "Country": "Spain",
            "Theme Parks": 1,
            "Hidden Gems": 0,
            "Cultural Attractions": 0,
            "Beach or Pools": 1,
            "Sunset Spots": 0,
            "Nature Getaway": 0
        })
    }

    #[test]
    fn parses_a_complete_request() {
        let features = parse_features(&body()).unwrap();
        assert_eq!(features.adults, 2.0);
        assert_eq!(features.children, 1.0);
        assert_eq!(features.trip_duration, "Short (1-3 days)");
        assert_eq!(features.country, "Spain");
        assert_eq!(
            features.interests,
            vec![InterestFlag::ThemeParks, InterestFlag::BeachOrPools]
        );
        assert_eq!(features.numeric("Beach or Pools"), Some(1.0));
        assert_eq!(features.numeric("Sunset Spots"), Some(0.0));
        assert_eq!(features.numeric("Budget"), None);
        assert_eq!(features.categorical("Country"), Some("Spain"));
    }

    #[test]
    fn reports_missing_features_in_model_order() {
        let mut body = body();
        let fields = body.as_object_mut().unwrap();
        fields.remove("Country");
        fields.remove("# Adults");
        fields.remove("Nature Getaway");

        let err = parse_features(&body).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing features: # Adults, Country, Nature Getaway"
        );
    }

    #[test]
    fn non_object_body_misses_everything() {
        let err = parse_features(&json!([1, 2, 3])).unwrap_err();
        let FeatureError::Missing(missing) = err else {
            panic!("expected missing features");
        };
        assert_eq!(missing.len(), 10);
    }

    #[test]
    fn interest_strings_use_boolean_vocabulary() {
        for (raw, expected) in [
            ("true", true),
            ("YES", true),
            ("1", true),
            ("false", false),
            ("No", false),
            ("0", false),
            ("maybe", false),
        ] {
            let mut body = body();
            body["Hidden Gems"] = json!(raw);
            let features = parse_features(&body).unwrap();
            assert_eq!(
                features.interests.contains(&InterestFlag::HiddenGems),
                expected,
                "value {raw}"
            );
        }
    }

    #[test]
    fn interest_values_use_truthiness() {
        let mut body = body();
        body["Theme Parks"] = json!(false);
        body["Hidden Gems"] = json!(true);
        body["Sunset Spots"] = json!(2.5);
        body["Nature Getaway"] = Value::Null;

        let features = parse_features(&body).unwrap();
        assert_eq!(
            features.interests,
            vec![
                InterestFlag::HiddenGems,
                InterestFlag::BeachOrPools,
                InterestFlag::SunsetSpots
            ]
        );
    }

    #[test]
    fn counts_accept_numeric_strings() {
        let mut body = body();
        body["# Adults"] = json!("3");
        body["# Children & Babies"] = json!(" 1.5 ");

        let features = parse_features(&body).unwrap();
        assert_eq!(features.adults, 3.0);
        assert_eq!(features.children, 1.5);
    }

    #[test]
    fn invalid_counts_are_rejected() {
        for bad in [json!("two"), Value::Null, json!([2]), json!("nan")] {
            let mut body = body();
            body["# Adults"] = bad.clone();
            assert_eq!(
                parse_features(&body),
                Err(FeatureError::InvalidNumeric),
                "value {bad}"
            );
        }
    }

    #[test]
    fn null_category_is_rejected() {
        let mut body = body();
        body["Country"] = Value::Null;
        let err = parse_features(&body).unwrap_err();
        assert_eq!(err.to_string(), "Invalid numeric input detected.");
    }
}
