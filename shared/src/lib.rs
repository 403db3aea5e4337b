use serde::{Deserialize, Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

// Request keys
pub const ADULTS: &str = "# Adults";
pub const CHILDREN: &str = "# Children & Babies";
pub const TRIP_DURATION: &str = "Trip Duration Category";
pub const COUNTRY: &str = "Country";

// Response keys
pub const HOTEL_BUDGET: &str = "Hotel Budget in EUR";
pub const FOOD_BUDGET: &str = "Food Budget in EUR";
pub const ACTIVITY_BUDGET: &str = "Activity Budget in EUR";

pub const COUNTRIES: [&str; 10] = [
    "France",
    "Spain",
    "Italy",
    "Germany",
    "United Kingdom",
    "USA",
    "Japan",
    "Australia",
    "Thailand",
    "Other",
];

pub const TRIP_DURATIONS: [&str; 5] = [
    "Short (1-3 days)",
    "Medium (4-6 days)",
    "Long (7-10 days)",
    "Extended (11+ days)",
    "Missing",
];

/// Traveler interests, in the order the model was trained on.
///
/// The string form is both the checkbox name in the form and the key in
/// the prediction request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, AsRefStr, Display, IntoStaticStr,
)]
pub enum InterestFlag {
    #[strum(serialize = "Theme Parks")]
    ThemeParks,
    #[strum(serialize = "Hidden Gems")]
    HiddenGems,
    #[strum(serialize = "Cultural Attractions")]
    CulturalAttractions,
    #[strum(serialize = "Beach or Pools")]
    BeachOrPools,
    #[strum(serialize = "Sunset Spots")]
    SunsetSpots,
    #[strum(serialize = "Nature Getaway")]
    NatureGetaway,
}

impl InterestFlag {
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// All ten request keys in model order.
pub fn feature_names() -> Vec<&'static str> {
    use strum::IntoEnumIterator;

    let mut names = vec![ADULTS, CHILDREN, TRIP_DURATION, COUNTRY];
    names.extend(InterestFlag::iter().map(InterestFlag::name));
    names
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct PredictionRequest {
    #[serde(rename = "# Adults", serialize_with = "serialize_count")]
    pub adults: f64,
    #[serde(rename = "# Children & Babies", serialize_with = "serialize_count")]
    pub children: f64,
    #[serde(rename = "Trip Duration Category")]
    pub trip_duration: Option<String>,
    #[serde(rename = "Country")]
    pub country: Option<String>,
    #[serde(rename = "Theme Parks")]
    pub theme_parks: u8,
    #[serde(rename = "Hidden Gems")]
    pub hidden_gems: u8,
    #[serde(rename = "Cultural Attractions")]
    pub cultural_attractions: u8,
    #[serde(rename = "Beach or Pools")]
    pub beach_or_pools: u8,
    #[serde(rename = "Sunset Spots")]
    pub sunset_spots: u8,
    #[serde(rename = "Nature Getaway")]
    pub nature_getaway: u8,
}

impl PredictionRequest {
    pub fn interest(&self, flag: InterestFlag) -> u8 {
        match flag {
            InterestFlag::ThemeParks => self.theme_parks,
            InterestFlag::HiddenGems => self.hidden_gems,
            InterestFlag::CulturalAttractions => self.cultural_attractions,
            InterestFlag::BeachOrPools => self.beach_or_pools,
            InterestFlag::SunsetSpots => self.sunset_spots,
            InterestFlag::NatureGetaway => self.nature_getaway,
        }
    }

    pub fn set_interest(&mut self, flag: InterestFlag, checked: bool) {
        let value = u8::from(checked);
        match flag {
            InterestFlag::ThemeParks => self.theme_parks = value,
            InterestFlag::HiddenGems => self.hidden_gems = value,
            InterestFlag::CulturalAttractions => self.cultural_attractions = value,
            InterestFlag::BeachOrPools => self.beach_or_pools = value,
            InterestFlag::SunsetSpots => self.sunset_spots = value,
            InterestFlag::NatureGetaway => self.nature_getaway = value,
        }
    }

    /// Interests set to 1, in declaration order.
    pub fn selected_interests(&self) -> impl Iterator<Item = InterestFlag> + '_ {
        use strum::IntoEnumIterator;

        InterestFlag::iter().filter(move |flag| self.interest(*flag) == 1)
    }
}

// Whole counts go out as JSON integers, anything else as a float. serde_json
// writes non-finite floats as null.
fn serialize_count<S>(count: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if count.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(count) {
        serializer.serialize_i64(*count as i64)
    } else {
        serializer.serialize_f64(*count)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct PredictedBudgets {
    #[serde(rename = "Hotel Budget in EUR")]
    pub hotel: f64,
    #[serde(rename = "Food Budget in EUR")]
    pub food: f64,
    #[serde(rename = "Activity Budget in EUR")]
    pub activity: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictionResponse {
    pub predicted_budgets: PredictedBudgets,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}
