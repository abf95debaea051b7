use serde::{Deserialize, Serialize};

/// Typical current weather at a destination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Weather {
    /// Degrees Celsius, as requested from the model
    #[serde(default)]
    pub temp: f64,
    #[serde(default)]
    pub condition: String,
}

/// Destination record as returned by the model, before decoration
///
/// Every field falls back to an empty default. The model is asked to honor
/// a schema but its output is not re-validated here.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SuggestedDestination {
    pub id: String,
    pub city: String,
    pub country: String,
    pub vibe: String,
    pub weather: Weather,
    pub price_estimate: f64,
    pub description: String,
    pub top_attractions: Vec<String>,
}

impl SuggestedDestination {
    /// Attaches a cover image, producing the record handed to clients
    pub fn with_image(self, image_url: String) -> Destination {
        Destination {
            id: self.id,
            city: self.city,
            country: self.country,
            vibe: self.vibe,
            weather: self.weather,
            price_estimate: self.price_estimate,
            description: self.description,
            top_attractions: self.top_attractions,
            image_url,
        }
    }
}

/// Decorated destination returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub id: String,
    pub city: String,
    pub country: String,
    pub vibe: String,
    pub weather: Weather,
    pub price_estimate: f64,
    pub description: String,
    pub top_attractions: Vec<String>,
    pub image_url: String,
}
