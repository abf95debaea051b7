use serde_json::{json, Value};

use crate::models::{SearchCriteria, TRIP_DAYS};

/// Number of destinations requested for the trending list
pub const TRENDING_COUNT: usize = 6;

/// Prompt for destinations matching the user's criteria
pub fn personalized_prompt(criteria: &SearchCriteria) -> String {
    format!(
        "Suggest 4-5 travel destinations for a user with the following criteria:\n\
         - Origin: {origin}\n\
         - Budget: ${budget} (Total estimated trip cost for {days} days)\n\
         - Vibe: {vibe}\n\
         \n\
         Provide current typical weather (TEMPERATURE MUST BE IN CELSIUS) and estimated flight+hotel pricing for this month.\n\
         \n\
         Return the response as a JSON array of objects.",
        origin = criteria.origin,
        budget = criteria.budget,
        days = TRIP_DAYS,
        vibe = criteria.vibe,
    )
}

/// Prompt for the criteria-independent trending list
pub fn trending_prompt() -> String {
    format!(
        "Suggest {count} globally trending travel destinations for the current season.\n\
         Provide current typical weather (TEMPERATURE MUST BE IN CELSIUS) and estimated total {days}-day trip pricing.\n\
         Return the response as a JSON array of objects following the Destination schema.",
        count = TRENDING_COUNT,
        days = TRIP_DAYS,
    )
}

/// Output schema shared by both prompts, in Gemini's OpenAPI subset
pub fn destination_list_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "STRING" },
                "city": { "type": "STRING" },
                "country": { "type": "STRING" },
                "vibe": { "type": "STRING" },
                "weather": {
                    "type": "OBJECT",
                    "properties": {
                        "temp": { "type": "NUMBER", "description": "Temperature in Celsius" },
                        "condition": { "type": "STRING" }
                    },
                    "required": ["temp", "condition"]
                },
                "priceEstimate": { "type": "NUMBER" },
                "description": { "type": "STRING" },
                "topAttractions": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" }
                }
            },
            "required": [
                "id",
                "city",
                "country",
                "weather",
                "priceEstimate",
                "description",
                "topAttractions"
            ]
        }
    })
}
