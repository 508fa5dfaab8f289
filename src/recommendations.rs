//! Rule-based crop advice, the seasonal calendar and farming tips

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::advisor::CropAdviceInput;

const UNKNOWN: &str = "Unknown";

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// Accept strings, numbers or booleans; `null` reads as "Unknown"
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => unknown(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FarmerSummary {
    #[serde(default = "unknown", deserialize_with = "lenient_text")]
    pub farm_size: String,
    #[serde(default = "unknown", deserialize_with = "lenient_text")]
    pub location: String,
    #[serde(default = "unknown", deserialize_with = "lenient_text")]
    pub experience: String,
    #[serde(default = "unknown", deserialize_with = "lenient_text", rename(deserialize = "previous_crops"))]
    pub crops_grown: String,
    #[serde(default = "unknown", deserialize_with = "lenient_text")]
    pub soil_type: String,
    #[serde(default = "unknown", deserialize_with = "lenient_text", rename(deserialize = "irrigation"))]
    pub irrigation_access: String,
    #[serde(default = "unknown", deserialize_with = "lenient_text")]
    pub budget: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationDetails {
    #[serde(default = "unknown", deserialize_with = "lenient_text")]
    pub state: String,
    #[serde(default = "unknown", deserialize_with = "lenient_text")]
    pub district: String,
    #[serde(default = "unknown", deserialize_with = "lenient_text")]
    pub climate_zone: String,
    #[serde(default = "unknown", deserialize_with = "lenient_text", rename(deserialize = "average_rainfall"))]
    pub rainfall: String,
    #[serde(default = "unknown", deserialize_with = "lenient_text", rename(deserialize = "average_temperature"))]
    pub temperature: String,
}

/// The `/crop-advice` body split into its farmer and location halves
#[derive(Debug, Clone, PartialEq)]
pub struct CropAdviceRequest {
    pub farmer: FarmerSummary,
    pub season: String,
    pub location: LocationDetails,
}

impl CropAdviceRequest {
    pub fn from_json(body: &Value) -> Result<Self, serde_json::Error> {
        let season = match body.get("season") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => "current".to_string(),
            Some(other) => other.to_string(),
        };
        Ok(Self {
            farmer: FarmerSummary::deserialize(body)?,
            season,
            location: LocationDetails::deserialize(body)?,
        })
    }

    pub fn advice_input(&self) -> CropAdviceInput {
        let known = |value: &str| (value != UNKNOWN).then(|| value.to_string());
        CropAdviceInput {
            farm_size: known(&self.farmer.farm_size),
            location: known(&self.farmer.location),
            experience: known(&self.farmer.experience),
            crops_grown: known(&self.farmer.crops_grown),
            season: self.season.clone(),
            location_details: json!(self.location),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CropPlan {
    pub top_crops: Vec<&'static str>,
    pub reasoning: Vec<&'static str>,
    pub market_potential: &'static str,
    pub investment_required: &'static str,
    pub risk_level: &'static str,
}

fn is_small_farm(farm_size: &str) -> bool {
    let size = farm_size.to_lowercase();
    size.contains("small") || (size.contains('2') && size.contains("acre"))
}

/// Advice by season, then state, then farm size
pub fn basic_crop_plan(request: &CropAdviceRequest) -> CropPlan {
    let (mut top_crops, season_reason): (Vec<&str>, &str) =
        match request.season.to_lowercase().as_str() {
            "kharif" | "monsoon" => (
                vec!["Rice", "Cotton", "Sugarcane", "Maize", "Pulses"],
                "Monsoon season suitable for water-intensive crops",
            ),
            "rabi" | "winter" => (
                vec!["Wheat", "Barley", "Gram", "Peas", "Mustard"],
                "Winter season ideal for grain crops",
            ),
            "zaid" | "summer" => (
                vec!["Fodder crops", "Vegetables", "Watermelon", "Cucumber"],
                "Summer season requires heat-tolerant crops",
            ),
            _ => (
                vec!["Rice", "Wheat", "Vegetables", "Pulses"],
                "Year-round suitable crops",
            ),
        };
    let mut reasoning = vec![season_reason];

    let state = request.location.state.to_lowercase();
    if state.contains("punjab") || state.contains("haryana") {
        top_crops.extend(["Wheat", "Rice"]);
        reasoning.push("Punjab/Haryana: Wheat-Rice belt");
    } else if state.contains("maharashtra") {
        top_crops.extend(["Cotton", "Sugarcane", "Onion"]);
        reasoning.push("Maharashtra: Cotton and horticulture state");
    } else if state.contains("kerala") || state.contains("tamil nadu") {
        top_crops.extend(["Rice", "Coconut", "Spices"]);
        reasoning.push("South India: Rice and plantation crops");
    }

    let mut investment_required = "Medium";
    if is_small_farm(&request.farmer.farm_size) {
        top_crops = vec!["Vegetables", "Pulses", "Spices", "Flowers"];
        reasoning.push("Small farms: High-value crops recommended");
        investment_required = "Low to Medium";
    }

    CropPlan {
        top_crops,
        reasoning,
        market_potential: "Moderate",
        investment_required,
        risk_level: "Medium",
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SeasonPlan {
    pub months: &'static str,
    pub crops: &'static [&'static str],
    pub activities: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SeasonalCalendar {
    pub kharif_season: SeasonPlan,
    pub rabi_season: SeasonPlan,
    pub zaid_season: SeasonPlan,
}

pub const SEASONAL_CALENDAR: SeasonalCalendar = SeasonalCalendar {
    kharif_season: SeasonPlan {
        months: "June-October",
        crops: &["Rice", "Cotton", "Sugarcane", "Pulses"],
        activities: &[
            "Sowing: June-July",
            "Weeding: July-August",
            "Harvesting: September-October",
        ],
    },
    rabi_season: SeasonPlan {
        months: "November-April",
        crops: &["Wheat", "Barley", "Peas", "Gram"],
        activities: &[
            "Sowing: November-December",
            "Irrigation: January-February",
            "Harvesting: March-April",
        ],
    },
    zaid_season: SeasonPlan {
        months: "April-June",
        crops: &["Fodder", "Vegetables", "Watermelon"],
        activities: &[
            "Sowing: April",
            "Intensive irrigation needed",
            "Harvesting: June",
        ],
    },
};

/// Body of `/personalized-tips`, echoed back as the farmer profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TipsRequest {
    pub experience_level: String,
    pub farm_size: Value,
    pub main_crops: Vec<Value>,
    pub challenges: Vec<Value>,
    pub goals: Vec<Value>,
}

impl Default for TipsRequest {
    fn default() -> Self {
        Self {
            experience_level: "beginner".to_string(),
            farm_size: json!("small"),
            main_crops: Vec::new(),
            challenges: Vec::new(),
            goals: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FarmingTips {
    pub soil_management: &'static [&'static str],
    pub water_management: &'static [&'static str],
    pub pest_management: &'static [&'static str],
    pub market_strategies: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beginner_focus: Option<&'static [&'static str]>,
}

const BEGINNER_FOCUS: &[&str] = &[
    "Start with easy-to-grow crops",
    "Learn from experienced farmers",
    "Attend agricultural training programs",
    "Keep detailed farming records",
];

pub fn farming_tips(experience_level: &str) -> FarmingTips {
    FarmingTips {
        soil_management: &[
            "Test soil pH regularly",
            "Add organic matter like compost",
            "Practice crop rotation",
            "Use cover crops to improve soil health",
        ],
        water_management: &[
            "Install drip irrigation for efficiency",
            "Harvest rainwater when possible",
            "Mulch around plants to retain moisture",
            "Water early morning or evening",
        ],
        pest_management: &[
            "Practice integrated pest management (IPM)",
            "Use neem-based organic pesticides",
            "Encourage beneficial insects",
            "Regular monitoring of crops",
        ],
        market_strategies: &[
            "Research local market prices",
            "Consider contract farming",
            "Build relationships with buyers",
            "Value addition through processing",
        ],
        beginner_focus: (experience_level == "beginner").then_some(BEGINNER_FOCUS),
    }
}
