//! Crop price tables and the trend-based price projection

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Copy)]
pub struct CropPrice {
    pub key: &'static str,
    /// Rupees per kg
    pub current: f64,
    pub trend: Trend,
    pub prediction_30days: f64,
}

const fn crop(key: &'static str, current: f64, trend: Trend, prediction_30days: f64) -> CropPrice {
    CropPrice {
        key,
        current,
        trend,
        prediction_30days,
    }
}

pub const CROP_PRICES: &[CropPrice] = &[
    crop("apples", 80.0, Trend::Up, 85.0),
    crop("bananas", 40.0, Trend::Stable, 40.0),
    crop("grapes", 70.0, Trend::Up, 75.0),
    crop("lemons", 45.0, Trend::Stable, 45.0),
    crop("limes", 50.0, Trend::Up, 53.0),
    crop("mangoes", 60.0, Trend::Up, 65.0),
    crop("oranges", 55.0, Trend::Stable, 55.0),
    crop("papayas", 35.0, Trend::Down, 33.0),
    crop("pears", 85.0, Trend::Up, 88.0),
    crop("pineapples", 65.0, Trend::Stable, 65.0),
    crop("strawberries", 120.0, Trend::Up, 125.0),
    crop("asparagus", 150.0, Trend::Up, 155.0),
    crop("broccoli_bunches", 40.0, Trend::Stable, 40.0),
    crop("broccoli_crowns", 45.0, Trend::Stable, 45.0),
    crop("carrots", 30.0, Trend::Stable, 30.0),
    crop("cauliflower", 35.0, Trend::Up, 37.0),
    crop("celery", 32.0, Trend::Stable, 32.0),
    crop("green_leaf_lettuce", 25.0, Trend::Down, 23.0),
    crop("iceberg_lettuce", 28.0, Trend::Stable, 28.0),
    crop("potatoes", 20.0, Trend::Stable, 20.0),
    crop("red_leaf_lettuce", 26.0, Trend::Stable, 26.0),
    crop("romaine_lettuce", 27.0, Trend::Up, 29.0),
    crop("tomatoes", 25.0, Trend::Up, 28.0),
];

/// Price multiplier for a named market relative to the national average
pub const MARKET_FACTORS: &[(&str, f64, &str)] = &[
    ("Mumbai", 1.15, "Metropolitan demand"),
    ("Delhi", 1.12, "Capital city premium"),
    ("Bangalore", 1.10, "IT hub demand"),
    ("Chennai", 1.08, "Port city advantage"),
    ("Pune", 1.06, "Industrial center"),
    ("Hyderabad", 1.05, "Tech city growth"),
    ("Kolkata", 1.04, "Eastern hub"),
    ("Ahmedabad", 1.03, "Commercial center"),
    ("Guntur", 0.92, "Chili production hub"),
    ("Nashik", 0.94, "Onion and grape center"),
    ("Kota", 0.90, "Agricultural belt"),
    ("Mandi", 0.88, "Apple production area"),
    ("Muzaffarpur", 0.85, "Litchi belt"),
    ("Malda", 0.87, "Mango hub"),
    ("Salem", 0.91, "Turmeric market"),
    ("Indore", 0.93, "Soybean center"),
];

pub const STATE_MARKETS: &[(&str, &[&str])] = &[
    ("Andhra Pradesh", &["Vijayawada", "Visakhapatnam", "Guntur", "Tirupati", "Rajahmundry"]),
    ("Arunachal Pradesh", &["Itanagar", "Naharlagun", "Pasighat", "Tezpur"]),
    ("Assam", &["Guwahati", "Dibrugarh", "Silchar", "Jorhat", "Tezpur"]),
    ("Bihar", &["Patna", "Muzaffarpur", "Bhagalpur", "Darbhanga", "Gaya"]),
    ("Chhattisgarh", &["Raipur", "Bilaspur", "Durg", "Korba", "Jagdalpur"]),
    ("Goa", &["Panaji", "Margao", "Vasco da Gama", "Mapusa"]),
    ("Gujarat", &["Ahmedabad", "Surat", "Vadodara", "Rajkot", "Junagadh"]),
    ("Haryana", &["Faridabad", "Gurgaon", "Panipat", "Ambala", "Karnal"]),
    ("Himachal Pradesh", &["Shimla", "Mandi", "Kullu", "Kangra", "Solan"]),
    ("Jharkhand", &["Ranchi", "Jamshedpur", "Dhanbad", "Bokaro", "Deoghar"]),
    ("Karnataka", &["Bangalore", "Mysore", "Hubli", "Belgaum", "Mangalore"]),
    ("Kerala", &["Thiruvananthapuram", "Kochi", "Kozhikode", "Thrissur", "Kollam"]),
    ("Madhya Pradesh", &["Bhopal", "Indore", "Gwalior", "Jabalpur", "Ujjain"]),
    ("Maharashtra", &["Mumbai", "Pune", "Nagpur", "Nashik", "Aurangabad"]),
    ("Manipur", &["Imphal", "Thoubal", "Bishnupur", "Churachandpur"]),
    ("Meghalaya", &["Shillong", "Tura", "Jowai", "Nongstoin"]),
    ("Mizoram", &["Aizawl", "Lunglei", "Saiha", "Champhai"]),
    ("Nagaland", &["Kohima", "Dimapur", "Mokokchung", "Tuensang"]),
    ("Odisha", &["Bhubaneswar", "Cuttack", "Rourkela", "Berhampur", "Sambalpur"]),
    ("Punjab", &["Ludhiana", "Amritsar", "Jalandhar", "Patiala", "Bathinda"]),
    ("Rajasthan", &["Jaipur", "Jodhpur", "Kota", "Bikaner", "Udaipur"]),
    ("Sikkim", &["Gangtok", "Namchi", "Gyalshing", "Mangan"]),
    ("Tamil Nadu", &["Chennai", "Coimbatore", "Madurai", "Tiruchirappalli", "Salem"]),
    ("Telangana", &["Hyderabad", "Warangal", "Nizamabad", "Karimnagar", "Khammam"]),
    ("Tripura", &["Agartala", "Dharmanagar", "Udaipur", "Kailashahar"]),
    ("Uttar Pradesh", &["Lucknow", "Kanpur", "Agra", "Varanasi", "Meerut"]),
    ("Uttarakhand", &["Dehradun", "Haridwar", "Roorkee", "Haldwani", "Rishikesh"]),
    ("West Bengal", &["Kolkata", "Howrah", "Durgapur", "Asansol", "Siliguri"]),
    ("Delhi", &["New Delhi", "Azadpur Mandi", "Okhla", "Ghazipur"]),
    ("Chandigarh", &["Chandigarh Sector 26", "Chandigarh Sector 19"]),
    ("Puducherry", &["Puducherry", "Karaikal", "Mahe", "Yanam"]),
];

pub const MAX_PREDICTION_DAYS: i64 = 365;

#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    #[error("Crop not found in database")]
    CropNotFound,
    #[error("Days must be between 1 and 365")]
    InvalidDays,
}

/// Which caller is asking; only the fallback labels differ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    Prediction,
    Listing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketAdjustment {
    pub factor: f64,
    pub info: &'static str,
}

/// Resolve the price factor for an optional state/market pair
pub fn market_adjustment(
    state: Option<&str>,
    market: Option<&str>,
    style: LabelStyle,
) -> MarketAdjustment {
    let state = state.filter(|s| !s.is_empty());
    let market = market.filter(|m| !m.is_empty());

    if let Some((_, factor, reason)) = market
        .and_then(|m| MARKET_FACTORS.iter().find(|(name, _, _)| *name == m))
    {
        return MarketAdjustment {
            factor: *factor,
            info: *reason,
        };
    }

    match (state, market, style) {
        (Some(_), Some(_), LabelStyle::Prediction) => MarketAdjustment {
            factor: 0.95,
            info: "Rural market adjustment",
        },
        (Some(_), Some(_), LabelStyle::Listing) => MarketAdjustment {
            factor: 0.95,
            info: "Rural market prices",
        },
        (_, _, LabelStyle::Prediction) => MarketAdjustment {
            factor: 1.0,
            info: "",
        },
        (_, _, LabelStyle::Listing) => MarketAdjustment {
            factor: 1.0,
            info: "National average",
        },
    }
}

pub fn find_crop(name: &str) -> Option<&'static CropPrice> {
    let name = name.to_lowercase();
    CROP_PRICES.iter().find(|c| c.key == name)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyPrice {
    pub day: i64,
    /// `YYYY-MM-DD`
    pub date: String,
    pub predicted_price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PricePrediction {
    pub crop: String,
    pub state: Option<String>,
    pub market: Option<String>,
    pub current_price: f64,
    pub base_price: f64,
    pub market_factor: f64,
    pub market_info: &'static str,
    pub trend: Trend,
    pub predictions: Vec<DailyPrice>,
    pub average_predicted_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub modal_price: i64,
}

/// Project the price of `crop` for each of the next `days` days from `today`
pub fn predict(
    crop: &str,
    days: i64,
    state: Option<&str>,
    market: Option<&str>,
    today: NaiveDate,
) -> Result<PricePrediction, PriceError> {
    if !(1..=MAX_PREDICTION_DAYS).contains(&days) {
        return Err(PriceError::InvalidDays);
    }
    let entry = find_crop(crop).ok_or(PriceError::CropNotFound)?;
    let adjustment = market_adjustment(state, market, LabelStyle::Prediction);
    let adjusted = entry.current * adjustment.factor;

    let predictions: Vec<DailyPrice> = (1..=days)
        .map(|day| {
            let price = match entry.trend {
                Trend::Up => adjusted + day as f64 * 0.5,
                Trend::Down => adjusted - day as f64 * 0.3,
                Trend::Stable if day % 2 == 0 => adjusted + 0.2,
                Trend::Stable => adjusted - 0.2,
            };
            DailyPrice {
                day,
                date: (today + Duration::days(day)).format("%Y-%m-%d").to_string(),
                predicted_price: round2(price),
            }
        })
        .collect();

    let prices: Vec<f64> = predictions.iter().map(|p| p.predicted_price).collect();
    let min_price = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max_price = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let average = round2(prices.iter().sum::<f64>() / prices.len() as f64);

    Ok(PricePrediction {
        crop: entry.key.to_string(),
        state: state.map(str::to_string),
        market: market.map(str::to_string),
        current_price: round2(adjusted),
        base_price: entry.current,
        market_factor: round2(adjustment.factor),
        market_info: adjustment.info,
        trend: entry.trend,
        predictions,
        average_predicted_price: average,
        min_price,
        max_price,
        modal_price: modal_price(&prices).unwrap_or_else(|| adjusted.round_ties_even() as i64),
    })
}

/// Most frequent whole-rupee price; ties go to the value seen first
pub fn modal_price(prices: &[f64]) -> Option<i64> {
    let mut counts: Vec<(i64, usize)> = Vec::new();
    for price in prices {
        let rounded = price.round_ties_even() as i64;
        match counts.iter_mut().find(|(value, _)| *value == rounded) {
            Some((_, count)) => *count += 1,
            None => counts.push((rounded, 1)),
        }
    }

    let mut best: Option<(i64, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

#[derive(Debug, Clone, Serialize)]
pub struct MarketPrice {
    pub crop: String,
    pub base_price: f64,
    pub market_price: f64,
    pub price: f64,
    pub unit: &'static str,
    pub trend: Trend,
    pub market_factor: f64,
    pub last_updated: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarketPrices {
    pub state: Option<String>,
    pub market: Option<String>,
    pub market_info: &'static str,
    pub market_factor: f64,
    pub prices: Vec<MarketPrice>,
}

/// Today's price of every crop at the given location, sorted by display name
pub fn market_prices(state: Option<&str>, market: Option<&str>, today: NaiveDate) -> MarketPrices {
    let adjustment = market_adjustment(state, market, LabelStyle::Listing);
    let last_updated = today.format("%Y-%m-%d").to_string();

    let mut prices: Vec<MarketPrice> = CROP_PRICES
        .iter()
        .map(|c| {
            let adjusted = round2(c.current * adjustment.factor);
            MarketPrice {
                crop: title_case(&c.key.replace('_', " ")),
                base_price: c.current,
                market_price: adjusted,
                price: adjusted,
                unit: "per kg",
                trend: c.trend,
                market_factor: round2(adjustment.factor),
                last_updated: last_updated.clone(),
            }
        })
        .collect();
    prices.sort_by(|a, b| a.crop.cmp(&b.crop));

    MarketPrices {
        state: state.map(str::to_string),
        market: market.map(str::to_string),
        market_info: adjustment.info,
        market_factor: round2(adjustment.factor),
        prices,
    }
}

pub fn states() -> Vec<&'static str> {
    let mut states: Vec<&str> = STATE_MARKETS.iter().map(|(state, _)| *state).collect();
    states.sort_unstable();
    states
}

pub fn markets_for(state: &str) -> Option<Vec<&'static str>> {
    STATE_MARKETS
        .iter()
        .find(|(name, _)| *name == state)
        .map(|(_, markets)| {
            let mut markets = markets.to_vec();
            markets.sort_unstable();
            markets
        })
}

/// Crop keys with the first letter upper-cased
pub fn crop_names() -> Vec<String> {
    CROP_PRICES.iter().map(|c| capitalize(c.key)).collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceComparison {
    pub crop: String,
    pub current_price: f64,
    pub predicted_price: f64,
    pub trend: Trend,
}

/// 30-day outlook for each known crop; unknown names are skipped
pub fn compare(crops: &[String], today: NaiveDate) -> Vec<PriceComparison> {
    crops
        .iter()
        .filter_map(|name| {
            predict(name, 30, None, None, today)
                .ok()
                .map(|p| PriceComparison {
                    crop: name.clone(),
                    current_price: p.current_price,
                    predicted_price: p.average_predicted_price,
                    trend: p.trend,
                })
        })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn title_case(text: &str) -> String {
    text.split(' ').map(capitalize).collect::<Vec<_>>().join(" ")
}
