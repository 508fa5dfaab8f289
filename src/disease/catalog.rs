//! Disease descriptions and mapping from classifier labels to them

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Output labels of the classifier, in training order
pub const CLASS_LABELS: [&str; 38] = [
    "Apple___Apple_scab",
    "Apple___Black_rot",
    "Apple___Cedar_apple_rust",
    "Apple___healthy",
    "Blueberry___healthy",
    "Cherry_(including_sour)___Powdery_mildew",
    "Cherry_(including_sour)___healthy",
    "Corn_(maize)___Cercospora_leaf_spot__Gray_leaf_spot",
    "Corn_(maize)___Common_rust",
    "Corn_(maize)___Northern_Leaf_Blight",
    "Corn_(maize)___healthy",
    "Grape___Black_rot",
    "Grape___Esca_(Black_Measles)",
    "Grape___Leaf_blight_(Isariopsis_Leaf_Spot)",
    "Grape___healthy",
    "Orange___Haunglongbing_(Citrus_greening)",
    "Peach___Bacterial_spot",
    "Peach___healthy",
    "Pepper,_bell___Bacterial_spot",
    "Pepper,_bell___healthy",
    "Potato___Early_blight",
    "Potato___Late_blight",
    "Potato___healthy",
    "Raspberry___healthy",
    "Soybean___healthy",
    "Squash___Powdery_mildew",
    "Strawberry___Leaf_scorch",
    "Strawberry___healthy",
    "Tomato___Bacterial_spot",
    "Tomato___Early_blight",
    "Tomato___healthy",
    "Tomato___Late_blight",
    "Tomato___Leaf_Mold",
    "Tomato___Septoria_leaf_spot",
    "Tomato___Spider_mites__Two-spotted_spider_mite",
    "Tomato___Target_Spot",
    "Tomato___Tomato_mosaic_virus",
    "Tomato___Tomato_Yellow_Leaf_Curl_Virus",
];

/// Model labels whose catalog key differs by more than punctuation
const LABEL_ALIASES: &[(&str, &str)] = &[
    ("Cherry_(including_sour)___Powdery_mildew", "Cherry___Powdery_mildew"),
    ("Cherry_(including_sour)___healthy", "Cherry___healthy"),
    (
        "Corn_(maize)___Cercospora_leaf_spot__Gray_leaf_spot",
        "Corn___Cercospora_leaf_spot",
    ),
    ("Corn_(maize)___Common_rust", "Corn___Common_rust"),
    ("Corn_(maize)___Northern_Leaf_Blight", "Corn___Northern_Leaf_Blight"),
    ("Corn_(maize)___healthy", "Corn___healthy"),
    (
        "Tomato___Spider_mites__Two-spotted_spider_mite",
        "Tomato___Spider_mites",
    ),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseInfo {
    pub disease: String,
    pub severity: String,
    pub recommendations: Vec<String>,
    pub prevention: String,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    key: String,
    #[serde(flatten)]
    info: DiseaseInfo,
}

static CATALOG: Lazy<Vec<(String, DiseaseInfo)>> =
    Lazy::new(|| match parse_catalog(include_str!("../../data/diseases.json")) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!(error = %e, "Disease catalog is malformed, serving placeholders only");
            Vec::new()
        }
    });

fn parse_catalog(raw: &str) -> Result<Vec<(String, DiseaseInfo)>, serde_json::Error> {
    let entries: Vec<CatalogEntry> = serde_json::from_str(raw)?;
    Ok(entries.into_iter().map(|e| (e.key, e.info)).collect())
}

/// Every catalog entry, in catalog order
pub fn all() -> &'static [(String, DiseaseInfo)] {
    &CATALOG
}

pub fn lookup(key: &str) -> Option<&'static DiseaseInfo> {
    CATALOG.iter().find(|(k, _)| k == key).map(|(_, info)| info)
}

/// Lower-case, drop `,()`, spaces to `_`, collapse repeated `_`
fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let c = match c {
            ',' | '(' | ')' => continue,
            ' ' => '_',
            other => other.to_ascii_lowercase(),
        };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Description for a classifier label: exact key, alias, normalized name,
/// then a placeholder built from the label itself
pub fn resolve(label: &str) -> DiseaseInfo {
    if let Some(info) = lookup(label) {
        return info.clone();
    }

    if let Some(info) = LABEL_ALIASES
        .iter()
        .find(|(from, _)| *from == label)
        .and_then(|(_, to)| lookup(to))
    {
        return info.clone();
    }

    let wanted = normalize(label);
    if let Some((_, info)) = CATALOG.iter().find(|(key, _)| normalize(key) == wanted) {
        return info.clone();
    }

    DiseaseInfo {
        disease: label.replace('_', " "),
        severity: "Unknown".to_string(),
        recommendations: vec!["Consult with an agricultural expert".to_string()],
        prevention: "Unable to determine".to_string(),
    }
}

/// The crop part of a `Crop___Condition` label, e.g. "Pepper, bell"
pub fn plant_of(label: &str) -> String {
    label
        .split("___")
        .next()
        .unwrap_or(label)
        .replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        assert_eq!(all().len(), 47);
        let scab = lookup("Apple___Apple_scab").unwrap();
        assert_eq!(scab.disease, "Apple Scab");
        assert_eq!(scab.severity, "Moderate");
        assert!(!scab.recommendations.is_empty());
    }

    #[test]
    fn test_malformed_catalog_is_an_error() {
        assert!(parse_catalog(r#"[{"key": "Apple___Apple_scab", "disease": "Apple Scab"}]"#).is_err());
        assert!(parse_catalog("not json").is_err());
        assert_eq!(parse_catalog("[]").unwrap().len(), 0);
    }

    #[test]
    fn test_every_label_resolves_to_catalog() {
        for label in CLASS_LABELS {
            let info = resolve(label);
            assert_ne!(info.severity, "Unknown", "{} fell through to placeholder", label);
        }
    }

    #[test]
    fn test_alias_and_normalized_resolution() {
        assert_eq!(
            resolve("Corn_(maize)___Common_rust"),
            *lookup("Corn___Common_rust").unwrap()
        );
        assert_eq!(
            resolve("Grape___Esca_(Black_Measles)"),
            *lookup("Grape___Esca_Black_Measles").unwrap()
        );
        assert_eq!(
            resolve("Orange___Haunglongbing_(Citrus_greening)"),
            *lookup("Orange___Haunglongbing_Citrus_greening").unwrap()
        );
    }

    #[test]
    fn test_placeholder_for_unknown_label() {
        let info = resolve("Mango___Sooty_mould");
        assert_eq!(info.disease, "Mango   Sooty mould");
        assert_eq!(info.severity, "Unknown");
        assert_eq!(info.recommendations, vec!["Consult with an agricultural expert"]);
        assert_eq!(info.prevention, "Unable to determine");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Pepper,_bell___Bacterial_spot"), "pepper_bell_bacterial_spot");
        assert_eq!(normalize("Grape___Leaf blight (Isariopsis)"), "grape_leaf_blight_isariopsis");
    }

    #[test]
    fn test_plant_of() {
        assert_eq!(plant_of("Pepper,_bell___healthy"), "Pepper, bell");
        assert_eq!(plant_of("Tomato___Late_blight"), "Tomato");
    }
}
