//! Government scheme directory and the eligibility rules

use serde::{Deserialize, Deserializer, Serialize};

const AGRI_MINISTRY: &str = "Ministry of Agriculture & Farmers Welfare";

pub const PM_KISAN: u32 = 1;
pub const KISAN_CREDIT_CARD: u32 = 4;
pub const PKVY: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scheme {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub benefits: &'static str,
    pub eligibility: &'static [&'static str],
    pub how_to_apply: &'static str,
    pub documents: &'static [&'static str],
    pub category: &'static str,
    pub ministry: &'static str,
}

pub const SCHEMES: &[Scheme] = &[
    Scheme {
        id: PM_KISAN,
        name: "PM-KISAN (Pradhan Mantri Kisan Samman Nidhi)",
        description: "Income support of ₹6000 per year to all farmer families in three equal installments",
        benefits: "₹2000 per installment (3 installments per year)",
        eligibility: &[
            "All landholding farmer families",
            "Small and marginal farmers prioritized",
            "Aadhar card mandatory",
        ],
        how_to_apply: "Apply online at pmkisan.gov.in or through local agriculture office",
        documents: &["Land records", "Aadhar card", "Bank account details"],
        category: "Income Support",
        ministry: AGRI_MINISTRY,
    },
    Scheme {
        id: 2,
        name: "Pradhan Mantri Fasal Bima Yojana (PMFBY)",
        description: "Crop insurance scheme providing financial support to farmers in case of crop loss",
        benefits: "Insurance coverage for crop loss due to natural calamities",
        eligibility: &[
            "All farmers growing notified crops",
            "Compulsory for loanee farmers",
            "Voluntary for non-loanee farmers",
        ],
        how_to_apply: "Apply through banks, CSCs, or online portal",
        documents: &["Land records", "Sowing certificate", "Bank account"],
        category: "Insurance",
        ministry: AGRI_MINISTRY,
    },
    Scheme {
        id: 3,
        name: "Soil Health Card Scheme",
        description: "Provides farmers with soil health cards containing crop-wise recommendations",
        benefits: "Free soil testing and nutrient recommendations",
        eligibility: &["All farmers"],
        how_to_apply: "Contact local agriculture department",
        documents: &["Land records", "Farmer ID"],
        category: "Advisory",
        ministry: AGRI_MINISTRY,
    },
    Scheme {
        id: KISAN_CREDIT_CARD,
        name: "Kisan Credit Card (KCC)",
        description: "Credit facility for farmers to meet agricultural expenses",
        benefits: "Short-term credit at subsidized interest rates",
        eligibility: &[
            "Farmers owning or cultivating land",
            "Share croppers and tenant farmers",
            "Good credit history",
        ],
        how_to_apply: "Apply through any bank",
        documents: &["Land records", "Aadhar card", "Photo", "Application form"],
        category: "Credit",
        ministry: AGRI_MINISTRY,
    },
    Scheme {
        id: 5,
        name: "National Mission for Sustainable Agriculture (NMSA)",
        description: "Promotes sustainable agriculture practices and soil health management",
        benefits: "Technical and financial support for sustainable farming",
        eligibility: &["All farmers interested in sustainable agriculture"],
        how_to_apply: "Contact state agriculture department",
        documents: &["Land records", "Project proposal"],
        category: "Development",
        ministry: AGRI_MINISTRY,
    },
    Scheme {
        id: PKVY,
        name: "Paramparagat Krishi Vikas Yojana (PKVY)",
        description: "Supports organic farming through financial assistance",
        benefits: "₹50,000 per hectare for 3 years",
        eligibility: &[
            "Farmers wanting to adopt organic farming",
            "Cluster approach (minimum 50 farmers)",
        ],
        how_to_apply: "Apply through district agriculture office",
        documents: &["Land records", "Group formation documents"],
        category: "Organic Farming",
        ministry: AGRI_MINISTRY,
    },
    Scheme {
        id: 7,
        name: "National Agriculture Market (e-NAM)",
        description: "Online trading platform for agricultural commodities",
        benefits: "Better price discovery and market access",
        eligibility: &["All farmers"],
        how_to_apply: "Register on enam.gov.in",
        documents: &["Aadhar card", "Bank account", "Mobile number"],
        category: "Marketing",
        ministry: AGRI_MINISTRY,
    },
    Scheme {
        id: 8,
        name: "Pradhan Mantri Krishi Sinchayee Yojana (PMKSY)",
        description: "Irrigation scheme to expand cultivable area with assured irrigation",
        benefits: "Financial assistance for micro-irrigation and water conservation",
        eligibility: &["All farmers"],
        how_to_apply: "Contact district agriculture office",
        documents: &["Land records", "Project details"],
        category: "Irrigation",
        ministry: AGRI_MINISTRY,
    },
];

/// All schemes, or those in `category` (case-insensitive)
pub fn by_category(category: Option<&str>) -> Vec<&'static Scheme> {
    match category.filter(|c| !c.is_empty()) {
        Some(category) => SCHEMES
            .iter()
            .filter(|s| s.category.eq_ignore_ascii_case(category))
            .collect(),
        None => SCHEMES.iter().collect(),
    }
}

pub fn find(id: u32) -> Option<&'static Scheme> {
    SCHEMES.iter().find(|s| s.id == id)
}

pub fn categories() -> Vec<&'static str> {
    let mut categories: Vec<&str> = SCHEMES.iter().map(|s| s.category).collect();
    categories.sort_unstable();
    categories.dedup();
    categories
}

/// Case-insensitive match on name, description or category
pub fn search(query: &str) -> Vec<&'static Scheme> {
    let query = query.to_lowercase();
    SCHEMES
        .iter()
        .filter(|s| {
            s.name.to_lowercase().contains(&query)
                || s.description.to_lowercase().contains(&query)
                || s.category.to_lowercase().contains(&query)
        })
        .collect()
}

/// Answers from the eligibility form; a missing or `null` answer counts as no
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FarmerSituation {
    #[serde(deserialize_with = "null_as_default")]
    pub has_land: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub farm_size: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub interested_in_organic: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub needs_credit: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize)]
pub struct EligibleScheme {
    pub scheme: &'static Scheme,
    pub reasons: Vec<&'static str>,
}

/// Outcome for one scheme: `None` when excluded, otherwise the specific reason if any
fn evaluate(scheme: &Scheme, farmer: &FarmerSituation) -> Option<Option<&'static str>> {
    match scheme.id {
        PM_KISAN if farmer.has_land => Some(Some("You own agricultural land")),
        PM_KISAN => None,
        KISAN_CREDIT_CARD if !farmer.needs_credit => None,
        KISAN_CREDIT_CARD if farmer.has_land => Some(Some("You need credit and own land")),
        PKVY if !farmer.interested_in_organic => None,
        PKVY if farmer.farm_size > 0.0 => Some(Some("You are interested in organic farming")),
        _ => Some(None),
    }
}

pub fn check_eligibility(farmer: &FarmerSituation) -> Vec<EligibleScheme> {
    SCHEMES
        .iter()
        .filter_map(|scheme| {
            evaluate(scheme, farmer).map(|reason| EligibleScheme {
                scheme,
                reasons: vec![reason.unwrap_or("General eligibility criteria met")],
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_answers_count_as_no() {
        let farmer: FarmerSituation = serde_json::from_value(serde_json::json!({
            "has_land": true,
            "farm_size": null,
            "needs_credit": null,
        }))
        .unwrap();
        assert!(farmer.has_land);
        assert_eq!(farmer.farm_size, 0.0);
        assert!(!farmer.needs_credit);
        assert!(!farmer.interested_in_organic);
    }

    fn eligible_ids(farmer: &FarmerSituation) -> Vec<u32> {
        check_eligibility(farmer).iter().map(|e| e.scheme.id).collect()
    }

    #[test]
    fn test_table_shape() {
        assert_eq!(SCHEMES.len(), 8);
        for (i, scheme) in SCHEMES.iter().enumerate() {
            assert_eq!(scheme.id as usize, i + 1);
        }
    }

    #[test]
    fn test_category_filter_ignores_case() {
        let credit = by_category(Some("credit"));
        assert_eq!(credit.len(), 1);
        assert_eq!(credit[0].id, KISAN_CREDIT_CARD);
        assert_eq!(by_category(None).len(), 8);
        assert!(by_category(Some("Space")).is_empty());
    }

    #[test]
    fn test_categories_sorted_and_distinct() {
        let categories = categories();
        assert_eq!(categories.len(), 8);
        assert_eq!(categories[0], "Advisory");
        assert!(categories.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_find() {
        assert_eq!(find(6).map(|s| s.category), Some("Organic Farming"));
        assert!(find(99).is_none());
    }

    #[test]
    fn test_search() {
        let hits: Vec<u32> = search("INSURANCE").iter().map(|s| s.id).collect();
        assert_eq!(hits, vec![2]);
        assert!(search("spaceship").is_empty());
    }

    #[test]
    fn test_landless_farmer_without_needs() {
        let farmer = FarmerSituation::default();
        assert_eq!(eligible_ids(&farmer), vec![2, 3, 5, 7, 8]);
        assert!(check_eligibility(&farmer)
            .iter()
            .all(|e| e.reasons == vec!["General eligibility criteria met"]));
    }

    #[test]
    fn test_full_profile_reasons() {
        let farmer = FarmerSituation {
            has_land: true,
            farm_size: 2.0,
            interested_in_organic: true,
            needs_credit: true,
        };
        let result = check_eligibility(&farmer);
        assert_eq!(result.len(), 8);
        assert_eq!(result[0].reasons, vec!["You own agricultural land"]);
        assert_eq!(result[3].reasons, vec!["You need credit and own land"]);
        assert_eq!(result[5].reasons, vec!["You are interested in organic farming"]);
    }

    #[test]
    fn test_credit_without_land_uses_general_reason() {
        let farmer = FarmerSituation {
            needs_credit: true,
            interested_in_organic: true,
            ..FarmerSituation::default()
        };
        let result = check_eligibility(&farmer);
        let kcc = result.iter().find(|e| e.scheme.id == KISAN_CREDIT_CARD).unwrap();
        assert_eq!(kcc.reasons, vec!["General eligibility criteria met"]);
        let pkvy = result.iter().find(|e| e.scheme.id == PKVY).unwrap();
        assert_eq!(pkvy.reasons, vec!["General eligibility criteria met"]);
    }
}
