//! LLM-written treatment plans and crop advice

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

use crate::llm::{GenerateRequest, LlmError, LlmProvider};

const ADVISOR_PERSONA: &str = "You are an expert agricultural advisor with deep knowledge of plant pathology, crop management, and sustainable farming practices.";

const FALLBACK_DISEASE_ADVICE: &[&str] = &[
    "Consult with local agricultural extension officer",
    "Remove affected plant parts immediately",
    "Apply appropriate fungicide as per local guidelines",
    "Improve air circulation around plants",
    "Monitor other plants for similar symptoms",
];

/// Classifier output the treatment prompt is built from
#[derive(Debug, Clone)]
pub struct DiseaseFinding {
    pub disease: String,
    pub plant: String,
    /// Percent
    pub confidence: f64,
    pub severity: String,
}

/// Optional farm details sent with a detection
#[derive(Debug, Clone, Default)]
pub struct FieldContext {
    pub location: Option<String>,
    pub farm_size: Option<String>,
    pub climate: Option<String>,
    pub previous_treatments: Option<String>,
}

impl FieldContext {
    pub fn is_empty(&self) -> bool {
        self.location.is_none()
            && self.farm_size.is_none()
            && self.climate.is_none()
            && self.previous_treatments.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CropAdviceInput {
    pub farm_size: Option<String>,
    pub location: Option<String>,
    pub experience: Option<String>,
    pub crops_grown: Option<String>,
    pub season: String,
    /// Free-form location details (state, district, soil ...)
    pub location_details: Value,
}

pub struct AiAdvisor {
    provider: Arc<dyn LlmProvider>,
}

impl AiAdvisor {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    fn source(&self) -> String {
        format!("AI_{}", self.provider.name())
    }

    /// Treatment plan for a detected disease; a fixed checklist when the model fails
    pub async fn disease_recommendations(
        &self,
        finding: &DiseaseFinding,
        context: &FieldContext,
    ) -> Value {
        let request = GenerateRequest::prompt(
            Some(ADVISOR_PERSONA.to_string()),
            disease_prompt(finding, context),
        );
        match self.provider.generate(request).await {
            Ok(answer) => parse_answer(&answer.text, "ai_recommendations", &self.source(), true),
            Err(e) => {
                warn!(error = %e, "AI disease recommendations failed");
                fallback_disease_recommendations()
            }
        }
    }

    /// Crop plan for the farmer; the caller decides how to fall back
    pub async fn crop_recommendations(&self, input: &CropAdviceInput) -> Result<Value, LlmError> {
        let request = GenerateRequest::prompt(Some(ADVISOR_PERSONA.to_string()), crop_prompt(input));
        let answer = self.provider.generate(request).await?;
        Ok(parse_answer(&answer.text, "crop_recommendations", &self.source(), false))
    }
}

pub fn fallback_disease_recommendations() -> Value {
    json!({
        "recommendations": FALLBACK_DISEASE_ADVICE,
        "source": "fallback_system",
        "note": "AI recommendations temporarily unavailable",
    })
}

fn or_unknown(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("Unknown")
}

pub fn disease_prompt(finding: &DiseaseFinding, context: &FieldContext) -> String {
    let mut prompt = format!(
        "As an expert plant pathologist and agricultural advisor, provide comprehensive treatment recommendations for:

Disease Detected: {}
Plant/Crop: {}
Confidence Level: {}%
Severity: {}
",
        finding.disease, finding.plant, finding.confidence, finding.severity
    );

    if !context.is_empty() {
        prompt.push_str(&format!(
            "
Farmer Context:
- Location: {}
- Farm Size: {}
- Climate Zone: {}
- Previous Treatments: {}
",
            or_unknown(&context.location),
            or_unknown(&context.farm_size),
            or_unknown(&context.climate),
            context.previous_treatments.as_deref().unwrap_or("None"),
        ));
    }

    prompt.push_str(
        "
Please provide:
1. Immediate Actions (next 24-48 hours)
2. Treatment Plan (specific fungicides/pesticides with dosages)
3. Cultural Practices (pruning, spacing, sanitation)
4. Prevention Strategies (future occurrences)
5. Organic Alternatives (if farmer prefers)
6. Cost Estimation (treatment costs)
7. Timeline (expected recovery period)
8. Monitoring Checklist (signs of improvement/worsening)
9. Emergency Contacts (local agricultural extension)
10. Follow-up Recommendations (post-treatment care)

Consider local availability of treatments, cost-effectiveness for small farmers, environmental impact and resistance management.

Format as structured JSON with clear action items.",
    );
    prompt
}

pub fn crop_prompt(input: &CropAdviceInput) -> String {
    format!(
        "As an expert agricultural advisor, provide crop recommendations for:

Farmer Profile:
- Farm Size: {} acres
- Location: {}
- Experience: {}
- Previous Crops: {}

Current Season: {}
Location Details: {}

Provide:
1. Top 5 recommended crops with reasons
2. Expected yield and profit margins
3. Water requirements and irrigation tips
4. Market demand analysis
5. Risk factors and mitigation strategies
6. Seed varieties and suppliers
7. Timeline and key farming activities

Format as JSON with detailed explanations.",
        or_unknown(&input.farm_size),
        or_unknown(&input.location),
        or_unknown(&input.experience),
        or_unknown(&input.crops_grown),
        input.season,
        input.location_details,
    )
}

/// Strip a surrounding Markdown code fence, if any
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// A JSON object answer is returned as-is; anything else is wrapped under `field`
pub fn parse_answer(text: &str, field: &str, source: &str, with_confidence: bool) -> Value {
    let body = strip_code_fence(text);
    let generated_at = Utc::now().to_rfc3339();

    if body.starts_with('{') {
        return match serde_json::from_str::<Value>(body) {
            Ok(value) => value,
            Err(e) => json!({
                field: text,
                "parse_error": e.to_string(),
                "generated_at": generated_at,
            }),
        };
    }

    let mut wrapped = json!({
        field: text,
        "generated_at": generated_at,
        "source": source,
    });
    if with_confidence {
        wrapped["confidence"] = json!("high");
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::GenerateResponse;
    use async_trait::async_trait;

    struct FixedProvider(Result<&'static str, ()>);

    #[async_trait]
    impl LlmProvider for FixedProvider {
        async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
            match self.0 {
                Ok(text) => Ok(GenerateResponse {
                    text: text.to_string(),
                    finish_reason: None,
                    usage: None,
                }),
                Err(()) => Err(LlmError::HttpError {
                    status: 503,
                    body: "unavailable".to_string(),
                }),
            }
        }

        fn name(&self) -> &'static str {
            "gemini"
        }
    }

    fn finding() -> DiseaseFinding {
        DiseaseFinding {
            disease: "Late Blight".to_string(),
            plant: "Potato".to_string(),
            confidence: 91.5,
            severity: "High".to_string(),
        }
    }

    #[test]
    fn test_parse_json_object() {
        let value = parse_answer("{\"immediate_actions\": [\"remove leaves\"]}", "x", "AI_gemini", true);
        assert_eq!(value["immediate_actions"][0], "remove leaves");
    }

    #[test]
    fn test_parse_fenced_json_object() {
        let value = parse_answer("```json\n{\"a\": 1}\n```", "x", "AI_gemini", true);
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_parse_plain_text_is_wrapped() {
        let value = parse_answer("Spray copper oxychloride.", "ai_recommendations", "AI_openai", true);
        assert_eq!(value["ai_recommendations"], "Spray copper oxychloride.");
        assert_eq!(value["source"], "AI_openai");
        assert_eq!(value["confidence"], "high");
        assert!(value["generated_at"].is_string());

        let crop = parse_answer("Grow millet.", "crop_recommendations", "AI_openai", false);
        assert!(crop.get("confidence").is_none());
    }

    #[test]
    fn test_parse_broken_json_reports_error() {
        let value = parse_answer("{not json", "ai_recommendations", "AI_gemini", true);
        assert_eq!(value["ai_recommendations"], "{not json");
        assert!(value["parse_error"].is_string());
    }

    #[test]
    fn test_disease_prompt_sections() {
        let prompt = disease_prompt(&finding(), &FieldContext::default());
        assert!(prompt.contains("Disease Detected: Late Blight"));
        assert!(prompt.contains("Confidence Level: 91.5%"));
        assert!(!prompt.contains("Farmer Context"));

        let context = FieldContext {
            climate: Some("humid".to_string()),
            ..FieldContext::default()
        };
        let prompt = disease_prompt(&finding(), &context);
        assert!(prompt.contains("- Climate Zone: humid"));
        assert!(prompt.contains("- Previous Treatments: None"));
    }

    #[test]
    fn test_crop_prompt() {
        let input = CropAdviceInput {
            farm_size: Some("2.5".to_string()),
            season: "rabi".to_string(),
            location_details: json!({"state": "Punjab"}),
            ..CropAdviceInput::default()
        };
        let prompt = crop_prompt(&input);
        assert!(prompt.contains("- Farm Size: 2.5 acres"));
        assert!(prompt.contains("- Location: Unknown"));
        assert!(prompt.contains("Current Season: rabi"));
        assert!(prompt.contains("\"state\":\"Punjab\""));
    }

    #[tokio::test]
    async fn test_disease_recommendations_fall_back() {
        let advisor = AiAdvisor::new(Arc::new(FixedProvider(Err(()))));
        let value = advisor
            .disease_recommendations(&finding(), &FieldContext::default())
            .await;
        assert_eq!(value["source"], "fallback_system");
        assert_eq!(value["recommendations"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_crop_recommendations_propagate_errors() {
        let advisor = AiAdvisor::new(Arc::new(FixedProvider(Err(()))));
        assert!(advisor
            .crop_recommendations(&CropAdviceInput::default())
            .await
            .is_err());

        let advisor = AiAdvisor::new(Arc::new(FixedProvider(Ok("Plant mustard."))));
        let value = advisor
            .crop_recommendations(&CropAdviceInput::default())
            .await
            .unwrap();
        assert_eq!(value["crop_recommendations"], "Plant mustard.");
        assert_eq!(value["source"], "AI_gemini");
    }
}
