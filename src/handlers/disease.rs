// /api/disease handlers

use std::collections::BTreeMap;

use bytes::Buf;
use futures_util::TryStreamExt;
use serde_json::json;
use tracing::{info, warn};
use warp::multipart::{FormData, Part};
use warp::{Rejection, Reply};

use super::ok;
use crate::advisor::{DiseaseFinding, FieldContext};
use crate::db::types::{NewDetection, User};
use crate::disease::{catalog, uploads, ClassifierError, DiseaseInfo};
use crate::error::ApiError;
use crate::state::SharedState;

/// Largest accepted upload
pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

impl From<ClassifierError> for ApiError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::Decode(_) => ApiError::bad_request(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// The fields of a detection upload
#[derive(Debug, Default)]
pub struct DetectForm {
    pub image: Option<(String, Vec<u8>)>,
    pub context: FieldContext,
}

/// Name, filename and content of every part, read in order
async fn collect_parts(form: FormData) -> Result<Vec<(String, Option<String>, Vec<u8>)>, ApiError> {
    form.and_then(|part: Part| async move {
        let name = part.name().to_string();
        let filename = part.filename().map(str::to_string);
        let data = part
            .stream()
            .try_fold(Vec::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(chunk.chunk());
                Ok(acc)
            })
            .await?;
        Ok((name, filename, data))
    })
    .try_collect()
    .await
    .map_err(|e| ApiError::bad_request(format!("Invalid upload: {}", e)))
}

pub fn parse_form(parts: Vec<(String, Option<String>, Vec<u8>)>) -> DetectForm {
    let mut parsed = DetectForm::default();
    for (name, filename, data) in parts {
        if name == "image" {
            parsed.image = Some((filename.unwrap_or_default(), data));
            continue;
        }
        let text = String::from_utf8_lossy(&data).trim().to_string();
        let value = (!text.is_empty()).then_some(text);
        match name.as_str() {
            "location" => parsed.context.location = value,
            "farm_size" => parsed.context.farm_size = value,
            "climate" => parsed.context.climate = value,
            "previous_treatments" => parsed.context.previous_treatments = value,
            _ => {}
        }
    }
    parsed
}

pub async fn detect(
    form: FormData,
    caller: Option<User>,
    state: SharedState,
) -> Result<impl Reply, Rejection> {
    let form = parse_form(collect_parts(form).await?);
    let (filename, image) = form
        .image
        .ok_or_else(|| ApiError::bad_request("No image file provided"))?;
    if filename.trim().is_empty() {
        return Err(ApiError::bad_request("No file selected").into());
    }

    let classifier = state.classifier.clone().ok_or_else(|| {
        ApiError::ServiceUnavailable("Disease detection model is not available".to_string())
    })?;

    let image_path = uploads::save_upload(&state.config.upload_dir, &filename, &image)
        .await
        .map_err(|e| ApiError::Internal(format!("Could not save upload: {}", e)))?;
    let image_path = image_path.to_string_lossy().into_owned();

    let classification = tokio::task::spawn_blocking(move || classifier.classify(&image))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)?;
    let confidence = classification.confidence_percent();
    let DiseaseInfo {
        disease,
        severity,
        recommendations,
        prevention,
    } = catalog::resolve(classification.label);
    info!(label = classification.label, confidence, "Classified leaf image");

    let mut result = json!({
        "predicted_class": classification.label,
        "disease_name": disease,
        "confidence": confidence,
        "severity": severity,
        "recommendations": recommendations,
        "prevention": prevention,
        "image_path": image_path,
        "ai_available": state.advisor.is_some(),
        "ai_enhanced": false,
    });

    if let Some(advisor) = &state.advisor {
        let finding = DiseaseFinding {
            disease: disease.clone(),
            plant: catalog::plant_of(classification.label),
            confidence,
            severity: severity.clone(),
        };
        let ai = advisor.disease_recommendations(&finding, &form.context).await;
        result["ai_enhanced"] = json!(ai.get("source") != Some(&json!("fallback_system")));
        result["ai_recommendations"] = ai;
    }

    if let Some(user) = &caller {
        let logged = result
            .get("ai_recommendations")
            .cloned()
            .unwrap_or_else(|| json!(recommendations));
        let detection = NewDetection {
            user_id: user.id,
            image_path: image_path.clone(),
            disease_name: disease.clone(),
            confidence,
            recommendations: logged,
        };
        if let Err(e) = state.db.log_detection(detection).await {
            warn!(error = %e, user_id = user.id, "Could not log detection");
        }
    }

    ok(&result)
}

pub async fn diseases() -> Result<impl Reply, Rejection> {
    let catalog: BTreeMap<&str, &DiseaseInfo> = catalog::all()
        .iter()
        .map(|(key, info)| (key.as_str(), info))
        .collect();
    ok(&json!({ "diseases": catalog }))
}

pub async fn disease(key: String) -> Result<impl Reply, Rejection> {
    let data = catalog::lookup(&key).ok_or_else(|| ApiError::not_found("Disease not found"))?;
    ok(&json!({ "disease": key, "data": data }))
}

pub async fn history(user: User, state: SharedState) -> Result<impl Reply, Rejection> {
    let detections = state
        .db
        .detections_for(user.id)
        .await
        .map_err(ApiError::from)?;
    ok(&json!({ "count": detections.len(), "detections": detections }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_form() {
        let form = parse_form(vec![
            ("location".to_string(), None, b"Nashik ".to_vec()),
            ("climate".to_string(), None, Vec::new()),
            ("image".to_string(), Some("leaf.jpg".to_string()), vec![1, 2, 3]),
            ("other".to_string(), None, b"x".to_vec()),
        ]);
        assert_eq!(form.context.location.as_deref(), Some("Nashik"));
        assert_eq!(form.context.climate, None);
        let (name, bytes) = form.image.unwrap();
        assert_eq!(name, "leaf.jpg");
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_image_without_filename() {
        let form = parse_form(vec![("image".to_string(), None, vec![0])]);
        assert_eq!(form.image.unwrap().0, "");
        assert!(parse_form(Vec::new()).image.is_none());
    }

    #[test]
    fn test_decode_errors_are_client_errors() {
        let err = ApiError::from(ClassifierError::Decode("bad png".to_string()));
        assert!(matches!(err, ApiError::BadRequest(_)));
        let err = ApiError::from(ClassifierError::Inference("shape".to_string()));
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
