use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use super::classifier::{ClassifierError, DiseaseClassifier, OnnxClassifier};

/// Fetch the model file once when it is missing locally
pub async fn download_model(url: &str, path: &Path) -> Result<(), ClassifierError> {
    info!(url, path = %path.display(), "Downloading disease model");

    let response = reqwest::get(url)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| ClassifierError::Download(e.to_string()))?;
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ClassifierError::Download(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ClassifierError::Download(e.to_string()))?;
    }
    tokio::fs::write(path, &bytes)
        .await
        .map_err(|e| ClassifierError::Download(e.to_string()))?;

    info!(bytes = bytes.len(), "Disease model saved");
    Ok(())
}

/// Load the classifier, downloading it first if needed.
///
/// Returns `None` when the model is unavailable; the server then runs without
/// image classification.
pub async fn load_classifier(
    path: &Path,
    download_url: Option<&str>,
) -> Option<Arc<dyn DiseaseClassifier>> {
    if !path.exists() {
        match download_url {
            Some(url) => {
                if let Err(e) = download_model(url, path).await {
                    warn!(error = %e, "Could not fetch disease model");
                    return None;
                }
            }
            None => {
                warn!(path = %path.display(), "Disease model not found and DISEASE_MODEL_URL is not set");
                return None;
            }
        }
    }

    let owned = path.to_path_buf();
    match tokio::task::spawn_blocking(move || OnnxClassifier::load(&owned)).await {
        Ok(Ok(classifier)) => {
            info!(path = %path.display(), "Disease model loaded");
            Some(Arc::new(classifier))
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Disease model could not be loaded");
            None
        }
        Err(e) => {
            warn!(error = %e, "Disease model loader panicked");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_model_without_url_is_none() {
        let classifier = load_classifier(Path::new("no/such/model.onnx"), None).await;
        assert!(classifier.is_none());
    }

    #[tokio::test]
    async fn test_bad_download_url_is_none() {
        let dir = std::env::temp_dir().join(format!("agromitra-model-{}", uuid::Uuid::new_v4()));
        let path = dir.join("model.onnx");
        let classifier = load_classifier(&path, Some("http://127.0.0.1:9/model.onnx")).await;
        assert!(classifier.is_none());
        assert!(!path.exists());
    }
}
