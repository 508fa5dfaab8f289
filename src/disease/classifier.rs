//! Plant-disease image classification with an ONNX export of the network

use std::path::Path;

use image::imageops::FilterType;
use thiserror::Error;
use tract_onnx::prelude::*;

use super::catalog::CLASS_LABELS;

pub const INPUT_SIZE: u32 = 224;
const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Failed to load model: {0}")]
    Load(String),

    #[error("Invalid image: {0}")]
    Decode(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Model download failed: {0}")]
    Download(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: &'static str,
    /// Softmax probability of `label`, 0..=1
    pub probability: f32,
}

impl Classification {
    /// Probability as a percentage rounded to two decimals
    pub fn confidence_percent(&self) -> f64 {
        (f64::from(self.probability) * 10_000.0).round() / 100.0
    }
}

/// Anything that can label an encoded image. Calls are CPU-bound.
pub trait DiseaseClassifier: Send + Sync {
    fn classify(&self, image: &[u8]) -> Result<Classification, ClassifierError>;
}

/// Decode, resize to 224×224 and normalize into an NCHW tensor
pub fn preprocess(bytes: &[u8]) -> Result<tract_ndarray::Array4<f32>, ClassifierError> {
    let rgb = image::load_from_memory(bytes)
        .map_err(|e| ClassifierError::Decode(e.to_string()))?
        .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Triangle)
        .to_rgb8();

    let size = INPUT_SIZE as usize;
    Ok(tract_ndarray::Array4::from_shape_fn(
        (1, 3, size, size),
        |(_, c, y, x)| {
            let value = f32::from(rgb.get_pixel(x as u32, y as u32)[c]) / 255.0;
            (value - MEAN[c]) / STD[c]
        },
    ))
}

pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index and value of the largest probability; first wins on ties
pub fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    values
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, v)| match best {
            Some((_, best_v)) if best_v >= v => best,
            _ => Some((i, v)),
        })
}

/// Turn raw network outputs into a label
pub fn classify_logits(logits: &[f32]) -> Result<Classification, ClassifierError> {
    if logits.len() != CLASS_LABELS.len() {
        return Err(ClassifierError::Inference(format!(
            "expected {} outputs, got {}",
            CLASS_LABELS.len(),
            logits.len()
        )));
    }
    let probabilities = softmax(logits);
    let (index, probability) = argmax(&probabilities)
        .ok_or_else(|| ClassifierError::Inference("empty output".to_string()))?;

    Ok(Classification {
        label: CLASS_LABELS[index],
        probability,
    })
}

pub struct OnnxClassifier {
    model: TypedRunnableModel<TypedModel>,
}

impl OnnxClassifier {
    /// Load and optimize the model for a fixed 1×3×224×224 input
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let size = INPUT_SIZE as usize;
        let model = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|m| m.with_input_fact(0, f32::fact([1, 3, size, size]).into()))
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .map_err(|e| ClassifierError::Load(e.to_string()))?;

        Ok(Self { model })
    }
}

impl DiseaseClassifier for OnnxClassifier {
    fn classify(&self, image: &[u8]) -> Result<Classification, ClassifierError> {
        let input: Tensor = preprocess(image)?.into();
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;
        let logits = outputs
            .first()
            .ok_or_else(|| ClassifierError::Inference("model produced no output".to_string()))?
            .to_array_view::<f32>()
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        classify_logits(&logits.iter().copied().collect::<Vec<_>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32, pixel: [u8; 3]) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb(pixel));
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_preprocess_shape_and_normalization() {
        let tensor = preprocess(&png(50, 30, [255, 0, 128])).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);

        let red = tensor[[0, 0, 100, 100]];
        let green = tensor[[0, 1, 0, 0]];
        assert!((red - (1.0 - 0.485) / 0.229).abs() < 1e-4);
        assert!((green - (0.0 - 0.456) / 0.224).abs() < 1e-4);
    }

    #[test]
    fn test_preprocess_rejects_garbage() {
        assert!(matches!(
            preprocess(b"definitely not an image"),
            Err(ClassifierError::Decode(_))
        ));
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let p = softmax(&[1.0, 2.0, 3.0]);
        assert!((p.iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert!(p[2] > p[1] && p[1] > p[0]);
    }

    #[test]
    fn test_argmax_first_on_tie() {
        assert_eq!(argmax(&[0.1, 0.7, 0.7]), Some((1, 0.7)));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_classify_logits() {
        let mut logits = vec![0.0f32; 38];
        logits[21] = 10.0;
        let result = classify_logits(&logits).unwrap();
        assert_eq!(result.label, "Potato___Late_blight");
        assert!(result.probability > 0.99);
        assert!(result.confidence_percent() > 99.0);

        assert!(classify_logits(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_confidence_percent_rounding() {
        let c = Classification {
            label: CLASS_LABELS[0],
            probability: 0.876_54,
        };
        assert_eq!(c.confidence_percent(), 87.65);
    }

    #[test]
    fn test_load_missing_model_fails() {
        assert!(matches!(
            OnnxClassifier::load(Path::new("does/not/exist.onnx")),
            Err(ClassifierError::Load(_))
        ));
    }
}
