//! Leaf-image disease detection

pub mod catalog;
pub mod classifier;
pub mod provision;
pub mod uploads;

pub use catalog::DiseaseInfo;
pub use classifier::{Classification, ClassifierError, DiseaseClassifier, OnnxClassifier};
pub use provision::load_classifier;
