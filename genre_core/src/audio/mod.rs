//! Audio loading and feature extraction

pub mod decoder;
pub mod mfcc;

pub use decoder::load_track;
pub use mfcc::{FeatureExtractor, MfccConfig, MfccExtractor};
