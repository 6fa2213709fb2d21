//! Genre dataset preparation
//!
//! Converts a directory of genre-labelled audio tracks into a JSON file of
//! fixed-shape MFCC matrices for classifier training.
//!
//! Each immediate (or nested) subdirectory of the dataset root is a genre;
//! every file in it is decoded, resampled, cut into equal segments, and each
//! segment's MFCC matrix is kept if it has the expected number of frames.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use genre_core::{save_mfcc, ExtractionConfig};
//!
//! let report = save_mfcc(
//!     Path::new("genre_dataset"),
//!     Path::new("data.json"),
//!     &ExtractionConfig::default(),
//! ).unwrap();
//! println!("{} samples", report.samples);
//! ```

pub mod audio;
pub mod config;
pub mod dataset;
pub mod error;
pub mod pipeline;

pub use audio::{load_track, FeatureExtractor, MfccConfig, MfccExtractor};
pub use config::{DecodePolicy, ExtractionConfig};
pub use dataset::{read_dataset, write_dataset, CollectionStats, DatasetRecord, SegmentPlan};
pub use error::{ConfigError, DecodeError, FeatureError, PrepError, Result};
pub use pipeline::{extract_dataset, save_mfcc, PipelineReport};
