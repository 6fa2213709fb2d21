//! Error types for dataset preparation

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error returned by the preparation pipeline
#[derive(Error, Debug)]
pub enum PrepError {
    #[error("Dataset root not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Dataset root is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Directory traversal failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("Feature extraction error: {0}")]
    Feature(#[from] FeatureError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Audio loading errors
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to open audio file: {0}")]
    Open(#[source] std::io::Error),

    #[error("unsupported format or failed to probe container: {0}")]
    Probe(#[source] symphonia::core::errors::Error),

    #[error("no supported audio tracks found")]
    NoTrack,

    #[error("failed to create decoder for selected track: {0}")]
    Codec(#[source] symphonia::core::errors::Error),

    #[error("unrecoverable decode error: {0}")]
    Decode(#[source] symphonia::core::errors::Error),

    #[error("decoder reset required (chained streams are not supported)")]
    ResetRequired,

    #[error("could not determine {0}")]
    UnknownFormat(&'static str),

    #[error("decoded audio was empty")]
    Empty,

    #[error("resampling failed: {0}")]
    Resample(String),
}

/// MFCC computation errors
#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("FFT failed: {0}")]
    Fft(#[from] realfft::FftError),

    #[error("invalid feature matrix shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration value: {field} = {value}")]
    InvalidValue { field: String, value: String },
}

pub type Result<T> = std::result::Result<T, PrepError>;
